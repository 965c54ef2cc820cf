//! Slide-over filter panel.

use serde::{Deserialize, Serialize};

/// Interactions with the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "label", rename_all = "snake_case")]
pub enum DrawerEvent {
    Show,
    Hide,
    Apply,
    BackdropClick,
    /// Expand or collapse a filter group label.
    ToggleLabel(usize),
}

/// Filter drawer and its backdrop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDrawer {
    open: bool,
    open_labels: Vec<bool>,
}

impl FilterDrawer {
    #[must_use]
    pub fn new(label_count: usize) -> Self {
        Self {
            open: false,
            open_labels: vec![false; label_count],
        }
    }

    pub fn handle(&mut self, event: DrawerEvent) {
        match event {
            DrawerEvent::Show => self.open = true,
            DrawerEvent::Hide | DrawerEvent::Apply | DrawerEvent::BackdropClick => {
                self.open = false;
                self.open_labels.fill(false);
            }
            DrawerEvent::ToggleLabel(index) => {
                if let Some(label) = self.open_labels.get_mut(index) {
                    *label = !*label;
                }
            }
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The backdrop is shown exactly while the drawer is open.
    #[must_use]
    pub const fn has_backdrop(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_label_open(&self, index: usize) -> bool {
        self.open_labels.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_hide() {
        let mut drawer = FilterDrawer::new(2);
        drawer.handle(DrawerEvent::Show);
        assert!(drawer.is_open());
        assert!(drawer.has_backdrop());

        drawer.handle(DrawerEvent::ToggleLabel(1));
        assert!(drawer.is_label_open(1));

        drawer.handle(DrawerEvent::Apply);
        assert!(!drawer.is_open());
        assert!(!drawer.has_backdrop());
        assert!(!drawer.is_label_open(1));
    }

    #[test]
    fn test_backdrop_click_collapses_labels() {
        let mut drawer = FilterDrawer::new(3);
        drawer.handle(DrawerEvent::Show);
        drawer.handle(DrawerEvent::ToggleLabel(0));
        drawer.handle(DrawerEvent::ToggleLabel(2));
        drawer.handle(DrawerEvent::BackdropClick);
        assert!((0..3).all(|i| !drawer.is_label_open(i)));
    }

    #[test]
    fn test_show_twice_keeps_single_backdrop() {
        let mut drawer = FilterDrawer::new(0);
        drawer.handle(DrawerEvent::Show);
        drawer.handle(DrawerEvent::Show);
        drawer.handle(DrawerEvent::Hide);
        assert!(!drawer.has_backdrop());
        drawer.handle(DrawerEvent::ToggleLabel(5));
    }
}
