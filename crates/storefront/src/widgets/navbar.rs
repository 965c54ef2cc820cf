//! Responsive navbar.

use serde::Serialize;

/// Widest viewport (px) that uses the collapsed mobile menu.
pub const MOBILE_MAX_WIDTH: u32 = 767;

/// What a click on a top-level link did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkClick {
    /// Wide viewport: follow the link.
    PassThrough,
    /// Narrow viewport: the link's dropdown was toggled instead.
    Toggled { open: bool },
}

/// Navbar with a collapse toggler and dropdown top-level links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navbar {
    expanded: bool,
    open_links: Vec<bool>,
}

impl Navbar {
    #[must_use]
    pub fn new(link_count: usize) -> Self {
        Self {
            expanded: false,
            open_links: vec![false; link_count],
        }
    }

    /// Flip the collapsed menu. Returns the new state.
    pub const fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Value of the toggler's `aria-expanded` attribute.
    #[must_use]
    pub const fn aria_expanded(&self) -> &'static str {
        if self.expanded { "true" } else { "false" }
    }

    #[must_use]
    pub fn is_link_open(&self, index: usize) -> bool {
        self.open_links.get(index).copied().unwrap_or(false)
    }

    /// Handle a click on top-level link `index` at `viewport_width`.
    ///
    /// Opening a dropdown closes every other one.
    pub fn click_link(&mut self, index: usize, viewport_width: u32) -> LinkClick {
        if viewport_width > MOBILE_MAX_WIDTH || index >= self.open_links.len() {
            return LinkClick::PassThrough;
        }

        let open = !self.open_links[index];
        if open {
            self.open_links.fill(false);
        }
        self.open_links[index] = open;
        LinkClick::Toggled { open }
    }
}
