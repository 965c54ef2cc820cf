//! Gift-finder facet resolution.
//!
//! Valid facet values come from the site's embedded `giftsData` object, or
//! from the form controls when that object is missing or broken. The active
//! selection is then resolved per facet: a value chosen in the form wins,
//! then a `/gifts/{occasion}/{person}/{interest}/` URL segment that names a
//! known value, then the first value of the sorted list.

use giftgrid_core::{FacetSelection, GiftsData, gift_path_segments};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One of the three gift-finder facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Occasion,
    Person,
    Interest,
}

/// A form control changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "facet", content = "value", rename_all = "snake_case")]
pub enum FacetChange {
    Occasion(String),
    Person(String),
    Interest(String),
}

impl FacetChange {
    #[must_use]
    pub const fn facet(&self) -> Facet {
        match self {
            Self::Occasion(_) => Facet::Occasion,
            Self::Person(_) => Facet::Person,
            Self::Interest(_) => Facet::Interest,
        }
    }
}

/// The gift-finder form as rendered: available options and current choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    /// Option values of the audience `<select>`.
    #[serde(default)]
    pub audience_options: Vec<String>,
    /// Values of the occasion radios.
    #[serde(default)]
    pub occasion_options: Vec<String>,
    /// Values of the interest radios.
    #[serde(default)]
    pub interest_options: Vec<String>,
    #[serde(default)]
    pub selected_person: Option<String>,
    #[serde(default)]
    pub checked_occasion: Option<String>,
    #[serde(default)]
    pub checked_interest: Option<String>,
}

/// Sorted lists of valid facet values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCatalog {
    pub occasions: Vec<String>,
    pub persons: Vec<String>,
    pub interests: Vec<String>,
}

impl FacetCatalog {
    #[must_use]
    pub fn from_data(data: &GiftsData) -> Self {
        Self {
            occasions: GiftsData::values(&data.occasions),
            persons: GiftsData::values(&data.audience),
            interests: GiftsData::values(&data.interests),
        }
    }

    #[must_use]
    pub fn from_form(form: &FormSnapshot) -> Self {
        Self {
            occasions: sorted_values(&form.occasion_options),
            persons: sorted_values(&form.audience_options),
            interests: sorted_values(&form.interest_options),
        }
    }

    /// Load the catalog from embedded JSON, falling back to the form.
    ///
    /// Never fails: a missing or malformed data source is logged and the
    /// fallback is used, which may leave lists empty.
    #[must_use]
    pub fn load(embedded: Option<&str>, form: Option<&FormSnapshot>) -> Self {
        match embedded.map(serde_json::from_str::<GiftsData>) {
            Some(Ok(data)) => return Self::from_data(&data),
            Some(Err(e)) => warn!(error = %e, "Invalid gifts data, using form options"),
            None => warn!("Gifts data not available, using form options"),
        }

        form.map_or_else(
            || {
                warn!("No form options either, facet lists are empty");
                Self::default()
            },
            Self::from_form,
        )
    }

    /// Values of one facet.
    #[must_use]
    pub fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Occasion => &self.occasions,
            Facet::Person => &self.persons,
            Facet::Interest => &self.interests,
        }
    }

    #[must_use]
    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).iter().any(|v| v == value)
    }

    /// Whether every facet has at least one value.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        !self.occasions.is_empty() && !self.persons.is_empty() && !self.interests.is_empty()
    }
}

/// A selection that may be missing facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartialSelection {
    pub occasion: Option<String>,
    pub person: Option<String>,
    pub interest: Option<String>,
}

impl PartialSelection {
    /// Apply a form change; empty values clear the facet.
    pub fn apply(&mut self, change: FacetChange) {
        let (slot, value) = match change {
            FacetChange::Occasion(v) => (&mut self.occasion, v),
            FacetChange::Person(v) => (&mut self.person, v),
            FacetChange::Interest(v) => (&mut self.interest, v),
        };
        *slot = Some(value).filter(|v| !v.is_empty());
    }

    /// The full selection, once all three facets are set.
    #[must_use]
    pub fn complete(&self) -> Option<FacetSelection> {
        Some(FacetSelection::new(
            self.occasion.clone()?,
            self.person.clone()?,
            self.interest.clone()?,
        ))
    }
}

/// Outcome of resolving the initial selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub selection: PartialSelection,
    /// The page URL named a gift path.
    pub from_url: bool,
}

/// Resolve the initial selection from the form, the URL path and the catalog.
#[must_use]
pub fn resolve(catalog: &FacetCatalog, form: Option<&FormSnapshot>, path: &str) -> Resolution {
    let url = gift_path_segments(path);
    let form_value = |facet: Facet| {
        form.and_then(|form| match facet {
            Facet::Occasion => form.checked_occasion.clone(),
            Facet::Person => form.selected_person.clone(),
            Facet::Interest => form.checked_interest.clone(),
        })
        .filter(|v| !v.is_empty())
    };
    let url_value = |facet: Facet| {
        url.as_ref()
            .map(|(occasion, person, interest)| match facet {
                Facet::Occasion => occasion,
                Facet::Person => person,
                Facet::Interest => interest,
            })
            .filter(|v| catalog.contains(facet, v))
            .cloned()
    };
    let pick = |facet: Facet| {
        form_value(facet)
            .or_else(|| url_value(facet))
            .or_else(|| catalog.values(facet).first().cloned())
    };

    let selection = PartialSelection {
        occasion: pick(Facet::Occasion),
        person: pick(Facet::Person),
        interest: pick(Facet::Interest),
    };
    debug!(?selection, from_url = url.is_some(), "Resolved facets");

    Resolution {
        selection,
        from_url: url.is_some(),
    }
}

fn sorted_values(values: &[String]) -> Vec<String> {
    let mut values: Vec<String> = values.iter().filter(|v| !v.is_empty()).cloned().collect();
    values.sort();
    values
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "occasions": [{"value": "wedding"}, {"value": "birthday", "label": "Birthday"}],
        "audience": [{"value": "mom"}, {"value": "dad"}, {"value": ""}],
        "interests": [{"value": "tea"}, {"value": "golf"}]
    }"#;

    fn catalog() -> FacetCatalog {
        FacetCatalog::load(Some(DATA), None)
    }

    #[test]
    fn test_catalog_from_embedded_data() {
        let catalog = catalog();
        assert_eq!(catalog.occasions, ["birthday", "wedding"]);
        assert_eq!(catalog.persons, ["dad", "mom"]);
        assert_eq!(catalog.interests, ["golf", "tea"]);
        assert!(catalog.is_searchable());
    }

    #[test]
    fn test_catalog_falls_back_to_form() {
        let form = FormSnapshot {
            audience_options: vec![String::new(), "sister".into(), "brother".into()],
            occasion_options: vec!["graduation".into()],
            interest_options: vec!["books".into()],
            ..FormSnapshot::default()
        };

        let catalog = FacetCatalog::load(Some("{not json"), Some(&form));
        assert_eq!(catalog.persons, ["brother", "sister"]);
        assert_eq!(catalog.occasions, ["graduation"]);

        assert_eq!(FacetCatalog::load(None, Some(&form)), catalog);
    }

    #[test]
    fn test_catalog_without_sources_is_empty() {
        let catalog = FacetCatalog::load(None, None);
        assert!(!catalog.is_searchable());
        let resolution = resolve(&catalog, None, "/gifts/a/b/c/");
        assert!(resolution.selection.complete().is_none());
    }

    #[test]
    fn test_resolve_defaults_to_first_values() {
        let resolution = resolve(&catalog(), None, "/gift-finder/");
        assert!(!resolution.from_url);
        assert_eq!(
            resolution.selection.complete(),
            Some(FacetSelection::new("birthday", "dad", "golf"))
        );
    }

    #[test]
    fn test_resolve_from_url() {
        let resolution = resolve(&catalog(), None, "/gifts/wedding/mom/tea/");
        assert!(resolution.from_url);
        assert_eq!(
            resolution.selection.complete(),
            Some(FacetSelection::new("wedding", "mom", "tea"))
        );
    }

    #[test]
    fn test_unknown_url_segment_falls_back() {
        let resolution = resolve(&catalog(), None, "/gifts/wedding/cat/tea/");
        assert_eq!(resolution.selection.person.as_deref(), Some("dad"));
        assert_eq!(resolution.selection.occasion.as_deref(), Some("wedding"));
    }

    #[test]
    fn test_form_wins_over_url() {
        let form = FormSnapshot {
            selected_person: Some("mom".into()),
            checked_interest: Some(String::new()),
            ..FormSnapshot::default()
        };
        let resolution = resolve(&catalog(), Some(&form), "/gifts/wedding/dad/tea/");
        assert_eq!(
            resolution.selection.complete(),
            Some(FacetSelection::new("wedding", "mom", "tea"))
        );
    }

    #[test]
    fn test_partial_selection() {
        let mut selection = PartialSelection::default();
        selection.apply(FacetChange::Occasion("birthday".into()));
        selection.apply(FacetChange::Person("mom".into()));
        assert!(selection.complete().is_none());

        selection.apply(FacetChange::Interest("tea".into()));
        assert_eq!(
            selection.complete(),
            Some(FacetSelection::new("birthday", "mom", "tea"))
        );

        selection.apply(FacetChange::Person(String::new()));
        assert!(selection.complete().is_none());
        assert_eq!(FacetChange::Interest("x".into()).facet(), Facet::Interest);
    }
}
