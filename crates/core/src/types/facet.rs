//! Gift-finder facets.
//!
//! The site embeds a `giftsData` object listing the valid values of each
//! facet. Each entry carries a `value` plus whatever presentation fields the
//! generator adds (labels, icons), which are preserved but not interpreted.

use serde::{Deserialize, Serialize};

/// One entry of a facet list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetOption {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Embedded facet data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GiftsData {
    #[serde(default)]
    pub occasions: Vec<FacetOption>,
    #[serde(default)]
    pub audience: Vec<FacetOption>,
    #[serde(default)]
    pub interests: Vec<FacetOption>,
}

impl GiftsData {
    /// Non-empty values of a facet list, sorted.
    #[must_use]
    pub fn values(options: &[FacetOption]) -> Vec<String> {
        let mut values: Vec<String> = options
            .iter()
            .filter_map(|option| option.value.clone())
            .filter(|value| !value.is_empty())
            .collect();
        values.sort();
        values
    }
}

/// A complete gift-finder selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetSelection {
    pub occasion: String,
    pub person: String,
    pub interest: String,
}

impl FacetSelection {
    #[must_use]
    pub fn new(
        occasion: impl Into<String>,
        person: impl Into<String>,
        interest: impl Into<String>,
    ) -> Self {
        Self {
            occasion: occasion.into(),
            person: person.into(),
            interest: interest.into(),
        }
    }
}

impl std::fmt::Display for FacetSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.occasion, self.person, self.interest)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_values_sorted_and_filtered() {
        let data: GiftsData = serde_json::from_str(
            r#"{
                "occasions": [{"value": "wedding"}, {"value": ""}, {"value": "birthday", "label": "Birthday"}],
                "audience": [{"label": "No value"}],
                "interests": []
            }"#,
        )
        .unwrap();

        assert_eq!(GiftsData::values(&data.occasions), vec!["birthday", "wedding"]);
        assert!(GiftsData::values(&data.audience).is_empty());
        assert_eq!(
            data.occasions[2].extra.get("label"),
            Some(&serde_json::Value::String("Birthday".to_string()))
        );
    }

    #[test]
    fn test_selection_display() {
        let selection = FacetSelection::new("birthday", "mom", "gardening");
        assert_eq!(selection.to_string(), "birthday/mom/gardening");
    }
}
