//! Marketplace a product is sold on.

use serde::{Deserialize, Serialize};

/// Marketplace named in a product's `ecommerce` field.
///
/// The known platforms get their own badge styling; anything else is kept
/// verbatim so the badge can still show the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ecommerce {
    Amazon,
    Etsy,
    RedBubble,
    Other(String),
}

impl Ecommerce {
    /// Name as published by the site.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Amazon => "Amazon",
            Self::Etsy => "Etsy",
            Self::RedBubble => "RedBubble",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Ecommerce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Ecommerce {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Amazon" => Self::Amazon,
            "Etsy" => Self::Etsy,
            "RedBubble" => Self::RedBubble,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Ecommerce {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Ecommerce> for String {
    fn from(platform: Ecommerce) -> Self {
        match platform {
            Ecommerce::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platforms_parse() {
        assert_eq!(Ecommerce::from("Amazon"), Ecommerce::Amazon);
        assert_eq!(Ecommerce::from("Etsy"), Ecommerce::Etsy);
        assert_eq!(Ecommerce::from("RedBubble"), Ecommerce::RedBubble);
    }

    #[test]
    fn test_platform_names_are_case_sensitive() {
        assert_eq!(
            Ecommerce::from("amazon"),
            Ecommerce::Other("amazon".to_string())
        );
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let platform: Ecommerce = serde_json::from_str("\"Etsy\"").unwrap();
        assert_eq!(platform, Ecommerce::Etsy);

        let other: Ecommerce = serde_json::from_str("\"Zazzle\"").unwrap();
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"Zazzle\"");
    }
}
