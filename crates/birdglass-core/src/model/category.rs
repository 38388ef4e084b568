// ── Route categories ──

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// The three disjoint result categories of a lookup.
///
/// The string form is the location anchor (`#routes-received`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    #[strum(serialize = "routes-received")]
    Received,
    #[strum(serialize = "routes-filtered")]
    Filtered,
    #[strum(serialize = "routes-not-exported")]
    NotExported,
}

impl RouteCategory {
    pub const ALL: [Self; 3] = [Self::Received, Self::Filtered, Self::NotExported];

    /// Location fragment identifying this category's table.
    pub fn anchor(self) -> &'static str {
        self.into()
    }

    /// Query parameter carrying this category's page cursor.
    pub fn url_param(self) -> &'static str {
        match self {
            Self::Received => "pr",
            Self::Filtered => "pf",
            Self::NotExported => "pn",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Received => "Routes Received",
            Self::Filtered => "Routes Filtered",
            Self::NotExported => "Routes Not Exported",
        }
    }

    /// Parse a location fragment, with or without the leading `#`.
    pub fn from_anchor(anchor: &str) -> Option<Self> {
        anchor.trim_start_matches('#').parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn anchors_parse_back() {
        for category in RouteCategory::iter() {
            assert_eq!(RouteCategory::from_anchor(category.anchor()), Some(category));
        }
        assert_eq!(
            RouteCategory::from_anchor("#routes-filtered"),
            Some(RouteCategory::Filtered)
        );
        assert_eq!(RouteCategory::NotExported.anchor(), "routes-not-exported");
        assert_eq!(RouteCategory::from_anchor("routes"), None);
    }
}
