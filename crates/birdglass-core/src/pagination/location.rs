// ── Location descriptor ──
//
// The lookup location is `{path}?pr={pr}&pf={pf}&pn={pn}&q={query}#{anchor}`,
// the same shape a browser front-end of the looking glass uses, so links
// produced here can be opened in one and vice versa.

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use url::{Url, form_urlencoded};

use super::cursors::PageCursors;
use crate::error::CoreError;
use crate::model::RouteCategory;

/// Path of the lookup view.
pub const LOOKUP_PATH: &str = "/search";

/// Resolves relative locations during parsing.
const PARSE_BASE: &str = "http://birdglass.invalid/";

/// Where the user is: path, committed query, three cursors, focused table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDescriptor {
    pub path: String,
    pub query: String,
    pub cursors: PageCursors,
    pub anchor: Option<RouteCategory>,
}

impl Default for LocationDescriptor {
    fn default() -> Self {
        Self::home()
    }
}

impl LocationDescriptor {
    /// The default view, shown when no search is active.
    pub fn home() -> Self {
        Self {
            path: "/".into(),
            query: String::new(),
            cursors: PageCursors::default(),
            anchor: None,
        }
    }

    /// First page of every category for `query`.
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            path: LOOKUP_PATH.into(),
            query: query.into(),
            cursors: PageCursors::default(),
            anchor: None,
        }
    }

    pub fn is_home(&self) -> bool {
        self.query.is_empty() && self.path == "/"
    }

    /// Parse an absolute URL or a relative location (`/search?q=..`, `?pr=1..`).
    ///
    /// Unparseable cursor values fall back to page 0.
    pub fn parse(location: &str) -> Result<Self, CoreError> {
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PARSE_BASE)
                .and_then(|base| base.join(location))
                .map_err(|e| CoreError::InvalidLocation {
                    message: format!("{location}: {e}"),
                })?,
            Err(e) => {
                return Err(CoreError::InvalidLocation {
                    message: format!("{location}: {e}"),
                });
            }
        };
        Ok(Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let mut parsed = Self {
            path: url.path().to_owned(),
            query: String::new(),
            cursors: PageCursors::default(),
            anchor: url.fragment().and_then(RouteCategory::from_anchor),
        };

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "q" => parsed.query = value.into_owned(),
                param => {
                    if let Some(category) =
                        RouteCategory::ALL.into_iter().find(|c| c.url_param() == param)
                    {
                        parsed.cursors = parsed.cursors.with(category, parse_cursor(&value));
                    }
                }
            }
        }

        parsed
    }

    /// Relative form: `{path}?pr=..&pf=..&pn=..&q=..#anchor`.
    ///
    /// The home location renders as its bare path.
    pub fn to_relative(&self) -> String {
        if self.is_home() {
            return self.path.clone();
        }
        let search = form_urlencoded::Serializer::new(String::new())
            .append_pair("pr", &self.cursors.received.to_string())
            .append_pair("pf", &self.cursors.filtered.to_string())
            .append_pair("pn", &self.cursors.not_exported.to_string())
            .append_pair("q", &self.query)
            .finish();
        match self.anchor {
            Some(anchor) => format!("{}?{search}#{}", self.path, anchor.anchor()),
            None => format!("{}?{search}", self.path),
        }
    }

    /// Absolute URL under a looking glass front-end root. The location path
    /// is appended to the root's path, so `https://lg.example.net/alice`
    /// yields `https://lg.example.net/alice/search?..`.
    pub fn to_url(&self, base: &Url) -> Result<Url, CoreError> {
        let mut root = base.clone();
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        root.set_query(None);
        root.set_fragment(None);
        root.join(self.to_relative().trim_start_matches('/'))
            .map_err(|e| CoreError::InvalidLocation {
                message: e.to_string(),
            })
    }
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_relative())
    }
}

impl FromStr for LocationDescriptor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Largest page cursor accepted from a location.
const MAX_PAGE_CURSOR: usize = u32::MAX as usize;

fn parse_cursor(raw: &str) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(page) if page > MAX_PAGE_CURSOR => {
            debug!(value = raw, "clamping oversized page cursor");
            MAX_PAGE_CURSOR
        }
        Ok(page) => page,
        Err(_) => {
            debug!(value = raw, "ignoring malformed page cursor");
            0
        }
    }
}

/// Location for jumping `changed` to `new_page`.
///
/// Only the changed cursor is overwritten. The query of `current` and the
/// other two cursors are kept, and the anchor points at the changed table.
pub fn compute_target(
    cursors: PageCursors,
    changed: RouteCategory,
    new_page: usize,
    current: &LocationDescriptor,
) -> LocationDescriptor {
    LocationDescriptor {
        path: current.path.clone(),
        query: current.query.clone(),
        cursors: cursors.with(changed, new_page),
        anchor: Some(changed),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compute_target_preserves_other_cursors_and_query() {
        let current = LocationDescriptor::parse("/search?pr=2&pf=0&pn=1&q=AS64500").unwrap();
        let target = compute_target(
            PageCursors::new(2, 0, 1),
            RouteCategory::Filtered,
            3,
            &current,
        );

        assert_eq!(target.cursors, PageCursors::new(2, 3, 1));
        assert_eq!(target.query, "AS64500");
        assert_eq!(target.anchor, Some(RouteCategory::Filtered));
        assert_eq!(
            target.to_string(),
            "/search?pr=2&pf=3&pn=1&q=AS64500#routes-filtered"
        );
    }

    #[test]
    fn parse_rebuilds_exact_cursors() {
        let loc = LocationDescriptor::parse(
            "https://lg.example.net/search?pr=4&pf=7&pn=11&q=10.0.0.0%2F8#routes-not-exported",
        )
        .unwrap();
        assert_eq!(loc.cursors, PageCursors::new(4, 7, 11));
        assert_eq!(loc.query, "10.0.0.0/8");
        assert_eq!(loc.anchor, Some(RouteCategory::NotExported));
        assert_eq!(LocationDescriptor::parse(&loc.to_string()).unwrap(), loc);
    }

    #[test]
    fn query_with_spaces_survives_rendering() {
        let mut loc = LocationDescriptor::search("Example Transit & Co");
        loc.cursors = PageCursors::new(1, 0, 0);
        let rendered = loc.to_string();
        assert!(rendered.contains("q=Example+Transit+%26+Co"), "{rendered}");
        assert_eq!(LocationDescriptor::parse(&rendered).unwrap(), loc);
    }

    #[test]
    fn malformed_cursor_falls_back_to_zero() {
        let loc = LocationDescriptor::parse("/search?pr=-1&pf=abc&pn=2&q=x").unwrap();
        assert_eq!(loc.cursors, PageCursors::new(0, 0, 2));
    }

    #[test]
    fn oversized_cursor_is_clamped() {
        let loc = LocationDescriptor::parse("/search?pr=18446744073709551615&pf=99999999999&q=x")
            .unwrap();
        assert_eq!(
            loc.cursors,
            PageCursors::new(MAX_PAGE_CURSOR, MAX_PAGE_CURSOR, 0)
        );
    }

    #[test]
    fn missing_params_and_home() {
        let loc = LocationDescriptor::parse("/search?q=AS64500").unwrap();
        assert_eq!(loc.cursors, PageCursors::default());
        assert_eq!(loc.anchor, None);

        let home = LocationDescriptor::home();
        assert!(home.is_home());
        assert_eq!(home.to_string(), "/");
    }

    #[test]
    fn absolute_url_keeps_base_path() {
        let location = LocationDescriptor::parse("/search?pr=1&pf=0&pn=2&q=AS64500#routes-filtered")
            .unwrap();
        for base in ["https://lg.example.net/alice/", "https://lg.example.net/alice"] {
            let url = location.to_url(&Url::parse(base).unwrap()).unwrap();
            assert_eq!(
                url.as_str(),
                "https://lg.example.net/alice/search?pr=1&pf=0&pn=2&q=AS64500#routes-filtered"
            );
            assert_eq!(LocationDescriptor::from_url(&url).cursors, location.cursors);
        }

        let root = Url::parse("https://lg.example.net").unwrap();
        assert_eq!(
            LocationDescriptor::search("AS64500").to_url(&root).unwrap().as_str(),
            "https://lg.example.net/search?pr=0&pf=0&pn=0&q=AS64500"
        );
        assert_eq!(
            LocationDescriptor::home().to_url(&root).unwrap().as_str(),
            "https://lg.example.net/"
        );
    }
}
