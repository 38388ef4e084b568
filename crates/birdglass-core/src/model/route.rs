// ── Route domain types ──

use std::time::Duration;

use serde::{Serialize, Serializer};

use super::neighbour::{Neighbour, Routeserver};

/// Well-known BLACKHOLE community (RFC 7999).
pub const BLACKHOLE_COMMUNITY: [u32; 2] = [65535, 666];

/// BGP path attributes of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BgpAttributes {
    pub origin: String,
    pub as_path: Vec<u32>,
    pub next_hop: String,
    pub communities: Vec<Vec<u32>>,
    pub large_communities: Vec<Vec<u32>>,
    /// Extended communities, each part rendered as text (`["rt", "64500", "1"]`).
    pub ext_communities: Vec<Vec<String>>,
    pub local_pref: u32,
    pub med: u32,
}

impl BgpAttributes {
    /// Standard community match; only two-part values can match.
    pub fn has_community(&self, community: &[u32]) -> bool {
        community.len() == 2 && self.communities.iter().any(|c| c.as_slice() == community)
    }

    /// Large community match; only three-part values can match.
    pub fn has_large_community(&self, community: &[u32]) -> bool {
        community.len() == 3
            && self
                .large_communities
                .iter()
                .any(|c| c.as_slice() == community)
    }

    /// Extended community match; only three-part values can match.
    pub fn has_ext_community(&self, community: &[&str]) -> bool {
        community.len() == 3
            && self
                .ext_communities
                .iter()
                .any(|c| c.iter().map(String::as_str).eq(community.iter().copied()))
    }

    /// `64500 64511 64496`
    pub fn as_path_text(&self) -> String {
        join(&self.as_path, " ")
    }
}

/// Render a community as `a:b[:c]`.
pub fn format_community<T: ToString>(parts: &[T]) -> String {
    join(parts, ":")
}

fn join<T: ToString>(parts: &[T], sep: &str) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

fn as_secs<S: Serializer>(age: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(age.as_secs())
}

/// The canonical Route type, as found by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    pub id: String,
    pub neighbour_id: String,
    pub neighbour: Option<Neighbour>,
    pub routeserver: Routeserver,
    /// Backend state (`imported`, `filtered`, ...).
    pub state: String,

    pub network: String,
    pub interface: String,
    pub gateway: String,
    pub metric: i64,
    pub bgp: BgpAttributes,
    #[serde(serialize_with = "as_secs")]
    pub age: Duration,
    /// Best route for this prefix on its route server.
    pub primary: bool,

    /// Backend-specific extra data.
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Route {
    /// Carries the BLACKHOLE community 65535:666.
    pub fn is_blackhole(&self) -> bool {
        self.bgp.has_community(&BLACKHOLE_COMMUNITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bgp() -> BgpAttributes {
        BgpAttributes {
            as_path: vec![64500, 64511],
            communities: vec![vec![65535, 666], vec![64500, 1]],
            large_communities: vec![vec![64500, 1, 2]],
            ext_communities: vec![vec!["rt".into(), "64500".into(), "7".into()]],
            ..BgpAttributes::default()
        }
    }

    #[test]
    fn community_matching_requires_exact_arity() {
        let bgp = bgp();
        assert!(bgp.has_community(&[64500, 1]));
        assert!(!bgp.has_community(&[64500, 1, 2]));
        assert!(bgp.has_large_community(&[64500, 1, 2]));
        assert!(!bgp.has_large_community(&[64500, 1]));
        assert!(bgp.has_ext_community(&["rt", "64500", "7"]));
        assert!(!bgp.has_ext_community(&["ro", "64500", "7"]));
    }

    #[test]
    fn blackhole_detection() {
        let mut route = Route {
            bgp: bgp(),
            ..Route::default()
        };
        assert!(route.is_blackhole());
        route.bgp.communities.remove(0);
        assert!(!route.is_blackhole());
    }

    #[test]
    fn text_helpers() {
        assert_eq!(bgp().as_path_text(), "64500 64511");
        assert_eq!(format_community(&[64500, 1, 2]), "64500:1:2");
    }
}
