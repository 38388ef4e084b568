// ── Route server and neighbour domain types ──

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

fn as_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Routeserver {
    pub id: String,
    pub name: String,
    pub group: String,
    /// Next hops used for blackholing on this route server.
    pub blackholes: Vec<String>,
}

/// A BGP session on a route server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Neighbour {
    pub id: String,
    pub address: String,
    pub asn: u32,
    pub state: String,
    pub description: String,
    pub routes_received: u64,
    pub routes_filtered: u64,
    pub routes_exported: u64,
    pub routes_accepted: u64,
    #[serde(serialize_with = "as_secs")]
    pub uptime: Duration,
    pub last_error: Option<String>,
}

impl Neighbour {
    pub fn is_up(&self) -> bool {
        self.state.eq_ignore_ascii_case("up") || self.state.eq_ignore_ascii_case("established")
    }

    /// Case-insensitive match on address, ASN, or description.
    ///
    /// `AS64500` and `64500` both match ASN 64500. An empty filter matches
    /// everything.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.trim();
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        if self.description.to_lowercase().contains(&needle)
            || self.address.to_lowercase().contains(&needle)
        {
            return true;
        }
        let asn_needle = needle.strip_prefix("as").unwrap_or(&needle);
        !asn_needle.is_empty() && self.asn.to_string().contains(asn_needle)
    }
}

/// Apply a neighbour filter, preserving order.
pub fn filter_neighbours<'a>(neighbours: &'a [Neighbour], filter: &str) -> Vec<&'a Neighbour> {
    neighbours.iter().filter(|n| n.matches(filter)).collect()
}

/// Route server daemon status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteserverStatus {
    pub router_id: String,
    pub version: String,
    pub backend: String,
    pub message: String,
    pub server_time: Option<DateTime<Utc>>,
    pub last_reboot: Option<DateTime<Utc>>,
    pub last_reconfig: Option<DateTime<Utc>>,
    pub cached_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbours() -> Vec<Neighbour> {
        vec![
            Neighbour {
                id: "n1".into(),
                address: "192.0.2.10".into(),
                asn: 64500,
                description: "Example Transit GmbH".into(),
                state: "up".into(),
                ..Neighbour::default()
            },
            Neighbour {
                id: "n2".into(),
                address: "2001:db8::20".into(),
                asn: 64511,
                description: "Content Network".into(),
                state: "down".into(),
                ..Neighbour::default()
            },
        ]
    }

    #[test]
    fn filter_is_case_insensitive_on_description() {
        let all = neighbours();
        let hits = filter_neighbours(&all, "TRANSIT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "n1");
    }

    #[test]
    fn filter_matches_asn_with_and_without_prefix() {
        let all = neighbours();
        assert_eq!(filter_neighbours(&all, "AS64511")[0].id, "n2");
        assert_eq!(filter_neighbours(&all, "64511")[0].id, "n2");
        assert!(filter_neighbours(&all, "as").is_empty());
    }

    #[test]
    fn filter_matches_address_and_empty() {
        let all = neighbours();
        assert_eq!(filter_neighbours(&all, "2001:DB8")[0].id, "n2");
        assert_eq!(filter_neighbours(&all, "  ").len(), 2);
        assert!(all[0].is_up());
        assert!(!all[1].is_up());
    }
}
