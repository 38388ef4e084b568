// ── Route table columns ──
//
// Column keys are dotted paths into a serialised `Route`
// (`bgp.as_path`, `neighbour.description`, ...). Each key resolves once,
// when the registry is built, to a `RendererVariant`; unknown keys use
// the default renderer.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::model::Route;

/// Lookup columns used when neither the server nor the profile provide any.
pub const DEFAULT_LOOKUP_COLUMNS: &[(&str, &str)] = &[
    ("network", "Network"),
    ("gateway", "Gateway"),
    ("neighbour.asn", "ASN"),
    ("neighbour.description", "Neighbour"),
    ("bgp.as_path", "AS Path"),
    ("routeserver.name", "RS"),
];

/// How a column's cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RendererVariant {
    /// Prefix with blackhole and best-route flags.
    Network,
    /// Space separated ASNs.
    AsPath,
    /// Value linking to the neighbour's routes.
    LinkedNeighbour,
    /// Value linking to the route server.
    LinkedRouteserver,
    /// Plain value at the column's path.
    Default,
}

impl RendererVariant {
    pub fn for_key(key: &str) -> Self {
        match key {
            "network" => Self::Network,
            "bgp.as_path" | "ASPath" => Self::AsPath,
            "neighbour.description" | "neighbour.asn" => Self::LinkedNeighbour,
            "routeserver.name" => Self::LinkedRouteserver,
            _ => Self::Default,
        }
    }
}

/// One rendered table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub text: String,
    /// Front-end path the cell links to, if any.
    pub link: Option<String>,
    pub blackhole: bool,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub renderer: RendererVariant,
}

/// Ordered columns with their resolved renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_LOOKUP_COLUMNS
                .iter()
                .map(|(k, t)| ((*k).to_owned(), (*t).to_owned())),
        )
    }
}

impl ColumnRegistry {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let columns = pairs
            .into_iter()
            .map(|(key, title)| Column {
                renderer: RendererVariant::for_key(&key),
                key,
                title,
            })
            .collect();
        Self { columns }
    }

    /// Build from a `{key -> title}` map and a key order, as served by the
    /// looking glass config. Ordered keys missing from the map use the key
    /// as title. Falls back to the defaults when the order is empty.
    pub fn from_config(titles: &HashMap<String, String>, order: &[String]) -> Self {
        if order.is_empty() {
            return Self::default();
        }
        Self::from_pairs(order.iter().map(|key| {
            let title = titles.get(key).cloned().unwrap_or_else(|| key.clone());
            (key.clone(), title)
        }))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn titles(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.title.as_str()).collect()
    }

    pub fn renderer(&self, key: &str) -> RendererVariant {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .map_or_else(|| RendererVariant::for_key(key), |c| c.renderer)
    }

    /// All cells of one row, in column order.
    pub fn render_row(&self, route: &Route) -> Vec<RenderedCell> {
        let value = serde_json::to_value(route).unwrap_or(Value::Null);
        self.columns
            .iter()
            .map(|c| render_cell(c.renderer, &c.key, route, &value))
            .collect()
    }
}

/// Resolve a dotted path (`bgp.as_path`, `bgp.communities.0`) in a JSON value.
pub fn value_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |acc, elem| match acc {
        Value::Object(map) => map.get(elem),
        Value::Array(items) => elem.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Plain text for a JSON value: strings unquoted, arrays space separated.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

/// Render one cell. `value` is the serialised `route`.
pub fn render_cell(
    renderer: RendererVariant,
    key: &str,
    route: &Route,
    value: &Value,
) -> RenderedCell {
    let text = value_at(value, key).map(display_value).unwrap_or_default();
    match renderer {
        RendererVariant::Network => RenderedCell {
            text: route.network.clone(),
            link: None,
            blackhole: route.is_blackhole(),
            primary: route.primary,
        },
        RendererVariant::AsPath => RenderedCell {
            text: route.bgp.as_path_text(),
            ..RenderedCell::default()
        },
        RendererVariant::LinkedNeighbour => RenderedCell {
            text,
            link: route.neighbour.as_ref().map(|n| {
                format!(
                    "/routeservers/{}/protocols/{}/routes",
                    route.routeserver.id, n.id
                )
            }),
            ..RenderedCell::default()
        },
        RendererVariant::LinkedRouteserver => RenderedCell {
            text,
            link: Some(format!("/routeservers/{}", route.routeserver.id)),
            ..RenderedCell::default()
        },
        RendererVariant::Default => RenderedCell {
            text,
            ..RenderedCell::default()
        },
    }
}
