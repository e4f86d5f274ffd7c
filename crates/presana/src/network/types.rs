use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::metadata::{LinearWeights, MetadataSnapshot};

/// Separator between the two node identifiers of an edge key ("A-B").
pub const KEY_DELIMITER: char = '-';

/// A directed edge key as served by the backend, e.g. `"A-B"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub from: String,
    pub to: String,
}

impl EdgeKey {
    /// Split a raw key on the delimiter. Keys without exactly one delimiter are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let (from, to) = raw.split_once(KEY_DELIMITER)?;
        if from.is_empty() || to.is_empty() || to.contains(KEY_DELIMITER) {
            return None;
        }
        Some(Self {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Orientation-independent form: both ids sorted and rejoined with the delimiter.
    pub fn canonical(&self) -> String {
        let (lo, hi) = if self.from <= self.to {
            (&self.from, &self.to)
        } else {
            (&self.to, &self.from)
        };
        format!("{lo}{KEY_DELIMITER}{hi}")
    }

    #[cfg(test)]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_DELIMITER}{}", self.from, self.to)
    }
}

/// Attributes of one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInfo {
    pub distance: f64,
    #[serde(rename = "traffic", alias = "trafficPercent", alias = "traffic_percent")]
    pub traffic_percent: f64,
    pub quality: f64,
    #[serde(deserialize_with = "deserialize_blocked")]
    pub blocked: bool,
}

/// The backend has served `blocked` both as a boolean and as "Yes"/"No".
fn deserialize_blocked<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Blocked {
        Flag(bool),
        Label(String),
    }

    match Blocked::deserialize(deserializer)? {
        Blocked::Flag(flag) => Ok(flag),
        Blocked::Label(label) => match label.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"a boolean or \"Yes\"/\"No\"",
            )),
        },
    }
}

/// Edge mapping in the order the server sent it.
///
/// Decoded through a map visitor so iteration order matches the JSON document,
/// which is what makes "first-seen orientation wins" well defined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeMap {
    entries: Vec<(String, EdgeInfo)>,
}

impl EdgeMap {
    /// Raw `(key, info)` pairs in received order.
    pub fn entries(&self) -> std::slice::Iter<'_, (String, EdgeInfo)> {
        self.entries.iter()
    }

    /// Number of raw entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Into<String>> FromIterator<(K, EdgeInfo)> for EdgeMap {
    fn from_iter<I: IntoIterator<Item = (K, EdgeInfo)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for EdgeMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EdgeMapVisitor;

        impl<'de> Visitor<'de> for EdgeMapVisitor {
            type Value = EdgeMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of \"A-B\" keys to edge attributes")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, info)) = map.next_entry::<String, EdgeInfo>()? {
                    entries.push((key, info));
                }
                Ok(EdgeMap { entries })
            }
        }

        deserializer.deserialize_map(EdgeMapVisitor)
    }
}

/// Body of `GET /api/network`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkResponse {
    pub connections: EdgeMap,
    #[serde(default)]
    pub metadata: Option<MetadataSnapshot>,
    /// Legacy revision: linear weights only.
    #[serde(default, deserialize_with = "crate::metadata::lenient")]
    pub weights: Option<LinearWeights>,
}

/// Full state of the visualized network. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSnapshot {
    pub edges: EdgeMap,
    pub metadata: MetadataSnapshot,
}

impl NetworkSnapshot {
    /// Node identifiers in first-seen order across all edge keys.
    pub fn nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = Vec::new();
        for key in self.edges.entries().filter_map(|(raw, _)| EdgeKey::parse(raw)) {
            for id in [key.from, key.to] {
                if !nodes.contains(&id) {
                    nodes.push(id);
                }
            }
        }
        nodes
    }
}

impl From<NetworkResponse> for NetworkSnapshot {
    /// `metadata` is authoritative. A bare legacy `weights` object is read as
    /// the linear model's metadata only when `metadata` is absent.
    fn from(response: NetworkResponse) -> Self {
        let metadata = match (response.metadata, response.weights) {
            (Some(metadata), _) => metadata,
            (None, Some(weights)) => {
                tracing::debug!("network response uses legacy `weights` shape");
                MetadataSnapshot {
                    linear: Some(weights),
                    rf: None,
                }
            }
            (None, None) => MetadataSnapshot::default(),
        };
        Self {
            edges: response.connections,
            metadata,
        }
    }
}
