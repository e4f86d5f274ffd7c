use std::collections::HashSet;
use std::fmt;

use super::types::{EdgeInfo, EdgeKey, EdgeMap};

/// Cost column of a network row.
///
/// The per-edge cost depends on the selected model and is only authoritative when
/// the backend computes it during a run, so open edges show a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCell {
    /// The edge is blocked: no finite cost.
    Unavailable,
    Pending,
}

impl fmt::Display for CostCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("\u{221e}"),
            Self::Pending => f.write_str("\u{2014}"),
        }
    }
}

/// One undirected edge ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub key: EdgeKey,
    pub distance: f64,
    pub traffic_percent: f64,
    pub quality: f64,
    pub blocked: bool,
    pub cost: CostCell,
}

impl EdgeRow {
    fn new(key: EdgeKey, info: &EdgeInfo) -> Self {
        Self {
            key,
            distance: info.distance,
            traffic_percent: info.traffic_percent,
            quality: info.quality,
            blocked: info.blocked,
            cost: if info.blocked {
                CostCell::Unavailable
            } else {
                CostCell::Pending
            },
        }
    }

    /// "A ↔ B", in the orientation that was seen first.
    pub fn label(&self) -> String {
        format!("{} \u{2194} {}", self.key.from, self.key.to)
    }

    pub fn blocked_label(&self) -> &'static str {
        if self.blocked { "Yes" } else { "No" }
    }
}

/// Iterator over the unique undirected edges of an [`EdgeMap`].
///
/// Walks the map in its stored order and yields one row per unordered pair; the
/// first orientation encountered supplies the attributes. Call [`unique_edges`]
/// again to restart.
pub struct UniqueEdges<'a> {
    inner: std::slice::Iter<'a, (String, EdgeInfo)>,
    seen: HashSet<String>,
}

impl Iterator for UniqueEdges<'_> {
    type Item = EdgeRow;

    fn next(&mut self) -> Option<EdgeRow> {
        for (raw, info) in self.inner.by_ref() {
            let Some(key) = EdgeKey::parse(raw) else {
                tracing::warn!(key = raw.as_str(), "skipping malformed edge key");
                continue;
            };
            if !self.seen.insert(key.canonical()) {
                continue;
            }
            return Some(EdgeRow::new(key, info));
        }
        None
    }
}

pub fn unique_edges(edges: &EdgeMap) -> UniqueEdges<'_> {
    UniqueEdges {
        inner: edges.entries(),
        seen: HashSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(distance: f64, blocked: bool) -> EdgeInfo {
        EdgeInfo {
            distance,
            traffic_percent: 40.0,
            quality: 5.0,
            blocked,
        }
    }

    #[test]
    fn test_bidirectional_pair_collapses_to_one_row() {
        let edges: EdgeMap = [("A-B", info(10.0, false)), ("B-A", info(10.0, false))]
            .into_iter()
            .collect();
        let rows: Vec<EdgeRow> = unique_edges(&edges).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label(), "A \u{2194} B");
    }

    #[test]
    fn test_first_orientation_wins() {
        let edges: EdgeMap = [
            ("C-A", info(77.0, true)),
            ("B-C", info(12.0, false)),
            ("A-C", info(99.0, false)),
        ]
        .into_iter()
        .collect();
        let rows: Vec<EdgeRow> = unique_edges(&edges).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label(), "C \u{2194} A");
        assert_eq!(rows[0].distance, 77.0);
        assert!(rows[0].blocked);
        assert_eq!(rows[1].label(), "B \u{2194} C");
    }

    #[test]
    fn test_single_direction_is_kept() {
        let edges: EdgeMap = [("D-E", info(5.0, false))].into_iter().collect();
        let rows: Vec<EdgeRow> = unique_edges(&edges).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.to_string(), "D-E");
    }

    #[test]
    fn test_self_loop_emitted_once() {
        let edges: EdgeMap = [("A-A", info(1.0, false)), ("A-A", info(2.0, false))]
            .into_iter()
            .collect();
        let rows: Vec<EdgeRow> = unique_edges(&edges).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].key.is_self_loop());
        assert_eq!(rows[0].distance, 1.0);
    }

    #[test]
    fn test_blocked_cost_is_sentinel() {
        let edges: EdgeMap = [("A-B", info(10.0, true)), ("B-C", info(10.0, false))]
            .into_iter()
            .collect();
        let rows: Vec<EdgeRow> = unique_edges(&edges).collect();
        assert_eq!(rows[0].cost, CostCell::Unavailable);
        assert_eq!(rows[0].cost.to_string(), "\u{221e}");
        assert_eq!(rows[0].blocked_label(), "Yes");
        assert_eq!(rows[1].cost, CostCell::Pending);
        assert_eq!(rows[1].blocked_label(), "No");
    }

    #[test]
    fn test_malformed_keys_are_skipped() {
        let edges: EdgeMap = [("AB", info(1.0, false)), ("A-B", info(2.0, false))]
            .into_iter()
            .collect();
        let rows: Vec<EdgeRow> = unique_edges(&edges).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].distance, 2.0);
    }

    #[test]
    fn test_restartable() {
        let edges: EdgeMap = [("A-B", info(1.0, false)), ("B-A", info(1.0, false))]
            .into_iter()
            .collect();
        assert_eq!(unique_edges(&edges).count(), 1);
        assert_eq!(unique_edges(&edges).count(), 1);
    }
}
