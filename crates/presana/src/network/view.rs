use colored::Colorize;

use super::normalize::{EdgeRow, unique_edges};
use super::types::NetworkSnapshot;

pub const HEADERS: [&str; 6] = ["Connection", "Distance", "Traffic", "Quality", "Blocked", "Cost"];

/// Tabular rendering of a snapshot: one row per unique undirected edge.
///
/// Always rebuilt from scratch; there is no incremental update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkTable {
    pub rows: Vec<EdgeRow>,
}

impl NetworkTable {
    pub fn build(snapshot: &NetworkSnapshot) -> Self {
        Self {
            rows: unique_edges(&snapshot.edges).collect(),
        }
    }

    /// Plain cell text for each row, in column order.
    pub fn cells(&self) -> Vec<[String; 6]> {
        self.rows
            .iter()
            .map(|row| {
                [
                    row.label(),
                    format!("{}", row.distance),
                    format!("{}%", row.traffic_percent),
                    format!("{}", row.quality),
                    row.blocked_label().to_string(),
                    row.cost.to_string(),
                ]
            })
            .collect()
    }

    /// Render as aligned terminal text. The blocked column is colored.
    pub fn render(&self) -> String {
        let cells = self.cells();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths.iter())
            .map(|(h, w)| pad(h, *w))
            .collect();
        out.push_str(&header.join("  ").bold().to_string());
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "\u{2500}".repeat(*w)).collect();
        out.push_str(&rule.join("  ").dimmed().to_string());
        out.push('\n');

        for (row, text) in self.rows.iter().zip(cells.iter()) {
            let mut line: Vec<String> = Vec::with_capacity(6);
            for (i, (cell, w)) in text.iter().zip(widths.iter()).enumerate() {
                let padded = pad(cell, *w);
                let styled = match i {
                    4 if row.blocked => padded.red().bold().to_string(),
                    4 => padded.green().to_string(),
                    _ => padded,
                };
                line.push(styled);
            }
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }

        if self.rows.is_empty() {
            out.push_str(&"(no connections)".dimmed().to_string());
            out.push('\n');
        }

        out
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
