use std::fmt;

use serde::{Deserialize, Serialize};

use super::connectivity::Connectivity;

/// One disconnected query, ready to be surfaced as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// Rendered query text, possibly truncated.
    pub query: String,
    pub start: String,
    pub unmatched: Vec<String>,
}

impl LintReport {
    /// `None` when everything is connected.
    pub fn from_connectivity(query: String, connectivity: &Connectivity) -> Option<Self> {
        if connectivity.is_connected() {
            return None;
        }
        Some(LintReport {
            query,
            start: connectivity
                .start()
                .map(|s| s.name().to_string())
                .unwrap_or_default(),
            unmatched: connectivity
                .unmatched()
                .iter()
                .map(|s| s.name().to_string())
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unmatched: Vec<String> = self
            .unmatched
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect();
        write!(
            f,
            "Query \"{}\" has FROM elements {} that are not joined up to FROM element \"{}\"",
            self.query,
            unmatched.join(", "),
            self.start
        )
    }
}

/// Cut `sql` down to at most `max_len` characters, marking the cut with `...`.
pub fn summarize(sql: &str, max_len: usize) -> String {
    if sql.chars().count() <= max_len {
        return sql.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut summary: String = sql.chars().take(keep).collect();
    summary.push_str("...");
    summary
}
