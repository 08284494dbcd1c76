use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Which source surfaces first when two sources hold equal values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The source passed earlier wins (arrival order).
    #[default]
    FirstSource,
    /// The source passed later wins.
    LastSource,
}

impl TieBreak {
    /// Order two source indices under this policy.
    pub fn order(self, a: usize, b: usize) -> Ordering {
        match self {
            TieBreak::FirstSource => a.cmp(&b),
            TieBreak::LastSource => b.cmp(&a),
        }
    }
}

/// Configuration for an [`OrderedMerge`](crate::OrderedMerge).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Tie-break applied when the ordering reports two values as equal.
    pub tie_break: TieBreak,
    /// Name recorded in this merge's tracing events.
    pub label: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::FirstSource,
            label: "merge".into(),
        }
    }
}
