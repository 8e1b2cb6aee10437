//! Resolution limits

use serde::{Deserialize, Serialize};

/// Largest index a path may name, matching the scripting engine's loop bound.
pub const DEFAULT_MAX_LOOP: i32 = 65536;

/// Tunables for path parsing.
///
/// The index bound keeps a single write such as `a[999999999]` from
/// allocating an unbounded number of empty children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum value accepted for an explicit `[i]` index
    pub max_loop: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_loop: DEFAULT_MAX_LOOP,
        }
    }
}

impl Limits {
    pub fn with_max_loop(max_loop: i32) -> Self {
        Self { max_loop }
    }
}
