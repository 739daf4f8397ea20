//! Presentation options for a game session
//!
//! Options control how values are computed and whether the daily double
//! twist is played. They are supplied by the caller when a session starts
//! and validated with `garde` before use.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants::value::{
    DEFAULT_BASE_VALUE, DEFAULT_DOUBLE_MULTIPLIER, MAX_BASE_VALUE, MAX_DOUBLE_MULTIPLIER,
    MIN_BASE_VALUE,
};

/// Global configuration options for a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Value of the first row; row `n` is worth `(n + 1) * base_value`
    #[garde(range(min = MIN_BASE_VALUE, max = MAX_BASE_VALUE))]
    pub base_value: u64,
    /// Multiplier applied to every value in the double round
    #[garde(range(min = 1, max = MAX_DOUBLE_MULTIPLIER))]
    pub double_multiplier: u64,
    /// Whether daily doubles are assigned in standard rounds
    #[garde(skip)]
    pub daily_doubles: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_value: DEFAULT_BASE_VALUE,
            double_multiplier: DEFAULT_DOUBLE_MULTIPLIER,
            daily_doubles: true,
        }
    }
}
