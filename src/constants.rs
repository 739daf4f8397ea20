//! Constants for the board format and presentation
//!
//! This module contains the fixed names, file layout markers and default
//! values shared by the loader, the board state and the session controller.

/// Game folder layout constants
pub mod game {
    /// Name of the manifest file listing round files in play order
    pub const MANIFEST_FILE: &str = "order.csv";
    /// Extension of every round table file
    pub const ROUND_EXTENSION: &str = "csv";
    /// Round name marking the single-clue final round
    pub const FINAL_ROUND_NAME: &str = "final";
    /// Round name whose values are multiplied
    pub const DOUBLE_ROUND_NAME: &str = "double";
}

/// Board constants
pub mod board {
    /// Number of clues flagged as daily doubles in a standard round
    pub const DAILY_DOUBLE_COUNT: usize = 2;
}

/// Value configuration constants
pub mod value {
    /// Default value of the top row
    pub const DEFAULT_BASE_VALUE: u64 = 200;
    /// Minimum configurable value of the top row
    pub const MIN_BASE_VALUE: u64 = 100;
    /// Maximum configurable value of the top row
    pub const MAX_BASE_VALUE: u64 = 10_000;
    /// Default multiplier for the double round
    pub const DEFAULT_DOUBLE_MULTIPLIER: u64 = 2;
    /// Maximum configurable multiplier for the double round
    pub const MAX_DOUBLE_MULTIPLIER: u64 = 10;
}

/// Final round defaults used when the file is incomplete
pub mod final_round {
    /// Category shown when the final round file has no category row
    pub const DEFAULT_CATEGORY: &str = "Final Jeopardy";
    /// Question shown when the final round file has no question row
    pub const DEFAULT_QUESTION: &str = "No question provided.";
}

/// Inline media tag syntax: `text [media:<filename>]`
pub mod media {
    /// Opening of an inline media tag
    pub const TAG_OPEN: &str = "[media:";
    /// Closing of an inline media tag
    pub const TAG_CLOSE: char = ']';
}

/// Texts shown on interstitial screens
pub mod text {
    /// Interstitial shown before a daily double clue
    pub const DAILY_DOUBLE: &str = "Daily Double!";
    /// Transition shown before the final round
    pub const FINAL_BEGINNING: &str = "Final Jeopardy is beginning!";
    /// Transition shown when no round follows
    pub const GAME_OVER: &str = "Thanks for playing!";
}
