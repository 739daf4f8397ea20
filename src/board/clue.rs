//! Clues and their position on a board
//!
//! A clue is stored in a board table cell. Cells hold either plain text,
//! optionally suffixed with an inline media tag, or a structured JSON
//! object with the fixed schema `{ "text": string, "media"?: string }`.
//! Structured parsing is strict: a cell that looks structured but does not
//! match the schema is kept as plain text instead of failing the load.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::media;

/// Identifies a clue within a round by its category column and row tier
///
/// Rows are zero-based and ordered by ascending value, so the row also
/// determines the clue's value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClueKey {
    /// Zero-based category column
    pub category: usize,
    /// Zero-based row (value tier)
    pub row: usize,
}

impl ClueKey {
    /// Creates a key for the given category column and row
    pub const fn new(category: usize, row: usize) -> Self {
        Self { category, row }
    }
}

/// Errors that can occur while parsing a clue cell
#[derive(Error, Debug)]
pub enum Error {
    /// The cell looked structured but did not match the clue schema
    #[error("malformed clue cell: {0}")]
    MalformedCell(#[from] serde_json::Error),
}

/// Schema accepted for structured cells
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ClueCell {
    #[serde(alias = "question")]
    text: String,
    #[serde(default)]
    media: Option<String>,
}

/// A single question unit with optional attached media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    /// Raw clue text, possibly carrying an inline media tag
    text: String,
    /// Media file name given explicitly by a structured cell
    media: Option<String>,
}

impl Clue {
    /// Creates a clue from raw text without explicit media
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
        }
    }

    /// Attaches an explicit media file name to this clue
    #[must_use]
    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    /// Returns the raw text as stored in the board file
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    /// Returns the text to display and the media file name, if any
    ///
    /// An inline media tag is always stripped from the displayed text. An
    /// explicit media name from a structured cell takes precedence over the
    /// inline tag.
    pub fn presentation(&self) -> (&str, Option<&str>) {
        let (text, tagged) = media::split_tag(&self.text);
        (text, self.media.as_deref().or(tagged))
    }

    /// Parses a board cell into a clue
    ///
    /// Returns `None` for an empty cell, meaning there is no clue at that
    /// tier. Cells starting with `{` are parsed against the structured
    /// schema; on failure the raw cell is used as plain text.
    pub fn parse_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }

        if cell.starts_with('{') {
            match Self::parse_structured(cell) {
                Ok(clue) => return Some(clue),
                Err(e) => warn!(error = %e, cell, "treating clue cell as plain text"),
            }
        }

        Some(Self::new(cell))
    }

    /// Parses a structured cell strictly against the clue schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCell`] if the cell is not a JSON object with
    /// a `text` (or `question`) string and an optional `media` string.
    pub fn parse_structured(cell: &str) -> Result<Self, Error> {
        let ClueCell { text, media } = serde_json::from_str(cell)?;
        let clue = Self::new(text);
        Ok(match media.filter(|m| !m.trim().is_empty()) {
            Some(media) => clue.with_media(media),
            None => clue,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_has_no_clue() {
        assert_eq!(Clue::parse_cell(""), None);
        assert_eq!(Clue::parse_cell("   "), None);
    }

    #[test]
    fn test_plain_cell() {
        let clue = Clue::parse_cell("What is 2+2?").unwrap();
        assert_eq!(clue.raw_text(), "What is 2+2?");
        assert_eq!(clue.presentation(), ("What is 2+2?", None));
    }

    #[test]
    fn test_plain_cell_with_inline_media() {
        let clue = Clue::parse_cell("What is 2+2? [media:sum.png]").unwrap();
        assert_eq!(clue.presentation(), ("What is 2+2?", Some("sum.png")));
    }

    #[test]
    fn test_structured_cell() {
        let clue = Clue::parse_cell(r#"{"text": "Name this bird", "media": "owl.jpg"}"#).unwrap();
        assert_eq!(clue.presentation(), ("Name this bird", Some("owl.jpg")));
        assert_eq!(clue, Clue::new("Name this bird").with_media("owl.jpg"));
    }

    #[test]
    fn test_structured_cell_question_alias() {
        let clue = Clue::parse_cell(r#"{"question": "Capital of France?"}"#).unwrap();
        assert_eq!(clue.presentation(), ("Capital of France?", None));
    }

    #[test]
    fn test_structured_media_overrides_inline_tag() {
        let clue =
            Clue::parse_cell(r#"{"text": "Listen [media:a.mp3]", "media": "b.mp3"}"#).unwrap();
        assert_eq!(clue.presentation(), ("Listen", Some("b.mp3")));
    }

    #[test]
    fn test_blank_structured_media_ignored() {
        let clue = Clue::parse_cell(r#"{"text": "No media", "media": ""}"#).unwrap();
        assert_eq!(clue.presentation(), ("No media", None));
    }

    #[test]
    fn test_malformed_structured_cell_falls_back() {
        let cell = "{'question': 'single quotes are not JSON'}";
        let clue = Clue::parse_cell(cell).unwrap();
        assert_eq!(clue.raw_text(), cell);
    }

    #[test]
    fn test_unknown_field_falls_back() {
        let cell = r#"{"text": "hi", "exec": "rm -rf /"}"#;
        assert!(Clue::parse_structured(cell).is_err());
        assert_eq!(Clue::parse_cell(cell).unwrap().raw_text(), cell);
    }

    #[test]
    fn test_parse_structured_error_message() {
        let err = Clue::parse_structured("{").unwrap_err();
        assert!(err.to_string().starts_with("malformed clue cell"));
    }

    #[test]
    fn test_clue_key_ordering() {
        assert!(ClueKey::new(0, 4) < ClueKey::new(1, 0));
        assert!(ClueKey::new(2, 1) < ClueKey::new(2, 3));
    }
}
