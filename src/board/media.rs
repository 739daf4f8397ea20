//! Media resolution for clues (images, animations, audio, video)
//!
//! A clue references media by file name, either through an inline
//! `[media:<filename>]` suffix on its text or through a structured cell.
//! Files live in a folder named after the round, inside the game folder.
//! Resolution never fails the session: problems become a warning string that
//! is displayed in place of the media while the clue text is still shown.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

use super::clue::Clue;
use crate::constants::media::{TAG_CLOSE, TAG_OPEN};

/// The playback kind of a media file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display,
)]
pub enum MediaKind {
    /// Still image
    #[display("image")]
    Image,
    /// Animated image, played in a loop
    #[display("animated image")]
    AnimatedImage,
    /// Audio clip
    #[display("audio")]
    Audio,
    /// Video clip
    #[display("video")]
    Video,
}

impl MediaKind {
    /// Classifies a file extension, ignoring case
    ///
    /// Returns `None` for extensions that cannot be presented.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "bmp" | "webp" => Some(Self::Image),
            "gif" => Some(Self::AnimatedImage),
            "mp3" | "wav" | "ogg" | "flac" => Some(Self::Audio),
            "mp4" | "mov" | "avi" | "mkv" | "webm" => Some(Self::Video),
            _ => None,
        }
    }

    /// Whether this kind is played over time and must be stopped on exit
    pub fn is_playback(self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }
}

/// A media file resolved to a concrete path and kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Media {
    /// How the file should be presented
    pub kind: MediaKind,
    /// Location of the file on disk
    ///
    /// Serialized lossily: bytes that are not valid UTF-8 become U+FFFD.
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
}

fn serialize_lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Errors that can occur while resolving clue media
///
/// The display text of each variant is the warning shown in place of the
/// media.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The referenced file does not exist
    #[error("Media not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file extension is not a presentable media format
    #[error("Unsupported media format: {0}")]
    Unsupported(String),
    /// The file name is empty or reaches outside the round folder
    #[error("Invalid media name: {0}")]
    InvalidName(String),
}

/// A clue ready for display: text without its media tag plus media or a warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClue {
    /// Text to display
    pub text: String,
    /// Media to present alongside the text
    pub media: Option<Media>,
    /// Warning displayed in place of media that could not be resolved
    pub warning: Option<String>,
}

/// Splits an inline `[media:<filename>]` suffix off clue text
///
/// Returns the text to display and the referenced file name. Text without a
/// well-formed tag is returned unchanged apart from trailing whitespace.
pub fn split_tag(text: &str) -> (&str, Option<&str>) {
    let text = text.trim_end();
    let Some(body) = text.strip_suffix(TAG_CLOSE) else {
        return (text, None);
    };
    let Some(start) = body.rfind(TAG_OPEN) else {
        return (text, None);
    };

    let name = body[start + TAG_OPEN.len()..].trim();
    if name.is_empty() {
        return (text, None);
    }

    (body[..start].trim_end(), Some(name))
}

/// Returns the media folder of a round inside a game folder
pub fn round_folder(game_folder: &Path, round_name: &str) -> PathBuf {
    game_folder.join(round_name)
}

/// Resolves a media file name inside a round folder
///
/// # Arguments
///
/// * `folder` - The media folder of the clue's round
/// * `file_name` - The bare file name referenced by the clue
///
/// # Returns
///
/// The file's location and its presentation kind
///
/// # Errors
///
/// * [`Error::InvalidName`] if the name is not a bare file name
/// * [`Error::Unsupported`] if the extension is not a known media format
/// * [`Error::NotFound`] if no such file exists
pub fn resolve(folder: &Path, file_name: &str) -> Result<Media, Error> {
    let name = Path::new(file_name);
    if file_name.is_empty() || name.file_name() != Some(OsStr::new(file_name)) {
        return Err(Error::InvalidName(file_name.to_owned()));
    }

    let extension = name.extension().and_then(OsStr::to_str).unwrap_or_default();
    let kind = MediaKind::from_extension(extension)
        .ok_or_else(|| Error::Unsupported(file_name.to_owned()))?;

    let path = folder.join(name);
    if !path.is_file() {
        return Err(Error::NotFound(path));
    }

    Ok(Media { kind, path })
}

/// Prepares a clue for display, resolving its media inside `folder`
pub fn resolve_clue(clue: &Clue, folder: &Path) -> ResolvedClue {
    let (text, media_name) = clue.presentation();

    let (media, warning) = match media_name.map(|name| resolve(folder, name)) {
        None => (None, None),
        Some(Ok(media)) => (Some(media), None),
        Some(Err(e)) => {
            warn!(error = %e, folder = %folder.display(), "clue media unavailable");
            (None, Some(e.to_string()))
        }
    };

    ResolvedClue {
        text: text.to_owned(),
        media,
        warning,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_split_tag() {
        assert_eq!(
            split_tag("What is 2+2? [media:sum.png]"),
            ("What is 2+2?", Some("sum.png"))
        );
        assert_eq!(split_tag("No media here"), ("No media here", None));
        assert_eq!(split_tag("Trailing space  "), ("Trailing space", None));
        assert_eq!(split_tag("[media:only.gif]"), ("", Some("only.gif")));
    }

    #[test]
    fn test_split_tag_ignores_malformed_tags() {
        assert_eq!(split_tag("Empty [media:]"), ("Empty [media:]", None));
        assert_eq!(split_tag("Brackets [note]"), ("Brackets [note]", None));
        assert_eq!(split_tag("Unclosed [media:x.png"), ("Unclosed [media:x.png", None));
    }

    #[test]
    fn test_split_tag_uses_last_tag() {
        assert_eq!(
            split_tag("See [media:a.png] then [media:b.png]"),
            ("See [media:a.png] then", Some("b.png"))
        );
    }

    #[test]
    fn test_media_kind_from_extension() {
        assert_eq!(MediaKind::from_extension("PNG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("gif"), Some(MediaKind::AnimatedImage));
        assert_eq!(MediaKind::from_extension("wav"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_extension("Mov"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("txt"), None);
        assert_eq!(MediaKind::from_extension(""), None);
    }

    #[test]
    fn test_is_playback() {
        assert!(MediaKind::Audio.is_playback());
        assert!(MediaKind::Video.is_playback());
        assert!(!MediaKind::Image.is_playback());
        assert!(!MediaKind::AnimatedImage.is_playback());
    }

    #[test]
    fn test_resolve_existing_file() {
        let game = tempfile::tempdir().unwrap();
        let folder = round_folder(game.path(), "jeopardy");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("sum.png"), b"png").unwrap();

        let media = resolve(&folder, "sum.png").unwrap();
        assert_eq!(media.kind, MediaKind::Image);
        assert_eq!(media.path, game.path().join("jeopardy").join("sum.png"));
    }

    #[test]
    fn test_resolve_missing_file() {
        let game = tempfile::tempdir().unwrap();
        let folder = round_folder(game.path(), "jeopardy");

        let err = resolve(&folder, "sum.png").unwrap_err();
        assert_eq!(err, Error::NotFound(folder.join("sum.png")));
    }

    #[test]
    fn test_resolve_unsupported() {
        let game = tempfile::tempdir().unwrap();
        fs::write(game.path().join("notes.txt"), b"text").unwrap();

        let err = resolve(game.path(), "notes.txt").unwrap_err();
        assert_eq!(err, Error::Unsupported("notes.txt".to_owned()));
    }

    #[test]
    fn test_resolve_rejects_path_components() {
        let game = tempfile::tempdir().unwrap();
        for name in ["../secret.png", "sub/dir.png", "..", ""] {
            assert_eq!(
                resolve(game.path(), name).unwrap_err(),
                Error::InvalidName(name.to_owned())
            );
        }
    }

    #[test]
    fn test_resolve_clue_with_media() {
        let game = tempfile::tempdir().unwrap();
        let folder = round_folder(game.path(), "jeopardy");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("sum.png"), b"png").unwrap();

        let resolved = resolve_clue(&Clue::new("What is 2+2? [media:sum.png]"), &folder);
        assert_eq!(resolved.text, "What is 2+2?");
        assert_eq!(resolved.warning, None);
        assert_eq!(
            resolved.media,
            Some(Media {
                kind: MediaKind::Image,
                path: folder.join("sum.png"),
            })
        );
    }

    #[test]
    fn test_resolve_clue_missing_media_warns() {
        let game = tempfile::tempdir().unwrap();
        let folder = round_folder(game.path(), "jeopardy");

        let resolved = resolve_clue(&Clue::new("What is 2+2? [media:sum.png]"), &folder);
        assert_eq!(resolved.text, "What is 2+2?");
        assert_eq!(resolved.media, None);
        let warning = resolved.warning.unwrap();
        assert!(warning.starts_with("Media not found"));
        assert!(warning.contains("sum.png"));
    }

    #[test]
    fn test_resolve_clue_without_media() {
        let game = tempfile::tempdir().unwrap();
        let resolved = resolve_clue(&Clue::new("Plain"), game.path());
        assert_eq!(
            resolved,
            ResolvedClue {
                text: "Plain".to_owned(),
                media: None,
                warning: None,
            }
        );
    }
}
