//! Board data model and game folder loading
//!
//! This module contains the clue and round types read from a game folder,
//! the loader that builds a round catalog from disk, and media resolution
//! for clues that reference image, audio or video files.

pub mod clue;
pub mod loader;
pub mod media;
pub mod round;
