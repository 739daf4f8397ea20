//! # Jeopardy Game Library
//!
//! This library provides the core logic for running a locally hosted
//! Jeopardy-style trivia game. It loads game folders from disk, tracks which
//! clues of a round have been revealed, places daily doubles and sequences
//! the rounds of a session through to the final clue. Rendering is left to
//! an implementation of [`session::Presenter`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod board_state;
pub mod config;
pub mod constants;
pub mod game;
pub mod session;

pub use board::loader::{GameCatalog, load_game_catalog};
pub use game::{Game, IncomingMessage, UpdateMessage};
pub use session::Presenter;
