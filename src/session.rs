//! Rendering surface abstraction
//!
//! This module defines the trait through which the session controller
//! drives whatever displays the game: a desktop window, a terminal or a
//! test double. The controller never blocks on the presenter; media
//! playback in particular is started and stopped without waiting.

use crate::{board::media::Media, game::UpdateMessage};

/// Trait for presenting a game session
///
/// Implementations display the messages they receive and report user input
/// back to [`crate::game::Game::receive_message`].
pub trait Presenter {
    /// Displays the screen described by `message`
    fn send_message(&self, message: &UpdateMessage);

    /// Starts presenting `media` alongside the current clue
    ///
    /// Audio and video keep playing until [`Presenter::stop_media`] is
    /// called.
    fn play_media(&self, media: &Media);

    /// Stops any media started by [`Presenter::play_media`]
    ///
    /// Called when a clue with audio or video is left and whenever the
    /// session ends, so it must be harmless when nothing is playing.
    fn stop_media(&self);

    /// Hands control back to the caller once the session has ended
    fn return_to_menu(&self);
}
