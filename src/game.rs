//! Session controller: round sequencing and clue presentation
//!
//! This module contains the state machine that runs a loaded game. It
//! sequences the playable rounds, dispatches clue selections to the board
//! state, presents daily doubles and round transitions, and walks through
//! the final round before handing control back to the caller.
//!
//! All input goes through [`Game::receive_message`], which checks the
//! current state before acting. Input that does not belong to the current
//! state is ignored, so a late click cannot fire a transition twice.

use std::fmt::Debug;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, error, info};

use crate::{
    board::{
        clue::{Clue, ClueKey},
        loader::GameCatalog,
        media::{self, Media},
        round::{Round, RoundRecord, StandardRound},
    },
    board_state::{BoardState, Selection},
    config::Options,
    constants::text::{DAILY_DOUBLE, FINAL_BEGINNING, GAME_OVER},
    session::Presenter,
};

/// Represents the current phase of the session
///
/// Round indices refer to the playable rounds of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum State {
    /// The board of a standard round, waiting for a clue selection
    #[display("board of round {_0}")]
    Board(usize),
    /// A clue is shown, waiting for acknowledgment
    #[display("clue {key:?} of round {round}")]
    ClueReveal {
        /// Round of the clue
        round: usize,
        /// The revealed clue
        key: ClueKey,
    },
    /// The daily double interstitial, waiting for acknowledgment
    #[display("daily double {key:?} of round {round}")]
    DailyDouble {
        /// Round of the clue
        round: usize,
        /// The daily double clue
        key: ClueKey,
    },
    /// Announcing the next round, waiting for acknowledgment
    #[display("transition from round {from} to {to:?}")]
    RoundTransition {
        /// The round just exhausted
        from: usize,
        /// The next playable round, if any
        to: Option<usize>,
    },
    /// The final round category is shown
    #[display("final category of round {_0}")]
    FinalCategory(usize),
    /// The final round clue is shown
    #[display("final clue of round {_0}")]
    FinalClue(usize),
    /// The session is over
    #[display("ended")]
    Ended,
}

/// The two equivalent ways to acknowledge a waiting screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acknowledgement {
    /// Primary pointer click
    Click,
    /// Confirm key press
    Confirm,
}

/// Input received from the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum IncomingMessage {
    /// A board tile was chosen
    Select(ClueKey),
    /// The current screen was acknowledged
    Acknowledge(Acknowledgement),
    /// The presenter asked to leave the session
    Exit,
}

impl From<ClueKey> for IncomingMessage {
    fn from(key: ClueKey) -> Self {
        Self::Select(key)
    }
}

impl From<Acknowledgement> for IncomingMessage {
    fn from(acknowledgement: Acknowledgement) -> Self {
        Self::Acknowledge(acknowledgement)
    }
}

/// A tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileMessage {
    /// Key to send back when the tile is chosen
    pub key: ClueKey,
    /// Value shown on the tile
    pub value: u64,
    /// Whether the clue was already revealed; spent tiles are disabled
    pub spent: bool,
}

/// A category column of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMessage {
    /// Category title
    pub category: String,
    /// One entry per row; `None` where the tier has no clue
    pub tiles: Vec<Option<TileMessage>>,
}

/// The board of a standard round
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BoardMessage {
    /// Round name for display
    pub round: String,
    /// Category columns, left to right
    pub columns: Vec<ColumnMessage>,
}

/// A clue ready for display
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClueMessage {
    /// Category the clue belongs to
    pub category: String,
    /// Tile value (absent in the final round)
    pub value: Option<u64>,
    /// Whether the clue is a daily double
    pub daily_double: bool,
    /// Clue text without its media tag
    pub text: String,
    /// Media presented with the clue
    pub media: Option<Media>,
    /// Warning shown in place of media that could not be resolved
    pub warning: Option<String>,
}

/// Screens sent to the rendering surface
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// Show the board
    Board(BoardMessage),
    /// Show the daily double interstitial
    DailyDouble {
        /// Interstitial text
        text: String,
        /// Category of the upcoming clue
        category: String,
        /// Value of the upcoming clue
        value: u64,
    },
    /// Show a clue
    Clue(ClueMessage),
    /// Announce the next round
    RoundTransition {
        /// Announcement text
        text: String,
        /// Display name of the next round, if any
        next: Option<String>,
    },
    /// Show the final round category
    FinalCategory {
        /// The final category
        category: String,
    },
    /// Show the final round clue
    FinalClue(ClueMessage),
    /// The session has ended
    Ended,
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for a front-end
    ///
    /// Media paths that are not valid UTF-8 are written lossily.
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer: every field is a string, number,
    /// boolean or a sequence of those.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// A running game session
///
/// Created when a game is loaded and dropped when the session ends; loading
/// another game creates a new session rather than reusing this one.
pub struct Game {
    /// The loaded rounds
    catalog: GameCatalog,
    /// Presentation options
    options: Options,
    /// Current phase of the session
    state: State,
    /// Index of the round in play; never decreases
    round_index: usize,
    /// Selection state of the standard round in play
    board: BoardState,
    /// Randomness for daily double assignment
    rng: fastrand::Rng,
    /// Whether audio or video of the current clue is playing
    playing: bool,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing the whole catalog
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("folder", &self.catalog.folder())
            .field("state", &self.state)
            .field("remaining", &self.board.remaining())
            .finish_non_exhaustive()
    }
}

// Accessors
impl Game {
    /// Returns the current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the index of the round in play
    pub fn round_index(&self) -> usize {
        self.round_index
    }

    /// Returns the selection state of the round in play
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Returns the loaded catalog
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Returns the session options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the round in play
    pub fn current_round(&self) -> Option<&Round> {
        self.catalog.round(self.round_index)
    }

    fn set_state(&mut self, state: State) {
        debug!(from = %self.state, to = %state, "state transition");
        self.state = state;
    }

    fn standard_round(&self, index: usize) -> Option<(&Round, &StandardRound)> {
        let round = self.catalog.round(index)?;
        match &round.record {
            RoundRecord::Standard(board) => Some((round, board)),
            RoundRecord::Final(_) => None,
        }
    }

    fn clue_message(&self, round: usize, category: &str, clue: &Clue) -> ClueMessage {
        let folder = self.catalog.media_folder(round).unwrap_or_default();
        let resolved = media::resolve_clue(clue, &folder);
        debug!(round, category, "clue resolved");
        ClueMessage {
            category: category.to_owned(),
            value: None,
            daily_double: false,
            text: resolved.text,
            media: resolved.media,
            warning: resolved.warning,
        }
    }

    fn board_message(&self, index: usize) -> BoardMessage {
        let Some((round, board)) = self.standard_round(index) else {
            return BoardMessage::default();
        };
        let rows = board.row_count();

        BoardMessage {
            round: round.display_name(),
            columns: board
                .categories()
                .iter()
                .enumerate()
                .map(|(category, column)| ColumnMessage {
                    category: column.name.clone(),
                    tiles: (0..rows)
                        .map(|row| {
                            let key = ClueKey::new(category, row);
                            board.clue(key).map(|_| TileMessage {
                                key,
                                value: round.value(row, &self.options),
                                spent: self.board.is_selected(key),
                            })
                        })
                        .collect_vec(),
                })
                .collect_vec(),
        }
    }

    fn transition_message(&self, to: Option<usize>) -> UpdateMessage {
        match to.and_then(|index| self.catalog.round(index)) {
            Some(round) => UpdateMessage::RoundTransition {
                text: match round.record {
                    RoundRecord::Final(_) => FINAL_BEGINNING.to_owned(),
                    RoundRecord::Standard(_) => format!("{} is beginning!", round.display_name()),
                },
                next: Some(round.display_name()),
            },
            None => UpdateMessage::RoundTransition {
                text: GAME_OVER.to_owned(),
                next: None,
            },
        }
    }
}

impl Game {
    /// Creates a session for a loaded game, positioned at its first round
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jeopardy::board::loader::{GameCatalog, GameManifest};
    /// use jeopardy::config::Options;
    /// use jeopardy::game::{Game, State};
    ///
    /// let catalog = GameCatalog::new("games/empty", GameManifest::default(), Vec::new());
    /// let game = Game::new(catalog, Options::default());
    /// assert_eq!(game.state(), State::Ended);
    /// ```
    pub fn new(catalog: GameCatalog, options: Options) -> Self {
        Self::with_rng(catalog, options, fastrand::Rng::new())
    }

    /// Creates a session drawing daily doubles from `rng`
    pub fn with_rng(catalog: GameCatalog, options: Options, rng: fastrand::Rng) -> Self {
        let mut game = Self {
            catalog,
            options,
            state: State::Board(0),
            round_index: 0,
            board: BoardState::default(),
            rng,
            playing: false,
        };
        game.enter_round(0);
        game
    }

    /// Presents the first screen of the session
    ///
    /// A game with no playable rounds ends immediately.
    pub fn play<P: Presenter>(&mut self, presenter: &P) {
        info!(folder = %self.catalog.folder().display(), rounds = self.catalog.len(), "session started");
        if matches!(self.state, State::Ended) {
            self.finish(presenter);
        } else {
            self.present(presenter);
        }
    }

    /// Handles input from the rendering surface
    ///
    /// Selections are only accepted on the board and acknowledgments only on
    /// waiting screens; anything else is ignored. Clicks and confirm keys
    /// are interchangeable.
    ///
    /// # Arguments
    ///
    /// * `message` - The input to handle
    /// * `presenter` - The rendering surface that shows the resulting screen
    pub fn receive_message<P: Presenter>(&mut self, message: IncomingMessage, presenter: &P) {
        match (self.state, message) {
            (State::Ended, _) => {
                debug!(?message, "session ended, input ignored");
            }
            (_, IncomingMessage::Exit) => {
                info!(state = %self.state, "session exited");
                self.finish(presenter);
            }
            (State::Board(round), IncomingMessage::Select(key)) => {
                self.select(round, key, presenter);
            }
            (State::DailyDouble { round, key }, IncomingMessage::Acknowledge(_)) => {
                self.set_state(State::ClueReveal { round, key });
                self.present(presenter);
            }
            (State::ClueReveal { round, .. }, IncomingMessage::Acknowledge(_)) => {
                self.return_to_board(round, presenter);
            }
            (State::RoundTransition { to, .. }, IncomingMessage::Acknowledge(_)) => match to {
                Some(next) => {
                    self.enter_round(next);
                    self.present(presenter);
                }
                None => self.finish(presenter),
            },
            (State::FinalCategory(round), IncomingMessage::Acknowledge(_)) => {
                self.set_state(State::FinalClue(round));
                self.present(presenter);
            }
            (State::FinalClue(_), IncomingMessage::Acknowledge(_)) => {
                self.finish(presenter);
            }
            (state, message) => {
                debug!(%state, ?message, "input ignored");
            }
        }
    }

    /// Returns the message describing the current screen
    ///
    /// Front-ends can call this at any time to redraw.
    pub fn state_message(&self) -> UpdateMessage {
        match self.state {
            State::Board(index) => UpdateMessage::Board(self.board_message(index)),
            State::DailyDouble { round, key } => {
                let Some((round, board)) = self.standard_round(round) else {
                    return UpdateMessage::Board(BoardMessage::default());
                };
                UpdateMessage::DailyDouble {
                    text: DAILY_DOUBLE.to_owned(),
                    category: board
                        .categories()
                        .get(key.category)
                        .map(|category| category.name.clone())
                        .unwrap_or_default(),
                    value: round.value(key.row, &self.options),
                }
            }
            State::ClueReveal { round: index, key } => {
                let message = self.standard_round(index).and_then(|(round, board)| {
                    let category = board.categories().get(key.category)?;
                    let clue = board.clue(key)?;
                    Some(ClueMessage {
                        value: Some(round.value(key.row, &self.options)),
                        daily_double: self.board.is_daily_double(key),
                        ..self.clue_message(index, &category.name, clue)
                    })
                });
                UpdateMessage::Clue(message.unwrap_or_default())
            }
            State::RoundTransition { to, .. } => self.transition_message(to),
            State::FinalCategory(index) => UpdateMessage::FinalCategory {
                category: match self.catalog.round(index).map(|round| &round.record) {
                    Some(RoundRecord::Final(last)) => last.category.clone(),
                    _ => String::new(),
                },
            },
            State::FinalClue(index) => {
                let message = self.catalog.round(index).and_then(|round| match &round.record {
                    RoundRecord::Final(last) => {
                        Some(self.clue_message(index, &last.category, &last.clue))
                    }
                    RoundRecord::Standard(_) => None,
                });
                UpdateMessage::FinalClue(message.unwrap_or_default())
            }
            State::Ended => UpdateMessage::Ended,
        }
    }

    /// Sends the current screen and starts its media, if any
    fn present<P: Presenter>(&mut self, presenter: &P) {
        let message = self.state_message();
        presenter.send_message(&message);

        if let UpdateMessage::Clue(clue) | UpdateMessage::FinalClue(clue) = &message {
            if let Some(media) = &clue.media {
                presenter.play_media(media);
                self.playing = media.kind.is_playback();
            }
        }
    }

    /// Moves to the round at `index` and prepares its state
    fn enter_round(&mut self, index: usize) {
        self.round_index = index;

        let record = self.catalog.round(index).map(|round| &round.record);
        match record {
            Some(RoundRecord::Standard(round)) => {
                self.board.reset(round);
                info!(round = index, clues = self.board.total_clues(), "round started");
                self.set_state(State::Board(index));
                if self.board.is_exhausted() {
                    self.begin_transition(index);
                }
            }
            Some(RoundRecord::Final(_)) => {
                self.board = BoardState::default();
                info!(round = index, "final round started");
                self.set_state(State::FinalCategory(index));
            }
            None => self.set_state(State::Ended),
        }
    }

    /// Announces whatever follows the exhausted round `from`
    fn begin_transition(&mut self, from: usize) {
        let next = from + 1;
        let to = (next < self.catalog.len()).then_some(next);
        self.set_state(State::RoundTransition { from, to });
    }

    /// Reveals the clue at `key` on the board of round `round`
    fn select<P: Presenter>(&mut self, round: usize, key: ClueKey, presenter: &P) {
        match self.board.select(key) {
            Selection::Selected => {}
            selection => {
                debug!(?key, ?selection, "selection ignored");
                return;
            }
        }

        if self.options.daily_doubles {
            match self.board.assign_daily_doubles_if_due(&mut self.rng) {
                Ok(true) => debug!(daily_doubles = ?self.board.daily_doubles(), "daily doubles assigned"),
                Ok(false) => {}
                Err(e) => error!(error = %e, round, "round continues without daily doubles"),
            }
        }

        if self.board.is_daily_double(key) {
            self.set_state(State::DailyDouble { round, key });
        } else {
            self.set_state(State::ClueReveal { round, key });
        }
        self.present(presenter);
    }

    /// Leaves a clue and shows the board, then the transition if the round is over
    fn return_to_board<P: Presenter>(&mut self, round: usize, presenter: &P) {
        if std::mem::take(&mut self.playing) {
            presenter.stop_media();
        }
        self.set_state(State::Board(round));
        self.present(presenter);

        if self.board.is_exhausted() {
            self.begin_transition(round);
            self.present(presenter);
        }
    }

    /// Ends the session and hands control back to the caller
    fn finish<P: Presenter>(&mut self, presenter: &P) {
        presenter.stop_media();
        self.playing = false;
        self.set_state(State::Ended);
        info!("session ended");
        presenter.send_message(&UpdateMessage::Ended);
        presenter.return_to_menu();
    }
}
