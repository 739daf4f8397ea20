//! Selection tracking and daily double assignment for the round in play
//!
//! The board state records which clues of the current standard round have
//! been revealed, how many remain and which clues are daily doubles. It is
//! rebuilt from the round catalog on every round transition.

use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use thiserror::Error;

use crate::{
    board::{clue::ClueKey, round::StandardRound},
    constants::board::DAILY_DOUBLE_COUNT,
};

/// Errors that can occur while assigning daily doubles
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Fewer unselected clues remain than daily doubles to assign
    #[error("cannot assign daily doubles from {available} unselected clues")]
    InsufficientPool {
        /// Number of unselected clues at assignment time
        available: usize,
    },
}

/// Outcome of selecting a clue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The clue was unselected and is now selected
    Selected,
    /// The clue had already been selected; nothing changed
    AlreadySelected,
    /// No clue exists at the key; nothing changed
    NotOnBoard,
}

impl Selection {
    /// Whether the key had already been selected
    pub fn already_selected(self) -> bool {
        matches!(self, Self::AlreadySelected)
    }
}

/// Draws daily doubles uniformly at random, without replacement, from `pool`
///
/// # Errors
///
/// Returns [`Error::InsufficientPool`] if `pool` holds fewer keys than
/// daily doubles to assign.
pub fn sample_daily_doubles(
    pool: &[ClueKey],
    rng: &mut fastrand::Rng,
) -> Result<Vec<ClueKey>, Error> {
    if pool.len() < DAILY_DOUBLE_COUNT {
        return Err(Error::InsufficientPool {
            available: pool.len(),
        });
    }

    Ok(rng.choose_multiple(pool.iter().copied(), DAILY_DOUBLE_COUNT))
}

/// Mutable state of the standard round currently in play
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// Every clue on the board
    keys: BTreeSet<ClueKey>,
    /// Clues already revealed this round
    selected: HashSet<ClueKey>,
    /// Clues flagged as daily doubles this round
    daily_doubles: HashSet<ClueKey>,
    /// Clues not yet revealed this round
    remaining: usize,
    /// Whether daily double assignment already ran this round
    daily_doubles_settled: bool,
}

impl BoardState {
    /// Creates the state for a fresh round
    pub fn new(round: &StandardRound) -> Self {
        let mut state = Self::default();
        state.reset(round);
        state
    }

    /// Clears selections and daily doubles and loads the clues of `round`
    pub fn reset(&mut self, round: &StandardRound) {
        self.keys = round.keys().collect();
        self.selected.clear();
        self.daily_doubles.clear();
        self.remaining = self.keys.len();
        self.daily_doubles_settled = false;
    }

    /// Returns the number of clues in the round
    pub fn total_clues(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of clues not yet revealed
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Marks `key` as revealed
    ///
    /// Selecting a clue twice, or a key with no clue, changes nothing.
    pub fn select(&mut self, key: ClueKey) -> Selection {
        if !self.keys.contains(&key) {
            return Selection::NotOnBoard;
        }
        if !self.selected.insert(key) {
            return Selection::AlreadySelected;
        }

        self.remaining -= 1;
        Selection::Selected
    }

    /// Whether `key` has been revealed this round
    pub fn is_selected(&self, key: ClueKey) -> bool {
        self.selected.contains(&key)
    }

    /// Returns the clues revealed this round
    pub fn selected(&self) -> &HashSet<ClueKey> {
        &self.selected
    }

    /// Whether every clue of the round has been revealed
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Returns the daily doubles of this round (empty until assigned)
    pub fn daily_doubles(&self) -> &HashSet<ClueKey> {
        &self.daily_doubles
    }

    /// Whether `key` is a daily double this round
    pub fn is_daily_double(&self, key: ClueKey) -> bool {
        self.daily_doubles.contains(&key)
    }

    /// Returns the clues not yet revealed, in board order
    pub fn unselected(&self) -> Vec<ClueKey> {
        self.keys
            .iter()
            .filter(|key| !self.selected.contains(key))
            .copied()
            .collect_vec()
    }

    /// Assigns daily doubles once the first clue of the round has been picked
    ///
    /// Runs at most once per round. The pool is the set of clues still
    /// unselected, so the clue just picked is never a daily double.
    ///
    /// Returns `Ok(true)` when daily doubles were assigned by this call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientPool`] if too few clues remain. The
    /// round then continues without daily doubles.
    pub fn assign_daily_doubles_if_due(&mut self, rng: &mut fastrand::Rng) -> Result<bool, Error> {
        let threshold = self.total_clues().saturating_sub(1);
        if self.daily_doubles_settled || self.total_clues() == 0 || self.remaining > threshold {
            return Ok(false);
        }

        self.daily_doubles_settled = true;
        let chosen = sample_daily_doubles(&self.unselected(), rng)?;
        self.daily_doubles.extend(chosen);

        Ok(true)
    }
}
