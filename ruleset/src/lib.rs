/*
 *  Ruleset, game rules as seen by a search.
 *  Copyright (C) 2024 ToTheAnd
 *
 *  Ruleset is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  Ruleset is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with Ruleset. If not, see <https://www.gnu.org/licenses/>.
 */

//! [`ruleset`](crate) is everything a search needs to know about a game, and nothing more.
//! The [`Position`](general::position::Position) trait answers which moves are legal, what happens when one is played,
//! and whether the game is over. Move generation itself is not implemented here: for chess, it is delegated to the
//! `chess` crate. [`ruleset`](crate) forms the foundation of the `seekers` crate, which contains the engines.

use strum_macros::{Display, EnumIter};
use thiserror::Error;

pub use anyhow;
pub use arrayvec;
pub use colored;
pub use itertools;
pub use rand;
pub use strum;
pub use strum_macros;

use crate::PlayerResult::{Draw, Lose, Win};

/// Anything related to the specific games, organized in submodules like "chess".
pub mod games;
/// The game-independent contracts ([`Position`](general::position::Position), [`Move`](general::moves::Move))
/// and low-level helper functions.
pub mod general;
/// The score type shared by evaluation functions and searchers.
pub mod score;
/// Basic search helper types that don't depend on a concrete search algorithm.
pub mod search;

/// Result of a game from a player's perspective.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
#[must_use]
pub enum PlayerResult {
    Win,
    Lose,
    Draw,
}

impl PlayerResult {
    pub fn flip(self) -> Self {
        match self {
            Win => Lose,
            Lose => Win,
            Draw => Draw,
        }
    }

    pub fn flip_if(self, condition: bool) -> Self {
        if condition {
            self.flip()
        } else {
            self
        }
    }
}

/// One of the two players. Games that don't have colors, like tic-tac-toe, call the first player `White`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display, EnumIter)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn is_first(self) -> bool {
        self == Side::White
    }
}

/// The result of a game from an outside observer's perspective.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display)]
pub enum Outcome {
    #[strum(to_string = "1-0")]
    WhiteWin,
    #[strum(to_string = "0-1")]
    BlackWin,
    #[strum(to_string = "1/2-1/2")]
    Draw,
    #[default]
    #[strum(to_string = "*")]
    Undecided,
}

impl Outcome {
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::White => Outcome::WhiteWin,
            Side::Black => Outcome::BlackWin,
        }
    }

    pub fn is_decided(self) -> bool {
        self != Outcome::Undecided
    }

    /// Converts the outcome to the perspective of `side`. Returns `None` if the game is still going on.
    pub fn for_player(self, side: Side) -> Option<PlayerResult> {
        match self {
            Outcome::WhiteWin => Some(Win.flip_if(side == Side::Black)),
            Outcome::BlackWin => Some(Lose.flip_if(side == Side::Black)),
            Outcome::Draw => Some(Draw),
            Outcome::Undecided => None,
        }
    }
}

/// Errors raised at the boundary between a game's rules and the outside world.
/// Searchers only ever play moves that the position generated itself, so they never cause these errors.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum OracleError {
    #[error("illegal move '{mov}' in position '{position}'")]
    IllegalMove { mov: String, position: String },
    #[error("invalid move notation '{text}': {reason}")]
    InvalidNotation { text: String, reason: String },
    #[error("invalid position '{text}': {reason}")]
    InvalidFen { text: String, reason: String },
}

impl OracleError {
    pub fn notation(text: &str, reason: impl Into<String>) -> Self {
        OracleError::InvalidNotation {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    pub fn fen(text: &str, reason: impl Into<String>) -> Self {
        OracleError::InvalidFen {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_for_player_test() {
        assert_eq!(Outcome::WhiteWin.for_player(Side::White), Some(Win));
        assert_eq!(Outcome::WhiteWin.for_player(Side::Black), Some(Lose));
        assert_eq!(Outcome::BlackWin.for_player(Side::White), Some(Lose));
        assert_eq!(Outcome::BlackWin.for_player(Side::Black), Some(Win));
        assert_eq!(Outcome::Draw.for_player(Side::Black), Some(Draw));
        assert_eq!(Outcome::Undecided.for_player(Side::White), None);
        assert_eq!(Outcome::win_for(Side::Black), Outcome::BlackWin);
        assert_eq!(Outcome::Draw.to_string(), "1/2-1/2");
    }
}
