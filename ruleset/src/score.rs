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

use std::ops::{Div, Mul};

use derive_more::{Add, AddAssign, Neg, Sub, SubAssign};

pub type ScoreT = f64;

/// A score is always relative to the player to move: positive values are good for that player.
/// The scale is up to the evaluation function, but mate scores are always far outside of it.
#[derive(Default, Debug, PartialEq, PartialOrd, Copy, Clone, Add, Sub, Neg, AddAssign, SubAssign, derive_more::Display)]
pub struct Score(pub ScoreT);

impl Mul<ScoreT> for Score {
    type Output = Score;

    fn mul(self, rhs: ScoreT) -> Self::Output {
        Score(self.0 * rhs)
    }
}

impl Div<ScoreT> for Score {
    type Output = Score;

    fn div(self, rhs: ScoreT) -> Self::Output {
        Score(self.0 / rhs)
    }
}

/// Larger than any material evaluation. Being mated in `n` plies scores `-MATE_BASE + n`.
pub const MATE_BASE: ScoreT = 20_000.0;
/// Mate scores can be at most this many plies away from `MATE_BASE`.
pub const MAX_MATE_PLIES: ScoreT = 1_000.0;

pub const SCORE_DRAW: Score = Score(0.0);
pub const SCORE_INFINITY: Score = Score(ScoreT::INFINITY);
/// Returned while unwinding the search after the budget has been exceeded. Never used by the caller.
pub const SCORE_TIME_UP: Score = Score(0.0);

impl Score {
    pub fn is_game_won_score(self) -> bool {
        self.0 >= MATE_BASE - MAX_MATE_PLIES
    }

    pub fn is_game_lost_score(self) -> bool {
        self.0 <= -MATE_BASE + MAX_MATE_PLIES
    }

    pub fn is_game_over_score(self) -> bool {
        self.is_game_won_score() || self.is_game_lost_score()
    }

    /// Returns a negative number of plies if the game is lost
    pub fn plies_until_game_won(self) -> Option<isize> {
        if self.is_game_won_score() {
            Some((MATE_BASE - self.0).round() as isize)
        } else if self.is_game_lost_score() {
            Some((-MATE_BASE - self.0).round() as isize)
        } else {
            None
        }
    }

    /// Returns a negative number if the game is lost
    pub fn moves_until_game_won(self) -> Option<isize> {
        self.plies_until_game_won()
            .map(|n| (n as f32 / 2f32).ceil() as isize)
    }

    /// `PartialOrd` is enough for comparisons, but `f64` doesn't implement `Ord::max`.
    pub fn max(self, other: Score) -> Score {
        if other > self {
            other
        } else {
            self
        }
    }

    pub fn min(self, other: Score) -> Score {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Maps the score into `[-1, 1]` by dividing by `scale` and clamping.
    pub fn normalized(self, scale: ScoreT) -> ScoreT {
        (self.0 / scale).clamp(-1.0, 1.0)
    }
}

/// The score of a position where the player to move has been checkmated `ply` plies after the search started.
/// Mates found closer to the root are worse for the mated player, so the search prefers faster mates.
pub fn mated_score(ply: usize) -> Score {
    Score(-MATE_BASE + ply as ScoreT)
}
