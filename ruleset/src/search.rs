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

use std::fmt::{Display, Formatter};
use std::num::NonZeroU64;
use std::time::Duration;

use derive_more::{Add, AddAssign, SubAssign};
use thiserror::Error;

use crate::general::moves::Move;
use crate::general::position::Position;
use crate::score::Score;
use crate::OracleError;

pub const MAX_DEPTH: Depth = Depth(1_000);

#[derive(Debug, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Add, AddAssign, SubAssign)]
#[must_use]
pub struct Depth(usize);

impl Depth {
    pub const MAX: Self = MAX_DEPTH;

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn new(val: usize) -> Self {
        debug_assert!(val <= Self::MAX.get());
        Self(val)
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type NodesLimit = NonZeroU64;

/// What the caller allows a search to spend. Every limit is optional; a limit that is `None` is left to the engine's
/// default (e.g. a default depth for alpha-beta or a default time for MCTS).
// Don't derive Eq because two limits with the same time budget aren't interchangeable once one of them has started.
#[derive(Copy, Clone, Debug, Default)]
#[must_use]
pub struct SearchLimit {
    pub fixed_time: Option<Duration>,
    pub depth: Option<Depth>,
    /// Nodes for tree searches, iterations for MCTS.
    pub nodes: Option<NodesLimit>,
}

impl SearchLimit {
    pub fn infinite() -> Self {
        Self::default()
    }

    pub fn new(fixed_time: Option<Duration>, depth: Option<Depth>) -> Self {
        Self {
            fixed_time,
            depth,
            nodes: None,
        }
    }

    pub fn per_move(fixed_time: Duration) -> Self {
        Self {
            fixed_time: Some(fixed_time),
            ..Self::infinite()
        }
    }

    pub fn depth(depth: Depth) -> Self {
        Self {
            depth: Some(depth),
            ..Self::infinite()
        }
    }

    pub fn nodes(nodes: NodesLimit) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::infinite()
        }
    }

    pub fn nodes_(nodes: u64) -> Self {
        Self {
            nodes: NodesLimit::new(nodes),
            ..Self::infinite()
        }
    }

    pub fn with_time(mut self, fixed_time: Duration) -> Self {
        self.fixed_time = Some(fixed_time);
        self
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn is_infinite(&self) -> bool {
        self.fixed_time.is_none() && self.depth.is_none() && self.nodes.is_none()
    }
}

/// Errors that a search can report. Running out of time is deliberately not one of them:
/// a search that runs out of time returns the best move it has found so far.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SearchError {
    #[error("search() called in a position with no legal moves")]
    NoLegalMoves,
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<P: Position> {
    pub chosen_move: P::Move,
    /// The score of the chosen move from the perspective of the player to move at the root, if the engine has one.
    pub score: Option<Score>,
    /// The deepest completed depth, for engines that search to a depth.
    pub depth: Option<Depth>,
    pub nodes: u64,
    pub time: Duration,
}

impl<P: Position> SearchResult<P> {
    pub fn move_only(chosen_move: P::Move) -> Self {
        Self {
            chosen_move,
            score: None,
            depth: None,
            nodes: 0,
            time: Duration::default(),
        }
    }

    pub fn move_and_score(chosen_move: P::Move, score: Score) -> Self {
        Self {
            score: Some(score),
            ..Self::move_only(chosen_move)
        }
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn nps(&self) -> usize {
        let micros = self.time.as_micros() as f64;
        if micros == 0.0 {
            0
        } else {
            ((self.nodes as f64 * 1_000_000.0) / micros) as usize
        }
    }
}

impl<P: Position> Display for SearchResult<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let score = match self.score {
            None => String::new(),
            Some(score) => match score.moves_until_game_won() {
                Some(moves) => format!(" score mate {moves}"),
                None => format!(" score {:.2}", score.0),
            },
        };
        write!(
            f,
            "bestmove {mov}{score}{depth} nodes {nodes} time {time} nps {nps}",
            mov = self.chosen_move.to_compact_text(),
            depth = self.depth.map(|d| format!(" depth {d}")).unwrap_or_default(),
            nodes = self.nodes,
            time = self.time.as_millis(),
            nps = self.nps(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{TicTacToeBoard, TicTacToeMove};
    use crate::score::mated_score;

    #[test]
    fn search_limit_test() {
        assert!(SearchLimit::infinite().is_infinite());
        let limit = SearchLimit::depth(Depth::new(3)).with_time(Duration::from_millis(20));
        assert!(!limit.is_infinite());
        assert_eq!(limit.depth, Some(Depth::new(3)));
        assert_eq!(limit.fixed_time, Some(Duration::from_millis(20)));
        assert_eq!(SearchLimit::nodes_(0).nodes, None);
        assert_eq!(SearchLimit::nodes_(7).nodes.map(NonZeroU64::get), Some(7));
    }

    #[test]
    fn search_result_display_test() {
        let mov = TicTacToeMove::from_compact_text("b2").unwrap();
        let res = SearchResult::<TicTacToeBoard>::move_and_score(mov, -mated_score(3)).with_depth(Depth::new(3));
        let text = res.to_string();
        assert!(text.starts_with("bestmove b2 score mate 2 depth 3"), "{text}");
    }
}
