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

use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::general::position::Position;
use crate::OracleError;

/// A move is a small immutable value. Moves are compared and hashed structurally,
/// which allows them to be used as keys, e.g. for the children of an MCTS node.
pub trait Move<P: Position>: Eq + Copy + Clone + Debug + Display + Hash + Send + Sync + 'static {
    /// Tactical moves can drastically change the position and are the only moves looked at in quiescence search.
    /// In chess, these are captures and checks. Always returning `false` is a valid choice.
    fn is_tactical(self, pos: &P) -> bool;

    /// Compact text representation, e.g. for chess it's `<from><to><promo_piece_if_present>`.
    fn format_compact(self, f: &mut Formatter<'_>) -> fmt::Result;

    /// Parse a compact text representation emitted by `format_compact`.
    /// This does not check that the move is legal in any position, see [`Move::from_text`] for that.
    fn from_compact_text(s: &str) -> Result<Self, OracleError>;

    fn to_compact_text(self) -> String {
        CompactFormatter::<P, Self>::new(self).to_string()
    }

    /// Parses the compact representation and makes sure that the move can be played in `pos`.
    fn from_text(s: &str, pos: &P) -> Result<Self, OracleError>
    where
        P: Position<Move = Self>,
    {
        let mov = Self::from_compact_text(s)?;
        if pos.is_move_legal(mov) {
            Ok(mov)
        } else {
            Err(OracleError::IllegalMove {
                mov: s.to_string(),
                position: pos.as_fen(),
            })
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CompactFormatter<P: Position, M: Move<P>> {
    mov: M,
    _phantom: PhantomData<P>,
}

impl<P: Position, M: Move<P>> CompactFormatter<P, M> {
    pub fn new(mov: M) -> Self {
        Self {
            mov,
            _phantom: PhantomData,
        }
    }
}

impl<P: Position, M: Move<P>> Display for CompactFormatter<P, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.mov.format_compact(f)
    }
}
