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

use std::fmt::{Debug, Display};

use arrayvec::ArrayVec;
use itertools::Itertools;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::general::common::{select_name_static, EntityList, GenericSelect, Res, StaticallyNamedEntity};
use crate::general::moves::Move;
use crate::{OracleError, Outcome, PlayerResult, Side};

/// No supported game has more legal moves than this in any position (chess has at most 218).
pub const MAX_MOVES: usize = 256;

pub type MoveList<P> = ArrayVec<<P as Position>::Move, MAX_MOVES>;

pub type NameToPos<P> = GenericSelect<fn() -> Result<P, OracleError>>;

/// A snapshot of a game. This is the only thing a searcher knows about the rules of the game.
///
/// Positions have value semantics: [`Position::make_move`] returns a new position and leaves `self` untouched,
/// and a clone never shares mutable state with the original. Searchers rely on this to explore every branch
/// on its own copy.
pub trait Position: Eq + Clone + Debug + Display + Send + Sync + StaticallyNamedEntity + 'static {
    type Move: Move<Self>;

    /// Returns the name of the game, such as 'chess'.
    #[must_use]
    fn game_name() -> String {
        Self::static_short_name().to_string()
    }

    /// The starting position of the game.
    fn startpos() -> Self;

    /// Parses a textual snapshot of the position, such as a FEN in chess.
    fn from_fen(fen: &str) -> Result<Self, OracleError>;

    /// The inverse of [`Position::from_fen`].
    fn as_fen(&self) -> String;

    /// Returns a Vec mapping well-known position names to their constructor, for example for kiwipete in chess.
    #[must_use]
    fn name_to_pos_map() -> EntityList<NameToPos<Self>> {
        vec![NameToPos {
            name: "startpos",
            val: || Ok(Self::startpos()),
        }]
    }

    /// Constructs a specific, well-known position from its name, such as 'kiwipete' in chess.
    /// Not to be confused with `from_fen`, which can load arbitrary positions.
    fn from_name(name: &str) -> Res<Self> {
        let map = Self::name_to_pos_map();
        let entry = select_name_static(name, map.iter(), "position", &Self::game_name())?;
        Ok((entry.val)()?)
    }

    #[must_use]
    fn bench_positions() -> Vec<Self> {
        Self::name_to_pos_map()
            .iter()
            .filter_map(|f| (f.val)().ok())
            .collect_vec()
    }

    /// The player who can now move.
    fn active_player(&self) -> Side;

    /// All legal moves. The order is deterministic: the same position always produces the same sequence.
    /// An empty list means that the player to move can't move, which (among others) is the case for checkmate
    /// and stalemate.
    fn legal_moves(&self) -> MoveList<Self>;

    fn has_legal_moves(&self) -> bool {
        !self.legal_moves().is_empty()
    }

    fn is_move_legal(&self, mov: Self::Move) -> bool {
        self.legal_moves().contains(&mov)
    }

    /// Returns the position after playing `mov`. Fails with [`OracleError::IllegalMove`] if `mov` isn't legal.
    fn make_move(&self, mov: Self::Move) -> Result<Self, OracleError>;

    /// Is the player to move currently threatened with losing? In chess, this means being in check.
    /// Used to tell a lost position apart from a drawn one when there are no legal moves.
    fn is_in_check(&self) -> bool;

    fn is_checkmate(&self) -> bool {
        self.is_in_check() && !self.has_legal_moves()
    }

    fn is_stalemate(&self) -> bool {
        !self.is_in_check() && !self.has_legal_moves()
    }

    /// True iff the game has ended, either because there are no legal moves or because of another rule,
    /// such as insufficient material or repetitions in chess.
    fn is_game_over(&self) -> bool {
        self.outcome().is_decided()
    }

    fn outcome(&self) -> Outcome;

    /// The outcome from the perspective of the player to move, or `None` if the game isn't over.
    fn player_result(&self) -> Option<PlayerResult> {
        self.outcome().for_player(self.active_player())
    }

    fn random_legal_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Self::Move> {
        self.legal_moves().as_slice().choose(rng).copied()
    }
}
