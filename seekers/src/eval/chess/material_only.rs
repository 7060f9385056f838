use chess::{Piece, ALL_PIECES, NUM_PIECES};

use ruleset::games::chess::ChessPosition;
use ruleset::general::common::StaticallyNamedEntity;
use ruleset::general::position::Position;
use ruleset::score::{Score, ScoreT};
use ruleset::Side;

use crate::eval::Eval;

/// Indexed by [`Piece::to_index`]: pawn, knight, bishop, rook, queen, king.
pub const DEFAULT_PIECE_VALUES: [ScoreT; NUM_PIECES] = [100.0, 320.0, 330.0, 500.0, 900.0, 20_000.0];

#[derive(Debug, Copy, Clone)]
pub struct MaterialOnlyEval {
    values: [ScoreT; NUM_PIECES],
}

impl Default for MaterialOnlyEval {
    fn default() -> Self {
        Self::with_values(DEFAULT_PIECE_VALUES)
    }
}

impl MaterialOnlyEval {
    pub fn with_values(values: [ScoreT; NUM_PIECES]) -> Self {
        Self { values }
    }

    pub fn value(&self, piece: Piece) -> ScoreT {
        self.values[piece.to_index()]
    }

    fn material(&self, pos: &ChessPosition, side: Side) -> ScoreT {
        ALL_PIECES
            .iter()
            .map(|&piece| pos.piece_count(piece, side) as ScoreT * self.value(piece))
            .sum()
    }
}

impl StaticallyNamedEntity for MaterialOnlyEval {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "material"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Material Only Eval".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "Counts the material of both players and ignores everything else".to_string()
    }
}

impl Eval<ChessPosition> for MaterialOnlyEval {
    fn eval(&mut self, pos: &ChessPosition) -> Score {
        let us = pos.active_player();
        Score(self.material(pos, us) - self.material(pos, us.other()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_test() {
        let mut eval = MaterialOnlyEval::default();
        assert_eq!(eval.eval(&ChessPosition::startpos()), Score(0.0));
        // white is a knight up, black to move
        let pos = ChessPosition::from_fen("rnbqkb1r/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(eval.eval(&pos), Score(-320.0));
        let pos = ChessPosition::from_fen("rnbqkb1r/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(eval.eval(&pos), Score(320.0));
        let mut custom = MaterialOnlyEval::with_values([1.0, 3.0, 3.0, 5.0, 9.0, 0.0]);
        assert_eq!(custom.eval(&pos), Score(3.0));
        assert_eq!(custom.value(Piece::Queen), 9.0);
    }
}
