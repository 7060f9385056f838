use ruleset::general::common::StaticallyNamedEntity;
use ruleset::general::position::Position;
use ruleset::score::{Score, SCORE_DRAW};

use crate::eval::Eval;

/// Scores every position as a draw. With this eval, alpha-beta only reacts to checkmates and stalemates,
/// and MCTS rollouts that don't reach the end of the game count as draws.
#[derive(Debug, Default, Copy, Clone)]
pub struct NeutralEval {}

impl StaticallyNamedEntity for NeutralEval {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "neutral"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Neutral Eval".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "An eval that returns 0 for every position".to_string()
    }
}

impl<P: Position> Eval<P> for NeutralEval {
    fn eval(&mut self, _pos: &P) -> Score {
        SCORE_DRAW
    }
}
