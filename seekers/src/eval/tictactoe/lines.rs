use ruleset::games::tictactoe::{TicTacToeBoard, LINES};
use ruleset::general::common::StaticallyNamedEntity;
use ruleset::general::position::Position;
use ruleset::score::{Score, ScoreT};
use ruleset::Side;

use crate::eval::Eval;

const OPEN_LINE: ScoreT = 10.0;
/// Two marks in a line that is still open.
const THREAT: ScoreT = 40.0;

#[derive(Debug, Default, Copy, Clone)]
pub struct LinesEval {}

fn eval_player(pos: &TicTacToeBoard, side: Side) -> ScoreT {
    let ours = pos.bitboard(side);
    let threats = LINES
        .iter()
        .filter(|&&line| line & pos.bitboard(side.other()) == 0 && (line & ours).count_ones() == 2)
        .count();
    pos.open_lines(side) as ScoreT * OPEN_LINE + threats as ScoreT * THREAT
}

impl StaticallyNamedEntity for LinesEval {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "lines"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Open Lines Eval".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "Counts the lines that each player can still complete, with a bonus for lines that only need one more mark"
            .to_string()
    }
}

impl Eval<TicTacToeBoard> for LinesEval {
    fn eval(&mut self, pos: &TicTacToeBoard) -> Score {
        let us = pos.active_player();
        Score(eval_player(pos, us) - eval_player(pos, us.other()))
    }
}
