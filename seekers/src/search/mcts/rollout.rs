use rand::Rng;
use strum_macros::{EnumIter, EnumString};

use ruleset::general::position::Position;
use ruleset::score::{Score, ScoreT};
use ruleset::{OracleError, PlayerResult, Side};

use crate::eval::Eval;

/// Eval scores are divided by this before being clamped to `[-1, 1]`.
pub const EVAL_SCALE: ScoreT = 1000.0;

/// How moves are chosen during a simulation.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, EnumIter, EnumString, strum_macros::Display, clap::ValueEnum)]
#[strum(ascii_case_insensitive)]
pub enum RolloutPolicy {
    /// Uniformly random legal moves.
    #[default]
    #[strum(serialize = "random")]
    #[value(name = "random")]
    Random,
    /// The move that leaves the opponent with the worst static eval.
    #[strum(to_string = "eval", serialize = "eval-guided")]
    #[value(name = "eval")]
    EvalGuided,
}

/// The result of a finished game from the perspective of `perspective`.
fn terminal_value<P: Position>(pos: &P, perspective: Side) -> f64 {
    let result = match pos.outcome().for_player(perspective) {
        Some(result) => result,
        // no legal moves, but the game doesn't report an outcome
        None if pos.is_in_check() => PlayerResult::Lose.flip_if(pos.active_player() != perspective),
        None => PlayerResult::Draw,
    };
    match result {
        PlayerResult::Win => 1.0,
        PlayerResult::Lose => -1.0,
        PlayerResult::Draw => 0.0,
    }
}

fn is_terminal<P: Position>(pos: &P) -> bool {
    pos.is_game_over() || !pos.has_legal_moves()
}

/// Picks the move after which the opponent's eval is lowest. Ties go to the earlier move.
fn eval_guided_move<P: Position>(pos: &P, eval: &mut dyn Eval<P>) -> Result<Option<P::Move>, OracleError> {
    let mut best: Option<(P::Move, Score)> = None;
    for mov in pos.legal_moves() {
        let score = -eval.eval(&pos.make_move(mov)?);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((mov, score)),
        }
    }
    Ok(best.map(|(mov, _)| mov))
}

/// Plays up to `max_plies` moves from `pos` and returns the result in `[-1, 1]` from the perspective of the player
/// to move in `pos`. Unfinished games are scored with `eval`, or as a draw if there is no eval.
/// An [`RolloutPolicy::EvalGuided`] rollout without an eval plays random moves.
pub fn rollout<P: Position, R: Rng + ?Sized>(
    pos: &P,
    policy: RolloutPolicy,
    max_plies: usize,
    mut eval: Option<&mut dyn Eval<P>>,
    rng: &mut R,
) -> Result<f64, OracleError> {
    let perspective = pos.active_player();
    let mut current = pos.clone();
    for _ in 0..max_plies {
        if is_terminal(&current) {
            return Ok(terminal_value(&current, perspective));
        }
        let mov = match (policy, eval.as_deref_mut()) {
            (RolloutPolicy::EvalGuided, Some(eval)) => eval_guided_move(&current, eval)?,
            _ => current.random_legal_move(rng),
        };
        let Some(mov) = mov else {
            break;
        };
        current = current.make_move(mov)?;
    }
    if is_terminal(&current) {
        return Ok(terminal_value(&current, perspective));
    }
    let Some(eval) = eval else {
        return Ok(0.0);
    };
    let score = eval.eval(&current);
    let score = if current.active_player() == perspective { score } else { -score };
    Ok(score.normalized(EVAL_SCALE))
}
