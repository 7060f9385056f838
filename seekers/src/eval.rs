use std::fmt::Debug;

use dyn_clone::DynClone;

use ruleset::games::chess::ChessPosition;
use ruleset::games::tictactoe::TicTacToeBoard;
use ruleset::general::common::{select_name_static, EntityList, GenericSelect, Res, StaticallyNamedEntity};
use ruleset::general::position::Position;
use ruleset::score::Score;

use crate::eval::chess::material_only::MaterialOnlyEval;
use crate::eval::neutral::NeutralEval;
use crate::eval::tictactoe::lines::LinesEval;

pub mod chess;
pub mod neutral;
pub mod tictactoe;

/// A static evaluation function. The returned score is from the perspective of the player to move:
/// positive scores are good for that player. Searchers never assume that calling this twice on the same position
/// is free, and evals never see positions without legal moves when used by the alpha-beta searcher.
pub trait Eval<P: Position>: Debug + Send + Sync + StaticallyNamedEntity + DynClone + 'static {
    fn eval(&mut self, pos: &P) -> Score;
}

dyn_clone::clone_trait_object!(<P> Eval<P> where P: Position);

pub type EvalBuilder<P> = GenericSelect<fn() -> Box<dyn Eval<P>>>;

pub type EvalList<P> = EntityList<EvalBuilder<P>>;

/// Games that come with evaluation functions. The first entry of [`EvaluatedGame::evals`] is the default.
pub trait EvaluatedGame: Position {
    fn evals() -> EvalList<Self>;

    fn default_eval() -> Box<dyn Eval<Self>> {
        match Self::evals().first() {
            Some(builder) => (builder.val)(),
            None => Box::new(NeutralEval::default()),
        }
    }

    /// `default` selects the default eval, anything else is looked up by name.
    fn eval_by_name(name: &str) -> Res<Box<dyn Eval<Self>>> {
        if name.eq_ignore_ascii_case("default") {
            return Ok(Self::default_eval());
        }
        let list = Self::evals();
        let builder = select_name_static(name, list.iter(), "eval", &Self::game_name())?;
        Ok((builder.val)())
    }
}

fn builder<P: Position, E: Eval<P> + Default>() -> EvalBuilder<P> {
    EvalBuilder {
        name: E::static_short_name(),
        val: || -> Box<dyn Eval<P>> { Box::new(E::default()) },
    }
}

impl EvaluatedGame for ChessPosition {
    fn evals() -> EvalList<Self> {
        vec![builder::<Self, MaterialOnlyEval>(), builder::<Self, NeutralEval>()]
    }
}

impl EvaluatedGame for TicTacToeBoard {
    fn evals() -> EvalList<Self> {
        vec![builder::<Self, LinesEval>(), builder::<Self, NeutralEval>()]
    }
}
