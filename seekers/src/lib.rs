use ruleset::games::chess::ChessPosition;
use ruleset::games::tictactoe::TicTacToeBoard;
use ruleset::general::common::Res;

use crate::cli::{Args, GameKind};
use crate::eval::EvaluatedGame;
use crate::play::play_game;
use crate::search::EngineOptionName;

pub mod cli;
pub mod eval;
pub mod play;
pub mod search;

pub fn run_program(args: &Args) -> Res<()> {
    match args.game {
        GameKind::Chess => run_for::<ChessPosition>(args),
        GameKind::Tictactoe => run_for::<TicTacToeBoard>(args),
    }
}

fn run_for<P: EvaluatedGame>(args: &Args) -> Res<()> {
    let pos = match (&args.fen, &args.position) {
        (Some(fen), _) => P::from_fen(fen)?,
        (None, Some(name)) => P::from_name(name)?,
        (None, None) => P::startpos(),
    };
    let limit = args.limit()?;
    let mut engine = args.engine.build(P::eval_by_name(&args.eval)?, args.seed);
    if args.quiescence {
        engine.set_option(EngineOptionName::Quiescence, "true")?;
    }
    if let Some(policy) = args.rollout {
        engine.set_option(EngineOptionName::Rollout, &policy.to_string())?;
    }
    println!("{}", engine.engine_info());

    if let Some(plies) = args.play {
        let mut opponent = engine.clone();
        let record = play_game(&mut *engine, &mut *opponent, &pos, limit, Some(plies))?;
        println!("{record}");
    } else {
        println!("{}", pos.as_fen());
        let res = engine.search(&pos, limit)?;
        println!("{res}");
        println!("{}", engine.statistics());
    }
    Ok(())
}
