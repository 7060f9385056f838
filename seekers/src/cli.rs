use std::time::Duration;

use anyhow::bail;
use clap::Parser;

use ruleset::general::common::Res;
use ruleset::search::{Depth, NodesLimit, SearchLimit};

use crate::search::mcts::rollout::RolloutPolicy;
use crate::search::SearcherKind;

/// Used when neither a time, a depth nor a node limit has been given.
pub const DEFAULT_TIME: Duration = Duration::from_secs(5);

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameKind {
    #[default]
    Chess,
    Tictactoe,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Searches a position with one of several engines", long_about = None)]
pub struct Args {
    #[arg(short, long, value_enum, default_value_t = GameKind::Chess)]
    pub game: GameKind,

    #[arg(short, long, value_enum, default_value_t = SearcherKind::AlphaBeta)]
    pub engine: SearcherKind,

    /// The name of the eval, or 'default' for the first eval of the game
    #[arg(long, default_value = "default")]
    pub eval: String,

    /// A well-known position of the game, such as 'kiwipete'
    #[arg(short, long, conflicts_with = "fen")]
    pub position: Option<String>,

    #[arg(short, long)]
    pub fen: Option<String>,

    /// Time per move in seconds
    #[arg(short, long)]
    pub time: Option<f64>,

    /// Search depth for alpha-beta and minimax, maximum depth for iterative deepening, rollout depth for MCTS
    #[arg(long)]
    pub depth: Option<usize>,

    /// Node limit, or iteration limit for MCTS
    #[arg(long)]
    pub nodes: Option<u64>,

    /// Enable quiescence search (alpha-beta and iterative deepening)
    #[arg(short, long)]
    pub quiescence: bool,

    /// Rollout policy for MCTS
    #[arg(long, value_enum)]
    pub rollout: Option<RolloutPolicy>,

    /// Seed for engines that use randomness. Seeded from the OS if not given
    #[arg(long)]
    pub seed: Option<u64>,

    /// Let the engine play against itself for at most this many plies instead of running a single search
    #[arg(long)]
    pub play: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    pub fn limit(&self) -> Res<SearchLimit> {
        let mut limit = SearchLimit::infinite();
        if let Some(time) = self.time {
            if !time.is_finite() || time < 0.0 {
                bail!("The time must be a non-negative number of seconds, not {time}")
            }
            limit = limit.with_time(Duration::from_secs_f64(time));
        }
        if let Some(depth) = self.depth {
            if depth == 0 || depth > Depth::MAX.get() {
                bail!("The depth must be between 1 and {}, not {depth}", Depth::MAX)
            }
            limit = limit.with_depth(Depth::new(depth));
        }
        if let Some(nodes) = self.nodes {
            let Some(nodes) = NodesLimit::new(nodes) else {
                bail!("The node limit must be at least 1")
            };
            limit.nodes = Some(nodes);
        }
        if limit.is_infinite() {
            limit = limit.with_time(DEFAULT_TIME);
        }
        Ok(limit)
    }
}
