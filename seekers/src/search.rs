use std::fmt::{Debug, Display, Formatter};
use std::time::{Duration, Instant};

use anyhow::bail;
use colored::Colorize;
use dyn_clone::DynClone;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum_macros::{EnumIter, EnumString};

use ruleset::general::common::{parse_bool_from_str, parse_fp_from_str, parse_int_from_str, Res, StaticallyNamedEntity};
use ruleset::general::position::{MoveList, Position};
use ruleset::search::{Depth, SearchError, SearchLimit, SearchResult};

use crate::eval::{Eval, EvaluatedGame};
use crate::search::alpha_beta::AlphaBeta;
use crate::search::iterative_deepening::IterativeDeepening;
use crate::search::mcts::Mcts;
use crate::search::minimax::Minimax;
use crate::search::random_mover::RandomMover;
use crate::search::statistics::Statistics;

pub mod alpha_beta;
pub mod iterative_deepening;
pub mod mcts;
pub mod minimax;
pub mod random_mover;
pub mod statistics;

/// Random number generators that can be injected into engines, so that searches can be reproduced.
pub trait SeedRng: Rng + SeedableRng + Clone + Debug + Send + Sync + 'static {}

impl<T> SeedRng for T where T: Rng + SeedableRng + Clone + Debug + Send + Sync + 'static {}

/// Options that can be changed at runtime with [`Engine::set_option`]. Not every engine supports every option.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter, EnumString, strum_macros::Display)]
#[strum(ascii_case_insensitive)]
pub enum EngineOptionName {
    Depth,
    Quiescence,
    QuiescenceDepth,
    ExplorationWeight,
    RolloutDepth,
    Rollout,
}

impl EngineOptionName {
    pub fn parse_depth(self, value: &str) -> Res<Depth> {
        let depth: usize = parse_int_from_str(value, &self.to_string())?;
        if depth == 0 || depth > Depth::MAX.get() {
            bail!("{self} must be between 1 and {}, not {depth}", Depth::MAX)
        }
        Ok(Depth::new(depth))
    }

    pub fn parse_bool(self, value: &str) -> Res<bool> {
        parse_bool_from_str(value, &self.to_string())
    }

    pub fn parse_positive_float(self, value: &str) -> Res<f64> {
        let val: f64 = parse_fp_from_str(value, &self.to_string())?;
        if !val.is_finite() || val < 0.0 {
            bail!("{self} must be a non-negative number, not {val}")
        }
        Ok(val)
    }
}

#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub short_name: String,
    pub long_name: String,
    pub eval: Option<String>,
    pub version: String,
    pub options: Vec<EngineOptionName>,
}

impl EngineInfo {
    pub fn new<P: Position, E: Engine<P>>(engine: &E, eval: Option<&dyn Eval<P>>, options: Vec<EngineOptionName>) -> Self {
        Self {
            short_name: engine.short_name(),
            long_name: engine.long_name(),
            eval: eval.map(|e| e.short_name()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            options,
        }
    }
}

impl Display for EngineInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.long_name.bold(), self.version)?;
        if let Some(eval) = &self.eval {
            write!(f, ", eval {}", eval.bold())?;
        }
        if !self.options.is_empty() {
            write!(f, ", options: {}", self.options.iter().join(", "))?;
        }
        Ok(())
    }
}

/// The wall clock (and node budget) of a single search. Searches poll it cooperatively; nothing is ever interrupted.
#[derive(Debug, Copy, Clone)]
pub struct SearchClock {
    start: Instant,
    fixed_time: Option<Duration>,
    nodes: Option<u64>,
}

impl SearchClock {
    pub fn start(limit: &SearchLimit) -> Self {
        Self {
            start: Instant::now(),
            fixed_time: limit.fixed_time,
            nodes: limit.nodes.map(|n| n.get()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// `None` if there is no time limit.
    pub fn remaining(&self) -> Option<Duration> {
        self.fixed_time.map(|t| t.saturating_sub(self.elapsed()))
    }

    pub fn time_up(&self) -> bool {
        self.fixed_time.is_some_and(|t| self.elapsed() >= t)
    }

    pub fn should_stop(&self, nodes: u64) -> bool {
        self.nodes.is_some_and(|max| nodes >= max) || self.time_up()
    }
}

/// Returns the move if there is exactly one. Searchers play it without looking at the tree.
pub fn only_move<P: Position>(moves: &MoveList<P>) -> Option<P::Move> {
    match moves.as_slice() {
        [mov] => Some(*mov),
        _ => None,
    }
}

/// A searcher, possibly combined with an eval. Engines own all of their state, so two engines can search the same
/// position on two threads at the same time; the position itself is only ever read.
pub trait Engine<P: Position>: StaticallyNamedEntity + Send + DynClone + 'static {
    /// The algorithm itself. Called by [`Engine::search`] after the statistics have been reset and the position has
    /// been checked for legal moves.
    fn do_search(&mut self, pos: &P, limit: SearchLimit) -> Result<SearchResult<P>, SearchError>;

    fn statistics(&self) -> &Statistics;

    fn statistics_mut(&mut self) -> &mut Statistics;

    fn engine_info(&self) -> EngineInfo;

    /// Engines without an eval ignore this.
    fn set_eval(&mut self, _eval: Box<dyn Eval<P>>) {}

    fn set_option(&mut self, option: EngineOptionName, value: &str) -> Res<()> {
        bail!(
            "The engine '{name}' doesn't support setting custom options, including setting '{option}' to '{value}'",
            name = self.long_name()
        )
    }

    /// Searches `pos` within `limit` and returns the chosen move. The node counter is reset first.
    /// Running out of time is not an error; the best move found so far is returned instead.
    fn search(&mut self, pos: &P, limit: SearchLimit) -> Result<SearchResult<P>, SearchError> {
        self.statistics_mut().reset();
        if !pos.has_legal_moves() {
            return Err(SearchError::NoLegalMoves);
        }
        let start = Instant::now();
        let mut res = self.do_search(pos, limit)?;
        res.time = start.elapsed();
        res.nodes = self.nodes();
        debug!("{name}: {res} ({stats})", name = self.short_name(), stats = self.statistics());
        Ok(res)
    }

    /// The narrow contract: a position and optional time and depth limits in, a move out.
    fn best_move(
        &mut self,
        pos: &P,
        time_limit: Option<Duration>,
        depth_limit: Option<Depth>,
    ) -> Result<P::Move, SearchError> {
        self.search(pos, SearchLimit::new(time_limit, depth_limit))
            .map(|res| res.chosen_move)
    }

    /// The number of nodes searched by the most recent call to `search`.
    fn nodes(&self) -> u64 {
        self.statistics().nodes()
    }
}

dyn_clone::clone_trait_object!(<P> Engine<P> where P: Position);

/// The algorithm families that can be selected by name.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, EnumIter, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SearcherKind {
    #[default]
    AlphaBeta,
    IterativeDeepening,
    Mcts,
    Minimax,
    Random,
}

impl SearcherKind {
    /// Builds an engine of this kind. `seed` only matters for engines that use randomness; without one,
    /// they are seeded from the OS.
    pub fn build<P: EvaluatedGame>(self, eval: Box<dyn Eval<P>>, seed: Option<u64>) -> Box<dyn Engine<P>> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        match self {
            SearcherKind::AlphaBeta => Box::new(AlphaBeta::with_eval(eval)),
            SearcherKind::IterativeDeepening => Box::new(IterativeDeepening::with_eval(eval)),
            SearcherKind::Mcts => Box::new(Mcts::new(Some(eval), rng)),
            SearcherKind::Minimax => Box::new(Minimax::with_eval(eval)),
            SearcherKind::Random => Box::new(RandomMover::<P, StdRng>::with_rng(rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::thread;

    use strum::IntoEnumIterator;

    use ruleset::games::chess::ChessPosition;
    use ruleset::games::tictactoe::TicTacToeBoard;
    use ruleset::general::moves::Move;
    use ruleset::search::NodesLimit;

    use super::*;

    #[test]
    fn option_name_test() {
        assert_eq!(EngineOptionName::from_str("depth").unwrap(), EngineOptionName::Depth);
        assert_eq!(EngineOptionName::from_str("explorationweight").unwrap(), EngineOptionName::ExplorationWeight);
        assert!(EngineOptionName::from_str("hash").is_err());
        assert_eq!(EngineOptionName::Depth.parse_depth("5").unwrap(), Depth::new(5));
        assert!(EngineOptionName::Depth.parse_depth("0").is_err());
        assert!(EngineOptionName::Depth.parse_depth("deep").is_err());
        assert!(EngineOptionName::ExplorationWeight.parse_positive_float("-1").is_err());
        assert!(EngineOptionName::Quiescence.parse_bool("on").unwrap());
    }

    #[test]
    fn clock_test() {
        let clock = SearchClock::start(&SearchLimit::per_move(Duration::ZERO));
        assert!(clock.time_up());
        assert_eq!(clock.remaining(), Some(Duration::ZERO));
        let clock = SearchClock::start(&SearchLimit::nodes(NodesLimit::new(10).unwrap()));
        assert!(!clock.should_stop(9));
        assert!(clock.should_stop(10));
        assert_eq!(clock.remaining(), None);
        assert!(!SearchClock::start(&SearchLimit::infinite()).should_stop(u64::MAX));
    }

    #[test]
    fn every_kind_finds_a_legal_move_test() {
        let pos = TicTacToeBoard::startpos();
        for kind in SearcherKind::iter() {
            let mut engine = kind.build(TicTacToeBoard::default_eval(), Some(1));
            let limit = SearchLimit::depth(Depth::new(2)).with_time(Duration::from_millis(200));
            let mov = engine.search(&pos, limit).unwrap().chosen_move;
            assert!(pos.is_move_legal(mov), "{kind}");
            assert!(!engine.engine_info().short_name.is_empty());
        }
    }

    #[test]
    fn no_legal_moves_test() {
        let mate = ChessPosition::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        let stalemate = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        for kind in SearcherKind::iter() {
            let mut engine = kind.build(ChessPosition::default_eval(), Some(0));
            for pos in [&mate, &stalemate] {
                let res = engine.best_move(pos, Some(Duration::from_millis(10)), None);
                assert_eq!(res, Err(SearchError::NoLegalMoves), "{kind}");
            }
        }
    }

    #[test]
    fn single_move_short_circuit_test() {
        let pos = ChessPosition::from_fen("7k/8/8/8/8/8/6R1/K7 b - - 0 1").unwrap();
        let expected = <ChessPosition as Position>::Move::from_compact_text("h8h7").unwrap();
        for kind in [SearcherKind::AlphaBeta, SearcherKind::IterativeDeepening, SearcherKind::Mcts] {
            let mut engine = kind.build(ChessPosition::default_eval(), Some(0));
            let res = engine.search(&pos, SearchLimit::depth(Depth::new(4))).unwrap();
            assert_eq!(res.chosen_move, expected, "{kind}");
            assert_eq!(engine.nodes(), 0, "{kind}");
            assert_eq!(engine.statistics().iterations(), 0, "{kind}");
        }
    }

    #[test]
    fn concurrent_searches_test() {
        let pos = ChessPosition::from_name("kiwipete").unwrap();
        let engine = SearcherKind::AlphaBeta.build(ChessPosition::default_eval(), None);
        let limit = SearchLimit::depth(Depth::new(2));
        let (first, second) = thread::scope(|s| {
            let mut a = engine.clone();
            let mut b = engine.clone();
            let pos_a = &pos;
            let pos_b = &pos;
            let a = s.spawn(move || a.search(pos_a, limit).unwrap());
            let b = s.spawn(move || b.search(pos_b, limit).unwrap());
            (a.join().unwrap(), b.join().unwrap())
        });
        assert_eq!(first.chosen_move, second.chosen_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(pos, ChessPosition::from_name("kiwipete").unwrap());
    }
}
