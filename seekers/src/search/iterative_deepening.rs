use log::{debug, warn};

use ruleset::general::common::{NamedEntity, Res, StaticallyNamedEntity};
use ruleset::general::position::Position;
use ruleset::search::{Depth, SearchError, SearchLimit, SearchResult};

use crate::eval::Eval;
use crate::search::alpha_beta::AlphaBeta;
use crate::search::statistics::Statistics;
use crate::search::{only_move, Engine, EngineInfo, EngineOptionName, SearchClock};

pub const DEFAULT_MAX_DEPTH: Depth = Depth::new(10);

/// Runs [`AlphaBeta`] with increasing depths until the depth limit is reached or the time is up.
/// Only completed iterations count: the result of an iteration that was interrupted is thrown away.
#[derive(Debug, Clone)]
pub struct IterativeDeepening<P: Position> {
    inner: AlphaBeta<P>,
    max_depth: Depth,
}

impl<P: Position> IterativeDeepening<P> {
    pub fn with_eval(eval: Box<dyn Eval<P>>) -> Self {
        Self::new(AlphaBeta::with_eval(eval))
    }

    pub fn new(inner: AlphaBeta<P>) -> Self {
        Self {
            inner,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn max_depth(&self) -> Depth {
        self.max_depth
    }
}

impl<P: Position> StaticallyNamedEntity for IterativeDeepening<P> {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "iterative-deepening"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Iterative Deepening Alpha-Beta".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "Repeats an alpha-beta search with increasing depth and keeps the result of the deepest completed iteration"
            .to_string()
    }
}

impl<P: Position> Engine<P> for IterativeDeepening<P> {
    fn do_search(&mut self, pos: &P, limit: SearchLimit) -> Result<SearchResult<P>, SearchError> {
        let moves = pos.legal_moves();
        if let Some(mov) = only_move::<P>(&moves) {
            return Ok(SearchResult::move_only(mov));
        }
        let max_depth = limit.depth.unwrap_or(self.max_depth).max(Depth::new(1));
        let clock = SearchClock::start(&limit);
        let mut best = None;
        for depth in 1..=max_depth.get() {
            if clock.should_stop(self.inner.statistics().nodes()) {
                break;
            }
            let depth = Depth::new(depth);
            if let Some(remaining) = clock.remaining() {
                debug!("{}: starting depth {depth} with {}ms left", self.short_name(), remaining.as_millis());
            }
            let res = self.inner.search_root(pos, &moves, depth, &clock)?;
            if self.inner.was_interrupted() {
                debug!("{}: discarding the incomplete iteration at depth {depth}", self.short_name());
                break;
            }
            if let Some((mov, score)) = res {
                debug!("{}: depth {depth}, best move {mov}, score {score}", self.short_name());
                self.inner.statistics_mut().set_depth(depth.get());
                best = Some(SearchResult::move_and_score(mov, score).with_depth(depth));
            }
        }
        Ok(best.unwrap_or_else(|| {
            warn!("{}: not even depth 1 could be completed, playing the first legal move", self.short_name());
            SearchResult::move_only(moves[0])
        }))
    }

    fn statistics(&self) -> &Statistics {
        self.inner.statistics()
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        self.inner.statistics_mut()
    }

    fn engine_info(&self) -> EngineInfo {
        let mut info = self.inner.engine_info();
        info.short_name = self.short_name();
        info.long_name = self.long_name();
        info
    }

    fn set_eval(&mut self, eval: Box<dyn Eval<P>>) {
        self.inner.set_eval(eval);
    }

    /// The depth option sets the maximum depth; every other option is passed on to the inner search.
    fn set_option(&mut self, option: EngineOptionName, value: &str) -> Res<()> {
        match option {
            EngineOptionName::Depth => {
                self.max_depth = option.parse_depth(value)?;
                Ok(())
            }
            _ => self.inner.set_option(option, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ruleset::games::chess::ChessPosition;
    use ruleset::games::tictactoe::TicTacToeBoard;
    use ruleset::general::moves::Move;

    use crate::eval::EvaluatedGame;

    use super::*;

    #[test]
    fn same_as_fixed_depth_test() {
        let pos = ChessPosition::from_name("kiwipete").unwrap();
        let limit = SearchLimit::depth(Depth::new(3));
        let mut id = IterativeDeepening::with_eval(ChessPosition::default_eval());
        let mut fixed = AlphaBeta::with_eval(ChessPosition::default_eval());
        let deepened = id.search(&pos, limit).unwrap();
        let direct = fixed.search(&pos, limit).unwrap();
        assert_eq!(deepened.chosen_move, direct.chosen_move);
        assert_eq!(deepened.score, direct.score);
        assert_eq!(deepened.depth, Some(Depth::new(3)));
        assert_eq!(id.statistics().depth(), 3);
        // the nodes of every iteration are counted
        assert!(id.nodes() > fixed.nodes());
    }

    #[test]
    fn deterministic_test() {
        let pos = ChessPosition::from_name("kiwipete").unwrap();
        let mut engine = IterativeDeepening::with_eval(ChessPosition::default_eval());
        let limit = SearchLimit::depth(Depth::new(3));
        let first = engine.search(&pos, limit).unwrap();
        let nodes = engine.nodes();
        let second = engine.search(&pos, limit).unwrap();
        assert_eq!(first.chosen_move, second.chosen_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.depth, second.depth);
        assert_eq!(nodes, engine.nodes());
        let mut other = IterativeDeepening::with_eval(ChessPosition::default_eval());
        assert_eq!(other.search(&pos, limit).unwrap().chosen_move, first.chosen_move);
        assert_eq!(other.nodes(), nodes);
    }

    #[test]
    fn mate_test() {
        let pos = ChessPosition::from_name("mate_in_1").unwrap();
        let mut engine = IterativeDeepening::with_eval(ChessPosition::default_eval());
        let res = engine.search(&pos, SearchLimit::depth(Depth::new(3))).unwrap();
        assert_eq!(res.chosen_move, <ChessPosition as Position>::Move::from_compact_text("a1a8").unwrap());
        assert!(res.score.unwrap().is_game_won_score());
    }

    #[test]
    fn time_limit_test() {
        let pos = ChessPosition::from_name("kiwipete").unwrap();
        let mut engine = IterativeDeepening::with_eval(ChessPosition::default_eval());
        let res = engine.search(&pos, SearchLimit::per_move(Duration::ZERO)).unwrap();
        assert_eq!(res.chosen_move, pos.legal_moves()[0]);
        assert_eq!(res.depth, None);

        let res = engine.search(&pos, SearchLimit::per_move(Duration::from_millis(200))).unwrap();
        assert!(pos.is_move_legal(res.chosen_move));
        let depth = res.depth.unwrap();
        assert!(depth.get() >= 1 && depth <= DEFAULT_MAX_DEPTH);
        assert_eq!(engine.statistics().depth(), depth.get());
    }

    #[test]
    fn options_test() {
        let mut engine = IterativeDeepening::with_eval(TicTacToeBoard::default_eval());
        engine.set_option(EngineOptionName::Depth, "3").unwrap();
        assert_eq!(engine.max_depth(), Depth::new(3));
        engine.set_option(EngineOptionName::Quiescence, "true").unwrap();
        assert!(engine.set_option(EngineOptionName::RolloutDepth, "3").is_err());
        let res = engine.search(&TicTacToeBoard::startpos(), SearchLimit::infinite()).unwrap();
        assert_eq!(res.depth, Some(Depth::new(3)));
        assert_eq!(engine.engine_info().short_name, "iterative-deepening");
    }
}
