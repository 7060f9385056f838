use log::warn;

use ruleset::general::common::{NamedEntity, Res, StaticallyNamedEntity};
use ruleset::general::position::Position;
use ruleset::score::{mated_score, Score, SCORE_DRAW, SCORE_INFINITY, SCORE_TIME_UP};
use ruleset::search::{Depth, SearchError, SearchLimit, SearchResult};

use crate::eval::Eval;
use crate::search::alpha_beta::DEFAULT_DEPTH;
use crate::search::statistics::SearchType::MainSearch;
use crate::search::statistics::Statistics;
use crate::search::{Engine, EngineInfo, EngineOptionName, SearchClock};

/// Plain negamax without any pruning. Visits every node up to the given depth, which makes it slow but easy to
/// trust: alpha-beta must always agree with it.
#[derive(Debug, Clone)]
pub struct Minimax<P: Position> {
    eval: Box<dyn Eval<P>>,
    depth: Depth,
    statistics: Statistics,
    stopped: bool,
}

impl<P: Position> Minimax<P> {
    pub fn with_eval(eval: Box<dyn Eval<P>>) -> Self {
        Self {
            eval,
            depth: DEFAULT_DEPTH,
            statistics: Statistics::default(),
            stopped: false,
        }
    }

    fn negamax(&mut self, pos: &P, depth: usize, ply: usize, clock: &SearchClock) -> Result<Score, SearchError> {
        self.statistics.count_node(MainSearch);
        if !self.stopped && clock.should_stop(self.statistics.nodes()) {
            self.stopped = true;
        }
        if self.stopped {
            return Ok(SCORE_TIME_UP);
        }
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Ok(if pos.is_in_check() { mated_score(ply) } else { SCORE_DRAW });
        }
        if depth == 0 || pos.is_game_over() {
            return Ok(self.eval.eval(pos));
        }
        let mut best_score = -SCORE_INFINITY;
        for mov in moves {
            let score = -self.negamax(&pos.make_move(mov)?, depth - 1, ply + 1, clock)?;
            if self.stopped {
                return Ok(SCORE_TIME_UP);
            }
            best_score = best_score.max(score);
        }
        Ok(best_score)
    }
}

impl<P: Position> StaticallyNamedEntity for Minimax<P> {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "minimax"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Minimax".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "An exhaustive fixed depth negamax search without pruning".to_string()
    }
}

impl<P: Position> Engine<P> for Minimax<P> {
    fn do_search(&mut self, pos: &P, limit: SearchLimit) -> Result<SearchResult<P>, SearchError> {
        let depth = limit.depth.unwrap_or(self.depth).max(Depth::new(1));
        let clock = SearchClock::start(&limit);
        self.stopped = false;
        let moves = pos.legal_moves();
        let mut best: Option<(P::Move, Score)> = None;
        for &mov in &moves {
            let score = -self.negamax(&pos.make_move(mov)?, depth.get() - 1, 1, &clock)?;
            if self.stopped {
                break;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((mov, score)),
            }
        }
        Ok(match best {
            Some((mov, score)) if !self.stopped => {
                self.statistics.set_depth(depth.get());
                SearchResult::move_and_score(mov, score).with_depth(depth)
            }
            Some((mov, score)) => SearchResult::move_and_score(mov, score),
            None => {
                warn!("{}: out of time before the first move was searched", self.short_name());
                SearchResult::move_only(moves[0])
            }
        })
    }

    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    fn engine_info(&self) -> EngineInfo {
        EngineInfo::new(self, Some(&*self.eval), vec![EngineOptionName::Depth])
    }

    fn set_eval(&mut self, eval: Box<dyn Eval<P>>) {
        self.eval = eval;
    }

    fn set_option(&mut self, option: EngineOptionName, value: &str) -> Res<()> {
        if option != EngineOptionName::Depth {
            anyhow::bail!("The engine '{}' doesn't support the option '{option}'", self.long_name())
        }
        self.depth = option.parse_depth(value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ruleset::games::tictactoe::TicTacToeBoard;

    use crate::eval::EvaluatedGame;

    use super::*;

    #[test]
    fn node_count_test() {
        let pos = TicTacToeBoard::startpos();
        let mut engine = Minimax::with_eval(TicTacToeBoard::default_eval());
        let res = engine.search(&pos, SearchLimit::depth(Depth::new(2))).unwrap();
        // 9 children of the root, each with 8 children
        assert_eq!(engine.nodes(), 9 + 9 * 8);
        assert_eq!(res.depth, Some(Depth::new(2)));

        let pos = TicTacToeBoard::from_name("win_in_1").unwrap();
        let res = engine.search(&pos, SearchLimit::depth(Depth::new(1))).unwrap();
        assert_eq!(res.chosen_move.to_string(), "c3");
        assert_eq!(res.score, Some(-mated_score(1)));
    }
}
