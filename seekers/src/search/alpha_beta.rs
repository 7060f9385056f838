use log::warn;

use ruleset::general::common::{NamedEntity, Res, StaticallyNamedEntity};
use ruleset::general::moves::Move;
use ruleset::general::position::Position;
use ruleset::score::{mated_score, Score, SCORE_DRAW, SCORE_INFINITY, SCORE_TIME_UP};
use ruleset::search::{Depth, SearchError, SearchLimit, SearchResult};

use crate::eval::Eval;
use crate::search::statistics::SearchType::{MainSearch, Qsearch};
use crate::search::statistics::Statistics;
use crate::search::{only_move, Engine, EngineInfo, EngineOptionName, SearchClock};

pub const DEFAULT_DEPTH: Depth = Depth::new(4);
pub const DEFAULT_QUIESCENCE_DEPTH: Depth = Depth::new(4);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AlphaBetaConfig {
    /// Used when the search limit doesn't specify a depth.
    pub depth: Depth,
    pub quiescence: bool,
    /// Maximum number of plies searched by quiescence search below a leaf.
    pub quiescence_depth: Depth,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            quiescence: false,
            quiescence_depth: DEFAULT_QUIESCENCE_DEPTH,
        }
    }
}

/// Fixed depth negamax with alpha-beta pruning and optional quiescence search.
///
/// Positions without legal moves are scored before anything else, so a checkmate is always recognized as such,
/// even at the horizon. Checkmates closer to the root get better scores, see [`mated_score`].
#[derive(Debug, Clone)]
pub struct AlphaBeta<P: Position> {
    eval: Box<dyn Eval<P>>,
    config: AlphaBetaConfig,
    statistics: Statistics,
    stopped: bool,
}

impl<P: Position> AlphaBeta<P> {
    pub fn with_eval(eval: Box<dyn Eval<P>>) -> Self {
        Self::with_config(eval, AlphaBetaConfig::default())
    }

    pub fn with_config(eval: Box<dyn Eval<P>>, config: AlphaBetaConfig) -> Self {
        Self {
            eval,
            config,
            statistics: Statistics::default(),
            stopped: false,
        }
    }

    pub fn config(&self) -> &AlphaBetaConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AlphaBetaConfig {
        &mut self.config
    }

    /// True if the most recent root search ran out of budget before every root move had been searched.
    pub fn was_interrupted(&self) -> bool {
        self.stopped
    }

    /// Searches every move in `moves` to `depth` (counting the root move) and returns the best one with its score.
    /// Returns `None` if the clock ran out before the first move was searched completely. Moves whose subtree was
    /// cut short are never returned. Doesn't reset the statistics, so iterative deepening can accumulate them.
    pub fn search_root(
        &mut self,
        pos: &P,
        moves: &[P::Move],
        depth: Depth,
        clock: &SearchClock,
    ) -> Result<Option<(P::Move, Score)>, SearchError> {
        debug_assert!(depth.get() >= 1);
        self.stopped = false;
        let mut alpha = -SCORE_INFINITY;
        let beta = SCORE_INFINITY;
        let mut best: Option<(P::Move, Score)> = None;
        for &mov in moves {
            let child = pos.make_move(mov)?;
            let score = -self.negamax(&child, depth.get() - 1, 1, -beta, -alpha, clock)?;
            if self.stopped {
                break;
            }
            // ties keep the earlier move
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((mov, score)),
            }
            alpha = alpha.max(score);
        }
        Ok(best)
    }

    fn should_stop(&mut self, clock: &SearchClock) -> bool {
        if !self.stopped && clock.should_stop(self.statistics.nodes()) {
            self.stopped = true;
        }
        self.stopped
    }

    /// `ply` is the distance to the root and `depth` the remaining depth. Fail-soft.
    fn negamax(
        &mut self,
        pos: &P,
        depth: usize,
        ply: usize,
        mut alpha: Score,
        beta: Score,
        clock: &SearchClock,
    ) -> Result<Score, SearchError> {
        self.statistics.count_node(MainSearch);
        if self.should_stop(clock) {
            return Ok(SCORE_TIME_UP);
        }
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Ok(if pos.is_in_check() { mated_score(ply) } else { SCORE_DRAW });
        }
        if pos.is_game_over() {
            return Ok(self.eval.eval(pos));
        }
        if depth == 0 {
            return if self.config.quiescence {
                self.qsearch(pos, self.config.quiescence_depth.get(), alpha, beta, clock)
            } else {
                Ok(self.eval.eval(pos))
            };
        }

        let mut best_score = -SCORE_INFINITY;
        for mov in moves {
            let child = pos.make_move(mov)?;
            let score = -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha, clock)?;
            if self.stopped {
                return Ok(SCORE_TIME_UP);
            }
            best_score = best_score.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                self.statistics.count_cutoff();
                break;
            }
        }
        Ok(best_score)
    }

    /// Only looks at tactical moves, and lets the player to move stand pat if the static eval is already good
    /// enough. Fail-hard.
    fn qsearch(
        &mut self,
        pos: &P,
        depth: usize,
        mut alpha: Score,
        beta: Score,
        clock: &SearchClock,
    ) -> Result<Score, SearchError> {
        self.statistics.count_node(Qsearch);
        if self.should_stop(clock) {
            return Ok(SCORE_TIME_UP);
        }
        let stand_pat = self.eval.eval(pos);
        if stand_pat >= beta {
            self.statistics.count_cutoff();
            return Ok(beta);
        }
        alpha = alpha.max(stand_pat);
        if depth == 0 {
            return Ok(stand_pat);
        }
        let tactical = pos
            .legal_moves()
            .into_iter()
            .filter(|mov| mov.is_tactical(pos))
            .collect::<Vec<_>>();
        if tactical.is_empty() {
            return Ok(stand_pat);
        }
        for mov in tactical {
            let child = pos.make_move(mov)?;
            let score = -self.qsearch(&child, depth - 1, -beta, -alpha, clock)?;
            if self.stopped {
                return Ok(SCORE_TIME_UP);
            }
            if score >= beta {
                self.statistics.count_cutoff();
                return Ok(beta);
            }
            alpha = alpha.max(score);
        }
        Ok(alpha)
    }
}

impl<P: Position> StaticallyNamedEntity for AlphaBeta<P> {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "alpha-beta"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Alpha-Beta Negamax".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "A fixed depth negamax search with alpha-beta pruning and optional quiescence search".to_string()
    }
}

impl<P: Position> Engine<P> for AlphaBeta<P> {
    fn do_search(&mut self, pos: &P, limit: SearchLimit) -> Result<SearchResult<P>, SearchError> {
        let moves = pos.legal_moves();
        if let Some(mov) = only_move::<P>(&moves) {
            return Ok(SearchResult::move_only(mov));
        }
        let depth = limit.depth.unwrap_or(self.config.depth).max(Depth::new(1));
        let clock = SearchClock::start(&limit);
        match self.search_root(pos, &moves, depth, &clock)? {
            Some((mov, score)) if !self.stopped => {
                self.statistics.set_depth(depth.get());
                Ok(SearchResult::move_and_score(mov, score).with_depth(depth))
            }
            Some((mov, score)) => Ok(SearchResult::move_and_score(mov, score)),
            None => {
                warn!("{}: no root move could be searched in time, playing the first legal move", self.short_name());
                Ok(SearchResult::move_only(moves[0]))
            }
        }
    }

    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    fn engine_info(&self) -> EngineInfo {
        EngineInfo::new(
            self,
            Some(&*self.eval),
            vec![EngineOptionName::Depth, EngineOptionName::Quiescence, EngineOptionName::QuiescenceDepth],
        )
    }

    fn set_eval(&mut self, eval: Box<dyn Eval<P>>) {
        self.eval = eval;
    }

    fn set_option(&mut self, option: EngineOptionName, value: &str) -> Res<()> {
        match option {
            EngineOptionName::Depth => self.config.depth = option.parse_depth(value)?,
            EngineOptionName::Quiescence => self.config.quiescence = option.parse_bool(value)?,
            EngineOptionName::QuiescenceDepth => self.config.quiescence_depth = option.parse_depth(value)?,
            _ => anyhow::bail!("The engine '{}' doesn't support the option '{option}'", self.long_name()),
        }
        Ok(())
    }
}
