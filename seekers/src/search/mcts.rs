use std::time::Duration;

use log::{debug, warn};
use rand::rngs::StdRng;

use ruleset::general::common::{NamedEntity, Res, StaticallyNamedEntity};
use ruleset::general::position::Position;
use ruleset::score::Score;
use ruleset::search::{SearchError, SearchLimit, SearchResult};

use crate::eval::Eval;
use crate::search::mcts::rollout::{rollout, RolloutPolicy, EVAL_SCALE};
use crate::search::mcts::tree::Tree;
use crate::search::statistics::SearchType::MainSearch;
use crate::search::statistics::Statistics;
use crate::search::{only_move, Engine, EngineInfo, EngineOptionName, SearchClock, SeedRng};

pub mod rollout;
pub mod tree;

pub const DEFAULT_TIME: Duration = Duration::from_secs(5);
pub const DEFAULT_EXPLORATION_WEIGHT: f64 = 1.414;
pub const DEFAULT_ROLLOUT_DEPTH: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MctsConfig {
    /// Used when the search limit doesn't contain a time.
    pub time: Duration,
    /// The constant `c` in the UCT formula.
    pub exploration_weight: f64,
    /// Maximum number of plies per simulation. A depth in the search limit overrides this.
    pub rollout_depth: usize,
    pub rollout: RolloutPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME,
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
            rollout_depth: DEFAULT_ROLLOUT_DEPTH,
            rollout: RolloutPolicy::default(),
        }
    }
}

/// Monte Carlo tree search with UCT selection.
///
/// Every iteration selects a leaf, expands one untried move, simulates a game from the new node and propagates the
/// result back to the root. The most visited root move is played. The tree is rebuilt for every search.
/// All randomness comes from the injected RNG, so a seeded engine with an iteration limit is reproducible.
#[derive(Debug, Clone)]
pub struct Mcts<P: Position, R: SeedRng = StdRng> {
    eval: Option<Box<dyn Eval<P>>>,
    config: MctsConfig,
    rng: R,
    statistics: Statistics,
}

impl<P: Position, R: SeedRng> Mcts<P, R> {
    pub fn new(eval: Option<Box<dyn Eval<P>>>, rng: R) -> Self {
        Self::with_config(eval, rng, MctsConfig::default())
    }

    pub fn with_config(eval: Option<Box<dyn Eval<P>>>, rng: R, config: MctsConfig) -> Self {
        Self {
            eval,
            config,
            rng,
            statistics: Statistics::default(),
        }
    }

    pub fn with_seed(eval: Option<Box<dyn Eval<P>>>, seed: u64) -> Self {
        Self::new(eval, R::seed_from_u64(seed))
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MctsConfig {
        &mut self.config
    }

    /// Runs iterations until the limit is reached and returns the resulting tree.
    /// The node limit of `limit` is interpreted as a limit on the number of iterations.
    pub fn build_tree(&mut self, pos: &P, limit: SearchLimit) -> Result<Tree<P>, SearchError> {
        let limit = SearchLimit {
            fixed_time: Some(limit.fixed_time.unwrap_or(self.config.time)),
            ..limit
        };
        let clock = SearchClock::start(&limit);
        let rollout_depth = limit.depth.map_or(self.config.rollout_depth, |d| d.get());
        let mut policy = self.config.rollout;
        if policy == RolloutPolicy::EvalGuided && self.eval.is_none() {
            warn!("{}: eval guided rollouts need an eval, using random rollouts instead", self.short_name());
            policy = RolloutPolicy::Random;
        }

        let mut tree = Tree::new(pos.clone());
        while !clock.should_stop(self.statistics.iterations()) {
            let leaf = tree.select(self.config.exploration_weight);
            let node = tree.expand(leaf)?;
            if node != leaf {
                self.statistics.count_node(MainSearch);
            }
            let result = rollout(
                tree.node(node).pos(),
                policy,
                rollout_depth,
                self.eval.as_deref_mut(),
                &mut self.rng,
            )?;
            tree.backpropagate(node, result);
            self.statistics.count_iteration();
        }
        Ok(tree)
    }
}

impl<P: Position, R: SeedRng> StaticallyNamedEntity for Mcts<P, R> {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "mcts"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Monte Carlo Tree Search".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "Monte Carlo tree search with UCT selection and random or eval guided rollouts".to_string()
    }
}

impl<P: Position, R: SeedRng> Engine<P> for Mcts<P, R> {
    fn do_search(&mut self, pos: &P, limit: SearchLimit) -> Result<SearchResult<P>, SearchError> {
        if pos.is_game_over() {
            return Err(SearchError::NoLegalMoves);
        }
        let moves = pos.legal_moves();
        if let Some(mov) = only_move::<P>(&moves) {
            return Ok(SearchResult::move_only(mov));
        }
        let tree = self.build_tree(pos, limit)?;
        let Some((mov, child)) = tree.best_child() else {
            warn!("{}: no iteration finished in time, playing the first legal move", self.short_name());
            return Ok(SearchResult::move_only(moves[0]));
        };
        let child = tree.node(child);
        debug!(
            "{name}: {mov} was visited {visits} out of {total} times, {nodes} nodes in the tree",
            name = self.short_name(),
            visits = child.visits(),
            total = tree.root().visits(),
            nodes = tree.len(),
        );
        // the child's value is from the opponent's perspective
        Ok(SearchResult::move_and_score(mov, Score(-child.mean_value() * EVAL_SCALE)))
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
            self.eval.as_deref(),
            vec![EngineOptionName::ExplorationWeight, EngineOptionName::RolloutDepth, EngineOptionName::Rollout],
        )
    }

    fn set_eval(&mut self, eval: Box<dyn Eval<P>>) {
        self.eval = Some(eval);
    }

    fn set_option(&mut self, option: EngineOptionName, value: &str) -> Res<()> {
        match option {
            EngineOptionName::ExplorationWeight => self.config.exploration_weight = option.parse_positive_float(value)?,
            EngineOptionName::RolloutDepth => self.config.rollout_depth = option.parse_depth(value)?.get(),
            EngineOptionName::Rollout => {
                self.config.rollout = value
                    .parse::<RolloutPolicy>()
                    .map_err(|_| anyhow::anyhow!("Unknown rollout policy '{value}', expected 'random' or 'eval'"))?
            }
            _ => anyhow::bail!("The engine '{}' doesn't support the option '{option}'", self.long_name()),
        }
        Ok(())
    }
}
