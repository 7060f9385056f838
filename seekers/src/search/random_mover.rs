use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ruleset::general::common::StaticallyNamedEntity;
use ruleset::general::position::Position;
use ruleset::search::{SearchError, SearchLimit, SearchResult};

use crate::search::statistics::Statistics;
use crate::search::{Engine, EngineInfo, SeedRng};

#[derive(Clone)]
pub struct RandomMover<P: Position, R: SeedRng = StdRng> {
    rng: R,
    statistics: Statistics,
    _phantom: PhantomData<P>,
}

impl<P: Position, R: SeedRng> Debug for RandomMover<P, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("random mover")
    }
}

impl<P: Position, R: SeedRng> Default for RandomMover<P, R> {
    fn default() -> Self {
        Self::with_rng(R::from_os_rng())
    }
}

impl<P: Position, R: SeedRng> RandomMover<P, R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            statistics: Statistics::default(),
            _phantom: PhantomData,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(R::seed_from_u64(seed))
    }
}

impl<P: Position, R: SeedRng> StaticallyNamedEntity for RandomMover<P, R> {
    fn static_short_name() -> &'static str
    where
        Self: Sized,
    {
        "random"
    }

    fn static_long_name() -> String
    where
        Self: Sized,
    {
        "Random Mover".to_string()
    }

    fn static_description() -> String
    where
        Self: Sized,
    {
        "A very simple engine that always chooses a legal move uniformly at random".to_string()
    }
}

impl<P: Position, R: SeedRng> Engine<P> for RandomMover<P, R> {
    fn do_search(&mut self, pos: &P, _limit: SearchLimit) -> Result<SearchResult<P>, SearchError> {
        pos.random_legal_move(&mut self.rng)
            .map(SearchResult::move_only)
            .ok_or(SearchError::NoLegalMoves)
    }

    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    fn engine_info(&self) -> EngineInfo {
        EngineInfo::new::<P, Self>(self, None, vec![])
    }
}
