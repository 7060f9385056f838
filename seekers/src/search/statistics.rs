use std::fmt::{Display, Formatter};

use colored::Colorize;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SearchType {
    MainSearch,
    Qsearch,
}

/// Counters collected during a single call to `search`. They are purely informational; no search decision
/// depends on them.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Statistics {
    main_search_nodes: u64,
    qsearch_nodes: u64,
    cutoffs: u64,
    depth: usize,
    iterations: u64,
}

impl Statistics {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn count_node(&mut self, search_type: SearchType) {
        match search_type {
            SearchType::MainSearch => self.main_search_nodes += 1,
            SearchType::Qsearch => self.qsearch_nodes += 1,
        }
    }

    pub fn count_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    pub fn count_iteration(&mut self) {
        self.iterations += 1;
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn nodes(&self) -> u64 {
        self.main_search_nodes + self.qsearch_nodes
    }

    pub fn main_search_nodes(&self) -> u64 {
        self.main_search_nodes
    }

    pub fn qsearch_nodes(&self) -> u64 {
        self.qsearch_nodes
    }

    pub fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let nodes = self.nodes();
        let percentage = |val: u64| {
            if nodes == 0 {
                0.0
            } else {
                val as f64 / nodes as f64 * 100.0
            }
        };
        write!(
            f,
            "depth {depth}, nodes {nodes} (qsearch {qsearch:.1}%), cutoffs {cutoffs}",
            depth = self.depth.to_string().bold(),
            nodes = nodes.to_string().bold(),
            qsearch = percentage(self.qsearch_nodes),
            cutoffs = self.cutoffs,
        )?;
        if self.iterations > 0 {
            write!(f, ", iterations {}", self.iterations.to_string().bold())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_test() {
        let mut stats = Statistics::default();
        stats.count_node(SearchType::MainSearch);
        stats.count_node(SearchType::MainSearch);
        stats.count_node(SearchType::Qsearch);
        stats.count_cutoff();
        stats.set_depth(3);
        assert_eq!(stats.nodes(), 3);
        assert_eq!(stats.main_search_nodes(), 2);
        assert_eq!(stats.qsearch_nodes(), 1);
        assert_eq!(stats.cutoffs(), 1);
        assert_eq!(stats.depth(), 3);

        colored::control::set_override(false);
        assert_eq!(stats.to_string(), "depth 3, nodes 3 (qsearch 33.3%), cutoffs 1");
        stats.count_iteration();
        assert_eq!(stats.to_string(), "depth 3, nodes 3 (qsearch 33.3%), cutoffs 1, iterations 1");
        stats.reset();
        assert_eq!(stats, Statistics::default());
    }
}
