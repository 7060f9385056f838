use ruleset::general::position::Position;
use ruleset::OracleError;

/// Index of a node in its [`Tree`]. Only valid for the tree that created it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, derive_more::Display)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node<P: Position> {
    pos: P,
    parent: Option<NodeId>,
    children: Vec<(P::Move, NodeId)>,
    /// Reversed, so that popping yields the moves in the order of [`Position::legal_moves`].
    untried: Vec<P::Move>,
    terminal: bool,
    visits: u64,
    /// Sum of all simulation results, each from the perspective of the player to move in this node.
    value: f64,
}

impl<P: Position> Node<P> {
    fn new(pos: P, parent: Option<NodeId>) -> Self {
        let mut untried = pos.legal_moves().to_vec();
        untried.reverse();
        let terminal = untried.is_empty() || pos.is_game_over();
        if terminal {
            untried.clear();
        }
        Self {
            pos,
            parent,
            children: vec![],
            untried,
            terminal,
            visits: 0,
            value: 0.0,
        }
    }

    pub fn pos(&self) -> &P {
        &self.pos
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[(P::Move, NodeId)] {
        &self.children
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Average result for the player to move in this node, in `[-1, 1]`. Zero for unvisited nodes.
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }

    /// UCT score of this node as seen by the player to move in its parent. Unvisited nodes are always tried first.
    pub fn uct_value(&self, parent_visits: u64, exploration_weight: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        // the value is stored from the child's perspective, which is the parent's opponent
        let exploitation = -self.mean_value();
        let exploration = exploration_weight * ((parent_visits as f64).ln() / self.visits as f64).sqrt();
        exploitation + exploration
    }
}

/// A search tree stored in a flat arena. Nodes are never removed, so a [`NodeId`] stays valid for the lifetime of
/// the tree.
#[derive(Debug, Clone)]
pub struct Tree<P: Position> {
    nodes: Vec<Node<P>>,
}

impl<P: Position> Tree<P> {
    pub fn new(root: P) -> Self {
        Self {
            nodes: vec![Node::new(root, None)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node<P> {
        &self.nodes[NodeId::ROOT.index()]
    }

    pub fn node(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.index()]
    }

    /// Descends from the root along the children with the highest UCT value, as long as the current node has been
    /// fully expanded and isn't terminal. Ties go to the earlier child.
    pub fn select(&self, exploration_weight: f64) -> NodeId {
        let mut current = NodeId::ROOT;
        loop {
            let node = self.node(current);
            if node.terminal || !node.is_fully_expanded() || node.children.is_empty() {
                return current;
            }
            let mut best = node.children[0].1;
            let mut best_uct = f64::NEG_INFINITY;
            for &(_, child) in &node.children {
                let uct = self.node(child).uct_value(node.visits, exploration_weight);
                if uct > best_uct {
                    best_uct = uct;
                    best = child;
                }
            }
            current = best;
        }
    }

    /// Adds a child for the next untried move of `id` and returns it. Returns `id` itself if there is nothing left
    /// to expand, which only happens for terminal nodes.
    pub fn expand(&mut self, id: NodeId) -> Result<NodeId, OracleError> {
        let Some(mov) = self.nodes[id.index()].untried.pop() else {
            return Ok(id);
        };
        let pos = self.node(id).pos.make_move(mov)?;
        let child = NodeId(self.nodes.len());
        self.nodes.push(Node::new(pos, Some(id)));
        self.nodes[id.index()].children.push((mov, child));
        Ok(child)
    }

    /// Adds `result`, which is from the perspective of the player to move in `id`, to every node on the path to the
    /// root. The sign flips at every step because the players alternate.
    pub fn backpropagate(&mut self, id: NodeId, mut result: f64) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            node.visits += 1;
            node.value += result;
            result = -result;
            current = node.parent;
        }
    }

    /// The most visited child of the root, ties go to the earlier child. `None` if the root hasn't been expanded.
    pub fn best_child(&self) -> Option<(P::Move, NodeId)> {
        let mut best: Option<(P::Move, NodeId)> = None;
        for &(mov, child) in &self.root().children {
            match best {
                Some((_, best_id)) if self.node(child).visits <= self.node(best_id).visits => {}
                _ => best = Some((mov, child)),
            }
        }
        best
    }
}
