//! Tree data structures for UCT search
//!
//! Nodes live in a single arena owned by [`SearchTree`] and refer to each
//! other through [`NodeId`] handles. Children are owned through the arena;
//! the parent handle is the only upward link and never extends a lifetime.

use std::fmt;

use log::trace;

use crate::{
    game_state::GameState,
    policy::selection::{SelectionPolicy, UCB1Policy},
    Result, UctError,
};

/// Handle to a node in a [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the search tree
///
/// Statistics are kept from the viewpoint of `player_just_moved`, the player
/// who made the move into this node. That viewpoint is frozen when the node is
/// created, so a node's value always answers "how good is this position for
/// the player who just moved here".
pub struct SearchNode<S: GameState> {
    /// The move that led here from the parent (None for the root)
    pub action: Option<S::Action>,

    /// The parent node (None for the root)
    pub parent: Option<NodeId>,

    /// Children in the order they were expanded
    pub children: Vec<NodeId>,

    /// Legal moves from this node's state not yet expanded into children
    pub untried_actions: Vec<S::Action>,

    /// Number of completed backpropagations through this node
    pub visits: u64,

    /// Sum of the results credited to this node
    pub total_reward: f64,

    /// Player who made the move into this node's state
    pub player_just_moved: S::Player,

    /// Depth of this node in the tree (root = 0)
    pub depth: usize,
}

impl<S: GameState> SearchNode<S> {
    fn new(state: &S, action: Option<S::Action>, parent: Option<NodeId>, depth: usize) -> Self {
        SearchNode {
            action,
            parent,
            children: Vec::new(),
            untried_actions: state.get_moves(),
            visits: 0,
            total_reward: 0.0,
            player_just_moved: state.player_just_moved(),
            depth,
        }
    }

    /// Returns the number of visits to this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Returns the total reward accumulated at this node
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Returns the average reward of this node, 0 if never visited
    pub fn value(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.total_reward / self.visits as f64
    }

    /// Adds one visit and `score` to the accumulated result
    pub fn record_result(&mut self, score: f64) {
        self.visits += 1;
        self.total_reward += score;
    }

    /// Returns true if every legal move has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if this node's state has no legal moves
    pub fn is_terminal(&self) -> bool {
        self.untried_actions.is_empty() && self.children.is_empty()
    }
}

impl<S: GameState> fmt::Display for SearchNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Some(action) => write!(f, "[M:{:?}", action)?,
            None => write!(f, "[M:Root")?,
        }
        write!(
            f,
            " W/V:{}/{} U:{:?}]",
            self.total_reward, self.visits, self.untried_actions
        )
    }
}

/// Arena-backed search tree
///
/// Built fresh for each search and dropped as a whole afterwards.
pub struct SearchTree<S: GameState> {
    nodes: Vec<SearchNode<S>>,
}

impl<S: GameState> SearchTree<S> {
    /// Creates a tree holding only a root node for `root_state`
    pub fn new(root_state: &S) -> Self {
        SearchTree {
            nodes: vec![SearchNode::new(root_state, None, None, 0)],
        }
    }

    /// The root node handle
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns a node by handle
    ///
    /// Handles are only produced by this tree, so they are always in bounds.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of a node in expansion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Deepest node depth in the tree
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Adds a child reached from `parent` by `action`
    ///
    /// `state` must be the parent's state with `action` already applied.
    ///
    /// # Errors
    ///
    /// Returns [`UctError::IllegalMove`] if `action` is not among the
    /// parent's untried moves.
    pub fn expand_child(&mut self, parent: NodeId, action: &S::Action, state: &S) -> Result<NodeId> {
        let node = self.get_mut(parent);
        let position = node
            .untried_actions
            .iter()
            .position(|untried| untried == action)
            .ok_or_else(|| {
                UctError::IllegalMove(format!("{:?} is not an untried move of node {}", action, parent))
            })?;

        // Order of the untried list carries no meaning
        let action = node.untried_actions.swap_remove(position);
        let depth = node.depth + 1;

        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(SearchNode::new(state, Some(action), Some(parent), depth));
        self.get_mut(parent).children.push(id);

        trace!("expanded {} under {} at depth {}", id, parent, depth);
        Ok(id)
    }

    /// Credits `score` and one visit to a node
    pub fn record_result(&mut self, id: NodeId, score: f64) {
        self.get_mut(id).record_result(score);
    }

    /// Walks from `leaf` up to the root crediting every node with the result
    /// of `terminal` from that node's own viewpoint
    ///
    /// # Errors
    ///
    /// Propagates [`UctError::NonTerminalResult`] if `terminal` is not a
    /// finished game.
    pub fn backpropagate(&mut self, leaf: NodeId, terminal: &S) -> Result<()> {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            let score = terminal.get_result(&node.player_just_moved)?;
            node.record_result(score);
            current = node.parent;
        }
        Ok(())
    }

    /// Picks a child of `id` by UCB1 with the given exploration constant
    ///
    /// Returns None when the node has no children.
    pub fn select_best_child_by_ucb1(&self, id: NodeId, exploration_constant: f64) -> Option<NodeId> {
        UCB1Policy::new(exploration_constant).select_child(self, id)
    }

    /// The most visited child of `id`, the first one in expansion order on ties
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u64)> = None;
        for &child in self.children(id) {
            let visits = self.get(child).visits();
            if best.map_or(true, |(_, best_visits)| visits > best_visits) {
                best = Some((child, visits));
            }
        }
        best.map(|(child, _)| child)
    }

    /// The move leading to the most visited root child
    pub fn best_action(&self) -> Option<S::Action> {
        self.most_visited_child(self.root())
            .and_then(|child| self.get(child).action.clone())
    }

    /// Renders the whole tree, one node per line, indented by depth
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        self.visualize_node(self.root(), &mut output);
        output
    }

    fn visualize_node(&self, id: NodeId, output: &mut String) {
        let node = self.get(id);
        output.push_str(&"| ".repeat(node.depth));
        output.push_str(&node.to_string());
        output.push('\n');

        for &child in &node.children {
            self.visualize_node(child, output);
        }
    }

    /// Renders the direct children of a node, one per line
    pub fn children_summary(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .map(|&child| format!("{}\n", self.get(child)))
            .collect()
    }
}
