//! Selection policies for UCT search
//!
//! Selection policies pick which child to descend into while a node is fully
//! expanded, balancing exploration and exploitation.

use crate::{
    game_state::GameState,
    tree::{NodeId, SearchTree},
    utils,
};

/// Trait for policies that select which child to descend into
pub trait SelectionPolicy<S: GameState>: Send + Sync {
    /// Selects a child of `node`, or None if it has no children
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// ```text
/// UCB1 = total_reward / child_visits + c * sqrt(2 * ln(parent_visits) / child_visits)
/// ```
///
/// With `c = 1` this is the bare UCB1 formula. Children with zero visits score
/// infinitely. Ties go to the child expanded first.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that scales the confidence bonus
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value of a child
    pub fn ucb1_value(&self, total_reward: f64, child_visits: u64, parent_visits: u64) -> f64 {
        utils::ucb1_value(
            total_reward,
            child_visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<S: GameState> SelectionPolicy<S> for UCB1Policy {
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId> {
        let parent_visits = tree.get(node).visits();
        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in tree.children(node) {
            let child = tree.get(child_id);
            let score = self.ucb1_value(child.total_reward(), child.visits(), parent_visits);

            // Strictly greater keeps the earliest child on ties
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }

        best.map(|(child_id, _)| child_id)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>> {
        Box::new(self.clone())
    }
}

impl<S: GameState> SelectionPolicy<S> for Box<dyn SelectionPolicy<S>> {
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId> {
        (**self).select_child(tree, node)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>> {
        (**self).clone_box()
    }
}
