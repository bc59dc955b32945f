//! Main implementation of the UCT search algorithm
//!
//! This module contains the search driver, orchestrating the four phases of
//! selection, expansion, rollout and backpropagation over a fresh tree.

use std::time::Instant;

use log::debug;
use rand::{seq::SliceRandom, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{
    config::UctConfig,
    game_state::GameState,
    policy::{
        selection::{SelectionPolicy, UCB1Policy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    stats::SearchStatistics,
    tree::{NodeId, SearchTree},
    Result, UctError,
};

/// Runs a UCT search from `root` and returns the recommended move
///
/// `exploration_constant` defaults to 1.0. The caller's state is never
/// modified, and all randomness is drawn from `rng`.
///
/// # Errors
///
/// Returns [`UctError::EmptySearch`] if `root` is terminal or `iterations`
/// is zero, and [`UctError::InvalidConfiguration`] for a negative or
/// non-finite exploration constant.
pub fn uct_search<S, R>(
    root: &S,
    iterations: usize,
    exploration_constant: Option<f64>,
    rng: &mut R,
) -> Result<S::Action>
where
    S: GameState + 'static,
    R: RngCore,
{
    let mut config = UctConfig::default().with_iterations(iterations);
    if let Some(constant) = exploration_constant {
        config = config.with_exploration_constant(constant);
    }

    UctSearch::new(root.clone(), config).search_with(rng)
}

/// A configured UCT searcher
///
/// Holds the root state, the configuration, the policies for each phase and
/// its own random number generator. Every search builds a new tree and drops
/// it once the best move is known; nothing carries over between searches
/// except the generator's position.
pub struct UctSearch<S: GameState> {
    /// State the search starts from
    root_state: S,

    /// Configuration for the search
    config: UctConfig,

    /// Statistics gathered during the last search
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy<S>>,

    /// Policy for playing out games during the rollout phase
    simulation_policy: Box<dyn SimulationPolicy<S>>,

    /// Generator used by `search`
    rng: ChaCha20Rng,
}

impl<S: GameState + 'static> UctSearch<S> {
    /// Creates a new searcher with the given root state and configuration
    pub fn new(root_state: S, config: UctConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy<S>> =
            Box::new(UCB1Policy::new(config.exploration_constant));

        let simulation_policy: Box<dyn SimulationPolicy<S>> = Box::new(RandomPolicy::new());

        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        UctSearch {
            root_state,
            config,
            statistics: SearchStatistics::new(),
            selection_policy,
            simulation_policy,
            rng,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Replaces the owned random number generator
    pub fn with_rng(mut self, rng: ChaCha20Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Returns the state searches start from
    pub fn root_state(&self) -> &S {
        &self.root_state
    }

    /// Returns the search configuration
    pub fn config(&self) -> &UctConfig {
        &self.config
    }

    /// Returns the statistics of the last search
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Runs the search with the owned generator and returns the best move
    pub fn search(&mut self) -> Result<S::Action> {
        let mut rng = self.rng.clone();
        let result = self.search_with(&mut rng);
        self.rng = rng;
        result
    }

    /// Runs the search with an external generator and returns the best move
    ///
    /// The best move leads to the most visited root child; ties go to the
    /// child expanded first.
    pub fn search_with<R: RngCore>(&mut self, rng: &mut R) -> Result<S::Action> {
        let tree = self.build_tree(rng)?;
        tree.best_action()
            .ok_or_else(|| UctError::EmptySearch("root has no children".to_string()))
    }

    /// Runs the search and returns the finished tree instead of a move
    pub fn build_tree<R: RngCore>(&mut self, rng: &mut R) -> Result<SearchTree<S>> {
        self.grow(rng)
    }

    fn grow(&mut self, rng: &mut dyn RngCore) -> Result<SearchTree<S>> {
        self.config.validate()?;

        if self.config.iterations == 0 {
            return Err(UctError::EmptySearch("iteration budget is zero".to_string()));
        }
        if self.root_state.is_terminal() {
            return Err(UctError::EmptySearch("root state is terminal".to_string()));
        }

        self.statistics = SearchStatistics::new();
        let mut tree = SearchTree::new(&self.root_state);

        debug!(
            "starting UCT search: {} iterations, exploration constant {}",
            self.config.iterations, self.config.exploration_constant
        );

        let start_time = Instant::now();

        for i in 0..self.config.iterations {
            self.execute_iteration(&mut tree, rng)?;
            self.statistics.iterations = i + 1;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = tree.len();
        self.statistics.max_depth = tree.max_depth();
        self.statistics.root_visits = tree.get(tree.root()).visits();

        debug!(
            "search finished in {:.3}s ({} nodes, max depth {})",
            self.statistics.total_time.as_secs_f64(),
            self.statistics.tree_size,
            self.statistics.max_depth
        );

        if self.config.log_tree {
            debug!("search tree:\n{}", tree.visualize());
        } else {
            debug!("root children:\n{}", tree.children_summary(tree.root()));
        }

        Ok(tree)
    }

    /// Execute a single iteration on a fresh clone of the root state
    fn execute_iteration(&mut self, tree: &mut SearchTree<S>, rng: &mut dyn RngCore) -> Result<()> {
        let mut state = self.root_state.clone();

        // 1. Selection phase
        let selected = self.selection(tree, &mut state)?;

        // 2. Expansion phase
        let expanded = self.expansion(tree, selected, &mut state, rng)?;

        // 3. Rollout phase
        let plies = self.simulation_policy.simulate(&mut state, rng)?;
        self.statistics.rollout_moves += plies;

        // 4. Backpropagation phase
        tree.backpropagate(expanded, &state)
    }

    /// Selection phase: descend while the node is fully expanded and has
    /// children, replaying each chosen move on `state`
    fn selection(&self, tree: &SearchTree<S>, state: &mut S) -> Result<NodeId> {
        let mut current = tree.root();

        loop {
            let node = tree.get(current);
            if !node.is_fully_expanded() || node.is_leaf() {
                return Ok(current);
            }

            let Some(child) = self.selection_policy.select_child(tree, current) else {
                return Ok(current);
            };

            if let Some(action) = &tree.get(child).action {
                state.do_move(action)?;
            }
            current = child;
        }
    }

    /// Expansion phase: play one untried move chosen uniformly at random and
    /// add its child, or stay put if the node has no untried moves
    fn expansion(
        &self,
        tree: &mut SearchTree<S>,
        node: NodeId,
        state: &mut S,
        rng: &mut dyn RngCore,
    ) -> Result<NodeId> {
        let Some(action) = tree.get(node).untried_actions.choose(rng).cloned() else {
            return Ok(node);
        };

        state.do_move(&action)?;
        tree.expand_child(node, &action, state)
    }
}
