//! Configuration options for UCT search
//!
//! This module defines the parameters that control a search. Board sizes and
//! winning lines are compile-time constants of the game model and are not
//! configured here.

use crate::{Result, UctError};

/// Configuration for UCT search
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use uttt_mcts::UctConfig;
///
/// let config = UctConfig::default()
///     .with_exploration_constant(0.7)
///     .with_iterations(5_000)
///     .with_seed(1234)
///     .with_log_tree(true);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UctConfig {
    /// Exploration constant for UCB1
    ///
    /// Scales the `sqrt(2 ln N / n)` confidence bonus. The default of 1.0 is
    /// the bare UCB1 formula; higher values favor less-visited children.
    pub exploration_constant: f64,

    /// Number of iterations to run
    ///
    /// Every iteration runs to completion; there is no time limit.
    pub iterations: usize,

    /// Seed for the searcher's random number generator
    ///
    /// With a seed, two searches from the same state return the same move.
    /// Without one the generator is seeded from OS entropy.
    pub seed: Option<u64>,

    /// Whether to log the full search tree at debug level after each search
    pub log_tree: bool,
}

impl Default for UctConfig {
    fn default() -> Self {
        UctConfig {
            exploration_constant: 1.0,
            iterations: 1_000,
            seed: None,
            log_tree: false,
        }
    }
}

impl UctConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the number of iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets whether the search tree is logged after each search
    pub fn with_log_tree(mut self, log_tree: bool) -> Self {
        self.log_tree = log_tree;
        self
    }

    /// Checks that the configuration can drive a search
    ///
    /// A zero iteration budget is not rejected here; searching with it fails
    /// with [`UctError::EmptySearch`] instead.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(UctError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
