//! Simulation policies for UCT search
//!
//! A simulation policy plays a state out to the end of the game. The search
//! only ever reads the terminal state it leaves behind.

use rand::RngCore;

use crate::{game_state::GameState, Result};

/// Trait for policies that play a state out to a terminal state
pub trait SimulationPolicy<S: GameState>: Send + Sync {
    /// Plays `state` to a terminal state in place and returns the number of
    /// moves played
    fn simulate(&self, state: &mut S, rng: &mut dyn RngCore) -> Result<usize>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>>;
}

/// Random simulation policy
///
/// Plays uniformly random legal moves until the game ends.
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> SimulationPolicy<S> for RandomPolicy {
    fn simulate(&self, state: &mut S, rng: &mut dyn RngCore) -> Result<usize> {
        state.random_rollout(rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        Box::new(self.clone())
    }
}

impl<S: GameState> SimulationPolicy<S> for Box<dyn SimulationPolicy<S>> {
    fn simulate(&self, state: &mut S, rng: &mut dyn RngCore) -> Result<usize> {
        (**self).simulate(state, rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        (**self).clone_box()
    }
}
