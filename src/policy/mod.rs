//! Policies for the phases of UCT search
//!
//! - Selection policies: how to choose which child to descend into
//! - Simulation policies: how to play a position out to the end

pub mod selection;
pub mod simulation;

pub use selection::{SelectionPolicy, UCB1Policy};
pub use simulation::{RandomPolicy, SimulationPolicy};
