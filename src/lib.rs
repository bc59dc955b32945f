//! # uttt-mcts
//!
//! A Monte Carlo Tree Search engine using the UCT selection policy, together
//! with a complete Ultimate Tic-Tac-Toe game model to drive it.
//!
//! The engine is generic over the [`GameState`] trait, so any two-player,
//! deterministic, zero-sum game with complete information can be searched.
//! [`UltimateTicTacToe`] is the bundled implementation.
//!
//! ## Basic Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use uttt_mcts::{uct_search, GameState, UltimateTicTacToe};
//!
//! fn main() -> Result<(), uttt_mcts::UctError> {
//!     let mut game = UltimateTicTacToe::new();
//!     let mut rng = ChaCha20Rng::seed_from_u64(7);
//!
//!     // Ask the engine for a move with 200 iterations and the default
//!     // exploration constant.
//!     let action = uct_search(&game, 200, None, &mut rng)?;
//!     assert!(game.get_moves().contains(&action));
//!
//!     game.do_move(&action)?;
//!     println!("{}", game);
//!     Ok(())
//! }
//! ```
//!
//! ## Configured Searches
//!
//! [`UctSearch`] bundles a root state, a [`UctConfig`] and the policies used
//! for each phase. It owns a seedable random number generator so repeated
//! searches with the same seed are reproducible.
//!
//! ```
//! use uttt_mcts::{UctConfig, UctSearch, UltimateTicTacToe};
//!
//! let config = UctConfig::default()
//!     .with_exploration_constant(1.0)
//!     .with_iterations(100)
//!     .with_seed(42);
//!
//! let mut search = UctSearch::new(UltimateTicTacToe::new(), config);
//! let action = search.search().unwrap();
//! println!("best move: {} ({})", action, search.get_statistics().summary());
//! ```
//!
//! ## How It Works
//!
//! Each iteration runs four phases on a fresh clone of the root state:
//!
//! 1. **Selection**: while the current node is fully expanded and has
//!    children, descend to the child maximising UCB1.
//! 2. **Expansion**: if untried moves remain, play one chosen uniformly at
//!    random and add a child node for it.
//! 3. **Rollout**: play uniformly random moves until the game ends.
//! 4. **Backpropagation**: walk back to the root, crediting each node with the
//!    terminal result seen from the player who had just moved into it.
//!
//! After the iteration budget is spent, the move leading to the most visited
//! root child is returned.

pub mod config;
pub mod game_state;
pub mod mcts;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod ultimate;
pub mod utils;

pub use config::UctConfig;
pub use game_state::{Action, GameState, Player};
pub use mcts::{uct_search, UctSearch};
pub use policy::{SelectionPolicy, SimulationPolicy};
pub use stats::SearchStatistics;
pub use tree::{NodeId, SearchNode, SearchTree};
pub use ultimate::{Mark, Move, UltimateTicTacToe};

/// Error types for the search engine and game model
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UctError {
    /// A move was played that is not legal in the current state
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// A result was requested while the game is still in progress
    #[error("Result requested for a non-terminal state")]
    NonTerminalResult,

    /// The search had no child to recommend
    #[error("Nothing to search: {0}")]
    EmptySearch(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for search and game operations
pub type Result<T> = std::result::Result<T, UctError>;
