//! Traits defining game state representation for UCT search.
//!
//! The GameState trait is the contract between the search engine and a game:
//! any two-player, deterministic, zero-sum, complete-information game that
//! implements it can be searched.

use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::Result;

/// Trait for moves that can be played in a game
pub trait Action: Clone + Debug + PartialEq + Send + Sync {
    /// Returns a unique identifier for this move
    fn id(&self) -> usize;
}

/// Trait for players in a game
pub trait Player: Clone + Debug + PartialEq + Send + Sync {}

/// Trait defining the game state interface required for UCT search
///
/// States are mutated in place by [`do_move`](GameState::do_move). The search
/// never touches the caller's state: it clones the root once per iteration and
/// plays on the clone, so `Clone` must produce a fully independent copy.
pub trait GameState: Clone + Send + Sync {
    /// The type of moves that can be played in this game
    type Action: Action;

    /// The type of players in this game
    type Player: Player;

    /// Returns every legal move from this state
    ///
    /// The list is empty exactly when the state is terminal (won or drawn).
    /// Ordering carries no meaning but must be deterministic so that a seeded
    /// search is reproducible.
    fn get_moves(&self) -> Vec<Self::Action>;

    /// Plays a move, handing the turn to the other player
    ///
    /// Updates every piece of derived state (winners, move constraints).
    ///
    /// # Errors
    ///
    /// Returns [`UctError::IllegalMove`](crate::UctError::IllegalMove) if the
    /// move is not one of [`get_moves`](GameState::get_moves). The state is
    /// left untouched in that case.
    fn do_move(&mut self, action: &Self::Action) -> Result<()>;

    /// Returns the result of a finished game from the viewpoint of `player`
    ///
    /// - 1.0 if `player` won
    /// - 0.5 for a draw
    /// - 0.0 if the other player won
    ///
    /// # Errors
    ///
    /// Returns [`UctError::NonTerminalResult`](crate::UctError::NonTerminalResult)
    /// while legal moves remain.
    fn get_result(&self, player: &Self::Player) -> Result<f64>;

    /// Returns the player who made the most recent move
    ///
    /// For a fresh game this is the player who does *not* move first.
    fn player_just_moved(&self) -> Self::Player;

    /// Returns true if no legal moves remain
    fn is_terminal(&self) -> bool {
        self.get_moves().is_empty()
    }

    /// Plays uniformly random legal moves until the game is over
    ///
    /// Returns the number of moves played. Games can override this with a
    /// faster move generator, but the distribution must stay uniform over
    /// [`get_moves`](GameState::get_moves).
    fn random_rollout<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        let mut plies = 0;
        loop {
            let moves = self.get_moves();
            let Some(action) = moves.choose(rng) else {
                break;
            };
            self.do_move(action)?;
            plies += 1;
        }
        Ok(plies)
    }
}

impl Player for usize {}
impl Player for u8 {}
impl Player for char {}
