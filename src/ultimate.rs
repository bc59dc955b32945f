//! Ultimate Tic-Tac-Toe game model
//!
//! The board is nine 3x3 sub-boards arranged in a 3x3 meta-board. A move
//! sends the opponent to the sub-board matching the cell just played; if that
//! sub-board is already decided or full, the opponent may play in any
//! undecided sub-board. Winning three sub-boards in a line wins the game.

use std::fmt;
use std::str::FromStr;

use crate::{
    game_state::{Action, GameState, Player},
    Result, UctError,
};

/// Number of sub-boards, and of cells per sub-board
pub const BOARD_SIZE: usize = 9;

/// Rows, columns and diagonals of a 3x3 grid indexed row-major
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The two players. `X` is player 1 and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other player
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the conventional player number (1 for `X`, 2 for `O`)
    pub fn number(self) -> u8 {
        match self {
            Mark::X => 1,
            Mark::O => 2,
        }
    }

    /// Returns the board symbol for this player
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl Player for Mark {}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A move, encoded as `sub_board * 9 + cell`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move(u8);

impl Move {
    /// Creates a move from a sub-board index and a cell index, both in `0..9`
    pub fn new(sub_board: usize, cell: usize) -> Result<Self> {
        if sub_board >= BOARD_SIZE || cell >= BOARD_SIZE {
            return Err(UctError::IllegalMove(format!(
                "sub-board {} cell {} is off the board",
                sub_board, cell
            )));
        }
        Ok(Move((sub_board * BOARD_SIZE + cell) as u8))
    }

    /// The sub-board this move lands in
    pub fn sub_board(self) -> usize {
        self.0 as usize / BOARD_SIZE
    }

    /// The cell within the sub-board
    pub fn cell(self) -> usize {
        self.0 as usize % BOARD_SIZE
    }

    /// The encoded index in `0..81`
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Action for Move {
    fn id(&self) -> usize {
        self.index()
    }
}

impl TryFrom<usize> for Move {
    type Error = UctError;

    fn try_from(index: usize) -> Result<Self> {
        Move::new(index / BOARD_SIZE, index % BOARD_SIZE)
            .map_err(|_| UctError::IllegalMove(format!("{} is not in 0..81", index)))
    }
}

impl FromStr for Move {
    type Err = UctError;

    fn from_str(s: &str) -> Result<Self> {
        let index: usize = s
            .trim()
            .parse()
            .map_err(|_| UctError::IllegalMove(format!("'{}' is not a move number", s.trim())))?;
        Move::try_from(index)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the owner of a completed line in a 3x3 grid, if any
pub fn line_winner(cells: &[Option<Mark>; BOARD_SIZE]) -> Option<Mark> {
    WINNING_LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Some(mark) if cells[b] == Some(mark) && cells[c] == Some(mark) => Some(mark),
        _ => None,
    })
}

/// A position in a game of Ultimate Tic-Tac-Toe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UltimateTicTacToe {
    pieces: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE],
    sub_board_winner: [Option<Mark>; BOARD_SIZE],
    active_board: Option<usize>,
    winner: Option<Mark>,
    player_just_moved: Mark,
}

impl UltimateTicTacToe {
    /// Creates the empty starting position with `X` to move
    pub fn new() -> Self {
        UltimateTicTacToe {
            pieces: [[None; BOARD_SIZE]; BOARD_SIZE],
            sub_board_winner: [None; BOARD_SIZE],
            active_board: None,
            winner: None,
            // Pretend O just moved so that X has the first move
            player_just_moved: Mark::O,
        }
    }

    /// Builds a position from raw cell contents
    ///
    /// Sub-board winners and the game winner are derived from `pieces`.
    /// `active_board` is the sub-board the next move is sent to, as if the
    /// previous move had landed in that cell index; out-of-range values mean
    /// no constraint.
    pub fn from_pieces(
        pieces: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE],
        player_just_moved: Mark,
        active_board: Option<usize>,
    ) -> Self {
        let mut sub_board_winner = [None; BOARD_SIZE];
        for (winner, board) in sub_board_winner.iter_mut().zip(pieces.iter()) {
            *winner = line_winner(board);
        }

        UltimateTicTacToe {
            pieces,
            sub_board_winner,
            active_board: active_board.filter(|&b| b < BOARD_SIZE),
            winner: line_winner(&sub_board_winner),
            player_just_moved,
        }
    }

    /// Cell contents, indexed `[sub_board][cell]`
    pub fn pieces(&self) -> &[[Option<Mark>; BOARD_SIZE]; BOARD_SIZE] {
        &self.pieces
    }

    /// The decided owner of a sub-board, if any
    pub fn sub_board_winner(&self, sub_board: usize) -> Option<Mark> {
        self.sub_board_winner.get(sub_board).copied().flatten()
    }

    /// The sub-board the previous move pointed at, if any
    ///
    /// This is the raw pointer; when that sub-board is decided or full the
    /// next move is unconstrained.
    pub fn active_board(&self) -> Option<usize> {
        self.active_board
    }

    /// The winner of the game, if decided
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// The player to move next
    pub fn next_player(&self) -> Mark {
        self.player_just_moved.opponent()
    }

    /// Returns true if the sub-board is undecided and has an empty cell
    pub fn is_open(&self, sub_board: usize) -> bool {
        sub_board < BOARD_SIZE
            && self.sub_board_winner[sub_board].is_none()
            && self.pieces[sub_board].iter().any(Option::is_none)
    }

    /// The sub-board the next move is constrained to, if the constraint applies
    fn forced_board(&self) -> Option<usize> {
        self.active_board.filter(|&b| self.is_open(b))
    }

    /// Returns true if `action` may be played from this position
    pub fn is_legal(&self, action: &Move) -> bool {
        if self.winner.is_some() {
            return false;
        }

        let (board, cell) = (action.sub_board(), action.cell());
        if !self.is_open(board) || self.pieces[board][cell].is_some() {
            return false;
        }

        self.forced_board().map_or(true, |forced| forced == board)
    }

    fn empty_cells(&self, board: usize) -> impl Iterator<Item = Move> + '_ {
        self.pieces[board]
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.is_none())
            .map(move |(cell, _)| Move((board * BOARD_SIZE + cell) as u8))
    }
}

impl Default for UltimateTicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for UltimateTicTacToe {
    type Action = Move;
    type Player = Mark;

    fn get_moves(&self) -> Vec<Move> {
        if self.winner.is_some() {
            return Vec::new();
        }

        if let Some(board) = self.forced_board() {
            return self.empty_cells(board).collect();
        }

        (0..BOARD_SIZE)
            .filter(|&board| self.sub_board_winner[board].is_none())
            .flat_map(|board| self.empty_cells(board))
            .collect()
    }

    fn do_move(&mut self, action: &Move) -> Result<()> {
        if !self.is_legal(action) {
            return Err(UctError::IllegalMove(format!(
                "{} (sub-board {}, cell {}) is not playable for {}",
                action,
                action.sub_board(),
                action.cell(),
                self.next_player()
            )));
        }

        let (board, cell) = (action.sub_board(), action.cell());
        let mover = self.next_player();

        self.player_just_moved = mover;
        self.pieces[board][cell] = Some(mover);
        self.active_board = Some(cell);

        if line_winner(&self.pieces[board]) == Some(mover) {
            self.sub_board_winner[board] = Some(mover);
            self.winner = line_winner(&self.sub_board_winner);
        }

        Ok(())
    }

    fn get_result(&self, player: &Mark) -> Result<f64> {
        match self.winner {
            Some(winner) if winner == *player => Ok(1.0),
            Some(_) => Ok(0.0),
            None if self.is_terminal() => Ok(0.5),
            None => Err(UctError::NonTerminalResult),
        }
    }

    fn player_just_moved(&self) -> Mark {
        self.player_just_moved
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || !(0..BOARD_SIZE).any(|board| self.is_open(board))
    }
}

impl fmt::Display for UltimateTicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 && row % 3 == 0 {
                writeln!(f)?;
            }
            for col in 0..BOARD_SIZE {
                if col > 0 && col % 3 == 0 {
                    write!(f, " ")?;
                }
                let board = (row / 3) * 3 + col / 3;
                let cell = (row % 3) * 3 + col % 3;
                let symbol = self.pieces[board][cell].map_or('.', Mark::symbol);
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
