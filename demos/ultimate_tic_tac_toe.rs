//! Ultimate Tic-Tac-Toe against the UCT engine
//!
//! Run with `cargo run --release --example ultimate_tic_tac_toe`. Set
//! `RUST_LOG=debug` to see search summaries.

use std::io::{self, BufRead, Write};

use uttt_mcts::{GameState, Mark, Move, UctConfig, UctSearch, UltimateTicTacToe};

const ENGINE_ITERATIONS: usize = 7_000;

fn main() {
    // Initialize logging
    env_logger::init();

    println!("Welcome to Ultimate Tic-Tac-Toe!");
    println!("================================");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let human = match prompt(&mut lines, "Do you want to go first? [Y/N]: ") {
        Some(answer) if answer.trim().eq_ignore_ascii_case("y") => Mark::X,
        Some(_) => Mark::O,
        None => return,
    };
    println!();

    let config = UctConfig::default().with_iterations(ENGINE_ITERATIONS);
    let mut game = UltimateTicTacToe::new();

    while !game.is_terminal() {
        let player = game.next_player();
        let moves = game.get_moves();
        let listing: Vec<String> = moves.iter().map(Move::to_string).collect();
        println!("Moves for player {}: [{}]\n", player.number(), listing.join(", "));

        let action = if player == human {
            let Some(input) = prompt(&mut lines, "Enter the cell you want to play: ") else {
                return;
            };
            match input.parse::<Move>() {
                Ok(action) if game.is_legal(&action) => action,
                Ok(action) => {
                    println!("{} is not a legal move, try again.", action);
                    continue;
                }
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            }
        } else {
            let mut search = UctSearch::new(game.clone(), config.clone());
            match search.search() {
                Ok(action) => {
                    println!("Opponent played: {}\n", action);
                    log::info!("{}", search.get_statistics().summary());
                    action
                }
                Err(e) => {
                    println!("Error: {}", e);
                    return;
                }
            }
        };

        if let Err(e) = game.do_move(&action) {
            println!("Error: {}", e);
            continue;
        }
        println!("{}", game);
    }

    match game.winner() {
        Some(winner) => println!("Player {} wins!", winner.number()),
        None => println!("Nobody wins!"),
    }
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok()?;
    lines.next()?.ok()
}
