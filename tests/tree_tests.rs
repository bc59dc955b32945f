use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use uttt_mcts::{
    ultimate::BOARD_SIZE, GameState, Mark, Move, NodeId, SearchTree, UctConfig, UctError,
    UctSearch, UltimateTicTacToe,
};

fn mv(board: usize, cell: usize) -> Move {
    Move::new(board, cell).unwrap()
}

/// X to move in sub-board 2; cell 2 wins the game
fn near_win() -> UltimateTicTacToe {
    let mut pieces = [[None; BOARD_SIZE]; BOARD_SIZE];
    for board in [0, 1] {
        pieces[board][0] = Some(Mark::X);
        pieces[board][1] = Some(Mark::X);
        pieces[board][2] = Some(Mark::X);
    }
    pieces[2][0] = Some(Mark::X);
    pieces[2][1] = Some(Mark::X);
    pieces[2][3] = Some(Mark::O);
    pieces[2][4] = Some(Mark::O);
    UltimateTicTacToe::from_pieces(pieces, Mark::O, Some(2))
}

#[test]
fn test_new_tree_has_only_root() {
    let game = UltimateTicTacToe::new();
    let tree = SearchTree::new(&game);

    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());

    let root = tree.get(tree.root());
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(root.action.is_none());
    assert!(root.parent.is_none());
    assert_eq!(root.untried_actions.len(), 81);
    assert_eq!(root.player_just_moved, Mark::O);
    assert_eq!(root.visits(), 0);
    assert_eq!(root.total_reward(), 0.0);
}

#[test]
fn test_expand_child() {
    let game = UltimateTicTacToe::new();
    let mut tree = SearchTree::new(&game);

    let action = mv(3, 5);
    let mut next = game.clone();
    next.do_move(&action).unwrap();

    let child = tree.expand_child(tree.root(), &action, &next).unwrap();

    let root = tree.get(tree.root());
    assert_eq!(root.untried_actions.len(), 80);
    assert!(!root.untried_actions.contains(&action));
    assert_eq!(root.children, vec![child]);

    let node = tree.get(child);
    assert_eq!(node.action, Some(action));
    assert_eq!(node.parent, Some(tree.root()));
    assert_eq!(node.depth, 1);
    assert_eq!(node.player_just_moved, Mark::X);
    assert_eq!(node.untried_actions, next.get_moves());
}

#[test]
fn test_expand_child_rejects_unknown_moves() {
    let game = UltimateTicTacToe::new();
    let mut tree = SearchTree::new(&game);

    let action = mv(0, 0);
    let mut next = game.clone();
    next.do_move(&action).unwrap();
    tree.expand_child(tree.root(), &action, &next).unwrap();

    // Already expanded
    let result = tree.expand_child(tree.root(), &action, &next);
    assert!(matches!(result, Err(UctError::IllegalMove(_))));
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_record_result() {
    let mut tree = SearchTree::new(&UltimateTicTacToe::new());
    let root = tree.root();

    tree.record_result(root, 0.5);
    assert_eq!(tree.get(root).visits(), 1);
    assert_eq!(tree.get(root).total_reward(), 0.5);

    tree.record_result(root, 1.0);
    assert_eq!(tree.get(root).visits(), 2);
    assert_eq!(tree.get(root).total_reward(), 1.5);
    assert_eq!(tree.get(root).value(), 0.75);
}

#[test]
fn test_backpropagation_scores_each_node_from_its_own_viewpoint() {
    let game = near_win();
    let mut tree = SearchTree::new(&game);

    let action = mv(2, 2);
    let mut terminal = game.clone();
    terminal.do_move(&action).unwrap();
    let child = tree.expand_child(tree.root(), &action, &terminal).unwrap();

    assert!(tree.get(child).is_terminal());

    tree.backpropagate(child, &terminal).unwrap();

    // X made the winning move into the child; O had "just moved" at the root
    assert_eq!(tree.get(child).visits(), 1);
    assert_eq!(tree.get(child).total_reward(), 1.0);
    assert_eq!(tree.get(tree.root()).visits(), 1);
    assert_eq!(tree.get(tree.root()).total_reward(), 0.0);
}

#[test]
fn test_backpropagation_requires_terminal_state() {
    let game = UltimateTicTacToe::new();
    let mut tree = SearchTree::new(&game);

    let result = tree.backpropagate(tree.root(), &game);
    assert_eq!(result, Err(UctError::NonTerminalResult));
    assert_eq!(tree.get(tree.root()).visits(), 0);
}

#[test]
fn test_node_accounting_after_search() {
    let iterations = 300;
    let config = UctConfig::default().with_iterations(iterations);
    let mut search = UctSearch::new(UltimateTicTacToe::new(), config);
    let mut rng = ChaCha20Rng::seed_from_u64(8);

    let tree = search.build_tree(&mut rng).unwrap();
    let root = tree.get(tree.root());

    assert_eq!(root.visits(), iterations as u64);

    let child_visits: u64 = tree
        .children(tree.root())
        .iter()
        .map(|&child| tree.get(child).visits())
        .sum();
    assert_eq!(child_visits, iterations as u64);
    assert_eq!(search.get_statistics().root_visits, iterations as u64);
}

#[test]
fn test_every_node_is_consistent_after_search() {
    let config = UctConfig::default().with_iterations(500).with_seed(21);
    let mut search = UctSearch::new(UltimateTicTacToe::new(), config);
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let tree = search.build_tree(&mut rng).unwrap();

    let mut stack = vec![tree.root()];
    let mut seen = 0;
    while let Some(id) = stack.pop() {
        seen += 1;
        let node = tree.get(id);

        assert!(node.visits() >= 1);
        assert!(node.total_reward() >= 0.0);
        assert!(node.total_reward() <= node.visits() as f64);

        let child_visits: u64 = node.children.iter().map(|&c| tree.get(c).visits()).sum();
        assert!(child_visits <= node.visits());

        for &child in &node.children {
            assert_eq!(tree.get(child).parent, Some(id));
            assert_eq!(tree.get(child).depth, node.depth + 1);
            assert_ne!(tree.get(child).player_just_moved, node.player_just_moved);
            stack.push(child);
        }
    }

    // Reachable from the root exactly once each: no cycles, no orphans
    assert_eq!(seen, tree.len());
}

#[test]
fn test_most_visited_child_prefers_first_on_ties() {
    let game = UltimateTicTacToe::new();
    let mut tree = SearchTree::new(&game);

    let mut children = Vec::new();
    for cell in [0, 1, 2] {
        let action = mv(0, cell);
        let mut next = game.clone();
        next.do_move(&action).unwrap();
        children.push(tree.expand_child(tree.root(), &action, &next).unwrap());
    }

    tree.record_result(children[1], 0.0);
    tree.record_result(children[2], 1.0);
    assert_eq!(tree.most_visited_child(tree.root()), Some(children[1]));
    assert_eq!(tree.best_action(), Some(mv(0, 1)));

    tree.record_result(children[2], 1.0);
    assert_eq!(tree.most_visited_child(tree.root()), Some(children[2]));
}

#[test]
fn test_leaf_has_no_best_child() {
    let tree = SearchTree::new(&UltimateTicTacToe::new());
    assert_eq!(tree.most_visited_child(tree.root()), None);
    assert_eq!(tree.best_action(), None);
    assert_eq!(tree.select_best_child_by_ucb1(tree.root(), 1.0), None);
}
