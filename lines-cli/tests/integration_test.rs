//! Integration tests for the Lines game
//!
//! Tests the full stack: board rules, the turn protocol, saved games,
//! and the record table

use lines_core::{
    board::{Board, BoardConfig, BoardError},
    grid::Pos,
    save::SavedGame,
    token::Token,
};
use lines_store::{load_game, save_game, RecordsStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A standard board with the opening injection already on it
fn opened_board(seed: u64) -> Board {
    let mut board = Board::new(9, "Player", rng(seed));
    board.inject_pending().unwrap();
    board
}

/// Find a step the rules accept on the current board
fn any_legal_step(board: &Board) -> (Pos, Pos) {
    for y in 0..board.height() {
        for x in 0..board.width() {
            let from = Pos::new(x, y);
            if board.get(from).is_none() {
                continue;
            }
            for to_y in 0..board.height() {
                for to_x in 0..board.width() {
                    let to = Pos::new(to_x, to_y);
                    if board.can_move(from, to) {
                        return (from, to);
                    }
                }
            }
        }
    }
    panic!("no legal step on the board");
}

// ============================================================================
// TURN PROTOCOL
// ============================================================================

#[test]
fn test_full_turn_on_a_fresh_board() {
    let mut board = opened_board(42);
    assert_eq!(board.free_cell_count(), 78);

    let (from, to) = any_legal_step(&board);
    let report = board.play_turn(from, to).unwrap();

    assert_eq!(report.from, from);
    assert_eq!(report.to, to);

    // Three tokens on the board cannot reach the five-run threshold, so
    // the turn injected a fresh round
    assert_eq!(report.injected.len(), 3);
    if report.cleared.is_empty() {
        assert_eq!(board.free_cell_count(), 75);
    } else {
        assert!(board.free_cell_count() >= 80);
    }
}

#[test]
fn test_games_with_the_same_seed_play_identically() {
    let mut a = opened_board(7);
    let mut b = opened_board(7);

    for _ in 0..3 {
        let step_a = any_legal_step(&a);
        let step_b = any_legal_step(&b);
        assert_eq!(step_a, step_b);

        a.play_turn(step_a.0, step_a.1).unwrap();
        b.play_turn(step_b.0, step_b.1).unwrap();
    }

    assert_eq!(SavedGame::capture(&a), SavedGame::capture(&b));
}

#[test]
fn test_injection_eventually_fills_the_board() {
    let mut board = Board::new(5, "Player", rng(13));

    let mut rounds = 0;
    while board.inject_pending().is_ok() {
        rounds += 1;
        assert!(rounds <= 9, "a 25-cell board holds at most 8 full rounds");
    }

    // The terminal signal leaves fewer free cells than one round needs
    assert!(board.free_cell_count() < 3);
    assert!(rounds >= 7);
}

#[test]
fn test_scripted_game_to_game_over() {
    // A 2x2 board fills on the very first non-clearing turn
    let mut board = Board::with_config(2, 2, "Player", BoardConfig::default(), rng(1));
    board.place(Pos::new(0, 0), Token::new(1)).unwrap();
    board.place(Pos::new(0, 1), Token::new(2)).unwrap();
    board.place(Pos::new(1, 0), Token::new(3)).unwrap();

    let err = board.play_turn(Pos::new(1, 0), Pos::new(1, 1)).unwrap_err();
    assert_eq!(err, BoardError::BoardFull);
    assert_eq!(board.free_cell_count(), 0);
}

// ============================================================================
// SAVED GAMES THROUGH THE GATEWAY
// ============================================================================

#[test]
fn test_played_game_survives_the_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");

    let mut board = opened_board(21);
    let (from, to) = any_legal_step(&board);
    board.play_turn(from, to).unwrap();

    let saved = SavedGame::capture(&board);
    save_game(&saved, &path).unwrap();
    let loaded = load_game(&path).unwrap();
    assert_eq!(loaded, saved);

    let restored = loaded.restore(BoardConfig::default(), rng(2)).unwrap();
    assert_eq!(SavedGame::capture(&restored), saved);
    assert_eq!(restored.free_cell_count(), board.free_cell_count());
    assert_eq!(restored.score(), board.score());
}

#[test]
fn test_restored_game_keeps_playing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");

    let board = opened_board(33);
    save_game(&SavedGame::capture(&board), &path).unwrap();

    let mut restored = load_game(&path)
        .unwrap()
        .restore(BoardConfig::default(), rng(34))
        .unwrap();

    let (from, to) = any_legal_step(&restored);
    restored.play_turn(from, to).unwrap();
    assert!(restored.free_cell_count() < board.free_cell_count());
}

// ============================================================================
// RECORD TABLE
// ============================================================================

#[test]
fn test_finished_games_feed_the_record_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordsStore::new(dir.path().join("records.json"));

    let mut board = Board::with_config(
        9,
        9,
        "Alice",
        BoardConfig { run_threshold: 3, ..BoardConfig::default() },
        rng(5),
    );
    board.place(Pos::new(0, 0), Token::new(1)).unwrap();
    board.place(Pos::new(1, 0), Token::new(1)).unwrap();
    board.place(Pos::new(4, 4), Token::new(1)).unwrap();

    let report = board.play_turn(Pos::new(4, 4), Pos::new(2, 0)).unwrap();
    assert_eq!(report.cleared.len(), 3);

    store.add_record(board.player(), board.score()).unwrap();
    store.add_record("Bob", 10).unwrap();

    assert_eq!(
        store.records().unwrap(),
        vec![("Alice".to_string(), 30), ("Bob".to_string(), 10)]
    );
}

#[test]
fn test_record_table_keeps_the_best_of_repeat_games() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordsStore::new(dir.path().join("records.json"));

    store.add_record("Alice", 120).unwrap();
    store.add_record("Alice", 70).unwrap();
    store.add_record("Alice", 150).unwrap();

    assert_eq!(store.records().unwrap(), vec![("Alice".to_string(), 150)]);
}
