use cozy_chess::Color;
use plybot::board::GameBoard;
use plybot::uci::UciEngine;
use plybot::{EngineConfig, Position};

#[test]
fn apply_startpos_moves_sequence() {
    let moves = vec!["e2e4".to_string(), "e7e5".to_string(), "g1f3".to_string()];
    let pos = Position::set_from_start_and_moves(&moves).expect("legal move sequence");
    assert_eq!(pos.side_to_move(), Color::Black, "expected black to move after 3 plies");
}

#[test]
fn apply_fen_moves_with_promotion() {
    let moves = vec!["a7a8q".to_string(), "h7g6".to_string()];
    let pos = Position::set_from_fen_and_moves("8/P6k/8/8/8/8/8/K7 w - - 0 1", &moves).expect("legal move sequence");
    assert_eq!(pos.fen(), "Q7/8/6k1/8/8/8/8/K7 w - - 1 2");
}

#[test]
fn rejects_illegal_move_in_sequence() {
    let moves = vec!["e2e4".to_string(), "e2e4".to_string()];
    assert!(Position::set_from_start_and_moves(&moves).is_err());
}

#[test]
fn engine_answers_with_legal_move_after_moves() {
    let mut e = UciEngine::new(EngineConfig::reference().with_depth(2)).expect("valid config");
    e.cmd_position("startpos moves e2e4 e7e5 g1f3").expect("legal moves");
    let best = e.cmd_go(" movetime 10").expect("search");
    let pos = e.position().clone();
    assert!(pos.find_move(&best).is_some(), "{best} is not legal in {}", pos.fen());
    assert_eq!(pos.side_to_move(), Color::Black);
}
