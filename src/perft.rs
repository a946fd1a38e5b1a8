use crate::board::{GameBoard, Played};

// Make/unmake perft over any board backend; the leaf count a full-width
// search of the same depth must reproduce.
pub fn perft<B: GameBoard>(board: &mut B, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = board.legal_moves();
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for mv in moves {
        let mut child = Played::new(board, mv);
        nodes += perft(&mut *child, depth - 1);
    }
    nodes
}
