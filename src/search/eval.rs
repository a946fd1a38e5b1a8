use cozy_chess::{Color, Piece, Square};
use serde::{Deserialize, Serialize};

use crate::board::{opponent, GameBoard, SkippedTurn};

pub type Score = i32;

// SCORE_WORST == -SCORE_BEST
pub const SCORE_BEST: Score = i32::MAX;
pub const SCORE_WORST: Score = -i32::MAX;
pub const DRAW_SCORE: Score = 0;

/// Piece values in pawns; scaled by `EvalConfig::material_weight`.
pub const PIECE_VALUES: [(Piece, Score); 5] = [
    (Piece::Pawn, 1),
    (Piece::Knight, 3),
    (Piece::Bishop, 3),
    (Piece::Rook, 5),
    (Piece::Queen, 9),
];

pub const MATERIAL_WEIGHT: Score = 10;
pub const CENTER_WEIGHT: Score = 10;

const TRUE_CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];
// rank*64+file indices wrapped into a 64-bit mask: 195, 196, 259, 260 -> d1, e1, d1, e1
const ALIASED_CENTER: [Square; 4] = [Square::D1, Square::E1, Square::D1, Square::E1];

/// Which squares the center-control probe inspects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterProbe {
    /// d4, e4, d5, e5.
    #[default]
    Center,
    /// The squares the `rank * 64 + file` indexing actually lands on.
    /// Only the squares change: scoring keeps the signs of `contest`, so
    /// this does not reproduce that indexing's scores bit for bit.
    Aliased,
}

impl CenterProbe {
    pub fn squares(self) -> &'static [Square; 4] {
        match self {
            CenterProbe::Center => &TRUE_CENTER,
            CenterProbe::Aliased => &ALIASED_CENTER,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub material_weight: Score,
    pub center_weight: Score,
    pub center_probe: CenterProbe,
    /// Legal-move-count term. Zero disables it; it is off unless configured.
    pub mobility_weight: Score,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            material_weight: MATERIAL_WEIGHT,
            center_weight: CENTER_WEIGHT,
            center_probe: CenterProbe::Center,
            mobility_weight: 0,
        }
    }
}

/// Static score of `board` from `us`'s point of view. Higher is better for `us`.
///
/// The board is only mutated by the center probe's null moves, each of which
/// is undone before returning.
pub fn evaluate<B: GameBoard>(board: &mut B, us: Color, cfg: &EvalConfig) -> Score {
    if board.is_checkmate() {
        return if board.side_to_move() == us { SCORE_WORST } else { SCORE_BEST };
    }
    material(board, us, cfg.material_weight)
        + center_control(board, us, cfg)
        + mobility(board, us, cfg.mobility_weight)
}

/// Material balance, king excluded.
pub fn material<B: GameBoard>(board: &B, us: Color, weight: Score) -> Score {
    let them = opponent(us);
    PIECE_VALUES
        .iter()
        .map(|&(piece, value)| {
            let ours = board.piece_count(piece, us) as Score;
            let theirs = board.piece_count(piece, them) as Score;
            (ours - theirs) * value * weight
        })
        .sum()
}

/// Probes each center square from both sides: once as the position stands
/// (attacks of the side not to move), once after a null move (attacks of the
/// side to move). Control by `us` scores positive.
pub fn center_control<B: GameBoard>(board: &mut B, us: Color, cfg: &EvalConfig) -> Score {
    if cfg.center_weight == 0 { return 0; }
    let mut score = 0;
    for &sq in cfg.center_probe.squares() {
        score += contest(&*board, sq, us, cfg.center_weight);
        if let Some(skipped) = SkippedTurn::try_new(board) {
            score += contest(&*skipped, sq, us, cfg.center_weight);
        }
    }
    score
}

fn contest<B: GameBoard>(board: &B, sq: Square, us: Color, weight: Score) -> Score {
    if !board.is_square_attacked_by_opponent(sq) { return 0; }
    // the attacker is whoever is not to move
    if board.side_to_move() == us { -weight } else { weight }
}

fn mobility<B: GameBoard>(board: &B, us: Color, weight: Score) -> Score {
    if weight == 0 { return 0; }
    let n = board.legal_moves().len() as Score;
    if board.side_to_move() == us { weight * n } else { -weight * n }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    fn eval_fen(fen: &str, us: Color) -> Score {
        let mut pos = Position::from_fen(fen).unwrap();
        evaluate(&mut pos, us, &EvalConfig::default())
    }

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(eval_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", Color::White), 0);
    }

    #[test]
    fn material_counts_extra_queen() {
        let pos = Position::from_fen("k7/8/8/8/8/8/4Q3/7K w - - 0 1").unwrap();
        assert_eq!(material(&pos, Color::White, MATERIAL_WEIGHT), 90);
        assert_eq!(material(&pos, Color::Black, MATERIAL_WEIGHT), -90);
    }

    #[test]
    fn center_rewards_our_attacks_only() {
        // White knight f3 covers d4 and e5; nothing black reaches the center.
        let mut pos = Position::from_fen("4k3/8/8/8/8/5N2/8/4K3 b - - 0 1").unwrap();
        let cfg = EvalConfig::default();
        assert_eq!(center_control(&mut pos, Color::White, &cfg), 2 * CENTER_WEIGHT);
        assert_eq!(center_control(&mut pos, Color::Black, &cfg), -2 * CENTER_WEIGHT);
        assert_eq!(pos.pending_undos(), 0);
    }

    #[test]
    fn aliased_probe_inspects_back_rank() {
        // The rook on d8 covers d1, which appears twice in the aliased list, and d4/d5 of the true center.
        let mut pos = Position::from_fen("3rk3/8/8/8/8/8/8/7K w - - 0 1").unwrap();
        let cfg = EvalConfig { center_probe: CenterProbe::Aliased, ..EvalConfig::default() };
        assert_eq!(center_control(&mut pos, Color::White, &cfg), -2 * CENTER_WEIGHT);
        assert_eq!(center_control(&mut pos, Color::White, &EvalConfig::default()), -2 * CENTER_WEIGHT);
    }

    #[test]
    fn mobility_is_off_by_default() {
        let fen = "4k3/8/8/8/8/5N2/8/4K3 w - - 0 1";
        let mut pos = Position::from_fen(fen).unwrap();
        let base = evaluate(&mut pos, Color::White, &EvalConfig::default());
        let cfg = EvalConfig { mobility_weight: 1, ..EvalConfig::default() };
        let with = evaluate(&mut pos, Color::White, &cfg);
        assert_eq!(with - base, pos.legal_moves().len() as Score);
    }
}
