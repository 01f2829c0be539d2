//! Pawn structure: doubled, isolated and passed pawns

use crate::board::{Color, PieceKind, Position};

const DOUBLED_PAWN_PENALTY: i32 = -15;
const ISOLATED_PAWN_PENALTY: i32 = -12;
/// Indexed by rank counted from the pawn's own side (0 = home rank)
const PASSED_PAWN_BONUS: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];

/// Pawn-structure score for `color`, from that side's point of view
pub(super) fn pawn_structure(position: &Position, color: Color) -> i32 {
    let mut own_files = [0u8; 8];
    let mut enemy_pawns = Vec::with_capacity(8);

    for (square, piece) in position.pieces() {
        if piece.kind != PieceKind::Pawn {
            continue;
        }
        if piece.color == color {
            own_files[square.file() as usize] += 1;
        } else {
            enemy_pawns.push(square);
        }
    }

    let mut score = 0;

    for (file, &count) in own_files.iter().enumerate() {
        if count > 1 {
            score += DOUBLED_PAWN_PENALTY * i32::from(count - 1);
        }
        if count > 0 {
            let left = file.checked_sub(1).map_or(0, |f| own_files[f]);
            let right = own_files.get(file + 1).copied().unwrap_or(0);
            if left == 0 && right == 0 {
                score += ISOLATED_PAWN_PENALTY * i32::from(count);
            }
        }
    }

    for (square, piece) in position.pieces() {
        if piece.kind != PieceKind::Pawn || piece.color != color {
            continue;
        }
        let blocked = enemy_pawns.iter().any(|enemy| {
            (i16::from(enemy.file()) - i16::from(square.file())).abs() <= 1
                && match color {
                    Color::White => enemy.rank() > square.rank(),
                    Color::Black => enemy.rank() < square.rank(),
                }
        });
        if !blocked {
            let relative_rank = match color {
                Color::White => square.rank(),
                Color::Black => 7 - square.rank(),
            };
            score += PASSED_PAWN_BONUS[relative_rank as usize];
        }
    }

    score
}
