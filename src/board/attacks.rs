/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, PieceKind, Square};

/// Returns `true` if the piece on `from` could capture on `to` by its raw movement pattern.
///
/// Whose turn it is and whether the attacker is pinned are both ignored. Occupancy still matters:
/// a piece never attacks a square held by its own side, and sliding pieces are blocked by anything
/// in between. Pawns only attack diagonally forward, en passant is not considered, and Kings
/// attack their eight neighbours only (castling is not an attack).
///
/// If `from` is empty, nothing is attacked.
///
/// # Example
/// ```
/// # use arbiter::{attacks, Board, Square};
/// let board = Board::standard();
/// assert!(attacks(&board, Square::G1, Square::F3)); // Knight
/// assert!(attacks(&board, Square::E2, Square::D3)); // Pawn, diagonally
/// assert!(!attacks(&board, Square::E2, Square::E3)); // Pushes are not attacks
/// assert!(!attacks(&board, Square::D1, Square::D4)); // Queen is blocked by her own Pawn
/// ```
pub fn attacks(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };

    if from == to || board.color_at(to) == Some(piece.color()) {
        return false;
    }

    let (d_row, d_col) = from.delta(to);
    let (abs_row, abs_col) = (d_row.abs(), d_col.abs());

    match piece.kind() {
        PieceKind::Pawn => d_row == piece.color().forward() && abs_col == 1,
        PieceKind::Knight => matches!((abs_row, abs_col), (1, 2) | (2, 1)),
        PieceKind::Bishop => abs_row == abs_col && path_is_clear(board, from, to),
        PieceKind::Rook => (d_row == 0 || d_col == 0) && path_is_clear(board, from, to),
        PieceKind::Queen => {
            (abs_row == abs_col || d_row == 0 || d_col == 0) && path_is_clear(board, from, to)
        }
        PieceKind::King => abs_row <= 1 && abs_col <= 1,
    }
}

/// Returns `true` if any piece of color `by` attacks `square`.
///
/// # Example
/// ```
/// # use arbiter::{square_is_attacked, Board, Color, Square};
/// let board = Board::standard();
/// assert!(square_is_attacked(&board, Square::F6, Color::Black));
/// assert!(!square_is_attacked(&board, Square::E4, Color::Black));
/// ```
pub fn square_is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .iter_color(by)
        .any(|(from, _)| attacks(board, from, square))
}

/// Iterates over the squares strictly between `from` and `to`.
///
/// The two squares must share a row, column, or diagonal; otherwise the iterator is empty.
pub(crate) fn squares_between(from: Square, to: Square) -> impl Iterator<Item = Square> {
    let (d_row, d_col) = from.delta(to);
    let aligned = d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs();
    let steps = if aligned {
        d_row.abs().max(d_col.abs())
    } else {
        0
    };
    let (step_row, step_col) = (d_row.signum(), d_col.signum());

    (1..steps).filter_map(move |i| from.offset(step_row * i, step_col * i))
}

/// Returns `true` if every square strictly between `from` and `to` is empty.
#[inline(always)]
pub(crate) fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    squares_between(from, to).all(|square| !board.has(square))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares_between() {
        let between: Vec<_> = squares_between(Square::A1, Square::D4).collect();
        assert_eq!(between, [Square::B2, Square::C3]);

        let between: Vec<_> = squares_between(Square::E1, Square::H1).collect();
        assert_eq!(between, [Square::F1, Square::G1]);

        assert_eq!(squares_between(Square::A1, Square::B3).count(), 0);
        assert_eq!(squares_between(Square::A1, Square::A2).count(), 0);
    }

    #[test]
    fn test_sliders_are_blocked() {
        let board = Board::from_fen("4k3/8/8/8/1p6/8/8/R2K3Q").unwrap();
        assert!(attacks(&board, Square::A1, Square::C1));
        assert!(!attacks(&board, Square::A1, Square::E1));
        assert!(attacks(&board, Square::H1, Square::B7));
        assert!(attacks(&board, Square::A1, Square::A8));
    }

    #[test]
    fn test_pawns_attack_diagonally_forward() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        assert!(attacks(&board, Square::E4, Square::D5));
        assert!(attacks(&board, Square::D5, Square::E4));
        assert!(!attacks(&board, Square::E4, Square::E5));
        assert!(!attacks(&board, Square::E4, Square::D3));
    }

    #[test]
    fn test_own_pieces_are_not_attacked() {
        let board = Board::standard();
        assert!(!attacks(&board, Square::A1, Square::A2));
        assert!(!attacks(&board, Square::E1, Square::D1));
        assert!(!square_is_attacked(&board, Square::E2, Color::White));
    }

    #[test]
    fn test_empty_square_attacks_nothing() {
        let board = Board::new();
        assert!(!attacks(&board, Square::E4, Square::E5));
    }
}
