/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{PieceKind, Square};

/// Writes a completed move in algebraic notation, without any check or promotion suffix.
///
/// `kind` is the moving piece as it stood before the move. A King moving two columns is written as
/// `O-O` or `O-O-O`. Pawns carry no letter, so a Pawn capture reads `xd5`.
///
/// # Example
/// ```
/// # use arbiter::{move_notation, PieceKind, Square};
/// assert_eq!(move_notation(PieceKind::Knight, Square::G1, Square::F3, false), "Nf3");
/// assert_eq!(move_notation(PieceKind::Pawn, Square::E4, Square::D5, true), "xd5");
/// assert_eq!(move_notation(PieceKind::Queen, Square::D1, Square::H5, true), "Qxh5");
/// assert_eq!(move_notation(PieceKind::King, Square::E8, Square::C8, false), "O-O-O");
/// ```
pub fn move_notation(kind: PieceKind, from: Square, to: Square, is_capture: bool) -> String {
    let (d_row, d_col) = from.delta(to);
    if kind == PieceKind::King && d_row == 0 && d_col.abs() == 2 {
        return if d_col > 0 { "O-O" } else { "O-O-O" }.to_string();
    }

    let mut notation = String::with_capacity(6);
    if let Some(letter) = kind.notation_letter() {
        notation.push(letter);
    }

    if is_capture {
        notation.push('x');
    }

    notation.push_str(&to.to_uci());
    notation
}

/// Suffix naming the piece a Pawn promoted to, such as `=Q`.
#[inline(always)]
pub fn promotion_suffix(kind: PieceKind) -> String {
    kind.notation_letter()
        .map(|letter| format!("={letter}"))
        .unwrap_or_default()
}

/// `#` for checkmate, `+` for check, and nothing otherwise.
#[inline(always)]
pub const fn check_suffix(gives_check: bool, is_mate: bool) -> &'static str {
    match (gives_check, is_mate) {
        (true, true) => "#",
        (true, false) => "+",
        _ => "",
    }
}
