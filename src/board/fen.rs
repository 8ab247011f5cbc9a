/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{anyhow, bail, Context, Result};

use super::{Board, CastlingRights, Color, GameState, PieceKind, Square};

impl GameState {
    /// Creates a game from a [FEN](https://www.chessprogramming.org/Forsyth-Edwards_Notation) string.
    ///
    /// The halfmove clock and fullmove number may be omitted and default to `0` and `1`.
    ///
    /// FEN carries no per-piece movement history, so it is inferred: a King or Rook counts as unmoved
    /// only if a castling right still depends on it, and a Pawn counts as unmoved only on its
    /// starting row. Castling rights that name a missing King or Rook are dropped.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState, FEN_KIWIPETE};
    /// let state = GameState::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(state.side_to_move(), Color::White);
    /// assert!(state.castling_rights(Color::Black).kingside());
    /// assert_eq!(state.to_fen(), FEN_KIWIPETE);
    ///
    /// assert!(GameState::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut fields = fen.split_ascii_whitespace();

        let placements = fields
            .next()
            .ok_or(anyhow!("FEN string must have piece placements"))?;
        let mut board = Board::from_fen(placements)?;

        let side_to_move = match fields.next().unwrap_or("w") {
            "w" | "W" => Color::White,
            "b" | "B" => Color::Black,
            other => bail!("Invalid side to move in FEN: expected `w` or `b`. Got {other:?}"),
        };

        let castling = parse_castling(fields.next().unwrap_or("-"), &board)?;

        let en_passant = match fields.next().unwrap_or("-") {
            "-" => None,
            square => Some(
                Square::from_uci(square)
                    .with_context(|| format!("Invalid en passant square in FEN {fen:?}"))?,
            ),
        };

        let halfmove_clock = fields
            .next()
            .unwrap_or("0")
            .parse()
            .with_context(|| format!("Invalid halfmove clock in FEN {fen:?}"))?;
        let fullmove_number = fields
            .next()
            .unwrap_or("1")
            .parse()
            .with_context(|| format!("Invalid fullmove number in FEN {fen:?}"))?;

        infer_moved_flags(&mut board, &castling);

        Ok(Self::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }

    /// Generates a [FEN](https://www.chessprogramming.org/Forsyth-Edwards_Notation) string of this game.
    ///
    /// A castling right is only written if its King and Rook are still on their original squares.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Square, FEN_STARTPOS};
    /// let mut state = GameState::new();
    /// assert_eq!(state.to_fen(), FEN_STARTPOS);
    ///
    /// state.attempt_move(Square::E2, Square::E4).unwrap();
    /// assert_eq!(
    ///     state.to_fen(),
    ///     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    /// );
    /// ```
    pub fn to_fen(&self) -> String {
        let board = self.board();

        let mut castling = String::with_capacity(4);
        for color in Color::all() {
            let rights = self.castling_rights(color);
            for (rook_col, flag) in [(7, 'k'), (0, 'q')] {
                if rights.for_rook_col(rook_col) && castling_pieces_in_place(board, color, rook_col)
                {
                    castling.push(if color.is_white() {
                        flag.to_ascii_uppercase()
                    } else {
                        flag
                    });
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant()
            .map(|square| square.to_string())
            .unwrap_or_else(|| String::from("-"));

        format!(
            "{} {} {castling} {en_passant} {} {}",
            board.to_fen(),
            self.side_to_move().to_uci(),
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}

/// Parses the castling field of a FEN string, keeping only rights whose King and Rook are in place.
fn parse_castling(field: &str, board: &Board) -> Result<[CastlingRights; Color::COUNT]> {
    let mut castling = [CastlingRights::NONE; Color::COUNT];
    if field == "-" {
        return Ok(castling);
    }

    for c in field.chars() {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let rook_col = match c.to_ascii_lowercase() {
            'k' => 7,
            'q' => 0,
            _ => bail!("Invalid castling rights in FEN: expected some of `KQkq` or `-`. Got {field:?}"),
        };

        if castling_pieces_in_place(board, color, rook_col) {
            match rook_col {
                7 => castling[color].kingside = true,
                _ => castling[color].queenside = true,
            }
        }
    }

    Ok(castling)
}

/// King on its original square and a Rook of the same color in the corner at `rook_col`.
fn castling_pieces_in_place(board: &Board, color: Color, rook_col: usize) -> bool {
    let home = color.home_row() as u8;
    let king = Square::from_coords_unchecked(home, 4);
    let rook = Square::from_coords_unchecked(home, rook_col as u8);

    board
        .piece_at(king)
        .is_some_and(|piece| piece.is(color, PieceKind::King))
        && board
            .piece_at(rook)
            .is_some_and(|piece| piece.is(color, PieceKind::Rook))
}

/// Marks pieces as moved when the position shows that they must have moved.
fn infer_moved_flags(board: &mut Board, castling: &[CastlingRights; Color::COUNT]) {
    let placed: Vec<_> = board.iter().collect();

    for (square, piece) in placed {
        let color = piece.color();
        let rights = castling[color];
        let on_home_row = square.row() == color.home_row();

        let has_moved = match piece.kind() {
            PieceKind::Pawn => square.row() != color.pawn_row(),
            PieceKind::King => !(on_home_row && square.col() == 4 && rights != CastlingRights::NONE),
            PieceKind::Rook => !(on_home_row && rights.for_rook_col(square.col())),
            _ => false,
        };

        board.place(piece.with_moved(has_moved), square);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_short_fen() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(state.halfmove_clock(), 0);
        assert_eq!(state.fullmove_number(), 1);
        assert_eq!(state.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_castling_rights_need_pieces() {
        // No Rook on a1, so White's queenside right is dropped
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1").unwrap();
        assert!(state.castling_rights(Color::White).kingside());
        assert!(!state.castling_rights(Color::White).queenside());
        assert_eq!(state.to_fen(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    }

    #[test]
    fn test_moved_flags_are_inferred() {
        let state = GameState::from_fen("r3k2r/4p3/4P3/8/8/8/8/R3K2R w Kk - 0 1").unwrap();
        let board = state.board();
        let moved = |square: Square| board.piece_at(square).unwrap().has_moved();

        assert!(!moved(Square::E1));
        assert!(!moved(Square::H1));
        assert!(moved(Square::A1));
        assert!(!moved(Square::E7));
        assert!(moved(Square::E6));
    }

    #[test]
    fn test_rejects_malformed_fields() {
        assert!(GameState::from_fen("").is_err());
        assert!(GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w X - 0 1").is_err());
        assert!(GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - e9 0 1").is_err());
        assert!(GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1").is_err());
    }
}
