/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeSet;

use super::{
    attacks, path_is_clear, square_is_attacked, Color, GameState, Move, Piece, PieceKind, Square,
};

impl GameState {
    /// Returns `true` if moving the piece on `from` to `to` is legal for the side to move.
    ///
    /// A legal move follows its piece's movement pattern and does not leave the mover's own King attacked.
    /// Checking legality never mutates the game.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Square};
    /// let state = GameState::new();
    /// assert!(state.is_legal(Square::E2, Square::E4));
    /// assert!(state.is_legal(Square::G1, Square::F3));
    /// assert!(!state.is_legal(Square::E2, Square::E5));
    /// assert!(!state.is_legal(Square::E7, Square::E5)); // Not Black's turn
    /// ```
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        self.is_pseudo_legal(from, to) && self.is_check_safe(from, to)
    }

    /// Returns `true` if moving the piece on `from` to `to` follows every rule except check-safety.
    ///
    /// The move may still leave the mover's King attacked. Castling is the one exception: unless
    /// [`crate::Rules::castle_through_check`] is set, castling out of or through check is rejected here.
    pub fn is_pseudo_legal(&self, from: Square, to: Square) -> bool {
        let board = self.board();

        let Some(piece) = board.piece_at(from) else {
            return false;
        };

        if piece.color() != self.side_to_move()
            || from == to
            || board.color_at(to) == Some(piece.color())
        {
            return false;
        }

        match piece.kind() {
            PieceKind::Pawn => self.pawn_can_reach(piece.color(), from, to),
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                attacks(board, from, to)
            }
            PieceKind::King => attacks(board, from, to) || self.can_castle(piece, from, to),
        }
    }

    /// Pushes onto empty squares, a double push from the starting row, and diagonal captures (including en passant).
    fn pawn_can_reach(&self, color: Color, from: Square, to: Square) -> bool {
        let board = self.board();
        let forward = color.forward();
        let (d_row, d_col) = from.delta(to);

        if d_col == 0 {
            if board.has(to) {
                return false;
            }

            if d_row == forward {
                return true;
            }

            // Double push must also pass over an empty square
            d_row == 2 * forward
                && from.row() == color.pawn_row()
                && from.offset(forward, 0).is_some_and(|skipped| !board.has(skipped))
        } else if d_col.abs() == 1 && d_row == forward {
            board.has(to) || self.is_en_passant_capture(color, from, to)
        } else {
            false
        }
    }

    /// A diagonal step onto the en passant target with an enemy Pawn beside the mover.
    pub(crate) fn is_en_passant_capture(&self, color: Color, from: Square, to: Square) -> bool {
        self.en_passant() == Some(to)
            && from.col() != to.col()
            && self
                .board()
                .piece_at(en_passant_victim(from, to))
                .is_some_and(|victim| victim.is(color.opponent(), PieceKind::Pawn))
    }

    /// Castling: the King moves two columns toward an unmoved Rook in its corner.
    fn can_castle(&self, king: Piece, from: Square, to: Square) -> bool {
        let (d_row, d_col) = from.delta(to);
        if d_row != 0 || d_col.abs() != 2 || king.has_moved() {
            return false;
        }

        let color = king.color();
        let home = color.home_row();
        if from.row() != home || from.col() != 4 {
            return false;
        }

        let rook_col = if d_col > 0 { 7 } else { 0 };
        if !self.castling_rights(color).for_rook_col(rook_col) {
            return false;
        }

        let rook_square = Square::from_coords_unchecked(home as u8, rook_col as u8);
        let board = self.board();
        let rook_ready = board
            .piece_at(rook_square)
            .is_some_and(|rook| rook.is(color, PieceKind::Rook) && !rook.has_moved());

        if !rook_ready || !path_is_clear(board, from, rook_square) {
            return false;
        }

        if self.rules().castle_through_check {
            return true;
        }

        // The destination is covered by the ordinary check-safety simulation
        let enemy = color.opponent();
        let transit = from.offset(0, d_col.signum());
        !square_is_attacked(board, from, enemy)
            && transit.is_some_and(|transit| !square_is_attacked(board, transit, enemy))
    }

    /// Simulates the move on a copy of the board and checks that the mover's King is not attacked afterwards.
    fn is_check_safe(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.board().piece_at(from) else {
            return false;
        };

        let mut simulated = *self.board();
        if piece.kind() == PieceKind::Pawn && self.is_en_passant_capture(piece.color(), from, to) {
            simulated.take(en_passant_victim(from, to));
        }
        simulated.take(from);
        simulated.place(piece, to);

        match simulated.king_square(piece.color()) {
            Some(king) => !square_is_attacked(&simulated, king, piece.color().opponent()),
            None => true,
        }
    }

    /// Returns `true` if the King of `color` is attacked by any enemy piece.
    ///
    /// A side without a King is never in check.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState};
    /// let state = GameState::from_fen("4k3/8/8/8/8/8/8/q3K3 w - - 0 1").unwrap();
    /// assert!(state.is_in_check(Color::White));
    /// assert!(!state.is_in_check(Color::Black));
    /// ```
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board()
            .king_square(color)
            .is_some_and(|king| square_is_attacked(self.board(), king, color.opponent()))
    }

    /// Returns the set of squares the piece on `from` may legally move to.
    ///
    /// Empty if `from` holds no piece of the side to move, or if the game is not waiting on a move.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Square};
    /// let state = GameState::new();
    /// let knight = state.legal_destinations(Square::G1);
    /// assert_eq!(knight.into_iter().collect::<Vec<_>>(), [Square::F3, Square::H3]);
    /// assert!(state.legal_destinations(Square::E1).is_empty());
    /// ```
    pub fn legal_destinations(&self, from: Square) -> BTreeSet<Square> {
        if !self.phase().is_idle() {
            return BTreeSet::new();
        }

        Square::iter().filter(|&to| self.is_legal(from, to)).collect()
    }

    /// Returns every legal [`Move`] for the side to move.
    ///
    /// A Pawn move onto the last row is listed once per promotion choice.
    ///
    /// # Example
    /// ```
    /// # use arbiter::GameState;
    /// assert_eq!(GameState::new().legal_moves().len(), 20);
    /// ```
    pub fn legal_moves(&self) -> Vec<Move> {
        let color = self.side_to_move();
        let mut moves = Vec::new();

        for (from, piece) in self.board().iter_color(color) {
            for to in self.legal_destinations(from) {
                if piece.kind() == PieceKind::Pawn && to.row() == color.promotion_row() {
                    moves.extend(
                        PieceKind::PROMOTIONS
                            .into_iter()
                            .map(|kind| Move::with_promotion(from, to, kind)),
                    );
                } else {
                    moves.push(Move::new(from, to));
                }
            }
        }

        moves
    }

    /// Returns `true` if the side to move has at least one legal move, regardless of phase.
    pub(crate) fn has_any_legal_move(&self) -> bool {
        self.board()
            .iter_color(self.side_to_move())
            .any(|(from, _)| Square::iter().any(|to| self.is_legal(from, to)))
    }
}

/// Square of the Pawn removed by an en passant capture from `from` to `to`.
#[inline(always)]
pub(crate) const fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::from_coords_unchecked(from.row() as u8, to.col() as u8)
}
