/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt::{self, Write},
    ops::Index,
};

use anyhow::{bail, Result};

use super::{Color, Piece, PieceKind, Square};

/// Order of the pieces on each back rank in the standard starting position.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Represents the castling rights of a single player.
///
/// Rights only ever go from `true` to `false` over the course of a game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct CastlingRights {
    pub(crate) kingside: bool,
    pub(crate) queenside: bool,
}

impl CastlingRights {
    /// Both rights available, as at the start of a game.
    pub const ALL: Self = Self::new(true, true);

    /// No rights available.
    pub const NONE: Self = Self::new(false, false);

    /// Creates a new [`CastlingRights`] from its two flags.
    #[inline(always)]
    pub const fn new(kingside: bool, queenside: bool) -> Self {
        Self {
            kingside,
            queenside,
        }
    }

    /// Returns `true` if castling towards the h-file is still permitted.
    #[inline(always)]
    pub const fn kingside(&self) -> bool {
        self.kingside
    }

    /// Returns `true` if castling towards the a-file is still permitted.
    #[inline(always)]
    pub const fn queenside(&self) -> bool {
        self.queenside
    }

    /// Returns the right for the side of the board the Rook in column `rook_col` castles from.
    #[inline(always)]
    pub const fn for_rook_col(&self, rook_col: usize) -> bool {
        match rook_col {
            0 => self.queenside,
            7 => self.kingside,
            _ => false,
        }
    }

    /// Clears the right associated with a Rook originally in column `rook_col`.
    ///
    /// Columns other than `0` and `7` have no associated right and are ignored.
    #[inline(always)]
    pub fn revoke_for_rook_col(&mut self, rook_col: usize) {
        match rook_col {
            0 => self.queenside = false,
            7 => self.kingside = false,
            _ => {}
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of whose turn it is, castling rights, or en passant. If you need those, see [`crate::GameState`].
///
/// Performs no validation of its own: keeping the board sensible (one King per side, and so on) is up to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            squares: [None; Square::COUNT],
        }
    }

    /// Creates a [`Board`] in the standard starting layout, with every piece unmoved.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, FEN_STARTPOS};
    /// let board = Board::standard();
    /// assert_eq!(board.to_fen(), FEN_STARTPOS.split(' ').next().unwrap());
    /// assert_eq!(board.iter().count(), 32);
    /// ```
    pub fn standard() -> Self {
        let mut board = Self::new();

        for color in Color::all() {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                let back = Square::from_coords_unchecked(color.home_row() as u8, col as u8);
                board.place(Piece::new(color, kind), back);

                let pawn = Square::from_coords_unchecked(color.pawn_row() as u8, col as u8);
                board.place(Piece::new(color, PieceKind::Pawn), pawn);
            }
        }

        board
    }

    /// Constructs a [`Board`] from the placement field of a FEN string.
    ///
    /// Anything after the first space is ignored. Every piece is created unmoved.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Square, PieceKind};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    /// assert_eq!(board.piece_at(Square::H1).unwrap().kind(), PieceKind::Rook);
    /// assert!(Board::from_fen("8/8/8").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();
        let placements = fen.split(' ').next().unwrap_or_default();

        if placements.matches('/').count() != 7 {
            bail!("FEN must have piece placements for all 8 ranks. Got {placements:?}");
        }

        // FEN lists rank 8 first, which is row 0
        for (row, rank) in placements.split('/').enumerate() {
            let mut col = 0;

            for c in rank.chars() {
                if let Some(empty) = c.to_digit(10) {
                    col += empty as usize;
                } else {
                    let piece = Piece::from_uci(c)?;
                    let square = Square::new(row, col)?;
                    board.place(piece, square);
                    col += 1;
                }
            }

            if col != Square::SIDE {
                bail!("FEN rank {rank:?} must describe exactly 8 squares. Got {col}");
            }
        }

        Ok(board)
    }

    /// Generates the placement field of a FEN string for this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(64);

        for row in 0..Square::SIDE {
            let mut empty = 0;

            for col in 0..Square::SIDE {
                let square = Square::from_coords_unchecked(row as u8, col as u8);
                if let Some(piece) = self.piece_at(square) {
                    if empty > 0 {
                        placements.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placements.push(piece.to_uci());
                } else {
                    empty += 1;
                }
            }

            if empty > 0 {
                placements.push_str(&empty.to_string());
            }

            if row != Square::SIDE - 1 {
                placements.push('/');
            }
        }

        placements
    }

    /// Fetches the [`Piece`] on the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Sets the contents of `square`, overwriting whatever was there.
    #[inline(always)]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Places `piece` on `square`.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.set(square, Some(piece));
    }

    /// Removes and returns the [`Piece`] on `square`, if there is one.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// Returns `true` if there is a piece on `square`.
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.squares[square.index()].is_some()
    }

    /// Fetches the [`Color`] of the piece on `square`, if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Locates the King of the provided [`Color`].
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Color, Square};
    /// let board = Board::standard();
    /// assert_eq!(board.king_square(Color::White), Some(Square::E1));
    /// assert_eq!(board.king_square(Color::Black), Some(Square::E8));
    /// ```
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.iter()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(square, _)| square)
    }

    /// Iterates over every occupied square and its [`Piece`], row by row from `a8`.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Iterates over every square occupied by a piece of the provided [`Color`].
    #[inline(always)]
    pub fn iter_color(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index.index()]
    }
}

impl fmt::Display for Board {
    /// Draws the board as a text diagram, White at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..Square::SIDE {
            write!(f, "{}|", Square::SIDE - row)?;
            for col in 0..Square::SIDE {
                let square = Square::from_coords_unchecked(row as u8, col as u8);
                let piece_char = self.piece_at(square).map(|p| p.to_uci()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..Square::SIDE {
            write!(f, "--")?;
        }

        write!(f, "\n  ")?;
        for col in 0..Square::SIDE {
            f.write_char(' ')?;
            f.write_char((b'a' + col as u8) as char)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
