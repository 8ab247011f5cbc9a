/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

/// Represents the color of a player or piece within a chess game.
///
/// In Western chess, White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists of two elements.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Row of this color's back rank, where its King and Rooks start.
    #[inline(always)]
    pub const fn home_row(&self) -> usize {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Row this color's Pawns start on, and may double-step from.
    #[inline(always)]
    pub const fn pawn_row(&self) -> usize {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row on which this color's Pawns promote.
    #[inline(always)]
    pub const fn promotion_row(&self) -> usize {
        self.opponent().home_row()
    }

    /// Row delta of a single Pawn step for this color.
    ///
    /// White moves "up" the board towards row 0.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Creates a [`Color`] from a character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Color;
    /// assert_eq!(Color::from_uci('w').unwrap(), Color::White);
    /// assert!(Color::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Invalid char for Color: Got {color:?}."),
        }
    }

    /// Converts this [`Color`] to a lowercase character, as used in FEN strings.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    /// [`Color`] can be used to index into a list of two elements.
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("Invalid str for Color: Got {s:?}."),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// The four kinds a Pawn may promote to, strongest first.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Returns `true` if a Pawn may be promoted to this kind.
    ///
    /// # Example
    /// ```
    /// # use arbiter::PieceKind;
    /// assert!(PieceKind::Knight.is_promotion_choice());
    /// assert!(!PieceKind::King.is_promotion_choice());
    /// ```
    #[inline(always)]
    pub const fn is_promotion_choice(&self) -> bool {
        matches!(self, Self::Knight | Self::Bishop | Self::Rook | Self::Queen)
    }

    /// Creates a new [`PieceKind`] from a character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use arbiter::PieceKind;
    /// assert_eq!(PieceKind::from_uci('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Converts this [`PieceKind`] to a lowercase character, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// The letter used for this kind in algebraic notation.
    ///
    /// Pawns have no letter.
    ///
    /// # Example
    /// ```
    /// # use arbiter::PieceKind;
    /// assert_eq!(PieceKind::Knight.notation_letter(), Some('N'));
    /// assert_eq!(PieceKind::Pawn.notation_letter(), None);
    /// ```
    #[inline(always)]
    pub const fn notation_letter(&self) -> Option<char> {
        match self {
            Self::Pawn => None,
            kind => Some(kind.to_uci().to_ascii_uppercase()),
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    /// Accepts either a single UCI character (`q`) or a full name (`queen`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 1 {
            return Self::from_uci(s.as_bytes()[0] as char);
        }

        match s.to_ascii_lowercase().as_str() {
            "pawn" => Ok(Self::Pawn),
            "knight" => Ok(Self::Knight),
            "bishop" => Ok(Self::Bishop),
            "rook" => Ok(Self::Rook),
            "queen" => Ok(Self::Queen),
            "king" => Ok(Self::King),
            _ => bail!("Invalid str for PieceKind: Got {s:?}."),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents a chess piece on the game board.
///
/// Pieces are values: two pieces of the same [`Color`] and [`PieceKind`] are interchangeable,
/// except for `has_moved`, which belongs to the piece instance and travels with it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    has_moved: bool,
}

impl Piece {
    /// Creates a new, unmoved [`Piece`] from the given [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Piece, Color, PieceKind};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert_eq!(white_knight.to_string(), "N");
    /// assert!(!white_knight.has_moved());
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns `true` once this piece has completed any move.
    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Returns `true` if this [`Piece`] is of the provided color and kind.
    #[inline(always)]
    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color == color && self.kind == kind
    }

    /// Returns a copy of this [`Piece`] flagged as having moved.
    #[inline(always)]
    pub const fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    /// Returns a copy of this [`Piece`] with its `has_moved` flag set to `has_moved`.
    #[inline(always)]
    pub const fn with_moved(self, has_moved: bool) -> Self {
        Self { has_moved, ..self }
    }

    /// Returns a copy of this [`Piece`] as the provided kind, keeping color and `has_moved`.
    #[inline(always)]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self { kind, ..self }
    }

    /// Creates a new, unmoved [`Piece`] from a FEN character. Uppercase is White.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Piece, Color, PieceKind};
    /// let black_rook = Piece::from_uci('r').unwrap();
    /// assert_eq!(black_rook.color(), Color::Black);
    /// assert_eq!(black_rook.kind(), PieceKind::Rook);
    /// ```
    #[inline(always)]
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, kind))
    }

    /// Converts this [`Piece`] into a FEN character. Uppercase is White.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self.color {
            Color::White => self.kind.to_uci().to_ascii_uppercase(),
            Color::Black => self.kind.to_uci(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)?;
        if self.has_moved {
            write!(f, " (moved)")?;
        }
        Ok(())
    }
}
