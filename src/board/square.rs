/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

/// Represents a single square on an `8x8` chess board, addressed by `(row, column)`.
///
/// Rows are counted from Black's side of the board, so row `0` is Black's back rank (rank 8)
/// and row `7` is White's back rank (rank 1). Columns map onto files `a` through `h`.
///
/// Internally encoded as a single index, `square = col + row * 8`:
/// ```text
/// 8|  0  1  2  3  4  5  6  7
/// 7|  8  9 10 11 12 13 14 15
/// 6| 16 17 18 19 20 21 22 23
/// 5| 24 25 26 27 28 29 30 31
/// 4| 32 33 34 35 36 37 38 39
/// 3| 40 41 42 43 44 45 46 47
/// 2| 48 49 50 51 52 53 54 55
/// 1| 56 57 58 59 60 61 62 63
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// A [`Square`] is always on the board; every fallible constructor performs the bounds check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    pub const A1: Self = Self::from_coords_unchecked(7, 0);
    pub const A2: Self = Self::from_coords_unchecked(6, 0);
    pub const A3: Self = Self::from_coords_unchecked(5, 0);
    pub const A4: Self = Self::from_coords_unchecked(4, 0);
    pub const A5: Self = Self::from_coords_unchecked(3, 0);
    pub const A6: Self = Self::from_coords_unchecked(2, 0);
    pub const A7: Self = Self::from_coords_unchecked(1, 0);
    pub const A8: Self = Self::from_coords_unchecked(0, 0);

    pub const B1: Self = Self::from_coords_unchecked(7, 1);
    pub const B2: Self = Self::from_coords_unchecked(6, 1);
    pub const B3: Self = Self::from_coords_unchecked(5, 1);
    pub const B4: Self = Self::from_coords_unchecked(4, 1);
    pub const B5: Self = Self::from_coords_unchecked(3, 1);
    pub const B6: Self = Self::from_coords_unchecked(2, 1);
    pub const B7: Self = Self::from_coords_unchecked(1, 1);
    pub const B8: Self = Self::from_coords_unchecked(0, 1);

    pub const C1: Self = Self::from_coords_unchecked(7, 2);
    pub const C2: Self = Self::from_coords_unchecked(6, 2);
    pub const C3: Self = Self::from_coords_unchecked(5, 2);
    pub const C4: Self = Self::from_coords_unchecked(4, 2);
    pub const C5: Self = Self::from_coords_unchecked(3, 2);
    pub const C6: Self = Self::from_coords_unchecked(2, 2);
    pub const C7: Self = Self::from_coords_unchecked(1, 2);
    pub const C8: Self = Self::from_coords_unchecked(0, 2);

    pub const D1: Self = Self::from_coords_unchecked(7, 3);
    pub const D2: Self = Self::from_coords_unchecked(6, 3);
    pub const D3: Self = Self::from_coords_unchecked(5, 3);
    pub const D4: Self = Self::from_coords_unchecked(4, 3);
    pub const D5: Self = Self::from_coords_unchecked(3, 3);
    pub const D6: Self = Self::from_coords_unchecked(2, 3);
    pub const D7: Self = Self::from_coords_unchecked(1, 3);
    pub const D8: Self = Self::from_coords_unchecked(0, 3);

    pub const E1: Self = Self::from_coords_unchecked(7, 4);
    pub const E2: Self = Self::from_coords_unchecked(6, 4);
    pub const E3: Self = Self::from_coords_unchecked(5, 4);
    pub const E4: Self = Self::from_coords_unchecked(4, 4);
    pub const E5: Self = Self::from_coords_unchecked(3, 4);
    pub const E6: Self = Self::from_coords_unchecked(2, 4);
    pub const E7: Self = Self::from_coords_unchecked(1, 4);
    pub const E8: Self = Self::from_coords_unchecked(0, 4);

    pub const F1: Self = Self::from_coords_unchecked(7, 5);
    pub const F2: Self = Self::from_coords_unchecked(6, 5);
    pub const F3: Self = Self::from_coords_unchecked(5, 5);
    pub const F4: Self = Self::from_coords_unchecked(4, 5);
    pub const F5: Self = Self::from_coords_unchecked(3, 5);
    pub const F6: Self = Self::from_coords_unchecked(2, 5);
    pub const F7: Self = Self::from_coords_unchecked(1, 5);
    pub const F8: Self = Self::from_coords_unchecked(0, 5);

    pub const G1: Self = Self::from_coords_unchecked(7, 6);
    pub const G2: Self = Self::from_coords_unchecked(6, 6);
    pub const G3: Self = Self::from_coords_unchecked(5, 6);
    pub const G4: Self = Self::from_coords_unchecked(4, 6);
    pub const G5: Self = Self::from_coords_unchecked(3, 6);
    pub const G6: Self = Self::from_coords_unchecked(2, 6);
    pub const G7: Self = Self::from_coords_unchecked(1, 6);
    pub const G8: Self = Self::from_coords_unchecked(0, 6);

    pub const H1: Self = Self::from_coords_unchecked(7, 7);
    pub const H2: Self = Self::from_coords_unchecked(6, 7);
    pub const H3: Self = Self::from_coords_unchecked(5, 7);
    pub const H4: Self = Self::from_coords_unchecked(4, 7);
    pub const H5: Self = Self::from_coords_unchecked(3, 7);
    pub const H6: Self = Self::from_coords_unchecked(2, 7);
    pub const H7: Self = Self::from_coords_unchecked(1, 7);
    pub const H8: Self = Self::from_coords_unchecked(0, 7);

    pub const COUNT: usize = 64;

    /// Number of rows (and columns) on the board.
    pub const SIDE: usize = 8;

    /// Returns an iterator over all squares, starting at `a8` and ending at `h1`.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A8);
    /// assert_eq!(iter.last().unwrap(), Square::H1);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Creates a new [`Square`] from the provided row and column.
    ///
    /// Both `row` and `col` must be `[0, 7]` or else an error is returned.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Square;
    /// assert_eq!(Square::new(6, 4).unwrap(), Square::E2);
    /// assert!(Square::new(8, 0).is_err());
    /// ```
    #[inline(always)]
    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row >= Self::SIDE || col >= Self::SIDE {
            bail!("Invalid coordinates for Square: row and column must be between [0, 7]. Got ({row}, {col})");
        }
        Ok(Self::from_coords_unchecked(row as u8, col as u8))
    }

    /// Creates a new [`Square`] from the provided row and column, without bounds checking.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is greater than `7` and debug assertions are enabled.
    #[inline(always)]
    pub const fn from_coords_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "Row and column must be between [0,8)");
        Self(row << 3 | col)
    }

    /// Creates a new [`Square`] from its index, as laid out in the type-level diagram.
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= Self::COUNT {
            bail!("Invalid index for Square: Must be between [0, 63]. Got {index}");
        }
        Ok(Self(index as u8))
    }

    /// Returns the index of this [`Square`] as a `usize`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Row of this square; `0` is Black's back rank.
    #[inline(always)]
    pub const fn row(&self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Column of this square; `0` is the a-file.
    #[inline(always)]
    pub const fn col(&self) -> usize {
        (self.0 & 0b111) as usize
    }

    /// Returns the square reached by moving `d_row` rows and `d_col` columns, if it is still on the board.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Square;
    /// assert_eq!(Square::E2.offset(-2, 0), Some(Square::E4));
    /// assert_eq!(Square::H1.offset(0, 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if row < 0 || row > 7 || col < 0 || col > 7 {
            None
        } else {
            Some(Self::from_coords_unchecked(row as u8, col as u8))
        }
    }

    /// Signed `(row, column)` distance from `self` to `other`.
    #[inline(always)]
    pub const fn delta(&self, other: Self) -> (i8, i8) {
        (
            other.row() as i8 - self.row() as i8,
            other.col() as i8 - self.col() as i8,
        )
    }

    /// The file letter (`a` through `h`) of this square.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col() as u8) as char
    }

    /// The rank digit (`1` through `8`) of this square. Rank is `8 - row`.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row() as u8) as char
    }

    /// Creates a [`Square`] from a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Square;
    /// let e4 = Square::from_uci("e4").unwrap();
    /// assert_eq!((e4.row(), e4.col()), (4, 4));
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}")
        }

        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) {
            bail!("Invalid file in {square:?}: must be between [a, h]");
        }
        if !(b'1'..=b'8').contains(&rank) {
            bail!("Invalid rank in {square:?}: must be between [1, 8]");
        }

        Ok(Self::from_coords_unchecked(b'8' - rank, file - b'a'))
    }

    /// Converts this [`Square`] to a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Square;
    /// assert_eq!("c4", Square::C4.to_uci());
    /// ```
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper from [`Square::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;
    /// Wrapper from [`Square::from_uci`].
    #[inline(always)]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_uci(value)
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = anyhow::Error;
    /// Wrapper from [`Square::new`].
    #[inline(always)]
    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(row, col)
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_uci`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    /// Displays the square's name along with its `(row, column)` pair.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}, {})", self.row(), self.col())
    }
}
