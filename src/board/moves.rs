/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::{PieceKind, Square};

/// A candidate move: a start square, an end square, and the piece a Pawn promotes to, if any.
///
/// A [`Move`] carries no knowledge of the position it is played in. Whether it is legal,
/// a capture, or a castle is decided by [`crate::GameState`] when the move is attempted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new [`Move`] without a promotion.
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new [`Move`] that promotes to `kind`.
    #[inline(always)]
    pub const fn with_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// Square the moving piece starts on.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Square the moving piece ends on.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Kind the moving Pawn promotes to, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Creates a [`Move`] from a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// Will return a [`anyhow::Error`] if the string is invalid in any way.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, PieceKind, Square};
    /// let e7e8q = Move::from_uci("e7e8q").unwrap();
    /// assert_eq!(e7e8q, Move::with_promotion(Square::E7, Square::E8, PieceKind::Queen));
    ///
    /// assert!(Move::from_uci("e7").is_err());
    /// assert!(Move::from_uci("e7e8k").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let from = uci
            .get(0..2)
            .ok_or(anyhow!("Move str must contain a `from` square. Got {uci:?}"))?;
        let to = uci
            .get(2..4)
            .ok_or(anyhow!("Move str must contain a `to` square. Got {uci:?}"))?;

        let from = Square::from_uci(from)?;
        let to = Square::from_uci(to)?;

        let promotion = match uci.get(4..) {
            None | Some("") => None,
            Some(promo) if promo.len() == 1 => {
                let kind = PieceKind::from_uci(promo.as_bytes()[0] as char)?;
                if !kind.is_promotion_choice() {
                    bail!("Cannot promote to a {kind}. Got {uci:?}");
                }
                Some(kind)
            }
            Some(extra) => bail!("Move str has trailing characters {extra:?}. Got {uci:?}"),
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Converts this [`Move`] to a string, according to the [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, Square};
    /// assert_eq!(Move::new(Square::G1, Square::F3).to_uci(), "g1f3");
    /// ```
    pub fn to_uci(&self) -> String {
        if let Some(kind) = self.promotion {
            format!("{}{}{}", self.from, self.to, kind.to_uci())
        } else {
            format!("{}{}", self.from, self.to)
        }
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    /// Wrapper for [`Move::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    /// Displays the move in UCI notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} -> {:?})", self.to_uci(), self.from, self.to)
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_uci().eq(other.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_round_trip() {
        for uci in ["e2e4", "g8f6", "a7a8n", "h2h1q"] {
            assert_eq!(Move::from_uci(uci).unwrap().to_uci(), uci);
        }
    }

    #[test]
    fn test_uci_rejects_garbage() {
        assert!(Move::from_uci("").is_err());
        assert!(Move::from_uci("e2e9").is_err());
        assert!(Move::from_uci("e2e4qq").is_err());
        assert!(Move::from_uci("e7e8p").is_err());
    }

    #[test]
    fn test_move_equals_uci_str() {
        let mv = Move::new(Square::E2, Square::E4);
        assert_eq!(mv, "e2e4");
    }
}
