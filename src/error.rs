/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::{Move, PieceKind, Square};

/// Reasons the game refused to apply a move or a promotion choice.
///
/// None of these mutate the game: the state is exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The move breaks a rule of chess for the side to move.
    #[error("Illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// A Pawn is waiting on its promotion choice; no other move may be made until it is resolved.
    #[error("A promotion choice for the Pawn on {square} is pending")]
    PromotionPending { square: Square },

    /// The game has ended.
    #[error("The game is over")]
    GameOver,

    /// A promotion choice was supplied but no Pawn is waiting for one.
    #[error("No promotion is pending")]
    NoPendingPromotion,

    /// Pawns may only become a Knight, Bishop, Rook, or Queen.
    #[error("Cannot promote to a {kind}")]
    InvalidPromotionChoice { kind: PieceKind },

    /// The square stored for a pending promotion holds no piece.
    #[error("No piece on promotion square {square}")]
    InvalidSquare { square: Square },

    /// The square stored for a pending promotion holds something other than a Pawn.
    #[error("The piece on {square} is not a Pawn")]
    NotAPawn { square: Square },
}

/// A move proposed by an external engine did not fit the game it was meant for.
///
/// The move is never applied, and the proposal should not be retried automatically.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationError {
    /// The game rejected the proposed move.
    #[error("Engine proposed {mv}, which the game rejected: {source}")]
    IllegalEngineMove {
        mv: Move,
        #[source]
        source: MoveError,
    },

    /// The proposed move reaches the last row with a Pawn but names no promotion piece.
    #[error("Engine move {mv} promotes a Pawn but names no piece")]
    MissingPromotion { mv: Move },

    /// The proposed move names a promotion piece but is not a Pawn reaching the last row.
    #[error("Engine move {mv} names a promotion piece but is not a promotion")]
    UnexpectedPromotion { mv: Move },
}

/// Result type alias for move and promotion attempts.
pub type MoveResult<T> = Result<T, MoveError>;
