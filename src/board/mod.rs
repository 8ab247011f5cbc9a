/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Raw attack patterns of each piece.
mod attacks;

/// Reading and writing FEN strings.
mod fen;

/// The game state machine: turns, castling rights, en passant, promotion, and the move log.
mod game;

/// Legality of individual moves, check detection, and move enumeration.
mod movegen;

/// Moves as an external move source describes them.
mod moves;

/// Algebraic notation of completed moves.
mod notation;

/// Performance testing of move generation.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// The board itself, and castling rights.
mod position;

/// Squares on the board.
mod square;

/// Misc constants.
mod utils;

pub use attacks::*;
pub(crate) use attacks::path_is_clear;
pub use game::*;
pub(crate) use movegen::en_passant_victim;
pub use moves::*;
pub use notation::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use utils::*;
