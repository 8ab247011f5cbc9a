/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Translation between games and external chess engines.
mod adapter;

/// All rules of chess: the board, attacks, move legality, and the game state machine.
mod board;

/// Commands accepted by the session host.
mod cli;

/// Errors returned by the game when a move or promotion is refused.
mod error;

/// The session host; reads commands from `stdin` and plays them against a game.
mod session;

pub use adapter::*;
pub use board::*;
pub use cli::*;
pub use error::*;
pub use session::*;
