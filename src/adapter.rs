/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use tracing::warn;

use crate::{GameState, IntegrationError, Move, MoveOutcome, Rules};

/// Describes `state` as an external engine reads it: piece placement, side to move, castling
/// availability, en passant square, and move counters.
#[inline(always)]
pub fn to_fen(state: &GameState) -> String {
    state.to_fen()
}

/// The `position` command that hands `state` to a UCI engine.
///
/// # Example
/// ```
/// # use arbiter::{position_command, GameState};
/// assert_eq!(
///     position_command(&GameState::new()),
///     "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
/// );
/// ```
#[inline(always)]
pub fn position_command(state: &GameState) -> String {
    format!("position fen {}", state.to_fen())
}

/// Applies a move chosen by an external engine.
///
/// The move is never corrected: if it is illegal, or its promotion piece is missing or unexpected,
/// an [`IntegrationError`] is returned and `state` is left as it was.
///
/// # Example
/// ```
/// # use arbiter::{apply_engine_move, GameState, IntegrationError, Move};
/// let mut state = GameState::new();
/// let e2e4 = Move::from_uci("e2e4").unwrap();
/// assert!(apply_engine_move(&mut state, e2e4).is_ok());
///
/// let again = apply_engine_move(&mut state, e2e4);
/// assert!(matches!(again, Err(IntegrationError::IllegalEngineMove { .. })));
/// ```
pub fn apply_engine_move(
    state: &mut GameState,
    mv: Move,
) -> Result<MoveOutcome, IntegrationError> {
    match state.make_move(mv) {
        Ok(notation) => Ok(MoveOutcome::Completed(notation)),
        Err(err) => {
            warn!(%mv, fen = %state.to_fen(), "rejected engine move: {err}");
            Err(err)
        }
    }
}

/// Builds a game from an optional FEN (the starting position if `None`) followed by UCI moves.
///
/// Fails on the first move that does not parse or does not fit the game.
#[inline(always)]
pub fn replay<T: AsRef<str>>(fen: Option<&str>, moves: impl IntoIterator<Item = T>) -> Result<GameState> {
    replay_with_rules(fen, moves, Rules::default())
}

/// Same as [`replay`], but every move is judged under `rules`.
pub fn replay_with_rules<T: AsRef<str>>(
    fen: Option<&str>,
    moves: impl IntoIterator<Item = T>,
    rules: Rules,
) -> Result<GameState> {
    let mut state = match fen {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new(),
    };
    state.set_rules(rules);

    for mv_str in moves {
        let mv_str = mv_str.as_ref();
        let mv = Move::from_uci(mv_str)?;
        apply_engine_move(&mut state, mv)
            .with_context(|| format!("Failed to apply move {mv_str:?}"))?;
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceKind, Square};

    #[test]
    fn test_replay_matches_manual_play() {
        let replayed = replay(None, ["e2e4", "e7e5", "g1f3"]).unwrap();

        let mut manual = GameState::new();
        manual.attempt_move(Square::E2, Square::E4).unwrap();
        manual.attempt_move(Square::E7, Square::E5).unwrap();
        manual.attempt_move(Square::G1, Square::F3).unwrap();

        assert_eq!(replayed, manual);
        assert_eq!(replayed.export_log(), ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_replay_rejects_mismatches() {
        assert!(replay(None, ["e2e5"]).is_err());
        assert!(replay(None, ["e2e4", "e2e4"]).is_err());
        assert!(replay(None, ["zz"]).is_err());
        assert!(replay(Some("not a fen"), Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_replay_uses_given_rules() {
        let fen = Some("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(replay(fen, ["e1g1"]).is_err());

        let rules = Rules {
            castle_through_check: true,
        };
        let state = replay_with_rules(fen, ["e1g1"], rules).unwrap();
        assert_eq!(state.export_log(), ["O-O"]);
        assert_eq!(state.rules(), &rules);
    }

    #[test]
    fn test_engine_promotion() {
        let mut state = GameState::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = Move::with_promotion(Square::B7, Square::B8, PieceKind::Rook);
        let outcome = apply_engine_move(&mut state, mv).unwrap();
        assert_eq!(outcome.notation(), Some("b8=R"));
    }

    #[test]
    fn test_rejected_engine_move_leaves_state_alone() {
        let mut state = GameState::new();
        let before = state.clone();
        let mv = Move::new(Square::E1, Square::G1);
        assert!(apply_engine_move(&mut state, mv).is_err());
        assert_eq!(state, before);
    }
}
