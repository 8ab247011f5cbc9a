/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arbiter::{
    apply_engine_move, attempt_move, export_log, initial_state, is_in_check, legal_destinations,
    position_command, replay, resolve_promotion, to_fen, CastlingRights, Color, GameState,
    IntegrationError, Move, MoveError, MoveOutcome, PieceKind, Square, FEN_STARTPOS,
};

fn play(state: &mut GameState, moves: &[&str]) {
    for mv in moves {
        let mv = Move::from_uci(mv).unwrap();
        attempt_move(state, mv.from(), mv.to()).unwrap();
    }
}

#[test]
fn test_double_step_then_en_passant() {
    let mut state =
        GameState::from_fen("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 3").unwrap();

    attempt_move(&mut state, Square::E2, Square::E4).unwrap();
    assert_eq!(state.en_passant(), Some(Square::E3));
    assert!(legal_destinations(&state, Square::D4).contains(&Square::E3));

    let outcome = attempt_move(&mut state, Square::D4, Square::E3).unwrap();
    assert_eq!(outcome.notation(), Some("xe3"));
    assert!(state.board().piece_at(Square::E4).is_none());
    assert_eq!(
        state.board().piece_at(Square::E3).map(|p| p.color()),
        Some(Color::Black)
    );
}

#[test]
fn test_en_passant_expires_after_one_ply() {
    let mut state =
        GameState::from_fen("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 3").unwrap();

    play(&mut state, &["e2e4", "b8c6"]);
    assert_eq!(state.en_passant(), None);

    play(&mut state, &["g1f3"]);
    assert_eq!(
        attempt_move(&mut state, Square::D4, Square::E3),
        Err(MoveError::IllegalMove {
            from: Square::D4,
            to: Square::E3
        })
    );
}

#[test]
fn test_kingside_castle() {
    let mut state = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();

    let outcome = attempt_move(&mut state, Square::E1, Square::G1).unwrap();
    assert_eq!(outcome.notation(), Some("O-O"));

    let rook = state.board().piece_at(Square::F1).unwrap();
    assert_eq!(rook.kind(), PieceKind::Rook);
    assert!(rook.has_moved());
    assert!(state.board().piece_at(Square::H1).is_none());
    assert_eq!(state.castling_rights(Color::White), CastlingRights::NONE);
}

#[test]
fn test_castling_gating_after_king_returns() {
    let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut state, &["e1f1", "a8a7", "f1e1", "a7a8"]);

    assert!(!state.is_legal(Square::E1, Square::G1));
    assert!(!state.is_legal(Square::E1, Square::C1));
    assert_eq!(state.castling_rights(Color::White), CastlingRights::NONE);
}

#[test]
fn test_castling_gating_after_rook_returns() {
    let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut state, &["h1h2", "a8a7", "h2h1", "a7a8"]);

    assert!(!state.is_legal(Square::E1, Square::G1));
    assert!(state.is_legal(Square::E1, Square::C1));
    assert_eq!(
        state.castling_rights(Color::Black),
        CastlingRights::new(true, false)
    );
}

#[test]
fn test_promotion_pauses_the_game() {
    let mut state = GameState::from_fen("8/P6k/8/8/8/8/8/4K3 w - - 0 1").unwrap();

    let outcome = attempt_move(&mut state, Square::A7, Square::A8).unwrap();
    assert_eq!(outcome, MoveOutcome::PendingPromotion);
    assert_eq!(state.side_to_move(), Color::White);
    assert_eq!(
        state.board().piece_at(Square::A8).map(|p| p.kind()),
        Some(PieceKind::Pawn)
    );
    assert!(legal_destinations(&state, Square::E1).is_empty());

    resolve_promotion(&mut state, PieceKind::Queen).unwrap();
    assert_eq!(state.side_to_move(), Color::Black);
    assert!(export_log(&state).last().unwrap().ends_with("=Q"));
    assert_eq!(
        state.board().piece_at(Square::A8).map(|p| p.kind()),
        Some(PieceKind::Queen)
    );
    assert_eq!(
        resolve_promotion(&mut state, PieceKind::Queen),
        Err(MoveError::NoPendingPromotion)
    );
}

#[test]
fn test_pawn_capture_notation() {
    let mut state = GameState::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();

    let outcome = attempt_move(&mut state, Square::E4, Square::D5).unwrap();
    assert_eq!(outcome.notation(), Some("xd5"));
    assert_eq!(export_log(&state), ["xd5"]);
}

#[test]
fn test_checking_promotion_ends_with_choice() {
    let mut state = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();

    attempt_move(&mut state, Square::A7, Square::A8).unwrap();
    let outcome = resolve_promotion(&mut state, PieceKind::Queen).unwrap();

    assert_eq!(outcome.notation(), Some("a8=Q"));
    assert!(export_log(&state).last().unwrap().ends_with("=Q"));
    assert!(state.in_check());
    assert!(is_in_check(&state, Color::Black));
}

#[test]
fn test_check_restricts_destinations() {
    // The Queen on a5 checks the King on e1 along the a5-e1 diagonal
    let state = GameState::from_fen("4k3/8/8/q7/8/8/2P5/4KBNR w - - 0 1").unwrap();
    assert!(is_in_check(&state, Color::White));
    assert!(state.in_check());

    assert_eq!(
        legal_destinations(&state, Square::C2).into_iter().collect::<Vec<_>>(),
        [Square::C3]
    );
    assert!(legal_destinations(&state, Square::F1).is_empty());
    assert!(legal_destinations(&state, Square::G1).is_empty());
    assert!(legal_destinations(&state, Square::H1).is_empty());
    assert_eq!(
        legal_destinations(&state, Square::E1).into_iter().collect::<Vec<_>>(),
        [Square::E2, Square::F2, Square::D1]
    );

    for mv in state.legal_moves() {
        let next = state.with_move_made(mv).unwrap();
        assert!(!is_in_check(&next, Color::White), "{mv} does not answer the check");
    }
}

#[test]
fn test_fools_mate() {
    let mut state = initial_state();
    play(&mut state, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert!(state.is_terminal());
    assert_eq!(state.winner(), Some(Color::Black));
    assert_eq!(export_log(&state), ["f3", "e5", "g4", "Qh4#"]);
    assert_eq!(
        attempt_move(&mut state, Square::E1, Square::F2),
        Err(MoveError::GameOver)
    );
}

#[test]
fn test_stalemate() {
    let mut state = GameState::from_fen("7k/5K2/4Q3/8/8/8/8/8 w - - 0 1").unwrap();

    let outcome = attempt_move(&mut state, Square::E6, Square::G6).unwrap();
    assert_eq!(outcome.notation(), Some("Qg6"));
    assert!(state.is_terminal());
    assert_eq!(state.winner(), None);
    assert!(!state.in_check());
}

#[test]
fn test_replay_round_trip() {
    let moves = ["e2e4", "c7c5", "g1f3", "d7d6", "f1b5", "c8d7", "e1g1", "b8c6"];

    let mut first = initial_state();
    play(&mut first, &moves);

    let mut second = initial_state();
    play(&mut second, &moves);

    assert_eq!(first, second);
    assert_eq!(replay(None, moves).unwrap(), first);
    assert_eq!(
        export_log(&first),
        ["e4", "c5", "Nf3", "d6", "Bb5+", "Bd7", "O-O", "Nc6"]
    );
}

#[test]
fn test_engine_adapter_boundary() {
    let mut state = initial_state();
    assert_eq!(to_fen(&state), FEN_STARTPOS);
    assert_eq!(position_command(&state), format!("position fen {FEN_STARTPOS}"));

    let before = state.clone();
    let castle = Move::from_uci("e1g1").unwrap();
    assert!(matches!(
        apply_engine_move(&mut state, castle),
        Err(IntegrationError::IllegalEngineMove { .. })
    ));
    assert_eq!(state, before);

    let e2e4 = Move::from_uci("e2e4").unwrap();
    assert_eq!(
        apply_engine_move(&mut state, e2e4),
        Ok(MoveOutcome::Completed("e4".into()))
    );
}

#[test]
fn test_log_export_layout() {
    let mut state = initial_state();
    play(&mut state, &["e2e4", "e7e5", "g1f3"]);

    assert_eq!(
        state.format_log(),
        "Chess Game Move Log\n==================\n\n1. e4\te5\n2. Nf3\t\n"
    );
}
