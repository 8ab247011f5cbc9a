/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeSet, fmt};

use tracing::{debug, info};

use super::{
    check_suffix, en_passant_victim, move_notation, promotion_suffix, Board, CastlingRights,
    Color, Move, Piece, PieceKind, Square,
};
use crate::{IntegrationError, MoveError, MoveResult};

/// Optional deviations from the standard rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Rules {
    /// If set, castling only checks that the King's destination is safe, so a King may castle
    /// out of check or across an attacked square.
    pub castle_through_check: bool,
}

/// A Pawn that has reached the last row and is waiting to be told what to become.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct PendingPromotion {
    from: Square,
    square: Square,
    captured: Option<Piece>,
}

impl PendingPromotion {
    /// Square the Pawn moved from.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Square the Pawn is waiting on.
    #[inline(always)]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Piece the Pawn captured on its way to the last row, if any.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

/// Where a game is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Phase {
    /// Waiting on a move from the side to move.
    Idle,

    /// Waiting on a promotion choice. No moves are accepted until [`GameState::resolve_promotion`] succeeds.
    AwaitingPromotion(PendingPromotion),

    /// The game has ended. A `winner` of `None` is a stalemate.
    Terminal { winner: Option<Color> },
}

impl Phase {
    /// Returns `true` if the game is waiting on an ordinary move.
    #[inline(always)]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns `true` if the game has ended.
    #[inline(always)]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    /// The winning side of a finished game, if there is one.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::Terminal { winner } => *winner,
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "in progress"),
            Self::AwaitingPromotion(pending) => {
                write!(f, "awaiting promotion on {}", pending.square())
            }
            Self::Terminal { winner: Some(winner) } => write!(f, "checkmate, {winner} wins"),
            Self::Terminal { winner: None } => write!(f, "stalemate"),
        }
    }
}

/// Successful result of [`GameState::attempt_move`] or [`GameState::resolve_promotion`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// The move is complete and the turn has passed. Holds the move's log entry.
    Completed(String),

    /// A Pawn reached the last row; call [`GameState::resolve_promotion`] to finish the move.
    PendingPromotion,
}

impl MoveOutcome {
    /// The notation of a completed move.
    #[inline(always)]
    pub fn notation(&self) -> Option<&str> {
        match self {
            Self::Completed(notation) => Some(notation),
            Self::PendingPromotion => None,
        }
    }
}

/// A game of chess.
///
/// Owns the [`Board`] and everything else the rules need: whose turn it is, castling rights, the
/// en passant target, whether the side to move is in check, the game's [`Phase`], and the move log.
///
/// [`GameState::attempt_move`] and [`GameState::resolve_promotion`] are the only ways to change a game.
/// A rejected attempt never changes anything.
///
/// # Example
/// ```
/// # use arbiter::{Color, GameState, MoveOutcome, Square};
/// let mut state = GameState::new();
/// let outcome = state.attempt_move(Square::E2, Square::E4).unwrap();
/// assert_eq!(outcome, MoveOutcome::Completed("e4".into()));
/// assert_eq!(state.side_to_move(), Color::Black);
/// assert_eq!(state.en_passant(), Some(Square::E3));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    castling: [CastlingRights; Color::COUNT],
    en_passant: Option<Square>,
    in_check: bool,
    phase: Phase,
    log: Vec<String>,
    rules: Rules,
    halfmove_clock: usize,
    fullmove_number: usize,
}

impl GameState {
    /// Creates a new game in the standard starting position.
    #[inline(always)]
    pub fn new() -> Self {
        Self::from_parts(
            Board::standard(),
            Color::White,
            [CastlingRights::ALL; Color::COUNT],
            None,
            0,
            1,
        )
    }

    /// Assembles a game from its position, deriving the check flag and phase.
    pub(crate) fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: [CastlingRights; Color::COUNT],
        en_passant: Option<Square>,
        halfmove_clock: usize,
        fullmove_number: usize,
    ) -> Self {
        let mut state = Self {
            board,
            side_to_move,
            castling,
            en_passant,
            in_check: false,
            phase: Phase::Idle,
            log: Vec::new(),
            rules: Rules::default(),
            halfmove_clock,
            fullmove_number,
        };

        state.refresh_phase();
        state
    }

    /// Recomputes the check flag, and whether the side to move is checkmated or stalemated.
    fn refresh_phase(&mut self) {
        self.in_check = self.is_in_check(self.side_to_move);
        self.phase = if self.has_any_legal_move() {
            Phase::Idle
        } else {
            Phase::Terminal {
                winner: self.in_check.then_some(self.side_to_move.opponent()),
            }
        };
    }

    /// The pieces and their locations.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Castling rights of `color`.
    #[inline(always)]
    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        self.castling[color]
    }

    /// Square a Pawn may capture onto en passant during this ply, if any.
    #[inline(always)]
    pub const fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns `true` if the side to move is in check, meaning the last move delivered check.
    #[inline(always)]
    pub const fn in_check(&self) -> bool {
        self.in_check
    }

    /// Current [`Phase`] of the game.
    #[inline(always)]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` if the game has ended.
    #[inline(always)]
    pub const fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Winner of a finished game. `None` while the game is running, or after a stalemate.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        self.phase.winner()
    }

    /// The Pawn waiting on a promotion choice, if any.
    #[inline(always)]
    pub const fn pending_promotion(&self) -> Option<PendingPromotion> {
        match self.phase {
            Phase::AwaitingPromotion(pending) => Some(pending),
            _ => None,
        }
    }

    /// Rule options in effect for this game.
    #[inline(always)]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Replaces the rule options in effect for this game.
    ///
    /// Whether the side to move has any move left is decided again under the new rules, unless a
    /// promotion is pending or a King has been captured.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Rules, Square};
    /// let mut state = GameState::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    /// assert!(!state.is_legal(Square::E1, Square::G1));
    ///
    /// state.set_rules(Rules { castle_through_check: true });
    /// assert!(state.is_legal(Square::E1, Square::G1));
    /// ```
    pub fn set_rules(&mut self, rules: Rules) {
        self.rules = rules;

        let pending = matches!(self.phase, Phase::AwaitingPromotion(_));
        if !pending && self.board.king_square(self.side_to_move).is_some() {
            self.refresh_phase();
        }
    }

    /// Number of plies since the last capture or Pawn move.
    #[inline(always)]
    pub const fn halfmove_clock(&self) -> usize {
        self.halfmove_clock
    }

    /// Number of the current full move. Starts at `1` and increases after each Black move.
    #[inline(always)]
    pub const fn fullmove_number(&self) -> usize {
        self.fullmove_number
    }

    /// Every log entry, in the order the moves were played.
    ///
    /// While a promotion is pending, the last entry lacks its `=X` suffix.
    #[inline(always)]
    pub fn export_log(&self) -> &[String] {
        &self.log
    }

    /// Renders the move log as text, pairing White's and Black's moves on numbered lines.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Square};
    /// let mut state = GameState::new();
    /// state.attempt_move(Square::E2, Square::E4).unwrap();
    /// state.attempt_move(Square::E7, Square::E5).unwrap();
    /// state.attempt_move(Square::G1, Square::F3).unwrap();
    /// assert_eq!(
    ///     state.format_log(),
    ///     "Chess Game Move Log\n==================\n\n1. e4\te5\n2. Nf3\t\n"
    /// );
    /// ```
    pub fn format_log(&self) -> String {
        let mut text = String::from("Chess Game Move Log\n==================\n\n");

        for (i, pair) in self.log.chunks(2).enumerate() {
            let white = &pair[0];
            let black = pair.get(1).map(String::as_str).unwrap_or_default();
            text.push_str(&format!("{}. {white}\t{black}\n", i + 1));
        }

        text
    }

    /// Attempts to move the piece on `from` to `to`.
    ///
    /// On success the move is applied in full and [`MoveOutcome::Completed`] holds its log entry,
    /// unless a Pawn reached the last row: then it waits there as a Pawn, the turn does not pass, and
    /// [`MoveOutcome::PendingPromotion`] is returned until [`GameState::resolve_promotion`] is called.
    ///
    /// On failure nothing changes.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, MoveError, Square};
    /// let mut state = GameState::new();
    /// let err = state.attempt_move(Square::E2, Square::E5).unwrap_err();
    /// assert_eq!(err, MoveError::IllegalMove { from: Square::E2, to: Square::E5 });
    /// assert_eq!(state, GameState::new());
    /// ```
    pub fn attempt_move(&mut self, from: Square, to: Square) -> MoveResult<MoveOutcome> {
        match self.phase {
            Phase::Terminal { .. } => return Err(MoveError::GameOver),
            Phase::AwaitingPromotion(pending) => {
                return Err(MoveError::PromotionPending {
                    square: pending.square,
                })
            }
            Phase::Idle => {}
        }

        if !self.is_legal(from, to) {
            return Err(MoveError::IllegalMove { from, to });
        }
        let Some(piece) = self.board.piece_at(from) else {
            return Err(MoveError::IllegalMove { from, to });
        };

        let color = piece.color();
        let is_pawn = piece.kind() == PieceKind::Pawn;
        let (d_row, d_col) = from.delta(to);

        // Everything below mutates; legality has already been settled
        let captured_square = if is_pawn && self.is_en_passant_capture(color, from, to) {
            en_passant_victim(from, to)
        } else {
            to
        };
        let captured = self.board.take(captured_square);
        let notation = move_notation(piece.kind(), from, to, captured.is_some());

        self.board.take(from);
        self.board.place(piece.moved(), to);

        if is_pawn && to.row() == color.promotion_row() {
            debug!(%from, %to, "pawn awaiting promotion");
            self.log.push(notation);
            self.phase = Phase::AwaitingPromotion(PendingPromotion {
                from,
                square: to,
                captured,
            });
            return Ok(MoveOutcome::PendingPromotion);
        }

        if piece.kind() == PieceKind::King && d_col.abs() == 2 {
            self.castle_rook(color, d_col > 0);
        }

        self.en_passant = if is_pawn && d_row.abs() == 2 {
            from.offset(color.forward(), 0)
        } else {
            None
        };

        match piece.kind() {
            PieceKind::King => self.castling[color] = CastlingRights::NONE,
            PieceKind::Rook if from.row() == color.home_row() => {
                self.castling[color].revoke_for_rook_col(from.col())
            }
            _ => {}
        }
        if let Some(captured) = captured {
            self.revoke_captured_rook(captured, captured_square);
        }

        self.advance_clocks(is_pawn || captured.is_some());
        let suffix = self.finish_turn(captured);

        let entry = format!("{notation}{suffix}");
        debug!(%from, %to, notation = %entry, "move applied");
        self.log.push(entry.clone());

        Ok(MoveOutcome::Completed(entry))
    }

    /// Turns the Pawn waiting on the last row into `kind` and completes its move.
    ///
    /// The promotion suffix is appended to the move's log entry, and the completed entry is returned.
    /// The check flag is recomputed, but the entry carries no check marker.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState, MoveOutcome, PieceKind, Square};
    /// let mut state = GameState::from_fen("8/P7/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
    /// assert_eq!(state.attempt_move(Square::A7, Square::A8), Ok(MoveOutcome::PendingPromotion));
    /// assert_eq!(state.side_to_move(), Color::White);
    ///
    /// let outcome = state.resolve_promotion(PieceKind::Queen).unwrap();
    /// assert_eq!(outcome, MoveOutcome::Completed("a8=Q".into()));
    /// assert_eq!(state.side_to_move(), Color::Black);
    /// assert!(state.in_check());
    /// ```
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> MoveResult<MoveOutcome> {
        let Phase::AwaitingPromotion(pending) = self.phase else {
            return Err(MoveError::NoPendingPromotion);
        };

        let square = pending.square;
        let Some(pawn) = self.board.piece_at(square) else {
            return Err(MoveError::InvalidSquare { square });
        };
        if pawn.kind() != PieceKind::Pawn {
            return Err(MoveError::NotAPawn { square });
        }
        if !kind.is_promotion_choice() {
            return Err(MoveError::InvalidPromotionChoice { kind });
        }

        self.board.place(pawn.promoted(kind), square);
        self.en_passant = None;
        if let Some(captured) = pending.captured {
            self.revoke_captured_rook(captured, square);
        }

        self.advance_clocks(true);
        self.finish_turn(pending.captured);

        let completion = promotion_suffix(kind);
        let entry = match self.log.last_mut() {
            Some(entry) => {
                entry.push_str(&completion);
                entry.clone()
            }
            None => {
                let entry = format!(
                    "{}{completion}",
                    move_notation(PieceKind::Pawn, pending.from, square, pending.captured.is_some())
                );
                self.log.push(entry.clone());
                entry
            }
        };
        debug!(%square, %kind, notation = %entry, "promotion resolved");

        Ok(MoveOutcome::Completed(entry))
    }

    /// Applies a complete [`Move`], including its promotion choice, as a single step.
    ///
    /// Unlike [`GameState::attempt_move`], a promotion must be named up front, and naming one for a
    /// move that does not promote is an error. Nothing changes on failure.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Move};
    /// let mut state = GameState::new();
    /// assert_eq!(state.make_move(Move::from_uci("g1f3").unwrap()).unwrap(), "Nf3");
    /// assert!(state.make_move(Move::from_uci("e7e5q").unwrap()).is_err());
    /// ```
    pub fn make_move(&mut self, mv: Move) -> Result<String, IntegrationError> {
        let illegal = |source| IntegrationError::IllegalEngineMove { mv, source };

        if !self.phase.is_idle() {
            let source = match self.phase {
                Phase::AwaitingPromotion(pending) => MoveError::PromotionPending {
                    square: pending.square,
                },
                _ => MoveError::GameOver,
            };
            return Err(illegal(source));
        }

        if !self.is_legal(mv.from(), mv.to()) {
            return Err(illegal(MoveError::IllegalMove {
                from: mv.from(),
                to: mv.to(),
            }));
        }

        let promotes = self.board.piece_at(mv.from()).is_some_and(|piece| {
            piece.kind() == PieceKind::Pawn && mv.to().row() == piece.color().promotion_row()
        });

        match (promotes, mv.promotion()) {
            (true, None) => return Err(IntegrationError::MissingPromotion { mv }),
            (false, Some(_)) => return Err(IntegrationError::UnexpectedPromotion { mv }),
            (true, Some(kind)) if !kind.is_promotion_choice() => {
                return Err(illegal(MoveError::InvalidPromotionChoice { kind }))
            }
            _ => {}
        }

        let outcome = match self.attempt_move(mv.from(), mv.to()).map_err(illegal)? {
            MoveOutcome::PendingPromotion => match mv.promotion() {
                Some(kind) => self.resolve_promotion(kind).map_err(illegal)?,
                None => return Err(IntegrationError::MissingPromotion { mv }),
            },
            completed => completed,
        };

        Ok(outcome.notation().unwrap_or_default().to_string())
    }

    /// Returns a copy of this game with `mv` applied, or `None` if `mv` cannot be made.
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Option<Self> {
        let mut copied = self.clone();
        copied.make_move(mv).ok().map(|_| copied)
    }

    /// Moves the Rook that accompanies a castling King.
    fn castle_rook(&mut self, color: Color, kingside: bool) {
        let home = color.home_row() as u8;
        let (rook_col, target_col) = if kingside { (7, 5) } else { (0, 3) };

        let rook_from = Square::from_coords_unchecked(home, rook_col);
        let rook_to = Square::from_coords_unchecked(home, target_col);
        if let Some(rook) = self.board.take(rook_from) {
            self.board.place(rook.moved(), rook_to);
        }
    }

    /// A Rook captured on its original corner takes its side's castling right with it.
    fn revoke_captured_rook(&mut self, captured: Piece, square: Square) {
        let color = captured.color();
        if captured.kind() == PieceKind::Rook && square.row() == color.home_row() {
            self.castling[color].revoke_for_rook_col(square.col());
        }
    }

    /// Updates the halfmove clock and fullmove number before the turn passes.
    fn advance_clocks(&mut self, resets_clock: bool) {
        if resets_clock {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
    }

    /// Passes the turn, then recomputes the check flag and whether the game is over.
    ///
    /// Returns the check marker for the move that was just played.
    fn finish_turn(&mut self, captured: Option<Piece>) -> &'static str {
        let mover = self.side_to_move;
        self.side_to_move = mover.opponent();
        self.in_check = self.is_in_check(self.side_to_move);
        self.phase = Phase::Idle;

        if captured.is_some_and(|piece| piece.kind() == PieceKind::King) {
            self.phase = Phase::Terminal {
                winner: Some(mover),
            };
        } else if !self.has_any_legal_move() {
            self.phase = Phase::Terminal {
                winner: self.in_check.then_some(mover),
            };
        }

        if let Phase::Terminal { winner } = self.phase {
            info!(winner = ?winner, fen = %self.to_fen(), "game over");
        }

        check_suffix(self.in_check, self.phase.winner().is_some())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    /// Draws the board followed by the state a player needs to see.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f)?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        writeln!(f, "Side to move: {}", self.side_to_move)?;
        if self.in_check {
            writeln!(f, "{} is in check", self.side_to_move)?;
        }
        write!(f, "Status: {}", self.phase)
    }
}

/// Creates a new game in the standard starting position.
#[inline(always)]
pub fn initial_state() -> GameState {
    GameState::new()
}

/// See [`GameState::legal_destinations`].
#[inline(always)]
pub fn legal_destinations(state: &GameState, square: Square) -> BTreeSet<Square> {
    state.legal_destinations(square)
}

/// See [`GameState::attempt_move`].
#[inline(always)]
pub fn attempt_move(state: &mut GameState, from: Square, to: Square) -> MoveResult<MoveOutcome> {
    state.attempt_move(from, to)
}

/// See [`GameState::resolve_promotion`].
#[inline(always)]
pub fn resolve_promotion(state: &mut GameState, kind: PieceKind) -> MoveResult<MoveOutcome> {
    state.resolve_promotion(kind)
}

/// See [`GameState::is_in_check`].
#[inline(always)]
pub fn is_in_check(state: &GameState, color: Color) -> bool {
    state.is_in_check(color)
}

/// See [`GameState::export_log`].
#[inline(always)]
pub fn export_log(state: &GameState) -> &[String] {
    state.export_log()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(state: &mut GameState, moves: &[(Square, Square)]) {
        for &(from, to) in moves {
            state.attempt_move(from, to).unwrap();
        }
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut state = GameState::new();
        let before = state.clone();
        assert!(state.attempt_move(Square::E1, Square::E2).is_err());
        assert!(state.attempt_move(Square::E7, Square::E5).is_err());
        assert!(state.attempt_move(Square::A3, Square::A4).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_en_passant_capture() {
        let mut state = GameState::new();
        play(
            &mut state,
            &[
                (Square::E2, Square::E4),
                (Square::A7, Square::A6),
                (Square::E4, Square::E5),
                (Square::D7, Square::D5),
            ],
        );
        assert_eq!(state.en_passant(), Some(Square::D6));

        let outcome = state.attempt_move(Square::E5, Square::D6).unwrap();
        assert_eq!(outcome.notation(), Some("xd6"));
        assert!(state.board().piece_at(Square::D5).is_none());
        assert_eq!(state.en_passant(), None);
        assert_eq!(state.halfmove_clock(), 0);
    }

    #[test]
    fn test_castling_moves_rook_and_clears_rights() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let outcome = state.attempt_move(Square::E1, Square::C1).unwrap();
        assert_eq!(outcome.notation(), Some("O-O-O"));
        assert!(state.board().piece_at(Square::D1).unwrap().has_moved());
        assert!(state.board().piece_at(Square::A1).is_none());
        assert_eq!(state.castling_rights(Color::White), CastlingRights::NONE);
        assert_eq!(state.castling_rights(Color::Black), CastlingRights::ALL);
    }

    #[test]
    fn test_capturing_rook_revokes_right() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/6B1/4K3 w kq - 0 1").unwrap();
        state.attempt_move(Square::G2, Square::A8).unwrap();
        assert!(!state.castling_rights(Color::Black).queenside());
        assert!(state.castling_rights(Color::Black).kingside());
        assert!(!state.is_legal(Square::E8, Square::C8));
    }

    #[test]
    fn test_capture_promotion_revokes_right_on_resolve() {
        let mut state = GameState::from_fen("r3k2r/1P6/8/8/8/8/8/4K3 w kq - 0 1").unwrap();
        assert!(state.castling_rights(Color::Black).queenside());

        let outcome = state.attempt_move(Square::B7, Square::A8).unwrap();
        assert_eq!(outcome, MoveOutcome::PendingPromotion);
        assert!(state.castling_rights(Color::Black).queenside());

        state.resolve_promotion(PieceKind::Queen).unwrap();
        assert!(!state.castling_rights(Color::Black).queenside());
        assert!(state.castling_rights(Color::Black).kingside());
        assert_eq!(state.export_log(), ["xa8=Q"]);
        assert!(state.in_check());
    }

    #[test]
    fn test_moving_rook_revokes_one_right() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut state, &[(Square::H1, Square::H2), (Square::A8, Square::A7)]);
        assert_eq!(
            state.castling_rights(Color::White),
            CastlingRights::new(false, true)
        );
        assert_eq!(
            state.castling_rights(Color::Black),
            CastlingRights::new(true, false)
        );
    }

    #[test]
    fn test_promotion_protocol() {
        let mut state = GameState::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            state.resolve_promotion(PieceKind::Queen),
            Err(MoveError::NoPendingPromotion)
        );

        let outcome = state.attempt_move(Square::A7, Square::B8).unwrap();
        assert_eq!(outcome, MoveOutcome::PendingPromotion);
        assert_eq!(state.export_log(), ["xb8"]);
        assert_eq!(
            state.attempt_move(Square::E1, Square::E2),
            Err(MoveError::PromotionPending { square: Square::B8 })
        );
        assert_eq!(
            state.resolve_promotion(PieceKind::King),
            Err(MoveError::InvalidPromotionChoice {
                kind: PieceKind::King
            })
        );
        assert_eq!(state.side_to_move(), Color::White);

        let outcome = state.resolve_promotion(PieceKind::Knight).unwrap();
        assert_eq!(outcome.notation(), Some("xb8=N"));
        assert_eq!(state.export_log(), ["xb8=N"]);
        assert_eq!(
            state.board().piece_at(Square::B8).map(|p| p.kind()),
            Some(PieceKind::Knight)
        );
        assert_eq!(state.side_to_move(), Color::Black);
        assert!(state.phase().is_idle());
    }

    #[test]
    fn test_fullmove_number_counts_black_moves() {
        let mut state = GameState::new();
        play(&mut state, &[(Square::G1, Square::F3)]);
        assert_eq!(state.fullmove_number(), 1);
        assert_eq!(state.halfmove_clock(), 1);
        play(&mut state, &[(Square::G8, Square::F6)]);
        assert_eq!(state.fullmove_number(), 2);
        assert_eq!(state.halfmove_clock(), 2);
    }

    #[test]
    fn test_make_move_checks_promotion_piece() {
        let mut state = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = state.clone();

        let missing = Move::new(Square::A7, Square::A8);
        assert_eq!(
            state.make_move(missing),
            Err(IntegrationError::MissingPromotion { mv: missing })
        );

        let unexpected = Move::with_promotion(Square::E1, Square::E2, PieceKind::Queen);
        assert_eq!(
            state.make_move(unexpected),
            Err(IntegrationError::UnexpectedPromotion { mv: unexpected })
        );
        assert_eq!(state, before);

        let promote = Move::with_promotion(Square::A7, Square::A8, PieceKind::Queen);
        assert_eq!(state.make_move(promote).unwrap(), "a8=Q");
        assert!(state.in_check());
    }

    #[test]
    fn test_finished_game_accepts_nothing() {
        // Black is already checkmated
        let mut state = GameState::from_fen("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Color::White));
        assert_eq!(
            state.attempt_move(Square::G8, Square::H8),
            Err(MoveError::GameOver)
        );
        assert!(state.legal_moves().is_empty());
    }
}
