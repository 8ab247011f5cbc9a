/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use uci_parser::UciCommand;

use crate::{Move, PieceKind, Square};

/// A command to be sent to the session.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ARBITER COMMAND> | <UCI COMMAND>")
)]
pub enum ArbiterCommand {
    /// Print a visual representation of the current game.
    #[command(alias = "d")]
    Display,

    /// Quit the session.
    Exit,

    /// Write the move log to a file.
    Export { path: PathBuf },

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Print the move log.
    Log,

    /// Apply the provided move, in UCI notation, to the game.
    ///
    /// A Pawn reaching the last row without a promotion piece waits for `promote`.
    #[command(name = "move", alias = "m")]
    MakeMove { mv: Move },

    /// Shows all legal moves in the current position, or the destinations of a specific piece.
    Moves { square: Option<Square> },

    /// Start a new game from the standard starting position.
    New,

    /// Display the current value of the specified option, or of every option.
    Option {
        name: Vec<String>, // This is a vector in order to support multi-word options
    },

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Finish a pending promotion by choosing the new piece (queen, rook, bishop, or knight).
    Promote { kind: PieceKind },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Wrapper over UCI commands sent to the session.
    #[command(skip)]
    Uci { cmd: UciCommand },
}

impl FromStr for ArbiterCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`ArbiterCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a [`UciCommand`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => {
                // If parsing failed, attempt to parse as a UciCommand
                if let Ok(cmd) = UciCommand::new(s) {
                    Ok(Self::Uci { cmd })
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_session_commands() {
        let cmd: ArbiterCommand = "move e2e4".parse().unwrap();
        assert!(matches!(cmd, ArbiterCommand::MakeMove { mv } if mv == "e2e4"));

        let cmd: ArbiterCommand = "promote queen".parse().unwrap();
        assert!(matches!(
            cmd,
            ArbiterCommand::Promote {
                kind: PieceKind::Queen
            }
        ));

        let cmd: ArbiterCommand = "moves g1".parse().unwrap();
        assert!(matches!(cmd, ArbiterCommand::Moves { square: Some(Square::G1) }));

        assert!(matches!(
            "d".parse::<ArbiterCommand>(),
            Ok(ArbiterCommand::Display)
        ));
    }

    #[test]
    fn test_falls_back_to_uci() {
        let cmd: ArbiterCommand = "isready".parse().unwrap();
        assert!(matches!(
            cmd,
            ArbiterCommand::Uci {
                cmd: UciCommand::IsReady
            }
        ));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!("move e2".parse::<ArbiterCommand>().is_err());
        assert!("perft deep".parse::<ArbiterCommand>().is_err());
    }
}
