/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fs, io,
    path::Path,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use uci_parser::{UciCommand, UciParseError, UciResponse};

use crate::{
    apply_engine_move, print_perft, replay_with_rules, ArbiterCommand, GameState, Move, MoveOutcome,
    PieceKind, Rules, Square,
};

/// Name of the UCI option toggling [`Rules::castle_through_check`].
const CASTLE_THROUGH_CHECK: &str = "CastleThroughCheck";

/// A single game hosted over text commands on `stdin`.
#[derive(Debug)]
pub struct Session {
    /// The game being played.
    ///
    /// Replaced whenever a new game is started or a new position is given.
    game: GameState,

    /// Rule options applied to every game this session starts.
    rules: Rules,

    /// One half of a channel, responsible for sending commands to the session to execute.
    sender: Sender<ArbiterCommand>,

    /// One half of a channel, responsible for receiving commands for the session to execute.
    receiver: Receiver<ArbiterCommand>,
}

impl Session {
    /// Constructs a new [`Session`] instance to be executed with [`Session::run`].
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            game: GameState::new(),
            rules: Rules::default(),
            sender,
            receiver,
        }
    }

    /// Returns a string of the program's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Returns a string of all authors of this program.
    pub fn authors(&self) -> String {
        // Split multiple authors by comma-space
        env!("CARGO_PKG_AUTHORS").replace(':', ", ")
    }

    /// The game currently being played.
    #[inline(always)]
    pub const fn game(&self) -> &GameState {
        &self.game
    }

    /// Sends an [`ArbiterCommand`] to the session to be executed.
    pub fn send_command(&self, command: ArbiterCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|err| anyhow!("Failed to send command to session: {err}"))
    }

    /// Execute the main event loop for the session.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                error!("Input handler thread stopping after fatal error: {err:#}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            debug!(?cmd, "received command");

            // Exit the loop so the session can quit
            if matches!(cmd, ArbiterCommand::Exit) {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e:#}");
            }
        }

        Ok(())
    }

    /// Executes a single command against the current game.
    pub fn execute(&mut self, cmd: ArbiterCommand) -> Result<()> {
        match cmd {
            ArbiterCommand::Display => println!("{}", self.game),

            ArbiterCommand::Exit => {}

            ArbiterCommand::Export { path } => self.export(&path)?,

            ArbiterCommand::Fen => println!("{}", self.game.to_fen()),

            ArbiterCommand::Log => print!("{}", self.game.format_log()),

            ArbiterCommand::MakeMove { mv } => self.make_move(mv)?,

            ArbiterCommand::Moves { square } => self.moves(square),

            ArbiterCommand::New => self.new_game(),

            ArbiterCommand::Option { name } => {
                let name = name.join(" ");
                if name.is_empty() {
                    for (name, value) in self.options() {
                        println!("{name} := {value}");
                    }
                } else if let Some(value) = self.get_option(&name) {
                    println!("{name} := {value}");
                } else {
                    println!("{} has no option {name:?}", self.name());
                }
            }

            ArbiterCommand::Perft { depth } => {
                print_perft::<false>(&self.game, depth);
            }

            ArbiterCommand::Promote { kind } => self.promote(kind)?,

            ArbiterCommand::Splitperft { depth } => {
                print_perft::<true>(&self.game, depth);
            }

            ArbiterCommand::Uci { cmd } => self.handle_uci_command(cmd)?,
        }

        Ok(())
    }

    /// Handle the execution of a single [`UciCommand`].
    fn handle_uci_command(&mut self, uci: UciCommand) -> Result<()> {
        use UciCommand::*;
        match uci {
            Uci => self.uci(),

            IsReady => println!("{}", UciResponse::<&str>::ReadyOk),

            SetOption { name, value } => self.set_option(&name, value)?,

            UciNewGame => self.new_game(),

            Position { fen, moves } => self.position(fen.as_deref(), moves)?,

            Go(options) => {
                let Some(depth) = options.perft else {
                    bail!("{} is not a search engine; only `go perft` is supported", self.name());
                };
                print_perft::<true>(&self.game, depth as usize);
            }

            Quit => self.send_command(ArbiterCommand::Exit)?,

            _ => bail!(
                "{} does not support UCI command {uci:?}",
                env!("CARGO_PKG_NAME")
            ),
        }

        Ok(())
    }

    /// Executes the `move` command.
    ///
    /// A move naming its promotion piece is applied in one step; otherwise a Pawn reaching the last
    /// row waits for `promote`.
    fn make_move(&mut self, mv: Move) -> Result<()> {
        let outcome = if mv.promotion().is_some() {
            apply_engine_move(&mut self.game, mv)?
        } else {
            self.game.attempt_move(mv.from(), mv.to())?
        };

        self.report(outcome);
        Ok(())
    }

    /// Executes the `promote` command.
    fn promote(&mut self, kind: PieceKind) -> Result<()> {
        let outcome = self.game.resolve_promotion(kind)?;
        self.report(outcome);
        Ok(())
    }

    /// Prints the result of a move, and the end of the game if it has ended.
    fn report(&self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Completed(notation) => println!("{notation}"),
            MoveOutcome::PendingPromotion => {
                if let Some(pending) = self.game.pending_promotion() {
                    println!(
                        "Pawn on {} awaiting promotion: promote <queen|rook|bishop|knight>",
                        pending.square()
                    );
                }
            }
        }

        if self.game.is_terminal() {
            println!("Game over: {}", self.game.phase());
        }
    }

    /// Executes the `moves` command, listing legal moves for the whole side or a single piece.
    fn moves(&self, square: Option<Square>) {
        let moves: Vec<String> = if let Some(square) = square {
            self.game
                .legal_destinations(square)
                .into_iter()
                .map(|to| to.to_string())
                .collect()
        } else {
            self.game
                .legal_moves()
                .into_iter()
                .map(|mv| mv.to_string())
                .collect()
        };

        // If there are none, print "(none)"
        if moves.is_empty() {
            println!("(none)");
        } else {
            println!("{}", moves.join(", "));
        }
    }

    /// Executes the `export` command, writing the formatted move log to `path`.
    fn export(&self, path: &Path) -> Result<()> {
        fs::write(path, self.game.format_log())
            .with_context(|| format!("Failed to write move log to {}", path.display()))?;

        info!(path = %path.display(), moves = self.game.export_log().len(), "exported move log");
        println!("Move log exported to {}", path.display());
        Ok(())
    }

    /// Set the position to the supplied FEN string (defaults to the standard startpos if not supplied),
    /// and then apply `moves` one-by-one to the position.
    ///
    /// If any move does not fit, the current game is kept as it was.
    fn position(&mut self, fen: Option<&str>, moves: Vec<String>) -> Result<()> {
        self.game = replay_with_rules(fen, moves, self.rules).context("Position rejected")?;
        Ok(())
    }

    /// Resets the session's game to the standard starting position.
    fn new_game(&mut self) {
        self.game = GameState::new();
        self.game.set_rules(self.rules);
    }

    /// Called when the session receives the `uci` command.
    ///
    /// Prints the program's ID, version, and authors, and lists all UCI options.
    fn uci(&self) {
        println!("id name {}\nid author {}\n", self.name(), self.authors());

        // Print all UCI options
        println!("option name {CASTLE_THROUGH_CHECK} type check default false");

        // We're ready to go!
        println!("{}", UciResponse::<&str>::UciOk)
    }

    /// Every option this session supports, with its current value.
    fn options(&self) -> impl Iterator<Item = (&'static str, String)> {
        [(
            CASTLE_THROUGH_CHECK,
            self.rules.castle_through_check.to_string(),
        )]
        .into_iter()
    }

    /// Handles the `setoption` command, setting option `name` to `value`, or toggling it if `value` is None.
    ///
    /// Will return an error if `name` isn't a valid option or `value` is not a valid value for that option.
    fn set_option(&mut self, name: &str, value: Option<String>) -> Result<()> {
        match name {
            CASTLE_THROUGH_CHECK => {
                let enabled: bool = match value.as_deref() {
                    Some(value) => value
                        .parse()
                        .with_context(|| format!("{name} must be `true` or `false`. Got {value:?}"))?,
                    None => !self.rules.castle_through_check,
                };

                self.rules.castle_through_check = enabled;
                self.game.set_rules(self.rules);
                info!(option = name, enabled, "option set");
            }

            _ => bail!("{} has no option named {name:?}", self.name()),
        }

        Ok(())
    }

    /// Returns the current value of the option `name`, if it exists on this session.
    fn get_option(&self, name: &str) -> Option<String> {
        self.options()
            .find(|(option, _)| option.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<ArbiterCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(2048);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(ArbiterCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Session received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        // Attempt to parse the input as a UCI command first, so engines and GUIs can drive the session
        match UciCommand::new(buf) {
            Ok(cmd) => sender
                .send(ArbiterCommand::Uci { cmd })
                .context("Failed to send UCI command to session")?,

            // If it's not a UCI command, check if it's a session-specific command
            Err(UciParseError::UnrecognizedCommand { cmd: _ }) => {
                match ArbiterCommand::try_parse_from(buf.split_ascii_whitespace()) {
                    Ok(cmd) => sender
                        .send(cmd)
                        .context("Failed to send command to session")?,

                    // If it wasn't a custom command, either, print an error.
                    Err(err) => eprintln!("{err}"),
                }
            }

            // If it was a UCI command, print a usage message.
            Err(uci_err) => eprintln!("{uci_err}"),
        }
    }
}
