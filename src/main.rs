/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arbiter::{ArbiterCommand, Session};
use clap::{error::ErrorKind, Parser};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so they never mix with command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new();

    // Skip the executable name
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    // Startup arguments may hold several commands back to back, so find the longest prefix that parses
    let mut arg_idx = args.len();
    let mut parsed_idx = 0;
    while parsed_idx < arg_idx {
        let slice = &args[parsed_idx..arg_idx];

        match ArbiterCommand::try_parse_from(slice) {
            Ok(cmd) => {
                if let Err(e) = session.send_command(cmd) {
                    eprintln!("{e:#}");
                }
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            // Edge case: `--help` and `--version` are both "error" cases according to Clap
            Err(e)
                if matches!(e.kind(), ErrorKind::DisplayHelp)
                    || matches!(e.kind(), ErrorKind::DisplayVersion) =>
            {
                println!("{e}");
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            // Not even a single word parsed, so report it and move past it
            Err(e) if arg_idx == parsed_idx + 1 => {
                eprintln!("ERROR on input {slice:?}:\n{e}");
                parsed_idx += 1;
                arg_idx = args.len();
            }

            Err(e) => {
                tracing::debug!("startup arguments {slice:?} did not parse: {e}");
                arg_idx -= 1;
            }
        }
    }

    if let Err(e) = session.run() {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
    }
}
