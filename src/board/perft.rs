/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use super::GameState;

/// Runs a perft (or splitperft, if `SPLIT` is set) and prints the node count, time taken, and nodes per second.
pub fn print_perft<const SPLIT: bool>(game: &GameState, depth: usize) -> u64 {
    let now = Instant::now();
    let nodes = perft_generic::<true, SPLIT>(game, depth);
    let elapsed = now.elapsed();

    let nps = (nodes as f64 / elapsed.as_secs_f64()) as u64;
    if SPLIT {
        println!();
    }
    println!("{nodes} nodes in {elapsed:?} ({nps} nps)");

    nodes
}

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use arbiter::{perft, GameState};
/// assert_eq!(perft(&GameState::new(), 2), 400);
/// ```
#[inline(always)]
pub fn perft(game: &GameState, depth: usize) -> u64 {
    perft_generic::<true, false>(game, depth)
}

/// Perform a splitperft at the specified depth, collecting only data about the number of possible positions (nodes),
/// and printing the number of nodes reachable after each move available at the root node.
#[inline(always)]
pub fn splitperft(game: &GameState, depth: usize) -> u64 {
    perft_generic::<true, true>(game, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(game: &GameState, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return game.legal_moves().len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    game.legal_moves().into_iter().fold(0, |nodes, mv| {
        let Some(next) = game.with_move_made(mv) else {
            return nodes;
        };
        let new_nodes = perft_generic::<BULK, false>(&next, depth - 1);

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}
