/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arbiter::{perft_generic, GameState, FEN_KIWIPETE, FEN_STARTPOS};

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let position = GameState::from_fen(fen).unwrap();
    let res = perft_generic::<false, false>(&position, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");
}

#[cfg(test)]
mod startpos_perft {
    use crate::*;

    #[test]
    fn test_startpos_perft_1() {
        test_perft_fen_nodes(1, FEN_STARTPOS, 20);
    }
    #[test]
    fn test_startpos_perft_2() {
        test_perft_fen_nodes(2, FEN_STARTPOS, 400);
    }
    #[test]
    fn test_startpos_perft_3() {
        test_perft_fen_nodes(3, FEN_STARTPOS, 8902);
    }

    #[test]
    fn test_bulk_counting_agrees() {
        let game = GameState::new();
        assert_eq!(arbiter::perft(&game, 3), 8902);
    }
}

#[cfg(test)]
mod kiwipete_perft {
    use crate::*;

    #[test]
    fn test_kiwipete_perft_1() {
        test_perft_fen_nodes(1, FEN_KIWIPETE, 48);
    }
    #[test]
    fn test_kiwipete_perft_2() {
        test_perft_fen_nodes(2, FEN_KIWIPETE, 2039);
    }
}

#[cfg(test)]
mod promotion_perft {
    use crate::test_perft_fen_nodes;

    #[test]
    fn test_promotion_perft_1() {
        test_perft_fen_nodes(1, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1 ", 24);
    }
    #[test]
    fn test_promotion_perft_2() {
        test_perft_fen_nodes(2, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1 ", 496);
    }
}

#[cfg(test)]
mod simple_perft {
    use crate::test_perft_fen_nodes;

    #[test]
    fn test_simple_perft_1() {
        test_perft_fen_nodes(3, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -", 2812);
    }

    #[test]
    fn test_simple_perft_2() {
        test_perft_fen_nodes(
            2,
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            264,
        );
    }

    #[test]
    fn test_simple_perft_3() {
        test_perft_fen_nodes(
            1,
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            44,
        );
    }

    #[test]
    fn test_simple_perft_4() {
        test_perft_fen_nodes(
            2,
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            1486,
        );
    }
}

#[cfg(test)]
mod special_perft {
    use crate::test_perft_fen_nodes;

    #[test]
    fn test_special_perft_self_stalemate() {
        test_perft_fen_nodes(6, "K1k5/8/P7/8/8/8/8/8 w - - 0 1", 2217);
    }
}
