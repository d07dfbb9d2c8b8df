//! Search results checked against plain minimax and perfect play

mod common;

use common::{brute_negamax, brute_solve, evaluator, playout, playout_to_empties};
use othello::rules::{legal_moves, make_move};
use othello::search::{decode_margin, SearchLimits, Searcher};
use othello::strategy::Phase;
use othello::Board;

#[test]
fn test_alphabeta_matches_minimax_on_4x4() {
    let eval = evaluator(4);
    for seed in 0..12u64 {
        for plies in [0, 1, 3, 5] {
            let board = playout(4, plies, seed);
            if legal_moves(&board).is_empty() {
                continue;
            }
            for depth in 1..=4i8 {
                let expected = brute_negamax(&mut board.clone(), depth, &eval);
                let mut searcher = Searcher::new(1, 1);
                let result =
                    searcher.search(&board, &eval, Phase::Midgame, &SearchLimits::depth(depth));
                assert_eq!(
                    result.score, expected,
                    "seed {seed}, plies {plies}, depth {depth}\n{board}"
                );

                // The chosen move achieves the score
                let mut child = board.clone();
                make_move(&mut child, result.best_move.unwrap());
                assert_eq!(-brute_negamax(&mut child, depth - 1, &eval), expected);
            }
        }
    }
}

#[test]
fn test_cache_does_not_change_results() {
    for (size, depth) in [(4usize, 6i8), (6, 4), (8, 3)] {
        let eval = evaluator(size);
        for seed in 0..4u64 {
            let board = playout(size, 4, seed);
            if legal_moves(&board).is_empty() {
                continue;
            }
            let limits = SearchLimits::depth(depth);
            let with_tt = Searcher::new(1, 1).search(&board, &eval, Phase::Midgame, &limits);
            let without_tt = Searcher::new(0, 1).search(&board, &eval, Phase::Midgame, &limits);
            let no_history = Searcher::new(1, 1)
                .with_history(false)
                .search(&board, &eval, Phase::Midgame, &limits);

            assert_eq!(with_tt.score, without_tt.score, "size {size} seed {seed}");
            assert_eq!(with_tt.best_move, without_tt.best_move, "size {size} seed {seed}");
            assert_eq!(with_tt.score, no_history.score);
            assert_eq!(with_tt.best_move, no_history.best_move);
        }
    }
}

#[test]
fn test_exact_solve_matches_perfect_play() {
    let eval = evaluator(4);
    let mut checked = 0;
    for seed in 0..16u64 {
        let Some(board) = playout_to_empties(4, 8, seed) else {
            continue;
        };
        if legal_moves(&board).is_empty() {
            continue;
        }
        let expected = brute_solve(&mut board.clone());
        let limits = SearchLimits::depth(1).with_exact_empties(8);
        let result = Searcher::new(1, 1).search(&board, &eval, Phase::Endgame, &limits);
        assert_eq!(result.score, expected, "seed {seed}\n{board}");
        assert_eq!(result.depth, 1);
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn test_exact_solve_on_6x6() {
    let eval = evaluator(6);
    let mut checked = 0;
    for seed in 0..6u64 {
        let Some(board) = playout_to_empties(6, 7, seed) else {
            continue;
        };
        if legal_moves(&board).is_empty() {
            continue;
        }
        let expected = brute_solve(&mut board.clone());
        let limits = SearchLimits::depth(3).with_exact_empties(8);
        let result = Searcher::new(1, 1).search(&board, &eval, Phase::Endgame, &limits);
        assert_eq!(result.score, expected, "seed {seed}\n{board}");
        if expected != 0 {
            assert!(decode_margin(result.score).is_some());
        }
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn test_known_endgame_margin() {
    let board = Board::parse(
        "B B B B
         W W W B
         . W B B
         . . . .",
    )
    .unwrap();
    let limits = SearchLimits::depth(4).with_exact_empties(8);
    let result = Searcher::new(1, 1).search(&board, &evaluator(4), Phase::Endgame, &limits);
    assert_eq!(decode_margin(result.score), Some(13));
    assert_eq!(result.best_move, Some(othello::Pos::new(3, 0)));
}

#[test]
fn test_parallel_root_matches_single_thread() {
    let eval = evaluator(6);
    for seed in 0..3u64 {
        let board = playout(6, 6, seed);
        if legal_moves(&board).is_empty() {
            continue;
        }
        let limits = SearchLimits::depth(4);
        let single = Searcher::new(1, 1).search(&board, &eval, Phase::Midgame, &limits);
        let parallel = Searcher::new(1, 3).search(&board, &eval, Phase::Midgame, &limits);
        assert_eq!(single.score, parallel.score);
        assert_eq!(single.best_move, parallel.best_move);
    }
}
