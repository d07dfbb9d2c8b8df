//! Helpers shared by the integration tests

#![allow(dead_code)]

use othello::eval::{Evaluator, FeatureWeights, PositionalWeights};
use othello::rules::{has_legal_move, is_terminal, legal_moves, make_move, pass, unmake_move};
use othello::search::terminal_score;
use othello::Board;

pub fn evaluator(size: usize) -> Evaluator {
    Evaluator::new(FeatureWeights::midgame(), &PositionalWeights::midgame(), size)
}

fn next_pick(state: &mut u64, len: usize) -> usize {
    *state = state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    (*state >> 33) as usize % len
}

/// Play `plies` pseudo-random legal moves from the start position,
/// passing when forced and stopping at game end.
pub fn playout(size: usize, plies: usize, seed: u64) -> Board {
    let mut board = Board::new(size).unwrap();
    let mut state = seed | 1;
    for _ in 0..plies {
        if is_terminal(&board) {
            break;
        }
        let moves = legal_moves(&board);
        if moves.is_empty() {
            pass(&mut board);
            continue;
        }
        make_move(&mut board, moves[next_pick(&mut state, moves.len())]);
    }
    board
}

/// Play pseudo-random moves until at most `empties` cells are empty.
/// `None` if the game ends first.
pub fn playout_to_empties(size: usize, empties: u32, seed: u64) -> Option<Board> {
    let mut board = Board::new(size).unwrap();
    let mut state = seed | 1;
    while board.empty_count() > empties {
        if is_terminal(&board) {
            return None;
        }
        let moves = legal_moves(&board);
        if moves.is_empty() {
            pass(&mut board);
            continue;
        }
        make_move(&mut board, moves[next_pick(&mut state, moves.len())]);
    }
    (!is_terminal(&board)).then_some(board)
}

/// Plain minimax (negamax form) without pruning or caching. Full boards
/// are scored as finished games, depth 0 by the evaluator, and a forced
/// pass keeps the depth.
pub fn brute_negamax(board: &mut Board, depth: i8, eval: &Evaluator) -> i32 {
    let color = board.side_to_move();
    if board.is_full() {
        return terminal_score(board, color);
    }
    if depth <= 0 {
        return eval.evaluate(board, color);
    }
    let moves = legal_moves(board);
    if moves.is_empty() {
        if !has_legal_move(board, color.opponent()) {
            return terminal_score(board, color);
        }
        pass(board);
        let score = -brute_negamax(board, depth, eval);
        pass(board);
        return score;
    }
    let mut best = i32::MIN;
    for mv in moves {
        let info = make_move(board, mv);
        let score = -brute_negamax(board, depth - 1, eval);
        unmake_move(board, &info);
        best = best.max(score);
    }
    best
}

/// Perfect-play score of a position, encoded as a finished game
pub fn brute_solve(board: &mut Board) -> i32 {
    let color = board.side_to_move();
    let moves = legal_moves(board);
    if moves.is_empty() {
        if !has_legal_move(board, color.opponent()) {
            return terminal_score(board, color);
        }
        pass(board);
        let score = -brute_solve(board);
        pass(board);
        return score;
    }
    let mut best = i32::MIN;
    for mv in moves {
        let info = make_move(board, mv);
        let score = -brute_solve(board);
        unmake_move(board, &info);
        best = best.max(score);
    }
    best
}
