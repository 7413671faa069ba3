//! 静态估值函数，以及两种棋各自的搜索配置。

use crate::game::connect_four::{ConnectFourBoard, Window, CENTER_COLUMN, WINDOWS, WIN_LENGTH};
use crate::game::tic_tac_toe::{TicTacToeBoard, CENTER};
use crate::game::{ConnectFour, Player, TicTacToe};

use super::minimax::{Score, SearchProfile};
use super::policy::Difficulty;

pub const CONNECT_FOUR_WIN_SCORE: Score = 1_000_000;
pub const TIC_TAC_TOE_WIN_SCORE: Score = 10;

const THREE_WITH_GAP: Score = 5;
const TWO_WITH_GAPS: Score = 2;
const OPPONENT_THREE_WITH_GAP: Score = -4;
const CENTER_PIECE: Score = 3;

/// 四子棋估值，站在 `player` 一方。
pub fn evaluate_connect_four(board: &ConnectFourBoard, player: Player) -> Score {
    let opponent = player.opponent();
    if board.has_won(player) {
        return CONNECT_FOUR_WIN_SCORE;
    }
    if board.has_won(opponent) {
        return -CONNECT_FOUR_WIN_SCORE;
    }

    let windows: Score = WINDOWS
        .iter()
        .map(|window| score_window(board, window, player))
        .sum();
    let center = board.count_in_column(CENTER_COLUMN, player) as Score * CENTER_PIECE;
    windows + center
}

fn score_window(board: &ConnectFourBoard, window: &Window, player: Player) -> Score {
    let opponent = player.opponent();
    let (own, theirs, empty) = board.window_cells(window).iter().fold(
        (0usize, 0usize, 0usize),
        |(own, theirs, empty), &cell| {
            if cell == player {
                (own + 1, theirs, empty)
            } else if cell == opponent {
                (own, theirs + 1, empty)
            } else {
                (own, theirs, empty + 1)
            }
        },
    );

    let mut score = 0;
    if own == WIN_LENGTH - 1 && empty == 1 {
        score += THREE_WITH_GAP;
    } else if own == 2 && empty == 2 {
        score += TWO_WITH_GAPS;
    }
    if theirs == WIN_LENGTH - 1 && empty == 1 {
        score += OPPONENT_THREE_WITH_GAP;
    }
    score
}

/// 井字棋估值：胜负 ±10，平局 0，否则只看中心格。
pub fn evaluate_tic_tac_toe(board: &TicTacToeBoard, player: Player) -> Score {
    let opponent = player.opponent();
    if board.has_won(player) {
        return TIC_TAC_TOE_WIN_SCORE;
    }
    if board.has_won(opponent) {
        return -TIC_TAC_TOE_WIN_SCORE;
    }
    if board.is_draw() {
        return 0;
    }

    match board.cell(CENTER.0, CENTER.1) {
        Some(cell) if cell == player => 1,
        Some(cell) if cell == opponent => -1,
        _ => 0,
    }
}

impl SearchProfile for ConnectFour {
    const RECORD_DETAIL: bool = false;
    const RECORD_PRUNED: bool = false;
    const HINTS_ENABLED: bool = true;

    fn evaluate(board: &Self::Board, player: Player) -> Score {
        evaluate_connect_four(board, player)
    }

    fn search_depth(difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }
}

impl SearchProfile for TicTacToe {
    const RECORD_DETAIL: bool = true;
    const RECORD_PRUNED: bool = true;
    // 井字棋提示暂未开放，产品确认前一律返回“无提示”。
    const HINTS_ENABLED: bool = false;

    fn evaluate(board: &Self::Board, player: Player) -> Score {
        evaluate_tic_tac_toe(board, player)
    }

    fn search_depth(_difficulty: Difficulty) -> u8 {
        9
    }
}
