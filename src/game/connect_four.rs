use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{BoardGame, Coord, InvalidPlayer, Player, RuleError};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const WIN_LENGTH: usize = 4;
pub const CENTER_COLUMN: usize = COLS / 2;

/// 四个连续格子。
pub type Window = [Coord; WIN_LENGTH];

/// 棋盘上所有的四连窗口。顺序固定：横向、纵向、右下斜、右上斜，
/// 每组内先行后列。胜负判定、连线查找和估值共用这张表。
pub static WINDOWS: Lazy<Vec<Window>> = Lazy::new(|| {
    let mut windows = Vec::with_capacity(69);
    for row in 0..ROWS {
        for col in 0..=COLS - WIN_LENGTH {
            windows.push(std::array::from_fn(|i| (row, col + i)));
        }
    }
    for row in 0..=ROWS - WIN_LENGTH {
        for col in 0..COLS {
            windows.push(std::array::from_fn(|i| (row + i, col)));
        }
    }
    for row in 0..=ROWS - WIN_LENGTH {
        for col in 0..=COLS - WIN_LENGTH {
            windows.push(std::array::from_fn(|i| (row + i, col + i)));
        }
    }
    for row in WIN_LENGTH - 1..ROWS {
        for col in 0..=COLS - WIN_LENGTH {
            windows.push(std::array::from_fn(|i| (row - i, col + i)));
        }
    }
    windows
});

/// 四子棋规则。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectFour;

/// 6 行 7 列的四子棋棋盘，棋子落在所选列最低的空位。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct ConnectFourBoard {
    cells: [[Player; COLS]; ROWS],
}

impl ConnectFourBoard {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: [[u8; COLS]; ROWS]) -> Result<Self, InvalidPlayer> {
        let mut board = Self::empty();
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                board.cells[row][col] = Player::try_from(*value)?;
            }
        }
        Ok(board)
    }

    pub fn rows(&self) -> &[[Player; COLS]; ROWS] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    /// 越界的列视为已满。
    pub fn is_column_full(&self, col: usize) -> bool {
        self.cell(0, col).map_or(true, |top| !top.is_empty())
    }

    pub fn next_open_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_empty())
    }

    pub fn apply_move(&self, col: usize, player: Player) -> Self {
        let mut next = *self;
        if let Some(row) = self.next_open_row(col) {
            next.cells[row][col] = player;
        }
        next
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    pub fn window_cells(&self, window: &Window) -> [Player; WIN_LENGTH] {
        window.map(|(row, col)| self.cells[row][col])
    }

    pub fn count_in_column(&self, col: usize, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|cells| cells.get(col) == Some(&player))
            .count()
    }

    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    pub fn has_won(&self, player: Player) -> bool {
        !player.is_empty() && WINDOWS.iter().any(|window| self.owns_window(window, player))
    }

    pub fn winning_line(&self, player: Player) -> Vec<Coord> {
        if player.is_empty() {
            return Vec::new();
        }
        WINDOWS
            .iter()
            .find(|window| self.owns_window(window, player))
            .map(|window| window.to_vec())
            .unwrap_or_default()
    }

    pub fn is_draw(&self) -> bool {
        self.is_full() && !self.has_won(Player::Human) && !self.has_won(Player::Ai)
    }

    fn owns_window(&self, window: &Window, player: Player) -> bool {
        window
            .iter()
            .all(|&(row, col)| self.cells[row][col] == player)
    }
}

impl BoardGame for ConnectFour {
    type Board = ConnectFourBoard;
    type Move = usize;

    const NAME: &'static str = "connect-four";

    fn empty_board() -> Self::Board {
        ConnectFourBoard::empty()
    }

    fn legal_moves(board: &Self::Board) -> Vec<Self::Move> {
        board.legal_moves()
    }

    fn check_move(board: &Self::Board, column: Self::Move) -> Result<Coord, RuleError> {
        if column >= COLS {
            return Err(RuleError::ColumnOutOfRange { column });
        }
        board
            .next_open_row(column)
            .map(|row| (row, column))
            .ok_or(RuleError::ColumnFull { column })
    }

    fn apply_move(board: &Self::Board, column: Self::Move, player: Player) -> Self::Board {
        board.apply_move(column, player)
    }

    fn has_won(board: &Self::Board, player: Player) -> bool {
        board.has_won(player)
    }

    fn winning_line(board: &Self::Board, player: Player) -> Vec<Coord> {
        board.winning_line(player)
    }

    fn is_draw(board: &Self::Board) -> bool {
        board.is_draw()
    }
}
