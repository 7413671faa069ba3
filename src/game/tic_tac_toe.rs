use serde::{Deserialize, Serialize};

use super::{BoardGame, Coord, InvalidPlayer, Player, RuleError};

pub const SIZE: usize = 3;
pub const CENTER: Coord = (1, 1);

/// 八条连线：三行、三列、两条对角线。
pub const LINES: [[Coord; SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// 井字棋规则。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicTacToe;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct TicTacToeBoard {
    cells: [[Player; SIZE]; SIZE],
}

impl TicTacToeBoard {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Result<Self, InvalidPlayer> {
        let mut board = Self::empty();
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                board.cells[row][col] = Player::try_from(*value)?;
            }
        }
        Ok(board)
    }

    pub fn rows(&self) -> &[[Player; SIZE]; SIZE] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    pub fn apply_move(&self, (row, col): Coord, player: Player) -> Self {
        let mut next = *self;
        if self.cell(row, col) == Some(Player::Empty) {
            next.cells[row][col] = player;
        }
        next
    }

    /// 行优先的空格列表。
    pub fn legal_moves(&self) -> Vec<Coord> {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col].is_empty())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    pub fn has_won(&self, player: Player) -> bool {
        !player.is_empty() && LINES.iter().any(|line| self.owns_line(line, player))
    }

    pub fn winning_line(&self, player: Player) -> Vec<Coord> {
        if player.is_empty() {
            return Vec::new();
        }
        LINES
            .iter()
            .find(|line| self.owns_line(line, player))
            .map(|line| line.to_vec())
            .unwrap_or_default()
    }

    pub fn is_draw(&self) -> bool {
        self.is_full() && !self.has_won(Player::Human) && !self.has_won(Player::Ai)
    }

    fn owns_line(&self, line: &[Coord; SIZE], player: Player) -> bool {
        line.iter().all(|&(row, col)| self.cells[row][col] == player)
    }
}

impl BoardGame for TicTacToe {
    type Board = TicTacToeBoard;
    type Move = Coord;

    const NAME: &'static str = "tic-tac-toe";

    fn empty_board() -> Self::Board {
        TicTacToeBoard::empty()
    }

    fn legal_moves(board: &Self::Board) -> Vec<Self::Move> {
        board.legal_moves()
    }

    fn check_move(board: &Self::Board, (row, col): Self::Move) -> Result<Coord, RuleError> {
        match board.cell(row, col) {
            None => Err(RuleError::SquareOutOfRange { row, col }),
            Some(Player::Empty) => Ok((row, col)),
            Some(_) => Err(RuleError::SquareOccupied { row, col }),
        }
    }

    fn apply_move(board: &Self::Board, mv: Self::Move, player: Player) -> Self::Board {
        board.apply_move(mv, player)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [[u8; SIZE]; SIZE]) -> TicTacToeBoard {
        TicTacToeBoard::from_rows(rows).expect("rows should be valid")
    }

    #[test]
    fn legal_moves_are_row_major() {
        let board = board([[1, 0, 2], [0, 1, 0], [0, 0, 0]]);
        assert_eq!(
            board.legal_moves(),
            vec![(0, 1), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn occupied_or_out_of_range_square_is_a_no_op() {
        let board = board([[1, 0, 0], [0, 0, 0], [0, 0, 0]]);
        assert_eq!(board.apply_move((0, 0), Player::Ai), board);
        assert_eq!(board.apply_move((3, 1), Player::Ai), board);
        assert_eq!(
            TicTacToe::check_move(&board, (0, 0)),
            Err(RuleError::SquareOccupied { row: 0, col: 0 })
        );
        assert_eq!(
            TicTacToe::check_move(&board, (0, 5)),
            Err(RuleError::SquareOutOfRange { row: 0, col: 5 })
        );
        assert_eq!(TicTacToe::check_move(&board, (2, 2)), Ok((2, 2)));
    }

    #[test]
    fn winning_line_scans_rows_then_columns_then_diagonals() {
        let row_and_column = board([[1, 1, 1], [1, 2, 0], [1, 2, 2]]);
        assert_eq!(
            row_and_column.winning_line(Player::Human),
            vec![(0, 0), (0, 1), (0, 2)]
        );

        let anti_diagonal = board([[1, 1, 2], [0, 2, 1], [2, 0, 0]]);
        assert!(anti_diagonal.has_won(Player::Ai));
        assert_eq!(
            anti_diagonal.winning_line(Player::Ai),
            vec![(0, 2), (1, 1), (2, 0)]
        );
        assert!(anti_diagonal.winning_line(Player::Human).is_empty());
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let board = board([[1, 2, 1], [1, 2, 2], [2, 1, 1]]);
        assert!(board.is_draw());
        assert!(!board.has_won(Player::Human));
        assert!(!board.has_won(Player::Ai));
    }

    #[test]
    fn full_board_with_line_is_not_a_draw() {
        let board = board([[1, 1, 1], [2, 2, 1], [2, 1, 2]]);
        assert!(board.is_full());
        assert!(!board.is_draw());
    }
}
