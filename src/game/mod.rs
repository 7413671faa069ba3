//! 棋盘规则模块：两种棋盘、胜负判定、对局状态机。

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

pub mod connect_four;
pub mod rules;
pub mod state;
pub mod tic_tac_toe;

pub use connect_four::{ConnectFour, ConnectFourBoard};
pub use rules::{RuleEngine, RuleError, RuleResolution};
pub use state::{
    Coord,
    GameEvent,
    GameStatus,
    InvalidPlayer,
    MatchState,
    Player,
    VictoryState,
};
pub use tic_tac_toe::{TicTacToe, TicTacToeBoard};

/// 棋盘规则。只有四子棋和井字棋两个实现。
///
/// 棋盘是 `Copy` 值：`apply_move` 总是返回新棋盘，搜索回溯时不需要撤销。
pub trait BoardGame: Copy + Debug + Default + PartialEq + Eq + 'static {
    type Board: Copy + Debug + PartialEq + Eq + Serialize + DeserializeOwned;
    type Move: Copy + Debug + PartialEq + Eq + Serialize + DeserializeOwned;

    const NAME: &'static str;

    fn empty_board() -> Self::Board;

    /// 按固定顺序列出可走的棋步，这个顺序也是同分时的取舍顺序。
    fn legal_moves(board: &Self::Board) -> Vec<Self::Move>;

    /// 校验棋步，返回棋子最终落在的格子。
    fn check_move(board: &Self::Board, mv: Self::Move) -> Result<Coord, RuleError>;

    /// 非法棋步原样返回棋盘。
    fn apply_move(board: &Self::Board, mv: Self::Move, player: Player) -> Self::Board;

    fn has_won(board: &Self::Board, player: Player) -> bool;

    fn winning_line(board: &Self::Board, player: Player) -> Vec<Coord>;

    fn is_draw(board: &Self::Board) -> bool;
}
