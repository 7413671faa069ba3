use std::fmt;

use serde::{Deserialize, Serialize};

use super::BoardGame;

/// 棋盘坐标 `(row, col)`，第 0 行在最上方。
pub type Coord = (usize, usize);

/// 格子上的棋子归属，同时也是玩家标识。
///
/// 序列化为整数 `0 / 1 / 2`，与前端的 `number[][]` 棋盘保持一致。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    #[default]
    Empty,
    Human,
    Ai,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
            Player::Empty => Player::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Player::Empty
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        match player {
            Player::Empty => 0,
            Player::Human => 1,
            Player::Ai => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvalidPlayer {
    pub value: u8,
}

impl fmt::Display for InvalidPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid player value {}, expected 0, 1 or 2", self.value)
    }
}

impl std::error::Error for InvalidPlayer {}

impl TryFrom<u8> for Player {
    type Error = InvalidPlayer;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Player::Empty),
            1 => Ok(Player::Human),
            2 => Ok(Player::Ai),
            _ => Err(InvalidPlayer { value }),
        }
    }
}

/// 对局状态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VictoryState {
    pub winner: Player,
    pub line: Vec<Coord>,
}

/// 对局事件流，前端据此播放音效、高亮连线。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    PiecePlaced {
        player: Player,
        row: usize,
        col: usize,
    },
    GameWon {
        winner: Player,
        line: Vec<Coord>,
    },
    GameDrawn,
}

/// 一局游戏的完整状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct MatchState<G: BoardGame> {
    pub board: G::Board,
    pub current_player: Player,
    pub status: GameStatus,
    /// 已落子数。
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_move: Option<Coord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<VictoryState>,
}

impl<G: BoardGame> MatchState<G> {
    /// 空棋盘，人类先手。
    pub fn new() -> Self {
        Self::from_board(G::empty_board(), Player::Human)
    }

    pub fn from_board(board: G::Board, current_player: Player) -> Self {
        Self {
            board,
            current_player,
            status: GameStatus::Playing,
            turn: 0,
            last_move: None,
            event_log: Vec::new(),
            outcome: None,
        }
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.event_log.push(event);
    }

    pub fn is_finished(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.as_ref().map(|outcome| outcome.winner)
    }

    pub fn winning_line(&self) -> &[Coord] {
        self.outcome
            .as_ref()
            .map(|outcome| outcome.line.as_slice())
            .unwrap_or(&[])
    }

    pub fn declare_victory(&mut self, winner: Player, line: Vec<Coord>) -> VictoryState {
        let victory = VictoryState { winner, line };
        if self.outcome.is_none() {
            self.record_event(GameEvent::GameWon {
                winner: victory.winner,
                line: victory.line.clone(),
            });
            self.status = GameStatus::Won;
            self.outcome = Some(victory.clone());
        }
        victory
    }

    pub fn declare_draw(&mut self) {
        if self.status == GameStatus::Playing {
            self.record_event(GameEvent::GameDrawn);
            self.status = GameStatus::Draw;
        }
    }

    /// 根据棋盘重新判定胜负，用于从外部导入的局面。
    pub fn evaluate_outcome(&mut self) -> GameStatus {
        if self.is_finished() {
            return self.status;
        }
        for player in [Player::Human, Player::Ai] {
            if G::has_won(&self.board, player) {
                let line = G::winning_line(&self.board, player);
                self.declare_victory(player, line);
                return self.status;
            }
        }
        if G::is_draw(&self.board) {
            self.declare_draw();
        }
        self.status
    }
}

impl<G: BoardGame> Default for MatchState<G> {
    fn default() -> Self {
        Self::new()
    }
}
