use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    state::{GameEvent, MatchState, Player, VictoryState},
    BoardGame,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    NotPlayerTurn {
        expected: Player,
        actual: Player,
    },
    EmptyPlayer,
    ColumnOutOfRange {
        column: usize,
    },
    ColumnFull {
        column: usize,
    },
    SquareOutOfRange {
        row: usize,
        col: usize,
    },
    SquareOccupied {
        row: usize,
        col: usize,
    },
    NoLegalMoves,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::GameFinished => write!(f, "the game is already over"),
            RuleError::NotPlayerTurn { expected, actual } => {
                write!(f, "it is {expected:?}'s turn, not {actual:?}'s")
            }
            RuleError::EmptyPlayer => write!(f, "an empty cell cannot make a move"),
            RuleError::ColumnOutOfRange { column } => write!(f, "column {column} is off the board"),
            RuleError::ColumnFull { column } => write!(f, "column {column} is full"),
            RuleError::SquareOutOfRange { row, col } => {
                write!(f, "square ({row}, {col}) is off the board")
            }
            RuleError::SquareOccupied { row, col } => {
                write!(f, "square ({row}, {col}) is already taken")
            }
            RuleError::NoLegalMoves => write!(f, "no legal moves remain"),
        }
    }
}

impl std::error::Error for RuleError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RuleResolution<G: BoardGame> {
    pub state: MatchState<G>,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub victory: Option<VictoryState>,
}

impl<G: BoardGame> RuleResolution<G> {
    pub fn new(state: MatchState<G>, events: Vec<GameEvent>) -> Self {
        let victory = state.outcome.clone();
        Self {
            state,
            events,
            victory,
        }
    }
}

/// 落子规则：轮次检查、合法性校验、胜负与平局判定。
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    fn ensure_in_progress<G: BoardGame>(state: &MatchState<G>) -> Result<(), RuleError> {
        if state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_turn_owner<G: BoardGame>(
        state: &MatchState<G>,
        player: Player,
    ) -> Result<(), RuleError> {
        if player.is_empty() {
            return Err(RuleError::EmptyPlayer);
        }
        if state.current_player != player {
            return Err(RuleError::NotPlayerTurn {
                expected: state.current_player,
                actual: player,
            });
        }
        Ok(())
    }

    /// 为 `player` 落子，返回本步产生的事件。失败时状态不变。
    pub fn play<G: BoardGame>(
        &self,
        state: &mut MatchState<G>,
        player: Player,
        mv: G::Move,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_in_progress(state)?;
        Self::ensure_turn_owner(state, player)?;
        let (row, col) = G::check_move(&state.board, mv)?;

        state.board = G::apply_move(&state.board, mv, player);
        state.last_move = Some((row, col));
        state.turn += 1;

        let mut events = Vec::new();
        let placed = GameEvent::PiecePlaced { player, row, col };
        state.record_event(placed.clone());
        events.push(placed);

        if G::has_won(&state.board, player) {
            let line = G::winning_line(&state.board, player);
            let victory = state.declare_victory(player, line);
            events.push(GameEvent::GameWon {
                winner: victory.winner,
                line: victory.line,
            });
        } else if G::is_draw(&state.board) {
            state.declare_draw();
            events.push(GameEvent::GameDrawn);
        } else {
            state.current_player = player.opponent();
        }

        Ok(events)
    }

    /// 与 `play` 相同，但返回一份带状态快照的结果。
    pub fn resolve<G: BoardGame>(
        &self,
        state: &mut MatchState<G>,
        player: Player,
        mv: G::Move,
    ) -> Result<RuleResolution<G>, RuleError> {
        let events = self.play(state, player, mv)?;
        Ok(RuleResolution::new(state.clone(), events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ConnectFour, GameStatus, TicTacToe, TicTacToeBoard};

    #[test]
    fn human_moves_first_and_turns_alternate() {
        let engine = RuleEngine::new();
        let mut state = MatchState::<ConnectFour>::new();

        let events = engine
            .play(&mut state, Player::Human, 3)
            .expect("human move should succeed");
        assert_eq!(
            events,
            vec![GameEvent::PiecePlaced {
                player: Player::Human,
                row: 5,
                col: 3
            }]
        );
        assert_eq!(state.current_player, Player::Ai);
        assert_eq!(state.last_move, Some((5, 3)));
        assert_eq!(state.turn, 1);

        let error = engine
            .play(&mut state, Player::Human, 3)
            .expect_err("human cannot move twice");
        assert_eq!(
            error,
            RuleError::NotPlayerTurn {
                expected: Player::Ai,
                actual: Player::Human
            }
        );
    }

    #[test]
    fn illegal_move_leaves_state_untouched() {
        let engine = RuleEngine::new();
        let mut state = MatchState::<TicTacToe>::new();
        engine
            .play(&mut state, Player::Human, (1, 1))
            .expect("first move should succeed");
        let before = state.clone();

        let error = engine
            .play(&mut state, Player::Ai, (1, 1))
            .expect_err("occupied square must be rejected");
        assert_eq!(error, RuleError::SquareOccupied { row: 1, col: 1 });
        assert_eq!(state, before);

        let error = engine
            .play(&mut state, Player::Empty, (0, 0))
            .expect_err("empty player cannot move");
        assert_eq!(error, RuleError::EmptyPlayer);
    }

    #[test]
    fn completing_a_line_ends_the_game() {
        let engine = RuleEngine::new();
        let board = TicTacToeBoard::from_rows([[1, 1, 0], [2, 2, 0], [0, 0, 0]])
            .expect("rows should be valid");
        let mut state = MatchState::<TicTacToe>::from_board(board, Player::Human);

        let resolution = engine
            .resolve(&mut state, Player::Human, (0, 2))
            .expect("winning move should succeed");
        assert_eq!(resolution.state.status, GameStatus::Won);
        let victory = resolution.victory.expect("victory should be reported");
        assert_eq!(victory.winner, Player::Human);
        assert_eq!(victory.line, vec![(0, 0), (0, 1), (0, 2)]);
        assert!(matches!(
            resolution.events.last(),
            Some(GameEvent::GameWon { .. })
        ));

        let error = engine
            .play(&mut state, Player::Ai, (1, 2))
            .expect_err("finished game rejects moves");
        assert_eq!(error, RuleError::GameFinished);
    }

    #[test]
    fn filling_the_board_without_a_line_is_a_draw() {
        let engine = RuleEngine::new();
        let board = TicTacToeBoard::from_rows([[1, 2, 1], [1, 2, 2], [2, 1, 0]])
            .expect("rows should be valid");
        let mut state = MatchState::<TicTacToe>::from_board(board, Player::Human);

        let events = engine
            .play(&mut state, Player::Human, (2, 2))
            .expect("last move should succeed");
        assert_eq!(state.status, GameStatus::Draw);
        assert_eq!(events.last(), Some(&GameEvent::GameDrawn));
        assert!(state.winner().is_none());
    }

    #[test]
    fn errors_serialize_with_type_tag() {
        let json = serde_json::to_value(RuleError::ColumnFull { column: 3 })
            .expect("error should serialize");
        assert_eq!(json, serde_json::json!({ "type": "ColumnFull", "column": 3 }));
    }
}
