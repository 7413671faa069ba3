pub mod ai;
pub mod engine;
pub mod game;
pub mod utils;

use std::fmt::Display;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{
    hint, minimax, AiAgent, AiConfig, AiDecision, DecisionTree, Difficulty, MoveSource, Score,
    SearchNode, SearchProfile, SearchResult, SearchStats, TreeSummary, HINT_DEPTH,
};
pub use engine::{AiTurn, GameEngine, DEFAULT_THINK_DELAY_MS};
pub use game::{
    BoardGame, ConnectFour, ConnectFourBoard, Coord, GameEvent, GameStatus, MatchState, Player,
    RuleEngine, RuleError, RuleResolution, TicTacToe, TicTacToeBoard, VictoryState,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 没有可走的列。
pub const NO_COLUMN: i32 = -1;
/// 没有可走的格子。
pub const NO_SQUARE: [i32; 2] = [-1, -1];

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(serde_to_js_error)
}

/// 缺省或无法识别的难度按 medium 处理。
fn difficulty_or_default(value: Option<String>) -> Difficulty {
    value
        .as_deref()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

fn parse_player(value: u8) -> Result<Player, JsValue> {
    Player::try_from(value).map_err(serde_to_js_error)
}

fn column_to_js(column: Option<usize>) -> i32 {
    column.map_or(NO_COLUMN, |column| column as i32)
}

fn square_to_js(square: Option<Coord>) -> [i32; 2] {
    square.map_or(NO_SQUARE, |(row, col)| [row as i32, col as i32])
}

#[derive(Serialize)]
#[serde(bound = "")]
struct AiMoveResponse<G: BoardGame, M: Serialize> {
    #[serde(rename = "move")]
    mv: M,
    decision: AiDecision<G>,
}

// ---------------------------------------------------------------------------
// 四子棋：无状态函数
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = "createConnectFourBoard")]
pub fn create_connect_four_board() -> Result<JsValue, JsValue> {
    to_value(&ConnectFourBoard::empty()).map_err(JsValue::from)
}

/// 非法列（已满、越界、负数）原样返回棋盘。
#[wasm_bindgen(js_name = "connectFourMakeMove")]
pub fn connect_four_make_move(board: JsValue, column: i32, player: u8) -> Result<JsValue, JsValue> {
    let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
    let player = parse_player(player)?;
    let next = usize::try_from(column)
        .map(|column| board.apply_move(column, player))
        .unwrap_or(board);
    to_value(&next).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "connectFourCheckWin")]
pub fn connect_four_check_win(board: JsValue, player: u8) -> Result<bool, JsValue> {
    let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
    Ok(board.has_won(parse_player(player)?))
}

#[wasm_bindgen(js_name = "connectFourIsDraw")]
pub fn connect_four_is_draw(board: JsValue) -> Result<bool, JsValue> {
    let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
    Ok(board.is_draw())
}

#[wasm_bindgen(js_name = "connectFourWinningCoordinates")]
pub fn connect_four_winning_coordinates(board: JsValue, player: u8) -> Result<JsValue, JsValue> {
    let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
    to_value(&board.winning_line(parse_player(player)?)).map_err(JsValue::from)
}

/// 返回 `{ move, decision }`，搜索树随结果一并返回，不留在模块里。
#[wasm_bindgen(js_name = "connectFourAiMove")]
pub fn connect_four_ai_move(board: JsValue, difficulty: Option<String>) -> Result<JsValue, JsValue> {
    let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
    let mut agent = AiAgent::<ConnectFour>::from_difficulty(difficulty_or_default(difficulty));
    let decision = agent.decide_move(&board);
    let response = AiMoveResponse {
        mv: column_to_js(decision.mv),
        decision,
    };
    to_value(&response).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "connectFourHint")]
pub fn connect_four_hint(board: JsValue) -> Result<i32, JsValue> {
    let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
    Ok(column_to_js(hint::<ConnectFour>(&board)))
}

// ---------------------------------------------------------------------------
// 井字棋：无状态函数
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = "createTicTacToeBoard")]
pub fn create_tic_tac_toe_board() -> Result<JsValue, JsValue> {
    to_value(&TicTacToeBoard::empty()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "ticTacToeMakeMove")]
pub fn tic_tac_toe_make_move(board: JsValue, row: i32, col: i32, player: u8) -> Result<JsValue, JsValue> {
    let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
    let player = parse_player(player)?;
    let next = match (usize::try_from(row), usize::try_from(col)) {
        (Ok(row), Ok(col)) => board.apply_move((row, col), player),
        _ => board,
    };
    to_value(&next).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "ticTacToeCheckWin")]
pub fn tic_tac_toe_check_win(board: JsValue, player: u8) -> Result<bool, JsValue> {
    let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
    Ok(board.has_won(parse_player(player)?))
}

#[wasm_bindgen(js_name = "ticTacToeIsDraw")]
pub fn tic_tac_toe_is_draw(board: JsValue) -> Result<bool, JsValue> {
    let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
    Ok(board.is_draw())
}

#[wasm_bindgen(js_name = "ticTacToeWinningCoordinates")]
pub fn tic_tac_toe_winning_coordinates(board: JsValue, player: u8) -> Result<JsValue, JsValue> {
    let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
    to_value(&board.winning_line(parse_player(player)?)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "ticTacToeAiMove")]
pub fn tic_tac_toe_ai_move(board: JsValue, difficulty: Option<String>) -> Result<JsValue, JsValue> {
    let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
    let mut agent = AiAgent::<TicTacToe>::from_difficulty(difficulty_or_default(difficulty));
    let decision = agent.decide_move(&board);
    let response = AiMoveResponse {
        mv: square_to_js(decision.mv),
        decision,
    };
    to_value(&response).map_err(JsValue::from)
}

/// 井字棋提示目前关闭，总是返回 `[-1, -1]`。
#[wasm_bindgen(js_name = "ticTacToeHint")]
pub fn tic_tac_toe_hint(board: JsValue) -> Result<JsValue, JsValue> {
    let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
    to_value(&square_to_js(hint::<TicTacToe>(&board))).map_err(JsValue::from)
}

// ---------------------------------------------------------------------------
// 有状态的对局对象，持有最近一次的搜索树
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct ConnectFourGame {
    engine: GameEngine<ConnectFour>,
}

#[wasm_bindgen]
impl ConnectFourGame {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<String>) -> ConnectFourGame {
        ConnectFourGame {
            engine: GameEngine::new(difficulty_or_default(difficulty)),
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn difficulty(&self) -> String {
        self.engine.difficulty().to_string()
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(serde_to_js_error)?;
        self.engine.set_difficulty(difficulty);
        Ok(())
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.engine.state())
    }

    pub fn load_board(&mut self, board: JsValue, current_player: u8) -> Result<String, JsValue> {
        let board: ConnectFourBoard = from_value(board).map_err(JsValue::from)?;
        let current_player = parse_player(current_player)?;
        self.engine.load_board(board, current_player);
        to_json(self.engine.state())
    }

    pub fn play(&mut self, column: usize) -> Result<String, JsValue> {
        let resolution = self.engine.play_human(column).map_err(to_js_error)?;
        to_json(&resolution)
    }

    pub fn apply_ai_move(&mut self) -> Result<String, JsValue> {
        let turn = self.engine.play_ai().map_err(to_js_error)?;
        to_json(&turn)
    }

    /// 落下 `think_ai` 给出的决策 JSON，搜索树存入树槽。
    pub fn apply_ai_decision_json(&mut self, decision_json: &str) -> Result<String, JsValue> {
        let decision: AiDecision<ConnectFour> =
            serde_json::from_str(decision_json).map_err(serde_to_js_error)?;
        let turn = self.engine.apply_decision(decision).map_err(to_js_error)?;
        to_json(&turn)
    }

    pub fn hint(&self) -> i32 {
        column_to_js(self.engine.hint())
    }

    /// 最近一次搜索树的 JSON，可按层数截断；还没有搜索过时返回 `undefined`。
    pub fn minimax_tree_json(&self, max_depth: Option<usize>) -> Result<Option<String>, JsValue> {
        self.engine
            .minimax_tree()
            .map(|root| match max_depth {
                Some(depth) => to_json(&root.truncated(depth)),
                None => to_json(root),
            })
            .transpose()
    }

    pub fn tree_summary(&self) -> Result<JsValue, JsValue> {
        to_value(&self.engine.tree_summary()).map_err(JsValue::from)
    }

    pub fn reset_minimax_tree(&mut self) {
        self.engine.reset_minimax_tree();
    }

    /// 延迟 `delay_ms` 毫秒后在当前局面上计算一步，只返回决策，不落子。
    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let board = self.engine.state().board;
        let config = self.engine.agent_config();
        let delay = delay_ms.unwrap_or(DEFAULT_THINK_DELAY_MS);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let mut agent = AiAgent::<ConnectFour>::new(config);
            let decision = agent.decide_move(&board);
            let json = to_json(&decision)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

#[wasm_bindgen]
pub struct TicTacToeGame {
    engine: GameEngine<TicTacToe>,
}

#[wasm_bindgen]
impl TicTacToeGame {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<String>) -> TicTacToeGame {
        TicTacToeGame {
            engine: GameEngine::new(difficulty_or_default(difficulty)),
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn difficulty(&self) -> String {
        self.engine.difficulty().to_string()
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(serde_to_js_error)?;
        self.engine.set_difficulty(difficulty);
        Ok(())
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.engine.state())
    }

    pub fn load_board(&mut self, board: JsValue, current_player: u8) -> Result<String, JsValue> {
        let board: TicTacToeBoard = from_value(board).map_err(JsValue::from)?;
        let current_player = parse_player(current_player)?;
        self.engine.load_board(board, current_player);
        to_json(self.engine.state())
    }

    pub fn play(&mut self, row: usize, col: usize) -> Result<String, JsValue> {
        let resolution = self.engine.play_human((row, col)).map_err(to_js_error)?;
        to_json(&resolution)
    }

    pub fn apply_ai_move(&mut self) -> Result<String, JsValue> {
        let turn = self.engine.play_ai().map_err(to_js_error)?;
        to_json(&turn)
    }

    pub fn apply_ai_decision_json(&mut self, decision_json: &str) -> Result<String, JsValue> {
        let decision: AiDecision<TicTacToe> =
            serde_json::from_str(decision_json).map_err(serde_to_js_error)?;
        let turn = self.engine.apply_decision(decision).map_err(to_js_error)?;
        to_json(&turn)
    }

    pub fn hint(&self) -> Result<JsValue, JsValue> {
        to_value(&square_to_js(self.engine.hint())).map_err(JsValue::from)
    }

    pub fn minimax_tree_json(&self, max_depth: Option<usize>) -> Result<Option<String>, JsValue> {
        self.engine
            .minimax_tree()
            .map(|root| match max_depth {
                Some(depth) => to_json(&root.truncated(depth)),
                None => to_json(root),
            })
            .transpose()
    }

    pub fn tree_summary(&self) -> Result<JsValue, JsValue> {
        to_value(&self.engine.tree_summary()).map_err(JsValue::from)
    }

    pub fn reset_minimax_tree(&mut self) {
        self.engine.reset_minimax_tree();
    }

    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let board = self.engine.state().board;
        let config = self.engine.agent_config();
        let delay = delay_ms.unwrap_or(DEFAULT_THINK_DELAY_MS);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let mut agent = AiAgent::<TicTacToe>::new(config);
            let decision = agent.decide_move(&board);
            let json = to_json(&decision)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_mark_missing_moves() {
        assert_eq!(column_to_js(None), -1);
        assert_eq!(column_to_js(Some(4)), 4);
        assert_eq!(square_to_js(None), [-1, -1]);
        assert_eq!(square_to_js(Some((2, 0))), [2, 0]);
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        assert_eq!(difficulty_or_default(None), Difficulty::Medium);
        assert_eq!(difficulty_or_default(Some("impossible".into())), Difficulty::Medium);
        assert_eq!(difficulty_or_default(Some("HARD".into())), Difficulty::Hard);
    }

    #[test]
    fn ai_move_response_exposes_move_and_tree() {
        let mut agent = AiAgent::<ConnectFour>::with_seed(
            AiConfig::from_difficulty::<ConnectFour>(Difficulty::Hard),
            1,
        );
        let decision = agent.decide_move(&ConnectFourBoard::empty());
        let response = AiMoveResponse {
            mv: column_to_js(decision.mv),
            decision,
        };
        let json = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(json["move"], 3);
        assert_eq!(json["decision"]["tree"]["isMaximizing"], true);
    }

    #[test]
    fn thought_decision_can_be_applied_later() {
        let mut game = TicTacToeGame::new(Some("hard".into()));
        game.play(0, 0).expect("human move");

        let config = AiConfig::from_difficulty::<TicTacToe>(Difficulty::Hard);
        let decision = AiAgent::<TicTacToe>::with_seed(config, 2)
            .decide_move(&game.engine.state().board);
        let decision_json = to_json(&decision).expect("decision serializes");

        let turn = game
            .apply_ai_decision_json(&decision_json)
            .expect("decision applies");
        let turn: serde_json::Value = serde_json::from_str(&turn).expect("turn parses");
        assert_eq!(turn["decision"]["move"], serde_json::json!(decision.mv));
        assert_eq!(game.engine.state().current_player, Player::Human);

        let tree = game
            .minimax_tree_json(None)
            .expect("tree json")
            .expect("thought tree kept");
        let expected = to_json(&decision.tree).expect("tree serializes");
        assert_eq!(tree, expected);
    }
}
