//! 浏览器环境下的绑定冒烟测试：`wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use minimax_games::*;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn c4_board(rows: [[u8; 7]; 6]) -> JsValue {
    let board = ConnectFourBoard::from_rows(rows).expect("valid cells");
    to_value(&board).expect("board serializes")
}

#[wasm_bindgen_test]
fn connect_four_free_functions_round_trip_boards() {
    let board = create_connect_four_board().expect("empty board");
    let board = connect_four_make_move(board, 3, 1).expect("move applies");
    let parsed: ConnectFourBoard = from_value(board.clone()).expect("board parses");
    assert_eq!(parsed.cell(5, 3), Some(Player::Human));

    let unchanged = connect_four_make_move(board.clone(), -1, 2).expect("negative column ignored");
    let unchanged: ConnectFourBoard = from_value(unchanged).expect("board parses");
    assert_eq!(unchanged, parsed);

    assert!(!connect_four_check_win(board.clone(), 1).expect("win check"));
    assert!(!connect_four_is_draw(board).expect("draw check"));
}

#[wasm_bindgen_test]
fn connect_four_ai_move_returns_move_and_tree() {
    let board = create_connect_four_board().expect("empty board");
    let response = connect_four_ai_move(board, Some("hard".into())).expect("ai move");
    let response: serde_json::Value = from_value(response).expect("response parses");
    assert_eq!(response["move"].as_f64(), Some(3.0));
    assert_eq!(response["decision"]["source"], "search");
    assert_eq!(response["decision"]["tree"]["bestMove"].as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn connect_four_hint_completes_the_human_line() {
    let mut rows = [[0u8; 7]; 6];
    rows[5][0] = 1;
    rows[5][1] = 1;
    rows[5][2] = 1;
    rows[4][0] = 2;
    rows[4][1] = 2;
    rows[3][0] = 2;
    assert_eq!(connect_four_hint(c4_board(rows)).expect("hint"), 3);

    let full = [[1u8; 7]; 6];
    assert_eq!(connect_four_hint(c4_board(full)).expect("hint"), -1);
}

#[wasm_bindgen_test]
fn tic_tac_toe_hint_is_disabled() {
    let board = create_tic_tac_toe_board().expect("empty board");
    let hint: [i32; 2] = from_value(tic_tac_toe_hint(board).expect("hint")).expect("hint parses");
    assert_eq!(hint, [-1, -1]);
}

#[wasm_bindgen_test]
fn tic_tac_toe_ai_takes_the_win() {
    let board = TicTacToeBoard::from_rows([[1, 1, 0], [2, 2, 0], [0, 0, 0]]).expect("valid cells");
    let response = tic_tac_toe_ai_move(to_value(&board).expect("board serializes"), Some("hard".into()))
        .expect("ai move");
    let response: serde_json::Value = from_value(response).expect("response parses");
    let square: Vec<f64> = response["move"]
        .as_array()
        .expect("move is a pair")
        .iter()
        .filter_map(serde_json::Value::as_f64)
        .collect();
    assert_eq!(square, vec![0.0, 2.0]);
    assert_eq!(response["decision"]["source"], "search");
    assert_eq!(response["decision"]["tree"]["isMaximizing"], true);
}

#[wasm_bindgen_test]
fn stateful_game_keeps_the_latest_tree() {
    let mut game = TicTacToeGame::new(Some("hard".into()));
    assert_eq!(game.difficulty(), "hard");
    assert!(game.minimax_tree_json(None).expect("tree json").is_none());

    game.play(0, 0).expect("human move");
    game.apply_ai_move().expect("ai move");
    let tree = game
        .minimax_tree_json(Some(1))
        .expect("tree json")
        .expect("tree recorded");
    let tree: serde_json::Value = serde_json::from_str(&tree).expect("tree parses");
    assert_eq!(tree["isMaximizing"], true);

    game.reset_minimax_tree();
    assert!(game.minimax_tree_json(None).expect("tree json").is_none());

    assert!(game.set_difficulty("impossible").is_err());
    assert!(game.play(0, 0).is_err());
}

#[wasm_bindgen_test]
async fn think_ai_resolves_without_moving() {
    let game = ConnectFourGame::new(Some("hard".into()));
    let promise = game.think_ai(Some(0));
    let result = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .expect("promise resolves");
    let json = result.as_string().expect("decision json");
    let decision: serde_json::Value = serde_json::from_str(&json).expect("decision parses");
    assert_eq!(decision["move"], 3);

    let state: serde_json::Value =
        serde_json::from_str(&game.state_json().expect("state json")).expect("state parses");
    assert_eq!(state["turn"], 0);
}

#[wasm_bindgen_test]
async fn thought_move_is_applied_with_its_tree() {
    let mut game = TicTacToeGame::new(Some("hard".into()));
    game.play(0, 0).expect("human move");

    let promise = game.think_ai(Some(0));
    let result = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .expect("promise resolves");
    let json = result.as_string().expect("decision json");
    let decision: serde_json::Value = serde_json::from_str(&json).expect("decision parses");

    let turn = game.apply_ai_decision_json(&json).expect("decision applies");
    let turn: serde_json::Value = serde_json::from_str(&turn).expect("turn parses");
    assert_eq!(turn["decision"]["move"], decision["move"]);

    let tree = game
        .minimax_tree_json(None)
        .expect("tree json")
        .expect("thought tree kept");
    let tree: serde_json::Value = serde_json::from_str(&tree).expect("tree parses");
    assert_eq!(tree, decision["tree"]);
    assert!(game.apply_ai_decision_json(&json).is_err());
}
