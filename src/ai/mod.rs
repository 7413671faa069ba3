//! AI 算法模块：minimax + alpha-beta 剪枝、估值、难度策略与搜索树记录。

pub mod heuristic;
pub mod minimax;
pub mod policy;
pub mod tree;

pub use heuristic::{evaluate_connect_four, evaluate_tic_tac_toe};
pub use minimax::{minimax, Score, SearchProfile, SearchResult, SearchStats, Searcher, INFINITY, NEG_INFINITY};
pub use policy::{hint, AiAgent, AiConfig, AiDecision, Difficulty, MoveSource, UnknownDifficulty, HINT_DEPTH};
pub use tree::{DecisionTree, SearchNode, TreeSummary};
