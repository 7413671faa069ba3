use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{BoardGame, Player};
use crate::utils::{console_log, Stopwatch};

use super::minimax::{Score, SearchProfile, Searcher, INFINITY, NEG_INFINITY};
use super::tree::SearchNode;

/// 提示功能固定的搜索深度。
pub const HINT_DEPTH: u8 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 放弃搜索、直接随机落子的概率。
    pub fn random_move_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty `{}`, expected easy, medium or hard", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    pub depth: u8,
    pub randomness: f64,
}

impl AiConfig {
    pub fn from_difficulty<G: SearchProfile>(difficulty: Difficulty) -> Self {
        Self {
            depth: G::search_depth(difficulty),
            randomness: difficulty.random_move_probability(),
        }
    }

    /// 深度至少为 1，否则搜索在根节点就截断，拿不到棋步。
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness.clamp(0.0, 1.0);
        self
    }
}

/// 这一步棋是怎么来的。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Search,
    Random,
    /// 棋盘已满或对局已分胜负。
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct AiDecision<G: BoardGame> {
    #[serde(rename = "move")]
    pub mv: Option<G::Move>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    pub source: MoveSource,
    pub depth: u8,
    pub nodes: u64,
    pub depth_reached: u8,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<SearchNode<G>>,
}

impl<G: BoardGame> AiDecision<G> {
    fn unavailable(depth: u8) -> Self {
        Self {
            mv: None,
            score: None,
            source: MoveSource::Unavailable,
            depth,
            nodes: 0,
            depth_reached: 0,
            duration_ms: 0,
            tree: None,
        }
    }

    /// 取走搜索树，交给调用方的树槽保存。
    pub fn take_tree(&mut self) -> Option<SearchNode<G>> {
        self.tree.take()
    }
}

/// 电脑玩家，总是以 `Player::Ai` 的身份做最大化。
pub struct AiAgent<G: SearchProfile> {
    config: AiConfig,
    rng: SmallRng,
    _game: PhantomData<G>,
}

impl<G: SearchProfile> AiAgent<G> {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
            _game: PhantomData,
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            _game: PhantomData,
        }
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty::<G>(difficulty))
    }

    pub fn config(&self) -> AiConfig {
        self.config
    }

    pub fn set_config(&mut self, config: AiConfig) {
        self.config = config;
    }

    pub fn decide_move(&mut self, board: &G::Board) -> AiDecision<G> {
        let moves = G::legal_moves(board);
        if moves.is_empty() {
            return AiDecision::unavailable(self.config.depth);
        }

        if self.should_play_randomly() {
            return self.random_decision(&moves);
        }

        self.search_decision(board)
    }

    fn should_play_randomly(&mut self) -> bool {
        self.config.randomness > 0.0 && self.rng.gen::<f64>() < self.config.randomness
    }

    /// 随机分支：不搜索，也不产生搜索树。
    fn random_decision(&mut self, moves: &[G::Move]) -> AiDecision<G> {
        let mv = moves.choose(&mut self.rng).copied();
        console_log!("[{}] random move {:?}", G::NAME, mv);
        AiDecision {
            mv,
            score: None,
            source: MoveSource::Random,
            depth: 0,
            nodes: 0,
            depth_reached: 0,
            duration_ms: 0,
            tree: None,
        }
    }

    fn search_decision(&self, board: &G::Board) -> AiDecision<G> {
        let stopwatch = Stopwatch::start();
        let mut searcher = Searcher::<G>::new(Player::Ai, true);
        let result = searcher.search(board, self.config.depth, NEG_INFINITY, INFINITY, true);
        let stats = searcher.stats();
        let duration_ms = stopwatch.elapsed_ms();

        console_log!(
            "[{}] depth {} chose {:?} (score {}, {} nodes, {} ms)",
            G::NAME,
            self.config.depth,
            result.best_move,
            result.score,
            stats.nodes,
            duration_ms
        );

        AiDecision {
            mv: result.best_move,
            score: Some(result.score),
            source: if result.best_move.is_some() {
                MoveSource::Search
            } else {
                MoveSource::Unavailable
            },
            depth: self.config.depth,
            nodes: stats.nodes,
            depth_reached: stats.depth_reached,
            duration_ms,
            tree: result.node,
        }
    }
}

/// 站在人类一方搜索 `HINT_DEPTH` 层，不随机、不记录搜索树。
pub fn hint<G: SearchProfile>(board: &G::Board) -> Option<G::Move> {
    if !G::HINTS_ENABLED {
        return None;
    }
    let mut searcher = Searcher::<G>::new(Player::Human, false);
    searcher
        .search(board, HINT_DEPTH, NEG_INFINITY, INFINITY, true)
        .best_move
}
