//! 一局游戏的控制器：对局状态、电脑玩家和最近一次的搜索树放在一起。

use serde::Serialize;

use crate::ai::{
    hint, AiAgent, AiConfig, AiDecision, DecisionTree, Difficulty, SearchNode, SearchProfile,
    TreeSummary,
};
use crate::game::{BoardGame, GameStatus, MatchState, Player, RuleEngine, RuleError, RuleResolution};
use crate::utils::console_log;

/// 前端模拟“思考”的默认延迟。
pub const DEFAULT_THINK_DELAY_MS: u32 = 800;

#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct AiTurn<G: BoardGame> {
    pub decision: AiDecision<G>,
    pub resolution: RuleResolution<G>,
}

pub struct GameEngine<G: SearchProfile> {
    state: MatchState<G>,
    difficulty: Difficulty,
    agent: AiAgent<G>,
    rules: RuleEngine,
    tree: DecisionTree<G>,
}

impl<G: SearchProfile> GameEngine<G> {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_agent(difficulty, AiAgent::from_difficulty(difficulty))
    }

    pub fn with_agent(difficulty: Difficulty, agent: AiAgent<G>) -> Self {
        Self {
            state: MatchState::new(),
            difficulty,
            agent,
            rules: RuleEngine::new(),
            tree: DecisionTree::new(),
        }
    }

    pub fn state(&self) -> &MatchState<G> {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.agent.set_config(AiConfig::from_difficulty::<G>(difficulty));
    }

    pub fn agent_config(&self) -> AiConfig {
        self.agent.config()
    }

    pub fn set_agent_config(&mut self, config: AiConfig) {
        self.agent.set_config(config);
    }

    /// 新开一局：清空棋盘和搜索树，人类先手。
    pub fn reset(&mut self) {
        self.state = MatchState::new();
        self.tree.reset();
        console_log!("[{}] new game ({})", G::NAME, self.difficulty);
    }

    /// 载入外部局面，并立即判定是否已经结束。
    pub fn load_board(&mut self, board: G::Board, current_player: Player) -> GameStatus {
        self.state = MatchState::from_board(board, current_player);
        self.state.evaluate_outcome()
    }

    pub fn play_human(&mut self, mv: G::Move) -> Result<RuleResolution<G>, RuleError> {
        let resolution = self.rules.resolve(&mut self.state, Player::Human, mv)?;
        self.log_outcome();
        Ok(resolution)
    }

    /// 让电脑走一步。经过搜索的走法会替换树槽里的旧树，随机走法不会。
    pub fn play_ai(&mut self) -> Result<AiTurn<G>, RuleError> {
        self.ensure_ai_turn()?;
        let decision = self.agent.decide_move(&self.state.board);
        self.apply_decision(decision)
    }

    /// 落下一个事先算好的决策，比如前端 `think_ai` 返回的结果。
    ///
    /// 棋步先按当前局面校验，通过后才替换树槽里的搜索树。
    pub fn apply_decision(&mut self, mut decision: AiDecision<G>) -> Result<AiTurn<G>, RuleError> {
        self.ensure_ai_turn()?;
        let mv = decision.mv.ok_or(RuleError::NoLegalMoves)?;
        G::check_move(&self.state.board, mv)?;

        if let Some(tree) = decision.take_tree() {
            self.tree.capture(tree);
        }
        let resolution = self.rules.resolve(&mut self.state, Player::Ai, mv)?;
        self.log_outcome();

        Ok(AiTurn {
            decision,
            resolution,
        })
    }

    /// 只在轮到人类且对局进行中时给出提示。
    pub fn hint(&self) -> Option<G::Move> {
        if self.state.is_finished() || self.state.current_player != Player::Human {
            return None;
        }
        hint::<G>(&self.state.board)
    }

    pub fn minimax_tree(&self) -> Option<&SearchNode<G>> {
        self.tree.get()
    }

    pub fn tree_summary(&self) -> Option<TreeSummary> {
        self.tree.summary()
    }

    pub fn reset_minimax_tree(&mut self) {
        self.tree.reset();
    }

    fn ensure_ai_turn(&self) -> Result<(), RuleError> {
        if self.state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        if self.state.current_player != Player::Ai {
            return Err(RuleError::NotPlayerTurn {
                expected: self.state.current_player,
                actual: Player::Ai,
            });
        }
        Ok(())
    }

    fn log_outcome(&self) {
        match self.state.status {
            GameStatus::Won => console_log!("[{}] {:?} wins", G::NAME, self.state.winner()),
            GameStatus::Draw => console_log!("[{}] draw", G::NAME),
            GameStatus::Playing => {}
        }
    }
}
