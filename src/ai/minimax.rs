use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::game::{BoardGame, Player};

use super::policy::Difficulty;
use super::tree::SearchNode;

pub type Score = i32;

/// 顶层调用的 alpha 初值，代表负无穷。
pub const NEG_INFINITY: Score = Score::MIN;
/// 顶层调用的 beta 初值，代表正无穷。
pub const INFINITY: Score = Score::MAX;

/// 每种棋的搜索配置：估值函数、难度深度、记录树时保留哪些细节。
pub trait SearchProfile: BoardGame {
    /// 节点是否记录 alpha/beta 与棋盘快照。
    const RECORD_DETAIL: bool;
    /// 剪枝时是否为跳过的棋步生成占位节点。
    const RECORD_PRUNED: bool;
    const HINTS_ENABLED: bool;

    fn evaluate(board: &Self::Board, player: Player) -> Score;

    fn search_depth(difficulty: Difficulty) -> u8;
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub nodes: u64,
    pub depth_reached: u8,
}

impl SearchStats {
    fn visit(&mut self, ply: u8) {
        self.nodes += 1;
        if ply > self.depth_reached {
            self.depth_reached = ply;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<G: BoardGame> {
    pub score: Score,
    /// 截断节点没有棋步。
    pub best_move: Option<G::Move>,
    pub node: Option<SearchNode<G>>,
}

/// 带 alpha-beta 剪枝的定深 minimax。
///
/// 所有分数都站在 `player` 一方：`maximizing` 为真时轮到 `player` 落子，
/// 否则轮到对手。`record_tree` 为真时在结果里附带完整的搜索树。
pub fn minimax<G: SearchProfile>(
    board: &G::Board,
    depth: u8,
    alpha: Score,
    beta: Score,
    maximizing: bool,
    player: Player,
    record_tree: bool,
) -> SearchResult<G> {
    Searcher::<G>::new(player, record_tree).search(board, depth, alpha, beta, maximizing)
}

pub struct Searcher<G: SearchProfile> {
    player: Player,
    record_tree: bool,
    stats: SearchStats,
    _game: PhantomData<G>,
}

impl<G: SearchProfile> Searcher<G> {
    pub fn new(player: Player, record_tree: bool) -> Self {
        Self {
            player,
            record_tree,
            stats: SearchStats::default(),
            _game: PhantomData,
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn search(
        &mut self,
        board: &G::Board,
        depth: u8,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> SearchResult<G> {
        self.search_ply(board, depth, alpha, beta, maximizing, 0)
    }

    fn search_ply(
        &mut self,
        board: &G::Board,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        ply: u8,
    ) -> SearchResult<G> {
        self.stats.visit(ply);
        let opponent = self.player.opponent();
        let moves = G::legal_moves(board);

        let mut node = self.record_tree.then(|| {
            let mut node = SearchNode::open(maximizing);
            if G::RECORD_DETAIL {
                node.alpha = Some(alpha);
                node.beta = Some(beta);
                node.board = Some(*board);
            }
            node
        });

        if depth == 0
            || moves.is_empty()
            || G::has_won(board, self.player)
            || G::has_won(board, opponent)
        {
            let score = G::evaluate(board, self.player);
            if let Some(node) = node.as_mut() {
                node.score = score;
            }
            return SearchResult {
                score,
                best_move: None,
                node,
            };
        }

        let mover = if maximizing { self.player } else { opponent };
        let mut best_score = if maximizing { NEG_INFINITY } else { INFINITY };
        let mut best_move = moves[0];

        for (index, &mv) in moves.iter().enumerate() {
            let child_board = G::apply_move(board, mv, mover);
            let child = self.search_ply(&child_board, depth - 1, alpha, beta, !maximizing, ply + 1);

            if let (Some(node), Some(mut child_node)) = (node.as_mut(), child.node) {
                child_node.played_move = Some(mv);
                node.children.push(child_node);
            }

            // 严格比较：同分时保留先出现的棋步
            if maximizing {
                if child.score > best_score {
                    best_score = child.score;
                    best_move = mv;
                }
                alpha = alpha.max(best_score);
            } else {
                if child.score < best_score {
                    best_score = child.score;
                    best_move = mv;
                }
                beta = beta.min(best_score);
            }

            if beta <= alpha {
                if G::RECORD_PRUNED {
                    if let Some(node) = node.as_mut() {
                        for &skipped in &moves[index + 1..] {
                            let snapshot = G::RECORD_DETAIL
                                .then(|| G::apply_move(board, skipped, mover));
                            node.children
                                .push(SearchNode::pruned(skipped, !maximizing, snapshot));
                        }
                    }
                }
                break;
            }
        }

        if let Some(node) = node.as_mut() {
            node.score = best_score;
            node.best_move = Some(best_move);
            if G::RECORD_DETAIL {
                node.alpha = Some(alpha);
                node.beta = Some(beta);
            }
        }

        SearchResult {
            score: best_score,
            best_move: Some(best_move),
            node,
        }
    }
}
