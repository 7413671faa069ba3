//! 搜索树记录：供前端绘制 AI 的决策过程。

use serde::{Deserialize, Serialize};

use crate::game::BoardGame;

use super::minimax::Score;

/// 搜索树中的一个节点。
///
/// `best_move` 是在该节点选中的棋步（叶子和剪枝占位节点为空），
/// `played_move` 是从父节点走到这里的棋步（根节点为空）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct SearchNode<G: BoardGame> {
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_move: Option<G::Move>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_move: Option<G::Move>,
    pub is_maximizing: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SearchNode<G>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<Score>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pruned: bool,
    #[serde(default, rename = "boardState", skip_serializing_if = "Option::is_none")]
    pub board: Option<G::Board>,
}

impl<G: BoardGame> SearchNode<G> {
    pub(crate) fn open(is_maximizing: bool) -> Self {
        Self {
            score: 0,
            best_move: None,
            played_move: None,
            is_maximizing,
            children: Vec::new(),
            alpha: None,
            beta: None,
            pruned: false,
            board: None,
        }
    }

    pub(crate) fn pruned(played_move: G::Move, is_maximizing: bool, board: Option<G::Board>) -> Self {
        Self {
            played_move: Some(played_move),
            pruned: true,
            board,
            ..Self::open(is_maximizing)
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 节点总数，含剪枝占位节点。
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SearchNode::node_count).sum::<usize>()
    }

    pub fn pruned_count(&self) -> usize {
        usize::from(self.pruned) + self.children.iter().map(SearchNode::pruned_count).sum::<usize>()
    }

    /// 根到最深叶子的层数，单个节点为 0。
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// 只保留前 `max_depth` 层，前端一次只画得下两三层。
    pub fn truncated(&self, max_depth: usize) -> Self {
        let children = if max_depth == 0 {
            Vec::new()
        } else {
            self.children
                .iter()
                .map(|child| child.truncated(max_depth - 1))
                .collect()
        };
        Self {
            children,
            ..self.clone_without_children()
        }
    }

    /// 沿着每层选中的棋步走到底。
    pub fn principal_variation(&self) -> Vec<G::Move> {
        let mut line = Vec::new();
        let mut node = self;
        while let Some(best) = node.best_move {
            line.push(best);
            match node
                .children
                .iter()
                .find(|child| !child.pruned && child.played_move == Some(best))
            {
                Some(child) => node = child,
                None => break,
            }
        }
        line
    }

    pub fn summary(&self) -> TreeSummary {
        let nodes = self.node_count();
        let pruned = self.pruned_count();
        TreeSummary {
            nodes,
            searched: nodes - pruned,
            pruned,
            depth: self.depth(),
        }
    }

    fn clone_without_children(&self) -> Self {
        Self {
            score: self.score,
            best_move: self.best_move,
            played_move: self.played_move,
            is_maximizing: self.is_maximizing,
            children: Vec::new(),
            alpha: self.alpha,
            beta: self.beta,
            pruned: self.pruned,
            board: self.board,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeSummary {
    pub nodes: usize,
    pub searched: usize,
    pub pruned: usize,
    pub depth: usize,
}

/// 最近一次记录搜索的结果。
///
/// 每次带记录的搜索都会整体替换上一棵树；随机走子不会触碰这里，
/// 新开一局时调用 `reset` 清空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTree<G: BoardGame> {
    root: Option<SearchNode<G>>,
}

impl<G: BoardGame> DecisionTree<G> {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// 保存新的树，返回被替换掉的旧树。
    pub fn capture(&mut self, root: SearchNode<G>) -> Option<SearchNode<G>> {
        self.root.replace(root)
    }

    pub fn get(&self) -> Option<&SearchNode<G>> {
        self.root.as_ref()
    }

    pub fn reset(&mut self) {
        self.root = None;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn summary(&self) -> Option<TreeSummary> {
        self.root.as_ref().map(SearchNode::summary)
    }
}

impl<G: BoardGame> Default for DecisionTree<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TicTacToe;

    fn leaf(score: Score, played: (usize, usize), is_maximizing: bool) -> SearchNode<TicTacToe> {
        SearchNode {
            score,
            played_move: Some(played),
            ..SearchNode::open(is_maximizing)
        }
    }

    fn sample_tree() -> SearchNode<TicTacToe> {
        let mut middle = SearchNode {
            score: 10,
            best_move: Some((2, 2)),
            played_move: Some((0, 1)),
            ..SearchNode::open(false)
        };
        middle.children.push(leaf(10, (2, 2), true));
        middle.children.push(SearchNode::pruned((2, 1), true, None));

        let mut root = SearchNode {
            score: 10,
            best_move: Some((0, 1)),
            ..SearchNode::open(true)
        };
        root.children.push(leaf(-10, (0, 0), false));
        root.children.push(middle);
        root
    }

    #[test]
    fn counts_nodes_and_pruned_placeholders() {
        let summary = sample_tree().summary();
        assert_eq!(
            summary,
            TreeSummary {
                nodes: 5,
                searched: 4,
                pruned: 1,
                depth: 2
            }
        );
    }

    #[test]
    fn principal_variation_follows_best_moves() {
        assert_eq!(sample_tree().principal_variation(), vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn truncation_keeps_top_levels_only() {
        let tree = sample_tree();
        let shallow = tree.truncated(1);
        assert_eq!(shallow.depth(), 1);
        assert_eq!(shallow.children.len(), 2);
        assert!(shallow.children.iter().all(SearchNode::is_leaf));
        assert_eq!(tree.truncated(0).node_count(), 1);
        assert_eq!(tree.truncated(5), tree);
    }

    #[test]
    fn slot_is_replaced_then_cleared() {
        let mut slot = DecisionTree::<TicTacToe>::new();
        assert!(slot.is_empty());
        assert!(slot.capture(sample_tree()).is_none());
        let previous = slot.capture(leaf(1, (1, 1), true));
        assert_eq!(previous, Some(sample_tree()));
        assert_eq!(slot.get().map(|root| root.score), Some(1));
        slot.reset();
        assert!(slot.get().is_none());
        assert!(slot.summary().is_none());
    }

    #[test]
    fn serializes_with_visualization_field_names() {
        let json = serde_json::to_value(sample_tree()).expect("tree should serialize");
        assert_eq!(json["isMaximizing"], true);
        assert_eq!(json["bestMove"], serde_json::json!([0, 1]));
        assert!(json.get("playedMove").is_none());
        assert_eq!(json["children"][1]["children"][1]["pruned"], true);
        assert!(json["children"][0].get("pruned").is_none());
    }
}
