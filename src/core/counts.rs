//! # Result Counts Module / 结果计数模块
//!
//! Tallies leaf tests below a node. Counts are recomputed by a full traversal
//! every time they are requested; nothing is cached on the nodes.
//!
//! 统计某个节点下的叶子测试。每次请求时都会通过完整遍历重新计算计数，节点上不缓存任何内容。

use crate::core::tree::{NodeId, TestNode, TestTree};
use crate::core::visitor::{TestTreeVisitor, Walk};

/// Outcome of a single leaf test, as far as counting is concerned.
/// 就计数而言，单个叶子测试的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafOutcome {
    Passed,
    /// Assertion failure / 断言失败
    Failed,
    Errored,
    /// Not started or still running / 尚未开始或仍在运行
    Pending,
    Terminated,
}

impl LeafOutcome {
    pub fn of(test: &TestNode) -> Self {
        if test.is_terminated() {
            LeafOutcome::Terminated
        } else if !test.is_finished() {
            LeafOutcome::Pending
        } else if test.is_failed() && test.is_error() {
            LeafOutcome::Errored
        } else if test.is_failed() {
            LeafOutcome::Failed
        } else {
            LeafOutcome::Passed
        }
    }
}

/// Leaf tallies for a subtree.
/// 子树的叶子统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCounts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub pending: usize,
    pub terminated: usize,
}

impl ResultCounts {
    /// Counts every leaf test below `id`, nested suites included.
    /// 统计 `id` 下的所有叶子测试，包括嵌套套件中的测试。
    pub fn of(tree: &TestTree, id: NodeId) -> Self {
        let mut counter = LeafCounter::default();
        tree.walk(id, &mut counter);
        counter.counts
    }

    /// Leaves that reached a final outcome.
    /// 已得出最终结果的叶子数量。
    pub fn resolved(&self) -> usize {
        self.passed + self.failed + self.errored
    }

    pub fn defects(&self) -> usize {
        self.failed + self.errored
    }

    pub fn total(&self) -> usize {
        self.resolved() + self.pending + self.terminated
    }
}

#[derive(Default)]
struct LeafCounter {
    counts: ResultCounts,
}

impl TestTreeVisitor for LeafCounter {
    fn visit_test(&mut self, _id: NodeId, test: &TestNode) -> Walk {
        match LeafOutcome::of(test) {
            LeafOutcome::Passed => self.counts.passed += 1,
            LeafOutcome::Failed => self.counts.failed += 1,
            LeafOutcome::Errored => self.counts.errored += 1,
            LeafOutcome::Pending => self.counts.pending += 1,
            LeafOutcome::Terminated => self.counts.terminated += 1,
        }
        Walk::SkipChildren
    }
}
