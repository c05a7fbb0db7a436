//! # Results Column Module / 结果列模块
//!
//! Turns a node of the [`TestTree`] into the short, styled summary shown in the
//! "Results" column of a test tree view: `Passed`, `Running...`, `F:1 E:2 P:3`
//! and so on. The presentation is a pure function of the node's subtree.
//!
//! 将 [`TestTree`] 中的节点转换为测试树视图 "Results" 列中显示的简短带样式摘要，
//! 例如 `Passed`、`Running...`、`F:1 E:2 P:3` 等。该展示是节点子树的纯函数。

use std::fmt;

use serde::Serialize;

use crate::core::counts::{LeafOutcome, ResultCounts};
use crate::core::tree::{NodeId, TestNode, TestTree};

pub const NO_TESTS: &str = "<NO TESTS>";
pub const NOT_RUN: &str = "Not run";
pub const RUNNING: &str = "Running...";
pub const ASSERTION_FAILED: &str = "Assertion failed";
pub const ERROR: &str = "Error";
pub const PASSED: &str = "Passed";
pub const TERMINATED: &str = "Terminated";

/// Style tag of a fragment. Renderers map each tag to their own attributes.
/// 片段的样式标签。渲染器会将每个标签映射到各自的显示属性。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    NotRun,
    Running,
    Passed,
    /// Failed or errored / 失败或错误
    Defect,
    Terminated,
}

impl Style {
    /// Stable lowercase name, used as a CSS class suffix.
    /// 稳定的小写名称，用作 CSS 类名后缀。
    pub fn as_str(self) -> &'static str {
        match self {
            Style::NotRun => "not-run",
            Style::Running => "running",
            Style::Passed => "passed",
            Style::Defect => "defect",
            Style::Terminated => "terminated",
        }
    }
}

/// One piece of styled text.
/// 一段带样式的文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub style: Style,
}

impl Fragment {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The "Results" column.
/// "Results" 列。
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsColumn;

impl ResultsColumn {
    pub fn title(&self) -> &'static str {
        "Results"
    }

    /// Fragments for `id`. An unknown id yields no fragments.
    ///
    /// 返回 `id` 的片段。未知的 id 不产生任何片段。
    pub fn present(&self, tree: &TestTree, id: NodeId) -> Vec<Fragment> {
        match tree.get(id) {
            Some(node) if node.is_suite() => present_suite(tree, id, node),
            Some(node) => vec![present_test(node)],
            None => Vec::new(),
        }
    }

    /// Fragments joined into one string.
    /// 将片段拼接为一个字符串。
    pub fn plain_text(&self, tree: &TestTree, id: NodeId) -> String {
        self.present(tree, id).iter().map(|f| f.text.as_str()).collect()
    }

    /// `true` when any node below `id` (inclusive) would render a defect:
    /// a failed or errored test, or a suite reporting no tests.
    ///
    /// 当 `id`（含）以下任一节点会显示缺陷时返回 `true`：
    /// 失败或出错的测试，或没有报告任何测试的套件。
    pub fn has_defects(&self, tree: &TestTree, id: NodeId) -> bool {
        tree.preorder(id).into_iter().any(|node_id| {
            let node = &tree[node_id];
            if node.is_suite() {
                !node.has_children()
            } else {
                matches!(LeafOutcome::of(node), LeafOutcome::Failed | LeafOutcome::Errored)
            }
        })
    }
}

fn present_test(test: &TestNode) -> Fragment {
    match LeafOutcome::of(test) {
        LeafOutcome::Terminated => Fragment::new(TERMINATED, Style::Terminated),
        LeafOutcome::Pending if test.is_started() => Fragment::new(RUNNING, Style::Running),
        LeafOutcome::Pending => Fragment::new(NOT_RUN, Style::NotRun),
        LeafOutcome::Errored => Fragment::new(ERROR, Style::Defect),
        LeafOutcome::Failed => Fragment::new(ASSERTION_FAILED, Style::Defect),
        LeafOutcome::Passed => Fragment::new(PASSED, Style::Passed),
    }
}

fn present_suite(tree: &TestTree, id: NodeId, suite: &TestNode) -> Vec<Fragment> {
    // A suite that reports no tests is a failure signal, whatever its state.
    if !suite.has_children() {
        return vec![Fragment::new(NO_TESTS, Style::Defect)];
    }

    // Unresolved children (including after termination) render as nothing.
    let counts = ResultCounts::of(tree, id);
    if counts.resolved() == 0 {
        return Vec::new();
    }

    let mut fragments = Vec::with_capacity(3);
    if counts.failed > 0 {
        fragments.push(Fragment::new(format!("F:{} ", counts.failed), Style::Defect));
    }
    if counts.errored > 0 {
        fragments.push(Fragment::new(format!("E:{} ", counts.errored), Style::Defect));
    }
    if counts.passed > 0 {
        fragments.push(Fragment::new(format!("P:{}", counts.passed), Style::Passed));
    }
    fragments
}
