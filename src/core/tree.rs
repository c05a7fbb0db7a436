//! # Test Tree Module / 测试树模块
//!
//! This module defines the arena-owned tree of test and suite nodes that an
//! execution driver mutates while a run is in progress. Nodes live in a single
//! `Vec` owned by [`TestTree`]; children are ordered lists of [`NodeId`]s and
//! parent links are plain ids, so there are no reference cycles.
//!
//! 此模块定义了由执行驱动程序在运行过程中修改的测试和套件节点树。
//! 所有节点都存放在 [`TestTree`] 拥有的单个 `Vec` 中；子节点是按插入顺序排列的
//! [`NodeId`] 列表，父链接只是普通的 id，因此不存在引用循环。
//!
//! State transitions only move forward:
//! `NotStarted -> Started -> Finished` or `NotStarted/Started -> Terminated`.
//! Calls that would move a node backwards are ignored.
//!
//! 状态转换只会向前推进，任何会让节点状态倒退的调用都会被忽略。

use std::fmt;
use std::ops::Index;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Errors raised by tree mutations.
/// 树修改操作引发的错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not belong to this tree.
    /// 该 id 不属于此树。
    #[error("unknown test node {0}")]
    UnknownNode(NodeId),
    /// Children can only be attached to suites.
    /// 只能向套件添加子节点。
    #[error("'{name}' is a test, not a suite; it cannot own children")]
    NotASuite { name: String },
}

/// Index of a node inside its [`TestTree`].
/// 节点在其 [`TestTree`] 中的索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a node is a container of other nodes or a single executable test.
/// 节点是其他节点的容器还是单个可执行测试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Suite,
    Test,
}

/// Lifecycle state of a node.
/// 节点的生命周期状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeState {
    /// Reported but not started yet / 已报告但尚未开始
    NotStarted,
    /// Started, no outcome yet / 已开始，尚无结果
    Started,
    /// Reached a final outcome (passed or failed) / 已得出最终结果（通过或失败）
    Finished,
    /// Interrupted before an outcome was reached / 在得出结果之前被中断
    Terminated,
}

/// Failure information attached to a failed node.
/// 附加到失败节点上的失败信息。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
    /// Short failure message, e.g. an assertion text / 简短的失败消息，例如断言文本
    pub message: String,
    /// Stack trace or captured output / 堆栈跟踪或捕获的输出
    pub details: String,
}

/// A single test or suite in the tree.
/// 树中的单个测试或套件。
#[derive(Debug, Clone)]
pub struct TestNode {
    name: String,
    kind: NodeKind,
    state: NodeState,
    failed: bool,
    error: bool,
    failure: Option<Failure>,
    duration: Option<Duration>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TestNode {
    fn new(name: String, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name,
            kind,
            state: NodeState::NotStarted,
            failed: false,
            error: false,
            failure: None,
            duration: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_suite(&self) -> bool {
        self.kind == NodeKind::Suite
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// `true` once the node left the `NotStarted` state.
    /// 节点离开 `NotStarted` 状态后即为 `true`。
    pub fn is_started(&self) -> bool {
        self.state != NodeState::NotStarted
    }

    /// `true` while the node is started but has neither finished nor been terminated.
    /// 节点已开始但既未完成也未被终止时为 `true`。
    pub fn is_in_progress(&self) -> bool {
        self.state == NodeState::Started
    }

    pub fn is_finished(&self) -> bool {
        self.state == NodeState::Finished
    }

    pub fn is_terminated(&self) -> bool {
        self.state == NodeState::Terminated
    }

    /// A node is resolved once it reached a final outcome.
    /// 节点得出最终结果后即视为已解决。
    pub fn is_resolved(&self) -> bool {
        self.is_finished()
    }

    /// Failure flag. Set for both assertion failures and errors.
    /// 失败标志。断言失败和错误都会设置此标志。
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Error flag, distinct from a plain assertion failure.
    /// 错误标志，区别于普通的断言失败。
    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    /// 按插入顺序排列的子节点。
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena that owns every node of a single test run.
/// The root is always a suite named after the run.
///
/// 拥有单次测试运行所有节点的 arena。
/// 根节点始终是以该运行命名的套件。
#[derive(Debug, Clone)]
pub struct TestTree {
    nodes: Vec<TestNode>,
}

impl TestTree {
    /// Creates a tree containing only the root suite.
    /// 创建一个仅包含根套件的树。
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![TestNode::new(root_name.into(), NodeKind::Suite, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this is never `true`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TestNode> {
        self.nodes.get(id.0)
    }

    /// Appends a new suite under `parent`.
    /// 在 `parent` 下追加一个新套件。
    pub fn add_suite(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, TreeError> {
        self.add_child(parent, name.into(), NodeKind::Suite)
    }

    /// Appends a new leaf test under `parent`.
    /// 在 `parent` 下追加一个新的叶子测试。
    pub fn add_test(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, TreeError> {
        self.add_child(parent, name.into(), NodeKind::Test)
    }

    fn add_child(&mut self, parent: NodeId, name: String, kind: NodeKind) -> Result<NodeId, TreeError> {
        let id = NodeId(self.nodes.len());
        let parent_node = self.node_mut(parent)?;
        if !parent_node.is_suite() {
            return Err(TreeError::NotASuite {
                name: parent_node.name.clone(),
            });
        }
        parent_node.children.push(id);
        trace!(%id, %parent, %name, ?kind, "node added");
        self.nodes.push(TestNode::new(name, kind, Some(parent)));
        Ok(id)
    }

    /// `NotStarted -> Started`. No-op in any other state.
    pub fn start(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.state == NodeState::NotStarted {
            node.state = NodeState::Started;
        }
        Ok(())
    }

    /// Marks the node as finished, keeping any failure flags already recorded.
    /// 将节点标记为已完成，保留已记录的失败标志。
    pub fn finish(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if matches!(node.state, NodeState::NotStarted | NodeState::Started) {
            node.state = NodeState::Finished;
        }
        Ok(())
    }

    /// Records a failure and resolves the node. `is_error` distinguishes an
    /// error (unexpected exception) from an assertion failure.
    ///
    /// 记录一次失败并使节点进入已解决状态。`is_error` 用于区分错误（意外异常）与断言失败。
    pub fn fail(
        &mut self,
        id: NodeId,
        message: impl Into<String>,
        details: impl Into<String>,
        is_error: bool,
    ) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.state == NodeState::Terminated {
            return Ok(());
        }
        node.failed = true;
        node.error |= is_error;
        node.failure = Some(Failure {
            message: message.into(),
            details: details.into(),
        });
        node.state = NodeState::Finished;
        Ok(())
    }

    /// Interrupts an unresolved node. Finished nodes keep their outcome.
    /// 中断尚未解决的节点。已完成的节点保留其结果。
    pub fn terminate(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if matches!(node.state, NodeState::NotStarted | NodeState::Started) {
            node.state = NodeState::Terminated;
        }
        Ok(())
    }

    /// Terminates `id` and every unresolved node below it.
    /// 终止 `id` 及其下所有尚未解决的节点。
    pub fn terminate_subtree(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.node_mut(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            if matches!(node.state, NodeState::NotStarted | NodeState::Started) {
                node.state = NodeState::Terminated;
            }
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(())
    }

    pub fn set_duration(&mut self, id: NodeId, duration: Duration) -> Result<(), TreeError> {
        self.node_mut(id)?.duration = Some(duration);
        Ok(())
    }

    /// Number of ancestors between `id` and the root. The root has depth 0.
    /// `id` 与根节点之间的祖先数量。根节点深度为 0。
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).and_then(TestNode::parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).and_then(TestNode::parent);
        }
        depth
    }

    /// Node ids in pre-order, children in insertion order.
    /// 按先序排列的节点 id，子节点按插入顺序。
    pub fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            order.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TestNode, TreeError> {
        self.nodes.get_mut(id.0).ok_or(TreeError::UnknownNode(id))
    }
}

impl Index<NodeId> for TestTree {
    type Output = TestNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
