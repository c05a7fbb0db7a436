//! # Test Events Module / 测试事件模块
//!
//! The execution driver reports progress as one JSON object per line. This
//! module defines the event model and applies events to a [`TestTree`].
//!
//! 执行驱动程序以每行一个 JSON 对象的形式报告进度。
//! 此模块定义事件模型，并将事件应用到 [`TestTree`] 上。
//!
//! ```text
//! {"event":"suite_started","name":"math"}
//! {"event":"test_started","name":"adds","parent":"math"}
//! {"event":"test_failed","name":"adds","message":"1 != 2","error":false}
//! {"event":"test_finished","name":"adds","duration_ms":12}
//! {"event":"suite_finished","name":"math"}
//! {"event":"terminated"}
//! ```
//!
//! A node is identified by its name within its parent, so two suites may each
//! hold a test called `new`. A `*_started` event for a name already reported
//! under the same parent starts the existing node instead of creating a new one.
//! Later events may name the parent to disambiguate; without it, the most recent
//! unresolved node of that name is meant.
//!
//! 节点由其在父节点下的名称标识，因此两个套件可以各自包含名为 `new` 的测试。
//! 对同一父节点下已报告过的名称发送 `*_started` 事件时，会启动已有节点而不是创建新节点。
//! 后续事件可以指定父节点以消除歧义；未指定时，指最近一个尚未解决的同名节点。

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::tree::{NodeId, TestTree, TreeError};

/// A single progress report from the execution driver.
/// 来自执行驱动程序的单条进度报告。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TestEvent {
    SuiteStarted {
        name: String,
        /// `None` attaches the suite to the run root / `None` 表示挂到运行的根节点下
        #[serde(default)]
        parent: Option<String>,
    },
    TestStarted {
        name: String,
        #[serde(default)]
        parent: Option<String>,
    },
    TestFailed {
        name: String,
        #[serde(default)]
        parent: Option<String>,
        #[serde(default)]
        message: String,
        #[serde(default)]
        details: String,
        /// Unexpected error rather than an assertion failure / 意外错误而非断言失败
        #[serde(default)]
        error: bool,
    },
    TestFinished {
        name: String,
        #[serde(default)]
        parent: Option<String>,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
    SuiteFinished {
        name: String,
        #[serde(default)]
        parent: Option<String>,
    },
    /// Interrupts the named subtree, or the whole run when `name` is absent.
    /// 中断指定名称的子树；未提供 `name` 时中断整个运行。
    Terminated {
        #[serde(default)]
        name: Option<String>,
    },
}

impl TestEvent {
    /// Parses one line of the event stream. Blank lines yield `Ok(None)`.
    /// `line_no` is 1-based and only used for error reporting.
    ///
    /// 解析事件流中的一行。空行返回 `Ok(None)`。
    /// `line_no` 从 1 开始，仅用于错误报告。
    pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Self>, EventError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|source| EventError::Parse { line: line_no, source })
    }
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("line {line}: malformed event: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("no test or suite named '{0}' has been reported")]
    UnknownName(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A test run being assembled from events: the tree plus the name indexes.
/// 正在由事件组装的测试运行：测试树加名称索引。
#[derive(Debug, Clone)]
pub struct TestRun {
    tree: TestTree,
    /// `(parent, name)` → node
    by_path: HashMap<(NodeId, String), NodeId>,
    /// Every node reported under a name, in report order / 同名的所有节点，按报告顺序
    by_name: HashMap<String, Vec<NodeId>>,
}

impl TestRun {
    /// Creates a run whose root suite is already started.
    /// 创建一个根套件已启动的运行。
    pub fn new(name: impl Into<String>) -> Self {
        let mut tree = TestTree::new(name);
        let root = tree.root();
        if let Err(e) = tree.start(root) {
            warn!(error = %e, "failed to start the run root");
        }
        Self {
            tree,
            by_path: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Builds a run from a whole event log. Lines that fail to parse or apply
    /// are skipped and returned alongside the run.
    ///
    /// 从完整的事件日志构建运行。无法解析或应用的行会被跳过，并与运行一同返回。
    pub fn replay(name: impl Into<String>, log: &str) -> (Self, Vec<EventError>) {
        let mut run = Self::new(name);
        let mut errors = Vec::new();
        for (idx, line) in log.lines().enumerate() {
            if let Err(e) = run.apply_line(idx + 1, line) {
                errors.push(e);
            }
        }
        run.close();
        (run, errors)
    }

    pub fn tree(&self) -> &TestTree {
        &self.tree
    }

    pub fn into_tree(self) -> TestTree {
        self.tree
    }

    /// Finds a node by name alone: the most recently reported one that is
    /// still unresolved, or the most recently reported one otherwise.
    ///
    /// 仅按名称查找节点：优先返回最近报告且尚未解决的节点，否则返回最近报告的节点。
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        let ids = self.by_name.get(name)?;
        ids.iter()
            .rev()
            .find(|id| {
                let node = &self.tree[**id];
                !node.is_finished() && !node.is_terminated()
            })
            .or_else(|| ids.last())
            .copied()
    }

    /// Finds a node by name under a named parent (`None` = the run root).
    /// 在指定父节点下按名称查找节点（`None` 表示运行根节点）。
    pub fn lookup_in(&self, parent: Option<&str>, name: &str) -> Option<NodeId> {
        let parent_id = match parent {
            Some(parent) => self.lookup(parent)?,
            None => self.tree.root(),
        };
        self.by_path.get(&(parent_id, name.to_string())).copied()
    }

    /// Parses and applies a single line.
    /// 解析并应用单行。
    pub fn apply_line(&mut self, line_no: usize, line: &str) -> Result<(), EventError> {
        match TestEvent::parse_line(line_no, line)? {
            Some(event) => self.apply(event),
            None => Ok(()),
        }
    }

    pub fn apply(&mut self, event: TestEvent) -> Result<(), EventError> {
        debug!(?event, "applying event");
        match event {
            TestEvent::SuiteStarted { name, parent } => {
                let id = self.find_or_add(name, parent.as_deref(), true)?;
                self.tree.start(id)?;
            }
            TestEvent::TestStarted { name, parent } => {
                let id = self.find_or_add(name, parent.as_deref(), false)?;
                self.tree.start(id)?;
            }
            TestEvent::TestFailed {
                name,
                parent,
                message,
                details,
                error,
            } => {
                let id = self.resolve(&name, parent.as_deref())?;
                self.tree.fail(id, message, details, error)?;
            }
            TestEvent::TestFinished {
                name,
                parent,
                duration_ms,
            } => {
                let id = self.resolve(&name, parent.as_deref())?;
                if let Some(ms) = duration_ms {
                    self.tree.set_duration(id, Duration::from_millis(ms))?;
                }
                self.tree.finish(id)?;
            }
            TestEvent::SuiteFinished { name, parent } => {
                let id = self.resolve(&name, parent.as_deref())?;
                self.tree.finish(id)?;
            }
            TestEvent::Terminated { name } => {
                let id = match name {
                    Some(name) => self.resolve(&name, None)?,
                    None => self.tree.root(),
                };
                self.tree.terminate_subtree(id)?;
            }
        }
        Ok(())
    }

    /// Marks the end of the event stream. The root finishes when everything
    /// below it resolved; otherwise the leftovers are terminated.
    ///
    /// 标记事件流结束。若根节点下的所有节点都已解决，则根节点完成；否则终止剩余节点。
    pub fn close(&mut self) {
        let root = self.tree.root();
        let unresolved = self
            .tree
            .preorder(root)
            .into_iter()
            .skip(1)
            .filter(|id| {
                let node = &self.tree[*id];
                !node.is_finished() && !node.is_terminated()
            })
            .count();

        let result = if unresolved == 0 {
            self.tree.finish(root)
        } else {
            warn!(unresolved, "event stream ended with unresolved nodes; terminating them");
            self.tree.terminate_subtree(root)
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to close the run root");
        }
    }

    fn resolve(&self, name: &str, parent: Option<&str>) -> Result<NodeId, EventError> {
        let found = match parent {
            Some(parent) => {
                let parent_id = self.resolve(parent, None)?;
                self.by_path.get(&(parent_id, name.to_string())).copied()
            }
            None => self.lookup(name),
        };
        found.ok_or_else(|| EventError::UnknownName(name.to_string()))
    }

    fn find_or_add(&mut self, name: String, parent: Option<&str>, suite: bool) -> Result<NodeId, EventError> {
        let parent_id = match parent {
            Some(parent) => self.resolve(parent, None)?,
            None => self.tree.root(),
        };
        let key = (parent_id, name);
        if let Some(id) = self.by_path.get(&key) {
            return Ok(*id);
        }
        let id = if suite {
            self.tree.add_suite(parent_id, key.1.clone())?
        } else {
            self.tree.add_test(parent_id, key.1.clone())?
        };
        self.by_name.entry(key.1.clone()).or_default().push(id);
        self.by_path.insert(key, id);
        Ok(id)
    }
}
