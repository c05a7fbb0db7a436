//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Suite Tally:
//! the test tree, its visitor, leaf counting, the results column
//! presentation, the event model and the configuration.
//!
//! 此模块包含 Suite Tally 的核心功能：
//! 测试树及其访问者、叶子计数、结果列展示、事件模型以及配置。

pub mod column;
pub mod config;
pub mod counts;
pub mod events;
pub mod tree;
pub mod visitor;

// Re-exports
pub use column::{Fragment, ResultsColumn, Style};
pub use config::TallyConfig;
pub use counts::ResultCounts;
pub use events::{TestEvent, TestRun};
pub use tree::{NodeId, TestTree};
