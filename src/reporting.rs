//! # Reporting Module / 报告模块
//!
//! This module renders a test tree for people: a colored console tree with
//! failure details, and a static HTML report. Both use the results column to
//! summarize each node.
//!
//! 此模块为用户渲染测试树：带有失败详情的彩色控制台树，以及静态 HTML 报告。
//! 两者都使用结果列来概括每个节点。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_failure_details, print_progress, print_summary, print_tree};
pub use html::generate_html_report;
