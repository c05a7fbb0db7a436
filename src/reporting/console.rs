//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the test tree to the console, one line per node with the
//! results column next to its name, followed by the details of every failed
//! test and a one-line summary.
//!
//! 此模块将测试树打印到控制台，每个节点一行，名称旁边显示结果列，
//! 随后打印每个失败测试的详细信息以及一行摘要。

use colored::*;

use crate::core::column::{Fragment, ResultsColumn, Style};
use crate::core::counts::{LeafOutcome, ResultCounts};
use crate::core::tree::{NodeId, TestTree};
use crate::infra::t;

/// Colors a fragment according to its style tag.
/// 根据样式标签为片段着色。
pub fn style_fragment(fragment: &Fragment) -> ColoredString {
    let text = fragment.text.as_str();
    match fragment.style {
        Style::NotRun => text.dimmed(),
        Style::Running => text.bold(),
        Style::Passed => text.green(),
        Style::Defect => text.red(),
        Style::Terminated => text.yellow(),
    }
}

/// Formats a single node as `<indent><name>  <fragments>`.
/// Two spaces of indentation per level below the root.
///
/// 将单个节点格式化为 `<缩进><名称>  <片段>`。
/// 根节点以下每层缩进两个空格。
pub fn format_node_line(tree: &TestTree, id: NodeId) -> String {
    let Some(node) = tree.get(id) else {
        return String::new();
    };
    let indent = "  ".repeat(tree.depth(id));
    let fragments: String = ResultsColumn
        .present(tree, id)
        .iter()
        .map(|f| style_fragment(f).to_string())
        .collect();

    let name = if node.is_suite() {
        node.name().bold().to_string()
    } else {
        node.name().to_string()
    };

    let duration = node
        .duration()
        .map(|d| format!(" ({:.2?})", d).dimmed().to_string())
        .unwrap_or_default();

    if fragments.is_empty() {
        format!("{indent}{name}{duration}")
    } else {
        format!("{indent}{name}  {fragments}{duration}")
    }
}

/// Lines of the tree report, in pre-order.
/// 按先序排列的树报告行。
pub fn tree_lines(tree: &TestTree, suites_only: bool) -> Vec<String> {
    tree.preorder(tree.root())
        .into_iter()
        .filter(|id| !suites_only || tree[*id].is_suite())
        .map(|id| format_node_line(tree, id))
        .collect()
}

/// Prints the whole tree with its results column.
/// 打印带有结果列的整棵树。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Results ---
/// run  F:1 P:2
///   math  F:1 P:1
///     adds  Passed (12.00ms)
///     divides  Assertion failed
///   strings  P:1
///     concat  Passed
/// ```
pub fn print_tree(tree: &TestTree, suites_only: bool, locale: &str) {
    println!(
        "\n{} {}",
        t!("report.tree_banner", locale = locale).bold(),
        format!("[{}]", ResultsColumn.title()).dimmed()
    );
    for line in tree_lines(tree, suites_only) {
        println!("{line}");
    }
}

/// Failed and errored leaf tests in pre-order.
/// 按先序排列的失败和出错叶子测试。
pub fn collect_failures(tree: &TestTree) -> Vec<NodeId> {
    tree.preorder(tree.root())
        .into_iter()
        .filter(|id| {
            let node = &tree[*id];
            !node.is_suite()
                && matches!(LeafOutcome::of(node), LeafOutcome::Failed | LeafOutcome::Errored)
        })
        .collect()
}

/// Prints message and details for every failed test.
///
/// 打印每个失败测试的消息和详细信息。
pub fn print_failure_details(tree: &TestTree, failures: &[NodeId], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, id) in failures.iter().enumerate() {
        let node = &tree[*id];
        let kind = if node.is_error() {
            t!("report.header_error", locale = locale)
        } else {
            t!("report.header_failure", locale = locale)
        };
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            kind.red(),
            node.name().cyan()
        );

        match node.failure() {
            Some(failure) => {
                if !failure.message.is_empty() {
                    println!("\n{}", failure.message);
                }
                if !failure.details.is_empty() {
                    println!("\n--- {} ---\n", t!("report.details", locale = locale).yellow());
                    println!("{}", failure.details);
                }
            }
            None => println!("\n{}", t!("report.no_failure_output", locale = locale).dimmed()),
        }
        println!("\n{}", "-".repeat(80));
    }
}

/// One-line totals for the whole run.
/// 整个运行的单行汇总。
pub fn format_summary(counts: &ResultCounts, locale: &str) -> String {
    t!(
        "report.summary",
        locale = locale,
        total = counts.total(),
        passed = counts.passed,
        failed = counts.failed,
        errored = counts.errored,
        not_run = counts.pending + counts.terminated
    )
    .to_string()
}

pub fn print_summary(tree: &TestTree, locale: &str) {
    let counts = ResultCounts::of(tree, tree.root());
    let line = format_summary(&counts, locale);
    if counts.defects() > 0 {
        println!("\n{}", line.red().bold());
    } else {
        println!("\n{}", line.green().bold());
    }
}

/// Formats the root's results column as `[<run>] <fragments>`.
/// 将根节点的结果列格式化为 `[<运行名>] <片段>`。
pub fn format_progress(tree: &TestTree, locale: &str) -> String {
    let root = tree.root();
    let fragments: String = ResultsColumn
        .present(tree, root)
        .iter()
        .map(|f| style_fragment(f).to_string())
        .collect();
    format!(
        "{} {}",
        t!("report.progress", locale = locale, name = tree[root].name()).dimmed(),
        fragments
    )
}

/// Prints the progress line, used on the live refresh tick.
/// 打印进度行，用于实时刷新。
pub fn print_progress(tree: &TestTree, locale: &str) {
    println!("{}", format_progress(tree, locale));
}
