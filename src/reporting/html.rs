//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders the test tree into a self-contained HTML page: a
//! summary strip, one table row per node with its results column, and
//! collapsible failure details.
//!
//! 此模块将测试树渲染为一个独立的 HTML 页面：摘要栏、每个节点一行
//! （包含其结果列）的表格，以及可折叠的失败详情。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::core::column::ResultsColumn;
use crate::core::counts::ResultCounts;
use crate::core::tree::{NodeId, TestTree};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Renders the report markup. Text content is escaped by `maud`.
///
/// 渲染报告标记。文本内容由 `maud` 转义。
pub fn render_html_report(tree: &TestTree, locale: &str, generated_at: DateTime<Local>) -> Markup {
    let root = tree.root();
    let counts = ResultCounts::of(tree, root);
    let title = t!("html_report.title", locale = locale).to_string();
    let generated = t!(
        "html_report.generated_at",
        locale = locale,
        time = generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .to_string();

    html! {
        (DOCTYPE)
        html lang=(locale) {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (title) " - " (tree[root].name()) }
                p class="generated" { (generated) }
                div class="summary-container" {
                    (summary_item(counts.total(), "", t!("html_report.summary.total", locale = locale).to_string()))
                    (summary_item(counts.passed, "passed-text", t!("html_report.summary.passed", locale = locale).to_string()))
                    (summary_item(counts.failed, "failed-text", t!("html_report.summary.failed", locale = locale).to_string()))
                    (summary_item(counts.errored, "failed-text", t!("html_report.summary.errored", locale = locale).to_string()))
                    (summary_item(counts.pending + counts.terminated, "not-run-text", t!("html_report.summary.not_run", locale = locale).to_string()))
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale).to_string()) }
                            th class="results-col" { (ResultsColumn.title()) }
                            th class="duration-cell" { (t!("html_report.table.header.duration", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @for id in tree.preorder(root) {
                            (node_rows(tree, id, locale))
                        }
                    }
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: String) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn node_rows(tree: &TestTree, id: NodeId, locale: &str) -> Markup {
    let node = &tree[id];
    let fragments = ResultsColumn.present(tree, id);
    let indent = format!("padding-left: {:.1}em", tree.depth(id) as f32 * 1.5 + 0.5);
    let duration = node
        .duration()
        .map(|d| format!("{:.2}s", d.as_secs_f64()))
        .unwrap_or_default();
    let details_id = format!("details-{}", id.index());
    let toggle_label = t!("html_report.toggle_output", locale = locale).to_string();

    html! {
        tr class=(if node.is_suite() { "suite-row" } else { "test-row" }) {
            td class="name-cell" style=(indent) { (node.name()) }
            td class="results-col" {
                @for fragment in &fragments {
                    span class={ "fragment style-" (fragment.style.as_str()) } { (fragment.text) }
                }
                @if node.failure().is_some() {
                    div class="output-toggle" onclick=(format!("toggleOutput('{}')", details_id)) { (toggle_label) }
                }
            }
            td class="duration-cell" { (duration) }
        }
        @if let Some(failure) = node.failure() {
            tr id=(details_id) class="details-row" style="display:none;" {
                td colspan="3" {
                    pre class="output-content" {
                        (failure.message)
                        @if !failure.details.is_empty() {
                            "\n\n" (failure.details)
                        }
                    }
                }
            }
        }
    }
}

/// Generates the HTML report and writes it to `output_path`.
///
/// 生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件，则返回错误。
pub fn generate_html_report(tree: &TestTree, output_path: &Path, locale: &str) -> Result<()> {
    let markup = render_html_report(tree, locale, Local::now());
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    info!(path = %output_path.display(), "HTML report written");
    Ok(())
}
