//! # Commands Module / 命令模块
//!
//! Subcommand implementations plus the pieces `render` and `run` share:
//! consuming an event stream into a [`TestRun`] and printing the final report.
//!
//! 子命令的实现，以及 `render` 和 `run` 共用的部分：
//! 将事件流消费到 [`TestRun`] 中，并打印最终报告。

pub mod init;
pub mod render;
pub mod run;

use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::column::ResultsColumn;
use crate::core::config::TallyConfig;
use crate::core::counts::ResultCounts;
use crate::core::events::TestRun;
use crate::infra::source::EventLine;
use crate::infra::t;
use crate::reporting::{self, console};

/// Capacity of the channel between an event source and the consumer.
/// 事件源与消费者之间通道的容量。
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How the consumer loop ended.
/// 消费循环的结束方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The source reached end of input / 事件源到达输入末尾
    Exhausted,
    /// The stop token fired first / 停止令牌先被触发
    Cancelled,
}

/// Options that shape the final report, merged from flags and config.
/// 决定最终报告形式的选项，由命令行参数和配置合并而来。
#[derive(Debug, Clone)]
pub(crate) struct ReportOptions {
    pub locale: String,
    pub suites_only: bool,
    pub show_failure_details: bool,
    pub html_output: Option<PathBuf>,
    pub progress_interval: Option<Duration>,
}

impl ReportOptions {
    /// Command-line values win over the configuration file.
    /// 命令行参数的值优先于配置文件。
    pub fn merge(
        config: &TallyConfig,
        lang: Option<String>,
        html: Option<PathBuf>,
        suites_only: bool,
    ) -> Result<Self> {
        let html_output = match html {
            Some(path) => Some(path),
            None => config.html_output_path()?,
        };
        Ok(Self {
            locale: lang.unwrap_or_else(|| config.language.clone()),
            suites_only: suites_only || config.suites_only,
            show_failure_details: config.show_failure_details,
            html_output,
            progress_interval: (config.progress_interval_ms > 0)
                .then(|| Duration::from_millis(config.progress_interval_ms)),
        })
    }
}

/// Cancels the returned token on Ctrl-C.
/// 在收到 Ctrl-C 时取消返回的令牌。
pub(crate) fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        } else {
            warn!("failed to listen for Ctrl-C");
        }
    });

    token
}

/// Applies every received line to `run` until the channel closes or `stop`
/// fires. Bad lines are logged and skipped. When `progress_interval` is set,
/// the root's results column is printed on every tick; the tree is only ever
/// touched from this loop, so each tick sees a consistent snapshot.
///
/// 将收到的每一行应用到 `run`，直到通道关闭或 `stop` 被触发。错误的行会被记录并跳过。
/// 设置了 `progress_interval` 时，每次计时都会打印根节点的结果列；
/// 测试树只在此循环中被访问，因此每次计时看到的都是一致的快照。
pub async fn consume_events(
    run: &mut TestRun,
    mut rx: mpsc::Receiver<EventLine>,
    progress_interval: Option<Duration>,
    stop: CancellationToken,
    locale: &str,
) -> StreamEnd {
    let mut ticker = progress_interval.map(|period| {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    });

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => {
                debug!("event stream cancelled");
                return StreamEnd::Cancelled;
            }
            line = rx.recv() => match line {
                Some((line_no, line)) => {
                    if let Err(e) = run.apply_line(line_no, &line) {
                        warn!(line_no, error = %e, "skipping event");
                    }
                }
                None => return StreamEnd::Exhausted,
            },
            _ = next_tick(&mut ticker) => {
                console::print_progress(run.tree(), locale);
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Prints the final report and decides the outcome. The run fails when any
/// node has a defect, when `incomplete` carries a reason (cancellation, a
/// crashed test command), or when some tests never finished.
///
/// 打印最终报告并决定结果。当任一节点存在缺陷、`incomplete` 带有原因（取消、测试命令崩溃）
/// 或有测试未能完成时，运行失败。
pub(crate) fn finish_report(run: &TestRun, options: &ReportOptions, incomplete: Option<String>) -> Result<()> {
    let tree = run.tree();
    let locale = options.locale.as_str();

    console::print_tree(tree, options.suites_only, locale);
    if options.show_failure_details {
        let failures = console::collect_failures(tree);
        console::print_failure_details(tree, &failures, locale);
    }
    console::print_summary(tree, locale);

    if let Some(report_path) = &options.html_output {
        println!(
            "\n{}",
            t!("run.html_generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = reporting::generate_html_report(tree, report_path, locale) {
            eprintln!("{} {:#}", t!("run.html_failed", locale = locale).red(), e);
        }
    }

    if ResultsColumn.has_defects(tree, tree.root()) {
        anyhow::bail!(t!("run.defects_found", locale = locale).to_string());
    }
    if let Some(reason) = incomplete {
        anyhow::bail!(reason);
    }
    let counts = ResultCounts::of(tree, tree.root());
    let unfinished = counts.terminated + counts.pending;
    if unfinished > 0 {
        anyhow::bail!(t!("run.unfinished_tests", locale = locale, count = unfinished).to_string());
    }
    println!("\n{}", t!("run.all_passed", locale = locale).green().bold());
    Ok(())
}
