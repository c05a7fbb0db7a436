//! # Run Command Module / 运行命令模块
//!
//! Runs a test command whose stdout is an event stream, showing live progress
//! and printing the final report once the command exits. Ctrl-C kills the
//! command and terminates whatever was still pending.
//!
//! 运行一个标准输出为事件流的测试命令，显示实时进度，并在命令退出后打印最终报告。
//! Ctrl-C 会终止该命令，并将仍未完成的部分标记为已终止。

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{EVENT_CHANNEL_CAPACITY, ReportOptions, StreamEnd, consume_events, finish_report, setup_signal_handler};
use crate::core::config::TallyConfig;
use crate::core::events::{TestEvent, TestRun};
use crate::infra::source::EventProcess;
use crate::infra::t;

pub async fn execute(
    command: Option<String>,
    config: Option<PathBuf>,
    html: Option<PathBuf>,
    suites_only: bool,
    lang: Option<String>,
    project_dir: PathBuf,
) -> Result<()> {
    let config = TallyConfig::load_or_default(config.as_deref())?;
    let options = ReportOptions::merge(&config, lang, html, suites_only)?;
    let locale = options.locale.clone();
    rust_i18n::set_locale(&locale);

    let command = command
        .or_else(|| config.command.clone())
        .with_context(|| t!("run.no_command", locale = &locale).to_string())?;
    let project_root = fs::canonicalize(&project_dir)
        .with_context(|| t!("run.project_dir_not_found", locale = &locale, path = project_dir.display()).to_string())?;

    println!(
        "{}",
        t!("run.starting", locale = &locale, command = &command).cyan()
    );

    let run_name = project_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "run".to_string());
    let mut run = TestRun::new(run_name);

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let process = EventProcess::spawn(&command, &project_root, tx)?;
    let stop = setup_signal_handler(&locale);

    let incomplete = match consume_events(&mut run, rx, options.progress_interval, stop, &locale).await {
        StreamEnd::Cancelled => {
            process.kill().await?;
            run.apply(TestEvent::Terminated { name: None })?;
            Some(t!("run.cancelled", locale = &locale).to_string())
        }
        StreamEnd::Exhausted => {
            let status = process.wait().await?;
            info!(%status, "test command exited");
            if status.success() {
                None
            } else {
                warn!(%status, "test command exited unsuccessfully");
                Some(t!("run.command_failed", locale = &locale, status = status).to_string())
            }
        }
    };
    run.close();

    finish_report(&run, &options, incomplete)
}
