//! # Render Command Module / 渲染命令模块
//!
//! Replays a recorded event stream (a file, or stdin with `-`) and prints the
//! resulting test tree with its results column.
//!
//! 重放已记录的事件流（文件，或以 `-` 表示的标准输入），并打印带有结果列的测试树。

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{EVENT_CHANNEL_CAPACITY, ReportOptions, StreamEnd, consume_events, finish_report, setup_signal_handler};
use crate::core::config::TallyConfig;
use crate::core::events::{TestEvent, TestRun};
use crate::infra::source::EventSource;
use crate::infra::t;

/// Name of the run root: the event file's stem, or `stdin`.
/// 运行根节点的名称：事件文件的文件名主干，或 `stdin`。
pub fn run_name(source: &EventSource) -> String {
    match source {
        EventSource::Stdin => "stdin".to_string(),
        EventSource::File(path) => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

pub async fn execute(
    events: PathBuf,
    config: Option<PathBuf>,
    html: Option<PathBuf>,
    suites_only: bool,
    lang: Option<String>,
) -> Result<()> {
    let config = TallyConfig::load_or_default(config.as_deref())?;
    let options = ReportOptions::merge(&config, lang, html, suites_only)?;
    rust_i18n::set_locale(&options.locale);

    let source = EventSource::from_arg(Path::new(&events));
    let mut run = TestRun::new(run_name(&source));
    info!(?source, "rendering recorded events");

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let reader = source.spawn(tx).await?;
    let stop = setup_signal_handler(&options.locale);

    // Replays are not live, so no progress ticks.
    let end = consume_events(&mut run, rx, None, stop, &options.locale).await;
    let incomplete = if end == StreamEnd::Cancelled {
        reader.abort();
        if let Err(e) = run.apply(TestEvent::Terminated { name: None }) {
            warn!(error = %e, "failed to terminate run");
        }
        Some(t!("run.cancelled", locale = &options.locale).to_string())
    } else {
        reader.await??;
        None
    };
    run.close();

    finish_report(&run, &options, incomplete)
}
