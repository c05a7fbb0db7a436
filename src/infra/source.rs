//! # Event Source Module / 事件源模块
//!
//! Async producers of raw event lines. Every source reads line by line and
//! forwards `(line_no, line)` pairs over an mpsc channel, so the consumer owns
//! the test tree alone and never shares it with a reader task.
//!
//! 原始事件行的异步生产者。每个事件源逐行读取，并通过 mpsc 通道转发
//! `(行号, 行)` 对，因此消费者独占测试树，从不与读取任务共享。

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A numbered line of the event stream. Line numbers start at 1.
/// 事件流中带编号的行。行号从 1 开始。
pub type EventLine = (usize, String);

/// Where event lines come from.
/// 事件行的来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Stdin,
    File(PathBuf),
}

impl EventSource {
    /// `-` selects stdin, anything else is a file path.
    /// `-` 表示标准输入，其他值都视为文件路径。
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            EventSource::Stdin
        } else {
            EventSource::File(arg.to_path_buf())
        }
    }

    /// Spawns a task forwarding every line of the source to `tx`.
    /// The task ends at end of input or when the receiver is dropped.
    ///
    /// 派生一个任务，将事件源的每一行转发到 `tx`。
    /// 任务在输入结束或接收端被丢弃时结束。
    pub async fn spawn(self, tx: mpsc::Sender<EventLine>) -> Result<JoinHandle<Result<()>>> {
        match self {
            EventSource::Stdin => Ok(tokio::spawn(forward_lines(tokio::io::stdin(), tx))),
            EventSource::File(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("Failed to open event file: {}", path.display()))?;
                info!(path = %path.display(), "reading events from file");
                Ok(tokio::spawn(forward_lines(file, tx)))
            }
        }
    }
}

/// Reads `reader` line by line into `tx`.
/// 逐行读取 `reader` 并发送到 `tx`。
pub async fn forward_lines<R>(reader: R, tx: mpsc::Sender<EventLine>) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await.context("Failed to read event line")? {
        line_no += 1;
        if tx.send((line_no, line)).await.is_err() {
            debug!(line_no, "event receiver dropped, stopping reader");
            break;
        }
    }
    Ok(())
}

/// A running test command whose stdout is the event stream.
/// 一个正在运行的测试命令，其标准输出即事件流。
#[derive(Debug)]
pub struct EventProcess {
    child: Child,
    stdout_task: JoinHandle<Result<()>>,
    stderr_task: Option<JoinHandle<()>>,
}

impl EventProcess {
    /// Expands and splits `command`, then spawns it in `cwd`.
    /// stderr lines are logged at debug level.
    ///
    /// 展开并拆分 `command`，然后在 `cwd` 中派生该进程。
    /// stderr 的行以 debug 级别记录日志。
    pub fn spawn(command: &str, cwd: &Path, tx: mpsc::Sender<EventLine>) -> Result<Self> {
        let expanded = shellexpand::full(command)
            .with_context(|| format!("Failed to expand command: {command}"))?
            .to_string();
        let parts = shlex::split(&expanded)
            .ok_or_else(|| anyhow!("Failed to parse command: {}", expanded))?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| anyhow!("Empty command after parsing."))?;

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn command: {expanded}"))?;
        info!(command = %expanded, pid = ?child.id(), "test command started");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("Failed to capture stdout of: {}", expanded))?;
        let stdout_task = tokio::spawn(forward_lines(stdout, tx));

        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "suite_tally::child", "{}", line);
                }
            })
        });

        Ok(Self {
            child,
            stdout_task,
            stderr_task,
        })
    }

    /// Waits for the process to exit and its output to drain.
    /// 等待进程退出并读完其输出。
    pub async fn wait(mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await.context("Failed to get process status")?;
        self.drain().await?;
        Ok(status)
    }

    /// Kills the process and drains what was already written.
    /// 终止进程并读完已写出的输出。
    pub async fn kill(mut self) -> Result<()> {
        self.child.kill().await.context("Failed to kill test command")?;
        self.drain().await
    }

    async fn drain(self) -> Result<()> {
        self.stdout_task.await.context("Event reader task panicked")??;
        if let Some(handle) = self.stderr_task {
            let _ = handle.await;
        }
        Ok(())
    }
}
