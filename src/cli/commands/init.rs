//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a default
//! `Tally.toml` configuration file.
//!
//! 此模块实现了 `init` 命令，用于写入默认的 `Tally.toml` 配置文件。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};

use crate::infra::t;

const DEFAULT_CONFIG: &str = r#"# Suite Tally Configuration / Suite Tally 配置

# Language for output messages / 输出消息的语言
language = "en"

# Only list suites in the console report / 控制台报告中只列出套件
suites_only = false

# Print message and details of failed tests / 打印失败测试的消息和详情
show_failure_details = true

# Live progress refresh interval in ms, 0 disables it / 实时进度刷新间隔（毫秒），0 表示禁用
progress_interval_ms = 0

# Optional HTML report path / 可选的 HTML 报告路径
# html_output = "~/reports/tally.html"

# Command whose stdout emits test events / 标准输出为测试事件的命令
# command = "./run-tests --events"
"#;

/// Executes the init command with the provided arguments.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file
/// * `lang` - Language for messages
pub fn execute(output: PathBuf, force: bool, lang: &str) -> Result<()> {
    if output.exists() && !force {
        println!(
            "{}",
            t!("init.file_exists", locale = lang, path = output.display()).red()
        );
        println!("{}", t!("init.use_force", locale = lang).yellow());
        return Ok(());
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                t!("init.create_parent_dir_failed", locale = lang, path = parent.display()).to_string()
            })?;
        }
    }

    fs::write(&output, DEFAULT_CONFIG)
        .with_context(|| t!("init.write_failed", locale = lang, path = output.display()).to_string())?;

    println!(
        "{}",
        t!("init.success", locale = lang, path = output.display()).green()
    );
    println!("{}", t!("init.next_steps", locale = lang));

    Ok(())
}
