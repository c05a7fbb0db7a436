//! # Configuration Module / 配置模块
//!
//! Settings loaded from `Tally.toml`. Every field has a default, so an empty
//! file (or no file at all) is a valid configuration.
//!
//! 从 `Tally.toml` 加载的设置。每个字段都有默认值，因此空文件（或没有文件）也是有效配置。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::infra::t;

/// Default configuration file name, looked up in the working directory.
/// 默认配置文件名，在工作目录中查找。
pub const DEFAULT_CONFIG_FILE: &str = "Tally.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TallyConfig {
    /// The language for output messages (e.g., "en", "zh-CN").
    /// 输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,

    /// Only list suites in the console report, hiding individual tests.
    /// 控制台报告中只列出套件，隐藏单个测试。
    #[serde(default)]
    pub suites_only: bool,

    /// Print message and details of every failed test after the tree.
    /// 在树之后打印每个失败测试的消息和详细信息。
    #[serde(default = "default_true")]
    pub show_failure_details: bool,

    /// Refresh interval for live progress in milliseconds. `0` disables it.
    /// 实时进度的刷新间隔（毫秒）。`0` 表示禁用。
    #[serde(default)]
    pub progress_interval_ms: u64,

    /// Where to write the HTML report. `~` is expanded.
    /// HTML 报告的写入位置。支持 `~` 展开。
    #[serde(default)]
    pub html_output: Option<String>,

    /// Command used by `run` when none is given on the command line.
    /// 命令行未提供命令时 `run` 使用的命令。
    #[serde(default)]
    pub command: Option<String>,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            suites_only: false,
            show_failure_details: true,
            progress_interval_ms: 0,
            html_output: None,
            command: None,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl TallyConfig {
    /// Reads and parses a configuration file.
    /// 读取并解析配置文件。
    pub fn load(path: &Path) -> Result<Self> {
        // The configured language is not known yet.
        let locale = "en";
        let content = fs::read_to_string(path)
            .with_context(|| t!("config.read_failed", locale = locale, path = path.display()).to_string())?;
        let config: TallyConfig = toml::from_str(&content)
            .with_context(|| t!("config.parse_failed", locale = locale, path = path.display()).to_string())?;
        debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, falling back to defaults otherwise.
    /// An explicitly requested file that is missing is still an error.
    ///
    /// 如果 `path` 存在则加载，否则使用默认值。
    /// 显式指定但不存在的文件仍然视为错误。
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// The HTML report path with `~` and environment variables expanded.
    /// 展开 `~` 和环境变量后的 HTML 报告路径。
    pub fn html_output_path(&self) -> Result<Option<PathBuf>> {
        self.html_output
            .as_deref()
            .map(|raw| {
                shellexpand::full(raw)
                    .map(|expanded| PathBuf::from(expanded.into_owned()))
                    .with_context(|| format!("Failed to expand path: {raw}"))
            })
            .transpose()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
