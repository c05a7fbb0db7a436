//! # Suite Tally Library / Suite Tally 库
//!
//! This library turns a stream of test-execution events into a tree of test
//! and suite nodes, and summarizes every node in a compact "Results" column:
//! `Passed`, `Running...`, `F:1 E:2 P:3`, `<NO TESTS>` and so on.
//!
//! 此库将测试执行事件流转换为由测试和套件节点组成的树，
//! 并用紧凑的 "Results" 列概括每个节点：
//! `Passed`、`Running...`、`F:1 E:2 P:3`、`<NO TESTS>` 等。
//!
//! ## Modules / 模块
//!
//! - `core` - Test tree, results column, events and configuration
//! - `infra` - Event sources (files, stdin, child processes) and i18n
//! - `reporting` - Console and HTML reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 测试树、结果列、事件和配置
//! - `infra` - 事件源（文件、标准输入、子进程）和国际化
//! - `reporting` - 控制台和 HTML 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::column;
pub use crate::core::events;
pub use crate::core::tree;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
