//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Suite Tally,
//! namely event sources (files, stdin, child processes) and i18n support.
//!
//! 此模块为 Suite Tally 提供基础设施服务，
//! 即事件源（文件、标准输入、子进程）和国际化支持。

pub mod source;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
