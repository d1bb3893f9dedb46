//! ユーティリティモジュール

pub mod config;
pub mod log_trace;
pub mod markup;
