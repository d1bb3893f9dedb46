//! 時系列トレースログ
//! 初期化やリンク操作のイベントをメモリ上に記録し、コンソールにも出力する

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String, // "info", "warn", "error"
    pub category: String, // "startup", "tooltip", "links", "config"
    pub message: String,
    pub data: Option<serde_json::Value>,
}

pub struct LogTrace {
    logs: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogTrace {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LogTrace {
            logs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn log(&mut self, level: &str, category: &str, message: &str, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: now_iso(),
            level: level.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            data,
        };

        write_console(level, category, message);
        self.push(entry);
    }

    fn push(&mut self, entry: LogEntry) {
        if self.logs.len() >= self.capacity {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);
    }

    pub fn get_logs_json(&self) -> String {
        let logs: Vec<&LogEntry> = self.logs.iter().collect();
        serde_json::to_string_pretty(&logs).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for LogTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_iso() -> String {
    String::new()
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: &str, category: &str, message: &str) {
    let line = format!("[{}] {}", category, message);
    match level {
        "error" => web_sys::console::error_1(&line.into()),
        "warn" => web_sys::console::warn_1(&line.into()),
        _ => web_sys::console::log_1(&line.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: &str, _category: &str, _message: &str) {}

// グローバルなログトレースインスタンス
thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace> = std::cell::RefCell::new(LogTrace::new());
}

pub fn log_info(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("info", category, message, None);
    });
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("info", category, message, Some(data));
    });
}

pub fn log_warn(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("warn", category, message, None);
    });
}

pub fn log_error(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("error", category, message, None);
    });
}

pub fn get_logs_json() -> String {
    LOG_TRACE.with(|trace| trace.borrow().get_logs_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_entry_when_full() {
        let mut trace = LogTrace::with_capacity(2);
        trace.log("info", "links", "first", None);
        trace.log("warn", "links", "second", None);
        trace.log("error", "links", "third", None);

        let logs: Vec<LogEntry> = serde_json::from_str(&trace.get_logs_json()).unwrap();
        let messages: Vec<String> = logs.into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn global_log_is_serialized_as_json() {
        log_info_with_data("tooltip", "attached", serde_json::json!({ "links": 3 }));
        log_error("tooltip", "missing");

        let logs: Vec<LogEntry> = serde_json::from_str(&get_logs_json()).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].data, Some(serde_json::json!({ "links": 3 })));
        assert_eq!(logs[1].level, "error");
    }
}
