//! ビューア設定
//!
//! ホストページが用意するグローバル変数（window.noteViewerConfig / window.localizedStrings）から読み込む。
//! 読めない場合はデフォルト設定で動作する。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::models::{NoticeMode, Placement, TooltipLabels};
use crate::utils::log_trace::{log_info_with_data, log_warn};

const CONFIG_GLOBAL: &str = "noteViewerConfig";
const LABELS_GLOBAL: &str = "localizedStrings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub labels: TooltipLabels,
    pub tooltip_id: String,
    pub link_selector: String,
    pub anchor_selector: String,
    pub placement: Placement,
    pub notice_mode: NoticeMode,
    pub notice_duration_ms: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            labels: TooltipLabels::default(),
            tooltip_id: "tooltip".to_string(),
            link_selector: ".note-link".to_string(),
            anchor_selector: "a".to_string(),
            placement: Placement::default(),
            notice_mode: NoticeMode::default(),
            notice_duration_ms: 4000,
        }
    }
}

/// 設定とラベルを合成（localizedStrings があればラベルはそちらを優先）
pub fn resolve_config(config: Option<ViewerConfig>, labels: Option<TooltipLabels>) -> ViewerConfig {
    let mut config = config.unwrap_or_default();
    if let Some(labels) = labels {
        config.labels = labels;
    }
    config.labels = config.labels.normalized();
    config
}

/// グローバル変数から設定を読み込む
pub fn load_viewer_config() -> ViewerConfig {
    let config = read_global::<ViewerConfig>(CONFIG_GLOBAL).unwrap_or_else(|e| {
        log_warn("config", &e);
        None
    });
    let labels = read_global::<TooltipLabels>(LABELS_GLOBAL).unwrap_or_else(|e| {
        log_warn("config", &e);
        None
    });

    let resolved = resolve_config(config, labels);
    log_info_with_data(
        "config",
        "設定を読み込みました",
        serde_json::to_value(&resolved).unwrap_or(serde_json::Value::Null),
    );
    resolved
}

fn read_global<T: DeserializeOwned>(name: &str) -> Result<Option<T>, String> {
    let window = web_sys::window().ok_or("windowがありません")?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .map_err(|e| format!("{}の取得失敗: {:?}", name, e))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| format!("{}の解析失敗: {:?}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_globals() {
        let config = resolve_config(None, None);
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.placement.offset_x, 10.0);
        assert_eq!(config.placement.offset_y, 20.0);
        assert_eq!(config.tooltip_id, "tooltip");
        // 何も設定しなくてもリンク先は画面に出る
        assert_eq!(config.notice_mode, NoticeMode::Banner);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"noticeMode":"alert","placement":{"edgeMargin":4}}"#).unwrap();
        let config = resolve_config(Some(config), None);
        assert_eq!(config.notice_mode, NoticeMode::Alert);
        assert_eq!(config.placement.edge_margin, 4.0);
        assert_eq!(config.placement.offset_y, 20.0);
        assert_eq!(config.link_selector, ".note-link");
    }

    #[test]
    fn localized_strings_override_config_labels() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"labels":{"noteLabel":"Notiz"}}"#).unwrap();
        let labels: TooltipLabels = serde_json::from_str(r#"{"collectionLabel":"Kolekcja","noteLabel":""}"#).unwrap();
        let config = resolve_config(Some(config), Some(labels));
        assert_eq!(config.labels.collection_label, "Kolekcja");
        assert_eq!(config.labels.note_label, "Note");
        assert_eq!(config.labels.preview_label, "Preview");
    }
}
