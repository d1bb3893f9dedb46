//! データ構造体モジュール

use serde::{Deserialize, Serialize};

// ============================================
// 参照リンク
// ============================================

/// 参照リンクが持つ表示用属性（data-note-*）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteReference {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub preview: String,
}

/// 参照先となるノートの概要（マークアップ生成用）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteSummary {
    pub title: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub body: String,
}

pub const ATTR_TITLE: &str = "data-note-title";
pub const ATTR_COLLECTION: &str = "data-note-collection";
pub const ATTR_PREVIEW: &str = "data-note-preview";

// ============================================
// ローカライズラベル
// ============================================

pub const DEFAULT_COLLECTION_LABEL: &str = "Collection";
pub const DEFAULT_NOTE_LABEL: &str = "Note";
pub const DEFAULT_PREVIEW_LABEL: &str = "Preview";

/// ツールチップの項目ラベル
///
/// キーごとにデフォルトへフォールバックする（一部だけ指定された場合も残りは英語表記）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipLabels {
    pub collection_label: String,
    pub note_label: String,
    pub preview_label: String,
}

impl Default for TooltipLabels {
    fn default() -> Self {
        TooltipLabels {
            collection_label: DEFAULT_COLLECTION_LABEL.to_string(),
            note_label: DEFAULT_NOTE_LABEL.to_string(),
            preview_label: DEFAULT_PREVIEW_LABEL.to_string(),
        }
    }
}

impl TooltipLabels {
    /// 空文字のラベルをデフォルトで埋める
    pub fn normalized(mut self) -> Self {
        let defaults = TooltipLabels::default();
        if self.collection_label.trim().is_empty() {
            self.collection_label = defaults.collection_label;
        }
        if self.note_label.trim().is_empty() {
            self.note_label = defaults.note_label;
        }
        if self.preview_label.trim().is_empty() {
            self.preview_label = defaults.preview_label;
        }
        self
    }
}

// ============================================
// 座標
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// ポインタ座標（ページ座標）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// 表示中の領域（ページ座標）。スクロール量と画面サイズ
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// スクロールしていない画面
    pub const fn sized(width: f64, height: f64) -> Self {
        Viewport { scroll_x: 0.0, scroll_y: 0.0, width, height }
    }

    pub fn right(&self) -> f64 {
        self.scroll_x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }
}

/// ツールチップの配置パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    pub offset_x: f64,
    pub offset_y: f64,
    pub edge_margin: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Placement {
            offset_x: 10.0,
            offset_y: 20.0,
            edge_margin: 10.0,
        }
    }
}

// ============================================
// リンク先
// ============================================

pub const TAG_SCHEME: &str = "tag://";
pub const NOTE_SCHEME: &str = "note://";

/// クリックされたリンク先の分類
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Tag { raw: String, name: String },
    Note { raw: String, title: String },
    External { raw: String },
}

impl LinkTarget {
    pub fn classify(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix(TAG_SCHEME) {
            LinkTarget::Tag { raw: raw.to_string(), name: name.to_string() }
        } else if let Some(title) = raw.strip_prefix(NOTE_SCHEME) {
            LinkTarget::Note { raw: raw.to_string(), title: title.to_string() }
        } else {
            LinkTarget::External { raw: raw.to_string() }
        }
    }

    pub fn tag(name: &str) -> Self {
        Self::classify(&format!("{}{}", TAG_SCHEME, name))
    }

    /// 表示用の元の文字列
    pub fn raw(&self) -> &str {
        match self {
            LinkTarget::Tag { raw, .. } | LinkTarget::Note { raw, .. } | LinkTarget::External { raw } => raw,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LinkTarget::Tag { .. } => "tag",
            LinkTarget::Note { .. } => "note",
            LinkTarget::External { .. } => "external",
        }
    }
}

// ============================================
// 通知モード
// ============================================

/// リンク先の通知方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeMode {
    /// document に CustomEvent を発行（非ブロッキング、表示はホスト側）
    Event,
    /// 画面上部のバナー表示
    #[default]
    Banner,
    /// window.alert（ブロッキング）
    Alert,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_splits_schemes() {
        assert_eq!(
            LinkTarget::classify("tag://science"),
            LinkTarget::Tag { raw: "tag://science".into(), name: "science".into() }
        );
        assert_eq!(
            LinkTarget::classify("note://Shopping list"),
            LinkTarget::Note { raw: "note://Shopping list".into(), title: "Shopping list".into() }
        );
        let external = LinkTarget::classify("https://example.com/x");
        assert_eq!(external.kind(), "external");
        assert_eq!(external.raw(), "https://example.com/x");
    }

    #[test]
    fn tag_target_prefixes_scheme() {
        let target = LinkTarget::tag("science");
        assert_eq!(target.raw(), "tag://science");
        assert_eq!(target.kind(), "tag");
    }

    #[test]
    fn partial_labels_merge_per_key() {
        let labels: TooltipLabels = serde_json::from_str(r#"{"collectionLabel":"Kolekcja"}"#).unwrap();
        assert_eq!(labels.collection_label, "Kolekcja");
        assert_eq!(labels.note_label, "Note");
        assert_eq!(labels.preview_label, "Preview");
    }

    #[test]
    fn empty_labels_fall_back() {
        let labels = TooltipLabels {
            collection_label: String::new(),
            note_label: "Notatka".into(),
            preview_label: "  ".into(),
        }
        .normalized();
        assert_eq!(labels.collection_label, "Collection");
        assert_eq!(labels.note_label, "Notatka");
        assert_eq!(labels.preview_label, "Preview");
    }

    #[test]
    fn viewport_edges_include_scroll() {
        let viewport = Viewport { scroll_x: 30.0, scroll_y: 2000.0, width: 800.0, height: 600.0 };
        assert_eq!(viewport.right(), 830.0);
        assert_eq!(viewport.bottom(), 2600.0);
        assert_eq!(Viewport::sized(800.0, 600.0).bottom(), 600.0);
    }

    #[test]
    fn notice_mode_parses_lowercase() {
        let mode: NoticeMode = serde_json::from_str(r#""banner""#).unwrap();
        assert_eq!(mode, NoticeMode::Banner);
        assert_eq!(NoticeMode::default(), NoticeMode::Banner);
    }
}
