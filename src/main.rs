mod components;
mod models;
mod utils;
mod views;

use wasm_bindgen::prelude::*;

use components::link_interceptor::{install_interceptor, install_tag_handler};
use components::{link_sink, LinkInterceptor};
use models::NoteSummary;
use utils::config::load_viewer_config;
use utils::log_trace::{get_logs_json, log_error, log_info, log_info_with_data};
use utils::markup::{extract_references, extract_tags, render_note_markup};
use views::{install_note_document, refresh_note_links, NoteDocument};

// ============================================
// ホストページ向けのグローバル関数
// ============================================

fn set_global(name: &str, value: &JsValue) -> Result<(), String> {
    let window = web_sys::window().ok_or("windowがありません")?;
    js_sys::Reflect::set(&window, &JsValue::from_str(name), value)
        .map_err(|e| format!("{}の登録失敗: {:?}", name, e))?;
    Ok(())
}

fn expose_globals() -> Result<(), String> {
    install_tag_handler()?;

    // 動的に追加されたリンクを拾い直す
    let refresh = Closure::<dyn Fn() -> u32>::new(|| match refresh_note_links() {
        Ok(links) => links as u32,
        Err(e) => {
            log_error("links", &e);
            0
        }
    });
    set_global("refreshNoteLinks", refresh.as_ref())?;
    refresh.forget();

    let logs = Closure::<dyn Fn() -> String>::new(get_logs_json);
    set_global("noteViewerLogs", logs.as_ref())?;
    logs.forget();

    Ok(())
}

/// ノート本文の参照・タグをHTMLに置き換える（ホスト側のレンダリング用）
#[wasm_bindgen(js_name = renderNoteMarkup)]
pub fn render_note_markup_js(markdown: &str, notes: JsValue, current: JsValue) -> Result<String, JsValue> {
    let notes: Vec<NoteSummary> = serde_wasm_bindgen::from_value(notes)
        .map_err(|e| JsValue::from_str(&format!("notesの解析失敗: {:?}", e)))?;
    let current: NoteSummary = serde_wasm_bindgen::from_value(current)
        .map_err(|e| JsValue::from_str(&format!("currentの解析失敗: {:?}", e)))?;
    Ok(render_note_markup(markdown, &notes, &current))
}

/// 本文中のタグ一覧（タグ絞り込み用）
#[wasm_bindgen(js_name = extractNoteTags)]
pub fn extract_note_tags_js(markdown: &str) -> Vec<String> {
    extract_tags(markdown)
}

#[wasm_bindgen(js_name = extractNoteReferences)]
pub fn extract_note_references_js(markdown: &str) -> Vec<String> {
    extract_references(markdown)
}

// ============================================
// 初期化
// ============================================

fn start() -> Result<(), String> {
    let config = load_viewer_config();

    let interceptor = LinkInterceptor::new(link_sink(&config)?);
    install_interceptor(interceptor.clone());
    expose_globals()?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("documentがありません")?;
    let notice_mode = config.notice_mode;
    let mut note_document = NoteDocument::new(document, config, interceptor);
    note_document.attach()?;

    log_info_with_data(
        "startup",
        "ノートビューアを初期化しました",
        serde_json::json!({
            "tooltip": note_document.has_tooltip(),
            "noticeMode": notice_mode,
        }),
    );
    install_note_document(note_document);
    Ok(())
}

fn main() {
    console_error_panic_hook::set_once();
    log_info("startup", "ノートビューアを起動します");
    if let Err(e) = start() {
        log_error("startup", &e);
    }
}
