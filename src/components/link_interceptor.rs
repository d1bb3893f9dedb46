//! リンククリックの横取り
//!
//! 文書内のリンクは遷移させず、リンク先の文字列をホスト側へ通知する。
//! 通知方法は LinkSink で差し替える（CustomEvent / バナー / alert）。

use leptos::{SignalSet, WriteSignal};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit};

use crate::models::{LinkTarget, NoticeMode, TAG_SCHEME};
use crate::utils::log_trace::{log_error, log_info_with_data, log_warn};

/// document に発行するイベント名（detail にリンク先の文字列）
pub const LINK_EVENT: &str = "note-link";

/// リンク先の通知先
pub trait LinkSink {
    fn deliver(&self, target: &LinkTarget);
}

/// window.alert で表示（ブロッキング）
pub struct AlertSink;

impl LinkSink for AlertSink {
    fn deliver(&self, target: &LinkTarget) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(target.raw());
        }
    }
}

/// document に CustomEvent を発行
pub struct EventSink;

impl LinkSink for EventSink {
    fn deliver(&self, target: &LinkTarget) {
        if let Err(e) = dispatch_link_event(target) {
            log_error("links", &e);
        }
    }
}

fn dispatch_link_event(target: &LinkTarget) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("documentがありません")?;

    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(target.raw()));
    let event = CustomEvent::new_with_event_init_dict(LINK_EVENT, &init)
        .map_err(|e| format!("CustomEvent作成失敗: {:?}", e))?;

    document
        .dispatch_event(&event)
        .map_err(|e| format!("イベント発行失敗: {:?}", e))?;
    Ok(())
}

/// バナー表示用のシグナルに書き込む
pub struct NoticeSink {
    notice: WriteSignal<Option<LinkTarget>>,
}

impl NoticeSink {
    pub fn new(notice: WriteSignal<Option<LinkTarget>>) -> Self {
        NoticeSink { notice }
    }
}

impl LinkSink for NoticeSink {
    fn deliver(&self, target: &LinkTarget) {
        self.notice.set(Some(target.clone()));
    }
}

/// バナー以外の通知先（バナーはコンポーネント側でシグナルを作ってから組み立てる）
pub fn sink_for_mode(mode: NoticeMode) -> Option<Rc<dyn LinkSink>> {
    match mode {
        NoticeMode::Event => Some(Rc::new(EventSink)),
        NoticeMode::Alert => Some(Rc::new(AlertSink)),
        NoticeMode::Banner => None,
    }
}

/// リンク先を分類して通知先へ渡す
#[derive(Clone)]
pub struct LinkInterceptor {
    sink: Rc<dyn LinkSink>,
}

impl LinkInterceptor {
    pub fn new(sink: Rc<dyn LinkSink>) -> Self {
        LinkInterceptor { sink }
    }

    pub fn intercept(&self, raw: &str) -> LinkTarget {
        let target = LinkTarget::classify(raw);
        log_info_with_data(
            "links",
            "リンク先を通知",
            serde_json::json!({ "kind": target.kind(), "target": target.raw() }),
        );
        self.sink.deliver(&target);
        target
    }

    /// タグ参照を tag:// 付きで通知
    pub fn tag(&self, tag: &str) -> LinkTarget {
        self.intercept(&format!("{}{}", TAG_SCHEME, tag))
    }
}

thread_local! {
    static INTERCEPTOR: RefCell<Option<LinkInterceptor>> = RefCell::new(None);
}

/// インラインハンドラ（handleTagClick）から使う通知先を登録
pub fn install_interceptor(interceptor: LinkInterceptor) {
    INTERCEPTOR.with(|slot| *slot.borrow_mut() = Some(interceptor));
}

pub fn current_interceptor() -> Option<LinkInterceptor> {
    INTERCEPTOR.with(|slot| slot.borrow().clone())
}

/// タグボタンのクリック。通知した文字列（tag://...）を返す
pub fn handle_tag_click(tag: &str) -> String {
    match current_interceptor() {
        Some(interceptor) => interceptor.tag(tag).raw().to_string(),
        None => {
            log_warn("links", "通知先が未登録のためタグを通知できません");
            LinkTarget::tag(tag).raw().to_string()
        }
    }
}

/// window.handleTagClick を登録（マークアップの onclick から呼ばれる）
pub fn install_tag_handler() -> Result<(), String> {
    let window = web_sys::window().ok_or("windowがありません")?;
    let handler = Closure::<dyn Fn(String) -> String>::new(|tag: String| handle_tag_click(&tag));
    js_sys::Reflect::set(&window, &JsValue::from_str("handleTagClick"), handler.as_ref().unchecked_ref())
        .map_err(|e| format!("handleTagClickの登録失敗: {:?}", e))?;
    handler.forget();
    Ok(())
}
