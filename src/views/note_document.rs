//! ノート文書へのイベント登録
//!
//! 呼び出し時点で存在する参照リンクとリンク要素を走査してリスナーを付ける。
//! 後から追加された要素は refresh で付け直す。

use gloo::events::{EventListener, EventListenerOptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, MouseEvent};

use crate::components::link_interceptor::LinkInterceptor;
use crate::components::tooltip::{DomSurface, TooltipController};
use crate::models::{NoteReference, PointerPosition, Viewport, ATTR_COLLECTION, ATTR_PREVIEW, ATTR_TITLE};
use crate::utils::config::ViewerConfig;
use crate::utils::log_trace::{log_error, log_info_with_data, log_warn};

type Tooltip = Rc<TooltipController<DomSurface>>;

/// 参照リンクの data-note-* 属性を読む（無い属性は空文字）
pub fn read_reference(element: &Element) -> NoteReference {
    NoteReference {
        title: element.get_attribute(ATTR_TITLE).unwrap_or_default(),
        collection: element.get_attribute(ATTR_COLLECTION).unwrap_or_default(),
        preview: element.get_attribute(ATTR_PREVIEW).unwrap_or_default(),
    }
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, String> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| format!("セレクタ {} の検索失敗: {:?}", selector, e))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// マウスイベントのページ座標と、スクロール量を含めた表示領域
fn pointer_and_viewport(event: &Event) -> Option<(PointerPosition, Viewport)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let window = web_sys::window()?;
    let viewport = Viewport {
        scroll_x: window.scroll_x().ok()?,
        scroll_y: window.scroll_y().ok()?,
        width: window.inner_width().ok()?.as_f64()?,
        height: window.inner_height().ok()?.as_f64()?,
    };
    let pointer = PointerPosition {
        x: mouse.page_x() as f64,
        y: mouse.page_y() as f64,
    };
    Some((pointer, viewport))
}

fn bind_reference_link(link: &Element, tooltip: &Tooltip) -> [EventListener; 3] {
    let enter = {
        let tooltip = tooltip.clone();
        let element = link.clone();
        EventListener::new(link, "mouseenter", move |event| {
            if let Some((pointer, viewport)) = pointer_and_viewport(event) {
                tooltip.show(pointer, viewport, &read_reference(&element));
            }
        })
    };
    let moved = {
        let tooltip = tooltip.clone();
        EventListener::new(link, "mousemove", move |event| {
            if let Some((pointer, viewport)) = pointer_and_viewport(event) {
                tooltip.reposition(pointer, viewport);
            }
        })
    };
    let leave = {
        let tooltip = tooltip.clone();
        EventListener::new(link, "mouseleave", move |_| tooltip.hide())
    };
    [enter, moved, leave]
}

fn bind_anchor(anchor: &Element, interceptor: &LinkInterceptor) -> EventListener {
    let interceptor = interceptor.clone();
    let element = anchor.clone();
    EventListener::new_with_options(
        anchor,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            // href の無いリンクは通知しない
            match element.get_attribute("href") {
                Some(href) => {
                    interceptor.intercept(&href);
                }
                None => log_warn("links", "hrefの無いリンクがクリックされました"),
            }
        },
    )
}

/// 登録済みリスナー（drop で解除される）
pub struct NoteDocumentBindings {
    listeners: Vec<EventListener>,
    links: usize,
    anchors: usize,
}

impl NoteDocumentBindings {
    pub fn attach(
        document: &Document,
        tooltip: Option<&Tooltip>,
        interceptor: &LinkInterceptor,
        config: &ViewerConfig,
    ) -> Result<Self, String> {
        let mut listeners = Vec::new();

        let mut links = 0;
        if let Some(tooltip) = tooltip {
            for link in query_all(document, &config.link_selector)? {
                listeners.extend(bind_reference_link(&link, tooltip));
                links += 1;
            }
        }

        let anchors = query_all(document, &config.anchor_selector)?;
        for anchor in &anchors {
            listeners.push(bind_anchor(anchor, interceptor));
        }

        Ok(NoteDocumentBindings {
            listeners,
            links,
            anchors: anchors.len(),
        })
    }

    pub fn link_count(&self) -> usize {
        self.links
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// 文書と、そこに付けたツールチップ・リンク横取りの状態
pub struct NoteDocument {
    document: Document,
    config: ViewerConfig,
    tooltip: Option<Tooltip>,
    interceptor: LinkInterceptor,
    bindings: Option<NoteDocumentBindings>,
}

impl NoteDocument {
    /// ツールチップ要素が無い場合はツールチップだけ無効にする
    pub fn new(document: Document, config: ViewerConfig, interceptor: LinkInterceptor) -> Self {
        let tooltip = match DomSurface::find(&document, &config.tooltip_id) {
            Ok(surface) => Some(Rc::new(TooltipController::new(
                surface,
                config.labels.clone(),
                config.placement,
            ))),
            Err(e) => {
                log_error("tooltip", &e);
                None
            }
        };

        NoteDocument {
            document,
            config,
            tooltip,
            interceptor,
            bindings: None,
        }
    }

    pub fn has_tooltip(&self) -> bool {
        self.tooltip.is_some()
    }

    /// 現在の要素を走査し直してリスナーを付け直す
    pub fn attach(&mut self) -> Result<&NoteDocumentBindings, String> {
        // 古いリスナーを先に外す。表示中のリンクが消えていると mouseleave が来ないので隠しておく
        self.bindings = None;
        if let Some(tooltip) = &self.tooltip {
            tooltip.hide();
        }

        let bindings = NoteDocumentBindings::attach(
            &self.document,
            self.tooltip.as_ref(),
            &self.interceptor,
            &self.config,
        )?;
        log_info_with_data(
            "links",
            "リスナーを登録しました",
            serde_json::json!({
                "links": bindings.link_count(),
                "anchors": bindings.anchor_count(),
                "listeners": bindings.listener_count(),
            }),
        );
        Ok(self.bindings.insert(bindings))
    }
}

thread_local! {
    static NOTE_DOCUMENT: RefCell<Option<NoteDocument>> = RefCell::new(None);
}

pub fn install_note_document(note_document: NoteDocument) {
    NOTE_DOCUMENT.with(|slot| *slot.borrow_mut() = Some(note_document));
}

/// 登録済みの文書を走査し直す。付け直した参照リンク数を返す
pub fn refresh_note_links() -> Result<usize, String> {
    NOTE_DOCUMENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        let note_document = slot.as_mut().ok_or("文書が初期化されていません")?;
        note_document.attach().map(|bindings| bindings.link_count())
    })
}
