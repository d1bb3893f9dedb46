//! リンク先の通知バナー
//!
//! alert の代わりに画面上部へ表示し、一定時間後に自動で閉じる

use leptos::*;
use std::rc::Rc;
use web_sys::HtmlElement;

use crate::components::link_interceptor::{sink_for_mode, LinkSink, NoticeSink};
use crate::models::LinkTarget;
use crate::utils::config::ViewerConfig;

#[component]
pub fn LinkNotice(
    notice: ReadSignal<Option<LinkTarget>>,
    set_notice: WriteSignal<Option<LinkTarget>>,
    duration_ms: u32,
) -> impl IntoView {
    // 通知ごとの番号。同じリンク先が続けて通知されても古いタイマーでは閉じない
    let generation = store_value(0u64);

    create_effect(move |_| {
        if notice.get().is_some() {
            generation.update_value(|g| *g += 1);
            let ticket = generation.get_value();
            spawn_local(async move {
                gloo::timers::future::TimeoutFuture::new(duration_ms).await;
                if generation.get_value() == ticket {
                    set_notice.set(None);
                }
            });
        }
    });

    view! {
        {move || notice.get().map(|target| view! {
            <div class=format!("link-notice link-notice-{}", target.kind()) role="status">
                <span class="link-notice-target">{target.raw().to_string()}</span>
                <button class="link-notice-close" on:click=move |_| set_notice.set(None)>"✕"</button>
            </div>
        })}
    }
}

/// parent にバナーを置き、そこへ書き込む通知先を返す
pub fn mount_notice(parent: HtmlElement, duration_ms: u32) -> Rc<dyn LinkSink> {
    let (notice, set_notice) = create_signal(None::<LinkTarget>);
    mount_to(parent, move || view! {
        <LinkNotice notice=notice set_notice=set_notice duration_ms=duration_ms />
    });
    Rc::new(NoticeSink::new(set_notice))
}

/// 設定の通知モードに応じた通知先（バナーは body に置く）
pub fn link_sink(config: &ViewerConfig) -> Result<Rc<dyn LinkSink>, String> {
    if let Some(sink) = sink_for_mode(config.notice_mode) {
        return Ok(sink);
    }
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .ok_or("bodyがありません")?;
    Ok(mount_notice(body, config.notice_duration_ms))
}
