//! ノート参照ツールチップ
//!
//! 参照リンクをホバーした時に、参照先のコレクション名・ノート名・プレビューを表示する。
//! 表示先の要素はホストページが用意したもの（#tooltip）を受け取って使う。

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::models::{NoteReference, Placement, PointerPosition, Position, Size, TooltipLabels, Viewport};

/// ツールチップの表示先
pub trait TooltipSurface {
    fn set_content(&self, html: &str);
    fn set_visible(&self, visible: bool);
    /// 現在の表示サイズ
    fn size(&self) -> Size;
    fn move_to(&self, position: Position);
}

/// DOM上のツールチップ要素
pub struct DomSurface {
    element: HtmlElement,
}

impl DomSurface {
    pub fn new(element: HtmlElement) -> Self {
        DomSurface { element }
    }

    /// idでツールチップ要素を探す
    pub fn find(document: &Document, id: &str) -> Result<Self, String> {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| format!("#{} 要素が見つかりません", id))?;
        let element = element
            .dyn_into::<HtmlElement>()
            .map_err(|_| format!("#{} はHTMLElementではありません", id))?;
        Ok(Self::new(element))
    }
}

impl TooltipSurface for DomSurface {
    fn set_content(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn set_visible(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.element.style().set_property("display", display);
    }

    fn size(&self) -> Size {
        let rect = self.element.get_bounding_client_rect();
        Size {
            width: rect.width(),
            height: rect.height(),
        }
    }

    fn move_to(&self, position: Position) {
        let style = self.element.style();
        let _ = style.set_property("left", &format!("{}px", position.left));
        let _ = style.set_property("top", &format!("{}px", position.top));
    }
}

/// ツールチップの表示内容（3行）
pub fn render_tooltip_html(reference: &NoteReference, labels: &TooltipLabels) -> String {
    format!(
        "{}: <b>{}</b>;<br>{}: <b>{}</b>;<br>{}: {}",
        html_escape::encode_text(&labels.collection_label),
        html_escape::encode_text(&reference.collection),
        html_escape::encode_text(&labels.note_label),
        html_escape::encode_text(&reference.title),
        html_escape::encode_text(&labels.preview_label),
        html_escape::encode_text(&reference.preview),
    )
}

/// ポインタ位置からツールチップの左上座標を決める
///
/// 右端・下端だけを表示領域内に収める。左端・上端はポインタより右下に出すので補正しない。
/// ポインタも結果もページ座標なので、境界はスクロール量を含めた表示領域の端になる。
pub fn compute_position(pointer: PointerPosition, size: Size, viewport: Viewport, placement: &Placement) -> Position {
    let mut left = pointer.x + placement.offset_x;
    let mut top = pointer.y + placement.offset_y;

    if left + size.width > viewport.right() - placement.edge_margin {
        left = viewport.right() - size.width - placement.edge_margin;
    }
    if top + size.height > viewport.bottom() - placement.edge_margin {
        top = viewport.bottom() - size.height - placement.edge_margin;
    }

    Position { left, top }
}

/// 参照ツールチップの表示制御
pub struct TooltipController<S: TooltipSurface> {
    surface: S,
    labels: TooltipLabels,
    placement: Placement,
}

impl<S: TooltipSurface> TooltipController<S> {
    pub fn new(surface: S, labels: TooltipLabels, placement: Placement) -> Self {
        TooltipController {
            surface,
            labels: labels.normalized(),
            placement,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// 内容を差し替えて表示し、すぐに位置を合わせる
    pub fn show(&self, pointer: PointerPosition, viewport: Viewport, reference: &NoteReference) {
        self.surface.set_content(&render_tooltip_html(reference, &self.labels));
        self.surface.set_visible(true);
        self.reposition(pointer, viewport);
    }

    pub fn reposition(&self, pointer: PointerPosition, viewport: Viewport) {
        let position = compute_position(pointer, self.surface.size(), viewport, &self.placement);
        self.surface.move_to(position);
    }

    /// 非表示にする（内容は次の show で上書きされる）
    pub fn hide(&self) {
        self.surface.set_visible(false);
    }
}
