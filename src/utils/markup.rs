//! ノート本文のマークアップ生成
//!
//! `[[ノート名]]` を参照リンクへ、`#タグ` をタグボタンへ置き換える。
//! 生成される属性（data-note-*）はツールチップが読み取る。

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::{NoteReference, NoteSummary, NOTE_SCHEME};

const PREVIEW_CHARS: usize = 20;
const BLANK_PREVIEW: &str = "The note is blank.";
const SELF_PREVIEW: &str = "This note references itself.";

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("reference pattern"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#(\S+)").expect("tag pattern"))
}

/// 本文中の参照（重複なし、出現順）
pub fn extract_references(markdown: &str) -> Vec<String> {
    distinct(reference_pattern().captures_iter(markdown).map(|c| c[1].to_string()))
}

/// 本文中のタグ（重複なし、出現順）
pub fn extract_tags(markdown: &str) -> Vec<String> {
    distinct(tag_pattern().captures_iter(markdown).map(|c| c[1].to_string()))
}

fn distinct(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

/// ツールチップ用のプレビュー文（先頭20文字、改行は ⏎ 表記）
pub fn preview_text(body: &str, references_itself: bool) -> String {
    if body.trim().is_empty() {
        return BLANK_PREVIEW.to_string();
    }
    if references_itself {
        return SELF_PREVIEW.to_string();
    }

    let mut preview: String = body.chars().take(PREVIEW_CHARS).collect();
    if body.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview.replace('\n', " ⏎ ")
}

fn attr(value: &str) -> String {
    html_escape::encode_single_quoted_attribute(value).into_owned()
}

/// 参照リンク `<a class='note-link' ...>`
pub fn reference_link_html(reference: &NoteReference) -> String {
    let title = attr(&reference.title);
    format!(
        "<a href='{}{}' class='note-link' data-note-title='{}' data-note-collection='{}' data-note-preview='{}'>{}</a>",
        NOTE_SCHEME,
        title,
        title,
        attr(&reference.collection),
        attr(&reference.preview),
        html_escape::encode_text(&reference.title),
    )
}

/// 参照先が見つからない場合の強調表示
pub fn invalid_reference_html(title: &str) -> String {
    format!("<span class='red-squiggly'>[[{}]]</span>", html_escape::encode_text(title))
}

/// タグボタン（クリックで handleTagClick を呼ぶ）
pub fn tag_button_html(tag: &str) -> String {
    let literal = serde_json::to_string(tag).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "<button class='custom-tag-button' data-tag='{}' onclick='handleTagClick({})'>{}</button>",
        attr(tag),
        attr(&literal),
        html_escape::encode_text(tag),
    )
}

/// 参照を同じコレクション内のノートへのリンクに置き換える
pub fn replace_references(markdown: &str, notes: &[NoteSummary], current: &NoteSummary) -> String {
    reference_pattern()
        .replace_all(markdown, |caps: &Captures| {
            let title = &caps[1];
            let found = notes
                .iter()
                .find(|note| note.collection == current.collection && note.title == title);
            match found {
                Some(note) => reference_link_html(&NoteReference {
                    title: title.to_string(),
                    collection: note.collection.clone(),
                    preview: preview_text(&note.body, note.title == current.title),
                }),
                None => invalid_reference_html(title),
            }
        })
        .into_owned()
}

/// タグをボタンに置き換える
pub fn replace_tags(markdown: &str) -> String {
    tag_pattern()
        .replace_all(markdown, |caps: &Captures| tag_button_html(&caps[1]))
        .into_owned()
}

/// タグ → 参照の順で置き換える
pub fn render_note_markup(markdown: &str, notes: &[NoteSummary], current: &NoteSummary) -> String {
    replace_references(&replace_tags(markdown), notes, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, collection: &str, body: &str) -> NoteSummary {
        NoteSummary {
            title: title.into(),
            collection: collection.into(),
            body: body.into(),
        }
    }

    #[test]
    fn extracts_distinct_references_in_order() {
        let refs = extract_references("see [[B]] and [[A]] then [[B]] again");
        assert_eq!(refs, vec!["B", "A"]);
    }

    #[test]
    fn extracts_tags() {
        assert_eq!(extract_tags("#work and #home, also #work"), vec!["work", "home,"]);
        assert!(extract_tags("# Heading").is_empty());
    }

    #[test]
    fn preview_truncates_and_marks_newlines() {
        assert_eq!(preview_text("short\nbody", false), "short ⏎ body");
        assert_eq!(preview_text("abcdefghijklmnopqrstuvwxyz", false), "abcdefghijklmnopqrst...");
        assert_eq!(preview_text("   ", false), "The note is blank.");
        assert_eq!(preview_text("anything", true), "This note references itself.");
    }

    #[test]
    fn reference_link_matches_expected_markup() {
        let html = reference_link_html(&NoteReference {
            title: "Groceries".into(),
            collection: "Default".into(),
            preview: "milk, eggs".into(),
        });
        assert_eq!(
            html,
            "<a href='note://Groceries' class='note-link' data-note-title='Groceries' \
             data-note-collection='Default' data-note-preview='milk, eggs'>Groceries</a>"
        );
    }

    #[test]
    fn reference_attributes_are_escaped() {
        let html = reference_link_html(&NoteReference {
            title: "it's".into(),
            collection: "C".into(),
            preview: "<b>".into(),
        });
        assert!(!html.contains("'it's'"));
        assert!(html.contains("data-note-title='it&"));
        assert!(html.contains("data-note-preview='&lt;b&gt;'"));
    }

    #[test]
    fn tag_button_matches_expected_markup() {
        assert_eq!(
            tag_button_html("tag1"),
            "<button class='custom-tag-button' data-tag='tag1' onclick='handleTagClick(\"tag1\")'>tag1</button>"
        );
    }

    #[test]
    fn replaces_valid_and_invalid_references() {
        let current = note("Today", "Work", "x");
        let notes = vec![
            current.clone(),
            note("Plan", "Work", "step one"),
            note("Plan", "Home", "other collection"),
        ];
        let html = replace_references("[[Plan]] [[Missing]] [[Today]]", &notes, &current);

        assert!(html.contains("data-note-preview='step one'"));
        assert!(html.contains("<span class='red-squiggly'>[[Missing]]</span>"));
        assert!(html.contains("data-note-preview='This note references itself.'"));
        assert!(!html.contains("other collection"));
    }

    #[test]
    fn overlapping_tags_are_replaced_once() {
        let html = replace_tags("#a #ab");
        assert_eq!(html.matches("custom-tag-button").count(), 2);
        assert!(html.contains("data-tag='ab'"));
    }
}
