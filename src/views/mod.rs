//! ビューモジュール

pub mod note_document;

pub use note_document::{install_note_document, refresh_note_links, NoteDocument};
