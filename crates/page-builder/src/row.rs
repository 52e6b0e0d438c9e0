//! Row classification.

use crate::sheet::RawRow;

/// Marker in the comment column that starts a new `<section>`.
pub const SECTION_MARKER: &str = "SECTION";

/// What a sheet row stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// Every field empty: the sheet ends here.
    End,
    /// Section break; the row carries no other data.
    Section,
    /// A video or image with its timeline commands.
    Media { filename: &'a str },
    /// No filename: `start` is the heading, the commands are the text.
    Text { title: &'a str, body: String },
    /// Only a comment, nothing to show.
    CommentOnly,
}

pub fn classify_row(row: &RawRow) -> RowKind<'_> {
    if row.is_blank() {
        return RowKind::End;
    }
    if row.comment.as_deref() == Some(SECTION_MARKER) {
        return RowKind::Section;
    }
    if let Some(filename) = row.filename.as_deref() {
        return RowKind::Media { filename };
    }
    if row.start.is_some() || row.has_commands() {
        return RowKind::Text {
            title: row.start.as_deref().unwrap_or_default(),
            body: row.commands.iter().flatten().map(String::as_str).collect(),
        };
    }
    RowKind::CommentOnly
}
