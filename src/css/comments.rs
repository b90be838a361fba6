use super::CssDocument;
use super::scan::{SegmentKind, segments};

/// Remove every terminated `/* ... */` comment
pub fn strip_comments(doc: CssDocument) -> CssDocument {
    let text = remove_comments(doc.text(), false);
    doc.with_text(text)
}

/// Like [`strip_comments`] but keeps `/*! ... */`, `@license` and `@preserve` comments
pub fn strip_comments_preserving_licenses(doc: CssDocument) -> CssDocument {
    let text = remove_comments(doc.text(), true);
    doc.with_text(text)
}

fn is_license_comment(comment: &str) -> bool {
    comment.starts_with("/*!") || comment.contains("@license") || comment.contains("@preserve")
}

fn remove_comments(input: &str, keep_licenses: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_gap = false;

    for seg in segments(input) {
        let removable = match seg.kind {
            SegmentKind::Comment { terminated } => {
                terminated && !(keep_licenses && is_license_comment(seg.text))
            }
            _ => false,
        };

        if removable {
            pending_gap = true;
            continue;
        }

        // `a/**/b` must not fuse into `ab`
        if pending_gap && ends_with_word(&out) && starts_with_word(seg.text) {
            out.push(' ');
        }
        pending_gap = false;
        out.push_str(seg.text);
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '%' | '#')
}

fn ends_with_word(s: &str) -> bool {
    s.chars().next_back().is_some_and(is_word_char)
}

fn starts_with_word(s: &str) -> bool {
    s.chars().next().is_some_and(is_word_char)
}
