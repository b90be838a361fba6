use super::CssDocument;
use super::scan::segments;

/// Source text split into whitespace runs and everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    /// Whitespace run in code
    Space(&'a str),
    /// Non-whitespace code
    Code(&'a str),
    /// Comments and strings, never rewritten
    Verbatim(&'a str),
}

fn pieces(input: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    for seg in segments(input) {
        if !seg.is_code() {
            out.push(Piece::Verbatim(seg.text));
            continue;
        }

        let text = seg.text;
        let mut run_start = 0;
        let mut in_space = None;
        for (idx, c) in text.char_indices() {
            let space = c.is_ascii_whitespace();
            match in_space {
                Some(prev) if prev != space => {
                    out.push(piece(&text[run_start..idx], prev));
                    run_start = idx;
                }
                _ => {}
            }
            in_space = Some(space);
        }
        if let Some(space) = in_space {
            out.push(piece(&text[run_start..], space));
        }
    }
    out
}

fn piece(text: &str, space: bool) -> Piece<'_> {
    if space { Piece::Space(text) } else { Piece::Code(text) }
}

/// Collapse the document onto one line.
///
/// Line breaks and whitespace runs in code become one space, the space
/// after `{` and before `}` is dropped and the result is trimmed.
/// Comments and string literals are copied unchanged.
pub fn strip_line_breaks(doc: CssDocument) -> CssDocument {
    let text = collapse(doc.text());
    doc.with_text(text)
}

fn collapse(input: &str) -> String {
    let pieces = pieces(input);
    let mut out = String::with_capacity(input.len());
    let mut prev_code_brace = false;

    for (idx, p) in pieces.iter().enumerate() {
        match *p {
            Piece::Space(_) => {
                let next = pieces[idx + 1..]
                    .iter()
                    .find(|p| !matches!(p, Piece::Space(_)));
                let keep = match next {
                    None => false,
                    Some(Piece::Code(code)) => !code.starts_with('}'),
                    Some(_) => true,
                };
                if keep && !out.is_empty() && !prev_code_brace && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            Piece::Code(code) => {
                out.push_str(code);
                prev_code_brace = code.ends_with('{');
            }
            Piece::Verbatim(text) => {
                out.push_str(text);
                prev_code_brace = false;
            }
        }
    }
    out
}

/// Squeeze runs of blank lines into a single line break.
///
/// Used when line returns are kept: trailing whitespace before a line break
/// and leading blank lines are dropped, a trailing run ends in one break.
pub fn squeeze_blank_lines(doc: CssDocument) -> CssDocument {
    let text = squeeze(doc.text());
    doc.with_text(text)
}

fn squeeze(input: &str) -> String {
    let pieces = pieces(input);
    let mut out = String::with_capacity(input.len());
    let last = pieces.len().saturating_sub(1);

    for (idx, p) in pieces.iter().enumerate() {
        match *p {
            Piece::Space(run) => match run.rfind('\n') {
                Some(pos) => {
                    let newline = if run.contains("\r\n") { "\r\n" } else { "\n" };
                    let indent = &run[pos + 1..];
                    if out.is_empty() {
                        out.push_str(indent);
                    } else if idx == last {
                        out.push_str(newline);
                    } else {
                        out.push_str(newline);
                        out.push_str(indent);
                    }
                }
                None => out.push_str(run),
            },
            Piece::Code(text) | Piece::Verbatim(text) => out.push_str(text),
        }
    }
    out
}
