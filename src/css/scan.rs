//! Minimal CSS lexer separating comments and string literals from code

/// Kind of a contiguous run of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    /// `/* ... */`; `terminated` is false when the comment runs to EOF
    Comment { terminated: bool },
    /// Quoted string literal, including its quotes
    Str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub start: usize,
    pub text: &'a str,
}

impl Segment<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Split `input` into code, comment and string segments covering it exactly
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut code_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let (kind, end) = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => match input[i + 2..].find("*/") {
                Some(rel) => (SegmentKind::Comment { terminated: true }, i + 2 + rel + 2),
                None => (SegmentKind::Comment { terminated: false }, bytes.len()),
            },
            quote @ (b'"' | b'\'') => (SegmentKind::Str, string_end(bytes, i, quote)),
            _ => {
                i += 1;
                continue;
            }
        };

        if code_start < i {
            out.push(Segment {
                kind: SegmentKind::Code,
                start: code_start,
                text: &input[code_start..i],
            });
        }
        out.push(Segment {
            kind,
            start: i,
            text: &input[i..end],
        });
        i = end;
        code_start = end;
    }

    if code_start < bytes.len() {
        out.push(Segment {
            kind: SegmentKind::Code,
            start: code_start,
            text: &input[code_start..],
        });
    }
    out
}

/// Copy of `input` with every comment replaced by spaces of the same byte
/// length, so offsets into the copy are valid offsets into `input`
pub fn blank_comments(input: &str) -> String {
    segments(input)
        .into_iter()
        .map(|s| match s.kind {
            SegmentKind::Comment { .. } => " ".repeat(s.text.len()),
            _ => s.text.to_string(),
        })
        .collect()
}

/// End offset (exclusive) of a string literal opened at `open`.
/// An unescaped newline ends a bad string, as in CSS.
fn string_end(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Byte offsets that fall inside code (outside comments and strings)
pub struct CodeMask {
    non_code: Vec<(usize, usize)>,
}

impl CodeMask {
    pub fn new(input: &str) -> Self {
        let non_code = segments(input)
            .into_iter()
            .filter(|s| !s.is_code())
            .map(|s| (s.start, s.end()))
            .collect();
        Self { non_code }
    }

    pub fn is_code(&self, offset: usize) -> bool {
        // ranges are sorted and disjoint
        let idx = self.non_code.partition_point(|&(_, end)| end <= offset);
        match self.non_code.get(idx) {
            Some(&(start, _)) => offset < start,
            None => true,
        }
    }
}
