//! `@import` inlining
//!
//! A relative import target is resolved against the directory of the file
//! that contains the `@import`. Targets that are remote, carry a media
//! query or are listed in the ignore list stay as `@import` statements.

use super::CssDocument;
use super::scan::{CodeMask, blank_comments};
use super::urls::{is_remote, rebase_target, rebase_urls};
use crate::error::{PipelineError, PipelineResult};
use indexmap::IndexSet;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)@import\s*(url\(\s*)?(?:"([^"]*)"|'([^']*)'|([^\s"');]+))\s*(\))?([^;{}]*);?"#,
    )
    .expect("valid import regex")
});

/// Settings shared by every level of a recursive import resolution
#[derive(Debug, Clone, Copy)]
pub struct ImportOptions<'a> {
    /// Directory of the top-level stylesheet; inlined urls are rebased onto it
    pub root_dir: &'a Path,
    /// Targets left untouched, compared with the text written in `@import`
    pub ignore: &'a [String],
}

/// A parsed `@import` statement
#[derive(Debug)]
struct ImportStatement<'a> {
    target: &'a str,
    url_form: bool,
    media: String,
}

impl<'a> ImportStatement<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let target = caps.get(2).or(caps.get(3)).or(caps.get(4))?.as_str();
        Some(Self {
            target,
            url_form: caps.get(1).is_some(),
            media: caps.get(6).map_or_else(String::new, |m| {
                m.as_str().split_whitespace().collect::<Vec<_>>().join(" ")
            }),
        })
    }

    fn render(&self, target: &str) -> String {
        let reference = if self.url_form {
            format!("url(\"{target}\")")
        } else {
            format!("\"{target}\"")
        };
        if self.media.is_empty() {
            format!("@import {reference};")
        } else {
            format!("@import {reference} {};", self.media)
        }
    }
}

/// Recursively inline the `@import` statements of `doc`.
///
/// `base_path` is the directory relative targets are resolved against and
/// `visited` the chain of files currently being inlined, including `doc`
/// itself. Meeting a file of the chain again fails with `CyclicImport`; a
/// file already inlined elsewhere in the document is dropped.
pub fn resolve_imports(
    mut doc: CssDocument,
    base_path: &Path,
    visited: &IndexSet<PathBuf>,
    options: &ImportOptions<'_>,
) -> PipelineResult<CssDocument> {
    let text = std::mem::take(&mut doc.text);
    // matching runs on a comment-free copy so no match can start or end
    // inside a comment; offsets line up with `text`
    let code = blank_comments(&text);
    let mask = CodeMask::new(&text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(caps) = IMPORT.captures_at(&code, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        if !mask.is_code(whole.start()) {
            // inside a string; the real statement may start later in this span
            pos = whole.start() + 1;
            continue;
        }
        pos = whole.end();
        let Some(statement) = ImportStatement::from_captures(&caps) else {
            continue;
        };

        out.push_str(&rebase_urls(&text[last..whole.start()], base_path, options.root_dir));
        last = whole.end();

        let original = &text[whole.start()..whole.end()];
        if let Some(kept) = keep_statement(&statement, original, base_path, options) {
            out.push_str(&kept);
            continue;
        }

        let resolved = base_path.join(statement.target);
        let canonical =
            resolved
                .canonicalize()
                .map_err(|_| PipelineError::MissingImportTarget {
                    target: statement.target.to_string(),
                    path: resolved.clone(),
                    importer: doc.path.clone(),
                })?;

        if visited.contains(&canonical) {
            let mut chain: Vec<PathBuf> = visited.iter().cloned().collect();
            chain.push(canonical);
            return Err(PipelineError::CyclicImport { chain });
        }

        if doc.inlined.contains(&canonical) {
            debug!("Skipping duplicate import: {:?}", canonical);
            continue;
        }

        let child_bytes =
            std::fs::read(&canonical).map_err(|_| PipelineError::MissingImportTarget {
                target: statement.target.to_string(),
                path: canonical.clone(),
                importer: doc.path.clone(),
            })?;
        debug!("Inlining {:?} into {:?}", canonical, doc.path);

        let child_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut child = CssDocument::decode(canonical.clone(), child_bytes)?;
        child.inlined = std::mem::take(&mut doc.inlined);
        child.inlined.insert(canonical.clone());

        let mut child_visited = visited.clone();
        child_visited.insert(canonical);

        let child = resolve_imports(child, &child_dir, &child_visited, options)?;
        doc.inlined = child.inlined;
        out.push_str(&child.text);
    }

    out.push_str(&rebase_urls(&text[last..], base_path, options.root_dir));
    doc.text = out;
    Ok(doc)
}

/// Returns the text to emit when a statement is not inlined
fn keep_statement(
    statement: &ImportStatement<'_>,
    original: &str,
    base_path: &Path,
    options: &ImportOptions<'_>,
) -> Option<String> {
    let target = statement.target.trim();
    let ignored = options.ignore.iter().any(|i| i == target);

    if is_remote(target) || ignored {
        debug!("Leaving @import of {:?} in place", target);
        return Some(original.to_string());
    }

    if !statement.media.is_empty() {
        debug!(
            "Leaving @import of {:?} with media '{}' in place",
            target, statement.media
        );
        if base_path == options.root_dir {
            return Some(original.to_string());
        }
        return Some(statement.render(&rebase_target(target, base_path, options.root_dir)));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn resolve(root: &Path, ignore: &[String]) -> PipelineResult<CssDocument> {
        let root = root.canonicalize().unwrap();
        let dir = root.parent().unwrap().to_path_buf();
        let doc = CssDocument::decode(&root, fs::read(&root).unwrap()).unwrap();
        let mut visited = IndexSet::new();
        visited.insert(root.clone());
        let options = ImportOptions {
            root_dir: &dir,
            ignore,
        };
        resolve_imports(doc, &dir, &visited, &options)
    }

    #[test]
    fn test_inline_all_import_forms() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.css", "a{}");
        write(tmp.path(), "b.css", "b{}");
        write(tmp.path(), "c.css", "c{}");
        write(tmp.path(), "d.css", "d{}");
        let main = write(
            tmp.path(),
            "main.css",
            "@import \"a.css\";\n@import 'b.css';\n@import url(c.css);\n@IMPORT url( \"d.css\" );\nmain{}",
        );

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "a{}\nb{}\nc{}\nd{}\nmain{}");
        assert_eq!(doc.inlined().len(), 4);
    }

    #[test]
    fn test_nested_imports_resolve_from_importing_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "lib/base.css", "@import \"parts/reset.css\";base{}");
        write(tmp.path(), "lib/parts/reset.css", "reset{}");
        let main = write(tmp.path(), "main.css", "@import \"lib/base.css\";");

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "reset{}base{}");
    }

    #[test]
    fn test_inlined_urls_are_rebased() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "theme/skin.css",
            "x{background:url(img/bg.png)}y{background:url('/abs.png')}",
        );
        let main = write(tmp.path(), "main.css", "@import \"theme/skin.css\";z{background:url(img/z.png)}");

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(
            doc.text(),
            "x{background:url(theme/img/bg.png)}y{background:url('/abs.png')}z{background:url(img/z.png)}"
        );
    }

    #[test]
    fn test_direct_self_import_is_cyclic() {
        let tmp = TempDir::new().unwrap();
        let main = write(tmp.path(), "main.css", "@import \"main.css\";");
        let err = resolve(&main, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::CyclicImport { ref chain } if chain.len() == 2));
    }

    #[test]
    fn test_transitive_cycle() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.css", "@import \"b.css\";");
        write(tmp.path(), "b.css", "@import \"x/../a.css\";");
        let main = write(tmp.path(), "main.css", "@import \"a.css\";");
        fs::create_dir_all(tmp.path().join("x")).unwrap();

        let err = resolve(&main, &[]).unwrap_err();
        match err {
            PipelineError::CyclicImport { chain } => {
                let names: Vec<_> = chain
                    .iter()
                    .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                    .collect();
                assert_eq!(names, vec!["main.css", "a.css", "b.css", "a.css"]);
            }
            other => panic!("expected CyclicImport, got {other:?}"),
        }
    }

    #[test]
    fn test_diamond_import_inlined_once() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "shared.css", "shared{}");
        write(tmp.path(), "a.css", "@import \"shared.css\";a{}");
        write(tmp.path(), "b.css", "@import \"shared.css\";b{}");
        let main = write(tmp.path(), "main.css", "@import \"a.css\";@import \"b.css\";");

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "shared{}a{}b{}");
    }

    #[test]
    fn test_missing_import_target() {
        let tmp = TempDir::new().unwrap();
        let main = write(tmp.path(), "main.css", "@import \"missing.css\";");
        let err = resolve(&main, &[]).unwrap_err();
        assert!(
            matches!(err, PipelineError::MissingImportTarget { ref target, .. } if target == "missing.css")
        );
    }

    #[test]
    fn test_statements_left_in_place() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "print.css", "p{}");
        write(tmp.path(), "skip.css", "s{}");
        let input = "@import url(http://fonts.example/css);\n\
                     @import \"print.css\" print;\n\
                     @import \"skip.css\";\n\
                     /* @import \"nope.css\"; */\n\
                     a{content:\"@import 'nope.css';\"}";
        let main = write(tmp.path(), "main.css", input);

        let doc = resolve(&main, &["skip.css".to_string()]).unwrap();
        assert_eq!(doc.text(), input);
    }

    #[test]
    fn test_import_after_comment_mentioning_import() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.css", "a{}");
        let main = write(
            tmp.path(),
            "main.css",
            "/* see @import below */\n@import \"a.css\";\nb{}",
        );

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "/* see @import below */\na{}\nb{}");
        assert_eq!(doc.inlined().len(), 1);
    }

    #[test]
    fn test_import_after_string_mentioning_import() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.css", "b{}");
        let main = write(
            tmp.path(),
            "main.css",
            "a{content:\"@import\"} @import \"b.css\";",
        );

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "a{content:\"@import\"} b{}");
    }

    #[test]
    fn test_comment_inside_import_statement() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.css", "a{}");
        write(tmp.path(), "b.css", "b{}");
        let main = write(
            tmp.path(),
            "main.css",
            "@import \"a.css\" /* note */;\n@import /* why */ url(b.css);",
        );

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "a{}\nb{}");
    }

    #[test]
    fn test_non_utf8_import_target() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("latin1.css"), b"a{content:\"caf\xe9\"}").unwrap();
        let main = write(tmp.path(), "main.css", "@import \"latin1.css\";");

        let err = resolve(&main, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_media_import_in_nested_file_is_rebased() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "sub/inner.css", "@import \"print.css\" print;");
        let main = write(tmp.path(), "main.css", "@import \"sub/inner.css\";");

        let doc = resolve(&main, &[]).unwrap();
        assert_eq!(doc.text(), "@import \"sub/print.css\" print;");
    }
}
