//! Rebasing of relative `url(...)` references in inlined stylesheets

use super::scan::{CodeMask, blank_comments};
use crate::config::constants::REMOTE_PREFIXES;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^\s"')]*))\s*\)"#).expect("valid url regex")
});

/// True for targets that point outside the local filesystem tree
pub fn is_remote(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    REMOTE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// True for targets that must never be rewritten
fn is_fixed(target: &str) -> bool {
    target.is_empty() || target.starts_with('/') || target.starts_with('#') || is_remote(target)
}

/// Rewrite a single relative target written against `from_dir` so it is
/// relative to `to_dir`
pub fn rebase_target(target: &str, from_dir: &Path, to_dir: &Path) -> String {
    if is_fixed(target) || from_dir == to_dir {
        return target.to_string();
    }

    // keep query strings and fragments (`font.woff?v=1`, `icons.svg#x`)
    let split = target.find(['?', '#']).unwrap_or(target.len());
    let (path_part, suffix) = target.split_at(split);

    let absolute = normalize(&from_dir.join(path_part));
    match pathdiff::diff_paths(&absolute, to_dir) {
        Some(rel) => {
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            format!("{rel}{suffix}")
        }
        None => target.to_string(),
    }
}

/// Rewrite every relative `url(...)` in code so it resolves from `to_dir`
pub fn rebase_urls(css: &str, from_dir: &Path, to_dir: &Path) -> String {
    if from_dir == to_dir {
        return css.to_string();
    }
    let code = blank_comments(css);
    let mask = CodeMask::new(css);
    let mut out = String::with_capacity(css.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(caps) = URL.captures_at(&code, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        if !mask.is_code(whole.start()) {
            pos = whole.start() + 1;
            continue;
        }
        pos = whole.end();

        let rebased = if let Some(m) = caps.get(1) {
            format!("url(\"{}\")", rebase_target(m.as_str(), from_dir, to_dir))
        } else if let Some(m) = caps.get(2) {
            format!("url('{}')", rebase_target(m.as_str(), from_dir, to_dir))
        } else if let Some(m) = caps.get(3) {
            format!("url({})", rebase_target(m.as_str(), from_dir, to_dir))
        } else {
            continue;
        };

        out.push_str(&css[last..whole.start()]);
        out.push_str(&rebased);
        last = whole.end();
    }

    out.push_str(&css[last..]);
    out
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
