// src/render.rs

//! Command template expansion.
//!
//! Templates reference variables as `@name`. Built-in tokens:
//!
//! - `@mods`: the changed files, each as a quoted `./path`
//! - `@dirmods`: the unique directories of the changed files, quoted
//! - `@confdir`: the directory holding the config file, quoted
//! - `@@`: a literal `@`
//!
//! Anything else is looked up in the block's variables.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::RenderError;

const BUILTIN_VARS: &[&str] = &["mods", "dirmods", "confdir"];

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(@|[A-Za-z_][A-Za-z0-9_]*)").expect("token regex is valid")
});

static VAR_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("var name regex is valid")
});

pub fn is_valid_var_name(name: &str) -> bool {
    VAR_NAME_RE.is_match(name)
}

/// Names that templates get for free and config may not redefine.
pub fn is_reserved_var(name: &str) -> bool {
    BUILTIN_VARS.contains(&name)
}

/// Expand `template`.
///
/// Pure: the same inputs always give the same string.
pub fn render(
    template: &str,
    vars: &BTreeMap<String, String>,
    modified: &[String],
    confdir: &Path,
) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        match name.as_str() {
            "@" => out.push('@'),
            "mods" => out.push_str(&quoted_paths(modified.iter().map(String::as_str))),
            "dirmods" => out.push_str(&quoted_paths(dirs_of(modified).iter().map(String::as_str))),
            "confdir" => out.push_str(&quote(&confdir.to_string_lossy().replace('\\', "/"))),
            other => match vars.get(other) {
                Some(value) => out.push_str(value),
                None => return Err(RenderError::UnknownVariable(other.to_string())),
            },
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn quoted_paths<'a>(paths: impl Iterator<Item = &'a str>) -> String {
    paths
        .map(|p| quote(&root_relative(p)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `a/b` becomes `./a/b`; absolute and already-marked paths are left alone.
fn root_relative(path: &str) -> String {
    if path.starts_with("./") || path.starts_with('/') || path == "." {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

fn dirs_of(paths: &[String]) -> BTreeSet<String> {
    paths
        .iter()
        .map(|p| match p.rsplit_once('/') {
            Some((dir, _)) if !dir.is_empty() => dir.to_string(),
            _ => ".".to_string(),
        })
        .collect()
}

/// Double-quote `s` for a POSIX shell.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
