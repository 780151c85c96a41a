//! Path canonicalization shared by both datasets.
//!
//! Designite and churn tools disagree on separators (Windows backslashes,
//! doubled slashes from path concatenation). Both sides go through
//! [`normalize`] before any comparison.

/// The canonical separator after normalization.
pub const SEPARATOR: char = '/';

/// Canonicalize a path: backslashes become `/` and runs of `/` collapse to one.
///
/// An absent value normalizes to the empty string.
pub fn normalize(path: Option<&str>) -> String {
    let Some(path) = path else {
        return String::new();
    };

    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        let c = if c == '\\' { SEPARATOR } else { c };
        if c == SEPARATOR && out.ends_with(SEPARATOR) {
            continue;
        }
        out.push(c);
    }
    out
}

/// The component after the last separator of a normalized path.
///
/// A path without a separator, or one ending in a separator, is returned
/// unchanged.
pub fn basename(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(i) if i + 1 < path.len() => &path[i + 1..],
        _ => path,
    }
}
