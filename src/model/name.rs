// File: ./src/model/name.rs
//! Display names paired with their URL-safe slug form.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    pub orig: String,
    pub sanitized: String,
}

impl Name {
    pub fn new(orig: &str) -> Self {
        Self {
            orig: orig.to_string(),
            sanitized: sanitize_name(orig),
        }
    }

    /// Name whose slug is given explicitly instead of derived from `orig`.
    pub fn with_id(orig: &str, id: &str) -> Self {
        Self {
            orig: orig.to_string(),
            sanitized: id.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orig.is_empty()
    }
}

fn fold_char(c: char, out: &mut String) {
    let folded = match c {
        'ä' | 'Ä' => "ae",
        'ö' | 'Ö' => "oe",
        'ü' | 'Ü' => "ue",
        'ß' => "ss",
        'à' | 'á' | 'â' | 'ã' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ø' => "o",
        'œ' | 'Œ' => "oe",
        'ù' | 'ú' | 'û' | 'Ù' | 'Ú' | 'Û' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        _ if c.is_ascii() => {
            push_ascii(c, out);
            return;
        }
        _ => deunicode::deunicode_char(c).unwrap_or("-"),
    };
    for f in folded.chars() {
        push_ascii(f, out);
    }
}

fn push_ascii(c: char, out: &mut String) {
    if c.is_ascii_alphanumeric() {
        out.push(c.to_ascii_lowercase());
    } else {
        out.push('-');
    }
}

/// Lowercases, folds umlauts/diacritics and collapses everything that is not
/// `[a-z0-9]` into single hyphens. The output is a fixed point of itself.
pub fn sanitize_name(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.chars() {
        fold_char(c, &mut folded);
    }

    let mut out = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.push(c);
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Splits `"a|b"` into `("a", "b")`; anything else is returned as `(s, "")`.
pub fn split_pair(s: &str) -> (String, String) {
    match s.split_once('|') {
        Some((a, b)) if !b.contains('|') => (a.trim().to_string(), b.trim().to_string()),
        _ => (s.trim().to_string(), String::new()),
    }
}

/// Comma-separated cell to trimmed, non-empty entries.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn sort_and_uniquify(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items.dedup();
    items
}

/// Loose "same event, different edition" comparison on sanitized names.
/// Digits (years, edition counters) are ignored.
pub fn is_similar_name(a: &str, b: &str) -> bool {
    let strip = |s: &str| {
        sanitize_name(
            &s.chars()
                .map(|c| if c.is_ascii_digit() { '-' } else { c })
                .collect::<String>(),
        )
    };
    let a = strip(a);
    let b = strip(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || strsim::normalized_levenshtein(&a, &b) >= 0.85
}
