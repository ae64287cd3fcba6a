//! Rust identifier helpers for generated source.

use std::collections::BTreeSet;

/// Strict and reserved keywords of the 2024 edition.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW: &[&str] = &["crate", "self", "Self", "super"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Whether `word` is a plain (non-keyword, non-raw) ASCII identifier.
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && word != "_"
        && !is_keyword(word)
}

/// Converts a flag name to a camel-case local name.
///
/// The name is split on `-` and `_`; empty pieces are dropped. The first
/// character of the first piece is lower-cased, the first character of
/// every later piece is upper-cased, and nothing else changes.
///
/// # Examples
///
/// ```
/// use command_tree_codegen::to_camel_case;
///
/// assert_eq!(to_camel_case("output-format"), "outputFormat");
/// assert_eq!(to_camel_case("my_flag"), "myFlag");
/// assert_eq!(to_camel_case("UPPER"), "uPPER");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, piece) in name.split(['-', '_']).filter(|p| !p.is_empty()).enumerate() {
        let mut chars = piece.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Returns `name` as it must be written in source: keywords become raw
/// identifiers. `None` when `name` cannot name a function.
pub(crate) fn function_ident(name: &str) -> Option<String> {
    if NON_RAW.contains(&name) {
        return None;
    }
    if is_keyword(name) {
        return Some(format!("r#{name}"));
    }
    is_identifier(name).then(|| name.to_string())
}

/// Hands out unique local variable names.
#[derive(Debug, Default)]
pub(crate) struct Locals {
    taken: BTreeSet<String>,
}

impl Locals {
    pub(crate) fn new(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Reserves `name` exactly. Returns false if it was already taken.
    pub(crate) fn reserve(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_string())
    }

    /// Sanitises `base` into a valid identifier and makes it unique by
    /// appending a counter.
    pub(crate) fn fresh(&mut self, base: &str) -> String {
        let base = sanitize(base);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let base = base.trim_start_matches("r#");
        (2..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| self.taken.insert(candidate.clone()))
            .unwrap_or_default()
    }
}

fn sanitize(base: &str) -> String {
    let mut ident: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident == "_" {
        ident = "value".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if NON_RAW.contains(&ident.as_str()) {
        ident.push('_');
    } else if is_keyword(&ident) {
        ident.insert_str(0, "r#");
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        let cases = [
            ("name", "name"),
            ("output-format", "outputFormat"),
            ("my_flag", "myFlag"),
            ("force", "force"),
            ("some-long-flag-name", "someLongFlagName"),
            ("UPPER", "uPPER"),
            ("", ""),
            ("--dry--run", "dryRun"),
        ];
        for (input, expected) in cases {
            assert_eq!(to_camel_case(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_function_ident() {
        assert_eq!(function_ident("runAdd").as_deref(), Some("runAdd"));
        assert_eq!(function_ident("type").as_deref(), Some("r#type"));
        assert_eq!(function_ident("self"), None);
        assert_eq!(function_ident("run-add"), None);
        assert_eq!(function_ident("1run"), None);
        assert_eq!(function_ident(""), None);
    }

    #[test]
    fn test_locals_are_unique_and_valid() {
        let mut locals = Locals::new(&["ctx", "args"]);
        assert_eq!(locals.fresh("ctx"), "ctx2");
        assert_eq!(locals.fresh("outputFormat"), "outputFormat");
        assert_eq!(locals.fresh("outputFormat"), "outputFormat2");
        assert_eq!(locals.fresh("type"), "r#type");
        assert_eq!(locals.fresh("type"), "type2");
        assert_eq!(locals.fresh("9lives"), "_9lives");
        assert_eq!(locals.fresh("dry.run"), "dry_run");
        assert_eq!(locals.fresh(""), "value");
        assert_eq!(locals.fresh("self"), "self_");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("handlers"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("_"));
        assert!(!is_identifier("mod"));
        assert!(!is_identifier("my-mod"));
    }
}
