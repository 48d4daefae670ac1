//! `~{name}` token scanning.
//!
//! A token is `~{` followed by one or more characters other than `~`, `{`
//! and `}`, closed by `}`.  Tokens are found left to right and never overlap
//! or nest.  Anything that does not fit the pattern (`~{}`, `~{a`,
//! `~{a{b}}`, …) is ordinary text, not an error.

use std::sync::OnceLock;

use regex::Regex;

const TOKEN_PATTERN: &str = r"~\{[^~{}]+\}";

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern compiles"))
}

/// One `~{name}` occurrence: the half-open byte span `[start, end)` in the
/// scanned text and the enclosed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub start: usize,
    pub end: usize,
    pub name: &'t str,
    /// The whole token text, `~{name}`.
    pub literal: &'t str,
}

/// Iterator over the tokens of a string, in ascending position order.
///
/// A clone continues from the same position; call [`scan`] again to start
/// over.
#[derive(Debug, Clone)]
pub struct Tokens<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for Tokens<'t> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Token<'t>> {
        let m = token_regex().find_at(self.text, self.pos)?;
        self.pos = m.end();
        let literal = m.as_str();
        Some(Token {
            start: m.start(),
            end: m.end(),
            name: &literal[2..literal.len() - 1],
            literal,
        })
    }
}

/// Scan `text` for tokens.
pub fn scan(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

/// Returns `true` if `text` contains at least one token.
pub fn has_tokens(text: &str) -> bool {
    token_regex().is_match(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
