//! Scope-file loader.
//!
//! A scope file defines the names of one frame:
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | define a name |
//! | `/unset <name>` | drop a name defined earlier in the file |
//! | Lines starting with `;` | comment, ignored |
//! | Any other `/command` | silently skipped |
//!
//! Values are stored verbatim; `~{name}` tokens inside them are left for the
//! expander.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::scope::Frame;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error on one line of a scope file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Scope-file loading.
pub struct Config;

impl Config {
    /// Parse scope-file text into a frame.
    ///
    /// Returns the frame and any errors on recognised directives; the
    /// remaining lines still load.
    pub fn load_str(s: &str) -> (Frame, Vec<ConfigError>) {
        let mut frame = Frame::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some(rest) = line.strip_prefix('/') else { continue };

            let (cmd, args_str) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));
            let args_str = args_str.trim();

            let result = match cmd {
                "set" => parse_set(&split_args(args_str), &mut frame),
                "unset" => parse_unset(&split_args(args_str), &mut frame),
                _ => Ok(()),
            };
            if let Err(message) = result {
                errors.push(ConfigError { line: lineno, message });
            }
        }

        (frame, errors)
    }

    /// Read and parse a scope file from disk.
    pub fn load_file(path: &Path) -> Result<(Frame, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        let loaded = Self::load_str(&s);
        tracing::debug!(path = %path.display(), names = loaded.0.len(), "scope file loaded");
        Ok(loaded)
    }

    /// Like [`load_file`](Self::load_file), but the first line error fails
    /// the whole load.
    pub fn load_file_strict(path: &Path) -> Result<Frame> {
        let (frame, mut errors) = Self::load_file(path)?;
        if errors.is_empty() {
            Ok(frame)
        } else {
            Err(errors.swap_remove(0).into())
        }
    }
}

/// Search for the default scope file.
///
/// `$TILDERC` wins when set; otherwise `~/.tilderc`, `~/tilderc`,
/// `./.tilderc` and `./tilderc` are tried in order.  Returns the first path
/// that exists.
pub fn find_default_scope_file() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("TILDERC") {
        let p = PathBuf::from(p);
        return p.exists().then_some(p);
    }
    let home = std::env::var("HOME").unwrap_or_default();
    [
        format!("{home}/.tilderc"),
        format!("{home}/tilderc"),
        "./.tilderc".to_owned(),
        "./tilderc".to_owned(),
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited words, honouring double-quoted strings
/// and `\"` escapes within them.
fn split_args(s: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if !in_quotes => {
                in_quotes = true;
                quoted = true;
            }
            '"' if in_quotes => in_quotes = false,
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    cur.push(escaped);
                }
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !cur.is_empty() || quoted {
                    args.push(std::mem::take(&mut cur));
                }
                quoted = false;
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() || quoted {
        args.push(cur);
    }
    args
}

// ── /set, /unset ─────────────────────────────────────────────────────────────

/// Parse `/set <name>=<value>` or `/set <name> <value>`.
///
/// `/set name=` and `/set name ""` define `name` as the empty string, which
/// deletes its tokens on expansion.
fn parse_set(tokens: &[String], frame: &mut Frame) -> std::result::Result<(), String> {
    if tokens.is_empty() {
        return Err("/set: requires an argument".into());
    }

    let (name, value) = if let Some((name, first)) = tokens[0].split_once('=') {
        let mut value = first.to_owned();
        for extra in &tokens[1..] {
            value.push(' ');
            value.push_str(extra);
        }
        (name.to_owned(), value)
    } else if tokens.len() >= 2 {
        (tokens[0].clone(), tokens[1..].join(" "))
    } else {
        return Err(format!("/set: missing value for '{}'", tokens[0]));
    };

    if name.is_empty() {
        return Err("/set: name cannot be empty".into());
    }
    if name.contains(['~', '{', '}']) {
        return Err(format!("/set: '{name}' cannot be referenced as ~{{{name}}}"));
    }

    frame.set(name, value);
    Ok(())
}

fn parse_unset(tokens: &[String], frame: &mut Frame) -> std::result::Result<(), String> {
    match tokens {
        [name] => {
            frame.unset(name);
            Ok(())
        }
        [] => Err("/unset: requires a name".into()),
        _ => Err("/unset: takes exactly one name".into()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
