//! `~{name}` substitution against a [`ScopeStack`].
//!
//! Each token is resolved on its own, innermost frame first:
//!
//! | Resolution       | Output                    | Marks `changed` |
//! |------------------|---------------------------|-----------------|
//! | `Found(value)`   | `value`                   | yes             |
//! | `FoundEmpty`     | nothing (token deleted)   | yes             |
//! | `NotFound`       | the token text, unchanged | no              |
//!
//! Expansion is a single pass.  A substituted value is copied into the
//! output as-is and never scanned again in the same call, so
//! self-referential definitions (`a = "~{a}"`) cannot loop.  A caller that
//! wants chained definitions resolved runs another pass on the result.

use crate::error::{Error, Result};
use crate::scope::{Resolution, ScopeStack};
use crate::token;

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of expanding one string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// `true` if at least one token was substituted or deleted.
    pub changed: bool,
    /// The rebuilt string.
    pub text: String,
    /// Names of tokens left in place because nothing defines them, in scan
    /// order (repeats included).
    pub unresolved: Vec<String>,
}

impl From<Expansion> for (bool, String) {
    fn from(e: Expansion) -> Self {
        (e.changed, e.text)
    }
}

/// Per-token report produced in trace mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Byte offset of the token in the input.
    pub start: usize,
    pub identifier: String,
    /// `"found"`, `"empty"` or `"undefined"`.
    pub outcome: &'static str,
    /// Text written in place of the token; `None` when the token was kept.
    pub replacement: Option<String>,
}

/// Expands `~{name}` tokens.  Holds no state between calls apart from the
/// trace switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expander {
    trace: bool,
}

impl Expander {
    pub fn new() -> Self {
        Self::default()
    }

    /// An expander that logs every token resolution at DEBUG level.
    pub fn traced() -> Self {
        Self { trace: true }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Expand every token in `text` once.
    pub fn expand_value(&self, text: &str, stack: &ScopeStack) -> Expansion {
        self.run(text, stack, None)
    }

    /// Like [`expand_value`](Self::expand_value), also returning one
    /// [`TraceEvent`] per token.
    pub fn expand_value_traced(&self, text: &str, stack: &ScopeStack) -> (Expansion, Vec<TraceEvent>) {
        let mut events = Vec::new();
        let expansion = self.run(text, stack, Some(&mut events));
        (expansion, events)
    }

    /// Expand the value of `key` in the innermost frame and store the result
    /// back there if anything changed.
    ///
    /// Fails with [`Error::KeyNotInScope`] if the innermost frame does not
    /// define `key`; outer frames are not consulted for the key itself, only
    /// for the tokens inside its value.
    pub fn expand_key(&self, key: &str, stack: &mut ScopeStack) -> Result<bool> {
        let value = stack
            .innermost()
            .get(key)
            .ok_or_else(|| Error::KeyNotInScope { key: key.to_owned() })?;
        if self.trace {
            tracing::debug!(key, "expanding key");
        }
        let expansion = self.expand_value(value, stack);
        if expansion.changed {
            if self.trace {
                tracing::debug!(key, value = %expansion.text, "key updated");
            }
            stack.innermost_mut().set(key, expansion.text);
        }
        Ok(expansion.changed)
    }

    /// Run [`expand_key`](Self::expand_key) on every key of the innermost
    /// frame, in sorted key order.  Returns the keys whose value changed.
    ///
    /// Each key is expanded in its own pass, so a key expanded later sees the
    /// already-rewritten values of keys expanded before it.
    pub fn expand_frame(&self, stack: &mut ScopeStack) -> Result<Vec<String>> {
        let mut changed = Vec::new();
        for key in stack.innermost().names() {
            if self.expand_key(&key, stack)? {
                changed.push(key);
            }
        }
        Ok(changed)
    }

    fn run(&self, text: &str, stack: &ScopeStack, mut events: Option<&mut Vec<TraceEvent>>) -> Expansion {
        if self.trace {
            tracing::debug!(value = text, depth = stack.depth(), "searching value");
        }

        if !token::has_tokens(text) {
            return Expansion {
                changed: false,
                text: text.to_owned(),
                unresolved: Vec::new(),
            };
        }

        let mut out = Expansion {
            changed: false,
            text: String::with_capacity(text.len()),
            unresolved: Vec::new(),
        };
        let mut last = 0;

        for tok in token::scan(text) {
            out.text.push_str(&text[last..tok.start]);
            last = tok.end;

            let resolution = stack.resolve(tok.name);
            let replacement = match resolution {
                Resolution::Found(value) => {
                    out.changed = true;
                    out.text.push_str(value);
                    Some(value)
                }
                Resolution::FoundEmpty => {
                    out.changed = true;
                    Some("")
                }
                Resolution::NotFound => {
                    out.text.push_str(tok.literal);
                    out.unresolved.push(tok.name.to_owned());
                    None
                }
            };

            if self.trace {
                tracing::debug!(
                    identifier = tok.name,
                    outcome = resolution.label(),
                    replacement = replacement.unwrap_or(tok.literal),
                    "token resolved"
                );
            }
            if let Some(events) = events.as_deref_mut() {
                events.push(TraceEvent {
                    start: tok.start,
                    identifier: tok.name.to_owned(),
                    outcome: resolution.label(),
                    replacement: replacement.map(str::to_owned),
                });
            }
        }

        out.text.push_str(&text[last..]);
        out
    }
}

/// Expand `text` against `stack` with a default [`Expander`].
pub fn expand_value(text: &str, stack: &ScopeStack) -> Expansion {
    Expander::new().expand_value(text, stack)
}

/// Expand `key` in the innermost frame of `stack` with a default [`Expander`].
pub fn expand_key(key: &str, stack: &mut ScopeStack) -> Result<bool> {
    Expander::new().expand_key(key, stack)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
