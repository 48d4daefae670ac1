//! Scope frames and the scope stack.
//!
//! A [`Frame`] holds the plain string definitions of one configuration
//! nesting level (cluster, daemon, sampler, …).  A [`ScopeStack`] orders
//! frames from the global frame at index 0 to the innermost frame at the
//! top; lookups walk it from the top down, so an inner definition shadows
//! any outer one.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};

// ── Frame ─────────────────────────────────────────────────────────────────────

/// One scope frame: name → string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    vars: HashMap<String, String>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a definition.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Get the value of a definition.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Remove a definition.  Returns `true` if it existed.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    /// Returns `true` if the frame defines `name` (even as an empty string).
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate over all definitions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All defined names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vars.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Frame {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Frame {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Outcome of looking a name up on a [`ScopeStack`].
///
/// `FoundEmpty` and `NotFound` both leave nothing to substitute, but they are
/// not interchangeable: an empty definition deletes its token, an undefined
/// name leaves the token in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(&'a str),
    FoundEmpty,
    NotFound,
}

impl Resolution<'_> {
    /// Short label used in trace output.
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Found(_) => "found",
            Resolution::FoundEmpty => "empty",
            Resolution::NotFound => "undefined",
        }
    }
}

// ── ScopeStack ────────────────────────────────────────────────────────────────

/// Ordered stack of frames.  Always holds at least the global frame.
///
/// The stack belongs to whoever drives a configuration traversal; the
/// expansion functions only borrow it for the duration of one call.  It does
/// no locking of its own, so share it between threads only behind an
/// external lock (or give each traversal its own stack).
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only an empty global frame.
    pub fn new() -> Self {
        Self::with_global(Frame::new())
    }

    /// A stack whose global frame is `global`.
    pub fn with_global(global: Frame) -> Self {
        Self { frames: vec![global] }
    }

    /// Push `frame` as the new innermost scope.  Its contents are not checked.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
        tracing::trace!(depth = self.frames.len(), "scope pushed");
    }

    /// Remove and return the innermost scope.
    ///
    /// Fails with [`Error::ImbalancedScope`] when only the global frame is
    /// left; the global frame is never popped.
    pub fn pop(&mut self) -> Result<Frame> {
        if self.frames.len() <= 1 {
            return Err(Error::ImbalancedScope);
        }
        let frame = self.frames.pop().ok_or(Error::ImbalancedScope)?;
        tracing::trace!(depth = self.frames.len(), "scope popped");
        Ok(frame)
    }

    /// Push `frame` and return a guard that pops it again when dropped.
    pub fn scoped(&mut self, frame: Frame) -> ScopeGuard<'_> {
        self.push(frame);
        let depth = self.frames.len();
        ScopeGuard { stack: self, depth }
    }

    /// Look `name` up from the innermost frame outwards.
    ///
    /// The first frame that defines `name` decides the outcome, even if an
    /// outer frame has a non-empty value for it.
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.get(name) {
                return if value.is_empty() {
                    Resolution::FoundEmpty
                } else {
                    Resolution::Found(value)
                };
            }
        }
        Resolution::NotFound
    }

    /// Number of frames, including the global frame.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn global(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn innermost(&self) -> &Frame {
        // `frames` is never empty: `pop` refuses to remove the global frame.
        &self.frames[self.frames.len() - 1]
    }

    pub fn innermost_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

// ── ScopeGuard ────────────────────────────────────────────────────────────────

/// Pops the frame pushed by [`ScopeStack::scoped`] when dropped.
///
/// Dereferences to the stack, so nested sections can push their own guards.
/// Frames pushed through the guard and not popped are unwound as well.
#[derive(Debug)]
pub struct ScopeGuard<'s> {
    stack: &'s mut ScopeStack,
    depth: usize,
}

impl Deref for ScopeGuard<'_> {
    type Target = ScopeStack;

    fn deref(&self) -> &ScopeStack {
        self.stack
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut ScopeStack {
        self.stack
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let keep = self.depth.saturating_sub(1).max(1);
        self.stack.frames.truncate(keep);
        tracing::trace!(depth = self.stack.frames.len(), "scope guard released");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
