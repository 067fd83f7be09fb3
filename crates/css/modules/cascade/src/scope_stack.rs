//! Depth-tagged stack of rule scopes opened by ancestors of the element being visited.

use core::{fmt, mem};
use core::ops::{Deref, DerefMut};
use log::trace;

/// Initial entry capacity used when none is configured.
pub const DEFAULT_SCOPE_CAPACITY: usize = 50;

/// A rule matched at `depth`, visible to every element below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeEntry {
    pub depth: usize,
    /// Index of the rule in the stylesheet being resolved.
    pub rule: usize,
}

/// Growable stack of [`ScopeEntry`] with a push count per depth.
///
/// Entries are only ever pushed at the current depth, and [`ScopeStack::enter`] returns a
/// guard that pops exactly those entries when it is dropped. No entry tagged deeper than
/// the current depth can therefore exist.
#[derive(Clone, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
    /// `pushed[d]` is the number of entries pushed at depth `d`; index 0 is unused.
    pushed: Vec<usize>,
    depth: usize,
}

impl ScopeStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            pushed: Vec::with_capacity(capacity),
            depth: 0,
        }
    }

    /// Descend one level. The returned guard restores the current state when dropped.
    pub fn enter(&mut self) -> ScopeGuard<'_> {
        self.depth = self.depth.saturating_add(1);
        if self.pushed.len() <= self.depth {
            self.pushed.resize(self.depth.saturating_add(1), 0);
        }
        if let Some(count) = self.pushed.get_mut(self.depth) {
            *count = 0;
        }
        ScopeGuard { stack: self }
    }

    /// Open a scope for `rule` at the current depth.
    pub fn push(&mut self, rule: usize) {
        self.entries.push(ScopeEntry {
            depth: self.depth,
            rule,
        });
        if let Some(count) = self.pushed.get_mut(self.depth) {
            *count = count.saturating_add(1);
        }
    }

    fn leave(&mut self) {
        let count = self
            .pushed
            .get_mut(self.depth)
            .map_or(0, mem::take);
        let keep = self.entries.len().saturating_sub(count);
        debug_assert!(
            self.entries
                .get(keep..)
                .is_none_or(|popped| popped.iter().all(|entry| entry.depth == self.depth)),
            "scope entries popped from the wrong depth"
        );
        self.entries.truncate(keep);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Entries opened by the current element's ancestors (and by the element itself once
    /// it has pushed), outermost first.
    #[inline]
    pub fn active(&self) -> &[ScopeEntry] {
        &self.entries
    }

    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no scope is open: depth 0, no entries, no pending push counts.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && self.entries.is_empty() && self.pushed.iter().all(|&count| count == 0)
    }

    /// Log the open scopes at trace level.
    pub fn trace_dump(&self, label: &str) {
        trace!("{label}: {self:?}");
    }
}

impl fmt::Debug for ScopeStack {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "ScopeStack(depth {})[", self.depth)?;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{}@{}", entry.rule, entry.depth)?;
        }
        formatter.write_str("]")
    }
}

/// Open level of a [`ScopeStack`]; dropping it pops the entries pushed at its depth.
pub struct ScopeGuard<'stack> {
    stack: &'stack mut ScopeStack,
}

impl Deref for ScopeGuard<'_> {
    type Target = ScopeStack;

    #[inline]
    fn deref(&self) -> &ScopeStack {
        self.stack
    }
}

impl DerefMut for ScopeGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut ScopeStack {
        self.stack
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.stack.leave();
    }
}
