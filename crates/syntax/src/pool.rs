//! Bounded free-list of tokens.

use crate::token::{Literal, Token, TokenKind, Unit};
use log::trace;

/// Free-list size used when no capacity is configured.
pub const DEFAULT_POOL_CAPACITY: usize = 20;

/// Counters describing how a pool has been used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Tokens created because the free-list was empty.
    pub allocated: usize,
    /// Acquisitions served from the free-list.
    pub reused: usize,
    /// Released tokens kept for reuse.
    pub recycled: usize,
    /// Released tokens dropped because the free-list was full.
    pub discarded: usize,
}

/// A bounded free-list recycling retired tokens.
///
/// The pool is a plain value: a lexer borrows it mutably for the duration of a parse, so
/// one pool serves one parse at a time. Callers parsing on several threads either keep one
/// pool per call or put a shared pool behind a lock.
#[derive(Debug)]
pub struct TokenPool {
    free: Vec<Token>,
    capacity: usize,
    stats: PoolStats,
}

impl Default for TokenPool {
    #[inline]
    fn default() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }
}

impl TokenPool {
    /// Create a pool keeping at most `capacity` idle tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Hand out a token, recycled if one is idle.
    pub fn acquire(
        &mut self,
        kind: TokenKind,
        value: Option<Literal>,
        line: u32,
        column: u32,
    ) -> Token {
        self.acquire_with_extra(kind, value, line, column, None)
    }

    /// Hand out a token carrying a unit tag.
    pub fn acquire_with_extra(
        &mut self,
        kind: TokenKind,
        value: Option<Literal>,
        line: u32,
        column: u32,
        extra: Option<Unit>,
    ) -> Token {
        let mut token = if let Some(idle) = self.free.pop() {
            self.stats.reused = self.stats.reused.saturating_add(1);
            idle
        } else {
            self.stats.allocated = self.stats.allocated.saturating_add(1);
            Token::blank()
        };
        token.kind = kind;
        token.value = value;
        token.line = line;
        token.column = column;
        token.extra = extra;
        token
    }

    /// Give a token back. Its contents are wiped; it is kept only while the free-list has room.
    pub fn release(&mut self, mut token: Token) {
        token.clear();
        if self.free.len() < self.capacity {
            self.free.push(token);
            self.stats.recycled = self.stats.recycled.saturating_add(1);
        } else {
            self.stats.discarded = self.stats.discarded.saturating_add(1);
            trace!("token pool full ({}), dropping token", self.capacity);
        }
    }

    /// Number of idle tokens waiting for reuse.
    #[inline]
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }
}
