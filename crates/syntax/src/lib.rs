//! Tokens, the token pool and the lexer shared by the markup, inline-style and stylesheet
//! grammars.
//!
//! All three grammars run over the same scanner; they only differ in their entry point
//! (see [`Lexer::markup`], [`Lexer::style`] and [`Lexer::stylesheet`]). Tokens are handed
//! out by a [`TokenPool`] and should be given back with [`Lexer::recycle`] once consumed.

#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod lexer;
mod pool;
mod token;
mod value;

pub use error::LexError;
pub use lexer::{Lexer, Mode};
pub use pool::{DEFAULT_POOL_CAPACITY, PoolStats, TokenPool};
pub use token::{Literal, Token, TokenKind, Unit};
pub use value::{DeclarationMap, Value, classify};
