//! Stylesheets: ordered rules of a selector chain plus a declaration map.
//!
//! Rule order is the only precedence: when several rules set the same property on an
//! element, the one appearing later in the sheet wins.

#![forbid(unsafe_code)]

pub mod parser;
pub mod types;

pub use parser::{StylesheetError, parse_stylesheet, parse_stylesheet_from};
pub use types::{Rule, Stylesheet};
