//! Product query filter system
//!
//! Typed predicates (`Predicate`, `CompareOp`), query-string parsing and
//! the chainable `ProductQuery` builder used by product listings.

mod builder;
mod parser;
mod types;

pub use builder::{PageWindow, ProductQuery};
pub use parser::{RESERVED_KEYS, is_reserved, parse_filter_params, parse_page, parse_predicate};
pub use types::{CompareOp, Predicate, ProductField, SqlParams, SqlValue};
