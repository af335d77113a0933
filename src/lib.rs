//! phrasegen — randomized phrase generation from small template grammars.
//!
//! A generator definition names pools of template strings and a few
//! user-editable variables. Each render draws from the pools without
//! repetition, recursively resolves pool references from the `main` pool,
//! and substitutes variable values into plain or decorated (HTML) text.

pub mod core;
pub mod ingest;
pub mod publish;
pub mod schema;
