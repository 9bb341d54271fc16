/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of the BASIC language.

Source text becomes a [`Token`](token::Token) stream, and the token stream
becomes an [`Ast`](ast::Ast): a flat arena of statements threaded together
by their "next" links.

*/

/// A BASIC line number. Zero marks a statement entered in immediate mode.
pub type LineNumber = i64;

#[macro_use]
mod error;
mod lex;
mod parse;
mod pattern;

pub mod ast;
pub mod token;

pub use ast::Ast;
pub use error::Error;
pub use error::ErrorCode;
pub use lex::{lex, Extensions};
pub use parse::parse;
pub use pattern::{Grammar, Pattern, Slot};
pub use token::Token;

#[cfg(test)]
mod tests;
