/*!
## Rust Machine Module

This Rust module executes BASIC by walking the statement graph
built in [`lang`](crate::lang).

*/

/// Most elements a single array may hold.
pub const MAX_ARRAY_ELEMENTS: usize = 1 << 20;

/// Deepest GOSUB nesting before "Out of memory."
pub const MAX_RETURN_DEPTH: usize = u16::MAX as usize;

mod function;
mod host;
mod listing;
mod operation;
mod runtime;
mod stack;
mod val;
mod var;

pub use function::Function;
pub use host::{Context, GenericStatement, Outcome, OutputStatement};
pub use listing::Listing;
pub use operation::Operation;
pub use runtime::Runtime;
pub use stack::Stack;
pub use val::Val;
pub use var::Var;

#[cfg(test)]
mod tests;
