use super::Val;
use crate::lang::Error;

/// ## Native functions
///
/// A host installs functions by name before running anything; calls
/// look like array references, `LEN(A$)` or `RND(1)`. A function
/// raising an error without a token gets the call site attached.
pub trait Function {
    fn accepts_arity(&self, arity: usize) -> bool;
    fn call(&self, arguments: &[Val]) -> Result<Val, Error>;
}
