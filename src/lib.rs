//! # Graph BASIC
//!
//! A line-numbered BASIC interpreter. Source lines are scanned into
//! tokens, stored by line number, and parsed into a graph of statements
//! where every statement knows its successor. Execution walks that graph.
//!
//! The language core knows no I/O. Hosts add keywords to it: an output
//! statement such as PRINT receives rendered text, a generic statement
//! such as INPUT or LIST receives values according to the patterns it
//! declares, and native functions such as RND are called like arrays.
//!
//! ```
//! use basic::mach::{Outcome, OutputStatement, Runtime};
//!
//! struct Print;
//!
//! impl OutputStatement for Print {
//!     fn label(&self) -> &str {
//!         "PRINT"
//!     }
//!     fn execute(&self, text: &str) -> Outcome {
//!         print!("{}", text);
//!         Outcome::Ok
//!     }
//! }
//!
//! let mut runtime = Runtime::new();
//! runtime.add_output_statement(Print).unwrap();
//! runtime.enter(r#"10 PRINT "HELLO""#).unwrap();
//! runtime.enter("RUN").unwrap();
//! assert!(runtime.take_diagnostics().is_empty());
//! ```

pub mod lang;
pub mod mach;
