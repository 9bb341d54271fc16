//! # BASIC
//!
//! Line-numbered BASIC at the terminal. Type numbered lines to build a
//! program, `RUN` to execute it, `LIST` to see it and `HELP` for the
//! keywords this host understands.

mod term;

fn main() {
    term::main()
}
