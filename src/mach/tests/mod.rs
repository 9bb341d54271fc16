use crate::mach::{Outcome, OutputStatement, Runtime};
use std::cell::RefCell;
use std::rc::Rc;

mod data_test;
mod gosub_test;

struct Capture(Rc<RefCell<String>>);

impl OutputStatement for Capture {
    fn label(&self) -> &str {
        "PRINT"
    }
    fn execute(&self, text: &str) -> Outcome {
        self.0.borrow_mut().push_str(text);
        Outcome::Ok
    }
}

/// A runtime whose PRINT and error text land in one buffer.
struct Session {
    runtime: Runtime,
    out: Rc<RefCell<String>>,
}

impl Session {
    fn new() -> Session {
        let out = Rc::new(RefCell::new(String::new()));
        let mut runtime = Runtime::new();
        runtime.add_output_statement(Capture(out.clone())).unwrap();
        Session { runtime, out }
    }

    fn enter(&mut self, line: &str) {
        let result = self.runtime.enter(line);
        let mut out = self.out.borrow_mut();
        for error in self.runtime.take_diagnostics() {
            out.push_str(&format!("{}\n", error));
        }
        if let Err(error) = result {
            out.push_str(&format!("{}\n", error));
        }
    }
}

fn exec(s: &mut Session) -> String {
    s.out.replace(String::new())
}
