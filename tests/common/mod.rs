#![allow(dead_code)]
use basic::lang::{Error, ErrorCode};
use basic::mach::{Context, Function, GenericStatement, Outcome, OutputStatement, Runtime, Val};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Buffer = Rc<RefCell<String>>;

pub struct Print(Buffer);

impl OutputStatement for Print {
    fn label(&self) -> &str {
        "PRINT"
    }
    fn execute(&self, text: &str) -> Outcome {
        self.0.borrow_mut().push_str(text);
        Outcome::Ok
    }
}

/// Answers come from a queue; prompts are echoed to the buffer.
pub struct Input {
    out: Buffer,
    answers: Rc<RefCell<VecDeque<String>>>,
}

impl GenericStatement for Input {
    fn label(&self) -> &str {
        "INPUT"
    }
    fn patterns(&self) -> &[&str] {
        &["I", "O;I", "O,I"]
    }
    fn execute(
        &self,
        _context: &dyn Context,
        pattern: usize,
        outputs: &[Val],
        inputs: &mut [Val],
    ) -> Outcome {
        let prompt = match pattern {
            0 => "? ".to_string(),
            1 => format!("{}? ", outputs[0]),
            _ => outputs[0].to_string(),
        };
        self.out.borrow_mut().push_str(&prompt);
        let answer = match self.answers.borrow_mut().pop_front() {
            Some(answer) => answer,
            None => return Outcome::Error("No input.".to_string()),
        };
        inputs[0] = match inputs[0] {
            Val::Integer(_) => match answer.trim().parse() {
                Ok(n) => Val::Integer(n),
                Err(_) => return Outcome::Error("Redo from start.".to_string()),
            },
            Val::Float(_) => match answer.trim().parse() {
                Ok(n) => Val::Float(n),
                Err(_) => return Outcome::Error("Redo from start.".to_string()),
            },
            _ => Val::String(answer.as_str().into()),
        };
        Outcome::Ok
    }
}

pub struct List(Buffer);

impl GenericStatement for List {
    fn label(&self) -> &str {
        "LIST"
    }
    fn patterns(&self) -> &[&str] {
        &[""]
    }
    fn execute(&self, context: &dyn Context, _: usize, _: &[Val], _: &mut [Val]) -> Outcome {
        self.0.borrow_mut().push_str(&context.listing());
        Outcome::Ok
    }
}

pub struct Stop;

impl GenericStatement for Stop {
    fn label(&self) -> &str {
        "STOP"
    }
    fn patterns(&self) -> &[&str] {
        &[""]
    }
    fn execute(&self, _: &dyn Context, _: usize, _: &[Val], _: &mut [Val]) -> Outcome {
        Outcome::End
    }
}

pub struct Fail;

impl GenericStatement for Fail {
    fn label(&self) -> &str {
        "FAIL"
    }
    fn patterns(&self) -> &[&str] {
        &["O"]
    }
    fn execute(&self, _: &dyn Context, _: usize, outputs: &[Val], _: &mut [Val]) -> Outcome {
        Outcome::Error(format!("Failed with {}.", outputs[0]))
    }
}

/// Writes 7 to its variable, then fails.
pub struct Trap;

impl GenericStatement for Trap {
    fn label(&self) -> &str {
        "TRAP"
    }
    fn patterns(&self) -> &[&str] {
        &["I"]
    }
    fn execute(&self, _: &dyn Context, _: usize, _: &[Val], inputs: &mut [Val]) -> Outcome {
        inputs[0] = Val::Integer(7);
        Outcome::Error("Trapped.".to_string())
    }
}

pub struct Abs;

impl Function for Abs {
    fn accepts_arity(&self, arity: usize) -> bool {
        arity == 1
    }
    fn call(&self, arguments: &[Val]) -> Result<Val, Error> {
        match &arguments[0] {
            Val::Integer(n) => match n.checked_abs() {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(Error::new(ErrorCode::Overflow)),
            },
            Val::Float(n) => Ok(Val::Float(n.abs())),
            _ => Err(Error::new(ErrorCode::TypeMismatch)),
        }
    }
}

/// Largest of one or more numbers.
pub struct Max;

impl Function for Max {
    fn accepts_arity(&self, arity: usize) -> bool {
        arity > 0
    }
    fn call(&self, arguments: &[Val]) -> Result<Val, Error> {
        let mut max = f64::MIN;
        for argument in arguments {
            match argument {
                Val::Integer(n) => max = max.max(*n as f64),
                Val::Float(n) => max = max.max(*n),
                _ => return Err(Error::new(ErrorCode::TypeMismatch)),
            }
        }
        Ok(Val::Float(max))
    }
}

/// A runtime with test statements installed. Output, diagnostics and
/// runtime errors all land in one buffer.
pub struct Session {
    pub runtime: Runtime,
    out: Buffer,
    answers: Rc<RefCell<VecDeque<String>>>,
}

impl Session {
    pub fn new() -> Session {
        let out: Buffer = Rc::new(RefCell::new(String::new()));
        let answers = Rc::new(RefCell::new(VecDeque::new()));
        let mut runtime = Runtime::new();
        runtime.add_output_statement(Print(out.clone())).unwrap();
        runtime
            .add_statement(Input {
                out: out.clone(),
                answers: answers.clone(),
            })
            .unwrap();
        runtime.add_statement(List(out.clone())).unwrap();
        runtime.add_statement(Stop).unwrap();
        runtime.add_statement(Fail).unwrap();
        runtime.add_statement(Trap).unwrap();
        runtime.add_function("ABS", Abs).unwrap();
        runtime.add_function("MAX", Max).unwrap();
        Session {
            runtime,
            out,
            answers,
        }
    }

    pub fn enter(&mut self, line: &str) {
        let result = self.runtime.enter(line);
        let mut out = self.out.borrow_mut();
        for error in self.runtime.take_diagnostics() {
            out.push_str(&format!("{}\n", error));
        }
        if let Err(error) = result {
            out.push_str(&format!("{}\n", error));
        }
    }

    pub fn answer(&mut self, text: &str) {
        self.answers.borrow_mut().push_back(text.to_string());
    }
}

pub fn exec(session: &mut Session) -> String {
    session.out.replace(String::new())
}
