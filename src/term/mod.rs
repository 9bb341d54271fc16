use ansi_term::Style;
use basic::lang::{Error, ErrorCode};
use basic::mach::{Context, Function, GenericStatement, Outcome, OutputStatement, Runtime, Val};
use linefeed::{Completer, Completion, DefaultTerminal, Interface, Prompter, ReadResult, Terminal};
use rand::Rng;
use std::rc::Rc;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

type Term = Rc<Interface<DefaultTerminal>>;

const PROMPT: &str = "> ";

pub fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if let Err(error) = main_loop() {
        eprintln!("{}", error);
    }
}

fn main_loop() -> std::io::Result<()> {
    let interface: Term = Rc::new(Interface::new("BASIC")?);
    interface.set_prompt(PROMPT)?;
    let mut runtime = Runtime::new();
    if let Err(error) = install(&mut runtime, &interface) {
        report(&interface, &error)?;
    }
    interface.write_fmt(format_args!("BASIC\nType HELP for keywords.\n"))?;

    loop {
        interface.set_completer(Arc::new(LineCompleter::new(&runtime.listing())));
        let line = match interface.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        if line.trim().eq_ignore_ascii_case("HELP") {
            interface.write_fmt(format_args!("{}\n", runtime.keywords().join(" ")))?;
            continue;
        }
        let result = runtime.enter(&line);
        for error in runtime.take_diagnostics() {
            report(&interface, &error)?;
        }
        if let Err(error) = result {
            report(&interface, &error)?;
        }
        if !line.trim().is_empty() {
            interface.add_history_unique(line);
        }
    }
    Ok(())
}

fn install(runtime: &mut Runtime, interface: &Term) -> Result<(), Error> {
    runtime.add_output_statement(Print(interface.clone()))?;
    runtime.add_statement(Input(interface.clone()))?;
    runtime.add_statement(List(interface.clone()))?;
    runtime.add_function("ABS", Abs)?;
    runtime.add_function("INT", Int)?;
    runtime.add_function("LEN", Len)?;
    runtime.add_function("RND", Rnd)?;
    Ok(())
}

fn report(interface: &Term, error: &Error) -> std::io::Result<()> {
    interface.write_fmt(format_args!(
        "{}\n",
        Style::new().bold().paint(error.to_string())
    ))
}

struct Print(Term);

impl OutputStatement for Print {
    fn label(&self) -> &str {
        "PRINT"
    }
    fn execute(&self, text: &str) -> Outcome {
        match self.0.write_fmt(format_args!("{}", text)) {
            Ok(()) => Outcome::Ok,
            Err(error) => Outcome::Error(error.to_string()),
        }
    }
}

struct Input(Term);

impl Input {
    fn read(&self, prompt: &str) -> std::io::Result<Option<String>> {
        self.0.set_prompt(prompt)?;
        let result = self.0.read_line();
        self.0.set_prompt(PROMPT)?;
        match result? {
            ReadResult::Input(text) => Ok(Some(text)),
            ReadResult::Signal(_) | ReadResult::Eof => Ok(None),
        }
    }
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
        let text = match self.read(&prompt) {
            Ok(Some(text)) => text,
            Ok(None) => return Outcome::End,
            Err(error) => return Outcome::Error(error.to_string()),
        };
        inputs[0] = match inputs[0] {
            Val::Integer(_) => match text.trim().parse() {
                Ok(n) => Val::Integer(n),
                Err(_) => return Outcome::Error("Redo from start.".to_string()),
            },
            Val::Float(_) => match text.trim().parse() {
                Ok(n) => Val::Float(n),
                Err(_) => return Outcome::Error("Redo from start.".to_string()),
            },
            _ => Val::String(text.as_str().into()),
        };
        Outcome::Ok
    }
}

struct List(Term);

impl GenericStatement for List {
    fn label(&self) -> &str {
        "LIST"
    }
    fn patterns(&self) -> &[&str] {
        &[""]
    }
    fn execute(&self, context: &dyn Context, _: usize, _: &[Val], _: &mut [Val]) -> Outcome {
        match self.0.write_fmt(format_args!("{}", context.listing())) {
            Ok(()) => Outcome::Ok,
            Err(error) => Outcome::Error(error.to_string()),
        }
    }
}

fn number(val: &Val) -> Result<f64, Error> {
    match val {
        Val::Integer(n) => Ok(*n as f64),
        Val::Float(n) => Ok(*n),
        _ => Err(Error::new(ErrorCode::TypeMismatch)),
    }
}

struct Abs;

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
            val => Ok(Val::Float(number(val)?.abs())),
        }
    }
}

struct Int;

impl Function for Int {
    fn accepts_arity(&self, arity: usize) -> bool {
        arity == 1
    }
    fn call(&self, arguments: &[Val]) -> Result<Val, Error> {
        Ok(Val::Float(number(&arguments[0])?.floor()))
    }
}

struct Len;

impl Function for Len {
    fn accepts_arity(&self, arity: usize) -> bool {
        arity == 1
    }
    fn call(&self, arguments: &[Val]) -> Result<Val, Error> {
        match &arguments[0] {
            Val::String(s) => Ok(Val::Integer(s.chars().count() as i64)),
            _ => Err(Error::new(ErrorCode::TypeMismatch)),
        }
    }
}

/// `RND` is in [0, 1). `RND(N)` scales it by N.
struct Rnd;

impl Function for Rnd {
    fn accepts_arity(&self, arity: usize) -> bool {
        arity <= 1
    }
    fn call(&self, arguments: &[Val]) -> Result<Val, Error> {
        let scale = match arguments.first() {
            Some(val) => number(val)?,
            None => 1.0,
        };
        Ok(Val::Float(rand::thread_rng().gen::<f64>() * scale))
    }
}

/// Tab after a line number brings back the stored text of that line.
struct LineCompleter {
    lines: Vec<(String, String)>,
}

impl LineCompleter {
    fn new(listing: &str) -> LineCompleter {
        let lines = listing
            .lines()
            .filter_map(|line| {
                let number = line.split(' ').next()?;
                Some((number.to_string(), line.to_string()))
            })
            .collect();
        LineCompleter { lines }
    }
}

impl<T: Terminal> Completer<T> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<T>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let buffer = prompter.buffer().trim();
        let (_, line) = self.lines.iter().find(|(number, _)| number == buffer)?;
        let mut completion = Completion::simple(line.clone());
        completion.suffix = linefeed::complete::Suffix::None;
        Some(vec![completion])
    }
}
