use super::Val;

/// What a host statement tells the interpreter to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ok,
    /// Success; stop running as END would.
    End,
    Error(String),
}

/// Interpreter services available to generic statements.
pub trait Context {
    /// The stored program as text.
    fn listing(&self) -> String;
}

/// A keyword whose arguments are rendered to text like PRINT,
/// `PRINT A; "B", C;`
pub trait OutputStatement {
    fn label(&self) -> &str;
    fn execute(&self, text: &str) -> Outcome;
}

/// A keyword whose arguments follow one of several patterns.
///
/// Patterns are written in BASIC. An identifier starting with `I` is
/// an input: it must be a variable, its value is passed in `inputs`,
/// and whatever the statement leaves there is assigned back. Other
/// identifiers are outputs taking any expression. Everything else is
/// matched literally. `execute` receives the index of the pattern used.
pub trait GenericStatement {
    fn label(&self) -> &str;
    fn patterns(&self) -> &[&str];
    fn execute(
        &self,
        context: &dyn Context,
        pattern: usize,
        outputs: &[Val],
        inputs: &mut [Val],
    ) -> Outcome;
}
