use super::{
    Context, Function, GenericStatement, Listing, Operation, Outcome, OutputStatement, Stack, Val,
    Var,
};
use crate::error;
use crate::lang::ast::{Ast, Expression, For, Statement, StmtId, Variable};
use crate::lang::token::{Kind, Literal, Token};
use crate::lang::{lex, parse, Error, Grammar, LineNumber, Slot};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::convert::TryFrom;
use std::rc::Rc;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, Error>;

/// A statement in some graph. Immediate commands and the stored
/// program are separate graphs, so a GOSUB from the command line
/// returns into the command line.
#[derive(Clone)]
struct Cursor {
    ast: Rc<Ast>,
    id: StmtId,
}

impl Cursor {
    fn new(ast: &Rc<Ast>, id: Option<StmtId>) -> Option<Cursor> {
        id.map(|id| Cursor {
            ast: Rc::clone(ast),
            id,
        })
    }
}

/// ## Interpreter session
///
/// Lines are given to [`Runtime::enter`] one at a time. A line starting
/// with a number is stored in the listing; anything else runs at once.
/// `RUN` parses the listing into a fresh statement graph and executes it.
///
/// ```
/// use basic::mach::{Outcome, OutputStatement, Runtime};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// struct Print(Rc<RefCell<String>>);
///
/// impl OutputStatement for Print {
///     fn label(&self) -> &str {
///         "PRINT"
///     }
///     fn execute(&self, text: &str) -> Outcome {
///         self.0.borrow_mut().push_str(text);
///         Outcome::Ok
///     }
/// }
///
/// let out = Rc::new(RefCell::new(String::new()));
/// let mut runtime = Runtime::new();
/// runtime.add_output_statement(Print(out.clone())).unwrap();
/// runtime.enter("10 FOR I = 1 TO 3: PRINT I: NEXT").unwrap();
/// runtime.enter("RUN").unwrap();
/// assert_eq!(*out.borrow(), "1\n2\n3\n");
/// ```
pub struct Runtime {
    listing: Listing,
    grammar: Grammar,
    ast: Rc<Ast>,
    vars: Var,
    return_stack: Stack<Option<Cursor>>,
    output: HashMap<String, Rc<dyn OutputStatement>>,
    generic: HashMap<String, Rc<dyn GenericStatement>>,
    functions: BTreeMap<String, Rc<dyn Function>>,
    diagnostics: Vec<Error>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime {
            listing: Listing::default(),
            grammar: Grammar::new(),
            ast: Rc::new(Ast::new()),
            vars: Var::new(),
            return_stack: Stack::new("Out of memory."),
            output: HashMap::new(),
            generic: HashMap::new(),
            functions: BTreeMap::new(),
            diagnostics: vec![],
        }
    }
}

impl Context for Runtime {
    fn listing(&self) -> String {
        self.listing.to_string()
    }
}

impl Runtime {
    pub fn new() -> Runtime {
        Runtime::default()
    }

    /// Store a numbered line or execute anything else.
    ///
    /// Scan and parse problems are not returned; they go to the
    /// diagnostic log, see [`Runtime::take_diagnostics`]. The error
    /// returned is the runtime failure that halted execution.
    pub fn enter(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let (tokens, errors) = lex(line, self.grammar.extensions());
        if !errors.is_empty() {
            self.diagnostics.extend(errors);
            return Ok(());
        }
        let (ast, errors) = parse(&tokens, &self.grammar);
        if tokens[0].kind == Kind::Number {
            self.store(tokens, errors);
            return Ok(());
        }
        if !errors.is_empty() {
            self.diagnostics.extend(errors);
            return Ok(());
        }
        let ast = Rc::new(ast);
        let result = self.execute(Cursor::new(&ast, ast.first()));
        if let Err(e) = &result {
            debug!(error = %e, "halted");
        }
        result
    }

    fn store(&mut self, mut tokens: Vec<Token>, errors: Vec<Error>) {
        let line_number = match tokens[0].literal {
            Literal::Integer(n) if n >= 1 => n,
            _ => {
                self.diagnostics
                    .push(error!(SyntaxError; "Bad line number."));
                return;
            }
        };
        // A line may open a FOR that a later line closes.
        let errors: Vec<Error> = errors.into_iter().filter(|e| !e.is_block()).collect();
        if !errors.is_empty() {
            self.diagnostics.extend(errors);
            return;
        }
        if tokens.len() == 2 {
            self.listing.remove(line_number);
            debug!(line_number, "deleted line");
            return;
        }
        if let Some(eof) = tokens.last_mut() {
            eof.kind = Kind::NewLine;
            eof.lexeme = "\n".into();
        }
        self.listing.insert(line_number, tokens);
        debug!(line_number, "stored line");
    }

    /// Diagnostics collected since the last call, oldest first.
    pub fn take_diagnostics(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn listing(&self) -> String {
        self.listing.to_string()
    }

    pub fn listing_line(&self, line_number: LineNumber) -> Option<String> {
        self.listing.line(line_number)
    }

    /// Everything a program may start a statement or call with: fixed
    /// keywords, host statements, and native functions. Sorted.
    pub fn keywords(&self) -> Vec<String> {
        let mut words: BTreeSet<String> = Kind::fixed_keywords().map(String::from).collect();
        words.extend(self.grammar.labels().map(String::from));
        words.extend(self.functions.keys().cloned());
        words.into_iter().collect()
    }

    pub fn add_output_statement<T: OutputStatement + 'static>(
        &mut self,
        statement: T,
    ) -> Result<()> {
        let label = match self.grammar.add_output(statement.label()) {
            Ok(label) => label,
            Err(e) => {
                warn!(label = statement.label(), error = %e, "rejected output statement");
                return Err(e);
            }
        };
        self.generic.remove(&label);
        self.output.insert(label, Rc::new(statement));
        Ok(())
    }

    pub fn add_statement<T: GenericStatement + 'static>(&mut self, statement: T) -> Result<()> {
        let label = match self.grammar.add_generic(statement.label(), statement.patterns()) {
            Ok(label) => label,
            Err(e) => {
                warn!(label = statement.label(), error = %e, "rejected statement");
                return Err(e);
            }
        };
        self.output.remove(&label);
        self.generic.insert(label, Rc::new(statement));
        Ok(())
    }

    /// Bind a native function to a name. The name must scan as a plain
    /// identifier, so keywords and host statements are refused.
    pub fn add_function<T: Function + 'static>(&mut self, name: &str, function: T) -> Result<()> {
        let name = name.to_ascii_uppercase();
        let (tokens, errors) = lex(&name, self.grammar.extensions());
        if !errors.is_empty() || tokens.len() != 2 || tokens[0].kind != Kind::Identifier {
            warn!(name = %name, "rejected function");
            let msg = format!("Invalid function name '{}'.", name);
            return Err(error!(InternalError; &msg));
        }
        let function: Rc<dyn Function> = Rc::new(function);
        self.vars.define_function(&name, Rc::clone(&function));
        self.functions.insert(name, function);
        Ok(())
    }

    fn reset(&mut self) {
        self.vars.clear();
        for (name, function) in self.functions.iter() {
            self.vars.define_function(name, Rc::clone(function));
        }
        self.return_stack.clear();
    }

    fn execute(&mut self, mut cursor: Option<Cursor>) -> Result<()> {
        while let Some(current) = cursor {
            cursor = self.step(current)?;
        }
        Ok(())
    }

    fn step(&mut self, cursor: Cursor) -> Result<Option<Cursor>> {
        let ast = cursor.ast;
        let follow = Cursor::new(&ast, ast.next(cursor.id));
        match ast.get(cursor.id) {
            Statement::Assign(var, expr) | Statement::Let(var, expr) => {
                let value = self.evaluate(expr)?;
                self.assign(var, value)?;
                Ok(follow)
            }
            Statement::Dim(vars) => {
                for var in vars {
                    let bounds = self.subscripts(var)?;
                    self.vars
                        .define(&var.name.lexeme, &bounds)
                        .map_err(|e| e.or_token(&var.name))?;
                }
                Ok(follow)
            }
            Statement::End => Ok(None),
            Statement::For(f) => self.r#for(&ast, f),
            Statement::Gosub(token, expr) => {
                let target = self.destination(token, expr)?;
                self.return_stack
                    .push(follow)
                    .map_err(|e| e.or_token(token))?;
                Ok(Some(target))
            }
            Statement::Goto(token, expr) => Ok(Some(self.destination(token, expr)?)),
            Statement::Host(token, pattern, exprs) => self.r#host(token, *pattern, exprs, follow),
            Statement::If(token, condition, then, otherwise) => {
                let value = self.evaluate(condition)?;
                let truth = value.is_true().map_err(|e| e.or_token(token))?;
                let branch = if truth { then } else { otherwise };
                match branch.first() {
                    Some(first) => Ok(Cursor::new(&ast, Some(*first))),
                    None => Ok(follow),
                }
            }
            Statement::New => {
                self.listing.clear();
                self.reset();
                self.ast = Rc::new(Ast::new());
                debug!("cleared program");
                Ok(None)
            }
            Statement::Next(for_id) => self.r#next(&ast, *for_id),
            Statement::Noop => Ok(follow),
            Statement::On(token, selector, keyword, targets) => {
                let selector = self.evaluate(selector)?;
                let index = i64::try_from(selector).map_err(|e| e.or_token(token))?;
                if index < 1 || index as usize > targets.len() {
                    return Ok(follow);
                }
                let target = self.destination(token, &targets[index as usize - 1])?;
                if keyword.kind == Kind::Gosub {
                    self.return_stack
                        .push(follow)
                        .map_err(|e| e.or_token(token))?;
                }
                Ok(Some(target))
            }
            Statement::Print(token, items, newline) => self.r#print(token, items, *newline, follow),
            Statement::Read(vars) => {
                for var in vars {
                    self.r#read(var)?;
                }
                Ok(follow)
            }
            Statement::Return(token) => {
                if self.return_stack.is_empty() {
                    return Err(error!(ReturnWithoutGosub, token));
                }
                trace!(depth = self.return_stack.len(), "return");
                self.return_stack.pop().map_err(|e| e.or_token(token))
            }
            Statement::Run => self.r#run(),
        }
    }

    fn r#run(&mut self) -> Result<Option<Cursor>> {
        self.reset();
        let tokens = self.listing.tokens();
        let (ast, errors) = parse(&tokens, &self.grammar);
        debug!(
            lines = self.listing.len(),
            statements = ast.len(),
            data = ast.data_len(),
            "parsed program"
        );
        self.ast = Rc::new(ast);
        if !errors.is_empty() {
            self.diagnostics.extend(errors);
            return Ok(None);
        }
        Ok(Cursor::new(&self.ast, self.ast.first()))
    }

    /// GOTO and GOSUB targets always refer to the stored program.
    fn destination(&mut self, token: &Token, expr: &Expression) -> Result<Cursor> {
        let value = self.evaluate(expr)?;
        let line_number = match i64::try_from(value) {
            Ok(n) => n,
            Err(_) => return Err(error!(InvalidLabel, token)),
        };
        let id = self
            .ast
            .statement_at(line_number)
            .map_err(|e| e.or_token(token))?;
        trace!(keyword = %token.lexeme, line_number, "transfer");
        Ok(Cursor {
            ast: Rc::clone(&self.ast),
            id,
        })
    }

    fn r#for(&mut self, ast: &Rc<Ast>, f: &For) -> Result<Option<Cursor>> {
        let start = self.evaluate(&f.start)?;
        let step = self.evaluate(&f.step)?;
        let target = self.evaluate(&f.target)?;
        self.assign(&f.variable, start.clone())?;
        self.loop_test(ast, f, start, target, step)
    }

    fn r#next(&mut self, ast: &Rc<Ast>, for_id: StmtId) -> Result<Option<Cursor>> {
        let f = match ast.get(for_id) {
            Statement::For(f) => f,
            _ => return Err(error!(InternalError; "NEXT without FOR node.")),
        };
        let step = self.evaluate(&f.step)?;
        let current = self.variable(&f.variable)?;
        let value = Operation::sum(current, step.clone()).map_err(|e| e.or_token(&f.token))?;
        let target = self.evaluate(&f.target)?;
        self.assign(&f.variable, value.clone())?;
        self.loop_test(ast, f, value, target, step)
    }

    /// Zero-trip loops are allowed: the test runs before the body.
    fn loop_test(
        &mut self,
        ast: &Rc<Ast>,
        f: &For,
        value: Val,
        target: Val,
        step: Val,
    ) -> Result<Option<Cursor>> {
        let done = Runtime::loop_done(&value, &target, &step).map_err(|e| e.or_token(&f.token))?;
        if done {
            Ok(Cursor::new(ast, ast.next(f.next_node)))
        } else {
            Ok(Cursor::new(ast, Some(f.body)))
        }
    }

    fn loop_done(value: &Val, target: &Val, step: &Val) -> Result<bool> {
        let zero = Val::Integer(0);
        let greater = |lhs: &Val, rhs: &Val| -> Result<bool> {
            Operation::greater(lhs.clone(), rhs.clone())?.is_true()
        };
        let less = |lhs: &Val, rhs: &Val| -> Result<bool> {
            Operation::less(lhs.clone(), rhs.clone())?.is_true()
        };
        if greater(step, &zero)? {
            return greater(value, target);
        }
        if less(step, &zero)? {
            return less(value, target);
        }
        Ok(false)
    }

    fn r#print(
        &mut self,
        token: &Token,
        items: &[Expression],
        newline: bool,
        follow: Option<Cursor>,
    ) -> Result<Option<Cursor>> {
        let mut text = String::new();
        for item in items {
            text.push_str(&self.evaluate(item)?.to_string());
        }
        if newline {
            text.push('\n');
        }
        let handler = match self.output.get(&*token.lexeme) {
            Some(handler) => Rc::clone(handler),
            None => return Err(error!(HostError, token; "No handler for statement.")),
        };
        let outcome = handler.execute(&text);
        Runtime::outcome(token, outcome, follow)
    }

    fn r#host(
        &mut self,
        token: &Token,
        pattern: usize,
        expressions: &[Expression],
        follow: Option<Cursor>,
    ) -> Result<Option<Cursor>> {
        let handler = match self.generic.get(&*token.lexeme) {
            Some(handler) => Rc::clone(handler),
            None => return Err(error!(HostError, token; "No handler for statement.")),
        };
        let slots: Vec<Slot> = match self
            .grammar
            .patterns(&token.lexeme)
            .and_then(|p| p.get(pattern))
        {
            Some(p) => p.placeholders().cloned().collect(),
            None => return Err(error!(InternalError, token; "Unknown pattern.")),
        };
        let mut outputs = vec![];
        let mut targets: Vec<(&Variable, Vec<i64>)> = vec![];
        for (slot, expr) in slots.iter().zip(expressions) {
            match (slot, expr) {
                (Slot::Input, Expression::Variable(var)) => {
                    let indices = self.subscripts(var)?;
                    targets.push((var, indices));
                }
                (Slot::Input, _) => {
                    return Err(error!(InternalError, token; "Expected variable."));
                }
                _ => outputs.push(self.evaluate(expr)?),
            }
        }
        let mut inputs = vec![];
        for (var, indices) in targets.iter() {
            let value = self
                .vars
                .get(&var.name.lexeme, indices)
                .map_err(|e| e.or_token(&var.name))?;
            inputs.push(value);
        }
        let outcome = handler.execute(&*self, pattern, &outputs, &mut inputs);
        for ((var, indices), value) in targets.iter().zip(inputs) {
            self.vars
                .assign(&var.name.lexeme, indices, value)
                .map_err(|e| e.or_token(&var.name))?;
        }
        Runtime::outcome(token, outcome, follow)
    }

    fn outcome(token: &Token, outcome: Outcome, follow: Option<Cursor>) -> Result<Option<Cursor>> {
        match outcome {
            Outcome::Ok => Ok(follow),
            Outcome::End => Ok(None),
            Outcome::Error(msg) => Err(error!(HostError, token; &msg)),
        }
    }

    /// DATA literals are text; the variable's type decides how to read one.
    fn r#read(&mut self, var: &Variable) -> Result<()> {
        let text = self
            .ast
            .next_data_literal()
            .map_err(|e| e.or_token(&var.name))?;
        let indices = self.subscripts(var)?;
        let current = self
            .vars
            .get(&var.name.lexeme, &indices)
            .map_err(|e| e.or_token(&var.name))?;
        let mismatch = || {
            let msg = format!("Type mismatch reading data '{}'.", text);
            error!(TypeMismatch, &var.name; &msg)
        };
        let value = match current {
            Val::Integer(_) => Val::Integer(text.trim().parse().map_err(|_| mismatch())?),
            Val::Float(_) => Val::Float(text.trim().parse().map_err(|_| mismatch())?),
            Val::String(_) => Val::String(Rc::clone(&text)),
            Val::Function(_) => return Err(mismatch()),
        };
        self.vars
            .assign(&var.name.lexeme, &indices, value)
            .map_err(|e| e.or_token(&var.name))
    }

    fn evaluate(&mut self, expr: &Expression) -> Result<Val> {
        match expr {
            Expression::Literal(literal) => Val::try_from(literal),
            Expression::Grouping(expr) => self.evaluate(expr),
            Expression::Unary(op, expr) => {
                let value = self.evaluate(expr)?;
                let result = match op.kind {
                    Kind::Minus => Operation::negate(value),
                    Kind::Not => Operation::not(value),
                    _ => Err(error!(InternalError; "Unknown unary operator.")),
                };
                result.map_err(|e| e.or_token(op))
            }
            Expression::Binary(lhs, op, rhs) => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                Operation::binary(op.kind, lhs, rhs).map_err(|e| e.or_token(op))
            }
            Expression::Variable(var) => self.variable(var),
        }
    }

    fn variable(&mut self, var: &Variable) -> Result<Val> {
        if let Some(function) = self.vars.function(&var.name.lexeme) {
            let arity = var.arguments.len();
            if !function.accepts_arity(arity) {
                let msg = format!("Invalid arity: {}.", arity);
                return Err(error!(InvalidArity, &var.name; &msg));
            }
            let mut arguments = Vec::with_capacity(arity);
            for arg in &var.arguments {
                arguments.push(self.evaluate(arg)?);
            }
            return function
                .call(&arguments)
                .map_err(|e| e.or_token(&var.name));
        }
        let indices = self.subscripts(var)?;
        self.vars
            .get(&var.name.lexeme, &indices)
            .map_err(|e| e.or_token(&var.name))
    }

    fn subscripts(&mut self, var: &Variable) -> Result<Vec<i64>> {
        let mut indices = Vec::with_capacity(var.arguments.len());
        for arg in &var.arguments {
            let value = self.evaluate(arg)?;
            indices.push(i64::try_from(value).map_err(|e| e.or_token(&var.name))?);
        }
        Ok(indices)
    }

    fn assign(&mut self, var: &Variable, value: Val) -> Result<()> {
        let indices = self.subscripts(var)?;
        self.vars
            .assign(&var.name.lexeme, &indices, value)
            .map_err(|e| e.or_token(&var.name))
    }
}
