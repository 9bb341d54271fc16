use super::token::{Literal, Token};
use super::{Error, LineNumber};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Handle of a statement inside its [`Ast`].
pub type StmtId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary(Box<Expression>, Token, Box<Expression>),
    Grouping(Box<Expression>),
    Literal(Literal),
    Unary(Token, Box<Expression>),
    Variable(Variable),
}

/// A scalar, an array element, or a function call. Which one is
/// decided at runtime by what the name is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Token,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub token: Token,
    pub variable: Variable,
    pub start: Expression,
    pub target: Expression,
    pub step: Expression,
    pub body: StmtId,
    pub next_node: StmtId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign(Variable, Expression),
    Dim(Vec<Variable>),
    End,
    For(For),
    Gosub(Token, Expression),
    Goto(Token, Expression),
    Host(Token, usize, Vec<Expression>),
    If(Token, Expression, Vec<StmtId>, Vec<StmtId>),
    Let(Variable, Expression),
    New,
    /// Loop test belonging to the FOR statement it names.
    Next(StmtId),
    Noop,
    On(Token, Expression, Token, Vec<Expression>),
    Print(Token, Vec<Expression>, bool),
    Read(Vec<Variable>),
    Return(Token),
    Run,
}

#[derive(Debug)]
struct Node {
    statement: Statement,
    next: Option<StmtId>,
}

/// ## Statement graph
///
/// Statements live in an append-only arena and refer to each other by
/// [`StmtId`]. Each one has a single "next" link, assigned once while
/// parsing; `None` ends execution. A FOR body's last statement links to
/// the loop's [`Statement::Next`] node, which decides at runtime whether
/// to jump back to the body.
///
/// The DATA table is every DATA literal in ascending line order. READ
/// consumes it strictly forward through a cursor owned by the graph.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    statements: Vec<StmtId>,
    index: HashMap<LineNumber, StmtId>,
    data: Vec<Rc<str>>,
    data_pointer: Cell<usize>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast::default()
    }

    /// Entry point of execution.
    pub fn first(&self) -> Option<StmtId> {
        self.statements.first().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: StmtId) -> &Statement {
        &self.nodes[id].statement
    }

    pub fn next(&self, id: StmtId) -> Option<StmtId> {
        self.nodes[id].next
    }

    pub fn statement_at(&self, line_number: LineNumber) -> Result<StmtId, Error> {
        match self.index.get(&line_number) {
            Some(id) => Ok(*id),
            None => Err(error!(InvalidLabel)),
        }
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn next_data_literal(&self) -> Result<Rc<str>, Error> {
        let pointer = self.data_pointer.get();
        match self.data.get(pointer) {
            Some(literal) => {
                self.data_pointer.set(pointer + 1);
                Ok(literal.clone())
            }
            None => Err(error!(OutOfData)),
        }
    }

    pub(super) fn push(&mut self, statement: Statement) -> StmtId {
        self.nodes.push(Node {
            statement,
            next: None,
        });
        self.nodes.len() - 1
    }

    pub(super) fn push_top(&mut self, id: StmtId) {
        self.statements.push(id);
    }

    pub(super) fn index_line(&mut self, line_number: LineNumber, id: StmtId) {
        self.index.insert(line_number, id);
    }

    pub(super) fn set_data(&mut self, data: BTreeMap<LineNumber, Vec<Rc<str>>>) {
        self.data = data.into_values().flatten().collect();
        self.data_pointer.set(0);
    }

    /// Make `to` the successor of `from`. An IF hands the same successor
    /// to the tail of each branch, and a FOR hands it to its NEXT node.
    pub(super) fn link(&mut self, from: StmtId, to: StmtId) {
        self.nodes[from].next = Some(to);
        let mut tails = vec![];
        match &self.nodes[from].statement {
            Statement::If(_, _, then, otherwise) => {
                tails.extend(then.last());
                tails.extend(otherwise.last());
            }
            Statement::For(f) => tails.push(f.next_node),
            _ => {}
        }
        for tail in tails {
            self.link(tail, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::token::Kind;

    #[test]
    fn test_data_cursor() {
        let mut ast = Ast::new();
        let mut data = BTreeMap::new();
        data.insert(20, vec!["3".into()]);
        data.insert(10, vec!["1".into(), "2".into()]);
        ast.set_data(data);
        assert_eq!(ast.data_len(), 3);
        assert_eq!(&*ast.next_data_literal().unwrap(), "1");
        assert_eq!(&*ast.next_data_literal().unwrap(), "2");
        assert_eq!(&*ast.next_data_literal().unwrap(), "3");
        assert_eq!(ast.next_data_literal().unwrap_err().to_string(), "Error: Out of data.");
    }

    #[test]
    fn test_if_tails_get_successor() {
        let mut ast = Ast::new();
        let a = ast.push(Statement::Noop);
        let b = ast.push(Statement::Noop);
        let token = Token::new(Kind::If, "IF", Literal::None, 0);
        let cond = Expression::Literal(Literal::Integer(1));
        let i = ast.push(Statement::If(token, cond, vec![a], vec![b]));
        let end = ast.push(Statement::End);
        ast.link(i, end);
        assert_eq!(ast.next(a), Some(end));
        assert_eq!(ast.next(b), Some(end));
        assert_eq!(ast.next(end), None);
        assert!(ast.statement_at(10).is_err());
    }
}
