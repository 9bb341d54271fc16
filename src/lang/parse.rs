use super::ast::*;
use super::pattern::{Grammar, Slot};
use super::token::{Kind, Literal, Token};
use super::{Error, LineNumber};
use std::collections::BTreeMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Build a statement graph from tokens ending in [`Kind::Eof`].
/// A statement that fails to parse becomes a no-op and its error is
/// returned alongside the graph, so the rest of the program is still
/// checked.
pub fn parse(tokens: &[Token], grammar: &Grammar) -> (Ast, Vec<Error>) {
    Parser::parse(tokens, grammar)
}

struct Parser<'a> {
    tokens: &'a [Token],
    grammar: &'a Grammar,
    current: usize,
    line_number: LineNumber,
    ast: Ast,
    errors: Vec<Error>,
    data: BTreeMap<LineNumber, Vec<Rc<str>>>,
    pending_lines: Vec<LineNumber>,
    pending_stack: Vec<Vec<LineNumber>>,
    for_depth: usize,
}

impl<'a> Parser<'a> {
    fn parse(tokens: &'a [Token], grammar: &'a Grammar) -> (Ast, Vec<Error>) {
        let mut parse = Parser {
            tokens,
            grammar,
            current: 0,
            line_number: 0,
            ast: Ast::new(),
            errors: vec![],
            data: BTreeMap::new(),
            pending_lines: vec![],
            pending_stack: vec![],
            for_depth: 0,
        };
        if tokens.last().map(|t| t.kind) != Some(Kind::Eof) {
            let eof = Token::new(Kind::Eof, "", Literal::None, 0);
            return (parse.ast, vec![error!(InternalError, &eof; "Missing end of input.")]);
        }
        let statements = parse.statements_to_end_of_block();
        for id in statements {
            parse.ast.push_top(id);
        }
        let data = std::mem::take(&mut parse.data);
        parse.ast.set_data(data);
        (parse.ast, parse.errors)
    }

    /// Statements up to end of input or, inside a FOR, up to its NEXT.
    fn statements_to_end_of_block(&mut self) -> Vec<StmtId> {
        let mut block: Vec<StmtId> = vec![];
        while !self.is_at_end() && !self.is_end_of_block() {
            if self.check(Kind::Number) {
                let label = self.advance();
                match label.literal {
                    Literal::Integer(n) => self.line_number = n,
                    _ => {
                        let msg = format!("Bad line number {}", label.lexeme);
                        self.errors.push(error!(SyntaxError, &label; &msg));
                        while !self.is_at_end() && !self.matches(Kind::NewLine) {
                            self.advance();
                        }
                        continue;
                    }
                }
                self.pending_lines.push(self.line_number);
                if self.is_at_end() || self.matches(Kind::NewLine) {
                    continue;
                }
                if self.is_end_of_block() {
                    break;
                }
                let id = self.next_statement(block.last().copied());
                self.index_statement(id);
                block.push(id);
            }
            while !self.is_at_end() && !self.is_end_of_block() && !self.matches(Kind::NewLine) {
                let id = self.next_statement(block.last().copied());
                block.push(id);
            }
        }
        block
    }

    fn is_end_of_block(&self) -> bool {
        self.for_depth > 0 && self.check(Kind::Next)
    }

    fn index_statement(&mut self, id: StmtId) {
        for line_number in self.pending_lines.drain(..) {
            self.ast.index_line(line_number, id);
        }
    }

    /// Inline statements of an IF branch.
    fn if_line_block(&mut self) -> Vec<StmtId> {
        let mut block: Vec<StmtId> = vec![];
        while !self.is_at_end() && !self.check_any(&[Kind::Else, Kind::NewLine, Kind::Next]) {
            let id = self.next_statement(block.last().copied());
            block.push(id);
        }
        block
    }

    fn next_statement(&mut self, previous: Option<StmtId>) -> StmtId {
        while self.matches(Kind::Colon) {}
        let id = match self.statement() {
            Ok(id) => id,
            Err(e) => {
                self.errors.push(e);
                while !self.is_end_of_statement() {
                    self.advance();
                }
                self.ast.push(Statement::Noop)
            }
        };
        if let Some(previous) = previous {
            self.ast.link(previous, id);
        }
        while self.matches(Kind::Colon) {}
        id
    }

    fn statement(&mut self) -> Result<StmtId> {
        let token = self.current_token();
        let statement = match token.kind {
            Kind::Print => {
                self.advance();
                self.r#print(token)?
            }
            Kind::Statement => {
                self.advance();
                self.host(token)?
            }
            Kind::If => {
                self.advance();
                self.r#if(token)?
            }
            Kind::For => {
                self.advance();
                return self.r#for(token);
            }
            Kind::Goto => {
                self.advance();
                Statement::Goto(token, self.expression()?)
            }
            Kind::Gosub => {
                self.advance();
                Statement::Gosub(token, self.expression()?)
            }
            Kind::On => {
                self.advance();
                self.r#on(token)?
            }
            Kind::Dim => {
                self.advance();
                Statement::Dim(self.variables()?)
            }
            Kind::Read => {
                self.advance();
                Statement::Read(self.variables()?)
            }
            Kind::Data => {
                self.advance();
                self.data()?
            }
            Kind::Rem => {
                self.advance();
                while self.matches(Kind::Comment) {}
                Statement::Noop
            }
            Kind::Return => {
                self.advance();
                Statement::Return(token)
            }
            Kind::Run => {
                self.advance();
                Statement::Run
            }
            Kind::New => {
                self.advance();
                Statement::New
            }
            Kind::End => {
                self.advance();
                Statement::End
            }
            Kind::Else => {
                self.advance();
                return Err(error!(BlockError, &token; "Unexpected 'ELSE'."));
            }
            Kind::Next => {
                self.advance();
                return Err(error!(BlockError, &token; "Unexpected 'NEXT'."));
            }
            Kind::Let => {
                self.advance();
                match self.assignment(&token, "Expected assignment target.")? {
                    Statement::Assign(var, expr) => Statement::Let(var, expr),
                    statement => statement,
                }
            }
            _ => self.assignment(&token, "Expected statement or assignment.")?,
        };
        Ok(self.ast.push(statement))
    }

    fn assignment(&mut self, token: &Token, message: &str) -> Result<Statement> {
        if let Expression::Variable(var) = self.primary()? {
            if self.matches(Kind::Equal) {
                return Ok(Statement::Assign(var, self.expression()?));
            }
        }
        Err(error!(SyntaxError, token; message))
    }

    fn r#print(&mut self, token: Token) -> Result<Statement> {
        let mut newline = true;
        let mut items = vec![];
        while !self.is_end_of_statement() {
            if self.matches(Kind::Semicolon) {
                newline = false;
            } else if self.matches(Kind::Comma) {
                newline = false;
                items.push(Expression::Literal(Literal::String(" ".into())));
            } else {
                newline = true;
                items.push(self.expression()?);
            }
        }
        Ok(Statement::Print(token, items, newline))
    }

    fn r#if(&mut self, token: Token) -> Result<Statement> {
        let condition = self.expression()?;
        self.consume(Kind::Then, "Expected 'THEN'.")?;
        let then = self.if_branch()?;
        let otherwise = if self.matches(Kind::Else) {
            self.if_branch()?
        } else {
            vec![]
        };
        if self.check(Kind::Else) {
            return Err(error!(BlockError, &self.current_token(); "Unexpected 'ELSE'."));
        }
        Ok(Statement::If(token, condition, then, otherwise))
    }

    /// A line number alone is an implicit GOTO.
    fn if_branch(&mut self) -> Result<Vec<StmtId>> {
        if self.check(Kind::Number) {
            let token = self.current_token();
            let target = self.primary()?;
            return Ok(vec![self.ast.push(Statement::Goto(token, target))]);
        }
        Ok(self.if_line_block())
    }

    fn r#for(&mut self, token: Token) -> Result<StmtId> {
        let variable_token = self.current_token();
        let variable = match self.primary()? {
            Expression::Variable(var) => var,
            _ => return Err(error!(SyntaxError, &variable_token; "Expected variable.")),
        };
        if !variable.arguments.is_empty() {
            return Err(error!(SyntaxError, &variable_token; "Array variable not allowed in FOR."));
        }
        self.consume(Kind::Equal, "Expected '='.")?;
        let start = self.expression()?;
        self.consume(Kind::To, "Expected 'TO'.")?;
        let target = self.expression()?;
        let step = if self.matches(Kind::Step) {
            self.expression()?
        } else {
            Expression::Literal(Literal::Integer(1))
        };
        self.consume_end_of_statement()?;

        self.pending_stack.push(std::mem::take(&mut self.pending_lines));
        self.for_depth += 1;
        let block = self.for_block(&variable);
        self.for_depth -= 1;
        let outer = self.pending_stack.pop().unwrap_or_default();
        let next_lines = std::mem::replace(&mut self.pending_lines, outer);
        let mut block = block?;

        if block.is_empty() {
            block.push(self.ast.push(Statement::Noop));
        }
        let for_id = self.ast.len();
        let next_node = for_id + 1;
        let body = block[0];
        self.ast.push(Statement::For(For {
            token,
            variable,
            start,
            target,
            step,
            body,
            next_node,
        }));
        self.ast.push(Statement::Next(for_id));
        for line_number in next_lines {
            self.ast.index_line(line_number, next_node);
        }
        if let Some(last) = block.last() {
            self.ast.link(*last, next_node);
        }
        Ok(for_id)
    }

    /// Body of a FOR through its NEXT. Line numbers left pending at
    /// the NEXT belong to the NEXT node.
    fn for_block(&mut self, variable: &Variable) -> Result<Vec<StmtId>> {
        let block = self.statements_to_end_of_block();
        let e = error!(BlockError, &self.current_token(); "Expected NEXT");
        self.consume_kind(Kind::Next, e)?;
        if self.check(Kind::Identifier) {
            let counter = self.advance();
            if counter.lexeme != variable.name.lexeme {
                let mut msg = format!("Counter mismatched with FOR {}", variable.name.lexeme);
                if variable.name.line > 0 {
                    msg.push_str(&format!(" on line {}", variable.name.line));
                }
                return Err(error!(BlockError, &counter; &msg));
            }
        }
        Ok(block)
    }

    fn r#on(&mut self, token: Token) -> Result<Statement> {
        let selector = self.expression()?;
        let keyword = self.current_token();
        if !self.matches(Kind::Goto) && !self.matches(Kind::Gosub) {
            return Err(error!(SyntaxError, &keyword; "Expected GOTO or GOSUB."));
        }
        let mut targets = vec![self.expression()?];
        while self.matches(Kind::Comma) {
            targets.push(self.expression()?);
        }
        Ok(Statement::On(token, selector, keyword, targets))
    }

    fn data(&mut self) -> Result<Statement> {
        let mut literals: Vec<Rc<str>> = vec![];
        let result = loop {
            if self.is_end_of_statement() {
                break Ok(());
            }
            let literal = self.current_token();
            if !self.matches(Kind::DataLiteral) {
                break Err(error!(SyntaxError, &literal; "Expected data literal."));
            }
            if let Literal::String(s) = literal.literal {
                literals.push(s);
            }
            if !self.is_end_of_statement() && !self.matches(Kind::Comma) {
                let token = self.current_token();
                break Err(error!(SyntaxError, &token; "Expected ',' or end of statement"));
            }
        };
        self.data
            .entry(self.line_number)
            .or_default()
            .extend(literals);
        result.map(|_| Statement::Noop)
    }

    fn variables(&mut self) -> Result<Vec<Variable>> {
        let mut v = vec![];
        loop {
            let token = self.current_token();
            match self.primary()? {
                Expression::Variable(var) => v.push(var),
                _ => return Err(error!(SyntaxError, &token; "Expected variable.")),
            }
            if !self.matches(Kind::Comma) {
                return Ok(v);
            }
        }
    }

    /// Resolve a host statement against its patterns. All candidates are
    /// walked in step; a fixed slot that disagrees with the input drops
    /// its pattern. Where candidates disagree on a placeholder, fixed
    /// slots that match the input win over placeholders.
    fn host(&mut self, token: Token) -> Result<Statement> {
        let grammar = self.grammar;
        let patterns = match grammar.patterns(&token.lexeme) {
            Some(p) => p,
            None => return Err(error!(InternalError, &token; "Unknown statement.")),
        };
        let mut candidates: Vec<usize> = (0..patterns.len()).collect();
        let mut expressions = vec![];
        let mut starts = vec![];
        let mut index = 0;
        loop {
            let slot_of = |c: usize| patterns[c].get(index);
            let fixed_match: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&c| match slot_of(c) {
                    Some(Slot::Fixed(kind, _)) => self.check(*kind),
                    Some(Slot::End) => self.is_end_of_statement(),
                    _ => false,
                })
                .collect();
            let placeholders: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&c| slot_of(c).map_or(false, Slot::is_placeholder))
                .collect();
            if !fixed_match.is_empty() {
                let at_end = fixed_match.iter().all(|&c| slot_of(c) == Some(&Slot::End));
                candidates = fixed_match;
                if at_end {
                    break;
                }
                self.advance();
            } else if !placeholders.is_empty() {
                candidates = placeholders;
                starts.push(self.current_token());
                expressions.push(self.expression()?);
            } else {
                let mut expected: Vec<String> = vec![];
                for &c in candidates.iter() {
                    if let Some(slot) = slot_of(c) {
                        let s = slot.to_string();
                        if !expected.contains(&s) {
                            expected.push(s);
                        }
                    }
                }
                let msg = format!("Expected: {}", expected.join(", "));
                return Err(error!(SyntaxError, &self.current_token(); &msg));
            }
            index += 1;
        }
        let chosen = candidates[0];
        for (slot, (expr, start)) in patterns[chosen]
            .placeholders()
            .zip(expressions.iter().zip(starts.iter()))
        {
            if *slot == Slot::Input && !matches!(expr, Expression::Variable(_)) {
                return Err(error!(SyntaxError, start; "Expected variable."));
            }
        }
        Ok(Statement::Host(token, chosen, expressions))
    }

    fn expression(&mut self) -> Result<Expression> {
        fn parse(this: &mut Parser, precedence: usize) -> Result<Expression> {
            let mut lhs = this.unary()?;
            loop {
                let op = match Parser::op_precedence(this.peek().kind) {
                    Some(op) if op >= precedence => op,
                    _ => break,
                };
                let operator = this.advance();
                let rhs = parse(this, op + 1)?;
                lhs = Expression::Binary(Box::new(lhs), operator, Box::new(rhs));
            }
            Ok(lhs)
        }
        parse(self, 0)
    }

    fn op_precedence(kind: Kind) -> Option<usize> {
        use Kind::*;
        Some(match kind {
            And => 1,
            Xor => 2,
            Or => 3,
            Equal | NotEqual => 4,
            Greater | GreaterEqual | Less | LessEqual => 5,
            Minus | Plus => 6,
            Slash | Star => 7,
            _ => return None,
        })
    }

    fn unary(&mut self) -> Result<Expression> {
        if self.check_any(&[Kind::Minus, Kind::Not]) {
            let operator = self.advance();
            let right = self.unary()?;
            return Ok(Expression::Unary(operator, Box::new(right)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expression> {
        if self.check_any(&[Kind::Number, Kind::String]) {
            return Ok(Expression::Literal(self.advance().literal));
        }
        if self.check(Kind::Identifier) {
            let name = self.advance();
            let mut arguments = vec![];
            if self.matches(Kind::LeftParen) && !self.matches(Kind::RightParen) {
                loop {
                    arguments.push(self.expression()?);
                    if self.matches(Kind::RightParen) {
                        break;
                    }
                    self.consume(Kind::Comma, "Expected ',' or ')'.")?;
                }
            }
            return Ok(Expression::Variable(Variable { name, arguments }));
        }
        if self.matches(Kind::LeftParen) {
            let expr = self.expression()?;
            self.consume(Kind::RightParen, "Expect ')' after expression")?;
            return Ok(Expression::Grouping(Box::new(expr)));
        }
        Err(error!(SyntaxError, &self.current_token(); "Expected expression"))
    }

    fn consume(&mut self, kind: Kind, message: &str) -> Result<Token> {
        let e = error!(SyntaxError, &self.current_token(); message);
        self.consume_kind(kind, e)
    }

    fn consume_kind(&mut self, kind: Kind, error: Error) -> Result<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(error)
    }

    fn consume_end_of_statement(&mut self) -> Result<()> {
        if self.is_at_end() || self.matches(Kind::NewLine) || self.matches(Kind::Colon) {
            return Ok(());
        }
        Err(error!(SyntaxError, &self.current_token(); "Expected end of statement."))
    }

    fn matches(&mut self, kind: Kind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, kind: Kind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn check_any(&self, kinds: &[Kind]) -> bool {
        kinds.iter().any(|k| self.check(*k))
    }

    fn advance(&mut self) -> Token {
        let token = self.current_token();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// The token under the cursor, stamped with the BASIC line number.
    fn current_token(&self) -> Token {
        self.peek().at_line(self.line_number)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == Kind::Eof
    }

    fn is_end_of_statement(&self) -> bool {
        self.is_at_end() || self.check_any(&[Kind::Colon, Kind::NewLine, Kind::Else])
    }
}
