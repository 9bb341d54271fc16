use super::token::{Extension, Kind, Literal, Token};
use super::{Error, LineNumber};
use std::collections::HashMap;

/// Host keywords by upper case label.
pub type Extensions = HashMap<String, Extension>;

/// Scan source text into tokens ending with [`Kind::Eof`].
/// Problems are collected rather than stopping the scan.
pub fn lex(s: &str, extensions: &Extensions) -> (Vec<Token>, Vec<Error>) {
    BasicLexer::lex(s, extensions)
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_basic_alphanumeric(c: char) -> bool {
    is_basic_digit(c) || is_basic_alphabetic(c)
}

struct BasicLexer<'a> {
    chars: Vec<char>,
    extensions: &'a Extensions,
    tokens: Vec<Token>,
    errors: Vec<Error>,
    start: usize,
    current: usize,
    line: LineNumber,
}

impl<'a> BasicLexer<'a> {
    fn lex(s: &str, extensions: &'a Extensions) -> (Vec<Token>, Vec<Error>) {
        let mut lexer = BasicLexer {
            chars: s.chars().collect(),
            extensions,
            tokens: vec![],
            errors: vec![],
            start: 0,
            current: 0,
            line: 1,
        };
        while !lexer.is_at_end() {
            lexer.start = lexer.current;
            lexer.scan_token();
        }
        let eof = Token::new(Kind::Eof, "", Literal::None, lexer.line);
        lexer.tokens.push(eof);
        (lexer.tokens, lexer.errors)
    }

    fn scan_token(&mut self) {
        let ch = self.advance();
        match ch {
            '(' => self.add(Kind::LeftParen),
            ')' => self.add(Kind::RightParen),
            ',' => self.add(Kind::Comma),
            '.' => self.add(Kind::Dot),
            '-' => self.add(Kind::Minus),
            '+' => self.add(Kind::Plus),
            ';' => self.add(Kind::Semicolon),
            ':' => self.add(Kind::Colon),
            '*' => self.add(Kind::Star),
            '/' => self.add(Kind::Slash),
            '=' => self.add(Kind::Equal),
            '<' => {
                if self.matches('=') {
                    self.add(Kind::LessEqual)
                } else if self.matches('>') {
                    self.add(Kind::NotEqual)
                } else {
                    self.add(Kind::Less)
                }
            }
            '>' => {
                if self.matches('=') {
                    self.add(Kind::GreaterEqual)
                } else {
                    self.add(Kind::Greater)
                }
            }
            '"' => self.string(Kind::String),
            '\'' => {
                while self.peek() != '\n' && !self.is_at_end() {
                    self.advance();
                }
            }
            ' ' | '\t' | '\r' => {}
            '\n' => {
                self.add(Kind::NewLine);
                self.line += 1;
            }
            _ if is_basic_digit(ch) => self.number(),
            _ if is_basic_alphabetic(ch) => self.alphabetic(),
            _ => self.error("Unexpected character."),
        }
    }

    fn string(&mut self, kind: Kind) {
        while self.peek() != '"' && self.peek() != '\n' && !self.is_at_end() {
            self.advance();
        }
        if self.peek() != '"' {
            self.error("Unterminated string");
            return;
        }
        self.advance();
        let value = self.text(self.start + 1, self.current - 1);
        self.add_literal(kind, Literal::String(value.into()));
    }

    fn number(&mut self) {
        while is_basic_digit(self.peek()) {
            self.advance();
        }
        if self.peek() == '.' && is_basic_digit(self.peek_next()) {
            self.advance();
            while is_basic_digit(self.peek()) {
                self.advance();
            }
            match self.text(self.start, self.current).parse::<f64>() {
                Ok(n) => self.add_literal(Kind::Number, Literal::Float(n)),
                Err(_) => self.error("Invalid number."),
            }
        } else {
            match self.text(self.start, self.current).parse::<i64>() {
                Ok(n) => self.add_literal(Kind::Number, Literal::Integer(n)),
                Err(_) => self.error("Number too large."),
            }
        }
    }

    fn alphabetic(&mut self) {
        while is_basic_alphanumeric(self.peek()) {
            self.advance();
        }
        if self.peek() == '%' || self.peek() == '$' {
            self.advance();
        }
        let word = self.text(self.start, self.current).to_ascii_uppercase();
        if let Some(kind) = Kind::from_keyword(&word) {
            self.add(kind);
            match kind {
                Kind::Rem => self.remark(),
                Kind::Data => self.data(),
                _ => {}
            }
        } else if let Some(ext) = self.extensions.get(&word) {
            self.add(Kind::from(*ext));
        } else {
            self.add(Kind::Identifier);
        }
    }

    fn remark(&mut self) {
        self.skip_blanks();
        self.start = self.current;
        while !self.is_end_of_line() {
            self.advance();
        }
        let comment = self.text(self.start, self.current);
        self.add_literal(Kind::Comment, Literal::String(comment.into()));
    }

    fn data(&mut self) {
        loop {
            self.skip_blanks();
            if self.is_end_of_line() || self.peek() == ':' {
                break;
            }
            self.start = self.current;
            if self.peek() == '"' {
                self.advance();
                self.string(Kind::DataLiteral);
            } else {
                self.unquoted_data();
            }
            self.skip_blanks();
            if self.peek() == ',' {
                self.start = self.current;
                self.advance();
                self.add(Kind::Comma);
            }
        }
    }

    fn unquoted_data(&mut self) {
        while self.peek() != ',' && self.peek() != ':' && !self.is_end_of_line() {
            self.advance();
        }
        let value = self.text(self.start, self.current);
        self.add_literal(Kind::DataLiteral, Literal::String(value.trim().into()));
    }

    fn skip_blanks(&mut self) {
        while is_basic_whitespace(self.peek()) {
            self.advance();
        }
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.current];
        self.current += 1;
        ch
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn is_end_of_line(&self) -> bool {
        self.is_at_end() || self.peek() == '\r' || self.peek() == '\n'
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn add(&mut self, kind: Kind) {
        self.add_literal(kind, Literal::None)
    }

    fn add_literal(&mut self, kind: Kind, literal: Literal) {
        let mut lexeme = self.text(self.start, self.current);
        if kind != Kind::String {
            lexeme = lexeme.to_ascii_uppercase();
        }
        self.tokens
            .push(Token::new(kind, &lexeme, literal, self.line));
    }

    fn error(&mut self, message: &str) {
        let error = error!(SyntaxError; message).in_line_number(self.line);
        self.errors.push(error);
    }
}
