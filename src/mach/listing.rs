use crate::lang::token::{Kind, Literal, Token};
use crate::lang::LineNumber;
use std::collections::BTreeMap;

/// ## Stored program
///
/// Each numbered line is kept as the tokens it was entered with,
/// ending in a newline. RUN parses the concatenation of all lines.

#[derive(Debug, Clone, Default)]
pub struct Listing {
    source: BTreeMap<LineNumber, Vec<Token>>,
}

impl Listing {
    pub fn clear(&mut self) {
        self.source.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn insert(&mut self, line_number: LineNumber, tokens: Vec<Token>) -> Option<Vec<Token>> {
        self.source.insert(line_number, tokens)
    }

    pub fn remove(&mut self, line_number: LineNumber) -> Option<Vec<Token>> {
        self.source.remove(&line_number)
    }

    /// All lines in order with a closing end of input.
    pub fn tokens(&self) -> Vec<Token> {
        let mut tokens: Vec<Token> = self.source.values().flatten().cloned().collect();
        let line = tokens.last().map_or(0, |t| t.line);
        tokens.push(Token::new(Kind::Eof, "", Literal::None, line));
        tokens
    }

    /// Text of one line without its newline.
    pub fn line(&self, line_number: LineNumber) -> Option<String> {
        let tokens = self.source.get(&line_number)?;
        Some(render(tokens.iter()).trim_end().to_string())
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render(self.source.values().flatten()))
    }
}

fn render<'a, T: Iterator<Item = &'a Token>>(tokens: T) -> String {
    use Kind::*;
    let mut s = std::string::String::new();
    let mut pad = false;
    let mut last = NewLine;
    for token in tokens {
        match token.kind {
            NewLine | Eof => {
                s.push('\n');
                pad = false;
            }
            Dot | LeftParen | RightParen => {
                if pad {
                    s.push(' ');
                }
                s.push_str(&token.lexeme);
                pad = false;
            }
            Colon | Semicolon | Comma => {
                if pad {
                    s.push(' ');
                }
                s.push_str(&token.lexeme);
                pad = true;
            }
            Identifier => {
                if pad || matches!(last, Identifier | Number) {
                    s.push(' ');
                }
                s.push_str(&token.lexeme);
                pad = false;
            }
            Comment | DataLiteral => {
                if pad {
                    s.push(' ');
                }
                match &token.literal {
                    Literal::String(text) if token.lexeme.starts_with('"') => {
                        s.push('"');
                        s.push_str(text);
                        s.push('"');
                    }
                    literal => s.push_str(&literal.to_string()),
                }
                pad = false;
            }
            String | Number => {
                if pad || (token.kind == Number && matches!(last, Identifier | Number)) {
                    s.push(' ');
                }
                s.push_str(&token.lexeme);
                pad = token.kind == Number && last == NewLine;
            }
            _ => {
                s.push(' ');
                s.push_str(&token.lexeme);
                pad = true;
            }
        }
        last = token.kind;
    }
    s
}
