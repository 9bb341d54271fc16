use super::LineNumber;
use std::collections::HashMap;
use std::rc::Rc;

thread_local!(
    static KEYWORDS: HashMap<&'static str, Kind> = Kind::keywords()
        .iter()
        .map(|k| (k.word(), *k))
        .collect();
);

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: Kind,
    pub lexeme: Rc<str>,
    pub literal: Literal,
    pub line: LineNumber,
}

impl Token {
    pub fn new(kind: Kind, lexeme: &str, literal: Literal, line: LineNumber) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    /// Same token at another line. The parser restamps every token
    /// with the BASIC line number it belongs to.
    pub fn at_line(&self, line: LineNumber) -> Token {
        Token {
            line,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?} {} {}", self.kind, self.lexeme, self.literal)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    None,
    Integer(i64),
    Float(f64),
    String(Rc<str>),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            None => Ok(()),
            Integer(n) => write!(f, "{}", n),
            Float(n) => write!(f, "{}", n),
            String(s) => write!(f, "{}", s),
        }
    }
}

/// Tag for a keyword a host adds to the scanner.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Extension {
    /// Scans as [`Kind::Print`]; the statement renders text.
    Output,
    /// Scans as [`Kind::Statement`]; the statement follows host patterns.
    Generic,
}

impl From<Extension> for Kind {
    fn from(ext: Extension) -> Kind {
        match ext {
            Extension::Output => Kind::Print,
            Extension::Generic => Kind::Statement,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Kind {
    LeftParen,
    RightParen,
    Colon,
    NewLine,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    NotEqual,
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Identifier,
    String,
    Number,
    DataLiteral,
    Comment,

    And,
    Data,
    Dim,
    Else,
    End,
    For,
    Gosub,
    Goto,
    If,
    Let,
    New,
    Next,
    Not,
    On,
    Or,
    Read,
    Rem,
    Return,
    Run,
    Step,
    Then,
    To,
    Xor,

    Print,
    Statement,

    Eof,
}

impl Kind {
    fn keywords() -> &'static [Kind] {
        use Kind::*;
        &[
            And, Data, Dim, Else, End, For, Gosub, Goto, If, Let, New, Next, Not, On, Or, Read,
            Rem, Return, Run, Step, Then, To, Xor,
        ]
    }

    /// Look up a fixed keyword. Expects upper case.
    pub fn from_keyword(s: &str) -> Option<Kind> {
        KEYWORDS.with(|k| k.get(s).copied())
    }

    pub fn fixed_keywords() -> impl Iterator<Item = &'static str> {
        Kind::keywords().iter().map(|k| k.word())
    }

    fn word(&self) -> &'static str {
        use Kind::*;
        match self {
            LeftParen => "(",
            RightParen => ")",
            Colon => ":",
            NewLine => "end of line",
            Comma => ",",
            Dot => ".",
            Minus => "-",
            Plus => "+",
            Semicolon => ";",
            Slash => "/",
            Star => "*",
            NotEqual => "<>",
            Equal => "=",
            Greater => ">",
            GreaterEqual => ">=",
            Less => "<",
            LessEqual => "<=",
            Identifier => "identifier",
            String => "string",
            Number => "number",
            DataLiteral => "data literal",
            Comment => "comment",
            And => "AND",
            Data => "DATA",
            Dim => "DIM",
            Else => "ELSE",
            End => "END",
            For => "FOR",
            Gosub => "GOSUB",
            Goto => "GOTO",
            If => "IF",
            Let => "LET",
            New => "NEW",
            Next => "NEXT",
            Not => "NOT",
            On => "ON",
            Or => "OR",
            Read => "READ",
            Rem => "REM",
            Return => "RETURN",
            Run => "RUN",
            Step => "STEP",
            Then => "THEN",
            To => "TO",
            Xor => "XOR",
            Print => "output statement",
            Statement => "statement",
            Eof => "end of input",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.word())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword() {
        assert_eq!(Kind::from_keyword("GOSUB"), Some(Kind::Gosub));
        assert_eq!(Kind::from_keyword("PRINT"), None);
        assert_eq!(Kind::from_keyword("PICKLES"), None);
    }

    #[test]
    fn test_extension_kinds() {
        assert_eq!(Kind::from(Extension::Output), Kind::Print);
        assert_eq!(Kind::from(Extension::Generic), Kind::Statement);
    }
}
