use super::token::{Kind, Token};
use super::LineNumber;
use std::rc::Rc;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: LineNumber,
    at: At,
    message: String,
}

#[derive(Debug, Clone, PartialEq)]
enum At {
    Nowhere,
    End,
    Lexeme(Rc<str>),
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $token:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_token($token)
    };
    ($err:ident, $token:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_token($token)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: 0,
            at: At::Nowhere,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    /// Structural diagnostics, such as a FOR still waiting on its NEXT.
    pub fn is_block(&self) -> bool {
        self.code == ErrorCode::BlockError
    }

    /// True until some evaluator frame has pinned the error to a token.
    pub fn is_tokenless(&self) -> bool {
        self.at == At::Nowhere
    }

    pub fn in_line_number(self, line_number: LineNumber) -> Error {
        Error {
            line_number,
            ..self
        }
    }

    pub fn in_token(self, token: &Token) -> Error {
        let at = match token.kind {
            Kind::Eof | Kind::NewLine => At::End,
            _ => At::Lexeme(token.lexeme.clone()),
        };
        Error {
            line_number: token.line,
            at,
            ..self
        }
    }

    /// Attach a token to a context-free error. Errors which already
    /// name a token keep it.
    pub fn or_token(self, token: &Token) -> Error {
        if self.is_tokenless() {
            self.in_token(token)
        } else {
            self
        }
    }

    pub fn message(self, message: &str) -> Error {
        Error {
            message: message.to_string(),
            ..self
        }
    }

    pub fn text(&self) -> &str {
        if self.message.is_empty() {
            self.code.text()
        } else {
            &self.message
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError,
    BlockError,
    Overflow,
    DivisionByZero,
    TypeMismatch,
    InvalidOperator,
    SubscriptOutOfRange,
    UndefinedArray,
    RedimensionedArray,
    OutOfData,
    ReturnWithoutGosub,
    InvalidLabel,
    InvalidArity,
    OutOfMemory,
    HostError,
    InternalError,
}

impl ErrorCode {
    fn text(self) -> &'static str {
        use ErrorCode::*;
        match self {
            SyntaxError => "Syntax error.",
            BlockError => "Block error.",
            Overflow => "Overflow.",
            DivisionByZero => "Division by zero.",
            TypeMismatch => "Type mismatch.",
            InvalidOperator => "Operator invalid for operand type.",
            SubscriptOutOfRange => "Subscript out of range.",
            UndefinedArray => "Undefined array.",
            RedimensionedArray => "Variable already defined.",
            OutOfData => "Out of data.",
            ReturnWithoutGosub => "RETURN without GOSUB.",
            InvalidLabel => "Invalid label.",
            InvalidArity => "Invalid arity.",
            OutOfMemory => "Out of memory.",
            HostError => "Statement failed.",
            InternalError => "Internal error.",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {:?}: {} }}", self.code, self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.line_number > 0 {
            write!(f, "[line {}] ", self.line_number)?;
        }
        match &self.at {
            At::Nowhere => write!(f, "Error: {}", self.text()),
            At::End => write!(f, "Error at end: {}", self.text()),
            At::Lexeme(lexeme) => write!(f, "Error at '{}': {}", lexeme, self.text()),
        }
    }
}

impl std::error::Error for Error {}
