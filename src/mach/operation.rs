use super::Val;
use crate::error;
use crate::lang::token::Kind;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Arithmetic and comparison
///
/// Two integers stay integer and overflow is an error. Two strings
/// allow only `=`, `<>` and `+`. Any other mix of numbers is done in
/// floating point. Comparisons produce -1 for true and 0 for false.

pub struct Operation {}

enum Operands {
    Integer(i64, i64),
    Float(f64, f64),
    String(Rc<str>, Rc<str>),
}

impl Operands {
    fn new(lhs: Val, rhs: Val) -> Result<Operands> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => Ok(Operands::Integer(l, r)),
            (String(l), String(r)) => Ok(Operands::String(l, r)),
            (l, r) => Ok(Operands::Float(f64::try_from(l)?, f64::try_from(r)?)),
        }
    }
}

fn truth(b: bool) -> Val {
    if b {
        Val::Integer(-1)
    } else {
        Val::Integer(0)
    }
}

fn invalid(operands: &Operands) -> Error {
    match operands {
        Operands::Integer(..) => error!(InvalidOperator; "Operator invalid for integer operand."),
        Operands::Float(..) => {
            error!(InvalidOperator; "Operator invalid for floating point operand.")
        }
        Operands::String(..) => error!(InvalidOperator; "Operator invalid for string operand."),
    }
}

impl Operation {
    pub fn binary(op: Kind, lhs: Val, rhs: Val) -> Result<Val> {
        use Kind::*;
        match op {
            Plus => Operation::sum(lhs, rhs),
            Minus => Operation::subtract(lhs, rhs),
            Star => Operation::multiply(lhs, rhs),
            Slash => Operation::divide(lhs, rhs),
            Equal => Operation::equal(lhs, rhs),
            NotEqual => Operation::not_equal(lhs, rhs),
            Less => Operation::less(lhs, rhs),
            LessEqual => Operation::less_equal(lhs, rhs),
            Greater => Operation::greater(lhs, rhs),
            GreaterEqual => Operation::greater_equal(lhs, rhs),
            And => Operation::and(lhs, rhs),
            Or => Operation::or(lhs, rhs),
            Xor => Operation::xor(lhs, rhs),
            _ => Err(error!(InternalError; "Not a binary operator.")),
        }
    }

    pub fn negate(val: Val) -> Result<Val> {
        match val {
            Val::Integer(n) => match n.checked_neg() {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(error!(Overflow)),
            },
            Val::Float(n) => Ok(Val::Float(-n)),
            _ => Err(error!(TypeMismatch; "Operand must be a number.")),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        match val {
            Val::Integer(n) => Ok(Val::Integer(!n)),
            _ => Err(error!(TypeMismatch; "Operand must be an integer.")),
        }
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => match l.checked_add(r) {
                Some(i) => Ok(Val::Integer(i)),
                None => Err(error!(Overflow)),
            },
            Operands::Float(l, r) => Ok(Val::Float(l + r)),
            Operands::String(l, r) => Ok(Val::String((l.to_string() + &r).into())),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => match l.checked_sub(r) {
                Some(i) => Ok(Val::Integer(i)),
                None => Err(error!(Overflow)),
            },
            Operands::Float(l, r) => Ok(Val::Float(l - r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => match l.checked_mul(r) {
                Some(i) => Ok(Val::Integer(i)),
                None => Err(error!(Overflow)),
            },
            Operands::Float(l, r) => Ok(Val::Float(l * r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => match l.checked_div(r) {
                Some(i) => Ok(Val::Integer(i)),
                None => {
                    if r == 0 {
                        Err(error!(DivisionByZero))
                    } else {
                        Err(error!(Overflow))
                    }
                }
            },
            Operands::Float(l, r) => Ok(Val::Float(l / r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(truth(l == r)),
            Operands::Float(l, r) => Ok(truth(l == r)),
            Operands::String(l, r) => Ok(truth(l == r)),
        }
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(truth(l != r)),
            Operands::Float(l, r) => Ok(truth(l != r)),
            Operands::String(l, r) => Ok(truth(l != r)),
        }
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(truth(l < r)),
            Operands::Float(l, r) => Ok(truth(l < r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(truth(l <= r)),
            Operands::Float(l, r) => Ok(truth(l <= r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Operation::less(rhs, lhs)
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Operation::less_equal(rhs, lhs)
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(Val::Integer(l & r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(Val::Integer(l | r)),
            operands => Err(invalid(&operands)),
        }
    }

    pub fn xor(lhs: Val, rhs: Val) -> Result<Val> {
        match Operands::new(lhs, rhs)? {
            Operands::Integer(l, r) => Ok(Val::Integer(l ^ r)),
            operands => Err(invalid(&operands)),
        }
    }
}
