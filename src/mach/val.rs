use super::Function;
use crate::error;
use crate::lang::token::Literal;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

/// ## Runtime values

#[derive(Clone)]
pub enum Val {
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Function(Rc<dyn Function>),
}

impl Val {
    /// Initial value of a variable, decided by the name's suffix.
    pub fn default_for(name: &str) -> Val {
        if name.ends_with('%') {
            Val::Integer(0)
        } else if name.ends_with('$') {
            Val::String("".into())
        } else {
            Val::Float(0.0)
        }
    }

    /// Condition test for IF. Numbers are true when nonzero.
    pub fn is_true(&self) -> Result<bool, Error> {
        match self {
            Val::Integer(n) => Ok(*n != 0),
            Val::Float(n) => Ok(*n != 0.0),
            Val::String(_) | Val::Function(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl std::fmt::Debug for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Val::*;
        match self {
            Integer(n) => write!(f, "Integer({})", n),
            Float(n) => write!(f, "Float({:?})", n),
            String(s) => write!(f, "String({:?})", s),
            Function(_) => write!(f, "Function"),
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Val) -> bool {
        use Val::*;
        match (self, other) {
            (Integer(l), Integer(r)) => l == r,
            (Float(l), Float(r)) => l == r,
            (String(l), String(r)) => l == r,
            (Function(l), Function(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Val::*;
        match self {
            Integer(n) => write!(f, "{}", n),
            Float(n) => write!(f, "{}", n),
            String(s) => write!(f, "{}", s),
            Function(_) => write!(f, "FUNCTION"),
        }
    }
}

impl TryFrom<&Literal> for Val {
    type Error = Error;
    fn try_from(literal: &Literal) -> Result<Self, Self::Error> {
        match literal {
            Literal::Integer(n) => Ok(Val::Integer(*n)),
            Literal::Float(n) => Ok(Val::Float(*n)),
            Literal::String(s) => Ok(Val::String(s.clone())),
            Literal::None => Err(error!(InternalError; "Literal has no value.")),
        }
    }
}

impl TryFrom<Val> for i64 {
    type Error = Error;
    /// Floats truncate toward zero.
    fn try_from(val: Val) -> Result<Self, Self::Error> {
        match val {
            Val::Integer(n) => Ok(n),
            Val::Float(n) => {
                let n = n.trunc();
                if n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64 {
                    Ok(n as i64)
                } else {
                    Err(error!(Overflow))
                }
            }
            Val::String(_) | Val::Function(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl TryFrom<Val> for f64 {
    type Error = Error;
    fn try_from(val: Val) -> Result<Self, Self::Error> {
        match val {
            Val::Integer(n) => Ok(n as f64),
            Val::Float(n) => Ok(n),
            Val::String(_) | Val::Function(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl TryFrom<Val> for Rc<str> {
    type Error = Error;
    fn try_from(val: Val) -> Result<Self, Self::Error> {
        match val {
            Val::String(s) => Ok(s),
            _ => Err(error!(TypeMismatch)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_to_integer_truncates() {
        assert_eq!(i64::try_from(Val::Float(2.9)).unwrap(), 2);
        assert_eq!(i64::try_from(Val::Float(-2.9)).unwrap(), -2);
        assert!(i64::try_from(Val::Float(f64::NAN)).is_err());
        assert!(i64::try_from(Val::Float(1e19)).is_err());
        assert!(i64::try_from(Val::String("1".into())).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Val::Integer(-5).to_string(), "-5");
        assert_eq!(Val::Float(3.0).to_string(), "3");
        assert_eq!(Val::Float(0.1).to_string(), "0.1");
        assert_eq!(Val::String("Hi".into()).to_string(), "Hi");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Val::default_for("A%"), Val::Integer(0));
        assert_eq!(Val::default_for("A$"), Val::String("".into()));
        assert_eq!(Val::default_for("A"), Val::Float(0.0));
    }
}
