use super::{Function, Val, MAX_ARRAY_ELEMENTS};
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Variable memory
///
/// Scalars and arrays are kept apart, so `A` and `A(1)` never collide.
/// The name suffix fixes the type for life: `%` is Integer, `$` is
/// String, anything else Float. Numbers assigned across the two numeric
/// types are converted; crossing between numbers and strings is a
/// type mismatch. Native functions share the scalar namespace.

#[derive(Debug, Default)]
pub struct Var {
    vars: HashMap<Rc<str>, Val>,
    dims: HashMap<Rc<str>, Array>,
}

#[derive(Debug)]
struct Array {
    bounds: Vec<usize>,
    values: Vec<Val>,
}

impl Array {
    fn new(name: &str, bounds: &[i64]) -> Result<Array> {
        let mut len: usize = 1;
        let mut checked = vec![];
        for bound in bounds {
            let bound = match usize::try_from(*bound) {
                Ok(b) => b,
                Err(_) => return Err(error!(SubscriptOutOfRange)),
            };
            len = match bound.checked_add(1).and_then(|n| len.checked_mul(n)) {
                Some(n) if n <= MAX_ARRAY_ELEMENTS => n,
                _ => return Err(error!(OutOfMemory)),
            };
            checked.push(bound);
        }
        Ok(Array {
            bounds: checked,
            values: vec![Val::default_for(name); len],
        })
    }

    fn offset(&self, indices: &[i64]) -> Result<usize> {
        if indices.len() != self.bounds.len() {
            return Err(error!(SubscriptOutOfRange));
        }
        let mut offset = 0;
        for (index, bound) in indices.iter().zip(&self.bounds) {
            let index = match usize::try_from(*index) {
                Ok(i) if i <= *bound => i,
                _ => return Err(error!(SubscriptOutOfRange)),
            };
            offset = offset * (bound + 1) + index;
        }
        Ok(offset)
    }
}

/// Convert a value to the type already held in a slot.
fn coerce(value: Val, slot: &Val) -> Result<Val> {
    match slot {
        Val::Integer(_) => Ok(Val::Integer(i64::try_from(value)?)),
        Val::Float(_) => Ok(Val::Float(f64::try_from(value)?)),
        Val::String(_) => Ok(Val::String(Rc::<str>::try_from(value)?)),
        Val::Function(_) => Err(error!(TypeMismatch)),
    }
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.dims.clear();
    }

    /// A scalar when `bounds` is empty, otherwise an array with
    /// inclusive zero-based bounds.
    pub fn define(&mut self, name: &str, bounds: &[i64]) -> Result<()> {
        if bounds.is_empty() {
            return self.assign(name, bounds, Val::default_for(name));
        }
        if self.dims.contains_key(name) {
            return Err(error!(RedimensionedArray));
        }
        let array = Array::new(name, bounds)?;
        self.dims.insert(name.into(), array);
        Ok(())
    }

    pub fn define_function(&mut self, name: &str, function: Rc<dyn Function>) {
        self.vars.insert(name.into(), Val::Function(function));
    }

    pub fn function(&self, name: &str) -> Option<Rc<dyn Function>> {
        match self.vars.get(name) {
            Some(Val::Function(f)) => Some(f.clone()),
            _ => None,
        }
    }

    /// Read a scalar, or an array element when `indices` is not empty.
    /// An unknown scalar springs into existence at its default.
    pub fn get(&mut self, name: &str, indices: &[i64]) -> Result<Val> {
        if indices.is_empty() {
            if let Some(val) = self.vars.get(name) {
                return Ok(val.clone());
            }
            let val = Val::default_for(name);
            self.vars.insert(name.into(), val.clone());
            return Ok(val);
        }
        let array = match self.dims.get(name) {
            Some(array) => array,
            None => return Err(error!(UndefinedArray)),
        };
        let offset = array.offset(indices)?;
        Ok(array.values[offset].clone())
    }

    pub fn assign(&mut self, name: &str, indices: &[i64], value: Val) -> Result<()> {
        if indices.is_empty() {
            let value = match self.vars.get(name) {
                Some(slot) => coerce(value, slot)?,
                None => coerce(value, &Val::default_for(name))?,
            };
            self.vars.insert(name.into(), value);
            return Ok(());
        }
        let array = match self.dims.get_mut(name) {
            Some(array) => array,
            None => return Err(error!(UndefinedArray)),
        };
        let offset = array.offset(indices)?;
        let slot = &mut array.values[offset];
        *slot = coerce(value, slot)?;
        Ok(())
    }
}
