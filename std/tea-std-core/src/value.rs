//!
//! Runtime Value Representation
//!
//! `Value` is what travels through the generic-reference call shape. Numbers
//! and text also have unboxed call shapes of their own (see `native`); when a
//! behavior only implements the generic shape, they arrive here boxed as
//! `Value::Number` and `Value::Text`.
//!
//! Reference variants share their referent through `Rc`. Two reference values
//! are equal only when they point at the same allocation.
//!

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::native::NativeRunnable;
use crate::record::Record;

/// A TeaScript object: string keys in declaration order.
pub type Object = Record<Rc<str>, Value>;

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(Rc<str>),
    Record(Rc<RefCell<Object>>),
    Native(Rc<NativeRunnable>),
    /// Host value the runtime passes along without inspecting.
    Opaque(Rc<dyn Any>),
}

impl Value {
    pub fn text(s: impl Into<Rc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn object(obj: Object) -> Self {
        Value::Record(Rc::new(RefCell::new(obj)))
    }

    pub fn native(runnable: NativeRunnable) -> Self {
        Value::Native(Rc::new(runnable))
    }

    pub fn opaque<T: Any>(value: T) -> Self {
        Value::Opaque(Rc::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Record(_) => "object",
            Value::Native(_) => "function",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Rc<RefCell<Object>>> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeRunnable> {
        match self {
            Value::Native(n) => Some(&**n),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Record(r) => match r.try_borrow() {
                Ok(obj) => f.debug_tuple("Record").field(&obj.len()).finish(),
                Err(_) => f.write_str("Record(<borrowed>)"),
            },
            Value::Native(n) => f.debug_tuple("Native").field(n).finish(),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

thread_local! {
    // Records currently being printed on this thread, for cycle detection.
    static PRINTING: RefCell<Vec<*const RefCell<Object>>> = const { RefCell::new(Vec::new()) };
}

fn fmt_record(record: &Rc<RefCell<Object>>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let ptr = Rc::as_ptr(record);
    if PRINTING.with(|p| p.borrow().contains(&ptr)) {
        return f.write_str("{...}");
    }
    let Ok(obj) = record.try_borrow() else {
        return f.write_str("{...}");
    };

    PRINTING.with(|p| p.borrow_mut().push(ptr));
    let result = fmt::Display::fmt(&*obj, f);
    PRINTING.with(|p| p.borrow_mut().pop());
    result
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Record(r) => fmt_record(r, f),
            Value::Native(_) => f.write_str("<native fn>"),
            Value::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s.into())
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::object(obj)
    }
}

impl From<NativeRunnable> for Value {
    fn from(runnable: NativeRunnable) -> Self {
        Value::native(runnable)
    }
}
