//!
//! Native Call Wrapper
//!
//! `NativeRunnable` is the value every TeaScript function literal and every
//! host-provided builtin materializes as. It holds one behavior and exposes
//! three call shapes:
//!
//! - `invoke_generic(&Value)` - any runtime value
//! - `invoke_text(&str)` - unboxed text
//! - `invoke_numeric(f64)` - unboxed number
//!
//! The compiler picks the entry point from what it statically knows about the
//! argument. A behavior that has no specialization for text or numbers
//! receives them boxed through the generic shape, so callers can always use
//! the richest shape regardless of what the callee implements.
//!
//! The wrapper adds no failure mode of its own: whatever a behavior returns is
//! handed back to the caller unchanged.
//!

use std::fmt;

use crate::error::CallResult;
use crate::value::Value;

/// Argument category used to select a specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    Generic,
    Text,
    Numeric,
}

/// One argument tagged with the call shape it is passed through.
#[derive(Debug, Clone, Copy)]
pub enum CallArg<'a> {
    Generic(&'a Value),
    Text(&'a str),
    Numeric(f64),
}

impl CallArg<'_> {
    pub fn shape(&self) -> CallShape {
        match self {
            CallArg::Generic(_) => CallShape::Generic,
            CallArg::Text(_) => CallShape::Text,
            CallArg::Numeric(_) => CallShape::Numeric,
        }
    }
}

/// A native operation callable through the three call shapes.
///
/// Only `call` is required. The text and numeric shapes default to boxing
/// their argument and forwarding to `call`; override them to provide an
/// unboxed fast path.
///
/// `specializes` must agree with the overrides: a behavior that overrides
/// `call_text` or `call_number` also overrides `specializes` to answer true
/// for that shape.
pub trait NativeBehavior {
    fn call(&self, value: &Value) -> CallResult;

    fn call_text(&self, text: &str) -> CallResult {
        box_text(self, text)
    }

    fn call_number(&self, n: f64) -> CallResult {
        box_number(self, n)
    }

    fn specializes(&self, shape: CallShape) -> bool {
        shape == CallShape::Generic
    }
}

/// Text fallback: box into `Value::Text` and take the generic shape.
pub fn box_text<B: NativeBehavior + ?Sized>(behavior: &B, text: &str) -> CallResult {
    tracing::trace!("no text specialization, boxing into generic call");
    behavior.call(&Value::text(text))
}

/// Numeric fallback: box into `Value::Number` and take the generic shape.
pub fn box_number<B: NativeBehavior + ?Sized>(behavior: &B, n: f64) -> CallResult {
    tracing::trace!("no numeric specialization, boxing into generic call");
    behavior.call(&Value::Number(n))
}

type GenericFn = Box<dyn Fn(&Value) -> CallResult>;
type TextFn = Box<dyn Fn(&str) -> CallResult>;
type NumericFn = Box<dyn Fn(f64) -> CallResult>;

/// Behavior assembled from one closure per call shape.
struct ShapedBehavior {
    generic: GenericFn,
    text: Option<TextFn>,
    numeric: Option<NumericFn>,
}

impl NativeBehavior for ShapedBehavior {
    fn call(&self, value: &Value) -> CallResult {
        (self.generic)(value)
    }

    fn call_text(&self, text: &str) -> CallResult {
        match &self.text {
            Some(f) => f(text),
            None => box_text(self, text),
        }
    }

    fn call_number(&self, n: f64) -> CallResult {
        match &self.numeric {
            Some(f) => f(n),
            None => box_number(self, n),
        }
    }

    fn specializes(&self, shape: CallShape) -> bool {
        match shape {
            CallShape::Generic => true,
            CallShape::Text => self.text.is_some(),
            CallShape::Numeric => self.numeric.is_some(),
        }
    }
}

/// Assembles a `NativeRunnable` from per-shape closures.
pub struct NativeRunnableBuilder {
    behavior: ShapedBehavior,
}

impl NativeRunnableBuilder {
    pub fn text(mut self, f: impl Fn(&str) -> CallResult + 'static) -> Self {
        self.behavior.text = Some(Box::new(f));
        self
    }

    pub fn numeric(mut self, f: impl Fn(f64) -> CallResult + 'static) -> Self {
        self.behavior.numeric = Some(Box::new(f));
        self
    }

    pub fn build(self) -> NativeRunnable {
        NativeRunnable::new(self.behavior)
    }
}

/// Immutable dispatch shim around a single native behavior.
pub struct NativeRunnable {
    behavior: Box<dyn NativeBehavior>,
}

impl NativeRunnable {
    pub fn new(behavior: impl NativeBehavior + 'static) -> Self {
        Self {
            behavior: Box::new(behavior),
        }
    }

    /// Wrap a closure that only handles the generic shape.
    pub fn from_fn(f: impl Fn(&Value) -> CallResult + 'static) -> Self {
        Self::builder(f).build()
    }

    /// Start from the generic shape and optionally add specializations.
    pub fn builder(generic: impl Fn(&Value) -> CallResult + 'static) -> NativeRunnableBuilder {
        NativeRunnableBuilder {
            behavior: ShapedBehavior {
                generic: Box::new(generic),
                text: None,
                numeric: None,
            },
        }
    }

    pub fn invoke_generic(&self, value: &Value) -> CallResult {
        self.behavior.call(value)
    }

    pub fn invoke_text(&self, text: &str) -> CallResult {
        self.behavior.call_text(text)
    }

    pub fn invoke_numeric(&self, n: f64) -> CallResult {
        self.behavior.call_number(n)
    }

    pub fn invoke(&self, arg: CallArg<'_>) -> CallResult {
        match arg {
            CallArg::Generic(value) => self.invoke_generic(value),
            CallArg::Text(text) => self.invoke_text(text),
            CallArg::Numeric(n) => self.invoke_numeric(n),
        }
    }

    /// Whether the behavior handles `shape` with its own specialization.
    pub fn specializes(&self, shape: CallShape) -> bool {
        self.behavior.specializes(shape)
    }
}

impl fmt::Debug for NativeRunnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRunnable")
            .field("text", &self.specializes(CallShape::Text))
            .field("numeric", &self.specializes(CallShape::Numeric))
            .finish()
    }
}
