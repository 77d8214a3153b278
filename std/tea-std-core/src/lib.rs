//!
//! tea-std-core - Core Runtime Types
//!
//! This crate provides the primitives every compiled TeaScript program links against:
//!
//! - `Record` for ordered key-value objects (the run-time shape of object literals)
//! - `Value` for dynamically typed values passed through the generic call shape
//! - `NativeRunnable` for native behavior exposed through generic, text and
//!   numeric call shapes
//! - C ABI entry points for allocating and accessing records from AOT code
//!
//! None of these types are thread-safe; a compiled program owns them on the
//! thread that created them.
//!

pub mod error;
pub mod ffi;
pub mod native;
pub mod record;
pub mod value;

pub use error::*;
pub use ffi::*;
pub use native::*;
pub use record::*;
pub use value::*;
