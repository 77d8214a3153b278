//!
//! tea-std-io - Standard Stream Bindings
//!
//! Exposes the process's standard streams to TeaScript programs as native
//! call wrappers, so printing goes through the same call-shape surface as any
//! other function value.
//!
//! ## Bindings
//!
//! - `println` / `print` - stdout, with and without a trailing newline
//! - `eprintln` / `eprint` - stderr, with and without a trailing newline
//! - `readln() -> string` - read all of stdin until end-of-stream (blocking)
//!
//! Each stream wrapper has text and numeric specializations and prints
//! generic values with their `Display` form.
//!
//! `readln` never fails: a read error is reported on stderr through
//! `eprintln` and the result is the empty string. `try_readln` is the
//! checked variant.
//!

use std::cell::RefCell;
use std::ffi::c_char;
use std::fmt::Display;
use std::io::{Read, Write};
use std::rc::Rc;
use std::sync::OnceLock;

use serde::Deserialize;
use tea_std_core::{CallResult, NativeRunnable};
use thiserror::Error;

/// Shared output sink a stream wrapper writes to.
pub type Sink = Rc<RefCell<dyn Write>>;

/// How input bytes become text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoding {
    /// Invalid UTF-8 sequences become U+FFFD.
    #[default]
    Lossy,
    /// Invalid UTF-8 is a read failure.
    Strict,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

fn emit(sink: &Sink, item: impl Display, newline: bool) -> CallResult {
    let mut out = sink.borrow_mut();
    if newline {
        writeln!(out, "{}", item)?;
    } else {
        write!(out, "{}", item)?;
        out.flush()?;
    }
    Ok(())
}

fn stream_runnable(sink: Sink, newline: bool) -> NativeRunnable {
    let text_sink = sink.clone();
    let number_sink = sink.clone();
    NativeRunnable::builder(move |value| emit(&sink, value, newline))
        .text(move |text| emit(&text_sink, text, newline))
        .numeric(move |n| emit(&number_sink, n, newline))
        .build()
}

/// The four standard stream wrappers plus input reading.
pub struct Io {
    pub println: NativeRunnable,
    pub print: NativeRunnable,
    pub eprintln: NativeRunnable,
    pub eprint: NativeRunnable,
    decoding: Decoding,
}

impl Io {
    /// Bind to the process's stdout and stderr.
    pub fn stdio() -> Self {
        let out: Sink = Rc::new(RefCell::new(std::io::stdout()));
        let err: Sink = Rc::new(RefCell::new(std::io::stderr()));
        Self::with_streams(out, err)
    }

    pub fn with_streams(out: Sink, err: Sink) -> Self {
        Self {
            println: stream_runnable(out.clone(), true),
            print: stream_runnable(out, false),
            eprintln: stream_runnable(err.clone(), true),
            eprint: stream_runnable(err, false),
            decoding: Decoding::default(),
        }
    }

    pub fn with_decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = decoding;
        self
    }

    pub fn decoding(&self) -> Decoding {
        self.decoding
    }

    /// Read all of stdin. Failures are reported on stderr and yield "".
    pub fn readln(&self) -> String {
        self.read_from(std::io::stdin().lock())
    }

    pub fn try_readln(&self) -> Result<String, ReadError> {
        self.try_read_from(std::io::stdin().lock())
    }

    pub fn read_from(&self, reader: impl Read) -> String {
        match self.try_read_from(reader) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "input read failed, continuing with empty input");
                let message = format!("Error reading input from user -- {}", err);
                if let Err(report) = self.eprintln.invoke_text(&message) {
                    tracing::error!(error = %report, "could not report input read failure");
                }
                String::new()
            }
        }
    }

    pub fn try_read_from(&self, mut reader: impl Read) -> Result<String, ReadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        match self.decoding {
            Decoding::Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Decoding::Strict => Ok(String::from_utf8(bytes)?),
        }
    }
}

/// Decoding every thread's standard stream bindings are built with.
static STDIO_DECODING: OnceLock<Decoding> = OnceLock::new();

thread_local! {
    static STDIO: RefCell<Option<Io>> = const { RefCell::new(None) };
}

/// Fix the input decoding for the whole process. Only the first call takes
/// effect; returns false if the decoding was already set.
pub fn configure_stdio(decoding: Decoding) -> bool {
    STDIO_DECODING.set(decoding).is_ok()
}

/// The process-wide input decoding (`Lossy` until configured).
pub fn stdio_decoding() -> Decoding {
    STDIO_DECODING.get().copied().unwrap_or_default()
}

/// Replace this thread's standard stream bindings.
pub fn install_stdio(io: Io) {
    STDIO.with(|slot| *slot.borrow_mut() = Some(io));
}

/// Run `f` against this thread's standard stream bindings. A thread without
/// bindings gets stdio-bound ones using the process-wide decoding.
pub fn with_stdio<R>(f: impl FnOnce(&Io) -> R) -> R {
    STDIO.with(|slot| {
        let mut slot = slot.borrow_mut();
        let io = slot.get_or_insert_with(|| Io::stdio().with_decoding(stdio_decoding()));
        f(io)
    })
}

unsafe fn text_from_ptr(s: *const c_char) -> String {
    if s.is_null() {
        return String::new();
    }
    unsafe { std::ffi::CStr::from_ptr(s) }
        .to_string_lossy()
        .into_owned()
}

fn status(result: CallResult) -> i64 {
    match result {
        Ok(()) => 1,
        Err(err) => {
            tracing::debug!(error = %err, "stream write failed");
            0
        }
    }
}

/// Print a string followed by a newline. Returns 1 on success, 0 on write failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_println_str(s: *const c_char) -> i64 {
    let text = unsafe { text_from_ptr(s) };
    with_stdio(|io| status(io.println.invoke_text(&text)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_print_str(s: *const c_char) -> i64 {
    let text = unsafe { text_from_ptr(s) };
    with_stdio(|io| status(io.print.invoke_text(&text)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_eprintln_str(s: *const c_char) -> i64 {
    let text = unsafe { text_from_ptr(s) };
    with_stdio(|io| status(io.eprintln.invoke_text(&text)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_eprint_str(s: *const c_char) -> i64 {
    let text = unsafe { text_from_ptr(s) };
    with_stdio(|io| status(io.eprint.invoke_text(&text)))
}

#[unsafe(no_mangle)]
pub extern "C" fn tea_println_number(n: f64) -> i64 {
    with_stdio(|io| status(io.println.invoke_numeric(n)))
}

#[unsafe(no_mangle)]
pub extern "C" fn tea_print_number(n: f64) -> i64 {
    with_stdio(|io| status(io.print.invoke_numeric(n)))
}

unsafe fn read_into_abi(reader: impl Read, out_len: *mut usize) -> *mut u8 {
    let input = with_stdio(|io| io.read_from(reader)).into_bytes().into_boxed_slice();
    unsafe { *out_len = input.len() };
    Box::into_raw(input) as *mut u8
}

/// Read all of stdin (blocking). Writes the byte length to `out_len`; the
/// bytes may contain NUL. Free the result with `tea_bytes_free`.
/// Returns null only when `out_len` is null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_readln(out_len: *mut usize) -> *mut u8 {
    if out_len.is_null() {
        return std::ptr::null_mut();
    }
    unsafe { read_into_abi(std::io::stdin().lock(), out_len) }
}

/// Free bytes returned by `tea_readln`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_bytes_free(ptr: *mut u8, len: usize) {
    if !ptr.is_null() {
        drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
    }
}
