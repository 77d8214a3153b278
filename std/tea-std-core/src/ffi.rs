///
/// Record C ABI
///
/// Entry points AOT-compiled TeaScript code calls to allocate and access
/// object literals. Keys are NUL-terminated UTF-8 strings copied into the
/// record; values are 64-bit slots (inline primitives or pointers owned by
/// the caller).
///
/// Failures are reported the way the rest of the runtime ABI does it: null
/// pointers from constructors, 0/1 status codes from accessors.
///

use std::ffi::{CStr, CString, c_char};

use crate::record::Record;

/// Record with C string keys and 64-bit value slots.
pub type TeaRecord = Record<CString, i64>;

unsafe fn key_from_ptr<'a>(key: *const c_char) -> Option<&'a CStr> {
    if key.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(key) })
    }
}

/// Allocate a record from parallel key and value arrays.
/// Returns null if the counts differ or any pointer is null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_record_new(
    keys: *const *const c_char,
    values: *const i64,
    key_count: usize,
    value_count: usize,
) -> *mut TeaRecord {
    if (key_count > 0 && keys.is_null()) || (value_count > 0 && values.is_null()) {
        return std::ptr::null_mut();
    }

    let mut owned_keys = Vec::with_capacity(key_count);
    for i in 0..key_count {
        match unsafe { key_from_ptr(*keys.add(i)) } {
            Some(key) => owned_keys.push(key.to_owned()),
            None => return std::ptr::null_mut(),
        }
    }

    let owned_values: &[i64] = if value_count == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(values, value_count) }
    };

    match Record::new(owned_keys, owned_values.iter().copied()) {
        Ok(record) => Box::into_raw(Box::new(record)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Look up `key`. Returns 1 and writes the value to `out` if found, 0 otherwise.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_record_get(
    record: *const TeaRecord,
    key: *const c_char,
    out: *mut i64,
) -> i64 {
    if record.is_null() || out.is_null() {
        return 0;
    }
    let Some(key) = (unsafe { key_from_ptr(key) }) else {
        return 0;
    };

    unsafe {
        match (*record).get(key) {
            Ok(value) => {
                *out = *value;
                1
            }
            Err(_) => 0,
        }
    }
}

/// Replace the value at the first occurrence of `key`. Returns 1 on success, 0 if absent.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_record_set(
    record: *mut TeaRecord,
    key: *const c_char,
    value: i64,
) -> i64 {
    if record.is_null() {
        return 0;
    }
    let Some(key) = (unsafe { key_from_ptr(key) }) else {
        return 0;
    };

    unsafe {
        match (*record).set(key, value) {
            Ok(()) => 1,
            Err(_) => 0,
        }
    }
}

/// Append a pair; duplicates of existing keys are allowed.
/// Returns 1 if the pair was appended, 0 for a null record or key.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_record_add(record: *mut TeaRecord, key: *const c_char, value: i64) -> i64 {
    if record.is_null() {
        return 0;
    }
    let Some(key) = (unsafe { key_from_ptr(key) }) else {
        return 0;
    };

    unsafe { (*record).add(key.to_owned(), value) };
    1
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_record_len(record: *const TeaRecord) -> i64 {
    if record.is_null() {
        0
    } else {
        unsafe { (*record).len() as i64 }
    }
}

/// Free a record allocated by `tea_record_new`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tea_record_free(record: *mut TeaRecord) {
    if !record.is_null() {
        drop(unsafe { Box::from_raw(record) });
    }
}
