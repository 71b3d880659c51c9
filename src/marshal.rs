//! Conversions between caller-owned buffers and owned Rust values.
//!
//! Incoming arrays are copied into owned vectors before any native call, so
//! nothing aliases caller memory afterwards. Outgoing arrays are freshly
//! allocated and handed over as [`HbDoubleArray`], to be released with
//! `hb_double_array_free`.

use std::ffi::{CStr, CString, c_char};

use crate::error::{Error, Result};

/// A heap-allocated array of doubles owned by the caller until freed.
///
/// `data` is never null for an array produced by this crate, even when `len` is zero.
#[repr(C)]
#[derive(Debug)]
pub struct HbDoubleArray {
    /// First element of the array.
    pub data: *mut f64,
    /// Number of elements.
    pub len: usize,
}

impl HbDoubleArray {
    /// An array that owns nothing. Freeing it is a no-op.
    pub const fn null() -> Self {
        HbDoubleArray {
            data: std::ptr::null_mut(),
            len: 0,
        }
    }

    /// Moves `values` into a new caller-owned array.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let boxed = values.into_boxed_slice();
        let len = boxed.len();
        let data = Box::into_raw(boxed).cast::<f64>();
        HbDoubleArray { data, len }
    }

    /// Takes back ownership of the memory and drops it.
    ///
    /// # Safety
    ///
    /// The array must come from [`HbDoubleArray::from_vec`] (or be null) and
    /// must not have been freed already.
    pub unsafe fn free(self) {
        if self.data.is_null() {
            return;
        }
        let slice = std::ptr::slice_from_raw_parts_mut(self.data, self.len);
        drop(unsafe { Box::from_raw(slice) });
    }
}

/// Copies `len` elements starting at `ptr` into an owned vector.
///
/// A null pointer is accepted only together with `len == 0`.
///
/// # Safety
///
/// If `ptr` is non-null it must be valid for reads of `len` elements.
pub unsafe fn copy_in<T: Copy>(
    ptr: *const T,
    len: usize,
    context: &'static str,
    what: &str,
) -> Result<Vec<T>> {
    if ptr.is_null() {
        if len == 0 {
            return Ok(Vec::new());
        }
        return Err(Error::invalid_argument(
            context,
            format!("{what} is null but its length is {len}"),
        ));
    }
    let src = unsafe { std::slice::from_raw_parts(ptr, len) };
    let mut owned = Vec::new();
    owned.try_reserve_exact(len).map_err(|_| {
        Error::ResourceExhaustion(format!("{context}: cannot copy {len} elements of {what}"))
    })?;
    owned.extend_from_slice(src);
    Ok(owned)
}

/// Allocates a zeroed result buffer of exactly `len` values.
///
/// Allocation failure is reported as [`Error::ResourceExhaustion`] instead of aborting.
pub fn result_buffer(len: usize, context: &'static str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|_| {
        Error::ResourceExhaustion(format!("{context}: cannot allocate {len} result values"))
    })?;
    out.resize(len, 0.0);
    Ok(out)
}

/// Reads a NUL-terminated UTF-8 string.
///
/// # Safety
///
/// If `ptr` is non-null it must point to a NUL-terminated string.
pub unsafe fn read_str(ptr: *const c_char, context: &'static str) -> Result<String> {
    if ptr.is_null() {
        return Err(Error::invalid_argument(context, "path is null"));
    }
    let c_str = unsafe { CStr::from_ptr(ptr) };
    c_str
        .to_str()
        .map(str::to_owned)
        .map_err(|_| Error::invalid_argument(context, "path is not valid UTF-8"))
}

/// Converts a path into a C string, rejecting empty paths and interior NUL bytes.
pub fn path_to_cstring(path: &str, context: &'static str) -> Result<CString> {
    if path.is_empty() {
        return Err(Error::invalid_argument(context, "path must not be empty"));
    }
    CString::new(path)
        .map_err(|_| Error::invalid_argument(context, "path contains a NUL byte"))
}

/// Builds a C string for a message, replacing interior NUL bytes.
pub(crate) fn message_to_cstring(message: &str) -> CString {
    CString::new(message.replace('\0', "\\0")).unwrap_or_default()
}
