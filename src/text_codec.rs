//! Conversions between Rust strings and the UTF-16 buffers Windows APIs use.
//!
//! Everything here is length based: embedded NULs survive a round trip unless
//! a terminated string is explicitly requested for an API that needs one.

use thiserror::Error;
use widestring::{U16CStr, U16CString, U16String};

/// Text that cannot be represented in the requested encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EncodingError {
    /// A NUL code unit where the target API requires a terminated string.
    #[error("interior NUL at code unit {index}")]
    InteriorNul {
        /// Position of the first NUL, in UTF-16 code units.
        index: usize,
    },
    /// An unpaired surrogate in a UTF-16 buffer.
    #[error("unpaired surrogate 0x{unit:04X} at code unit {index}")]
    InvalidUtf16 {
        /// Position of the surrogate, in UTF-16 code units.
        index: usize,
        /// The offending code unit.
        unit: u16,
    },
}

/// Converts `text` to UTF-16, keeping embedded NULs.
#[inline]
#[must_use]
pub fn to_native(text: &str) -> U16String {
    U16String::from_str(text)
}

/// Converts `text` to a NUL-terminated UTF-16 string.
///
/// # Errors
/// [`EncodingError::InteriorNul`] if `text` contains a NUL.
#[inline]
pub fn to_native_terminated(text: &str) -> Result<U16CString, EncodingError> {
    terminate(to_native(text).into_vec())
}

/// Appends a terminator to an explicit-length UTF-16 buffer.
///
/// # Errors
/// [`EncodingError::InteriorNul`] if `wide` contains a NUL.
#[inline]
pub fn terminate(wide: impl Into<Vec<u16>>) -> Result<U16CString, EncodingError> {
    let wide = wide.into();
    // `from_vec` accepts a NUL in the last slot as the terminator; the buffer
    // has an explicit length, so any NUL is content.
    if let Some(index) = wide.iter().position(|&unit| unit == 0) {
        return Err(EncodingError::InteriorNul { index });
    }
    U16CString::from_vec(wide).map_err(|err| EncodingError::InteriorNul {
        index: err.nul_position(),
    })
}

/// Converts an explicit-length UTF-16 buffer back to a Rust string.
///
/// # Errors
/// [`EncodingError::InvalidUtf16`] on the first unpaired surrogate.
#[inline]
pub fn to_host(wide: &[u16]) -> Result<String, EncodingError> {
    let mut text = String::with_capacity(wide.len());
    let mut index = 0usize;
    for decoded in char::decode_utf16(wide.iter().copied()) {
        match decoded {
            Ok(ch) => {
                text.push(ch);
                index += ch.len_utf16();
            }
            Err(err) => {
                return Err(EncodingError::InvalidUtf16 {
                    index,
                    unit: err.unpaired_surrogate(),
                });
            }
        }
    }
    Ok(text)
}

/// Like [`to_host`], replacing unpaired surrogates with U+FFFD.
#[inline]
#[must_use]
pub fn to_host_lossy(wide: &[u16]) -> String {
    String::from_utf16_lossy(wide)
}

/// Borrows a NUL-terminated buffer owned by the OS.
///
/// Returns `None` for a null pointer.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated UTF-16 buffer that stays
/// alive and unmodified for `'a`.
#[inline]
#[must_use]
pub unsafe fn from_os_ptr<'a>(ptr: *const u16) -> Option<&'a U16CStr> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: non-null, terminated and alive for `'a` per the caller contract.
        Some(unsafe { U16CStr::from_ptr_str(ptr) })
    }
}

/// Reads an optional OS string field into an owned Rust string.
///
/// # Safety
/// Same contract as [`from_os_ptr`].
#[inline]
#[must_use]
pub unsafe fn read_os_string(ptr: *const u16) -> Option<String> {
    // SAFETY: forwarded caller contract.
    unsafe { from_os_ptr(ptr) }.map(|wide| to_host_lossy(wide.as_slice()))
}
