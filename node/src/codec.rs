//! JavaScript values to the UTF-16 buffers the core crate takes.
//!
//! JS strings are UTF-16 already, so names are copied code unit for code unit:
//! embedded NULs and lone surrogates reach the core untouched and are judged
//! there.

use napi::{CallContext, Error, JsString, JsUnknown, Result, Status, ValueType};

fn invalid_argument(index: usize) -> Error {
    Error::new(
        Status::InvalidArg,
        format!("argument {index} must be a string"),
    )
}

/// Copies a JS string into an explicit-length UTF-16 buffer.
///
/// Fails with `InvalidArg` for any other JS type.
pub fn to_native(value: &JsUnknown, index: usize) -> Result<Vec<u16>> {
    if value.get_type()? != ValueType::String {
        return Err(invalid_argument(index));
    }
    // SAFETY: the value was just checked to be a string.
    let string = unsafe { value.cast::<JsString>() };
    let len = string.utf16_len()?;
    // The napi buffer carries a terminator past the string's own code units.
    let mut wide = string.into_utf16()?.as_slice().to_vec();
    wide.truncate(len);
    Ok(wide)
}

/// Required string argument.
pub fn string_arg(ctx: &CallContext<'_>, index: usize) -> Result<Vec<u16>> {
    if index >= ctx.length {
        return Err(invalid_argument(index));
    }
    to_native(&ctx.get::<JsUnknown>(index)?, index)
}

/// Optional string argument; `undefined`, `null` and absence all map to `None`.
pub fn optional_string_arg(ctx: &CallContext<'_>, index: usize) -> Result<Option<Vec<u16>>> {
    if index >= ctx.length {
        return Ok(None);
    }
    let value = ctx.get::<JsUnknown>(index)?;
    match value.get_type()? {
        ValueType::Undefined | ValueType::Null => Ok(None),
        _ => to_native(&value, index).map(Some),
    }
}
