//! Rendering of OS status codes as single-line messages.

use cfg_if::cfg_if;

use crate::text_codec::to_host_lossy;

/// Message returned when the OS has no text for a code.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// First NetAPI status code (`NERR_BASE`).
pub const NERR_BASE: u32 = 2100;
/// Last NetAPI status code (`MAX_NERR`).
pub const MAX_NERR: u32 = NERR_BASE + 899;

/// `true` for codes whose text lives in `netmsg.dll` rather than the system table.
#[cfg(any(windows, test))]
#[inline]
#[must_use]
pub const fn is_netapi_status(code: u32) -> bool {
    NERR_BASE <= code && code <= MAX_NERR
}

/// Strips trailing CR/LF from an OS message.
///
/// Returns `None` when nothing but line breaks (or nothing at all) remains.
#[inline]
#[must_use]
pub fn trim_message(raw: &[u16]) -> Option<String> {
    let end = raw
        .iter()
        .rposition(|&unit| unit != u16::from(b'\r') && unit != u16::from(b'\n'))?;
    raw.get(..=end).map(to_host_lossy)
}

cfg_if! {
    if #[cfg(windows)] {
        mod windows;

        /// Formats `code` as a localized, trimmed message.
        ///
        /// Falls back to [`UNKNOWN_ERROR`] when the OS has no message.
        #[inline]
        #[must_use]
        pub fn format_system_error(code: u32) -> String {
            windows::format_message(code).unwrap_or_else(|| {
                tracing::warn!(code, "no system message for error code");
                UNKNOWN_ERROR.to_owned()
            })
        }
    } else {
        /// Formats `code` as a localized, trimmed message.
        ///
        /// Without a Windows message table every code renders as [`UNKNOWN_ERROR`].
        #[inline]
        #[must_use]
        pub fn format_system_error(code: u32) -> String {
            tracing::debug!(code, "no system message table on this platform");
            UNKNOWN_ERROR.to_owned()
        }
    }
}
