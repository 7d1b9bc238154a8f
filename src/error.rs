use core::fmt::{self, Display};
use core::num::NonZeroU32;

use thiserror::Error;

use crate::account_name::AccountNameError;
use crate::identifier::InvalidIdentifier;
use crate::system_error::format_system_error;
use crate::text_codec::EncodingError;

/// Non-success status reported by the OS during a lookup, other than
/// "user not found".
///
/// Holds the raw `NET_API_STATUS` / Win32 error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemError {
    code: NonZeroU32,
}

impl SystemError {
    /// Wraps a raw non-success status.
    #[inline]
    #[must_use]
    pub const fn from_code(code: NonZeroU32) -> Self {
        Self { code }
    }

    /// The raw status code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u32 {
        self.code.get()
    }

    /// Renders the code with [`format_system_error`].
    #[inline]
    #[must_use]
    pub fn message(self) -> String {
        format_system_error(self.code())
    }
}

impl From<NonZeroU32> for SystemError {
    #[inline]
    fn from(code: NonZeroU32) -> Self {
        Self::from_code(code)
    }
}

impl From<SystemError> for u32 {
    #[inline]
    fn from(error: SystemError) -> Self {
        error.code()
    }
}

impl Display for SystemError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system error {}", self.code)
    }
}

impl core::error::Error for SystemError {}

#[cfg(all(windows, feature = "windows_result"))]
impl From<SystemError> for windows_result::HRESULT {
    #[inline]
    fn from(value: SystemError) -> Self {
        Self::from_win32(value.code())
    }
}

#[cfg(all(windows, feature = "windows_result"))]
impl From<SystemError> for windows_result::Error {
    #[inline]
    fn from(value: SystemError) -> Self {
        let hresult: windows_result::HRESULT = value.into();
        Self::from_hresult(hresult)
    }
}

/// Errors surfaced to callers of the lookup entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// The account name argument is unusable (wrong type or malformed).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Text could not be represented in the target encoding.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The OS reported a failure other than "user not found".
    #[error("{message} (error {code})")]
    SystemFailure {
        /// Raw status code.
        code: u32,
        /// Trimmed OS message for `code`.
        message: String,
    },

    /// The OS refused to render a security identifier.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
}

impl From<SystemError> for Error {
    #[inline]
    fn from(value: SystemError) -> Self {
        Self::SystemFailure {
            code: value.code(),
            message: value.message(),
        }
    }
}

impl From<AccountNameError> for Error {
    #[inline]
    fn from(value: AccountNameError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_error_keeps_code() {
        let error = SystemError::from(NonZeroU32::MIN.saturating_add(4));
        assert_eq!(u32::from(error), 5);
        assert_eq!(error.to_string(), "system error 5");
    }

    #[test]
    fn system_failure_message_never_ends_with_newline() {
        let error = Error::from(SystemError::from(NonZeroU32::MIN.saturating_add(4)));
        let Error::SystemFailure { code, message } = &error else {
            unreachable!("SystemError always maps to SystemFailure");
        };
        assert_eq!(*code, 5);
        assert!(!message.ends_with(['\r', '\n']), "untrimmed message: {message:?}");
    }

    #[test]
    fn account_name_errors_are_invalid_arguments() {
        let error = Error::from(AccountNameError::EmptyName);
        assert!(matches!(error, Error::InvalidArgument(_)), "got {error}");
    }
}
