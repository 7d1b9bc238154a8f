use core::num::NonZeroU32;

use crate::error::SystemError;

/// `NERR_Success`.
pub const NERR_SUCCESS: u32 = 0;
/// `NERR_UserNotFound`.
pub const NERR_USER_NOT_FOUND: u32 = 2221;

/// Non-failure outcomes of `NetUserGetInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The record was returned.
    Success,
    /// No account with that name; an expected outcome, not an error.
    UserNotFound,
}

/// Classifies a `NET_API_STATUS`.
///
/// # Errors
/// Every status other than success and "user not found" is a [`SystemError`].
#[inline]
pub const fn classify(status: u32) -> Result<StatusClass, SystemError> {
    match NonZeroU32::new(status) {
        None => Ok(StatusClass::Success),
        Some(_) if status == NERR_USER_NOT_FOUND => Ok(StatusClass::UserNotFound),
        Some(code) => Err(SystemError::from_code(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_statuses() {
        assert_eq!(classify(NERR_SUCCESS), Ok(StatusClass::Success));
        assert_eq!(classify(NERR_USER_NOT_FOUND), Ok(StatusClass::UserNotFound));
    }

    #[test]
    fn access_denied_is_not_conflated_with_not_found() {
        // ERROR_ACCESS_DENIED
        assert_eq!(classify(5).map_err(u32::from), Err(5));
        // NERR_InvalidComputer
        assert_eq!(classify(2351).map_err(u32::from), Err(2351));
    }

    proptest! {
        #[test]
        fn other_statuses_are_failures(status in any::<u32>()) {
            prop_assume!(status != NERR_SUCCESS && status != NERR_USER_NOT_FOUND);
            prop_assert_eq!(classify(status).map_err(u32::from), Err(status));
        }
    }

    #[cfg(windows)]
    #[test]
    fn constants_match_windows_headers() {
        use windows_sys::Win32::NetworkManagement::NetManagement::{NERR_Success, NERR_UserNotFound};
        assert_eq!(NERR_SUCCESS, NERR_Success);
        assert_eq!(NERR_USER_NOT_FOUND, NERR_UserNotFound);
    }
}
