//! Canonical `S-R-A-S1-S2-...` text for security identifiers.
//!
//! [`canonical_sid_string`] works from the binary layout on every platform.
//! On Windows, `sid_to_string` asks the OS (`ConvertSidToStringSidW`).

use core::fmt::{self, Display};

use thiserror::Error;

/// The security identifier is malformed or was rejected by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("Invalid security identifier")]
pub struct InvalidIdentifier;

/// Only SID revision in use.
pub const SID_REVISION: u8 = 1;
/// `SID_MAX_SUB_AUTHORITIES`.
pub const MAX_SUB_AUTHORITIES: u8 = 15;

const REVISION_OFFSET: usize = 0;
const COUNT_OFFSET: usize = 1;
const AUTHORITY_RANGE: core::ops::Range<usize> = 2..8;
const HEADER_SIZE: usize = 8;

/// Byte length of a SID with `count` sub-authorities.
#[inline]
#[must_use]
pub const fn sid_length(count: u8) -> usize {
    HEADER_SIZE + 4 * count as usize
}

/// Validates a raw SID blob like `IsValidSid` would, without assuming alignment.
///
/// - revision is [`SID_REVISION`]
/// - sub-authority count is at most [`MAX_SUB_AUTHORITIES`]
/// - total size is exactly `8 + 4 * count`
///
/// # Errors
/// [`InvalidIdentifier`] when any rule is violated.
#[inline]
pub fn validate_sid_bytes(bytes: &[u8]) -> Result<u8, InvalidIdentifier> {
    if bytes.len() < HEADER_SIZE || bytes.get(REVISION_OFFSET) != Some(&SID_REVISION) {
        return Err(InvalidIdentifier);
    }
    let count = *bytes.get(COUNT_OFFSET).ok_or(InvalidIdentifier)?;
    if count > MAX_SUB_AUTHORITIES || bytes.len() != sid_length(count) {
        return Err(InvalidIdentifier);
    }
    Ok(count)
}

/// Renders a binary SID in canonical form.
///
/// The authority is printed in decimal when it fits in 32 bits and as `0x`
/// hexadecimal otherwise, as Windows does.
///
/// # Errors
/// [`InvalidIdentifier`] if `bytes` is not a well-formed SID.
#[inline]
pub fn canonical_sid_string(bytes: &[u8]) -> Result<String, InvalidIdentifier> {
    validate_sid_bytes(bytes)?;
    let authority = bytes.get(AUTHORITY_RANGE).ok_or(InvalidIdentifier)?;
    let mut be_bytes = [0u8; 8];
    be_bytes
        .get_mut(2..)
        .ok_or(InvalidIdentifier)?
        .copy_from_slice(authority);
    let authority = u64::from_be_bytes(be_bytes);

    Ok(SidText {
        authority,
        sub_authorities: bytes.get(HEADER_SIZE..).unwrap_or_default(),
    }
    .to_string())
}

/// Text form of an already validated SID.
struct SidText<'a> {
    authority: u64,
    sub_authorities: &'a [u8],
}

impl Display for SidText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{SID_REVISION}")?;
        if self.authority <= 0xFFFF_FFFF {
            write!(f, "-{}", self.authority)?;
        } else {
            write!(f, "-0x{:012X}", self.authority)?;
        }
        for chunk in self.sub_authorities.chunks_exact(4) {
            let mut sub = [0u8; 4];
            sub.copy_from_slice(chunk);
            write!(f, "-{}", u32::from_le_bytes(sub))?;
        }
        Ok(())
    }
}

#[cfg(windows)]
mod windows {
    use windows_sys::Win32::Foundation::{ERROR_INVALID_SID, GetLastError};
    use windows_sys::Win32::Security::Authorization::ConvertSidToStringSidW;
    use windows_sys::Win32::Security::{GetLengthSid, IsValidSid, PSID};

    use super::InvalidIdentifier;
    use crate::error::{Error, SystemError};
    use crate::scoped_resource::Win32Local;
    use crate::text_codec::{from_os_ptr, to_host};
    use core::num::NonZeroU32;

    /// Renders `sid` with `ConvertSidToStringSidW`.
    ///
    /// # Errors
    /// - [`Error::InvalidIdentifier`] for a null or malformed SID.
    /// - [`Error::SystemFailure`] for any other OS failure.
    /// - [`Error::Encoding`] if the OS string is not valid UTF-16.
    ///
    /// # Safety
    /// A non-null `sid` must point to memory readable as a SID for the
    /// duration of the call.
    #[inline]
    pub unsafe fn sid_to_string(sid: PSID) -> Result<String, Error> {
        if sid.is_null() {
            return Err(InvalidIdentifier.into());
        }
        let mut text = Win32Local::<u16>::new();
        // SAFETY: `sid` is readable per the caller contract; the out pointer
        // receives a `LocalAlloc` string owned by `text`.
        let ok = unsafe { ConvertSidToStringSidW(sid, text.out_ptr()) };
        if ok == 0 {
            // SAFETY: read right after the failing call.
            let code = unsafe { GetLastError() };
            return Err(match NonZeroU32::new(code) {
                Some(_) if code == ERROR_INVALID_SID => InvalidIdentifier.into(),
                Some(code) => SystemError::from(code).into(),
                None => InvalidIdentifier.into(),
            });
        }
        // SAFETY: on success the OS wrote a terminated string owned by `text`,
        // which outlives this borrow.
        let wide = unsafe { from_os_ptr(text.as_ptr()) }.ok_or(InvalidIdentifier)?;
        Ok(to_host(wide.as_slice())?)
    }

    /// Borrows the binary form of `sid`.
    ///
    /// # Errors
    /// [`InvalidIdentifier`] if `IsValidSid` rejects it.
    ///
    /// # Safety
    /// `sid` must be null or point to a SID that outlives `'a`.
    #[inline]
    pub unsafe fn sid_bytes<'a>(sid: PSID) -> Result<&'a [u8], InvalidIdentifier> {
        // SAFETY: `IsValidSid` tolerates malformed input; null is checked first.
        if sid.is_null() || unsafe { IsValidSid(sid) } == 0 {
            return Err(InvalidIdentifier);
        }
        // SAFETY: the SID was validated above.
        let len = unsafe { GetLengthSid(sid) } as usize;
        // SAFETY: a valid SID spans exactly `GetLengthSid` bytes, alive for `'a`.
        Ok(unsafe { core::slice::from_raw_parts(sid.cast::<u8>().cast_const(), len) })
    }

}

#[cfg(windows)]
pub use windows::{sid_bytes, sid_to_string};

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // S-1-5-32-544 (BUILTIN\Administrators)
    const ADMINISTRATORS: [u8; 16] = [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0];

    #[test]
    fn renders_builtin_administrators() {
        assert_eq!(
            canonical_sid_string(&ADMINISTRATORS).unwrap(),
            "S-1-5-32-544"
        );
    }

    #[test]
    fn large_authority_is_hex() {
        let sid = [1u8, 1, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 7, 0, 0, 0];
        assert_eq!(
            canonical_sid_string(&sid).unwrap(),
            "S-1-0x010203040506-7"
        );
    }

    #[test]
    fn header_only_sid_renders_authority() {
        assert_eq!(
            canonical_sid_string(&[1, 0, 0, 0, 0, 0, 0, 5]).unwrap(),
            "S-1-5"
        );
        let text = SidText {
            authority: 0x1_0000_0000,
            sub_authorities: &[1, 0, 0, 0],
        };
        assert_eq!(format!("{text}"), "S-1-0x000100000000-1");
    }

    #[test]
    fn rejects_malformed_blobs() {
        assert_eq!(canonical_sid_string(&[]), Err(InvalidIdentifier));
        assert_eq!(
            canonical_sid_string(ADMINISTRATORS.get(..12).unwrap()),
            Err(InvalidIdentifier)
        );
        let mut wrong_revision = ADMINISTRATORS;
        wrong_revision[0] = 2;
        assert_eq!(canonical_sid_string(&wrong_revision), Err(InvalidIdentifier));
        let mut too_many = [0u8; 8 + 4 * 16];
        too_many[0] = 1;
        too_many[1] = 16;
        assert_eq!(canonical_sid_string(&too_many), Err(InvalidIdentifier));
    }

    proptest! {
        #[test]
        fn dash_count_matches_sub_authorities(
            authority in 0u64..=0xFFFF_FFFF,
            subs in proptest::collection::vec(any::<u32>(), 0..=15),
        ) {
            let mut bytes = vec![1u8, u8::try_from(subs.len()).unwrap()];
            bytes.extend_from_slice(&authority.to_be_bytes()[2..]);
            for sub in &subs {
                bytes.extend_from_slice(&sub.to_le_bytes());
            }
            let text = canonical_sid_string(&bytes).unwrap();
            prop_assert!(text.starts_with("S-1-"), "bad prefix: {}", text);
            prop_assert_eq!(text.matches('-').count(), subs.len() + 2);
            let expected_tail: String = subs.iter().map(|sub| format!("-{sub}")).collect();
            prop_assert!(text.ends_with(&expected_tail), "bad tail: {}", text);
        }
    }
}
