use windows_sys::Win32::NetworkManagement::NetManagement::{USER_INFO_0, USER_INFO_1, USER_INFO_23};

use crate::account_info::{AccountFlags, AccountInfo, Privilege};
use crate::error::Error;
use crate::identifier::sid_to_string;
use crate::text_codec::read_os_string;

mod sealed {
    pub trait Sealed {}
}

/// Information level passed to `NetUserGetInfo`, paired with the record
/// layout the OS fills for it.
///
/// Sealed: the set of supported levels is closed.
pub trait InfoLevel: sealed::Sealed {
    /// Numeric level.
    const LEVEL: u32;
    /// Record layout for [`InfoLevel::LEVEL`].
    type Record;

    /// Copies the fields this level carries into an [`AccountInfo`].
    ///
    /// # Errors
    /// Whatever rendering a field can fail with (e.g. an invalid SID).
    ///
    /// # Safety
    /// `record` must be a live buffer returned by `NetUserGetInfo` for
    /// [`InfoLevel::LEVEL`].
    unsafe fn summarize(record: &Self::Record) -> Result<AccountInfo, Error>;
}

/// Level 0: name only.
#[derive(Debug)]
pub enum Level0 {}

/// Level 1: name, privilege, flags, comment.
#[derive(Debug)]
pub enum Level1 {}

/// Level 23: name, full name, comment, flags and SID.
#[derive(Debug)]
pub enum Level23 {}

impl sealed::Sealed for Level0 {}
impl sealed::Sealed for Level1 {}
impl sealed::Sealed for Level23 {}

impl InfoLevel for Level0 {
    const LEVEL: u32 = 0;
    type Record = USER_INFO_0;

    #[inline]
    unsafe fn summarize(record: &Self::Record) -> Result<AccountInfo, Error> {
        Ok(AccountInfo {
            // SAFETY: string fields of a live record are null or terminated.
            name: unsafe { read_os_string(record.usri0_name) }.unwrap_or_default(),
            ..AccountInfo::default()
        })
    }
}

impl InfoLevel for Level1 {
    const LEVEL: u32 = 1;
    type Record = USER_INFO_1;

    #[inline]
    unsafe fn summarize(record: &Self::Record) -> Result<AccountInfo, Error> {
        #[expect(
            clippy::multiple_unsafe_ops_per_block,
            reason = "Same operation so same safety doc"
        )]
        // SAFETY: string fields of a live record are null or terminated.
        let (name, comment) = unsafe {
            (
                read_os_string(record.usri1_name),
                read_os_string(record.usri1_comment),
            )
        };
        Ok(AccountInfo {
            name: name.unwrap_or_default(),
            comment,
            flags: Some(AccountFlags(record.usri1_flags)),
            privilege: Privilege::try_from(record.usri1_priv).ok(),
            ..AccountInfo::default()
        })
    }
}

impl InfoLevel for Level23 {
    const LEVEL: u32 = 23;
    type Record = USER_INFO_23;

    #[inline]
    unsafe fn summarize(record: &Self::Record) -> Result<AccountInfo, Error> {
        #[expect(
            clippy::multiple_unsafe_ops_per_block,
            reason = "Same operation so same safety doc"
        )]
        // SAFETY: string fields of a live record are null or terminated.
        let (name, full_name, comment) = unsafe {
            (
                read_os_string(record.usri23_name),
                read_os_string(record.usri23_full_name),
                read_os_string(record.usri23_comment),
            )
        };
        // SAFETY: the SID lives inside the same record buffer.
        let sid = unsafe { sid_to_string(record.usri23_user_sid) }?;
        Ok(AccountInfo {
            name: name.unwrap_or_default(),
            full_name,
            comment,
            flags: Some(AccountFlags(record.usri23_flags)),
            privilege: None,
            sid: Some(sid),
        })
    }
}
