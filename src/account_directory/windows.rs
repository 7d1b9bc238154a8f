use core::marker::PhantomData;
use core::ptr;

use tracing::{debug, warn};
use widestring::U16CStr;
use windows_sys::Win32::NetworkManagement::NetManagement::NetUserGetInfo;
use windows_sys::Win32::Security::PSID;

use super::{InfoLevel, Level23, StatusClass, classify};
use crate::account_info::AccountInfo;
use crate::account_name::AccountName;
use crate::error::{Error, SystemError};
use crate::identifier::sid_to_string;
use crate::scoped_resource::NetApiBuffer;

/// Borrowed view of a record held by an [`AccountDirectory`].
///
/// Cannot outlive the directory, so the OS buffer is never read after it has
/// been freed or replaced.
pub struct AccountRecord<'a, L: InfoLevel> {
    record: &'a L::Record,
    _level: PhantomData<L>,
}

impl<L: InfoLevel> Clone for AccountRecord<'_, L> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: InfoLevel> Copy for AccountRecord<'_, L> {}

impl<'a, L: InfoLevel> AccountRecord<'a, L> {
    /// The raw `USER_INFO_*` structure.
    #[inline]
    #[must_use]
    pub const fn raw(&self) -> &'a L::Record {
        self.record
    }

    /// Copies the record into an owned [`AccountInfo`].
    ///
    /// # Errors
    /// See [`InfoLevel::summarize`].
    #[inline]
    pub fn info(&self) -> Result<AccountInfo, Error> {
        // SAFETY: `record` was returned by `NetUserGetInfo` for `L::LEVEL` and
        // is kept alive by the directory borrow.
        unsafe { L::summarize(self.record) }
    }
}

impl AccountRecord<'_, Level23> {
    /// Raw SID of the account; valid while this record is.
    #[inline]
    #[must_use]
    pub const fn sid(&self) -> PSID {
        self.record.usri23_user_sid
    }

    /// Canonical SID text of the account.
    ///
    /// # Errors
    /// [`Error::InvalidIdentifier`] if the OS refuses to render it.
    #[inline]
    pub fn sid_string(&self) -> Result<String, Error> {
        // SAFETY: the SID lives inside the record buffer borrowed by `self`.
        unsafe { sid_to_string(self.sid()) }
    }
}

/// Outcome of a lookup that did not fail.
pub enum LookupOutcome<'a, L: InfoLevel> {
    /// The account exists.
    Found(AccountRecord<'a, L>),
    /// No account with that name.
    NotFound,
}

impl<L: InfoLevel> LookupOutcome<'_, L> {
    /// `true` for [`LookupOutcome::Found`].
    #[inline]
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Runs `NetUserGetInfo` at information level `L` and owns the returned buffer.
///
/// Each call to [`AccountDirectory::lookup`] releases the previous record
/// before asking the OS for a new one.
#[derive(Debug)]
pub struct AccountDirectory<L: InfoLevel = Level23> {
    buffer: NetApiBuffer<L::Record>,
}

impl<L: InfoLevel> Default for AccountDirectory<L> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<L: InfoLevel> AccountDirectory<L> {
    /// Creates a directory holding no record.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: NetApiBuffer::new(),
        }
    }

    /// Looks `name` up, on `server` or on the local machine when `None`.
    ///
    /// # Errors
    /// A [`SystemError`] for every status other than success and
    /// `NERR_UserNotFound`.
    #[inline]
    pub fn lookup(
        &mut self,
        name: &U16CStr,
        server: Option<&U16CStr>,
    ) -> Result<LookupOutcome<'_, L>, SystemError> {
        let server_ptr = server.map_or(ptr::null(), U16CStr::as_ptr);
        // SAFETY: both names are terminated and outlive the call; `out_ptr`
        // releases the previous record and receives the new NetAPI buffer.
        let status = unsafe {
            NetUserGetInfo(
                server_ptr,
                name.as_ptr(),
                L::LEVEL,
                self.buffer.out_ptr().cast::<*mut u8>(),
            )
        };
        debug!(info_level = L::LEVEL, status, remote = server.is_some(), "NetUserGetInfo");

        match classify(status) {
            Ok(StatusClass::Success) => {
                // SAFETY: on success the buffer holds an `L::Record`.
                if let Some(record) = unsafe { self.buffer.as_ref() } {
                    return Ok(LookupOutcome::Found(AccountRecord {
                        record,
                        _level: PhantomData,
                    }));
                }
                warn!(info_level = L::LEVEL, "NetUserGetInfo succeeded without a buffer");
                Ok(LookupOutcome::NotFound)
            }
            Ok(StatusClass::UserNotFound) => {
                self.buffer.clear();
                Ok(LookupOutcome::NotFound)
            }
            Err(err) => {
                self.buffer.clear();
                Err(err)
            }
        }
    }

    /// Looks `name` up on the local machine.
    ///
    /// # Errors
    /// See [`AccountDirectory::lookup`].
    #[inline]
    pub fn lookup_local(&mut self, name: &U16CStr) -> Result<LookupOutcome<'_, L>, SystemError> {
        self.lookup(name, None)
    }

    /// Looks up a parsed [`AccountName`], honouring its server qualifier.
    ///
    /// # Errors
    /// [`Error::Encoding`] for names the OS cannot take, otherwise see
    /// [`AccountDirectory::lookup`].
    #[inline]
    pub fn lookup_name(&mut self, account: &AccountName) -> Result<LookupOutcome<'_, L>, Error> {
        let (server, name) = account.to_native()?;
        Ok(self.lookup(&name, server.as_deref())?)
    }

    /// The record kept from the last successful lookup, if any.
    #[inline]
    #[must_use]
    pub fn record(&self) -> Option<AccountRecord<'_, L>> {
        // SAFETY: the buffer is only non-null after a successful lookup at `L::LEVEL`.
        unsafe { self.buffer.as_ref() }.map(|record| AccountRecord {
            record,
            _level: PhantomData,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::account_directory::Level0;
    use widestring::u16cstr;

    const MISSING: &U16CStr = u16cstr!("ThisAccountShouldNotExist_12345");

    #[test]
    fn missing_account_is_not_found() {
        let mut directory = AccountDirectory::<Level23>::new();
        assert!(!directory.lookup_local(MISSING).unwrap().is_found());
        assert!(directory.record().is_none(), "nothing kept after NotFound");
    }

    #[test]
    fn repeated_lookups_reuse_one_directory() {
        let mut directory = AccountDirectory::<Level0>::default();
        for _ in 0..16 {
            assert!(!directory.lookup(MISSING, None).unwrap().is_found());
        }
    }

    #[test]
    fn parsed_names_go_through_the_same_path() {
        let account: AccountName = "ThisAccountShouldNotExist_12345".parse().unwrap();
        let mut directory = AccountDirectory::<Level23>::new();
        assert!(!directory.lookup_name(&account).unwrap().is_found());
    }
}
