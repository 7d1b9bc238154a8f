//! Host-facing entry points.
//!
//! Hosts (the Node-API addon in `node/`) hand names in either as Rust strings
//! or as explicit-length UTF-16 buffers, and get an [`AccountPresence`] or an
//! [`AccountInfo`] back. Each call owns and releases its own OS resources.

pub use crate::account_info::{AccountInfo, AccountPresence};

#[cfg(windows)]
mod windows {
    use tracing::debug;

    use super::{AccountInfo, AccountPresence};
    use crate::account_directory::{AccountDirectory, Level23, LookupOutcome};
    use crate::error::Error;
    use crate::text_codec::{terminate, to_native};

    /// Does an account called `name` exist on the local machine?
    ///
    /// # Errors
    /// - [`Error::Encoding`] if `name` contains a NUL.
    /// - [`Error::SystemFailure`] for any OS failure other than "user not found".
    #[inline]
    pub fn get(name: &str) -> Result<AccountPresence, Error> {
        get_wide(to_native(name).as_slice())
    }

    /// [`get`] for a UTF-16 name of explicit length.
    ///
    /// # Errors
    /// See [`get`].
    #[inline]
    pub fn get_wide(name: &[u16]) -> Result<AccountPresence, Error> {
        let name = terminate(name)?;
        let mut directory = AccountDirectory::<Level23>::new();
        let has = directory.lookup_local(&name)?.is_found();
        debug!(has, "account presence");
        Ok(has.into())
    }

    /// Looks `name` up (on `server` when given) and returns its identity.
    ///
    /// `Ok(None)` when the account does not exist.
    ///
    /// # Errors
    /// As [`get`], plus [`Error::InvalidIdentifier`] if the SID cannot be rendered.
    #[inline]
    pub fn lookup(name: &str, server: Option<&str>) -> Result<Option<AccountInfo>, Error> {
        let server = server.map(to_native);
        lookup_wide(
            to_native(name).as_slice(),
            server.as_ref().map(|server| server.as_slice()),
        )
    }

    /// [`lookup`] for UTF-16 inputs of explicit length.
    ///
    /// # Errors
    /// See [`lookup`].
    #[inline]
    pub fn lookup_wide(name: &[u16], server: Option<&[u16]>) -> Result<Option<AccountInfo>, Error> {
        let name = terminate(name)?;
        let server = server.map(terminate).transpose()?;
        let mut directory = AccountDirectory::<Level23>::new();
        match directory.lookup(&name, server.as_deref())? {
            LookupOutcome::Found(record) => record.info().map(Some),
            LookupOutcome::NotFound => Ok(None),
        }
    }

}

#[cfg(windows)]
pub use windows::{get, get_wide, lookup, lookup_wide};
