//! Account lookup through `NetUserGetInfo`.
//!
//! [`classify`] maps a `NET_API_STATUS` to found / not found / failure on every
//! platform. The lookup itself, `AccountDirectory`, is Windows only: it keeps
//! the OS buffer in a `NetApiBuffer` and hands out borrowed views of the record.

mod status;
pub use status::{NERR_SUCCESS, NERR_USER_NOT_FOUND, StatusClass, classify};

#[cfg(windows)]
mod info_level;
#[cfg(windows)]
pub use info_level::{InfoLevel, Level0, Level1, Level23};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::{AccountDirectory, AccountRecord, LookupOutcome};
