//! # Windows account lookup for embedding hosts
//!
//! Answers one question for a calling application: *does an account with this
//! name exist, and what is its identity?* The crate wraps `NetUserGetInfo` and
//! the handful of Win32 routines around it, so hosts (see the `node/` addon)
//! only deal with strings in and plain values out.
//!
//! The crate provides:
//! - [`ScopedResource`]: single-owner wrapper for OS-allocated buffers, freed
//!   exactly once through the matching OS routine.
//! - [`text_codec`]: length-based conversions between Rust strings and UTF-16.
//! - [`format_system_error`]: trimmed, single-line OS error messages with an
//!   `"Unknown Error"` fallback.
//! - (Windows) `AccountDirectory`: `NetUserGetInfo` at a caller-chosen
//!   `InfoLevel`, with "user not found" kept apart from real failures.
//! - [`identifier`]: canonical `S-1-...` text for security identifiers.
//! - [`bridge`]: the host-facing `get` / `lookup` entry points.
//!
//! ## Outcomes
//! A lookup either finds the account, does not find it, or fails:
//! - found → `LookupOutcome::Found` / `AccountPresence { has: true }`,
//! - `NERR_UserNotFound` → `LookupOutcome::NotFound` / `has: false`,
//! - anything else → [`SystemError`] / [`Error::SystemFailure`].
//!
//! ## Safety
//! Every OS buffer lives in a [`ScopedResource`] whose release routine matches
//! the allocator (`NetApiBufferFree`, `LocalFree`, `FreeLibrary`). Records are
//! only reachable through borrows of the owning `AccountDirectory`, so they
//! cannot be read after release.
//!
//! ## Examples
//! ### Render a binary SID
//! ```rust
//! use win_account_lookup::identifier::canonical_sid_string;
//!
//! // S-1-5-32-544 (BUILTIN\Administrators)
//! let bytes = [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0];
//! assert_eq!(canonical_sid_string(&bytes).unwrap(), "S-1-5-32-544");
//! ```
//!
//! ### Parse a qualified account name
//! ```rust
//! use win_account_lookup::AccountName;
//!
//! let account: AccountName = "FILESERVER\\backup".parse().unwrap();
//! assert_eq!(account.server(), Some("FILESERVER"));
//! assert_eq!(account.name(), "backup");
//! ```
//!
//! ### (Windows) Check that an account exists
//! ```no_run
//! # #[cfg(windows)]
//! # {
//! let presence = win_account_lookup::bridge::get("Administrator").unwrap();
//! assert!(presence.has);
//! # }
//! ```
//!
//! ### (Windows) Read the account SID
//! ```no_run
//! # #[cfg(windows)]
//! # {
//! use win_account_lookup::{AccountDirectory, Level23, LookupOutcome};
//! use widestring::u16cstr;
//!
//! let mut directory = AccountDirectory::<Level23>::new();
//! if let LookupOutcome::Found(record) = directory.lookup_local(u16cstr!("Administrator")).unwrap() {
//!     println!("{}", record.sid_string().unwrap());
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

mod account_directory;
mod account_info;
mod account_name;
pub mod bridge;
mod error;
pub mod identifier;
pub mod scoped_resource;
mod system_error;
pub mod text_codec;

pub use account_directory::{NERR_SUCCESS, NERR_USER_NOT_FOUND, StatusClass, classify};
#[cfg(windows)]
pub use account_directory::{
    AccountDirectory, AccountRecord, InfoLevel, Level0, Level1, Level23, LookupOutcome,
};

pub use account_info::{AccountFlags, AccountInfo, AccountPresence, Privilege};

/// Account name with an optional `SERVER\` qualifier.
pub use account_name::{AccountName, AccountNameError, Component, ParsePolicy};

pub use error::{Error, SystemError};

pub use scoped_resource::{Release, ScopedResource};

pub use system_error::{MAX_NERR, NERR_BASE, UNKNOWN_ERROR, format_system_error, trim_message};
