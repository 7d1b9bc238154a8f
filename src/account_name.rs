//! Account names with an optional `SERVER\name` qualifier.
//!
//! - `AccountName` stores the parts as `String`.
//! - `Display` prints `SERVER\name`, or just `name` when unqualified.
//! - `FromStr` parses with [`ParsePolicy::DEFAULT`].
//! - Lengths are counted in UTF-16 code units, the unit the OS uses.

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use thiserror::Error;
use widestring::U16CString;

use crate::text_codec::{EncodingError, to_native_terminated};

/// Which component an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Component {
    /// The server/domain qualifier.
    Server,
    /// The account name itself.
    Name,
}

impl Display for Component {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("server"),
            Self::Name => f.write_str("name"),
        }
    }
}

/// Parsing/validation errors for account names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountNameError {
    /// More than one `\` separator.
    #[error("Too many '\\' separators")]
    TooManySeparators,

    /// `\name` with nothing before the separator.
    #[error("Server is empty")]
    EmptyServer,

    /// Empty account name.
    #[error("Name is empty")]
    EmptyName,

    /// A component exceeded the configured maximum length.
    #[error("{which} too long: max={max}, actual={actual}")]
    ComponentTooLong {
        /// Offending component.
        which: Component,
        /// Configured limit, in UTF-16 code units.
        max: usize,
        /// Actual length, in UTF-16 code units.
        actual: usize,
    },

    /// A forbidden character was found.
    #[error("Forbidden character U+{unit:04X} in {which} at index {index}")]
    ForbiddenUnit {
        /// Offending component.
        which: Component,
        /// The character.
        unit: u32,
        /// Position in UTF-16 code units.
        index: usize,
    },
}

/// Validation policy applied when parsing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParsePolicy {
    /// Optional max length of each component, in UTF-16 code units.
    pub max_component_len: Option<usize>,
    /// ASCII characters disallowed in components. NUL is always rejected.
    pub forbidden_ascii: &'static [u8],
}

impl ParsePolicy {
    /// No length limit; rejects `\` inside components.
    pub const DEFAULT: Self = Self {
        max_component_len: None,
        forbidden_ascii: b"\\",
    };

    /// Characters Windows forbids in SAM account names, 256 code units max (`UNLEN`).
    pub const SAM: Self = Self {
        max_component_len: Some(256),
        forbidden_ascii: b"\\/\"[]:|<>+=;,?*@",
    };

    /// Const constructor for convenience.
    #[inline]
    #[must_use]
    pub const fn new(max_component_len: Option<usize>, forbidden_ascii: &'static [u8]) -> Self {
        Self {
            max_component_len,
            forbidden_ascii,
        }
    }

    fn validate_component(&self, which: Component, s: &str) -> Result<(), AccountNameError> {
        if s.is_empty() {
            return Err(match which {
                Component::Server => AccountNameError::EmptyServer,
                Component::Name => AccountNameError::EmptyName,
            });
        }

        if let Some(max) = self.max_component_len {
            let len = s.encode_utf16().count();
            if len > max {
                return Err(AccountNameError::ComponentTooLong {
                    which,
                    max,
                    actual: len,
                });
            }
        }

        let mut index = 0usize;
        for ch in s.chars() {
            let forbidden = ch == '\0'
                || u8::try_from(ch).is_ok_and(|byte| self.forbidden_ascii.contains(&byte));
            if forbidden {
                return Err(AccountNameError::ForbiddenUnit {
                    which,
                    unit: u32::from(ch),
                    index,
                });
            }
            index += ch.len_utf16();
        }
        Ok(())
    }
}

impl Default for ParsePolicy {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Account name, optionally scoped to a server or domain controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountName {
    server: Option<String>,
    name: String,
}

impl AccountName {
    /// Unqualified name, validated with [`ParsePolicy::DEFAULT`].
    ///
    /// # Errors
    /// See [`AccountNameError`].
    #[inline]
    pub fn local(name: impl Into<String>) -> Result<Self, AccountNameError> {
        let name = name.into();
        ParsePolicy::DEFAULT.validate_component(Component::Name, &name)?;
        Ok(Self { server: None, name })
    }

    /// Server-qualified name, validated with [`ParsePolicy::DEFAULT`].
    ///
    /// # Errors
    /// See [`AccountNameError`].
    #[inline]
    pub fn on_server(
        server: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, AccountNameError> {
        let server = server.into();
        let name = name.into();
        ParsePolicy::DEFAULT.validate_component(Component::Server, &server)?;
        ParsePolicy::DEFAULT.validate_component(Component::Name, &name)?;
        Ok(Self {
            server: Some(server),
            name,
        })
    }

    /// Parses `name` or `SERVER\name` with a specific policy.
    ///
    /// # Errors
    /// See [`AccountNameError`] and [`ParsePolicy`].
    #[inline]
    pub fn parse_with_policy(policy: &ParsePolicy, s: &str) -> Result<Self, AccountNameError> {
        let mut iter = s.splitn(3, '\\');
        let first = iter.next().unwrap_or_default();
        let Some(second) = iter.next() else {
            policy.validate_component(Component::Name, first)?;
            return Ok(Self {
                server: None,
                name: first.to_owned(),
            });
        };
        if iter.next().is_some() {
            return Err(AccountNameError::TooManySeparators);
        }
        policy.validate_component(Component::Server, first)?;
        policy.validate_component(Component::Name, second)?;
        Ok(Self {
            server: Some(first.to_owned()),
            name: second.to_owned(),
        })
    }

    /// The server/domain qualifier, if any.
    #[inline]
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// The account name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Terminated UTF-16 forms of `(server, name)` for the OS call.
    ///
    /// # Errors
    /// Only if a component holds a NUL, which validation already rejects.
    #[inline]
    pub fn to_native(&self) -> Result<(Option<U16CString>, U16CString), EncodingError> {
        let server = self.server.as_deref().map(to_native_terminated).transpose()?;
        Ok((server, to_native_terminated(&self.name)?))
    }
}

impl Display for AccountName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.server {
            Some(server) => write!(f, "{server}\\{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for AccountName {
    type Err = AccountNameError;

    /// Parses with `ParsePolicy::DEFAULT`.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_policy(&ParsePolicy::DEFAULT, s)
    }
}
