use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Privilege level of an account (`USER_PRIV_*`).
/// # see also
/// See Microsoft docs for [USER_INFO_1](https://learn.microsoft.com/en-us/windows/win32/api/lmaccess/ns-lmaccess-user_info_1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u32)]
pub enum Privilege {
    /// Guest.
    Guest = 0,
    /// Standard user.
    User = 1,
    /// Administrator.
    Administrator = 2,
}

impl Privilege {
    /// Lowercase name, as handed to hosts.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Administrator => "administrator",
        }
    }
}

/// `UF_*` account control flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccountFlags(pub u32);

impl AccountFlags {
    /// `UF_SCRIPT`
    pub const SCRIPT: u32 = 0x0001;
    /// `UF_ACCOUNTDISABLE`
    pub const ACCOUNT_DISABLE: u32 = 0x0002;
    /// `UF_LOCKOUT`
    pub const LOCKOUT: u32 = 0x0010;
    /// `UF_PASSWD_NOTREQD`
    pub const PASSWD_NOTREQD: u32 = 0x0020;
    /// `UF_PASSWD_CANT_CHANGE`
    pub const PASSWD_CANT_CHANGE: u32 = 0x0040;
    /// `UF_NORMAL_ACCOUNT`
    pub const NORMAL_ACCOUNT: u32 = 0x0200;
    /// `UF_DONT_EXPIRE_PASSWD`
    pub const DONT_EXPIRE_PASSWD: u32 = 0x1_0000;

    /// `true` if every bit of `mask` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// The account is disabled.
    #[inline]
    #[must_use]
    pub const fn is_disabled(self) -> bool {
        self.contains(Self::ACCOUNT_DISABLE)
    }

    /// The account is locked out.
    #[inline]
    #[must_use]
    pub const fn is_locked_out(self) -> bool {
        self.contains(Self::LOCKOUT)
    }
}

/// Owned snapshot of an account record.
///
/// Fields the requested information level does not carry are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccountInfo {
    /// Account name as stored by the OS.
    pub name: String,
    /// Full (display) name.
    pub full_name: Option<String>,
    /// Administrator comment.
    pub comment: Option<String>,
    /// Account control flags.
    pub flags: Option<AccountFlags>,
    /// Privilege level.
    pub privilege: Option<Privilege>,
    /// Canonical SID text.
    pub sid: Option<String>,
}

/// Result of the `get` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AccountPresence {
    /// An account with the requested name exists.
    pub has: bool,
}

impl From<bool> for AccountPresence {
    #[inline]
    fn from(has: bool) -> Self {
        Self { has }
    }
}
