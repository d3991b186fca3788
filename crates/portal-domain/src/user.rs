//! User domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Portal permission level.
///
/// JSON / JWT format: uppercase name (`"USER"`, `"ADMIN"`, `"SUPPORT"`).
/// Storage format: `i16` (0 = User, 1 = Admin, 2 = Support).
///
/// Roles are not ordered: authorization checks set membership, never rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User = 0,
    Admin = 1,
    Support = 2,
}

impl UserRole {
    /// Convert from the stored `i16` value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Admin),
            2 => Some(Self::Support),
            _ => None,
        }
    }

    /// Convert to the stored `i16` value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::Support => "SUPPORT",
        }
    }

    /// Roles allowed into the back-office (listing users and requests).
    pub const STAFF: &'static [UserRole] = &[UserRole::Admin, UserRole::Support];
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
