//! Evaluation request domain types.

use serde::{Deserialize, Serialize};

/// Review state of an evaluation request.
///
/// Storage format: `i16` (0 = Pending, 1 = Approved, 2 = Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    #[default]
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl RequestStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}
