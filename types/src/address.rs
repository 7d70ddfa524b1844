//! Fee payment address.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An encoded address a ticket owner pays the VSP fee to.
///
/// The encoding is produced by the key-derivation capability; this type
/// only carries the string and never re-validates it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeAddress(String);

impl FeeAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FeeAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}
