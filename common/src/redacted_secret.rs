//! Secret strings with redacted Debug/Display output.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

const MASK_VISIBLE_PREFIX: usize = 4;
const MASK_CHAR: char = '*';

/// A secret (access key secret, token) that never exposes its value in logs.
///
/// The backing memory is zeroized on drop.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RedactedSecret {
    inner: String,
}

impl RedactedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: secret.into(),
        }
    }

    /// The raw value. Only call this where the secret is actually consumed
    /// (signing-key derivation, writing the profile file).
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Length in bytes (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// First four characters followed by one `*` per remaining character.
    ///
    /// Secrets of four characters or fewer are fully masked.
    pub fn masked(&self) -> String {
        let total = self.inner.chars().count();
        if total <= MASK_VISIBLE_PREFIX {
            return MASK_CHAR.to_string().repeat(total);
        }

        let mut masked: String = self.inner.chars().take(MASK_VISIBLE_PREFIX).collect();
        masked.extend(std::iter::repeat_n(MASK_CHAR, total - MASK_VISIBLE_PREFIX));
        masked
    }
}

impl From<String> for RedactedSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for RedactedSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedSecret([REDACTED])")
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED SECRET]")
    }
}

impl Drop for RedactedSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Writing a secret to disk goes through `as_str()` explicitly.
impl serde::Serialize for RedactedSecret {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from("RedactedSecret cannot be serialized - use as_str() explicitly"),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
