//! Human-readable order codes.
//!
//! Codes look like `ORD-482913`. They are drawn from a six-digit random range
//! and carry no uniqueness guarantee.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "ORD-";
const MIN_SUFFIX: u32 = 100_000;
const MAX_SUFFIX: u32 = 999_999;

/// A display code for an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Generate a fresh code from the thread-local RNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a code from the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix = rng.random_range(MIN_SUFFIX..=MAX_SUFFIX);
        Self(format!("{PREFIX}{suffix}"))
    }

    /// Wrap a code loaded from storage.
    #[must_use]
    pub const fn from_stored(code: String) -> Self {
        Self(code)
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        for _ in 0..100 {
            let code = OrderCode::generate();
            let suffix = code.as_str().strip_prefix(PREFIX);
            assert!(suffix.is_some(), "missing prefix: {code}");
            let suffix = suffix.unwrap_or_default();
            assert_eq!(suffix.len(), 6);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
            assert!(!suffix.starts_with('0'));
        }
    }
}
