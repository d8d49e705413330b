//! Structural fingerprints of tree snapshots
//!
//! Provides [`TreeFingerprint`], a Blake3 hash over the canonical JSON form
//! of a [`Forest`]. Two snapshots with equal fingerprints are structurally
//! identical, whether or not they share storage.

use crate::node::Forest;
use std::fmt::{self, Display, Formatter};

/// A 32-byte structural hash (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeFingerprint([u8; 32]);

impl TreeFingerprint {
    /// Fingerprint of a snapshot
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn compute(forest: &Forest) -> Result<Self, FingerprintError> {
        let json = serde_json::to_vec(forest)?;
        Ok(Self(*blake3::hash(&json).as_bytes()))
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for TreeFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Errors that can occur when fingerprinting
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
