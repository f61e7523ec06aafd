//! Share passwords: the ephemeral nonce + key bundle carried in a link fragment.
//!
//! Layout is `nonce (24 bytes) || key (32 bytes)`. The text form is URL-safe
//! base64 with padding, which is what recipients decode from the fragment.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CoreError, Result};

/// Length of the secretbox nonce segment.
pub const NONCE_LEN: usize = 24;

/// Length of the secretbox key segment.
pub const KEY_LEN: usize = 32;

/// Total length of the raw password material.
pub const PASSWORD_LEN: usize = NONCE_LEN + KEY_LEN;

/// Ephemeral symmetric key material for one publish.
///
/// Never persisted, never logged. The bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Password([u8; PASSWORD_LEN]);

impl Password {
    /// Generate fresh material from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; PASSWORD_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; PASSWORD_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; PASSWORD_LEN] {
        &self.0
    }

    /// The nonce segment (first 24 bytes).
    pub fn nonce(&self) -> &[u8] {
        &self.0[..NONCE_LEN]
    }

    /// The key segment (remaining 32 bytes).
    pub fn key(&self) -> &[u8] {
        &self.0[NONCE_LEN..]
    }

    /// Encode for the link fragment.
    pub fn to_link_text(&self) -> String {
        URL_SAFE.encode(self.0)
    }

    /// Decode from a link fragment.
    pub fn from_link_text(text: &str) -> Result<Self> {
        let mut raw = URL_SAFE
            .decode(text)
            .map_err(|e| CoreError::InvalidBase64(e.to_string()))?;
        if raw.len() != PASSWORD_LEN {
            let actual = raw.len();
            raw.zeroize();
            return Err(CoreError::InvalidPassword {
                expected: PASSWORD_LEN,
                actual,
            });
        }
        let mut bytes = [0u8; PASSWORD_LEN];
        bytes.copy_from_slice(&raw);
        raw.zeroize();
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}
