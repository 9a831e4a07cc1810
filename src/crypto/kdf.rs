//! Per-Call Key Derivation
//!
//! Derives the per-call private key material from a 32-byte seed using
//! HKDF-SHA256 with a fixed domain-separation salt. The remote node expands
//! the ECDH shared secret with the same salt, so both sides must use
//! identical context strings: a mismatch produces wrong keys that are only
//! caught by the cipher's authentication tag.

use hkdf::Hkdf;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Domain-separation salt for deriving the ECDH private scalar from a seed.
pub const CALL_KEY_CONTEXT: &[u8] = b"confidential-rpc/call-key/v1";

/// Domain-separation salt for expanding an ECDH shared secret into an AEAD key.
pub const AEAD_KEY_CONTEXT: &[u8] = b"confidential-rpc/aead-key/v1";

/// 32-byte symmetric seed for one encrypted call.
///
/// Generated fresh per call unless the caller supplies one. The seed is the
/// only material needed to decrypt the matching response, so it is held by
/// the session store for intercepted calls and by the caller for direct
/// calls. Scrubbed from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Generate a fresh random key seed.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self(seed)
    }

    pub fn from_bytes(seed: [u8; 32]) -> Self {
        Self(seed)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material never appears in logs
        write!(f, "EncryptionKey(..)")
    }
}

/// Derive 32 bytes of key material from a seed under a fixed context.
///
/// Deterministic and constant-time with respect to the seed value. Used for
/// both the per-call ECDH scalar ([`CALL_KEY_CONTEXT`]) and the AEAD key
/// expansion of the shared secret ([`AEAD_KEY_CONTEXT`]).
pub fn derive_key(seed: &[u8], context: &[u8]) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(Some(context), seed);
    let mut derived = [0u8; 32];
    // expand only fails for outputs longer than 255 hash blocks
    hkdf.expand(&[], &mut derived)
        .expect("32-byte HKDF output is always valid");
    derived
}
