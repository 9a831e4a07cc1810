// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Typed errors for the payload cipher and key derivation. Encryption-side
//! failures (`KeyAgreementFailed`, `EncryptionFailed`) abort a call before
//! any session state is touched; decryption-side failures
//! (`AuthenticationFailed`, `DecryptionFailed`) surface after the pending
//! entry has already been consumed.

use thiserror::Error;

/// Errors produced by the payload cipher.
#[derive(Debug, Clone, Error)]
pub enum CryptoError {
    /// ECDH key agreement could not be performed.
    ///
    /// The peer public key is malformed (wrong size, invalid curve point)
    /// or the derived private scalar is invalid.
    #[error("key agreement failed: {reason}")]
    KeyAgreementFailed { reason: String },

    /// AEAD encryption failed internally.
    #[error("encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    /// Authentication tag verification failed.
    ///
    /// The ciphertext was tampered with, or it was produced under different
    /// key material (wrong node key, stale key, or a key/request mismatch).
    #[error("authentication failed: ciphertext tampered with or wrong key material")]
    AuthenticationFailed,

    /// The ciphertext envelope is structurally malformed.
    #[error("decryption failed: {reason}")]
    DecryptionFailed { reason: String },
}
