// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Payload Encryption Module
//!
//! Cryptographic primitives for confidential call payloads:
//!
//! - **KDF**: HKDF-SHA256 expansion of the per-call seed into key material
//! - **Cipher**: secp256k1 ECDH against the node key plus XChaCha20-Poly1305
//!
//! ## Security Considerations
//!
//! - Call key seeds live in memory only and are zeroized on drop
//! - A fresh random nonce is used per encryption
//! - Both directions expand keys with the same domain-separation strings;
//!   the node must use identical strings or authentication fails

pub mod cipher;
pub mod error;
pub mod kdf;

pub use cipher::{
    aead_key_from_shared_secret, decrypt_node_response, encrypt_data_field,
    COMPRESSED_PUBKEY_SIZE, NONCE_SIZE, TAG_SIZE,
};
pub use error::CryptoError;
pub use kdf::{derive_key, EncryptionKey, AEAD_KEY_CONTEXT, CALL_KEY_CONTEXT};
