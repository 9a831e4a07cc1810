// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Payload Cipher
//!
//! Authenticated encryption of call payloads against a remote node's
//! secp256k1 public key: the per-call seed is expanded into an ECDH scalar,
//! the shared secret with the node key is expanded into an AEAD key, and the
//! payload is sealed with XChaCha20-Poly1305 under a random 24-byte nonce.
//!
//! Wire formats (hex-encoded on the wire, raw bytes here):
//!
//! - outbound envelope: `sender_pubkey(33, compressed) || nonce(24) || ciphertext+tag`
//! - node response:     `nonce(24) || ciphertext+tag`
//!
//! The sender public key lets the node recompute the same shared secret; the
//! response carries no key because both sides already share it. Both
//! functions are pure and CPU-bound, safe to run in parallel across calls.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::{rngs::OsRng, RngCore};

use super::error::CryptoError;
use super::kdf::{derive_key, EncryptionKey, AEAD_KEY_CONTEXT, CALL_KEY_CONTEXT};

/// XChaCha20-Poly1305 nonce size.
pub const NONCE_SIZE: usize = 24;

/// Compressed SEC1 public key size.
pub const COMPRESSED_PUBKEY_SIZE: usize = 33;

/// Poly1305 authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Expand a raw ECDH shared secret into a 32-byte AEAD key.
///
/// Exposed so interoperating node-side implementations can derive the same
/// key from their end of the exchange.
pub fn aead_key_from_shared_secret(raw_secret: &[u8]) -> [u8; 32] {
    derive_key(raw_secret, AEAD_KEY_CONTEXT)
}

/// Encrypt a call payload against the node's public key.
///
/// Returns the outbound envelope. The caller must retain `key`: it is the
/// only way to decrypt the matching response.
///
/// # Errors
///
/// * [`CryptoError::KeyAgreementFailed`] - malformed node public key
/// * [`CryptoError::EncryptionFailed`] - internal cipher failure
pub fn encrypt_data_field(
    node_public_key: &[u8],
    plaintext: &[u8],
    key: &EncryptionKey,
) -> Result<Vec<u8>, CryptoError> {
    let secret = call_secret_key(key)?;
    let node_pub = parse_peer_public_key(node_public_key)?;
    let aead_key = shared_aead_key(&secret, &node_pub);

    let cipher = XChaCha20Poly1305::new_from_slice(&aead_key).map_err(|e| {
        CryptoError::EncryptionFailed {
            reason: format!("failed to create cipher: {}", e),
        }
    })?;

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed {
            reason: format!("AEAD encryption failed: {}", e),
        })?;

    let sender_pub = secret.public_key().to_encoded_point(true);
    let mut envelope =
        Vec::with_capacity(COMPRESSED_PUBKEY_SIZE + NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(sender_pub.as_bytes());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Decrypt a node response produced under the same call key.
///
/// Recomputes the shared secret from the retained `key` and the node public
/// key used for the outbound encryption.
///
/// # Errors
///
/// * [`CryptoError::KeyAgreementFailed`] - malformed node public key
/// * [`CryptoError::DecryptionFailed`] - envelope too short to carry a
///   nonce and tag
/// * [`CryptoError::AuthenticationFailed`] - tag mismatch: tampered
///   ciphertext or wrong key material
pub fn decrypt_node_response(
    node_public_key: &[u8],
    envelope: &[u8],
    key: &EncryptionKey,
) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::DecryptionFailed {
            reason: format!(
                "response envelope too short: {} bytes, need at least {}",
                envelope.len(),
                NONCE_SIZE + TAG_SIZE
            ),
        });
    }

    let secret = call_secret_key(key)?;
    let node_pub = parse_peer_public_key(node_public_key)?;
    let aead_key = shared_aead_key(&secret, &node_pub);

    let cipher = XChaCha20Poly1305::new_from_slice(&aead_key).map_err(|e| {
        CryptoError::DecryptionFailed {
            reason: format!("failed to create cipher: {}", e),
        }
    })?;

    let (nonce, ciphertext) = envelope.split_at(NONCE_SIZE);
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Expand the per-call seed into a secp256k1 secret key.
fn call_secret_key(key: &EncryptionKey) -> Result<SecretKey, CryptoError> {
    let scalar = derive_key(key.as_bytes(), CALL_KEY_CONTEXT);
    SecretKey::from_slice(&scalar).map_err(|e| CryptoError::KeyAgreementFailed {
        reason: format!("derived scalar is not a valid secp256k1 key: {}", e),
    })
}

fn parse_peer_public_key(peer: &[u8]) -> Result<PublicKey, CryptoError> {
    if peer.len() != COMPRESSED_PUBKEY_SIZE && peer.len() != 65 {
        return Err(CryptoError::KeyAgreementFailed {
            reason: format!(
                "invalid peer public key size: expected 33 or 65 bytes, got {}",
                peer.len()
            ),
        });
    }
    PublicKey::from_sec1_bytes(peer).map_err(|e| CryptoError::KeyAgreementFailed {
        reason: format!("invalid peer public key point: {}", e),
    })
}

fn shared_aead_key(secret: &SecretKey, peer: &PublicKey) -> [u8; 32] {
    let shared =
        k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    aead_key_from_shared_secret(shared.raw_secret_bytes().as_slice())
}
