// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encryption Middleware Façade
//!
//! Entry points invoked by the host transport: [`on_outbound_request`]
//! encrypts an eligible call payload in place before serialization,
//! [`on_inbound_response`] decrypts the matching response after
//! deserialization, and a direct encrypt/decrypt pair serves call sites
//! that bypass interception (contract wrappers and the like).
//!
//! A payload the middleware has already encrypted is remembered in an
//! in-process marker set so that a transaction object touched by several
//! interception points is encrypted exactly once. Markers share the
//! lifetime of the session entry that produced them and are evicted when
//! the entry is resolved or abandoned.
//!
//! [`on_outbound_request`]: EncryptionMiddleware::on_outbound_request
//! [`on_inbound_response`]: EncryptionMiddleware::on_inbound_response

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::crypto::{decrypt_node_response, encrypt_data_field, EncryptionKey};
use crate::error::{MiddlewareError, Result};
use crate::node_key::{BlockRef, NodeKeyResolver};
use crate::rpc::{
    from_hex, request_key, to_hex, CallKind, JsonRpcRequest, JsonRpcResponse, MethodKind,
};
use crate::session::{PendingCall, SessionStore};

/// Client-side encryption middleware for confidential RPC calls.
pub struct EncryptionMiddleware<R: NodeKeyResolver> {
    resolver: R,
    sessions: SessionStore,
    /// Ciphertexts this instance produced, still referenced by a pending call.
    encrypted_payloads: Arc<RwLock<HashSet<Vec<u8>>>>,
}

impl<R: NodeKeyResolver> EncryptionMiddleware<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            sessions: SessionStore::new(),
            encrypted_payloads: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Intercept an outbound request before serialization.
    ///
    /// For `eth_call`, `eth_estimateGas` and `eth_sendTransaction` whose
    /// first param carries both `to` and `data`, the data field is replaced
    /// with its encrypted envelope and a pending entry is registered under
    /// the request id. Idempotent: data already produced by this middleware
    /// passes through unchanged. All other methods pass through, except
    /// `eth_getStorageAt` which is rejected before any network or crypto
    /// work.
    ///
    /// Resolver and encryption failures abort the call before any session
    /// or marker state is touched.
    pub async fn on_outbound_request(&self, request: &mut JsonRpcRequest) -> Result<()> {
        let kind = match MethodKind::classify(&request.method) {
            MethodKind::GetStorageAt => {
                return Err(MiddlewareError::UnsupportedOperation(
                    "raw storage is encrypted and not individually decryptable",
                ));
            }
            MethodKind::Other => return Ok(()),
            MethodKind::Encryptable(kind) => kind,
        };

        let Some(param) = request.params.get_mut(0) else {
            return Ok(());
        };
        if param.get("to").and_then(|v| v.as_str()).is_none() {
            return Ok(());
        }
        let Some(data_hex) = param.get("data").and_then(|v| v.as_str()) else {
            return Ok(());
        };

        let data = from_hex(data_hex)
            .map_err(|e| MiddlewareError::InvalidPayload(format!("data field hex: {}", e)))?;

        if self.is_marked(&data).await {
            tracing::debug!(method = %request.method, "payload already encrypted, passing through");
            return Ok(());
        }

        let node_key = self.resolver.resolve(BlockRef::Latest).await?;
        let key = EncryptionKey::generate();
        let ciphertext = encrypt_data_field(node_key.as_bytes(), &data, &key)?;

        param["data"] = serde_json::Value::String(to_hex(&ciphertext));

        // Notifications have no response to correlate; encrypt-only, and
        // skip the marker since no session entry would ever evict it.
        if let Some(id) = request_key(&request.id) {
            self.mark(ciphertext.clone()).await;
            let displaced = self
                .sessions
                .begin(
                    id,
                    PendingCall {
                        kind,
                        node_public_key: node_key,
                        encryption_key: key,
                        ciphertext,
                    },
                )
                .await;
            if let Some(old) = displaced {
                self.unmark(&old.ciphertext).await;
            }
        }

        Ok(())
    }

    /// Intercept an inbound response after deserialization.
    ///
    /// Batch responses pass through untouched. A single response consumes
    /// its pending entry exactly once; only `eth_call` entries have their
    /// result decrypted and re-encoded as `0x`-hex bytes, the encrypt-only
    /// kinds are simply released. Decryption failure surfaces as an error
    /// but the entry is consumed regardless, so no key material leaks.
    pub async fn on_inbound_response(&self, response: &mut JsonRpcResponse) -> Result<()> {
        // Correlation by batch sub-id is out of scope.
        let JsonRpcResponse::Single(single) = response else {
            return Ok(());
        };

        let Some(id) = request_key(&single.id) else {
            return Ok(());
        };
        let Some(entry) = self.sessions.resolve(&id).await else {
            return Ok(());
        };
        self.unmark(&entry.ciphertext).await;

        if entry.kind != CallKind::Call {
            return Ok(());
        }
        let Some(result_hex) = single.result.as_ref().and_then(|v| v.as_str()) else {
            return Ok(());
        };

        let envelope = from_hex(result_hex)
            .map_err(|e| MiddlewareError::InvalidPayload(format!("result hex: {}", e)))?;
        let plaintext = decrypt_node_response(
            entry.node_public_key.as_bytes(),
            &envelope,
            &entry.encryption_key,
        )?;

        single.result = Some(serde_json::Value::String(to_hex(&plaintext)));
        Ok(())
    }

    /// Release a request's tracked key material without decrypting.
    ///
    /// The host must call this when it cancels or times out a request after
    /// interception; the core has no timeout policy of its own.
    pub async fn abandon(&self, request_id: &str) {
        if let Some(entry) = self.sessions.abandon(request_id).await {
            self.unmark(&entry.ciphertext).await;
        }
    }

    /// Encrypt a data field directly, outside the interception path.
    ///
    /// Resolves the node key fresh and derives/generates the call key
    /// internally. Returns the envelope and the key used; the caller keeps
    /// the key for [`decrypt_response`](Self::decrypt_response); nothing is
    /// tracked in the session store.
    pub async fn encrypt_data_field(
        &self,
        data: &[u8],
        key: Option<EncryptionKey>,
    ) -> Result<(Vec<u8>, EncryptionKey)> {
        let node_key = self.resolver.resolve(BlockRef::Latest).await?;
        let key = key.unwrap_or_else(EncryptionKey::generate);
        let ciphertext = encrypt_data_field(node_key.as_bytes(), data, &key)?;
        Ok((ciphertext, key))
    }

    /// Decrypt a node response directly, outside the interception path.
    pub async fn decrypt_response(
        &self,
        envelope: &[u8],
        key: &EncryptionKey,
    ) -> Result<Vec<u8>> {
        let node_key = self.resolver.resolve(BlockRef::Latest).await?;
        Ok(decrypt_node_response(node_key.as_bytes(), envelope, key)?)
    }

    /// Raw storage inspection is meaningless under payload encryption.
    ///
    /// Deterministic rejection: no network call, no crypto.
    pub fn get_storage_at(
        &self,
        _address: &str,
        _storage_slot: &str,
        _block: BlockRef,
    ) -> Result<Vec<u8>> {
        Err(MiddlewareError::UnsupportedOperation(
            "raw storage is encrypted and not individually decryptable",
        ))
    }

    /// Number of encrypted calls currently in flight.
    pub async fn pending_calls(&self) -> usize {
        self.sessions.count().await
    }

    /// Number of live payload markers (always bounded by pending calls).
    pub async fn marked_payloads(&self) -> usize {
        self.encrypted_payloads.read().await.len()
    }

    async fn is_marked(&self, payload: &[u8]) -> bool {
        self.encrypted_payloads.read().await.contains(payload)
    }

    async fn mark(&self, payload: Vec<u8>) {
        self.encrypted_payloads.write().await.insert(payload);
    }

    async fn unmark(&self, payload: &[u8]) {
        self.encrypted_payloads.write().await.remove(payload);
    }
}
