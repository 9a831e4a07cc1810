//! Pending Call Session Store
//!
//! Correlates an in-flight request id with the key material used to encrypt
//! that request's payload, so the matching response can be decrypted with
//! the same material. Entries live exactly as long as their request: every
//! entry is removed by exactly one of `resolve` or `abandon`, which bounds
//! memory under sustained traffic.
//!
//! **Security**: key seeds are held in memory only and zeroized when the
//! entry is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::crypto::EncryptionKey;
use crate::node_key::NodePublicKey;
use crate::rpc::CallKind;

/// Key material and call kind tracked for one in-flight request.
///
/// Owned exclusively by the [`SessionStore`]; the embedded key leaves it
/// only inside the entry returned by `resolve`, which the decrypt path
/// consumes and drops.
#[derive(Debug, Clone)]
pub struct PendingCall {
    pub kind: CallKind,
    pub node_public_key: NodePublicKey,
    pub encryption_key: EncryptionKey,
    /// Ciphertext this entry produced; used to evict its payload marker.
    pub ciphertext: Vec<u8>,
}

/// Thread-safe store of pending encrypted calls, keyed by request id.
///
/// Request ids are independent units of mutation: operations on different
/// ids never interfere, and a single id follows the sequential lifecycle
/// begin -> exactly one of resolve/abandon.
///
/// # Example
///
/// ```ignore
/// let store = SessionStore::new();
/// store.begin("42".into(), entry).await;
/// let entry = store.resolve("42").await; // consumes
/// assert!(store.resolve("42").await.is_none());
/// ```
#[derive(Clone, Default)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, PendingCall>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a pending encrypted call.
    ///
    /// A still-pending entry under the same id means the previous request
    /// leaked without being resolved or abandoned; that is a protocol
    /// violation, surfaced in the log, but the new entry still replaces it
    /// so the fresh request can complete. The displaced entry is returned
    /// so the caller can release anything keyed to it.
    pub async fn begin(&self, request_id: String, entry: PendingCall) -> Option<PendingCall> {
        let mut entries = self.entries.write().await;
        let displaced = entries.insert(request_id.clone(), entry);
        if displaced.is_some() {
            tracing::warn!(
                "request id {} was still pending when re-registered; previous entry leaked",
                request_id
            );
        }
        tracing::debug!(
            "🔑 Tracking encrypted call {} (in flight: {})",
            request_id,
            entries.len()
        );
        displaced
    }

    /// Look up and remove the entry for a request id.
    ///
    /// Exactly-once consumption: a second resolve for the same id returns
    /// `None`.
    pub async fn resolve(&self, request_id: &str) -> Option<PendingCall> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(request_id);
        if entry.is_some() {
            tracing::debug!(
                "🗑️  Resolved encrypted call {} (in flight: {})",
                request_id,
                entries.len()
            );
        }
        entry
    }

    /// Remove an entry without resolving it.
    ///
    /// Called when the host cancels or times out a request before its
    /// response arrives. No-op if the id is not tracked.
    pub async fn abandon(&self, request_id: &str) -> Option<PendingCall> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(request_id);
        if entry.is_some() {
            tracing::debug!(
                "🗑️  Abandoned encrypted call {} (in flight: {})",
                request_id,
                entries.len()
            );
        }
        entry
    }

    /// Number of calls currently in flight.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
