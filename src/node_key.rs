// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node Public Key Resolution
//!
//! Fetches the remote node's current public key over RPC
//! (`eth_getNodePublicKey`). The core never caches the key: every encrypt or
//! decrypt operation resolves a fresh value, and callers that want caching
//! wrap the resolver themselves. Failures propagate immediately; retries are
//! the transport's business.

use async_trait::async_trait;
use ethers::providers::{Http, JsonRpcClient, Provider};
use std::sync::Arc;

use crate::config::MiddlewareConfig;
use crate::error::MiddlewareError;
use crate::rpc::{from_hex, to_hex};

/// The remote node's public key at some block reference.
///
/// Opaque bytes as far as the resolver is concerned; the payload cipher
/// validates the curve point when it uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePublicKey(Vec<u8>);

impl NodePublicKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, MiddlewareError> {
        let bytes = from_hex(hex_str)
            .map_err(|e| MiddlewareError::InvalidPayload(format!("node key hex: {}", e)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Block reference for a node key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Latest,
    Number(u64),
}

impl BlockRef {
    /// Wire form of the block parameter.
    pub fn as_param(&self) -> String {
        match self {
            BlockRef::Latest => "latest".to_string(),
            BlockRef::Number(n) => format!("0x{:x}", n),
        }
    }
}

/// External collaborator that fetches the node's current public key.
#[async_trait]
pub trait NodeKeyResolver: Send + Sync {
    async fn resolve(&self, block: BlockRef) -> Result<NodePublicKey, MiddlewareError>;
}

/// Resolver backed by a JSON-RPC provider.
pub struct RpcNodeKeyResolver {
    provider: Arc<Provider<Http>>,
}

impl RpcNodeKeyResolver {
    pub fn new(config: &MiddlewareConfig) -> Result<Self, MiddlewareError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| MiddlewareError::Network(format!("failed to create provider: {}", e)))?
            .interval(config.polling_interval);
        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    pub fn from_provider(provider: Arc<Provider<Http>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl NodeKeyResolver for RpcNodeKeyResolver {
    async fn resolve(&self, block: BlockRef) -> Result<NodePublicKey, MiddlewareError> {
        let key_hex: String = self
            .provider
            .request("eth_getNodePublicKey", [block.as_param()])
            .await
            .map_err(|e| MiddlewareError::Network(e.to_string()))?;

        let key = NodePublicKey::from_hex(&key_hex)
            .map_err(|_| MiddlewareError::NodeKeyUnavailable)?;
        if key.is_empty() {
            return Err(MiddlewareError::NodeKeyUnavailable);
        }

        tracing::debug!(block = %block.as_param(), "resolved node public key");
        Ok(key)
    }
}
