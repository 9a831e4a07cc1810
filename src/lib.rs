// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client-side encryption middleware for confidential blockchain RPC.
//!
//! Encrypts the payload of outbound `eth_call`/`eth_estimateGas`/
//! `eth_sendTransaction` requests against the remote node's public key and
//! decrypts the matching `eth_call` responses, so call data and results stay
//! confidential to everyone except the node and the caller. Transport,
//! batching, ABI encoding and wallets are the host's business; this crate
//! only hooks its interception points.

pub mod config;
pub mod crypto;
pub mod error;
pub mod middleware;
pub mod node_key;
pub mod rpc;
pub mod session;

// Re-export main types
pub use config::MiddlewareConfig;
pub use crypto::{CryptoError, EncryptionKey};
pub use error::MiddlewareError;
pub use middleware::EncryptionMiddleware;
pub use node_key::{BlockRef, NodeKeyResolver, NodePublicKey, RpcNodeKeyResolver};
pub use rpc::{CallKind, JsonRpcCallResponse, JsonRpcRequest, JsonRpcResponse, MethodKind};
pub use session::{PendingCall, SessionStore};
