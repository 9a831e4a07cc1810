// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Middleware error taxonomy.
//!
//! Nothing here is retried internally; retry policy belongs to the host
//! transport above this crate.

use thiserror::Error;

use crate::crypto::CryptoError;

#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// The node key fetch failed at the transport level.
    #[error("node key request failed: {0}")]
    Network(String),

    /// The node answered but returned no usable public key.
    #[error("node returned an empty or invalid public key")]
    NodeKeyUnavailable,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Deterministic rejection, no network or crypto attempted.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A request or response field could not be interpreted.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, MiddlewareError>;
