//! Shared types for the HTTP layer.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::api::error::ApiError;
use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub tokens: Arc<TokenSet>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        let tokens = TokenSet::new(&core.config.auth.tokens);
        Self {
            core,
            tokens: Arc::new(tokens),
        }
    }
}

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Accepted bearer tokens, kept only as digests.
pub struct TokenSet {
    digests: Vec<[u8; 32]>,
}

impl TokenSet {
    pub fn new(tokens: &[String]) -> Self {
        Self {
            digests: tokens
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(hash_token)
                .collect(),
        }
    }

    /// Compare against every digest without short-circuiting.
    pub fn accepts(&self, token: &str) -> bool {
        let presented = hash_token(token);
        self.digests
            .iter()
            .fold(subtle::Choice::from(0u8), |acc, d| {
                acc | d.as_slice().ct_eq(presented.as_slice())
            })
            .into()
    }
}

/// JSON body extractor whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor whose rejections use the API error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
