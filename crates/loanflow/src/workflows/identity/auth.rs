use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Claims carried by an issued token: the subject email and exactly the
/// user's stored role set, never a derived or expanded one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

/// Credential hashing and verification. The concrete scheme lives in an
/// adapter; the core only moves opaque hashes around.
pub trait CredentialScheme: Send + Sync {
    fn hash(&self, plain: &str) -> String;
    fn verify(&self, plain: &str, stored_hash: &str) -> bool;
}

/// Token issuance and validation port for the authentication boundary.
#[async_trait]
pub trait TokenAuthority: Send + Sync {
    async fn issue(&self, claims: TokenClaims) -> Result<String, AuthError>;
    async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Error enumeration for token operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("token issuance failed: {0}")]
    Issuance(String),
}
