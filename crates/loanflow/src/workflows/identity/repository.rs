use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::User;

/// A user as handed to the store for insertion; the store assigns the id and
/// enforces email uniqueness with its own constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub base_salary: f64,
    pub credential_hash: String,
    pub roles: BTreeSet<String>,
}

/// Storage port for the user aggregate. Lookups take a normalized email; the
/// store performs exact matching.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, record: UserRecord) -> Result<User, UserRepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;
    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError>;
}

/// Error enumeration for user store failures.
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("a user with this email already exists")]
    Conflict,
    #[error("user not found")]
    NotFound,
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}
