use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::workflows::identity::auth::{
    AuthError, CredentialScheme, TokenAuthority, TokenClaims,
};
use crate::workflows::identity::domain::{NewUser, User, UserId};
use crate::workflows::identity::repository::{UserRecord, UserRepository, UserRepositoryError};
use crate::workflows::identity::IdentityService;

pub(super) fn registration(email: &str, base_salary: f64) -> NewUser {
    NewUser {
        first_name: "Alice".to_string(),
        last_name: "Quintero".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date"),
        address: "Calle 12 #3-45".to_string(),
        phone: "3005551234".to_string(),
        email: email.to_string(),
        base_salary,
        password: "s3cret".to_string(),
        roles: BTreeSet::new(),
    }
}

pub(super) fn build_service() -> (
    IdentityService<MemoryUsers, ReversibleCredentials, RecordingTokens>,
    Arc<MemoryUsers>,
    Arc<RecordingTokens>,
) {
    let users = Arc::new(MemoryUsers::default());
    let credentials = Arc::new(ReversibleCredentials);
    let tokens = Arc::new(RecordingTokens::default());
    let service = IdentityService::new(users.clone(), credentials.clone(), tokens.clone());
    (service, users, tokens)
}

#[derive(Default)]
pub(super) struct MemoryUsers {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUsers {
    pub(super) fn stored(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .expect("user mutex poisoned")
            .get(email)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, record: UserRecord) -> Result<User, UserRepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        if guard.contains_key(&record.email) {
            return Err(UserRepositoryError::Conflict);
        }
        let user = User {
            id: UserId(format!("usr-{:04}", guard.len() + 1)),
            first_name: record.first_name,
            last_name: record.last_name,
            birth_date: record.birth_date,
            address: record.address,
            phone: record.phone,
            email: record.email.clone(),
            base_salary: record.base_salary,
            credential_hash: record.credential_hash,
            roles: record.roles,
        };
        guard.insert(record.email, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.get(email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Store whose existence probe always misses but whose insert conflicts,
/// modeling a unique-constraint race with another writer.
pub(super) struct RacingUsers;

#[async_trait]
impl UserRepository for RacingUsers {
    async fn insert(&self, _record: UserRecord) -> Result<User, UserRepositoryError> {
        Err(UserRepositoryError::Conflict)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableUsers;

#[async_trait]
impl UserRepository for UnavailableUsers {
    async fn insert(&self, _record: UserRecord) -> Result<User, UserRepositoryError> {
        Err(UserRepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserRepositoryError> {
        Err(UserRepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        Err(UserRepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Deterministic scheme so assertions can distinguish hash from plaintext.
pub(super) struct ReversibleCredentials;

impl CredentialScheme for ReversibleCredentials {
    fn hash(&self, plain: &str) -> String {
        format!("hash:{plain}")
    }

    fn verify(&self, plain: &str, stored_hash: &str) -> bool {
        stored_hash == format!("hash:{plain}")
    }
}

/// Token authority that remembers every claim set it was asked to encode.
#[derive(Default)]
pub(super) struct RecordingTokens {
    issued: Mutex<Vec<TokenClaims>>,
}

impl RecordingTokens {
    pub(super) fn issued(&self) -> Vec<TokenClaims> {
        self.issued.lock().expect("token mutex poisoned").clone()
    }
}

#[async_trait]
impl TokenAuthority for RecordingTokens {
    async fn issue(&self, claims: TokenClaims) -> Result<String, AuthError> {
        let mut guard = self.issued.lock().expect("token mutex poisoned");
        guard.push(claims);
        Ok(format!("tok-{:04}", guard.len()))
    }

    async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let guard = self.issued.lock().expect("token mutex poisoned");
        let index = token
            .strip_prefix("tok-")
            .and_then(|raw| raw.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1));
        index
            .and_then(|i| guard.get(i).cloned())
            .ok_or(AuthError::InvalidToken)
    }
}
