use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::auth::{AuthError, CredentialScheme, TokenAuthority, TokenClaims};
use super::domain::{email_format_is_valid, normalize_email, NewUser, User, DEFAULT_ROLE};
use super::repository::{UserRecord, UserRepository, UserRepositoryError};

const DEFAULT_MAX_BASE_SALARY: f64 = 15_000_000.0;

/// Bounds applied to registrations. Defaults match the documented policy:
/// base salary must lie in (0, 15,000,000].
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationPolicy {
    pub max_base_salary: f64,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            max_base_salary: DEFAULT_MAX_BASE_SALARY,
        }
    }
}

/// Service composing the user store, the credential scheme, and the token
/// authority.
pub struct IdentityService<R, C, T> {
    users: Arc<R>,
    credentials: Arc<C>,
    tokens: Arc<T>,
    policy: RegistrationPolicy,
}

impl<R, C, T> IdentityService<R, C, T>
where
    R: UserRepository + 'static,
    C: CredentialScheme + 'static,
    T: TokenAuthority + 'static,
{
    pub fn new(users: Arc<R>, credentials: Arc<C>, tokens: Arc<T>) -> Self {
        Self::with_policy(users, credentials, tokens, RegistrationPolicy::default())
    }

    pub fn with_policy(
        users: Arc<R>,
        credentials: Arc<C>,
        tokens: Arc<T>,
        policy: RegistrationPolicy,
    ) -> Self {
        Self {
            users,
            credentials,
            tokens,
            policy,
        }
    }

    /// Validate and store a new user. Validation short-circuits on the first
    /// failure; the existence probe runs last so malformed input never
    /// reaches the store.
    pub async fn register(&self, registration: NewUser) -> Result<User, IdentityError> {
        info!(email = %registration.email, "processing user registration");

        if registration.first_name.trim().is_empty()
            || registration.last_name.trim().is_empty()
            || registration.email.trim().is_empty()
        {
            warn!("registration rejected: required fields blank");
            return Err(IdentityError::MissingRequiredFields);
        }

        let email = normalize_email(&registration.email);
        if !email_format_is_valid(&email) {
            warn!("registration rejected: malformed email");
            return Err(IdentityError::MalformedEmail);
        }

        if registration.base_salary <= 0.0 || registration.base_salary > self.policy.max_base_salary
        {
            warn!("registration rejected: base salary out of range");
            return Err(IdentityError::SalaryOutOfRange {
                max: self.policy.max_base_salary,
            });
        }

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(IdentityError::from_store)?;
        if existing.is_some() {
            warn!(%email, "registration rejected: email already registered");
            return Err(IdentityError::EmailTaken);
        }

        let roles = if registration.roles.is_empty() {
            BTreeSet::from([DEFAULT_ROLE.to_string()])
        } else {
            registration.roles
        };

        let record = UserRecord {
            first_name: registration.first_name,
            last_name: registration.last_name,
            birth_date: registration.birth_date,
            address: registration.address,
            phone: registration.phone,
            email,
            base_salary: registration.base_salary,
            credential_hash: self.credentials.hash(&registration.password),
            roles,
        };

        // The existence probe above can lose a race against another writer;
        // the store's unique constraint is authoritative.
        match self.users.insert(record).await {
            Ok(user) => {
                info!(email = %user.email, "user registered");
                Ok(user)
            }
            Err(UserRepositoryError::Conflict) => Err(IdentityError::EmailTaken),
            Err(err) => Err(IdentityError::from_store(err)),
        }
    }

    /// Verify credentials and issue a token carrying exactly the user's role
    /// set. An unknown email and a wrong password are indistinguishable to
    /// the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let email = normalize_email(email);
        info!(%email, "processing login");

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(IdentityError::from_store)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !self.credentials.verify(password, &user.credential_hash) {
            warn!(%email, "login rejected: credential mismatch");
            return Err(IdentityError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(TokenClaims {
                subject: user.email.clone(),
                roles: user.roles.clone(),
            })
            .await?;
        Ok(token)
    }

    /// Identity Lookup contract consumed by the origination workflow.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        self.users
            .find_by_email(&normalize_email(email))
            .await
            .map_err(IdentityError::from_store)
    }

    /// Read-only listing of every registered user.
    pub async fn list_users(&self) -> Result<Vec<User>, IdentityError> {
        self.users.list_all().await.map_err(IdentityError::from_store)
    }
}

/// Error raised by the identity service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("first name, last name, and email are required")]
    MissingRequiredFields,
    #[error("email address format is invalid")]
    MalformedEmail,
    #[error("base salary must be greater than 0 and must not exceed {max:.0}")]
    SalaryOutOfRange { max: f64 },
    #[error("the email address is already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] AuthError),
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

impl IdentityError {
    fn from_store(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Conflict => IdentityError::EmailTaken,
            UserRepositoryError::NotFound => IdentityError::InvalidCredentials,
            UserRepositoryError::Unavailable(message) => IdentityError::Unavailable(message),
        }
    }
}
