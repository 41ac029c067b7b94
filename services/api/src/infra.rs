use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loanflow::config::PolicyConfig;
use loanflow::workflows::identity::{
    AuthError, CredentialScheme, TokenAuthority, TokenClaims, User, UserId, UserRecord,
    UserRepository, UserRepositoryError,
};
use loanflow::workflows::origination::{
    ApplicationId, ApplicationRepository, ApplicationRepositoryError, ApplicationStatus,
    LoanApplication, NewLoanApplication, PageRequest, UnderwritingConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
    sequence: AtomicU64,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: UserRecord) -> Result<User, UserRepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        if guard.contains_key(&record.email) {
            return Err(UserRepositoryError::Conflict);
        }
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let user = User {
            id: UserId(format!("usr-{sequence:04}")),
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

#[derive(Default)]
pub(crate) struct InMemoryApplicationRepository {
    records: Mutex<HashMap<ApplicationId, LoanApplication>>,
    sequence: AtomicU64,
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert(
        &self,
        application: NewLoanApplication,
    ) -> Result<LoanApplication, ApplicationRepositoryError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = LoanApplication {
            id: ApplicationId(format!("loan-{sequence:06}")),
            applicant_email: application.applicant_email,
            amount: application.amount,
            term_months: application.term_months,
            status: application.status,
        };
        let mut guard = self.records.lock().expect("application mutex poisoned");
        guard.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, ApplicationRepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    async fn find_by_statuses(
        &self,
        statuses: &[ApplicationStatus],
        page: &PageRequest,
    ) -> Result<Vec<LoanApplication>, ApplicationRepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut matching: Vec<LoanApplication> = guard
            .values()
            .filter(|application| statuses.contains(&application.status))
            .cloned()
            .collect();
        match page.sort_by.as_str() {
            "amount" => matching.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
            "term_months" => matching.sort_by_key(|application| application.term_months),
            _ => matching.sort_by(|a, b| a.id.0.cmp(&b.id.0)),
        }

        let start = (page.page as usize).saturating_mul(page.size as usize);
        Ok(matching
            .into_iter()
            .skip(start)
            .take(page.size as usize)
            .collect())
    }
}

/// Salted SipHash fingerprints. Development-grade; a deployment swaps this
/// adapter for a real KDF without touching the identity workflow.
pub(crate) struct FingerprintCredentialScheme {
    salt: String,
}

impl FingerprintCredentialScheme {
    pub(crate) fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

impl CredentialScheme for FingerprintCredentialScheme {
    fn hash(&self, plain: &str) -> String {
        let mut hasher = DefaultHasher::new();
        self.salt.hash(&mut hasher);
        plain.hash(&mut hasher);
        format!("sip64${:016x}", hasher.finish())
    }

    fn verify(&self, plain: &str, stored_hash: &str) -> bool {
        self.hash(plain) == stored_hash
    }
}

/// Opaque session tokens backed by an in-process map.
#[derive(Default)]
pub(crate) struct InMemoryTokenAuthority {
    sessions: Mutex<HashMap<String, TokenClaims>>,
    sequence: AtomicU64,
}

#[async_trait]
impl TokenAuthority for InMemoryTokenAuthority {
    async fn issue(&self, claims: TokenClaims) -> Result<String, AuthError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let token = format!("lf-{sequence:012x}");
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(token.clone(), claims);
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        guard.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

pub(crate) fn underwriting_config(policy: &PolicyConfig) -> UnderwritingConfig {
    UnderwritingConfig::with_strategy(policy.underwriting_strategy)
}
