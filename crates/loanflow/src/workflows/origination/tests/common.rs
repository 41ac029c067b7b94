use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::workflows::identity::auth::{AuthError, TokenAuthority, TokenClaims};
use crate::workflows::identity::domain::{normalize_email, User, UserId};
use crate::workflows::identity::repository::{UserRecord, UserRepository, UserRepositoryError};
use crate::workflows::origination::domain::{
    ApplicationId, ApplicationStatus, LoanApplication, LoanSubmission, NewLoanApplication,
    PageRequest,
};
use crate::workflows::origination::repository::{
    ApplicationRepository, ApplicationRepositoryError,
};
use crate::workflows::origination::{LoanOriginationService, UnderwritingConfig};

pub(super) fn applicant(email: &str, base_salary: f64) -> User {
    User {
        id: UserId(format!("usr-{}", normalize_email(email))),
        first_name: "Alice".to_string(),
        last_name: "Quintero".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date"),
        address: "Calle 12 #3-45".to_string(),
        phone: "3005551234".to_string(),
        email: normalize_email(email),
        base_salary,
        credential_hash: "hash:secret".to_string(),
        roles: BTreeSet::from(["USER".to_string()]),
    }
}

pub(super) fn submission(email: &str, amount: f64, term_months: u32) -> LoanSubmission {
    LoanSubmission {
        applicant_email: email.to_string(),
        amount,
        term_months,
    }
}

pub(super) fn page(page: u32, size: u32, sort_by: &str) -> PageRequest {
    PageRequest {
        page,
        size,
        sort_by: sort_by.to_string(),
    }
}

pub(super) fn build_service(
    users: &[User],
) -> (
    LoanOriginationService<InMemoryApplications, InMemoryUsers>,
    Arc<InMemoryApplications>,
    Arc<InMemoryUsers>,
) {
    let applications = Arc::new(InMemoryApplications::default());
    let directory = Arc::new(InMemoryUsers::seeded(users));
    let service = LoanOriginationService::new(
        applications.clone(),
        directory.clone(),
        UnderwritingConfig::default(),
    );
    (service, applications, directory)
}

#[derive(Default)]
pub(super) struct InMemoryUsers {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUsers {
    pub(super) fn seeded(users: &[User]) -> Self {
        let map = users
            .iter()
            .map(|user| (user.email.clone(), user.clone()))
            .collect();
        Self {
            users: Mutex::new(map),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
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

#[derive(Default)]
pub(super) struct InMemoryApplications {
    records: Mutex<HashMap<ApplicationId, LoanApplication>>,
    sequence: AtomicU64,
    queries: Mutex<Vec<(Vec<ApplicationStatus>, PageRequest)>>,
}

impl InMemoryApplications {
    pub(super) fn seed(&self, applications: Vec<LoanApplication>) {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        for application in applications {
            guard.insert(application.id.clone(), application);
        }
    }

    pub(super) fn stored(&self, id: &ApplicationId) -> Option<LoanApplication> {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn queries(&self) -> Vec<(Vec<ApplicationStatus>, PageRequest)> {
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplications {
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
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push((statuses.to_vec(), page.clone()));

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

pub(super) struct UnavailableApplications;

#[async_trait]
impl ApplicationRepository for UnavailableApplications {
    async fn insert(
        &self,
        _application: NewLoanApplication,
    ) -> Result<LoanApplication, ApplicationRepositoryError> {
        Err(ApplicationRepositoryError::Unavailable(
            "database offline".to_string(),
        ))
    }

    async fn find_by_id(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, ApplicationRepositoryError> {
        Err(ApplicationRepositoryError::Unavailable(
            "database offline".to_string(),
        ))
    }

    async fn find_by_statuses(
        &self,
        _statuses: &[ApplicationStatus],
        _page: &PageRequest,
    ) -> Result<Vec<LoanApplication>, ApplicationRepositoryError> {
        Err(ApplicationRepositoryError::Unavailable(
            "database offline".to_string(),
        ))
    }
}

pub(super) struct ConflictingApplications;

#[async_trait]
impl ApplicationRepository for ConflictingApplications {
    async fn insert(
        &self,
        _application: NewLoanApplication,
    ) -> Result<LoanApplication, ApplicationRepositoryError> {
        Err(ApplicationRepositoryError::Conflict)
    }

    async fn find_by_id(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn find_by_statuses(
        &self,
        _statuses: &[ApplicationStatus],
        _page: &PageRequest,
    ) -> Result<Vec<LoanApplication>, ApplicationRepositoryError> {
        Ok(Vec::new())
    }
}

/// Token authority recognizing a fixed set of pre-issued tokens.
#[derive(Default)]
pub(super) struct StaticTokens {
    tokens: Mutex<HashMap<String, TokenClaims>>,
}

impl StaticTokens {
    pub(super) fn with_token(token: &str, subject: &str) -> Self {
        let authority = Self::default();
        authority.tokens.lock().expect("token mutex poisoned").insert(
            token.to_string(),
            TokenClaims {
                subject: normalize_email(subject),
                roles: BTreeSet::from(["USER".to_string()]),
            },
        );
        authority
    }
}

#[async_trait]
impl TokenAuthority for StaticTokens {
    async fn issue(&self, claims: TokenClaims) -> Result<String, AuthError> {
        let mut guard = self.tokens.lock().expect("token mutex poisoned");
        let token = format!("tok-{:04}", guard.len() + 1);
        guard.insert(token.clone(), claims);
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let guard = self.tokens.lock().expect("token mutex poisoned");
        guard.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn stored_application(
    id: &str,
    email: &str,
    amount: f64,
    term_months: u32,
    status: ApplicationStatus,
) -> LoanApplication {
    LoanApplication {
        id: ApplicationId(id.to_string()),
        applicant_email: email.to_string(),
        amount,
        term_months,
        status,
    }
}
