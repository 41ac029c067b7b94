use async_trait::async_trait;

use super::domain::{ApplicationId, ApplicationStatus, LoanApplication, NewLoanApplication, PageRequest};

/// Storage port for loan applications. The store assigns identifiers on
/// insert and treats the page request as opaque ordering/windowing hints.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(
        &self,
        application: NewLoanApplication,
    ) -> Result<LoanApplication, ApplicationRepositoryError>;
    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, ApplicationRepositoryError>;
    async fn find_by_statuses(
        &self,
        statuses: &[ApplicationStatus],
        page: &PageRequest,
    ) -> Result<Vec<LoanApplication>, ApplicationRepositoryError>;
}

/// Error enumeration for application store failures.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationRepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("application store unavailable: {0}")]
    Unavailable(String),
}
