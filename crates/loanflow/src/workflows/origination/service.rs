use std::sync::Arc;

use tracing::{info, warn};

use crate::workflows::identity::domain::normalize_email;
use crate::workflows::identity::repository::{UserRepository, UserRepositoryError};

use super::domain::{
    ApplicationId, ApplicationStatus, LoanApplication, LoanSubmission, NewLoanApplication,
    PageRequest,
};
use super::evaluation::{EvaluationEngine, EvaluationResult, UnderwritingConfig};
use super::intake::{IntakeGuard, IntakePolicy, IntakeViolation};
use super::repository::{ApplicationRepository, ApplicationRepositoryError};

/// Fixed status allowlist scoping the manual review queue. REJECTED sits in a
/// manual-review listing on purpose: reviewers re-examine rejections.
pub const REVIEW_QUEUE_STATUSES: [ApplicationStatus; 3] = [
    ApplicationStatus::PendingReview,
    ApplicationStatus::Rejected,
    ApplicationStatus::ManualReview,
];

/// Service composing the intake guard, the underwriting engine, and the two
/// independently owned stores. Holds no mutable state; every call re-resolves
/// the entities it touches.
pub struct LoanOriginationService<R, U> {
    applications: Arc<R>,
    users: Arc<U>,
    guard: IntakeGuard,
    engine: EvaluationEngine,
}

impl<R, U> LoanOriginationService<R, U>
where
    R: ApplicationRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(applications: Arc<R>, users: Arc<U>, underwriting: UnderwritingConfig) -> Self {
        Self::with_intake_policy(applications, users, IntakePolicy::default(), underwriting)
    }

    pub fn with_intake_policy(
        applications: Arc<R>,
        users: Arc<U>,
        intake: IntakePolicy,
        underwriting: UnderwritingConfig,
    ) -> Self {
        Self {
            applications,
            users,
            guard: IntakeGuard::with_policy(intake),
            engine: EvaluationEngine::new(underwriting),
        }
    }

    /// Validate and persist a new application on behalf of `acting_email`.
    ///
    /// Validation short-circuits in a fixed order: ownership, amount, term,
    /// applicant existence. The single store write happens only after every
    /// check has passed, so no partial state is ever persisted.
    pub async fn submit(
        &self,
        submission: LoanSubmission,
        acting_email: &str,
    ) -> Result<LoanApplication, OriginationError> {
        info!(applicant = %submission.applicant_email, "processing loan application submission");

        // The acting identity comes from the session, the declared applicant
        // from the payload; they must be reconciled before any domain check.
        let applicant_email = normalize_email(&submission.applicant_email);
        if normalize_email(acting_email) != applicant_email {
            warn!("submission rejected: acting user does not own the application");
            return Err(OriginationError::Unauthorized);
        }

        self.guard.check(&submission)?;

        let applicant = self
            .users
            .find_by_email(&applicant_email)
            .await
            .map_err(OriginationError::from_user_store)?;
        if applicant.is_none() {
            warn!(email = %applicant_email, "submission rejected: applicant is not registered");
            return Err(OriginationError::UnknownApplicant);
        }

        let record = NewLoanApplication {
            applicant_email,
            amount: submission.amount,
            term_months: submission.term_months,
            status: ApplicationStatus::PendingReview,
        };

        // A duplicate from the store here means our existence check raced
        // another writer; surface it as a conflict, not a server fault.
        let stored = self
            .applications
            .insert(record)
            .await
            .map_err(OriginationError::from_application_store)?;
        info!(id = %stored.id.0, "loan application stored");
        Ok(stored)
    }

    /// Resolve an application and its applicant, then apply the configured
    /// underwriting strategy. Reads fresh data on every call and never
    /// mutates the stored application.
    pub async fn evaluate(
        &self,
        application_id: &ApplicationId,
    ) -> Result<EvaluationResult, OriginationError> {
        info!(id = %application_id.0, "evaluating loan application");

        let application = self
            .applications
            .find_by_id(application_id)
            .await
            .map_err(OriginationError::from_application_store)?
            .ok_or(OriginationError::ApplicationNotFound)?;

        let applicant = self
            .users
            .find_by_email(&normalize_email(&application.applicant_email))
            .await
            .map_err(OriginationError::from_user_store)?
            .ok_or_else(|| {
                warn!(
                    id = %application_id.0,
                    "evaluation aborted: stored applicant email resolves to no user"
                );
                OriginationError::ApplicantNotFound
            })?;

        let result = self.engine.evaluate(applicant.base_salary, &application);
        info!(id = %application_id.0, verdict = result.verdict.label(), "evaluation complete");
        Ok(result)
    }

    /// Paginated, status-scoped read of applications awaiting human review.
    /// The page request passes through opaquely; no filtering or sorting
    /// happens here.
    pub async fn review_queue(
        &self,
        page: &PageRequest,
    ) -> Result<Vec<LoanApplication>, OriginationError> {
        info!(
            page = page.page,
            size = page.size,
            sort_by = %page.sort_by,
            "listing applications for manual review"
        );

        self.applications
            .find_by_statuses(&REVIEW_QUEUE_STATUSES, page)
            .await
            .map_err(OriginationError::from_application_store)
    }
}

/// Error raised by the origination service. Variants correspond to the
/// boundary signals callers must be able to distinguish: bad input, denied
/// ownership, missing records, write conflicts, and infrastructure faults.
#[derive(Debug, thiserror::Error)]
pub enum OriginationError {
    #[error(transparent)]
    Validation(#[from] IntakeViolation),
    #[error("the acting user may not file an application for another applicant")]
    Unauthorized,
    #[error("no registered user matches the applicant email")]
    UnknownApplicant,
    #[error("loan application not found")]
    ApplicationNotFound,
    #[error("the applicant referenced by this application no longer exists")]
    ApplicantNotFound,
    #[error("a conflicting application already exists")]
    Conflict,
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

impl OriginationError {
    fn from_application_store(err: ApplicationRepositoryError) -> Self {
        match err {
            ApplicationRepositoryError::Conflict => OriginationError::Conflict,
            ApplicationRepositoryError::NotFound => OriginationError::ApplicationNotFound,
            ApplicationRepositoryError::Unavailable(message) => {
                OriginationError::Unavailable(message)
            }
        }
    }

    /// Absence is modeled as `Ok(None)` on the lookup port, so any error from
    /// the user store here is an infrastructure fault, not a missing record.
    fn from_user_store(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Unavailable(message) => OriginationError::Unavailable(message),
            other => OriginationError::Unavailable(other.to_string()),
        }
    }
}
