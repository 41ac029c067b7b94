//! Loan application intake, underwriting evaluation, and the manual review
//! queue.
//!
//! Applications reference their applicant by email across an independently
//! owned user store, so every operation re-resolves both entities instead of
//! caching a join. The evaluation itself is a pure function of the salary,
//! amount, and term.

pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationStatus, ApplicationView, LoanApplication, LoanSubmission,
    NewLoanApplication, PageRequest,
};
pub use evaluation::{
    EvaluationEngine, EvaluationResult, UnderwritingConfig, UnderwritingStrategy, Verdict,
};
pub use intake::{IntakeGuard, IntakePolicy, IntakeViolation};
pub use repository::{ApplicationRepository, ApplicationRepositoryError};
pub use router::application_router;
pub use service::{LoanOriginationService, OriginationError, REVIEW_QUEUE_STATUSES};
