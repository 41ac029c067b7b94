use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Lifecycle status of a stored application. Written once at intake and then
/// owned entirely by the external reviewer workflow; the engine reads it only
/// to scope the review queue. Distinct from [`Verdict`], which is the output
/// of a single evaluation run.
///
/// [`Verdict`]: super::evaluation::Verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    PendingReview,
    Approved,
    Rejected,
    ManualReview,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::PendingReview => "PENDING_REVIEW",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::ManualReview => "MANUAL_REVIEW",
        }
    }
}

/// An inbound submission before validation. Carries no id; the store assigns
/// one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSubmission {
    pub applicant_email: String,
    pub amount: f64,
    pub term_months: u32,
}

/// A validated application as handed to the store for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoanApplication {
    pub applicant_email: String,
    pub amount: f64,
    pub term_months: u32,
    pub status: ApplicationStatus,
}

/// A stored loan application. The amount and term are copied verbatim from
/// the submission; no rounding or currency conversion happens in this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: ApplicationId,
    pub applicant_email: String,
    pub amount: f64,
    pub term_months: u32,
    pub status: ApplicationStatus,
}

impl LoanApplication {
    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            id: self.id.clone(),
            applicant_email: self.applicant_email.clone(),
            amount: self.amount,
            term_months: self.term_months,
            status: self.status.label(),
        }
    }
}

/// Wire representation of an application for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub applicant_email: String,
    pub amount: f64,
    pub term_months: u32,
    pub status: &'static str,
}

/// Pagination parameters forwarded opaquely to the application store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
}
