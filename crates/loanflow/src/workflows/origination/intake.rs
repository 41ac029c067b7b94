use super::domain::LoanSubmission;

/// Validation errors raised by the intake guard. Every variant is a caller
/// fault recoverable with corrected input.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("loan amount must be greater than 0 and must not exceed {max:.0}")]
    AmountOutOfRange { max: f64 },
    #[error("loan term must be between 1 and {max} months")]
    TermOutOfRange { max: u32 },
}

const DEFAULT_MAX_AMOUNT: f64 = 10_000_000.0;
const DEFAULT_MAX_TERM_MONTHS: u32 = 60;

/// Bounds applied to submitted applications. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakePolicy {
    max_amount: f64,
    max_term_months: u32,
}

impl IntakePolicy {
    pub fn new(max_amount: f64, max_term_months: u32) -> Self {
        let max_amount = if max_amount.is_finite() && max_amount > 0.0 {
            max_amount
        } else {
            DEFAULT_MAX_AMOUNT
        };
        let max_term_months = if max_term_months > 0 {
            max_term_months
        } else {
            DEFAULT_MAX_TERM_MONTHS
        };

        Self {
            max_amount,
            max_term_months,
        }
    }

    pub fn max_amount(&self) -> f64 {
        self.max_amount
    }

    pub fn max_term_months(&self) -> u32 {
        self.max_term_months
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AMOUNT, DEFAULT_MAX_TERM_MONTHS)
    }
}

/// Guard validating submissions against the intake policy. Checks run in a
/// fixed order and stop at the first violation.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Amount first, then term. The ownership check precedes this guard and
    /// the applicant-existence check follows it, both in the service.
    pub fn check(&self, submission: &LoanSubmission) -> Result<(), IntakeViolation> {
        if submission.amount <= 0.0 || submission.amount > self.policy.max_amount {
            return Err(IntakeViolation::AmountOutOfRange {
                max: self.policy.max_amount,
            });
        }
        if submission.term_months == 0 || submission.term_months > self.policy.max_term_months {
            return Err(IntakeViolation::TermOutOfRange {
                max: self.policy.max_term_months,
            });
        }
        Ok(())
    }
}
