mod config;
mod policy;

pub use config::{UnderwritingConfig, UnderwritingStrategy, PRORATION_DIVISOR};
pub use policy::Verdict;

use serde::{Deserialize, Serialize};

use super::domain::LoanApplication;
use policy::decide;

/// Stateless evaluator applying the configured underwriting strategy to an
/// application and its applicant's salary.
pub struct EvaluationEngine {
    config: UnderwritingConfig,
}

impl EvaluationEngine {
    pub fn new(config: UnderwritingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UnderwritingConfig {
        &self.config
    }

    /// Pure and idempotent: the same application and salary always produce
    /// the same result. The salary is input only and never echoed back.
    pub fn evaluate(&self, base_salary: f64, application: &LoanApplication) -> EvaluationResult {
        let verdict = decide(&self.config, base_salary, application.amount);

        EvaluationResult {
            verdict,
            amount: application.amount,
            term_months: application.term_months,
        }
    }
}

/// Evaluation output: the verdict plus the application's unmodified amount
/// and term. Constructed fresh per call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub verdict: Verdict,
    pub amount: f64,
    pub term_months: u32,
}
