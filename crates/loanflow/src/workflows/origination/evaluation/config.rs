use serde::{Deserialize, Serialize};

/// Divisor converting a requested amount into an implied monthly obligation
/// for the insufficiency check. A fixed proration constant, deliberately
/// independent of the application's actual term.
pub const PRORATION_DIVISOR: f64 = 12.0;

const DEFAULT_AUTO_APPROVE_SALARY: f64 = 8_000_000.0;
const DEFAULT_AFFORDABILITY_RATIO: f64 = 0.4;
const DEFAULT_REVIEW_SALARY_FLOOR: f64 = 4_000_000.0;

/// Named underwriting rule sets. Two coexist in the product's history; the
/// five-tier `Tiered` set is canonical and `LegacySalaryBands` survives only
/// as an explicit configuration choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderwritingStrategy {
    /// Five-tier policy with affordability and insufficiency overrides.
    Tiered,
    /// Historical three-tier policy keyed on salary bands alone.
    LegacySalaryBands,
}

/// Underwriting thresholds. Every comparison in the decision rules reads from
/// here so a policy change never touches control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingConfig {
    pub strategy: UnderwritingStrategy,
    /// Salaries at or above this approve outright.
    pub auto_approve_salary: f64,
    /// Amounts up to this fraction of the salary approve outright.
    pub affordability_ratio: f64,
    /// Salaries at or above this fall to analyst review instead of denial.
    pub review_salary_floor: f64,
}

impl Default for UnderwritingConfig {
    fn default() -> Self {
        Self {
            strategy: UnderwritingStrategy::Tiered,
            auto_approve_salary: DEFAULT_AUTO_APPROVE_SALARY,
            affordability_ratio: DEFAULT_AFFORDABILITY_RATIO,
            review_salary_floor: DEFAULT_REVIEW_SALARY_FLOOR,
        }
    }
}

impl UnderwritingConfig {
    pub fn with_strategy(strategy: UnderwritingStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}
