use serde::{Deserialize, Serialize};

use super::config::{UnderwritingConfig, UnderwritingStrategy, PRORATION_DIVISOR};

/// Outcome of a single evaluation run. Ephemeral, in contrast to the stored
/// [`ApplicationStatus`]; a REJECTED verdict and a REJECTED lifecycle status
/// are different facts.
///
/// [`ApplicationStatus`]: super::super::domain::ApplicationStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Approved,
    Rejected,
    UnderReview,
    Denied,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Approved => "APPROVED",
            Verdict::Rejected => "REJECTED",
            Verdict::UnderReview => "UNDER_REVIEW",
            Verdict::Denied => "DENIED",
        }
    }
}

pub(crate) fn decide(config: &UnderwritingConfig, salary: f64, amount: f64) -> Verdict {
    match config.strategy {
        UnderwritingStrategy::Tiered => decide_tiered(config, salary, amount),
        UnderwritingStrategy::LegacySalaryBands => decide_salary_bands(config, salary),
    }
}

/// Five-tier policy. The rules are not commutative: the insufficiency check
/// (salary below the prorated monthly obligation) outranks the review band,
/// so a reviewable salary can still be rejected outright.
fn decide_tiered(config: &UnderwritingConfig, salary: f64, amount: f64) -> Verdict {
    if salary >= config.auto_approve_salary {
        return Verdict::Approved;
    }
    if amount <= salary * config.affordability_ratio {
        return Verdict::Approved;
    }
    if salary < amount / PRORATION_DIVISOR {
        return Verdict::Rejected;
    }
    if salary >= config.review_salary_floor {
        return Verdict::UnderReview;
    }
    Verdict::Denied
}

/// Historical three-tier policy keyed on salary bands alone; no affordability
/// or insufficiency overrides.
fn decide_salary_bands(config: &UnderwritingConfig, salary: f64) -> Verdict {
    if salary >= config.auto_approve_salary {
        Verdict::Approved
    } else if salary >= config.review_salary_floor {
        Verdict::UnderReview
    } else {
        Verdict::Denied
    }
}
