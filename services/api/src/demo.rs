use crate::infra::{
    FingerprintCredentialScheme, InMemoryApplicationRepository, InMemoryTokenAuthority,
    InMemoryUserRepository,
};
use chrono::NaiveDate;
use clap::Args;
use loanflow::error::AppError;
use loanflow::workflows::identity::{IdentityService, NewUser};
use loanflow::workflows::origination::{
    LoanOriginationService, LoanSubmission, PageRequest, UnderwritingConfig, UnderwritingStrategy,
};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Use the historical three-tier salary-band policy instead of the
    /// canonical tiered one.
    #[arg(long)]
    pub(crate) legacy_policy: bool,
}

struct DemoApplicant {
    name: (&'static str, &'static str),
    email: &'static str,
    base_salary: f64,
    amount: f64,
    term_months: u32,
}

const DEMO_APPLICANTS: [DemoApplicant; 3] = [
    DemoApplicant {
        name: ("Camila", "Rojas"),
        email: "camila.rojas@example.com",
        base_salary: 9_000_000.0,
        amount: 5_000_000.0,
        term_months: 24,
    },
    DemoApplicant {
        name: ("Mateo", "Suarez"),
        email: "mateo.suarez@example.com",
        base_salary: 5_000_000.0,
        amount: 6_000_000.0,
        term_months: 36,
    },
    DemoApplicant {
        name: ("Valentina", "Pardo"),
        email: "valentina.pardo@example.com",
        base_salary: 3_000_000.0,
        amount: 6_000_000.0,
        term_months: 24,
    },
];

fn demo_error(err: impl std::fmt::Display) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        err.to_string(),
    ))
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let strategy = if args.legacy_policy {
        UnderwritingStrategy::LegacySalaryBands
    } else {
        UnderwritingStrategy::Tiered
    };

    let users = Arc::new(InMemoryUserRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let tokens = Arc::new(InMemoryTokenAuthority::default());
    let identity = Arc::new(IdentityService::new(
        users.clone(),
        Arc::new(FingerprintCredentialScheme::new("demo")),
        tokens,
    ));
    let origination = LoanOriginationService::new(
        applications,
        users,
        UnderwritingConfig::with_strategy(strategy),
    );

    println!("Loan origination demo ({strategy:?} policy)");

    for applicant in DEMO_APPLICANTS {
        let registered = identity
            .register(NewUser {
                first_name: applicant.name.0.to_string(),
                last_name: applicant.name.1.to_string(),
                birth_date: NaiveDate::from_ymd_opt(1992, 6, 15).expect("valid date"),
                address: "Carrera 7 #45-10".to_string(),
                phone: "3015550199".to_string(),
                email: applicant.email.to_string(),
                base_salary: applicant.base_salary,
                password: "demo-password".to_string(),
                roles: BTreeSet::new(),
            })
            .await
            .map_err(demo_error)?;

        let token = identity
            .login(applicant.email, "demo-password")
            .await
            .map_err(demo_error)?;

        let stored = origination
            .submit(
                LoanSubmission {
                    applicant_email: applicant.email.to_string(),
                    amount: applicant.amount,
                    term_months: applicant.term_months,
                },
                &registered.email,
            )
            .await
            .map_err(demo_error)?;

        let result = origination
            .evaluate(&stored.id)
            .await
            .map_err(demo_error)?;

        println!(
            "- {} {} (salary {:.0}): loan {} for {:.0} over {} months -> {} [token {}]",
            applicant.name.0,
            applicant.name.1,
            applicant.base_salary,
            stored.id.0,
            result.amount,
            result.term_months,
            result.verdict.label(),
            token
        );
    }

    let queue = origination
        .review_queue(&PageRequest {
            page: 0,
            size: 10,
            sort_by: "id".to_string(),
        })
        .await
        .map_err(demo_error)?;

    println!("\nManual review queue");
    for application in &queue {
        println!(
            "- {} | {} | {:.0} over {} months | {}",
            application.id.0,
            application.applicant_email,
            application.amount,
            application.term_months,
            application.status.label()
        );
    }

    Ok(())
}
