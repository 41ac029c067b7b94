//! Loan origination and underwriting core.
//!
//! The crate is organized around two workflows backed by independently owned
//! stores: `identity` (registration, credential checks, token issuance) and
//! `origination` (application intake, salary-based underwriting, and the
//! manual review queue). Persistence and token mechanics stay behind ports so
//! adapters can be swapped without touching the decision logic.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
