//! User registration, credential checks, and token issuance.
//!
//! The user store is the system of record for email uniqueness; this module
//! validates registrations, but a racing writer losing to the store's own
//! constraint is still reported as a taken email rather than a server fault.

pub mod auth;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use auth::{AuthError, CredentialScheme, TokenAuthority, TokenClaims};
pub use domain::{normalize_email, NewUser, User, UserId, UserView, DEFAULT_ROLE};
pub use repository::{UserRecord, UserRepository, UserRepositoryError};
pub use router::identity_router;
pub use service::{IdentityError, IdentityService, RegistrationPolicy};
