use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role granted to every user that registers without an explicit role set.
pub const DEFAULT_ROLE: &str = "USER";

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// A registered user. Immutable once stored; the engine never updates users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    /// Stored lowercased; the unique key across the user store.
    pub email: String,
    pub base_salary: f64,
    pub credential_hash: String,
    pub roles: BTreeSet<String>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Registration input before validation and credential hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub base_salary: f64,
    pub password: String,
    /// Empty set means "grant the default role".
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

/// Sanitized representation of a user for API responses. The credential hash
/// and salary never leave the service through this view.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: BTreeSet<String>,
}

/// Canonical form used for every email comparison and store lookup. The store
/// matches exactly, so both sides must pass through here.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Mirrors the registration address check: printable local part, a domain
/// with at least one dot, and an alphabetic TLD of 2 to 6 characters.
pub fn email_format_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic());

    local_ok && host_ok && tld_ok
}
