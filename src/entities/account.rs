// 👤 Account Entity - signup/login records
//
// "Append-only list, one account per email"
//
// - Emails are normalized (trimmed, lowercased) once, at write time
// - Login compares the normalized input verbatim against stored emails
// - Passwords are stored as received and never leave the registry in a response
// - Check-then-append runs under a single lock so concurrent signups with the
//   same email cannot both succeed

use crate::error::{DirectoryError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ACCOUNT RECORD
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Stable identity (UUID), assigned at signup
    pub id: String,
    pub name: String,
    /// Normalized email (see `normalize_email`)
    pub email: String,
    pub password: String,
}

impl AccountRecord {
    fn new(name: &str, email: &str, password: &str) -> Self {
        AccountRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password.to_string(),
        }
    }

    /// Public view of this account (no password)
    pub fn profile(&self) -> AccountProfile {
        AccountProfile::from(self)
    }
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&AccountRecord> for AccountProfile {
    fn from(account: &AccountRecord) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

/// Canonical form used for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ============================================================================
// SIGNUP POLICY
// ============================================================================

/// How strictly signup validates its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignupPolicy {
    /// Reject empty name, email or password
    #[default]
    Strict,
    /// Accept whatever arrives; only the duplicate check applies
    Lenient,
}

// ============================================================================
// ACCOUNT REGISTRY
// ============================================================================

/// Append-only registry of signed-up accounts.
///
/// Cloning shares the underlying list; each `AppState` gets its own registry.
#[derive(Clone, Default)]
pub struct AccountRegistry {
    accounts: Arc<Mutex<Vec<AccountRecord>>>,
    policy: SignupPolicy,
}

impl AccountRegistry {
    /// Create new empty registry with strict validation
    pub fn new() -> Self {
        Self::with_policy(SignupPolicy::Strict)
    }

    pub fn with_policy(policy: SignupPolicy) -> Self {
        AccountRegistry {
            accounts: Arc::new(Mutex::new(Vec::new())),
            policy,
        }
    }

    pub fn policy(&self) -> SignupPolicy {
        self.policy
    }

    /// Register a new account.
    ///
    /// # Errors
    /// - `InvalidInput` if a field is empty and the policy is strict
    /// - `DuplicateAccount` if the normalized email is already registered
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<AccountRecord> {
        if self.policy == SignupPolicy::Strict {
            validate_signup(name, email, password)?;
        }

        let account = AccountRecord::new(name, email, password);

        let mut accounts = self.accounts.lock();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(DirectoryError::DuplicateAccount);
        }
        accounts.push(account.clone());

        tracing::info!(account_id = %account.id, total = accounts.len(), "Account registered");
        Ok(account)
    }

    /// Find the account matching both email and password.
    ///
    /// # Errors
    /// - `Unauthorized` if no account matches
    pub fn login(&self, email: &str, password: &str) -> Result<AccountRecord> {
        let email = normalize_email(email);
        let accounts = self.accounts.lock();

        accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned()
            .ok_or(DirectoryError::Unauthorized)
    }

    /// Find account by email (normalized before comparison)
    pub fn find_by_email(&self, email: &str) -> Option<AccountRecord> {
        let email = normalize_email(email);
        self.accounts.lock().iter().find(|a| a.email == email).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.lock().is_empty()
    }
}

fn validate_signup(name: &str, email: &str, password: &str) -> Result<()> {
    let fields = [
        ("name", name.trim()),
        ("email", email.trim()),
        ("password", password),
    ];
    let missing: Vec<&str> = fields
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DirectoryError::InvalidInput(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

// ============================================================================
// TESTS
// ============================================================================
