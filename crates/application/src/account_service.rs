//! Account ports and credential checks behind token issuance.
//!
//! Accounts are provisioned outside the service; this module only verifies
//! credentials and turns an account into a [`Caller`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use stockroom_core::{AppResult, Caller, Role};
use tracing::info;

/// Stored account as provisioned by an operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountRecord {
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Group memberships.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Superuser override.
    #[serde(default)]
    pub is_superuser: bool,
}

impl AccountRecord {
    /// Returns the caller identity this account acts as.
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller::new(self.username.clone(), self.roles.clone(), self.is_superuser)
    }
}

/// Repository port for account lookup.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>>;
}

/// Password hashing port.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Verifies credentials against the account repository.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Creates an account service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Returns the caller for valid credentials, `None` for any failure.
    ///
    /// Unknown usernames still pay for one hash so both failures take similar time.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<Caller>> {
        let Some(account) = self.repository.find_by_username(username).await? else {
            let _ = self.password_hasher.hash_password(password);
            info!(username, outcome = "unknown_account", "login attempt");
            return Ok(None);
        };

        if !self
            .password_hasher
            .verify_password(password, &account.password_hash)?
        {
            info!(username, outcome = "invalid_password", "login attempt");
            return Ok(None);
        }

        Ok(Some(account.caller()))
    }

    /// Reloads the current identity of an account, `None` once it is removed.
    pub async fn caller_for(&self, username: &str) -> AppResult<Option<Caller>> {
        Ok(self
            .repository
            .find_by_username(username)
            .await?
            .map(|account| account.caller()))
    }
}
