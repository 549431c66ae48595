use std::path::Path;

use async_trait::async_trait;
use stockroom_application::{AccountRecord, AccountRepository};
use stockroom_core::{AppError, AppResult};
use tracing::info;

/// Read-only account list loaded once from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonFileAccountRepository {
    accounts: Vec<AccountRecord>,
}

impl JsonFileAccountRepository {
    /// Wraps an already loaded account list.
    #[must_use]
    pub fn new(accounts: Vec<AccountRecord>) -> Self {
        Self { accounts }
    }

    /// Loads `[{username, password_hash, roles, is_superuser}]` from disk.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let body = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read accounts file '{}': {error}",
                path.display()
            ))
        })?;

        let accounts: Vec<AccountRecord> = serde_json::from_str(&body).map_err(|error| {
            AppError::Internal(format!(
                "accounts file '{}' is malformed: {error}",
                path.display()
            ))
        })?;

        let mut usernames: Vec<&str> = accounts
            .iter()
            .map(|account| account.username.as_str())
            .collect();
        usernames.sort_unstable();
        if let Some(duplicate) = usernames.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(AppError::Conflict(format!(
                "accounts file lists '{}' more than once",
                duplicate[0]
            )));
        }

        info!(count = accounts.len(), path = %path.display(), "loaded accounts");
        Ok(Self::new(accounts))
    }
}

#[async_trait]
impl AccountRepository for JsonFileAccountRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>> {
        Ok(self
            .accounts
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockroom_application::AccountRepository;
    use stockroom_core::{AppError, Role};

    use super::JsonFileAccountRepository;

    async fn write_scratch(body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "stockroom-accounts-{}-{}.json",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        assert!(tokio::fs::write(&path, body).await.is_ok());
        path
    }

    #[tokio::test]
    async fn accounts_are_loaded_and_found_by_username() {
        let path = write_scratch(
            r#"[
                {"username": "ana", "password_hash": "h1", "roles": ["Admin"]},
                {"username": "root", "password_hash": "h2", "is_superuser": true}
            ]"#,
        )
        .await;

        let repository = JsonFileAccountRepository::load(&path)
            .await
            .unwrap_or_default();
        let ana = repository.find_by_username("ana").await.unwrap_or_default();
        let root = repository.find_by_username("root").await.unwrap_or_default();

        assert!(ana.is_some_and(|account| account.roles == vec![Role::Admin]));
        assert!(root.is_some_and(|account| account.is_superuser && account.roles.is_empty()));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let path = write_scratch(
            r#"[
                {"username": "ana", "password_hash": "h1"},
                {"username": "ana", "password_hash": "h2"}
            ]"#,
        )
        .await;

        assert!(matches!(
            JsonFileAccountRepository::load(&path).await,
            Err(AppError::Conflict(_))
        ));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
