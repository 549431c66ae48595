use std::path::Path;
use std::sync::Arc;

use sqlx::PgPool;
use stockroom_application::{
    AccessGateway, AccountService, RecordStore, RolePolicy, TaskService,
};
use stockroom_core::AppError;
use stockroom_domain::{RecordTypeCatalog, stock_catalog};
use stockroom_infrastructure::{
    Argon2PasswordHasher, InMemoryRecordStore, JsonFileAccountRepository,
    JsonFileTaskRepository, PostgresRecordStore,
};
use tracing::info;

use crate::api_config::ApiConfig;
use crate::auth::TokenIssuer;
use crate::state::AppState;

pub async fn build_app_state(
    config: &ApiConfig,
    postgres_pool: Option<PgPool>,
) -> Result<AppState, AppError> {
    let catalog = stock_catalog()?;
    let policy = Arc::new(load_role_policy(config.role_policy_file.as_deref(), &catalog).await?);

    let store: Arc<dyn RecordStore> = match &postgres_pool {
        Some(pool) => Arc::new(PostgresRecordStore::new(pool.clone())),
        None => {
            info!("using in-memory record store; records are lost on restart");
            Arc::new(InMemoryRecordStore::new())
        }
    };

    let accounts = JsonFileAccountRepository::load(&config.accounts_file).await?;
    let account_service = AccountService::new(
        Arc::new(accounts),
        Arc::new(Argon2PasswordHasher::new()),
    );

    let task_service = TaskService::new(
        Arc::new(JsonFileTaskRepository::new(config.tasks_file.clone())),
        policy.clone(),
    );

    Ok(AppState {
        gateway: AccessGateway::new(Arc::new(catalog), store, policy),
        task_service,
        account_service,
        token_issuer: Arc::new(TokenIssuer::new(
            config.jwt_secret.as_str(),
            config.access_token_ttl_seconds,
            config.refresh_token_ttl_seconds,
        )),
        postgres_pool,
    })
}

/// Reads a JSON role policy, or falls back to the stock defaults.
async fn load_role_policy(
    path: Option<&Path>,
    catalog: &RecordTypeCatalog,
) -> Result<RolePolicy, AppError> {
    let Some(path) = path else {
        return Ok(RolePolicy::stock_defaults(catalog));
    };

    let body = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to read role policy file '{}': {error}",
            path.display()
        ))
    })?;

    let policy: RolePolicy = serde_json::from_str(&body).map_err(|error| {
        AppError::Validation(format!(
            "role policy file '{}' is malformed: {error}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), "loaded role policy");
    Ok(policy)
}
