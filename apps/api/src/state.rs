use std::sync::Arc;

use sqlx::PgPool;
use stockroom_application::{AccessGateway, AccountService, TaskService};

use crate::auth::TokenIssuer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: AccessGateway,
    pub task_service: TaskService,
    pub account_service: AccountService,
    pub token_issuer: Arc<TokenIssuer>,
    pub postgres_pool: Option<PgPool>,
}
