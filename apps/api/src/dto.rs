mod auth;
mod common;
mod records;
mod tasks;

pub use auth::{AccessTokenResponse, RefreshTokenRequest, TokenPairResponse, TokenRequest};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use records::{RecordRequest, RecordResponse, RecordTypeResponse};
pub use tasks::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
