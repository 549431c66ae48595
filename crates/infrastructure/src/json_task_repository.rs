use std::path::PathBuf;

use async_trait::async_trait;
use stockroom_application::TaskRepository;
use stockroom_core::{AppError, AppResult};
use stockroom_domain::Task;
use tokio::fs;
use tracing::info;

/// Task list kept as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileTaskRepository {
    path: PathBuf,
}

impl JsonFileTaskRepository {
    /// Creates a repository over the given file, which may not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn ensure_file(&self) -> AppResult<()> {
        if fs::try_exists(&self.path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to check task file '{}': {error}",
                self.path.display()
            ))
        })? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create task directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        info!(path = %self.path.display(), "creating empty task file");
        self.write(&[]).await
    }

    async fn write(&self, tasks: &[Task]) -> AppResult<()> {
        let body = serde_json::to_string_pretty(tasks)
            .map_err(|error| AppError::Internal(format!("failed to encode tasks: {error}")))?;

        fs::write(&self.path, body).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write task file '{}': {error}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl TaskRepository for JsonFileTaskRepository {
    async fn load_all(&self) -> AppResult<Vec<Task>> {
        self.ensure_file().await?;

        let body = fs::read_to_string(&self.path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read task file '{}': {error}",
                self.path.display()
            ))
        })?;

        serde_json::from_str(&body).map_err(|error| {
            AppError::Internal(format!(
                "task file '{}' is malformed: {error}",
                self.path.display()
            ))
        })
    }

    async fn replace_all(&self, tasks: &[Task]) -> AppResult<()> {
        self.write(tasks).await
    }
}
