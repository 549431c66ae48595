use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use stockroom_core::{AppError, AppResult};

/// Resource name the role policy uses for the task list.
pub const TASK_RESOURCE: &str = "task";

/// One entry of the flat-file task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Positive task identity.
    pub id: i64,
    /// Task description.
    pub task: String,
    /// Completion flag.
    pub completed: bool,
    /// Local creation time, as written by the file's producer.
    pub created_at: NaiveDateTime,
}

impl Task {
    /// Creates an open task after checking the description.
    pub fn new(id: i64, task: impl Into<String>, created_at: NaiveDateTime) -> AppResult<Self> {
        let task = validate_task_text(task)?;
        if id <= 0 {
            return Err(AppError::Validation(format!(
                "task id must be positive, got {id}"
            )));
        }

        Ok(Self {
            id,
            task,
            completed: false,
            created_at,
        })
    }

    /// Returns the creation date the way the task list shows it (`1 December 2025`).
    #[must_use]
    pub fn created_display(&self) -> String {
        self.created_at.format("%-d %B %Y").to_string()
    }
}

/// Trims and checks a task description.
pub fn validate_task_text(task: impl Into<String>) -> AppResult<String> {
    let task = task.into();
    let trimmed = task.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "task must not be empty or whitespace".to_owned(),
        ));
    }

    Ok(trimmed.to_owned())
}
