use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use stockroom_application::TaskUpdate;
use stockroom_domain::Task;

/// Incoming task create payload.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub task: String,
}

/// Incoming task update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub task: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl From<UpdateTaskRequest> for TaskUpdate {
    fn from(value: UpdateTaskRequest) -> Self {
        Self {
            task: value.task,
            completed: value.completed,
        }
    }
}

/// API representation of a task.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub task: String,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub created_display: String,
}

impl From<Task> for TaskResponse {
    fn from(value: Task) -> Self {
        Self {
            created_display: value.created_display(),
            id: value.id,
            task: value.task,
            completed: value.completed,
            created_at: value.created_at,
        }
    }
}
