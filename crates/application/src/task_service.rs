use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use stockroom_core::{AppError, AppResult, Caller};
use stockroom_domain::{AuditAction, Operation, TASK_RESOURCE, Task, validate_task_text};
use tokio::sync::Mutex;
use tracing::info;

use crate::{RolePolicy, TaskRepository};

/// Changes applied to an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskUpdate {
    /// New description, kept when absent.
    #[serde(default)]
    pub task: Option<String>,
    /// New completion flag. An absent flag means not completed.
    #[serde(default)]
    pub completed: bool,
}

/// Gated CRUD over the flat-file task list.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    policy: Arc<RolePolicy>,
    write_lock: Arc<Mutex<()>>,
}

impl TaskService {
    /// Creates a task service.
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>, policy: Arc<RolePolicy>) -> Self {
        Self {
            repository,
            policy,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Lists all tasks. Any authenticated caller may view the list.
    pub async fn list(&self) -> AppResult<Vec<Task>> {
        self.repository.load_all().await
    }

    /// Appends a new open task. Its id is one past the highest stored id.
    pub async fn create(&self, caller: &Caller, text: &str) -> AppResult<Task> {
        self.policy.require(caller, TASK_RESOURCE, Operation::Add)?;
        self.create_at(caller, text, now()).await
    }

    async fn create_at(
        &self,
        caller: &Caller,
        text: &str,
        created_at: NaiveDateTime,
    ) -> AppResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.repository.load_all().await?;

        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        let task = Task::new(next_id, text, created_at)?;
        tasks.push(task.clone());
        self.repository.replace_all(&tasks).await?;

        audit(caller, AuditAction::TaskCreated, task.id);
        Ok(task)
    }

    /// Updates the description and completion flag of a task.
    pub async fn update(&self, caller: &Caller, id: i64, update: TaskUpdate) -> AppResult<Task> {
        self.policy
            .require(caller, TASK_RESOURCE, Operation::Change)?;

        let text = update.task.map(validate_task_text).transpose()?;

        let _guard = self.write_lock.lock().await;
        let mut tasks = self.repository.load_all().await?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| task_not_found(id))?;

        if let Some(text) = text {
            task.task = text;
        }
        task.completed = update.completed;
        let updated = task.clone();
        self.repository.replace_all(&tasks).await?;

        audit(caller, AuditAction::TaskUpdated, id);
        Ok(updated)
    }

    /// Removes a task.
    pub async fn delete(&self, caller: &Caller, id: i64) -> AppResult<()> {
        self.policy
            .require(caller, TASK_RESOURCE, Operation::Delete)?;

        let _guard = self.write_lock.lock().await;
        let mut tasks = self.repository.load_all().await?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(task_not_found(id));
        }
        self.repository.replace_all(&tasks).await?;

        audit(caller, AuditAction::TaskDeleted, id);
        Ok(())
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn task_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("task {id} does not exist"))
}

fn audit(caller: &Caller, action: AuditAction, id: i64) {
    info!(
        action = action.as_str(),
        subject = caller.subject(),
        task_id = id,
        "task mutation"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use stockroom_core::{AppError, AppResult, Caller, Role};
    use stockroom_domain::{Task, stock_catalog};
    use tokio::sync::Mutex;

    use super::{TaskService, TaskUpdate};
    use crate::{RolePolicy, TaskRepository};

    #[derive(Default)]
    struct FakeTaskRepository {
        tasks: Mutex<Vec<Task>>,
    }

    #[async_trait]
    impl TaskRepository for FakeTaskRepository {
        async fn load_all(&self) -> AppResult<Vec<Task>> {
            Ok(self.tasks.lock().await.clone())
        }

        async fn replace_all(&self, tasks: &[Task]) -> AppResult<()> {
            *self.tasks.lock().await = tasks.to_vec();
            Ok(())
        }
    }

    fn service() -> (TaskService, Arc<FakeTaskRepository>) {
        let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());
        let repository = Arc::new(FakeTaskRepository::default());
        let service = TaskService::new(
            repository.clone(),
            Arc::new(RolePolicy::stock_defaults(&catalog)),
        );
        (service, repository)
    }

    fn admin() -> Caller {
        Caller::with_role("ana", Role::Admin)
    }

    #[tokio::test]
    async fn ids_follow_the_highest_stored_id() {
        let (service, _) = service();
        let admin = admin();

        for text in ["count pallets", "order boxes", "label shelves"] {
            assert!(service.create(&admin, text).await.is_ok());
        }
        assert!(service.delete(&admin, 2).await.is_ok());

        let created = service
            .create(&admin, "sweep floor")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(created.id, 4);
        assert!(!created.completed);
    }

    #[tokio::test]
    async fn update_sets_text_and_completion() {
        let (service, repository) = service();
        let admin = admin();
        let created_at = NaiveDate::from_ymd_opt(2025, 12, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .unwrap_or_default();
        assert!(
            service
                .create_at(&admin, "count pallets", created_at)
                .await
                .is_ok()
        );

        let updated = service
            .update(
                &admin,
                1,
                TaskUpdate {
                    task: Some("  count all pallets ".to_owned()),
                    completed: true,
                },
            )
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(updated.task, "count all pallets");
        assert!(updated.completed);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(repository.tasks.lock().await.clone(), vec![updated]);
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let (service, _) = service();

        assert!(matches!(
            service.update(&admin(), 9, TaskUpdate::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&admin(), 9).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn users_may_only_view() {
        let (service, _) = service();
        let user = Caller::with_role("maria", Role::User);

        assert!(service.list().await.is_ok());
        assert!(matches!(
            service.create(&user, "order boxes").await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn roleless_caller_views_but_cannot_change() {
        let (service, _) = service();
        let admin = admin();
        let guest = Caller::new("guest", Vec::new(), false);
        assert!(service.create(&admin, "count pallets").await.is_ok());

        let listed = service.list().await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert!(matches!(
            service.update(&guest, 1, TaskUpdate::default()).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&guest, 1).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let (service, repository) = service();

        assert!(matches!(
            service.create(&admin(), "   ").await,
            Err(AppError::Validation(_))
        ));
        assert!(repository.tasks.lock().await.is_empty());
    }
}
