use async_trait::async_trait;
use stockroom_core::AppResult;
use stockroom_domain::Task;

/// Whole-list persistence for the flat-file task list.
///
/// The list is small and always rewritten in full, so the port only loads and replaces.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Loads every task in stored order.
    async fn load_all(&self) -> AppResult<Vec<Task>>;

    /// Replaces the stored list.
    async fn replace_all(&self, tasks: &[Task]) -> AppResult<()>;
}
