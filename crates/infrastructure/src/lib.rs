//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_record_store;
mod json_account_repository;
mod json_task_repository;
mod postgres_record_store;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_record_store::InMemoryRecordStore;
pub use json_account_repository::JsonFileAccountRepository;
pub use json_task_repository::JsonFileTaskRepository;
pub use postgres_record_store::PostgresRecordStore;
