//! Application services and ports.

#![forbid(unsafe_code)]

mod access_gateway;
mod account_service;
mod form_validator;
mod record_ports;
mod role_policy;
mod task_ports;
mod task_service;

#[cfg(test)]
mod test_support;

pub use access_gateway::{AccessGateway, RecordTypeAccess};
pub use account_service::{AccountRecord, AccountRepository, AccountService, PasswordHasher};
pub use form_validator::{
    FormInput, FormValidator, INVALID_CHOICE_REASON, REQUIRED_REASON, ValidatedFields,
    ValidationResult,
};
pub use record_ports::{
    DEFAULT_RECORD_LIST_LIMIT, MAX_RECORD_LIST_LIMIT, RecordListQuery, RecordScan, RecordSearch,
    RecordStore,
};
pub use role_policy::RolePolicy;
pub use task_ports::TaskRepository;
pub use task_service::{TaskService, TaskUpdate};
