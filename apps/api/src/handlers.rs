pub mod health;
pub mod record_types;
pub mod records;
pub mod tasks;
