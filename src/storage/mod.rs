pub mod models;
pub mod queries;
pub mod sqlite;

pub use models::{AuditStats, FileDetails, RecordPage, RecordQuery, RenameRecord};
pub use sqlite::AuditStore;
