//! Repository implementations for database access
//!
//! Each record kind implements [`Record`] and is served by the same
//! [`RecordRepo`]:
//! - Relies on DB constraints (NOT NULL name), no check-then-insert
//! - Ids and timestamps are assigned by the store only
//! - No cross-request locking, last write wins

pub mod records;
pub mod students;
pub mod teachers;

pub use records::{Record, RecordRepo, StoreError};
pub use students::{NewStudent, Student};
pub use teachers::{NewTeacher, Teacher};
