//! OpenDB form engine
//!
//! Schema-driven validation and table projection for categories of JSON
//! records. A category is a `<category>.schema.json` draft-07 schema plus a
//! directory of `<opendb_id>.json` records.
//!
//! The core is synchronous and holds no state of its own:
//!
//! - [`path`] - dotted-path get/set over nested objects
//! - [`schema`] - property and required-field enumeration, form fields
//! - [`validate`] - per-record diagnostic reports
//! - [`table`] - rows for display, edits back into records
//! - [`search`] - row filtering
//!
//! [`store`] and [`session`] wrap the core with file persistence and the
//! in-memory state a UI keeps for the open category.

pub mod config;
pub mod errors;
pub mod models;
pub mod path;
pub mod schema;
pub mod search;
pub mod session;
pub mod store;
pub mod table;
pub mod validate;

pub use errors::{AppError, LoadIssue};
pub use models::{CategoryReport, DiagnosticReport, Record, Row, TypeMismatch, ID_FIELD};
pub use search::{SearchMode, SearchQuery};
pub use session::CategorySession;
pub use store::{RecordStore, SchemaStore};
pub use validate::{validate, SchemaValidator};
