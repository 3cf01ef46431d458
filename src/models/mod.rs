//! Data models for the OpenDB form engine.
//!
//! Records are plain JSON objects; reports are produced fresh per validation call.

mod record;
mod report;

pub use record::*;
pub use report::*;
