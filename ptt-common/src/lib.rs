//! # ParallelTimetables Common Library
//!
//! Shared code for the data converter and the tools that read its output:
//! - Entity model (classrooms, professors, students, subjects)
//! - Entity Store with lookup by original and generated id
//! - Snapshot persistence for reverse id translation
//! - Configuration file resolution
//! - Error taxonomy

pub mod config;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
pub use model::{
    Classroom, Entity, EntityKind, GeneratedId, OriginalId, Professor, Student, Subject,
};
pub use store::{Collection, EntityStore};
