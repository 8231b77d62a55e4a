//! Builders
//!
//! Populate the [`EntityStore`] from a [`RecordSource`]. The order is fixed:
//! students → classrooms → professors → subjects. The subject builder takes
//! the finished [`StudentRoster`] and classroom collection as arguments, so
//! it cannot run before them.

pub mod classrooms;
pub mod professors;
pub mod requirements;
pub mod students;
pub mod subjects;

pub use students::StudentRoster;

use crate::settings::HeuristicSettings;
use crate::source::RecordSource;
use ptt_common::{EntityStore, Result};
use tracing::info;

/// Run all builders in dependency order
pub fn build_store(source: &dyn RecordSource, heuristics: &HeuristicSettings) -> Result<EntityStore> {
    let roster = students::build_students(source)?;
    let classrooms = classrooms::build_classrooms(source)?;
    let professors = professors::build_professors(source, heuristics)?;
    let subjects = subjects::build_subjects(source, &roster, &classrooms, heuristics)?;

    let store = EntityStore {
        classrooms,
        professors,
        students: roster.into_students(),
        subjects,
    };

    info!(
        "Built store: {} students, {} classrooms, {} professors, {} subjects",
        store.students.len(),
        store.classrooms.len(),
        store.professors.len(),
        store.subjects.len()
    );

    Ok(store)
}
