//! Classroom builder
//!
//! Tutorial capacity is derived from lecture capacity by tiers. Rooms above
//! [`TUTORIAL_CAPACITY_LIMIT`] keep their lecture capacity, which later
//! excludes them from tutorial use.

use crate::source::RecordSource;
use ptt_common::{Classroom, Collection, Error, Result};
use tracing::{debug, info};

/// Rooms with a larger tutorial capacity are never used for tutorials
pub const TUTORIAL_CAPACITY_LIMIT: u32 = 50;

/// Tutorial capacity tier for a lecture capacity
pub fn tutorial_capacity(lecture_capacity: u32) -> u32 {
    match lecture_capacity {
        c if c > TUTORIAL_CAPACITY_LIMIT => c,
        30..=TUTORIAL_CAPACITY_LIMIT => 30,
        18..=29 => 18,
        c => c,
    }
}

/// One classroom per record of the configured classroom set
///
/// Fails with `CapacityExceeded` past 255 classrooms.
pub fn build_classrooms(source: &dyn RecordSource) -> Result<Collection<Classroom>> {
    let mut classrooms = Collection::new();

    for record in source.classrooms() {
        let lecture_capacity = u32::try_from(record.capacity).map_err(|_| {
            Error::MalformedConfiguration(format!(
                "Classroom {} has invalid capacity {}",
                record.classroom_id, record.capacity
            ))
        })?;

        let classroom = Classroom {
            original_id: record.classroom_id.clone(),
            generated_id: 0,
            descriptive: record.short_name.clone(),
            lecture_capacity,
            tutorial_capacity: tutorial_capacity(lecture_capacity),
        };
        debug!("{}", classroom);
        classrooms.add(classroom)?;
    }

    info!("Built {} classrooms", classrooms.len());
    Ok(classrooms)
}
