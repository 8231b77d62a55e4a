//! Explicit classroom requirements
//!
//! A subject's activities may require resources (a projector, lab
//! computers). A classroom satisfies a subject when it offers every distinct
//! resource the subject requires. The result is keyed per subject code.

use crate::source::RecordSource;
use ptt_common::{Classroom, Collection, OriginalId, Subject};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Classrooms satisfying each subject's requirements, keyed by subject code
///
/// Only codes present in `subjects` are matched. Subjects with no
/// requirements, or whose requirements no classroom meets, are absent from
/// the map. Matches are ordered by classroom short name,
/// then by collection order.
pub fn match_requirements(
    source: &dyn RecordSource,
    classrooms: &Collection<Classroom>,
    subjects: &Collection<Subject>,
) -> HashMap<OriginalId, Vec<OriginalId>> {
    let mut subject_order: Vec<&OriginalId> = Vec::new();
    let mut required: HashMap<&OriginalId, HashSet<i64>> = HashMap::new();
    for record in source.subject_requirements() {
        if !subjects.contains(&record.subject_code) {
            continue;
        }
        let resources = required.entry(&record.subject_code).or_insert_with(|| {
            subject_order.push(&record.subject_code);
            HashSet::new()
        });
        resources.insert(record.resource_id);
    }

    let mut offered: HashMap<&OriginalId, HashSet<i64>> = HashMap::new();
    for record in source.classroom_resources() {
        offered
            .entry(&record.classroom_id)
            .or_default()
            .insert(record.resource_id);
    }

    let mut matches = HashMap::new();
    for subject in subject_order {
        let needs = &required[subject];

        let mut rooms: Vec<&Classroom> = classrooms
            .iter()
            .filter(|room| {
                let offer_count = offered
                    .get(&room.original_id)
                    .map(|offers| needs.iter().filter(|r| offers.contains(*r)).count())
                    .unwrap_or(0);
                offer_count == needs.len()
            })
            .collect();

        if rooms.is_empty() {
            debug!("No classroom satisfies requirements of subject {}", subject);
            continue;
        }

        rooms.sort_by(|a, b| a.descriptive.cmp(&b.descriptive));
        matches.insert(
            subject.clone(),
            rooms.into_iter().map(|room| room.original_id.clone()).collect(),
        );
    }

    matches
}
