//! Filter and validator
//!
//! Filtering drops subjects the scheduler cannot handle and the student
//! references to them. Validation then checks per-kind invariants before
//! anything is exported.

use crate::settings::HeuristicSettings;
use ptt_common::{Collection, Entity, EntityKind, EntityStore, Error, OriginalId, Result, Subject};
use std::collections::HashSet;
use tracing::info;

/// What a filter pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub subjects_removed: usize,
    pub enrollments_removed: usize,
}

/// A subject is unusable if it carries the exclusion marker or nobody teaches it
pub fn is_unusable(subject: &Subject, heuristics: &HeuristicSettings) -> bool {
    heuristics.is_excluded_subject(&subject.descriptive) || !subject.has_teachers()
}

/// Remove unusable subjects and every student reference to them
///
/// Surviving subjects are renumbered so generated ids stay dense. Running
/// the filter again on its own output removes nothing.
pub fn filter(store: &mut EntityStore, heuristics: &HeuristicSettings) -> FilterReport {
    let unusable: HashSet<OriginalId> = store
        .subjects
        .iter()
        .filter(|subject| is_unusable(subject, heuristics))
        .map(|subject| subject.original_id.clone())
        .collect();

    let mut enrollments_removed = 0;
    for student in store.students.iter_mut() {
        let before = student.subjects.len();
        student.subjects.retain(|code| !unusable.contains(code));
        enrollments_removed += before - student.subjects.len();
    }

    let subjects_removed = store
        .subjects
        .retain(|subject| !unusable.contains(&subject.original_id));
    store.subjects.renumber();

    let report = FilterReport {
        subjects_removed,
        enrollments_removed,
    };
    info!(
        "Filtered {} subjects and {} enrollments",
        report.subjects_removed, report.enrollments_removed
    );
    report
}

/// Check that every kind is non-empty, uniquely keyed and densely numbered
pub fn validate(store: &EntityStore) -> Result<()> {
    validate_collection(&store.classrooms)?;
    validate_collection(&store.professors)?;
    validate_collection(&store.students)?;
    validate_collection(&store.subjects)?;

    info!("Validated store");
    Ok(())
}

fn validate_collection<T: Entity>(collection: &Collection<T>) -> Result<()> {
    let kind: EntityKind = T::KIND;

    if collection.is_empty() {
        return Err(Error::MalformedConfiguration(format!("No {} entities", kind)));
    }

    let mut seen = HashSet::with_capacity(collection.len());
    for entity in collection {
        if !seen.insert(entity.original_id()) {
            return Err(Error::DuplicateIdentifier {
                kind,
                id: entity.original_id().to_string(),
            });
        }
    }

    for (expected, entity) in collection.iter().enumerate() {
        if entity.generated_id() as usize != expected {
            return Err(Error::MalformedConfiguration(format!(
                "{} {} has generated id {}, expected {}",
                kind,
                entity.original_id(),
                entity.generated_id(),
                expected
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptt_common::{Classroom, Professor, Student};

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store
            .classrooms
            .add(Classroom {
                original_id: "1".into(),
                generated_id: 0,
                descriptive: "P1".to_string(),
                lecture_capacity: 40,
                tutorial_capacity: 30,
            })
            .unwrap();
        store
            .professors
            .add(Professor {
                original_id: "T1".into(),
                generated_id: 0,
                descriptive: "Ana Novak".to_string(),
                name: "Ana Novak".to_string(),
                available_hours: 100,
            })
            .unwrap();

        let mut taught = Subject::new("A".into(), "Algoritmi");
        taught.professors.push("T1".into());
        taught.assistants.push("T1".into());
        let untaught = Subject::new("B".into(), "Brez izvajalca");
        let mut marked = Subject::new("C".into(), "Ekonomija (EF)");
        marked.professors.push("T1".into());
        let mut last = Subject::new("D".into(), "Diskretne strukture");
        last.assistants.push("T1".into());
        for subject in [taught, untaught, marked, last] {
            store.subjects.add(subject).unwrap();
        }

        store
            .students
            .add(Student {
                original_id: "s1".into(),
                generated_id: 0,
                descriptive: "Janez Novak (s1)".to_string(),
                subjects: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            })
            .unwrap();
        store
    }

    #[test]
    fn test_filter_removes_untaught_and_marked_subjects() {
        let mut store = store();
        let report = filter(&mut store, &HeuristicSettings::default());

        assert_eq!(
            report,
            FilterReport {
                subjects_removed: 2,
                enrollments_removed: 2
            }
        );
        assert!(!store.subjects.contains(&"B".into()));
        assert!(!store.subjects.contains(&"C".into()));

        let student = store.students.get_by_original_id(&"s1".into()).unwrap();
        assert_eq!(student.subjects, vec![OriginalId::from("A"), OriginalId::from("D")]);
    }

    #[test]
    fn test_filter_keeps_generated_ids_dense() {
        let mut store = store();
        filter(&mut store, &HeuristicSettings::default());

        assert_eq!(store.generated_ids(EntityKind::Subject), vec![0, 1]);
        assert_eq!(store.subjects.resolve(&"D".into()).unwrap(), 1);
        validate(&store).unwrap();
    }

    #[test]
    fn test_filter_is_idempotent() {
        let heuristics = HeuristicSettings::default();
        let mut once = store();
        filter(&mut once, &heuristics);

        let mut twice = once.clone();
        let report = filter(&mut twice, &heuristics);

        assert_eq!(report, FilterReport::default());
        assert_eq!(twice.subjects.as_slice(), once.subjects.as_slice());
        assert_eq!(twice.students.as_slice(), once.students.as_slice());
    }

    #[test]
    fn test_validate_rejects_empty_kind() {
        let mut store = store();
        store.professors = Collection::new();
        assert!(matches!(
            validate(&store),
            Err(Error::MalformedConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_original_ids() {
        let mut store = store();
        for subject in store.subjects.iter_mut() {
            subject.original_id = "same".into();
        }
        assert!(matches!(
            validate(&store),
            Err(Error::DuplicateIdentifier { kind: EntityKind::Subject, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_gaps() {
        let mut store = store();
        store.subjects.retain(|s| s.original_id.as_str() != "A");
        assert!(matches!(
            validate(&store),
            Err(Error::MalformedConfiguration(_))
        ));
    }
}
