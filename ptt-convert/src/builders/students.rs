//! Student builder

use crate::source::RecordSource;
use ptt_common::{Collection, OriginalId, Result, Student};
use std::collections::HashMap;
use tracing::{debug, info};

/// Finished student collection plus per-subject enrollment counts
///
/// The subject builder needs the counts to size lecture classrooms.
#[derive(Debug, Clone, Default)]
pub struct StudentRoster {
    students: Collection<Student>,
    enrollment_counts: HashMap<OriginalId, usize>,
}

impl StudentRoster {
    pub fn students(&self) -> &Collection<Student> {
        &self.students
    }

    /// Number of students enrolled in a subject (0 if none)
    pub fn enrollment_count(&self, subject: &OriginalId) -> usize {
        self.enrollment_counts.get(subject).copied().unwrap_or(0)
    }

    pub fn into_students(self) -> Collection<Student> {
        self.students
    }
}

/// One student per student record, subjects in enrollment order
///
/// Fails with `CapacityExceeded` past 65535 students.
pub fn build_students(source: &dyn RecordSource) -> Result<StudentRoster> {
    let mut students = Collection::new();
    let mut enrollment_counts: HashMap<OriginalId, usize> = HashMap::new();

    for record in source.students() {
        let subjects = source.student_subjects(&record.student_id).to_vec();
        for subject in &subjects {
            *enrollment_counts.entry(subject.clone()).or_insert(0) += 1;
        }

        let student = Student {
            original_id: record.student_id.clone(),
            generated_id: 0,
            descriptive: format!(
                "{} {} ({})",
                record.first_name, record.last_name, record.student_id
            ),
            subjects,
        };
        let id = students.add(student)?;
        debug!("Student {} -> {}", record.student_id, id);
    }

    info!("Built {} students", students.len());

    Ok(StudentRoster {
        students,
        enrollment_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RecordSet;
    use ptt_common::{EntityKind, Error};

    #[test]
    fn test_students_and_enrollment_counts() {
        let source = RecordSet::new()
            .student("63140001", "Janez", "Novak", &["63201", "63202"])
            .student("63140002", "Ana", "Kranjc", &["63202"]);

        let roster = build_students(&source).unwrap();
        let students = roster.students();

        assert_eq!(students.len(), 2);
        let janez = students.get_by_generated_id(0).unwrap();
        assert_eq!(janez.descriptive, "Janez Novak (63140001)");
        assert_eq!(janez.subjects, vec![OriginalId::from("63201"), OriginalId::from("63202")]);

        assert_eq!(roster.enrollment_count(&"63201".into()), 1);
        assert_eq!(roster.enrollment_count(&"63202".into()), 2);
        assert_eq!(roster.enrollment_count(&"99999".into()), 0);
    }

    #[test]
    fn test_student_without_subjects_is_kept() {
        let source = RecordSet::new().student("1", "A", "B", &[]);
        let roster = build_students(&source).unwrap();
        assert!(roster.students().get_by_original_id(&"1".into()).unwrap().subjects.is_empty());
    }

    #[test]
    fn test_student_limit() {
        let mut source = RecordSet::new();
        for i in 0..=EntityKind::Student.limit() {
            source = source.student(&i.to_string(), "S", "T", &[]);
        }
        let err = build_students(&source).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { kind: EntityKind::Student, limit: 65535 }));
    }
}
