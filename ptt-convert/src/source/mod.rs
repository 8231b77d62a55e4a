//! Record source contract
//!
//! Builders read flat records grouped by entity kind through [`RecordSource`].
//! Record order is significant: it decides generated id assignment, so every
//! source must return the same order for the same data.
//!
//! [`RecordSet`] is the in-memory implementation. The SQLite adapter fills
//! one up front, before any builder runs.

use ptt_common::OriginalId;
use std::collections::HashMap;

pub mod sqlite;

pub use sqlite::SqliteSource;

/// (student external id, first name, last name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub student_id: OriginalId,
    pub first_name: String,
    pub last_name: String,
}

/// (classroom external id, capacity, short name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomRecord {
    pub classroom_id: OriginalId,
    pub capacity: i64,
    pub short_name: String,
}

/// (teacher code, first name, last name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessorRecord {
    pub teacher_code: OriginalId,
    pub first_name: String,
    pub last_name: String,
}

/// (subject code, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRecord {
    pub code: OriginalId,
    pub name: String,
}

/// One teacher assigned to one activity type of a subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeachingRecord {
    pub subject_code: OriginalId,
    pub teacher_code: OriginalId,
    /// Title the exclusion prefixes are matched against
    pub title: String,
}

/// A resource some activity of a subject requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementRecord {
    pub subject_code: OriginalId,
    pub resource_id: i64,
}

/// A resource a classroom offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRecord {
    pub classroom_id: OriginalId,
    pub resource_id: i64,
}

/// Grouped read-only queries the builders depend on
pub trait RecordSource {
    fn students(&self) -> &[StudentRecord];

    /// Subject codes a student is enrolled in, in enrollment order
    fn student_subjects(&self, student_id: &OriginalId) -> &[OriginalId];

    fn classrooms(&self) -> &[ClassroomRecord];

    fn professors(&self) -> &[ProfessorRecord];

    fn subjects(&self) -> &[SubjectRecord];

    /// Lecture and seminar teaching assignments
    fn lecture_assignments(&self) -> &[TeachingRecord];

    /// Tutorial and lab teaching assignments
    fn tutorial_assignments(&self) -> &[TeachingRecord];

    fn subject_requirements(&self) -> &[RequirementRecord];

    fn classroom_resources(&self) -> &[OfferRecord];
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub students: Vec<StudentRecord>,
    pub student_subjects: HashMap<OriginalId, Vec<OriginalId>>,
    pub classrooms: Vec<ClassroomRecord>,
    pub professors: Vec<ProfessorRecord>,
    pub subjects: Vec<SubjectRecord>,
    pub lecture_assignments: Vec<TeachingRecord>,
    pub tutorial_assignments: Vec<TeachingRecord>,
    pub subject_requirements: Vec<RequirementRecord>,
    pub classroom_resources: Vec<OfferRecord>,
}

impl RecordSource for RecordSet {
    fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    fn student_subjects(&self, student_id: &OriginalId) -> &[OriginalId] {
        self.student_subjects
            .get(student_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn classrooms(&self) -> &[ClassroomRecord] {
        &self.classrooms
    }

    fn professors(&self) -> &[ProfessorRecord] {
        &self.professors
    }

    fn subjects(&self) -> &[SubjectRecord] {
        &self.subjects
    }

    fn lecture_assignments(&self) -> &[TeachingRecord] {
        &self.lecture_assignments
    }

    fn tutorial_assignments(&self) -> &[TeachingRecord] {
        &self.tutorial_assignments
    }

    fn subject_requirements(&self) -> &[RequirementRecord] {
        &self.subject_requirements
    }

    fn classroom_resources(&self) -> &[OfferRecord] {
        &self.classroom_resources
    }
}

/// Fluent construction of record sets for fixtures and tests
impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, id: &str, first_name: &str, last_name: &str, subjects: &[&str]) -> Self {
        let student_id = OriginalId::from(id);
        self.student_subjects.insert(
            student_id.clone(),
            subjects.iter().map(|s| OriginalId::from(*s)).collect(),
        );
        self.students.push(StudentRecord {
            student_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        self
    }

    pub fn classroom(mut self, id: i64, capacity: i64, short_name: &str) -> Self {
        self.classrooms.push(ClassroomRecord {
            classroom_id: id.into(),
            capacity,
            short_name: short_name.to_string(),
        });
        self
    }

    pub fn professor(mut self, code: &str, first_name: &str, last_name: &str) -> Self {
        self.professors.push(ProfessorRecord {
            teacher_code: code.into(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        self
    }

    pub fn subject(mut self, code: &str, name: &str) -> Self {
        self.subjects.push(SubjectRecord {
            code: code.into(),
            name: name.to_string(),
        });
        self
    }

    pub fn lecture(mut self, subject_code: &str, teacher_code: &str, title: &str) -> Self {
        self.lecture_assignments.push(TeachingRecord {
            subject_code: subject_code.into(),
            teacher_code: teacher_code.into(),
            title: title.to_string(),
        });
        self
    }

    pub fn tutorial(mut self, subject_code: &str, teacher_code: &str, title: &str) -> Self {
        self.tutorial_assignments.push(TeachingRecord {
            subject_code: subject_code.into(),
            teacher_code: teacher_code.into(),
            title: title.to_string(),
        });
        self
    }

    pub fn requirement(mut self, subject_code: &str, resource_id: i64) -> Self {
        self.subject_requirements.push(RequirementRecord {
            subject_code: subject_code.into(),
            resource_id,
        });
        self
    }

    pub fn offer(mut self, classroom_id: i64, resource_id: i64) -> Self {
        self.classroom_resources.push(OfferRecord {
            classroom_id: classroom_id.into(),
            resource_id,
        });
        self
    }
}
