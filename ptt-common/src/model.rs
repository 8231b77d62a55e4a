//! Entity model
//!
//! Four entity kinds, each keyed by an external [`OriginalId`] and carrying a
//! dense per-kind [`GeneratedId`]. Relationships are lists of original ids and
//! are resolved through the [`crate::store::EntityStore`] only when needed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense, zero-based identifier assigned in record-arrival order
pub type GeneratedId = u32;

/// Externally assigned identifier, unique within its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginalId(String);

impl OriginalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OriginalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OriginalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OriginalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Numeric primary keys compare as their decimal text
impl From<i64> for OriginalId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Entity kind tag, used for generic lookups and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Classroom,
    Professor,
    Student,
    Subject,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Classroom,
        EntityKind::Professor,
        EntityKind::Student,
        EntityKind::Subject,
    ];

    /// Largest entity count whose ids fit the kind's export field
    ///
    /// Students are exported as two-byte ids, everything else as one byte.
    pub fn limit(self) -> usize {
        match self {
            EntityKind::Student => 256 * 256 - 1,
            EntityKind::Classroom | EntityKind::Professor | EntityKind::Subject => 255,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Classroom => "classroom",
            EntityKind::Professor => "professor",
            EntityKind::Student => "student",
            EntityKind::Subject => "subject",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classroom" | "classrooms" => Ok(EntityKind::Classroom),
            "professor" | "professors" => Ok(EntityKind::Professor),
            "student" | "students" => Ok(EntityKind::Student),
            "subject" | "subjects" => Ok(EntityKind::Subject),
            other => Err(crate::Error::Config(format!("Unknown entity kind: {}", other))),
        }
    }
}

/// Behaviour shared by all entity kinds
pub trait Entity {
    const KIND: EntityKind;

    fn original_id(&self) -> &OriginalId;
    fn generated_id(&self) -> GeneratedId;
    fn set_generated_id(&mut self, id: GeneratedId);
    fn descriptive(&self) -> &str;
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn original_id(&self) -> &OriginalId {
                &self.original_id
            }

            fn generated_id(&self) -> GeneratedId {
                self.generated_id
            }

            fn set_generated_id(&mut self, id: GeneratedId) {
                self.generated_id = id;
            }

            fn descriptive(&self) -> &str {
                &self.descriptive
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub original_id: OriginalId,
    pub generated_id: GeneratedId,
    /// Short room name
    pub descriptive: String,
    pub lecture_capacity: u32,
    pub tutorial_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    pub original_id: OriginalId,
    pub generated_id: GeneratedId,
    pub descriptive: String,
    pub name: String,
    /// Upper bound on assignable teaching load
    pub available_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub original_id: OriginalId,
    pub generated_id: GeneratedId,
    pub descriptive: String,
    /// Subject original ids in enrollment order
    pub subjects: Vec<OriginalId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub original_id: OriginalId,
    pub generated_id: GeneratedId,
    /// Subject name
    pub descriptive: String,
    /// Classroom original ids
    pub lecture_classrooms: Vec<OriginalId>,
    /// Classroom original ids
    pub tutorial_classrooms: Vec<OriginalId>,
    /// Professor original ids teaching lectures
    pub professors: Vec<OriginalId>,
    /// Professor original ids teaching tutorials
    pub assistants: Vec<OriginalId>,
}

impl Subject {
    pub fn new(original_id: OriginalId, descriptive: impl Into<String>) -> Self {
        Self {
            original_id,
            generated_id: 0,
            descriptive: descriptive.into(),
            lecture_classrooms: Vec::new(),
            tutorial_classrooms: Vec::new(),
            professors: Vec::new(),
            assistants: Vec::new(),
        }
    }

    /// A subject with nobody to teach it cannot be scheduled
    pub fn has_teachers(&self) -> bool {
        !self.professors.is_empty() || !self.assistants.is_empty()
    }
}

impl_entity!(Classroom, EntityKind::Classroom);
impl_entity!(Professor, EntityKind::Professor);
impl_entity!(Student, EntityKind::Student);
impl_entity!(Subject, EntityKind::Subject);

impl fmt::Display for Classroom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Classroom {} (org {}): cap {}/{}",
            self.generated_id, self.original_id, self.lecture_capacity, self.tutorial_capacity
        )
    }
}

impl fmt::Display for Professor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Professor {} (org {}): name {}, available hours {}",
            self.generated_id, self.original_id, self.name, self.available_hours
        )
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Student {} (org {}): {} subjects",
            self.generated_id,
            self.original_id,
            self.subjects.len()
        )
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Subject {} (org {}): {} lecture rooms, {} tutorial rooms, {} professors, {} assistants",
            self.generated_id,
            self.original_id,
            self.lecture_classrooms.len(),
            self.tutorial_classrooms.len(),
            self.professors.len(),
            self.assistants.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_original_id_matches_text() {
        assert_eq!(OriginalId::from(97i64), OriginalId::from("97"));
    }

    #[test]
    fn test_kind_limits() {
        assert_eq!(EntityKind::Student.limit(), 65535);
        assert_eq!(EntityKind::Classroom.limit(), 255);
        assert_eq!(EntityKind::Professor.limit(), 255);
        assert_eq!(EntityKind::Subject.limit(), 255);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Subjects".parse::<EntityKind>().unwrap(), EntityKind::Subject);
        assert_eq!("classroom".parse::<EntityKind>().unwrap(), EntityKind::Classroom);
        assert!("room".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_subject_has_teachers() {
        let mut subject = Subject::new("63201".into(), "Fizika");
        assert!(!subject.has_teachers());
        subject.assistants.push("T1".into());
        assert!(subject.has_teachers());
    }
}
