//! Exporter
//!
//! Turns the validated [`EntityStore`] into one interchange document per
//! entity kind. Only generated ids appear in the documents: every original
//! id reference is resolved through the store at export time, so a dangling
//! reference fails the export with `NotFound`.

mod reader;
mod writer;

pub use reader::{read_document, Fields};
pub use writer::{write_document, XmlWriter};

use crate::settings::ExportSettings;
use ptt_common::{EntityStore, Error, GeneratedId, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// XML Schema instance namespace declared next to the document namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const STUDENTS_FILE: &str = "students.xml";
pub const CLASSROOMS_FILE: &str = "classrooms.xml";
pub const PROFESSORS_FILE: &str = "professors.xml";
pub const SUBJECTS_FILE: &str = "subjects.xml";

/// One record kind of an interchange document
pub trait InterchangeRecord: Sized {
    /// Root tag; also names the schema file `<ROOT>.xsd`
    const ROOT: &'static str;
    /// Per-record tag
    const ELEMENT: &'static str;

    fn id(&self) -> GeneratedId;

    fn write_fields<W: Write>(&self, xml: &mut XmlWriter<W>) -> Result<()>;

    fn from_fields(id: GeneratedId, fields: &Fields) -> Result<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomDoc {
    pub id: GeneratedId,
    pub lecture_capacity: u32,
    pub tutorial_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessorDoc {
    pub id: GeneratedId,
    pub name: String,
    pub available_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDoc {
    pub id: GeneratedId,
    pub lecture_classrooms: Vec<GeneratedId>,
    pub tutorial_classrooms: Vec<GeneratedId>,
    pub professors: Vec<GeneratedId>,
    pub assistants: Vec<GeneratedId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDoc {
    pub id: GeneratedId,
    pub subjects: Vec<GeneratedId>,
}

impl InterchangeRecord for ClassroomDoc {
    const ROOT: &'static str = "classrooms";
    const ELEMENT: &'static str = "classroom";

    fn id(&self) -> GeneratedId {
        self.id
    }

    fn write_fields<W: Write>(&self, xml: &mut XmlWriter<W>) -> Result<()> {
        xml.text_element("lecture_capacity", &self.lecture_capacity.to_string())?;
        xml.text_element("tutorial_capacity", &self.tutorial_capacity.to_string())
    }

    fn from_fields(id: GeneratedId, fields: &Fields) -> Result<Self> {
        Ok(Self {
            id,
            lecture_capacity: fields.number("lecture_capacity")?,
            tutorial_capacity: fields.number("tutorial_capacity")?,
        })
    }
}

impl InterchangeRecord for ProfessorDoc {
    const ROOT: &'static str = "professors";
    const ELEMENT: &'static str = "professor";

    fn id(&self) -> GeneratedId {
        self.id
    }

    fn write_fields<W: Write>(&self, xml: &mut XmlWriter<W>) -> Result<()> {
        xml.text_element("name", &self.name)?;
        xml.text_element("available_hours", &self.available_hours.to_string())
    }

    fn from_fields(id: GeneratedId, fields: &Fields) -> Result<Self> {
        Ok(Self {
            id,
            name: fields.text("name")?.to_string(),
            available_hours: fields.number("available_hours")?,
        })
    }
}

impl InterchangeRecord for SubjectDoc {
    const ROOT: &'static str = "subjects";
    const ELEMENT: &'static str = "subject";

    fn id(&self) -> GeneratedId {
        self.id
    }

    fn write_fields<W: Write>(&self, xml: &mut XmlWriter<W>) -> Result<()> {
        xml.id_list("lecture_classrooms", &self.lecture_classrooms)?;
        xml.id_list("tutorial_classrooms", &self.tutorial_classrooms)?;
        xml.id_list("professors", &self.professors)?;
        xml.id_list("assistants", &self.assistants)
    }

    fn from_fields(id: GeneratedId, fields: &Fields) -> Result<Self> {
        Ok(Self {
            id,
            lecture_classrooms: fields.ids("lecture_classrooms")?,
            tutorial_classrooms: fields.ids("tutorial_classrooms")?,
            professors: fields.ids("professors")?,
            assistants: fields.ids("assistants")?,
        })
    }
}

impl InterchangeRecord for StudentDoc {
    const ROOT: &'static str = "students";
    const ELEMENT: &'static str = "student";

    fn id(&self) -> GeneratedId {
        self.id
    }

    fn write_fields<W: Write>(&self, xml: &mut XmlWriter<W>) -> Result<()> {
        xml.id_list("subjects", &self.subjects)
    }

    fn from_fields(id: GeneratedId, fields: &Fields) -> Result<Self> {
        Ok(Self {
            id,
            subjects: fields.ids("subjects")?,
        })
    }
}

pub fn classroom_docs(store: &EntityStore) -> Vec<ClassroomDoc> {
    store
        .classrooms
        .iter()
        .map(|c| ClassroomDoc {
            id: c.generated_id,
            lecture_capacity: c.lecture_capacity,
            tutorial_capacity: c.tutorial_capacity,
        })
        .collect()
}

pub fn professor_docs(store: &EntityStore) -> Vec<ProfessorDoc> {
    store
        .professors
        .iter()
        .map(|p| ProfessorDoc {
            id: p.generated_id,
            name: p.name.clone(),
            available_hours: p.available_hours,
        })
        .collect()
}

/// Subject records with classroom and professor references resolved
pub fn subject_docs(store: &EntityStore) -> Result<Vec<SubjectDoc>> {
    store
        .subjects
        .iter()
        .map(|s| {
            let rooms = |ids: &[ptt_common::OriginalId]| -> Result<Vec<GeneratedId>> {
                ids.iter().map(|id| store.classrooms.resolve(id)).collect()
            };
            let teachers = |ids: &[ptt_common::OriginalId]| -> Result<Vec<GeneratedId>> {
                ids.iter().map(|id| store.professors.resolve(id)).collect()
            };
            Ok(SubjectDoc {
                id: s.generated_id,
                lecture_classrooms: rooms(&s.lecture_classrooms)?,
                tutorial_classrooms: rooms(&s.tutorial_classrooms)?,
                professors: teachers(&s.professors)?,
                assistants: teachers(&s.assistants)?,
            })
        })
        .collect()
}

/// Student records with subject references resolved
pub fn student_docs(store: &EntityStore) -> Result<Vec<StudentDoc>> {
    store
        .students
        .iter()
        .map(|s| {
            Ok(StudentDoc {
                id: s.generated_id,
                subjects: s
                    .subjects
                    .iter()
                    .map(|id| store.subjects.resolve(id))
                    .collect::<Result<_>>()?,
            })
        })
        .collect()
}

/// Write all four interchange documents into `directory`
pub fn export_all(store: &EntityStore, directory: &Path, settings: &ExportSettings) -> Result<()> {
    let namespace = settings.namespace.as_str();
    std::fs::create_dir_all(directory)?;

    // Resolve everything before touching any file
    let students = student_docs(store)?;
    let subjects = subject_docs(store)?;

    write_file(directory.join(STUDENTS_FILE), &students, namespace)?;
    write_file(directory.join(CLASSROOMS_FILE), &classroom_docs(store), namespace)?;
    write_file(directory.join(PROFESSORS_FILE), &professor_docs(store), namespace)?;
    write_file(directory.join(SUBJECTS_FILE), &subjects, namespace)?;

    info!("Exported interchange documents to {}", directory.display());
    Ok(())
}

/// Read a document written by [`export_all`]
pub fn read_file<T: InterchangeRecord>(path: &Path) -> Result<Vec<T>> {
    let xml = std::fs::read_to_string(path)?;
    read_document(&xml)
}

fn write_file<T: InterchangeRecord>(
    path: std::path::PathBuf,
    records: &[T],
    namespace: &str,
) -> Result<()> {
    let xml = write_document(records, namespace)?;
    std::fs::write(&path, xml)?;
    info!("Wrote {} {} records to {}", records.len(), T::ELEMENT, path.display());
    Ok(())
}

pub(crate) fn interchange_error(e: impl std::fmt::Display) -> Error {
    Error::Interchange(e.to_string())
}
