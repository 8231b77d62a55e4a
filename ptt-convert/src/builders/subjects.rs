//! Subject builder
//!
//! Attaches teachers, backfills empty teacher lists, and decides which
//! classrooms each subject may use for lectures and for tutorials.

use super::classrooms::TUTORIAL_CAPACITY_LIMIT;
use super::requirements::match_requirements;
use super::StudentRoster;
use crate::settings::HeuristicSettings;
use crate::source::{RecordSource, TeachingRecord};
use ptt_common::{Classroom, Collection, Error, OriginalId, Result, Subject};
use tracing::{debug, info, warn};

/// Which teacher list an assignment record feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Professor,
    Assistant,
}

/// Build every enrolled subject with teachers and eligible classrooms
///
/// Requires the finished student roster (for enrollment counts) and a
/// non-empty classroom collection. Fails with `CapacityExceeded` past 255
/// subjects.
pub fn build_subjects(
    source: &dyn RecordSource,
    roster: &StudentRoster,
    classrooms: &Collection<Classroom>,
    heuristics: &HeuristicSettings,
) -> Result<Collection<Subject>> {
    if classrooms.is_empty() {
        return Err(Error::MalformedConfiguration(
            "Subjects cannot be built before classrooms".to_string(),
        ));
    }

    let mut subjects = Collection::new();
    for record in source.subjects() {
        subjects.add(Subject::new(record.code.clone(), record.name.clone()))?;
    }

    attach_teachers(&mut subjects, source.lecture_assignments(), Role::Professor, heuristics)?;
    attach_teachers(&mut subjects, source.tutorial_assignments(), Role::Assistant, heuristics)?;

    for subject in subjects.iter_mut() {
        backfill_teachers(subject);
    }

    let explicit = match_requirements(source, classrooms, &subjects);

    for subject in subjects.iter_mut() {
        let student_count = roster.enrollment_count(&subject.original_id);
        if student_count == 0 {
            return Err(Error::MalformedConfiguration(format!(
                "Subject {} has no enrolled students",
                subject.original_id
            )));
        }

        subject.lecture_classrooms =
            lecture_classrooms(subject, student_count, classrooms, heuristics)?;
        subject.tutorial_classrooms =
            tutorial_classrooms(explicit.get(&subject.original_id), classrooms);

        debug!("{} ({} students)", subject, student_count);
    }

    info!(
        "Built {} subjects ({} with explicit classroom requirements)",
        subjects.len(),
        explicit.len()
    );
    Ok(subjects)
}

fn attach_teachers(
    subjects: &mut Collection<Subject>,
    assignments: &[TeachingRecord],
    role: Role,
    heuristics: &HeuristicSettings,
) -> Result<()> {
    for record in assignments {
        if heuristics.is_excluded_title(&record.title) {
            debug!(
                "Skipping {:?} assignment {} on {} ({})",
                role, record.teacher_code, record.subject_code, record.title
            );
            continue;
        }

        let subject = subjects.get_mut_by_original_id(&record.subject_code)?;
        let teachers = match role {
            Role::Professor => &mut subject.professors,
            Role::Assistant => &mut subject.assistants,
        };
        if !teachers.contains(&record.teacher_code) {
            teachers.push(record.teacher_code.clone());
        }
    }
    Ok(())
}

/// Fill an empty teacher list from the other one
///
/// Both checks look at the lists as they were before either was filled.
/// The copy is independent; later edits to one list leave the other alone.
pub fn backfill_teachers(subject: &mut Subject) {
    let professors_empty = subject.professors.is_empty();
    let assistants_empty = subject.assistants.is_empty();

    if assistants_empty {
        subject.assistants = subject.professors.clone();
    }
    if professors_empty {
        subject.professors = subject.assistants.clone();
    }
}

/// Classrooms a subject's lectures may use
///
/// Special subjects are pinned to the designated classroom. Everything else
/// may use any other classroom that seats all enrolled students, or failing
/// that the single largest ordinary classroom.
pub fn lecture_classrooms(
    subject: &Subject,
    student_count: usize,
    classrooms: &Collection<Classroom>,
    heuristics: &HeuristicSettings,
) -> Result<Vec<OriginalId>> {
    let designated = &heuristics.designated_classroom;

    if heuristics.is_special(&subject.descriptive) {
        let room = classrooms.get_by_original_id(designated)?;
        return Ok(vec![room.original_id.clone()]);
    }

    let fitting: Vec<OriginalId> = classrooms
        .iter()
        .filter(|room| &room.original_id != designated)
        .filter(|room| room.lecture_capacity as usize >= student_count)
        .map(|room| room.original_id.clone())
        .collect();
    if !fitting.is_empty() {
        return Ok(fitting);
    }

    let mut largest: Option<&Classroom> = None;
    for room in classrooms.iter() {
        if &room.original_id == designated || heuristics.is_special(&room.descriptive) {
            continue;
        }
        if largest.map_or(true, |best| room.lecture_capacity > best.lecture_capacity) {
            largest = Some(room);
        }
    }

    match largest {
        Some(room) => {
            warn!(
                "No classroom seats {} students of subject {}, using largest ({}, {} seats)",
                student_count, subject.original_id, room.descriptive, room.lecture_capacity
            );
            Ok(vec![room.original_id.clone()])
        }
        None => Err(Error::MalformedConfiguration(format!(
            "No classroom is eligible for lectures of subject {}",
            subject.original_id
        ))),
    }
}

/// Classrooms a subject's tutorials may use
///
/// Without explicit requirements every small enough classroom qualifies; the
/// designated lecture hall is excluded by its mirrored tutorial capacity.
pub fn tutorial_classrooms(
    explicit: Option<&Vec<OriginalId>>,
    classrooms: &Collection<Classroom>,
) -> Vec<OriginalId> {
    match explicit {
        Some(rooms) => rooms.clone(),
        None => classrooms
            .iter()
            .filter(|room| room.tutorial_capacity <= TUTORIAL_CAPACITY_LIMIT)
            .map(|room| room.original_id.clone())
            .collect(),
    }
}
