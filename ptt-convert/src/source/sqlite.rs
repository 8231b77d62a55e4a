//! SQLite record source
//!
//! Reads the scheduling database read-only and collects every record the
//! builders need into a [`RecordSet`]. All queries carry an explicit
//! `ORDER BY` so generated ids are reproducible across runs.

use super::{
    ClassroomRecord, OfferRecord, ProfessorRecord, RecordSet, RequirementRecord, StudentRecord,
    SubjectRecord, TeachingRecord,
};
use crate::settings::SourceSettings;
use ptt_common::{Error, OriginalId, Result};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Joins shared by every teaching-assignment query: subject → activity →
/// activity set → realization → teacher → user
const TEACHING_JOINS: &str = r#"
    FROM friprosveta_subject sub
    JOIN friprosveta_activity act1 ON sub.id = act1.subject_id
    JOIN friprosveta_lecturetype lectype ON act1.lecture_type_id = lectype.id
    JOIN timetable_activity act2 ON act1.activity_ptr_id = act2.id
    JOIN timetable_activityset actset ON act2.activityset_id = actset.id
    JOIN timetable_activityrealization actrea ON act2.id = actrea.activity_id
    JOIN timetable_activityrealization_teachers actreatea ON actrea.id = actreatea.activityrealization_id
    JOIN timetable_teacher tea ON actreatea.teacher_id = tea.id
    JOIN auth_user ON tea.user_id = auth_user.id
"#;

pub struct SqliteSource;

impl SqliteSource {
    /// Connect to the scheduling database in read-only mode
    pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
        if !db_path.exists() {
            return Err(Error::Config(format!(
                "Database not found: {}",
                db_path.display()
            )));
        }

        // mode=ro: the converter never writes to the source
        let db_url = format!("sqlite://{}?mode=ro", db_path.display());
        debug!("Connecting to database: {}", db_url);

        let pool = SqlitePool::connect(&db_url).await?;
        Ok(pool)
    }

    /// Run every grouped query and collect the results
    pub async fn load(pool: &SqlitePool, settings: &SourceSettings) -> Result<RecordSet> {
        let students = fetch_students(pool, &settings.term).await?;
        let student_subjects = fetch_student_subjects(pool, &settings.term).await?;
        let classrooms = fetch_classrooms(pool, &settings.classroom_set).await?;
        let professors = fetch_professors(pool, &settings.term).await?;
        let subjects = fetch_subjects(pool, &settings.term).await?;
        let lecture_assignments =
            fetch_assignments(pool, &settings.term, &settings.lecture_types).await?;
        let tutorial_assignments =
            fetch_assignments(pool, &settings.term, &settings.tutorial_types).await?;
        let subject_requirements = fetch_requirements(pool).await?;
        let classroom_resources = fetch_offers(pool, &settings.classroom_set).await?;

        info!(
            "Loaded records: {} students, {} classrooms, {} professors, {} subjects, {} lecture and {} tutorial assignments",
            students.len(),
            classrooms.len(),
            professors.len(),
            subjects.len(),
            lecture_assignments.len(),
            tutorial_assignments.len()
        );

        Ok(RecordSet {
            students,
            student_subjects,
            classrooms,
            professors,
            subjects,
            lecture_assignments,
            tutorial_assignments,
            subject_requirements,
            classroom_resources,
        })
    }
}

async fn fetch_students(pool: &SqlitePool, term: &str) -> Result<Vec<StudentRecord>> {
    let rows = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT stud."studentId", stud.name, stud.surname
        FROM friprosveta_student AS stud
        JOIN friprosveta_studentenrollment AS enr ON stud.id = enr.student_id
        JOIN timetable_groupset AS grp ON enr.groupset_id = grp.id
        WHERE grp.name = ?
        GROUP BY stud.id
        ORDER BY stud.id
        "#,
    )
    .bind(term)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(student_id, first_name, last_name)| StudentRecord {
            student_id: student_id.into(),
            first_name,
            last_name,
        })
        .collect())
}

async fn fetch_student_subjects(
    pool: &SqlitePool,
    term: &str,
) -> Result<HashMap<OriginalId, Vec<OriginalId>>> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT stud."studentId", subj.code
        FROM friprosveta_student AS stud
        JOIN friprosveta_studentenrollment AS enr ON stud.id = enr.student_id
        JOIN timetable_groupset AS grp ON enr.groupset_id = grp.id
        JOIN friprosveta_subject AS subj ON enr.subject_id = subj.id
        WHERE grp.name = ?
        GROUP BY stud.id, subj.id
        ORDER BY stud.id, MIN(enr.id)
        "#,
    )
    .bind(term)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<OriginalId, Vec<OriginalId>> =
        HashMap::new();
    for (student_id, code) in rows {
        grouped
            .entry(student_id.into())
            .or_default()
            .push(code.into());
    }
    Ok(grouped)
}

async fn fetch_classrooms(pool: &SqlitePool, classroom_set: &str) -> Result<Vec<ClassroomRecord>> {
    let rows = sqlx::query_as::<_, (i64, i64, String)>(
        r#"
        SELECT c.id, c.capacity, c."shortName"
        FROM timetable_classroom c
        JOIN timetable_classroomset_classrooms csc ON c.id = csc.classroom_id
        JOIN timetable_classroomset cs ON cs.id = csc.classroomset_id
        WHERE cs.name = ?
        ORDER BY c.id
        "#,
    )
    .bind(classroom_set)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, capacity, short_name)| ClassroomRecord {
            classroom_id: id.into(),
            capacity,
            short_name,
        })
        .collect())
}

async fn fetch_professors(pool: &SqlitePool, term: &str) -> Result<Vec<ProfessorRecord>> {
    let sql = format!(
        r#"
        SELECT tea.code, auth_user.first_name, auth_user.last_name
        {TEACHING_JOINS}
        WHERE actset.name = ?
        GROUP BY tea.id
        ORDER BY tea.id
        "#
    );
    let rows = sqlx::query_as::<_, (String, String, String)>(&sql)
        .bind(term)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(code, first_name, last_name)| ProfessorRecord {
            teacher_code: code.into(),
            first_name,
            last_name,
        })
        .collect())
}

async fn fetch_subjects(pool: &SqlitePool, term: &str) -> Result<Vec<SubjectRecord>> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT subj.code, subj.name
        FROM friprosveta_studentenrollment AS enr
        JOIN timetable_groupset AS grp ON enr.groupset_id = grp.id
        JOIN friprosveta_subject AS subj ON subj.id = enr.subject_id
        WHERE grp.name = ?
        GROUP BY subj.id
        ORDER BY subj.id
        "#,
    )
    .bind(term)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(code, name)| SubjectRecord {
            code: code.into(),
            name,
        })
        .collect())
}

/// Teaching assignments for activities whose type short name is in `types`
async fn fetch_assignments(
    pool: &SqlitePool,
    term: &str,
    types: &[String],
) -> Result<Vec<TeachingRecord>> {
    if types.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; types.len()].join(", ");
    let sql = format!(
        r#"
        SELECT sub.code, tea.code, sub.name
        {TEACHING_JOINS}
        WHERE lectype.short_name IN ({placeholders})
          AND actset.name = ?
        GROUP BY sub.id, tea.id
        ORDER BY sub.id, tea.id
        "#
    );

    let mut query = sqlx::query_as::<_, (String, String, String)>(&sql);
    for short_name in types {
        query = query.bind(short_name.as_str());
    }
    let rows = query.bind(term).fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|(subject_code, teacher_code, title)| TeachingRecord {
            subject_code: subject_code.into(),
            teacher_code: teacher_code.into(),
            title,
        })
        .collect())
}

async fn fetch_requirements(pool: &SqlitePool) -> Result<Vec<RequirementRecord>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT DISTINCT sub.code, actreq.resource_id
        FROM friprosveta_subject sub
        JOIN friprosveta_activity act1 ON sub.id = act1.subject_id
        JOIN timetable_activity act2 ON act1.activity_ptr_id = act2.id
        JOIN timetable_activity_requirements actreq ON actreq.activity_id = act2.id
        ORDER BY sub.code, actreq.resource_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(code, resource_id)| RequirementRecord {
            subject_code: code.into(),
            resource_id,
        })
        .collect())
}

async fn fetch_offers(pool: &SqlitePool, classroom_set: &str) -> Result<Vec<OfferRecord>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT DISTINCT c.id, res.resource_id
        FROM timetable_classroom c
        JOIN timetable_classroomset_classrooms csc ON c.id = csc.classroom_id
        JOIN timetable_classroomset cs ON cs.id = csc.classroomset_id
        JOIN timetable_classroomnresources res ON c.id = res.classroom_id
        WHERE cs.name = ?
        ORDER BY c.id, res.resource_id
        "#,
    )
    .bind(classroom_set)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, resource_id)| OfferRecord {
            classroom_id: id.into(),
            resource_id,
        })
        .collect())
}
