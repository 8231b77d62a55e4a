//! End-to-end conversion over an in-memory record set

use ptt_common::{snapshot, EntityKind, Error, OriginalId};
use ptt_convert::export::{
    self, read_file, ClassroomDoc, ProfessorDoc, StudentDoc, SubjectDoc, CLASSROOMS_FILE,
    PROFESSORS_FILE, STUDENTS_FILE, SUBJECTS_FILE,
};
use ptt_convert::settings::ConvertConfig;
use ptt_convert::source::RecordSet;
use tempfile::TempDir;

fn faculty() -> RecordSet {
    RecordSet::new()
        .classroom(97, 200, "Velika fizikalna predavalnica")
        .classroom(1, 60, "P01")
        .classroom(2, 30, "PR07")
        .classroom(3, 20, "PR14")
        .professor("T0", "Ana", "Novak")
        .professor("T1", "Marko", "Zupan")
        .professor("T2", "Petra", "Kranjc")
        .professor("P1", "Janez", "Horvat")
        .subject("63201", "Algoritmi")
        .subject("63202", "Fizika")
        .subject("63203", "Ekonomija (EF)")
        .subject("63204", "Brez izvajalca")
        .lecture("63201", "P1", "Algoritmi")
        .lecture("63201", "T2", "Seminar iz algoritmov")
        .lecture("63202", "T0", "Fizika")
        .tutorial("63202", "T1", "Fizika")
        .lecture("63203", "T2", "Ekonomija (EF)")
        .student("63140001", "Janez", "Novak", &["63201", "63202", "63203"])
        .student("63140002", "Maja", "Kos", &["63201", "63204"])
}

#[test]
fn test_convert_writes_documents_and_snapshot() {
    let dir = TempDir::new().unwrap();
    let config = ConvertConfig::default();

    let store = ptt_convert::convert(&faculty(), &config, dir.path()).unwrap();

    for file in [STUDENTS_FILE, CLASSROOMS_FILE, PROFESSORS_FILE, SUBJECTS_FILE] {
        assert!(dir.path().join(file).exists(), "{} missing", file);
    }
    let restored = snapshot::load(&dir.path().join(&config.export.snapshot_file)).unwrap();
    assert_eq!(restored.subjects.as_slice(), store.subjects.as_slice());
    assert_eq!(restored.students.as_slice(), store.students.as_slice());
}

#[test]
fn test_unusable_subjects_are_filtered_and_renumbered() {
    let store = ptt_convert::prepare(&faculty(), &ConvertConfig::default()).unwrap();

    assert_eq!(
        store.original_ids(EntityKind::Subject),
        vec![&OriginalId::from("63201"), &OriginalId::from("63202")]
    );
    assert_eq!(store.generated_ids(EntityKind::Subject), vec![0, 1]);

    let janez = store.students.get_by_original_id(&"63140001".into()).unwrap();
    assert_eq!(janez.subjects, vec![OriginalId::from("63201"), OriginalId::from("63202")]);
    let maja = store.students.get_by_original_id(&"63140002".into()).unwrap();
    assert_eq!(maja.subjects, vec![OriginalId::from("63201")]);
}

#[test]
fn test_exported_subjects_reference_generated_ids() {
    let dir = TempDir::new().unwrap();
    ptt_convert::convert(&faculty(), &ConvertConfig::default(), dir.path()).unwrap();

    let subjects: Vec<SubjectDoc> = read_file(&dir.path().join(SUBJECTS_FILE)).unwrap();
    assert_eq!(
        subjects[0],
        SubjectDoc {
            id: 0,
            // Every ordinary room seats both students; the hall is reserved
            lecture_classrooms: vec![1, 2, 3],
            tutorial_classrooms: subjects[0].tutorial_classrooms.clone(),
            // Seminar assignment skipped, assistants backfilled from professors
            professors: vec![3],
            assistants: vec![3],
        }
    );
    assert_eq!(subjects[1].lecture_classrooms, vec![0]);
    assert_eq!(subjects[1].professors, vec![0]);
    assert_eq!(subjects[1].assistants, vec![1]);

    let xml = std::fs::read_to_string(dir.path().join(SUBJECTS_FILE)).unwrap();
    let compact: String = xml.split_whitespace().collect();
    assert!(compact.contains("<professors><id>3</id></professors>"));
}

#[test]
fn test_exported_documents_read_back() {
    let dir = TempDir::new().unwrap();
    let store = ptt_convert::convert(&faculty(), &ConvertConfig::default(), dir.path()).unwrap();

    let classrooms: Vec<ClassroomDoc> = read_file(&dir.path().join(CLASSROOMS_FILE)).unwrap();
    assert_eq!(classrooms, export::classroom_docs(&store));

    let professors: Vec<ProfessorDoc> = read_file(&dir.path().join(PROFESSORS_FILE)).unwrap();
    assert_eq!(professors[3].name, "Janez Horvat");
    assert_eq!(professors[3].available_hours, 100);

    let students: Vec<StudentDoc> = read_file(&dir.path().join(STUDENTS_FILE)).unwrap();
    assert_eq!(
        students,
        vec![
            StudentDoc { id: 0, subjects: vec![0, 1] },
            StudentDoc { id: 1, subjects: vec![0] },
        ]
    );
}

#[test]
fn test_custom_namespace_reaches_documents() {
    let dir = TempDir::new().unwrap();
    let mut config = ConvertConfig::default();
    config.export.namespace = "urn:example:timetables".to_string();

    ptt_convert::convert(&faculty(), &config, dir.path()).unwrap();

    let xml = std::fs::read_to_string(dir.path().join(CLASSROOMS_FILE)).unwrap();
    assert!(xml.contains("xsi:schemaLocation=\"urn:example:timetables classrooms.xsd\""));
}

#[test]
fn test_snapshot_describes_exported_ids() {
    let dir = TempDir::new().unwrap();
    let config = ConvertConfig::default();
    ptt_convert::convert(&faculty(), &config, dir.path()).unwrap();

    let store = snapshot::load(&dir.path().join(&config.export.snapshot_file)).unwrap();
    assert_eq!(store.describe(EntityKind::Subject, 1).unwrap(), "Fizika");
    assert_eq!(store.describe(EntityKind::Professor, 3).unwrap(), "Janez Horvat");
    assert_eq!(
        store.describe(EntityKind::Student, 1).unwrap(),
        "Maja Kos (63140002)"
    );
    assert!(matches!(
        store.describe(EntityKind::Subject, 2),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_assignment_for_unknown_subject_fails() {
    let source = faculty().lecture("99999", "T0", "Neznan predmet");
    assert!(matches!(
        ptt_convert::prepare(&source, &ConvertConfig::default()),
        Err(Error::NotFound { kind: EntityKind::Subject, .. })
    ));
}

#[test]
fn test_missing_designated_classroom_fails() {
    let mut config = ConvertConfig::default();
    config.heuristics.designated_classroom = "404".into();
    assert!(matches!(
        ptt_convert::prepare(&faculty(), &config),
        Err(Error::NotFound { kind: EntityKind::Classroom, .. })
    ));
}

#[test]
fn test_dangling_student_reference_fails_export() {
    let dir = TempDir::new().unwrap();
    let source = faculty().student("63140003", "Luka", "Bizjak", &["63201"]);
    let mut store = ptt_convert::prepare(&source, &ConvertConfig::default()).unwrap();
    store
        .students
        .get_mut_by_original_id(&"63140003".into())
        .unwrap()
        .subjects
        .push("00000".into());

    assert!(matches!(
        export::export_all(&store, dir.path(), &ConvertConfig::default().export),
        Err(Error::NotFound { kind: EntityKind::Subject, .. })
    ));
    assert!(!dir.path().join(STUDENTS_FILE).exists());
}
