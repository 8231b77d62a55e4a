//! Conversion settings
//!
//! Loaded from TOML (see [`ptt_common::config`] for file resolution), then
//! overridden by command-line flags. Every value has a built-in default, so
//! an absent file still yields a complete configuration.
//!
//! ```toml
//! [source]
//! database_path = "urnik.db"
//! term = "FRI 2014/2015, letni semester"
//! classroom_set = "FRI rooms & velika fizikalna predavalnica"
//!
//! [heuristics]
//! special_subject_marker = "fizika"
//! designated_classroom = "97"
//!
//! [export]
//! directory = "gen"
//! ```

use ptt_common::OriginalId;
use serde::Deserialize;
use std::path::PathBuf;

/// Full converter configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub source: SourceSettings,

    #[serde(default)]
    pub heuristics: HeuristicSettings,

    #[serde(default)]
    pub export: ExportSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which records the scheduling database query returns
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// Path to the SQLite scheduling database
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Enrollment group set and activity set name of the target term
    #[serde(default = "default_term")]
    pub term: String,

    /// Classroom set the timetable may use
    #[serde(default = "default_classroom_set")]
    pub classroom_set: String,

    /// Activity type short names taught by professors
    #[serde(default = "default_lecture_types")]
    pub lecture_types: Vec<String>,

    /// Activity type short names taught by assistants
    #[serde(default = "default_tutorial_types")]
    pub tutorial_types: Vec<String>,
}

/// Domain heuristics applied by the subject builder and the filter
#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicSettings {
    /// Teaching assignments whose title starts with one of these are ignored
    #[serde(default = "default_excluded_title_prefixes")]
    pub excluded_title_prefixes: Vec<String>,

    /// Subjects whose name contains this are filtered out
    #[serde(default = "default_excluded_subject_marker")]
    pub excluded_subject_marker: String,

    /// Subjects whose name contains this (any case) lecture only in the designated classroom
    #[serde(default = "default_special_subject_marker")]
    pub special_subject_marker: String,

    /// Original id of the classroom reserved for special subjects
    #[serde(default = "default_designated_classroom")]
    pub designated_classroom: OriginalId,

    /// No upstream limit exists, so every professor gets the same load
    #[serde(default = "default_professor_available_hours")]
    pub professor_available_hours: u32,
}

/// Where and how interchange documents are written
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,

    /// XML namespace declared on every document root
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            term: default_term(),
            classroom_set: default_classroom_set(),
            lecture_types: default_lecture_types(),
            tutorial_types: default_tutorial_types(),
        }
    }
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self {
            excluded_title_prefixes: default_excluded_title_prefixes(),
            excluded_subject_marker: default_excluded_subject_marker(),
            special_subject_marker: default_special_subject_marker(),
            designated_classroom: default_designated_classroom(),
            professor_available_hours: default_professor_available_hours(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            namespace: default_namespace(),
            snapshot_file: default_snapshot_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl HeuristicSettings {
    pub fn is_excluded_title(&self, title: &str) -> bool {
        self.excluded_title_prefixes
            .iter()
            .any(|prefix| title.starts_with(prefix.as_str()))
    }

    pub fn is_excluded_subject(&self, name: &str) -> bool {
        !self.excluded_subject_marker.is_empty() && name.contains(&self.excluded_subject_marker)
    }

    pub fn is_special(&self, label: &str) -> bool {
        !self.special_subject_marker.is_empty()
            && label
                .to_lowercase()
                .contains(&self.special_subject_marker.to_lowercase())
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("urnik.db")
}

fn default_term() -> String {
    "FRI 2014/2015, letni semester".to_string()
}

fn default_classroom_set() -> String {
    "FRI rooms & velika fizikalna predavalnica".to_string()
}

fn default_lecture_types() -> Vec<String> {
    vec!["P".to_string(), "SEM".to_string()]
}

fn default_tutorial_types() -> Vec<String> {
    ["LV", "AV", "lab.", "TUT"].iter().map(|s| s.to_string()).collect()
}

fn default_excluded_title_prefixes() -> Vec<String> {
    vec!["Zagovori".to_string(), "Seminar".to_string()]
}

fn default_excluded_subject_marker() -> String {
    "(EF)".to_string()
}

fn default_special_subject_marker() -> String {
    "fizika".to_string()
}

fn default_designated_classroom() -> OriginalId {
    OriginalId::from("97")
}

fn default_professor_available_hours() -> u32 {
    100
}

fn default_export_directory() -> PathBuf {
    PathBuf::from("gen")
}

fn default_namespace() -> String {
    "http://stanovnik.net/ParallelTimetables".to_string()
}

fn default_snapshot_file() -> String {
    ptt_common::snapshot::SNAPSHOT_FILE_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
