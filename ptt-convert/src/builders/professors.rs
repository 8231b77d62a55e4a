//! Professor builder

use crate::settings::HeuristicSettings;
use crate::source::RecordSource;
use ptt_common::{Collection, Professor, Result};
use tracing::info;

/// One professor per teacher of any activity in the term
///
/// Fails with `CapacityExceeded` past 255 professors.
pub fn build_professors(
    source: &dyn RecordSource,
    heuristics: &HeuristicSettings,
) -> Result<Collection<Professor>> {
    let mut professors = Collection::new();

    for record in source.professors() {
        let name = format!("{} {}", record.first_name, record.last_name);
        professors.add(Professor {
            original_id: record.teacher_code.clone(),
            generated_id: 0,
            descriptive: name.clone(),
            name,
            available_hours: heuristics.professor_available_hours,
        })?;
    }

    info!("Built {} professors", professors.len());
    Ok(professors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RecordSet;

    #[test]
    fn test_build_professors() {
        let source = RecordSet::new()
            .professor("T1", "Ana", "Novak")
            .professor("T2", "Marko", "Zupan");

        let professors = build_professors(&source, &HeuristicSettings::default()).unwrap();
        let marko = professors.get_by_original_id(&"T2".into()).unwrap();
        assert_eq!(marko.generated_id, 1);
        assert_eq!(marko.name, "Marko Zupan");
        assert_eq!(marko.descriptive, "Marko Zupan");
        assert_eq!(marko.available_hours, 100);
    }
}
