//! ptt-convert library - scheduling database to timetable interchange
//!
//! Pipeline: a [`source::RecordSource`] feeds the [`builders`], the
//! resulting store is [`filter`]ed and validated, then [`export`]ed as XML
//! documents next to a snapshot used for reverse id translation.

use ptt_common::{snapshot, EntityStore, Result};
use std::path::Path;
use tracing::info;

pub mod builders;
pub mod export;
pub mod filter;
pub mod settings;
pub mod source;

use settings::ConvertConfig;
use source::RecordSource;

/// Build, filter and validate a store without writing anything
pub fn prepare(source: &dyn RecordSource, config: &ConvertConfig) -> Result<EntityStore> {
    let mut store = builders::build_store(source, &config.heuristics)?;
    filter::filter(&mut store, &config.heuristics);
    filter::validate(&store)?;
    Ok(store)
}

/// Run the whole pipeline, writing documents and snapshot into `output`
pub fn convert(
    source: &dyn RecordSource,
    config: &ConvertConfig,
    output: &Path,
) -> Result<EntityStore> {
    let store = prepare(source, config)?;

    export::export_all(&store, output, &config.export)?;
    snapshot::save(&store, &output.join(&config.export.snapshot_file))?;

    info!("Conversion complete: {}", output.display());
    Ok(store)
}
