//! JSONL export of the simulation state, the data contract with the
//! persistence collaborator. One JSON object per line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::model::World;

#[derive(Debug, Error)]
pub enum FlushError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn write_jsonl<T: Serialize>(path: &Path, records: impl Iterator<Item = T>) -> Result<usize, FlushError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for record in records {
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write `characters.jsonl`, `events.jsonl`, and `successions.jsonl`
/// under `dir`, creating the directory if needed.
pub fn flush_to_jsonl(world: &World, dir: &Path) -> Result<(), FlushError> {
    fs::create_dir_all(dir)?;
    let characters = write_jsonl(&dir.join("characters.jsonl"), world.characters.values())?;
    let events = write_jsonl(&dir.join("events.jsonl"), world.events.iter())?;
    let successions = write_jsonl(&dir.join("successions.jsonl"), world.successions.iter())?;
    debug!(characters, events, successions, "world flushed to jsonl");
    Ok(())
}
