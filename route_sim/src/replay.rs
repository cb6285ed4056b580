//! Scene artifact: serialize/deserialize the exported dataset as JSON.

use anyhow::Context;
use route_core::SceneDataset;
use serde::Serialize;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Save a dataset to a JSON file.
///
/// The JSON is rendered fully in memory first, so a serialization failure
/// never leaves a truncated file behind.
pub fn save_scene(dataset: &SceneDataset, path: &Path) -> anyhow::Result<()> {
    save_json(dataset, path)
}

/// Load a dataset from a JSON file and check its invariants.
pub fn load_scene(path: &Path) -> anyhow::Result<SceneDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open scene file {}", path.display()))?;
    let reader = BufReader::new(file);
    let dataset: SceneDataset = serde_json::from_reader(reader)
        .with_context(|| format!("malformed scene file {}", path.display()))?;
    dataset
        .validate()
        .with_context(|| format!("invalid scene in {}", path.display()))?;
    Ok(dataset)
}

/// Pretty-print any serializable value to `path`.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json)?;
    writer.flush()?;
    Ok(())
}
