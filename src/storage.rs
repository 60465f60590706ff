// Catalog file persistence - flat JSON, whole-file overwrite
//
// The catalog file is the single source of truth across process restarts.
// Saves go through a temp-file-then-rename so an interrupted write cannot
// clobber a previously valid file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::entry::EntryRecord;

/// Default catalog file name, relative to the working directory
pub const DEFAULT_CATALOG_FILE: &str = "cotizaciones.json";

/// Load all records from the catalog file.
///
/// The file must exist; callers check for first-run absence themselves
/// (absence is a normal state, a parse failure is not).
pub fn load_records(path: &Path) -> Result<Vec<EntryRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;

    let records: Vec<EntryRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse catalog file {}", path.display()))?;

    Ok(records)
}

/// Overwrite the catalog file with the given records.
///
/// Writes to `<path>.tmp` first and renames over the target, so the
/// previous catalog survives a failed write.
pub fn save_records(path: &Path, records: &[EntryRecord]) -> Result<()> {
    let payload = serde_json::to_string_pretty(records)
        .context("failed to serialize catalog records")?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}
