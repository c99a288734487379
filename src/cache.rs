// Snapshot of the raw record tables, cached between runs.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the snapshot layout require incrementing SNAPSHOT_VERSION
// below to invalidate stale caches.
use crate::context::AppContext;
use crate::source::{MemorySource, cell_text};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    // If this field is missing in the JSON (old cache), it defaults to 0.
    #[serde(default)]
    version: u32,
    tables: Vec<SnapshotTable>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotTable {
    name: String,
    rows: Vec<Vec<Value>>,
}

pub struct Snapshot;

impl Snapshot {
    pub fn save(ctx: &dyn AppContext, source: &MemorySource) -> Result<()> {
        let path = ctx.get_snapshot_path()?;
        Self::save_to(&path, source)
    }

    pub fn save_to(path: &Path, source: &MemorySource) -> Result<()> {
        let data = SnapshotFile {
            version: SNAPSHOT_VERSION,
            tables: source
                .tables()
                .map(|(name, grid)| SnapshotTable {
                    name: name.to_string(),
                    rows: grid
                        .iter()
                        .map(|row| row.iter().map(|c| Value::String(c.clone())).collect())
                        .collect(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        Ok(())
    }

    /// Loads the cached snapshot; a missing, stale or unreadable cache yields
    /// an empty source.
    pub fn load(ctx: &dyn AppContext) -> Result<MemorySource> {
        let path = ctx.get_snapshot_path()?;
        if !path.exists() {
            return Ok(MemorySource::new());
        }
        let json = fs::read_to_string(&path)?;
        match Self::parse(&json) {
            Ok(source) => Ok(source),
            Err(e) => {
                log::warn!("ignoring snapshot {}: {}", path.display(), e);
                Ok(MemorySource::new())
            }
        }
    }

    /// Loads an explicit snapshot file; errors are reported.
    pub fn load_from(path: &Path) -> Result<MemorySource> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    fn parse(json: &str) -> Result<MemorySource> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        if file.version != SNAPSHOT_VERSION {
            anyhow::bail!(
                "snapshot version {} does not match {}",
                file.version,
                SNAPSHOT_VERSION
            );
        }
        let mut source = MemorySource::new();
        for table in file.tables {
            let grid = table
                .rows
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();
            source.add_table(&table.name, grid);
        }
        Ok(source)
    }
}
