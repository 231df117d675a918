//! Append-only body-weight history.
//!
//! Observations are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Lines that fail to parse are skipped.

use crate::store::WeightLogStore;
use crate::types::{NewWeightLog, UserId, WeightLog};
use crate::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// JSONL-based weight log store with file locking
pub struct JsonlWeightLogStore {
    path: PathBuf,
}

impl JsonlWeightLogStore {
    /// Create a new JSONL store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl WeightLogStore for JsonlWeightLogStore {
    fn append(&mut self, owner: &UserId, log: NewWeightLog) -> Result<WeightLog> {
        self.ensure_parent_dir()?;

        let entry = WeightLog {
            id: Uuid::new_v4(),
            user_id: owner.clone(),
            date: log.date,
            weight: log.weight,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended weight log {} for {}", entry.id, owner);
        Ok(entry)
    }

    fn list(&self, owner: &UserId) -> Result<Vec<WeightLog>> {
        let mut logs: Vec<WeightLog> = read_weight_logs(&self.path)?
            .into_iter()
            .filter(|log| &log.user_id == owner)
            .collect();

        // Later appends first among equal dates, then a stable sort by date.
        logs.reverse();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }
}

/// Read every observation in a weight log file, in append order
pub fn read_weight_logs(path: &Path) -> Result<Vec<WeightLog>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut logs = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WeightLog>(&line) {
            Ok(log) => logs.push(log),
            Err(e) => {
                tracing::warn!("Failed to parse weight log at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} weight logs from {:?}", logs.len(), path);
    Ok(logs)
}
