//! Weight history summaries and CSV export.

use crate::types::WeightLog;
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    date: String,
    weight: f64,
}

impl From<&WeightLog> for CsvRow {
    fn from(log: &WeightLog) -> Self {
        CsvRow {
            id: log.id.to_string(),
            date: log.date.format("%Y-%m-%d").to_string(),
            weight: log.weight,
        }
    }
}

/// Write weight logs to `path` as CSV with a header row
///
/// The target is replaced, not appended to, and synced to disk before
/// returning. Returns the number of rows written.
pub fn write_csv(logs: &[WeightLog], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    for log in logs {
        writer.serialize(CsvRow::from(log))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} weight logs to {:?}", logs.len(), path);
    Ok(logs.len())
}

/// Most recent observation (by date) in a history
pub fn latest(logs: &[WeightLog]) -> Option<&WeightLog> {
    logs.iter().max_by_key(|log| log.date)
}

/// Change from the oldest to the newest observation, in kilograms
///
/// None when there are fewer than two observations.
pub fn change_since_first(logs: &[WeightLog]) -> Option<f64> {
    if logs.len() < 2 {
        return None;
    }
    let first = logs.iter().min_by_key(|log| log.date)?;
    let last = latest(logs)?;
    Some(last.weight - first.weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn entry(day: u32, weight: f64) -> WeightLog {
        WeightLog {
            id: Uuid::new_v4(),
            user_id: UserId::new("ana").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            weight,
        }
    }

    #[test]
    fn test_write_csv_with_headers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("peso.csv");
        let logs = vec![entry(3, 72.5), entry(1, 73.0)];

        let count = write_csv(&logs, &path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "id,date,weight");
        assert!(lines[1].ends_with(",2024-05-03,72.5"));
        assert!(lines[2].ends_with(",2024-05-01,73.0"));
    }

    #[test]
    fn test_write_csv_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("peso.csv");

        write_csv(&[entry(1, 70.0), entry(2, 71.0)], &path).unwrap();
        write_csv(&[entry(3, 72.0)], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_latest_and_change() {
        let logs = vec![entry(10, 71.0), entry(2, 74.0), entry(20, 70.5)];
        assert_eq!(latest(&logs).unwrap().weight, 70.5);
        assert_eq!(change_since_first(&logs), Some(-3.5));

        assert!(latest(&[]).is_none());
        assert_eq!(change_since_first(&logs[..1]), None);
    }
}
