//! Append-only entry journal.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{JournalRecord, LogEntry, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Entry sink trait for persisting logged entries
pub trait EntrySink {
    fn append(&mut self, record: &JournalRecord) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wrap an entry in a fresh record and append it
    pub fn log(&mut self, entry: LogEntry) -> Result<JournalRecord> {
        let record = JournalRecord::new(entry);
        self.append(&record)?;
        Ok(record)
    }

    /// Read every record in the journal
    pub fn read_all(&self) -> Result<Vec<JournalRecord>> {
        read_records(&self.path)
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EntrySink for JsonlJournal {
    fn append(&mut self, record: &JournalRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let needs_newline = ends_mid_line(&file)?;
        let mut writer = std::io::BufWriter::new(&file);
        if needs_newline {
            tracing::warn!("Journal {:?} ends with a partial line, starting a new one", self.path);
            writer.write_all(b"\n")?;
        }
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended {} entry {} to journal", record.entry.kind(), record.id);
        Ok(())
    }
}

/// Whether a non-empty file is missing its trailing newline
fn ends_mid_line(mut file: &File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read all records from a journal file
///
/// A missing file is an empty journal. Lines that fail to parse are skipped
/// with a warning.
pub fn read_records(path: &Path) -> Result<Vec<JournalRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<JournalRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse journal entry at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from journal", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Meal, WaterEntry, WeightEntry};
    use chrono::Utc;

    fn water(ml: f64) -> LogEntry {
        LogEntry::Water(WaterEntry {
            amount_ml: ml,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_append_and_read_single_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");

        let mut journal = JsonlJournal::new(&path);
        let record = journal.log(water(250.0)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
    }

    #[test]
    fn test_append_mixed_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("entries.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.log(water(250.0)).unwrap();
        journal
            .log(LogEntry::Weight(WeightEntry {
                weight_kg: 70.2,
                timestamp: Utc::now(),
            }))
            .unwrap();
        journal
            .log(LogEntry::Food(
                crate::FoodEntry::from_serving(
                    "banana",
                    Meal::Snack,
                    2.0,
                    &crate::ServingNutrients {
                        calories: 105.0,
                        protein_g: 1.3,
                        carbs_g: 27.0,
                        fat_g: 0.4,
                        fiber_g: 3.1,
                    },
                    Utc::now(),
                )
                .unwrap(),
            ))
            .unwrap();

        let records = journal.read_all().unwrap();
        let kinds: Vec<_> = records.iter().map(|r| r.entry.kind()).collect();
        assert_eq!(kinds, vec!["water", "weight", "food"]);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = read_records(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.log(water(250.0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ not json").unwrap();
        writeln!(file).unwrap();
        drop(file);

        journal.log(water(500.0)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_append_after_partial_line_starts_new_line() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.log(water(400.0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{{\"id\":\"0\",\"kind\":\"wat").unwrap();
        drop(file);

        let record = journal.log(water(600.0)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], record);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
    }
}
