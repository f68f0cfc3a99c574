//! CSV persistence for classification records.
//!
//! Two write paths:
//!
//! - [`ResultStore::append`] opens the file for append, writes one row, and
//!   flushes. The header is written only when the file is new or empty. The
//!   web form uses this for every submission.
//! - [`ResultStore::overwrite`] truncates the file and writes exactly the
//!   given batch. The console uses this once at the end of a session unless
//!   started with `--append`.
//!
//! There is no cross-process locking. Two processes appending to the same
//! path can interleave rows.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::record::{ASSESSMENT_COLUMN, ClassificationRecord, SYMPTOMS_COLUMN};

/// Header row, in column order.
pub const HEADERS: [&str; 2] = [SYMPTOMS_COLUMN, ASSESSMENT_COLUMN];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A CSV result file at a fixed path.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file with a header if needed.
    pub fn append(&self, record: &ClassificationRecord) -> Result<(), StoreError> {
        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(self.io_err(e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(HEADERS).map_err(|e| self.csv_err(e))?;
        }
        writer.serialize(record).map_err(|e| self.csv_err(e))?;
        writer.flush().map_err(|e| self.io_err(e))?;

        info!("Appended record to {}", self.path.display());
        Ok(())
    }

    /// Replace the file contents with a header plus exactly `records`.
    pub fn overwrite(&self, records: &[ClassificationRecord]) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| self.io_err(e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(HEADERS).map_err(|e| self.csv_err(e))?;
        for record in records {
            writer.serialize(record).map_err(|e| self.csv_err(e))?;
        }
        writer.flush().map_err(|e| self.io_err(e))?;

        info!("Wrote {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Read every record in file order. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<ClassificationRecord>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(self.io_err(e)),
        };

        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        let records = reader
            .deserialize()
            .collect::<Result<Vec<ClassificationRecord>, _>>()
            .map_err(|e| self.csv_err(e))?;

        debug!("Read {} record(s) from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Full CSV text for download. Header only when nothing is stored yet.
    pub fn to_csv_string(&self) -> Result<String, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if !text.is_empty() => Ok(text),
            Ok(_) => Ok(header_line()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(header_line()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

fn header_line() -> String {
    format!("{}\n", HEADERS.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ResultStore {
        ResultStore::new(dir.path().join("triage_results.csv"))
    }

    fn header_count(text: &str) -> usize {
        text.lines()
            .filter(|l| *l == "Symptoms,Triage Assessment")
            .count()
    }

    #[test]
    fn append_creates_file_with_single_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .append(&ClassificationRecord::new("fever and cough", "Triage Level: 3 - x"))
            .unwrap();
        store
            .append(&ClassificationRecord::new("rash", "Triage Level: 5 - y"))
            .unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(header_count(&text), 1);
        assert!(text.starts_with("Symptoms,Triage Assessment\n"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn append_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let records: Vec<_> = (0..5)
            .map(|i| ClassificationRecord::new(format!("symptom {i}"), format!("level {i}")))
            .collect();

        for r in &records {
            store.append(r).unwrap();
        }
        assert_eq!(store.read_all().unwrap(), records);
    }

    #[test]
    fn append_to_empty_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        File::create(store.path()).unwrap();

        store.append(&ClassificationRecord::new("a", "b")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(header_count(&text), 1);
    }

    #[test]
    fn overwrite_replaces_prior_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&ClassificationRecord::new("old", "old")).unwrap();

        let batch = vec![
            ClassificationRecord::new("new 1", "a"),
            ClassificationRecord::new("new 2", "b"),
        ];
        store.overwrite(&batch).unwrap();

        assert_eq!(store.read_all().unwrap(), batch);
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(header_count(&text), 1);
    }

    #[test]
    fn overwrite_fresh_path_writes_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.path().exists());

        let batch: Vec<_> = ["fever and cough", "chest pain", "sprained wrist", "rash"]
            .into_iter()
            .enumerate()
            .map(|(i, s)| ClassificationRecord::new(s, format!("Triage Level: {} - r", i + 1)))
            .collect();
        store.overwrite(&batch).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(header_count(&text), 1);
        assert!(text.starts_with("Symptoms,Triage Assessment\n"));
        assert_eq!(store.read_all().unwrap(), batch);
    }

    #[test]
    fn overwrite_empty_batch_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.overwrite(&[]).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "Symptoms,Triage Assessment\n"
        );
    }

    #[test]
    fn values_with_commas_and_newlines_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let record = ClassificationRecord::new(
            "chest pain, sweating\nstarted 1h ago",
            "Triage Level: 2 - \"possible MI\"",
        );
        store.append(&record).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"chest pain, sweating\nstarted 1h ago\""));
        assert_eq!(store.read_all().unwrap(), vec![record]);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(
            store.to_csv_string().unwrap(),
            "Symptoms,Triage Assessment\n"
        );
    }

    #[test]
    fn unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("missing-dir").join("out.csv"));
        let err = store
            .append(&ClassificationRecord::new("a", "b"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("missing-dir"));
    }

    #[test]
    fn csv_string_matches_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&ClassificationRecord::new("a", "b")).unwrap();
        assert_eq!(
            store.to_csv_string().unwrap(),
            "Symptoms,Triage Assessment\na,b\n"
        );
    }
}
