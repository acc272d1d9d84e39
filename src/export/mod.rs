use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::collection::Collection;
use crate::error::Result;

pub const USERS_FILE: &str = "users.csv";
pub const REPOSITORIES_FILE: &str = "repositories.csv";
pub const SNAPSHOT_FILE: &str = "raw_data.json";

/// Paths written by one export. A `None` CSV path means the corresponding
/// record list was empty and no file was created.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub users_csv: Option<PathBuf>,
    pub repositories_csv: Option<PathBuf>,
    pub snapshot: PathBuf,
}

impl ExportSummary {
    pub fn written(&self) -> Vec<&Path> {
        self.users_csv
            .iter()
            .chain(self.repositories_csv.iter())
            .map(PathBuf::as_path)
            .chain(std::iter::once(self.snapshot.as_path()))
            .collect()
    }
}

pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn export(&self, collection: &Collection) -> Result<ExportSummary> {
        std::fs::create_dir_all(&self.dir)?;

        let users_csv = self.write_csv(USERS_FILE, &collection.users)?;
        let repositories_csv = self.write_csv(REPOSITORIES_FILE, &collection.repositories)?;

        let snapshot = self.dir.join(SNAPSHOT_FILE);
        self.write_atomic(&snapshot, |file| {
            serde_json::to_writer_pretty(&mut *file, collection)?;
            file.write_all(b"\n")?;
            Ok(())
        })?;
        tracing::info!("Snapshot written to: {}", snapshot.display());

        Ok(ExportSummary {
            users_csv,
            repositories_csv,
            snapshot,
        })
    }

    /// Writes one header row plus one row per record. Nothing is written for
    /// an empty slice.
    fn write_csv<T: Serialize>(&self, name: &str, records: &[T]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            tracing::info!("No records for {}, skipping", name);
            return Ok(None);
        }

        let path = self.dir.join(name);
        self.write_atomic(&path, |file| {
            let mut writer = csv::Writer::from_writer(file);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
            Ok(())
        })?;

        tracing::info!("{} rows written to: {}", records.len(), path.display());
        Ok(Some(path))
    }

    /// Writes into a temporary file beside `path` and renames it into place,
    /// so a failed write leaves no partial file.
    fn write_atomic<F>(&self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut NamedTempFile) -> Result<()>,
    {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        write(&mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
