/// One pretty-printed JSON document per accession in a flat directory
use crate::bio::record::ProteinRecord;
use crate::{Result, TerpenomeError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Open a store, creating the directory if needed
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Document path for an accession; rejects names that are not a single file name
    pub fn path_for(&self, accession: &str) -> Result<PathBuf> {
        if accession.is_empty()
            || accession == "."
            || accession == ".."
            || accession.contains('/')
            || accession.contains('\\')
            || accession.contains('\0')
        {
            return Err(TerpenomeError::InvalidInput(format!(
                "Accession '{}' cannot be used as a document name",
                accession
            )));
        }
        Ok(self.dir.join(format!("{}.{}", accession, EXTENSION)))
    }

    pub fn contains(&self, accession: &str) -> bool {
        self.path_for(accession).map(|p| p.exists()).unwrap_or(false)
    }

    /// Write a record, replacing any previous document for the same accession.
    /// The document is written to a temporary file first and renamed into place.
    pub fn write(&self, record: &ProteinRecord) -> Result<PathBuf> {
        let path = self.path_for(record.accession())?;
        let temp_path = path.with_extension(format!("{}.tmp", EXTENSION));

        let result = (|| -> Result<()> {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            Ok(())
        })();

        if let Err(e) = result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        std::fs::rename(&temp_path, &path)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }

    pub fn read(&self, accession: &str) -> Result<ProteinRecord> {
        let path = self.path_for(accession)?;
        Self::read_path(&path)
    }

    /// Like `read`, but a missing document is `None`
    pub fn try_read(&self, accession: &str) -> Result<Option<ProteinRecord>> {
        let path = self.path_for(accession)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read_path(&path).map(Some)
    }

    fn read_path(path: &Path) -> Result<ProteinRecord> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            TerpenomeError::Serialization(format!("{}: {}", path.display(), e))
        })
    }

    /// All documents in the store, ordered by accession
    pub fn load_all(&self) -> Result<Vec<ProteinRecord>> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            EXTENSION
        );
        let entries = glob::glob(&pattern)
            .map_err(|e| TerpenomeError::InvalidInput(format!("Invalid record directory: {}", e)))?;

        let mut records = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| TerpenomeError::Io(e.into_error()))?;
            records.push(Self::read_path(&path)?);
        }
        records.sort_by(|a, b| a.accession().cmp(b.accession()));

        tracing::info!("Loaded {} records from {}", records.len(), self.dir.display());
        Ok(records)
    }

    /// All documents keyed by accession
    pub fn load_index(&self) -> Result<HashMap<String, ProteinRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|record| (record.accession().to_string(), record))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::record::SourceDatabase;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(header: &str) -> ProteinRecord {
        ProteinRecord::from_header(SourceDatabase::Interpro, header).unwrap()
    }

    #[test]
    fn test_write_and_read() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        let mut original = record("A0A1|reviewed|Kaurene synthase|taxID:5062");
        original.set_enzyme_types(["diterpene synthase"]);

        let path = store.write(&original).unwrap();
        assert_eq!(path, dir.path().join("A0A1.json"));
        assert!(!dir.path().join("A0A1.json.tmp").exists());

        let loaded = store.read("A0A1").unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_overwrite_replaces_document() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        let mut record = record("A0A1|reviewed|Kaurene synthase|taxID:5062");
        store.write(&record).unwrap();

        record.set_enzyme_types(["diterpene synthase"]);
        store.write(&record).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
        assert!(store.read("A0A1").unwrap().is_classified());
    }

    #[test]
    fn test_rejects_unsafe_accessions() {
        let store = RecordStore::new("records");
        for accession in ["", ".", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.path_for(accession),
                Err(TerpenomeError::InvalidInput(_))
            ));
        }
        assert!(store.path_for("XP_001390853.1").is_ok());
    }

    #[test]
    fn test_load_all_sorted() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        store.write(&record("C3|reviewed|x|taxID:1")).unwrap();
        store.write(&record("A1|reviewed|x|taxID:1")).unwrap();
        store.write(&record("B2|reviewed|x|taxID:1")).unwrap();

        let accessions: Vec<String> = store
            .load_all()
            .unwrap()
            .iter()
            .map(|r| r.accession().to_string())
            .collect();
        assert_eq!(accessions, vec!["A1", "B2", "C3"]);
        assert!(store.try_read("D4").unwrap().is_none());
    }
}
