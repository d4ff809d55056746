use crate::address_book::record::Record;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Format(#[from] serde_json::Error),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32)
}

#[derive(Deserialize)]
struct Header {
    version: u32
}

#[derive(Deserialize)]
struct StoredBook {
    contacts: Vec<Record>
}

#[derive(Serialize)]
struct StoredBookRef<'a> {
    version: u32,
    contacts: Vec<&'a Record>
}

/// JSON file holding every contact of an address book.
#[derive(Debug, Clone)]
pub struct Storage {
    file: PathBuf
}

impl Storage {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Storage { file: file.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Returns `Ok(None)` when nothing was saved yet.
    pub fn read(&self) -> Result<Option<Vec<Record>>, StorageError> {
        let content = match std::fs::read_to_string(&self.file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => { return Ok(None); }
            Err(e) => { return Err(e.into()); }
        };

        let header: Header = serde_json::from_str(&content)?;
        if header.version != FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion(header.version));
        }

        let stored: StoredBook = serde_json::from_str(&content)?;
        Ok(Some(stored.contacts))
    }

    pub fn write<'a>(&self, records: impl Iterator<Item = &'a Record>) -> Result<(), StorageError> {
        if let Some(dir) = self.file.parent() && !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }

        let serialized = serde_json::to_string_pretty(&StoredBookRef { version: FORMAT_VERSION, contacts: records.collect() })?;

        let temporary = self.temporary_file();
        {
            let mut f = File::create(&temporary)?;
            f.write_all(serialized.as_bytes())?;
            f.sync_all()?;
        }
        std::fs::rename(&temporary, &self.file)?;
        Ok(())
    }

    fn temporary_file(&self) -> PathBuf {
        let mut name = OsString::from(self.file.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

// -----------------------------------------------
// TESTS
// -----------------------------------------------

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path().join("address_book.json"));
    assert!(matches!(storage.read(), Ok(None)));
}

#[test]
fn test_write_and_read() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path().join("data").join("address_book.json"));

    let mut john = Record::new("john");
    john.add_phone("123-456-7890").unwrap();
    john.add_birthday("15.06.2000").unwrap();
    let jane = Record::new("jane");

    storage.write([&jane, &john].into_iter()).unwrap();
    assert!(storage.path().exists());
    assert!(!storage.temporary_file().exists());

    let content = std::fs::read_to_string(storage.path()).unwrap();
    assert!(content.contains("\"version\": 1"));
    assert!(content.contains("\"birthday\": \"15.06.2000\""));

    let restored = storage.read().unwrap().unwrap();
    assert_eq!(restored, vec![jane, john]);

    storage.write(std::iter::empty()).unwrap();
    assert_eq!(storage.read().unwrap().unwrap(), Vec::<Record>::new());
}

#[test]
fn test_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path().join("address_book.json"));

    std::fs::write(storage.path(), "not json at all").unwrap();
    assert!(matches!(storage.read(), Err(StorageError::Format(_))));

    std::fs::write(storage.path(), r#"{"version": 7, "contacts": []}"#).unwrap();
    assert!(matches!(storage.read(), Err(StorageError::UnsupportedVersion(7))));

    std::fs::write(storage.path(), r#"{"version": 1, "contacts": [{"name": "John", "phones": ["123"]}]}"#).unwrap();
    assert!(matches!(storage.read(), Err(StorageError::Format(_))));
}
