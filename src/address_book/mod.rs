pub mod birthdays;
pub mod error;
pub mod fields;
pub mod record;

use crate::reporting::log;
use crate::reporting::logger::LogSender;
use crate::storage::Storage;

use error::BookError;
use record::Record;

use tokio::sync::Mutex;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type SharedAddressBook = Arc<Mutex<AddressBook>>;

/// Contacts keyed by their normalized name.
pub struct AddressBook {
    records: BTreeMap<String, Record>,
    storage: Storage,
    log_sender: LogSender,
    modified: bool
}

fn key(name: &str) -> String {
    fields::normalize_name(name).into()
}

impl AddressBook {
    pub fn create(storage: Storage, log_sender: LogSender) -> Self {
        AddressBook { records: BTreeMap::new(), storage: storage, log_sender: log_sender, modified: false }
    }

    /// Builds a book from whatever `storage` holds. A missing or unreadable file gives
    /// an empty book.
    pub fn load(storage: Storage, log_sender: LogSender) -> Self {
        let mut book = AddressBook::create(storage, log_sender);
        match book.storage.read() {
            Ok(None) => {
                book.log(log::Level::Info, format!("No address book at {}, starting from scratch", book.storage.path().display()));
            }
            Ok(Some(records)) => {
                for record in records {
                    book.records.insert(record.name().to_string(), record);
                }
                book.log(log::Level::Info, format!("Loaded {} contacts from {}", book.len(), book.storage.path().display()));
            }
            Err(e) => {
                book.log(log::Level::Error, format!("Error loading address book from {}: {}. Starting with an empty one", book.storage.path().display(), e));
            }
        }
        book
    }

    /// Writes every record to storage if anything changed since the last save. Errors
    /// are logged and the book stays marked as modified.
    pub fn save(&mut self) {
        if !self.modified {
            self.log(log::Level::Debug, "No changes since last save".to_string());
            return;
        }

        match self.storage.write(self.records.values()) {
            Ok(()) => {
                self.modified = false;
                self.log(log::Level::Info, format!("Saved {} contacts to {}", self.len(), self.storage.path().display()));
            }
            Err(e) => {
                self.log(log::Level::Error, format!("Error saving address book to {}: {}", self.storage.path().display(), e));
            }
        }
    }

    fn log(&self, level: log::Level, text: String) {
        let _ = self.log_sender.send(log::create("address_book", level, text));
    }

    pub fn add(&mut self, record: Record) {
        let key = record.name().to_string();
        if self.records.insert(key.clone(), record).is_some() {
            self.log(log::Level::Info, format!("Contact {} already existed and was replaced", key));
        }
        self.modified = true;
    }

    pub fn remove(&mut self, name: &str) -> Result<Record, BookError> {
        match self.records.remove(&key(name)) {
            Some(record) => {
                self.modified = true;
                Ok(record)
            }
            None => Err(BookError::NotFound(format!("Record {}", name)))
        }
    }

    /// Moves the record stored under `old_name` to `new_name` and renames it. A record
    /// already stored under `new_name` is replaced.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), BookError> {
        let mut record = self.remove(old_name)?;
        record.rename(new_name);
        self.add(record);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Result<&Record, BookError> {
        self.records.get(&key(name)).ok_or_else(|| BookError::NotFound(format!("Record {}", name)))
    }

    pub fn find_mut(&mut self, name: &str) -> Result<&mut Record, BookError> {
        match self.records.get_mut(&key(name)) {
            Some(record) => {
                self.modified = true;
                Ok(record)
            }
            None => Err(BookError::NotFound(format!("Record {}", name)))
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for AddressBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No contacts saved.");
        }
        let lines = self.records.values().map(|record| record.to_string()).collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}

// -----------------------------------------------
// TESTS
// -----------------------------------------------

#[cfg(test)]
fn temporary_book(dir: &tempfile::TempDir) -> (AddressBook, crate::reporting::logger::LogReceiver) {
    let (log_sender, log_receiver) = tokio::sync::mpsc::unbounded_channel::<log::Log>();
    (AddressBook::load(Storage::new(dir.path().join("address_book.json")), log_sender), log_receiver)
}

#[test]
fn test_crud() {
    let dir = tempfile::tempdir().unwrap();
    let (mut book, _log_receiver) = temporary_book(&dir);
    assert!(book.is_empty());
    assert_eq!(book.to_string(), "No contacts saved.");

    assert!(matches!(book.remove("Ghost"), Err(BookError::NotFound(_))));
    assert!(matches!(book.find("Ghost"), Err(BookError::NotFound(_))));
    assert!(matches!(book.rename("Ghost", "Casper"), Err(BookError::NotFound(_))));

    let mut john = Record::new("john");
    john.add_phone("123-456-7890").unwrap();
    book.add(john);
    book.add(Record::new("alice"));
    assert_eq!(book.len(), 2);

    assert_eq!(book.find("John").unwrap().phones()[0].as_str(), "1234567890");
    assert_eq!(book.find("jOHN").unwrap().name().as_str(), "John");

    book.find_mut("alice").unwrap().add_phone("0987654321").unwrap();
    assert_eq!(book.to_string(), "Contact name: Alice, phones: 0987654321, birthday: not set\nContact name: John, phones: 1234567890, birthday: not set");

    assert!(book.remove("alice").is_ok());
    assert!(matches!(book.remove("alice"), Err(BookError::NotFound(_))));
    assert_eq!(book.records().map(|r| r.name().as_str()).collect::<Vec<_>>(), vec!["John"]);
}

#[test]
fn test_overwrite_on_collision() {
    let dir = tempfile::tempdir().unwrap();
    let (mut book, mut log_receiver) = temporary_book(&dir);
    while log_receiver.try_recv().is_ok() {}

    let mut first = Record::new("john");
    first.add_phone("1111111111").unwrap();
    book.add(first);
    book.add(Record::new("JOHN"));

    assert_eq!(book.len(), 1);
    assert!(book.find("john").unwrap().phones().is_empty());
    assert_eq!(log_receiver.try_recv().unwrap().get_level(), log::Level::Info);
}

#[test]
fn test_rename() {
    let dir = tempfile::tempdir().unwrap();
    let (mut book, _log_receiver) = temporary_book(&dir);

    let mut john = Record::new("john");
    john.add_phone("1234567890").unwrap();
    book.add(john);
    book.add(Record::new("bob"));

    assert_eq!(book.rename("john", "johnny"), Ok(()));
    assert!(book.find("john").is_err());
    let johnny = book.find("johnny").unwrap();
    assert_eq!(johnny.name().as_str(), "Johnny");
    assert_eq!(johnny.phones()[0].as_str(), "1234567890");

    assert_eq!(book.rename("johnny", "bob"), Ok(()));
    assert_eq!(book.len(), 1);
    assert_eq!(book.find("bob").unwrap().phones()[0].as_str(), "1234567890");
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (mut book, _log_receiver) = temporary_book(&dir);
        let mut john = Record::new("john");
        john.add_phone("123-456-7890").unwrap();
        john.add_birthday("15.06.2000").unwrap();
        book.add(john);
        book.add(Record::new("jane"));
        book.save();
    }

    let (book, _log_receiver) = temporary_book(&dir);
    assert_eq!(book.len(), 2);
    let john = book.find("john").unwrap();
    assert_eq!(john.phones()[0].as_str(), "1234567890");
    assert_eq!(john.birthday().unwrap().to_string(), "15.06.2000");
}

#[test]
fn test_save_skips_unchanged_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("address_book.json");
    let (mut book, mut log_receiver) = temporary_book(&dir);

    book.save();
    assert!(!path.exists());

    assert!(book.find_mut("nobody").is_err());
    book.save();
    assert!(!path.exists());

    book.add(Record::new("john"));
    book.save();
    assert!(path.exists());

    let logs = std::iter::from_fn(|| log_receiver.try_recv().ok()).collect::<Vec<_>>();
    assert_eq!(logs.iter().filter(|l| l.get_level() == log::Level::Error).count(), 0);
    assert!(logs.last().unwrap().get_content().starts_with("Saved 1 contacts"));
}

#[test]
fn test_load_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("address_book.json");
    std::fs::write(&path, "{ definitely not an address book").unwrap();

    let (mut book, mut log_receiver) = temporary_book(&dir);
    assert!(book.is_empty());
    assert_eq!(log_receiver.try_recv().unwrap().get_level(), log::Level::Error);

    book.save();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ definitely not an address book");
}

#[test]
fn test_save_failure_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let (log_sender, mut log_receiver) = tokio::sync::mpsc::unbounded_channel::<log::Log>();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let mut book = AddressBook::create(Storage::new(blocker.join("address_book.json")), log_sender);

    book.add(Record::new("john"));
    book.save();
    let logs = std::iter::from_fn(|| log_receiver.try_recv().ok()).collect::<Vec<_>>();
    assert_eq!(logs.last().unwrap().get_level(), log::Level::Error);
    assert_eq!(book.len(), 1);
}
