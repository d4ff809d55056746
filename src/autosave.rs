use crate::address_book::SharedAddressBook;
use crate::reporting::log;
use crate::reporting::logger::LogSender;

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

/// Saves `book` every `period`, starting one period from now. The task runs until it
/// is aborted or the runtime shuts down.
pub fn start(book: SharedAddressBook, period: Duration, log_sender: LogSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let _ = log_sender.send(log::create("autosave", log::Level::Debug, "Autosave started".to_string()));
            book.lock().await.save();
        }
    })
}

#[tokio::test]
async fn test_autosave_writes_book() {
    use crate::address_book::AddressBook;
    use crate::address_book::record::Record;
    use crate::storage::Storage;

    use std::sync::Arc;
    use tokio::sync::Mutex;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("address_book.json");
    let (log_sender, mut log_receiver) = tokio::sync::mpsc::unbounded_channel::<log::Log>();
    let book = Arc::new(Mutex::new(AddressBook::create(Storage::new(path.clone()), log_sender.clone())));

    let handle = start(Arc::clone(&book), Duration::from_millis(50), log_sender);
    book.lock().await.add(Record::new("john"));
    assert!(!path.exists());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(path.exists());
    assert_eq!(Storage::new(path.clone()).read().unwrap().unwrap().len(), 1);

    book.lock().await.add(Record::new("jane"));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(Storage::new(path).read().unwrap().unwrap().len(), 2);

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    let logs = std::iter::from_fn(|| log_receiver.try_recv().ok()).collect::<Vec<_>>();
    assert!(logs.iter().all(|l| l.get_level() != log::Level::Error));
    assert!(logs.iter().any(|l| l.get_content() == "Autosave started"));
}
