use crate::reporting::{log, log::Log};

use crossterm::style::{style, Stylize};

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

pub type LogSender = tokio::sync::mpsc::UnboundedSender<Log>;
pub type LogReceiver = tokio::sync::mpsc::UnboundedReceiver<Log>;

pub struct Logger {
    log_receiver: LogReceiver,
    log_file: Option<File>,
    log_level: log::Level
}

impl Logger {
    pub fn create(log_receiver: LogReceiver, log_file_path: Option<PathBuf>, log_level: &str) -> Result<Self, std::io::Error> {
        let log_lvl = match log_level.parse::<log::Level>() {
            Ok(level) => level,
            Err(e) => { return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)); }
        };

        let mut log_file = None;
        if let Some(path) = log_file_path {
            log_file = Some(File::options().create(true).append(true).open(path)?);
        }

        Ok(Logger {
            log_receiver: log_receiver,
            log_file: log_file,
            log_level: log_lvl
        })
    }

    /// Writes every received log at or above the configured level. Returns once all
    /// senders are dropped.
    pub async fn run(mut self) {
        while let Some(received_log) = self.log_receiver.recv().await {
            if received_log.get_level() >= self.log_level {
                self.write(received_log);
            }
        }
    }

    fn write(&mut self, mut received_log: Log) {
        if let Some(file) = self.log_file.as_mut() {
            if let Err(e) = file.write_all(format!("{}\n", received_log).as_bytes()) {
                eprintln!("{}", style(format!("Could not save log to file: {}", e)).red());
            }
            else {
                let _ = file.flush();
            }
        }
        else {
            received_log.truncate();
            let line = received_log.to_string();
            match received_log.get_level() {
                log::Level::Debug => eprintln!("{}", style(line).dark_grey()),
                log::Level::Info => eprintln!("{}", line),
                log::Level::Error => eprintln!("{}", style(line).red())
            }
        }
    }
}

#[test]
fn test_invalid_level() {
    let (_log_sender, log_receiver) = tokio::sync::mpsc::unbounded_channel::<Log>();
    let result = Logger::create(log_receiver, None, "verbose");
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().kind(), std::io::ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_logger_writes_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assistant.log");

    let (log_sender, log_receiver) = tokio::sync::mpsc::unbounded_channel::<Log>();
    let logger = Logger::create(log_receiver, Some(path.clone()), "info").unwrap();
    let handle = tokio::spawn(logger.run());

    log_sender.send(log::create("address_book", log::Level::Debug, "hidden detail".to_string())).unwrap();
    log_sender.send(log::create("address_book", log::Level::Info, "Loaded 2 contacts".to_string())).unwrap();
    log_sender.send(log::create("autosave", log::Level::Error, "Could not save".to_string())).unwrap();
    drop(log_sender);
    handle.await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("[address_book][Info] Loaded 2 contacts"));
    assert!(lines[1].ends_with("[autosave][Error] Could not save"));
    assert!(!content.contains("hidden detail"));
}
