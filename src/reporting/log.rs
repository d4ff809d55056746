use chrono::{DateTime, Utc};

use std::fmt;
use std::str::FromStr;

type Timestamp = i64;

const MAX_LOG_SIZE_FOR_DISPLAY: usize = 100;

#[derive(Debug, Eq, PartialEq, PartialOrd, Clone, Copy)]
pub enum Level {
    Debug,
    Info,
    Error
}

impl FromStr for Level {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "error" => Ok(Level::Error),
            invalid => Err(format!("Invalid logging level: {}. Available: debug, info, error", invalid))
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct Log {
    timestamp: Timestamp,
    module: String,
    level: Level,
    content: String
}

impl Log {
    pub fn get_level(&self) -> Level {
        self.level
    }

    #[cfg(test)]
    pub fn get_content(&self) -> &str {
        &self.content
    }

    pub(super) fn truncate(&mut self) {
        if self.content.len() > MAX_LOG_SIZE_FOR_DISPLAY {
            let mut cut = MAX_LOG_SIZE_FOR_DISPLAY;
            while !self.content.is_char_boundary(cut) {
                cut -= 1;
            }
            self.content.truncate(cut);
            self.content.push_str(" (...)");
        }
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_micros(self.timestamp) {
            Some(datetime) => {
                write!(f, "[{}][{}][{:?}] {}", datetime.to_rfc3339(), self.module, self.level, self.content)
            }
            None => Err(fmt::Error{})
        }
    }
}

pub fn create(module: &str, level: Level, content: String) -> Log {
    debug_assert!(!module.is_empty());
    debug_assert!(!content.is_empty());
    Log { timestamp: Utc::now().timestamp_micros(), module: module.to_string(), level: level, content: content }
}

#[test]
fn test_log() {
    {
        let time_when_log_created = Utc::now();
        let log = format!("{}", create("address_book", Level::Error, "Could not save".to_string()));
        let split = log.find("][").unwrap() + 1;
        let (datetime, rest) = log.split_at(split);
        assert_eq!(rest, "[address_book][Error] Could not save");

        let parsed_datetime = DateTime::parse_from_rfc3339(&datetime[1..datetime.len() - 1]);
        assert!(parsed_datetime.is_ok());
        assert!((parsed_datetime.unwrap().timestamp() - time_when_log_created.timestamp()).abs() <= 1);
    }
    {
        let mut log = create("autosave", Level::Debug, "x".repeat(150));
        log.truncate();
        assert_eq!(log.get_content().len(), MAX_LOG_SIZE_FOR_DISPLAY + " (...)".len());
        assert!(log.get_content().ends_with(" (...)"));

        let mut short = create("autosave", Level::Debug, "short".to_string());
        short.truncate();
        assert_eq!(short.get_content(), "short");
    }
}

#[test]
fn test_level() {
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Error);
    assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    assert_eq!("error".parse::<Level>(), Ok(Level::Error));
    assert!("verbose".parse::<Level>().is_err());
}
