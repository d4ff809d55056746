use crate::address_book::error::BookError;
use crate::address_book::fields::{self, Birthday, Name, Phone};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use std::fmt;

pub const UPCOMING_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: Name,
    #[serde(default)]
    phones: Vec<Phone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birthday: Option<Birthday>
}

impl Record {
    pub fn new(name: &str) -> Self {
        Record { name: fields::normalize_name(name), phones: Vec::new(), birthday: None }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    pub fn rename(&mut self, new_name: &str) {
        self.name = fields::normalize_name(new_name);
    }

    pub fn add_phone(&mut self, phone: &str) -> Result<(), BookError> {
        self.phones.push(fields::normalize_phone(phone)?);
        Ok(())
    }

    pub fn remove_phone(&mut self, phone: &str) -> Result<(), BookError> {
        let idx = self.phone_position(phone)?;
        self.phones.remove(idx);
        Ok(())
    }

    /// Replaces `old_phone` with `new_phone`, which goes to the end of the list. Both
    /// numbers are validated and `old_phone` located before anything changes.
    pub fn edit_phone(&mut self, old_phone: &str, new_phone: &str) -> Result<(), BookError> {
        let idx = self.phone_position(old_phone)?;
        let new_phone = fields::normalize_phone(new_phone)?;
        self.phones.remove(idx);
        self.phones.push(new_phone);
        Ok(())
    }

    fn phone_position(&self, phone: &str) -> Result<usize, BookError> {
        let phone = fields::normalize_phone(phone)?;
        match self.phones.iter().position(|p| *p == phone) {
            Some(idx) => Ok(idx),
            None => Err(BookError::NotFound(format!("Phone {} of {}", phone, self.name)))
        }
    }

    pub fn add_birthday(&mut self, birthday: &str) -> Result<(), BookError> {
        self.birthday = Some(fields::parse_birthday(birthday)?);
        Ok(())
    }

    /// True when the next anniversary, counting from `reference`, lies within
    /// `[reference, reference + window_days]`.
    pub fn has_upcoming_birthday(&self, reference: NaiveDate, window_days: u32) -> bool {
        let Some(birthday) = &self.birthday else { return false; };
        let next = match birthday.anniversary(reference.year()) {
            Some(date) if date < reference => birthday.anniversary(reference.year() + 1),
            other => other
        };

        match (next, reference.checked_add_days(Days::new(window_days.into()))) {
            (Some(next), Some(end)) => reference <= next && next <= end,
            _ => false
        }
    }

    /// First weekday on or after the anniversary in `reference`'s year. The year is
    /// never rolled forward, so an anniversary already passed gives a past date.
    pub fn congrats_date(&self, reference: NaiveDate) -> Option<NaiveDate> {
        let mut date = self.birthday.as_ref()?.anniversary(reference.year())?;
        while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date = date.succ_opt()?;
        }
        Some(date)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phones = self.phones.iter().map(|p| p.as_str()).collect::<Vec<_>>().join("; ");
        match &self.birthday {
            Some(birthday) => write!(f, "Contact name: {}, phones: {}, birthday: {}", self.name, phones, birthday),
            None => write!(f, "Contact name: {}, phones: {}, birthday: not set", self.name, phones)
        }
    }
}

// -----------------------------------------------
// TESTS
// -----------------------------------------------

#[cfg(test)]
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
fn with_birthday(birthday: &str) -> Record {
    let mut record = Record::new("tester");
    record.add_birthday(birthday).unwrap();
    record
}

#[test]
fn test_phones() {
    use crate::address_book::error::ValidationError;

    let mut record = Record::new("john smith");
    assert_eq!(record.name().as_str(), "John Smith");
    assert!(record.phones().is_empty());

    assert_eq!(record.add_phone("123-456-7890"), Ok(()));
    assert_eq!(record.add_phone("(098) 765 4321"), Ok(()));
    assert_eq!(record.add_phone("123"), Err(BookError::Validation(ValidationError::InvalidPhoneFormat)));
    assert_eq!(record.phones().iter().map(|p| p.as_str()).collect::<Vec<_>>(), vec!["1234567890", "0987654321"]);

    assert_eq!(record.add_phone("1234567890"), Ok(()));
    assert_eq!(record.phones().len(), 3);
    assert_eq!(record.remove_phone("123.456.7890"), Ok(()));
    assert_eq!(record.phones().iter().map(|p| p.as_str()).collect::<Vec<_>>(), vec!["0987654321", "1234567890"]);

    assert!(matches!(record.remove_phone("5555555555"), Err(BookError::NotFound(_))));
    assert_eq!(record.remove_phone("55"), Err(BookError::Validation(ValidationError::InvalidPhoneFormat)));
    assert_eq!(record.phones().len(), 2);
}

#[test]
fn test_edit_phone() {
    use crate::address_book::error::ValidationError;

    let mut record = Record::new("jane");
    record.add_phone("1111111111").unwrap();
    record.add_phone("2222222222").unwrap();

    assert_eq!(record.edit_phone("1111111111", "333-333-3333"), Ok(()));
    assert_eq!(record.phones().iter().map(|p| p.as_str()).collect::<Vec<_>>(), vec!["2222222222", "3333333333"]);

    let before = record.phones().to_vec();
    assert!(matches!(record.edit_phone("9999999999", "4444444444"), Err(BookError::NotFound(_))));
    assert_eq!(record.phones(), before.as_slice());

    assert_eq!(record.edit_phone("2222222222", "12"), Err(BookError::Validation(ValidationError::InvalidPhoneFormat)));
    assert_eq!(record.phones(), before.as_slice());
}

#[test]
fn test_birthday_and_rename() {
    use crate::address_book::error::ValidationError;

    let mut record = Record::new("bob");
    assert!(record.birthday().is_none());
    assert_eq!(record.to_string(), "Contact name: Bob, phones: , birthday: not set");

    assert_eq!(record.add_birthday("2000/06/15"), Err(BookError::Validation(ValidationError::InvalidDateFormat)));
    assert_eq!(record.add_birthday("15.06.2000"), Ok(()));
    assert_eq!(record.add_birthday("16.07.2001"), Ok(()));
    assert_eq!(record.birthday().map(|b| b.to_string()), Some("16.07.2001".to_string()));

    record.add_phone("1234567890").unwrap();
    record.add_phone("0987654321").unwrap();
    record.rename("robert");
    assert_eq!(record.to_string(), "Contact name: Robert, phones: 1234567890; 0987654321, birthday: 16.07.2001");
}

#[test]
fn test_has_upcoming_birthday() {
    let reference = date(2024, 6, 10);
    assert!(with_birthday("15.06.2000").has_upcoming_birthday(reference, UPCOMING_WINDOW_DAYS));
    assert!(!with_birthday("20.06.2000").has_upcoming_birthday(reference, UPCOMING_WINDOW_DAYS));
    assert!(with_birthday("10.06.2000").has_upcoming_birthday(reference, UPCOMING_WINDOW_DAYS));
    assert!(with_birthday("17.06.2000").has_upcoming_birthday(reference, UPCOMING_WINDOW_DAYS));
    assert!(!with_birthday("09.06.2000").has_upcoming_birthday(reference, UPCOMING_WINDOW_DAYS));
    assert!(with_birthday("20.06.2000").has_upcoming_birthday(reference, 10));
    assert!(!Record::new("nobody").has_upcoming_birthday(reference, UPCOMING_WINDOW_DAYS));

    let new_year_eve = date(2024, 12, 28);
    assert!(with_birthday("02.01.1990").has_upcoming_birthday(new_year_eve, UPCOMING_WINDOW_DAYS));
    assert!(!with_birthday("05.01.1990").has_upcoming_birthday(new_year_eve, UPCOMING_WINDOW_DAYS));

    assert!(with_birthday("29.02.2000").has_upcoming_birthday(date(2023, 2, 25), UPCOMING_WINDOW_DAYS));
}

#[test]
fn test_congrats_date() {
    let reference = date(2024, 6, 10);
    assert_eq!(with_birthday("15.06.2000").congrats_date(reference), Some(date(2024, 6, 17)));
    assert_eq!(with_birthday("16.06.2000").congrats_date(reference), Some(date(2024, 6, 17)));
    assert_eq!(with_birthday("14.06.2000").congrats_date(reference), Some(date(2024, 6, 14)));
    assert_eq!(with_birthday("02.01.1990").congrats_date(date(2024, 12, 28)), Some(date(2024, 1, 2)));
    assert_eq!(Record::new("nobody").congrats_date(reference), None);
}

#[test]
fn test_record_serde() {
    let mut record = Record::new("john");
    record.add_phone("123-456-7890").unwrap();
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, r#"{"name":"John","phones":["1234567890"]}"#);

    record.add_birthday("15.06.2000").unwrap();
    let restored = serde_json::from_str::<Record>(&serde_json::to_string(&record).unwrap()).unwrap();
    assert_eq!(restored, record);

    assert!(serde_json::from_str::<Record>(r#"{"name":"John","phones":["12"]}"#).is_err());
}
