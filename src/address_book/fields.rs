use crate::address_book::error::ValidationError;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use std::fmt;

const PHONE_DIGITS: usize = 10;
const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Name(String);

/// A phone number reduced to its digits. Always exactly 10 of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

/// Title-cases every word: the first letter of each run of letters goes upper case,
/// the rest lower case.
pub fn normalize_name(raw: &str) -> Name {
    let mut normalized = String::with_capacity(raw.len());
    let mut inside_word = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if inside_word { normalized.extend(c.to_lowercase()); }
            else { normalized.extend(c.to_uppercase()); }
            inside_word = true;
        }
        else {
            normalized.push(c);
            inside_word = false;
        }
    }
    Name(normalized)
}

pub fn normalize_phone(raw: &str) -> Result<Phone, ValidationError> {
    let digits = raw.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if digits.len() != PHONE_DIGITS {
        return Err(ValidationError::InvalidPhoneFormat);
    }
    Ok(Phone(digits))
}

pub fn parse_birthday(raw: &str) -> Result<Birthday, ValidationError> {
    parse_birthday_on(raw, Local::now().date_naive())
}

pub(crate) fn parse_birthday_on(raw: &str, today: NaiveDate) -> Result<Birthday, ValidationError> {
    let date = parse_date(raw).ok_or(ValidationError::InvalidDateFormat)?;
    if date > today {
        return Err(ValidationError::InvalidDateFormat);
    }
    Ok(Birthday(date))
}

// DD.MM.YYYY, fixed width, ascii digits only
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'.' || bytes[5] != b'.' {
        return None;
    }
    if !bytes.iter().enumerate().all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit()) {
        return None;
    }

    let day = raw[0..2].parse::<u32>().ok()?;
    let month = raw[3..5].parse::<u32>().ok()?;
    let year = raw[6..10].parse::<i32>().ok()?;
    if year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Name {
    fn from(raw: String) -> Self {
        normalize_name(&raw)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Phone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        normalize_phone(&raw)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Birthday {
    /// The birthday's month and day in `year`. A 29 February birthday is celebrated
    /// on 1 March when `year` is not a leap year.
    pub fn anniversary(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.0.month(), self.0.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
    }
}

impl TryFrom<String> for Birthday {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        parse_birthday(&raw)
    }
}

impl From<Birthday> for String {
    fn from(birthday: Birthday) -> Self {
        birthday.to_string()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

// -----------------------------------------------
// TESTS
// -----------------------------------------------

#[test]
fn test_normalize_name() {
    assert_eq!(normalize_name("john").as_str(), "John");
    assert_eq!(normalize_name("JOHN SMITH").as_str(), "John Smith");
    assert_eq!(normalize_name("o'neil").as_str(), "O'Neil");
    assert_eq!(normalize_name("anna-maria").as_str(), "Anna-Maria");
    assert_eq!(normalize_name("agent007bond").as_str(), "Agent007Bond");
    assert_eq!(normalize_name("łukasz").as_str(), "Łukasz");
    assert_eq!(normalize_name("").as_str(), "");
}

#[test]
fn test_normalize_phone() {
    let inputs = ["1234567890", "123-456-7890", "(123) 456 7890", "+1 23.45.67.89.0", "12 34 56 78 90"];
    for input in inputs {
        let phone = normalize_phone(input);
        assert_eq!(phone.as_ref().map(|p| p.as_str()), Ok("1234567890"), "input: {}", input);
    }
    assert_eq!(normalize_phone("123-456-7890"), normalize_phone("(123)4567890"));
    assert_ne!(normalize_phone("1234567890"), normalize_phone("0987654321"));
}

#[test]
fn test_invalid_phone() {
    let inputs = ["", "abc", "123456789", "12345678901", "phone: 12-34", "+48 123 456 789 0"];
    for input in inputs {
        assert_eq!(normalize_phone(input), Err(ValidationError::InvalidPhoneFormat), "input: {}", input);
    }
}

#[test]
fn test_parse_birthday() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    assert!(parse_birthday_on("29.02.2024", today).is_ok());
    assert_eq!(parse_birthday_on("29.02.2023", today), Err(ValidationError::InvalidDateFormat));
    assert!(parse_birthday_on("10.06.2024", today).is_ok());
    assert_eq!(parse_birthday_on("11.06.2024", today), Err(ValidationError::InvalidDateFormat));

    let invalid = ["1.6.2000", "01-06-2000", "2000.06.01", "01.06.00", "aa.bb.cccc", "31.04.2000", "00.01.2000", "01.13.2000", "01.01.0000", " 01.06.2000", "01.06.2000 "];
    for input in invalid {
        assert_eq!(parse_birthday_on(input, today), Err(ValidationError::InvalidDateFormat), "input: {}", input);
    }
}

#[test]
fn test_parse_birthday_rejects_tomorrow() {
    let tomorrow = Local::now().date_naive().succ_opt().unwrap();
    let raw = tomorrow.format(BIRTHDAY_FORMAT).to_string();
    assert_eq!(parse_birthday(&raw), Err(ValidationError::InvalidDateFormat));

    let today = Local::now().date_naive().format(BIRTHDAY_FORMAT).to_string();
    assert!(parse_birthday(&today).is_ok());
}

#[test]
fn test_birthday_renders_input() {
    for input in ["15.06.2000", "01.01.1970", "29.02.2024", "31.12.1999", "05.11.0999"] {
        assert_eq!(parse_birthday(input).unwrap().to_string(), input);
    }
}

#[test]
fn test_anniversary() {
    let birthday = parse_birthday("29.02.2000").unwrap();
    assert_eq!(birthday.anniversary(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
    assert_eq!(birthday.anniversary(2023), NaiveDate::from_ymd_opt(2023, 3, 1));

    let birthday = parse_birthday("15.06.1990").unwrap();
    assert_eq!(birthday.anniversary(2030), NaiveDate::from_ymd_opt(2030, 6, 15));
}

#[test]
fn test_fields_serde() {
    assert_eq!(serde_json::to_string(&normalize_phone("123-456-7890").unwrap()).unwrap(), "\"1234567890\"");
    assert_eq!(serde_json::to_string(&parse_birthday("15.06.2000").unwrap()).unwrap(), "\"15.06.2000\"");
    assert_eq!(serde_json::from_str::<Name>("\"jane doe\"").unwrap().as_str(), "Jane Doe");
    assert!(serde_json::from_str::<Phone>("\"12345\"").is_err());
    assert!(serde_json::from_str::<Birthday>("\"2000-06-15\"").is_err());
}
