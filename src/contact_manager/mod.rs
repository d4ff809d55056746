use crate::address_book::AddressBook;
use crate::address_book::birthdays;
use crate::address_book::error::BookError;
use crate::address_book::record::{Record, UPCOMING_WINDOW_DAYS};
use crate::cli::CommandType;

use chrono::NaiveDate;

pub fn handle_command(book: &mut AddressBook, cmd: CommandType, today: NaiveDate) -> Result<String, BookError> {
    match cmd {
        CommandType::AddContact(name, phone) => add_contact(book, &name, phone.as_deref()),
        CommandType::RenameContact(old_name, new_name) => rename_contact(book, &old_name, &new_name),
        CommandType::RemoveContact(name) => remove_contact(book, &name),
        CommandType::AddPhone(name, phone) => add_phone(book, &name, &phone),
        CommandType::EditPhone(name, old_phone, new_phone) => edit_phone(book, &name, &old_phone, &new_phone),
        CommandType::RemovePhone(name, phone) => remove_phone(book, &name, &phone),
        CommandType::ShowPhones(name) => show_phones(book, &name),
        CommandType::ShowAll => Ok(show_all(book)),
        CommandType::AddBirthday(name, birthday) => add_birthday(book, &name, &birthday),
        CommandType::ShowBirthday(name) => show_birthday(book, &name),
        CommandType::Birthdays => Ok(list_upcoming_birthdays(book, today))
    }
}

pub fn add_contact(book: &mut AddressBook, name: &str, phone: Option<&str>) -> Result<String, BookError> {
    let mut record = Record::new(name);
    if let Some(phone) = phone {
        record.add_phone(phone)?;
    }
    book.add(record);
    Ok("Contact added.".to_string())
}

pub fn rename_contact(book: &mut AddressBook, old_name: &str, new_name: &str) -> Result<String, BookError> {
    book.rename(old_name, new_name)?;
    Ok("Contact updated.".to_string())
}

pub fn remove_contact(book: &mut AddressBook, name: &str) -> Result<String, BookError> {
    book.remove(name)?;
    Ok("Contact removed.".to_string())
}

pub fn add_phone(book: &mut AddressBook, name: &str, phone: &str) -> Result<String, BookError> {
    book.find_mut(name)?.add_phone(phone)?;
    Ok("Phone number added.".to_string())
}

pub fn edit_phone(book: &mut AddressBook, name: &str, old_phone: &str, new_phone: &str) -> Result<String, BookError> {
    book.find_mut(name)?.edit_phone(old_phone, new_phone)?;
    Ok("Phone number updated.".to_string())
}

pub fn remove_phone(book: &mut AddressBook, name: &str, phone: &str) -> Result<String, BookError> {
    book.find_mut(name)?.remove_phone(phone)?;
    Ok("Phone number removed.".to_string())
}

pub fn show_phones(book: &AddressBook, name: &str) -> Result<String, BookError> {
    let record = book.find(name)?;
    let phones = record.phones().iter().map(|p| p.as_str()).collect::<Vec<_>>();
    Ok(format!("{}: {}", record.name(), phones.join("; ")))
}

pub fn show_all(book: &AddressBook) -> String {
    book.to_string()
}

pub fn add_birthday(book: &mut AddressBook, name: &str, birthday: &str) -> Result<String, BookError> {
    book.find_mut(name)?.add_birthday(birthday)?;
    Ok("Birthday added.".to_string())
}

pub fn show_birthday(book: &AddressBook, name: &str) -> Result<String, BookError> {
    let record = book.find(name)?;
    match record.birthday() {
        Some(birthday) => Ok(birthday.to_string()),
        None => Ok(format!("{} has no birthday set.", record.name()))
    }
}

pub fn list_upcoming_birthdays(book: &AddressBook, today: NaiveDate) -> String {
    let upcoming = birthdays::upcoming(book.records(), today, UPCOMING_WINDOW_DAYS);
    if upcoming.is_empty() {
        return "No upcoming birthdays.".to_string();
    }

    upcoming.iter().filter_map(|record| {
        let birthday = record.birthday()?;
        let congrats_date = record.congrats_date(today)?;
        Some(format!("{}: congrats on {} ({})", record.name(), congrats_date.format("%d.%m.%Y"), birthday))
    }).collect::<Vec<_>>().join("\n")
}

// -----------------------------------------------
// TESTS
// -----------------------------------------------

#[cfg(test)]
fn temporary_book(dir: &tempfile::TempDir) -> AddressBook {
    let (log_sender, _) = tokio::sync::mpsc::unbounded_channel();
    AddressBook::create(crate::storage::Storage::new(dir.path().join("address_book.json")), log_sender)
}

#[test]
fn test_contact_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = temporary_book(&dir);
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

    assert_eq!(handle_command(&mut book, CommandType::AddContact("john".to_string(), Some("123-456-7890".to_string())), today), Ok("Contact added.".to_string()));
    assert_eq!(book.find("John").unwrap().phones()[0].as_str(), "1234567890");

    assert_eq!(add_birthday(&mut book, "john", "15.06.2000"), Ok("Birthday added.".to_string()));
    assert_eq!(show_birthday(&book, "john"), Ok("15.06.2000".to_string()));

    assert_eq!(add_phone(&mut book, "john", "0987654321"), Ok("Phone number added.".to_string()));
    assert_eq!(show_phones(&book, "john"), Ok("John: 1234567890; 0987654321".to_string()));

    assert_eq!(edit_phone(&mut book, "john", "1234567890", "1112223333"), Ok("Phone number updated.".to_string()));
    assert_eq!(remove_phone(&mut book, "john", "0987654321"), Ok("Phone number removed.".to_string()));
    assert_eq!(show_phones(&book, "John"), Ok("John: 1112223333".to_string()));

    assert_eq!(rename_contact(&mut book, "john", "johnny"), Ok("Contact updated.".to_string()));
    assert_eq!(show_all(&book), "Contact name: Johnny, phones: 1112223333, birthday: 15.06.2000");

    assert_eq!(list_upcoming_birthdays(&book, today), "Johnny: congrats on 17.06.2024 (15.06.2000)");

    assert_eq!(remove_contact(&mut book, "johnny"), Ok("Contact removed.".to_string()));
    assert_eq!(show_all(&book), "No contacts saved.");
    assert_eq!(list_upcoming_birthdays(&book, today), "No upcoming birthdays.");
}

#[test]
fn test_errors() {
    use crate::address_book::error::ValidationError;

    let dir = tempfile::tempdir().unwrap();
    let mut book = temporary_book(&dir);
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

    assert_eq!(add_contact(&mut book, "bob", Some("12345")), Err(BookError::Validation(ValidationError::InvalidPhoneFormat)));
    assert!(book.is_empty());

    assert!(matches!(handle_command(&mut book, CommandType::ShowPhones("bob".to_string()), today), Err(BookError::NotFound(_))));
    assert!(matches!(remove_contact(&mut book, "Ghost"), Err(BookError::NotFound(_))));
    assert!(matches!(rename_contact(&mut book, "Ghost", "Casper"), Err(BookError::NotFound(_))));

    assert_eq!(add_contact(&mut book, "bob", None), Ok("Contact added.".to_string()));
    assert_eq!(show_birthday(&book, "bob"), Ok("Bob has no birthday set.".to_string()));
    assert_eq!(add_birthday(&mut book, "bob", "31.02.2000"), Err(BookError::Validation(ValidationError::InvalidDateFormat)));
    assert!(matches!(edit_phone(&mut book, "bob", "1234567890", "0987654321"), Err(BookError::NotFound(_))));
    assert!(matches!(remove_phone(&mut book, "bob", "1234567890"), Err(BookError::NotFound(_))));
    assert_eq!(show_phones(&book, "bob"), Ok("Bob: ".to_string()));
}
