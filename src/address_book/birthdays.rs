use crate::address_book::record::Record;

use chrono::NaiveDate;

/// Records whose birthday falls within `window_days` of `reference`, earliest
/// congratulation date first.
pub fn upcoming<'a>(records: impl IntoIterator<Item = &'a Record>, reference: NaiveDate, window_days: u32) -> Vec<&'a Record> {
    let mut upcoming = records.into_iter()
        .filter(|record| record.has_upcoming_birthday(reference, window_days))
        .collect::<Vec<_>>();
    upcoming.sort_by_key(|record| record.congrats_date(reference));
    upcoming
}

#[cfg(test)]
fn contact(name: &str, birthday: &str) -> Record {
    let mut record = Record::new(name);
    record.add_birthday(birthday).unwrap();
    record
}

#[test]
fn test_no_records() {
    let reference = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    assert!(upcoming(Vec::<&Record>::new(), reference, 7).is_empty());
    assert!(upcoming(&[Record::new("no birthday")], reference, 7).is_empty());
}

#[test]
fn test_upcoming_order() {
    use crate::address_book::record::UPCOMING_WINDOW_DAYS;

    let reference = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let records = vec![
        contact("saturday", "15.06.1990"),
        contact("far away", "01.09.1990"),
        contact("wednesday", "12.06.1985"),
        contact("passed", "01.06.1980"),
        contact("friday", "14.06.2001"),
        contact("nobody", "20.06.1999")
    ];

    let names = upcoming(&records, reference, UPCOMING_WINDOW_DAYS).iter().map(|r| r.name().as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Wednesday", "Friday", "Saturday"]);
}

#[test]
fn test_order_is_by_date_not_text() {
    let reference = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
    let records = vec![contact("february", "01.02.1990"), contact("january", "29.01.1990")];
    let names = upcoming(&records, reference, 10).iter().map(|r| r.name().as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["January", "February"]);
}
