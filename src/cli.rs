use crossterm::style::{style, Stylize};
use thiserror::Error;

use std::io::{self, BufRead, Write};

pub type InputReceiver = tokio::sync::mpsc::UnboundedReceiver<String>;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandType {
    AddContact(String, Option<String>), // Name, optional phone
    RenameContact(String, String), // Old name, new name
    RemoveContact(String), // Name
    AddPhone(String, String), // Name, phone
    EditPhone(String, String, String), // Name, old phone, new phone
    RemovePhone(String, String), // Name, phone
    ShowPhones(String), // Name
    ShowAll,
    AddBirthday(String, String), // Name, birthday DD.MM.YYYY
    ShowBirthday(String), // Name
    Birthdays
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Help,
    Exit,
    Run(CommandType)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Please enter a command.")]
    Empty,
    #[error("Invalid command: {0}. Type hello to see available commands.")]
    Unknown(String),
    #[error("Wrong number of arguments. Usage: {usage}")]
    ArgumentCount { usage: &'static str }
}

const USAGE_ADD: &str = "add <name> [phone]";
const USAGE_CHANGE: &str = "change <name> <new_name>";
const USAGE_REMOVE: &str = "remove <name>";
const USAGE_ADD_PHONE: &str = "add-phone <name> <phone>";
const USAGE_EDIT_PHONE: &str = "edit-phone <name> <old_phone> <new_phone>";
const USAGE_REMOVE_PHONE: &str = "remove-phone <name> <phone>";
const USAGE_PHONE: &str = "phone <name>";
const USAGE_ALL: &str = "all";
const USAGE_ADD_BIRTHDAY: &str = "add-birthday <name> <DD.MM.YYYY>";
const USAGE_SHOW_BIRTHDAY: &str = "show-birthday <name>";
const USAGE_BIRTHDAYS: &str = "birthdays";

pub fn help() -> String {
    format!(r#"Available commands:
{USAGE_ADD} - add a contact, replacing any contact with the same name
{USAGE_CHANGE} - rename a contact
{USAGE_REMOVE} - remove a contact
{USAGE_ADD_PHONE} - add a phone number (10 digits) to a contact
{USAGE_EDIT_PHONE} - replace a phone number of a contact
{USAGE_REMOVE_PHONE} - remove a phone number from a contact
{USAGE_PHONE} - show phone numbers of a contact
{USAGE_ALL} - show all contacts
{USAGE_ADD_BIRTHDAY} - set the birthday of a contact
{USAGE_SHOW_BIRTHDAY} - show the birthday of a contact
{USAGE_BIRTHDAYS} - show birthdays in the next 7 days
hello - show this help
close | exit - save and close the assistant bot"#)
}

fn check_args(args: &[&str], min: usize, max: usize, usage: &'static str) -> Result<(), CliError> {
    if args.len() < min || args.len() > max {
        return Err(CliError::ArgumentCount { usage: usage });
    }
    Ok(())
}

pub fn parse_command(input: &str) -> Result<Action, CliError> {
    let mut parts = input.split_whitespace();
    let command = match parts.next() {
        Some(command) => command.to_lowercase(),
        None => { return Err(CliError::Empty); }
    };
    let args = parts.collect::<Vec<&str>>();
    let arg = |i: usize| args[i].to_string();

    match command.as_str() {
        "hello" => Ok(Action::Help),
        "close" | "exit" => Ok(Action::Exit),
        "add" => {
            check_args(&args, 1, 2, USAGE_ADD)?;
            Ok(Action::Run(CommandType::AddContact(arg(0), args.get(1).map(|phone| phone.to_string()))))
        }
        "change" => {
            check_args(&args, 2, 2, USAGE_CHANGE)?;
            Ok(Action::Run(CommandType::RenameContact(arg(0), arg(1))))
        }
        "remove" => {
            check_args(&args, 1, 1, USAGE_REMOVE)?;
            Ok(Action::Run(CommandType::RemoveContact(arg(0))))
        }
        "add-phone" => {
            check_args(&args, 2, 2, USAGE_ADD_PHONE)?;
            Ok(Action::Run(CommandType::AddPhone(arg(0), arg(1))))
        }
        "edit-phone" => {
            check_args(&args, 3, 3, USAGE_EDIT_PHONE)?;
            Ok(Action::Run(CommandType::EditPhone(arg(0), arg(1), arg(2))))
        }
        "remove-phone" => {
            check_args(&args, 2, 2, USAGE_REMOVE_PHONE)?;
            Ok(Action::Run(CommandType::RemovePhone(arg(0), arg(1))))
        }
        "phone" => {
            check_args(&args, 1, 1, USAGE_PHONE)?;
            Ok(Action::Run(CommandType::ShowPhones(arg(0))))
        }
        "all" => {
            check_args(&args, 0, 0, USAGE_ALL)?;
            Ok(Action::Run(CommandType::ShowAll))
        }
        "add-birthday" => {
            check_args(&args, 2, 2, USAGE_ADD_BIRTHDAY)?;
            Ok(Action::Run(CommandType::AddBirthday(arg(0), arg(1))))
        }
        "show-birthday" => {
            check_args(&args, 1, 1, USAGE_SHOW_BIRTHDAY)?;
            Ok(Action::Run(CommandType::ShowBirthday(arg(0))))
        }
        "birthdays" => {
            check_args(&args, 0, 0, USAGE_BIRTHDAYS)?;
            Ok(Action::Run(CommandType::Birthdays))
        }
        _ => Err(CliError::Unknown(command))
    }
}

pub fn print_prompt() {
    print!("{}", style("Enter a command: ").bold());
    let _ = io::stdout().flush();
}

pub fn print_error(error: &dyn std::error::Error) {
    println!("{}", style(error.to_string()).red());
}

/// Reads stdin on a detached thread. The receiver yields `None` at end of input.
pub fn spawn_input_reader() -> InputReceiver {
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() { break; }
                }
                Err(_) => break
            }
        }
    });
    receiver
}

// -----------------------------------------------
// TESTS
// -----------------------------------------------

#[test]
fn test_parse_command() {
    assert_eq!(parse_command("hello"), Ok(Action::Help));
    assert_eq!(parse_command("  EXIT "), Ok(Action::Exit));
    assert_eq!(parse_command("close"), Ok(Action::Exit));
    assert_eq!(parse_command("add john"), Ok(Action::Run(CommandType::AddContact("john".to_string(), None))));
    assert_eq!(parse_command("Add john 123-456-7890"), Ok(Action::Run(CommandType::AddContact("john".to_string(), Some("123-456-7890".to_string())))));
    assert_eq!(parse_command("change john johnny"), Ok(Action::Run(CommandType::RenameContact("john".to_string(), "johnny".to_string()))));
    assert_eq!(parse_command("remove john"), Ok(Action::Run(CommandType::RemoveContact("john".to_string()))));
    assert_eq!(parse_command("add-phone john 1234567890"), Ok(Action::Run(CommandType::AddPhone("john".to_string(), "1234567890".to_string()))));
    assert_eq!(parse_command("edit-phone john 1 2"), Ok(Action::Run(CommandType::EditPhone("john".to_string(), "1".to_string(), "2".to_string()))));
    assert_eq!(parse_command("remove-phone john 1"), Ok(Action::Run(CommandType::RemovePhone("john".to_string(), "1".to_string()))));
    assert_eq!(parse_command("phone john"), Ok(Action::Run(CommandType::ShowPhones("john".to_string()))));
    assert_eq!(parse_command("all"), Ok(Action::Run(CommandType::ShowAll)));
    assert_eq!(parse_command("add-birthday john 15.06.2000"), Ok(Action::Run(CommandType::AddBirthday("john".to_string(), "15.06.2000".to_string()))));
    assert_eq!(parse_command("show-birthday john"), Ok(Action::Run(CommandType::ShowBirthday("john".to_string()))));
    assert_eq!(parse_command("birthdays"), Ok(Action::Run(CommandType::Birthdays)));
}

#[test]
fn test_parse_command_errors() {
    assert_eq!(parse_command(""), Err(CliError::Empty));
    assert_eq!(parse_command("   \t"), Err(CliError::Empty));
    assert_eq!(parse_command("fly away"), Err(CliError::Unknown("fly".to_string())));
    assert_eq!(parse_command("add"), Err(CliError::ArgumentCount { usage: USAGE_ADD }));
    assert_eq!(parse_command("add john 1 2"), Err(CliError::ArgumentCount { usage: USAGE_ADD }));
    assert_eq!(parse_command("change john"), Err(CliError::ArgumentCount { usage: USAGE_CHANGE }));
    assert_eq!(parse_command("edit-phone john 1"), Err(CliError::ArgumentCount { usage: USAGE_EDIT_PHONE }));
    assert_eq!(parse_command("all john"), Err(CliError::ArgumentCount { usage: USAGE_ALL }));
    assert_eq!(parse_command("show-birthday"), Err(CliError::ArgumentCount { usage: USAGE_SHOW_BIRTHDAY }));

    assert_eq!(CliError::ArgumentCount { usage: USAGE_PHONE }.to_string(), "Wrong number of arguments. Usage: phone <name>");
}

#[test]
fn test_help_lists_every_command() {
    let help = help();
    for usage in [USAGE_ADD, USAGE_CHANGE, USAGE_REMOVE, USAGE_ADD_PHONE, USAGE_EDIT_PHONE, USAGE_REMOVE_PHONE, USAGE_PHONE, USAGE_ALL, USAGE_ADD_BIRTHDAY, USAGE_SHOW_BIRTHDAY, USAGE_BIRTHDAYS] {
        assert!(help.contains(usage), "missing: {}", usage);
    }
}
