mod address_book;
mod autosave;
mod cli;
mod contact_manager;
mod reporting;
mod storage;

use address_book::{AddressBook, SharedAddressBook};
use cli::Action;
use reporting::log;
use reporting::logger::{LogSender, Logger};
use storage::Storage;

use tokio::sync::Mutex;

use std::path::PathBuf;
use std::sync::Arc;

#[derive(clap::Parser)]
struct Config {
    #[arg(long, default_value = "data/address_book.json", help = "Path to the file where contacts are stored.")]
    data_file: PathBuf,
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..), help = "How often, in seconds, contacts are saved in the background.")]
    autosave_interval: u64,
    #[arg(long, required = false, help = "path to file where logs will be saved. Logs are printed to stderr otherwise.")]
    log_file: Option<PathBuf>,
    #[arg(long, required = false, default_value = "info", help = "Available levels: debug, info, error")]
    log_level: String
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select!(
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                );
            }
            Err(_) => { let _ = tokio::signal::ctrl_c().await; }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run_command_loop(book: &SharedAddressBook, log_sender: &LogSender) {
    let mut input = cli::spawn_input_reader();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        cli::print_prompt();
        tokio::select!(
            _ = &mut shutdown => {
                println!();
                let _ = log_sender.send(log::create("main", log::Level::Info, "Signal received, saving data before exit".to_string()));
                break;
            }
            line = input.recv() => {
                let Some(line) = line else { break; };
                match cli::parse_command(&line) {
                    Err(e) => cli::print_error(&e),
                    Ok(Action::Exit) => break,
                    Ok(Action::Help) => println!("{}", cli::help()),
                    Ok(Action::Run(cmd)) => {
                        let today = chrono::Local::now().date_naive();
                        let mut book = book.lock().await;
                        match contact_manager::handle_command(&mut book, cmd, today) {
                            Ok(output) => println!("{}", output),
                            Err(e) => cli::print_error(&e)
                        }
                    }
                }
            }
        );
    }
}

#[tokio::main]
async fn main() {
    let config = <Config as clap::Parser>::parse();

    let (log_sender, log_receiver) = tokio::sync::mpsc::unbounded_channel::<log::Log>();
    let logger = match Logger::create(log_receiver, config.log_file, &config.log_level) {
        Ok(logger) => logger,
        Err(e) => {
            println!("Could not create a logger: {}", e);
            return;
        }
    };
    let logger_handle = tokio::spawn(logger.run());

    println!("Starting the assistant bot v0.2...");
    let book = Arc::new(Mutex::new(AddressBook::load(Storage::new(config.data_file), log_sender.clone())));
    let autosave_handle = autosave::start(Arc::clone(&book), tokio::time::Duration::from_secs(config.autosave_interval), log_sender.clone());

    println!("Welcome to the assistant bot! Type hello to see available commands.");
    run_command_loop(&book, &log_sender).await;

    autosave_handle.abort();
    book.lock().await.save();
    drop(book);
    drop(log_sender);
    let _ = logger_handle.await;
    println!("Good bye!");
}
