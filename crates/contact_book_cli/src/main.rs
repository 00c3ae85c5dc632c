//! Terminal front-end for the contact book.
//!
//! # Responsibility
//! - Run one UI action per invocation through `ContactBookSession`.
//! - Map failed actions to a non-zero exit status.

use clap::{Parser, Subcommand, ValueEnum};
use contact_book_core::{default_log_level, init_logging, provision_db, Contact, ContactNumber};
use contact_book_ffi::{ActionResponse, ContactBookSession, ContactForm, ContactRow, SessionConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contact-book")]
#[command(version, about = "Store, search, edit and delete personal contacts", long_about = None)]
struct Cli {
    /// Database file (default: CONTACT_BOOK_DB_PATH env or <tmp>/contact_book.sqlite3)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error; only valid together with --log-dir
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database and the contacts table
    Provision,
    /// List every contact
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Add a new contact
    Add(ContactArgs),
    /// Show the contact with the given number
    Search {
        #[arg(allow_negative_numbers = true)]
        number: String,
    },
    /// Overwrite a contact; the number doubles as lookup key unless --key is set
    Edit {
        #[command(flatten)]
        contact: ContactArgs,
        /// Number of the contact to overwrite
        #[arg(long, allow_negative_numbers = true)]
        key: Option<ContactNumber>,
    },
    /// Delete the contact with the given number
    Delete {
        #[arg(allow_negative_numbers = true)]
        number: String,
    },
}

#[derive(Debug, clap::Args)]
struct ContactArgs {
    name: String,
    #[arg(allow_negative_numbers = true)]
    number: String,
    email: String,
    address: String,
}

impl From<ContactArgs> for ContactForm {
    fn from(value: ContactArgs) -> Self {
        ContactForm::new(value.name, value.number, value.email, value.address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    let config = SessionConfig::resolve(cli.db);

    if let Command::Provision = cli.command {
        let conn = provision_db(&config.db_path).map_err(|err| err.to_string())?;
        conn.close().map_err(|(_, err)| err.to_string())?;
        return Ok(format!(
            "Provisioned contact book at {}",
            config.db_path.display()
        ));
    }

    let mut session = ContactBookSession::open(&config).map_err(|err| err.to_string())?;
    let result = run_action(&mut session, cli.command);
    session.exit().map_err(|err| err.to_string())?;
    result
}

fn run_action(session: &mut ContactBookSession, command: Command) -> Result<String, String> {
    match command {
        Command::Provision => Ok(String::new()),
        Command::List { format } => {
            into_output(session.refresh())?;
            render_contacts(&session.contacts(), format)
        }
        Command::Add(contact) => {
            session.set_form(contact.into());
            into_output(session.add())
        }
        Command::Search { number } => {
            session.set_form(ContactForm::new("", number, "", ""));
            into_output(session.search())?;
            Ok(session.output())
        }
        Command::Edit { contact, key } => {
            session.set_form(contact.into());
            let response = match key {
                Some(key) => session.edit_with_key(key),
                None => session.edit(),
            };
            into_output(response)
        }
        Command::Delete { number } => {
            session.set_form(ContactForm::new("", number, "", ""));
            into_output(session.delete())
        }
    }
}

fn into_output(response: ActionResponse) -> Result<String, String> {
    if response.ok {
        Ok(response.message)
    } else {
        Err(response.message)
    }
}

fn render_contacts(rows: &[ContactRow], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            let contacts = rows
                .iter()
                .map(|row| {
                    Contact::new(
                        row.name.clone(),
                        row.number,
                        row.email.clone(),
                        row.address.clone(),
                    )
                })
                .collect::<Vec<_>>();
            serde_json::to_string_pretty(&contacts).map_err(|err| err.to_string())
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("No contacts.".to_string());
            }
            let mut lines = vec![format!(
                "{:<12} {:<24} {:<28} {}",
                "NUMBER", "NAME", "EMAIL", "ADDRESS"
            )];
            lines.extend(rows.iter().map(|row| {
                format!(
                    "{:<12} {:<24} {:<28} {}",
                    row.number, row.name, row.email, row.address
                )
            }));
            Ok(lines.join("\n"))
        }
    }
}
