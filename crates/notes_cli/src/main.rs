//! Command-line front end over a SQLite-backed notes session.
//!
//! # Responsibility
//! - Resolve the database path and optional log directory from the environment.
//! - Map one command per invocation onto the `NotesSession` surface.
//!
//! Usage: `notes_cli <command> [args...]`, see `usage()`.

use log::info;
use notes_core::{default_log_level, init_logging, Note, NotesSession, SqliteGateway};
use std::path::PathBuf;
use std::process::ExitCode;

const DB_FILE_NAME: &str = "notes_core.sqlite3";
const DB_PATH_ENV: &str = "NOTES_DB_PATH";
const LOG_DIR_ENV: &str = "NOTES_LOG_DIR";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", usage());
        return ExitCode::from(2);
    };

    if command == "ping" {
        println!("notes_core ping={}", notes_core::ping());
        println!("notes_core version={}", notes_core::core_version());
        return ExitCode::SUCCESS;
    }

    if let Some(log_dir) = env_value(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = resolve_db_path();
    let gateway = match SqliteGateway::open(&db_path) {
        Ok(gateway) => gateway,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let mut session = NotesSession::open(gateway);
    info!("event=cli_command module=cli status=start command={command}");

    match run(&mut session, command, rest) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}

fn run(
    session: &mut NotesSession<SqliteGateway>,
    command: &str,
    args: &[String],
) -> Result<(), String> {
    match (command, args) {
        ("list", []) => print_notes(&session.list_notes()),
        ("search", [term]) => print_notes(&session.search_notes(term)),
        ("show", [id]) => match session.get_note(id) {
            Some(note) => {
                print_note(&note);
                println!("{}", note.content);
            }
            None => println!("no note with id {id}"),
        },
        ("add", [title, content, category]) => {
            let note = session.create_note(title.as_str(), content.as_str(), category.as_str());
            println!("{}", note.id);
        }
        ("edit", [id, title, content, category]) => {
            if !session.update_note(id, title.as_str(), content.as_str(), category.as_str()) {
                println!("no note with id {id}");
            }
        }
        ("rm", [id]) => {
            if !session.delete_note(id) {
                println!("no note with id {id}");
            }
        }
        ("categories", []) => {
            for name in session.list_categories() {
                println!("{name}");
            }
        }
        ("add-category", [name]) => {
            session.add_category(name.as_str());
        }
        ("rm-category", [name]) => {
            let outcome = session.delete_category(name);
            println!("removed={} reassigned={}", outcome.removed, outcome.reassigned);
        }
        ("login", [email, password]) => {
            if !session.login(email, password) {
                return Err(session.auth_error().unwrap_or("login failed").to_string());
            }
            println!("signed in as {email}");
        }
        ("register", [email, password]) => {
            if !session.register(email, password) {
                return Err(session
                    .auth_error()
                    .unwrap_or("registration failed")
                    .to_string());
            }
            println!("registered {email}");
        }
        ("logout", []) => session.logout(),
        ("whoami", []) => match session.current_user() {
            Some(user) => println!("{} ({})", user.email, user.id),
            None => println!("signed out"),
        },
        _ => return Err(usage()),
    }
    Ok(())
}

fn print_notes(notes: &[Note]) {
    for note in notes {
        print_note(note);
    }
}

fn print_note(note: &Note) {
    println!(
        "{}\t{}\t[{}]\t{}\t{}",
        note.id,
        note.updated_at.to_rfc3339(),
        note.category,
        note.title,
        note.preview().unwrap_or_default()
    );
}

fn resolve_db_path() -> PathBuf {
    env_value(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn usage() -> String {
    [
        "usage: notes_cli <command> [args...]",
        "  list | search <term> | show <id>",
        "  add <title> <content> <category> | edit <id> <title> <content> <category> | rm <id>",
        "  categories | add-category <name> | rm-category <name>",
        "  login <email> <password> | register <email> <password> | logout | whoami",
        "  ping",
        "environment: NOTES_DB_PATH (database file), NOTES_LOG_DIR (absolute log dir)",
    ]
    .join("\n")
}
