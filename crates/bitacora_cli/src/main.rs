//! `bitacora` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration once (environment, then flags) and pass it down.
//! - Translate subcommands into `bitacora_core` service calls.

mod render;

use anyhow::{Context, Result};
use bitacora_core::db::open_db;
use bitacora_core::{
    init_logging, AppConfig, ClientStatus, ImportService, ProjectService, SessionDraft,
    ShareService, SqliteAgendaRepository, SqliteClientTokenRepository, SqliteProjectDirectory,
    SqliteSessionStore,
};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Consulting project log: import session notes, track phases and share
/// read-only timelines with clients.
#[derive(Parser, Debug)]
#[command(name = "bitacora", author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file (overrides BITACORA_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rolling log files (overrides BITACORA_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides BITACORA_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage client projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Record a single session by hand
    #[command(subcommand)]
    Session(SessionCommand),
    /// Parse pasted notes and show what would be imported
    Preview {
        /// Notes file, or `-` for stdin
        input: PathBuf,
        /// Date used for notes without one (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse notes and store them as sessions of a project
    Import {
        /// Notes file, or `-` for stdin
        input: PathBuf,
        /// Target project name
        #[arg(long)]
        project: String,
        /// Date used for notes without one (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Show or change the project phase
    #[command(subcommand)]
    Phase(PhaseCommand),
    /// Plan the next session
    #[command(subcommand)]
    Agenda(AgendaCommand),
    /// Client share links
    #[command(subcommand)]
    Share(ShareCommand),
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// Register a project
    Add {
        name: String,
        #[arg(long, default_value = "")]
        client: String,
    },
    /// List projects
    List,
    /// List a project's sessions, newest first
    Sessions { name: String },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Add one session to a project
    Add {
        project: String,
        /// At least 3 characters
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        /// At least 10 characters
        #[arg(long)]
        summary: String,
        /// Defaults to "Sesión"
        #[arg(long, default_value = "")]
        tag: String,
        #[arg(long)]
        responsible: Option<String>,
        /// done|deferred|not_done
        #[arg(long, value_parser = parse_status_arg, default_value = "deferred")]
        status: ClientStatus,
    },
}

#[derive(Subcommand, Debug)]
enum PhaseCommand {
    Show { project: String },
    Set { project: String, phase: i64 },
}

#[derive(Subcommand, Debug)]
enum AgendaCommand {
    Set {
        project: String,
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Topic to cover; repeat up to three times
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    Show { project: String },
}

#[derive(Subcommand, Debug)]
enum ShareCommand {
    /// Issue a 7-day read-only link token
    Create { project: String },
    /// Deactivate a token
    Revoke { token: String },
    /// Show the timeline a token grants access to
    Timeline { token: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(
        cli.db.clone(),
        cli.log_level.clone(),
        cli.log_dir.clone(),
    );
    start_logging(&config)?;
    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    run(cli.command, &conn)
}

fn start_logging(config: &AppConfig) -> Result<()> {
    let Some(log_dir) = &config.log_dir else {
        return Ok(());
    };
    let log_dir = if log_dir.is_absolute() {
        log_dir.clone()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    init_logging(&config.log_level, &log_dir).map_err(anyhow::Error::msg)
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Project(_) => "project",
        Command::Session(_) => "session",
        Command::Preview { .. } => "preview",
        Command::Import { .. } => "import",
        Command::Phase(_) => "phase",
        Command::Agenda(_) => "agenda",
        Command::Share(_) => "share",
    }
}

fn run(command: Command, conn: &Connection) -> Result<()> {
    match command {
        Command::Project(command) => run_project(command, conn),
        Command::Session(SessionCommand::Add {
            project,
            title,
            date,
            summary,
            tag,
            responsible,
            status,
        }) => {
            let draft = SessionDraft {
                title,
                date,
                tag,
                summary,
                client_responsible: responsible,
                client_status: status,
            };
            let session = project_service(conn)?.add_session(&project, &draft)?;
            render::print_sessions(std::slice::from_ref(&session));
            Ok(())
        }
        Command::Preview { input, date, json } => {
            let text = read_input(&input)?;
            let service = import_service(conn)?;
            let preview = service.preview(&text, date.unwrap_or_else(today));
            if json {
                println!("{}", serde_json::to_string_pretty(preview.records())?);
            } else {
                render::print_preview(&preview);
            }
            Ok(())
        }
        Command::Import {
            input,
            project,
            date,
        } => {
            let text = read_input(&input)?;
            let service = import_service(conn)?;
            let preview = service.preview(&text, date.unwrap_or_else(today));
            render::print_preview(&preview);
            let outcome = service.commit(&project, &preview)?;
            println!(
                "{} session(s) imported into `{}`.",
                outcome.count(),
                project.trim()
            );
            Ok(())
        }
        Command::Phase(command) => {
            let service = project_service(conn)?;
            let roadmap = match command {
                PhaseCommand::Show { project } => service.roadmap(&project)?,
                PhaseCommand::Set { project, phase } => service.set_phase(&project, phase)?,
            };
            render::print_roadmap(&roadmap.project.name, &roadmap.steps);
            Ok(())
        }
        Command::Agenda(command) => {
            let service = project_service(conn)?;
            let agenda = match command {
                AgendaCommand::Set {
                    project,
                    date,
                    topics,
                } => Some(service.save_next_session(&project, date, &topics)?),
                AgendaCommand::Show { project } => service.next_session(&project)?,
            };
            render::print_next_session(agenda.as_ref());
            Ok(())
        }
        Command::Share(command) => run_share(command, conn),
    }
}

fn run_project(command: ProjectCommand, conn: &Connection) -> Result<()> {
    let service = project_service(conn)?;
    match command {
        ProjectCommand::Add { name, client } => {
            let project = service.create_project(&name, &client)?;
            println!("Project `{}` created ({}).", project.name, project.id);
        }
        ProjectCommand::List => render::print_projects(&service.list_projects()?),
        ProjectCommand::Sessions { name } => render::print_sessions(&service.sessions(&name)?),
    }
    Ok(())
}

fn run_share(command: ShareCommand, conn: &Connection) -> Result<()> {
    let service = ShareService::new(
        SqliteProjectDirectory::try_new(conn)?,
        SqliteSessionStore::try_new(conn)?,
        SqliteAgendaRepository::try_new(conn)?,
        SqliteClientTokenRepository::try_new(conn)?,
    );
    match command {
        ShareCommand::Create { project } => {
            let token = service.create_link(&project, Utc::now())?;
            render::print_token(&token);
        }
        ShareCommand::Revoke { token } => {
            service.revoke(&token)?;
            println!("Share link revoked.");
        }
        ShareCommand::Timeline { token } => {
            render::print_timeline(&service.timeline(&token, Utc::now())?);
        }
    }
    Ok(())
}

fn import_service(
    conn: &Connection,
) -> Result<ImportService<SqliteProjectDirectory<'_>, SqliteSessionStore<'_>>> {
    Ok(ImportService::new(
        SqliteProjectDirectory::try_new(conn)?,
        SqliteSessionStore::try_new(conn)?,
    ))
}

fn project_service(
    conn: &Connection,
) -> Result<
    ProjectService<SqliteProjectDirectory<'_>, SqliteSessionStore<'_>, SqliteAgendaRepository<'_>>,
> {
    Ok(ProjectService::new(
        SqliteProjectDirectory::try_new(conn)?,
        SqliteSessionStore::try_new(conn)?,
        SqliteAgendaRepository::try_new(conn)?,
    ))
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read notes from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("failed to read notes from `{}`", input.display()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{value}`; use YYYY-MM-DD"))
}

fn parse_status_arg(value: &str) -> Result<ClientStatus, String> {
    ClientStatus::parse(&value.trim().to_lowercase())
        .ok_or_else(|| format!("invalid status `{value}`; use done, deferred or not_done"))
}

#[cfg(test)]
mod tests {
    use super::{parse_date_arg, parse_status_arg, Cli};
    use bitacora_core::ClientStatus;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn date_arguments_require_iso_format() {
        assert!(parse_date_arg("2025-01-14").is_ok());
        assert!(parse_date_arg("14/01/2025").is_err());
    }

    #[test]
    fn status_arguments_use_storage_names() {
        assert_eq!(parse_status_arg("NOT_DONE"), Ok(ClientStatus::NotDone));
        assert!(parse_status_arg("realizado").is_err());
    }

    #[test]
    fn session_add_requires_title_date_and_summary() {
        use clap::Parser;

        let parsed = Cli::try_parse_from([
            "bitacora",
            "session",
            "add",
            "Acme Retail",
            "--title",
            "Cierre",
            "--date",
            "2025-03-03",
            "--summary",
            "Se acordó el plan.",
        ]);
        assert!(parsed.is_ok());

        let missing_date = Cli::try_parse_from([
            "bitacora",
            "session",
            "add",
            "Acme Retail",
            "--title",
            "Cierre",
            "--summary",
            "Se acordó el plan.",
        ]);
        assert!(missing_date.is_err());
    }
}
