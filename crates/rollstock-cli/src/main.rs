// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod paths;

use clap::{Parser, Subcommand};
use rollstock_archive::{export_and_archive, ArchiveError};
use rollstock_auth::CredentialStore;
use rollstock_model::{ArchivedRoll, RollDraft, RollField, RollId, RollRecord};
use rollstock_query::{sort_records, FilterSpec, SortDirection};
use rollstock_store::{RollStore, StoreError};
use serde_json::json;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollstock")]
#[command(about = "Roll production record management CLI")]
#[command(
    after_help = "Environment:\n  ROLLSTOCK_LOG        Log verbosity override\n  ROLLSTOCK_DATA_DIR   Data directory override"
)]
struct Cli {
    /// Machine-readable JSON output.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Override the resolved data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a produced roll.
    Add {
        #[arg(long)]
        shift: String,
        #[arg(long)]
        width: String,
        #[arg(long)]
        diameter: String,
        #[arg(long = "basis-weight")]
        basis_weight: String,
        #[arg(long = "net-weight")]
        net_weight: String,
        #[arg(long = "roll-number")]
        roll_number: String,
        #[arg(long)]
        sequence: Option<String>,
        #[arg(long = "work-order")]
        work_order: String,
        #[arg(long = "production-date")]
        production_date: String,
        #[arg(long = "quality-code")]
        quality_code: Option<String>,
        #[arg(long = "quality-description")]
        quality_description: Option<String>,
    },
    /// List live records, most recent first.
    List {
        /// Re-order the batch by this field before printing.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = false)]
        desc: bool,
    },
    /// List live records matching field=value constraints.
    Filter {
        /// Constraints as field=value; text fields match substrings,
        /// numeric fields match exactly.
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Delete live records by id.
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Export the selected records to CSV and move them to history.
    Archive {
        #[arg(required = true)]
        ids: Vec<i64>,
        #[arg(long = "export-dir")]
        export_dir: Option<PathBuf>,
    },
    /// List archived records.
    History,
    /// Manage login credentials.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// Set or replace a user's password.
    Set {
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Check a username/password pair; exits non-zero when denied.
    Verify {
        name: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Debug)]
enum CliError {
    Usage(String),
    Validation(String),
    NothingSelected,
    Internal(String),
}

impl CliError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::Validation(_) | Self::NothingSelected => 3,
            Self::Internal(_) => 10,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(msg) | Self::Validation(msg) | Self::Internal(msg) => f.write_str(msg),
            Self::NothingSelected => f.write_str("nothing selected"),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(inner) => Self::Validation(inner.to_string()),
            StoreError::NothingSelected => Self::NothingSelected,
            StoreError::Storage(msg) => Self::Internal(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ArchiveError> for CliError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NothingSelected => Self::NothingSelected,
            other => Self::Internal(other.to_string()),
        }
    }
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_env(paths::ENV_ROLLSTOCK_LOG)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ProcessExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ProcessExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(paths::resolve_data_dir);
    match cli.command {
        Commands::Add {
            shift,
            width,
            diameter,
            basis_weight,
            net_weight,
            roll_number,
            sequence,
            work_order,
            production_date,
            quality_code,
            quality_description,
        } => {
            let store = open_store(&data_dir)?;
            let draft = RollDraft {
                shift,
                width,
                diameter,
                basis_weight,
                net_weight,
                roll_number,
                sequence,
                work_order,
                production_date,
                quality_code,
                quality_description,
            };
            let id = store.create(&draft)?;
            if cli.json {
                println!("{}", json!({ "id": id }));
            } else {
                println!("created roll {id}");
            }
            Ok(())
        }
        Commands::List { sort, desc } => {
            let store = open_store(&data_dir)?;
            let mut rows = store.list_all()?;
            if let Some(field_name) = sort {
                let field = parse_field(&field_name)?;
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                sort_records(&mut rows, field, direction);
            }
            print_rolls(&rows, cli.json)
        }
        Commands::Filter { terms } => {
            let store = open_store(&data_dir)?;
            let spec = parse_filter_terms(&terms)?;
            let rows = store.filter(&spec)?;
            print_rolls(&rows, cli.json)
        }
        Commands::Delete { ids } => {
            let mut store = open_store(&data_dir)?;
            let ids: Vec<RollId> = ids.into_iter().map(RollId::new).collect();
            let deleted = store.delete(&ids)?;
            if cli.json {
                println!("{}", json!({ "deleted": deleted }));
            } else {
                println!("deleted {deleted} record(s)");
            }
            Ok(())
        }
        Commands::Archive { ids, export_dir } => {
            let mut store = open_store(&data_dir)?;
            let ids: Vec<RollId> = ids.into_iter().map(RollId::new).collect();
            let export_dir = export_dir.unwrap_or_else(|| paths::export_dir(&data_dir));
            let outcome = export_and_archive(&mut store, &ids, &export_dir)?;
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "archived": outcome.archived,
                        "export_path": outcome.export_path,
                    })
                );
            } else {
                println!(
                    "archived {} record(s); export written to {}",
                    outcome.archived,
                    outcome.export_path.display()
                );
            }
            Ok(())
        }
        Commands::History => {
            let store = open_store(&data_dir)?;
            let rows = store.history()?;
            print_history(&rows, cli.json)
        }
        Commands::User { command } => {
            let credentials = CredentialStore::new(paths::credentials_path(&data_dir));
            match command {
                UserCommand::Set { name, password } => {
                    credentials
                        .upsert_user(&name, &password)
                        .map_err(|e| CliError::Internal(e.to_string()))?;
                    if cli.json {
                        println!("{}", json!({ "user": name }));
                    } else {
                        println!("password set for {name}");
                    }
                    Ok(())
                }
                UserCommand::Verify { name, password } => {
                    let ok = credentials
                        .verify(&name, &password)
                        .map_err(|e| CliError::Internal(e.to_string()))?;
                    if cli.json {
                        println!("{}", json!({ "user": name, "ok": ok }));
                    } else {
                        println!("{}", if ok { "access granted" } else { "access denied" });
                    }
                    if ok {
                        Ok(())
                    } else {
                        Err(CliError::Validation(format!("invalid credentials for {name}")))
                    }
                }
            }
        }
    }
}

fn open_store(data_dir: &std::path::Path) -> Result<RollStore, CliError> {
    RollStore::open(&paths::db_path(data_dir)).map_err(CliError::from)
}

fn parse_field(name: &str) -> Result<RollField, CliError> {
    name.parse::<RollField>()
        .map_err(|e| CliError::Usage(e.to_string()))
}

fn parse_filter_terms(terms: &[String]) -> Result<FilterSpec, CliError> {
    let mut spec = FilterSpec::new();
    for term in terms {
        let Some((field_name, value)) = term.split_once('=') else {
            return Err(CliError::Usage(format!(
                "filter term {term:?} is not field=value"
            )));
        };
        spec.set(parse_field(field_name)?, value);
    }
    Ok(spec)
}

fn print_rolls(rows: &[RollRecord], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let rendered =
            serde_json::to_string_pretty(rows).map_err(|e| CliError::Internal(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }
    for row in rows {
        println!(
            "{:>6}  shift={}  roll={}  wo={}  date={}  width={}  net={}",
            row.id,
            row.shift,
            row.roll_number,
            row.work_order,
            row.production_date,
            row.width,
            row.net_weight,
        );
    }
    Ok(())
}

fn print_history(rows: &[ArchivedRoll], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let rendered =
            serde_json::to_string_pretty(rows).map_err(|e| CliError::Internal(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }
    for row in rows {
        println!(
            "{:>6}  shift={}  roll={}  wo={}  archived_at={}",
            row.id, row.shift, row.roll_number, row.work_order, row.archived_at,
        );
    }
    Ok(())
}
