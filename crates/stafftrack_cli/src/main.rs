//! StaffTrack command-line front end.
//!
//! # Responsibility
//! - Parse commands, open the SQLite-backed document store, run one command.
//! - Print tables and reports as plain text.
//!
//! Configuration comes from `STAFFTRACK_*` environment variables; flags win.

use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::error;
use stafftrack_core::db::open_db;
use stafftrack_core::report::format_impact;
use stafftrack_core::{
    academic_year_options, export_report, init_logging_from_config, AppConfig, DataStore,
    GeminiClient, NewEventLog, NewEventType, SqliteBlobStore, StaffFilter, StaffTrackService,
    SummaryClient, TextTableRenderer, ALL_STAFF,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "stafftrack", version, about = "Track staff absences, cover and training")]
struct Cli {
    /// SQLite file holding the document (overrides STAFFTRACK_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Log level (overrides STAFFTRACK_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute log directory (overrides STAFFTRACK_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check core linkage.
    Ping,
    /// Print the core version.
    Version,
    #[command(subcommand)]
    Staff(StaffCommand),
    #[command(subcommand)]
    Types(TypeCommand),
    #[command(subcommand)]
    Log(LogCommand),
    #[command(subcommand)]
    Years(YearCommand),
    /// Net impact per staff member.
    Totals(FilterArgs),
    #[command(subcommand)]
    Report(ReportCommand),
    /// AI-written activity summary for one staff member (needs API_KEY).
    Summary { staff_id: String },
}

#[derive(Debug, Subcommand)]
enum StaffCommand {
    List,
    Add { name: String },
    Rename { id: String, name: String },
    /// Delete a staff member and all of their logs.
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum TypeCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        default_value: f64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an event type; its logs are kept.
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum LogCommand {
    Add {
        #[arg(long)]
        staff: String,
        #[arg(long = "type")]
        event_type: String,
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Defaults to the academic year of the date.
        #[arg(long)]
        year: Option<String>,
        /// Defaults to the event type's default value.
        #[arg(long, allow_hyphen_values = true)]
        value: Option<f64>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    List(FilterArgs),
    Delete {
        id: String,
    },
    /// Delete every log; staff and event types are kept.
    Clear,
}

#[derive(Debug, Subcommand)]
enum YearCommand {
    /// Academic years with their record counts, newest first.
    List,
    /// Years offered for new entries.
    Options,
    /// Delete every log of one academic year.
    Delete { year: String },
}

#[derive(Debug, Subcommand)]
enum ReportCommand {
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Year {
        year: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Staff id, or `all`.
    #[arg(long, default_value = ALL_STAFF)]
    staff: String,
}

impl FilterArgs {
    fn filter(&self) -> StaffFilter {
        StaffFilter::from_selection(&self.staff)
    }
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Write the report into this directory instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    init_logging_from_config(&config)?;

    match cli.command {
        Command::Ping => {
            println!("stafftrack_core ping={}", stafftrack_core::ping());
            return Ok(());
        }
        Command::Version => {
            println!("stafftrack_core version={}", stafftrack_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("cannot create `{}`: {err}", parent.display()))?;
    }
    let conn = open_db(&config.db_path).map_err(|err| {
        error!("event=cli_open module=cli status=error error={err}");
        format!("cannot open `{}`: {err}", config.db_path.display())
    })?;
    let mut service = StaffTrackService::open(DataStore::new(SqliteBlobStore::new(&conn)));

    match cli.command {
        Command::Ping | Command::Version => Ok(()),
        Command::Staff(command) => run_staff(&mut service, command),
        Command::Types(command) => run_types(&mut service, command),
        Command::Log(command) => run_log(&mut service, command),
        Command::Years(command) => {
            run_years(&mut service, command);
            Ok(())
        }
        Command::Totals(args) => {
            for total in service.staff_totals(&args.filter()) {
                println!(
                    "{:<36}  {:<24}  {:>8}  logs={}",
                    total.staff.id,
                    total.staff.name,
                    format_impact(total.total_score),
                    total.log_count
                );
            }
            Ok(())
        }
        Command::Report(command) => run_report(&service, command),
        Command::Summary { staff_id } => run_summary(&service, &config, &staff_id),
    }
}

type Service<'conn> = StaffTrackService<SqliteBlobStore<'conn>>;

fn run_staff(service: &mut Service<'_>, command: StaffCommand) -> Result<(), String> {
    match command {
        StaffCommand::List => {
            for staff in &service.data().staff {
                println!("{:<36}  {}", staff.id, staff.name);
            }
        }
        StaffCommand::Add { name } => {
            let staff = service.add_staff(&name).map_err(|err| err.to_string())?;
            println!("{}", staff.id);
        }
        StaffCommand::Rename { id, name } => {
            service
                .rename_staff(&id, &name)
                .map_err(|err| err.to_string())?;
        }
        StaffCommand::Delete { id } => service.delete_staff(&id),
    }
    Ok(())
}

fn run_types(service: &mut Service<'_>, command: TypeCommand) -> Result<(), String> {
    match command {
        TypeCommand::List => {
            for kind in &service.data().event_types {
                println!(
                    "{:<36}  {:<20}  {:>6}  {}  {}",
                    kind.id,
                    kind.name,
                    format_impact(kind.default_value),
                    kind.color,
                    kind.description
                );
            }
        }
        TypeCommand::Add {
            name,
            default_value,
            description,
            color,
        } => {
            let kind = service
                .add_event_type(NewEventType {
                    name,
                    description,
                    default_value,
                    color,
                })
                .map_err(|err| err.to_string())?;
            println!("{}", kind.id);
        }
        TypeCommand::Delete { id } => service.delete_event_type(&id),
    }
    Ok(())
}

fn run_log(service: &mut Service<'_>, command: LogCommand) -> Result<(), String> {
    match command {
        LogCommand::Add {
            staff,
            event_type,
            date,
            year,
            value,
            notes,
        } => {
            let log = service
                .log_event(NewEventLog {
                    staff_id: staff,
                    event_type_id: event_type,
                    date,
                    academic_year: year,
                    value,
                    notes,
                })
                .map_err(|err| err.to_string())?;
            println!("{}", log.id);
        }
        LogCommand::List(args) => {
            let rows = service.log_rows(&args.filter());
            println!("{} records found", rows.len());
            for row in rows {
                let year = if row.log.academic_year.is_empty() {
                    "-"
                } else {
                    row.log.academic_year.as_str()
                };
                let notes = if row.log.notes.is_empty() {
                    "-"
                } else {
                    row.log.notes.as_str()
                };
                println!(
                    "{:<36}  {}  {:<7}  {:<20}  {:<16}  {:>6}  {}",
                    row.log.id,
                    row.log.date,
                    year,
                    row.staff_name,
                    row.event_type_name,
                    format_impact(row.log.value),
                    notes
                );
            }
        }
        LogCommand::Delete { id } => service.delete_log(&id),
        LogCommand::Clear => service.clear_all_logs(),
    }
    Ok(())
}

fn run_years(service: &mut Service<'_>, command: YearCommand) {
    match command {
        YearCommand::List => {
            let groups = service.year_groups();
            if groups.is_empty() {
                println!("No data stored.");
            }
            for (year, logs) in groups.iter() {
                println!("Academic Year {year}: {} records found", logs.len());
            }
        }
        YearCommand::Options => {
            for year in academic_year_options(Local::now().year()) {
                println!("{year}");
            }
        }
        YearCommand::Delete { year } => service.delete_logs_by_year(&year),
    }
}

fn run_summary(service: &Service<'_>, config: &AppConfig, staff_id: &str) -> Result<(), String> {
    let client = GeminiClient::from_config(config).map_err(|err| err.to_string())?;
    let client = client.as_ref().map(|client| client as &dyn SummaryClient);
    let summary = service
        .staff_summary(client, staff_id)
        .ok_or_else(|| format!("unknown staff id `{staff_id}`"))?;
    println!("{summary}");
    Ok(())
}

fn run_report(service: &Service<'_>, command: ReportCommand) -> Result<(), String> {
    let today = Local::now().date_naive();
    let (table, output) = match command {
        ReportCommand::Dashboard { filter, output } => {
            (service.dashboard_report(&filter.filter(), today), output)
        }
        ReportCommand::Year { year, output } => (service.year_report(&year, today), output),
    };

    match output.out {
        None => {
            print!("{}", TextTableRenderer.render_string(&table));
            Ok(())
        }
        Some(dir) => {
            let result = export_report(&TextTableRenderer, &table, &dir);
            if result.ok {
                println!("{}", result.message);
                Ok(())
            } else {
                Err(result.message)
            }
        }
    }
}
