//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `roster_core` linkage with deterministic output.
//! - Optionally open a roster database and report how many records are active.
//!
//! Usage: `roster_cli [db_path]`. Core logs go to `$ROSTER_LOG_DIR`, or to a
//! `roster-logs` directory under the system temp dir when it is unset.

use roster_core::db::open_db;
use roster_core::{PageRequest, SqliteStudentRepository, StudentService};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "ROSTER_LOG_DIR";

fn main() -> ExitCode {
    println!("roster_core ping={}", roster_core::ping());
    println!("roster_core version={}", roster_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let log_dir = resolve_log_dir(std::env::var(LOG_DIR_ENV).ok().as_deref());
    if let Err(err) = start_logging(&log_dir) {
        // No logger is running, so stderr is the only channel left.
        eprintln!("roster logging disabled: {err}");
    }

    match active_count(&db_path) {
        Ok(count) => {
            println!("roster active_students={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("roster probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Picks an absolute log directory; relative overrides resolve against the cwd.
fn resolve_log_dir(configured: Option<&str>) -> PathBuf {
    let configured = configured.map(str::trim).filter(|value| !value.is_empty());
    match configured {
        Some(value) if Path::new(value).is_absolute() => PathBuf::from(value),
        Some(value) => std::env::current_dir()
            .unwrap_or_else(|_| std::env::temp_dir())
            .join(value),
        None => std::env::temp_dir().join("roster-logs"),
    }
}

fn start_logging(log_dir: &Path) -> Result<(), String> {
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", log_dir.display()))?;
    roster_core::init_logging(roster_core::default_log_level(), log_dir)
}

fn active_count(db_path: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn)?);
    let page = service.list_active_page(&PageRequest::new(0, 1)?)?;
    Ok(page.total_items)
}
