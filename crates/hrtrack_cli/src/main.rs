//! Administration entry point over `hrtrack_core`.
//!
//! # Responsibility
//! - Bootstrap a store and report its schema version.
//! - Print row counts for every entity table.
//! - Keep output deterministic `key=value` lines for scripted checks.

use anyhow::Context;
use clap::{Parser, Subcommand};
use hrtrack_core::db::migrations::{current_user_version, latest_version};
use hrtrack_core::db::open_db;
use hrtrack_core::repo::application_repo::SqliteApplicationRepository;
use hrtrack_core::repo::application_status_repo::SqliteApplicationStatusRepository;
use hrtrack_core::repo::campaign_job_posting_repo::SqliteCampaignJobPostingRepository;
use hrtrack_core::repo::candidate_repo::SqliteCandidateRepository;
use hrtrack_core::repo::department_repo::SqliteDepartmentRepository;
use hrtrack_core::repo::email_log_repo::SqliteEmailLogRepository;
use hrtrack_core::repo::employee_repo::SqliteEmployeeRepository;
use hrtrack_core::repo::headcount_repo::SqliteHeadcountRepository;
use hrtrack_core::repo::interview_repo::SqliteInterviewRepository;
use hrtrack_core::repo::job_posting_repo::SqliteJobPostingRepository;
use hrtrack_core::repo::position_repo::SqlitePositionRepository;
use hrtrack_core::repo::recruitment_campaign_repo::SqliteRecruitmentCampaignRepository;
use hrtrack_core::repo::user_repo::SqliteUserRepository;
use hrtrack_core::{core_version, init_logging, Entity, RepoResult, Repository, Store, StoreConfig};
use log::info;
use std::path::PathBuf;

/// Inspect an HR recruitment database.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file; overrides `HRTRACK_DATABASE_PATH`.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or migrate the database and print its schema version.
    Schema,
    /// Print the number of rows in every entity table.
    Counts,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.database)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let store = Store::from_config(&config);
    match cli.command {
        Commands::Schema => print_schema(&store),
        Commands::Counts => print_counts(&store),
    }
}

fn load_config(database: Option<PathBuf>) -> anyhow::Result<StoreConfig> {
    match database {
        Some(path) => Ok(StoreConfig::new(path)),
        None => StoreConfig::from_env().context("database path not configured"),
    }
}

fn print_schema(store: &Store) -> anyhow::Result<()> {
    let conn = open_db(store.path())
        .with_context(|| format!("failed to open {}", store.path().display()))?;
    println!("hrtrack_core version={}", core_version());
    println!("schema_version={}", current_user_version(&conn)?);
    println!("latest_supported={}", latest_version());
    Ok(())
}

fn count_of<R: Repository>(repo: R) -> RepoResult<(&'static str, i64)> {
    Ok((<R::Entity as Entity>::TABLE.name, repo.count()?))
}

fn print_counts(store: &Store) -> anyhow::Result<()> {
    let counts = [
        count_of(SqlitePositionRepository::new(store.clone()))?,
        count_of(SqliteDepartmentRepository::new(store.clone()))?,
        count_of(SqliteEmployeeRepository::new(store.clone()))?,
        count_of(SqliteUserRepository::new(store.clone()))?,
        count_of(SqliteCandidateRepository::new(store.clone()))?,
        count_of(SqliteRecruitmentCampaignRepository::new(store.clone()))?,
        count_of(SqliteJobPostingRepository::new(store.clone()))?,
        count_of(SqliteCampaignJobPostingRepository::new(store.clone()))?,
        count_of(SqliteApplicationRepository::new(store.clone()))?,
        count_of(SqliteApplicationStatusRepository::new(store.clone()))?,
        count_of(SqliteInterviewRepository::new(store.clone()))?,
        count_of(SqliteEmailLogRepository::new(store.clone()))?,
        count_of(SqliteHeadcountRepository::new(store.clone()))?,
    ];
    for (table, count) in counts {
        println!("{table}={count}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
