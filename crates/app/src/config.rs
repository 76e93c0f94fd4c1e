use std::path::{Path, PathBuf};

use bda_core::model::{ExamId, Locale, Role};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

pub const DEFAULT_DB_URL: &str = "sqlite:dev.sqlite3";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },

    #[error("cannot prepare database file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "bda-portal",
    about = "BDA Portal mock exam desktop client",
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Log filter used when `BDA_LOG`/`RUST_LOG` are unset
    #[arg(long, global = true, env = "BDA_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Settings for the implicit `ui` command
    #[command(flatten)]
    pub ui: UiArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the portal window (default command)
    Ui(UiArgs),
    /// Write the built-in practice exam into the database
    Seed(SeedArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// `SQLite` URL or file path
    #[arg(long = "db", env = "BDA_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Exam opened by default and provisioned on first launch
    #[arg(long, env = "BDA_EXAM_ID", default_value_t = 1)]
    pub exam_id: u64,
}

impl DbArgs {
    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        ExamId::new(self.exam_id)
    }

    #[must_use]
    pub fn normalized_db_url(&self) -> String {
        normalize_sqlite_url(&self.db_url)
    }
}

#[derive(Args, Debug, Clone)]
pub struct UiArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Role of the signed-in user
    #[arg(long, env = "BDA_ROLE", default_value_t = Role::Individual)]
    pub role: Role,

    /// Interface language
    #[arg(long, env = "BDA_LOCALE", default_value_t = Locale::En)]
    pub locale: Locale,

    /// Name shown in the sidebar
    #[arg(long, default_value = "Member")]
    pub name: String,

    /// Shuffle question order for every run
    #[arg(long)]
    pub shuffle: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

impl Cli {
    /// The chosen subcommand, or `ui` built from the top-level flags.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Ui(self.ui))
    }
}

/// Turns `sqlite:relative.db` or a bare path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw.to_owned();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Creates the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDbUrl` for a URL without a file path, or
/// `ConfigError::Io` if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let invalid = || ConfigError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}
