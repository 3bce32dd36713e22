//! `wordcards` executable.
//!
//! # Responsibility
//! - Load `.env`, parse CLI/env configuration, initialize logging.
//! - Dispatch to `serve`, `migrate` or `version`.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use wordcards_core::db::migrations::{current_user_version, latest_version};
use wordcards_core::{default_log_level, init_logging, open_db};
use wordcards_server::config::{DEFAULT_BIND_ADDR, DEFAULT_DB_POOL_SIZE, DEFAULT_HTTP_WORKERS};
use wordcards_server::ServerConfig;

#[derive(Debug, Parser)]
#[command(name = "wordcards", version, about = "Flashcard study backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Apply pending schema migrations and exit.
    Migrate(DbArgs),
    /// Print core linkage and version.
    Version,
}

#[derive(Debug, Args)]
struct DbArgs {
    /// SQLite database file.
    #[arg(long, env = "DATABASE_PATH", default_value = "wordcards.db")]
    database_path: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode).
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files (defaults to `./logs`).
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[command(flatten)]
    db: DbArgs,

    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind_addr: String,

    /// HS256 signing secret for session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Session token lifetime in seconds.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = 24 * 60 * 60)]
    token_ttl_secs: u64,

    #[arg(long, env = "HTTP_WORKERS", default_value_t = DEFAULT_HTTP_WORKERS)]
    http_workers: usize,

    #[arg(long, env = "DB_POOL_SIZE", default_value_t = DEFAULT_DB_POOL_SIZE)]
    db_pool_size: usize,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind_addr,
            database_path: self.db.database_path,
            jwt_secret: self.jwt_secret,
            token_ttl: Duration::from_secs(self.token_ttl_secs),
            http_workers: self.http_workers,
            db_pool_size: self.db_pool_size,
        }
    }
}

fn main() -> ExitCode {
    // A missing .env is normal; real environment variables still apply.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve(args) => serve(args),
        Command::Migrate(args) => migrate(&args),
        Command::Version => {
            println!("wordcards_core ping={}", wordcards_core::ping());
            println!("wordcards_core version={}", wordcards_core::core_version());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("wordcards: {message}");
            ExitCode::FAILURE
        }
    }
}

fn serve(args: ServeArgs) -> Result<(), String> {
    start_logging(&args.db)?;
    let config = args.into_config();
    config.validate().map_err(|err| err.to_string())?;

    actix_web::rt::System::new()
        .block_on(wordcards_server::run(config))
        .map_err(|err| format!("server stopped: {err}"))
}

fn migrate(args: &DbArgs) -> Result<(), String> {
    start_logging(args)?;
    let conn = open_db(&args.database_path).map_err(|err| err.to_string())?;
    let version = current_user_version(&conn).map_err(|err| err.to_string())?;
    info!(
        "event=migrate module=cli status=ok version={version} latest={}",
        latest_version()
    );
    println!(
        "{} at schema version {version}",
        args.database_path.display()
    );
    Ok(())
}

fn start_logging(args: &DbArgs) -> Result<(), String> {
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = match &args.log_dir {
        Some(dir) => absolute(dir)?,
        None => absolute(Path::new("logs"))?,
    };
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| format!("log directory is not valid UTF-8: {}", log_dir.display()))?
        .to_string();
    init_logging(level, &log_dir)
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| format!("cannot resolve current directory: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn serve_arguments_build_a_valid_config() {
        let cli = Cli::try_parse_from([
            "wordcards",
            "serve",
            "--jwt-secret",
            "s3cret",
            "--database-path",
            "/tmp/cards.db",
            "--token-ttl-secs",
            "60",
        ])
        .expect("arguments should parse");

        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        let config = args.into_config();
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.database_path.to_str(), Some("/tmp/cards.db"));
        config.validate().expect("config should validate");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
