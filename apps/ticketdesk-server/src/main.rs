use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use tickets::domain::repo::TicketsRepository;
use tickets::domain::service::{Service, ServiceConfig};
use tickets::infra::storage::{
    migrations::Migrator, InMemoryTicketsRepository, SeaOrmTicketsRepository,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Rewrite a sqlite file DSN so it points under `base_dir`.
///
/// In-memory DSNs pass through untouched. File paths are joined with
/// `base_dir` when relative, backslashes become forward slashes, parent
/// directories are created on demand, and a bare DSN gains `?mode=rwc` so
/// the database file appears on first run.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }

    let rest = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("expected a sqlite:// DSN, got '{}'", dsn))?;
    let (raw_path, query) = rest.split_once('?').unwrap_or((rest, "mode=rwc"));

    let path = PathBuf::from(raw_path);
    if path.as_os_str().is_empty() {
        return Err(anyhow!("sqlite DSN has an empty path"));
    }
    let path = if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    };

    if create_dirs {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    Ok(format!(
        "sqlite://{}?{}",
        path.to_string_lossy().replace('\\', "/"),
        query
    ))
}

/// Pick the backend from the DSN scheme; only the engines compiled into
/// sea-orm here are accepted.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("database.url is empty"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("unsupported database scheme '{}'", other)),
    }
}

/// TicketDesk Server - support-ticket tracking service
#[derive(Parser)]
#[command(name = "ticketdesk-server")]
#[command(about = "TicketDesk Server - support-ticket tracking service")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP port, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Dump the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Console verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run on in-memory storage, ignoring any configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate the configuration without serving
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir comes back normalized and created
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("TicketDesk Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config).await,
    }
}

async fn build_repository(config: &AppConfig, args: &CliArgs) -> Result<Arc<dyn TicketsRepository>> {
    if args.mock {
        tracing::warn!("--mock given, using in-memory storage");
        return Ok(Arc::new(InMemoryTicketsRepository::new()));
    }

    let Some(db_config) = config.database.clone() else {
        tracing::warn!("No database configuration found, using in-memory storage");
        return Ok(Arc::new(InMemoryTicketsRepository::new()));
    };

    let backend = detect_from_dsn(&db_config)?;

    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);

    let mut dsn = db_config.url.trim().to_owned();
    if dsn.starts_with("sqlite://") || dsn.eq_ignore_ascii_case("sqlite::memory:") {
        dsn = absolutize_sqlite_dsn(&dsn, &base_dir, true)?;
    }

    tracing::info!("Connecting to {} database", backend);
    let mut opts = sea_orm::ConnectOptions::new(dsn);
    opts.acquire_timeout(Duration::from_secs(5));
    if let Some(max_conns) = db_config.max_conns {
        opts.max_connections(max_conns);
    }

    let conn = Database::connect(opts).await?;
    Migrator::up(&conn, None).await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(SeaOrmTicketsRepository::new(conn)))
}

pub async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let repo = build_repository(&config, &args).await?;
    let service = Arc::new(Service::new(repo, ServiceConfig::default()));

    let mut router = tickets::api::rest::routes::api_router(service)
        .route("/healthz", axum::routing::get(health_check))
        .layer(TraceLayer::new_for_http());
    if config.server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout_sec)));
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            anyhow!(
                "Invalid bind address '{}:{}': {}",
                config.server.host,
                config.server.port,
                e
            )
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!(e))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("HTTP server shutting down gracefully");
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db_config) = &config.database {
        detect_from_dsn(db_config)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_memory_dsn_is_kept() {
        let out = absolutize_sqlite_dsn("sqlite::memory:", Path::new("/base"), false).unwrap();
        assert_eq!(out, "sqlite::memory:");
        let out = absolutize_sqlite_dsn("sqlite://:memory:", Path::new("/base"), false).unwrap();
        assert_eq!(out, "sqlite::memory:");
    }

    #[test]
    fn relative_sqlite_path_is_absolutized_with_create_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let out = absolutize_sqlite_dsn("sqlite://database/app.db", tmp.path(), true).unwrap();
        assert!(out.starts_with("sqlite://"));
        assert!(out.contains("database/app.db"));
        assert!(out.ends_with("?mode=rwc"));
        assert!(tmp.path().join("database").exists());
    }

    #[test]
    fn explicit_query_is_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        let out =
            absolutize_sqlite_dsn("sqlite://app.db?mode=ro", tmp.path(), false).unwrap();
        assert!(out.ends_with("?mode=ro"));
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let cfg = DatabaseConfig {
            url: "mysql://localhost/db".to_string(),
            max_conns: None,
        };
        assert!(detect_from_dsn(&cfg).is_err());

        let cfg = DatabaseConfig {
            url: "postgres://localhost/db".to_string(),
            max_conns: None,
        };
        assert_eq!(detect_from_dsn(&cfg).unwrap(), "postgres");
    }
}
