use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use job_board::config::JobBoardConfig;
use job_board::JobBoard;
use mimalloc::MiMalloc;
use modkit::HttpLayerOptions;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MODULE_NAME: &str = "job_board";
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Job board server: syncs job postings from a remote feed and serves them over HTTP
#[derive(Parser)]
#[command(name = "jobboard-server")]
#[command(about = "Job board server - syncs job postings and serves accounts over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Run one job sync and exit
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Job board server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
        Commands::Sync => sync_once(config).await,
    }
}

/// Mask the password of a DSN before it reaches logs or error messages.
fn redact_dsn(dsn: &str) -> String {
    if !dsn.contains('@') {
        return dsn.to_string();
    }
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "***".to_string(),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        bail!("Database URL not configured");
    }

    let url = Url::parse(raw)
        .map_err(|e| anyhow!("Invalid database DSN '{}': {}", redact_dsn(raw), e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

fn database_config(config: &AppConfig) -> Result<&DatabaseConfig> {
    config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("No database configuration found"))
}

/// Connect to the configured database and bring its schema up to date.
async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = database_config(config)?;
    let backend = detect_from_dsn(db_config)?;

    let mut dsn = db_config.url.trim().to_owned();
    if backend == "sqlite" {
        // Absolutize sqlite DSNs to avoid cwd issues
        dsn = absolutize_sqlite_dsn(&dsn, Path::new(&config.server.home_dir), true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if dsn == "sqlite::memory:" {
        // Every pooled connection would open its own empty in-memory database
        opts.max_connections(1);
    } else if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }

    tracing::info!("Connecting to database: {}", redact_dsn(&dsn));
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database ({backend})"))?;
    tracing::info!("Connected DB backend: {}", backend);

    JobBoard::migrate(&db).await?;
    Ok(db)
}

async fn build_module(config: &AppConfig) -> Result<JobBoard> {
    let module_cfg: JobBoardConfig = config.module_config(MODULE_NAME)?;
    let snapshot_path = config.resolve_path(&module_cfg.snapshot_path);
    let db = connect_database(config).await?;
    JobBoard::with_database(db, &module_cfg, snapshot_path)
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");
    let module = build_module(&config).await?;

    // Serving starts right away; the first sync runs alongside
    if let Some(handle) = module.spawn_startup_sync() {
        tokio::spawn(async move {
            match handle.await {
                Ok(outcome) => tracing::info!(%outcome, "startup sync finished"),
                Err(e) => tracing::error!(error = %e, "startup sync task failed"),
            }
        });
    }

    let layer_opts = HttpLayerOptions {
        timeout: (config.server.timeout_sec > 0)
            .then(|| Duration::from_secs(config.server.timeout_sec)),
        cors_enabled: config.server.cors_enabled,
        body_limit_bytes: BODY_LIMIT_BYTES,
    };
    let app = modkit::apply_global_layers(module.router(), &layer_opts);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "shutdown signal handler failed");
            }
            tracing::info!("Shutdown signal received, draining connections");
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("Job board server stopped");
    Ok(())
}

async fn sync_once(config: AppConfig) -> Result<()> {
    let module = build_module(&config).await?;
    let outcome = module.sync().run().await;
    println!("Sync finished: {outcome}");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    detect_from_dsn(database_config(&config)?)?;
    let module_cfg: JobBoardConfig = config.module_config(MODULE_NAME)?;
    if let Some(source_url) = module_cfg.source_url.as_deref().filter(|s| !s.trim().is_empty()) {
        Url::parse(source_url.trim())
            .with_context(|| format!("Invalid modules.{MODULE_NAME}.source_url '{source_url}'"))?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
