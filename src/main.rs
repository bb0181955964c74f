use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{LogFormat, LoggingSettings, Settings, load_config};
use core_types::{EntityKind, ShowView};
use database::{CatalogStore, DbRepository, InMemoryStore, connect, run_migrations, seed_demo};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use web_server::AppState;

/// The main entry point for the Fyyur catalog.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    let _log_guard = init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, &settings, cli.demo).await,
        Commands::Migrate => handle_migrate(&settings, cli.demo).await,
        Commands::Search(args) => handle_search(args, &settings, cli.demo).await,
        Commands::Shows(args) => handle_shows(args, &settings, cli.demo).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Browse and serve the venue, artist and show catalog.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `logging.format`.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Use a seeded in-memory catalog instead of PostgreSQL.
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and serve the JSON API.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
    /// Search venues or artists by name.
    Search(SearchArgs),
    /// Print the past and upcoming shows of a venue or artist.
    Shows(ShowsArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct SearchArgs {
    /// `venue` or `artist`.
    #[arg(long)]
    kind: EntityKind,

    /// Case-insensitive name fragment. Empty matches everything.
    #[arg(long, default_value = "")]
    term: String,
}

#[derive(Parser)]
struct ShowsArgs {
    /// `venue` or `artist`.
    #[arg(long)]
    kind: EntityKind,

    #[arg(long)]
    id: i32,
}

// ==============================================================================
// Logging & Store Lifecycle
// ==============================================================================

/// Installs the global subscriber. The returned guard must outlive `main` so the
/// file writer flushes on exit.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .context("parsing logging.filter")?;

    let stdout = match settings.format {
        LogFormat::Full => fmt::layer().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    let (file, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout)
        .with(file)
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(guard)
}

async fn connect_repository(settings: &Settings) -> anyhow::Result<DbRepository> {
    let url = settings.database.resolved_url()?;
    let pool = connect(
        &url,
        settings.database.max_connections,
        settings.database.acquire_timeout(),
    )
    .await
    .context("connecting to the catalog database")?;
    Ok(DbRepository::new(pool))
}

/// Opens the store every command runs against. PostgreSQL is migrated first
/// when `migrate` is set.
async fn open_store(
    settings: &Settings,
    demo: bool,
    migrate: bool,
) -> anyhow::Result<Arc<dyn CatalogStore>> {
    if demo {
        let store = InMemoryStore::new();
        seed_demo(&store, Utc::now()).await?;
        return Ok(Arc::new(store));
    }
    let repo = connect_repository(settings).await?;
    if migrate {
        run_migrations(repo.pool()).await?;
    }
    Ok(Arc::new(repo))
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_serve(args: ServeArgs, settings: &Settings, demo: bool) -> anyhow::Result<()> {
    let mut server = settings.server.clone();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }
    let addr = server.socket_addr()?;

    let store = open_store(settings, demo, true).await?;
    web_server::run_server(addr, AppState::new(store)).await
}

async fn handle_migrate(settings: &Settings, demo: bool) -> anyhow::Result<()> {
    if demo {
        tracing::warn!("The demo catalog has no migrations to apply.");
        return Ok(());
    }
    let repo = connect_repository(settings).await?;
    run_migrations(repo.pool()).await?;
    Ok(())
}

async fn handle_search(args: SearchArgs, settings: &Settings, demo: bool) -> anyhow::Result<()> {
    let store = open_store(settings, demo, false).await?;
    let results = listings::search(store.as_ref(), &args.term, args.kind).await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Name"]);
    for found in &results.results {
        table.add_row(vec![found.id.to_string(), found.name.clone()]);
    }
    println!("{table}");
    println!("{} {}(s) matched '{}'", results.count, args.kind, args.term);
    Ok(())
}

async fn handle_shows(args: ShowsArgs, settings: &Settings, demo: bool) -> anyhow::Result<()> {
    let store = open_store(settings, demo, false).await?;
    let shows = listings::partition_shows(store.as_ref(), args.id, args.kind, Utc::now()).await?;

    let counterpart = args.kind.counterpart();
    println!("Past shows ({})", shows.past.len());
    println!("{}", show_table(counterpart, &shows.past));
    println!("Upcoming shows ({})", shows.upcoming.len());
    println!("{}", show_table(counterpart, &shows.upcoming));
    Ok(())
}

fn show_table(counterpart: EntityKind, views: &[ShowView]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Start".to_string(),
        format!("{counterpart} id"),
        format!("{counterpart} name"),
    ]);
    for view in views {
        table.add_row(vec![
            view.start_time.clone(),
            view.counterpart_id.to_string(),
            view.counterpart_name.clone(),
        ]);
    }
    table
}
