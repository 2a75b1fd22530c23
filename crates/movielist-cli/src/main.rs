//! movielist - movie catalog search and favorites CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use movielist_api::catalog::{CatalogClient, LocalCatalogApi, MovieDetail, MovieSummary};
use movielist_api::search::{SearchOutcome, SearchResultAccumulator};
use movielist_store::{AddOutcome, ToggleOutcome, open_favorites};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Override the catalog base URL from config.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search the movie catalog.
    Search(SearchArgs),
    /// Show details of one movie.
    Detail(IdArgs),
    /// Manage favorite movies.
    Favorites(FavoritesCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query. Empty uses the configured default term.
    #[arg(long, default_value = "")]
    query: String,

    /// Number of result pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
}

/// Movie id argument shared by several subcommands.
#[derive(clap::Args)]
struct IdArgs {
    /// IMDb id (e.g. "tt0107290").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List saved favorites.
    List,
    /// Fetch a movie and add it to favorites.
    Add(IdArgs),
    /// Remove a movie from favorites.
    Remove(IdArgs),
    /// Add the movie if it is not a favorite, remove it otherwise.
    Toggle(IdArgs),
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a default config file if none exists.
    Init,
    /// Print the effective config.
    Show,
}

/// Loads `config.toml` from `dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `CatalogClient` from config, with an optional base URL override.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(config: &AppConfig, base_url: Option<&str>) -> Result<CatalogClient> {
    let mut builder = CatalogClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.upstream.timeout())
        .min_interval(config.upstream.min_interval());

    if let Some(raw) = base_url.or(config.upstream.base_url.as_deref()) {
        let url = Url::parse(raw).with_context(|| format!("invalid base URL: {raw}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build catalog client")
}

/// Fetches a movie detail record.
async fn fetch_detail(client: &CatalogClient, id: &str) -> Result<MovieDetail> {
    client
        .movie_detail(id)
        .await
        .with_context(|| format!("failed to fetch movie detail for {id}"))
}

/// Logs one movie as a table row.
fn log_movie_row(movie: &MovieSummary) {
    tracing::info!(
        "{}\t{}\t{}\t{}",
        if movie.is_favorite() { "*" } else { "-" },
        movie.id,
        movie.year,
        movie.title,
    );
    tracing::info!("\t\tposter: {}", movie.poster_or_placeholder());
}

/// Runs the `search` subcommand.
///
/// A failure while loading later pages keeps the pages already loaded.
///
/// # Errors
///
/// Returns an error if the client fails to build or the first page fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>, base_url: Option<&str>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;
    let favorites = open_favorites(dir).context("failed to open favorites")?;

    let mut search =
        SearchResultAccumulator::with_default_term(client, config.search.default_term);
    search
        .reset(&args.query)
        .await
        .context("search request failed")?;

    let mut loaded_pages = 1u32;
    while loaded_pages < args.pages {
        match search.load_more().await {
            Ok(SearchOutcome::Loaded { .. }) => loaded_pages = loaded_pages.saturating_add(1),
            Ok(SearchOutcome::Exhausted) => break,
            Err(e) => {
                tracing::warn!("Failed to load more results: {e:#}");
                break;
            }
        }
    }

    let mut items = search.items().to_vec();
    favorites.annotate(&mut items);

    tracing::info!("Results for \"{}\":", search.term());
    tracing::info!("Fav\tID\t\tYear\tTitle");
    for movie in &items {
        log_movie_row(movie);
    }
    tracing::info!("Showing {} of {}", items.len(), search.total_available());
    if search.has_more() {
        tracing::info!(
            "More results available (use --pages {})",
            search.page().saturating_add(1)
        );
    }

    Ok(())
}

/// Runs the `detail` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_detail(args: &IdArgs, dir: Option<&PathBuf>, base_url: Option<&str>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;
    let favorites = open_favorites(dir).context("failed to open favorites")?;

    let detail = fetch_detail(&client, &args.id).await?;

    tracing::info!("{} ({})", detail.title, detail.year);
    tracing::info!("ID: {}", detail.id);
    tracing::info!("Rated: {}", detail.rated);
    tracing::info!("Released: {}", detail.released);
    tracing::info!("Runtime: {}", detail.runtime);
    tracing::info!("Genre: {}", detail.genre);
    tracing::info!("Director: {}", detail.director);
    tracing::info!("Writer: {}", detail.writer);
    tracing::info!("Actors: {}", detail.actors);
    tracing::info!("Language: {}", detail.language);
    tracing::info!("Country: {}", detail.country);
    tracing::info!("Awards: {}", detail.awards);
    tracing::info!(
        "Rating: {} ({} votes), Metascore: {}",
        detail.imdb_rating,
        detail.imdb_votes,
        detail.metascore
    );
    tracing::info!("Poster: {}", detail.poster_or_placeholder());
    tracing::info!("---");
    tracing::info!("{}", detail.plot);
    tracing::info!("---");
    if favorites.contains(&detail.id) {
        tracing::info!("In favorites");
    } else {
        tracing::info!("Not in favorites");
    }

    Ok(())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites path cannot be resolved.
#[instrument(skip_all)]
fn run_favorites_list(dir: Option<&PathBuf>) -> Result<()> {
    let favorites = open_favorites(dir).context("failed to open favorites")?;

    if favorites.is_empty() {
        tracing::info!("No favorites saved yet. Run `favorites add --id <ID>` to add one.");
        return Ok(());
    }

    tracing::info!("Fav\tID\t\tYear\tTitle");
    for movie in favorites.list() {
        log_movie_row(movie);
    }
    tracing::info!("Total: {} favorites", favorites.len());

    Ok(())
}

/// Runs the `favorites add` subcommand.
///
/// # Errors
///
/// Returns an error if the detail request or the favorites write fails.
#[instrument(skip_all)]
async fn run_favorites_add(
    args: &IdArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let mut favorites = open_favorites(dir).context("failed to open favorites")?;
    if favorites.contains(&args.id) {
        tracing::info!("{} is already in favorites", args.id);
        return Ok(());
    }

    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;
    let detail = fetch_detail(&client, &args.id).await?;

    match favorites
        .add(detail.to_summary())
        .context("failed to add favorite")?
    {
        AddOutcome::Added => tracing::info!("Added \"{}\" to favorites", detail.title),
        AddOutcome::Duplicate => tracing::info!("{} is already in favorites", detail.id),
    }

    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites write fails.
#[instrument(skip_all)]
fn run_favorites_remove(args: &IdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut favorites = open_favorites(dir).context("failed to open favorites")?;

    if favorites
        .remove(&args.id)
        .context("failed to remove favorite")?
    {
        tracing::info!("Removed {} from favorites", args.id);
    } else {
        tracing::info!("{} is not in favorites", args.id);
    }

    Ok(())
}

/// Runs the `favorites toggle` subcommand.
///
/// # Errors
///
/// Returns an error if the detail request or the favorites write fails.
#[instrument(skip_all)]
async fn run_favorites_toggle(
    args: &IdArgs,
    dir: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config, base_url)?;
    let mut favorites = open_favorites(dir).context("failed to open favorites")?;

    let detail = fetch_detail(&client, &args.id).await?;

    match favorites
        .toggle(detail.to_summary())
        .context("failed to update favorites")?
    {
        ToggleOutcome::Added => tracing::info!("Added \"{}\" to favorites", detail.title),
        ToggleOutcome::Removed => tracing::info!("Removed \"{}\" from favorites", detail.title),
    }

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
#[instrument(skip_all)]
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() {
        tracing::info!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());

    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let rendered = toml::to_string_pretty(&config).context("failed to serialize config")?;
    for line in rendered.lines() {
        tracing::info!("{line}");
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    let base_url = cli.base_url.as_deref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir, base_url).await,
        Commands::Detail(args) => run_detail(&args, dir, base_url).await,
        Commands::Favorites(fav) => match fav.command {
            FavoritesSubcommands::List => run_favorites_list(dir),
            FavoritesSubcommands::Add(args) => run_favorites_add(&args, dir, base_url).await,
            FavoritesSubcommands::Remove(args) => run_favorites_remove(&args, dir),
            FavoritesSubcommands::Toggle(args) => {
                run_favorites_toggle(&args, dir, base_url).await
            }
        },
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Init => run_config_init(dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}
