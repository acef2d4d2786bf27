//! thesaur-search: command-line access to a SKOS thesaurus.
//!
//! Searches concepts and loads concepts, schemes, groups and collections
//! from a SPARQL endpoint. Results are printed as JSON on stdout; logs go
//! to stderr or to `LOG_FILE`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use thesaur_core::{logging, Entity, SearchQuery, SortCriterion, ThesaurConfig};
use thesaur_search::{CollatorCache, ConceptSearch, ConceptSearchEngine, LabelSorter};
use thesaur_store::{SkosRepository, SparqlHttpStore};
use tracing::{info, info_span, Instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "thesaur-search")]
#[command(author, version, about = "Search and browse a SKOS thesaurus")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: $THESAUR_CONFIG or ~/.config/thesaur/thesaur.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SPARQL endpoint, overriding the config
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search concepts by label
    Search {
        /// Free text; every term must appear, in order
        text: String,

        /// Index of the first result
        #[arg(short, long, default_value_t = 0)]
        offset: i64,

        /// Results per page (default: from config)
        #[arg(short, long)]
        page_size: Option<i64>,

        /// Sort key as field[:asc|desc], e.g. scheme_title:desc (repeatable)
        #[arg(short, long = "sort")]
        sort: Vec<SortCriterion>,
    },

    /// Show a concept with its broader, narrower and related concepts
    Concept {
        uri: String,
    },

    /// Show a concept scheme with its top concepts
    Scheme {
        uri: String,
    },

    /// List all concept schemes
    Schemes,

    /// Show a concept group
    Group {
        uri: String,
    },

    /// List the concept groups of a scheme
    Groups {
        scheme_uri: String,
    },

    /// Show a collection and its members
    Collection {
        uri: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _file_guard = init_logging();

    let mut config = match &cli.config {
        Some(path) => ThesaurConfig::from_file(path)?,
        None => ThesaurConfig::load()?,
    };
    if let Some(endpoint) = cli.endpoint.clone() {
        config.store.endpoint = endpoint;
    }
    config.validate().context("invalid configuration")?;

    let request_id = Uuid::now_v7();
    let span = info_span!("request", { logging::REQUEST_ID } = %request_id, subsystem = "cli");
    run(cli.command, &config).instrument(span).await
}

/// Initialize tracing.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, daily rotation)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "warn,thesaur_search=info")
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,thesaur_search=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let file_name = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("thesaur-search.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // stdout carries the JSON output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

async fn run(command: Commands, config: &ThesaurConfig) -> anyhow::Result<()> {
    let store = SparqlHttpStore::from_config(&config.store)?;
    let languages = &config.search.languages;
    let collators = CollatorCache::new(config.collation.cache_size);
    let sorter = LabelSorter::new(&collators, languages);

    match command {
        Commands::Search {
            text,
            offset,
            page_size,
            sort,
        } => {
            let engine = ConceptSearchEngine::from_config(store, config)?;
            let mut query = SearchQuery::new(text)
                .with_offset(offset)
                .with_page_size(page_size.unwrap_or(config.search.default_page_size));
            for criterion in sort {
                query = query.sort_by(criterion);
            }
            let page = engine.search(&query).await?;
            print_json(&page)?;
        }
        Commands::Concept { uri } => {
            let repo = SkosRepository::new(store).with_timeout(config.store.timeout());
            let mut concept = repo.concept(&uri).await?;
            for linked in [&mut concept.broader, &mut concept.narrower, &mut concept.related] {
                sorter.sort_by_label(linked, |c| c.label(languages))?;
            }
            let label = concept.label(languages);
            print_json(&serde_json::json!({
                "label": label,
                "pref_labels": sorter.sorted(concept.pref_labels())?,
                "alt_labels": sorter.sorted(concept.alt_labels())?,
                "hidden_labels": sorter.sorted(concept.hidden_labels())?,
                "concept": concept,
            }))?;
        }
        Commands::Scheme { uri } => {
            let repo = SkosRepository::new(store).with_timeout(config.store.timeout());
            let mut scheme = repo.scheme(&uri).await?;
            sorter.sort_by_label(&mut scheme.top_concepts, |c| c.label(languages))?;
            print_json(&scheme)?;
        }
        Commands::Schemes => {
            let repo = SkosRepository::new(store).with_timeout(config.store.timeout());
            let mut schemes = repo.schemes().await?;
            sorter.sort_by_label(&mut schemes, |s| s.label(languages))?;
            let listing: Vec<_> = schemes
                .iter()
                .map(|s| serde_json::json!({ "uri": s.uri(), "label": s.label(languages) }))
                .collect();
            print_json(&listing)?;
        }
        Commands::Group { uri } => {
            let repo = SkosRepository::new(store).with_timeout(config.store.timeout());
            let group = repo.group(&uri).await?;
            print_json(&group)?;
        }
        Commands::Groups { scheme_uri } => {
            let repo = SkosRepository::new(store).with_timeout(config.store.timeout());
            let mut groups = repo.groups(&scheme_uri).await?;
            sorter.sort_by_label(&mut groups, |g| g.label(languages))?;
            print_json(&groups)?;
        }
        Commands::Collection { uri } => {
            let repo = SkosRepository::new(store).with_timeout(config.store.timeout());
            let collection = repo.collection(&uri).await?;
            print_json(&collection)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
