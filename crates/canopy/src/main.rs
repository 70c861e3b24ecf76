//! Command-line interface for exercising canopy back-office search.
//!
//! Loads a JSON file of value sets into in-memory indexes, runs one search
//! against them, and prints the page as a table or JSON. Useful for trying
//! field configurations and queries without a host application.

use std::{
    error::Error,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use canopy_config::{Config, load_config_file};
use canopy_index::{
    BackOfficeSearcher, BackOfficeUser, CATEGORY_MEMBER, EntityKind, INTERNAL_INDEX, IndexManager,
    MEMBERS_INDEX, PATH_VALUE, SearchRequest, SearchResults, StaticStartNodes, ValueSet,
};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use tracing_subscriber::EnvFilter;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Back-office entity search over in-memory indexes")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported `canopy` subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Index a value-set file in memory and search it
    Search {
        /// Free-text query (may be empty to list the category)
        #[arg(default_value = "")]
        query: String,

        /// JSON file containing an array of value sets
        #[arg(short = 'f', long)]
        file: PathBuf,

        /// Entity kind to search
        #[arg(short = 'e', long, value_enum, default_value_t = EntityArg::Document)]
        entity: EntityArg,

        /// Hits per page
        #[arg(long, default_value = "100")]
        page_size: usize,

        /// Zero-based page index
        #[arg(long, default_value = "0")]
        page: u64,

        /// Narrow to a subtree (node id) or member type alias
        #[arg(long)]
        from: Option<String>,

        /// Search as a user restricted to these start nodes (repeatable)
        #[arg(long = "start-node")]
        start_nodes: Vec<i64>,

        /// Skip the simulated user's start-node restrictions
        #[arg(long)]
        ignore_start_nodes: bool,

        /// Configuration file (TOML); defaults apply when omitted
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the effective field configuration
    Fields {
        /// Configuration file (TOML); defaults apply when omitted
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

/// Entity kinds the CLI can search.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum EntityArg {
    /// Content documents.
    Document,
    /// Media items.
    Media,
    /// Member accounts.
    Member,
}

impl From<EntityArg> for EntityKind {
    fn from(entity: EntityArg) -> Self {
        match entity {
            EntityArg::Document => Self::Document,
            EntityArg::Media => Self::Media,
            EntityArg::Member => Self::Member,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed command.
fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Search {
            query,
            file,
            entity,
            page_size,
            page,
            from,
            start_nodes,
            ignore_start_nodes,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let sets = load_value_sets(&file)?;
            let results = search(
                &config,
                &sets,
                &query,
                entity.into(),
                page_size,
                page,
                from,
                &start_nodes,
                ignore_start_nodes,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&results);
            }
            Ok(())
        }
        Commands::Fields { config } => {
            let config = load_config(config.as_deref())?;
            print_fields(&config);
            Ok(())
        }
    }
}

/// Loads the configuration file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => Ok(load_config_file(path)?),
        None => Ok(Config::default()),
    }
}

/// Reads an array of value sets from a JSON file.
fn load_value_sets(path: &Path) -> Result<Vec<ValueSet>, Box<dyn Error>> {
    let file =
        File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let sets: Vec<ValueSet> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
    Ok(sets)
}

/// Indexes the value sets and runs one search over them.
#[allow(clippy::too_many_arguments)]
fn search(
    config: &Config,
    sets: &[ValueSet],
    query: &str,
    entity: EntityKind,
    page_size: usize,
    page_index: u64,
    search_from: Option<String>,
    start_nodes: &[i64],
    ignore_start_nodes: bool,
) -> Result<SearchResults, Box<dyn Error>> {
    let manager = IndexManager::with_default_indexes(config.clone())?;

    let mut internal = manager.writer(INTERNAL_INDEX)?;
    let mut members = manager.writer(MEMBERS_INDEX)?;
    for set in sets {
        if set.category.as_deref() == Some(CATEGORY_MEMBER) {
            members.apply(set)?;
        } else {
            internal.apply(set)?;
        }
    }
    internal.commit()?;
    members.commit()?;
    drop(internal);
    drop(members);

    let provider = build_provider(sets, start_nodes);
    let user = (!start_nodes.is_empty()).then(|| BackOfficeUser::new(0, "cli"));

    let searcher = BackOfficeSearcher::new(Arc::new(manager), Arc::new(provider));

    let mut request = SearchRequest::new(query, entity);
    request.page_size = page_size;
    request.page_index = page_index;
    request.search_from = search_from;
    request.ignore_user_start_nodes = ignore_start_nodes;

    Ok(searcher.search(&request, user.as_ref())?)
}

/// Builds a start-node provider from the indexed value sets.
///
/// Node paths come from each set's `path` value; the simulated user gets the
/// requested start nodes for both content and media.
fn build_provider(sets: &[ValueSet], start_nodes: &[i64]) -> StaticStartNodes {
    let mut provider = StaticStartNodes::new();

    for set in sets {
        let Ok(id) = set.id.parse::<i64>() else {
            continue;
        };
        if let Some(path) = set.first_text(PATH_VALUE) {
            provider.set_path(id, path);
        }
    }

    if !start_nodes.is_empty() {
        provider.set_content_start_ids(0, start_nodes.to_vec());
        provider.set_media_start_ids(0, start_nodes.to_vec());
    }

    provider
}

/// Prints a result page as a table.
fn print_results(results: &SearchResults) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["Id", "Name", "Category", "Type", "Path", "Score"]);

    for hit in results {
        table.add_row([
            hit.id.clone(),
            hit.first_value("name").unwrap_or("").to_string(),
            hit.category.clone(),
            hit.item_type.clone(),
            hit.path.clone(),
            format!("{:.3}", hit.score),
        ]);
    }

    println!("{table}");
    println!("total: {}", results.total);
}

/// Prints the effective field configuration as a table.
fn print_fields(config: &Config) {
    let fields = &config.fields;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["Category", "Searched", "Loaded"]);

    for (name, category) in [
        ("document", &fields.document),
        ("media", &fields.media),
        ("member", &fields.member),
    ] {
        table.add_row([
            name.to_string(),
            fields.search_fields(category).join(", "),
            category.load.join(", "),
        ]);
    }

    println!("{table}");
}
