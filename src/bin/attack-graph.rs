//! attack-graph CLI: clean mentions, render figures, explore interactively.
//!
//! Usage:
//!   attack-graph clean [--mentions path] [--aliases path] [--out-dir dir] [--store db]
//!   attack-graph render [--out figure.json]
//!   attack-graph explore [--store db] [--build version] < events.jsonl
//!   attack-graph builds [--store db]

use attack_graph::config::AppConfig;
use attack_graph::explorer::{run_session, Explorer};
use attack_graph::graph::GraphRuntime;
use attack_graph::pipeline::{ClassifierMode, CleaningPipeline};
use attack_graph::render::render_static;
use attack_graph::storage::csv_store::{self, EDGES_FILE, MENTIONS_FILE, NODES_FILE};
use attack_graph::storage::{
    resolve_input, search_roots, ArtifactStore, BuildArtifacts, CsvStore, OpenStore, SqliteStore,
};
use attack_graph::{Error, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "attack-graph",
    version,
    about = "Sponsor to target attack graphs from political ad mentions"
)]
struct Cli {
    /// YAML config file (defaults to $ATTACK_GRAPH_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Root searched first for relative input paths
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build cleaned mentions, edges, nodes and metrics
    Clean {
        /// Labeled mentions table
        #[arg(long)]
        mentions: Option<PathBuf>,
        /// Reviewed alias map
        #[arg(long)]
        aliases: Option<PathBuf>,
        /// Directory for the CSV artifacts
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Also save the build into this SQLite store
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        build_version: Option<String>,
        /// conservative or legacy
        #[arg(long)]
        classifier: Option<ClassifierMode>,
    },
    /// Render the largest-component figure as JSON
    Render {
        /// Directory holding the edges and nodes tables
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        min_edge_mentions: Option<u64>,
        #[arg(long)]
        top_n_edges: Option<usize>,
        /// Keep every component instead of the largest
        #[arg(long)]
        all_components: bool,
    },
    /// Read JSON events from stdin and write one JSON frame per event
    Explore {
        /// Directory holding the cleaned artifacts (ignored with --store)
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Load the build from this SQLite store
        #[arg(long)]
        store: Option<PathBuf>,
        /// Stored build version; latest when omitted
        #[arg(long)]
        build: Option<String>,
        /// Harmonized ads table with spend_proxy
        #[arg(long)]
        spend: Option<PathBuf>,
    },
    /// List stored build versions
    Builds {
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },
}

fn report(err: Error) -> i32 {
    eprintln!("Error: {}", err);
    err.exit_code()
}

fn status(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => report(e),
    }
}

/// Relative output locations live under the configured data root when one is set
fn output_dir(config: &AppConfig, dir: &Path) -> PathBuf {
    match &config.paths.data_root {
        Some(root) if dir.is_relative() => root.join(dir),
        _ => dir.to_path_buf(),
    }
}

fn cmd_clean(
    config: &AppConfig,
    mentions: Option<PathBuf>,
    aliases: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    store: Option<PathBuf>,
    build_version: Option<String>,
    classifier: Option<ClassifierMode>,
) -> Result<()> {
    let roots = search_roots(config.paths.data_root.as_deref());
    let mentions_path = resolve_input(mentions.as_deref().unwrap_or(&config.paths.mentions), &roots)?;
    let aliases_path = resolve_input(aliases.as_deref().unwrap_or(&config.paths.aliases), &roots)?;
    tracing::info!(
        mentions = %mentions_path.display(),
        aliases = %aliases_path.display(),
        "resolved inputs"
    );

    let rows = csv_store::read_mentions(&mentions_path)?;
    let alias_map = csv_store::read_aliases(&aliases_path)?;

    let mut settings = config.pipeline.settings();
    if let Some(version) = build_version {
        settings.build_version = version;
    }
    if let Some(mode) = classifier {
        settings.classifier = mode;
    }
    let output = CleaningPipeline::new(settings).run(rows, &alias_map)?;

    let dir = output_dir(config, out_dir.as_deref().unwrap_or(&config.paths.out_dir));
    CsvStore::new(&dir).save_build(&output)?;
    if let Some(db) = store.or_else(|| config.paths.store.clone()) {
        SqliteStore::open(&db)?.save_build(&output)?;
        tracing::info!(store = %db.display(), "saved build");
    }

    println!(
        "Build {}: {} mentions, {} edges, {} nodes, {} warnings -> {}",
        output.build_version,
        output.mentions.len(),
        output.edges.len(),
        output.nodes.len(),
        output.warnings.len(),
        dir.display()
    );
    Ok(())
}

fn cmd_render(
    config: &AppConfig,
    artifacts: Option<PathBuf>,
    out: Option<PathBuf>,
    min_edge_mentions: Option<u64>,
    top_n_edges: Option<usize>,
    all_components: bool,
) -> Result<()> {
    let roots = search_roots(config.paths.data_root.as_deref());
    let dir = artifacts.unwrap_or_else(|| config.paths.out_dir.clone());
    let edges = csv_store::read_edges(&resolve_input(&dir.join(EDGES_FILE), &roots)?)?;
    let nodes = csv_store::read_nodes(&resolve_input(&dir.join(NODES_FILE), &roots)?)?;

    let mut options = config.static_options();
    if let Some(min) = min_edge_mentions {
        options.min_edge_mentions = min;
    }
    if let Some(n) = top_n_edges {
        options.top_n_edges = n;
    }
    if all_components {
        options.keep_largest_component = false;
    }

    let figure = render_static(&edges, &nodes, &options)?;
    let json = serde_json::to_string_pretty(&figure)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)?;
            println!("Wrote {} ({})", path.display(), figure.title);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

fn load_from_store(db: &Path, build: Option<String>) -> Result<BuildArtifacts> {
    let store = SqliteStore::open(db)?;
    let version = match build {
        Some(v) => v,
        None => store
            .latest_build()?
            .ok_or_else(|| Error::UnknownBuild("latest".to_string()))?,
    };
    store
        .load_build(&version)?
        .ok_or(Error::UnknownBuild(version))
}

fn load_from_csv(dir: &Path, roots: &[PathBuf]) -> Result<BuildArtifacts> {
    let edges = csv_store::read_edges(&resolve_input(&dir.join(EDGES_FILE), roots)?)?;
    let nodes = csv_store::read_nodes(&resolve_input(&dir.join(NODES_FILE), roots)?)?;
    let mentions = csv_store::read_cleaned_mentions(&resolve_input(&dir.join(MENTIONS_FILE), roots)?)?;
    let build_version = edges.first().map(|e| e.build_version.clone()).unwrap_or_default();
    Ok(BuildArtifacts {
        build_version,
        mentions,
        edges,
        nodes,
        ..BuildArtifacts::default()
    })
}

fn cmd_explore(
    config: &AppConfig,
    artifacts: Option<PathBuf>,
    store: Option<PathBuf>,
    build: Option<String>,
    spend: Option<PathBuf>,
) -> Result<()> {
    let roots = search_roots(config.paths.data_root.as_deref());
    let build = match store.or_else(|| config.paths.store.clone()) {
        Some(db) => load_from_store(&db, build)?,
        None => load_from_csv(&artifacts.unwrap_or_else(|| config.paths.out_dir.clone()), &roots)?,
    };
    let spend_path = resolve_input(spend.as_deref().unwrap_or(&config.paths.spend), &roots)?;
    let spend = csv_store::read_spend(&spend_path)?;
    tracing::info!(
        build = %build.build_version,
        edges = build.edges.len(),
        spend_rows = spend.len(),
        "loaded explorer inputs"
    );

    let runtime = GraphRuntime::from_tables(&build.edges, &build.nodes, &build.mentions, &spend, &config.layout);
    let mut explorer = Explorer::new(runtime, &config.explorer);
    run_session(&mut explorer, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn cmd_builds(config: &AppConfig, store: Option<PathBuf>, artifacts: Option<PathBuf>) -> Result<()> {
    let backend: Box<dyn ArtifactStore> = match store.or_else(|| config.paths.store.clone()) {
        Some(db) => Box::new(SqliteStore::open(&db)?),
        None => Box::new(CsvStore::new(output_dir(
            config,
            artifacts.as_deref().unwrap_or(&config.paths.out_dir),
        ))),
    };
    let versions = backend.list_builds()?;
    if versions.is_empty() {
        println!("No builds stored.");
        return Ok(());
    }
    for version in versions {
        println!("{}", version);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut config = match AppConfig::discover(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => std::process::exit(report(e.into())),
    };
    if cli.data_root.is_some() {
        config.paths.data_root = cli.data_root;
    }

    let code = match cli.command {
        Commands::Clean {
            mentions,
            aliases,
            out_dir,
            store,
            build_version,
            classifier,
        } => status(cmd_clean(&config, mentions, aliases, out_dir, store, build_version, classifier)),
        Commands::Render {
            artifacts,
            out,
            min_edge_mentions,
            top_n_edges,
            all_components,
        } => status(cmd_render(&config, artifacts, out, min_edge_mentions, top_n_edges, all_components)),
        Commands::Explore {
            artifacts,
            store,
            build,
            spend,
        } => status(cmd_explore(&config, artifacts, store, build, spend)),
        Commands::Builds { store, artifacts } => status(cmd_builds(&config, store, artifacts)),
    };
    std::process::exit(code);
}
