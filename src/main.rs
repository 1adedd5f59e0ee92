use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use notemap::{
    Corpus, NotesConfig, RelationGraph, ScanStats, TagIndex, check_links, open_root,
    render_graph_document, render_tag_index_document, write_document,
};

#[derive(Debug, Parser)]
#[command(
    name = "notemap",
    version,
    about = "Graph, tag index and link checks for a tree of Markdown notes"
)]
struct Cli {
    /// Root directory of the notes.
    #[arg(long, env = "NOTEMAP_ROOT", global = true, default_value = ".")]
    root: PathBuf,

    /// Config file. Defaults to notemap.toml inside the root.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Regenerate the Mermaid graph of `related` links.
    Graph,
    /// Regenerate the tag / category / difficulty index.
    Tags,
    /// Report inline links whose target does not exist.
    Links,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notemap=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = open_root(&cli.root)?;
    let cfg = match &cli.config {
        Some(path) => NotesConfig::load(path)?,
        None => NotesConfig::load_for_root(&root)?,
    };

    match cli.command {
        Command::Graph => handle_graph(&root, &cfg),
        Command::Tags => handle_tags(&root, &cfg),
        Command::Links => handle_links(&root, &cfg),
    }
}

fn handle_graph(root: &Path, cfg: &NotesConfig) -> anyhow::Result<ExitCode> {
    let corpus = Corpus::scan(root, &cfg.graph)?;
    let graph = RelationGraph::build(&corpus);
    println!("✅ {} documents found", graph.nodes.len());
    print_scan_stats(&corpus.stats);

    let doc = render_graph_document(&graph, chrono::Local::now().naive_local());
    let path = write_document(root, &cfg.graph_output, &doc)?;

    println!("✅ wrote {}", path.display());
    println!("   - {} documents", graph.nodes.len());
    println!("   - {} categories", graph.categories.len());
    println!("   - {} tags", graph.tag_counts.len());
    println!("   - {} related edges", graph.edges.len());
    Ok(ExitCode::SUCCESS)
}

fn handle_tags(root: &Path, cfg: &NotesConfig) -> anyhow::Result<ExitCode> {
    let corpus = Corpus::scan(root, &cfg.tags)?;
    let index = TagIndex::build(&corpus).with_output_path(&cfg.tag_index_output);
    print_scan_stats(&corpus.stats);

    let doc = render_tag_index_document(&index, chrono::Local::now().naive_local());
    let path = write_document(root, &cfg.tag_index_output, &doc)?;

    println!("✅ wrote {}", path.display());
    println!("   - {} documents", index.entries().len());
    println!("   - {} tags", index.tag_count());
    println!("   - {} categories", index.category_count());
    let unplaced = index.unplaced().count();
    if unplaced > 0 {
        println!("   - {unplaced} documents with an unrecognized difficulty");
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_links(root: &Path, cfg: &NotesConfig) -> anyhow::Result<ExitCode> {
    println!("🔍 checking links...\n");
    let report = check_links(root, &cfg.links)?;
    print!("{}", report.render());
    if report.unreadable > 0 {
        eprintln!("{} files could not be read", report.unreadable);
    }
    Ok(ExitCode::from(report.exit_code()))
}

fn print_scan_stats(stats: &ScanStats) {
    println!(
        "   scanned {} markdown files ({} excluded, {} without frontmatter, {} unreadable)",
        stats.markdown_files, stats.excluded, stats.without_frontmatter, stats.unreadable
    );
}
