use anyhow::{Context, Result};
use clap::Parser;
use graph::{CommitGraph, EventEmitter, GitWalker, GitgraphJsSink, RootLocator, TraversalScheduler};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitgraph")]
#[command(about = "Render a git commit history as GitgraphJS source", long_about = None)]
struct Cli {
    /// Path to the git repository
    #[arg(default_value = ".")]
    repo: PathBuf,

    /// Output file for the generated GitgraphJS source
    #[arg(short, long)]
    output: PathBuf,

    /// Shorten commit hashes to this many characters
    #[arg(long, default_value = "7")]
    short_hash: usize,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let walker = GitWalker::new(Some(cli.repo.as_path()))?.short_hashes(cli.short_hash);
    let snapshot = walker.snapshot()?;
    let graph = CommitGraph::build(snapshot.commits, snapshot.heads, snapshot.tags)?;

    let Some(root) = RootLocator::select(&graph) else {
        println!("Repository has no commits, nothing to render");
        return Ok(());
    };

    let schedule = TraversalScheduler::new(&graph).run(&root)?;
    for diagnostic in &schedule.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let mut sink = GitgraphJsSink::new();
    EventEmitter::new(&graph).emit(&schedule, &mut sink);

    fs::write(&cli.output, sink.finish())
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    println!(
        "Wrote {} ({} commits)",
        cli.output.display(),
        schedule.order.len()
    );

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
