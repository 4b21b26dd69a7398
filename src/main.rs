use anyhow::Result;
use clap::Parser;
use amalgam::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = cli.context();
    amalgam::infra::logging::init(&ctx);

    match cli.command {
        Commands::Merge(args) => amalgam::merge_run(args, &ctx),
        Commands::Graph(args) => amalgam::graph_run(args, &ctx),
        Commands::Init(args) => amalgam::infra::config::init(args, &ctx),
        Commands::Completions(args) => amalgam::completion::run(args, &ctx),
    }
}
