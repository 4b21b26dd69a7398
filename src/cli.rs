use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
    pub verbose: u8,    // global -v count
}

#[derive(Parser)]
#[command(name = "amal")]
#[command(about = "Flatten a multi-file C++ project into a single compilable source file")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress diagnostics and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            no_color: self.no_color,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge an entry file and its local includes into one file
    Merge(MergeArgs),

    /// Show the include graph of an entry file
    Graph(GraphArgs),

    /// Initialize an amalgam.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Main file to merge
    pub main: PathBuf,

    /// Also write the include graph as a Graphviz DOT file
    #[arg(long)]
    pub draw: bool,

    /// Name for the merged code (defaults to the main file's stem)
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print the merged code to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Do not copy the merged code to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// Indented dependency tree
    #[default]
    Tree,
    /// Graphviz DOT document
    Dot,
    /// JSON object mapping each unit to its dependencies
    Json,
}

#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Entry file whose includes are followed
    pub main: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = GraphFormat::Tree)]
    pub format: GraphFormat,

    /// Also sort the graph and fail on include cycles
    #[arg(long)]
    pub check: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
