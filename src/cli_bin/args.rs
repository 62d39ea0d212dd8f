//! Command-line argument definitions
//!
//! Every check reads the repository rooted at `--root` (default: the current
//! directory) using the layout from `bazaar.toml` or `--config`.

use bazaar_tools::fetch::DocSource;
use bazaar_tools::show::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "bazaar",
    version,
    about = "Maintenance tooling for a plugin marketplace repository",
    long_about = "bazaar validates the front matter of decision records, research notes, \
                  skills and subagents, checks internal links and plugin manifests, \
                  regenerates document indexes, syncs GitHub labels and mirrors \
                  documentation sites."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Repository root
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: bazaar.toml under the repository root)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a repository check
    #[command(subcommand)]
    Check(CheckCommand),
    /// Create new documents from templates
    #[command(subcommand)]
    New(NewCommand),
    /// Manage GitHub issue labels
    #[command(subcommand)]
    Labels(LabelsCommand),
    /// Mirror documentation sites
    #[command(subcommand)]
    Docs(DocsCommand),
    /// Regenerate document indexes
    #[command(subcommand)]
    Index(IndexCommand),
    /// Inspect front matter
    #[command(subcommand)]
    Frontmatter(FrontmatterCommand),
}

#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate front matter of every decision record, research doc, skill and agent
    Frontmatter,
    /// Validate subagent definition files
    Subagent(SubagentCheckArgs),
    /// Find broken internal markdown links
    Links,
    /// Validate the marketplace manifest and plugin manifests
    Manifests,
}

#[derive(Args, Debug)]
pub struct SubagentCheckArgs {
    /// Subagent files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum NewCommand {
    /// Create a subagent definition from a template
    Subagent(NewSubagentArgs),
}

#[derive(Args, Debug)]
pub struct NewSubagentArgs {
    /// Subagent name (kebab-case)
    pub name: String,

    /// Directory to create the file in
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum LabelsCommand {
    /// Create or update labels to match the label table and marketplace plugins
    Sync(LabelSyncArgs),
}

#[derive(Args, Debug)]
pub struct LabelSyncArgs {
    /// Show what would change without creating or editing labels
    #[arg(long)]
    pub dry_run: bool,

    /// Extra plugin names to create labels for
    #[arg(long = "plugin", value_name = "NAME")]
    pub plugins: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum DocsCommand {
    /// Download every page listed in a documentation index
    Fetch(DocsFetchArgs),
}

#[derive(Args, Debug)]
pub struct DocsFetchArgs {
    /// Documentation site to mirror
    #[arg(long, value_enum)]
    pub source: SourceArg,

    /// Output directory (default depends on the source)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only fetch pages whose name contains one of these terms
    #[arg(long, value_name = "TERM", num_args = 1..)]
    pub only: Vec<String>,

    /// Skip pages whose name contains one of these terms
    #[arg(long, value_name = "TERM", num_args = 1..)]
    pub exclude: Vec<String>,

    /// List available pages without downloading
    #[arg(long)]
    pub list: bool,

    /// Seconds between requests (default from config)
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,

    /// Also save the raw index as _index.txt
    #[arg(long)]
    pub index: bool,
}

/// Documentation sources
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SourceArg {
    /// API platform docs
    Api,
    /// Claude Code docs
    Code,
}

impl From<SourceArg> for DocSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Api => DocSource::Api,
            SourceArg::Code => DocSource::Code,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum IndexCommand {
    /// Regenerate the decision records index
    Decisions(IndexArgs),
    /// Regenerate the research index, marking aged conclusions stale
    Research(IndexArgs),
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Compare with the existing index without writing; fail when out of date
    #[arg(long)]
    pub check: bool,
}

#[derive(Subcommand, Debug)]
pub enum FrontmatterCommand {
    /// Print the parsed front matter of files
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Files or directories to read
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: FormatArg,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatArg {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}
