use anyhow::{Context, Result};
use bazaar_tools::{Config, RepoLayout};
use clap::Parser;

mod cli_bin;

use cli_bin::args::{
    CheckCommand, Cli, Commands, DocsCommand, FrontmatterCommand, IndexCommand, LabelsCommand,
    NewCommand,
};
use cli_bin::commands::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(&cli.root, cli.config.as_deref())
        .with_context(|| format!("failed to load configuration for {}", cli.root.display()))?;
    let layout = RepoLayout::new(&cli.root, config);

    let outcome = match cli.command {
        Commands::Check(CheckCommand::Frontmatter) => check_frontmatter_command(&layout),
        Commands::Check(CheckCommand::Subagent(args)) => check_subagent_command(args),
        Commands::Check(CheckCommand::Links) => check_links_command(&layout),
        Commands::Check(CheckCommand::Manifests) => check_manifests_command(&layout),
        Commands::New(NewCommand::Subagent(args)) => new_subagent_command(&layout, args),
        Commands::Labels(LabelsCommand::Sync(args)) => labels_sync_command(&layout, args),
        Commands::Docs(DocsCommand::Fetch(args)) => docs_fetch_command(&layout, args),
        Commands::Index(IndexCommand::Decisions(args)) => index_decisions_command(&layout, args),
        Commands::Index(IndexCommand::Research(args)) => index_research_command(&layout, args),
        Commands::Frontmatter(FrontmatterCommand::Show(args)) => {
            frontmatter_show_command(&layout, args)
        }
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// `-v` and `-q` pick the default level; `RUST_LOG` still wins
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
