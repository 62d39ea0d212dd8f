//! CLI command handlers that bridge CLI arguments to library operations
//!
//! Each handler prints its report to stdout and returns the process exit
//! code. Environment failures are returned as errors instead.

use crate::cli_bin::args::*;
use bazaar_tools::core::FrontMatterParser;
use bazaar_tools::error::{BazaarError, Result};
use bazaar_tools::fetch::{
    download, filter_entries, write_listing, DocFetcher, DocSource, DownloadOptions, HttpFetcher,
};
use bazaar_tools::index::{
    build_decisions_index, build_research_index, collect_decisions, collect_research, sync_index,
    IndexStatus, Staleness, INDEX_FILE_NAME,
};
use bazaar_tools::io::{resolve_files, RepoLayout};
use bazaar_tools::labels::{
    marketplace_plugin_names, plugin_labels, static_labels, sync_labels, GhCli,
};
use bazaar_tools::links::check_links;
use bazaar_tools::manifest::check_manifests;
use bazaar_tools::scaffold::{create_subagent, next_steps, DEFAULT_AGENTS_DIR};
use bazaar_tools::show::{collect_front_matter, OutputFormat};
use bazaar_tools::validate::{check_repository, validate_subagent_file, Report};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// Execute `check frontmatter`
pub fn check_frontmatter_command(layout: &RepoLayout) -> Result<i32> {
    let parser = FrontMatterParser::with_strictness(layout.config().frontmatter.strictness());
    debug!("Checking front matter with {:?} parsing", parser.strictness());

    let (summary, report) = check_repository(layout, &parser)?;
    if summary.total() == 0 {
        warn!("No documents found under {}", layout.root().display());
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", summary)?;
    report.write_summary(&mut out, "All frontmatter checks passed.")?;
    Ok(report.exit_code())
}

/// Execute `check subagent`
pub fn check_subagent_command(args: SubagentCheckArgs) -> Result<i32> {
    let mut out = io::stdout().lock();
    let mut failed = false;

    for file in &args.files {
        writeln!(out, "Validating: {}\n", file.display())?;

        let mut report = Report::new();
        report.extend("", validate_subagent_file(file));

        if report.is_empty() {
            writeln!(out, "\u{2713} Subagent validation passed!")?;
            continue;
        }

        report.write_grouped(&mut out)?;
        if report.has_errors() {
            failed = true;
            writeln!(out, "Validation failed. Fix errors before using this subagent.")?;
        } else {
            writeln!(out, "Validation passed with warnings. Consider addressing them.")?;
        }
    }

    Ok(if failed { 1 } else { 0 })
}

/// Execute `check links`
pub fn check_links_command(layout: &RepoLayout) -> Result<i32> {
    let report = check_links(layout)?;

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Scanning {} markdown file(s) for broken links...",
        report.files_scanned
    )?;
    report.write_summary(&mut out)?;
    Ok(report.exit_code())
}

/// Execute `check manifests`
pub fn check_manifests_command(layout: &RepoLayout) -> Result<i32> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Validating {}...",
        layout.display_path(&layout.marketplace_path())
    )?;

    let check = check_manifests(layout)?;
    writeln!(out, "Found {} plugin(s) in marketplace", check.plugin_count)?;
    check
        .report
        .write_summary(&mut out, "All manifest checks passed.")?;
    Ok(check.report.exit_code())
}

/// Execute `new subagent`
pub fn new_subagent_command(layout: &RepoLayout, args: NewSubagentArgs) -> Result<i32> {
    let dir = args
        .path
        .unwrap_or_else(|| layout.root().join(DEFAULT_AGENTS_DIR));
    debug!("Creating subagent '{}' in {}", args.name, dir.display());

    let path = match create_subagent(&dir, &args.name) {
        Ok(path) => path,
        Err(BazaarError::Validation { message }) => {
            println!("Error: {}", message);
            return Ok(1);
        }
        Err(e) => return Err(e),
    };

    println!("\u{2713} Created subagent template: {}\n", path.display());
    println!("{}", next_steps(&path));
    Ok(0)
}

/// Execute `labels sync`
pub fn labels_sync_command(layout: &RepoLayout, args: LabelSyncArgs) -> Result<i32> {
    let plugin_names = marketplace_plugin_names(&layout.marketplace_path());
    debug!("Marketplace lists {} plugin(s)", plugin_names.len());

    let plugin_set = plugin_labels(plugin_names, args.plugins);
    let backend = GhCli::new(layout.root());

    let mut out = io::stdout().lock();
    let outcome = sync_labels(&backend, &static_labels(), &plugin_set, args.dry_run, &mut out)?;
    info!(
        "Labels: {} created, {} updated, {} unchanged, {} failed",
        outcome.created, outcome.updated, outcome.unchanged, outcome.failed
    );
    Ok(outcome.exit_code())
}

/// Execute `docs fetch`
pub fn docs_fetch_command(layout: &RepoLayout, args: DocsFetchArgs) -> Result<i32> {
    let source = DocSource::from(args.source);
    let config = &layout.config().fetch;

    let delay = args.delay.unwrap_or(config.delay_secs);
    if !delay.is_finite() || delay < 0.0 {
        return Err(BazaarError::validation(format!(
            "--delay must be a non-negative number of seconds, got {}",
            delay
        )));
    }

    let fetcher = HttpFetcher::new(config)?;
    println!("Fetching index from {}...", source.index_url());
    let index_text = match fetcher.fetch(source.index_url()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error fetching index: {}", e);
            return Ok(1);
        }
    };

    let entries = source.parse_index(&index_text)?;
    let label = match source {
        DocSource::Api => "English documentation",
        DocSource::Code => "documentation",
    };
    println!("Found {} {} pages.\n", entries.len(), label);

    let entries = filter_entries(entries, &args.only, &args.exclude);
    if entries.is_empty() {
        eprintln!("No pages matched your filters.");
        return Ok(1);
    }

    let mut out = io::stdout().lock();
    if args.list {
        write_listing(&entries, &mut out)?;
        return Ok(0);
    }

    let options = DownloadOptions {
        output: args
            .output
            .unwrap_or_else(|| layout.root().join(source.default_output())),
        delay: Duration::from_secs_f64(delay),
        save_index: args.index,
    };
    let outcome = download(&fetcher, &entries, &index_text, &options, &mut out)?;
    Ok(outcome.exit_code())
}

/// Execute `index decisions`
pub fn index_decisions_command(layout: &RepoLayout, args: IndexArgs) -> Result<i32> {
    let dir = layout.decisions_dir();
    if !dir.is_dir() {
        return Err(BazaarError::file_not_found(dir));
    }

    let entries = collect_decisions(&dir)?;
    debug!("Indexing {} decision record(s)", entries.len());
    let content = build_decisions_index(&entries);
    report_index(layout, &dir.join(INDEX_FILE_NAME), &content, args.check, "decisions")
}

/// Execute `index research`
pub fn index_research_command(layout: &RepoLayout, args: IndexArgs) -> Result<i32> {
    let dir = layout.research_dir();
    if !dir.is_dir() {
        return Err(BazaarError::file_not_found(dir));
    }

    let policy = Staleness {
        today: chrono::Local::now().date_naive(),
        default_days: layout.config().research.stale_after_days,
        persist: !args.check,
    };
    let entries = collect_research(&dir, &policy)?;
    debug!("Indexing {} research document(s)", entries.len());
    let content = build_research_index(&entries);
    report_index(layout, &dir.join(INDEX_FILE_NAME), &content, args.check, "research")
}

fn report_index(
    layout: &RepoLayout,
    path: &Path,
    content: &str,
    check: bool,
    kind: &str,
) -> Result<i32> {
    let shown = layout.display_path(path);
    match sync_index(path, content, check)? {
        IndexStatus::Written => {
            println!("Wrote {}", shown);
            Ok(0)
        }
        IndexStatus::Unchanged => {
            println!("{} is up to date", shown);
            Ok(0)
        }
        IndexStatus::OutOfDate => {
            println!(
                "{} is out of date. Run `bazaar index {}` to regenerate it.",
                shown, kind
            );
            Ok(1)
        }
    }
}

/// Execute `frontmatter show`
pub fn frontmatter_show_command(layout: &RepoLayout, args: ShowArgs) -> Result<i32> {
    let files = resolve_files(&args.files);
    if files.is_empty() {
        warn!("No files found to process");
        return Ok(1);
    }

    let parser = FrontMatterParser::with_strictness(layout.config().frontmatter.strictness());
    let result = collect_front_matter(&files, &parser);
    for failure in &result.failures {
        eprintln!("{}", failure);
    }

    result.write_output(&mut io::stdout().lock(), OutputFormat::from(args.format))?;
    Ok(result.exit_code())
}
