//! Documentation mirroring from `llms.txt` indexes
//!
//! An index lists one page per `- [Title](URL)` line. Each page is saved as
//! `<output>/<path>.md`, where `path` is the part of the URL after `/en/`
//! with any `.md` suffix removed. Pages are fetched one at a time with a
//! pause between requests.

use crate::config::FetchConfig;
use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const INDEX_FILE_NAME: &str = "_index.txt";
const LANG_SEGMENT: &str = "/en/";
const LIST_DESCRIPTION_CHARS: usize = 80;

/// A documentation site with an `llms.txt` index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocSource {
    /// API platform docs; entries may omit the description
    Api,
    /// Claude Code docs; entries always carry `: description`
    Code,
}

impl DocSource {
    pub fn index_url(&self) -> &'static str {
        match self {
            Self::Api => "https://platform.claude.com/llms.txt",
            Self::Code => "https://code.claude.com/docs/llms.txt",
        }
    }

    pub fn default_output(&self) -> &'static str {
        match self {
            Self::Api => "docs/api-docs",
            Self::Code => "claude-code-docs",
        }
    }

    fn entry_pattern(&self) -> &'static str {
        match self {
            Self::Api => r"^- \[(.+?)\]\((.+?)\)(?:\s+-\s+(.+))?$",
            Self::Code => r"^- \[(.+?)\]\((.+?)\):\s*(.+)$",
        }
    }

    /// Parse an index into page entries, in index order
    pub fn parse_index(&self, text: &str) -> Result<Vec<DocEntry>> {
        let re = Regex::new(self.entry_pattern())?;
        let mut entries = Vec::new();

        for line in text.lines() {
            let Some(caps) = re.captures(line.trim()) else {
                continue;
            };
            let url = &caps[2];
            if *self == Self::Api && !url.contains(LANG_SEGMENT) {
                continue;
            }
            entries.push(DocEntry::new(
                &caps[1],
                url,
                caps.get(3).map_or("", |m| m.as_str()),
            ));
        }

        Ok(entries)
    }
}

impl fmt::Display for DocSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Code => write!(f, "code"),
        }
    }
}

/// One page listed in an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    /// `path` with `/` flattened to `--`, used for filtering
    pub name: String,
    /// Relative output path without extension
    pub path: String,
    pub title: String,
    pub url: String,
    pub description: String,
}

impl DocEntry {
    pub fn new(title: &str, url: &str, description: &str) -> Self {
        let after_lang = url
            .split_once(LANG_SEGMENT)
            .map_or(url, |(_, rest)| rest);
        let path = after_lang.strip_suffix(".md").unwrap_or(after_lang);
        Self {
            name: path.replace('/', "--"),
            path: path.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            description: description.trim().to_string(),
        }
    }

    /// Target file under `output`, or `None` when the path would escape it
    pub fn output_file(&self, output: &Path) -> Option<PathBuf> {
        let relative = PathBuf::from(format!("{}.md", self.path));
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| output.join(relative))
    }
}

/// Keep entries whose name contains any `only` term, then drop those
/// containing any `exclude` term. Empty term lists do not filter.
pub fn filter_entries(entries: Vec<DocEntry>, only: &[String], exclude: &[String]) -> Vec<DocEntry> {
    entries
        .into_iter()
        .filter(|e| only.is_empty() || only.iter().any(|t| e.name.contains(t.as_str())))
        .filter(|e| !exclude.iter().any(|t| e.name.contains(t.as_str())))
        .collect()
}

/// Print entries as an aligned name/description table
pub fn write_listing<W: Write>(entries: &[DocEntry], out: &mut W) -> Result<()> {
    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    for entry in entries {
        let description = if entry.description.is_empty() {
            "(no description)".to_string()
        } else {
            entry.description.chars().take(LIST_DESCRIPTION_CHARS).collect()
        };
        writeln!(out, "  {:<width$}  {}", entry.name, description, width = width)?;
    }
    writeln!(out, "\n{} pages available.", entries.len())?;
    Ok(())
}

/// Retrieves the text behind a URL
pub trait DocFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// [`DocFetcher`] over a blocking HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl DocFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output: PathBuf,
    pub delay: Duration,
    /// Also save the raw index as `_index.txt`
    pub save_index: bool,
}

/// Successes and failures of a download run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub downloaded: usize,
    pub failed: usize,
}

impl DownloadOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Fetch every entry into the output directory.
///
/// A page that cannot be fetched or written counts as failed and the run
/// continues. Only a failure to create the output directory (or save the
/// index) aborts.
pub fn download<F: DocFetcher, W: Write>(
    fetcher: &F,
    entries: &[DocEntry],
    index_text: &str,
    options: &DownloadOptions,
    out: &mut W,
) -> Result<DownloadOutcome> {
    std::fs::create_dir_all(&options.output)?;

    if options.save_index {
        let index_path = options.output.join(INDEX_FILE_NAME);
        std::fs::write(&index_path, index_text)?;
        writeln!(out, "Saved index to {}", index_path.display())?;
    }

    let total = entries.len();
    let mut outcome = DownloadOutcome::default();

    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;
        if fetch_one(fetcher, entry, &options.output, n, total, out)? {
            outcome.downloaded += 1;
        } else {
            outcome.failed += 1;
        }
        if n < total && !options.delay.is_zero() {
            std::thread::sleep(options.delay);
        }
    }

    writeln!(
        out,
        "\nDone: {} downloaded, {} failed.",
        outcome.downloaded, outcome.failed
    )?;
    writeln!(out, "Output: {}", options.output.display())?;
    Ok(outcome)
}

fn fetch_one<F: DocFetcher, W: Write>(
    fetcher: &F,
    entry: &DocEntry,
    output: &Path,
    n: usize,
    total: usize,
    out: &mut W,
) -> Result<bool> {
    let Some(file) = entry.output_file(output) else {
        writeln!(out, "SKIPPED (path outside output directory: {})", entry.path)?;
        return Ok(false);
    };

    write!(out, "[{}/{}] {}... ", n, total, entry.path)?;
    out.flush()?;

    let content = match fetcher.fetch(&entry.url) {
        Ok(content) => content,
        Err(e) => {
            writeln!(out, "FAILED ({})", e)?;
            return Ok(false);
        }
    };

    let written = file
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::write(&file, &content));
    if let Err(e) = written {
        writeln!(out, "WRITE FAILED ({})", e)?;
        return Ok(false);
    }

    writeln!(out, "OK ({:.1} KB)", content.len() as f64 / 1024.0)?;
    Ok(true)
}
