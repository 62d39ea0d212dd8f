//! Generated `_INDEX.md` tables for decision records and research documents
//!
//! Research documents also age: a `concluded` document becomes `stale` once
//! more than `stale_after` days (default from config) have passed since its
//! `concluded` date, and the document's own `status` line is rewritten.

use crate::core::{parse_front_matter, rewrite_scalar, FieldMap};
use crate::error::Result;
use crate::io::{is_adr_file_name, read_to_string, write_atomic};
use crate::validate::rules::{field_text, parse_iso_date};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const INDEX_FILE_NAME: &str = "_INDEX.md";
const GENERATED_NOTE: &str = "<!-- Generated by `bazaar index`. Do not edit by hand. -->";

/// Display icon for a decision or research status
pub fn status_icon(status: &str) -> &'static str {
    match status {
        "draft" => "\u{1f4dd}",
        "proposed" => "\u{1f4ac}",
        "accepted" => "\u{2705}",
        "superseded" => "\u{1f504}",
        "deprecated" => "\u{26d4}",
        "active" => "\u{1f52c}",
        "concluded" => "\u{1f3c1}",
        "stale" => "\u{1f578}\u{fe0f}",
        _ => "\u{2753}",
    }
}

fn text(fields: &FieldMap, key: &str) -> String {
    field_text(fields, key).unwrap_or_default()
}

fn items(fields: &FieldMap, key: &str) -> Vec<String> {
    fields.get(key).map(|v| v.items()).unwrap_or_default()
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Markdown files directly in `dir` accepted by `keep`, sorted by name
fn list_markdown(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let keep_it = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".md") && keep(n));
        if keep_it {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One row of the decisions index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecisionEntry {
    pub number: String,
    pub status: String,
    pub date: String,
    pub title: String,
    pub decision_makers: Vec<String>,
    pub filename: String,
}

/// Front matter of an index source. Unreadable files and files without front
/// matter are logged and give `None`.
fn indexable_fields(path: &Path) -> Option<FieldMap> {
    let text = match read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{}: could not read file, not indexed: {}", path.display(), e);
            return None;
        }
    };
    let fields = parse_front_matter(&text);
    if fields.is_none() {
        log::warn!("{}: no front matter found, not indexed", path.display());
    }
    fields
}

/// Collect `NNNN-*.md` records from `dir`. Unreadable files and files without
/// front matter are skipped.
pub fn collect_decisions(dir: &Path) -> Result<Vec<DecisionEntry>> {
    let mut entries = Vec::new();
    for path in list_markdown(dir, is_adr_file_name)? {
        let filename = file_name(&path);
        let Some(fields) = indexable_fields(&path) else {
            continue;
        };
        entries.push(DecisionEntry {
            number: filename[..4].to_string(),
            status: text(&fields, "status"),
            date: text(&fields, "date"),
            title: text(&fields, "title"),
            decision_makers: items(&fields, "decision-makers"),
            filename,
        });
    }
    Ok(entries)
}

pub fn build_decisions_index(entries: &[DecisionEntry]) -> String {
    let mut lines = vec![
        "# Decision Records Index".to_string(),
        String::new(),
        GENERATED_NOTE.to_string(),
        String::new(),
        format!("{} decisions", entries.len()),
        String::new(),
    ];

    if !entries.is_empty() {
        lines.push("| # | Status | Date | Title | Decision Makers |".to_string());
        lines.push("|---|--------|------|-------|-----------------|".to_string());
        for e in entries {
            let title = if e.title.is_empty() { &e.filename } else { &e.title };
            lines.push(format!(
                "| {} | {} {} | {} | [{}]({}) | {} |",
                e.number,
                status_icon(&e.status),
                cell(&e.status),
                cell(&e.date),
                cell(title),
                e.filename,
                cell(&e.decision_makers.join(", "))
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// One row of the research index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResearchEntry {
    pub status: String,
    pub started: String,
    pub question: String,
    pub tags: Vec<String>,
    pub filename: String,
    pub concluded: Option<String>,
    pub stale_after: Option<String>,
}

impl ResearchEntry {
    pub fn from_fields(fields: &FieldMap, filename: impl Into<String>) -> Self {
        Self {
            status: text(fields, "status"),
            started: text(fields, "started"),
            question: text(fields, "question"),
            tags: items(fields, "tags"),
            filename: filename.into(),
            concluded: field_text(fields, "concluded"),
            stale_after: field_text(fields, "stale_after"),
        }
    }
}

/// How to treat research documents whose conclusion has aged out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    pub today: NaiveDate,
    pub default_days: i64,
    /// Rewrite the document's `status` line when it turns stale
    pub persist: bool,
}

/// Mark a concluded entry stale once its conclusion is older than its
/// `stale_after` window. Returns whether the entry changed.
pub fn check_staleness(entry: &mut ResearchEntry, path: &Path, policy: &Staleness) -> Result<bool> {
    if entry.status != "concluded" {
        return Ok(false);
    }
    let Some(concluded) = entry.concluded.as_deref().and_then(parse_iso_date) else {
        return Ok(false);
    };

    let window = match entry.stale_after.as_deref().map(str::parse::<i64>) {
        Some(Ok(days)) => days,
        Some(Err(_)) => {
            log::warn!(
                "{}: stale_after is not a number, using {} days",
                path.display(),
                policy.default_days
            );
            policy.default_days
        }
        None => policy.default_days,
    };

    let age = (policy.today - concluded).num_days();
    if age <= window {
        return Ok(false);
    }

    if policy.persist {
        let original = read_to_string(path)?;
        match rewrite_scalar(&original, "status", "stale") {
            Some(updated) => write_atomic(path, &updated)?,
            None => log::warn!("{}: no status line to rewrite", path.display()),
        }
    }
    log::info!("{}: concluded {} days ago, marked stale", path.display(), age);
    entry.status = "stale".to_string();
    Ok(true)
}

/// Collect research documents from `dir` (skipping `_*` files), applying the
/// staleness policy to each.
pub fn collect_research(dir: &Path, policy: &Staleness) -> Result<Vec<ResearchEntry>> {
    let mut entries = Vec::new();
    for path in list_markdown(dir, |name| !name.starts_with('_'))? {
        let Some(fields) = indexable_fields(&path) else {
            continue;
        };
        let mut entry = ResearchEntry::from_fields(&fields, file_name(&path));
        check_staleness(&mut entry, &path, policy)?;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn build_research_index(entries: &[ResearchEntry]) -> String {
    let mut lines = vec![
        "# Research Index".to_string(),
        String::new(),
        GENERATED_NOTE.to_string(),
        String::new(),
        format!("{} documents", entries.len()),
        String::new(),
    ];

    if entries.is_empty() {
        return lines.join("\n");
    }

    lines.push("| Status | Started | Question | Tags |".to_string());
    lines.push("|--------|---------|----------|------|".to_string());
    let mut by_tag: BTreeMap<&str, Vec<&ResearchEntry>> = BTreeMap::new();
    for e in entries {
        let question = if e.question.is_empty() { &e.filename } else { &e.question };
        let tags: Vec<String> = e.tags.iter().map(|t| format!("`{}`", t)).collect();
        lines.push(format!(
            "| {} {} | {} | [{}]({}) | {} |",
            status_icon(&e.status),
            cell(&e.status),
            cell(&e.started),
            cell(question),
            e.filename,
            cell(&tags.join(", "))
        ));
        for tag in &e.tags {
            by_tag.entry(tag.as_str()).or_default().push(e);
        }
    }

    lines.push(String::new());
    lines.push("## By Tag".to_string());
    for (tag, docs) in by_tag {
        lines.push(String::new());
        lines.push(format!("**{}**", tag));
        lines.push(String::new());
        for e in docs {
            let question = if e.question.is_empty() { &e.filename } else { &e.question };
            lines.push(format!("- [{}]({})", question, e.filename));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

/// Result of reconciling an index file with freshly rendered content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Written,
    Unchanged,
    /// Only reported in check mode
    OutOfDate,
}

/// Write `content` to `path` unless it is already identical. In check mode
/// nothing is written.
pub fn sync_index(path: &Path, content: &str, check: bool) -> Result<IndexStatus> {
    let current = match std::fs::read_to_string(path) {
        Ok(current) => Some(current),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    if current.as_deref() == Some(content) {
        return Ok(IndexStatus::Unchanged);
    }
    if check {
        return Ok(IndexStatus::OutOfDate);
    }
    write_atomic(path, content)?;
    Ok(IndexStatus::Written)
}
