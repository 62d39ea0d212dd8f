//! Integration tests for the bazaar-tools library
//!
//! Each test builds a small marketplace repository in a temporary directory
//! and runs a complete workflow against it through the public API.

use bazaar_tools::index::{
    build_decisions_index, build_research_index, collect_decisions, collect_research, sync_index,
    IndexStatus, Staleness, INDEX_FILE_NAME,
};
use bazaar_tools::links::check_links;
use bazaar_tools::manifest::check_manifests;
use bazaar_tools::scaffold::create_subagent;
use bazaar_tools::{
    check_repository, validate_subagent_file, BazaarError, Config, FrontMatterParser, RepoLayout,
    Report, Severity, Strictness,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ADR: &str = "---
title: Use Rust for tooling
status: accepted
date: 2025-01-15
decision-makers:
  - alice
  - bob
---
# Context
";

const RESEARCH: &str = "---
question: Which parser should we use?
status: active
started: 2025-02-01
tags: [parsing, tooling]
---
Notes.
";

const SKILL: &str = "---
name: release-notes
description: Drafts release notes from merged pull requests
---
";

const AGENT: &str = "---
name: reviewer
description: Reviews pull requests
model: sonnet
---
";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "docs/decisions/0001-use-rust.md", ADR);
    write(root, "docs/research/parsers.md", RESEARCH);
    write(root, "plugins/authoring/skills/release-notes/SKILL.md", SKILL);
    write(root, "plugins/authoring/agents/reviewer.md", AGENT);
    dir
}

fn layout(root: &Path) -> RepoLayout {
    RepoLayout::new(root, Config::resolve(root, None).unwrap())
}

fn messages(report: &Report) -> Vec<String> {
    report.entries().iter().map(|e| e.line()).collect()
}

#[test]
fn test_clean_repository_passes() {
    let dir = sample_repo();
    let (summary, report) =
        check_repository(&layout(dir.path()), &FrontMatterParser::new()).unwrap();

    assert_eq!(
        summary.to_string(),
        "Validated 1 ADR(s), 1 research doc(s), 1 skill(s), 1 agent(s)"
    );
    assert!(report.is_empty(), "{:?}", report);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_field_errors_are_reported_per_file() {
    let dir = sample_repo();
    let root = dir.path();
    write(
        root,
        "docs/decisions/0002-bogus.md",
        "---\ntitle: Bogus\nstatus: bogus\ndate: 2025-13-01\ndecision-makers: []\n---\n",
    );

    let (summary, report) = check_repository(&layout(root), &FrontMatterParser::new()).unwrap();
    assert_eq!(summary.adrs, 2);
    assert_eq!(report.error_count(), 3);
    assert_eq!(report.exit_code(), 1);

    let lines = messages(&report);
    assert!(lines.iter().all(|l| l.starts_with("docs/decisions/0002-bogus.md: ")));
    assert!(lines.iter().any(|l| l.contains("missing required field 'decision-makers'")));
    assert!(lines.iter().any(|l| l.contains("invalid status 'bogus'")));
    assert!(lines.iter().any(|l| l.contains("invalid date '2025-13-01'")));
}

#[test]
fn test_missing_front_matter_is_the_only_finding() {
    let dir = sample_repo();
    let root = dir.path();
    write(root, "docs/research/notes.md", "# Just notes\n\nstatus: bogus\n");

    let (summary, report) = check_repository(&layout(root), &FrontMatterParser::new()).unwrap();
    assert_eq!(summary.research, 1);
    assert_eq!(
        messages(&report),
        vec!["docs/research/notes.md: no front matter found"]
    );
}

#[test]
fn test_unterminated_block_depends_on_strictness() {
    let dir = sample_repo();
    let root = dir.path();
    write(root, "plugins/authoring/agents/broken.md", "---\nname: broken\n");

    let (_, lenient) = check_repository(&layout(root), &FrontMatterParser::new()).unwrap();
    assert_eq!(
        messages(&lenient),
        vec!["plugins/authoring/agents/broken.md: no front matter found"]
    );

    let (_, strict) = check_repository(&layout(root), &FrontMatterParser::strict()).unwrap();
    assert_eq!(
        messages(&strict),
        vec!["plugins/authoring/agents/broken.md: unterminated front matter (missing closing ---)"]
    );
}

#[test]
fn test_config_file_moves_document_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "bazaar.toml", "decisions_dir = \"adr\"\n\n[frontmatter]\nstrict = true\n");
    write(root, "adr/0001-use-rust.md", ADR);
    write(root, "docs/decisions/0002-ignored.md", "no front matter");

    let layout = layout(root);
    assert_eq!(
        layout.config().frontmatter.strictness(),
        Strictness::Strict
    );
    let (summary, report) = check_repository(&layout, &FrontMatterParser::new()).unwrap();
    assert_eq!(summary.adrs, 1);
    assert!(report.is_empty());
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bazaar.toml", "[fetch]\ntimeout_secs = 0\n");

    let err = Config::resolve(dir.path(), None).unwrap_err();
    assert!(matches!(err, BazaarError::Config { .. }));
}

#[test]
fn test_link_check_over_repository() {
    let dir = sample_repo();
    let root = dir.path();
    write(
        root,
        "README.md",
        "See [the decision](docs/decisions/0001-use-rust.md#context) and \
         [site](https://example.com).\n\
         ![logo](missing.png)\n\
         [wrong case](DOCS/research/parsers.md)\n\
         ```\n[in a fence](nowhere.md)\n```\n",
    );
    write(root, "docs/guide.md", "Back to [readme](../README.md), [gone](./gone.md)\n");

    let report = check_links(&layout(root)).unwrap();
    assert_eq!(report.links_checked, 4);
    let broken: Vec<String> = report.broken.iter().map(|b| b.line()).collect();
    assert_eq!(
        broken,
        vec![
            "README.md:3: [wrong case](DOCS/research/parsers.md)",
            "docs/guide.md:1: [gone](./gone.md)",
        ]
    );
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_manifest_check_over_repository() {
    let dir = sample_repo();
    let root = dir.path();
    write(
        root,
        ".claude-plugin/marketplace.json",
        r#"{"name": "bazaar", "owner": {"name": "o"}, "metadata": {}, "plugins": [{"name": "authoring", "source": "authoring"}]}"#,
    );
    write(
        root,
        "plugins/authoring/.claude-plugin/plugin.json",
        r#"{"name": "authoring", "version": "1.2.0", "description": "d", "author": {"name": "a"}, "license": "MIT"}"#,
    );

    let check = check_manifests(&layout(root)).unwrap();
    assert_eq!(check.plugin_count, 1);
    assert!(check.report.is_empty());
}

#[test]
fn test_decisions_index_round_trip() {
    let dir = sample_repo();
    let decisions = dir.path().join("docs/decisions");
    let index_path = decisions.join(INDEX_FILE_NAME);

    let content = build_decisions_index(&collect_decisions(&decisions).unwrap());
    assert!(content.contains(
        "| 0001 | \u{2705} accepted | 2025-01-15 | [Use Rust for tooling](0001-use-rust.md) | alice, bob |"
    ));

    assert_eq!(sync_index(&index_path, &content, true).unwrap(), IndexStatus::OutOfDate);
    assert!(!index_path.exists());
    assert_eq!(sync_index(&index_path, &content, false).unwrap(), IndexStatus::Written);
    assert_eq!(sync_index(&index_path, &content, true).unwrap(), IndexStatus::Unchanged);

    // The index itself is not a decision record.
    let again = build_decisions_index(&collect_decisions(&decisions).unwrap());
    assert_eq!(again, content);
}

#[test]
fn test_research_index_marks_old_conclusions_stale() {
    let dir = sample_repo();
    let root = dir.path();
    write(
        root,
        "docs/research/old.md",
        "---\nquestion: Old question?\nstatus: concluded\nstarted: 2024-01-01\nconcluded: 2024-02-01\ntags: [parsing]\n---\nDone.\n",
    );
    let research = root.join("docs/research");
    let policy = Staleness {
        today: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        default_days: 90,
        persist: true,
    };

    let entries = collect_research(&research, &policy).unwrap();
    let old = entries.iter().find(|e| e.filename == "old.md").unwrap();
    assert_eq!(old.status, "stale");

    let rewritten = fs::read_to_string(research.join("old.md")).unwrap();
    assert!(rewritten.contains("\nstatus: stale\n"));
    assert!(rewritten.ends_with("---\nDone.\n"));

    let index = build_research_index(&entries);
    assert!(index.contains("2 documents"));
    assert!(index.contains("**parsing**"));
}

#[test]
fn test_scaffolded_subagent_validates_with_warnings_only() {
    let dir = TempDir::new().unwrap();
    let path = create_subagent(&dir.path().join(".claude/agents"), "test-runner").unwrap();

    let findings = validate_subagent_file(&path);
    assert!(!findings.is_empty());
    assert!(findings.iter().all(|f| f.severity == Severity::Warning));

    assert!(create_subagent(&dir.path().join(".claude/agents"), "test-runner").is_err());
}
