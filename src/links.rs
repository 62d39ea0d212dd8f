//! Internal markdown link checking
//!
//! Every `[text](target)` link in the scanned markdown files must point at an
//! existing file or directory, relative to the file containing it. External
//! URLs, anchor-only links and image links are not checked, nor is anything
//! inside fenced code blocks or inline code spans.
//!
//! Each path component is compared against the real directory listing so that
//! a link whose case differs from the file on disk is reported even on
//! case-insensitive filesystems.

use crate::error::Result;
use crate::io::{build_globset, markdown_files_under, read_to_string, RepoLayout};
use regex::Regex;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

const CODE_FENCE: &str = "```";

/// A link found in a markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    pub target: String,
}

/// A link whose target does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub source: String,
    #[serde(flatten)]
    pub link: Link,
}

impl BrokenLink {
    pub fn line(&self) -> String {
        format!(
            "{}:{}: [{}]({})",
            self.source, self.link.line, self.link.text, self.link.target
        )
    }
}

/// A scanned file that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableFile {
    pub source: String,
    pub reason: String,
}

impl UnreadableFile {
    pub fn line(&self) -> String {
        format!("{}: could not read file: {}", self.source, self.reason)
    }
}

/// Outcome of a link check run
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkReport {
    pub files_scanned: usize,
    pub links_checked: usize,
    pub broken: Vec<BrokenLink>,
    pub unreadable: Vec<UnreadableFile>,
}

impl LinkReport {
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty() && self.unreadable.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_ok() {
            0
        } else {
            1
        }
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Checked {} internal link(s)", self.links_checked)?;
        if self.is_ok() {
            writeln!(out, "All internal links are valid.")?;
            return Ok(());
        }
        if !self.unreadable.is_empty() {
            writeln!(out, "\n{} file(s) could not be read:", self.unreadable.len())?;
            for file in &self.unreadable {
                writeln!(out, "  {}", file.line())?;
            }
        }
        if !self.broken.is_empty() {
            writeln!(out, "\n{} broken link(s) found:", self.broken.len())?;
            for broken in &self.broken {
                writeln!(out, "  {}", broken.line())?;
            }
        }
        Ok(())
    }
}

/// Extracts links from markdown text
#[derive(Debug, Clone)]
pub struct LinkScanner {
    link_re: Regex,
    inline_code_re: Regex,
}

impl LinkScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            link_re: Regex::new(r"\[([^\]]*)\]\(([^)]+)\)")?,
            inline_code_re: Regex::new(r"`[^`]+`")?,
        })
    }

    /// All links outside code, in document order
    pub fn extract(&self, text: &str) -> Vec<Link> {
        let mut links = Vec::new();
        let mut in_fence = false;

        for (idx, line) in text.lines().enumerate() {
            if line.trim().starts_with(CODE_FENCE) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            let visible = self.inline_code_re.replace_all(line, "");
            self.extract_line(&visible, idx + 1, &mut links);
        }

        links
    }

    fn extract_line(&self, line: &str, line_no: usize, links: &mut Vec<Link>) {
        let mut start = 0;
        while let Some(caps) = self.link_re.captures_at(line, start) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            // `![alt](src)` is an image; retry from the next character
            if line[..whole.start()].ends_with('!') {
                start = whole.start() + 1;
                continue;
            }
            links.push(Link {
                line: line_no,
                text: caps[1].to_string(),
                target: caps[2].to_string(),
            });
            start = whole.end();
        }
    }
}

pub fn is_external(target: &str) -> bool {
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| target.starts_with(scheme))
}

pub fn is_anchor_only(target: &str) -> bool {
    target.starts_with('#')
}

/// Whether a relative link target from `source` resolves to something on disk
pub fn resolve_link(source: &Path, target: &str) -> bool {
    let path_part = target.split('#').next().unwrap_or_default();
    if path_part.is_empty() {
        return true;
    }

    let base = source.parent().unwrap_or_else(|| Path::new("."));
    base.join(path_part).exists() && case_sensitive_exists(base, path_part)
}

/// Walk `target` one component at a time, requiring each name to appear
/// verbatim in its parent's directory listing.
fn case_sensitive_exists(base: &Path, target: &str) -> bool {
    let Ok(mut current) = base.canonicalize() else {
        return false;
    };

    for component in Path::new(target).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                current.pop();
            }
            Component::Normal(name) => {
                let Ok(entries) = std::fs::read_dir(&current) else {
                    return false;
                };
                let found = entries
                    .filter_map(|e| e.ok())
                    .any(|e| e.file_name() == name);
                if !found {
                    return false;
                }
                current.push(name);
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Root-level `*.md` files plus everything under the configured scan
/// directories, minus paths matching `links.exclude_globs`. Sorted and deduplicated.
pub fn collect_markdown_files(layout: &RepoLayout) -> Result<Vec<PathBuf>> {
    let config = &layout.config().links;
    let root = layout.root();
    let mut files = Vec::new();

    if config.scan_root {
        if let Ok(entries) = std::fs::read_dir(root) {
            files.extend(
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && has_md_extension(p)),
            );
        }
    }

    let excluded = build_globset(&config.exclude_globs)?;
    for dir in &config.scan_dirs {
        let dir = root.join(dir);
        if dir.is_dir() {
            files.extend(
                markdown_files_under(&dir, root, &excluded)
                    .into_iter()
                    .filter(|p| has_md_extension(p)),
            );
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn has_md_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Check every internal link in the repository.
///
/// A file that cannot be read is recorded in the report and the scan moves on.
pub fn check_links(layout: &RepoLayout) -> Result<LinkReport> {
    let scanner = LinkScanner::new()?;
    let files = collect_markdown_files(layout)?;
    let mut report = LinkReport {
        files_scanned: files.len(),
        ..Default::default()
    };

    for path in &files {
        let source = layout.display_path(path);
        let text = match read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{}: could not read file: {}", source, e);
                report.unreadable.push(UnreadableFile {
                    source,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        for link in scanner.extract(&text) {
            if is_external(&link.target) || is_anchor_only(&link.target) {
                continue;
            }
            report.links_checked += 1;
            if !resolve_link(path, &link.target) {
                log::debug!("{}:{}: broken link to {}", source, link.line, link.target);
                report.broken.push(BrokenLink {
                    source: source.clone(),
                    link,
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn targets(text: &str) -> Vec<String> {
        LinkScanner::new()
            .unwrap()
            .extract(text)
            .into_iter()
            .map(|l| l.target)
            .collect()
    }

    #[test]
    fn test_extracts_links_and_skips_images() {
        assert_eq!(
            targets("See [a](a.md) and ![img](pic.png) and [b](b.md#x)\n"),
            vec!["a.md", "b.md#x"]
        );
    }

    #[test]
    fn test_image_followed_by_link_in_same_span() {
        assert_eq!(targets("![a [b](c.md)\n"), vec!["c.md"]);
    }

    #[test]
    fn test_skips_code() {
        let text = "```\n[fenced](nope.md)\n```\nUse `[inline](nope.md)` or [real](yes.md)\n";
        assert_eq!(targets(text), vec!["yes.md"]);
    }

    #[test]
    fn test_line_numbers() {
        let links = LinkScanner::new().unwrap().extract("one\n\n[x](y.md)\n");
        assert_eq!(links[0].line, 3);
        assert_eq!(links[0].text, "x");
    }

    #[test]
    fn test_target_classification() {
        assert!(is_external("https://example.com"));
        assert!(is_external("mailto:someone@example.com"));
        assert!(!is_external("docs/a.md"));
        assert!(is_anchor_only("#section"));
    }

    #[test]
    fn test_resolution_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs/sub")).unwrap();
        fs::write(root.join("docs/Guide.md"), "").unwrap();
        let source = root.join("docs/sub/page.md");
        fs::write(&source, "").unwrap();

        assert!(resolve_link(&source, "../Guide.md"));
        assert!(resolve_link(&source, "../Guide.md#intro"));
        assert!(resolve_link(&source, "./"));
        assert!(resolve_link(&source, ".."));
        assert!(!resolve_link(&source, "../guide.md"));
        assert!(!resolve_link(&source, "../missing.md"));
    }

    #[test]
    fn test_check_links_over_repository() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs/ignore")).unwrap();
        fs::create_dir_all(root.join("plugins/p")).unwrap();
        fs::write(root.join("README.md"), "[docs](docs/index.md)\n[web](https://x.dev)\n").unwrap();
        fs::write(root.join("docs/index.md"), "[top](../README.md)\n[gone](nowhere.md)\n").unwrap();
        fs::write(root.join("docs/ignore/old.md"), "[gone](nowhere.md)\n").unwrap();
        fs::write(root.join("plugins/p/README.md"), "[anchor](#usage)\n").unwrap();

        let layout = RepoLayout::new(root, Config::default());
        let report = check_links(&layout).unwrap();

        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.links_checked, 3);
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].line(), "docs/index.md:2: [gone](nowhere.md)");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_unreadable_file_does_not_stop_the_scan() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/bad.md"), b"\xff\xfe").unwrap();
        fs::write(root.join("docs/good.md"), "[gone](missing.md)\n").unwrap();

        let mut config = Config::default();
        config.links.scan_root = false;
        let report = check_links(&RepoLayout::new(root, config)).unwrap();

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].line(), "docs/good.md:1: [gone](missing.md)");
        assert_eq!(report.unreadable.len(), 1);
        assert_eq!(report.unreadable[0].source, "docs/bad.md");
        assert_eq!(report.exit_code(), 1);

        let mut out = Vec::new();
        report.write_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1 file(s) could not be read:\n  docs/bad.md: could not read file: "));
        assert!(text.contains("1 broken link(s) found:"));
    }

    #[test]
    fn test_exclude_globs_skip_matching_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs/drafts")).unwrap();
        fs::write(root.join("docs/index.md"), "").unwrap();
        fs::write(root.join("docs/drafts/wip.md"), "").unwrap();
        fs::write(root.join("docs/notes.draft.md"), "").unwrap();

        let mut config = Config::default();
        config.links.exclude_globs = vec![
            "docs/drafts/**".to_string(),
            "**/*.draft.md".to_string(),
        ];
        let files = collect_markdown_files(&RepoLayout::new(root, config)).unwrap();

        assert_eq!(files, vec![root.join("docs/index.md")]);
    }
}
