use super::{DocumentKind, Finding, Report};
use crate::core::FrontMatterParser;
use crate::error::Result;
use crate::io::{read_to_string, RepoLayout};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Number of documents of each kind that had front matter to validate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub adrs: usize,
    pub research: usize,
    pub skills: usize,
    pub agents: usize,
}

impl CheckSummary {
    fn bump(&mut self, kind: DocumentKind) {
        match kind {
            DocumentKind::Adr => self.adrs += 1,
            DocumentKind::Research => self.research += 1,
            DocumentKind::Skill => self.skills += 1,
            DocumentKind::Agent => self.agents += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.adrs + self.research + self.skills + self.agents
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validated {} ADR(s), {} research doc(s), {} skill(s), {} agent(s)",
            self.adrs, self.research, self.skills, self.agents
        )
    }
}

fn documents_of(layout: &RepoLayout, kind: DocumentKind) -> Result<Vec<PathBuf>> {
    match kind {
        DocumentKind::Adr => Ok(layout.decision_records()),
        DocumentKind::Research => Ok(layout.research_docs()),
        DocumentKind::Skill => layout.skill_files(),
        DocumentKind::Agent => layout.agent_files(),
    }
}

/// Validate every ADR, research document, skill and agent in a repository.
///
/// Documents without front matter are reported and left out of the counts.
/// Only an invalid layout glob is an error.
pub fn check_repository(
    layout: &RepoLayout,
    parser: &FrontMatterParser,
) -> Result<(CheckSummary, Report)> {
    let mut summary = CheckSummary::default();
    let mut report = Report::new();

    for kind in DocumentKind::ALL {
        for path in documents_of(layout, kind)? {
            let source = layout.display_path(&path);
            let text = match read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    report.push(source, Finding::error(format!("could not read file: {}", e)));
                    continue;
                }
            };

            let findings = match parser.parse(&text) {
                Ok(fm) => {
                    summary.bump(kind);
                    kind.validator().validate(&fm.fields)
                }
                Err(e) => vec![Finding::error(e.to_string())],
            };
            log::debug!("{} ({}): {} finding(s)", source, kind, findings.len());
            report.extend(&source, findings);
        }
    }

    Ok((summary, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_check_repository_counts_and_reports() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "docs/decisions/0001-use-rust.md",
            "---\ntitle: Use Rust\nstatus: accepted\ndate: 2026-02-13\ndecision-makers: [alice]\n---\n",
        );
        write(root, "docs/decisions/0002-no-fm.md", "# Nothing here\n");
        write(
            root,
            "docs/research/2026-02-10-q.md",
            "---\nquestion: Q?\nstatus: active\nstarted: 2026-02-10\ntags: [a]\n---\n",
        );
        write(
            root,
            "plugins/p/skills/s/SKILL.md",
            "---\nname: BadName\ndescription: d\n---\n",
        );
        write(
            root,
            "plugins/p/agents/a.md",
            "---\nname: a\ndescription: d\nmodel: opus\n---\n",
        );

        let layout = RepoLayout::new(root, Config::default());
        let (summary, report) = check_repository(&layout, &FrontMatterParser::new()).unwrap();

        assert_eq!(
            summary,
            CheckSummary {
                adrs: 1,
                research: 1,
                skills: 1,
                agents: 1
            }
        );
        assert_eq!(
            summary.to_string(),
            "Validated 1 ADR(s), 1 research doc(s), 1 skill(s), 1 agent(s)"
        );
        let lines: Vec<String> = report.errors().map(|e| e.line()).collect();
        assert_eq!(
            lines,
            vec![
                "docs/decisions/0002-no-fm.md: no front matter found".to_string(),
                "plugins/p/skills/s/SKILL.md: name 'BadName' is not kebab-case".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_repository() {
        let dir = TempDir::new().unwrap();
        let layout = RepoLayout::new(dir.path(), Config::default());
        let (summary, report) = check_repository(&layout, &FrontMatterParser::new()).unwrap();
        assert_eq!(summary.total(), 0);
        assert!(report.is_empty());
    }

    #[test]
    fn test_invalid_layout_glob_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.layout.skill_globs = vec!["*/skills/[".to_string()];
        let layout = RepoLayout::new(dir.path(), config);

        let err = check_repository(&layout, &FrontMatterParser::new()).unwrap_err();
        assert!(matches!(err, crate::error::BazaarError::Glob(_)));
    }
}
