//! Collecting findings across many files and printing them

use super::{Finding, Severity};
use serde::Serialize;
use std::io::{self, Write};

/// A finding tagged with the file (or manifest entry) it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub source: String,
    #[serde(flatten)]
    pub finding: Finding,
}

impl ReportEntry {
    /// `source: message`, or just the message when there is no source
    pub fn line(&self) -> String {
        if self.source.is_empty() {
            self.finding.message.clone()
        } else {
            format!("{}: {}", self.source, self.finding.message)
        }
    }
}

/// Every finding of a run, in the order it was produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl Into<String>, finding: Finding) {
        self.entries.push(ReportEntry {
            source: source.into(),
            finding,
        });
    }

    pub fn extend(&mut self, source: &str, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.push(source, finding);
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReportEntry> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ReportEntry> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(move |e| e.finding.severity == severity)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Process exit status for this report: 1 when any error was found
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Print errors and warnings as `  ERROR: source: message` lines, or the
    /// success line when nothing failed.
    pub fn write_summary<W: Write>(&self, out: &mut W, success: &str) -> io::Result<()> {
        let errors = self.error_count();
        if errors > 0 {
            writeln!(out, "\n{} error(s) found:", errors)?;
            for entry in self.errors() {
                writeln!(out, "  ERROR: {}", entry.line())?;
            }
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(out, "\n{} warning(s) found:", warnings)?;
            for entry in self.warnings() {
                writeln!(out, "  WARNING: {}", entry.line())?;
            }
        }

        if errors == 0 {
            if warnings > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", success)?;
        }
        Ok(())
    }

    /// Print findings grouped under `ERRORS:` and `WARNINGS:` headings with
    /// symbol markers, as used for single-file checks.
    pub fn write_grouped<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.has_errors() {
            writeln!(out, "ERRORS:")?;
            for entry in self.errors() {
                writeln!(out, "  \u{2717} {}", entry.line())?;
            }
            writeln!(out)?;
        }
        if self.warning_count() > 0 {
            writeln!(out, "WARNINGS:")?;
            for entry in self.warnings() {
                writeln!(out, "  \u{26a0} {}", entry.line())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
