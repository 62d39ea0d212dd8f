//! Front matter validation
//!
//! Validators never fail: each one turns a parsed field mapping into a list of
//! [`Finding`]s. Error findings fail a run, warnings only advise.
//!
//! - [`kinds`]: ADR, research, skill and agent rule sets
//! - [`subagent`]: the stand-alone subagent file checker
//! - [`report`]: aggregation and printing of findings across files
//! - [`driver`]: walking a repository and validating every known document

pub mod driver;
pub mod kinds;
pub mod report;
pub mod rules;
pub mod subagent;

use crate::core::{FieldMap, FrontMatterParser};
use serde::Serialize;
use std::fmt;

pub use driver::{check_repository, CheckSummary};
pub use kinds::{AdrValidator, AgentValidator, ResearchValidator, SkillValidator};
pub use report::{Report, ReportEntry};
pub use subagent::{validate_subagent_file, validate_subagent_text};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// The kinds of document with a declared front matter contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Adr,
    Research,
    Skill,
    Agent,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [Self::Adr, Self::Research, Self::Skill, Self::Agent];

    /// The rule set for this kind
    pub fn validator(&self) -> &'static dyn Validator {
        match self {
            Self::Adr => &AdrValidator,
            Self::Research => &ResearchValidator,
            Self::Skill => &SkillValidator,
            Self::Agent => &AgentValidator,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adr => write!(f, "ADR"),
            Self::Research => write!(f, "research doc"),
            Self::Skill => write!(f, "skill"),
            Self::Agent => write!(f, "agent"),
        }
    }
}

/// A declarative rule set applied to parsed front matter
pub trait Validator: Sync {
    fn kind(&self) -> DocumentKind;

    fn validate(&self, fields: &FieldMap) -> Vec<Finding>;
}

/// Parse a document and run the rule set for `kind` over its front matter.
///
/// A document without front matter yields a single error finding.
pub fn validate_text(kind: DocumentKind, text: &str, parser: &FrontMatterParser) -> Vec<Finding> {
    match parser.parse(text) {
        Ok(fm) => kind.validator().validate(&fm.fields),
        Err(e) => vec![Finding::error(e.to_string())],
    }
}
