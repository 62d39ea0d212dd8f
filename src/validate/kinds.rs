//! Rule sets for the four document kinds found in a marketplace repository

use super::rules::{field_text, is_kebab_case, iso_date, one_of, require};
use super::{DocumentKind, Finding, Validator};
use crate::core::FieldMap;

pub const ADR_STATUSES: &[&str] = &["draft", "proposed", "accepted", "superseded", "deprecated"];
pub const RESEARCH_STATUSES: &[&str] = &["draft", "active", "concluded", "stale"];
pub const AGENT_MODELS: &[&str] = &["sonnet", "opus", "haiku", "inherit"];

/// Architecture decision records under the decisions directory
#[derive(Debug, Clone, Copy, Default)]
pub struct AdrValidator;

impl Validator for AdrValidator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Adr
    }

    fn validate(&self, fields: &FieldMap) -> Vec<Finding> {
        let mut findings = require(fields, &["title", "status", "date", "decision-makers"]);
        findings.extend(one_of(fields, "status", ADR_STATUSES));
        findings.extend(iso_date(fields, "date", "date"));
        findings
    }
}

/// Research documents under the research directory
#[derive(Debug, Clone, Copy, Default)]
pub struct ResearchValidator;

impl Validator for ResearchValidator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Research
    }

    fn validate(&self, fields: &FieldMap) -> Vec<Finding> {
        let mut findings = require(fields, &["question", "status", "started", "tags"]);
        findings.extend(one_of(fields, "status", RESEARCH_STATUSES));
        findings.extend(iso_date(fields, "started", "started date"));
        findings
    }
}

/// `SKILL.md` files inside plugins
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillValidator;

impl Validator for SkillValidator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Skill
    }

    fn validate(&self, fields: &FieldMap) -> Vec<Finding> {
        let mut findings = require(fields, &["name", "description"]);
        if let Some(name) = field_text(fields, "name") {
            if !is_kebab_case(&name) {
                findings.push(Finding::error(format!("name '{}' is not kebab-case", name)));
            }
        }
        findings
    }
}

/// Agent definitions inside plugins
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentValidator;

impl Validator for AgentValidator {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Agent
    }

    fn validate(&self, fields: &FieldMap) -> Vec<Finding> {
        let mut findings = require(fields, &["name", "description"]);
        findings.extend(one_of(fields, "model", AGENT_MODELS));
        findings
    }
}
