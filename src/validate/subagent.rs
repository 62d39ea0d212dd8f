//! Subagent definition checks
//!
//! A subagent file is a markdown document whose front matter declares the
//! agent and whose body is its system prompt. Unlike the repository-wide
//! checks, most problems here are advisory: unknown tool names may be MCP
//! tools, and a short prompt may be intentional.

use super::rules::field_text;
use super::Finding;
use crate::core::{FieldMap, FrontMatterError, FrontMatterParser};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

pub const STANDARD_TOOLS: &[&str] = &["Read", "Write", "Edit", "Grep", "Glob", "Bash", "Delete"];
pub const SUBAGENT_MODELS: &[&str] = &["sonnet", "opus", "haiku", "inherit"];
pub const PERMISSION_MODES: &[&str] = &[
    "default",
    "acceptEdits",
    "delegate",
    "dontAsk",
    "bypassPermissions",
    "plan",
];
pub const TRIGGER_PHRASES: &[&str] = &[
    "proactively",
    "use when",
    "must be used",
    "immediately",
    "use for",
];

const MIN_DESCRIPTION_CHARS: usize = 20;
const MIN_PROMPT_CHARS: usize = 100;

/// Validate a subagent file on disk
pub fn validate_subagent_file(path: &Path) -> Vec<Finding> {
    if !path.exists() {
        return vec![Finding::error(format!("File not found: {}", path.display()))];
    }

    let mut findings = Vec::new();
    if path.extension().map_or(true, |ext| ext != "md") {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        findings.push(Finding::warning(format!(
            "Subagent files should have .md extension, got: {}",
            ext
        )));
    }

    match std::fs::read_to_string(path) {
        Ok(content) => findings.extend(validate_subagent_text(&content)),
        Err(e) => findings.push(Finding::error(format!(
            "Could not read {}: {}",
            path.display(),
            e
        ))),
    }
    findings
}

/// Validate subagent content. Front matter is always parsed strictly here.
pub fn validate_subagent_text(content: &str) -> Vec<Finding> {
    let fm = match FrontMatterParser::strict().parse(content) {
        Ok(fm) => fm,
        Err(FrontMatterError::Missing) => {
            return vec![Finding::error(
                "Missing YAML frontmatter (must start with ---)",
            )]
        }
        Err(FrontMatterError::Unterminated) => {
            return vec![Finding::error(
                "Invalid YAML frontmatter format (missing closing ---)",
            )]
        }
    };

    let fields = &fm.fields;
    let mut findings = Vec::new();
    findings.extend(check_name(&field_text(fields, "name").unwrap_or_default()));
    findings.extend(check_description(
        &field_text(fields, "description").unwrap_or_default(),
    ));
    findings.extend(check_tools(fields, "tools", "Unknown tool", true));
    findings.extend(check_tools(
        fields,
        "disallowedTools",
        "Unknown disallowed tool",
        false,
    ));
    findings.extend(check_choice(fields, "model", "Invalid model", "Valid models", SUBAGENT_MODELS));
    findings.extend(check_choice(
        fields,
        "permissionMode",
        "Invalid permissionMode",
        "Valid modes",
        PERMISSION_MODES,
    ));
    findings.extend(check_body(fm.body.trim()));
    findings.extend(check_tool_overlap(fields));
    findings
}

static SUBAGENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").unwrap());

fn is_subagent_name(name: &str) -> bool {
    SUBAGENT_NAME.is_match(name)
}

fn check_name(name: &str) -> Vec<Finding> {
    if name.is_empty() {
        return vec![Finding::error("Missing required field: name")];
    }

    let mut findings = Vec::new();
    let len = name.chars().count();
    if len > 1 && !is_subagent_name(name) {
        findings.push(Finding::error(format!(
            "Invalid name format: '{}'. Must be lowercase with hyphens only, start with a letter, and not end with hyphen",
            name
        )));
    } else if len == 1 && !name.chars().all(|c| c.is_lowercase()) {
        findings.push(Finding::error(format!(
            "Invalid name format: '{}'. Single character names must be lowercase letters",
            name
        )));
    }

    if name.contains("--") {
        findings.push(Finding::error(format!(
            "Invalid name: '{}'. No consecutive hyphens allowed",
            name
        )));
    }
    findings
}

fn check_description(desc: &str) -> Vec<Finding> {
    if desc.is_empty() {
        return vec![Finding::error("Missing required field: description")];
    }

    let mut findings = Vec::new();
    let len = desc.chars().count();
    if len < MIN_DESCRIPTION_CHARS {
        findings.push(Finding::warning(format!(
            "Description too short ({} chars). Should be at least {} characters.",
            len, MIN_DESCRIPTION_CHARS
        )));
    }

    let lower = desc.to_lowercase();
    if !TRIGGER_PHRASES.iter().any(|p| lower.contains(p)) {
        findings.push(Finding::warning(
            "Description should include trigger words for automatic delegation (e.g., 'PROACTIVELY', 'Use when', 'MUST BE USED', 'Use for')",
        ));
    }
    findings
}

fn tool_names(fields: &FieldMap, key: &str) -> Vec<String> {
    fields.get(key).map(|v| v.items()).unwrap_or_default()
}

fn check_tools(fields: &FieldMap, key: &str, label: &str, mcp_hint: bool) -> Vec<Finding> {
    tool_names(fields, key)
        .into_iter()
        .filter(|tool| !STANDARD_TOOLS.contains(&tool.as_str()))
        .map(|tool| {
            let hint = if mcp_hint {
                ". This may be valid if it's an MCP tool."
            } else {
                ""
            };
            Finding::warning(format!(
                "{}: '{}'. Standard tools: {}{}",
                label,
                tool,
                STANDARD_TOOLS.join(", "),
                hint
            ))
        })
        .collect()
}

fn check_choice(
    fields: &FieldMap,
    key: &str,
    label: &str,
    choices_label: &str,
    allowed: &[&str],
) -> Option<Finding> {
    let value = field_text(fields, key)?;
    if allowed.contains(&value.as_str()) {
        return None;
    }
    Some(Finding::error(format!(
        "{}: '{}'. {}: {}",
        label,
        value,
        choices_label,
        allowed.join(", ")
    )))
}

fn check_body(body: &str) -> Vec<Finding> {
    if body.is_empty() {
        return vec![Finding::error(
            "Empty system prompt. Add instructions for the subagent.",
        )];
    }

    let mut findings = Vec::new();
    let len = body.chars().count();
    if len < MIN_PROMPT_CHARS {
        findings.push(Finding::warning(format!(
            "System prompt is very short ({} chars). Add more detailed instructions.",
            len
        )));
    }

    let todos = body.matches("TODO").count();
    if todos > 0 {
        findings.push(Finding::warning(format!(
            "Found {} TODO marker(s) in system prompt. Replace with actual content.",
            todos
        )));
    }

    if !body.to_lowercase().contains("when invoked") {
        findings.push(Finding::warning(
            "Consider adding a 'When invoked:' section to clarify immediate actions.",
        ));
    }
    findings
}

fn check_tool_overlap(fields: &FieldMap) -> Option<Finding> {
    let allowed: BTreeSet<String> = tool_names(fields, "tools").into_iter().collect();
    let denied: BTreeSet<String> = tool_names(fields, "disallowedTools").into_iter().collect();
    let overlap: Vec<&str> = allowed.intersection(&denied).map(String::as_str).collect();
    if overlap.is_empty() {
        return None;
    }
    Some(Finding::warning(format!(
        "Tools appear in both tools and disallowedTools: {}",
        overlap.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PROMPT: &str = "You are a careful reviewer of pull requests.\n\nWhen invoked:\n1. Read the diff\n2. Report problems ordered by severity with file and line references.\n";

    fn subagent(front: &str, body: &str) -> String {
        format!("---\n{}---\n\n{}", front, body)
    }

    fn errors(findings: &[Finding]) -> Vec<&str> {
        findings
            .iter()
            .filter(|f| f.is_error())
            .map(|f| f.message.as_str())
            .collect()
    }

    fn warnings(findings: &[Finding]) -> Vec<&str> {
        findings
            .iter()
            .filter(|f| !f.is_error())
            .map(|f| f.message.as_str())
            .collect()
    }

    #[test]
    fn test_clean_subagent_passes() {
        let text = subagent(
            "name: code-reviewer\ndescription: Use PROACTIVELY after code changes to review quality\ntools: Read, Grep, Glob\nmodel: sonnet\n",
            PROMPT,
        );
        assert!(validate_subagent_text(&text).is_empty());
    }

    #[test]
    fn test_missing_and_unterminated_front_matter() {
        assert_eq!(
            errors(&validate_subagent_text("no front matter")),
            vec!["Missing YAML frontmatter (must start with ---)"]
        );
        assert_eq!(
            errors(&validate_subagent_text("---\nname: x\n")),
            vec!["Invalid YAML frontmatter format (missing closing ---)"]
        );
    }

    #[test]
    fn test_name_rules() {
        assert!(check_name("a").is_empty());
        assert!(check_name("reviewer-2").is_empty());
        assert_eq!(check_name("Reviewer").len(), 1);
        assert_eq!(check_name("A").len(), 1);
        assert_eq!(check_name("ends-").len(), 1);
        let double = check_name("a--b");
        assert_eq!(double.len(), 1);
        assert!(double[0].message.contains("consecutive hyphens"));
        assert_eq!(
            check_name(""),
            vec![Finding::error("Missing required field: name")]
        );
    }

    #[test]
    fn test_subagent_name_pattern() {
        for name in ["ab", "code-reviewer", "a1", "a--b"] {
            assert!(is_subagent_name(name), "{} should match", name);
        }
        for name in ["a", "-ab", "ab-", "Ab", "a_b", "9ab"] {
            assert!(!is_subagent_name(name), "{} should not match", name);
        }
    }

    #[test]
    fn test_description_warnings() {
        let findings = check_description("Reviews code");
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| !f.is_error()));
        assert!(check_description("Use when the user asks for a review").is_empty());
    }

    #[test]
    fn test_unknown_tools_warn() {
        let text = subagent(
            "name: helper\ndescription: Use when you need help with things\ntools: Read, mcp__github\ndisallowedTools: Teleport\n",
            PROMPT,
        );
        let findings = validate_subagent_text(&text);
        assert!(errors(&findings).is_empty());
        let w = warnings(&findings);
        assert_eq!(w.len(), 2);
        assert!(w[0].starts_with("Unknown tool: 'mcp__github'"));
        assert!(w[0].ends_with("This may be valid if it's an MCP tool."));
        assert!(w[1].starts_with("Unknown disallowed tool: 'Teleport'"));
    }

    #[test]
    fn test_block_list_tools_are_read() {
        let text = subagent(
            "name: helper\ndescription: Use when you need help with things\ntools:\n  - Read\n  - Bash\ndisallowedTools: Bash, Write\n",
            PROMPT,
        );
        let w = warnings(&validate_subagent_text(&text)).join("\n");
        assert!(w.contains("Tools appear in both tools and disallowedTools: Bash"));
    }

    #[test]
    fn test_invalid_model_and_permission_mode() {
        let text = subagent(
            "name: helper\ndescription: Use when you need help with things\nmodel: gpt\npermissionMode: yolo\n",
            PROMPT,
        );
        assert_eq!(
            errors(&validate_subagent_text(&text)),
            vec![
                "Invalid model: 'gpt'. Valid models: sonnet, opus, haiku, inherit",
                "Invalid permissionMode: 'yolo'. Valid modes: default, acceptEdits, delegate, dontAsk, bypassPermissions, plan",
            ]
        );
    }

    #[test]
    fn test_body_checks() {
        assert_eq!(
            check_body(""),
            vec![Finding::error(
                "Empty system prompt. Add instructions for the subagent."
            )]
        );
        let findings = check_body("TODO: write this. TODO: and this.");
        let msgs: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(msgs.len(), 3);
        assert!(msgs[0].starts_with("System prompt is very short (33 chars)"));
        assert_eq!(
            msgs[1],
            "Found 2 TODO marker(s) in system prompt. Replace with actual content."
        );
    }

    #[test]
    fn test_file_checks() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.md");
        let findings = validate_subagent_file(&missing);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("File not found:"));

        let txt = dir.path().join("agent.txt");
        fs::write(
            &txt,
            subagent(
                "name: helper\ndescription: Use when you need help with things\n",
                PROMPT,
            ),
        )
        .unwrap();
        assert_eq!(
            validate_subagent_file(&txt),
            vec![Finding::warning(
                "Subagent files should have .md extension, got: .txt"
            )]
        );
    }
}
