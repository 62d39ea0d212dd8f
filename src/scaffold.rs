//! New subagent files from a template

use crate::error::{BazaarError, Result};
use crate::validate::rules::is_kebab_case;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_AGENTS_DIR: &str = ".claude/agents";

pub const NAME_RULES: &str = "\
Subagent names must be:
  - Lowercase letters, numbers, and hyphens only
  - Start with a letter
  - Not end with a hyphen
  - No consecutive hyphens
Examples: code-reviewer, test-runner, data-analyst";

/// Template for a new subagent. Optional fields are left commented out and
/// every placeholder is marked `TODO` so the subagent checker flags it.
pub fn subagent_template(name: &str) -> String {
    format!(
        r#"---
name: {name}
description: TODO: Describe when this subagent should be invoked. Include trigger words like "PROACTIVELY", "Use when", or "MUST BE USED" for automatic delegation.
tools: Read, Grep, Glob, Bash
# disallowedTools: Delete
model: sonnet
# permissionMode: default
# skills: skill-name
# memory: project
# mcpServers:
#   server-name:
#     command: npx
#     args: ["-y", "@org/server-package"]
# maxTurns: 50
# hooks:
#   PreToolUse:
#     - matcher: "Bash"
#       hooks:
#         - type: command
#           command: "./scripts/validate.sh"
---

You are a [TODO: role description] specializing in [TODO: domain].

When invoked:
1. TODO: First step
2. TODO: Second step
3. TODO: Third step

[TODO: Task name] checklist:
- TODO: Item 1
- TODO: Item 2
- TODO: Item 3

Provide [TODO: output format]:
- TODO: Structure 1
- TODO: Structure 2
- TODO: Structure 3

[TODO: Add constraints or things to avoid]
"#
    )
}

/// Write `<dir>/<name>.md` from the template, creating `dir` as needed.
///
/// Never overwrites an existing file.
pub fn create_subagent(dir: &Path, name: &str) -> Result<PathBuf> {
    if !is_kebab_case(name) {
        return Err(BazaarError::validation(format!(
            "Invalid subagent name '{}'\n{}",
            name, NAME_RULES
        )));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.md", name));

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(BazaarError::validation(format!(
                "Subagent file already exists: {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(subagent_template(name).as_bytes())?;

    log::debug!("wrote subagent template to {}", path.display());
    Ok(path)
}

/// Follow-up instructions printed after scaffolding
pub fn next_steps(path: &Path) -> String {
    format!(
        "Next steps:\n\
         1. Edit {}\n\
         2. Replace all TODO markers with actual content\n\
         3. Customize the system prompt for your use case\n\
         4. Uncomment and configure optional fields as needed\n\
         5. Test the subagent with real tasks\n\
         \n\
         To load immediately: use /agents command\n\
         Otherwise: restart Claude Code for changes to take effect",
        path.display()
    )
}
