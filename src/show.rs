//! Parsed front matter printed as YAML or JSON
//!
//! One file prints its mapping directly. Several files print a mapping keyed
//! by path. Files that cannot be read or have no usable front matter are
//! collected as failures and never stop the others from printing.

use crate::core::{Document, FieldMap, FrontMatterParser};
use crate::error::Result;
use crate::io::read_to_string;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Render any serializable value in the given format, newline-terminated
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json => serde_json::to_string_pretty(value)? + "\n",
    })
}

/// Front matter read from a set of files
#[derive(Debug, Default)]
pub struct ShowResult {
    /// Parsed fields keyed by path
    pub fields: BTreeMap<String, FieldMap>,
    /// One `path: reason` line per file that produced no fields
    pub failures: Vec<String>,
    single: bool,
}

impl ShowResult {
    pub fn exit_code(&self) -> i32 {
        if self.failures.is_empty() {
            0
        } else {
            1
        }
    }

    /// Write the parsed fields. Nothing is written when no file parsed.
    pub fn write_output<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<()> {
        if self.fields.is_empty() {
            return Ok(());
        }
        let text = match self.fields.values().next() {
            Some(fields) if self.single => render(fields, format)?,
            _ => render(&self.fields, format)?,
        };
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Parse the front matter of every file
pub fn collect_front_matter(files: &[PathBuf], parser: &FrontMatterParser) -> ShowResult {
    let mut result = ShowResult {
        single: files.len() == 1,
        ..Default::default()
    };

    for file in files {
        log::debug!("Processing file: {}", file.display());
        let parsed = read_to_string(file)
            .map_err(|e| e.to_string())
            .and_then(|text| Document::parse_with(parser, &text).map_err(|e| e.to_string()));
        match parsed {
            Ok(doc) => {
                let fields = doc.front_matter().cloned().unwrap_or_default();
                result.fields.insert(file.to_string_lossy().into_owned(), fields);
            }
            Err(reason) => result.failures.push(format!("{}: {}", file.display(), reason)),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const SKILL: &str = "---\nname: release-notes\ntags:\n  - docs\n  - release\n---\nBody\n";

    fn output(result: &ShowResult, format: OutputFormat) -> String {
        let mut out = Vec::new();
        result.write_output(&mut out, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_file_prints_its_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SKILL.md");
        fs::write(&path, SKILL).unwrap();

        let result = collect_front_matter(&[path], &FrontMatterParser::new());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(
            output(&result, OutputFormat::Yaml),
            "name: release-notes\ntags:\n- docs\n- release\n"
        );
        assert_eq!(
            output(&result, OutputFormat::Json),
            "{\n  \"name\": \"release-notes\",\n  \"tags\": [\n    \"docs\",\n    \"release\"\n  ]\n}\n"
        );
    }

    #[test]
    fn test_several_files_are_keyed_by_path() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.md");
        let second = dir.path().join("b.md");
        fs::write(&first, SKILL).unwrap();
        fs::write(&second, "---\nname: other\n---\n").unwrap();

        let files = vec![first.clone(), second.clone()];
        let result = collect_front_matter(&files, &FrontMatterParser::new());
        let json: serde_json::Value =
            serde_json::from_str(&output(&result, OutputFormat::Json)).unwrap();

        assert_eq!(json[first.to_string_lossy().as_ref()]["name"], "release-notes");
        assert_eq!(json[second.to_string_lossy().as_ref()]["name"], "other");
    }

    #[test]
    fn test_absent_front_matter_fails_without_hiding_other_files() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.md");
        let plain = dir.path().join("plain.md");
        let binary = dir.path().join("binary.md");
        fs::write(&good, SKILL).unwrap();
        fs::write(&plain, "# No front matter\n").unwrap();
        fs::write(&binary, b"\xff\xfe").unwrap();

        let files = vec![binary.clone(), good.clone(), plain.clone()];
        let result = collect_front_matter(&files, &FrontMatterParser::new());

        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.fields.len(), 1);
        assert!(result.fields.contains_key(good.to_string_lossy().as_ref()));
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].starts_with(&format!("{}: ", binary.display())));
        assert_eq!(
            result.failures[1],
            format!("{}: no front matter found", plain.display())
        );
    }

    #[test]
    fn test_strict_parser_reports_unterminated_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("open.md");
        fs::write(&path, "---\nname: open\n").unwrap();

        let result = collect_front_matter(&[path.clone()], &FrontMatterParser::strict());
        assert_eq!(result.exit_code(), 1);
        assert_eq!(
            result.failures,
            vec![format!(
                "{}: unterminated front matter (missing closing ---)",
                path.display()
            )]
        );
        assert_eq!(output(&result, OutputFormat::Yaml), "");
    }
}
