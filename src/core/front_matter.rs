//! Front matter extraction and the YAML-subset field parser
//!
//! Front matter is the block between a leading `---` line and the next `---`
//! line. Its contents are read line by line with a small state machine that
//! understands exactly the subset used by the bazaar's documents:
//!
//! - `key: value` scalars, with one layer of matching `'` or `"` stripped
//! - `key: null`
//! - inline lists `key: [a, b, c]`
//! - block lists, a `key:` line followed by `  - item` lines
//! - block scalars, `key: |` followed by indented lines
//!
//! Comment lines and blank lines are skipped. A key assigned twice keeps the
//! last value (any list accumulated under the first assignment is discarded).

use crate::core::value::{FieldMap, FieldValue};
use thiserror::Error;

/// Line that opens and closes a front matter block
pub const DELIMITER: &str = "---";

/// Prefix of a block list item line
const LIST_ITEM_MARKER: &str = "  - ";

/// Why a document has no usable front matter
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterError {
    /// The document does not start with a `---` line
    #[error("no front matter found")]
    Missing,
    /// The opening `---` has no matching closing line
    #[error("unterminated front matter (missing closing ---)")]
    Unterminated,
}

/// How an unterminated block is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unterminated front matter is reported as [`FrontMatterError::Missing`]
    #[default]
    Lenient,
    /// Unterminated front matter is reported as [`FrontMatterError::Unterminated`]
    Strict,
}

/// Parsed front matter together with the rest of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub fields: FieldMap,
    pub body: String,
}

/// Per-line parser state
#[derive(Debug)]
enum State {
    /// Between fields. `key` is the last top-level key seen, if any.
    Scanning { key: Option<String> },
    /// Accumulating `  - item` lines under `key`
    InBlockList { key: String, items: Vec<String> },
    /// Accumulating indented lines of a `key: |` scalar
    InMultilineScalar { key: String, lines: Vec<String> },
}

impl State {
    fn current_key(self) -> Option<String> {
        match self {
            State::Scanning { key } => key,
            State::InBlockList { key, .. } | State::InMultilineScalar { key, .. } => Some(key),
        }
    }
}

/// Front matter parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMatterParser {
    strictness: Strictness,
}

impl FrontMatterParser {
    /// Create a lenient parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that distinguishes unterminated blocks
    pub fn strict() -> Self {
        Self::with_strictness(Strictness::Strict)
    }

    /// Create a parser with an explicit strictness
    pub fn with_strictness(strictness: Strictness) -> Self {
        Self { strictness }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Parse a whole document into its fields and body
    pub fn parse(&self, text: &str) -> Result<FrontMatter, FrontMatterError> {
        let (block, body) = match split_front_matter(text) {
            Ok(parts) => parts,
            Err(FrontMatterError::Unterminated) if self.strictness == Strictness::Lenient => {
                return Err(FrontMatterError::Missing);
            }
            Err(e) => return Err(e),
        };

        Ok(FrontMatter {
            fields: parse_fields(block),
            body: body.to_string(),
        })
    }
}

/// Parse a document's front matter with the lenient parser.
///
/// Returns `None` when the document has no front matter or the block is never
/// closed. An empty block yields an empty mapping.
pub fn parse_front_matter(text: &str) -> Option<FieldMap> {
    FrontMatterParser::new().parse(text).ok().map(|fm| fm.fields)
}

/// Split a document into the raw front matter block and the body.
///
/// The opening line must be `---` (trailing whitespace allowed) followed by a
/// line break. The block ends at the next line that is `---`.
pub fn split_front_matter(text: &str) -> Result<(&str, &str), FrontMatterError> {
    let (first, rest) = text.split_once('\n').ok_or(FrontMatterError::Missing)?;
    if first.trim_end() != DELIMITER {
        return Err(FrontMatterError::Missing);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let block = rest[..offset].trim_end_matches(['\n', '\r']);
            let body = &rest[offset + line.len()..];
            return Ok((block, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

/// Parse the lines of a front matter block (without delimiters)
pub fn parse_fields(block: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    let mut state = State::Scanning { key: None };

    for line in block.lines() {
        state = step(state, line, &mut fields);
    }

    fields
}

/// Advance the state machine by one line
fn step(state: State, line: &str, fields: &mut FieldMap) -> State {
    // Continuation lines take priority over every other rule.
    let state = match state {
        State::InMultilineScalar { key, mut lines } => {
            if is_indented(line) {
                lines.push(line.trim().to_string());
                fields.insert(key.clone(), FieldValue::Str(lines.join("\n")));
                return State::InMultilineScalar { key, lines };
            }
            State::Scanning { key: Some(key) }
        }
        other => other,
    };

    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return state;
    }

    if let Some(item) = line.strip_prefix(LIST_ITEM_MARKER) {
        let item = item.trim().to_string();
        return match state {
            State::InBlockList { key, mut items } => {
                items.push(item);
                fields.insert(key.clone(), FieldValue::List(items.clone()));
                State::InBlockList { key, items }
            }
            other => match other.current_key() {
                Some(key) => {
                    let items = vec![item];
                    fields.insert(key.clone(), FieldValue::List(items.clone()));
                    State::InBlockList { key, items }
                }
                None => State::Scanning { key: None },
            },
        };
    }

    if is_indented(line) {
        return state;
    }

    let Some((key, value)) = line.split_once(':') else {
        return state;
    };
    let key = key.trim().to_string();
    let value = value.trim();

    match value {
        "|" => {
            fields.insert(key.clone(), FieldValue::string(""));
            State::InMultilineScalar {
                key,
                lines: Vec::new(),
            }
        }
        "" => {
            fields.insert(key.clone(), FieldValue::List(Vec::new()));
            State::InBlockList {
                key,
                items: Vec::new(),
            }
        }
        _ => {
            fields.insert(key.clone(), scalar_value(value));
            State::Scanning { key: Some(key) }
        }
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Interpret the trimmed value of a `key: value` line
fn scalar_value(value: &str) -> FieldValue {
    if value.starts_with('[') && value.ends_with(']') {
        let items = value[1..value.len() - 1]
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| strip_quotes(item).unwrap_or(item).to_string())
            .collect();
        return FieldValue::List(items);
    }

    if let Some(inner) = strip_quotes(value) {
        return FieldValue::string(inner);
    }

    if value == "null" {
        return FieldValue::Null;
    }

    FieldValue::string(value)
}

/// Strip one layer of matching `"` or `'` quotes
fn strip_quotes(value: &str) -> Option<&str> {
    if value.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find(|q| value.starts_with(*q) && value.ends_with(*q))
        .map(|_| &value[1..value.len() - 1])
}

/// Render fields back into the front matter subset.
///
/// The output parses back to an equal mapping as long as keys contain no colon
/// and multiline values have no leading or trailing whitespace on their lines.
pub fn render_fields(fields: &FieldMap) -> String {
    let mut out = String::new();
    for (key, value) in fields.iter() {
        match value {
            FieldValue::Null => out.push_str(&format!("{}: null\n", key)),
            FieldValue::List(items) if items.is_empty() => {
                out.push_str(&format!("{}: []\n", key));
            }
            FieldValue::List(items) => {
                out.push_str(&format!("{}:\n", key));
                for item in items {
                    out.push_str(&format!("{}{}\n", LIST_ITEM_MARKER, item));
                }
            }
            FieldValue::Str(s) if s.contains('\n') => {
                out.push_str(&format!("{}: |\n", key));
                for line in s.split('\n') {
                    out.push_str(&format!("  {}\n", line));
                }
            }
            FieldValue::Str(s) if needs_quotes(s) => {
                out.push_str(&format!("{}: \"{}\"\n", key, s));
            }
            FieldValue::Str(s) => out.push_str(&format!("{}: {}\n", key, s)),
        }
    }
    out
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || s == "null"
        || s == "|"
        || (s.starts_with('[') && s.ends_with(']'))
        || strip_quotes(s).is_some()
}

/// Replace the value of a top-level scalar field in a document's source text.
///
/// When the key appears more than once, the last `key:` line is rewritten,
/// since that is the one the parser keeps. Comments, ordering and body are
/// preserved. Returns `None` when the document has no front matter or no
/// such key.
pub fn rewrite_scalar(text: &str, key: &str, value: &str) -> Option<String> {
    let (block, _) = split_front_matter(text).ok()?;
    let block_start = text.find('\n')? + 1;

    let mut target = None;
    let mut offset = block_start;
    for line in block.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if !is_indented(content) {
            if let Some((k, _)) = content.split_once(':') {
                if k.trim() == key {
                    target = Some((offset, content.len()));
                }
            }
        }
        offset += line.len();
    }

    let (start, len) = target?;
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&format!("{}: {}", key, value));
    out.push_str(&text[start + len..]);
    Some(out)
}
