//! Core document model
//!
//! A [`Document`] is a markdown file split into its parsed front matter and
//! body. Documents without front matter keep their whole text as the body.

use crate::core::front_matter::{
    render_fields, FrontMatterError, FrontMatterParser, DELIMITER,
};
use crate::core::value::{FieldMap, FieldValue};

/// A markdown file as front matter fields plus body text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: Option<FieldMap>,
    body: String,
    /// Text the document was parsed from, if any
    source: Option<String>,
}

impl Document {
    pub fn new(fields: Option<FieldMap>, body: String) -> Self {
        Self {
            fields,
            body,
            source: None,
        }
    }

    /// Parse with the lenient parser. Text without a usable block becomes
    /// the body of a document with no front matter.
    pub fn parse(content: &str) -> Self {
        Self::parse_with(&FrontMatterParser::new(), content).unwrap_or_else(|_| Self {
            fields: None,
            body: content.to_string(),
            source: Some(content.to_string()),
        })
    }

    /// Parse, reporting why the front matter could not be read
    pub fn parse_with(
        parser: &FrontMatterParser,
        content: &str,
    ) -> Result<Self, FrontMatterError> {
        let parsed = parser.parse(content)?;
        Ok(Self {
            fields: Some(parsed.fields),
            body: parsed.body,
            source: Some(content.to_string()),
        })
    }

    pub fn front_matter(&self) -> Option<&FieldMap> {
        self.fields.as_ref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the document has a front matter block, possibly empty
    pub fn has_front_matter(&self) -> bool {
        self.fields.is_some()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.as_ref()?.get(key)
    }

    /// Whether rendering would produce text other than what was parsed.
    /// Documents built in memory always count as modified.
    pub fn is_modified(&self) -> bool {
        self.source.as_deref() != Some(self.render().as_str())
    }

    pub fn render(&self) -> String {
        match &self.fields {
            Some(fields) => format!(
                "{delim}\n{}{delim}\n{}",
                render_fields(fields),
                self.body,
                delim = DELIMITER
            ),
            None => self.body.clone(),
        }
    }
}
