//! Core library types for front matter handling
//!
//! - [`FieldValue`] / [`FieldMap`]: the values the front matter subset can hold
//! - [`FrontMatterParser`]: the line-oriented YAML-subset parser
//! - [`Document`]: a markdown file split into front matter and body

pub mod document;
pub mod front_matter;
pub mod value;

pub use document::Document;
pub use front_matter::{
    parse_fields, parse_front_matter, render_fields, rewrite_scalar, split_front_matter,
    FrontMatter, FrontMatterError, FrontMatterParser, Strictness,
};
pub use value::{FieldMap, FieldValue};
