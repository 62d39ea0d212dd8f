//! bazaar-tools: maintenance tooling for a plugin marketplace repository
//!
//! The library checks the markdown documents a marketplace repository keeps
//! (decision records, research notes, skills and subagents), keeps generated
//! indexes current, and wraps the few external systems the repository talks
//! to (the `gh` CLI and `llms.txt` documentation indexes).
//!
//! # Features
//!
//! - **Front matter parsing** for the flat YAML subset the documents use,
//!   with lenient and strict handling of unterminated blocks
//! - **Per-kind validators** producing error and warning findings
//! - **Link, manifest and subagent checks** with the same report format
//! - **Index generation** for decision records and research documents,
//!   including staleness tracking for concluded research
//! - **Label sync and docs mirroring** behind traits, so they run against
//!   in-memory fakes in tests
//!
//! # Quick Start
//!
//! ```rust
//! use bazaar_tools::{validate_text, DocumentKind, FrontMatterParser};
//!
//! let text = "---\ntitle: Use Rust\nstatus: accepted\ndate: 2025-01-15\ndecision-makers: [alice]\n---\n";
//! let findings = validate_text(DocumentKind::Adr, text, &FrontMatterParser::new());
//! assert!(findings.is_empty());
//! ```
//!
//! ## Checking a Repository
//!
//! ```rust,no_run
//! use bazaar_tools::{check_repository, Config, FrontMatterParser, RepoLayout, Result};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let config = Config::resolve(Path::new("."), None)?;
//!     let parser = FrontMatterParser::with_strictness(config.frontmatter.strictness());
//!     let layout = RepoLayout::new(".", config);
//!
//!     let (summary, report) = check_repository(&layout, &parser)?;
//!     println!("{}", summary);
//!     std::process::exit(report.exit_code());
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod index;
pub mod io;
pub mod labels;
pub mod links;
pub mod manifest;
pub mod scaffold;
pub mod show;
pub mod validate;

pub use config::{load_config, Config};
pub use crate::core::{
    parse_front_matter, Document, FieldMap, FieldValue, FrontMatter, FrontMatterError,
    FrontMatterParser, Strictness,
};
pub use error::{BazaarError, Result};
pub use io::RepoLayout;
pub use validate::{
    check_repository, validate_subagent_file, validate_text, CheckSummary, DocumentKind, Finding,
    Report, Severity, Validator,
};
