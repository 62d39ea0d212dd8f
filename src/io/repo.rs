//! Repository layout: where each kind of document lives
//!
//! Paths returned here are joined onto the repository root and sorted, so
//! every driver visits documents in a stable order.

use crate::config::Config;
use crate::error::Result;
use crate::io::fs::{build_globset, files_matching};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ADR_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-").unwrap());

/// Whether a file name looks like a numbered decision record (`0001-title.md`)
pub fn is_adr_file_name(name: &str) -> bool {
    ADR_NUMBER.is_match(name) && name.ends_with(".md")
}

/// A repository root paired with its configured layout
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
    config: Config,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn decisions_dir(&self) -> PathBuf {
        self.root.join(&self.config.decisions_dir)
    }

    pub fn research_dir(&self) -> PathBuf {
        self.root.join(&self.config.research_dir)
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join(&self.config.plugins_dir)
    }

    pub fn marketplace_path(&self) -> PathBuf {
        self.root.join(&self.config.marketplace)
    }

    /// `NNNN-*.md` files directly inside the decisions directory
    pub fn decision_records(&self) -> Vec<PathBuf> {
        list_dir_files(&self.decisions_dir(), is_adr_file_name)
    }

    /// `*.md` files directly inside the research directory, except `_*` files
    pub fn research_docs(&self) -> Vec<PathBuf> {
        list_dir_files(&self.research_dir(), |name| {
            name.ends_with(".md") && !name.starts_with('_')
        })
    }

    /// Files under the plugins directory matching `layout.skill_globs`
    pub fn skill_files(&self) -> Result<Vec<PathBuf>> {
        let globs = build_globset(&self.config.layout.skill_globs)?;
        Ok(files_matching(&self.plugins_dir(), &globs))
    }

    /// Files under the plugins directory matching `layout.agent_globs`
    pub fn agent_files(&self) -> Result<Vec<PathBuf>> {
        let globs = build_globset(&self.config.layout.agent_globs)?;
        Ok(files_matching(&self.plugins_dir(), &globs))
    }

    /// Show a path relative to the repository root when possible
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

fn list_dir_files(dir: &Path, accept: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::debug!("{} is not a readable directory", dir.display());
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| e.file_name().to_str().is_some_and(&accept))
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}
