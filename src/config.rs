//! Repository configuration
//!
//! Every setting has a default matching the bazaar's repository layout, so the
//! config file is optional. When present, `bazaar.toml` at the repository
//! root overrides individual keys.

use crate::core::Strictness;
use crate::error::{BazaarError, Result};
use crate::io::build_globset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up at the repository root
pub const CONFIG_FILE_NAME: &str = "bazaar.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory holding `NNNN-*.md` decision records
    pub decisions_dir: PathBuf,
    /// Directory holding research documents
    pub research_dir: PathBuf,
    /// Directory holding one sub-directory per plugin
    pub plugins_dir: PathBuf,
    /// Marketplace manifest
    pub marketplace: PathBuf,
    pub layout: LayoutConfig,
    pub frontmatter: FrontMatterConfig,
    pub links: LinksConfig,
    pub fetch: FetchConfig,
    pub research: ResearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decisions_dir: PathBuf::from("docs/decisions"),
            research_dir: PathBuf::from("docs/research"),
            plugins_dir: PathBuf::from("plugins"),
            marketplace: PathBuf::from(".claude-plugin/marketplace.json"),
            layout: LayoutConfig::default(),
            frontmatter: FrontMatterConfig::default(),
            links: LinksConfig::default(),
            fetch: FetchConfig::default(),
            research: ResearchConfig::default(),
        }
    }
}

/// Where skills and agents live, as globs relative to `plugins_dir`
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LayoutConfig {
    pub skill_globs: Vec<String>,
    pub agent_globs: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            skill_globs: vec!["*/skills/*/SKILL.md".to_string()],
            agent_globs: vec!["*/agents/*.md".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FrontMatterConfig {
    /// Report unterminated front matter separately from missing front matter
    pub strict: bool,
}

impl FrontMatterConfig {
    pub fn strictness(&self) -> Strictness {
        if self.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LinksConfig {
    /// Directories scanned recursively for markdown files
    pub scan_dirs: Vec<PathBuf>,
    /// Paths skipped while scanning, as globs relative to the repository root
    pub exclude_globs: Vec<String>,
    /// Scan `*.md` files at the repository root
    pub scan_root: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            scan_dirs: vec![PathBuf::from("docs"), PathBuf::from("plugins")],
            exclude_globs: vec!["docs/ignore/**".to_string()],
            scan_root: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    /// Delay between requests, in seconds
    pub delay_secs: f64,
    /// Per-request timeout, in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            delay_secs: 0.2,
            timeout_secs: 30,
            user_agent: format!("bazaar-docs-fetcher/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// Days after `concluded` before a research document is marked stale
    pub stale_after_days: i64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            stale_after_days: 90,
        }
    }
}

/// Load and validate a config file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BazaarError::config(path, format!("failed to read config file: {}", e))
    })?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| BazaarError::config(path, format!("failed to parse config file: {}", e)))?;

    config.validate(path)?;
    Ok(config)
}

impl Config {
    /// Resolve the configuration for a repository root.
    ///
    /// An explicit path must exist; otherwise `bazaar.toml` is used when present
    /// and defaults apply when it is not.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<Config> {
        match explicit {
            Some(path) => load_config(path),
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    load_config(&default_path)
                } else {
                    log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    Ok(Config::default())
                }
            }
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if !self.fetch.delay_secs.is_finite() || self.fetch.delay_secs < 0.0 {
            return Err(BazaarError::config(path, "fetch.delay_secs must be >= 0"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(BazaarError::config(path, "fetch.timeout_secs must be > 0"));
        }
        for (key, patterns) in [
            ("layout.skill_globs", &self.layout.skill_globs),
            ("layout.agent_globs", &self.layout.agent_globs),
            ("links.exclude_globs", &self.links.exclude_globs),
        ] {
            build_globset(patterns)
                .map_err(|e| BazaarError::config(path, format!("{}: {}", key, e)))?;
        }
        if self.research.stale_after_days < 0 {
            return Err(BazaarError::config(
                path,
                "research.stale_after_days must be >= 0",
            ));
        }
        Ok(())
    }
}
