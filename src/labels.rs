//! GitHub label synchronisation
//!
//! Labels come from a fixed table (PDLC stages plus general categories) and
//! from the plugins listed in the marketplace manifest. Missing labels are
//! created and drifted ones updated. Nothing is ever deleted.
//!
//! GitHub is reached through a [`LabelBackend`]; [`GhCli`] shells out to the
//! `gh` command line tool.

use crate::error::{BazaarError, Result};
use crate::manifest::{load_marketplace, plugin_names};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub const PLUGIN_LABEL_COLOR: &str = "fbca04";

const STATIC_LABELS: &[(&str, &str, &str)] = &[
    ("stage/concept", "PDLC Stage 1: Define scope and ambition", "e8d5f5"),
    ("stage/research", "PDLC Stage 2: Study the domain", "d4b8e8"),
    ("stage/design", "PDLC Stage 3: Make opinionated choices", "c09bdb"),
    ("stage/build", "PDLC Stage 4: Implement the plugin", "ac7ece"),
    ("stage/prove", "PDLC Stage 5: Test in real work", "9861c1"),
    ("stage/review", "PDLC Stage 6: Structured self-review", "8444b4"),
    ("stage/document", "PDLC Stage 7: Write for the stranger", "7027a7"),
    ("stage/ship", "PDLC Stage 8: Put it on the shelves", "5c0a9a"),
    ("stage/maintenance", "PDLC Stage 9: Ongoing post-ship care", "480a8d"),
    ("plugin-proposal", "A new plugin proposed for the Bazaar", "0e8a16"),
    ("bug", "Something is broken", "d73a4a"),
    ("enhancement", "New feature or improvement", "a2eeef"),
    ("maintenance", "Dependency updates, cleanup, CI/CD", "f9d0c4"),
    ("research", "Standalone research spike", "1d76db"),
    ("blocked", "Waiting on external dependency or decision", "b60205"),
    ("needs-code-actual", "Requires human decision before proceeding", "ff7619"),
];

/// A label as it should exist on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpec {
    pub name: String,
    pub description: String,
    /// Hex color without the leading `#`
    pub color: String,
}

impl LabelSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, color: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: color.trim_start_matches('#').to_string(),
        }
    }

    /// `plugin/<name>` label for a marketplace plugin
    pub fn for_plugin(plugin: &str) -> Self {
        Self::new(
            format!("plugin/{}", plugin),
            format!("Plugin: {}", plugin),
            PLUGIN_LABEL_COLOR,
        )
    }
}

/// A label as reported by GitHub
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExistingLabel {
    pub name: String,
    pub description: String,
    pub color: String,
}

pub fn static_labels() -> Vec<LabelSpec> {
    STATIC_LABELS
        .iter()
        .map(|(name, description, color)| LabelSpec::new(*name, *description, color))
        .collect()
}

/// Plugin labels for the union of `names` and `extra`, sorted by plugin name
pub fn plugin_labels<I, J>(names: I, extra: J) -> Vec<LabelSpec>
where
    I: IntoIterator<Item = String>,
    J: IntoIterator<Item = String>,
{
    let all: BTreeSet<String> = names.into_iter().chain(extra).collect();
    all.iter().map(|n| LabelSpec::for_plugin(n)).collect()
}

/// Plugin names from the marketplace manifest. A missing or malformed
/// manifest only costs the plugin labels.
pub fn marketplace_plugin_names(path: &Path) -> Vec<String> {
    match load_marketplace(path) {
        Ok(data) => plugin_names(&data),
        Err(e) => {
            log::warn!("{}, skipping dynamic plugin labels", e);
            Vec::new()
        }
    }
}

/// What has to happen to one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    Create,
    Update,
    Unchanged,
}

/// Compare a wanted label against the current set. Colors compare
/// case-insensitively and without `#`.
pub fn plan(spec: &LabelSpec, existing: &HashMap<String, ExistingLabel>) -> LabelAction {
    let Some(current) = existing.get(&spec.name) else {
        return LabelAction::Create;
    };
    let color_drift = !current
        .color
        .trim_start_matches('#')
        .eq_ignore_ascii_case(&spec.color);
    if color_drift || current.description != spec.description {
        LabelAction::Update
    } else {
        LabelAction::Unchanged
    }
}

/// Access to a repository's labels
pub trait LabelBackend {
    fn is_authenticated(&self) -> bool;

    fn list(&self) -> Result<Vec<ExistingLabel>>;

    fn create(&self, label: &LabelSpec) -> Result<()>;

    fn update(&self, label: &LabelSpec) -> Result<()>;
}

/// [`LabelBackend`] backed by the `gh` CLI, run from the repository root
#[derive(Debug, Clone)]
pub struct GhCli {
    root: PathBuf,
}

impl GhCli {
    pub const PROGRAM: &'static str = "gh";
    pub const LIST_LIMIT: u32 = 200;

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        log::debug!("+ {} {}", Self::PROGRAM, args.join(" "));
        Command::new(Self::PROGRAM)
            .current_dir(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BazaarError::command(Self::PROGRAM, format!("failed to start: {}", e)))
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(BazaarError::command(
                Self::PROGRAM,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

impl LabelBackend for GhCli {
    fn is_authenticated(&self) -> bool {
        self.output(&["auth", "status"])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn list(&self) -> Result<Vec<ExistingLabel>> {
        let limit = Self::LIST_LIMIT.to_string();
        let stdout = self.run(&[
            "label",
            "list",
            "--limit",
            &limit,
            "--json",
            "name,description,color",
        ])?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    fn create(&self, label: &LabelSpec) -> Result<()> {
        self.run(&[
            "label",
            "create",
            &label.name,
            "--description",
            &label.description,
            "--color",
            &label.color,
            "--force",
        ])
        .map(drop)
    }

    fn update(&self, label: &LabelSpec) -> Result<()> {
        self.run(&[
            "label",
            "edit",
            &label.name,
            "--description",
            &label.description,
            "--color",
            &label.color,
        ])
        .map(drop)
    }
}

/// Tally of a sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl SyncOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Bring the repository's labels in line with `static_set` and `plugin_set`.
///
/// Fails before touching anything when the backend is not authenticated or
/// the current labels cannot be listed. Individual create or update failures
/// are reported and counted.
pub fn sync_labels<B: LabelBackend, W: Write>(
    backend: &B,
    static_set: &[LabelSpec],
    plugin_set: &[LabelSpec],
    dry_run: bool,
    out: &mut W,
) -> Result<SyncOutcome> {
    writeln!(out, "Checking gh CLI authentication...")?;
    if !backend.is_authenticated() {
        return Err(BazaarError::command(
            GhCli::PROGRAM,
            "gh CLI is not authenticated. Run `gh auth login` first.",
        ));
    }
    writeln!(out, "  Authenticated.\n")?;

    writeln!(out, "Fetching existing labels...")?;
    let existing: HashMap<String, ExistingLabel> = backend
        .list()?
        .into_iter()
        .map(|l| (l.name.clone(), l))
        .collect();
    writeln!(out, "  Found {} existing label(s).\n", existing.len())?;

    let mut outcome = SyncOutcome::default();
    writeln!(out, "Syncing static labels...")?;
    for spec in static_set {
        sync_one(backend, spec, &existing, dry_run, out, &mut outcome)?;
    }

    if plugin_set.is_empty() {
        writeln!(out, "\nNo plugin labels to sync.")?;
    } else {
        writeln!(out, "\nSyncing plugin labels ({})...", plugin_set.len())?;
        for spec in plugin_set {
            sync_one(backend, spec, &existing, dry_run, out, &mut outcome)?;
        }
    }

    writeln!(out, "\nDone.")?;
    Ok(outcome)
}

fn sync_one<B: LabelBackend, W: Write>(
    backend: &B,
    spec: &LabelSpec,
    existing: &HashMap<String, ExistingLabel>,
    dry_run: bool,
    out: &mut W,
    outcome: &mut SyncOutcome,
) -> Result<()> {
    let action = plan(spec, existing);
    let (verb, past, apply): (&str, &str, fn(&B, &LabelSpec) -> Result<()>) = match action {
        LabelAction::Unchanged => {
            writeln!(out, "  OK: {}", spec.name)?;
            outcome.unchanged += 1;
            return Ok(());
        }
        LabelAction::Create => ("CREATE", "CREATED", B::create),
        LabelAction::Update => ("UPDATE", "UPDATED", B::update),
    };

    if dry_run {
        writeln!(
            out,
            "  [dry-run] would {}: {} (#{}) - {}",
            verb, spec.name, spec.color, spec.description
        )?;
    } else if let Err(e) = apply(backend, spec) {
        writeln!(out, "  ERROR {} {}: {}", verb.to_lowercase(), spec.name, e)?;
        outcome.failed += 1;
        return Ok(());
    } else {
        writeln!(out, "  {}: {}", past, spec.name)?;
    }

    match action {
        LabelAction::Create => outcome.created += 1,
        _ => outcome.updated += 1,
    }
    Ok(())
}
