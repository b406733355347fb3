//! Install target definitions: parse built-in and user targets.toml.

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

const BUILTIN_TARGETS_TOML: &str = include_str!("builtin_targets.toml");

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

/// One third-party project to fetch, extract and provision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallTarget {
    /// Filled from the `[targets.<name>]` key.
    #[serde(skip_deserializing, default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub archive_url: String,
    pub expected_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_dir: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub credentials: Vec<CredentialFile>,
}

/// A post-extract step. Exactly one of `run` or `copy` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run: Vec<String>,
    /// Subdirectory of the installed project to run in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<CopySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopySpec {
    pub from: String,
    pub to: String,
}

/// Borrowed view of what a step does.
#[derive(Debug)]
pub enum StepAction<'a> {
    Run {
        argv: &'a [String],
        cwd: Option<&'a str>,
        env: &'a BTreeMap<String, String>,
    },
    Copy(&'a CopySpec),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialFile {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Builtin,
    User,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Builtin => f.write_str("built-in"),
            Origin::User => f.write_str("user"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TargetsFile {
    #[serde(default)]
    targets: BTreeMap<String, InstallTarget>,
}

impl Step {
    pub fn action(&self) -> StepAction<'_> {
        match &self.copy {
            Some(spec) => StepAction::Copy(spec),
            None => StepAction::Run {
                argv: &self.run,
                cwd: self.cwd.as_deref(),
                env: &self.env,
            },
        }
    }

    /// Shell-like rendering for announcements.
    pub fn describe(&self) -> String {
        match self.action() {
            StepAction::Run { argv, .. } => argv.join(" "),
            StepAction::Copy(spec) => format!("copy {} -> {}", spec.from, spec.to),
        }
    }
}

impl InstallTarget {
    /// Directory name after relocation.
    pub fn final_dir(&self) -> &str {
        self.final_dir.as_deref().unwrap_or(&self.expected_dir)
    }

    pub fn needs_relocation(&self) -> bool {
        self.final_dir() != self.expected_dir
    }

    /// File name of the cached archive in the work dir.
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.name)
    }

    /// Check the target is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if !NAME_RE.is_match(&self.name) {
            bail!(
                "Invalid target name '{}': use lowercase letters, digits and '-'",
                self.name
            );
        }
        if self.archive_url.trim().is_empty() {
            bail!("Target '{}' has an empty archive_url", self.name);
        }
        check_dir_name(&self.name, "expected_dir", &self.expected_dir)?;
        if let Some(ref d) = self.final_dir {
            check_dir_name(&self.name, "final_dir", d)?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                bail!("Target '{}': step {} has no name", self.name, i + 1);
            }
            if step.copy.is_some() && !step.run.is_empty() {
                bail!(
                    "Target '{}': step '{}' sets both run and copy",
                    self.name,
                    step.name
                );
            }
            if step.copy.is_none() && step.run.is_empty() {
                bail!(
                    "Target '{}': step '{}' needs either run or copy",
                    self.name,
                    step.name
                );
            }
        }
        for cred in &self.credentials {
            if cred.source.is_empty() || cred.destination.is_empty() {
                bail!(
                    "Target '{}': credential entries need both source and destination",
                    self.name
                );
            }
        }
        Ok(())
    }
}

/// Directory names must be one plain path component.
fn check_dir_name(target: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        bail!(
            "Target '{}': {} must be a single directory name, got {:?}",
            target,
            field,
            value
        );
    }
    Ok(())
}

/// Parse a targets.toml document into validated targets.
pub fn parse_targets(content: &str) -> Result<Vec<InstallTarget>> {
    let file: TargetsFile = toml::from_str(content)?;
    let mut out = Vec::with_capacity(file.targets.len());
    for (name, mut target) in file.targets {
        target.name = name;
        target.validate()?;
        out.push(target);
    }
    Ok(out)
}

/// Targets compiled into the binary.
pub fn builtin_targets() -> Result<Vec<InstallTarget>> {
    parse_targets(BUILTIN_TARGETS_TOML).context("built-in targets are malformed")
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub target: InstallTarget,
    pub origin: Origin,
}

/// All known targets, user entries overriding built-ins by name.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn insert(&mut self, target: InstallTarget, origin: Origin) {
        self.entries
            .insert(target.name.clone(), CatalogEntry { target, origin });
    }

    pub fn get(&self, name: &str) -> Result<&CatalogEntry> {
        match self.entries.get(name) {
            Some(e) => Ok(e),
            None => {
                let available: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
                bail!(
                    "Unknown target '{}'. Available: {}",
                    name,
                    available.join(", ")
                );
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load built-ins, then layer the user targets file on top if given.
pub fn load_catalog(user_file: Option<&Path>) -> Result<Catalog> {
    let mut catalog = Catalog::default();
    for t in builtin_targets()? {
        catalog.insert(t, Origin::Builtin);
    }
    if let Some(path) = user_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading targets file {}", path.display()))?;
        let targets =
            parse_targets(&content).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(path = %path.display(), count = targets.len(), "loaded user targets");
        for t in targets {
            catalog.insert(t, Origin::User);
        }
    }
    Ok(catalog)
}
