//! The `skills.yaml` manifest: typed model and loading.
//!
//! The document is parsed schema-free first and then lowered into
//! [`Manifest`] by [`validate`], which collects every shape problem it finds
//! so a broken manifest is reported in one pass.

mod validate;

use crate::error::ManifestError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST: &str = "skills.yaml";
pub const SUPPORTED_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: u64,
    pub sources: BTreeMap<String, Source>,
    pub install: Vec<InstallEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub kind: SourceKind,
    /// Empty when a non-local source declares none.
    pub root: PathBuf,
    pub skills_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Local,
    Other(String),
}

impl SourceKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "local" => SourceKind::Local,
            other => SourceKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallEntry {
    pub id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl InstallEntry {
    /// Human label for reporting; `index` is 1-based.
    pub fn label(&self, index: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("skill-{}", index))
    }
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedManifest, ManifestError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Self::parse(&content).map_err(|e| e.at(path))?;
        let base_dir = base_dir_of(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            base_dir = %base_dir.display(),
            sources = manifest.sources.len(),
            entries = manifest.install.len(),
            "Manifest loaded"
        );

        Ok(LoadedManifest {
            path: path.to_path_buf(),
            base_dir,
            manifest,
        })
    }

    /// Parses and validates manifest text. Errors carry an empty path until
    /// [`ManifestError::at`] attaches one.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|source| ManifestError::Parse {
                path: PathBuf::new(),
                source,
            })?;

        validate::lower(&document).map_err(|problems| ManifestError::Invalid {
            path: PathBuf::new(),
            problems,
        })
    }
}

/// A validated manifest together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    /// Absolute directory containing the manifest; relative paths resolve against it.
    pub base_dir: PathBuf,
    pub manifest: Manifest,
}

fn base_dir_of(path: &Path) -> std::io::Result<PathBuf> {
    match path.parent() {
        Some(parent) if parent.is_absolute() => Ok(parent.to_path_buf()),
        Some(parent) if !parent.as_os_str().is_empty() => Ok(std::env::current_dir()?.join(parent)),
        _ => std::env::current_dir(),
    }
}
