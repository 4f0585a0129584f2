use crate::error::ResolveError;
use crate::manifest::{LoadedManifest, Manifest, SourceKind};
use std::path::{Path, PathBuf};

/// A parsed `<source_name>:<relative_path>` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef<'a> {
    pub source: &'a str,
    pub path: &'a str,
}

impl<'a> SourceRef<'a> {
    /// Splits on the first colon only, so the path part may contain colons.
    pub fn parse(reference: &'a str) -> Result<Self, ResolveError> {
        reference
            .split_once(':')
            .map(|(source, path)| SourceRef { source, path })
            .ok_or_else(|| ResolveError::InvalidReference(reference.to_string()))
    }
}

/// Joins `path` onto `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

pub struct Resolver<'m> {
    manifest: &'m Manifest,
    base_dir: &'m Path,
}

impl<'m> Resolver<'m> {
    pub fn new(loaded: &'m LoadedManifest) -> Self {
        Self::with_base(&loaded.manifest, &loaded.base_dir)
    }

    pub fn with_base(manifest: &'m Manifest, base_dir: &'m Path) -> Self {
        Self { manifest, base_dir }
    }

    /// Computes `root / skills_root / path` without touching the filesystem.
    pub fn source_candidate(&self, reference: &str) -> Result<PathBuf, ResolveError> {
        let SourceRef { source, path } = SourceRef::parse(reference)?;

        let entry = self
            .manifest
            .sources
            .get(source)
            .ok_or_else(|| ResolveError::UnknownSource(source.to_string()))?;

        if let SourceKind::Other(kind) = &entry.kind {
            return Err(ResolveError::UnsupportedSourceType(kind.clone()));
        }

        Ok(absolutize(self.base_dir, &entry.root)
            .join(&entry.skills_root)
            .join(path))
    }

    pub fn resolve_source(&self, reference: &str) -> Result<PathBuf, ResolveError> {
        let candidate = self.source_candidate(reference)?;

        if !candidate.exists() {
            return Err(ResolveError::SourcePathNotFound(candidate));
        }
        if !candidate.is_dir() {
            return Err(ResolveError::SourceNotDirectory(candidate));
        }

        tracing::debug!(reference, path = %candidate.display(), "Resolved source");
        Ok(candidate)
    }

    /// Existence is checked at copy time, not here.
    pub fn resolve_destination(&self, destination: &str) -> PathBuf {
        absolutize(self.base_dir, Path::new(destination))
    }
}
