use std::path::{Path, PathBuf};
use thiserror::Error;

/// Whole-run failures: nothing is installed when one of these is returned.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read manifest {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid manifest {}: {}", path.display(), problems.join("; "))]
    Invalid { path: PathBuf, problems: Vec<String> },
}

impl ManifestError {
    pub(crate) fn at(self, at: &Path) -> Self {
        match self {
            ManifestError::Parse { source, .. } => ManifestError::Parse {
                path: at.to_path_buf(),
                source,
            },
            ManifestError::Invalid { problems, .. } => ManifestError::Invalid {
                path: at.to_path_buf(),
                problems,
            },
            other => other,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid source reference format: {0}. Expected '<source>:<path>'")]
    InvalidReference(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),

    #[error("Source path not found: {}", .0.display())]
    SourcePathNotFound(PathBuf),

    #[error("Source must be a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
}

/// Failure of a single install entry. Sibling entries still run.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Missing '{0}' field")]
    MissingField(&'static str),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| InstallError::Io {
            action,
            path,
            source,
        }
    }
}
