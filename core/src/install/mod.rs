//! Manifest-driven installation: resolve each entry, then copy or skip it.

pub mod copy;
pub mod report;
pub mod resolve;

pub use copy::{MARKER_FILE, copy_tree, has_marker};
pub use report::{InstallEvent, RecordingReporter, Reporter, SilentReporter};
pub use resolve::{Resolver, SourceRef, absolutize};

use crate::error::InstallError;
use crate::manifest::{InstallEntry, LoadedManifest};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Decide and report everything, touch nothing.
    pub dry_run: bool,
    /// Replace existing destinations instead of skipping them.
    pub force: bool,
}

#[derive(Debug, Clone)]
pub enum EntryOutcome {
    Installed {
        source: PathBuf,
        destination: PathBuf,
    },
    Skipped {
        destination: PathBuf,
    },
    Errored(Arc<InstallError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Installed,
    Skipped,
    Errored,
}

impl EntryOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            EntryOutcome::Installed { .. } => OutcomeKind::Installed,
            EntryOutcome::Skipped { .. } => OutcomeKind::Skipped,
            EntryOutcome::Errored(_) => OutcomeKind::Errored,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryReport {
    /// 1-based position in the manifest.
    pub index: usize,
    pub label: String,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub installed: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub entries: Vec<EntryReport>,
}

impl InstallReport {
    pub fn summary(&self) -> Summary {
        self.entries
            .iter()
            .fold(Summary::default(), |mut summary, entry| {
                match entry.outcome.kind() {
                    OutcomeKind::Installed => summary.installed += 1,
                    OutcomeKind::Skipped => summary.skipped += 1,
                    OutcomeKind::Errored => summary.errors += 1,
                }
                summary
            })
    }

    /// Skips are not failures.
    pub fn is_success(&self) -> bool {
        self.summary().errors == 0
    }

    pub fn kinds(&self) -> Vec<OutcomeKind> {
        self.entries.iter().map(|e| e.outcome.kind()).collect()
    }
}

pub struct Installer<'m> {
    loaded: &'m LoadedManifest,
    options: InstallOptions,
}

impl<'m> Installer<'m> {
    pub fn new(loaded: &'m LoadedManifest, options: InstallOptions) -> Self {
        Self { loaded, options }
    }

    pub fn run(&self, reporter: &mut dyn Reporter) -> InstallReport {
        let entries = &self.loaded.manifest.install;
        let resolver = Resolver::new(self.loaded);

        reporter.report(&InstallEvent::RunStarted {
            manifest: self.loaded.path.clone(),
            base_dir: self.loaded.base_dir.clone(),
            dry_run: self.options.dry_run,
            total: entries.len(),
        });

        let mut report = InstallReport {
            entries: Vec::with_capacity(entries.len()),
        };

        for (idx, entry) in entries.iter().enumerate() {
            let index = idx + 1;
            let label = entry.label(index);

            reporter.report(&InstallEvent::EntryStarted {
                index,
                label: label.clone(),
            });

            let outcome = match self.install_entry(&resolver, entry, reporter) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(entry = %label, error = %e, "Install failed");
                    EntryOutcome::Errored(Arc::new(e))
                }
            };

            let entry_report = EntryReport {
                index,
                label,
                outcome,
            };
            reporter.report(&InstallEvent::EntryFinished(entry_report.clone()));
            report.entries.push(entry_report);
        }

        let summary = report.summary();
        tracing::info!(
            installed = summary.installed,
            skipped = summary.skipped,
            errors = summary.errors,
            dry_run = self.options.dry_run,
            "Install finished"
        );
        reporter.report(&InstallEvent::RunFinished {
            summary,
            dry_run: self.options.dry_run,
        });

        report
    }

    fn install_entry(
        &self,
        resolver: &Resolver<'_>,
        entry: &InstallEntry,
        reporter: &mut dyn Reporter,
    ) -> Result<EntryOutcome, InstallError> {
        let from = entry
            .from
            .as_deref()
            .ok_or(InstallError::MissingField("from"))?;
        let to = entry
            .to
            .as_deref()
            .ok_or(InstallError::MissingField("to"))?;

        let source = resolver.resolve_source(from)?;
        let destination = resolver.resolve_destination(to);

        self.copy_skill(source, destination, reporter)
    }

    fn copy_skill(
        &self,
        source: PathBuf,
        destination: PathBuf,
        reporter: &mut dyn Reporter,
    ) -> Result<EntryOutcome, InstallError> {
        let InstallOptions { dry_run, force } = self.options;

        // A file or symlink in the way counts the same as a directory.
        if fs::symlink_metadata(&destination).is_ok() {
            if !force {
                tracing::warn!(path = %destination.display(), "Destination exists, skipping");
                reporter.report(&InstallEvent::DestinationExists {
                    path: destination.clone(),
                });
                return Ok(EntryOutcome::Skipped { destination });
            }

            reporter.report(&InstallEvent::RemovingExisting {
                path: destination.clone(),
            });
            if !dry_run {
                remove_existing(&destination)?;
            }
        }

        if !dry_run && let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(InstallError::io("create", parent))?;
        }

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        reporter.report(&InstallEvent::Copying {
            name,
            from: source.clone(),
            to: destination.clone(),
        });

        if !dry_run {
            copy_tree(&source, &destination).map_err(InstallError::io("copy to", &destination))?;

            if !has_marker(&destination) {
                tracing::warn!(path = %destination.display(), "{} not found", MARKER_FILE);
                reporter.report(&InstallEvent::MarkerMissing {
                    path: destination.clone(),
                });
            }
        }

        tracing::info!(
            from = %source.display(),
            to = %destination.display(),
            dry_run,
            "Installed skill"
        );
        Ok(EntryOutcome::Installed {
            source,
            destination,
        })
    }
}

fn remove_existing(path: &Path) -> Result<(), InstallError> {
    let metadata = fs::symlink_metadata(path).map_err(InstallError::io("inspect", path))?;
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(InstallError::io("remove", path))
}
