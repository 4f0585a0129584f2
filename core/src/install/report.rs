use super::{EntryReport, Summary};
use std::path::PathBuf;

/// Everything the installer has to say, in the order it happens.
#[derive(Debug, Clone)]
pub enum InstallEvent {
    RunStarted {
        manifest: PathBuf,
        base_dir: PathBuf,
        dry_run: bool,
        total: usize,
    },
    EntryStarted {
        index: usize,
        label: String,
    },
    DestinationExists {
        path: PathBuf,
    },
    RemovingExisting {
        path: PathBuf,
    },
    Copying {
        name: String,
        from: PathBuf,
        to: PathBuf,
    },
    MarkerMissing {
        path: PathBuf,
    },
    EntryFinished(EntryReport),
    RunFinished {
        summary: Summary,
        dry_run: bool,
    },
}

pub trait Reporter {
    fn report(&mut self, event: &InstallEvent);
}

/// Keeps every event; handy for embedding and for tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<InstallEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &InstallEvent) {
        self.events.push(event.clone());
    }
}

/// Discards events.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&mut self, _event: &InstallEvent) {}
}
