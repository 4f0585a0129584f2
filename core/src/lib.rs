pub mod config;
pub mod error;
pub mod install;
pub mod manifest;

pub use config::Config;
pub use error::{InstallError, ManifestError, ResolveError};
pub use install::{
    EntryOutcome, EntryReport, InstallEvent, InstallOptions, InstallReport, Installer,
    OutcomeKind, RecordingReporter, Reporter, SilentReporter, Summary,
};
pub use manifest::{InstallEntry, LoadedManifest, Manifest, Source, SourceKind};
