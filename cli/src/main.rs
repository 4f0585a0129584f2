use anyhow::Result;
use clap::Parser;
use console::style;
use skillkit_core::{Config, InstallOptions, Installer, Manifest, Reporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod output;

#[derive(Parser)]
#[command(name = "skillkit")]
#[command(about = "Install skills from a YAML manifest", long_about = None)]
struct Cli {
    /// Path to skills.yaml manifest (default: skills.yaml)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Show what would be installed without copying files
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing skills in destination
    #[arg(long, overrides_with = "no_force")]
    force: bool,

    /// Skip existing skills even if the config enables force
    #[arg(long, overrides_with = "force")]
    no_force: bool,

    /// Log resolution and copy details to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn manifest_path(&self, config: &Config) -> PathBuf {
        self.manifest.clone().unwrap_or_else(|| config.manifest.clone())
    }

    /// Flags win over the config file; without either, existing skills are skipped.
    fn options(&self, config: &Config) -> InstallOptions {
        let force = if self.force {
            true
        } else if self.no_force {
            false
        } else {
            config.force
        };

        InstallOptions {
            dry_run: self.dry_run,
            force,
        }
    }
}

fn init_logging(verbose: bool, configured: Option<&str>) {
    // stdout carries the install report, so logs go to stderr
    let filter = if verbose {
        EnvFilter::new("skillkit_core=debug,skillkit=debug")
    } else {
        EnvFilter::new(
            std::env::var("RUST_LOG")
                .ok()
                .or_else(|| configured.map(str::to_string))
                .unwrap_or_else(|| "off".into()),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads the manifest and installs every entry. `Ok(false)` means at least
/// one entry errored; `Err` means the manifest could not be used at all.
fn install(
    manifest_path: &Path,
    options: InstallOptions,
    reporter: &mut dyn Reporter,
) -> Result<bool> {
    let loaded = Manifest::load(manifest_path)?;
    let report = Installer::new(&loaded, options).run(reporter);
    Ok(report.is_success())
}

fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) | Err(_) => 1,
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = Config::load_or_default()?;
    init_logging(cli.verbose, config.log_level.as_deref());

    install(
        &cli.manifest_path(&config),
        cli.options(&config),
        &mut output::ConsoleReporter,
    )
}

fn main() -> ExitCode {
    let outcome = run(Cli::parse());

    if let Err(e) = &outcome {
        eprintln!("{} Fatal error: {:#}", style("❌").red(), e);
    }

    ExitCode::from(exit_status(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use skillkit_core::SilentReporter;
    use std::fs;
    use tempfile::TempDir;

    fn forcing_config() -> Config {
        Config {
            force: true,
            ..Config::default()
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from(["skillkit", "-m", "custom.yaml", "--dry-run", "--force"]);
        assert_eq!(cli.manifest, Some(PathBuf::from("custom.yaml")));
        assert!(cli.dry_run);
        assert!(cli.force);
        assert!(!cli.verbose);
    }

    #[test]
    fn manifest_defaults_to_config() {
        let cli = Cli::parse_from(["skillkit"]);
        let config = Config {
            manifest: PathBuf::from("/etc/skills.yaml"),
            ..Config::default()
        };
        assert_eq!(cli.manifest_path(&config), PathBuf::from("/etc/skills.yaml"));

        let cli = Cli::parse_from(["skillkit", "--manifest", "local.yaml"]);
        assert_eq!(cli.manifest_path(&config), PathBuf::from("local.yaml"));
    }

    #[test]
    fn force_follows_config_when_no_flag_given() {
        let cli = Cli::parse_from(["skillkit"]);
        assert!(!cli.options(&Config::default()).force);
        assert!(cli.options(&forcing_config()).force);
    }

    #[test]
    fn no_force_flag_beats_config() {
        let cli = Cli::parse_from(["skillkit", "--no-force"]);
        assert_eq!(
            cli.options(&forcing_config()),
            InstallOptions {
                dry_run: false,
                force: false
            }
        );
    }

    #[test]
    fn last_force_flag_wins() {
        let cli = Cli::parse_from(["skillkit", "--force", "--no-force"]);
        assert!(!cli.options(&forcing_config()).force);

        let cli = Cli::parse_from(["skillkit", "--no-force", "--force"]);
        assert!(cli.options(&Config::default()).force);
    }

    fn manifest_in(tmp: &TempDir, install: &str) -> PathBuf {
        let skill = tmp.path().join("hub/foo");
        fs::create_dir_all(&skill).unwrap();
        fs::write(skill.join("SKILL.md"), "# foo\n").unwrap();

        let path = tmp.path().join("skills.yaml");
        fs::write(
            &path,
            format!(
                "version: 1\nsources:\n  hub:\n    type: local\n    root: hub\ninstall:\n{}",
                install
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn fatal_manifest_error_exits_with_failure() {
        let tmp = TempDir::new().unwrap();
        let outcome = install(
            &tmp.path().join("missing.yaml"),
            InstallOptions::default(),
            &mut SilentReporter,
        );
        assert!(outcome.is_err());
        assert_eq!(exit_status(&outcome), 1);
    }

    #[test]
    fn entry_error_exits_with_failure() {
        let tmp = TempDir::new().unwrap();
        let path = manifest_in(
            &tmp,
            "  - from: \"hub:foo\"\n    to: out/foo\n  - from: \"hub:ghost\"\n    to: out/ghost\n",
        );
        let outcome = install(&path, InstallOptions::default(), &mut SilentReporter);
        assert!(matches!(outcome, Ok(false)));
        assert_eq!(exit_status(&outcome), 1);
    }

    #[test]
    fn skips_only_exit_with_success() {
        let tmp = TempDir::new().unwrap();
        let path = manifest_in(&tmp, "  - from: \"hub:foo\"\n    to: out/foo\n");
        fs::create_dir_all(tmp.path().join("out/foo")).unwrap();

        let outcome = install(&path, InstallOptions::default(), &mut SilentReporter);
        assert!(matches!(outcome, Ok(true)));
        assert_eq!(exit_status(&outcome), 0);
        assert!(!tmp.path().join("out/foo/SKILL.md").exists());
    }
}
