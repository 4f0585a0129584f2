use console::style;
use skillkit_core::install::MARKER_FILE;
use skillkit_core::{EntryOutcome, InstallEvent, Reporter};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Prints install events to stdout as they arrive.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: &InstallEvent) {
        for line in render(event) {
            println!("{}", line);
        }
    }
}

pub fn render(event: &InstallEvent) -> Vec<String> {
    match event {
        InstallEvent::RunStarted {
            manifest,
            base_dir,
            dry_run,
            total,
        } => {
            let mut lines = vec![
                style("📚 Skill Installer").bold().to_string(),
                RULE.to_string(),
                format!("Manifest: {}", manifest.display()),
                format!("Base dir: {}", base_dir.display()),
            ];
            if *dry_run {
                lines.push(
                    style("🔍 DRY RUN MODE - No files will be copied")
                        .yellow()
                        .to_string(),
                );
            }
            lines.push(String::new());
            lines.push(format!("📋 Installing {} skill(s)...", total));
            lines.push(String::new());
            lines
        }
        InstallEvent::EntryStarted { index, label } => {
            vec![format!("{}. {}", index, style(label).bold())]
        }
        InstallEvent::DestinationExists { path } => vec![
            format!(
                "  {} Destination exists: {}",
                style("⚠️ ").yellow(),
                path.display()
            ),
            "     Use --force to overwrite".to_string(),
        ],
        InstallEvent::RemovingExisting { path } => {
            vec![format!("  🗑️  Removing existing: {}", path.display())]
        }
        InstallEvent::Copying { name, from, to } => vec![
            format!("  📦 Copying: {}", name),
            format!("     From: {}", from.display()),
            format!("     To:   {}", to.display()),
        ],
        InstallEvent::MarkerMissing { path } => vec![format!(
            "  {} Warning: {} not found in {}",
            style("⚠️ ").yellow(),
            MARKER_FILE,
            path.display()
        )],
        InstallEvent::EntryFinished(entry) => {
            let line = match &entry.outcome {
                EntryOutcome::Installed { .. } => {
                    format!("  {} Installed successfully", style("✅").green())
                }
                EntryOutcome::Skipped { .. } => format!("  {} Skipped", style("⏭️ ").dim()),
                EntryOutcome::Errored(e) => {
                    format!("  {} Error: {}", style("❌").red(), style(e).red())
                }
            };
            vec![line, String::new()]
        }
        InstallEvent::RunFinished { summary, dry_run } => {
            let mut lines = vec![
                RULE.to_string(),
                style("📊 Summary:").bold().to_string(),
                format!("   ✅ Successful: {}", summary.installed),
            ];
            if summary.skipped > 0 {
                lines.push(format!("   ⏭️  Skipped:    {}", summary.skipped));
            }
            if summary.errors > 0 {
                lines.push(format!("   ❌ Errors:     {}", summary.errors));
            }
            if *dry_run {
                lines.push(String::new());
                lines.push("💡 Run without --dry-run to actually install skills".to_string());
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillkit_core::{EntryReport, InstallError, Summary};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn plain(event: &InstallEvent) -> Vec<String> {
        render(event)
            .iter()
            .map(|l| console::strip_ansi_codes(l).into_owned())
            .collect()
    }

    #[test]
    fn summary_hides_zero_counters() {
        let lines = plain(&InstallEvent::RunFinished {
            summary: Summary {
                installed: 3,
                skipped: 0,
                errors: 0,
            },
            dry_run: false,
        });
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "   ✅ Successful: 3");
    }

    #[test]
    fn summary_shows_skips_errors_and_dry_run_hint() {
        let lines = plain(&InstallEvent::RunFinished {
            summary: Summary {
                installed: 1,
                skipped: 2,
                errors: 1,
            },
            dry_run: true,
        });
        assert!(lines.contains(&"   ⏭️  Skipped:    2".to_string()));
        assert!(lines.contains(&"   ❌ Errors:     1".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "💡 Run without --dry-run to actually install skills"
        );
    }

    #[test]
    fn header_announces_dry_run() {
        let lines = plain(&InstallEvent::RunStarted {
            manifest: PathBuf::from("skills.yaml"),
            base_dir: PathBuf::from("/work"),
            dry_run: true,
            total: 2,
        });
        assert!(lines.iter().any(|l| l.contains("DRY RUN MODE")));
        assert!(lines.contains(&"📋 Installing 2 skill(s)...".to_string()));
    }

    #[test]
    fn errored_entry_shows_cause() {
        let lines = plain(&InstallEvent::EntryFinished(EntryReport {
            index: 1,
            label: "review".to_string(),
            outcome: EntryOutcome::Errored(Arc::new(InstallError::MissingField("from"))),
        }));
        assert_eq!(lines[0], "  ❌ Error: Missing 'from' field");
    }
}
