//! Pull command implementation.

use super::{connect, message_files};
use i18nsync_engine::{PullPipeline, PullReport, SyncConfig, SyncResult};

/// Runs the pull command.
pub fn run(config: &SyncConfig) -> SyncResult<()> {
    let store = connect(config)?;
    let files = message_files(config);

    println!("Pulling translations into {}", files.dir().display());
    if config.dry_run {
        println!("(dry run - no files will be written)");
    }
    println!();

    let report = PullPipeline::new()
        .with_dry_run(config.dry_run)
        .run(&store, &files)?;

    for line in summary(&report) {
        println!("{line}");
    }
    Ok(())
}

/// Renders the end-of-run summary.
fn summary(report: &PullReport) -> Vec<String> {
    let mut lines = vec![format!("Records fetched: {}", report.records_fetched)];
    if report.skipped_records > 0 {
        lines.push(format!("Records without a key: {}", report.skipped_records));
    }

    if report.is_noop() {
        lines.push("No changes - local files are up to date".to_string());
        return lines;
    }

    for outcome in &report.locales {
        if !outcome.changed {
            lines.push(format!("  {}: unchanged", outcome.locale.file_name()));
            continue;
        }
        let s = &outcome.summary;
        lines.push(format!(
            "  {}: {} added, {} modified, {} removed ({} keys)",
            outcome.locale.file_name(),
            s.added.len(),
            s.modified.len(),
            s.removed.len(),
            outcome.keys
        ));
        if let Some(backup) = &outcome.backup {
            lines.push(format!("    backup: {}", backup.display()));
        }
    }

    if report.dry_run {
        lines.push("Dry run - nothing written".to_string());
    } else {
        lines.push("✓ Pull complete".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use i18nsync_engine::LocaleOutcome;
    use i18nsync_store::{ChangeSummary, Locale};
    use std::path::PathBuf;

    fn outcome(locale: Locale, changed: bool) -> LocaleOutcome {
        LocaleOutcome {
            locale,
            changed,
            written: changed,
            backup: changed.then(|| PathBuf::from("messages/zh-TW.backup-x.json")),
            summary: if changed {
                ChangeSummary {
                    added: vec!["a".into()],
                    modified: vec!["b".into(), "c".into()],
                    removed: Vec::new(),
                }
            } else {
                ChangeSummary::default()
            },
            keys: 4,
        }
    }

    #[test]
    fn summary_lists_changed_locales() {
        let report = PullReport {
            records_fetched: 4,
            skipped_records: 0,
            locales: vec![outcome(Locale::En, false), outcome(Locale::ZhTw, true)],
            dry_run: false,
        };

        let lines = summary(&report);

        assert!(lines.contains(&"  en.json: unchanged".to_string()));
        assert!(lines.contains(&"  zh-TW.json: 1 added, 2 modified, 0 removed (4 keys)".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("    backup: ")));
        assert_eq!(lines.last().map(String::as_str), Some("✓ Pull complete"));
    }

    #[test]
    fn summary_of_noop() {
        let report = PullReport {
            records_fetched: 0,
            skipped_records: 2,
            locales: vec![outcome(Locale::En, false), outcome(Locale::ZhTw, false)],
            dry_run: false,
        };

        let lines = summary(&report);

        assert_eq!(lines[1], "Records without a key: 2");
        assert_eq!(lines[2], "No changes - local files are up to date");
    }
}
