//! Push command implementation.

use super::{connect, message_files};
use i18nsync_engine::{PushPipeline, PushReport, SyncConfig, SyncResult};

/// Runs the push command.
pub fn run(config: &SyncConfig) -> SyncResult<()> {
    let store = connect(config)?;
    let files = message_files(config);

    println!("Pushing translations from {}", files.dir().display());
    if config.dry_run {
        println!("(dry run - no records will be written)");
    }
    println!();

    let report = PushPipeline::from_config(config).run(&store, &files)?;

    for line in summary(&report) {
        println!("{line}");
    }
    Ok(())
}

/// Renders the end-of-run summary.
fn summary(report: &PushReport) -> Vec<String> {
    let mut lines = vec![
        format!("Local records:  {}", report.local_records),
        format!("Remote records: {}", report.remote_records),
    ];

    if report.is_noop() {
        lines.push("No changes - remote table is up to date".to_string());
        return lines;
    }

    if report.dry_run {
        lines.push(format!("  Would create: {}", report.to_create));
        lines.push(format!("  Would update: {}", report.to_update));
        lines.push(format!("  Unchanged:    {}", report.unchanged));
        lines.push("Dry run - nothing written".to_string());
    } else {
        lines.push(format!("  Created:   {}", report.created));
        lines.push(format!("  Updated:   {}", report.updated));
        lines.push(format!("  Unchanged: {}", report.unchanged));
        lines.push("✓ Push complete".to_string());
    }
    lines
}
