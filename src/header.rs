use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use crate::walk::{self, FileFilter, WalkedFile};

/// Per-run tallies for `srcwalk header`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HeaderSummary {
    pub scanned: usize,
    pub prepended: usize,
    pub skipped: usize,
}

pub fn marker_line(file_name: &str) -> String {
    format!("// File: {file_name}\n")
}

/// Returns the stamped content, or `None` when `content` already opens with
/// this file's own marker line.
pub fn stamp(content: &str, file_name: &str) -> Option<String> {
    let marker = marker_line(file_name);
    if content.starts_with(&marker) {
        return None;
    }
    let mut stamped = String::with_capacity(marker.len() + content.len());
    stamped.push_str(&marker);
    stamped.push_str(content);
    Some(stamped)
}

pub fn prepend_headers<W: Write>(
    dirs: &[Utf8PathBuf],
    filter: &FileFilter,
    dry_run: bool,
    report: &mut W,
) -> Result<HeaderSummary> {
    let mut summary = HeaderSummary::default();

    for base in dirs {
        walk::walk_files(base, filter, &mut |file: WalkedFile<'_>| {
            summary.scanned += 1;
            let content =
                fs::read_to_string(file.path).with_context(|| format!("reading {}", file.path))?;

            let Some(stamped) = stamp(&content, file.name) else {
                summary.skipped += 1;
                writeln!(report, "Skipped (already added): {}", file.path)
                    .context("writing report")?;
                return Ok(());
            };

            if dry_run {
                writeln!(report, "[dry-run] would prepend filename to: {}", file.path)
                    .context("writing report")?;
            } else {
                fs::write(file.path, stamped).with_context(|| format!("writing {}", file.path))?;
                writeln!(report, "Prepended filename to: {}", file.path)
                    .context("writing report")?;
            }
            summary.prepended += 1;
            Ok(())
        })?;
    }

    tracing::info!(
        scanned = summary.scanned,
        prepended = summary.prepended,
        skipped = summary.skipped,
        dry_run,
        "header run complete"
    );
    Ok(summary)
}
