use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Decides which files a traversal hands to its visitor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileFilter {
    pub extensions: Vec<String>,
    pub names: Vec<String>,
}

impl FileFilter {
    pub fn new(extensions: Vec<String>, names: Vec<String>) -> Self {
        Self { extensions, names }
    }

    /// Literal suffix or exact-name match on a base name.
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
            || self.names.iter().any(|name| name == file_name)
    }
}

/// A matched file handed to the visitor.
#[derive(Debug)]
pub struct WalkedFile<'a> {
    pub path: &'a Utf8Path,
    pub name: &'a str,
}

/// Walk `base` top-down, visiting matching files of each directory before
/// descending into its subdirectories. Listing order is whatever the
/// filesystem returns.
pub fn walk_files<F>(base: &Utf8Path, filter: &FileFilter, visit: &mut F) -> Result<()>
where
    F: FnMut(WalkedFile<'_>) -> Result<()>,
{
    if !base.as_std_path().is_dir() {
        tracing::warn!("base directory {} not found; skipping", base);
        return Ok(());
    }
    tracing::debug!("walking {}", base);
    walk_directory(base, filter, visit)
}

fn walk_directory<F>(dir: &Utf8Path, filter: &FileFilter, visit: &mut F) -> Result<()>
where
    F: FnMut(WalkedFile<'_>) -> Result<()>,
{
    let mut files: Vec<(Utf8PathBuf, String)> = Vec::new();
    let mut subdirs: Vec<Utf8PathBuf> = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("reading directory {}", dir))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::warn!(
                "skipping non UTF-8 entry {} in {}",
                file_name.to_string_lossy(),
                dir
            );
            continue;
        };
        let path = dir.join(name);
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {}", path))?;

        if file_type.is_dir() {
            subdirs.push(path);
        } else if file_type.is_symlink() && path.as_std_path().is_dir() {
            // Directory symlinks are listed but never followed.
            tracing::debug!("not following directory symlink {}", path);
        } else if filter.matches(name) {
            files.push((path, name.to_owned()));
        }
    }

    for (path, name) in &files {
        visit(WalkedFile { path, name })?;
    }

    for subdir in &subdirs {
        walk_directory(subdir, filter, visit)?;
    }

    Ok(())
}
