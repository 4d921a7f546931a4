use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::templates;
use crate::walk::FileFilter;

pub const DEFAULT_DIRS: [&str; 2] = ["src", "include"];
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".cpp", ".hpp"];

const EXAMPLE_TEMPLATE: &str = "config/example.config.toml";

/// Root configuration document, `.srcwalk/config.toml` by default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub header: Option<Section>,
    pub concat: Option<Section>,
}

/// Per-tool overrides. Unset fields fall back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub dirs: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub names: Option<Vec<String>>,
}

/// Fully resolved inputs for one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSettings {
    pub dirs: Vec<Utf8PathBuf>,
    pub filter: FileFilter,
}

/// Values given on the command line; each one replaces the configured list.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub dirs: Vec<Utf8PathBuf>,
    pub extensions: Vec<String>,
    pub names: Vec<String>,
}

impl Section {
    pub fn resolve(section: Option<&Section>, overrides: Overrides) -> RunSettings {
        let dirs = if !overrides.dirs.is_empty() {
            overrides.dirs
        } else if let Some(dirs) = section.and_then(|s| s.dirs.as_ref()) {
            dirs.iter().map(Utf8PathBuf::from).collect()
        } else {
            DEFAULT_DIRS.iter().map(Utf8PathBuf::from).collect()
        };

        let extensions = if !overrides.extensions.is_empty() {
            overrides.extensions
        } else if let Some(extensions) = section.and_then(|s| s.extensions.clone()) {
            extensions
        } else {
            DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect()
        };

        let names = if !overrides.names.is_empty() {
            overrides.names
        } else {
            section.and_then(|s| s.names.clone()).unwrap_or_default()
        };

        RunSettings {
            dirs,
            filter: FileFilter::new(extensions, names),
        }
    }
}

impl ToolConfig {
    pub fn header_settings(&self, overrides: Overrides) -> RunSettings {
        Section::resolve(self.header.as_ref(), overrides)
    }

    pub fn concat_settings(&self, overrides: Overrides) -> RunSettings {
        Section::resolve(self.concat.as_ref(), overrides)
    }
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<ToolConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// Like [`load_from_path`], but a missing file yields the defaults.
pub fn load_or_default(path: &Utf8Path) -> Result<ToolConfig> {
    if !path.exists() {
        tracing::debug!("no config at {}; using defaults", path);
        return Ok(ToolConfig::default());
    }
    load_from_path(path)
}

pub fn validate(config: &ToolConfig) -> Result<()> {
    for (label, section) in [("header", &config.header), ("concat", &config.concat)] {
        let Some(section) = section else {
            continue;
        };
        if let Some(extensions) = &section.extensions {
            if extensions.is_empty() {
                bail!("[{label}] extensions must not be an empty list");
            }
        }
        for (key, values) in [
            ("dirs", &section.dirs),
            ("extensions", &section.extensions),
            ("names", &section.names),
        ] {
            if values.iter().flatten().any(|value| value.trim().is_empty()) {
                bail!("[{label}] {key} contains an empty entry");
            }
        }
    }
    Ok(())
}

pub fn example_config() -> Result<String> {
    templates::get_string(EXAMPLE_TEMPLATE)
}

pub fn write_example_config(path: &Utf8Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!("{} already exists; rerun with --force to overwrite", path);
    }

    templates::write_template(path, EXAMPLE_TEMPLATE)
}

pub fn format_summary(config: &ToolConfig) -> String {
    let mut out = String::new();
    for (label, section) in [("header", &config.header), ("concat", &config.concat)] {
        let settings = Section::resolve(section.as_ref(), Overrides::default());
        let dirs: Vec<&str> = settings.dirs.iter().map(|d| d.as_str()).collect();
        let names = if settings.filter.names.is_empty() {
            "none".to_string()
        } else {
            settings.filter.names.join(", ")
        };
        let _ = writeln!(out, "{}:", label);
        let _ = writeln!(out, "  dirs: {}", dirs.join(", "));
        let _ = writeln!(out, "  extensions: {}", settings.filter.extensions.join(", "));
        let _ = writeln!(out, "  names: {}", names);
    }
    out
}
