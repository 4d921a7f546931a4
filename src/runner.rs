use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;

use crate::cli::{Cli, Command, ConcatArgs, ConfigCommand, HeaderArgs};
use crate::config::{self, Overrides, ToolConfig};
use crate::{concat, header};

const CONFIG_DIR: &str = ".srcwalk";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ConfigPathSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigPathSource {
    fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfigPath {
    path: Utf8PathBuf,
    source: ConfigPathSource,
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    ctx.apply_chdir()?;

    match cli.command {
        Command::Config { command } => handle_config(&ctx, command),
        Command::Header(args) => {
            let state = AppState::new(ctx)?;
            handle_header(&state, args)
        }
        Command::Concat(args) => {
            let state = AppState::new(ctx)?;
            handle_concat(&state, args)
        }
    }
}

fn handle_header(state: &AppState, args: HeaderArgs) -> Result<()> {
    let overrides = Overrides {
        dirs: utf8_paths(args.dirs)?,
        extensions: args.extensions,
        names: args.names,
    };
    let settings = state.config.header_settings(overrides);
    tracing::debug!(dirs = ?settings.dirs, filter = ?settings.filter, "header settings");

    let stdout = io::stdout();
    let mut report = stdout.lock();
    header::prepend_headers(
        &settings.dirs,
        &settings.filter,
        state.ctx.dry_run,
        &mut report,
    )?;
    Ok(())
}

fn handle_concat(state: &AppState, args: ConcatArgs) -> Result<()> {
    let overrides = Overrides {
        dirs: utf8_paths(args.dirs)?,
        extensions: args.extensions,
        names: args.names,
    };
    let settings = state.config.concat_settings(overrides);
    tracing::debug!(dirs = ?settings.dirs, filter = ?settings.filter, "concat settings");

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let summary = concat::concatenate(&settings.dirs, &settings.filter, &mut out, &mut err)?;
    if summary.failed > 0 {
        tracing::warn!("{} file(s) could not be read", summary.failed);
    }
    Ok(())
}

fn handle_config(ctx: &CliContext, command: Option<ConfigCommand>) -> Result<()> {
    let resolved = ctx.resolve_config_path()?;
    let config_path = resolved.path;
    match command {
        Some(ConfigCommand::Path) => {
            println!("Config path: {} ({})", config_path, resolved.source.as_str());
            Ok(())
        }
        None | Some(ConfigCommand::Show) => {
            if !config_path.exists() {
                println!("No config found at {}; using built-in defaults.", config_path);
                println!("Use `srcwalk config generate` to scaffold a configuration.");
                println!("{}", config::format_summary(&ToolConfig::default()));
                return Ok(());
            }

            let config = config::load_from_path(&config_path)?;
            println!("Config path: {} ({})", config_path, resolved.source.as_str());
            println!("{}", config::format_summary(&config));
            Ok(())
        }
        Some(ConfigCommand::Check) => {
            let config = config::load_from_path(&config_path)?;
            config::validate(&config)?;
            println!("Config OK: {} ({})", config_path, resolved.source.as_str());
            println!("{}", config::format_summary(&config));
            Ok(())
        }
        Some(ConfigCommand::Generate { path, force }) => {
            let target = match path {
                Some(path) => Utf8PathBuf::from_path_buf(path)
                    .map_err(|_| anyhow!("config generate path must be valid UTF-8"))?,
                None => config_path.clone(),
            };
            if ctx.dry_run {
                println!("[dry-run] would write {}:", target);
                print!("{}", config::example_config()?);
                return Ok(());
            }
            config::write_example_config(&target, force)?;
            if force {
                println!("Overwrote config at {}", target);
            } else {
                println!("Wrote example config to {}", target);
            }
            Ok(())
        }
    }
}

fn utf8_paths(paths: Vec<PathBuf>) -> Result<Vec<Utf8PathBuf>> {
    paths
        .into_iter()
        .map(|path| {
            Utf8PathBuf::from_path_buf(path)
                .map_err(|path| anyhow!("directory {} is not valid UTF-8", path.display()))
        })
        .collect()
}

#[derive(Clone, Debug)]
struct CliContext {
    chdir: Option<PathBuf>,
    file: Option<PathBuf>,
    dry_run: bool,
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(path) = &self.chdir {
            std::env::set_current_dir(path)
                .with_context(|| format!("changing directory to {}", path.display()))?;
        }
        Ok(())
    }

    fn resolve_config_path(&self) -> Result<ResolvedConfigPath> {
        if let Some(path) = &self.file {
            let path = Utf8PathBuf::from_path_buf(path.clone())
                .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
            return Ok(ResolvedConfigPath {
                path,
                source: ConfigPathSource::Explicit,
            });
        }

        if let Ok(cwd) = std::env::current_dir() {
            if let Ok(mut dir) = Utf8PathBuf::from_path_buf(cwd) {
                loop {
                    let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
                    if candidate.exists() {
                        return Ok(ResolvedConfigPath {
                            path: candidate,
                            source: ConfigPathSource::Discovered,
                        });
                    }

                    let Some(parent) = dir.parent() else {
                        break;
                    };
                    dir = parent.to_path_buf();
                }
            }
        }

        let home = dirs::home_dir().ok_or_else(|| anyhow!("unable to determine home directory"))?;
        let mut path = home;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        let path = Utf8PathBuf::from_path_buf(path)
            .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
        Ok(ResolvedConfigPath {
            path,
            source: ConfigPathSource::HomeDefault,
        })
    }
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            file: cli.file.clone(),
            dry_run: cli.dry_run,
        }
    }
}

struct AppState {
    ctx: CliContext,
    config: ToolConfig,
}

impl AppState {
    fn new(ctx: CliContext) -> Result<Self> {
        let resolved = ctx.resolve_config_path()?;
        tracing::debug!(
            "using config {} ({})",
            resolved.path,
            resolved.source.as_str()
        );
        let config = config::load_or_default(&resolved.path)?;
        config::validate(&config)
            .with_context(|| format!("validating config {}", resolved.path))?;
        Ok(Self { ctx, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ctx(file: Option<PathBuf>) -> CliContext {
        CliContext {
            chdir: None,
            file,
            dry_run: false,
        }
    }

    #[test]
    fn resolve_config_prefers_explicit_file() {
        let root = TempDir::new().unwrap();
        let cfg = root.path().join("explicit.toml");
        fs::write(&cfg, "[header]\nextensions = ['.c']\n").unwrap();

        let resolved = ctx(Some(cfg)).resolve_config_path().unwrap();
        assert_eq!(resolved.source, ConfigPathSource::Explicit);
        assert!(resolved.path.ends_with("explicit.toml"));
    }

    #[test]
    fn app_state_applies_explicit_config() {
        let root = TempDir::new().unwrap();
        let cfg = root.path().join("srcwalk.toml");
        fs::write(&cfg, "[concat]\nnames = ['CMakeLists.txt']\n").unwrap();

        let state = AppState::new(ctx(Some(cfg))).unwrap();
        let settings = state.config.concat_settings(Overrides::default());
        assert_eq!(settings.filter.names, vec!["CMakeLists.txt"]);
    }

    #[test]
    fn app_state_rejects_invalid_config() {
        let root = TempDir::new().unwrap();
        let cfg = root.path().join("srcwalk.toml");
        fs::write(&cfg, "[header]\nextensions = []\n").unwrap();

        let err = AppState::new(ctx(Some(cfg))).err().unwrap();
        assert!(err.to_string().starts_with("validating config"));
    }

    #[test]
    fn missing_explicit_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        let state = AppState::new(ctx(Some(root.path().join("absent.toml")))).unwrap();
        assert!(state.config.header.is_none());
    }
}
