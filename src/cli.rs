use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "srcwalk",
    version,
    about = "Stamp source files with their filename or concatenate them with markers"
)]
pub struct Cli {
    #[arg(short = 'C', long = "chdir")]
    pub chdir: Option<PathBuf>,
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prepend `// File: <name>` to every matched file that lacks it.
    Header(HeaderArgs),
    /// Write every matched file to stdout between start/end markers.
    Concat(ConcatArgs),
    /// Configuration display, validation, and template generation.
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },
}

#[derive(Args, Debug)]
pub struct HeaderArgs {
    /// Base directories to scan (default: src include).
    #[arg()]
    pub dirs: Vec<PathBuf>,
    /// File-name suffix to match; repeat to add more (default: .cpp .hpp).
    #[arg(long = "ext", value_name = "SUFFIX")]
    pub extensions: Vec<String>,
    /// Exact file name to match in addition to the suffixes.
    #[arg(long = "name", value_name = "FILENAME")]
    pub names: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// Base directories to scan (default: src include).
    #[arg()]
    pub dirs: Vec<PathBuf>,
    /// File-name suffix to match; repeat to add more (default: .cpp .hpp).
    #[arg(long = "ext", value_name = "SUFFIX")]
    pub extensions: Vec<String>,
    /// Exact file name to match in addition to the suffixes, e.g. CMakeLists.txt.
    #[arg(long = "name", value_name = "FILENAME")]
    pub names: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    Path,
    Check,
    Generate {
        #[arg()]
        path: Option<PathBuf>,
        #[arg(long = "force", default_value_t = false)]
        force: bool,
    },
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
