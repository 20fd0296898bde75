//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap.
//!
//! # Example Usage
//!
//! ```bash
//! # Audit the modules declared in one directory
//! drdrei ./terraform
//!
//! # Walk a tree, skipping vendored code, and emit JSON
//! drdrei -r -i .terraform -i vendor --json ./live
//!
//! # Include module calls that are already up to date
//! drdrei --all ./terraform
//! ```

use clap::Parser;
use std::path::PathBuf;

/// drdrei - reports Terraform git module calls that are not pinned to the
/// latest tag of their feature.
#[derive(Parser, Debug)]
#[command(
    name = "drdrei",
    author,
    version,
    about = "Find Terraform git modules that lag behind their latest feature tag",
    long_about = "drdrei reads the module calls of Terraform directories, looks up the tags \
                  of every git repository they reference, and reports each module pinned \
                  to a '<feature>-<semver>' ref that is older than the latest tag of the \
                  same feature."
)]
pub struct Cli {
    /// Terraform directories to audit
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Walk the given directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Directory or file names to skip while walking (replaces the defaults)
    #[arg(
        short = 'i',
        long = "ignorePaths",
        visible_alias = "ignore-paths",
        value_name = "NAME"
    )]
    pub ignore_paths: Vec<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Report every version-pinned module call, not only outdated ones
    #[arg(short, long)]
    pub all: bool,

    /// Path to configuration file (default: ~/.drdrei.yaml)
    #[arg(long, env = "DRDREI_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_paths() {
        let cli = Cli::parse_from(["drdrei", "./live", "./modules"]);
        assert_eq!(
            cli.paths,
            vec![PathBuf::from("./live"), PathBuf::from("./modules")]
        );
        assert!(!cli.recursive);
        assert!(cli.ignore_paths.is_empty());
    }

    #[test]
    fn test_no_paths() {
        let cli = Cli::parse_from(["drdrei"]);
        assert!(cli.paths.is_empty());
    }

    #[test]
    fn test_ignore_paths_spellings() {
        let cli = Cli::parse_from([
            "drdrei",
            "-r",
            "--ignorePaths",
            "vendor",
            "--ignore-paths",
            ".cache",
            "-i",
            ".git",
            ".",
        ]);
        assert!(cli.recursive);
        assert_eq!(cli.ignore_paths, vec!["vendor", ".cache", ".git"]);
    }

    #[test]
    fn test_output_options() {
        let cli = Cli::parse_from(["drdrei", "--json", "--all", "."]);
        assert!(cli.json);
        assert!(cli.all);
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from(["drdrei", "-vvv", "--config", "custom.yaml", "."]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }
}
