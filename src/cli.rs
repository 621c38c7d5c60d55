use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Keep distribution and local JSON/YAML config files in sync", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not ask any interactive question
    #[arg(short = 'n', long, global = true)]
    pub no_interaction: bool,

    /// Answer "no" to every confirmation when running unattended
    /// (with --no-interaction or when stdin is not a terminal)
    #[arg(long, global = true)]
    pub assume_no: bool,

    /// Settings file holding the composer-utilities section
    #[arg(
        long,
        global = true,
        env = "DOCSYNC_SETTINGS",
        default_value = "composer.json"
    )]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Synchronize a source document (dev.json) over a target (composer.json)
    #[command(after_help = SYNC_HELP)]
    Sync(SyncArgs),

    /// Update selected parameters from parameters.yml.dist to parameters.yml
    #[command(after_help = PARAMETERS_HELP)]
    Parameters(ParametersArgs),

    /// Flows meant to run after the package manager installs or updates
    #[command(subcommand)]
    Hook(HookCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Sync
// ============================================================================

#[derive(Parser)]
pub struct SyncArgs {
    /// Path to source file
    #[arg(short, long, default_value = mergekit::settings::DEFAULT_SYNC_SOURCE)]
    pub source: PathBuf,

    /// Path to target (destination) file
    #[arg(short, long, default_value = mergekit::settings::DEFAULT_SYNC_TARGET)]
    pub target: PathBuf,

    /// Print the merged document instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

const SYNC_HELP: &str = "\
Nodes to keep from the target are listed in the settings file, in bracketed
path form:

    {
        \"config\": {
            \"composer-utilities\": {
                \"sync\": {
                    \"ignore\": {
                        \"nodes\": [
                            \"[require][vendorAbc/libraryAbc]\",
                            \"[repositories]\"
                        ]
                    }
                }
            }
        }
    }";

// ============================================================================
// Parameters
// ============================================================================

#[derive(Parser)]
pub struct ParametersArgs {
    /// Path to source parameters file [default: from settings, else app/config/parameters.yml.dist]
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Path to target parameters file [default: from settings, else app/config/parameters.yml]
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Print the updated document instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

const PARAMETERS_HELP: &str = "\
Parameters to update must be listed in the settings file:

    {
        \"config\": {
            \"composer-utilities\": {
                \"parameters-update\": {
                    \"file\": \"app/config/parameters.yml\",
                    \"dist-file\": \"app/config/parameters.yml.dist\",
                    \"parameters\": [\"cross_app_urls\", \"database_driver\"]
                }
            }
        }
    }";

// ============================================================================
// Hooks
// ============================================================================

#[derive(Subcommand)]
pub enum HookCommand {
    /// Ask for source and target files, then synchronize
    Sync {
        /// The package manager is not running in dev mode; skip
        #[arg(long)]
        no_dev: bool,
    },

    /// Update configured parameters after confirmation
    Parameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assume_no_stands_alone() {
        let cli = Cli::try_parse_from(["docsync", "--assume-no", "sync"]).unwrap();
        assert!(cli.assume_no);
        assert!(!cli.no_interaction);
    }

    #[test]
    fn test_hook_sync_no_dev() {
        let cli = Cli::try_parse_from(["docsync", "-n", "hook", "sync", "--no-dev"]).unwrap();
        assert!(cli.no_interaction);
        assert!(matches!(
            cli.command,
            Command::Hook(HookCommand::Sync { no_dev: true })
        ));
    }
}
