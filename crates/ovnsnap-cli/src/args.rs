use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{EngineArg, LogLevel, OutputFormat, RoleArg, SingleRoleArg};

#[derive(Parser)]
#[command(name = "ovnsnap")]
#[command(about = "Restore gathered OVN databases into throwaway containers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $OVNSNAP_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Container engine, overrides the config file
    #[arg(long, global = true)]
    pub engine: Option<EngineArg>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start one container per database found in a directory and write helper functions
    Run {
        /// Directory holding the gathered database files
        #[arg(required_unless_present = "clean")]
        db_dir: Option<PathBuf>,

        /// Only restore northbound (n) or southbound (s) databases
        #[arg(long, short = 'r')]
        role: Option<RoleArg>,

        /// Container image with the OVN tooling
        #[arg(long)]
        image: Option<String>,

        /// Where to write the helper functions
        #[arg(long)]
        script_path: Option<PathBuf>,

        /// Older spelling of `clean`
        #[arg(
            long,
            hide = true,
            alias = "stopall",
            conflicts_with_all = ["db_dir", "role", "image", "script_path", "legacy"]
        )]
        clean: bool,

        /// Older positional form: a role (n/s/all) and/or an engine (docker/podman)
        #[arg(value_name = "LEGACY", num_args = 0..=2, hide = true)]
        legacy: Vec<String>,
    },

    /// Stop and remove every container started by ovnsnap
    #[command(visible_alias = "stopall")]
    Clean,

    /// Restore a single database and open a shell in its container
    Shell {
        /// Database file
        db_file: PathBuf,

        /// Skip classification and treat the file as this role
        #[arg(long, short = 'r')]
        role: Option<SingleRoleArg>,

        /// Container image with the OVN tooling
        #[arg(long)]
        image: Option<String>,
    },

    /// Classify the databases in a directory without starting anything
    Scan {
        /// Directory holding the gathered database files
        db_dir: PathBuf,

        /// Only list northbound (n) or southbound (s) databases
        #[arg(long, short = 'r')]
        role: Option<RoleArg>,
    },

    /// List existing ovnsnap containers
    Status,
}
