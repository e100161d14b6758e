use clap::{Parser, Subcommand};

use std::{ffi::OsString, path::PathBuf};

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    propagate_version = true,
    infer_long_args = true,
    infer_subcommands = true,
    flatten_help = true
)]
#[command(help_template = HELP_TEMPLATE)]
pub struct Options {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Clone, Debug, Parser)]
pub struct CommonOptions {
    /// Path to settings file
    #[arg(global = true, short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log level (will be overridden by --log-level).
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(global = true, long, value_name = "LEVEL")]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    Run(RunOptions),
    /// Validate and print the configuration
    Validate,
    /// Print an example configuration
    ExampleConfig,
}

#[derive(Clone, Debug, Parser)]
#[command(about = "Repair creation times later than modification times")]
#[command(arg_required_else_help = true)]
pub struct RunOptions {
    /// Directories to walk
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Only report entries that would be repaired.
    #[arg(short, long, visible_alias = "dry-run")]
    pub simulate: bool,

    /// Do not output statistic data.
    #[arg(long)]
    pub no_statistic: bool,

    /// Print the time the walk took.
    #[arg(long)]
    pub output_runtime: bool,

    /// Output repaired paths to the file.
    ///
    /// When FILE is -, write to standard output.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable extra output buffering.
    #[arg(long)]
    pub output_unbuffered: bool,

    /// Output delimiter
    #[arg(
        long,
        value_name = "DELIMITER",
        default_value_os_t = OsString::from("\n"),
        default_value_if("null_output_delimiter", "true", "\0")
    )]
    pub output_delimiter: OsString,

    /// Use `\0` character as the output delimiter.
    #[arg(long)]
    pub null_output_delimiter: bool,
}
