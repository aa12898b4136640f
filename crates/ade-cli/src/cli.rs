//! CLI argument definitions for the ADE generator.

use std::path::PathBuf;

use ade_request::DEFAULT_SAMPLE_TYPE_ID;
use ade_uploader::DEFAULT_JAR;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ade",
    version,
    about = "Generate ADE request documents from FASTQ folders",
    long_about = "Generate an ADE request document from a folder of FASTQ files.\n\n\
                  Patient refs, sample ids and tags are read from file names, checked,\n\
                  registered with the uploader, and assembled into the request JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the ADE request for a FASTQ folder.
    Generate(GenerateArgs),

    /// Extract and validate patients without calling the uploader.
    Check(CheckArgs),

    /// Show the effective file name extraction rules.
    Rules(RulesArgs),
}

/// Options shared by every command that reads a folder.
#[derive(Parser)]
pub struct FolderArgs {
    /// Folder containing the FASTQ files.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Recurse into sub-folders.
    #[arg(short = 'd', long = "deep")]
    pub deep: bool,

    /// Rule file overriding the built-in Illumina naming rule.
    ///
    /// Each rule is two lines: a regular expression, then the breakdown for
    /// patient ref, sample id and optionally tag (e.g. `0 3 2`). Digits select
    /// capture groups, other characters are copied literally.
    #[arg(short = 'x', long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub folder: FolderArgs,

    /// Skip the prerequisites confirmation.
    #[arg(short = 'c', long = "confirm")]
    pub confirm: bool,

    /// Location of the uploader jar.
    #[arg(short = 'j', long = "jar", value_name = "JAR", default_value = DEFAULT_JAR)]
    pub jar: PathBuf,

    /// Configuration override file passed to the uploader.
    #[arg(short = 'y', long = "uploader-config", value_name = "FILE")]
    pub uploader_config: Option<PathBuf>,

    /// Act for another client; prompts for credentials and a card token.
    #[arg(short = 'i', long = "client-id", value_name = "ID")]
    pub client_id: Option<i64>,

    /// Pipeline id (asked interactively when omitted).
    #[arg(short = 'p', long = "pipeline", value_name = "ID")]
    pub pipeline: Option<i64>,

    /// Run reference (default: <folder name>_<YYYYMMDDHHMM>).
    #[arg(short = 'r', long = "ref", value_name = "NAME")]
    pub reference: Option<String>,

    /// Sample type id applied to every sample (default: peripheral blood).
    #[arg(short = 's', long = "sample-type", value_name = "ID", default_value_t = DEFAULT_SAMPLE_TYPE_ID)]
    pub sample_type: i64,

    /// Write the request JSON here (overwrites) instead of printing it.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Token card (JSON or text export) used to answer token prompts.
    #[arg(long = "token-card", value_name = "FILE")]
    pub token_card: Option<PathBuf>,

    /// Echo every uploader command line at info level.
    #[arg(long = "debug")]
    pub debug: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub folder: FolderArgs,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Rule file to show instead of the built-in rule.
    #[arg(short = 'x', long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
