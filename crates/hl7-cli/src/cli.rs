//! CLI argument definitions for the `hl7` command.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use hl7_model::Hl7Version;

#[derive(Parser)]
#[command(
    name = "hl7",
    version,
    about = "Inspect HL7 v2.x message structures",
    long_about = "Build HL7 v2.x message trees from the built-in definitions.\n\n\
                  Unknown message types fall back to generic structures, and \n\
                  non-standard segments can be appended by name."
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
    /// List the message definitions that ship with the command.
    Messages(MessagesArgs),

    /// Build a message with every required slot materialised and print it.
    Skeleton(SkeletonArgs),
}

#[derive(Parser)]
pub struct MessagesArgs {
    /// Only list definitions for this version (e.g. 2.5.1 or v251).
    #[arg(long = "version", value_name = "VERSION")]
    pub version: Option<Hl7Version>,
}

#[derive(Parser)]
pub struct SkeletonArgs {
    /// Message structure name, e.g. ORU_R01.
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// HL7 version written to MSH-12.
    #[arg(long = "version", value_name = "VERSION", default_value = "2.5")]
    pub version: Hl7Version,

    /// Append a non-standard segment (repeatable).
    #[arg(long = "append", value_name = "SEGMENT")]
    pub append: Vec<String>,

    /// Repetitions to create for required repeating slots.
    #[arg(long = "repeat", value_name = "N", default_value_t = 1)]
    pub repeat: usize,

    /// Fail on unknown segments and fields instead of falling back.
    #[arg(long = "strict")]
    pub strict: bool,
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
