//! CLI argument definitions for the bulk upload converter.

use std::path::PathBuf;

use bus_model::{AppendMode, RunOptions, WarnMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bu",
    version,
    about = "EAMENA bulk upload sheets - convert spreadsheet rows to business data",
    long_about = "Convert EAMENA Bulk Upload Sheets into business-data documents.\n\n\
                  Sheets are validated against the graph, vocabularies and existing\n\
                  resources held in a JSON catalog. Generated documents can be\n\
                  annotated, summarized and undone again."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow sheet cell values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every node of a graph with its sheet key and vocabulary.
    #[command(alias = "list_nodes")]
    ListNodes(RunArgs),

    /// Dump the nested documents built from the sheet rows.
    Unflatten(RunArgs),

    /// Dump the nested documents with node ids and concept value ids.
    Translate(RunArgs),

    /// Convert a sheet into a business-data document.
    Convert(RunArgs),

    /// Inspect a sheet and list its errors and warnings.
    Validate(RunArgs),

    /// Placeholder resources for references that are not in the catalog.
    Prerequisites(RunArgs),

    /// Add node group names, field names and concept labels to a document.
    Annotate(RunArgs),

    /// List the resource ids of a document with their EAMENA IDs.
    Summary(RunArgs),

    /// Delete every resource a document names from the catalog.
    Undo(RunArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListNodes(_) => "list_nodes",
            Self::Unflatten(_) => "unflatten",
            Self::Translate(_) => "translate",
            Self::Convert(_) => "convert",
            Self::Validate(_) => "validate",
            Self::Prerequisites(_) => "prerequisites",
            Self::Annotate(_) => "annotate",
            Self::Summary(_) => "summary",
            Self::Undo(_) => "undo",
        }
    }

    pub fn args(&self) -> &RunArgs {
        match self {
            Self::ListNodes(args)
            | Self::Unflatten(args)
            | Self::Translate(args)
            | Self::Convert(args)
            | Self::Validate(args)
            | Self::Prerequisites(args)
            | Self::Annotate(args)
            | Self::Summary(args)
            | Self::Undo(args) => args,
        }
    }
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// JSON catalog holding schemas, vocabularies, languages and resources.
    #[arg(short = 'c', long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Graph id of the resources to convert.
    #[arg(short = 'g', long = "graph", value_name = "UUID")]
    pub graph: Option<String>,

    /// Sheet (CSV) or business-data document (JSON) to process.
    #[arg(short = 's', long = "source", value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Language of the sheet.
    #[arg(short = 'l', long = "language", default_value = "en")]
    pub language: String,

    /// How warnings are treated.
    #[arg(short = 'w', long = "warnings", value_enum, default_value = "warn")]
    pub warnings: WarningsArg,

    /// Whether rows create new resources or extend existing ones.
    #[arg(short = 'a', long = "append", value_enum, default_value = "new")]
    pub append: AppendArg,

    /// Directory for the output file (default: stdout).
    #[arg(short = 'd', long = "dest-dir", alias = "dest_dir", value_name = "DIR")]
    pub dest_dir: Option<PathBuf>,
}

impl RunArgs {
    pub fn run_options(&self) -> RunOptions {
        let mut options = RunOptions::new()
            .with_language(self.language.clone())
            .with_warn_mode(self.warnings.into())
            .with_append_mode(self.append.into());
        if let Some(graph) = &self.graph {
            options = options.with_graph(graph.clone());
        }
        options
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WarningsArg {
    /// Report warnings but still write output.
    Warn,
    /// Drop warnings silently.
    Ignore,
    /// Treat warnings as errors.
    Strict,
}

impl From<WarningsArg> for WarnMode {
    fn from(value: WarningsArg) -> Self {
        match value {
            WarningsArg::Warn => Self::Warn,
            WarningsArg::Ignore => Self::Ignore,
            WarningsArg::Strict => Self::Strict,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AppendArg {
    /// Generate new resource ids.
    New,
    /// Extend the resources named in the UNIQUEID column.
    Append,
}

impl From<AppendArg> for AppendMode {
    fn from(value: AppendArg) -> Self {
        match value {
            AppendArg::New => Self::New,
            AppendArg::Append => Self::Append,
        }
    }
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
