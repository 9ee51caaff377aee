//! Command execution: catalog loading, the uploader call and output writing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use bus_core::{BulkUploader, RunOutput};
use bus_ingest::CsvRowSource;
use bus_model::{BusinessDataDocument, Catalog, MemoryStore};
use bus_validate::RunReport;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::cli::Command;
use crate::logging::redact_value;

/// Result of one command, ready for the terminal summary.
#[derive(Debug)]
pub struct CommandOutcome {
    pub operation: &'static str,
    pub report: RunReport,
    /// File the output was written to; `None` for stdout or withheld output.
    pub written: Option<PathBuf>,
    /// Serialized output when it goes to stdout.
    pub stdout: Option<String>,
}

impl CommandOutcome {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }
}

pub fn run_command(command: &Command) -> Result<CommandOutcome> {
    let operation = command.name();
    let args = command.args();
    let span = info_span!("command", operation);
    let _guard = span.enter();
    let start = Instant::now();

    check_dest_dir(args.dest_dir.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let mut store = MemoryStore::from_catalog(catalog);
    let rows = CsvRowSource::new();
    let source = args.source.as_deref();

    let (data, report) = {
        let mut uploader = BulkUploader::new(&mut store, &rows, args.run_options());
        match command {
            Command::ListNodes(_) => serialize(uploader.list_nodes())?,
            Command::Unflatten(_) => serialize(uploader.unflatten(source))?,
            Command::Translate(_) => serialize(uploader.translate(source))?,
            Command::Convert(_) => {
                let output = uploader.convert(source);
                let data = output.data.map(serde_json::to_value).transpose()?;
                (data, output.report)
            }
            Command::Validate(_) => serialize(uploader.validate(source))?,
            Command::Prerequisites(_) => serialize(uploader.prerequisites(source))?,
            Command::Annotate(_) => {
                let document = read_document(source)?;
                serialize(uploader.annotate(document))?
            }
            Command::Summary(_) => {
                let document = read_document(source)?;
                serialize(uploader.summary(&document))?
            }
            Command::Undo(_) => {
                let document = read_document(source)?;
                serialize(uploader.undo(&document))?
            }
        }
    };

    if matches!(command, Command::Undo(_)) {
        save_catalog(&args.catalog, store.catalog())?;
    }
    for record in report.errors.iter().chain(&report.warnings) {
        debug!(subject = redact_value(&record.subject), message = %record.message, "diagnostic");
    }

    let mut outcome = CommandOutcome {
        operation,
        report,
        written: None,
        stdout: None,
    };
    // `convert` yields no data once gated; every other operation's data is
    // written as is, so `validate` output carries its own error list.
    if let Some(data) = data {
        let text = serde_json::to_string(&data).context("serialize output")?;
        match &args.dest_dir {
            Some(dir) => {
                let path = output_path(dir, source, operation);
                fs::write(&path, text)
                    .with_context(|| format!("write output {}", path.display()))?;
                outcome.written = Some(path);
            }
            None if !matches!(command, Command::Undo(_)) => outcome.stdout = Some(text),
            None => {}
        }
    }
    info!(
        operation,
        errors = outcome.report.error_count(),
        warnings = outcome.report.warning_count(),
        written = outcome.written.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "command complete"
    );
    Ok(outcome)
}

fn serialize<T: Serialize>(output: RunOutput<T>) -> Result<(Option<Value>, RunReport)> {
    let data = serde_json::to_value(&output.data).context("serialize output")?;
    Ok((Some(data), output.report))
}

fn check_dest_dir(dir: Option<&Path>) -> Result<()> {
    let Some(dir) = dir else {
        return Ok(());
    };
    if !dir.exists() {
        bail!("Output path not found: {}", dir.display());
    }
    if !dir.is_dir() {
        bail!("Output path is not a directory: {}", dir.display());
    }
    Ok(())
}

/// `<dir>/<source file name>.json`, or `<dir>/<operation>.json` without a
/// source.
pub fn output_path(dir: &Path, source: Option<&Path>, operation: &str) -> PathBuf {
    let name = source
        .and_then(Path::file_name)
        .map_or_else(|| operation.to_string(), |name| name.to_string_lossy().into_owned());
    dir.join(format!("{name}.json"))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&text)
        .with_context(|| format!("parse catalog {}", path.display()))?;
    debug!(
        schemas = catalog.schemas.len(),
        resources = catalog.resources.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let text = serde_json::to_string_pretty(catalog).context("serialize catalog")?;
    fs::write(path, text).with_context(|| format!("write catalog {}", path.display()))
}

fn read_document(source: Option<&Path>) -> Result<BusinessDataDocument> {
    let path = source.ok_or_else(|| anyhow!("Need an input file; use --source"))?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not open the file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse business data {}", path.display()))
}
