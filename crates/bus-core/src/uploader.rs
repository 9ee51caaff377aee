//! Run operations.
//!
//! A [`BulkUploader`] owns the per-run caches (identity lookups and graph
//! names) and borrows its collaborators. Every operation returns a
//! [`RunOutput`]: the data plus the finalized report. Fatal conditions
//! produce a single error with an empty subject and empty data.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use bus_ingest::Unflattener;
use bus_map::{ConceptResolver, NodeIndex, NodeListing};
use bus_model::{
    BusinessDataDocument, Diagnostics, Direction, ErrorRecord, GeometryProbe, Language, RawRow,
    Resource, ResourceStore, RowSource, RunOptions, Schema, SchemaStore,
};
use bus_standards::SheetProfile;
use bus_standards::heritage_place;
use bus_validate::{RunReport, check_translated_keys, finalize, gate_output};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn};

use crate::annotate::annotate_document;
use crate::error::FatalError;
use crate::identity::{IdentityCache, ResourceResolver};
use crate::mapper::DatatypeMapper;
use crate::prerequisites::PrerequisiteResolver;
use crate::summary::{ImportSummary, summarize};
use crate::tiles::TileBuilder;
use crate::undo::{UndoReport, undo_document};

const SUBJECT_KEY: &str = "_";

/// Every store collaborator in one object.
pub trait Backend: SchemaStore + ResourceStore + GeometryProbe {}

impl<T: SchemaStore + ResourceStore + GeometryProbe> Backend for T {}

/// What every operation returns: its data plus the finalized report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput<T> {
    /// Operation result; the type's default after a fatal error.
    pub data: T,
    /// Errors and warnings after the warn policy and ordering.
    pub report: RunReport,
}

/// Schema, profile and key index for the sheet operations.
struct SheetRun {
    schema: Schema,
    profile: &'static SheetProfile,
    index: NodeIndex,
}

pub struct BulkUploader<'a> {
    store: &'a mut dyn Backend,
    rows: &'a dyn RowSource,
    options: RunOptions,
    identity: IdentityCache,
    graph_names: Option<BTreeMap<String, String>>,
}

impl<'a> BulkUploader<'a> {
    pub fn new(store: &'a mut dyn Backend, rows: &'a dyn RowSource, options: RunOptions) -> Self {
        Self {
            store,
            rows,
            options,
            identity: IdentityCache::new(),
            graph_names: None,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Every indexed node of the run's graph.
    pub fn list_nodes(&mut self) -> RunOutput<Vec<NodeListing>> {
        let span = info_span!("list_nodes", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let diagnostics = Diagnostics::new();
        let result = self.schema().and_then(|schema| {
            let profile = SheetProfile::for_schema_name(&schema.name);
            let index = self.index(&schema, profile)?;
            let listings = index.listings();
            let count = listings.len();
            Ok((listings, count))
        });
        self.finish("list_nodes", result, diagnostics, start)
    }

    /// Stage 1 only: nested documents keyed by column keys.
    pub fn unflatten(&mut self, source: Option<&Path>) -> RunOutput<Vec<Value>> {
        let span = info_span!("unflatten", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();
        let result = self.sheet_run(false).and_then(|run| {
            let documents = self.unflatten_rows(&run, source, &mut diagnostics)?;
            let count = documents.len();
            Ok((documents, count))
        });
        self.finish("unflatten", result, diagnostics, start)
    }

    /// Stages 1 and 2: keys become node ids and concept labels value ids.
    /// The `_` subject is removed from each top-level document.
    pub fn translate(&mut self, source: Option<&Path>) -> RunOutput<Vec<Value>> {
        let span = info_span!("translate", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();
        let result = self.sheet_run(true).and_then(|run| {
            let mut documents = self.translate_rows(&run, source, &mut diagnostics)?;
            for document in &mut documents {
                if let Value::Object(map) = document {
                    map.shift_remove(SUBJECT_KEY);
                }
            }
            let count = documents.len();
            Ok((documents, count))
        });
        self.finish("translate", result, diagnostics, start)
    }

    /// Full conversion. The document is withheld when any error remains
    /// after the warn policy.
    pub fn convert(&mut self, source: Option<&Path>) -> RunOutput<Option<BusinessDataDocument>> {
        let span = info_span!("convert", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();
        let result = self.convert_resources(source, &mut diagnostics).map(|resources| {
            let count = resources.len();
            (resources, count)
        });
        let output = self.finish("convert", result, diagnostics, start);
        let decision = gate_output(&output.report);
        if decision.block_output {
            warn!(blocking_errors = decision.blocking_errors, "output blocked");
        }
        RunOutput {
            data: (!decision.block_output).then(|| BusinessDataDocument::new(output.data)),
            report: output.report,
        }
    }

    /// Full conversion, returning only the sorted records.
    pub fn validate(&mut self, source: Option<&Path>) -> RunOutput<Vec<ErrorRecord>> {
        let span = info_span!("validate", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();
        let result = self
            .convert_resources(source, &mut diagnostics)
            .map(|resources| ((), resources.len()));
        let output = self.finish("validate", result, diagnostics, start);
        RunOutput {
            data: output.report.validation_records(),
            report: output.report,
        }
    }

    /// Placeholder resources for references that do not resolve.
    pub fn prerequisites(&mut self, source: Option<&Path>) -> RunOutput<BusinessDataDocument> {
        let span = info_span!("prerequisites", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();
        let result = self.sheet_run(true).and_then(|run| {
            let documents = self.translate_rows(&run, source, &mut diagnostics)?;
            if !check_translated_keys(&documents, &run.schema, &mut diagnostics) {
                return Ok((BusinessDataDocument::default(), 0));
            }
            let resources = self.build_resources(&run, &documents, &mut diagnostics)?;
            let mut prerequisites = PrerequisiteResolver::new(&run.schema, &*self.store);
            let mut resolver = ResourceResolver::new(&*self.store, &mut self.identity);
            let placeholders = prerequisites.resolve(&resources, &mut resolver)?;
            Ok((BusinessDataDocument::new(placeholders), resources.len()))
        });
        self.finish("prerequisites", result, diagnostics, start)
    }

    /// Adds node group names, field names and concept labels to `document`.
    pub fn annotate(&mut self, mut document: BusinessDataDocument) -> RunOutput<BusinessDataDocument> {
        let span = info_span!("annotate", graph_id = %self.graph_label());
        let _guard = span.enter();
        let start = Instant::now();
        let result = self.schema().and_then(|schema| {
            let index = self.index(&schema, None)?;
            annotate_document(&mut document, &index);
            let count = document.resources().len();
            Ok((document, count))
        });
        self.finish("annotate", result, Diagnostics::new(), start)
    }

    /// Resource ids of `document` paired with their stored business ids.
    pub fn summary(&mut self, document: &BusinessDataDocument) -> RunOutput<Vec<ImportSummary>> {
        let span = info_span!("summary");
        let _guard = span.enter();
        let start = Instant::now();
        let store: &dyn Backend = &*self.store;
        let mut nodegroups: BTreeMap<String, String> = BTreeMap::new();
        let result = summarize(document, store, &self.options.language, |graph_id| {
            if let Some(known) = nodegroups.get(graph_id) {
                return Ok(known.clone());
            }
            let nodegroup = store
                .get_schema(graph_id)?
                .and_then(|schema| SheetProfile::for_schema_name(&schema.name))
                .map_or(heritage_place::BUSINESS_ID_NODEGROUP, |profile| {
                    profile.business_id_nodegroup
                });
            nodegroups.insert(graph_id.to_string(), nodegroup.to_string());
            Ok(nodegroup.to_string())
        })
        .map(|entries| {
            let count = entries.len();
            (entries, count)
        })
        .map_err(FatalError::from);
        self.finish("summary", result, Diagnostics::new(), start)
    }

    /// Deletes every resource `document` names.
    pub fn undo(&mut self, document: &BusinessDataDocument) -> RunOutput<UndoReport> {
        let span = info_span!("undo");
        let _guard = span.enter();
        let start = Instant::now();
        let result = undo_document(document, &mut *self.store)
            .map(|report| (report, document.resources().len()))
            .map_err(FatalError::from);
        self.finish("undo", result, Diagnostics::new(), start)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    fn convert_resources(
        &mut self,
        source: Option<&Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Resource>, FatalError> {
        let run = self.sheet_run(true)?;
        let documents = self.translate_rows(&run, source, diagnostics)?;
        if !check_translated_keys(&documents, &run.schema, diagnostics) {
            debug!("translated keys invalid; skipping conversion");
            return Ok(Vec::new());
        }
        let mut resources = self.build_resources(&run, &documents, diagnostics)?;
        self.map_resources(&run, &mut resources, diagnostics)?;
        Ok(resources)
    }

    fn unflatten_rows(
        &self,
        run: &SheetRun,
        source: Option<&Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Value>, FatalError> {
        let (columns, rows) = self.read_rows(source)?;
        let unflattener = Unflattener::new(&run.schema, run.profile, &run.index);
        unflattener.check_columns(&columns, diagnostics);
        Ok(unflattener.unflatten(&rows))
    }

    fn translate_rows(
        &self,
        run: &SheetRun,
        source: Option<&Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Value>, FatalError> {
        let documents = self.unflatten_rows(run, source, diagnostics)?;
        let resolver = ConceptResolver::new(&run.index, &*self.store);
        let mut translated = Vec::with_capacity(documents.len());
        for document in &documents {
            translated.push(resolver.resolve_document(document, diagnostics)?);
        }
        Ok(translated)
    }

    fn build_resources(
        &mut self,
        run: &SheetRun,
        documents: &[Value],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Resource>, FatalError> {
        let builder = TileBuilder::new(&run.schema, Some(run.profile))
            .with_append_mode(self.options.append_mode);
        let mut resolver = ResourceResolver::new(&*self.store, &mut self.identity);
        Ok(builder.build(documents, &mut resolver, diagnostics)?)
    }

    fn map_resources(
        &mut self,
        run: &SheetRun,
        resources: &mut [Resource],
        diagnostics: &mut Diagnostics,
    ) -> Result<(), FatalError> {
        let language = self.language()?;
        if self.graph_names.is_none() {
            let names = self
                .store
                .list_schemas()?
                .into_iter()
                .map(|summary| (summary.graph_id, summary.name))
                .collect();
            self.graph_names = Some(names);
        }
        let graph_names = self.graph_names.get_or_insert_default();
        let mapper = DatatypeMapper::new(&run.schema, language, &*self.store, graph_names);
        let mut resolver = ResourceResolver::new(&*self.store, &mut self.identity);
        mapper.map_resources(resources, &mut resolver, diagnostics)?;
        Ok(())
    }

    // ========================================================================
    // Context
    // ========================================================================

    fn graph_label(&self) -> String {
        self.options.graph_id.clone().unwrap_or_default()
    }

    fn schema(&self) -> Result<Schema, FatalError> {
        let graph_id = self
            .options
            .graph_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(FatalError::InvalidGraph)?;
        self.store
            .get_schema(graph_id)?
            .ok_or(FatalError::InvalidGraph)
    }

    fn index(
        &self,
        schema: &Schema,
        profile: Option<&SheetProfile>,
    ) -> Result<NodeIndex, FatalError> {
        let mut index = NodeIndex::build(schema, profile);
        index.load_vocabularies(&*self.store, &self.options.language, profile)?;
        Ok(index)
    }

    fn sheet_run(&self, with_vocabularies: bool) -> Result<SheetRun, FatalError> {
        let schema = self.schema()?;
        let profile = SheetProfile::for_schema_name(&schema.name).ok_or_else(|| {
            FatalError::NoSheetProfile {
                name: schema.name.clone(),
            }
        })?;
        let index = if with_vocabularies {
            self.index(&schema, Some(profile))?
        } else {
            NodeIndex::build(&schema, Some(profile))
        };
        Ok(SheetRun {
            schema,
            profile,
            index,
        })
    }

    fn read_rows(&self, source: Option<&Path>) -> Result<(Vec<String>, Vec<RawRow>), FatalError> {
        let source = source.ok_or(FatalError::MissingSource)?;
        let unreadable = |err| FatalError::UnreadableSource {
            path: source.to_path_buf(),
            source: err,
        };
        let columns = self.rows.columns(source).map_err(unreadable)?;
        let rows = self.rows.rows(source).map_err(unreadable)?;
        debug!(columns = columns.len(), rows = rows.len(), "rows read");
        Ok((columns, rows))
    }

    /// Language of the run, falling back to the first known language.
    fn language(&self) -> Result<Language, FatalError> {
        let code = &self.options.language;
        let languages = self.store.languages()?;
        Ok(languages
            .iter()
            .find(|language| &language.code == code)
            .or_else(|| languages.first())
            .cloned()
            .unwrap_or_else(|| Language::new(code.clone(), Direction::Ltr)))
    }

    fn finish<T: Default>(
        &self,
        operation: &str,
        result: Result<(T, usize), FatalError>,
        diagnostics: Diagnostics,
        start: Instant,
    ) -> RunOutput<T> {
        match result {
            Ok((data, count)) => {
                let report = finalize(diagnostics, count, self.options.warn_mode);
                info!(
                    operation,
                    items = count,
                    errors = report.error_count(),
                    warnings = report.warning_count(),
                    duration_ms = start.elapsed().as_millis(),
                    "run complete"
                );
                RunOutput { data, report }
            }
            Err(fatal) => {
                error!(operation, error = %fatal, "run stopped");
                RunOutput {
                    data: T::default(),
                    report: RunReport {
                        errors: vec![ErrorRecord::new("", fatal.to_string(), "")],
                        warnings: Vec::new(),
                        warn_mode: self.options.warn_mode,
                    },
                }
            }
        }
    }
}
