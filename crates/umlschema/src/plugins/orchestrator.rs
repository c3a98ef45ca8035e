//! Export orchestrator
//!
//! Runs the exporters over a model:
//! Target → ExportContext → Exporter → ExportReport (→ files)

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, span, warn, Level};

use crate::core::{
    ErrorLog, ExportConfig, ExportContext, ExportError, ExportTarget, Exporter, Model,
    NotAvailableTracker,
};
use crate::plugins::jsonld::{JsonLdDocument, JsonLdExporter};
use crate::plugins::openapi::{OpenApiDocument, OpenApiExporter};

/// Result of one export run
#[derive(Debug, Clone)]
pub struct ExportReport<T> {
    pub document: T,
    /// Unresolved attribute types found during this run
    pub diagnostics: NotAvailableTracker,
    /// Errors caught and logged during this run
    pub errors: Vec<String>,
}

/// Result of [`Orchestrator::export_all`]
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub openapi: ExportReport<OpenApiDocument>,
    pub jsonld: ExportReport<JsonLdDocument>,
    /// Documents written, OpenAPI first
    pub files: Vec<PathBuf>,
    pub error_log: Option<PathBuf>,
}

/// Export orchestrator that coordinates the entire pipeline
///
/// Every export builds a fresh [`ExportContext`], so reports from one call
/// never carry state from another.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: ExportConfig,
    openapi: OpenApiExporter,
    jsonld: JsonLdExporter,
}

impl Orchestrator {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            openapi: OpenApiExporter::new(),
            jsonld: JsonLdExporter::new(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Build the OpenAPI document for `target`
    pub fn export_openapi(
        &self,
        model: &Model,
        target: &ExportTarget,
    ) -> Result<ExportReport<OpenApiDocument>> {
        let (report, _) = self.run(&self.openapi, model, target, ErrorLog::new())?;
        Ok(report)
    }

    /// Build the JSON-LD vocabulary for `target`
    pub fn export_jsonld(
        &self,
        model: &Model,
        target: &ExportTarget,
    ) -> Result<ExportReport<JsonLdDocument>> {
        let (report, _) = self.run(&self.jsonld, model, target, ErrorLog::new())?;
        Ok(report)
    }

    /// Run both exporters and write `<Package>.json`, `<Package>.jsonld` and
    /// the error log into `out_dir`
    pub fn export_all(
        &self,
        model: &Model,
        target: &ExportTarget,
        out_dir: impl AsRef<Path>,
    ) -> Result<ExportSummary> {
        let out_dir = out_dir.as_ref();
        let export_span = span!(Level::INFO, "export_all", out_dir = %out_dir.display());
        let _enter = export_span.enter();

        std::fs::create_dir_all(out_dir).map_err(ExportError::from)?;
        let log = ErrorLog::with_file(out_dir.join(&self.config.error_file_name));

        let (openapi, log) = self.run(&self.openapi, model, target, log)?;
        let (jsonld, log) = self.run(&self.jsonld, model, target, log)?;

        let package = openapi.document.info.title.clone();
        let openapi_path = out_dir.join(format!("{}.{}", package, self.openapi.extension()));
        write_document(&openapi_path, &openapi.document)?;
        let jsonld_path = out_dir.join(format!("{}.{}", package, self.jsonld.extension()));
        write_document(&jsonld_path, &jsonld.document)?;

        // The log file exists even when nothing went wrong
        log.flush();

        info!(
            package = %package,
            errors = log.messages().len(),
            "Export completed"
        );

        Ok(ExportSummary {
            openapi,
            jsonld,
            files: vec![openapi_path, jsonld_path],
            error_log: log.path().map(Path::to_path_buf),
        })
    }

    fn run<E: Exporter>(
        &self,
        exporter: &E,
        model: &Model,
        target: &ExportTarget,
        log: ErrorLog,
    ) -> Result<(ExportReport<E::Output>, ErrorLog)> {
        let run_span = span!(
            Level::DEBUG,
            "pipeline_export",
            exporter = exporter.name(),
            package = %target.package
        );
        let _enter = run_span.enter();

        let before = log.messages().len();
        let mut ctx = ExportContext::new(model, &self.config, target)?.with_error_log(log);
        let document = exporter.export(&mut ctx)?;

        if !ctx.diagnostics.is_empty() {
            warn!(
                exporter = exporter.name(),
                not_linked = ctx.diagnostics.not_linked_types().len(),
                invalid = ctx.diagnostics.invalid_types().len(),
                "Export has unresolved attribute types"
            );
        }

        let errors = ctx.errors.messages()[before..].to_vec();
        debug!(
            exporter = exporter.name(),
            diagnostics = ctx.diagnostics.len(),
            errors = errors.len(),
            "Exporter finished"
        );

        let report = ExportReport {
            document,
            diagnostics: ctx.diagnostics,
            errors,
        };
        Ok((report, ctx.errors))
    }
}

/// Serialize a document as pretty-printed JSON
pub fn to_pretty_json<T: Serialize>(document: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(document).map_err(ExportError::from)?)
}

/// Write a document to `path` as pretty-printed JSON
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let json = to_pretty_json(document)?;
    std::fs::write(path, json).map_err(ExportError::from)?;
    debug!(path = %path.display(), "Wrote document");
    Ok(())
}
