//! Command-line interface for the umlschema utility
//!
//! Provides a CLI to export a package of a StarUML project as an OpenAPI
//! document and as a JSON-LD vocabulary.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use umlschema::core::logging::init_logging;
use umlschema::plugins::{to_pretty_json, Orchestrator};
use umlschema::{
    load_model, ExportConfig, ExportTarget, Model, NotAvailableTracker, OPENAPI_TYPES,
    RANGE_FALLBACKS,
};

/// umlschema - Export UML models as OpenAPI and JSON-LD
#[derive(Parser)]
#[command(name = "umlschema")]
#[command(about = "Export a package of a StarUML model as OpenAPI and JSON-LD documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Export configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Which package to export, and optionally the diagram that scopes it
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// StarUML project file (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Name or id of the package to export
    #[arg(short, long)]
    pub package: String,

    /// Only export members shown on this diagram (name or id)
    #[arg(short, long)]
    pub diagram: Option<String>,
}

impl TargetArgs {
    pub fn target(&self) -> ExportTarget {
        match &self.diagram {
            Some(diagram) => ExportTarget::diagram(self.package.as_str(), diagram.as_str()),
            None => ExportTarget::package(self.package.as_str()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a package as an OpenAPI document
    Openapi {
        #[command(flatten)]
        target: TargetArgs,

        /// Output file for the document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a package as a JSON-LD vocabulary
    Jsonld {
        #[command(flatten)]
        target: TargetArgs,

        /// Output file for the document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write both documents and the error log into a directory
    Export {
        #[command(flatten)]
        target: TargetArgs,

        /// Directory for `<Package>.json`, `<Package>.jsonld` and the error log
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Show the built-in type tables
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Load a project and report unresolved types
    Validate {
        /// StarUML project file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Package to run both exporters over; without it only loading is checked
        #[arg(short, long)]
        package: Option<String>,
    },
}

/// Main CLI application
pub struct UmlSchemaApp {
    orchestrator: Orchestrator,
}

impl UmlSchemaApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default())
    }

    /// Create a new application instance with an export config
    pub fn with_config(config: ExportConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(config),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level = std::env::var("UMLSCHEMA_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());

        let log_format = std::env::var("UMLSCHEMA_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("umlschema v{}", env!("CARGO_PKG_VERSION"));
        }

        if let Some(path) = &cli.config {
            let config = ExportConfig::from_file(path)?;
            if cli.verbose {
                eprintln!("Loaded configuration from {}", path.display());
            }
            self.orchestrator = Orchestrator::new(config);
        }

        match cli.command {
            Commands::Openapi { target, output } => {
                self.openapi_command(&target, output, cli.verbose)
            }
            Commands::Jsonld { target, output } => self.jsonld_command(&target, output, cli.verbose),
            Commands::Export { target, out_dir } => {
                self.export_command(&target, out_dir, cli.verbose)
            }
            Commands::Types { json } => self.types_command(json, cli.verbose),
            Commands::Validate { input, package } => {
                self.validate_command(input, package, cli.verbose)
            }
        }
    }

    /// Handle the openapi command
    fn openapi_command(
        &self,
        target: &TargetArgs,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let model = self.load(target.input.clone(), verbose)?;
        let report = self.orchestrator.export_openapi(&model, &target.target())?;

        if verbose {
            eprintln!(
                "Exported {} schemas and {} paths",
                report.document.components.schemas.len(),
                report.document.paths.len()
            );
            print_diagnostics(&report.diagnostics, &report.errors);
        }

        self.write_output(output, &to_pretty_json(&report.document)?)
    }

    /// Handle the jsonld command
    fn jsonld_command(
        &self,
        target: &TargetArgs,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let model = self.load(target.input.clone(), verbose)?;
        let report = self.orchestrator.export_jsonld(&model, &target.target())?;

        if verbose {
            let graph = &report.document.graph;
            eprintln!(
                "Exported {} classes, {} properties and {} instances",
                graph.rdfs_classes.len(),
                graph.rdfs_properties.len(),
                graph.rdfs_instances.len()
            );
            print_diagnostics(&report.diagnostics, &report.errors);
        }

        self.write_output(output, &to_pretty_json(&report.document)?)
    }

    /// Handle the export command
    fn export_command(&self, target: &TargetArgs, out_dir: PathBuf, verbose: bool) -> Result<()> {
        let model = self.load(target.input.clone(), verbose)?;
        let summary = self
            .orchestrator
            .export_all(&model, &target.target(), &out_dir)?;

        for file in &summary.files {
            println!("{}", file.display());
        }
        if let Some(log) = &summary.error_log {
            println!("{}", log.display());
        }

        if verbose {
            print_diagnostics(&summary.openapi.diagnostics, &summary.openapi.errors);
            print_diagnostics(&summary.jsonld.diagnostics, &summary.jsonld.errors);
        }
        Ok(())
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing built-in type tables");
        }

        let config = self.orchestrator.config();

        if json {
            let openapi: Vec<_> = OPENAPI_TYPES
                .iter()
                .map(|(name, ty)| {
                    serde_json::json!({
                        "name": name,
                        "type": ty.kind,
                        "format": ty.format,
                    })
                })
                .collect();
            let ranges: Vec<_> = RANGE_FALLBACKS
                .iter()
                .map(|(name, range)| serde_json::json!({ "name": name, "range": range }))
                .collect();
            let types = serde_json::json!({
                "openapi": openapi,
                "range_rules": config.range_rules,
                "range_fallbacks": ranges,
                "core_types": config.core_types,
            });
            println!("{}", serde_json::to_string_pretty(&types)?);
        } else {
            println!("OpenAPI types:");
            for (name, ty) in OPENAPI_TYPES {
                println!("  {:<10} - {}", name, ty);
            }
            println!();
            println!("RDFS ranges:");
            for (name, range) in &config.range_rules {
                println!("  {:<10} - {}", name, range);
            }
            for (name, range) in RANGE_FALLBACKS {
                println!("  {:<10} - {} (fallback)", name, range);
            }
            println!();
            println!("Core types: {}", config.core_types.join(", "));
        }

        Ok(())
    }

    /// Handle the validate command
    fn validate_command(
        &self,
        input: Option<PathBuf>,
        package: Option<String>,
        verbose: bool,
    ) -> Result<()> {
        let model = match self.load(input, verbose) {
            Ok(model) => model,
            Err(e) => {
                println!("✗ Could not load project: {}", e);
                return Err(e);
            }
        };

        let Some(package) = package else {
            println!(
                "✓ Loaded {} elements and {} views",
                model.element_count(),
                model.view_count()
            );
            return Ok(());
        };

        let target = ExportTarget::package(package.as_str());
        let openapi = self.orchestrator.export_openapi(&model, &target)?;
        let jsonld = self.orchestrator.export_jsonld(&model, &target)?;

        let unresolved = openapi.diagnostics.len() + jsonld.diagnostics.len();
        let errors = openapi.errors.len() + jsonld.errors.len();

        println!("OpenAPI:");
        print_report(&openapi.diagnostics, &openapi.errors);
        println!("JSON-LD:");
        print_report(&jsonld.diagnostics, &jsonld.errors);

        if unresolved == 0 && errors == 0 {
            println!("✓ Package '{}' exports cleanly", package);
        } else {
            println!(
                "✗ Package '{}' has {} unresolved types and {} errors",
                package, unresolved, errors
            );
        }
        Ok(())
    }

    fn load(&self, input: Option<PathBuf>, verbose: bool) -> Result<Model> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let model = load_model(&content)?;
        debug!(
            elements = model.element_count(),
            views = model.view_count(),
            "Loaded project"
        );
        Ok(model)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                if content.is_empty() || content.ends_with('\n') {
                    write!(stdout, "{}", content)?;
                } else {
                    writeln!(stdout, "{}", content)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Get a reference to the orchestrator (for testing)
    #[cfg(test)]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

impl Default for UmlSchemaApp {
    fn default() -> Self {
        Self::new()
    }
}

fn print_diagnostics(diagnostics: &NotAvailableTracker, errors: &[String]) {
    for diagnostic in diagnostics.iter() {
        eprintln!("  {}", diagnostic);
    }
    for error in errors {
        eprintln!("  error: {}", error);
    }
}

fn print_report(diagnostics: &NotAvailableTracker, errors: &[String]) {
    println!(
        "  {} not linked, {} invalid, {} errors",
        diagnostics.not_linked_types().len(),
        diagnostics.invalid_types().len(),
        errors.len()
    );
    for diagnostic in diagnostics.iter() {
        println!("    {}", diagnostic);
    }
    for error in errors {
        println!("    error: {}", error);
    }
}
