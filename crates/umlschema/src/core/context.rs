//! Per-export state
//!
//! An [`ExportContext`] is built fresh for every export call and threaded
//! through every assembler. It carries the resolved target, the accumulated
//! diagnostics and error log, and the list of enumerations already emitted as
//! RDFS classes, so nothing leaks from one export into the next.

use anyhow::Result;
use indexmap::IndexSet;
use tracing::debug;

use super::{
    ElementId, ErrorLog, ExportConfig, ExportError, Model, NotAvailableTracker, Package,
    TypeMapper,
};

/// Visibility scope of an export
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Every member of the package is exported
    #[default]
    Package,
    /// Only members with a visible view on this diagram are exported
    Diagram(ElementId),
}

/// What to export: a package, and the visibility scope for its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Package id or name
    pub package: String,
    pub mode: ExportMode,
}

impl ExportTarget {
    pub fn package(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            mode: ExportMode::Package,
        }
    }

    pub fn diagram(package: impl Into<String>, diagram: impl Into<ElementId>) -> Self {
        Self {
            package: package.into(),
            mode: ExportMode::Diagram(diagram.into()),
        }
    }
}

/// State of one export run
#[derive(Debug)]
pub struct ExportContext<'a> {
    pub model: &'a Model,
    pub config: &'a ExportConfig,
    pub package: &'a Package,
    pub mode: ExportMode,
    pub diagnostics: NotAvailableTracker,
    pub errors: ErrorLog,
    generated_enums: IndexSet<ElementId>,
}

impl<'a> ExportContext<'a> {
    /// Resolve `target` against `model` and start a fresh run
    pub fn new(model: &'a Model, config: &'a ExportConfig, target: &ExportTarget) -> Result<Self> {
        let package = model
            .find_package(&target.package)
            .ok_or_else(|| ExportError::unknown_element(target.package.as_str()))?;

        let mode = match &target.mode {
            ExportMode::Package => ExportMode::Package,
            ExportMode::Diagram(diagram) => {
                let id = model
                    .find_diagram(diagram.as_str())
                    .ok_or_else(|| ExportError::unknown_element(diagram.as_str()))?;
                ExportMode::Diagram(id.clone())
            }
        };

        debug!(package = %package.name, mode = ?mode, "Created export context");

        Ok(Self {
            model,
            config,
            package,
            mode,
            diagnostics: NotAvailableTracker::new(),
            errors: ErrorLog::new(),
            generated_enums: IndexSet::new(),
        })
    }

    /// Mirror error messages to a file for the rest of this run
    pub fn with_error_log(mut self, errors: ErrorLog) -> Self {
        self.errors = errors;
        self
    }

    pub fn type_mapper(&self) -> TypeMapper<'a> {
        TypeMapper::new(self.config)
    }

    /// Name of the export target, used as document title
    pub fn target_name(&self) -> &'a str {
        &self.package.name
    }

    /// Remember that an enumeration was emitted as an RDFS class
    ///
    /// Returns `false` if it was already registered in this run.
    pub fn register_generated_enum(&mut self, id: &ElementId) -> bool {
        self.generated_enums.insert(id.clone())
    }

    pub fn is_generated_enum(&self, id: &ElementId) -> bool {
        self.generated_enums.contains(id)
    }

    pub fn generated_enums(&self) -> impl Iterator<Item = &ElementId> {
        self.generated_enums.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Diagram;

    fn model() -> Model {
        let mut model = Model::new();
        model
            .add_element(None, Package::new("p1", "Orders"))
            .unwrap();
        model.add_element(None, Diagram::new("d1", "Main")).unwrap();
        model
    }

    #[test]
    fn test_context_resolves_package_by_name() {
        let model = model();
        let config = ExportConfig::default();
        let ctx = ExportContext::new(&model, &config, &ExportTarget::package("Orders")).unwrap();
        assert_eq!(ctx.target_name(), "Orders");
        assert_eq!(ctx.mode, ExportMode::Package);
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_context_resolves_diagram_by_name() {
        let model = model();
        let config = ExportConfig::default();
        let ctx =
            ExportContext::new(&model, &config, &ExportTarget::diagram("p1", "Main")).unwrap();
        assert_eq!(ctx.mode, ExportMode::Diagram(ElementId::from("d1")));
    }

    #[test]
    fn test_unknown_package() {
        let model = model();
        let config = ExportConfig::default();
        let err = ExportContext::new(&model, &config, &ExportTarget::package("Billing"))
            .unwrap_err();
        assert!(err.to_string().contains("Billing"));
    }

    #[test]
    fn test_unknown_diagram() {
        let model = model();
        let config = ExportConfig::default();
        let result = ExportContext::new(&model, &config, &ExportTarget::diagram("p1", "Other"));
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_enum_registry() {
        let model = model();
        let config = ExportConfig::default();
        let mut ctx =
            ExportContext::new(&model, &config, &ExportTarget::package("Orders")).unwrap();

        let id = ElementId::from("e1");
        assert!(ctx.register_generated_enum(&id));
        assert!(!ctx.register_generated_enum(&id));
        assert!(ctx.is_generated_enum(&id));
        assert_eq!(ctx.generated_enums().count(), 1);
    }

    #[test]
    fn test_contexts_do_not_share_state() {
        let model = model();
        let config = ExportConfig::default();
        let target = ExportTarget::package("Orders");

        let mut first = ExportContext::new(&model, &config, &target).unwrap();
        first.register_generated_enum(&"e1".into());
        first
            .diagnostics
            .record_invalid_type("Order", &"a1".into(), "x", "Y");

        let second = ExportContext::new(&model, &config, &target).unwrap();
        assert!(!second.is_generated_enum(&"e1".into()));
        assert!(second.diagnostics.is_empty());
    }
}
