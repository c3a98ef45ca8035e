//! Repository query parsing
//!
//! Queries select elements by kind, optionally scoped to a package path:
//!
//! ```text
//! @UMLAssociation              every association in the model
//! Orders::@UMLClass            every class owned (transitively) by package Orders
//! Model::Orders::@UMLEnumeration
//! ```

use chumsky::prelude::*;
use chumsky::text::ident;

use super::{ElementKind, ExportError};

/// A parsed repository query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Package path the query is scoped to; empty for the whole model
    pub scope: Vec<String>,
    pub kind: ElementKind,
}

impl Query {
    /// Parse query text such as `Orders::@UMLClass`
    pub fn parse(input: &str) -> Result<Self, ExportError> {
        let (scope, kind_name) = query_parser()
            .parse(input)
            .into_result()
            .map_err(|errors| ExportError::invalid_query(input, format!("{:?}", errors)))?;

        let kind = ElementKind::from_type_name(&kind_name).ok_or_else(|| {
            ExportError::invalid_query(input, format!("unknown element kind '{}'", kind_name))
        })?;

        Ok(Self { scope, kind })
    }

    pub fn is_scoped(&self) -> bool {
        !self.scope.is_empty()
    }
}

/// Parse optional inline whitespace.
fn optional_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().ignored()
}

fn query_parser<'src>() -> impl Parser<'src, &'src str, (Vec<String>, String)> {
    // Package names may contain spaces; `:` and `@` delimit the grammar
    let segment = none_of(":@")
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.trim().to_string());

    let scope = segment
        .then_ignore(just("::"))
        .repeated()
        .collect::<Vec<String>>();

    let kind = just('@').ignore_then(ident().map(|s: &str| s.to_string()));

    optional_whitespace()
        .ignore_then(scope)
        .then(kind)
        .then_ignore(optional_whitespace())
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscoped_query() {
        let query = Query::parse("@UMLAssociation").unwrap();
        assert!(!query.is_scoped());
        assert_eq!(query.kind, ElementKind::Association);
    }

    #[test]
    fn test_scoped_query() {
        let query = Query::parse("Orders::@UMLClass").unwrap();
        assert_eq!(query.scope, vec!["Orders".to_string()]);
        assert_eq!(query.kind, ElementKind::Class);
    }

    #[test]
    fn test_nested_scope_query() {
        let query = Query::parse("Model::Order Management::@UMLEnumeration").unwrap();
        assert_eq!(
            query.scope,
            vec!["Model".to_string(), "Order Management".to_string()]
        );
        assert_eq!(query.kind, ElementKind::Enumeration);
    }

    #[test]
    fn test_surrounding_whitespace() {
        let query = Query::parse("  @UMLGeneralization ").unwrap();
        assert_eq!(query.kind, ElementKind::Generalization);
    }

    #[test]
    fn test_missing_at_sign() {
        let err = Query::parse("Orders::UMLClass").unwrap_err();
        assert!(matches!(err, ExportError::InvalidQuery { .. }));
    }

    #[test]
    fn test_unknown_kind() {
        let err = Query::parse("@UMLActor").unwrap_err();
        assert!(err.to_string().contains("unknown element kind 'UMLActor'"));
    }

    #[test]
    fn test_empty_query() {
        assert!(Query::parse("").is_err());
    }
}
