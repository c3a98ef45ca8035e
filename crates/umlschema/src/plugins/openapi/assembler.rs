//! OpenAPI assembly
//!
//! Classes of the export set become `components.schemas`, interfaces become
//! paths. Unresolved attribute types fall back to `string` and are recorded
//! in the context's diagnostics.

use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, error, span, trace, warn, Level};

use super::document::{
    Components, MediaType, OpenApiDocument, Operation, Parameter, PathItem, RequestBody,
    Response, Schema, Server,
};
use super::info::build_info;
use crate::core::{
    is_member_visible, select_model_elements, visible_literals, Attribute, Class,
    ClassGraphBuilder, Element, ExportConfig, ExportContext, ExportError, ExportSet, Interface,
    InterfaceRealization, Model, Operation as UmlOperation, Repository, TypeRef,
};

/// Operation name prefixes recognised as HTTP methods
pub const HTTP_METHODS: &[&str] = &["get", "post", "put", "patch", "delete"];

/// Parameter names never emitted as query parameters
pub const EXCLUDED_PARAMETERS: &[&str] = &["id", "identifier"];

const JSON_CONTENT: &str = "application/json";
const MISSING_DESCRIPTION: &str = "missing description";

/// Build the OpenAPI document for the context's export target
pub fn build_document(ctx: &mut ExportContext<'_>) -> Result<OpenApiDocument> {
    let model = ctx.model;
    let package = ctx.package;

    let selected = select_model_elements(model, &package.id);
    if selected.is_empty() {
        warn!(package = %package.name, "Export target owns no classes, interfaces or enumerations");
    }

    let info = build_info(ctx.target_name(), package.documentation.as_deref(), ctx.config);
    let export_set = ClassGraphBuilder::new(model).expand_classes(&selected.classes);
    let schemas = build_schemas(ctx, &export_set)?;
    let paths = build_paths(ctx, &selected.interfaces)?;

    debug!(
        schemas = schemas.len(),
        paths = paths.len(),
        diagnostics = ctx.diagnostics.len(),
        "Assembled OpenAPI document"
    );

    Ok(OpenApiDocument {
        openapi: ctx.config.openapi_version.clone(),
        info,
        servers: ctx
            .config
            .servers
            .iter()
            .map(|url| Server { url: url.clone() })
            .collect(),
        paths,
        components: Components { schemas },
    })
}

/// One object schema per exported class
pub fn build_schemas<'a>(
    ctx: &mut ExportContext<'a>,
    classes: &ExportSet<'a>,
) -> Result<IndexMap<String, Schema>> {
    let schema_span = span!(Level::DEBUG, "build_schemas", classes = classes.len());
    let _enter = schema_span.enter();

    let model = ctx.model;
    let graph = ClassGraphBuilder::new(model);
    let mut schemas = IndexMap::new();

    for class in classes.iter() {
        let mut schema = Schema::object();
        if let Some(doc) = &class.documentation {
            schema = schema.with_description(build_description(doc));
        }

        for attr in &class.attributes {
            if !is_member_visible(model, &attr.id, &ctx.mode) {
                trace!(class = %class.name, attribute = %attr.name, "Attribute hidden on diagram");
                continue;
            }
            let property = attribute_schema(ctx, class, attr);
            schema.properties.insert(attr.name.clone(), property);
        }

        for assoc in graph.associations_of(class)? {
            if assoc.name.is_empty() {
                continue;
            }
            match graph.association_target(assoc) {
                Some(target) => {
                    let property = Schema::reference(schema_ref(ctx.config, target));
                    schema.properties.insert(assoc.name.clone(), property);
                }
                None => warn!(
                    class = %class.name,
                    association = %assoc.name,
                    target = %assoc.end2,
                    "Association target not found"
                ),
            }
        }

        trace!(class = %class.name, properties = schema.properties.len(), "Built schema");
        schemas.insert(class.name.clone(), schema);
    }

    Ok(schemas)
}

/// Property schema for one attribute
///
/// Primitive names go through the type mapper, class references become
/// `$ref`s and enumerations become string enums of their visible literals.
pub fn attribute_schema(ctx: &mut ExportContext<'_>, class: &Class, attr: &Attribute) -> Schema {
    let model = ctx.model;

    let item = match &attr.type_ref {
        TypeRef::Name(name) => {
            let mapped = ctx.type_mapper().openapi(name);
            if let Some(kind) = mapped.unresolved {
                warn!(class = %class.name, attribute = %attr.name, type_name = %name, %kind, "Unresolved attribute type");
                ctx.diagnostics
                    .record(kind, &class.name, &attr.id, &attr.name, name);
            }
            Schema::primitive(mapped.value)
        }
        TypeRef::Element(id) => match model.get(id) {
            Some(Element::Enumeration(enumeration)) => Schema::string_enum(
                visible_literals(model, enumeration, &ctx.mode)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            Some(target) => Schema::reference(schema_ref(ctx.config, target.name())),
            None => {
                warn!(class = %class.name, attribute = %attr.name, reference = %id, "Attribute type not in model");
                ctx.diagnostics
                    .record_invalid_type(&class.name, &attr.id, &attr.name, id.as_str());
                Schema::string()
            }
        },
    };

    let schema = if attr.is_many() {
        Schema::array(item)
    } else {
        item
    };

    match &attr.documentation {
        Some(doc) => schema.with_description(build_description(doc)),
        None => schema,
    }
}

/// One path per interface, one operation per HTTP-named UML operation
pub fn build_paths<'a>(
    ctx: &mut ExportContext<'a>,
    interfaces: &[&'a Interface],
) -> Result<IndexMap<String, PathItem>> {
    let path_span = span!(Level::DEBUG, "build_paths", interfaces = interfaces.len());
    let _enter = path_span.enter();

    let model = ctx.model;
    let realizations: Vec<&InterfaceRealization> = model
        .select("@UMLInterfaceRealization")?
        .into_iter()
        .filter_map(|element| match element {
            Element::InterfaceRealization(realization) => Some(realization),
            _ => None,
        })
        .collect();

    let mut paths = IndexMap::new();
    for &interface in interfaces {
        let realization = realizations
            .iter()
            .copied()
            .find(|r| r.target == interface.id);

        let mut item = PathItem::new();
        for op in &interface.operations {
            if !is_member_visible(model, &op.id, &ctx.mode) {
                trace!(interface = %interface.name, operation = %op.name, "Operation hidden on diagram");
                continue;
            }
            let Some(method) = http_method(&op.name) else {
                warn!(
                    interface = %interface.name,
                    operation = %op.name,
                    "Operation name does not start with an HTTP method, skipped"
                );
                continue;
            };
            if item.contains_key(method) {
                warn!(
                    interface = %interface.name,
                    operation = %op.name,
                    method,
                    "Path already has this method, skipped"
                );
                continue;
            }

            let operation = build_operation(ctx, interface, op, method, realization);
            item.insert(method.to_string(), operation);
        }

        trace!(interface = %interface.name, operations = item.len(), "Built path");
        paths.insert(format!("/{}", interface.name), item);
    }

    Ok(paths)
}

fn build_operation(
    ctx: &mut ExportContext<'_>,
    interface: &Interface,
    op: &UmlOperation,
    method: &str,
    realization: Option<&InterfaceRealization>,
) -> Operation {
    let mut parameters = Vec::new();
    let mut request_body = None;

    match method {
        "get" | "delete" => {
            if let Err(e) = write_query_parameters(ctx.model, op, &mut parameters) {
                error!(
                    interface = %interface.name,
                    operation = %op.name,
                    error = %e,
                    "Found error while writing query parameters"
                );
                ctx.errors
                    .record(format!("{}.{}: {}", interface.name, op.name, e));
            }
        }
        _ => {
            request_body = realization
                .and_then(|r| build_request_body(ctx.model, ctx.config, r));
        }
    }

    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: "OK".to_string(),
        },
    );

    Operation {
        tags: vec![interface.name.clone()],
        description: describe(op.documentation.as_deref()),
        parameters,
        request_body,
        responses,
    }
}

/// Append a query parameter for every parameter of `operation`
///
/// Parameters named `id` or `identifier` are skipped. A parameter typed as a
/// class is emitted as `ClassName.paramName`. Parameters pushed before a
/// failure stay in `parameters`.
pub fn write_query_parameters<R: Repository + ?Sized>(
    repository: &R,
    operation: &UmlOperation,
    parameters: &mut Vec<Parameter>,
) -> Result<()> {
    for param in &operation.parameters {
        if EXCLUDED_PARAMETERS.contains(&param.name.as_str()) {
            trace!(operation = %operation.name, parameter = %param.name, "Excluded parameter");
            continue;
        }

        let name = match &param.type_ref {
            TypeRef::Name(_) => param.name.clone(),
            TypeRef::Element(id) => match repository.get(id) {
                Some(Element::Class(class)) => format!("{}.{}", class.name, param.name),
                Some(_) => param.name.clone(),
                None => return Err(ExportError::unknown_element(id.as_str()).into()),
            },
        };

        parameters.push(Parameter {
            name,
            location: "query".to_string(),
            description: describe(param.documentation.as_deref()),
            required: false,
            schema: Schema::string(),
        });
    }
    Ok(())
}

/// JSON request body referencing the realizing class
pub fn build_request_body(
    model: &Model,
    config: &ExportConfig,
    realization: &InterfaceRealization,
) -> Option<RequestBody> {
    let Some(source) = model.get(&realization.source) else {
        warn!(realization = %realization.id, source = %realization.source, "Realization source not found");
        return None;
    };

    let mut content = IndexMap::new();
    content.insert(
        JSON_CONTENT.to_string(),
        MediaType {
            schema: Schema::reference(schema_ref(config, source.name())),
        },
    );

    Some(RequestBody {
        content,
        description: String::new(),
        required: true,
    })
}

/// HTTP method named by the start of an operation name, case-insensitively
pub fn http_method(operation_name: &str) -> Option<&'static str> {
    let lower = operation_name.to_ascii_lowercase();
    HTTP_METHODS
        .iter()
        .copied()
        .find(|method| lower.starts_with(method))
}

/// Documentation text with single quotes doubled
pub fn build_description(documentation: &str) -> String {
    documentation.replace('\'', "''")
}

fn describe(documentation: Option<&str>) -> String {
    documentation
        .map(build_description)
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string())
}

fn schema_ref(config: &ExportConfig, name: &str) -> String {
    format!("{}{}", config.reference_prefix, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Association, Diagram, Enumeration, EnumerationLiteral, ExportMode, ExportTarget, Package,
        Parameter as UmlParameter, View,
    };
    use serde_json::json;

    fn model() -> Model {
        let mut model = Model::new();
        let root = model.add_element(None, Package::new("m", "Model")).unwrap();
        let pkg = model
            .add_element(
                Some(&root),
                Package::new("p1", "Orders").with_documentation("v1.2:some text\nExtra line"),
            )
            .unwrap();
        model
            .add_element(
                Some(&pkg),
                Class::new("c1", "Order")
                    .with_attribute(Attribute::new("a1", "status", TypeRef::name("Indicator")))
                    .with_attribute(Attribute::new("a2", "total", TypeRef::name("Double")))
                    .with_attribute(Attribute::new("a3", "owner", TypeRef::element("c2")))
                    .with_attribute(
                        Attribute::new("a4", "codes", TypeRef::name("Code"))
                            .with_multiplicity("0..*")
                            .with_documentation("Customer's codes"),
                    )
                    .with_attribute(Attribute::new("a5", "state", TypeRef::element("e1")))
                    .with_attribute(Attribute::new("a6", "weird", TypeRef::name("Custmer"))),
            )
            .unwrap();
        model
            .add_element(
                Some(&pkg),
                Interface::new("i1", "OrderApi")
                    .with_operation(
                        UmlOperation::new("o1", "getOrders")
                            .with_parameter(UmlParameter::new("x1", "id", TypeRef::name("Text")))
                            .with_parameter(UmlParameter::new("x2", "status", TypeRef::name("Text")))
                            .with_parameter(UmlParameter::new(
                                "x3",
                                "identifier",
                                TypeRef::name("Text"),
                            ))
                            .with_parameter(
                                UmlParameter::new("x4", "name", TypeRef::name("Text"))
                                    .with_documentation("Owner's name"),
                            ),
                    )
                    .with_operation(UmlOperation::new("o2", "PostOrder").with_documentation("Create"))
                    .with_operation(UmlOperation::new("o3", "listAll"))
                    .with_operation(
                        UmlOperation::new("o4", "deleteOrder")
                            .with_parameter(UmlParameter::new("x5", "by", TypeRef::element("c2")))
                            .with_parameter(UmlParameter::new("x6", "ghost", TypeRef::element("zz")))
                            .with_parameter(UmlParameter::new("x7", "after", TypeRef::name("Text"))),
                    ),
            )
            .unwrap();
        model
            .add_element(
                Some(&pkg),
                Enumeration::new("e1", "State")
                    .with_literal(EnumerationLiteral::new("l1", "Open"))
                    .with_literal(EnumerationLiteral::new("l2", "Closed")),
            )
            .unwrap();
        model.add_element(Some(&pkg), Class::new("c3", "OrderService")).unwrap();
        model
            .add_element(Some(&root), Class::new("c2", "Customer"))
            .unwrap();
        model
            .add_element(Some(&pkg), InterfaceRealization::new("r1", "c3", "i1"))
            .unwrap();
        model
            .add_element(Some(&pkg), Association::new("as1", "placedBy", "c1", "c2"))
            .unwrap();
        model
            .add_element(Some(&pkg), Association::new("as2", "", "c1", "c2"))
            .unwrap();
        model.add_element(Some(&pkg), Diagram::new("d1", "Main")).unwrap();
        model.add_view(View::new("d1", "a1", true));
        model.add_view(View::new("d1", "a2", false));
        model.add_view(View::new("d1", "o1", true));
        model.add_view(View::new("d1", "l2", true));
        model
    }

    fn document(model: &Model, target: ExportTarget) -> (serde_json::Value, usize, usize) {
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(model, &config, &target).unwrap();
        let doc = build_document(&mut ctx).unwrap();
        (
            serde_json::to_value(&doc).unwrap(),
            ctx.diagnostics.not_linked_types().len(),
            ctx.diagnostics.invalid_types().len(),
        )
    }

    #[test]
    fn test_schemas_include_referenced_classes() {
        let model = model();
        let (doc, _, _) = document(&model, ExportTarget::package("Orders"));
        let schemas = doc["components"]["schemas"].as_object().unwrap();
        let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Order", "OrderService", "Customer"]);
    }

    #[test]
    fn test_attribute_schemas() {
        let model = model();
        let (doc, _, _) = document(&model, ExportTarget::package("Orders"));
        let props = &doc["components"]["schemas"]["Order"]["properties"];

        assert_eq!(props["status"], json!({"type": "boolean"}));
        assert_eq!(props["total"], json!({"type": "number", "format": "double"}));
        assert_eq!(props["owner"], json!({"$ref": "#/components/schemas/Customer"}));
        assert_eq!(
            props["codes"],
            json!({"type": "array", "items": {"type": "string"}, "description": "Customer''s codes"})
        );
        assert_eq!(props["state"], json!({"type": "string", "enum": ["Open", "Closed"]}));
        assert_eq!(props["placedBy"], json!({"$ref": "#/components/schemas/Customer"}));
    }

    #[test]
    fn test_diagnostic_buckets() {
        let model = model();
        let (_, not_linked, invalid) = document(&model, ExportTarget::package("Orders"));
        // Code is a core type, Custmer is not
        assert_eq!(not_linked, 1);
        assert_eq!(invalid, 1);
    }

    #[test]
    fn test_info_from_package_documentation() {
        let model = model();
        let (doc, _, _) = document(&model, ExportTarget::package("Orders"));
        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(doc["info"]["title"], "Orders");
        assert_eq!(doc["info"]["version"], "1.2");
        assert!(doc["info"]["description"]
            .as_str()
            .unwrap()
            .starts_with("Extra line<br><br>"));
        assert!(doc.get("servers").is_none());
    }

    #[test]
    fn test_paths_and_methods() {
        let model = model();
        let (doc, _, _) = document(&model, ExportTarget::package("Orders"));
        let path = doc["paths"]["/OrderApi"].as_object().unwrap();
        let methods: Vec<&str> = path.keys().map(String::as_str).collect();
        assert_eq!(methods, vec!["get", "post", "delete"]);

        let get = &path["get"];
        assert_eq!(get["tags"], json!(["OrderApi"]));
        assert_eq!(get["description"], "missing description");
        let names: Vec<&str> = get["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["status", "name"]);
        assert_eq!(get["parameters"][1]["description"], "Owner''s name");
        assert_eq!(get["responses"]["200"]["description"], "OK");
    }

    #[test]
    fn test_request_body_references_realizing_class() {
        let model = model();
        let (doc, _, _) = document(&model, ExportTarget::package("Orders"));
        let post = &doc["paths"]["/OrderApi"]["post"];
        assert_eq!(post["description"], "Create");
        assert_eq!(
            post["requestBody"],
            json!({
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/OrderService"}}},
                "description": "",
                "required": true
            })
        );
        assert!(post.get("parameters").is_none());
    }

    #[test]
    fn test_failed_parameter_is_logged_and_export_continues() {
        let model = model();
        let config = ExportConfig::default();
        let mut ctx =
            ExportContext::new(&model, &config, &ExportTarget::package("Orders")).unwrap();
        let doc = build_document(&mut ctx).unwrap();

        let delete = &doc.paths["/OrderApi"]["delete"];
        let names: Vec<&str> = delete.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Customer.by"]);
        assert_eq!(ctx.errors.messages().len(), 1);
        assert!(ctx.errors.messages()[0].contains("deleteOrder"));
    }

    #[test]
    fn test_diagram_mode_filters_members() {
        let model = model();
        let (doc, _, _) = document(&model, ExportTarget::diagram("Orders", "Main"));

        let props = doc["components"]["schemas"]["Order"]["properties"]
            .as_object()
            .unwrap();
        assert!(props.contains_key("status"));
        assert!(!props.contains_key("total"));
        assert!(!props.contains_key("owner"));

        let methods: Vec<&str> = doc["paths"]["/OrderApi"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(methods, vec!["get"]);
    }

    #[test]
    fn test_write_query_parameters_filters_exact_names() {
        let op = UmlOperation::new("o", "getX")
            .with_parameter(UmlParameter::new("1", "id", TypeRef::name("Text")))
            .with_parameter(UmlParameter::new("2", "Id", TypeRef::name("Text")))
            .with_parameter(UmlParameter::new("3", "identifiers", TypeRef::name("Text")));
        let mut params = Vec::new();
        write_query_parameters(&Model::new(), &op, &mut params).unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "identifiers"]);
    }

    #[test]
    fn test_http_method() {
        assert_eq!(http_method("getOrders"), Some("get"));
        assert_eq!(http_method("PATCHOrder"), Some("patch"));
        assert_eq!(http_method("Delete"), Some("delete"));
        assert_eq!(http_method("listAll"), None);
    }

    #[test]
    fn test_target_by_package_id() {
        let model = model();
        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&model, &config, &ExportTarget::package("p1")).unwrap();
        assert_eq!(ctx.mode, ExportMode::Package);
        let doc = build_document(&mut ctx).unwrap();
        assert_eq!(doc.info.title, "Orders");
    }
}
