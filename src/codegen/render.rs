//! model serialization
//!
//! turns the operation models into one rust source unit: a fixed
//! transport capability declaration followed by a module per named
//! operation. nested classes always print before the class that
//! references them.

use crate::codegen::model::{ClassModel, OperationModel};
use std::collections::BTreeSet;

/// fixed preamble: the capability every generated wrapper executes
/// against, plus a forwarding impl for borrowed transports and a
/// binding for the runtime client
const UNIT_HEADER: &str = r#"//! generated appsync operation bindings
//!
//! emitted by `appsync-codegen`; regenerate instead of editing.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// network capability the generated wrappers execute against
pub trait GraphQlTransport {
    /// transport-level error surfaced by `send`
    type Error;

    /// post one operation's source text and variables, decode the data payload
    async fn send<V, R>(&self, source: &str, variables: &V) -> Result<R, Self::Error>
    where
        V: Serialize + Sync,
        R: DeserializeOwned;
}

impl<T: GraphQlTransport> GraphQlTransport for &T {
    type Error = T::Error;

    async fn send<V, R>(&self, source: &str, variables: &V) -> Result<R, Self::Error>
    where
        V: Serialize + Sync,
        R: DeserializeOwned,
    {
        (**self).send(source, variables).await
    }
}

impl GraphQlTransport for appsync::Client {
    type Error = appsync::Error;

    async fn send<V, R>(&self, source: &str, variables: &V) -> Result<R, Self::Error>
    where
        V: Serialize + Sync,
        R: DeserializeOwned,
    {
        let variables = serde_json::to_value(variables)?;
        let response = self.execute::<R>(source, Some(variables)).await?;
        response
            .data
            .ok_or_else(|| appsync::Error::Config("graphql response contained no data".to_string()))
    }
}
"#;

/// render the whole output unit
pub fn render_unit(operations: &[OperationModel]) -> String {
    let mut out = String::new();
    out.push_str(UNIT_HEADER);
    out.push('\n');

    let mut seen_modules = BTreeSet::new();
    for operation in operations {
        if !seen_modules.insert(operation.module_name.clone()) {
            out.push_str(&format!(
                "// skipped duplicate operation `{}` from {}\n\n",
                operation.name, operation.source_path
            ));
            continue;
        }
        render_operation(&mut out, operation);
    }
    out
}

fn render_operation(out: &mut String, operation: &OperationModel) {
    out.push_str(&format!("/// generated from {}\n", operation.source_path));
    out.push_str(&format!("pub mod {} {{\n", operation.module_name));
    out.push_str("    use serde::{Deserialize, Serialize};\n\n");
    out.push_str("    use super::GraphQlTransport;\n\n");

    render_class(out, &operation.response, 1);
    for class in &operation.input_classes {
        render_class(out, class, 1);
    }
    render_class(out, &operation.request, 1);

    out.push_str(&format!(
        "    pub const OPERATION_KIND: &str = \"{}\";\n",
        operation.kind.keyword()
    ));
    out.push_str(&format!(
        "    pub const OPERATION_SOURCE: &str = {};\n\n",
        raw_string_literal(&operation.source)
    ));

    let wrapper = &operation.wrapper_name;
    out.push_str(&format!("    pub struct {}<C> {{\n", wrapper));
    out.push_str("        client: C,\n");
    out.push_str("    }\n\n");
    out.push_str(&format!("    impl<C: GraphQlTransport> {}<C> {{\n", wrapper));
    out.push_str("        pub fn new(client: C) -> Self {\n");
    out.push_str("            Self { client }\n");
    out.push_str("        }\n\n");
    out.push_str(
        "        pub async fn execute(&self, request: Request) -> Result<Response, C::Error> {\n",
    );
    out.push_str("            self.client.send(OPERATION_SOURCE, &request).await\n");
    out.push_str("        }\n");
    out.push_str("    }\n\n");
    out.push_str(&format!(
        "    pub async fn {}<C: GraphQlTransport>(client: C, request: Request) -> Result<Response, C::Error> {{\n",
        operation.module_name
    ));
    out.push_str(&format!(
        "        {}::new(client).execute(request).await\n",
        wrapper
    ));
    out.push_str("    }\n");
    out.push_str("}\n\n");
}

/// nested classes first, so every type is defined before it is used
fn render_class(out: &mut String, class: &ClassModel, depth: usize) {
    for nested in &class.nested {
        render_class(out, nested, depth);
    }

    let pad = "    ".repeat(depth);
    out.push_str(&format!(
        "{pad}#[derive(Debug, Clone, Serialize, Deserialize)]\n"
    ));
    out.push_str(&format!("{pad}pub struct {} {{\n", class.name));
    for diagnostic in &class.diagnostics {
        out.push_str(&format!("{pad}    // {diagnostic}\n"));
    }
    for property in &class.properties {
        if let Some(diagnostic) = &property.diagnostic {
            out.push_str(&format!("{pad}    // {diagnostic}\n"));
        }
        if property.name != property.wire_name {
            out.push_str(&format!(
                "{pad}    #[serde(rename = \"{}\")]\n",
                property.wire_name
            ));
        }
        out.push_str(&format!(
            "{pad}    pub {}: {},\n",
            property.name, property.type_name
        ));
    }
    out.push_str(&format!("{pad}}}\n\n"));
}

/// wrap text in a raw string literal with enough hashes that no
/// embedded quote can terminate it early
fn raw_string_literal(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for ch in text.chars() {
        if ch == '#' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{text}\"{hashes}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::model::Property;
    use crate::codegen::OperationKind;

    fn sample_operation() -> OperationModel {
        let mut response = ClassModel::new("Response".to_string());
        let mut user = ClassModel::new("User".to_string());
        user.properties.push(Property {
            name: "id".to_string(),
            wire_name: "id".to_string(),
            type_name: "String".to_string(),
            diagnostic: None,
        });
        user.properties.push(Property {
            name: "r#type".to_string(),
            wire_name: "type".to_string(),
            type_name: "Option<String>".to_string(),
            diagnostic: None,
        });
        response.properties.push(Property {
            name: "user".to_string(),
            wire_name: "user".to_string(),
            type_name: "User".to_string(),
            diagnostic: None,
        });
        response.nested.push(user);

        let mut request = ClassModel::new("Request".to_string());
        request.properties.push(Property {
            name: "id".to_string(),
            wire_name: "id".to_string(),
            type_name: "String".to_string(),
            diagnostic: None,
        });

        OperationModel {
            kind: OperationKind::Query,
            name: "GetUser".to_string(),
            wrapper_name: "QueryGetUser".to_string(),
            module_name: "query_get_user".to_string(),
            source: "query GetUser($id: ID!) { user(id: $id) { id type } }".to_string(),
            source_path: "ops/get_user.graphql".to_string(),
            response,
            request,
            input_classes: Vec::new(),
        }
    }

    #[test]
    fn test_unit_header_declares_transport_once() {
        let unit = render_unit(&[sample_operation()]);
        assert_eq!(unit.matches("pub trait GraphQlTransport").count(), 1);
        assert!(unit.contains("impl GraphQlTransport for appsync::Client"));
    }

    #[test]
    fn test_nested_class_precedes_parent() {
        let unit = render_unit(&[sample_operation()]);
        let user_at = unit.find("pub struct User").unwrap();
        let response_at = unit.find("pub struct Response").unwrap();
        assert!(user_at < response_at);
    }

    #[test]
    fn test_escaped_property_keeps_wire_name() {
        let unit = render_unit(&[sample_operation()]);
        assert!(unit.contains("#[serde(rename = \"type\")]"));
        assert!(unit.contains("pub r#type: Option<String>,"));
        assert_eq!(unit.matches("#[serde(rename").count(), 1);
    }

    #[test]
    fn test_wrapper_block_shape() {
        let unit = render_unit(&[sample_operation()]);
        assert!(unit.contains("pub mod query_get_user {"));
        assert!(unit.contains("pub const OPERATION_KIND: &str = \"query\";"));
        assert!(unit.contains("pub struct QueryGetUser<C> {"));
        assert!(unit.contains("pub fn new(client: C) -> Self {"));
        assert!(unit
            .contains("pub async fn execute(&self, request: Request) -> Result<Response, C::Error>"));
        assert!(unit.contains(
            "pub async fn query_get_user<C: GraphQlTransport>(client: C, request: Request)"
        ));
    }

    #[test]
    fn test_source_embedded_verbatim() {
        let operation = sample_operation();
        let unit = render_unit(&[operation.clone()]);
        assert!(unit.contains(&format!(
            "pub const OPERATION_SOURCE: &str = r#\"{}\"#;",
            operation.source
        )));
    }

    #[test]
    fn test_duplicate_operation_module_is_skipped() {
        let unit = render_unit(&[sample_operation(), sample_operation()]);
        assert_eq!(unit.matches("pub mod query_get_user {").count(), 1);
        assert!(unit.contains("skipped duplicate operation `GetUser`"));
    }

    #[test]
    fn test_raw_string_literal_escapes_hash_runs() {
        assert_eq!(raw_string_literal("plain"), "r#\"plain\"#");
        assert_eq!(raw_string_literal("a \"#,\" b"), "r##\"a \"#,\" b\"##");
    }

    #[test]
    fn test_class_diagnostics_render_as_comments() {
        let mut class = ClassModel::new("Response".to_string());
        class.diagnostics.push("fragment `F` is not defined in this document".to_string());
        class.properties.push(Property {
            name: "broken".to_string(),
            wire_name: "broken".to_string(),
            type_name: "serde_json::Value".to_string(),
            diagnostic: Some("field `broken` not found on type `Query`".to_string()),
        });
        let mut out = String::new();
        render_class(&mut out, &class, 0);
        assert!(out.contains("// fragment `F` is not defined in this document"));
        assert!(out.contains("// field `broken` not found on type `Query`"));
        assert!(out.contains("pub broken: serde_json::Value,"));
    }
}
