//! operation codegen engine
//!
//! translates a parsed graphql schema plus a set of parsed operation
//! documents into rust source text: one struct per object shape implied
//! by each operation's selection set, a `Request` struct per operation's
//! variables, and a wrapper binding both to the [`GraphQlTransport`]
//! capability emitted at the head of the output.
//!
//! the engine is synchronous and stateless: one invocation rebuilds the
//! schema index, walks every document, and returns the combined text.
//! malformed selections degrade to inline diagnostics in the generated
//! source; only an unrecognized operation-kind keyword is fatal.

mod index;
mod inputs;
mod lower;
mod model;
mod render;
mod resolve;

use crate::error::{Error, Result};
use graphql_parser::{query, schema};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

pub use index::{SchemaIndex, TypeRef};

/// the three graphql operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// the graphql keyword for this kind
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    /// parse an operation-kind keyword
    ///
    /// anything but the three keywords is a hard configuration error;
    /// this is the one condition that aborts a generation run.
    pub fn from_keyword(keyword: &str) -> Result<Self> {
        match keyword {
            "query" => Ok(OperationKind::Query),
            "mutation" => Ok(OperationKind::Mutation),
            "subscription" => Ok(OperationKind::Subscription),
            other => Err(Error::OperationKind(other.to_string())),
        }
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OperationKind::from_keyword(s)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// one operation document handed to the engine
///
/// `source` is kept alongside the parsed tree because the emitted
/// `OPERATION_SOURCE` constant must be byte-identical to the document
/// text; it is transmitted as the wire payload.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInput<'a> {
    pub path: &'a Path,
    pub source: &'a str,
    pub document: &'a query::Document<'a, String>,
}

/// configuration for one generation run
///
/// defaults cover the rust keyword set and the appsync scalar mappings;
/// override-table keys are printed graphql signatures, `"Name"` for the
/// nullable form and `"Name!"` for the required form.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// identifiers that must be escaped when emitted
    pub reserved_words: BTreeSet<String>,
    /// printed type signature to target type name
    pub type_overrides: BTreeMap<String, String>,
    /// marker prepended to reserved identifiers
    pub escape_prefix: String,
    /// list container template; `{}` is replaced by the element type
    pub list_container: String,
    /// restrict generation to one operation kind
    pub only: Option<OperationKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let reserved_words = RESERVED_WORDS
            .iter()
            .map(|word| word.to_string())
            .collect();
        let type_overrides = DEFAULT_TYPE_OVERRIDES
            .iter()
            .map(|(signature, target)| (signature.to_string(), target.to_string()))
            .collect();
        GeneratorConfig {
            reserved_words,
            type_overrides,
            escape_prefix: "r#".to_string(),
            list_container: "Vec<{}>".to_string(),
            only: None,
        }
    }
}

impl GeneratorConfig {
    /// add a reserved word to the escape set
    pub fn with_reserved_word(mut self, word: impl Into<String>) -> Self {
        self.reserved_words.insert(word.into());
        self
    }

    /// map a printed type signature to a target type name
    pub fn with_type_override(
        mut self,
        signature: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.type_overrides.insert(signature.into(), target.into());
        self
    }

    /// restrict generation to one operation kind
    pub fn with_only(mut self, kind: OperationKind) -> Self {
        self.only = Some(kind);
        self
    }

    /// escape an identifier derived from a schema or document name
    pub(crate) fn escape(&self, name: &str) -> String {
        if self.reserved_words.contains(name) {
            format!("{}{}", self.escape_prefix, name)
        } else {
            name.to_string()
        }
    }

    /// look up an override, preferring the required-suffixed key
    pub(crate) fn override_for(&self, name: &str, required: bool) -> Option<&str> {
        if required {
            if let Some(target) = self.type_overrides.get(&format!("{name}!")) {
                return Some(target.as_str());
            }
        }
        self.type_overrides.get(name).map(String::as_str)
    }

    /// wrap an element type in the list container
    pub(crate) fn list_of(&self, element: &str) -> String {
        self.list_container.replace("{}", element)
    }
}

/// generate the output unit for a schema and a set of documents
///
/// the schema index is built once by reprinting and reparsing the
/// schema, then shared read-only across all documents.
pub fn generate(
    schema: &schema::Document<'_, String>,
    documents: &[DocumentInput<'_>],
    config: &GeneratorConfig,
) -> Result<String> {
    let index = SchemaIndex::build(schema)?;
    let mut operations = Vec::new();
    for input in documents {
        let lowering = lower::Lowering::new(&index, config, input.document);
        operations.extend(lowering.lower_document(input.source, input.path));
    }
    Ok(render::render_unit(&operations))
}

/// rust keywords escaped in emitted identifiers
const RESERVED_WORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where", "while",
    "async", "await", "dyn",
];

/// default override table: graphql and appsync scalar signatures to
/// rust types, nullable forms wrapped in `Option`
const DEFAULT_TYPE_OVERRIDES: &[(&str, &str)] = &[
    ("String", "Option<String>"),
    ("String!", "String"),
    ("ID", "Option<String>"),
    ("ID!", "String"),
    ("Int", "Option<i64>"),
    ("Int!", "i64"),
    ("Float", "Option<f64>"),
    ("Float!", "f64"),
    ("Boolean", "Option<bool>"),
    ("Boolean!", "bool"),
    ("AWSDateTime", "Option<String>"),
    ("AWSDateTime!", "String"),
    ("AWSDate", "Option<String>"),
    ("AWSDate!", "String"),
    ("AWSTime", "Option<String>"),
    ("AWSTime!", "String"),
    ("AWSTimestamp", "Option<i64>"),
    ("AWSTimestamp!", "i64"),
    ("AWSEmail", "Option<String>"),
    ("AWSEmail!", "String"),
    ("AWSURL", "Option<String>"),
    ("AWSURL!", "String"),
    ("AWSPhone", "Option<String>"),
    ("AWSPhone!", "String"),
    ("AWSIPAddress", "Option<String>"),
    ("AWSIPAddress!", "String"),
    ("AWSJSON", "Option<serde_json::Value>"),
    ("AWSJSON!", "serde_json::Value"),
];
