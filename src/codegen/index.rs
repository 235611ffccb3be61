//! schema index
//!
//! owned, queryable view over a schema document. built by printing the
//! schema to canonical text and reparsing it, so schema-side and
//! document-side type references resolve through the same shapes.

use crate::codegen::OperationKind;
use crate::error::{Error, Result};
use graphql_parser::parse_schema;
use graphql_parser::schema::{Definition, Document, Type, TypeDefinition};
use std::collections::BTreeMap;
use std::fmt;

/// a graphql type reference: named, list-of, or non-null-of
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// build a reference from a parsed ast type node
    pub fn from_ast(ty: &Type<'_, String>) -> Self {
        match ty {
            Type::NamedType(name) => TypeRef::Named(name.clone()),
            Type::ListType(inner) => TypeRef::List(Box::new(TypeRef::from_ast(inner))),
            Type::NonNullType(inner) => TypeRef::NonNull(Box::new(TypeRef::from_ast(inner))),
        }
    }

    /// unwrap all list and non-null layers down to the named base type
    pub fn named(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named(),
        }
    }

    /// true if any list layer wraps the base type
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    /// prints the graphql signature used as an override-table key,
    /// e.g. `String`, `String!`, `[Int!]!`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// a field of an indexed object or input object type
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
}

/// an indexed object type definition
#[derive(Debug, Clone)]
pub struct ObjectDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl ObjectDef {
    /// find a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// an indexed input object type definition
#[derive(Debug, Clone)]
pub struct InputDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

/// name-keyed view over the schema's object and input object types
#[derive(Debug, Default)]
pub struct SchemaIndex {
    objects: BTreeMap<String, ObjectDef>,
    inputs: BTreeMap<String, InputDef>,
    declared_query: Option<String>,
    declared_mutation: Option<String>,
    declared_subscription: Option<String>,
}

impl SchemaIndex {
    /// build an index from a parsed schema by reprinting and reparsing it
    pub fn build(schema: &Document<'_, String>) -> Result<Self> {
        let printed = schema.to_string();
        Self::parse(&printed)
    }

    /// build an index directly from schema sdl text
    pub fn parse(text: &str) -> Result<Self> {
        let document = parse_schema::<String>(text)
            .map_err(|err| Error::Parse(format!("schema did not reparse: {err}")))?;

        let mut index = SchemaIndex::default();
        for definition in &document.definitions {
            match definition {
                Definition::SchemaDefinition(schema) => {
                    index.declared_query = schema.query.clone();
                    index.declared_mutation = schema.mutation.clone();
                    index.declared_subscription = schema.subscription.clone();
                }
                Definition::TypeDefinition(TypeDefinition::Object(object)) => {
                    index.objects.insert(
                        object.name.clone(),
                        ObjectDef {
                            name: object.name.clone(),
                            fields: object
                                .fields
                                .iter()
                                .map(|field| FieldDef {
                                    name: field.name.clone(),
                                    ty: TypeRef::from_ast(&field.field_type),
                                })
                                .collect(),
                        },
                    );
                }
                Definition::TypeDefinition(TypeDefinition::InputObject(input)) => {
                    index.inputs.insert(
                        input.name.clone(),
                        InputDef {
                            name: input.name.clone(),
                            fields: input
                                .fields
                                .iter()
                                .map(|field| FieldDef {
                                    name: field.name.clone(),
                                    ty: TypeRef::from_ast(&field.value_type),
                                })
                                .collect(),
                        },
                    );
                }
                _ => {}
            }
        }

        Ok(index)
    }

    /// look up an object type definition by name
    pub fn object_type(&self, name: &str) -> Option<&ObjectDef> {
        self.objects.get(name)
    }

    /// look up an input object type definition by name
    pub fn input_type(&self, name: &str) -> Option<&InputDef> {
        self.inputs.get(name)
    }

    /// resolve the root object type for an operation kind
    ///
    /// an explicit `schema { query: X }` declaration wins; otherwise the
    /// object type whose name case-insensitively matches the kind keyword.
    pub fn root_type(&self, kind: OperationKind) -> Option<&ObjectDef> {
        let declared = match kind {
            OperationKind::Query => self.declared_query.as_deref(),
            OperationKind::Mutation => self.declared_mutation.as_deref(),
            OperationKind::Subscription => self.declared_subscription.as_deref(),
        };
        if let Some(name) = declared {
            if let Some(object) = self.objects.get(name) {
                return Some(object);
            }
        }
        self.objects
            .values()
            .find(|object| object.name.eq_ignore_ascii_case(kind.keyword()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        type Query {
            user(id: ID!): User
        }

        type User {
            id: ID!
            name: String
            tags: [String!]
        }

        input UserFilter {
            name: String
        }
    "#;

    #[test]
    fn test_parse_indexes_objects_and_inputs() {
        let index = SchemaIndex::parse(SDL).unwrap();
        assert!(index.object_type("Query").is_some());
        assert!(index.object_type("User").is_some());
        assert!(index.object_type("UserFilter").is_none());
        assert!(index.input_type("UserFilter").is_some());
        assert!(index.input_type("User").is_none());
    }

    #[test]
    fn test_object_field_lookup() {
        let index = SchemaIndex::parse(SDL).unwrap();
        let user = index.object_type("User").unwrap();
        assert_eq!(user.field("id").unwrap().ty, TypeRef::NonNull(Box::new(TypeRef::Named("ID".to_string()))));
        assert!(user.field("missing").is_none());
    }

    #[test]
    fn test_root_type_conventional_name() {
        let index = SchemaIndex::parse(SDL).unwrap();
        let root = index.root_type(OperationKind::Query).unwrap();
        assert_eq!(root.name, "Query");
        assert!(index.root_type(OperationKind::Mutation).is_none());
    }

    #[test]
    fn test_root_type_declared_in_schema_definition() {
        let index = SchemaIndex::parse(
            "schema { query: Root } type Root { ok: Boolean }",
        )
        .unwrap();
        assert_eq!(index.root_type(OperationKind::Query).unwrap().name, "Root");
    }

    #[test]
    fn test_build_reprints_and_reparses() {
        let document = graphql_parser::parse_schema::<String>(SDL).unwrap();
        let index = SchemaIndex::build(&document).unwrap();
        assert!(index.object_type("User").is_some());
    }

    #[test]
    fn test_type_ref_signature_printing() {
        let ty = TypeRef::NonNull(Box::new(TypeRef::List(Box::new(TypeRef::NonNull(
            Box::new(TypeRef::Named("Int".to_string())),
        )))));
        assert_eq!(ty.to_string(), "[Int!]!");
        assert_eq!(ty.named(), "Int");
        assert!(ty.is_list());
    }

    #[test]
    fn test_parse_rejects_invalid_sdl() {
        let err = SchemaIndex::parse("type {").unwrap_err();
        assert!(matches!(err, crate::Error::Parse(_)));
    }
}
