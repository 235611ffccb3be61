//! operation lowering
//!
//! walks each operation's selection tree by explicit recursive descent:
//! the enclosing resolved object type is threaded as a parameter on the
//! way down, classes are assembled on the way back up, so children are
//! finalized before their parents. nothing in the parsed documents is
//! mutated. per-selection failures degrade to diagnostics; only the
//! harness-level operation-kind keyword check is fatal.
//!
//! generated structs for one operation share a flat module, so class
//! names are uniquified per operation (`User`, `User2`, ...) instead of
//! relying on lexical nesting for scope.

use crate::codegen::index::{FieldDef, ObjectDef, SchemaIndex, TypeRef};
use crate::codegen::inputs::expand_input;
use crate::codegen::model::{ClassModel, OperationModel, Property};
use crate::codegen::resolve::{base_type, target_type, to_rust_field, to_rust_ident};
use crate::codegen::{GeneratorConfig, OperationKind};
use graphql_parser::query::{
    Definition, Document, Field, FragmentDefinition, OperationDefinition, Selection, SelectionSet,
    TypeCondition,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// emitted type for members whose schema type could not be resolved
const FALLBACK_TYPE: &str = "serde_json::Value";

/// one document's lowering pass over a read-only schema index
pub struct Lowering<'d, 'c> {
    index: &'c SchemaIndex,
    config: &'c GeneratorConfig,
    document: &'d Document<'d, String>,
    fragments: BTreeMap<&'d str, &'d FragmentDefinition<'d, String>>,
}

/// a selection flattened out of fragments, paired with its resolved
/// field definition or the reason resolution failed
struct CollectedField<'d, 'c> {
    field: &'d Field<'d, String>,
    def: Option<&'c FieldDef>,
    missing: Option<String>,
    /// fragment spreads this field was inlined through, innermost last;
    /// kept on the expansion stack while the field's own selection set
    /// is lowered so recursive spreads are caught across nesting levels
    via_fragments: Vec<&'d str>,
}

impl<'d, 'c> Lowering<'d, 'c> {
    pub fn new(
        index: &'c SchemaIndex,
        config: &'c GeneratorConfig,
        document: &'d Document<'d, String>,
    ) -> Self {
        let mut fragments = BTreeMap::new();
        for definition in &document.definitions {
            if let Definition::Fragment(fragment) = definition {
                fragments.insert(fragment.name.as_str(), fragment);
            }
        }
        Lowering {
            index,
            config,
            document,
            fragments,
        }
    }

    /// lower every named operation in the document
    pub fn lower_document(&self, source: &str, path: &Path) -> Vec<OperationModel> {
        let mut operations = Vec::new();
        for definition in &self.document.definitions {
            if let Definition::Operation(operation) = definition {
                if let Some(model) = self.lower_operation(operation, source, path) {
                    operations.push(model);
                }
            }
        }
        operations
    }

    /// anonymous operations produce no output: the wrapper types need a
    /// stable name
    fn lower_operation(
        &self,
        operation: &'d OperationDefinition<'d, String>,
        source: &str,
        path: &Path,
    ) -> Option<OperationModel> {
        let (kind, name, variables, selection_set) = match operation {
            // bare selection-set shorthand is always anonymous
            OperationDefinition::SelectionSet(_) => return None,
            OperationDefinition::Query(query) => (
                OperationKind::Query,
                query.name.as_deref(),
                query.variable_definitions.as_slice(),
                &query.selection_set,
            ),
            OperationDefinition::Mutation(mutation) => (
                OperationKind::Mutation,
                mutation.name.as_deref(),
                mutation.variable_definitions.as_slice(),
                &mutation.selection_set,
            ),
            OperationDefinition::Subscription(subscription) => (
                OperationKind::Subscription,
                subscription.name.as_deref(),
                subscription.variable_definitions.as_slice(),
                &subscription.selection_set,
            ),
        };

        let name = name?;
        if let Some(only) = self.config.only {
            if only != kind {
                return None;
            }
        }

        let mut request = ClassModel::new("Request".to_string());
        let mut input_classes = Vec::new();
        let mut expanded = BTreeSet::new();
        for variable in variables {
            let ty = TypeRef::from_ast(&variable.var_type);
            if self.index.input_type(ty.named()).is_some() {
                expand_input(
                    ty.named(),
                    self.index,
                    self.config,
                    &mut expanded,
                    &mut input_classes,
                );
            }
            request.properties.push(Property {
                name: self.config.escape(&to_rust_field(&variable.name)),
                wire_name: variable.name.clone(),
                type_name: target_type(&ty, self.config),
                diagnostic: None,
            });
        }

        let wrapper_name = to_rust_ident(&format!("{}_{}", kind.keyword(), name));
        let module_name = to_rust_field(&wrapper_name);

        // class names share one flat module per operation
        let mut used_names: BTreeSet<String> = BTreeSet::new();
        used_names.insert("Response".to_string());
        used_names.insert("Request".to_string());
        used_names.insert(wrapper_name.clone());
        for class in &input_classes {
            used_names.insert(class.name.clone());
        }

        let root = self.index.root_type(kind);
        let mut fragment_stack = Vec::new();
        let mut response = self.lower_class(
            "Response".to_string(),
            selection_set,
            root,
            &mut fragment_stack,
            &mut used_names,
        );
        if root.is_none() {
            response.diagnostics.insert(
                0,
                format!(
                    "schema does not define a root type for {} operations",
                    kind.keyword()
                ),
            );
        }

        Some(OperationModel {
            kind,
            name: name.to_string(),
            wrapper_name,
            module_name,
            source: source.to_string(),
            source_path: path.display().to_string(),
            response,
            request,
            input_classes,
        })
    }

    /// build the class for one selection set against its enclosing type
    fn lower_class(
        &self,
        name: String,
        set: &'d SelectionSet<'d, String>,
        parent: Option<&'c ObjectDef>,
        fragment_stack: &mut Vec<&'d str>,
        used_names: &mut BTreeSet<String>,
    ) -> ClassModel {
        let mut class = ClassModel::new(name);
        let base_depth = fragment_stack.len();
        let mut collected = Vec::new();
        self.collect_fields(
            set,
            parent,
            fragment_stack,
            base_depth,
            &mut collected,
            &mut class.diagnostics,
        );

        let mut seen_properties = BTreeSet::new();
        for entry in collected {
            let field = entry.field;
            let wire_name = field.alias.as_deref().unwrap_or(&field.name);
            let property_name = self.config.escape(&to_rust_field(wire_name));
            // repeated selections merge in graphql; the first one wins here
            if !seen_properties.insert(property_name.clone()) {
                continue;
            }

            let property = if field.selection_set.items.is_empty() {
                match entry.def {
                    Some(def) => Property {
                        name: property_name,
                        wire_name: wire_name.to_string(),
                        type_name: target_type(&def.ty, self.config),
                        diagnostic: None,
                    },
                    None => Property {
                        name: property_name,
                        wire_name: wire_name.to_string(),
                        type_name: FALLBACK_TYPE.to_string(),
                        diagnostic: entry.missing,
                    },
                }
            } else {
                let (child_parent, base_name, diagnostic) = match entry.def {
                    Some(def) => match self.index.object_type(def.ty.named()) {
                        Some(object) => (Some(object), base_type(&def.ty, self.config), None),
                        None => (
                            None,
                            to_rust_ident(wire_name),
                            Some(format!(
                                "`{}` is not an object type in the schema; member fields are unresolved",
                                def.ty.named()
                            )),
                        ),
                    },
                    None => (None, to_rust_ident(wire_name), entry.missing),
                };
                let class_name = claim_class_name(base_name, used_names);

                fragment_stack.extend(entry.via_fragments.iter().copied());
                let child = self.lower_class(
                    class_name.clone(),
                    &field.selection_set,
                    child_parent,
                    fragment_stack,
                    used_names,
                );
                fragment_stack.truncate(fragment_stack.len() - entry.via_fragments.len());
                class.nested.push(child);

                let is_list = entry.def.map(|def| def.ty.is_list()).unwrap_or(false);
                let type_name = if is_list {
                    self.config.list_of(&class_name)
                } else {
                    class_name
                };
                Property {
                    name: property_name,
                    wire_name: wire_name.to_string(),
                    type_name,
                    diagnostic,
                }
            };
            class.properties.push(property);
        }
        class
    }

    /// flatten a selection set into plain fields, inlining fragment
    /// spreads and inline fragments against their type conditions
    fn collect_fields(
        &self,
        set: &'d SelectionSet<'d, String>,
        parent: Option<&'c ObjectDef>,
        fragment_stack: &mut Vec<&'d str>,
        base_depth: usize,
        out: &mut Vec<CollectedField<'d, 'c>>,
        diagnostics: &mut Vec<String>,
    ) {
        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    let (def, missing) = match parent {
                        Some(object) => match object.field(&field.name) {
                            Some(def) => (Some(def), None),
                            None => (
                                None,
                                Some(format!(
                                    "field `{}` not found on type `{}`",
                                    field.name, object.name
                                )),
                            ),
                        },
                        None => (
                            None,
                            Some(format!(
                                "field `{}` cannot be resolved: enclosing type is unknown",
                                field.name
                            )),
                        ),
                    };
                    out.push(CollectedField {
                        field,
                        def,
                        missing,
                        via_fragments: fragment_stack[base_depth..].to_vec(),
                    });
                }
                Selection::FragmentSpread(spread) => {
                    let fragment_name = spread.fragment_name.as_str();
                    if fragment_stack.contains(&fragment_name) {
                        diagnostics.push(format!(
                            "fragment `{}` expands recursively; skipped",
                            fragment_name
                        ));
                        continue;
                    }
                    match self.fragments.get(fragment_name) {
                        Some(fragment) => {
                            let TypeCondition::On(condition) = &fragment.type_condition;
                            let condition_type = self.index.object_type(condition);
                            if condition_type.is_none() {
                                diagnostics.push(format!(
                                    "fragment `{}` targets `{}`, which is not an object type",
                                    fragment_name, condition
                                ));
                            }
                            fragment_stack.push(fragment_name);
                            self.collect_fields(
                                &fragment.selection_set,
                                condition_type,
                                fragment_stack,
                                base_depth,
                                out,
                                diagnostics,
                            );
                            fragment_stack.pop();
                        }
                        None => diagnostics.push(format!(
                            "fragment `{}` is not defined in this document",
                            fragment_name
                        )),
                    }
                }
                Selection::InlineFragment(inline) => {
                    let condition_type = match &inline.type_condition {
                        Some(TypeCondition::On(condition)) => {
                            let found = self.index.object_type(condition);
                            if found.is_none() {
                                diagnostics.push(format!(
                                    "inline fragment targets `{}`, which is not an object type",
                                    condition
                                ));
                            }
                            found
                        }
                        None => parent,
                    };
                    self.collect_fields(
                        &inline.selection_set,
                        condition_type,
                        fragment_stack,
                        base_depth,
                        out,
                        diagnostics,
                    );
                }
            }
        }
    }
}

/// first free variant of `base`: `User`, then `User2`, `User3`, ...
fn claim_class_name(base: String, used_names: &mut BTreeSet<String>) -> String {
    if used_names.insert(base.clone()) {
        return base;
    }
    let mut suffix = 2usize;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if used_names.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::parse_query;

    const SDL: &str = r#"
        type Query {
            user(id: ID!): User
            users: [User!]!
        }

        type Mutation {
            createUser(input: CreateUser!): User
        }

        type User {
            id: ID!
            name: String
            friends: [User!]
        }

        input CreateUser {
            name: String!
        }
    "#;

    fn lower(sdl: &str, source: &str) -> Vec<OperationModel> {
        lower_with(sdl, source, GeneratorConfig::default())
    }

    fn lower_with(sdl: &str, source: &str, config: GeneratorConfig) -> Vec<OperationModel> {
        let index = SchemaIndex::parse(sdl).unwrap();
        let document = parse_query::<String>(source).unwrap();
        let lowering = Lowering::new(&index, &config, &document);
        lowering.lower_document(source, Path::new("test.graphql"))
    }

    #[test]
    fn test_get_user_scenario() {
        let operations = lower(
            SDL,
            "query GetUser($id: ID!) { user(id: $id) { id name } }",
        );
        assert_eq!(operations.len(), 1);
        let op = &operations[0];
        assert_eq!(op.wrapper_name, "QueryGetUser");
        assert_eq!(op.module_name, "query_get_user");
        assert_eq!(op.response.name, "Response");
        assert_eq!(op.response.properties[0].type_name, "User");

        let user = &op.response.nested[0];
        assert_eq!(user.name, "User");
        assert_eq!(user.properties[0].name, "id");
        assert_eq!(user.properties[0].type_name, "String");
        assert_eq!(user.properties[1].name, "name");
        assert_eq!(user.properties[1].type_name, "Option<String>");

        assert_eq!(op.request.properties.len(), 1);
        assert_eq!(op.request.properties[0].name, "id");
        assert_eq!(op.request.properties[0].type_name, "String");
        assert!(op.input_classes.is_empty());
    }

    #[test]
    fn test_list_field_wraps_property_not_class_name() {
        let operations = lower(SDL, "query All { users { id } }");
        let response = &operations[0].response;
        assert_eq!(response.properties[0].type_name, "Vec<User>");
        assert_eq!(response.nested[0].name, "User");
    }

    #[test]
    fn test_unknown_field_degrades_with_diagnostic() {
        let operations = lower(SDL, "query Bad { user(id: 1) { id nickname } }");
        let user = &operations[0].response.nested[0];
        assert_eq!(user.properties[0].diagnostic, None);
        let nick = &user.properties[1];
        assert_eq!(nick.type_name, "serde_json::Value");
        assert!(nick
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("field `nickname` not found on type `User`"));
    }

    #[test]
    fn test_alias_names_property_and_keeps_wire_name() {
        let operations = lower(SDL, "query Aliased { me: user(id: 1) { id } }");
        let prop = &operations[0].response.properties[0];
        assert_eq!(prop.name, "me");
        assert_eq!(prop.wire_name, "me");
        assert_eq!(prop.type_name, "User");
    }

    #[test]
    fn test_anonymous_operation_is_skipped() {
        let operations = lower(SDL, "{ user(id: 1) { id } }");
        assert!(operations.is_empty());
        let operations = lower(SDL, "query { user(id: 1) { id } }");
        assert!(operations.is_empty());
    }

    #[test]
    fn test_variable_of_input_type_expands_request() {
        let operations = lower(
            SDL,
            "mutation Create($input: CreateUser!) { createUser(input: $input) { id } }",
        );
        let op = &operations[0];
        assert_eq!(op.kind, OperationKind::Mutation);
        assert_eq!(op.input_classes.len(), 1);
        assert_eq!(op.input_classes[0].name, "CreateUser");
        assert_eq!(op.request.properties[0].name, "input");
        assert_eq!(op.request.properties[0].type_name, "CreateUser");
    }

    #[test]
    fn test_fragment_spread_is_inlined_against_condition_type() {
        let operations = lower(
            SDL,
            r#"
            query WithFragment { user(id: 1) { ...UserParts } }
            fragment UserParts on User { id name }
            "#,
        );
        let user = &operations[0].response.nested[0];
        assert_eq!(user.properties.len(), 2);
        assert_eq!(user.properties[0].name, "id");
        assert_eq!(user.properties[1].type_name, "Option<String>");
    }

    #[test]
    fn test_unknown_fragment_degrades() {
        let operations = lower(SDL, "query Missing { user(id: 1) { ...Nope } }");
        let user = &operations[0].response.nested[0];
        assert!(user.diagnostics[0].contains("fragment `Nope` is not defined"));
    }

    #[test]
    fn test_recursive_fragment_terminates() {
        let operations = lower(
            SDL,
            r#"
            query Recursive { user(id: 1) { ...Loop } }
            fragment Loop on User { id friends { ...Loop } }
            "#,
        );
        let user = &operations[0].response.nested[0];
        assert_eq!(user.name, "User");
        let friends = &user.nested[0];
        assert!(friends.diagnostics[0].contains("fragment `Loop` expands recursively"));
    }

    #[test]
    fn test_inline_fragment_without_condition_uses_enclosing_type() {
        let operations = lower(
            SDL,
            "query Inline { user(id: 1) { ... { id } name } }",
        );
        let user = &operations[0].response.nested[0];
        assert_eq!(user.properties[0].name, "id");
        assert_eq!(user.properties[1].name, "name");
    }

    #[test]
    fn test_duplicate_selection_merges() {
        let operations = lower(SDL, "query Twice { user(id: 1) { id id name } }");
        let user = &operations[0].response.nested[0];
        assert_eq!(user.properties.len(), 2);
    }

    #[test]
    fn test_nested_same_type_gets_suffixed_class_name() {
        let operations = lower(
            SDL,
            "query Friends { user(id: 1) { id friends { id name } } }",
        );
        let user = &operations[0].response.nested[0];
        assert_eq!(user.name, "User");
        assert_eq!(user.nested[0].name, "User2");
        assert_eq!(user.properties[1].type_name, "Vec<User2>");
    }

    #[test]
    fn test_sibling_same_type_gets_suffixed_class_name() {
        let operations = lower(
            SDL,
            "query Two { a: user(id: 1) { id } b: user(id: 2) { name } }",
        );
        let response = &operations[0].response;
        assert_eq!(response.nested[0].name, "User");
        assert_eq!(response.nested[1].name, "User2");
        assert_eq!(response.properties[0].type_name, "User");
        assert_eq!(response.properties[1].type_name, "User2");
    }

    #[test]
    fn test_missing_root_type_degrades() {
        let operations = lower(
            "type Mutation { noop: Boolean }",
            "query Orphan { anything { id } }",
        );
        let response = &operations[0].response;
        assert!(response.diagnostics[0].contains("root type for query"));
        assert!(response.properties[0]
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("enclosing type is unknown"));
        assert_eq!(response.nested[0].name, "Anything");
        assert_eq!(response.properties[0].type_name, "Anything");
    }

    #[test]
    fn test_only_filter_skips_other_kinds() {
        let config = GeneratorConfig::default().with_only(OperationKind::Mutation);
        let operations = lower_with(
            SDL,
            r#"
            query GetUser { user(id: 1) { id } }
            mutation Create($input: CreateUser!) { createUser(input: $input) { id } }
            "#,
            config,
        );
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].kind, OperationKind::Mutation);
    }

    #[test]
    fn test_source_is_kept_verbatim() {
        let source = "query GetUser {\n  user(id: 1) {\n    id\n  }\n}\n";
        let operations = lower(SDL, source);
        assert_eq!(operations[0].source, source);
    }

    #[test]
    fn test_selection_on_scalar_degrades() {
        let operations = lower(SDL, "query Odd { user(id: 1) { name { length } } }");
        let user = &operations[0].response.nested[0];
        let prop = &user.properties[0];
        assert!(prop
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("`String` is not an object type"));
        assert_eq!(prop.type_name, "Name");
        assert_eq!(user.nested[0].name, "Name");
    }
}
