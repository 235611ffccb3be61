//! intermediate generation model
//!
//! the emitters build these values while walking a document; the render
//! pass serializes them to rust source text. models live only for the
//! duration of one operation's lowering.

use crate::codegen::OperationKind;

/// a generated struct field
#[derive(Debug, Clone)]
pub struct Property {
    /// emitted rust identifier, already case-converted and escaped
    pub name: String,
    /// graphql-side name (alias wins over name) kept for serde renames
    pub wire_name: String,
    /// resolved target type name
    pub type_name: String,
    /// soft-failure note rendered as a comment above the property
    pub diagnostic: Option<String>,
}

/// a generated class: one struct per selection set or input object type
#[derive(Debug, Clone, Default)]
pub struct ClassModel {
    pub name: String,
    pub properties: Vec<Property>,
    /// classes for nested selection sets, rendered before this one
    pub nested: Vec<ClassModel>,
    /// class-level soft-failure notes
    pub diagnostics: Vec<String>,
}

impl ClassModel {
    pub fn new(name: String) -> Self {
        ClassModel {
            name,
            ..ClassModel::default()
        }
    }
}

/// everything needed to render one named operation's module
#[derive(Debug, Clone)]
pub struct OperationModel {
    pub kind: OperationKind,
    pub name: String,
    /// wrapper struct name, e.g. `QueryGetUser`
    pub wrapper_name: String,
    /// module and helper-function name, e.g. `query_get_user`
    pub module_name: String,
    /// verbatim document source, transmitted as the wire payload
    pub source: String,
    /// display path of the originating document
    pub source_path: String,
    pub response: ClassModel,
    pub request: ClassModel,
    /// input object classes expanded from variable definitions, in
    /// dependency order
    pub input_classes: Vec<ClassModel>,
}
