//! input type expansion
//!
//! a variable whose named type is an input object type pulls in a class
//! for that type and for every input object type reachable through its
//! fields. dependencies are pushed before dependents so consumers read
//! definitions before uses; the visited set breaks cycles.

use crate::codegen::index::SchemaIndex;
use crate::codegen::model::{ClassModel, Property};
use crate::codegen::resolve::{target_type, to_rust_field};
use crate::codegen::GeneratorConfig;
use std::collections::BTreeSet;

/// expand `name` and all input object types reachable from it into `out`
///
/// a name already in `visited` is skipped: its class either exists in
/// `out` already or is being built further up the stack, so only the
/// property reference is emitted. non-input names expand to nothing.
pub fn expand_input(
    name: &str,
    index: &SchemaIndex,
    config: &GeneratorConfig,
    visited: &mut BTreeSet<String>,
    out: &mut Vec<ClassModel>,
) {
    if !visited.insert(name.to_string()) {
        return;
    }
    let Some(input) = index.input_type(name) else {
        return;
    };

    let mut class = ClassModel::new(config.escape(&input.name));
    for field in &input.fields {
        let referenced = field.ty.named();
        if index.input_type(referenced).is_some() {
            expand_input(referenced, index, config, visited, out);
        }
        class.properties.push(Property {
            name: config.escape(&to_rust_field(&field.name)),
            wire_name: field.name.clone(),
            type_name: target_type(&field.ty, config),
            diagnostic: None,
        });
    }
    out.push(class);
}
