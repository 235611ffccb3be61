//! type name resolution
//!
//! maps a graphql type reference to a target rust type name through the
//! configured override table, plus the identifier-shaping helpers shared
//! by the emitters. pure functions, no side effects.

use crate::codegen::index::TypeRef;
use crate::codegen::GeneratorConfig;

/// resolve the full target type name, including list containers
///
/// non-null wrappers consult the `"Name!"` override key first and fall
/// back to the plain `"Name"` entry. nested lists keep their full depth.
pub fn target_type(ty: &TypeRef, config: &GeneratorConfig) -> String {
    match ty {
        TypeRef::Named(name) => named_target(name, false, config),
        TypeRef::List(inner) => config.list_of(&target_type(inner, config)),
        TypeRef::NonNull(inner) => match inner.as_ref() {
            TypeRef::Named(name) => named_target(name, true, config),
            wrapped => target_type(wrapped, config),
        },
    }
}

/// resolve only the element base name, ignoring list wrappers
///
/// used to name the class generated for a field's selection set.
pub fn base_type(ty: &TypeRef, config: &GeneratorConfig) -> String {
    match ty {
        TypeRef::Named(name) => named_target(name, false, config),
        TypeRef::List(inner) => base_type(inner, config),
        TypeRef::NonNull(inner) => match inner.as_ref() {
            TypeRef::Named(name) => named_target(name, true, config),
            wrapped => base_type(wrapped, config),
        },
    }
}

fn named_target(name: &str, required: bool, config: &GeneratorConfig) -> String {
    match config.override_for(name, required) {
        Some(mapped) => mapped.to_string(),
        // override values pass through untouched; raw schema names are
        // escaped like any other derived identifier
        None => config.escape(name),
    }
}

/// upper-camel identifier from a graphql name
pub fn to_rust_ident(name: &str) -> String {
    let mut out = String::new();
    let mut upper = true;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            upper = true;
            continue;
        }
        if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    // raw identifiers cannot spell these, so collide away from them
    match out.as_str() {
        "Self" | "Type" | "Box" | "Result" | "Option" | "Vec" => format!("{}Type", out),
        _ => out,
    }
}

/// snake-case identifier from a graphql name; escaping is the caller's job
pub fn to_rust_field(name: &str) -> String {
    let mut out = String::new();
    for (idx, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if idx > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
