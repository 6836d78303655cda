//! Naming policy for child slots.
//!
//! Slot names come from the simple name of the declared type. Group types
//! carry the enclosing message name as a prefix (`ORU_R01_ORDER_OBSERVATION`),
//! which is dropped so the slot reads `ORDER_OBSERVATION`.

use crate::definition::{StructureKind, StructureType};

/// Strips any `::` or `.` qualifier from a type name.
pub fn simple_name(qualified: &str) -> &str {
    let tail = qualified.rsplit("::").next().unwrap_or(qualified);
    tail.rsplit('.').next().unwrap_or(tail)
}

/// Derives a slot name from a simple type name and the enclosing message name.
///
/// When the message name is a prefix of the type name, it is removed together
/// with the `_` separator, as long as something remains.
pub fn slot_name(simple_type_name: &str, message_name: Option<&str>) -> String {
    if let Some(message) = message_name.filter(|message| !message.is_empty())
        && let Some(rest) = simple_type_name.strip_prefix(message)
    {
        let rest = rest.strip_prefix('_').unwrap_or(rest);
        if !rest.is_empty() {
            return rest.to_string();
        }
    }
    simple_type_name.to_string()
}

/// Name a structure of this type goes by inside the given message.
///
/// Only group names carry the message prefix; segment names are kept as is.
pub fn structure_name(structure_type: &StructureType, message_name: Option<&str>) -> String {
    match structure_type.kind() {
        StructureKind::Group => slot_name(structure_type.simple_name(), message_name),
        StructureKind::Segment => structure_type.simple_name().to_string(),
    }
}

/// Appends `2`, `3`, ... to `candidate` until `exists` no longer matches.
pub fn unique_name(candidate: &str, exists: impl Fn(&str) -> bool) -> String {
    if !exists(candidate) {
        return candidate.to_string();
    }
    let mut suffix = 2usize;
    loop {
        let name = format!("{candidate}{suffix}");
        if !exists(&name) {
            return name;
        }
        suffix += 1;
    }
}
