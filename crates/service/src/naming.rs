//! Technical-name helpers: safe names, implicit part names, and the
//! collision resolver that versions a name until it is free.

use contentdef_core::error::Result;

/// Default cap on generated technical names.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 128;

/// Turn free text into a technical identifier.
///
/// Keeps ASCII letters, digits and `_`, drops everything else, skips
/// leading characters until the first letter, lower-cases, and truncates
/// to `max_length`. The result may be empty.
pub fn to_safe_name(text: &str, max_length: usize) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .skip_while(|c| !c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .take(max_length)
        .collect()
}

/// Name of the part a type implicitly owns.
pub fn to_part_name(type_name: &str) -> String {
    format!("{type_name}Part")
}

/// Next version of a name.
///
/// `"Customer"` → `"Customer_2"`, `"Customer_2"` → `"Customer_3"`,
/// `"Item_0"` → `"Item_2"`. Empty `_` segments are dropped when the name is
/// rejoined. A trailing numeric segment is always read as a version, even
/// when it is part of the name (`"Route_66"` → `"Route_67"`).
pub fn version_name(name: &str) -> String {
    let segments: Vec<&str> = name.split('_').filter(|s| !s.is_empty()).collect();

    if let [head @ .., last] = segments.as_slice() {
        if !head.is_empty() {
            if let Ok(version) = last.parse::<i64>() {
                let next = if version > 0 { version.checked_add(1) } else { Some(2) };
                if let Some(next) = next {
                    return format!("{}_{next}", head.join("_"));
                }
            }
        }
    }

    format!("{name}_2")
}

/// Version `candidate` until `is_taken` reports it free.
///
/// Terminates as long as the set of taken names is finite.
pub fn resolve_name(candidate: impl Into<String>, mut is_taken: impl FnMut(&str) -> bool) -> String {
    let mut name = candidate.into();
    while is_taken(&name) {
        name = version_name(&name);
    }
    name
}

/// [`resolve_name`] with a fallible predicate (e.g. a store lookup).
pub fn try_resolve_name(
    candidate: impl Into<String>,
    mut is_taken: impl FnMut(&str) -> Result<bool>,
) -> Result<String> {
    let mut name = candidate.into();
    while is_taken(&name)? {
        name = version_name(&name);
    }
    Ok(name)
}

/// Whether two field names collide (trimmed, case-insensitive).
pub fn same_field_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
