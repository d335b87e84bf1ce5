//! Backend name resolution for request routing.
//!
//! Composite backend names follow `<owner>_<short name>_<kind>`, e.g.
//! `alqor_tests_simulator`. Routing only needs the short name.

/// Delimiter between the parts of a composite backend name.
const NAME_DELIMITER: char = '_';

/// Extract the short backend name from a composite name.
///
/// A single token is already a short name and comes back unchanged. Three
/// tokens yield the middle one. Any other shape yields `""`, which callers
/// treat as "no match".
pub fn short_backend_name(composite: &str) -> &str {
    let mut tokens = composite.split(NAME_DELIMITER);
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(single), None, None, None) => single,
        (Some(_), Some(short), Some(_), None) => short,
        _ => "",
    }
}

/// Whether a composite name resolves to a usable short name.
pub fn is_routable(composite: &str) -> bool {
    !short_backend_name(composite).is_empty()
}
