//! Identifier case conversion between the C API's lowercase underscore
//! convention and the target languages' compound-word styles.

/// `media_encoding` → `MediaEncoding`.
///
/// Each underscore-delimited segment is capitalized in place; characters are
/// never dropped or reordered within a segment.
pub fn to_pascal_case(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// `packet_length` → `packetLength`.
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First character uppercased, the rest lowercased.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
