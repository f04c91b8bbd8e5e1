use super::ast::Document;

/// Serialize a document to a pretty-printed JSON string.
pub fn to_pretty_json(document: &Document) -> String {
    serde_json::to_string_pretty(document).expect("Document serialization cannot fail")
}
