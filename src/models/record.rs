use serde_json::Value as JsonValue;

/// One result row: a single JSON object decoded from one line of the
/// response body.
///
/// The engine's `JSONEachRow` format emits one object per line; no schema
/// is enforced client-side, so values are arbitrary JSON (string, number,
/// boolean, null, nested object/array).
pub type Record = serde_json::Map<String, JsonValue>;
