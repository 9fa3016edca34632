//! Projection of decoded structs into JSON values.
//!
//! Spare fields (any name containing `future`) are reserved padding in the
//! writer and carry no data, so they are dropped. Field order follows the
//! struct layout; `serde_json` is built with `preserve_order` so the output
//! reads like the C declaration.

use serde_json::{json, Map, Value as Json};

use crate::value::{StructValue, Value};

fn is_spare(name: &str) -> bool {
    name.contains("future")
}

fn project_value(value: &Value) -> Json {
    match value {
        Value::Int(v) => json!(v),
        Value::Uint(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Text(s) => json!(s),
        Value::Struct(s) => project(s),
        Value::Array(items) => Json::Array(items.iter().map(project_value).collect()),
    }
}

/// Render a decoded struct as a JSON object, spare fields omitted.
pub fn project(value: &StructValue) -> Json {
    let mut map = Map::new();
    for (name, field) in value.fields() {
        if is_spare(name) {
            continue;
        }
        map.insert(name.to_string(), project_value(field));
    }
    Json::Object(map)
}
