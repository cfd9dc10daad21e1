//! Recursive JSON flattener: nested documents become a single object keyed
//! by joined paths, and back.

use serde_json::{Map, Value};

fn flatten_into(prefix: &str, value: &Value, separator: &str, out: &mut Map<String, Value>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}{separator}{key}")
        }
    };
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(&join(key), child, separator, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (idx, child) in items.iter().enumerate() {
                flatten_into(&join(&idx.to_string()), child, separator, out);
            }
        }
        // Scalars and empty containers are leaves.
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }
}

pub fn flatten_value(value: &Value, separator: &str) -> Value {
    let mut out = Map::new();
    match value {
        Value::Object(_) | Value::Array(_) => flatten_into("", value, separator, &mut out),
        scalar => return scalar.clone(),
    }
    Value::Object(out)
}

/// Rebuilds nested objects from flattened keys. Numeric segments stay object
/// keys; array shapes are not reconstructed.
pub fn unflatten_value(value: &Value, separator: &str) -> Result<Value, String> {
    let Value::Object(flat) = value else {
        return Err("flattened input must be a JSON object".into());
    };
    if separator.is_empty() {
        return Err("separator cannot be empty".into());
    }
    let mut root = Map::new();
    for (path, leaf) in flat {
        let segments: Vec<&str> = path.split(separator).collect();
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| "empty key".to_string())?;
        let mut cursor = &mut root;
        for segment in parents {
            let entry = cursor
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            cursor = entry
                .as_object_mut()
                .ok_or_else(|| format!("key `{path}` conflicts with a value at `{segment}`"))?;
        }
        if cursor.contains_key(*last) {
            return Err(format!("key `{path}` is defined twice"));
        }
        cursor.insert((*last).to_string(), leaf.clone());
    }
    Ok(Value::Object(root))
}

fn encode(value: &Value, minify: bool) -> Result<String, String> {
    let text = if minify {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|err| err.to_string())?;
    Ok(text.trim_end().to_string())
}

pub(crate) fn flatten_json_internal(
    input: &str,
    separator: &str,
    minify: bool,
) -> Result<String, String> {
    let value: Value = serde_json::from_str(input).map_err(|err| err.to_string())?;
    encode(&flatten_value(&value, separator), minify)
}

pub(crate) fn unflatten_json_internal(
    input: &str,
    separator: &str,
    minify: bool,
) -> Result<String, String> {
    let value: Value = serde_json::from_str(input).map_err(|err| err.to_string())?;
    encode(&unflatten_value(&value, separator)?, minify)
}
