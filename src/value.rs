//! The input record and dot-path field access.
//!
//! A field name is a dot-path: `"address.city"` descends nested objects,
//! and a numeric segment indexes into an array (`"tags.0"`).

use serde_json::{Map, Value};

/// The input record under validation: a mapping from field name to an
/// arbitrary JSON value (scalar, sequence, or nested mapping).
pub type Record = Map<String, Value>;

/// Builds a [`Record`] from a `serde_json::json!` object literal.
///
/// Non-object values produce an empty record.
///
/// ```
/// let data = sieve::record(serde_json::json!({"name": "ada"}));
/// assert_eq!(data.get("name"), Some(&serde_json::json!("ada")));
/// ```
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

/// Resolves a dot-path against the record. `None` means the field is absent.
pub fn get_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes a value at a dot-path, creating intermediate objects for missing
/// segments. Used by the executor to apply a rule's rewrite side-channel
/// back into the field's own slot.
pub fn set_path(record: &mut Record, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            record.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = record
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            set_in(slot, rest, value);
        }
    }
}

fn set_in(slot: &mut Value, path: &str, value: Value) {
    match path.split_once('.') {
        None => write_segment(slot, path, value),
        Some((head, rest)) => {
            let next = match slot {
                Value::Object(map) => map
                    .entry(head.to_string())
                    .or_insert_with(|| Value::Object(Map::new())),
                Value::Array(items) => match head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                    Some(item) => item,
                    None => return,
                },
                other => {
                    *other = Value::Object(Map::new());
                    match other {
                        Value::Object(map) => map
                            .entry(head.to_string())
                            .or_insert_with(|| Value::Object(Map::new())),
                        _ => return,
                    }
                }
            };
            set_in(next, rest, value);
        }
    }
}

fn write_segment(slot: &mut Value, segment: &str, value: Value) {
    match slot {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
        }
        Value::Array(items) => {
            if let Some(item) = segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                *item = value;
            }
        }
        other => {
            let mut map = Map::new();
            map.insert(segment.to_string(), value);
            *other = Value::Object(map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shallow_lookup() {
        let data = record(json!({"name": "ada"}));
        assert_eq!(get_path(&data, "name"), Some(&json!("ada")));
        assert_eq!(get_path(&data, "missing"), None);
    }

    #[test]
    fn deep_lookup_through_objects_and_arrays() {
        let data = record(json!({
            "address": {"city": "london", "lines": ["10 downing st", "westminster"]}
        }));
        assert_eq!(get_path(&data, "address.city"), Some(&json!("london")));
        assert_eq!(
            get_path(&data, "address.lines.1"),
            Some(&json!("westminster"))
        );
        assert_eq!(get_path(&data, "address.zip"), None);
        assert_eq!(get_path(&data, "address.city.deeper"), None);
    }

    #[test]
    fn set_path_overwrites_and_creates() {
        let mut data = record(json!({"flag": "1"}));
        set_path(&mut data, "flag", json!(true));
        assert_eq!(data.get("flag"), Some(&json!(true)));

        set_path(&mut data, "prefs.daily", json!(false));
        assert_eq!(get_path(&data, "prefs.daily"), Some(&json!(false)));
    }

    #[test]
    fn set_path_into_array_slot() {
        let mut data = record(json!({"tags": ["a", "b"]}));
        set_path(&mut data, "tags.1", json!("z"));
        assert_eq!(get_path(&data, "tags.1"), Some(&json!("z")));
    }

    #[test]
    fn non_object_literal_gives_empty_record() {
        assert!(record(json!([1, 2])).is_empty());
        assert!(record(json!("plain")).is_empty());
    }
}
