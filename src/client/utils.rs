//! Utility functions for the firetree client.

use serde_json::Value;

use crate::protocol::JSON_SUFFIX;

/// Join the base address with a relative path and append the `.json`
/// suffix.
///
/// The path is stripped of leading and trailing `/` before joining, so
/// `"/app/users/"` and `"app/users"` address the same location and the
/// base is joined exactly once. With no path the suffix lands directly on
/// the base: `http://mydatabase` → `http://mydatabase.json`.
pub fn join_url(base: &str, path: Option<&str>) -> String {
    match path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{}", base.trim_end_matches('/'), path, JSON_SUFFIX),
        None => format!("{base}{JSON_SUFFIX}"),
    }
}

/// Whether a decoded JSON value is vacant: `null`, `false`, zero, or an
/// empty string/array/object. Vacant `data` bodies are dropped without
/// dispatch.
pub fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_without_path_appends_suffix_to_base() {
        assert_eq!(join_url("http://mydatabase", None), "http://mydatabase.json");
    }

    #[test]
    fn join_strips_surrounding_slashes() {
        assert_eq!(
            join_url("http://mydatabase", Some("/app/users/")),
            "http://mydatabase/app/users.json"
        );
        assert_eq!(
            join_url("http://mydatabase", Some("app/users")),
            "http://mydatabase/app/users.json"
        );
    }

    #[test]
    fn join_tolerates_trailing_slash_on_base() {
        assert_eq!(
            join_url("http://mydatabase/", Some("app")),
            "http://mydatabase/app.json"
        );
    }

    #[test]
    fn join_treats_bare_slashes_as_no_path() {
        assert_eq!(join_url("http://mydatabase", Some("///")), "http://mydatabase.json");
    }

    #[test]
    fn vacant_values() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(is_vacant(&value), "{value} should be vacant");
        }
    }

    #[test]
    fn occupied_values() {
        for value in [
            json!(true),
            json!(1),
            json!(-3.5),
            json!("x"),
            json!([0]),
            json!({"a": null}),
        ] {
            assert!(!is_vacant(&value), "{value} should not be vacant");
        }
    }
}
