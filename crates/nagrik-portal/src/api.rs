//! Normalising whatever JSON a guessed API endpoint returns into schemes.

use nagrik_core::schemes::Scheme;
use serde_json::{Map, Value};

const UNNAMED: &str = "Unnamed Scheme";

/// Scalars as text; `null` counts as absent so the next candidate key is tried.
fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn first_text(item: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| item.get(*k).and_then(text_of))
}

/// Accepts a bare array, or an object with a `data` or `schemes` array. Entries without a
/// usable name are dropped.
pub fn normalize_api_response(data: &Value) -> Vec<Scheme> {
    let items: &[Value] = match data {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("data").filter(|v| !v.is_null()) {
            Some(Value::Array(items)) => items,
            Some(_) => &[],
            None => match obj.get("schemes") {
                Some(Value::Array(items)) => items,
                _ => &[],
            },
        },
        _ => &[],
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let item = item.as_object()?;
            let name = first_text(item, &["name", "title", "schemeName"])
                .unwrap_or_else(|| UNNAMED.to_string());
            if name.is_empty() || name == UNNAMED {
                return None;
            }
            let mut scheme = Scheme::new(
                first_text(item, &["id"]).unwrap_or_else(|| (i + 1).to_string()),
                name,
                first_text(item, &["description", "desc", "summary", "benefits"])
                    .unwrap_or_default(),
                first_text(
                    item,
                    &["eligibility", "eligibilityCriteria", "eligibilitySummary"],
                )
                .unwrap_or_default(),
            );
            scheme.source_url = first_text(item, &["url"]).filter(|u| !u.is_empty());
            Some(scheme)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_wrapped_and_bare_arrays() {
        let wrapped = json!({"data": [{"id": 7, "title": "Ujjwala", "summary": "LPG"}]});
        let schemes = normalize_api_response(&wrapped);
        assert_eq!(schemes.len(), 1);
        assert_eq!(schemes[0].id, "7");
        assert_eq!(schemes[0].name, "Ujjwala");
        assert_eq!(schemes[0].description, "LPG");
        assert_eq!(schemes[0].eligibility_summary, "");

        let bare = json!([{"schemeName": "A"}, {"name": "B", "url": "https://x/b"}]);
        let schemes = normalize_api_response(&bare);
        assert_eq!(schemes[0].id, "1");
        assert_eq!(schemes[1].id, "2");
        assert_eq!(schemes[1].source_url.as_deref(), Some("https://x/b"));

        let listed = json!({"schemes": [{"name": "C", "eligibilityCriteria": "All"}]});
        assert_eq!(normalize_api_response(&listed)[0].eligibility_summary, "All");
    }

    #[test]
    fn drops_unusable_entries() {
        let data = json!([
            {"description": "no name"},
            {"name": ""},
            {"name": "Unnamed Scheme"},
            "not an object",
            {"name": "Kept"}
        ]);
        let schemes = normalize_api_response(&data);
        assert_eq!(schemes.len(), 1);
        assert_eq!(schemes[0].id, "5");
        assert!(normalize_api_response(&json!("text")).is_empty());
        assert!(normalize_api_response(&json!({"data": {"x": 1}})).is_empty());
    }
}
