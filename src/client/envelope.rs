use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// How deep a `{data: ...}` wrapper is followed before giving up.
const MAX_WRAPPER_DEPTH: usize = 3;

/// Pagination metadata as reported by a Laravel-style paginated envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageMeta {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

fn first_page() -> u32 {
    1
}

impl PageMeta {
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Canonical list shape handed to the rest of the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub page: Option<PageMeta>,
}

impl<T> Listing<T> {
    pub fn unpaged(items: Vec<T>) -> Self {
        Self { items, page: None }
    }

    pub fn total(&self) -> u64 {
        self.page
            .as_ref()
            .map(|p| p.total)
            .unwrap_or(self.items.len() as u64)
    }
}

impl<T: DeserializeOwned> Listing<T> {
    /// Accepts a plain array, a paginated envelope, or either of those
    /// nested under `data`.
    pub fn from_value(value: Value) -> AppResult<Self> {
        let mut current = value;

        for _ in 0..MAX_WRAPPER_DEPTH {
            match current {
                Value::Array(_) => {
                    return Ok(Self::unpaged(serde_json::from_value(current)?));
                }
                Value::Object(mut map) if map.contains_key("current_page") => {
                    let items = map.remove("data").unwrap_or(Value::Array(Vec::new()));
                    let meta: PageMeta = serde_json::from_value(Value::Object(map))?;
                    return Ok(Self {
                        items: serde_json::from_value(items)?,
                        page: Some(meta),
                    });
                }
                Value::Object(mut map) => match map.remove("data") {
                    Some(inner) => current = inner,
                    None => {
                        return Err(AppError::DecodeError(
                            "expected a list or a paginated envelope".to_string(),
                        ))
                    }
                },
                Value::Null => return Ok(Self::unpaged(Vec::new())),
                other => {
                    return Err(AppError::DecodeError(format!(
                        "expected a list, got {}",
                        kind_of(&other)
                    )))
                }
            }
        }

        Err(AppError::DecodeError(
            "list payload nested too deeply".to_string(),
        ))
    }
}

/// `body.data.data ?? body.data ?? body` for single-object payloads.
pub fn unwrap_data(value: Value) -> Value {
    let mut current = value;
    for _ in 0..MAX_WRAPPER_DEPTH {
        match current {
            Value::Object(mut map) if map.contains_key("data") => {
                let inner = map.remove("data").unwrap_or(Value::Null);
                if inner.is_null() {
                    return Value::Object(map);
                }
                current = inner;
            }
            other => return other,
        }
    }
    current
}

pub fn decode_object<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    Ok(serde_json::from_value(unwrap_data(value))?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[test]
    fn test_plain_array() {
        let listing: Listing<Item> = Listing::from_value(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(listing.items, vec![Item { id: 1 }, Item { id: 2 }]);
        assert!(listing.page.is_none());
        assert_eq!(listing.total(), 2);
    }

    #[test]
    fn test_paginated_envelope() {
        let listing: Listing<Item> = Listing::from_value(json!({
            "data": [{"id": 11}],
            "current_page": 2,
            "last_page": 5,
            "per_page": 10,
            "total": 41,
            "from": 11,
            "to": 11
        }))
        .unwrap();

        let page = listing.page.clone().unwrap();
        assert_eq!(listing.items, vec![Item { id: 11 }]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total, 41);
        assert_eq!(page.from, Some(11));
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(listing.total(), 41);
    }

    #[test]
    fn test_wrapped_paginated_envelope() {
        let listing: Listing<Item> = Listing::from_value(json!({
            "data": {"data": [{"id": 3}], "current_page": 1, "last_page": 1, "per_page": 10, "total": 1, "from": null, "to": null}
        }))
        .unwrap();

        assert_eq!(listing.items, vec![Item { id: 3 }]);
        assert_eq!(listing.page.unwrap().from, None);
    }

    #[test]
    fn test_wrapped_array() {
        let listing: Listing<Item> = Listing::from_value(json!({"data": [{"id": 7}]})).unwrap();
        assert_eq!(listing.items, vec![Item { id: 7 }]);
    }

    #[test]
    fn test_object_without_data_is_rejected() {
        let result: AppResult<Listing<Item>> = Listing::from_value(json!({"id": 1}));
        assert!(matches!(result, Err(AppError::DecodeError(_))));
    }

    #[test]
    fn test_null_is_empty() {
        let listing: Listing<Item> = Listing::from_value(Value::Null).unwrap();
        assert!(listing.items.is_empty());
    }

    #[test]
    fn test_unwrap_data_for_objects() {
        assert_eq!(unwrap_data(json!({"data": {"data": {"id": 1}}})), json!({"id": 1}));
        assert_eq!(unwrap_data(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_data(json!({"id": 1})), json!({"id": 1}));

        let item: Item = decode_object(json!({"data": {"id": 9}})).unwrap();
        assert_eq!(item, Item { id: 9 });
    }
}
