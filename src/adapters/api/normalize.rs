//! Response envelope normalization.
//!
//! The backend wraps payloads inconsistently across endpoints
//! (`{data: {products: [..]}}`, `{products: [..]}`, `{data: [..]}`, bare
//! arrays). These adapters turn every known shape into one internal
//! representation; an unknown shape degrades to an empty collection with a
//! logged warning instead of failing the screen.

use crate::domain::DomainError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Fallback when a non-success response carries no usable message.
pub const GENERIC_ERROR: &str = "Something went wrong";

/// Extract the list under `key` from any of the known envelopes.
///
/// Returns an empty list (with a warning) when no array is found in a known
/// position; returns Decode only when an array was found but its records do
/// not deserialize.
pub fn extract_list<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>, DomainError> {
    let found = find_list(&body, key);
    let Some(items) = found else {
        warn!(key, shape = %shape_of(&body), "no list in response; falling back to empty");
        return Ok(Vec::new());
    };
    serde_json::from_value(Value::Array(items.clone()))
        .map_err(|e| DomainError::Decode(format!("{} records: {}", key, e)))
}

fn find_list<'a>(body: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    // Bare array.
    if let Value::Array(items) = body {
        return Some(items);
    }
    // {key: [..]}
    if let Some(Value::Array(items)) = body.get(key) {
        return Some(items);
    }
    // {data: [..]} or {data: {key: [..]}}
    match body.get("data") {
        Some(Value::Array(items)) => Some(items),
        Some(data) => match data.get(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        None => None,
    }
}

/// Extract the single object under `key` from any of the known envelopes,
/// falling back to treating the whole body as the object.
pub fn extract_item<T: DeserializeOwned>(body: Value, key: &str) -> Result<T, DomainError> {
    let candidate = body
        .get(key)
        .filter(|v| v.is_object())
        .or_else(|| body.get("data").and_then(|d| d.get(key)).filter(|v| v.is_object()))
        .or_else(|| body.get("data").filter(|v| v.is_object()))
        .cloned()
        .unwrap_or(body);

    serde_json::from_value(candidate).map_err(|e| DomainError::Decode(format!("{}: {}", key, e)))
}

/// Pull a human-readable message from an error body (`message` or `msg`),
/// defaulting to a generic one.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

fn shape_of(body: &Value) -> &'static str {
    match body {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use serde_json::json;

    fn product_json(id: &str) -> Value {
        json!({
            "_id": id,
            "sku": "SKU-1",
            "slug": "apples",
            "name": "Apples",
            "basePrice": 12.5,
            "packOptions": [{"unit": "kg", "quantity": 5, "price": 55.0}],
            "stock": {"level": 10, "status": "in_stock"},
        })
    }

    #[test]
    fn test_extract_list_nested_data_envelope() {
        let body = json!({"data": {"products": [product_json("p1")]}});
        let products: Vec<Product> = extract_list(body, "products").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p1");
    }

    #[test]
    fn test_extract_list_keyed_envelope() {
        let body = json!({"products": [product_json("p1"), product_json("p2")]});
        let products: Vec<Product> = extract_list(body, "products").unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_extract_list_bare_array() {
        let body = json!([product_json("p1")]);
        let products: Vec<Product> = extract_list(body, "products").unwrap();
        assert_eq!(products[0].id, "p1");
    }

    #[test]
    fn test_extract_list_data_array() {
        let body = json!({"data": [product_json("p9")]});
        let products: Vec<Product> = extract_list(body, "products").unwrap();
        assert_eq!(products[0].id, "p9");
    }

    #[test]
    fn test_all_known_shapes_normalize_identically() {
        let shapes = [
            json!({"data": {"products": [product_json("x")]}}),
            json!({"products": [product_json("x")]}),
            json!([product_json("x")]),
        ];
        for body in shapes {
            let products: Vec<Product> = extract_list(body, "products").unwrap();
            assert_eq!(products.len(), 1);
            assert_eq!(products[0].id, "x");
        }
    }

    #[test]
    fn test_unknown_shape_falls_back_to_empty() {
        let body = json!({"unexpected": true});
        let products: Vec<Product> = extract_list(body, "products").unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_malformed_records_surface_decode_error() {
        let body = json!({"products": [{"_id": "p1"}]});
        let result: Result<Vec<Product>, _> = extract_list(body, "products");
        assert!(matches!(result, Err(DomainError::Decode(_))));
    }

    #[test]
    fn test_extract_item_shapes() {
        let wrapped = json!({"product": product_json("a")});
        let nested = json!({"data": {"product": product_json("a")}});
        let bare = product_json("a");
        for body in [wrapped, nested, bare] {
            let product: Product = extract_item(body, "product").unwrap();
            assert_eq!(product.id, "a");
        }
    }

    #[test]
    fn test_error_message_prefers_message_then_msg() {
        assert_eq!(error_message(r#"{"message": "bad slug"}"#), "bad slug");
        assert_eq!(error_message(r#"{"msg": "nope"}"#), "nope");
        assert_eq!(error_message(r#"{"error": 1}"#), GENERIC_ERROR);
        assert_eq!(error_message("not json"), GENERIC_ERROR);
    }
}
