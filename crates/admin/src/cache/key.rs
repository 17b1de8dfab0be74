//! Cache key generation for list queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a cached list: the query name plus its variables in canonical
/// form.
///
/// Variables are serialized to JSON with object keys sorted at every level, so
/// two structurally equal variable values always produce the same key no
/// matter how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQueryKey {
    query: String,
    variables: String,
}

impl ListQueryKey {
    /// Build the key for `query` fetched with `variables`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variables cannot be serialized to JSON.
    pub fn new<V: Serialize>(query: &str, variables: &V) -> Result<Self, serde_json::Error> {
        let value = canonicalize(serde_json::to_value(variables)?);
        Ok(Self {
            query: query.to_string(),
            variables: serde_json::to_string(&value)?,
        })
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Canonical JSON of the variables.
    #[must_use]
    pub fn variables(&self) -> &str {
        &self.variables
    }
}

impl std::fmt::Display for ListQueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.query, self.variables)
    }
}

/// Rebuild every object with its keys inserted in sorted order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct SkipFirst {
        skip: u32,
        take: u32,
    }

    #[derive(Serialize)]
    struct TakeFirst {
        take: u32,
        skip: u32,
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let a = ListQueryKey::new("findManyPromocode", &SkipFirst { skip: 20, take: 20 }).unwrap();
        let b = ListQueryKey::new("findManyPromocode", &TakeFirst { take: 20, skip: 20 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let key = ListQueryKey::new(
            "findManyPromocode",
            &json!({"where": {
                "delete": {"equals": false},
                "code": {"mode": "insensitive", "contains": "a"}
            }}),
        )
        .unwrap();
        assert_eq!(
            key.variables(),
            r#"{"where":{"code":{"contains":"a","mode":"insensitive"},"delete":{"equals":false}}}"#
        );
    }

    #[test]
    fn test_different_variables_different_keys() {
        let page1 = ListQueryKey::new("findManyPromocode", &json!({"skip": 0})).unwrap();
        let page2 = ListQueryKey::new("findManyPromocode", &json!({"skip": 20})).unwrap();
        assert_ne!(page1, page2);
    }

    #[test]
    fn test_query_name_is_part_of_key() {
        let promocodes = ListQueryKey::new("findManyPromocode", &json!({})).unwrap();
        let products = ListQueryKey::new("findManyProduct", &json!({})).unwrap();
        assert_ne!(promocodes, products);
    }

    #[test]
    fn test_array_order_is_preserved() {
        let key = ListQueryKey::new("q", &json!({"orderBy": [{"b": 1}, {"a": 2}]})).unwrap();
        assert_eq!(key.variables(), r#"{"orderBy":[{"b":1},{"a":2}]}"#);
    }
}
