//! Cache key derivation.
//!
//! A key is the bare resource name, `resource:{canonical params}` for a query,
//! or `resource:id` for a single record. Parameters are canonicalized by
//! sorting them by name and serializing them as a JSON object, so the same
//! logical query always maps to the same key.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a whole resource with no parameters.
    pub fn resource(resource: &str) -> Self {
        Self(resource.to_string())
    }

    /// Key for one record of a resource.
    pub fn record(resource: &str, id: impl fmt::Display) -> Self {
        Self(format!("{}:{}", resource, id))
    }

    /// Key for a parameterized query. `None` fields are dropped and an empty
    /// parameter set collapses to the bare resource name.
    pub fn with_params<P>(resource: &str, params: &P) -> Result<Self, CacheError>
    where
        P: Serialize + ?Sized,
    {
        let canonical: BTreeMap<String, Value> = match serde_json::to_value(params)? {
            Value::Null => BTreeMap::new(),
            Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
            other => {
                return Err(CacheError::Serialization(format!(
                    "query parameters must be an object, got {}",
                    other
                )));
            }
        };

        if canonical.is_empty() {
            return Ok(Self::resource(resource));
        }

        Ok(Self(format!(
            "{}:{}",
            resource,
            serde_json::to_string(&canonical)?
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `build_key(resource, params?)`: bare resource when `params` is absent.
pub fn build_key<P>(resource: &str, params: Option<&P>) -> Result<CacheKey, CacheError>
where
    P: Serialize + ?Sized,
{
    match params {
        Some(params) => CacheKey::with_params(resource, params),
        None => Ok(CacheKey::resource(resource)),
    }
}

/// `resource*`: matches every key that begins with the resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationPattern(String);

impl InvalidationPattern {
    pub fn new(resource: &str) -> Self {
        Self(resource.to_string())
    }

    /// The literal prefix, without the trailing `*`.
    pub fn prefix(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(&self.0)
    }
}

impl fmt::Display for InvalidationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct ListQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        page: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    }

    #[test]
    fn test_absent_params_yield_bare_resource() {
        let key = build_key::<ListQuery>("products", None).unwrap();
        assert_eq!(key.as_str(), "products");
    }

    #[test]
    fn test_empty_params_collapse_to_bare_resource() {
        let empty = ListQuery {
            page: None,
            status: None,
        };
        assert_eq!(CacheKey::with_params("products", &empty).unwrap().as_str(), "products");
        assert_eq!(
            CacheKey::with_params("products", &json!({})).unwrap().as_str(),
            "products"
        );
        assert_eq!(
            CacheKey::with_params("products", &json!({ "title": null })).unwrap().as_str(),
            "products"
        );
    }

    #[test]
    fn test_params_are_sorted_by_name() {
        let query = ListQuery {
            page: Some(2),
            status: Some("draft".to_string()),
        };
        let key = CacheKey::with_params("products", &query).unwrap();
        assert_eq!(key.as_str(), r#"products:{"page":2,"status":"draft"}"#);
    }

    #[test]
    fn test_record_key() {
        assert_eq!(CacheKey::record("products", 42).as_str(), "products:42");
    }

    #[test]
    fn test_non_object_params_are_rejected() {
        assert!(CacheKey::with_params("products", &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_pattern_matches_every_key_of_resource() {
        let pattern = InvalidationPattern::new("products");
        assert_eq!(pattern.to_string(), "products*");
        assert!(pattern.matches("products"));
        assert!(pattern.matches("products:42"));
        assert!(pattern.matches(r#"products:{"page":2}"#));
        assert!(!pattern.matches("users:42"));
    }

    proptest! {
        #[test]
        fn test_key_is_independent_of_insertion_order(
            params in prop::collection::vec(("[a-z_]{1,8}", "[a-z0-9]{0,6}"), 0..8)
        ) {
            let forward: serde_json::Map<String, Value> = params
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let backward: serde_json::Map<String, Value> = params
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();

            // Duplicate names resolve to different values depending on order
            let mut names: Vec<&String> = params.iter().map(|(k, _)| k).collect();
            names.sort();
            names.dedup();
            prop_assume!(names.len() == params.len());

            let a = CacheKey::with_params("products", &forward).unwrap();
            let b = CacheKey::with_params("products", &backward).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_every_derived_key_matches_its_resource_pattern(
            resource in "[a-z]{1,10}",
            page in 1u32..500,
        ) {
            let key = CacheKey::with_params(&resource, &json!({ "page": page })).unwrap();
            prop_assert!(InvalidationPattern::new(&resource).matches(key.as_str()));
            prop_assert!(InvalidationPattern::new(&resource).matches(CacheKey::record(&resource, page).as_str()));
        }
    }
}
