//! The flat, reference-keyed object graph that a relay store page hydrates from.
//!
//! Every entry of a [`FlatStore`] is a fragment: a JSON object with a
//! `__typename` and arbitrary fields. Fragments point at one another through
//! `{"__ref": key}` and `{"__refs": [key, ...]}` values instead of nesting.
//! Lookups that miss are `None`, never an error, because the upstream store
//! is not guaranteed to be internally consistent.

use std::fmt;

use serde_json::{Map, Value};

const TYPENAME_FIELD: &str = "__typename";
const REF_FIELD: &str = "__ref";
const REFS_FIELD: &str = "__refs";

/// Opaque, site-assigned key of a fragment, e.g. `Teacher-123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey(String);

impl ReferenceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Borrowed view of one fragment with typed, absence-tolerant accessors.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Fragment<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    pub fn typename(&self) -> Option<&'a str> {
        self.str_field(TYPENAME_FIELD)
    }

    pub fn is_type(&self, typename: &str) -> bool {
        self.typename() == Some(typename)
    }

    /// A string field. `null` and non-string values count as absent.
    pub fn str_field(&self, name: &str) -> Option<&'a str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    pub fn u64_field(&self, name: &str) -> Option<u64> {
        self.field(name).and_then(Value::as_u64)
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    /// The key of a `{"__ref": key}` field.
    pub fn ref_field(&self, name: &str) -> Option<ReferenceKey> {
        self.field(name)?
            .get(REF_FIELD)?
            .as_str()
            .map(ReferenceKey::new)
    }

    /// The keys of a `{"__refs": [...]}` field, in listed order. Non-string
    /// entries are dropped; a missing field is an empty list.
    pub fn ref_list_field(&self, name: &str) -> Vec<ReferenceKey> {
        self.field(name)
            .and_then(|value| value.get(REFS_FIELD))
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(ReferenceKey::new)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Mapping from reference key to fragment, in upstream payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatStore {
    entries: Map<String, Value>,
}

impl FlatStore {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the fragment a reference points at. A dangling reference, or
    /// one that points at something other than an object, is `None`.
    pub fn resolve(&self, key: &ReferenceKey) -> Option<Fragment<'_>> {
        self.entries
            .get(key.as_str())
            .and_then(Value::as_object)
            .map(Fragment::new)
    }

    /// Follows a `__ref` field of `fragment` in one step.
    pub fn resolve_field<'s>(&'s self, fragment: &Fragment<'_>, name: &str) -> Option<Fragment<'s>> {
        fragment.ref_field(name).and_then(|key| self.resolve(&key))
    }

    /// All object-valued entries, in payload order.
    pub fn fragments(&self) -> impl Iterator<Item = (ReferenceKey, Fragment<'_>)> {
        self.entries.iter().filter_map(|(key, value)| {
            value
                .as_object()
                .map(|fields| (ReferenceKey::new(key.as_str()), Fragment::new(fields)))
        })
    }

    pub fn fragments_of_type<'s>(
        &'s self,
        typename: &'s str,
    ) -> impl Iterator<Item = (ReferenceKey, Fragment<'s>)> + 's {
        self.fragments()
            .filter(move |(_, fragment)| fragment.is_type(typename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(value: Value) -> FlatStore {
        match value {
            Value::Object(entries) => FlatStore::new(entries),
            other => panic!("test store must be an object, got {other}"),
        }
    }

    #[test]
    fn resolve_finds_fragment_by_key() {
        let store = store(json!({"School-1": {"__typename": "School", "name": "Acme U"}}));
        let school = store.resolve(&ReferenceKey::new("School-1")).unwrap();
        assert!(school.is_type("School"));
        assert_eq!(school.str_field("name"), Some("Acme U"));
    }

    #[test]
    fn dangling_and_scalar_entries_do_not_resolve() {
        let store = store(json!({"Odd-1": 42}));
        assert!(store.resolve(&ReferenceKey::new("Odd-1")).is_none());
        assert!(store.resolve(&ReferenceKey::new("Missing-1")).is_none());
        assert_eq!(store.fragments().count(), 0);
    }

    #[test]
    fn ref_accessors_read_ref_shapes() {
        let store = store(json!({
            "Teacher-1": {
                "school": {"__ref": "School-1"},
                "courseCodes": {"__refs": ["Course-1", 7, "Course-2"]},
                "department": null
            }
        }));
        let teacher = store.resolve(&ReferenceKey::new("Teacher-1")).unwrap();
        assert_eq!(teacher.ref_field("school"), Some(ReferenceKey::new("School-1")));
        assert_eq!(
            teacher.ref_list_field("courseCodes"),
            vec![ReferenceKey::new("Course-1"), ReferenceKey::new("Course-2")]
        );
        assert!(teacher.ref_field("department").is_none());
        assert!(teacher.ref_list_field("ratings").is_empty());
        assert!(teacher.str_field("department").is_none());
    }

    #[test]
    fn mistyped_scalar_reads_as_absent() {
        let store = store(json!({
            "School-1": {"legacyId": "1302", "name": 7, "numRatings": -3, "flag": "yes"}
        }));
        let school = store.resolve(&ReferenceKey::new("School-1")).unwrap();
        assert!(school.u64_field("legacyId").is_none());
        assert!(school.str_field("name").is_none());
        assert!(school.u64_field("numRatings").is_none());
        assert_eq!(school.i64_field("numRatings"), Some(-3));
        assert!(school.bool_field("flag").is_none());
    }

    #[test]
    fn fragments_keep_payload_order() {
        let store = store(json!({
            "Teacher-9": {"__typename": "Teacher"},
            "School-1": {"__typename": "School"},
            "Teacher-2": {"__typename": "Teacher"}
        }));
        let keys: Vec<_> = store
            .fragments_of_type("Teacher")
            .map(|(key, _)| key.to_string())
            .collect();
        assert_eq!(keys, vec!["Teacher-9", "Teacher-2"]);
    }
}
