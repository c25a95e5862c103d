//! Flat, comparable snapshots of tracked objects.
//!
//! A snapshot maps property paths to rendered values. Nested objects extend the
//! path with `.` (`subfields.name`), collection members with `/` and an index or
//! key (`members/0`, `items/1.name`, `roles/admin`). Every entry remembers the
//! type that owns the property so field policies can be applied per owner.
//!
//! Absent values are simply not part of the snapshot.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use crate::errors::CoreError;

/// A domain object the audit log can describe.
pub trait Trackable {
    /// Registry name of the concrete type.
    fn type_name(&self) -> &str;

    /// Current state as a flat snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the state cannot be captured.
    fn snapshot(&self) -> Result<Snapshot, CoreError>;

    /// Human-readable name of the entity, if the type has one.
    fn entity_name(&self) -> Option<String> {
        None
    }
}

/// One rendered property of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Full path, e.g. `subfieldsCollection/0.shouldMask`.
    pub path: String,
    /// Path of the object this property belongs to; empty for the root.
    pub group: String,
    /// Bare property name used for policy lookups, e.g. `shouldMask`.
    pub property: String,
    /// Registry name of the owning type, when known.
    pub owner: Option<String>,
    pub value: String,
}

/// Path-keyed snapshot of one object graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Start a snapshot for an object of the given registered type.
    pub fn builder(type_name: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder::root(Some(type_name.into()))
    }

    /// Build a snapshot from any serializable value.
    ///
    /// Top-level properties are owned by `type_name`. Nested JSON objects have no
    /// registered owner and fall back to the default field policy.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if serialization fails or the value is not a
    /// JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(
        type_name: &str,
        value: &T,
    ) -> Result<Self, CoreError> {
        let json = serde_json::to_value(value)?;
        Self::from_json(type_name, &json)
    }

    /// Build a snapshot from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Snapshot` if `value` is not a JSON object.
    pub fn from_json(type_name: &str, value: &Value) -> Result<Self, CoreError> {
        let Value::Object(map) = value else {
            return Err(CoreError::Snapshot(format!(
                "snapshot of '{type_name}' must be a JSON object"
            )));
        };
        let mut builder = Self::builder(type_name);
        for (name, value) in map {
            builder.push_json(name, name, value);
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&SnapshotEntry> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.values()
    }
}

/// Incremental builder for a [`Snapshot`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    owner: Option<String>,
    prefix: String,
    entries: Vec<SnapshotEntry>,
}

impl SnapshotBuilder {
    const fn root(owner: Option<String>) -> Self {
        Self {
            owner,
            prefix: String::new(),
            entries: Vec::new(),
        }
    }

    fn child(&self, segment: &str, owner: Option<String>) -> Self {
        Self {
            owner,
            prefix: format!("{}{segment}.", self.prefix),
            entries: Vec::new(),
        }
    }

    fn group(&self) -> String {
        self.prefix.trim_end_matches('.').to_string()
    }

    fn push(&mut self, segment: &str, property: &str, value: String) {
        let entry = SnapshotEntry {
            path: format!("{}{segment}", self.prefix),
            group: self.group(),
            property: property.to_string(),
            owner: self.owner.clone(),
            value,
        };
        self.entries.push(entry);
    }

    fn absorb(&mut self, child: Self) {
        self.entries.extend(child.entries);
    }

    /// Scalar property, rendered with `Display`.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.push(name, name, value.to_string());
        self
    }

    /// Scalar property that may be absent.
    #[must_use]
    pub fn optional<V: Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Ordered collection of scalars, one entry per element (`name/0`, `name/1`, ...).
    #[must_use]
    pub fn list<I, V>(mut self, name: &str, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for (index, item) in items.into_iter().enumerate() {
            self.push(&format!("{name}/{index}"), name, item.to_string());
        }
        self
    }

    /// Keyed collection of scalars, one entry per key (`name/<key>`).
    #[must_use]
    pub fn keyed<I, K, V>(mut self, name: &str, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        for (key, item) in items {
            self.push(&format!("{name}/{key}"), name, item.to_string());
        }
        self
    }

    /// Nested object owned by `type_name`.
    #[must_use]
    pub fn nested<F>(mut self, name: &str, type_name: &str, build: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let child = build(self.child(name, Some(type_name.to_string())));
        self.absorb(child);
        self
    }

    /// Ordered collection of nested objects (`name/0.field`, `name/1.field`, ...).
    #[must_use]
    pub fn nested_list<I, T, F>(mut self, name: &str, type_name: &str, items: I, build: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for (index, item) in items.into_iter().enumerate() {
            let segment = format!("{name}/{index}");
            let child = build(self.child(&segment, Some(type_name.to_string())), item);
            self.absorb(child);
        }
        self
    }

    fn push_json(&mut self, segment: &str, property: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::Bool(flag) => self.push(segment, property, flag.to_string()),
            Value::Number(number) => self.push(segment, property, number.to_string()),
            Value::String(text) => self.push(segment, property, text.clone()),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let element = format!("{segment}/{index}");
                    if let Value::Object(map) = item {
                        let mut child = self.child(&element, None);
                        for (name, value) in map {
                            child.push_json(name, name, value);
                        }
                        self.absorb(child);
                    } else {
                        self.push_json(&element, property, item);
                    }
                }
            }
            Value::Object(map) => {
                let mut child = self.child(segment, None);
                for (name, value) in map {
                    child.push_json(name, name, value);
                }
                self.absorb(child);
            }
        }
    }

    #[must_use]
    pub fn build(self) -> Snapshot {
        let entries = self
            .entries
            .into_iter()
            .map(|entry| (entry.path.clone(), entry))
            .collect();
        Snapshot { entries }
    }
}
