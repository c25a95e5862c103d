//! Per-type field policies and the registry that resolves them.
//!
//! Each domain module registers a [`TypeDescriptor`] for every type it wants
//! audited: an optional [`FieldPolicy`], the fields it declares (with a secret
//! marker for encrypted content) and an optional parent type. Lookups walk the
//! parent chain, so a derived type inherits both the policy and the field
//! declarations of its ancestors.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

/// Policy applied to the changed fields of one tracked type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Labels attached to every entry for this type, in declaration order.
    pub labels: Vec<String>,
    pub masked_fields: BTreeSet<String>,
    pub ignored_fields: BTreeSet<String>,
    /// Mask fields whose names look sensitive. On unless switched off.
    pub auto_mask: bool,
    /// Never create entries for this type.
    pub ignore_entirely: bool,
}

/// Policy used when a type declares none: nothing ignored, nothing masked,
/// auto-masking on.
pub static DEFAULT_POLICY: FieldPolicy = FieldPolicy {
    labels: Vec::new(),
    masked_fields: BTreeSet::new(),
    ignored_fields: BTreeSet::new(),
    auto_mask: true,
    ignore_entirely: false,
};

impl Default for FieldPolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl FieldPolicy {
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn masking<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.masked_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn ignoring<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn without_auto_mask(mut self) -> Self {
        self.auto_mask = false;
        self
    }

    #[must_use]
    pub const fn ignored_entirely(mut self) -> Self {
        self.ignore_entirely = true;
        self
    }

    #[must_use]
    pub fn ignores(&self, field: &str) -> bool {
        self.ignored_fields.contains(field)
    }

    #[must_use]
    pub fn masks(&self, field: &str) -> bool {
        self.masked_fields.contains(field)
    }
}

/// A field declared by a tracked type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// The field holds ciphered or encrypted content.
    pub secret: bool,
}

impl FieldDescriptor {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: false,
        }
    }

    pub fn secret(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: true,
        }
    }
}

/// Registration record for one tracked type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    parent: Option<String>,
    policy: Option<FieldPolicy>,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            policy: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields<I: IntoIterator<Item = FieldDescriptor>>(mut self, fields: I) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[must_use]
    pub const fn declared_policy(&self) -> Option<&FieldPolicy> {
        self.policy.as_ref()
    }

    #[must_use]
    pub fn declared_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Mapping from type name to its registration, populated at startup.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any earlier registration under the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        let replaced = self.types.insert(descriptor.name.clone(), descriptor);
        if let Some(previous) = &replaced {
            warn!(type_name = %previous.name, "audit type registered twice, keeping the later one");
        }
        replaced
    }

    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The type itself followed by its registered ancestors, nearest first.
    ///
    /// Parent cycles terminate after visiting every registered type once.
    pub fn ancestry<'a>(
        &'a self,
        type_name: &str,
    ) -> impl Iterator<Item = &'a TypeDescriptor> + use<'a> {
        let mut next = self.types.get(type_name);
        let mut remaining = self.types.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let current = next?;
            next = current.parent.as_deref().and_then(|parent| self.types.get(parent));
            Some(current)
        })
    }

    /// Effective policy for a type: its own, else the nearest ancestor's, else
    /// [`DEFAULT_POLICY`]. An unknown or absent type resolves to the default.
    #[must_use]
    pub fn policy_for(&self, type_name: Option<&str>) -> &FieldPolicy {
        type_name
            .and_then(|name| {
                self.ancestry(name)
                    .find_map(TypeDescriptor::declared_policy)
            })
            .unwrap_or(&DEFAULT_POLICY)
    }

    /// Find the declaration of `field`, searching the type and then its ancestors.
    #[must_use]
    pub fn find_field(&self, type_name: &str, field: &str) -> Option<&FieldDescriptor> {
        self.ancestry(type_name)
            .find_map(|descriptor| descriptor.declared_field(field))
    }
}
