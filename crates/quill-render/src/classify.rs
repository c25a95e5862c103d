//! Field classification: ignored, explicitly masked, auto-masked.
//!
//! Every answer is a pure function of the registry and the (owner type,
//! property) pair. An unknown or absent owner resolves to the default policy:
//! nothing ignored, nothing masked, auto-masking on.

use quill_core::TypeRegistry;
use tracing::debug;

use crate::diff::PropertyChange;

/// Lower-cased substrings that make a property name look sensitive.
pub const AUTO_MASK_VOCABULARY: [&str; 7] =
    ["password", "pw", "pwd", "token", "secret", "key", "private"];

/// Placeholder rendered instead of a masked value.
pub const MASK: &str = "********";

/// How one changed property is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Ignored,
    Masked,
    Visible,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldClassifier<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> FieldClassifier<'a> {
    #[must_use]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn is_ignored(&self, owner: Option<&str>, property: &str) -> bool {
        self.registry.policy_for(owner).ignores(property)
    }

    /// Listed in the policy's masked fields, or declared as holding secret content
    /// by the owner type or one of its ancestors.
    #[must_use]
    pub fn is_explicitly_masked(&self, owner: Option<&str>, property: &str) -> bool {
        if self.registry.policy_for(owner).masks(property) {
            return true;
        }
        let Some(owner) = owner else {
            return false;
        };
        if let Some(field) = self.registry.find_field(owner, property) {
            field.secret
        } else {
            debug!(owner, property, "no field declaration found, not treated as secret");
            false
        }
    }

    #[must_use]
    pub fn is_auto_masked(&self, owner: Option<&str>, property: &str) -> bool {
        if !self.registry.policy_for(owner).auto_mask {
            return false;
        }
        let name = property.to_lowercase();
        AUTO_MASK_VOCABULARY
            .iter()
            .any(|sensitive| name.contains(sensitive))
    }

    /// Ignoring wins over masking; an ignored property never produces a line.
    #[must_use]
    pub fn classify(&self, change: &PropertyChange) -> Classification {
        let owner = change.owner.as_deref();
        if self.is_ignored(owner, &change.property) {
            Classification::Ignored
        } else if self.is_explicitly_masked(owner, &change.property)
            || self.is_auto_masked(owner, &change.property)
        {
            Classification::Masked
        } else {
            Classification::Visible
        }
    }
}
