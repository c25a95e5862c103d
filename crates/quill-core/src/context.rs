//! The context a domain event hands to the audit log.

use crate::enums::Action;
use crate::errors::CoreError;
use crate::snapshot::{Snapshot, Trackable};

/// Captured state of one tracked object at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedState {
    pub type_name: String,
    pub snapshot: Snapshot,
    pub entity_name: Option<String>,
}

impl TrackedState {
    /// Capture the current state of a tracked object.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the object's snapshot cannot be built.
    pub fn capture<T: Trackable + ?Sized>(object: &T) -> Result<Self, CoreError> {
        Ok(Self {
            type_name: object.type_name().to_string(),
            snapshot: object.snapshot()?,
            entity_name: object.entity_name(),
        })
    }
}

/// Which states an event carries. Both sides absent is not representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Created(TrackedState),
    Modified {
        previous: TrackedState,
        current: TrackedState,
    },
    Deleted(TrackedState),
}

/// Everything needed to create one audit entry. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCreationContext {
    change: StateChange,
    entity: Option<String>,
    additional_labels: Vec<String>,
}

impl EntryCreationContext {
    #[must_use]
    pub const fn new(change: StateChange) -> Self {
        Self {
            change,
            entity: None,
            additional_labels: Vec::new(),
        }
    }

    #[must_use]
    pub const fn created(current: TrackedState) -> Self {
        Self::new(StateChange::Created(current))
    }

    #[must_use]
    pub const fn modified(previous: TrackedState, current: TrackedState) -> Self {
        Self::new(StateChange::Modified { previous, current })
    }

    #[must_use]
    pub const fn deleted(previous: TrackedState) -> Self {
        Self::new(StateChange::Deleted(previous))
    }

    /// Build from optional before/after states.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when both states are absent.
    pub fn from_states(
        previous: Option<TrackedState>,
        current: Option<TrackedState>,
    ) -> Result<Self, CoreError> {
        match (previous, current) {
            (None, Some(current)) => Ok(Self::created(current)),
            (Some(previous), None) => Ok(Self::deleted(previous)),
            (Some(previous), Some(current)) => Ok(Self::modified(previous, current)),
            (None, None) => Err(CoreError::Validation(
                "an audit entry needs a previous or a new state".into(),
            )),
        }
    }

    /// Override the entity name derived from the tracked object.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.additional_labels.push(label.into());
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_labels
            .extend(labels.into_iter().map(Into::into));
        self
    }

    /// Absent previous state means creation, absent new state means deletion.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self.change {
            StateChange::Created(_) => Action::Created,
            StateChange::Modified { .. } => Action::Modified,
            StateChange::Deleted(_) => Action::Deleted,
        }
    }

    #[must_use]
    pub const fn previous(&self) -> Option<&TrackedState> {
        match &self.change {
            StateChange::Created(_) => None,
            StateChange::Modified { previous, .. } | StateChange::Deleted(previous) => {
                Some(previous)
            }
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&TrackedState> {
        match &self.change {
            StateChange::Created(current) | StateChange::Modified { current, .. } => Some(current),
            StateChange::Deleted(_) => None,
        }
    }

    /// The object entity name and labels are derived from: the new state when
    /// present, else the previous one.
    #[must_use]
    pub const fn resolved_object(&self) -> &TrackedState {
        match &self.change {
            StateChange::Created(current) | StateChange::Modified { current, .. } => current,
            StateChange::Deleted(previous) => previous,
        }
    }

    #[must_use]
    pub fn explicit_entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    #[must_use]
    pub fn additional_labels(&self) -> &[String] {
        &self.additional_labels
    }
}
