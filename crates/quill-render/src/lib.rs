//! # quill-render
//!
//! Turns an [`EntryCreationContext`](quill_core::EntryCreationContext) into the
//! text of one audit entry.
//!
//! - [`classify`] decides per changed property whether it is ignored, masked or shown
//! - [`diff`] compares two snapshots into ordered property changes
//! - [`resolve`] derives entity name and labels from the context
//! - [`format`] builds the header line and the diff block

pub mod classify;
pub mod diff;
pub mod format;
pub mod resolve;

pub use classify::{Classification, FieldClassifier};
pub use diff::{ChangeKind, PropertyChange};
pub use format::{EntryGenerator, RenderedEntry};
