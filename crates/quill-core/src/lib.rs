//! # quill-core
//!
//! Core types shared across all Quill crates.
//!
//! This crate provides the foundational pieces every other crate builds on:
//! - The audit `Action` enum and the persisted `LogEntry`
//! - Per-type field policies and the type registry that resolves them
//! - Flat, comparable snapshots of tracked objects
//! - The `EntryCreationContext` handed in by domain events
//! - The `AuditLogFilterContext` used by read queries
//! - Permission collaborators and cross-cutting error types

pub mod context;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod filter;
pub mod identity;
pub mod policy;
pub mod snapshot;

pub use context::{EntryCreationContext, StateChange, TrackedState};
pub use entities::LogEntry;
pub use enums::Action;
pub use errors::{AuthorizationError, CoreError};
pub use filter::AuditLogFilterContext;
pub use identity::{PermissionChecker, StaticPermission};
pub use policy::{FieldDescriptor, FieldPolicy, TypeDescriptor, TypeRegistry};
pub use snapshot::{Snapshot, SnapshotBuilder, SnapshotEntry, Trackable};
