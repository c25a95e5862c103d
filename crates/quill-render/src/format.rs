//! Entry text: header line plus optional diff block.
//!
//! ```text
//! 2023-11-14T22:13:20Z [MODIFIED] 'trillian' modified repository 'HeartOfGold'
//! Diff:
//!   - 'contact' changed: 'a@x.com' -> 'b@x.com'
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use quill_core::{Action, EntryCreationContext, TypeRegistry};
use tracing::debug;

use crate::classify::{Classification, FieldClassifier, MASK};
use crate::diff::diff;
use crate::resolve::{resolve_entity_name, resolve_labels};

/// Labels that route the entry to an entity rather than describe it, in the
/// precedence used for the `for <label> '<entity>'` suffix.
const ROUTING_LABELS: [&str; 4] = ["repository", "namespace", "group", "user"];

/// Everything the store needs to persist one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub timestamp: DateTime<Utc>,
    pub entity: String,
    pub username: Option<String>,
    pub action: Action,
    pub labels: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct EntryGenerator {
    registry: Arc<TypeRegistry>,
}

impl EntryGenerator {
    #[must_use]
    pub const fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Whether the tracked type's policy suppresses entries altogether.
    #[must_use]
    pub fn is_ignored_entirely(&self, ctx: &EntryCreationContext) -> bool {
        self.registry
            .policy_for(Some(&ctx.resolved_object().type_name))
            .ignore_entirely
    }

    /// Resolve entity, action and labels and render the entry.
    ///
    /// Returns `None` when nothing should be persisted: the type is ignored
    /// entirely, or every changed property is ignored.
    #[must_use]
    pub fn render_entry(
        &self,
        ctx: &EntryCreationContext,
        username: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Option<RenderedEntry> {
        let action = ctx.action();
        if self.is_ignored_entirely(ctx) {
            debug!(
                type_name = %ctx.resolved_object().type_name,
                %action,
                "type is excluded from the audit log"
            );
            return None;
        }

        let entity = resolve_entity_name(ctx);
        let labels = resolve_labels(ctx, &self.registry);
        let text = self.generate(ctx, timestamp, username, action, &entity, &labels);
        if text.is_empty() {
            debug!(%entity, %action, "only ignored fields changed, entry suppressed");
            return None;
        }

        Some(RenderedEntry {
            timestamp,
            entity,
            username: username.map(str::to_string),
            action,
            labels,
            text,
        })
    }

    /// Render the entry text. Empty when every changed property is ignored.
    #[must_use]
    pub fn generate(
        &self,
        ctx: &EntryCreationContext,
        timestamp: DateTime<Utc>,
        username: Option<&str>,
        action: Action,
        entity_name: &str,
        labels: &[String],
    ) -> String {
        let mut out = header(timestamp, username, action, entity_name, labels);
        if action == Action::Deleted {
            return out;
        }

        let classifier = FieldClassifier::new(&self.registry);
        let changes = diff(
            ctx.previous().map(|state| &state.snapshot),
            ctx.current().map(|state| &state.snapshot),
        );
        let classified: Vec<_> = changes
            .iter()
            .map(|change| (change, classifier.classify(change)))
            .collect();
        if classified
            .iter()
            .all(|(_, class)| *class == Classification::Ignored)
        {
            return String::new();
        }

        out.push_str("\nDiff:\n");
        for (change, class) in classified {
            match class {
                Classification::Ignored => {}
                Classification::Masked if action == Action::Modified => {
                    let _ = writeln!(out, "  - '{}' changed: {MASK}", change.path);
                }
                Classification::Masked => {
                    let _ = writeln!(out, "  - '{}' = {MASK}", change.path);
                }
                Classification::Visible => {
                    let _ = writeln!(out, "  - {}", change.render().replace('\n', "\n  "));
                }
            }
        }
        out
    }
}

fn header(
    timestamp: DateTime<Utc>,
    username: Option<&str>,
    action: Action,
    entity_name: &str,
    labels: &[String],
) -> String {
    let mut out = format!(
        "{} [{}] '{}' {} ",
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        action.as_tag(),
        username.unwrap_or("null"),
        action.as_str(),
    );

    if let [label] = labels {
        out.push_str(label);
        if !entity_name.is_empty() {
            let _ = write!(out, " '{entity_name}'");
        }
        return out;
    }

    let is_routing = |label: &str| {
        ROUTING_LABELS
            .iter()
            .any(|routing| routing.eq_ignore_ascii_case(label))
    };
    for label in labels.iter().filter(|label| !is_routing(label.as_str())) {
        out.push_str(label);
        out.push(' ');
    }
    let routed = ROUTING_LABELS.iter().find(|routing| {
        labels
            .iter()
            .any(|label| label.eq_ignore_ascii_case(routing))
    });
    if let Some(routing) = routed {
        let _ = write!(out, "for {routing} '{entity_name}'");
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use quill_core::{FieldDescriptor, FieldPolicy, Snapshot, TrackedState, TypeDescriptor};

    use super::*;

    const TS: &str = "2023-11-14T22:13:20Z";

    fn timestamp() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap()
    }

    fn registry() -> Arc<TypeRegistry> {
        Arc::new(
            TypeRegistry::new()
                .with(
                    TypeDescriptor::new("repository")
                        .policy(FieldPolicy::default().with_labels(["repository"])),
                )
                .with(
                    TypeDescriptor::new("ignored_fields")
                        .policy(FieldPolicy::default().ignoring(["name", "active"])),
                )
                .with(
                    TypeDescriptor::new("masked_fields")
                        .policy(FieldPolicy::default().masking(["shouldMask"])),
                )
                .with(
                    TypeDescriptor::new("secret_config")
                        .field(FieldDescriptor::secret("ciphered")),
                )
                .with(
                    TypeDescriptor::new("hidden")
                        .policy(FieldPolicy::default().ignored_entirely()),
                ),
        )
    }

    fn state(type_name: &str, snapshot: Snapshot) -> TrackedState {
        TrackedState {
            type_name: type_name.to_string(),
            snapshot,
            entity_name: None,
        }
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn deleted_ctx() -> EntryCreationContext {
        EntryCreationContext::deleted(state(
            "repository",
            Snapshot::builder("repository").field("name", "hog").build(),
        ))
    }

    #[test]
    fn modified_repository_end_to_end() {
        let ctx = EntryCreationContext::modified(
            state(
                "repository",
                Snapshot::builder("repository").field("contact", "a@x.com").build(),
            ),
            state(
                "repository",
                Snapshot::builder("repository").field("contact", "b@x.com").build(),
            ),
        )
        .with_entity("HeartOfGold");

        let entry = EntryGenerator::new(registry())
            .render_entry(&ctx, Some("trillian"), timestamp())
            .unwrap();
        assert_eq!(
            entry.text,
            format!(
                "{TS} [MODIFIED] 'trillian' modified repository 'HeartOfGold'\nDiff:\n  - 'contact' changed: 'a@x.com' -> 'b@x.com'\n"
            )
        );
        assert_eq!(entry.labels, labels(&["repository"]));
        assert_eq!(entry.action, Action::Modified);
    }

    #[test]
    fn single_label_without_entity() {
        let out = header(timestamp(), Some("dent"), Action::Created, "", &labels(&["plugin"]));
        assert_eq!(out, format!("{TS} [CREATED] 'dent' created plugin"));
    }

    #[test]
    fn multiple_labels_route_by_precedence() {
        let out = header(
            timestamp(),
            Some("dent"),
            Action::Modified,
            "hog",
            &labels(&["user", "permission", "Repository", "member"]),
        );
        assert_eq!(
            out,
            format!("{TS} [MODIFIED] 'dent' modified permission member for repository 'hog'")
        );
    }

    #[test]
    fn multiple_labels_without_routing_label() {
        let out = header(
            timestamp(),
            Some("dent"),
            Action::Created,
            "hog",
            &labels(&["config", "mirror"]),
        );
        assert_eq!(out, format!("{TS} [CREATED] 'dent' created config mirror "));
    }

    #[test]
    fn missing_username_renders_null() {
        let out = header(timestamp(), None, Action::Created, "", &[]);
        assert_eq!(out, format!("{TS} [CREATED] 'null' created "));
    }

    #[test]
    fn deletion_never_has_diff() {
        let generator = EntryGenerator::new(registry());
        let text = generator.generate(
            &deleted_ctx(),
            timestamp(),
            Some("dent"),
            Action::Deleted,
            "hog",
            &labels(&["repository"]),
        );
        assert_eq!(text, format!("{TS} [DELETED] 'dent' deleted repository 'hog'"));
    }

    #[test]
    fn creation_lists_every_property() {
        let ctx = EntryCreationContext::created(state(
            "user",
            Snapshot::builder("user")
                .field("active", true)
                .field("mail", "")
                .field("name", "dent")
                .build(),
        ));
        let text = EntryGenerator::new(registry()).generate(
            &ctx,
            timestamp(),
            Some("trillian"),
            Action::Created,
            "dent",
            &labels(&["user"]),
        );
        assert_eq!(
            text,
            format!(
                "{TS} [CREATED] 'trillian' created user 'dent'\nDiff:\n  - 'active' = 'true'\n  - 'mail' = ''\n  - 'name' = 'dent'\n"
            )
        );
    }

    #[test]
    fn only_ignored_changes_render_empty() {
        let ctx = EntryCreationContext::modified(
            state(
                "ignored_fields",
                Snapshot::builder("ignored_fields")
                    .field("name", "test")
                    .field("active", true)
                    .build(),
            ),
            state(
                "ignored_fields",
                Snapshot::builder("ignored_fields")
                    .field("name", "test2")
                    .field("active", false)
                    .build(),
            ),
        );
        let generator = EntryGenerator::new(registry());
        assert_eq!(
            generator.generate(&ctx, timestamp(), None, Action::Modified, "", &[]),
            ""
        );
        assert!(generator.render_entry(&ctx, None, timestamp()).is_none());
    }

    #[test]
    fn masked_form_follows_action_argument() {
        let ctx = EntryCreationContext::created(state(
            "masked_fields",
            Snapshot::builder("masked_fields")
                .field("shouldMask", "secret")
                .build(),
        ));
        let text = EntryGenerator::new(registry()).generate(
            &ctx,
            timestamp(),
            Some("dent"),
            Action::Modified,
            "",
            &[],
        );
        assert_eq!(
            text,
            format!("{TS} [MODIFIED] 'dent' modified \nDiff:\n  - 'shouldMask' changed: ********\n")
        );
    }

    #[test]
    fn masked_values_never_leak() {
        let ctx = EntryCreationContext::modified(
            state(
                "masked_fields",
                Snapshot::builder("masked_fields")
                    .field("shouldMask", "old-secret")
                    .field("apiTokens", "t1")
                    .field("visible", "a")
                    .build(),
            ),
            state(
                "masked_fields",
                Snapshot::builder("masked_fields")
                    .field("shouldMask", "new-secret")
                    .field("apiTokens", "t2")
                    .field("visible", "b")
                    .build(),
            ),
        );
        let text = EntryGenerator::new(registry()).generate(
            &ctx,
            timestamp(),
            Some("dent"),
            Action::Modified,
            "",
            &[],
        );
        assert_eq!(
            text,
            format!(
                "{TS} [MODIFIED] 'dent' modified \nDiff:\n  - 'apiTokens' changed: ********\n  - 'shouldMask' changed: ********\n  - 'visible' changed: 'a' -> 'b'\n"
            )
        );
        assert!(!text.contains("secret"));
        assert!(!text.contains("t1"));
    }

    #[test]
    fn created_masks_with_equals_form() {
        let ctx = EntryCreationContext::created(state(
            "secret_config",
            Snapshot::builder("secret_config")
                .field("ciphered", "s3cr3t")
                .field("url", "https://x")
                .build(),
        ));
        let text = EntryGenerator::new(registry()).generate(
            &ctx,
            timestamp(),
            Some("dent"),
            Action::Created,
            "",
            &labels(&["config"]),
        );
        assert!(text.contains("  - 'ciphered' = ********\n"));
        assert!(text.contains("  - 'url' = 'https://x'\n"));
        assert!(!text.contains("s3cr3t"));
    }

    #[test]
    fn multiline_values_stay_in_block() {
        let ctx = EntryCreationContext::created(state(
            "note",
            Snapshot::builder("note").field("text", "first\nsecond").build(),
        ));
        let text = EntryGenerator::new(registry()).generate(
            &ctx,
            timestamp(),
            Some("dent"),
            Action::Created,
            "",
            &[],
        );
        assert!(text.ends_with("\nDiff:\n  - 'text' = 'first\n  second'\n"));
    }

    #[test]
    fn ignored_entirely_type_renders_nothing() {
        let ctx = EntryCreationContext::created(state(
            "hidden",
            Snapshot::builder("hidden").field("name", "x").build(),
        ));
        let generator = EntryGenerator::new(registry());
        assert!(generator.is_ignored_entirely(&ctx));
        assert!(generator.render_entry(&ctx, Some("dent"), timestamp()).is_none());
    }
}
