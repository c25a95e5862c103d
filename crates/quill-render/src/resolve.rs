use quill_core::{EntryCreationContext, TypeRegistry};

/// Explicit override first, then the tracked object's own name, else empty.
#[must_use]
pub fn resolve_entity_name(ctx: &EntryCreationContext) -> String {
    match ctx.explicit_entity() {
        Some(entity) if !entity.is_empty() => entity.to_string(),
        _ => ctx.resolved_object().entity_name.clone().unwrap_or_default(),
    }
}

/// Declared policy labels of the tracked type followed by the ad hoc labels,
/// first occurrence wins.
#[must_use]
pub fn resolve_labels(ctx: &EntryCreationContext, registry: &TypeRegistry) -> Vec<String> {
    let declared = &registry
        .policy_for(Some(&ctx.resolved_object().type_name))
        .labels;
    let mut labels: Vec<String> = Vec::with_capacity(declared.len() + ctx.additional_labels().len());
    for label in declared.iter().chain(ctx.additional_labels()) {
        if !labels.contains(label) {
            labels.push(label.clone());
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_core::{FieldPolicy, Snapshot, TrackedState, TypeDescriptor};

    use super::*;

    fn state(type_name: &str, name: Option<&str>) -> TrackedState {
        TrackedState {
            type_name: type_name.to_string(),
            snapshot: Snapshot::default(),
            entity_name: name.map(str::to_string),
        }
    }

    #[test]
    fn explicit_entity_wins() {
        let ctx = EntryCreationContext::created(state("repository", Some("hog")))
            .with_entity("HeartOfGold");
        assert_eq!(resolve_entity_name(&ctx), "HeartOfGold");
    }

    #[test]
    fn empty_override_falls_back_to_object_name() {
        let ctx = EntryCreationContext::deleted(state("repository", Some("hog"))).with_entity("");
        assert_eq!(resolve_entity_name(&ctx), "hog");
    }

    #[test]
    fn unnamed_object_resolves_empty() {
        let ctx = EntryCreationContext::created(state("config", None));
        assert_eq!(resolve_entity_name(&ctx), "");
    }

    #[test]
    fn labels_are_deduplicated_in_order() {
        let registry = TypeRegistry::new().with(
            TypeDescriptor::new("repository")
                .policy(FieldPolicy::default().with_labels(["repository", "permission"])),
        );
        let ctx = EntryCreationContext::created(state("repository", None))
            .with_labels(["member", "repository", "member"]);
        assert_eq!(
            resolve_labels(&ctx, &registry),
            vec!["repository", "permission", "member"]
        );
    }

    #[test]
    fn undeclared_type_has_only_ad_hoc_labels() {
        let ctx = EntryCreationContext::created(state("unknown", None)).with_label("plugin");
        assert_eq!(resolve_labels(&ctx, &TypeRegistry::new()), vec!["plugin"]);
    }
}
