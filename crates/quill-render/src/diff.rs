//! Snapshot diffing.
//!
//! Two flat snapshots are compared path by path. Changes come out grouped by
//! the object they belong to (root first), alphabetical by path within a group.
//! Collection indexes compare as numbers, so `members/2` precedes `members/10`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use quill_core::{Snapshot, SnapshotEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// One changed property between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub path: String,
    pub group: String,
    pub property: String,
    pub owner: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub kind: ChangeKind,
}

impl PropertyChange {
    fn between(old: Option<&SnapshotEntry>, new: Option<&SnapshotEntry>) -> Option<Self> {
        let (shape, kind) = match (old, new) {
            (Some(old), Some(new)) if old.value == new.value => return None,
            (Some(_), Some(new)) => (new, ChangeKind::Changed),
            (None, Some(new)) => (new, ChangeKind::Added),
            (Some(old), None) => (old, ChangeKind::Removed),
            (None, None) => return None,
        };
        Some(Self {
            path: shape.path.clone(),
            group: shape.group.clone(),
            property: shape.property.clone(),
            owner: shape.owner.clone(),
            old_value: old.map(|entry| entry.value.clone()),
            new_value: new.map(|entry| entry.value.clone()),
            kind,
        })
    }

    /// Text line for an unmasked change, without indentation.
    #[must_use]
    pub fn render(&self) -> String {
        let old = self.old_value.as_deref().unwrap_or_default();
        let new = self.new_value.as_deref().unwrap_or_default();
        match self.kind {
            ChangeKind::Changed => format!("'{}' changed: '{old}' -> '{new}'", self.path),
            ChangeKind::Added => format!("'{}' = '{new}'", self.path),
            ChangeKind::Removed => format!("'{}' value '{old}' unset", self.path),
        }
    }
}

/// Compare two snapshots. A missing side contributes no properties.
#[must_use]
pub fn diff(old: Option<&Snapshot>, new: Option<&Snapshot>) -> Vec<PropertyChange> {
    let paths: BTreeSet<&str> = old
        .into_iter()
        .chain(new)
        .flat_map(Snapshot::entries)
        .map(|entry| entry.path.as_str())
        .collect();

    let mut changes: Vec<PropertyChange> = paths
        .into_iter()
        .filter_map(|path| {
            PropertyChange::between(
                old.and_then(|snapshot| snapshot.get(path)),
                new.and_then(|snapshot| snapshot.get(path)),
            )
        })
        .collect();
    changes.sort_by(|a, b| {
        natural_cmp(&a.group, &b.group).then_with(|| natural_cmp(&a.path, &b.path))
    });
    changes
}

/// Compare runs of digits by value and everything else as text.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        if a.is_empty() || b.is_empty() {
            return a.len().cmp(&b.len()).then_with(|| a.cmp(b));
        }
        let (a_run, a_rest) = split_run(a);
        let (b_run, b_rest) = split_run(b);
        let ordering = if is_digits(a_run) && is_digits(b_run) {
            let (a_num, b_num) = (a_run.trim_start_matches('0'), b_run.trim_start_matches('0'));
            a_num
                .len()
                .cmp(&b_num.len())
                .then_with(|| a_num.cmp(b_num))
                .then_with(|| a_run.len().cmp(&b_run.len()))
        } else {
            a_run.cmp(b_run)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
        a = a_rest;
        b = b_rest;
    }
}

fn is_digits(run: &str) -> bool {
    run.bytes().next().is_some_and(|byte| byte.is_ascii_digit())
}

/// Split off the leading run of all-digit or all-non-digit characters.
fn split_run(value: &str) -> (&str, &str) {
    let digits = is_digits(value);
    let end = value
        .find(|ch: char| ch.is_ascii_digit() != digits)
        .unwrap_or(value.len());
    value.split_at(end)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rendered(changes: &[PropertyChange]) -> Vec<String> {
        changes.iter().map(PropertyChange::render).collect()
    }

    #[test]
    fn creation_reports_every_property() {
        let new = Snapshot::builder("user")
            .field("name", "dent")
            .field("active", true)
            .field("mail", "")
            .build();

        assert_eq!(
            rendered(&diff(None, Some(&new))),
            vec!["'active' = 'true'", "'mail' = ''", "'name' = 'dent'"]
        );
    }

    #[test]
    fn modification_reports_changed_added_and_removed() {
        let old = Snapshot::builder("repository")
            .field("contact", "a@x.com")
            .field("description", "old")
            .field("name", "HeartOfGold")
            .build();
        let new = Snapshot::builder("repository")
            .field("contact", "b@x.com")
            .field("name", "HeartOfGold")
            .field("type", "git")
            .build();

        assert_eq!(
            rendered(&diff(Some(&old), Some(&new))),
            vec![
                "'contact' changed: 'a@x.com' -> 'b@x.com'",
                "'description' value 'old' unset",
                "'type' = 'git'",
            ]
        );
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let snapshot = Snapshot::builder("user").field("name", "dent").build();
        assert!(diff(Some(&snapshot), Some(&snapshot)).is_empty());
        assert!(diff(None, None).is_empty());
    }

    #[test]
    fn changes_are_grouped_by_object() {
        let old = Snapshot::builder("root_fields")
            .field("zeta", "1")
            .nested("subfields", "subfields", |b| b.field("alpha", "x"))
            .list("members", ["trillian"])
            .build();
        let new = Snapshot::builder("root_fields")
            .field("zeta", "2")
            .nested("subfields", "subfields", |b| b.field("alpha", "y"))
            .list("members", ["trillian", "zaphod"])
            .build();

        let changes = diff(Some(&old), Some(&new));
        let paths: Vec<&str> = changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["members/1", "zeta", "subfields.alpha"]);
        assert_eq!(changes[2].owner.as_deref(), Some("subfields"));
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert_eq!(changes[0].property, "members");
    }

    #[test]
    fn nested_collection_elements_carry_index() {
        let old = Snapshot::builder("root_fields")
            .nested_list("subfieldsCollection", "subfields", ["a"], |b, v| {
                b.field("name", v)
            })
            .build();
        let new = Snapshot::builder("root_fields")
            .nested_list("subfieldsCollection", "subfields", ["b"], |b, v| {
                b.field("name", v)
            })
            .build();

        assert_eq!(
            rendered(&diff(Some(&old), Some(&new))),
            vec!["'subfieldsCollection/0.name' changed: 'a' -> 'b'"]
        );
    }

    #[test]
    fn collection_indexes_sort_numerically() {
        let old = Snapshot::builder("team").list("members", ["m0", "m1"]).build();
        let members: Vec<String> = (0..12).map(|i| format!("m{i}")).collect();
        let new = Snapshot::builder("team").list("members", members).build();

        let paths: Vec<String> = diff(Some(&old), Some(&new))
            .into_iter()
            .map(|change| change.path)
            .collect();
        let expected: Vec<String> = (2..12).map(|i| format!("members/{i}")).collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn nested_collection_groups_sort_numerically() {
        assert_eq!(natural_cmp("items/2", "items/10"), Ordering::Less);
        assert_eq!(natural_cmp("items/10.name", "items/9.name"), Ordering::Greater);
        assert_eq!(natural_cmp("", "items/0"), Ordering::Less);
        assert_eq!(natural_cmp("alpha", "beta"), Ordering::Less);
        assert_eq!(natural_cmp("members/1", "members/1"), Ordering::Equal);
    }
}
