//! Reduction of a desired item to its minimal write payload

use framesync_domain::{ChangeSet, DesiredItem, FieldData, RemoteItemSummary};

use super::stable;

/// Diff `desired` against the remote item it matched.
///
/// Returns `None` when nothing would change. Without a match the full
/// desired item is returned as a create, never `None`.
pub fn build(desired: &DesiredItem, existing: Option<&RemoteItemSummary>) -> Option<ChangeSet> {
    let Some(existing) = existing else {
        return Some(full(desired, None));
    };

    let changed: FieldData = desired
        .field_data
        .iter()
        .filter(|(field_id, value)| !stable::same(Some(*value), existing.field_data.get(*field_id)))
        .map(|(field_id, value)| (field_id.clone(), value.clone()))
        .collect();

    let slug_changed =
        desired.slug.as_deref().is_some_and(|slug| existing.slug.as_deref().unwrap_or("") != slug);
    let draft_changed = desired.draft.is_some_and(|draft| draft != existing.draft);

    if !slug_changed && !draft_changed && changed.is_empty() {
        return None;
    }

    Some(ChangeSet {
        id: target_id(desired, Some(existing)),
        slug: desired.slug.clone(),
        draft: desired.draft,
        field_data: (!changed.is_empty()).then_some(changed),
    })
}

/// Full payload for `desired`, bypassing the diff.
pub fn full(desired: &DesiredItem, existing: Option<&RemoteItemSummary>) -> ChangeSet {
    ChangeSet {
        id: target_id(desired, existing),
        slug: desired.slug.clone(),
        draft: desired.draft,
        field_data: Some(desired.field_data.clone()),
    }
}

// Requested id, else the matched remote id so a slug match updates in place.
fn target_id(desired: &DesiredItem, existing: Option<&RemoteItemSummary>) -> Option<String> {
    desired
        .id
        .clone()
        .or_else(|| existing.map(|item| item.id.clone()).filter(|id| !id.is_empty()))
}
