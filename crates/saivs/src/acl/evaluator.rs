//! Stage evaluation over one store snapshot.

use super::key::{AclKey, AclStage};
use super::matcher::{entry_actions, entry_matches, is_default_entry, terminal_disposition};
use super::verdict::{AclAction, AclVerdict, Disposition};
use super::AclError;
use crate::schema::catalog::{
    acl_counter, acl_entry, acl_stage, acl_table, acl_table_group, acl_table_group_member,
    acl_table_group_type,
};
use crate::store::{StoreState, StoredObject};
use crate::types::{ObjectType, RawSaiObjectId};
use log::debug;
use std::cmp::Reverse;

/// The entry a table selected for a key, with its actions.
struct Hit<'s> {
    table: RawSaiObjectId,
    entry: &'s StoredObject,
    actions: Vec<AclAction>,
}

/// Runs every group bound to `stage` in ascending id order, stopping at
/// the first terminating action.
pub(crate) fn evaluate_stage(
    state: &StoreState,
    stage: AclStage,
    key: &mut AclKey,
    verdict: &mut AclVerdict,
) -> Result<(), AclError> {
    let groups: Vec<&StoredObject> = state
        .objects_of_type(ObjectType::AclTableGroup)
        .filter(|group| group.get_enum(acl_table_group::ACL_STAGE) == Some(stage.sai_value()))
        .collect();

    for group in groups {
        let tables = group_tables(state, group, stage)?;
        let parallel =
            group.get_enum(acl_table_group::TYPE) == Some(acl_table_group_type::PARALLEL);
        let disposition = if parallel {
            evaluate_parallel(state, &tables, key, verdict)
        } else {
            evaluate_sequential(state, &tables, key, verdict)
        };
        if let Some(disposition) = disposition {
            debug!(
                "ACL {} group oid:0x{:x} terminated with {}",
                stage,
                group.oid(),
                disposition
            );
            verdict.disposition = disposition;
            break;
        }
    }
    Ok(())
}

/// Member tables of `group` in listed order: member priority, then member id.
fn group_tables<'s>(
    state: &'s StoreState,
    group: &StoredObject,
    stage: AclStage,
) -> Result<Vec<&'s StoredObject>, AclError> {
    let mut members: Vec<&StoredObject> = state
        .referrers_of_type(group.oid(), ObjectType::AclTableGroupMember)
        .collect();
    members.sort_by_key(|member| {
        (
            member.get_u32(acl_table_group_member::PRIORITY).unwrap_or(0),
            member.oid(),
        )
    });

    members
        .into_iter()
        .map(|member| {
            let table = member
                .get_oid(acl_table_group_member::ACL_TABLE_ID)
                .and_then(|oid| state.get(oid))
                .ok_or(AclError::MissingTable {
                    member: member.oid(),
                })?;
            let table_stage = table.get_enum(acl_table::ACL_STAGE).unwrap_or(-1);
            if table_stage != stage.sai_value() {
                return Err(AclError::StageMismatch {
                    group: group.oid(),
                    table: table.oid(),
                    group_stage: stage,
                    table_stage: acl_stage::META.name_of(table_stage).unwrap_or("unknown"),
                });
            }
            Ok(table)
        })
        .collect()
}

/// Enabled entries of `table` in evaluation order: descending priority,
/// ties by lowest id, default entries last.
fn table_entries<'s>(state: &'s StoreState, table: &StoredObject) -> Vec<&'s StoredObject> {
    let mut entries: Vec<&StoredObject> = state
        .referrers_of_type(table.oid(), ObjectType::AclEntry)
        .filter(|entry| entry.get_bool(acl_entry::ADMIN_STATE).unwrap_or(true))
        .collect();
    entries.sort_by_key(|entry| {
        (
            is_default_entry(entry),
            Reverse(entry.get_u32(acl_entry::PRIORITY).unwrap_or(0)),
            entry.oid(),
        )
    });
    entries
}

fn select<'s>(state: &'s StoreState, table: &StoredObject, key: &AclKey) -> Option<Hit<'s>> {
    table_entries(state, table)
        .into_iter()
        .find(|entry| entry_matches(state, entry, key))
        .map(|entry| Hit {
            table: table.oid(),
            entry,
            actions: entry_actions(entry),
        })
}

/// Applies the non-terminating actions of a selected entry and bumps its
/// counter.
fn record(state: &StoreState, hit: &Hit<'_>, key: &mut AclKey, verdict: &mut AclVerdict) {
    verdict.matched_entries.push(hit.entry.oid());
    for action in &hit.actions {
        match action {
            AclAction::SetUserMeta(meta) => key.user_meta = Some(*meta),
            AclAction::Count(counter) => count(state, *counter, key),
            _ => {}
        }
        verdict.apply(action);
    }
}

fn count(state: &StoreState, counter: RawSaiObjectId, key: &AclKey) {
    let Some(counter) = state.get(counter) else {
        return;
    };
    counter.add_stat(acl_counter::PACKETS, 1);
    if counter.get_bool(acl_counter::ENABLE_BYTE_COUNT).unwrap_or(false) {
        counter.add_stat(acl_counter::BYTES, u64::from(key.packet_length));
    }
}

/// Tables in listed order; each contributes at most its first matching
/// entry, and a terminating action ends the stage.
fn evaluate_sequential(
    state: &StoreState,
    tables: &[&StoredObject],
    key: &mut AclKey,
    verdict: &mut AclVerdict,
) -> Option<Disposition> {
    for table in tables {
        let Some(hit) = select(state, table, key) else {
            continue;
        };
        record(state, &hit, key, verdict);
        if let Some(disposition) = terminal_disposition(&hit.actions) {
            return Some(disposition);
        }
    }
    None
}

/// Every table sees the same key. The lowest table id wins terminating and
/// rewrite conflicts; other actions are unioned.
fn evaluate_parallel(
    state: &StoreState,
    tables: &[&StoredObject],
    key: &mut AclKey,
    verdict: &mut AclVerdict,
) -> Option<Disposition> {
    let snapshot = key.clone();
    let mut hits: Vec<Hit<'_>> = tables
        .iter()
        .filter_map(|table| select(state, table, &snapshot))
        .collect();
    hits.sort_by_key(|hit| hit.table);

    let disposition = hits
        .iter()
        .find_map(|hit| terminal_disposition(&hit.actions));
    // highest table id first so the lowest id writes last
    for hit in hits.iter().rev() {
        record(state, hit, key, verdict);
    }
    disposition
}
