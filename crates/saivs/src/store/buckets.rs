//! Fine-grained ECMP bucket ownership.
//!
//! Each fine-grained group owns a table of buckets whose size is fixed at
//! group creation (`CONFIGURED_SIZE`, or the engine default). Every bucket
//! names the member that serves it. Membership changes rewrite only the
//! buckets they have to: a new member or a weight change takes buckets
//! from members above their share, a removed member's buckets are dealt to
//! the members furthest below theirs. Liveness never touches the table.

use super::StoreState;
use crate::schema::catalog::{next_hop_group, next_hop_group_member, next_hop_group_type};
use crate::types::{ObjectType, RawSaiObjectId};
use log::debug;
use std::cmp::Reverse;

/// How a membership change may move buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Reshare {
    /// Members above their share give up the excess.
    Rebalance,
    /// Only buckets without a live owner move.
    Orphans,
}

/// Bucket share of each member: floor of `size * weight / total`, the
/// remainder going one each to the first members.
fn shares(size: usize, members: &[(RawSaiObjectId, u64)]) -> Vec<usize> {
    let total: u64 = members.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return vec![0; members.len()];
    }
    let size = size as u64;
    let mut shares: Vec<usize> = members
        .iter()
        .map(|(_, w)| (size * w / total) as usize)
        .collect();
    let mut remainder = size as usize - shares.iter().sum::<usize>();
    for (share, (_, weight)) in shares.iter_mut().zip(members) {
        if remainder == 0 {
            break;
        }
        if *weight > 0 {
            *share += 1;
            remainder -= 1;
        }
    }
    shares
}

/// The new owner table for `members` (ascending id), keeping every bucket
/// of `current` that `mode` allows to stay.
pub(super) fn reshare(
    current: &[RawSaiObjectId],
    size: usize,
    members: &[(RawSaiObjectId, u64)],
    mode: Reshare,
) -> Vec<RawSaiObjectId> {
    if members.is_empty() || size == 0 {
        return Vec::new();
    }
    let shares = shares(size, members);
    let mut owned = vec![0usize; members.len()];

    let mut table: Vec<Option<usize>> = (0..size)
        .map(|bucket| {
            current
                .get(bucket)
                .and_then(|owner| members.iter().position(|(oid, _)| oid == owner))
        })
        .collect();
    for slot in table.iter_mut() {
        if let Some(i) = *slot {
            if mode == Reshare::Rebalance && owned[i] >= shares[i] {
                *slot = None;
            } else {
                owned[i] += 1;
            }
        }
    }
    for slot in table.iter_mut().filter(|slot| slot.is_none()) {
        let taker = (0..members.len())
            .max_by_key(|i| (shares[*i] as isize - owned[*i] as isize, Reverse(*i)))
            .unwrap_or(0);
        owned[taker] += 1;
        *slot = Some(taker);
    }
    table
        .into_iter()
        .map(|slot| members[slot.unwrap_or(0)].0)
        .collect()
}

impl StoreState {
    /// Bucket owners (member ids) of a fine-grained group with at least
    /// one member.
    pub fn bucket_owners(&self, group: RawSaiObjectId) -> Option<&[RawSaiObjectId]> {
        self.buckets.get(&group).map(Vec::as_slice)
    }

    /// Brings the bucket table of `group` in line with its current members.
    /// Groups of other types are left alone.
    pub(super) fn reshare_buckets(
        &mut self,
        group: RawSaiObjectId,
        default_size: u32,
        mode: Reshare,
    ) {
        let Some(object) = self.get(group) else {
            self.buckets.remove(&group);
            return;
        };
        if object.get_enum(next_hop_group::TYPE) != Some(next_hop_group_type::FINE_GRAIN_ECMP) {
            return;
        }
        let size = match object.get_u32(next_hop_group::CONFIGURED_SIZE) {
            Some(size) if size > 0 => size,
            _ => default_size,
        };
        let members: Vec<(RawSaiObjectId, u64)> = self
            .referrers_of_type(group, ObjectType::NextHopGroupMember)
            .map(|m| {
                (
                    m.oid(),
                    u64::from(m.get_u32(next_hop_group_member::WEIGHT).unwrap_or(1)),
                )
            })
            .collect();

        let current = self.buckets.remove(&group).unwrap_or_default();
        let table = reshare(&current, size as usize, &members, mode);
        let moved = table
            .iter()
            .enumerate()
            .filter(|(i, owner)| current.get(*i) != Some(*owner))
            .count();
        debug!(
            "Fine-grained group oid:0x{:x}: {} members, {} of {} buckets moved",
            group,
            members.len(),
            moved,
            table.len()
        );
        if !table.is_empty() {
            self.buckets.insert(group, table);
        }
    }
}
