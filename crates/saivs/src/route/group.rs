//! Next hop group member selection.
//!
//! Unordered ECMP groups and groups with a next hop list choose by weighted
//! rendezvous: every active candidate scores the flow and the highest score
//! wins. Removing or deactivating a member only moves the flows it held.
//!
//! Ordered ECMP groups expand their members, in sequence order, into a slot
//! table by weight. A flow lands on slot `hash mod slots` and is re-hashed
//! over the active slots only when that member is inactive.
//!
//! Fine-grained groups index the bucket table the store keeps per group
//! (see [`StoreState::bucket_owners`]). Buckets of inactive owners fall back
//! to an active member by rendezvous on the bucket index.

use super::hash::rendezvous_score;
use super::RouteError;
use crate::schema::catalog::{
    next_hop_group, next_hop_group_map, next_hop_group_member,
    next_hop_group_member_configured_role as configured_role, next_hop_group_type,
};
use crate::store::{StoreState, StoredObject};
use crate::types::{ObjectType, RawSaiObjectId, NULL_OBJECT_ID};
use crate::value::AttrValue;
use itertools::Itertools;

/// One selectable next hop. `member` is the null id for list-based groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    member: RawSaiObjectId,
    next_hop: RawSaiObjectId,
    weight: u64,
    active: bool,
}

/// Picks the next hop of `group` for `selector`: a flow hash, or the
/// forwarding class for class-based groups.
pub(crate) fn select_member(
    state: &StoreState,
    group: RawSaiObjectId,
    selector: u64,
) -> Result<RawSaiObjectId, RouteError> {
    let object = state
        .get(group)
        .filter(|o| o.object_type() == ObjectType::NextHopGroup)
        .ok_or(RouteError::NoSuchGroup(group))?;
    let members: Vec<&StoredObject> = state
        .referrers_of_type(group, ObjectType::NextHopGroupMember)
        .collect();

    let selected = match object.get_enum(next_hop_group::TYPE) {
        Some(next_hop_group_type::DYNAMIC_ORDERED_ECMP) => {
            let ordered = members
                .iter()
                .sorted_by_key(|m| {
                    (
                        m.get_u32(next_hop_group_member::SEQUENCE_ID).unwrap_or(0),
                        m.oid(),
                    )
                })
                .copied()
                .collect_vec();
            pick_slot(&candidates(state, &ordered), selector)
        }
        Some(next_hop_group_type::FINE_GRAIN_ECMP) => {
            let owners = state.bucket_owners(group).unwrap_or_default();
            fine_grained(&candidates(state, &members), owners, selector)
        }
        Some(next_hop_group_type::PROTECTION) => protection(state, object, &members),
        Some(next_hop_group_type::CLASS_BASED) => class_based(state, object, &members, selector),
        Some(next_hop_group_type::ECMP_WITH_MEMBERS) => {
            pick_rendezvous(&listed_candidates(state, object), selector)
        }
        _ => pick_rendezvous(&candidates(state, &members), selector),
    };
    selected.ok_or(RouteError::GroupEmpty(group))
}

fn candidates(state: &StoreState, members: &[&StoredObject]) -> Vec<Candidate> {
    members
        .iter()
        .filter_map(|member| {
            Some(Candidate {
                member: member.oid(),
                next_hop: member.get_oid(next_hop_group_member::NEXT_HOP_ID)?,
                weight: u64::from(member.get_u32(next_hop_group_member::WEIGHT).unwrap_or(1)),
                active: state.member_is_active(member),
            })
        })
        .collect()
}

/// `NEXT_HOP_LIST` paired with `NEXT_HOP_MEMBER_WEIGHT_LIST`; a missing
/// weight counts as 1.
fn listed_candidates(state: &StoreState, group: &StoredObject) -> Vec<Candidate> {
    let weights = match group.get(next_hop_group::NEXT_HOP_MEMBER_WEIGHT_LIST) {
        Some(AttrValue::U32List(weights)) => weights.as_slice(),
        _ => &[],
    };
    group
        .get_oid_list(next_hop_group::NEXT_HOP_LIST)
        .iter()
        .enumerate()
        .map(|(i, nh)| Candidate {
            member: NULL_OBJECT_ID,
            next_hop: *nh,
            weight: u64::from(weights.get(i).copied().unwrap_or(1)),
            active: state.next_hop_is_live(*nh),
        })
        .collect()
}

/// The active candidate with the highest rendezvous score for `hash`,
/// scored by next hop so a re-created member wins back its old flows.
/// Equal scores go to the lower next hop.
fn rendezvous<'c>(
    candidates: impl Iterator<Item = &'c Candidate>,
    hash: u64,
) -> Option<&'c Candidate> {
    candidates
        .filter(|c| c.active && c.weight > 0)
        .map(|c| (rendezvous_score(hash, c.next_hop, c.weight), c))
        .max_by(|(a, ca), (b, cb)| a.total_cmp(b).then(cb.next_hop.cmp(&ca.next_hop)))
        .map(|(_, c)| c)
}

fn pick_rendezvous(candidates: &[Candidate], hash: u64) -> Option<RawSaiObjectId> {
    rendezvous(candidates.iter(), hash).map(|c| c.next_hop)
}

/// The candidate owning slot `slot` of the weight-expanded table.
fn locate<'c>(candidates: impl Iterator<Item = &'c Candidate>, slot: u64) -> Option<&'c Candidate> {
    let mut end = 0u64;
    for candidate in candidates {
        end += candidate.weight;
        if slot < end {
            return Some(candidate);
        }
    }
    None
}

fn pick_slot(candidates: &[Candidate], hash: u64) -> Option<RawSaiObjectId> {
    let total: u64 = candidates.iter().map(|c| c.weight).sum();
    if total == 0 {
        return None;
    }
    let configured = locate(candidates.iter(), hash % total)?;
    if configured.active {
        return Some(configured.next_hop);
    }
    let active_total: u64 = candidates.iter().filter(|c| c.active).map(|c| c.weight).sum();
    if active_total == 0 {
        return None;
    }
    locate(candidates.iter().filter(|c| c.active), hash % active_total).map(|c| c.next_hop)
}

/// Looks `hash` up in the stored bucket table. The owner of the bucket
/// serves it while active; otherwise the bucket index picks an active
/// member by rendezvous, so a second member going down leaves the first
/// one's fallbacks alone.
fn fine_grained(
    candidates: &[Candidate],
    owners: &[RawSaiObjectId],
    hash: u64,
) -> Option<RawSaiObjectId> {
    if owners.is_empty() {
        return None;
    }
    let bucket = hash % owners.len() as u64;
    let owner = owners[bucket as usize];
    match candidates.iter().find(|c| c.member == owner) {
        Some(c) if c.active => Some(c.next_hop),
        _ => rendezvous(candidates.iter(), bucket).map(|c| c.next_hop),
    }
}

/// The primary while it is active and no switchover is requested,
/// otherwise the first active standby.
fn protection(
    state: &StoreState,
    group: &StoredObject,
    members: &[&StoredObject],
) -> Option<RawSaiObjectId> {
    let with_role = |role: i32| {
        members.iter().copied().filter(move |m| {
            m.get_enum(next_hop_group_member::CONFIGURED_ROLE) == Some(role)
        })
    };
    let switchover = group.get_bool(next_hop_group::SET_SWITCHOVER).unwrap_or(false);
    if !switchover {
        if let Some(primary) = with_role(configured_role::PRIMARY).next() {
            if state.member_is_active(primary) {
                return primary.get_oid(next_hop_group_member::NEXT_HOP_ID);
            }
        }
    }
    with_role(configured_role::STANDBY)
        .find(|m| state.member_is_active(m))
        .and_then(|m| m.get_oid(next_hop_group_member::NEXT_HOP_ID))
}

/// Maps the class through the selection map (identity without one) and
/// picks the active member with that index.
fn class_based(
    state: &StoreState,
    group: &StoredObject,
    members: &[&StoredObject],
    class: u64,
) -> Option<RawSaiObjectId> {
    let class = u32::try_from(class).ok()?;
    let index = match group.get_oid(next_hop_group::SELECTION_MAP) {
        Some(map) => match state.get(map)?.get(next_hop_group_map::MAP_TO_VALUE_LIST) {
            Some(AttrValue::MapList(pairs)) => {
                pairs.iter().find(|(key, _)| *key == class).map(|(_, v)| *v)?
            }
            _ => return None,
        },
        None => class,
    };
    members
        .iter()
        .find(|m| {
            m.get_u32(next_hop_group_member::INDEX) == Some(index) && state.member_is_active(m)
        })
        .and_then(|m| m.get_oid(next_hop_group_member::NEXT_HOP_ID))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cand(next_hop: RawSaiObjectId, weight: u64, active: bool) -> Candidate {
        Candidate {
            member: next_hop,
            next_hop,
            weight,
            active,
        }
    }

    #[test]
    fn test_pick_slot_follows_weights() {
        let all = [cand(1, 1, true), cand(2, 2, true), cand(3, 1, true)];
        let picks: Vec<_> = (0..4).map(|h| pick_slot(&all, h).unwrap()).collect();
        assert_eq!(picks, vec![1, 2, 2, 3]);

        // only the flows of the inactive member move
        let degraded = [cand(1, 1, true), cand(2, 2, false), cand(3, 1, true)];
        assert_eq!(pick_slot(&degraded, 0), Some(1));
        assert_eq!(pick_slot(&degraded, 3), Some(3));
        assert!(matches!(pick_slot(&degraded, 1), Some(1) | Some(3)));

        let down = [cand(1, 1, false)];
        assert_eq!(pick_slot(&down, 5), None);
        assert_eq!(pick_slot(&[], 5), None);
    }

    #[test]
    fn test_rendezvous_dropping_a_candidate_moves_only_its_flows() {
        let all = [cand(1, 1, true), cand(2, 1, true), cand(3, 1, true)];
        let without_second = [cand(1, 1, true), cand(3, 1, true)];
        let mut held = 0;
        for hash in 0..300u64 {
            let before = pick_rendezvous(&all, hash).unwrap();
            let after = pick_rendezvous(&without_second, hash).unwrap();
            if before == 2 {
                held += 1;
                assert_ne!(after, 2);
            } else {
                assert_eq!(after, before, "flow {} moved", hash);
            }
        }
        assert!(held > 0);

        // deactivation behaves like removal
        let degraded = [cand(1, 1, true), cand(2, 1, false), cand(3, 1, true)];
        for hash in 0..300u64 {
            assert_eq!(
                pick_rendezvous(&degraded, hash),
                pick_rendezvous(&without_second, hash)
            );
        }
        assert_eq!(pick_rendezvous(&[cand(1, 1, false)], 5), None);
        assert_eq!(pick_rendezvous(&[], 5), None);
    }

    #[test]
    fn test_rendezvous_honors_weights() {
        let weighted = [cand(1, 3, true), cand(2, 1, true)];
        let heavy = (0..4000u64)
            .filter(|h| pick_rendezvous(&weighted, *h) == Some(1))
            .count();
        assert!((2700..=3300).contains(&heavy), "{}", heavy);
    }

    #[test]
    fn test_fine_grained_falls_back_only_for_inactive_owners() {
        let owners = [1, 1, 2, 2, 3, 3, 3, 3];
        let all = [cand(1, 1, true), cand(2, 1, true), cand(3, 2, true)];
        let picks: Vec<_> = (0..8).map(|h| fine_grained(&all, &owners, h).unwrap()).collect();
        assert_eq!(picks, vec![1, 1, 2, 2, 3, 3, 3, 3]);
        assert_eq!(fine_grained(&all, &owners, 8 + 5), Some(3));

        let degraded = [cand(1, 1, true), cand(2, 1, true), cand(3, 2, false)];
        let fallback: Vec<_> = (0..8).map(|h| fine_grained(&degraded, &owners, h).unwrap()).collect();
        assert_eq!(&fallback[..4], &picks[..4]);
        assert!(fallback[4..].iter().all(|nh| *nh == 1 || *nh == 2));

        // a second owner going down leaves earlier fallbacks on survivors
        let owners = [1, 1, 2, 2, 3, 3, 4, 4];
        let one_down = [cand(1, 1, true), cand(2, 1, true), cand(3, 1, false), cand(4, 1, true)];
        let two_down = [cand(1, 1, true), cand(2, 1, true), cand(3, 1, false), cand(4, 1, false)];
        for bucket in 0..8u64 {
            let first = fine_grained(&one_down, &owners, bucket).unwrap();
            let second = fine_grained(&two_down, &owners, bucket).unwrap();
            assert!(second == 1 || second == 2);
            if first != 4 {
                assert_eq!(second, first, "bucket {}", bucket);
            }
        }
        assert_eq!(fine_grained(&[cand(1, 1, false)], &[1], 0), None);
        assert_eq!(fine_grained(&all, &[], 0), None);
    }
}
