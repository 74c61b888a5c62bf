//! Entry matching and action extraction.
//!
//! Scalars and MACs match exactly, or under their `*_MASK` attribute when
//! the entry sets one (`key & mask == value & mask`). IP fields match by
//! prefix containment, `IN_PORTS` and `OUT_PORTS` by membership, and
//! `ACL_RANGE_TYPE` by containment in every listed range. A field absent
//! from the key never matches a declared field.

use super::key::AclKey;
use super::verdict::{AclAction, Disposition};
use crate::schema::catalog::{
    acl_entry, acl_field_mask, acl_range, acl_range_type, is_acl_match_field,
};
use crate::store::{StoreState, StoredObject};
use crate::value::AttrValue;
use sonic_types::MacAddress;

/// True when the entry declares no match field.
pub fn is_default_entry(entry: &StoredObject) -> bool {
    !entry.attrs().keys().any(|id| is_acl_match_field(*id))
}

/// True when every match field of `entry` accepts `key`.
pub fn entry_matches(state: &StoreState, entry: &StoredObject, key: &AclKey) -> bool {
    entry
        .attrs()
        .iter()
        .filter(|(id, _)| is_acl_match_field(**id))
        .all(|(id, value)| {
            let mask = acl_field_mask(*id).and_then(|mask| entry.get(mask));
            field_matches(state, *id, value, mask, key)
        })
}

/// A key value against an entry value and optional mask of the same kind.
trait Masked: Copy + PartialEq {
    fn masked(self, mask: Self) -> Self;
}

macro_rules! masked_int {
    ($($t:ty),*) => {
        $(impl Masked for $t {
            fn masked(self, mask: Self) -> Self {
                self & mask
            }
        })*
    };
}

masked_int!(u8, u16, u32);

impl Masked for MacAddress {
    fn masked(self, mask: Self) -> Self {
        let mut bytes = *self.as_bytes();
        for (byte, m) in bytes.iter_mut().zip(mask.as_bytes()) {
            *byte &= m;
        }
        MacAddress::new(bytes)
    }
}

fn masked_eq<T: Masked>(key: Option<T>, value: T, mask: Option<T>) -> bool {
    key.is_some_and(|key| match mask {
        Some(mask) => key.masked(mask) == value.masked(mask),
        None => key == value,
    })
}

fn field_matches(
    state: &StoreState,
    id: u32,
    value: &AttrValue,
    mask: Option<&AttrValue>,
    key: &AclKey,
) -> bool {
    let (m8, m16, m32, mac_mask) = match mask {
        Some(AttrValue::U8(m)) => (Some(*m), None, None, None),
        Some(AttrValue::U16(m)) => (None, Some(*m), None, None),
        Some(AttrValue::U32(m)) => (None, None, Some(*m), None),
        Some(AttrValue::Mac(m)) => (None, None, None, Some(*m)),
        _ => (None, None, None, None),
    };
    match (id, value) {
        (acl_entry::FIELD_SRC_IP | acl_entry::FIELD_SRC_IPV6, AttrValue::IpPrefix(prefix)) => {
            key.src_ip.is_some_and(|addr| prefix.contains(&addr))
        }
        (acl_entry::FIELD_DST_IP | acl_entry::FIELD_DST_IPV6, AttrValue::IpPrefix(prefix)) => {
            key.dst_ip.is_some_and(|addr| prefix.contains(&addr))
        }
        (acl_entry::FIELD_SRC_MAC, AttrValue::Mac(mac)) => masked_eq(key.src_mac, *mac, mac_mask),
        (acl_entry::FIELD_DST_MAC, AttrValue::Mac(mac)) => masked_eq(key.dst_mac, *mac, mac_mask),
        (acl_entry::FIELD_IN_PORTS, AttrValue::OidList(ports)) => {
            key.in_port.is_some_and(|port| ports.contains(&port))
        }
        (acl_entry::FIELD_OUT_PORTS, AttrValue::OidList(ports)) => {
            key.out_port.is_some_and(|port| ports.contains(&port))
        }
        (acl_entry::FIELD_IN_PORT, AttrValue::Oid(port)) => key.in_port == Some(*port),
        (acl_entry::FIELD_OUT_PORT, AttrValue::Oid(port)) => key.out_port == Some(*port),
        (acl_entry::FIELD_OUTER_VLAN_ID, AttrValue::U16(v)) => masked_eq(key.outer_vlan_id, *v, m16),
        (acl_entry::FIELD_INNER_VLAN_ID, AttrValue::U16(v)) => masked_eq(key.inner_vlan_id, *v, m16),
        (acl_entry::FIELD_L4_SRC_PORT, AttrValue::U16(v)) => masked_eq(key.l4_src_port, *v, m16),
        (acl_entry::FIELD_L4_DST_PORT, AttrValue::U16(v)) => masked_eq(key.l4_dst_port, *v, m16),
        (acl_entry::FIELD_ETHER_TYPE, AttrValue::U16(v)) => masked_eq(key.ether_type, *v, m16),
        (acl_entry::FIELD_IP_PROTOCOL, AttrValue::U8(v)) => masked_eq(key.ip_protocol, *v, m8),
        (acl_entry::FIELD_DSCP, AttrValue::U8(v)) => masked_eq(key.dscp, *v, m8),
        (acl_entry::FIELD_ECN, AttrValue::U8(v)) => masked_eq(key.ecn, *v, m8),
        (acl_entry::FIELD_TTL, AttrValue::U8(v)) => masked_eq(key.ttl, *v, m8),
        (acl_entry::FIELD_TC, AttrValue::U8(v)) => masked_eq(key.tc, *v, m8),
        (acl_entry::FIELD_TCP_FLAGS, AttrValue::U8(v)) => masked_eq(key.tcp_flags, *v, m8),
        (acl_entry::FIELD_ICMP_TYPE, AttrValue::U8(v)) => masked_eq(key.icmp_type, *v, m8),
        (acl_entry::FIELD_ICMP_CODE, AttrValue::U8(v)) => masked_eq(key.icmp_code, *v, m8),
        (acl_entry::FIELD_ACL_USER_META, AttrValue::U32(v)) => masked_eq(key.user_meta, *v, m32),
        (acl_entry::FIELD_ACL_RANGE_TYPE, AttrValue::OidList(ranges)) => ranges
            .iter()
            .all(|range| range_matches(state, *range, key)),
        _ => false,
    }
}

fn range_matches(state: &StoreState, range: u64, key: &AclKey) -> bool {
    let Some(range) = state.get(range) else {
        return false;
    };
    let Some(AttrValue::U32Range(limit)) = range.get(acl_range::LIMIT) else {
        return false;
    };
    let value = match range.get_enum(acl_range::TYPE) {
        Some(acl_range_type::L4_SRC_PORT_RANGE) => key.l4_src_port.map(u32::from),
        Some(acl_range_type::L4_DST_PORT_RANGE) => key.l4_dst_port.map(u32::from),
        Some(acl_range_type::OUTER_VLAN) => key.outer_vlan_id.map(u32::from),
        Some(acl_range_type::INNER_VLAN) => key.inner_vlan_id.map(u32::from),
        Some(acl_range_type::PACKET_LENGTH) => Some(key.packet_length),
        _ => None,
    };
    value.is_some_and(|v| limit.contains(v))
}

/// Actions of `entry` in a fixed order: packet action and redirect first,
/// then the non-terminating actions.
pub fn entry_actions(entry: &StoredObject) -> Vec<AclAction> {
    let mut actions = Vec::new();
    if let Some(action) = entry
        .get_enum(acl_entry::ACTION_PACKET_ACTION)
        .and_then(AclAction::from_packet_action)
    {
        actions.push(action);
    }
    if let Some(target) = entry.get_oid(acl_entry::ACTION_REDIRECT) {
        actions.push(AclAction::Redirect(target));
    }
    if let Some(counter) = entry.get_oid(acl_entry::ACTION_COUNTER) {
        actions.push(AclAction::Count(counter));
    }
    for (id, value) in entry.attrs() {
        let action = match (*id, value) {
            (acl_entry::ACTION_SET_TC, AttrValue::U8(tc)) => AclAction::SetTc(*tc),
            (acl_entry::ACTION_SET_DSCP, AttrValue::U8(dscp)) => AclAction::SetDscp(*dscp),
            (acl_entry::ACTION_SET_SRC_MAC, AttrValue::Mac(mac)) => AclAction::SetSrcMac(*mac),
            (acl_entry::ACTION_SET_DST_MAC, AttrValue::Mac(mac)) => AclAction::SetDstMac(*mac),
            (acl_entry::ACTION_SET_ACL_META_DATA, AttrValue::U32(meta)) => {
                AclAction::SetUserMeta(*meta)
            }
            (acl_entry::ACTION_SET_POLICER, AttrValue::Oid(policer)) => {
                AclAction::SetPolicer(*policer)
            }
            (acl_entry::ACTION_MIRROR_INGRESS, AttrValue::OidList(sessions)) => {
                AclAction::MirrorIngress(sessions.clone())
            }
            (acl_entry::ACTION_MIRROR_EGRESS, AttrValue::OidList(sessions)) => {
                AclAction::MirrorEgress(sessions.clone())
            }
            _ => continue,
        };
        actions.push(action);
    }
    actions
}

/// Disposition of the first terminating action in `actions`.
///
/// A terminating packet action outranks a redirect on the same entry.
pub fn terminal_disposition(actions: &[AclAction]) -> Option<Disposition> {
    actions.iter().find_map(AclAction::terminal)
}
