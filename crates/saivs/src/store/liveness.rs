//! Oper-status derived liveness.
//!
//! Objects are up unless reported down through
//! [`ObjectStore::report_oper_status`](super::ObjectStore::report_oper_status);
//! BFD sessions start down. A next hop is live when it, its router interface
//! and that interface's port are all up. A group member is active when its
//! next hop is live and its monitored object, if any, is up.

use super::{StoreState, StoredObject};
use crate::schema::catalog::{
    next_hop, next_hop_group_member, next_hop_group_member_observed_role as observed_role,
    router_interface,
};
use crate::types::{object_type_of, ObjectType, RawSaiObjectId};
use crate::value::AttrValue;
use log::debug;

impl StoreState {
    /// False once `oid` has been reported down.
    pub fn is_up(&self, oid: RawSaiObjectId) -> bool {
        !self.down.contains(&oid)
    }

    pub fn next_hop_is_live(&self, nh: RawSaiObjectId) -> bool {
        if !self.is_up(nh) {
            return false;
        }
        let Some(rif) = self.get(nh).and_then(|o| o.get_oid(next_hop::ROUTER_INTERFACE_ID)) else {
            return true;
        };
        if !self.is_up(rif) {
            return false;
        }
        self.get(rif)
            .and_then(|o| o.get_oid(router_interface::PORT_ID))
            .map_or(true, |port| self.is_up(port))
    }

    /// Liveness of an arbitrary monitored object.
    pub fn monitored_is_live(&self, oid: RawSaiObjectId) -> bool {
        match object_type_of(oid) {
            Some(ObjectType::NextHop) => self.next_hop_is_live(oid),
            _ => self.is_up(oid),
        }
    }

    pub fn member_is_active(&self, member: &StoredObject) -> bool {
        let nh_live = member
            .get_oid(next_hop_group_member::NEXT_HOP_ID)
            .is_some_and(|nh| self.next_hop_is_live(nh));
        let monitored_live = member
            .get_oid(next_hop_group_member::MONITORED_OBJECT)
            .map_or(true, |oid| self.monitored_is_live(oid));
        nh_live && monitored_live
    }

    /// Recomputes `OBSERVED_ROLE` of one group member.
    pub(super) fn refresh_member_role(&mut self, member: RawSaiObjectId) {
        let Some(active) = self.get(member).map(|m| self.member_is_active(m)) else {
            return;
        };
        let role = if active {
            observed_role::ACTIVE
        } else {
            observed_role::INACTIVE
        };
        if let Some(object) = self.objects.get_mut(&member) {
            let previous = object
                .attrs
                .insert(next_hop_group_member::OBSERVED_ROLE, AttrValue::Enum(role));
            if previous != Some(AttrValue::Enum(role)) {
                debug!(
                    "Next hop group member oid:0x{:x} is now {}",
                    member,
                    if active { "active" } else { "inactive" }
                );
            }
        }
    }

    pub(super) fn refresh_all_member_roles(&mut self) {
        let members: Vec<RawSaiObjectId> = self
            .by_type
            .get(&ObjectType::NextHopGroupMember)
            .map(|oids| oids.iter().copied().collect())
            .unwrap_or_default();
        for member in members {
            self.refresh_member_role(member);
        }
    }
}
