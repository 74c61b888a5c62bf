//! Route and next hop resolution.
//!
//! [`RouteEngine::resolve_route`] answers the longest-prefix match for an
//! address in a virtual router and maps the route's action to a
//! [`RouteResult`]. [`RouteEngine::resolve_group`] picks one next hop of a
//! next hop group for a flow hash (or a forwarding class for class-based
//! groups), honoring member weights and liveness.

mod group;
mod hash;
pub mod lpm;

pub use hash::{flow_hash, FlowKey};

use crate::config::EngineConfig;
use crate::error::SaiStatus;
use crate::schema::catalog::{next_hop_group, next_hop_group_type, packet_action, route_entry};
use crate::store::{ObjectStore, StoreState};
use crate::types::{object_type_of, ObjectType, RawSaiObjectId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sonic_types::IpAddress;
use thiserror::Error;

/// Forwarding outcome of a route lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "oid", rename_all = "snake_case")]
pub enum RouteResult {
    Drop,
    Trap,
    NextHop(RawSaiObjectId),
    NextHopGroup(RawSaiObjectId),
    RouterInterface(RawSaiObjectId),
}

/// Resolution failures. These are lookup outcomes, not store faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route to {addr} in virtual router oid:0x{vr:x}")]
    NoRoute { vr: RawSaiObjectId, addr: IpAddress },

    #[error("next hop group oid:0x{0:x} has no eligible member")]
    GroupEmpty(RawSaiObjectId),

    #[error("no next hop group oid:0x{0:x}")]
    NoSuchGroup(RawSaiObjectId),
}

impl RouteError {
    pub fn status(&self) -> SaiStatus {
        match self {
            RouteError::NoRoute { .. } => SaiStatus::NoRoute,
            RouteError::GroupEmpty(_) => SaiStatus::GroupEmpty,
            RouteError::NoSuchGroup(_) => SaiStatus::NotFound,
        }
    }
}

/// Resolution over one store snapshot.
pub(crate) struct Resolver<'s> {
    state: &'s StoreState,
}

impl<'s> Resolver<'s> {
    pub(crate) fn new(state: &'s StoreState) -> Self {
        Resolver { state }
    }

    pub(crate) fn route(
        &self,
        vr: RawSaiObjectId,
        addr: &IpAddress,
    ) -> Result<RouteResult, RouteError> {
        let route = self
            .state
            .lookup_route(vr, addr)
            .ok_or(RouteError::NoRoute { vr, addr: *addr })?;

        let action = route
            .get_enum(route_entry::PACKET_ACTION)
            .unwrap_or(packet_action::FORWARD);
        let result = match action {
            packet_action::DROP | packet_action::DENY => RouteResult::Drop,
            packet_action::TRAP => RouteResult::Trap,
            _ => match route.get_oid(route_entry::NEXT_HOP_ID) {
                None => RouteResult::Drop,
                Some(target) => match object_type_of(target) {
                    Some(ObjectType::NextHop) => RouteResult::NextHop(target),
                    Some(ObjectType::NextHopGroup) => RouteResult::NextHopGroup(target),
                    Some(ObjectType::RouterInterface) => RouteResult::RouterInterface(target),
                    other => {
                        warn!(
                            "Route oid:0x{:x} points at unexpected {:?} oid:0x{:x}",
                            route.oid(),
                            other,
                            target
                        );
                        RouteResult::Drop
                    }
                },
            },
        };
        debug!("Resolved {} in vr oid:0x{:x} to {:?}", addr, vr, result);
        Ok(result)
    }

    pub(crate) fn group(
        &self,
        group: RawSaiObjectId,
        selector: u64,
    ) -> Result<RawSaiObjectId, RouteError> {
        group::select_member(self.state, group, selector)
    }

    /// Resolves `group` for a flow: class-based groups select by `class`,
    /// every other type by `hash`.
    pub(crate) fn group_for_flow(
        &self,
        group: RawSaiObjectId,
        hash: u64,
        class: u8,
    ) -> Result<RawSaiObjectId, RouteError> {
        let class_based = self
            .state
            .get(group)
            .and_then(|g| g.get_enum(next_hop_group::TYPE))
            == Some(next_hop_group_type::CLASS_BASED);
        let selector = if class_based { u64::from(class) } else { hash };
        self.group(group, selector)
    }
}

/// Route and group resolution against one store.
pub struct RouteEngine<'a> {
    store: &'a ObjectStore,
    config: EngineConfig,
}

impl<'a> RouteEngine<'a> {
    pub fn new(store: &'a ObjectStore, config: &EngineConfig) -> Self {
        RouteEngine {
            store,
            config: config.clone(),
        }
    }

    /// Longest-prefix match of `addr` in `vr`.
    pub fn resolve_route(
        &self,
        vr: RawSaiObjectId,
        addr: &IpAddress,
    ) -> Result<RouteResult, RouteError> {
        let view = self.store.view();
        Resolver::new(&view).route(vr, addr)
    }

    /// The next hop `group` selects for `selector`, a flow hash or, for a
    /// class-based group, the forwarding class.
    pub fn resolve_group(
        &self,
        group: RawSaiObjectId,
        selector: u64,
    ) -> Result<RawSaiObjectId, RouteError> {
        let view = self.store.view();
        Resolver::new(&view).group(group, selector)
    }

    /// Flow hash with the configured seed.
    pub fn flow_hash(&self, key: &FlowKey) -> u64 {
        flow_hash(key, self.config.flow_hash_seed)
    }
}
