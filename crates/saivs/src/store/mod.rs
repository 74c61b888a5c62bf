//! The object store.
//!
//! [`ObjectStore`] is the authoritative table of live objects. It validates
//! every mutation through the [`SchemaRegistry`], keeps the back-reference
//! [`RefLedger`] that protects referenced objects from removal, indexes
//! entry objects by natural key and route entries by prefix, tracks
//! oper-status liveness and keeps the bucket table of every fine-grained
//! next hop group.
//!
//! # Locking
//!
//! One `parking_lot::RwLock` guards the whole state: create, remove, set and
//! liveness reports take it exclusively; gets and engine scans take it
//! shared through [`StoreView`]. Every mutation validates completely before
//! it touches state, so a failed call leaves the store exactly as it was.

mod buckets;
mod ledger;
mod liveness;
mod object;
mod view;

pub use ledger::RefLedger;
pub use object::StoredObject;
pub use view::StoreView;

use crate::config::EngineConfig;
use crate::error::{SaiError, SaiResult};
use buckets::Reshare;
use crate::route::lpm::LpmIndex;
use crate::schema::catalog::{
    bfd_session, bfd_session_state, port, port_oper_status, route_entry, next_hop_group_member,
};
use crate::schema::{AttrId, AttrSpec, Attribute, ObjectSchema, SchemaRegistry};
use crate::types::{encode_oid, ObjectType, RawSaiObjectId, MAX_OBJECT_INDEX};
use crate::value::AttrValue;
use log::{debug, info, warn};
use parking_lot::RwLock;
use sonic_types::{IpAddress, IpPrefix};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Store contents; read through [`StoreView`], mutated only by
/// [`ObjectStore`].
#[derive(Debug, Default)]
pub struct StoreState {
    objects: HashMap<RawSaiObjectId, StoredObject>,
    by_type: BTreeMap<ObjectType, BTreeSet<RawSaiObjectId>>,
    keys: HashMap<(ObjectType, String), RawSaiObjectId>,
    ledger: RefLedger,
    routes: LpmIndex,
    down: HashSet<RawSaiObjectId>,
    buckets: HashMap<RawSaiObjectId, Vec<RawSaiObjectId>>,
    last_index: u64,
}

impl StoreState {
    pub fn get(&self, oid: RawSaiObjectId) -> Option<&StoredObject> {
        self.objects.get(&oid)
    }

    /// Objects of one type in ascending id (creation) order.
    pub fn objects_of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &StoredObject> {
        self.by_type
            .get(&object_type)
            .into_iter()
            .flatten()
            .filter_map(|oid| self.objects.get(oid))
    }

    /// The route entry whose prefix is the longest match for `addr`.
    pub fn lookup_route(&self, vr: RawSaiObjectId, addr: &IpAddress) -> Option<&StoredObject> {
        self.routes.lookup(vr, addr).and_then(|oid| self.get(oid))
    }

    /// Objects of `object_type` that reference `target`, ascending id.
    pub fn referrers_of_type(
        &self,
        target: RawSaiObjectId,
        object_type: ObjectType,
    ) -> impl Iterator<Item = &StoredObject> {
        self.ledger
            .referrers(target)
            .into_iter()
            .filter_map(|oid| self.objects.get(&oid))
            .filter(move |object| object.object_type() == object_type)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn allocate(&mut self, object_type: ObjectType, max: usize) -> SaiResult<RawSaiObjectId> {
        if self.last_index >= MAX_OBJECT_INDEX {
            return Err(SaiError::TableFull { max });
        }
        self.last_index += 1;
        Ok(encode_oid(object_type, self.last_index))
    }

    /// Checks that every reference in `values` names a live object of an
    /// allowed type.
    fn check_references(
        &self,
        schema: &ObjectSchema,
        values: &BTreeMap<AttrId, AttrValue>,
    ) -> SaiResult<()> {
        for (id, value) in values {
            if !value.kind().is_reference() {
                continue;
            }
            if let Some(spec) = schema.get(*id) {
                self.check_value_references(spec, value)?;
            }
        }
        Ok(())
    }

    fn check_value_references(&self, spec: &AttrSpec, value: &AttrValue) -> SaiResult<()> {
        for oid in value.referenced_oids() {
            let Some(target) = self.objects.get(&oid) else {
                return Err(SaiError::InvalidReference {
                    attr: spec.name,
                    oid,
                    reason: "no such object".to_string(),
                });
            };
            if !spec.object_types.is_empty() && !spec.object_types.contains(&target.object_type())
            {
                return Err(SaiError::InvalidReference {
                    attr: spec.name,
                    oid,
                    reason: format!("{} is not an allowed object type", target.object_type()),
                });
            }
        }
        Ok(())
    }
}

/// Natural key of an entry object: its key attribute values in id order.
fn natural_key(schema: &ObjectSchema, values: &BTreeMap<AttrId, AttrValue>) -> Option<String> {
    if !schema.is_entry() {
        return None;
    }
    let parts: Vec<String> = schema
        .key_attrs()
        .map(|spec| {
            values
                .get(&spec.id)
                .map(|value| spec.format_value(value))
                .unwrap_or_default()
        })
        .collect();
    Some(parts.join(","))
}

/// (virtual router, destination) of a route entry.
fn route_key(values: &BTreeMap<AttrId, AttrValue>) -> Option<(RawSaiObjectId, IpPrefix)> {
    let vr = values.get(&route_entry::VR_ID).and_then(AttrValue::as_oid)?;
    let prefix = values
        .get(&route_entry::DESTINATION)
        .and_then(AttrValue::as_prefix)?;
    Some((vr, *prefix))
}

/// The shared object table.
#[derive(Debug)]
pub struct ObjectStore {
    state: RwLock<StoreState>,
    max_objects: usize,
    fine_grained_default_size: u32,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ObjectStore {
    pub fn new(config: &EngineConfig) -> Self {
        ObjectStore {
            state: RwLock::new(StoreState::default()),
            max_objects: config.max_objects,
            fine_grained_default_size: config.fine_grained_default_size,
        }
    }

    /// Creates an object and returns its id.
    ///
    /// # Errors
    ///
    /// Schema errors from [`SchemaRegistry::validate_create`],
    /// `InvalidReference` for a reference to a missing object or a
    /// disallowed type, `AlreadyExists` for a duplicate natural key and
    /// `TableFull` when the object limit is reached.
    pub fn create(&self, object_type: ObjectType, attrs: &[Attribute]) -> SaiResult<RawSaiObjectId> {
        let result = self.try_create(object_type, attrs);
        match &result {
            Ok(oid) => debug!("Created {} oid:0x{:x}", object_type, oid),
            Err(e) => warn!("Failed to create {}: {}", object_type, e),
        }
        result
    }

    fn try_create(&self, object_type: ObjectType, attrs: &[Attribute]) -> SaiResult<RawSaiObjectId> {
        let registry = SchemaRegistry::global();
        let values = registry.validate_create(object_type, attrs)?;
        let schema = registry
            .schema(object_type)
            .ok_or_else(|| SaiError::internal(format!("no schema for {}", object_type)))?;

        let mut state = self.state.write();
        state.check_references(schema, &values)?;

        let key = natural_key(schema, &values);
        if let Some(key) = &key {
            if state.keys.contains_key(&(object_type, key.clone())) {
                return Err(SaiError::AlreadyExists {
                    object_type,
                    key: key.clone(),
                });
            }
        }
        if state.objects.len() >= self.max_objects {
            return Err(SaiError::TableFull {
                max: self.max_objects,
            });
        }

        let oid = state.allocate(object_type, self.max_objects)?;
        let route = if object_type == ObjectType::RouteEntry {
            route_key(&values)
        } else {
            None
        };
        let stat_ids = schema.attrs().filter(|spec| spec.statistic).map(|spec| spec.id);
        let object = StoredObject::new(object_type, oid, values, stat_ids);

        state.ledger.add_all(&object.referenced_oids(), oid);
        if let Some(key) = key {
            state.keys.insert((object_type, key), oid);
        }
        if let Some((vr, prefix)) = route {
            state.routes.insert(vr, &prefix, oid);
        }
        if object_type == ObjectType::BfdSession {
            state.down.insert(oid);
        }
        state.by_type.entry(object_type).or_default().insert(oid);
        state.objects.insert(oid, object);
        if object_type == ObjectType::NextHopGroupMember {
            state.refresh_member_role(oid);
            let group = state
                .get(oid)
                .and_then(|m| m.get_oid(next_hop_group_member::NEXT_HOP_GROUP_ID));
            if let Some(group) = group {
                state.reshare_buckets(group, self.fine_grained_default_size, Reshare::Rebalance);
            }
        }
        Ok(oid)
    }

    /// Removes an object.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `ObjectInUse` while any other object
    /// references it.
    pub fn remove(&self, oid: RawSaiObjectId) -> SaiResult<()> {
        let result = self.try_remove(oid);
        match &result {
            Ok(object_type) => debug!("Removed {} oid:0x{:x}", object_type, oid),
            Err(e) => warn!("Failed to remove oid:0x{:x}: {}", oid, e),
        }
        result.map(|_| ())
    }

    fn try_remove(&self, oid: RawSaiObjectId) -> SaiResult<ObjectType> {
        let registry = SchemaRegistry::global();
        let mut state = self.state.write();

        let object_type = state
            .get(oid)
            .map(StoredObject::object_type)
            .ok_or_else(|| SaiError::no_such_object(oid))?;
        let referrers = state.ledger.ref_count(oid);
        if referrers > 0 {
            return Err(SaiError::ObjectInUse { oid, referrers });
        }

        let object = state
            .objects
            .remove(&oid)
            .ok_or_else(|| SaiError::no_such_object(oid))?;
        state.ledger.release_all(&object.referenced_oids(), oid)?;
        if let Some(schema) = registry.schema(object_type) {
            if let Some(key) = natural_key(schema, object.attrs()) {
                state.keys.remove(&(object_type, key));
            }
        }
        if object_type == ObjectType::RouteEntry {
            if let Some((vr, prefix)) = route_key(object.attrs()) {
                state.routes.remove(vr, &prefix);
            }
        }
        if let Some(oids) = state.by_type.get_mut(&object_type) {
            oids.remove(&oid);
        }
        state.down.remove(&oid);
        match object_type {
            ObjectType::NextHopGroupMember => {
                if let Some(group) = object.get_oid(next_hop_group_member::NEXT_HOP_GROUP_ID) {
                    state.reshare_buckets(group, self.fine_grained_default_size, Reshare::Orphans);
                }
            }
            ObjectType::NextHopGroup => {
                state.buckets.remove(&oid);
            }
            _ => {}
        }
        Ok(object_type)
    }

    /// Sets one attribute of a live object.
    ///
    /// Reference-kind attributes move their back-references from the old
    /// targets to the new ones. Setting a statistic attribute (only `0` is
    /// accepted) resets its stat cell.
    pub fn set_attribute(&self, oid: RawSaiObjectId, attr: &Attribute) -> SaiResult<()> {
        let result = self.try_set(oid, attr);
        if let Err(e) = &result {
            warn!("Failed to set attribute 0x{:x} on oid:0x{:x}: {}", attr.id, oid, e);
        }
        result
    }

    fn try_set(&self, oid: RawSaiObjectId, attr: &Attribute) -> SaiResult<()> {
        let registry = SchemaRegistry::global();
        let mut state = self.state.write();

        let object_type = state
            .get(oid)
            .map(StoredObject::object_type)
            .ok_or_else(|| SaiError::no_such_object(oid))?;
        let spec = registry.validate_set(object_type, attr)?;

        if spec.statistic {
            if let Some(object) = state.get(oid) {
                object.reset_stat(attr.id);
            }
            debug!("Cleared {} on oid:0x{:x}", spec.name, oid);
            return Ok(());
        }
        state.check_value_references(spec, &attr.value)?;

        let object = state
            .objects
            .get_mut(&oid)
            .ok_or_else(|| SaiError::no_such_object(oid))?;
        let old = object.attrs.insert(attr.id, attr.value.clone());
        let old_refs = old.map(|value| value.referenced_oids()).unwrap_or_default();
        state.ledger.release_all(&old_refs, oid)?;
        state.ledger.add_all(&attr.value.referenced_oids(), oid);

        if object_type == ObjectType::NextHopGroupMember
            && (attr.id == next_hop_group_member::NEXT_HOP_ID
                || attr.id == next_hop_group_member::MONITORED_OBJECT)
        {
            state.refresh_member_role(oid);
        }
        if object_type == ObjectType::NextHopGroupMember
            && attr.id == next_hop_group_member::WEIGHT
        {
            let group = state
                .get(oid)
                .and_then(|m| m.get_oid(next_hop_group_member::NEXT_HOP_GROUP_ID));
            if let Some(group) = group {
                state.reshare_buckets(group, self.fine_grained_default_size, Reshare::Rebalance);
            }
        }
        debug!("Set {}={} on oid:0x{:x}", spec.name, spec.format_value(&attr.value), oid);
        Ok(())
    }

    /// Reads one attribute.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown object or for a registered attribute that
    /// has neither a value nor a default; `UnknownAttribute` for an id the
    /// object type does not define.
    pub fn get_attribute(&self, oid: RawSaiObjectId, attr_id: AttrId) -> SaiResult<AttrValue> {
        let state = self.state.read();
        let object = state.get(oid).ok_or_else(|| SaiError::no_such_object(oid))?;
        let spec = SchemaRegistry::global().lookup(object.object_type(), attr_id)?;
        if spec.statistic {
            return object
                .stat(attr_id)
                .map(AttrValue::U64)
                .ok_or_else(|| SaiError::internal(format!("missing stat cell {}", spec.name)));
        }
        object.get(attr_id).cloned().ok_or_else(|| {
            SaiError::not_found(format!("{} on oid:0x{:x} (not set)", spec.name, oid))
        })
    }

    /// Every attribute value of an object, statistics included.
    pub fn get_all(&self, oid: RawSaiObjectId) -> SaiResult<BTreeMap<AttrId, AttrValue>> {
        let state = self.state.read();
        let object = state.get(oid).ok_or_else(|| SaiError::no_such_object(oid))?;
        let mut values = object.attrs().clone();
        values.extend(object.stats().map(|(id, v)| (id, AttrValue::U64(v))));
        Ok(values)
    }

    pub fn object_type_of(&self, oid: RawSaiObjectId) -> Option<ObjectType> {
        self.state.read().get(oid).map(StoredObject::object_type)
    }

    pub fn exists(&self, oid: RawSaiObjectId) -> bool {
        self.state.read().objects.contains_key(&oid)
    }

    /// References currently held on `oid`.
    pub fn ref_count(&self, oid: RawSaiObjectId) -> usize {
        self.state.read().ledger.ref_count(oid)
    }

    pub fn referrers(&self, oid: RawSaiObjectId) -> Vec<RawSaiObjectId> {
        self.state.read().ledger.referrers(oid)
    }

    /// Ids of every live object of `object_type`, ascending.
    pub fn objects_of_type(&self, object_type: ObjectType) -> Vec<RawSaiObjectId> {
        self.state
            .read()
            .by_type
            .get(&object_type)
            .map(|oids| oids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Id of the entry object of `object_type` whose natural key formats
    /// as `key`.
    pub fn find_by_key(&self, object_type: ObjectType, key: &str) -> Option<RawSaiObjectId> {
        self.state
            .read()
            .keys
            .get(&(object_type, key.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Records an oper-status change of `oid` and re-derives the observed
    /// role of every next hop group member.
    ///
    /// Ports mirror the status into `OPER_STATUS` and BFD sessions into
    /// `STATE`.
    pub fn report_oper_status(&self, oid: RawSaiObjectId, up: bool) -> SaiResult<()> {
        let mut state = self.state.write();
        let object_type = state
            .get(oid)
            .map(StoredObject::object_type)
            .ok_or_else(|| SaiError::no_such_object(oid))?;

        let changed = if up {
            state.down.remove(&oid)
        } else {
            state.down.insert(oid)
        };

        let mirrored = match object_type {
            ObjectType::Port => Some((
                port::OPER_STATUS,
                if up { port_oper_status::UP } else { port_oper_status::DOWN },
            )),
            ObjectType::BfdSession => Some((
                bfd_session::STATE,
                if up { bfd_session_state::UP } else { bfd_session_state::DOWN },
            )),
            _ => None,
        };
        if let (Some((attr_id, value)), Some(object)) = (mirrored, state.objects.get_mut(&oid)) {
            object.attrs.insert(attr_id, AttrValue::Enum(value));
        }

        state.refresh_all_member_roles();
        if changed {
            info!(
                "{} oid:0x{:x} is now oper {}",
                object_type,
                oid,
                if up { "up" } else { "down" }
            );
        }
        Ok(())
    }

    /// Current stat cell values of a counter-bearing object.
    pub fn get_stats(&self, oid: RawSaiObjectId) -> SaiResult<Vec<(AttrId, u64)>> {
        let state = self.state.read();
        let object = state.get(oid).ok_or_else(|| SaiError::no_such_object(oid))?;
        Ok(object.stats().collect())
    }

    pub fn clear_stats(&self, oid: RawSaiObjectId) -> SaiResult<()> {
        let state = self.state.read();
        let object = state.get(oid).ok_or_else(|| SaiError::no_such_object(oid))?;
        object.reset_stats();
        debug!("Cleared stats of oid:0x{:x}", oid);
        Ok(())
    }

    /// Takes a shared snapshot for one decision call.
    pub fn view(&self) -> StoreView<'_> {
        StoreView::new(self.state.read())
    }
}

#[cfg(test)]
impl ObjectStore {
    /// Drops `oid` without checking or releasing references, leaving any
    /// referrer pointing at nothing.
    pub(crate) fn forget(&self, oid: RawSaiObjectId) {
        let mut state = self.state.write();
        if let Some(object) = state.objects.remove(&oid) {
            if let Some(oids) = state.by_type.get_mut(&object.object_type()) {
                oids.remove(&oid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaiStatus;
    use crate::schema::catalog::{
        acl_counter, acl_stage, acl_table, next_hop, next_hop_group,
        next_hop_group_member_observed_role, next_hop_group_type, next_hop_type, packet_action,
        router_interface, router_interface_type, virtual_router,
    };
    use crate::types::NULL_OBJECT_ID;
    use pretty_assertions::assert_eq;

    fn create_port(store: &ObjectStore, lane: u32) -> RawSaiObjectId {
        store
            .create(
                ObjectType::Port,
                &[
                    Attribute::new(port::HW_LANE_LIST, AttrValue::U32List(vec![lane])),
                    Attribute::new(port::SPEED, AttrValue::U32(100_000)),
                ],
            )
            .unwrap()
    }

    fn create_vr(store: &ObjectStore) -> RawSaiObjectId {
        store.create(ObjectType::VirtualRouter, &[]).unwrap()
    }

    fn create_rif(store: &ObjectStore, vr: RawSaiObjectId, port: RawSaiObjectId) -> RawSaiObjectId {
        store
            .create(
                ObjectType::RouterInterface,
                &[
                    Attribute::new(router_interface::VIRTUAL_ROUTER_ID, AttrValue::Oid(vr)),
                    Attribute::new(
                        router_interface::TYPE,
                        AttrValue::Enum(router_interface_type::PORT),
                    ),
                    Attribute::new(router_interface::PORT_ID, AttrValue::Oid(port)),
                ],
            )
            .unwrap()
    }

    fn create_nh(store: &ObjectStore, rif: RawSaiObjectId, ip: &str) -> RawSaiObjectId {
        store
            .create(
                ObjectType::NextHop,
                &[
                    Attribute::new(next_hop::TYPE, AttrValue::Enum(next_hop_type::IP)),
                    Attribute::new(next_hop::IP, AttrValue::IpAddress(ip.parse().unwrap())),
                    Attribute::new(next_hop::ROUTER_INTERFACE_ID, AttrValue::Oid(rif)),
                ],
            )
            .unwrap()
    }

    fn create_route(
        store: &ObjectStore,
        vr: RawSaiObjectId,
        prefix: &str,
        target: RawSaiObjectId,
    ) -> SaiResult<RawSaiObjectId> {
        store.create(
            ObjectType::RouteEntry,
            &[
                Attribute::new(route_entry::VR_ID, AttrValue::Oid(vr)),
                Attribute::new(
                    route_entry::DESTINATION,
                    AttrValue::IpPrefix(prefix.parse().unwrap()),
                ),
                Attribute::new(route_entry::NEXT_HOP_ID, AttrValue::Oid(target)),
            ],
        )
    }

    /// Virtual router, port, router interface and one next hop.
    fn topology(store: &ObjectStore) -> (RawSaiObjectId, RawSaiObjectId, RawSaiObjectId) {
        let vr = create_vr(store);
        let port = create_port(store, 0);
        let rif = create_rif(store, vr, port);
        (vr, port, rif)
    }

    #[test]
    fn test_create_fills_defaults_and_types_oid() {
        let store = ObjectStore::default();
        let vr = create_vr(&store);
        assert_eq!(store.object_type_of(vr), Some(ObjectType::VirtualRouter));
        assert_eq!(crate::types::object_type_of(vr), Some(ObjectType::VirtualRouter));
        assert_eq!(
            store.get_attribute(vr, virtual_router::ADMIN_V4_STATE).unwrap(),
            AttrValue::Bool(true)
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reference_protection() {
        let store = ObjectStore::default();
        let (vr, port, rif) = topology(&store);
        assert_eq!(store.ref_count(vr), 1);
        assert_eq!(store.referrers(port), vec![rif]);

        let err = store.remove(vr).unwrap_err();
        assert_eq!(err.status(), SaiStatus::ObjectInUse);

        store.remove(rif).unwrap();
        assert_eq!(store.ref_count(vr), 0);
        store.remove(vr).unwrap();
        store.remove(port).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.remove(vr).unwrap_err().status(), SaiStatus::NotFound);
    }

    #[test]
    fn test_invalid_reference_leaves_store_unchanged() {
        let store = ObjectStore::default();
        let port = create_port(&store, 0);
        let missing = encode_oid(ObjectType::VirtualRouter, 999);
        let err = store
            .create(
                ObjectType::RouterInterface,
                &[
                    Attribute::new(router_interface::VIRTUAL_ROUTER_ID, AttrValue::Oid(missing)),
                    Attribute::new(
                        router_interface::TYPE,
                        AttrValue::Enum(router_interface_type::PORT),
                    ),
                    Attribute::new(router_interface::PORT_ID, AttrValue::Oid(port)),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, SaiError::InvalidReference { .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.ref_count(port), 0);

        // a port where a virtual router is expected
        let err = store
            .create(
                ObjectType::RouterInterface,
                &[
                    Attribute::new(router_interface::VIRTUAL_ROUTER_ID, AttrValue::Oid(port)),
                    Attribute::new(
                        router_interface::TYPE,
                        AttrValue::Enum(router_interface_type::LOOPBACK),
                    ),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, SaiError::InvalidReference { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_moves_back_references() {
        let store = ObjectStore::default();
        let (vr, _, rif) = topology(&store);
        let nh1 = create_nh(&store, rif, "10.0.0.1");
        let nh2 = create_nh(&store, rif, "10.0.0.2");
        let route = create_route(&store, vr, "10.1.0.0/16", nh1).unwrap();
        assert_eq!(store.ref_count(nh1), 1);

        store
            .set_attribute(route, &Attribute::new(route_entry::NEXT_HOP_ID, AttrValue::Oid(nh2)))
            .unwrap();
        assert_eq!(store.ref_count(nh1), 0);
        assert_eq!(store.ref_count(nh2), 1);
        store.remove(nh1).unwrap();

        store
            .set_attribute(
                route,
                &Attribute::new(route_entry::NEXT_HOP_ID, AttrValue::Oid(NULL_OBJECT_ID)),
            )
            .unwrap();
        assert_eq!(store.ref_count(nh2), 0);
    }

    #[test]
    fn test_failed_set_leaves_value() {
        let store = ObjectStore::default();
        let (vr, port, rif) = topology(&store);
        let nh = create_nh(&store, rif, "10.0.0.1");
        let route = create_route(&store, vr, "10.1.0.0/16", nh).unwrap();

        let err = store
            .set_attribute(route, &Attribute::new(route_entry::NEXT_HOP_ID, AttrValue::Oid(port)))
            .unwrap_err();
        assert!(matches!(err, SaiError::InvalidReference { .. }));
        assert_eq!(
            store.get_attribute(route, route_entry::NEXT_HOP_ID).unwrap(),
            AttrValue::Oid(nh)
        );
        assert_eq!(store.ref_count(nh), 1);

        let err = store
            .set_attribute(route, &Attribute::new(route_entry::PACKET_ACTION, AttrValue::Enum(42)))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidAttribute);
        assert_eq!(
            store.get_attribute(route, route_entry::PACKET_ACTION).unwrap(),
            AttrValue::Enum(packet_action::FORWARD)
        );

        let err = store
            .set_attribute(0x42, &Attribute::new(route_entry::PACKET_ACTION, AttrValue::Enum(0)))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::NotFound);
    }

    #[test]
    fn test_duplicate_natural_key() {
        let store = ObjectStore::default();
        let (vr, _, rif) = topology(&store);
        let nh = create_nh(&store, rif, "10.0.0.1");
        create_route(&store, vr, "10.1.0.0/16", nh).unwrap();
        let err = create_route(&store, vr, "10.1.0.0/16", nh).unwrap_err();
        assert_eq!(err.status(), SaiStatus::AlreadyExists);
        assert_eq!(store.objects_of_type(ObjectType::RouteEntry).len(), 1);
        assert_eq!(store.ref_count(nh), 1);

        let other_vr = create_vr(&store);
        create_route(&store, other_vr, "10.1.0.0/16", nh).unwrap();
    }

    #[test]
    fn test_route_index_follows_lifecycle() {
        let store = ObjectStore::default();
        let (vr, _, rif) = topology(&store);
        let nh = create_nh(&store, rif, "10.0.0.1");
        let wide = create_route(&store, vr, "10.0.0.0/8", nh).unwrap();
        let narrow = create_route(&store, vr, "10.1.0.0/16", nh).unwrap();
        let addr: IpAddress = "10.1.2.3".parse().unwrap();

        let found = store.view().lookup_route(vr, &addr).map(StoredObject::oid);
        assert_eq!(found, Some(narrow));
        store.remove(narrow).unwrap();
        let found = store.view().lookup_route(vr, &addr).map(StoredObject::oid);
        assert_eq!(found, Some(wide));
        // the key is free again
        create_route(&store, vr, "10.1.0.0/16", nh).unwrap();
    }

    #[test]
    fn test_get_unset_attribute_is_not_found() {
        let store = ObjectStore::default();
        let (_, _, rif) = topology(&store);
        let err = store
            .get_attribute(rif, router_interface::OUTER_VLAN_ID)
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::NotFound);
        let err = store.get_attribute(rif, 0xdead).unwrap_err();
        assert!(matches!(err, SaiError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_stat_cells_get_and_reset() {
        let store = ObjectStore::default();
        let table = store
            .create(
                ObjectType::AclTable,
                &[Attribute::new(acl_table::ACL_STAGE, AttrValue::Enum(acl_stage::INGRESS))],
            )
            .unwrap();
        let counter = store
            .create(
                ObjectType::AclCounter,
                &[Attribute::new(acl_counter::TABLE_ID, AttrValue::Oid(table))],
            )
            .unwrap();
        store.view().get(counter).unwrap().add_stat(acl_counter::PACKETS, 3);
        assert_eq!(
            store.get_attribute(counter, acl_counter::PACKETS).unwrap(),
            AttrValue::U64(3)
        );
        assert_eq!(
            store.get_all(counter).unwrap().get(&acl_counter::PACKETS),
            Some(&AttrValue::U64(3))
        );

        let err = store
            .set_attribute(counter, &Attribute::new(acl_counter::PACKETS, AttrValue::U64(5)))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidAttribute);
        store
            .set_attribute(counter, &Attribute::new(acl_counter::PACKETS, AttrValue::U64(0)))
            .unwrap();
        assert_eq!(
            store.get_stats(counter).unwrap(),
            vec![(acl_counter::PACKETS, 0), (acl_counter::BYTES, 0)]
        );

        store.view().get(counter).unwrap().add_stat(acl_counter::BYTES, 64);
        store.clear_stats(counter).unwrap();
        assert_eq!(
            store.get_attribute(counter, acl_counter::BYTES).unwrap(),
            AttrValue::U64(0)
        );
    }

    #[test]
    fn test_oper_status_drives_member_role() {
        let store = ObjectStore::default();
        let (_, port, rif) = topology(&store);
        let nh = create_nh(&store, rif, "10.0.0.1");
        let group = store
            .create(
                ObjectType::NextHopGroup,
                &[Attribute::new(
                    next_hop_group::TYPE,
                    AttrValue::Enum(next_hop_group_type::DYNAMIC_UNORDERED_ECMP),
                )],
            )
            .unwrap();
        let member = store
            .create(
                ObjectType::NextHopGroupMember,
                &[
                    Attribute::new(next_hop_group_member::NEXT_HOP_GROUP_ID, AttrValue::Oid(group)),
                    Attribute::new(next_hop_group_member::NEXT_HOP_ID, AttrValue::Oid(nh)),
                ],
            )
            .unwrap();
        let role = |store: &ObjectStore| {
            store
                .get_attribute(member, next_hop_group_member::OBSERVED_ROLE)
                .unwrap()
        };
        assert_eq!(
            role(&store),
            AttrValue::Enum(next_hop_group_member_observed_role::ACTIVE)
        );

        store.report_oper_status(port, false).unwrap();
        assert_eq!(
            role(&store),
            AttrValue::Enum(next_hop_group_member_observed_role::INACTIVE)
        );
        assert_eq!(
            store.get_attribute(port, port::OPER_STATUS).unwrap(),
            AttrValue::Enum(port_oper_status::DOWN)
        );

        store.report_oper_status(port, true).unwrap();
        assert_eq!(
            role(&store),
            AttrValue::Enum(next_hop_group_member_observed_role::ACTIVE)
        );

        let missing = encode_oid(ObjectType::Port, 77);
        let err = store.report_oper_status(missing, false).unwrap_err();
        assert_eq!(err.status(), SaiStatus::NotFound);
    }

    #[test]
    fn test_bucket_table_follows_membership() {
        let store = ObjectStore::default();
        let (_, _, rif) = topology(&store);
        let nhs = [create_nh(&store, rif, "10.0.0.1"), create_nh(&store, rif, "10.0.0.2")];
        let fine = store
            .create(
                ObjectType::NextHopGroup,
                &[
                    Attribute::new(
                        next_hop_group::TYPE,
                        AttrValue::Enum(next_hop_group_type::FINE_GRAIN_ECMP),
                    ),
                    Attribute::new(next_hop_group::CONFIGURED_SIZE, AttrValue::U32(8)),
                ],
            )
            .unwrap();
        let ecmp = store
            .create(
                ObjectType::NextHopGroup,
                &[Attribute::new(
                    next_hop_group::TYPE,
                    AttrValue::Enum(next_hop_group_type::DYNAMIC_UNORDERED_ECMP),
                )],
            )
            .unwrap();
        let add = |group: RawSaiObjectId, nh: RawSaiObjectId| {
            store
                .create(
                    ObjectType::NextHopGroupMember,
                    &[
                        Attribute::new(next_hop_group_member::NEXT_HOP_GROUP_ID, AttrValue::Oid(group)),
                        Attribute::new(next_hop_group_member::NEXT_HOP_ID, AttrValue::Oid(nh)),
                    ],
                )
                .unwrap()
        };
        let first = add(fine, nhs[0]);
        let second = add(fine, nhs[1]);
        add(ecmp, nhs[0]);

        assert_eq!(
            store.view().bucket_owners(fine),
            Some(&[first, first, first, first, second, second, second, second][..])
        );
        assert_eq!(store.view().bucket_owners(ecmp), None);

        store.remove(first).unwrap();
        assert_eq!(store.view().bucket_owners(fine), Some(&[second; 8][..]));
        store.remove(second).unwrap();
        assert_eq!(store.view().bucket_owners(fine), None);
    }

    #[test]
    fn test_table_full() {
        let store = ObjectStore::new(&EngineConfig {
            max_objects: 1,
            ..EngineConfig::default()
        });
        create_vr(&store);
        let err = store.create(ObjectType::VirtualRouter, &[]).unwrap_err();
        assert_eq!(err.status(), SaiStatus::TableFull);
    }
}
