//! A live object: its type, id, attribute map and stat cells.

use crate::schema::AttrId;
use crate::types::{ObjectType, RawSaiObjectId, NULL_OBJECT_ID};
use crate::value::AttrValue;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// One object owned by the store.
///
/// Statistic attributes are atomic cells so that evaluation can count under
/// the store's shared lock.
#[derive(Debug)]
pub struct StoredObject {
    object_type: ObjectType,
    oid: RawSaiObjectId,
    pub(super) attrs: BTreeMap<AttrId, AttrValue>,
    pub(super) stats: BTreeMap<AttrId, AtomicU64>,
}

impl StoredObject {
    pub(super) fn new(
        object_type: ObjectType,
        oid: RawSaiObjectId,
        attrs: BTreeMap<AttrId, AttrValue>,
        stat_ids: impl IntoIterator<Item = AttrId>,
    ) -> Self {
        StoredObject {
            object_type,
            oid,
            attrs,
            stats: stat_ids
                .into_iter()
                .map(|id| (id, AtomicU64::new(0)))
                .collect(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn oid(&self) -> RawSaiObjectId {
        self.oid
    }

    pub fn get(&self, id: AttrId) -> Option<&AttrValue> {
        self.attrs.get(&id)
    }

    pub fn attrs(&self) -> &BTreeMap<AttrId, AttrValue> {
        &self.attrs
    }

    pub fn get_bool(&self, id: AttrId) -> Option<bool> {
        self.get(id).and_then(AttrValue::as_bool)
    }

    pub fn get_u32(&self, id: AttrId) -> Option<u32> {
        self.get(id).and_then(AttrValue::as_u32)
    }

    pub fn get_enum(&self, id: AttrId) -> Option<i32> {
        self.get(id).and_then(AttrValue::as_enum)
    }

    /// Non-null object id held by `id`.
    pub fn get_oid(&self, id: AttrId) -> Option<RawSaiObjectId> {
        self.get(id)
            .and_then(AttrValue::as_oid)
            .filter(|oid| *oid != NULL_OBJECT_ID)
    }

    pub fn get_oid_list(&self, id: AttrId) -> &[RawSaiObjectId] {
        self.get(id).and_then(AttrValue::as_oid_list).unwrap_or(&[])
    }

    /// Every non-null object id this object references.
    pub fn referenced_oids(&self) -> Vec<RawSaiObjectId> {
        self.attrs
            .values()
            .flat_map(AttrValue::referenced_oids)
            .collect()
    }

    pub fn stat(&self, id: AttrId) -> Option<u64> {
        self.stats.get(&id).map(|cell| cell.load(Ordering::Relaxed))
    }

    pub fn stats(&self) -> impl Iterator<Item = (AttrId, u64)> + '_ {
        self.stats
            .iter()
            .map(|(id, cell)| (*id, cell.load(Ordering::Relaxed)))
    }

    /// Adds `delta` to a stat cell; false if the object has no such cell.
    pub fn add_stat(&self, id: AttrId, delta: u64) -> bool {
        match self.stats.get(&id) {
            Some(cell) => {
                cell.fetch_add(delta, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub(super) fn reset_stat(&self, id: AttrId) {
        if let Some(cell) = self.stats.get(&id) {
            cell.store(0, Ordering::Relaxed);
        }
    }

    pub(super) fn reset_stats(&self) {
        for cell in self.stats.values() {
            cell.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encode_oid;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stat_cells() {
        let obj = StoredObject::new(
            ObjectType::Counter,
            encode_oid(ObjectType::Counter, 1),
            BTreeMap::new(),
            [1, 2],
        );
        assert!(obj.add_stat(1, 5));
        assert!(obj.add_stat(1, 2));
        assert!(!obj.add_stat(9, 1));
        assert_eq!(obj.stat(1), Some(7));
        assert_eq!(obj.stat(2), Some(0));
        assert_eq!(obj.stat(9), None);
        obj.reset_stats();
        assert_eq!(obj.stats().collect::<Vec<_>>(), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn test_typed_getters() {
        let nh = encode_oid(ObjectType::NextHop, 4);
        let attrs = BTreeMap::from([
            (0, AttrValue::Oid(NULL_OBJECT_ID)),
            (1, AttrValue::Oid(nh)),
            (2, AttrValue::OidList(vec![nh, nh])),
            (3, AttrValue::U32(9)),
        ]);
        let obj = StoredObject::new(ObjectType::NextHopGroup, 1, attrs, []);
        assert_eq!(obj.get_oid(0), None);
        assert_eq!(obj.get_oid(1), Some(nh));
        assert_eq!(obj.get_oid_list(2), &[nh, nh]);
        assert_eq!(obj.get_oid_list(7), &[] as &[u64]);
        assert_eq!(obj.get_u32(3), Some(9));
        assert_eq!(obj.referenced_oids(), vec![nh, nh, nh]);
    }
}
