//! Longest-prefix-match index over installed route entries.

use crate::types::RawSaiObjectId;
use sonic_types::{IpAddress, IpFamily, IpPrefix};
use std::collections::{BTreeMap, HashMap};

/// Routes of one (virtual router, family), by prefix length then network.
#[derive(Debug, Default)]
struct PrefixTable {
    by_len: BTreeMap<u8, HashMap<u128, RawSaiObjectId>>,
}

/// Route entry ids indexed per (virtual router, address family).
///
/// Lookup walks prefix lengths from longest to shortest, so the answer
/// depends only on the installed set and never on insertion order.
#[derive(Debug, Default)]
pub struct LpmIndex {
    tables: HashMap<(RawSaiObjectId, IpFamily), PrefixTable>,
}

impl LpmIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `route` for `prefix`, returning a previous route for the same
    /// exact prefix.
    pub fn insert(
        &mut self,
        vr: RawSaiObjectId,
        prefix: &IpPrefix,
        route: RawSaiObjectId,
    ) -> Option<RawSaiObjectId> {
        let network = prefix.network();
        self.tables
            .entry((vr, prefix.family()))
            .or_default()
            .by_len
            .entry(prefix.prefix_len())
            .or_default()
            .insert(network.address().to_bits(), route)
    }

    pub fn remove(&mut self, vr: RawSaiObjectId, prefix: &IpPrefix) -> Option<RawSaiObjectId> {
        let key = (vr, prefix.family());
        let table = self.tables.get_mut(&key)?;
        let len = prefix.prefix_len();
        let routes = table.by_len.get_mut(&len)?;
        let removed = routes.remove(&prefix.network().address().to_bits());
        if routes.is_empty() {
            table.by_len.remove(&len);
        }
        if table.by_len.is_empty() {
            self.tables.remove(&key);
        }
        removed
    }

    /// The route with the longest prefix covering `addr` in `vr`.
    pub fn lookup(&self, vr: RawSaiObjectId, addr: &IpAddress) -> Option<RawSaiObjectId> {
        let table = self.tables.get(&(vr, addr.family()))?;
        let bits = addr.to_bits();
        table.by_len.iter().rev().find_map(|(len, routes)| {
            let prefix = IpPrefix::new(*addr, *len).ok()?;
            routes.get(&(bits & prefix.mask())).copied()
        })
    }

    /// Number of installed routes.
    pub fn len(&self) -> usize {
        self.tables
            .values()
            .flat_map(|table| table.by_len.values())
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
