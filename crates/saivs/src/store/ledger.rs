//! Back-reference ledger.
//!
//! For every referenced object the ledger records which objects point at it
//! and how many times (an `OidList` may name the same target twice). The
//! store consults it before removing an object and updates it uniformly
//! whenever a reference-kind attribute is written or cleared.
//!
//! Like a `SyncMap`, the ledger never creates an entry implicitly on the
//! release path: releasing a reference that was never taken is an internal
//! error, not a silent no-op.

use crate::error::{SaiError, SaiResult};
use crate::types::RawSaiObjectId;
use std::collections::{BTreeMap, HashMap};

/// Referrers of one target, with per-referrer counts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct BackRefs {
    referrers: BTreeMap<RawSaiObjectId, u32>,
}

impl BackRefs {
    fn increment(&mut self, referrer: RawSaiObjectId) -> u32 {
        let count = self.referrers.entry(referrer).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns `None` on underflow.
    fn decrement(&mut self, referrer: RawSaiObjectId) -> Option<u32> {
        let count = self.referrers.get_mut(&referrer)?;
        *count = count.checked_sub(1)?;
        let remaining = *count;
        if remaining == 0 {
            self.referrers.remove(&referrer);
        }
        Some(remaining)
    }

    fn total(&self) -> usize {
        self.referrers.values().map(|c| *c as usize).sum()
    }
}

#[derive(Debug, Default)]
pub struct RefLedger {
    targets: HashMap<RawSaiObjectId, BackRefs>,
}

impl RefLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `referrer` references `target` once more.
    pub fn add(&mut self, target: RawSaiObjectId, referrer: RawSaiObjectId) {
        self.targets.entry(target).or_default().increment(referrer);
    }

    /// Drops one reference from `referrer` to `target`.
    pub fn release(&mut self, target: RawSaiObjectId, referrer: RawSaiObjectId) -> SaiResult<()> {
        let refs = self.targets.get_mut(&target).ok_or_else(|| {
            SaiError::internal(format!(
                "no references recorded for oid:0x{:x} (releasing from oid:0x{:x})",
                target, referrer
            ))
        })?;
        refs.decrement(referrer).ok_or_else(|| {
            SaiError::internal(format!(
                "reference count underflow: oid:0x{:x} -> oid:0x{:x}",
                referrer, target
            ))
        })?;
        if refs.referrers.is_empty() {
            self.targets.remove(&target);
        }
        Ok(())
    }

    pub fn add_all(&mut self, targets: &[RawSaiObjectId], referrer: RawSaiObjectId) {
        for target in targets {
            self.add(*target, referrer);
        }
    }

    pub fn release_all(
        &mut self,
        targets: &[RawSaiObjectId],
        referrer: RawSaiObjectId,
    ) -> SaiResult<()> {
        for target in targets {
            self.release(*target, referrer)?;
        }
        Ok(())
    }

    /// Total references held on `target`.
    pub fn ref_count(&self, target: RawSaiObjectId) -> usize {
        self.targets.get(&target).map_or(0, BackRefs::total)
    }

    /// Distinct objects referencing `target`, in ascending id order.
    pub fn referrers(&self, target: RawSaiObjectId) -> Vec<RawSaiObjectId> {
        self.targets
            .get(&target)
            .map(|refs| refs.referrers.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_referenced(&self, target: RawSaiObjectId) -> bool {
        self.targets.contains_key(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_and_release() {
        let mut ledger = RefLedger::new();
        ledger.add(1, 10);
        ledger.add(1, 10);
        ledger.add(1, 11);
        assert_eq!(ledger.ref_count(1), 3);
        assert_eq!(ledger.referrers(1), vec![10, 11]);

        ledger.release(1, 10).unwrap();
        assert_eq!(ledger.ref_count(1), 2);
        assert_eq!(ledger.referrers(1), vec![10, 11]);

        // one reference from 10 remains, so the second release underflows
        assert!(ledger.release_all(&[1, 1], 10).is_err());
        ledger.release(1, 11).unwrap();
        assert!(!ledger.is_referenced(1));
        assert_eq!(ledger.ref_count(1), 0);
    }

    #[test]
    fn test_release_without_reference_is_internal_error() {
        let mut ledger = RefLedger::new();
        let err = ledger.release(5, 6).unwrap_err();
        assert!(matches!(err, SaiError::Internal { .. }));

        ledger.add(5, 7);
        let err = ledger.release(5, 6).unwrap_err();
        assert!(matches!(err, SaiError::Internal { .. }));
        assert_eq!(ledger.ref_count(5), 1);
    }
}
