//! Read snapshot handed to the decision engines.

use super::StoreState;
use parking_lot::RwLockReadGuard;
use std::ops::Deref;

/// Shared-lock view of the store for the duration of one decision call.
///
/// Mutations wait until every view is dropped, so a decision never observes
/// a half-applied create, remove or set. Stat cells may still be bumped
/// through the view.
pub struct StoreView<'a> {
    state: RwLockReadGuard<'a, StoreState>,
}

impl<'a> StoreView<'a> {
    pub(super) fn new(state: RwLockReadGuard<'a, StoreState>) -> Self {
        StoreView { state }
    }
}

impl Deref for StoreView<'_> {
    type Target = StoreState;

    fn deref(&self) -> &StoreState {
        &self.state
    }
}
