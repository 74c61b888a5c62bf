//! Bulk operation executor.
//!
//! Applies an ordered batch of create/remove/set/get requests against the
//! store. Items run in input order and each one takes the store lock on its
//! own, so a batch is not atomic: there is no rollback, and concurrent
//! requests may interleave between items.
//!
//! With [`BulkMode::StopOnError`] the first failed item ends the batch and
//! every later item is reported [`ItemStatus::NotAttempted`]. With
//! [`BulkMode::IgnoreError`] every item is attempted. A cancelled
//! [`CancellationToken`] marks all items that have not started yet as not
//! attempted, whatever the mode.

use crate::error::{SaiError, SaiStatus};
use crate::schema::{AttrId, Attribute};
use crate::store::ObjectStore;
use crate::types::{ObjectType, RawSaiObjectId};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Error handling policy of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkMode {
    #[default]
    StopOnError,
    IgnoreError,
}

impl FromStr for BulkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "stop_on_error" => Ok(BulkMode::StopOnError),
            "ignore_error" => Ok(BulkMode::IgnoreError),
            _ => Err(format!("Unknown bulk mode: {}", s)),
        }
    }
}

/// One item of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkRequest {
    Create {
        object_type: ObjectType,
        attributes: Vec<Attribute>,
    },
    Remove {
        object_id: RawSaiObjectId,
    },
    Set {
        object_id: RawSaiObjectId,
        attribute: Attribute,
    },
    /// Reads `attr_ids`, or every attribute when the list is empty.
    Get {
        object_id: RawSaiObjectId,
        attr_ids: Vec<AttrId>,
    },
}

impl BulkRequest {
    fn verb(&self) -> &'static str {
        match self {
            BulkRequest::Create { .. } => "create",
            BulkRequest::Remove { .. } => "remove",
            BulkRequest::Set { .. } => "set",
            BulkRequest::Get { .. } => "get",
        }
    }
}

/// Final state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Applied,
    Failed,
    NotAttempted,
}

/// Outcome of one item, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    pub index: usize,
    pub status: ItemStatus,
    /// Id of the created object (create items only).
    pub object_id: Option<RawSaiObjectId>,
    /// Values read (get items only).
    pub attributes: Vec<Attribute>,
    pub error: Option<SaiError>,
}

impl ItemResult {
    fn applied(index: usize) -> Self {
        ItemResult {
            index,
            status: ItemStatus::Applied,
            object_id: None,
            attributes: Vec::new(),
            error: None,
        }
    }

    fn failed(index: usize, error: SaiError) -> Self {
        ItemResult {
            index,
            status: ItemStatus::Failed,
            object_id: None,
            attributes: Vec::new(),
            error: Some(error),
        }
    }

    fn not_attempted(index: usize) -> Self {
        ItemResult {
            index,
            status: ItemStatus::NotAttempted,
            object_id: None,
            attributes: Vec::new(),
            error: None,
        }
    }

    /// Boundary status of this item.
    pub fn sai_status(&self) -> SaiStatus {
        match (&self.status, &self.error) {
            (ItemStatus::Applied, _) => SaiStatus::Ok,
            (ItemStatus::NotAttempted, _) => SaiStatus::NotAttempted,
            (ItemStatus::Failed, Some(e)) => e.status(),
            (ItemStatus::Failed, None) => SaiStatus::Failure,
        }
    }
}

/// Overall status of a batch: `Ok` when every item applied, otherwise the
/// status of the first item that did not.
pub fn batch_status(results: &[ItemResult]) -> SaiStatus {
    results
        .iter()
        .map(ItemResult::sai_status)
        .find(|status| !status.is_success())
        .unwrap_or(SaiStatus::Ok)
}

/// Runs batches against one store.
pub struct BulkExecutor<'a> {
    store: &'a ObjectStore,
}

impl<'a> BulkExecutor<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        BulkExecutor { store }
    }

    /// Executes `requests` in order and returns one result per request.
    pub fn execute(
        &self,
        requests: &[BulkRequest],
        mode: BulkMode,
        cancel: Option<&CancellationToken>,
    ) -> Vec<ItemResult> {
        let mut results = Vec::with_capacity(requests.len());
        let mut stopped = false;

        for (index, request) in requests.iter().enumerate() {
            if stopped || cancel.is_some_and(CancellationToken::is_cancelled) {
                results.push(ItemResult::not_attempted(index));
                continue;
            }
            let result = self.apply(index, request);
            if result.status == ItemStatus::Failed {
                debug!(
                    "Bulk item {} ({}) failed: {}",
                    index,
                    request.verb(),
                    result.error.as_ref().map(ToString::to_string).unwrap_or_default()
                );
                stopped = mode == BulkMode::StopOnError;
            }
            results.push(result);
        }

        let applied = results
            .iter()
            .filter(|r| r.status == ItemStatus::Applied)
            .count();
        info!(
            "Bulk {:?}: {} of {} items applied",
            mode,
            applied,
            requests.len()
        );
        results
    }

    fn apply(&self, index: usize, request: &BulkRequest) -> ItemResult {
        match request {
            BulkRequest::Create {
                object_type,
                attributes,
            } => match self.store.create(*object_type, attributes) {
                Ok(oid) => ItemResult {
                    object_id: Some(oid),
                    ..ItemResult::applied(index)
                },
                Err(e) => ItemResult::failed(index, e),
            },
            BulkRequest::Remove { object_id } => match self.store.remove(*object_id) {
                Ok(()) => ItemResult::applied(index),
                Err(e) => ItemResult::failed(index, e),
            },
            BulkRequest::Set {
                object_id,
                attribute,
            } => match self.store.set_attribute(*object_id, attribute) {
                Ok(()) => ItemResult::applied(index),
                Err(e) => ItemResult::failed(index, e),
            },
            BulkRequest::Get {
                object_id,
                attr_ids,
            } => match read_attributes(self.store, *object_id, attr_ids) {
                Ok(attributes) => ItemResult {
                    attributes,
                    ..ItemResult::applied(index)
                },
                Err(e) => ItemResult::failed(index, e),
            },
        }
    }
}

/// Reads `attr_ids` of `oid`, or every attribute when the list is empty.
pub(crate) fn read_attributes(
    store: &ObjectStore,
    oid: RawSaiObjectId,
    attr_ids: &[AttrId],
) -> Result<Vec<Attribute>, SaiError> {
    if attr_ids.is_empty() {
        let values = store.get_all(oid)?;
        return Ok(values
            .into_iter()
            .map(|(id, value)| Attribute::new(id, value))
            .collect());
    }
    attr_ids
        .iter()
        .map(|id| store.get_attribute(oid, *id).map(|value| Attribute::new(*id, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog::{port, virtual_router};
    use crate::value::AttrValue;
    use pretty_assertions::assert_eq;

    fn port_with_mtu_sets(store: &ObjectStore) -> (RawSaiObjectId, Vec<BulkRequest>) {
        let port = store
            .create(
                ObjectType::Port,
                &[
                    Attribute::new(port::HW_LANE_LIST, AttrValue::U32List(vec![0, 1])),
                    Attribute::new(port::SPEED, AttrValue::U32(100_000)),
                ],
            )
            .unwrap();
        let requests = (0..5u32)
            .map(|i| BulkRequest::Set {
                object_id: port,
                // item 2 carries a zero MTU, which the schema rejects
                attribute: Attribute::new(port::MTU, AttrValue::U32(if i == 2 { 0 } else { 9000 + i })),
            })
            .collect();
        (port, requests)
    }

    fn statuses(results: &[ItemResult]) -> Vec<ItemStatus> {
        results.iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_stop_on_error() {
        let store = ObjectStore::default();
        let (port, requests) = port_with_mtu_sets(&store);
        let results = BulkExecutor::new(&store).execute(&requests, BulkMode::StopOnError, None);

        assert_eq!(
            statuses(&results),
            vec![
                ItemStatus::Applied,
                ItemStatus::Applied,
                ItemStatus::Failed,
                ItemStatus::NotAttempted,
                ItemStatus::NotAttempted,
            ]
        );
        assert_eq!(results[2].sai_status(), SaiStatus::InvalidAttribute);
        assert_eq!(results[3].sai_status(), SaiStatus::NotAttempted);
        assert_eq!(batch_status(&results), SaiStatus::InvalidAttribute);
        assert_eq!(
            store.get_attribute(port, port::MTU).unwrap(),
            AttrValue::U32(9001)
        );
    }

    #[test]
    fn test_ignore_error() {
        let store = ObjectStore::default();
        let (port, requests) = port_with_mtu_sets(&store);
        let results = BulkExecutor::new(&store).execute(&requests, BulkMode::IgnoreError, None);

        assert_eq!(
            statuses(&results),
            vec![
                ItemStatus::Applied,
                ItemStatus::Applied,
                ItemStatus::Failed,
                ItemStatus::Applied,
                ItemStatus::Applied,
            ]
        );
        assert_eq!(
            store.get_attribute(port, port::MTU).unwrap(),
            AttrValue::U32(9004)
        );
        let indexes: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cancelled_batch_is_not_attempted() {
        let store = ObjectStore::default();
        let token = CancellationToken::new();
        token.cancel();
        let requests = vec![
            BulkRequest::Create {
                object_type: ObjectType::VirtualRouter,
                attributes: Vec::new(),
            };
            3
        ];
        let results =
            BulkExecutor::new(&store).execute(&requests, BulkMode::IgnoreError, Some(&token));
        assert!(results.iter().all(|r| r.status == ItemStatus::NotAttempted));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_get_remove_items() {
        let store = ObjectStore::default();
        let executor = BulkExecutor::new(&store);
        let created = executor.execute(
            &[
                BulkRequest::Create {
                    object_type: ObjectType::VirtualRouter,
                    attributes: vec![Attribute::new(
                        virtual_router::ADMIN_V6_STATE,
                        AttrValue::Bool(false),
                    )],
                },
                BulkRequest::Create {
                    object_type: ObjectType::VirtualRouter,
                    attributes: Vec::new(),
                },
            ],
            BulkMode::StopOnError,
            None,
        );
        let vr = created[0].object_id.unwrap();
        assert!(created[1].object_id.is_some());
        assert_eq!(batch_status(&created), SaiStatus::Ok);

        let read = executor.execute(
            &[
                BulkRequest::Get {
                    object_id: vr,
                    attr_ids: vec![virtual_router::ADMIN_V6_STATE],
                },
                BulkRequest::Remove { object_id: vr },
                BulkRequest::Remove { object_id: vr },
            ],
            BulkMode::IgnoreError,
            None,
        );
        assert_eq!(
            read[0].attributes,
            vec![Attribute::new(virtual_router::ADMIN_V6_STATE, AttrValue::Bool(false))]
        );
        assert_eq!(read[1].status, ItemStatus::Applied);
        assert_eq!(read[2].sai_status(), SaiStatus::NotFound);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&BulkMode::IgnoreError).unwrap(),
            "\"ignore_error\""
        );
        let mode: BulkMode = serde_json::from_str("\"stop_on_error\"").unwrap();
        assert_eq!(mode, BulkMode::StopOnError);
    }
}
