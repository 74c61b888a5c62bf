//! Inbound operation and outbound result contracts.
//!
//! [`SwitchEngine`] owns one [`ObjectStore`] and is the single entry point
//! for object operations: every [`Operation`] yields exactly one
//! [`OperationResult`], bulk operations with one item outcome per input
//! item in input order.

use crate::acl::AclEngine;
use crate::bulk::{batch_status, read_attributes, BulkExecutor, BulkMode, BulkRequest, ItemResult};
use crate::config::EngineConfig;
use crate::error::{SaiError, SaiResult, SaiStatus};
use crate::pipeline::Pipeline;
use crate::route::RouteEngine;
use crate::schema::{AttrId, Attribute};
use crate::store::ObjectStore;
use crate::types::{ObjectType, RawSaiObjectId};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Remove,
    Set,
    Get,
    BulkCreate,
    BulkRemove,
    BulkSet,
    BulkGet,
}

impl OperationKind {
    pub fn is_bulk(&self) -> bool {
        matches!(
            self,
            OperationKind::BulkCreate
                | OperationKind::BulkRemove
                | OperationKind::BulkSet
                | OperationKind::BulkGet
        )
    }
}

/// One item of a bulk operation. Bulk creates share the operation's
/// object type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationItem {
    pub object_id: Option<RawSaiObjectId>,
    pub attributes: Vec<Attribute>,
    pub attr_ids: Vec<AttrId>,
}

/// An inbound object operation.
///
/// - `Create`: `object_type` and `attributes`.
/// - `Remove`: `object_id`.
/// - `Set`: `object_id` and exactly one attribute.
/// - `Get`: `object_id` and `attr_ids`; an empty list reads every
///   attribute.
/// - Bulk kinds: `items`, and `object_type` for `BulkCreate`. `mode`
///   defaults to the engine's configured bulk mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    #[serde(default)]
    pub object_type: Option<ObjectType>,
    #[serde(default)]
    pub object_id: Option<RawSaiObjectId>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub attr_ids: Vec<AttrId>,
    #[serde(default)]
    pub items: Vec<OperationItem>,
    #[serde(default)]
    pub mode: Option<BulkMode>,
}

impl Operation {
    fn new(kind: OperationKind) -> Self {
        Operation {
            kind,
            object_type: None,
            object_id: None,
            attributes: Vec::new(),
            attr_ids: Vec::new(),
            items: Vec::new(),
            mode: None,
        }
    }

    pub fn create(object_type: ObjectType, attributes: Vec<Attribute>) -> Self {
        Operation {
            object_type: Some(object_type),
            attributes,
            ..Self::new(OperationKind::Create)
        }
    }

    pub fn remove(object_id: RawSaiObjectId) -> Self {
        Operation {
            object_id: Some(object_id),
            ..Self::new(OperationKind::Remove)
        }
    }

    pub fn set(object_id: RawSaiObjectId, attribute: Attribute) -> Self {
        Operation {
            object_id: Some(object_id),
            attributes: vec![attribute],
            ..Self::new(OperationKind::Set)
        }
    }

    pub fn get(object_id: RawSaiObjectId, attr_ids: Vec<AttrId>) -> Self {
        Operation {
            object_id: Some(object_id),
            attr_ids,
            ..Self::new(OperationKind::Get)
        }
    }

    /// A bulk operation of `kind` over `items`.
    pub fn bulk(kind: OperationKind, items: Vec<OperationItem>, mode: Option<BulkMode>) -> Self {
        Operation {
            items,
            mode,
            ..Self::new(kind)
        }
    }

    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = Some(object_type);
        self
    }
}

/// Outcome of one bulk item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub status: SaiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RawSaiObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ItemResult> for ItemOutcome {
    fn from(result: ItemResult) -> Self {
        ItemOutcome {
            status: result.sai_status(),
            object_id: result.object_id,
            attributes: result.attributes,
            error: result.error.map(|e| e.to_string()),
        }
    }
}

/// The outbound result of one [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub status: SaiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RawSaiObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_item_results: Vec<ItemOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    fn ok() -> Self {
        OperationResult {
            status: SaiStatus::Ok,
            object_id: None,
            attributes: Vec::new(),
            per_item_results: Vec::new(),
            error: None,
        }
    }

    fn from_error(error: &SaiError) -> Self {
        OperationResult {
            status: error.status(),
            error: Some(error.to_string()),
            ..Self::ok()
        }
    }
}

/// The object engine: one store plus its configuration.
pub struct SwitchEngine {
    store: ObjectStore,
    config: EngineConfig,
}

impl Default for SwitchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SwitchEngine {
    pub fn new(config: EngineConfig) -> Self {
        SwitchEngine {
            store: ObjectStore::new(&config),
            config,
        }
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn acl(&self) -> AclEngine<'_> {
        AclEngine::new(&self.store)
    }

    pub fn routes(&self) -> RouteEngine<'_> {
        RouteEngine::new(&self.store, &self.config)
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.store, &self.config)
    }

    pub fn handle(&self, operation: &Operation) -> OperationResult {
        self.handle_with_cancel(operation, None)
    }

    /// Handles `operation`; a cancelled token stops bulk operations before
    /// their next item.
    pub fn handle_with_cancel(
        &self,
        operation: &Operation,
        cancel: Option<&CancellationToken>,
    ) -> OperationResult {
        let result = if operation.kind.is_bulk() {
            self.handle_bulk(operation, cancel)
        } else {
            self.handle_single(operation)
        };
        match result {
            Ok(result) => {
                debug!("{:?} -> {}", operation.kind, result.status);
                result
            }
            Err(e) => {
                debug!("{:?} failed: {}", operation.kind, e);
                OperationResult::from_error(&e)
            }
        }
    }

    fn handle_single(&self, operation: &Operation) -> SaiResult<OperationResult> {
        match operation.kind {
            OperationKind::Create => {
                let object_type = required_type(operation)?;
                let oid = self.store.create(object_type, &operation.attributes)?;
                Ok(OperationResult {
                    object_id: Some(oid),
                    ..OperationResult::ok()
                })
            }
            OperationKind::Remove => {
                self.store.remove(required_id(operation.object_id)?)?;
                Ok(OperationResult::ok())
            }
            OperationKind::Set => {
                let oid = required_id(operation.object_id)?;
                let attribute = single_attribute(&operation.attributes)?;
                self.store.set_attribute(oid, attribute)?;
                Ok(OperationResult::ok())
            }
            OperationKind::Get => {
                let oid = required_id(operation.object_id)?;
                Ok(OperationResult {
                    attributes: read_attributes(&self.store, oid, &operation.attr_ids)?,
                    ..OperationResult::ok()
                })
            }
            _ => Err(SaiError::internal("bulk operation in single path")),
        }
    }

    fn handle_bulk(
        &self,
        operation: &Operation,
        cancel: Option<&CancellationToken>,
    ) -> SaiResult<OperationResult> {
        let requests = operation
            .items
            .iter()
            .map(|item| bulk_request(operation, item))
            .collect::<SaiResult<Vec<_>>>()?;
        let mode = operation.mode.unwrap_or(self.config.default_bulk_mode);

        let results = BulkExecutor::new(&self.store).execute(&requests, mode, cancel);
        Ok(OperationResult {
            status: batch_status(&results),
            per_item_results: results.into_iter().map(ItemOutcome::from).collect(),
            ..OperationResult::ok()
        })
    }
}

fn required_type(operation: &Operation) -> SaiResult<ObjectType> {
    operation
        .object_type
        .ok_or_else(|| SaiError::invalid_request("object_type is required"))
}

fn required_id(object_id: Option<RawSaiObjectId>) -> SaiResult<RawSaiObjectId> {
    object_id.ok_or_else(|| SaiError::invalid_request("object_id is required"))
}

fn single_attribute(attributes: &[Attribute]) -> SaiResult<&Attribute> {
    match attributes {
        [attribute] => Ok(attribute),
        _ => Err(SaiError::invalid_request(format!(
            "set takes exactly one attribute, got {}",
            attributes.len()
        ))),
    }
}

fn bulk_request(operation: &Operation, item: &OperationItem) -> SaiResult<BulkRequest> {
    Ok(match operation.kind {
        OperationKind::BulkCreate => BulkRequest::Create {
            object_type: required_type(operation)?,
            attributes: item.attributes.clone(),
        },
        OperationKind::BulkRemove => BulkRequest::Remove {
            object_id: required_id(item.object_id)?,
        },
        OperationKind::BulkSet => BulkRequest::Set {
            object_id: required_id(item.object_id)?,
            attribute: single_attribute(&item.attributes)?.clone(),
        },
        OperationKind::BulkGet => BulkRequest::Get {
            object_id: required_id(item.object_id)?,
            attr_ids: item.attr_ids.clone(),
        },
        _ => return Err(SaiError::internal("single operation in bulk path")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog::{port, virtual_router};
    use crate::value::AttrValue;
    use pretty_assertions::assert_eq;

    fn port_attrs(lane: u32) -> Vec<Attribute> {
        vec![
            Attribute::new(port::HW_LANE_LIST, AttrValue::U32List(vec![lane])),
            Attribute::new(port::SPEED, AttrValue::U32(25_000)),
        ]
    }

    #[test]
    fn test_object_lifecycle() {
        let engine = SwitchEngine::default();
        let created = engine.handle(&Operation::create(ObjectType::Port, port_attrs(0)));
        assert_eq!(created.status, SaiStatus::Ok);
        let oid = created.object_id.unwrap();

        let set = engine.handle(&Operation::set(oid, Attribute::new(port::MTU, AttrValue::U32(9100))));
        assert_eq!(set.status, SaiStatus::Ok);

        let got = engine.handle(&Operation::get(oid, vec![port::MTU, port::SPEED]));
        assert_eq!(
            got.attributes,
            vec![
                Attribute::new(port::MTU, AttrValue::U32(9100)),
                Attribute::new(port::SPEED, AttrValue::U32(25_000)),
            ]
        );
        // reads do not change anything
        assert_eq!(engine.handle(&Operation::get(oid, vec![port::MTU, port::SPEED])), got);

        assert_eq!(engine.handle(&Operation::remove(oid)).status, SaiStatus::Ok);
        assert_eq!(engine.handle(&Operation::get(oid, vec![])).status, SaiStatus::NotFound);
    }

    #[test]
    fn test_get_all_includes_defaults() {
        let engine = SwitchEngine::default();
        let vr = engine
            .handle(&Operation::create(ObjectType::VirtualRouter, vec![]))
            .object_id
            .unwrap();
        let all = engine.handle(&Operation::get(vr, vec![]));
        assert!(all
            .attributes
            .contains(&Attribute::new(virtual_router::ADMIN_V4_STATE, AttrValue::Bool(true))));
    }

    #[test]
    fn test_malformed_operations() {
        let engine = SwitchEngine::default();
        let mut create = Operation::create(ObjectType::Port, port_attrs(0));
        create.object_type = None;
        let result = engine.handle(&create);
        assert_eq!(result.status, SaiStatus::Failure);
        assert!(result.error.is_some());

        let vr = engine
            .handle(&Operation::create(ObjectType::VirtualRouter, vec![]))
            .object_id
            .unwrap();
        let mut set = Operation::set(vr, Attribute::new(virtual_router::ADMIN_V4_STATE, AttrValue::Bool(false)));
        set.attributes.clear();
        assert_eq!(engine.handle(&set).status, SaiStatus::Failure);
    }

    #[test]
    fn test_bulk_create_and_set() {
        let engine = SwitchEngine::default();
        let items = (0..3)
            .map(|lane| OperationItem {
                attributes: port_attrs(lane),
                ..OperationItem::default()
            })
            .collect();
        let created = engine.handle(
            &Operation::bulk(OperationKind::BulkCreate, items, None).with_object_type(ObjectType::Port),
        );
        assert_eq!(created.status, SaiStatus::Ok);
        let oids: Vec<_> = created
            .per_item_results
            .iter()
            .map(|r| r.object_id.unwrap())
            .collect();
        assert_eq!(oids.len(), 3);

        let items = oids
            .iter()
            .zip([1500, 0, 9100])
            .map(|(oid, mtu)| OperationItem {
                object_id: Some(*oid),
                attributes: vec![Attribute::new(port::MTU, AttrValue::U32(mtu))],
                ..OperationItem::default()
            })
            .collect();
        let set = engine.handle(&Operation::bulk(OperationKind::BulkSet, items, None));
        assert_eq!(set.status, SaiStatus::InvalidAttribute);
        let statuses: Vec<_> = set.per_item_results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![SaiStatus::Ok, SaiStatus::InvalidAttribute, SaiStatus::NotAttempted]
        );
        assert_eq!(
            engine.store().get_attribute(oids[2], port::MTU).unwrap(),
            AttrValue::U32(1514)
        );
    }

    #[test]
    fn test_operation_json() {
        let json = r#"{"kind":"get","object_id":5,"attr_ids":[1,3]}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op, Operation::get(5, vec![1, 3]));

        let result = OperationResult::ok();
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"status":"SAI_STATUS_SUCCESS"}"#
        );
    }
}
