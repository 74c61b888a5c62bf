//! Wire form of `saiserver` responses: one JSON object per request.

use super::request::RequestError;
use crate::api::{ItemOutcome, OperationResult};
use crate::error::SaiStatus;
use crate::schema::{Attribute, SchemaRegistry};
use crate::types::{object_type_of, ObjectType, RawSaiObjectId};
use crate::value::format_oid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: SaiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Attribute name to text value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Response>,
    /// Decision payload of evaluate and resolve requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Response {
            status: SaiStatus::Ok,
            object_id: None,
            attributes: BTreeMap::new(),
            items: Vec::new(),
            result: None,
            error: None,
        }
    }

    pub fn with_object(mut self, oid: RawSaiObjectId) -> Self {
        self.object_id = Some(format_oid(oid));
        self
    }

    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn from_error(error: &RequestError) -> Self {
        Response {
            status: error.status(),
            error: Some(error.to_string()),
            ..Self::ok()
        }
    }

    /// Converts an engine result. `object_type` names the attributes of a
    /// single-object result, `item_types` those of bulk get items by
    /// position.
    pub fn from_operation(
        result: OperationResult,
        object_type: Option<ObjectType>,
        item_types: &[ObjectType],
    ) -> Self {
        let attributes = object_type
            .map(|ot| format_attributes(ot, &result.attributes))
            .unwrap_or_default();
        let items = result
            .per_item_results
            .into_iter()
            .enumerate()
            .map(|(i, item)| Self::from_item(item, item_types.get(i).copied()))
            .collect();
        Response {
            status: result.status,
            object_id: result.object_id.map(format_oid),
            attributes,
            items,
            result: None,
            error: result.error,
        }
    }

    fn from_item(item: ItemOutcome, object_type: Option<ObjectType>) -> Self {
        let attributes = object_type
            .or_else(|| item.object_id.and_then(object_type_of))
            .map(|ot| format_attributes(ot, &item.attributes))
            .unwrap_or_default();
        Response {
            status: item.status,
            object_id: item.object_id.map(format_oid),
            attributes,
            items: Vec::new(),
            result: None,
            error: item.error,
        }
    }
}

/// Names and formats `attributes` using the schema of `object_type`.
pub fn format_attributes(
    object_type: ObjectType,
    attributes: &[Attribute],
) -> BTreeMap<String, String> {
    let registry = SchemaRegistry::global();
    attributes
        .iter()
        .map(|attr| match registry.lookup(object_type, attr.id) {
            Ok(spec) => (spec.name.to_string(), spec.format_value(&attr.value)),
            Err(_) => (format!("0x{:x}", attr.id), attr.value.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog::{packet_action, route_entry};
    use crate::value::AttrValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_attributes_uses_names() {
        let formatted = format_attributes(
            ObjectType::RouteEntry,
            &[Attribute::new(
                route_entry::PACKET_ACTION,
                AttrValue::Enum(packet_action::TRAP),
            )],
        );
        assert_eq!(
            formatted.get("SAI_ROUTE_ENTRY_ATTR_PACKET_ACTION").map(String::as_str),
            Some("SAI_PACKET_ACTION_TRAP")
        );
    }

    #[test]
    fn test_minimal_json() {
        let json = serde_json::to_string(&Response::ok().with_object(0x2a)).unwrap();
        assert_eq!(json, r#"{"status":"SAI_STATUS_SUCCESS","object_id":"oid:0x2a"}"#);
    }
}
