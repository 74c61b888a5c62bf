//! Wire form of `saiserver` requests.
//!
//! One JSON object per line, tagged by `op`. Object types, attributes and
//! enum values are given by their SAI names; values use the text form of
//! [`crate::value`]. Object ids are written `oid:0x…`, or `$label` for an
//! object created with `"as": "label"` earlier in the session.

use crate::acl::{AclError, AclStage};
use crate::bulk::BulkMode;
use crate::pipeline::PipelineError;
use crate::error::{SaiError, SaiStatus};
use crate::route::{FlowKey, RouteError};
use crate::schema::{Attribute, SchemaRegistry};
use crate::types::{ObjectType, RawSaiObjectId};
use crate::value::{format_oid, parse_oid, ValueKind};
use serde::Deserialize;
use sonic_types::IpAddress;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Request failures outside the engine's own error types.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Malformed request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("Unknown label: ${0}")]
    UnknownLabel(String),

    #[error(transparent)]
    Sai(#[from] SaiError),

    #[error(transparent)]
    Acl(#[from] AclError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl RequestError {
    pub fn status(&self) -> SaiStatus {
        match self {
            RequestError::Parse(_) | RequestError::UnknownObjectType(_) => SaiStatus::Failure,
            RequestError::InvalidObjectId(_) | RequestError::UnknownLabel(_) => SaiStatus::NotFound,
            RequestError::Sai(e) => e.status(),
            RequestError::Acl(e) => e.status(),
            RequestError::Route(e) => e.status(),
            RequestError::Pipeline(e) => e.status(),
        }
    }
}

/// Attribute name to text value.
pub type AttrMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetItem {
    pub object_id: String,
    pub attribute: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetItem {
    pub object_id: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

fn default_stages() -> Vec<AclStage> {
    vec![AclStage::Ingress]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Create {
        object_type: String,
        #[serde(default)]
        attributes: AttrMap,
        /// Label the new object can be referred to by.
        #[serde(default, rename = "as")]
        label: Option<String>,
    },
    Remove {
        object_id: String,
    },
    Set {
        object_id: String,
        attribute: String,
        value: String,
    },
    Get {
        object_id: String,
        /// Attribute names; empty reads every attribute.
        #[serde(default)]
        attributes: Vec<String>,
    },
    BulkCreate {
        object_type: String,
        items: Vec<AttrMap>,
        #[serde(default)]
        mode: Option<BulkMode>,
    },
    BulkRemove {
        object_ids: Vec<String>,
        #[serde(default)]
        mode: Option<BulkMode>,
    },
    BulkSet {
        items: Vec<SetItem>,
        #[serde(default)]
        mode: Option<BulkMode>,
    },
    BulkGet {
        items: Vec<GetItem>,
        #[serde(default)]
        mode: Option<BulkMode>,
    },
    AclEvaluate {
        #[serde(default = "default_stages")]
        stages: Vec<AclStage>,
        #[serde(default)]
        key: serde_json::Map<String, serde_json::Value>,
    },
    RouteResolve {
        vr: String,
        address: IpAddress,
    },
    GroupResolve {
        group: String,
        #[serde(default)]
        selector: Option<u64>,
        #[serde(default)]
        flow: Option<FlowKey>,
    },
    Forward {
        vr: String,
        #[serde(default)]
        key: serde_json::Map<String, serde_json::Value>,
    },
    OperStatus {
        object_id: String,
        up: bool,
    },
    Stats {
        object_id: String,
        #[serde(default)]
        clear: bool,
    },
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(line)?)
    }

    /// True when the request changes store contents or liveness. Decision
    /// requests only bump stat cells and count as reads.
    pub fn is_mutation(&self) -> bool {
        match self {
            Request::Create { .. }
            | Request::Remove { .. }
            | Request::Set { .. }
            | Request::BulkCreate { .. }
            | Request::BulkRemove { .. }
            | Request::BulkSet { .. }
            | Request::OperStatus { .. } => true,
            Request::Stats { clear, .. } => *clear,
            _ => false,
        }
    }
}

/// Label table of a session.
pub type Labels = HashMap<String, RawSaiObjectId>;

pub fn parse_object_type(name: &str) -> Result<ObjectType, RequestError> {
    name.parse()
        .map_err(|_| RequestError::UnknownObjectType(name.to_string()))
}

/// Resolves `oid:0x…`, `0x…`, `null` or `$label`.
pub fn resolve_oid(text: &str, labels: &Labels) -> Result<RawSaiObjectId, RequestError> {
    let text = text.trim();
    if let Some(label) = text.strip_prefix('$') {
        return labels
            .get(label)
            .copied()
            .ok_or_else(|| RequestError::UnknownLabel(label.to_string()));
    }
    parse_oid(text).ok_or_else(|| RequestError::InvalidObjectId(text.to_string()))
}

/// Type of an existing object id, from its encoding.
pub fn object_type_of(oid: RawSaiObjectId) -> Result<ObjectType, RequestError> {
    crate::types::object_type_of(oid).ok_or_else(|| SaiError::no_such_object(oid).into())
}

/// Replaces every `$label` in `text` with the labelled object id.
fn expand_labels(text: &str, labels: &Labels) -> Result<String, RequestError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let end = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(tail.len());
        let label = &tail[..end];
        let oid = labels
            .get(label)
            .ok_or_else(|| RequestError::UnknownLabel(label.to_string()))?;
        out.push_str(&format_oid(*oid));
        rest = &tail[end..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Parses one named attribute. Labels are expanded in object id values.
pub fn parse_attribute(
    registry: &SchemaRegistry,
    object_type: ObjectType,
    name: &str,
    text: &str,
    labels: &Labels,
) -> Result<Attribute, RequestError> {
    let spec = registry.lookup_by_name(object_type, name)?;
    let value = if matches!(spec.kind, ValueKind::Oid | ValueKind::OidList) {
        spec.parse_value(&expand_labels(text, labels)?)?
    } else {
        spec.parse_value(text)?
    };
    Ok(Attribute::new(spec.id, value))
}

pub fn parse_attributes(
    registry: &SchemaRegistry,
    object_type: ObjectType,
    attrs: &AttrMap,
    labels: &Labels,
) -> Result<Vec<Attribute>, RequestError> {
    attrs
        .iter()
        .map(|(name, text)| parse_attribute(registry, object_type, name, text, labels))
        .collect()
}

pub fn parse_attr_ids(
    registry: &SchemaRegistry,
    object_type: ObjectType,
    names: &[String],
) -> Result<Vec<u32>, RequestError> {
    names
        .iter()
        .map(|name| Ok(registry.lookup_by_name(object_type, name)?.id))
        .collect()
}

/// Resolves the object id fields of a packet key given as JSON.
pub fn resolve_key_ids(
    mut key: serde_json::Map<String, serde_json::Value>,
    labels: &Labels,
) -> Result<serde_json::Map<String, serde_json::Value>, RequestError> {
    for field in ["in_port", "out_port"] {
        if let Some(serde_json::Value::String(text)) = key.get(field) {
            let oid = resolve_oid(text, labels)?;
            key.insert(field.to_string(), serde_json::Value::from(oid));
        }
    }
    Ok(key)
}
