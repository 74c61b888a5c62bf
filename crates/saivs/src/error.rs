//! Status taxonomy and error types for object operations.
//!
//! Every failure of the object engine is a [`SaiError`]; every error maps to
//! exactly one [`SaiStatus`], the status surfaced at the request boundary.

use crate::schema::AttrId;
use crate::types::{ObjectType, RawSaiObjectId};
use crate::value::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status codes surfaced at the request boundary.
///
/// Codes follow `sai_status_t` where SAI defines one; `NoRoute` and
/// `GroupEmpty` are lookup outcomes that SAI has no code for.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaiStatus {
    #[serde(rename = "SAI_STATUS_SUCCESS")]
    Ok = 0,
    #[serde(rename = "SAI_STATUS_FAILURE")]
    Failure = -1,
    #[serde(rename = "SAI_STATUS_ITEM_ALREADY_EXISTS")]
    AlreadyExists = -6,
    #[serde(rename = "SAI_STATUS_ITEM_NOT_FOUND")]
    NotFound = -7,
    #[serde(rename = "SAI_STATUS_TABLE_FULL")]
    TableFull = -13,
    #[serde(rename = "SAI_STATUS_OBJECT_IN_USE")]
    ObjectInUse = -17,
    #[serde(rename = "SAI_STATUS_NOT_EXECUTED")]
    NotAttempted = -23,
    #[serde(rename = "SAI_STATUS_NO_ROUTE")]
    NoRoute = -0x1001,
    #[serde(rename = "SAI_STATUS_GROUP_EMPTY")]
    GroupEmpty = -0x1002,
    #[serde(rename = "SAI_STATUS_INVALID_ATTRIBUTE")]
    InvalidAttribute = -0x10000,
}

impl SaiStatus {
    /// Creates a SaiStatus from a raw i32 value.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => SaiStatus::Ok,
            -6 => SaiStatus::AlreadyExists,
            -7 => SaiStatus::NotFound,
            -13 => SaiStatus::TableFull,
            -17 => SaiStatus::ObjectInUse,
            -23 => SaiStatus::NotAttempted,
            -0x1001 => SaiStatus::NoRoute,
            -0x1002 => SaiStatus::GroupEmpty,
            -0x10000 => SaiStatus::InvalidAttribute,
            _ => SaiStatus::Failure,
        }
    }

    pub const fn code(&self) -> i32 {
        *self as i32
    }

    pub fn is_success(&self) -> bool {
        *self == SaiStatus::Ok
    }
}

impl fmt::Display for SaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaiStatus::Ok => "SAI_STATUS_SUCCESS",
            SaiStatus::Failure => "SAI_STATUS_FAILURE",
            SaiStatus::AlreadyExists => "SAI_STATUS_ITEM_ALREADY_EXISTS",
            SaiStatus::NotFound => "SAI_STATUS_ITEM_NOT_FOUND",
            SaiStatus::TableFull => "SAI_STATUS_TABLE_FULL",
            SaiStatus::ObjectInUse => "SAI_STATUS_OBJECT_IN_USE",
            SaiStatus::NotAttempted => "SAI_STATUS_NOT_EXECUTED",
            SaiStatus::NoRoute => "SAI_STATUS_NO_ROUTE",
            SaiStatus::GroupEmpty => "SAI_STATUS_GROUP_EMPTY",
            SaiStatus::InvalidAttribute => "SAI_STATUS_INVALID_ATTRIBUTE",
        };
        write!(f, "{}", s)
    }
}

/// Error type for object engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaiError {
    #[error("{object_type}: unknown attribute id 0x{attr_id:x}")]
    UnknownAttribute {
        object_type: ObjectType,
        attr_id: AttrId,
    },

    #[error("{object_type}: unknown attribute {name}")]
    UnknownAttributeName {
        object_type: ObjectType,
        name: String,
    },

    #[error("{object_type}: mandatory attribute {attr} missing")]
    MissingMandatoryAttribute {
        object_type: ObjectType,
        attr: &'static str,
    },

    #[error("{attr} is not settable: {reason}")]
    AttributeNotSettable {
        attr: &'static str,
        reason: &'static str,
    },

    #[error("{attr}: expected {expected} value, got {actual}")]
    ValueKindMismatch {
        attr: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("cannot represent {raw:?} as {kind}")]
    InvalidValueKind { kind: ValueKind, raw: String },

    #[error("{attr}: invalid value {value}")]
    InvalidValue { attr: &'static str, value: String },

    #[error("{attr}: invalid reference oid:0x{oid:x} ({reason})")]
    InvalidReference {
        attr: &'static str,
        oid: RawSaiObjectId,
        reason: String,
    },

    #[error("{object_type} with key {key} already exists")]
    AlreadyExists { object_type: ObjectType, key: String },

    #[error("Item not found: {item}")]
    NotFound { item: String },

    #[error("oid:0x{oid:x} is referenced by {referrers} object(s)")]
    ObjectInUse {
        oid: RawSaiObjectId,
        referrers: usize,
    },

    #[error("object table full ({max} objects)")]
    TableFull { max: usize },

    #[error("Malformed request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SaiError {
    /// Creates a not found error with an item description.
    pub fn not_found(item: impl Into<String>) -> Self {
        SaiError::NotFound { item: item.into() }
    }

    /// Creates a not found error for an object id.
    pub fn no_such_object(oid: RawSaiObjectId) -> Self {
        SaiError::NotFound {
            item: format!("oid:0x{:x}", oid),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        SaiError::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SaiError::Internal {
            message: message.into(),
        }
    }

    /// The boundary status for this error.
    ///
    /// Schema and reference violations collapse to `InvalidAttribute`.
    pub fn status(&self) -> SaiStatus {
        match self {
            SaiError::UnknownAttribute { .. }
            | SaiError::UnknownAttributeName { .. }
            | SaiError::MissingMandatoryAttribute { .. }
            | SaiError::AttributeNotSettable { .. }
            | SaiError::ValueKindMismatch { .. }
            | SaiError::InvalidValueKind { .. }
            | SaiError::InvalidValue { .. }
            | SaiError::InvalidReference { .. } => SaiStatus::InvalidAttribute,
            SaiError::AlreadyExists { .. } => SaiStatus::AlreadyExists,
            SaiError::NotFound { .. } => SaiStatus::NotFound,
            SaiError::ObjectInUse { .. } => SaiStatus::ObjectInUse,
            SaiError::TableFull { .. } => SaiStatus::TableFull,
            SaiError::InvalidRequest { .. } | SaiError::Internal { .. } => SaiStatus::Failure,
        }
    }

    /// True for schema errors (malformed request, independent of store state).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            SaiError::UnknownAttribute { .. }
                | SaiError::UnknownAttributeName { .. }
                | SaiError::MissingMandatoryAttribute { .. }
                | SaiError::AttributeNotSettable { .. }
                | SaiError::ValueKindMismatch { .. }
                | SaiError::InvalidValueKind { .. }
                | SaiError::InvalidValue { .. }
        )
    }
}

/// Result type for object engine operations.
pub type SaiResult<T> = Result<T, SaiError>;
