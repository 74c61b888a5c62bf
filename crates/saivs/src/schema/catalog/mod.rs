//! The object type catalog: attribute ids, enum constants and one schema
//! builder per object type.
//!
//! Attribute ids are plain constants grouped per object type
//! (`route_entry::NEXT_HOP_ID`); enum constants likewise
//! (`packet_action::DROP`). Natural-key attributes of entry objects use ids
//! from `0x1000_0000` so they never collide with regular attributes.

/// Declares the attribute ids of one object type and its name table.
macro_rules! attr_ids {
    ($module:ident, $prefix:literal { $($name:ident = $value:literal,)* }) => {
        pub mod $module {
            use $crate::schema::AttrId;

            $(pub const $name: AttrId = $value;)*

            /// `(SAI name, id)` of every attribute.
            pub static NAMES: &[(&str, AttrId)] = &[$((concat!($prefix, stringify!($name)), $name),)*];
        }
    };
}

/// Declares the constants of one SAI enum and its [`EnumMeta`](crate::schema::EnumMeta).
macro_rules! sai_enum {
    ($module:ident, $prefix:literal { $($name:ident = $value:literal,)* }) => {
        pub mod $module {
            $(pub const $name: i32 = $value;)*

            pub static META: $crate::schema::EnumMeta = $crate::schema::EnumMeta {
                values: &[$((concat!($prefix, stringify!($name)), $value),)*],
            };
        }
    };
}

mod acl;
mod enums;
mod misc;
mod multicast;
mod qos;
mod routing;
mod switching;
mod tunnel;

pub use acl::*;
pub use enums::*;
pub use misc::*;
pub use multicast::*;
pub use qos::*;
pub use routing::*;
pub use switching::*;
pub use tunnel::*;

use super::{AttrId, AttrSpec, ObjectSchema};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};

/// Every schema in the catalog.
pub fn schemas() -> Vec<ObjectSchema> {
    let mut all = Vec::new();
    all.extend(switching::switching_schemas());
    all.extend(routing::routing_schemas());
    all.extend(acl::acl_schemas());
    all.extend(qos::qos_schemas());
    all.extend(tunnel::tunnel_schemas());
    all.extend(multicast::multicast_schemas());
    all.extend(misc::misc_schemas());
    all
}

fn canonical_prefix(value: &AttrValue) -> bool {
    value.as_prefix().is_some_and(|p| p.is_canonical())
}

fn ipv4_prefix(value: &AttrValue) -> bool {
    value.as_prefix().is_some_and(|p| p.address().is_ipv4())
}

fn ipv6_prefix(value: &AttrValue) -> bool {
    value.as_prefix().is_some_and(|p| p.address().is_ipv6())
}

fn vlan_id(value: &AttrValue) -> bool {
    matches!(value, AttrValue::U16(id) if sonic_types::VlanId::is_valid(*id))
}

fn positive(value: &AttrValue) -> bool {
    value.as_u64().is_some_and(|v| v > 0)
}

fn dscp(value: &AttrValue) -> bool {
    matches!(value, AttrValue::U8(v) if *v <= 63)
}

fn traffic_class(value: &AttrValue) -> bool {
    matches!(value, AttrValue::U8(v) if *v <= 15)
}

fn interface_name(value: &AttrValue) -> bool {
    matches!(value, AttrValue::Chardata(name) if !name.is_empty() && name.len() <= 15)
}

pub(super) fn nullable_oid(id: AttrId, object_types: &'static [ObjectType]) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::Oid)
        .nullable()
        .with_objects(object_types)
}

pub(super) fn read_only_oid_list(id: AttrId) -> AttrSpec {
    AttrSpec::read_only(id, ValueKind::OidList).with_default(AttrValue::OidList(Vec::new()))
}

pub(super) fn flag(id: AttrId, default: bool) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::Bool).with_default(AttrValue::Bool(default))
}

const ACL_BIND_TARGETS: &[ObjectType] = &[ObjectType::AclTable, ObjectType::AclTableGroup];
const PORT_OR_LAG: &[ObjectType] = &[ObjectType::Port, ObjectType::Lag];
