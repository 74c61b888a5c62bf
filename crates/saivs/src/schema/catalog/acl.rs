//! ACL tables, entries, counters, ranges and table groups.
//!
//! Entry match fields live at `0x1000 + n` and the matching table
//! `FIELD_*` capability flags use the same ids. The mask of a maskable
//! field lives at `0x1800 + n`; entry actions live at `0x2000 + n`.

use super::enums::{
    acl_bind_point_type, acl_range_type, acl_stage, acl_table_group_type, packet_action,
};
use super::{dscp, flag, ipv4_prefix, ipv6_prefix, positive, traffic_class, vlan_id, PORT_OR_LAG};
use crate::schema::{AttrId, AttrSpec, ObjectSchema, Validator};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};

attr_ids!(acl_table, "SAI_ACL_TABLE_ATTR_" {
    ACL_STAGE = 0,
    ACL_BIND_POINT_TYPE_LIST = 1,
    SIZE = 2,
    FIELD_SRC_IPV6 = 0x1000,
    FIELD_DST_IPV6 = 0x1001,
    FIELD_SRC_MAC = 0x1002,
    FIELD_DST_MAC = 0x1003,
    FIELD_SRC_IP = 0x1004,
    FIELD_DST_IP = 0x1005,
    FIELD_IN_PORTS = 0x1006,
    FIELD_OUT_PORTS = 0x1007,
    FIELD_IN_PORT = 0x1008,
    FIELD_OUT_PORT = 0x1009,
    FIELD_OUTER_VLAN_ID = 0x100a,
    FIELD_INNER_VLAN_ID = 0x100b,
    FIELD_L4_SRC_PORT = 0x100c,
    FIELD_L4_DST_PORT = 0x100d,
    FIELD_ETHER_TYPE = 0x100e,
    FIELD_IP_PROTOCOL = 0x100f,
    FIELD_DSCP = 0x1010,
    FIELD_ECN = 0x1011,
    FIELD_TTL = 0x1012,
    FIELD_TC = 0x1013,
    FIELD_TCP_FLAGS = 0x1014,
    FIELD_ICMP_TYPE = 0x1015,
    FIELD_ICMP_CODE = 0x1016,
    FIELD_ACL_USER_META = 0x1017,
    FIELD_ACL_RANGE_TYPE = 0x1018,
});

attr_ids!(acl_entry, "SAI_ACL_ENTRY_ATTR_" {
    TABLE_ID = 0,
    PRIORITY = 1,
    ADMIN_STATE = 2,
    FIELD_SRC_IPV6 = 0x1000,
    FIELD_DST_IPV6 = 0x1001,
    FIELD_SRC_MAC = 0x1002,
    FIELD_DST_MAC = 0x1003,
    FIELD_SRC_IP = 0x1004,
    FIELD_DST_IP = 0x1005,
    FIELD_IN_PORTS = 0x1006,
    FIELD_OUT_PORTS = 0x1007,
    FIELD_IN_PORT = 0x1008,
    FIELD_OUT_PORT = 0x1009,
    FIELD_OUTER_VLAN_ID = 0x100a,
    FIELD_INNER_VLAN_ID = 0x100b,
    FIELD_L4_SRC_PORT = 0x100c,
    FIELD_L4_DST_PORT = 0x100d,
    FIELD_ETHER_TYPE = 0x100e,
    FIELD_IP_PROTOCOL = 0x100f,
    FIELD_DSCP = 0x1010,
    FIELD_ECN = 0x1011,
    FIELD_TTL = 0x1012,
    FIELD_TC = 0x1013,
    FIELD_TCP_FLAGS = 0x1014,
    FIELD_ICMP_TYPE = 0x1015,
    FIELD_ICMP_CODE = 0x1016,
    FIELD_ACL_USER_META = 0x1017,
    FIELD_ACL_RANGE_TYPE = 0x1018,
    FIELD_SRC_MAC_MASK = 0x1802,
    FIELD_DST_MAC_MASK = 0x1803,
    FIELD_OUTER_VLAN_ID_MASK = 0x180a,
    FIELD_INNER_VLAN_ID_MASK = 0x180b,
    FIELD_L4_SRC_PORT_MASK = 0x180c,
    FIELD_L4_DST_PORT_MASK = 0x180d,
    FIELD_ETHER_TYPE_MASK = 0x180e,
    FIELD_IP_PROTOCOL_MASK = 0x180f,
    FIELD_DSCP_MASK = 0x1810,
    FIELD_ECN_MASK = 0x1811,
    FIELD_TTL_MASK = 0x1812,
    FIELD_TC_MASK = 0x1813,
    FIELD_TCP_FLAGS_MASK = 0x1814,
    FIELD_ICMP_TYPE_MASK = 0x1815,
    FIELD_ICMP_CODE_MASK = 0x1816,
    FIELD_ACL_USER_META_MASK = 0x1817,
    ACTION_REDIRECT = 0x2000,
    ACTION_PACKET_ACTION = 0x2001,
    ACTION_COUNTER = 0x2002,
    ACTION_MIRROR_INGRESS = 0x2003,
    ACTION_MIRROR_EGRESS = 0x2004,
    ACTION_SET_POLICER = 0x2005,
    ACTION_SET_TC = 0x2006,
    ACTION_SET_DSCP = 0x2007,
    ACTION_SET_SRC_MAC = 0x2008,
    ACTION_SET_DST_MAC = 0x2009,
    ACTION_SET_ACL_META_DATA = 0x200a,
});

attr_ids!(acl_counter, "SAI_ACL_COUNTER_ATTR_" {
    TABLE_ID = 0,
    ENABLE_BYTE_COUNT = 1,
    PACKETS = 2,
    BYTES = 3,
});

attr_ids!(acl_range, "SAI_ACL_RANGE_ATTR_" {
    TYPE = 0,
    LIMIT = 1,
});

attr_ids!(acl_table_group, "SAI_ACL_TABLE_GROUP_ATTR_" {
    ACL_STAGE = 0,
    ACL_BIND_POINT_TYPE_LIST = 1,
    TYPE = 2,
});

attr_ids!(acl_table_group_member, "SAI_ACL_TABLE_GROUP_MEMBER_ATTR_" {
    ACL_TABLE_GROUP_ID = 0,
    ACL_TABLE_ID = 1,
    PRIORITY = 2,
});

/// Match fields an entry may declare: (id, kind, allowed object types, validator).
const MATCH_FIELDS: &[(AttrId, ValueKind, &[ObjectType], Option<Validator>)] = &[
    (acl_entry::FIELD_SRC_IPV6, ValueKind::IpPrefix, &[], Some(ipv6_prefix)),
    (acl_entry::FIELD_DST_IPV6, ValueKind::IpPrefix, &[], Some(ipv6_prefix)),
    (acl_entry::FIELD_SRC_MAC, ValueKind::Mac, &[], None),
    (acl_entry::FIELD_DST_MAC, ValueKind::Mac, &[], None),
    (acl_entry::FIELD_SRC_IP, ValueKind::IpPrefix, &[], Some(ipv4_prefix)),
    (acl_entry::FIELD_DST_IP, ValueKind::IpPrefix, &[], Some(ipv4_prefix)),
    (acl_entry::FIELD_IN_PORTS, ValueKind::OidList, PORT_OR_LAG, None),
    (acl_entry::FIELD_OUT_PORTS, ValueKind::OidList, PORT_OR_LAG, None),
    (acl_entry::FIELD_IN_PORT, ValueKind::Oid, PORT_OR_LAG, None),
    (acl_entry::FIELD_OUT_PORT, ValueKind::Oid, PORT_OR_LAG, None),
    (acl_entry::FIELD_OUTER_VLAN_ID, ValueKind::U16, &[], Some(vlan_id)),
    (acl_entry::FIELD_INNER_VLAN_ID, ValueKind::U16, &[], Some(vlan_id)),
    (acl_entry::FIELD_L4_SRC_PORT, ValueKind::U16, &[], None),
    (acl_entry::FIELD_L4_DST_PORT, ValueKind::U16, &[], None),
    (acl_entry::FIELD_ETHER_TYPE, ValueKind::U16, &[], None),
    (acl_entry::FIELD_IP_PROTOCOL, ValueKind::U8, &[], None),
    (acl_entry::FIELD_DSCP, ValueKind::U8, &[], Some(dscp)),
    (acl_entry::FIELD_ECN, ValueKind::U8, &[], Some(ecn)),
    (acl_entry::FIELD_TTL, ValueKind::U8, &[], None),
    (acl_entry::FIELD_TC, ValueKind::U8, &[], Some(traffic_class)),
    (acl_entry::FIELD_TCP_FLAGS, ValueKind::U8, &[], None),
    (acl_entry::FIELD_ICMP_TYPE, ValueKind::U8, &[], None),
    (acl_entry::FIELD_ICMP_CODE, ValueKind::U8, &[], None),
    (acl_entry::FIELD_ACL_USER_META, ValueKind::U32, &[], None),
    (acl_entry::FIELD_ACL_RANGE_TYPE, ValueKind::OidList, &[ObjectType::AclRange], None),
];

/// Distance from a match field id to the id of its mask.
const MASK_OFFSET: AttrId = 0x800;

/// Match fields that take a mask, with the mask's kind.
const MASKED_FIELDS: &[(AttrId, ValueKind)] = &[
    (acl_entry::FIELD_SRC_MAC, ValueKind::Mac),
    (acl_entry::FIELD_DST_MAC, ValueKind::Mac),
    (acl_entry::FIELD_OUTER_VLAN_ID, ValueKind::U16),
    (acl_entry::FIELD_INNER_VLAN_ID, ValueKind::U16),
    (acl_entry::FIELD_L4_SRC_PORT, ValueKind::U16),
    (acl_entry::FIELD_L4_DST_PORT, ValueKind::U16),
    (acl_entry::FIELD_ETHER_TYPE, ValueKind::U16),
    (acl_entry::FIELD_IP_PROTOCOL, ValueKind::U8),
    (acl_entry::FIELD_DSCP, ValueKind::U8),
    (acl_entry::FIELD_ECN, ValueKind::U8),
    (acl_entry::FIELD_TTL, ValueKind::U8),
    (acl_entry::FIELD_TC, ValueKind::U8),
    (acl_entry::FIELD_TCP_FLAGS, ValueKind::U8),
    (acl_entry::FIELD_ICMP_TYPE, ValueKind::U8),
    (acl_entry::FIELD_ICMP_CODE, ValueKind::U8),
    (acl_entry::FIELD_ACL_USER_META, ValueKind::U32),
];

/// True when `id` is an ACL entry match field.
pub fn is_acl_match_field(id: AttrId) -> bool {
    MATCH_FIELDS.iter().any(|(field, ..)| *field == id)
}

/// Id of the mask attribute of match field `field`, if it takes one.
pub fn acl_field_mask(field: AttrId) -> Option<AttrId> {
    MASKED_FIELDS
        .iter()
        .any(|(id, _)| *id == field)
        .then_some(field + MASK_OFFSET)
}

fn ecn(value: &AttrValue) -> bool {
    matches!(value, AttrValue::U8(v) if *v <= 3)
}

fn entry_attr(id: AttrId, kind: ValueKind) -> AttrSpec {
    AttrSpec::create_and_set(id, kind)
}

fn acl_entry_schema() -> ObjectSchema {
    let mut builder = ObjectSchema::builder(ObjectType::AclEntry, acl_entry::NAMES)
        .attr(
            AttrSpec::create_only(acl_entry::TABLE_ID, ValueKind::Oid)
                .mandatory()
                .with_objects(&[ObjectType::AclTable]),
        )
        .attr(entry_attr(acl_entry::PRIORITY, ValueKind::U32).with_default(AttrValue::U32(0)))
        .attr(flag(acl_entry::ADMIN_STATE, true));

    for (id, kind, objects, validator) in MATCH_FIELDS {
        let mut spec = entry_attr(*id, *kind).with_objects(objects);
        if let Some(validator) = validator {
            spec = spec.with_validator(*validator);
        }
        builder = builder.attr(spec);
    }
    for (field, kind) in MASKED_FIELDS {
        builder = builder.attr(entry_attr(field + MASK_OFFSET, *kind));
    }

    builder
        .attr(
            entry_attr(acl_entry::ACTION_REDIRECT, ValueKind::Oid).with_objects(&[
                ObjectType::Port,
                ObjectType::Lag,
                ObjectType::NextHop,
                ObjectType::NextHopGroup,
                ObjectType::RouterInterface,
            ]),
        )
        .attr(entry_attr(acl_entry::ACTION_PACKET_ACTION, ValueKind::Enum).with_enum(&packet_action::META))
        .attr(entry_attr(acl_entry::ACTION_COUNTER, ValueKind::Oid).with_objects(&[ObjectType::AclCounter]))
        .attr(
            entry_attr(acl_entry::ACTION_MIRROR_INGRESS, ValueKind::OidList)
                .with_objects(&[ObjectType::MirrorSession]),
        )
        .attr(
            entry_attr(acl_entry::ACTION_MIRROR_EGRESS, ValueKind::OidList)
                .with_objects(&[ObjectType::MirrorSession]),
        )
        .attr(entry_attr(acl_entry::ACTION_SET_POLICER, ValueKind::Oid).with_objects(&[ObjectType::Policer]))
        .attr(entry_attr(acl_entry::ACTION_SET_TC, ValueKind::U8).with_validator(traffic_class))
        .attr(entry_attr(acl_entry::ACTION_SET_DSCP, ValueKind::U8).with_validator(dscp))
        .attr(entry_attr(acl_entry::ACTION_SET_SRC_MAC, ValueKind::Mac))
        .attr(entry_attr(acl_entry::ACTION_SET_DST_MAC, ValueKind::Mac))
        .attr(entry_attr(acl_entry::ACTION_SET_ACL_META_DATA, ValueKind::U32))
        .build()
}

fn acl_table_schema() -> ObjectSchema {
    let mut builder = ObjectSchema::builder(ObjectType::AclTable, acl_table::NAMES)
        .attr(
            AttrSpec::create_only(acl_table::ACL_STAGE, ValueKind::Enum)
                .mandatory()
                .with_enum(&acl_stage::META),
        )
        .attr(
            AttrSpec::create_only(acl_table::ACL_BIND_POINT_TYPE_LIST, ValueKind::EnumList)
                .with_enum(&acl_bind_point_type::META)
                .with_default(AttrValue::EnumList(Vec::new())),
        )
        .attr(AttrSpec::create_only(acl_table::SIZE, ValueKind::U32).with_default(AttrValue::U32(0)));

    for (id, ..) in MATCH_FIELDS {
        let spec = if *id == acl_table::FIELD_ACL_RANGE_TYPE {
            AttrSpec::create_only(*id, ValueKind::EnumList)
                .with_enum(&acl_range_type::META)
                .with_default(AttrValue::EnumList(Vec::new()))
        } else {
            AttrSpec::create_only(*id, ValueKind::Bool).with_default(AttrValue::Bool(false))
        };
        builder = builder.attr(spec);
    }
    builder.build()
}

pub(super) fn acl_schemas() -> Vec<ObjectSchema> {
    vec![
        acl_table_schema(),
        acl_entry_schema(),
        ObjectSchema::builder(ObjectType::AclCounter, acl_counter::NAMES)
            .attr(
                AttrSpec::create_only(acl_counter::TABLE_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::AclTable]),
            )
            .attr(
                AttrSpec::create_only(acl_counter::ENABLE_BYTE_COUNT, ValueKind::Bool)
                    .with_default(AttrValue::Bool(false)),
            )
            .attr(AttrSpec::statistic(acl_counter::PACKETS))
            .attr(AttrSpec::statistic(acl_counter::BYTES))
            .build(),
        ObjectSchema::builder(ObjectType::AclRange, acl_range::NAMES)
            .attr(
                AttrSpec::create_only(acl_range::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&acl_range_type::META),
            )
            .attr(AttrSpec::create_only(acl_range::LIMIT, ValueKind::U32Range).mandatory())
            .build(),
        ObjectSchema::builder(ObjectType::AclTableGroup, acl_table_group::NAMES)
            .attr(
                AttrSpec::create_only(acl_table_group::ACL_STAGE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&acl_stage::META),
            )
            .attr(
                AttrSpec::create_only(acl_table_group::ACL_BIND_POINT_TYPE_LIST, ValueKind::EnumList)
                    .with_enum(&acl_bind_point_type::META)
                    .with_default(AttrValue::EnumList(Vec::new())),
            )
            .attr(
                AttrSpec::create_only(acl_table_group::TYPE, ValueKind::Enum)
                    .with_enum(&acl_table_group_type::META)
                    .with_default(AttrValue::Enum(acl_table_group_type::SEQUENTIAL)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::AclTableGroupMember, acl_table_group_member::NAMES)
            .attr(
                AttrSpec::create_only(acl_table_group_member::ACL_TABLE_GROUP_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::AclTableGroup]),
            )
            .attr(
                AttrSpec::create_only(acl_table_group_member::ACL_TABLE_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::AclTable]),
            )
            .attr(
                AttrSpec::create_only(acl_table_group_member::PRIORITY, ValueKind::U32)
                    .mandatory()
                    .with_validator(positive),
            )
            .build(),
    ]
}
