//! Switch, port, LAG, VLAN, bridge, FDB, STP, isolation and hash objects.

use super::enums::{
    bridge_port_type, bridge_type, fdb_entry_type, isolation_group_type, native_hash_field,
    packet_action, port_fec_mode, port_oper_status, stp_port_state, vlan_tagging_mode,
};
use super::{flag, nullable_oid, positive, read_only_oid_list, vlan_id, ACL_BIND_TARGETS, PORT_OR_LAG};
use crate::schema::{AttrId, AttrSpec, ObjectSchema};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};
use sonic_types::MacAddress;

attr_ids!(switch, "SAI_SWITCH_ATTR_" {
    INIT_SWITCH = 0,
    HARDWARE_INFO = 1,
    SRC_MAC_ADDRESS = 2,
    PORT_NUMBER = 3,
    CPU_PORT = 4,
    DEFAULT_VIRTUAL_ROUTER_ID = 5,
    FDB_AGING_TIME = 6,
    ECMP_DEFAULT_HASH_SEED = 7,
    LAG_DEFAULT_HASH_SEED = 8,
    ECMP_HASH = 9,
    LAG_HASH = 10,
    PRE_INGRESS_ACL = 11,
    INGRESS_ACL = 12,
    EGRESS_ACL = 13,
    RESTART_WARM = 14,
});

attr_ids!(port, "SAI_PORT_ATTR_" {
    HW_LANE_LIST = 0,
    SPEED = 1,
    ADMIN_STATE = 2,
    MTU = 3,
    OPER_STATUS = 4,
    FEC_MODE = 5,
    PORT_VLAN_ID = 6,
    DEFAULT_VLAN_PRIORITY = 7,
    INGRESS_ACL = 8,
    EGRESS_ACL = 9,
    QOS_DSCP_TO_TC_MAP = 10,
    QOS_TC_TO_QUEUE_MAP = 11,
    POLICER_ID = 12,
    INGRESS_SAMPLEPACKET_ENABLE = 13,
    INGRESS_MIRROR_SESSION = 14,
    EGRESS_MIRROR_SESSION = 15,
    PRIORITY_FLOW_CONTROL = 16,
    ISOLATION_GROUP = 17,
    QOS_NUMBER_OF_QUEUES = 18,
});

attr_ids!(lag, "SAI_LAG_ATTR_" {
    PORT_LIST = 0,
    INGRESS_ACL = 1,
    EGRESS_ACL = 2,
    PORT_VLAN_ID = 3,
    DEFAULT_VLAN_PRIORITY = 4,
    DROP_UNTAGGED = 5,
    DROP_TAGGED = 6,
    SYSTEM_PORT_AGGREGATE_ID = 7,
});

attr_ids!(lag_member, "SAI_LAG_MEMBER_ATTR_" {
    LAG_ID = 0,
    PORT_ID = 1,
    EGRESS_DISABLE = 2,
    INGRESS_DISABLE = 3,
});

attr_ids!(vlan, "SAI_VLAN_ATTR_" {
    MEMBER_LIST = 0,
    MAX_LEARNED_ADDRESSES = 1,
    STP_INSTANCE = 2,
    LEARN_DISABLE = 3,
    INGRESS_ACL = 4,
    EGRESS_ACL = 5,
    VLAN_ID = 0x1000_0000,
});

attr_ids!(vlan_member, "SAI_VLAN_MEMBER_ATTR_" {
    VLAN_ID = 0,
    BRIDGE_PORT_ID = 1,
    VLAN_TAGGING_MODE = 2,
});

attr_ids!(bridge, "SAI_BRIDGE_ATTR_" {
    TYPE = 0,
    PORT_LIST = 1,
    MAX_LEARNED_ADDRESSES = 2,
    LEARN_DISABLE = 3,
});

attr_ids!(bridge_port, "SAI_BRIDGE_PORT_ATTR_" {
    TYPE = 0,
    PORT_ID = 1,
    VLAN_ID = 2,
    RIF_ID = 3,
    TUNNEL_ID = 4,
    BRIDGE_ID = 5,
    ADMIN_STATE = 6,
    INGRESS_FILTERING = 7,
    EGRESS_FILTERING = 8,
    ISOLATION_GROUP = 9,
});

attr_ids!(fdb_entry, "SAI_FDB_ENTRY_ATTR_" {
    TYPE = 0,
    PACKET_ACTION = 1,
    BRIDGE_PORT_ID = 2,
    ENDPOINT_IP = 3,
    META_DATA = 4,
    ALLOW_MAC_MOVE = 5,
    MAC_ADDRESS = 0x1000_0000,
    BV_ID = 0x1000_0001,
});

attr_ids!(stp, "SAI_STP_ATTR_" {
    VLAN_LIST = 0,
    BRIDGE_ID = 1,
    PORT_LIST = 2,
});

attr_ids!(stp_port, "SAI_STP_PORT_ATTR_" {
    STP = 0,
    BRIDGE_PORT = 1,
    STATE = 2,
});

attr_ids!(isolation_group, "SAI_ISOLATION_GROUP_ATTR_" {
    TYPE = 0,
    ISOLATION_MEMBER_LIST = 1,
});

attr_ids!(isolation_group_member, "SAI_ISOLATION_GROUP_MEMBER_ATTR_" {
    ISOLATION_GROUP_ID = 0,
    ISOLATION_OBJECT = 1,
});

attr_ids!(hash, "SAI_HASH_ATTR_" {
    NATIVE_HASH_FIELD_LIST = 0,
});

fn port_vlan(id: AttrId) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::U16)
        .with_default(AttrValue::U16(1))
        .with_validator(vlan_id)
}

pub(super) fn switching_schemas() -> Vec<ObjectSchema> {
    vec![
        ObjectSchema::builder(ObjectType::Switch, switch::NAMES)
            .attr(AttrSpec::create_only(switch::INIT_SWITCH, ValueKind::Bool).mandatory())
            .attr(
                AttrSpec::create_only(switch::HARDWARE_INFO, ValueKind::Chardata)
                    .with_default(AttrValue::Chardata(String::new())),
            )
            .attr(
                AttrSpec::create_and_set(switch::SRC_MAC_ADDRESS, ValueKind::Mac)
                    .with_default(AttrValue::Mac(MacAddress::ZERO)),
            )
            .attr(AttrSpec::read_only(switch::PORT_NUMBER, ValueKind::U32).with_default(AttrValue::U32(0)))
            .attr(AttrSpec::read_only(switch::CPU_PORT, ValueKind::Oid).with_default(AttrValue::Oid(0)))
            .attr(
                AttrSpec::read_only(switch::DEFAULT_VIRTUAL_ROUTER_ID, ValueKind::Oid)
                    .with_default(AttrValue::Oid(0)),
            )
            .attr(AttrSpec::create_and_set(switch::FDB_AGING_TIME, ValueKind::U32).with_default(AttrValue::U32(0)))
            .attr(
                AttrSpec::create_and_set(switch::ECMP_DEFAULT_HASH_SEED, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(
                AttrSpec::create_and_set(switch::LAG_DEFAULT_HASH_SEED, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(nullable_oid(switch::ECMP_HASH, &[ObjectType::Hash]))
            .attr(nullable_oid(switch::LAG_HASH, &[ObjectType::Hash]))
            .attr(nullable_oid(switch::PRE_INGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(switch::INGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(switch::EGRESS_ACL, ACL_BIND_TARGETS))
            .attr(flag(switch::RESTART_WARM, false))
            .build(),
        ObjectSchema::builder(ObjectType::Port, port::NAMES)
            .attr(AttrSpec::create_only(port::HW_LANE_LIST, ValueKind::U32List).mandatory())
            .attr(
                AttrSpec::create_and_set(port::SPEED, ValueKind::U32)
                    .mandatory()
                    .with_validator(positive),
            )
            .attr(flag(port::ADMIN_STATE, false))
            .attr(
                AttrSpec::create_and_set(port::MTU, ValueKind::U32)
                    .with_default(AttrValue::U32(1514))
                    .with_validator(positive),
            )
            .attr(
                AttrSpec::read_only(port::OPER_STATUS, ValueKind::Enum)
                    .with_enum(&port_oper_status::META)
                    .with_default(AttrValue::Enum(port_oper_status::UNKNOWN)),
            )
            .attr(
                AttrSpec::create_and_set(port::FEC_MODE, ValueKind::Enum)
                    .with_enum(&port_fec_mode::META)
                    .with_default(AttrValue::Enum(port_fec_mode::NONE)),
            )
            .attr(port_vlan(port::PORT_VLAN_ID))
            .attr(
                AttrSpec::create_and_set(port::DEFAULT_VLAN_PRIORITY, ValueKind::U8)
                    .with_default(AttrValue::U8(0)),
            )
            .attr(nullable_oid(port::INGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(port::EGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(port::QOS_DSCP_TO_TC_MAP, &[ObjectType::QosMap]))
            .attr(nullable_oid(port::QOS_TC_TO_QUEUE_MAP, &[ObjectType::QosMap]))
            .attr(nullable_oid(port::POLICER_ID, &[ObjectType::Policer]))
            .attr(nullable_oid(port::INGRESS_SAMPLEPACKET_ENABLE, &[ObjectType::Samplepacket]))
            .attr(
                AttrSpec::create_and_set(port::INGRESS_MIRROR_SESSION, ValueKind::OidList)
                    .with_default(AttrValue::OidList(Vec::new()))
                    .with_objects(&[ObjectType::MirrorSession]),
            )
            .attr(
                AttrSpec::create_and_set(port::EGRESS_MIRROR_SESSION, ValueKind::OidList)
                    .with_default(AttrValue::OidList(Vec::new()))
                    .with_objects(&[ObjectType::MirrorSession]),
            )
            .attr(
                AttrSpec::create_and_set(port::PRIORITY_FLOW_CONTROL, ValueKind::U8)
                    .with_default(AttrValue::U8(0)),
            )
            .attr(nullable_oid(port::ISOLATION_GROUP, &[ObjectType::IsolationGroup]))
            .attr(
                AttrSpec::read_only(port::QOS_NUMBER_OF_QUEUES, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::Lag, lag::NAMES)
            .attr(read_only_oid_list(lag::PORT_LIST))
            .attr(nullable_oid(lag::INGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(lag::EGRESS_ACL, ACL_BIND_TARGETS))
            .attr(port_vlan(lag::PORT_VLAN_ID))
            .attr(
                AttrSpec::create_and_set(lag::DEFAULT_VLAN_PRIORITY, ValueKind::U8)
                    .with_default(AttrValue::U8(0)),
            )
            .attr(flag(lag::DROP_UNTAGGED, false))
            .attr(flag(lag::DROP_TAGGED, false))
            .attr(
                AttrSpec::create_only(lag::SYSTEM_PORT_AGGREGATE_ID, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::LagMember, lag_member::NAMES)
            .attr(
                AttrSpec::create_only(lag_member::LAG_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Lag]),
            )
            .attr(
                AttrSpec::create_only(lag_member::PORT_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Port]),
            )
            .attr(flag(lag_member::EGRESS_DISABLE, false))
            .attr(flag(lag_member::INGRESS_DISABLE, false))
            .build(),
        ObjectSchema::builder(ObjectType::Vlan, vlan::NAMES)
            .attr(AttrSpec::key(vlan::VLAN_ID, ValueKind::U16).with_validator(vlan_id))
            .attr(read_only_oid_list(vlan::MEMBER_LIST))
            .attr(
                AttrSpec::create_and_set(vlan::MAX_LEARNED_ADDRESSES, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(nullable_oid(vlan::STP_INSTANCE, &[ObjectType::Stp]))
            .attr(flag(vlan::LEARN_DISABLE, false))
            .attr(nullable_oid(vlan::INGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(vlan::EGRESS_ACL, ACL_BIND_TARGETS))
            .build(),
        ObjectSchema::builder(ObjectType::VlanMember, vlan_member::NAMES)
            .attr(
                AttrSpec::create_only(vlan_member::VLAN_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Vlan]),
            )
            .attr(
                AttrSpec::create_only(vlan_member::BRIDGE_PORT_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::BridgePort]),
            )
            .attr(
                AttrSpec::create_and_set(vlan_member::VLAN_TAGGING_MODE, ValueKind::Enum)
                    .with_enum(&vlan_tagging_mode::META)
                    .with_default(AttrValue::Enum(vlan_tagging_mode::UNTAGGED)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::Bridge, bridge::NAMES)
            .attr(
                AttrSpec::create_only(bridge::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&bridge_type::META),
            )
            .attr(read_only_oid_list(bridge::PORT_LIST))
            .attr(
                AttrSpec::create_and_set(bridge::MAX_LEARNED_ADDRESSES, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(flag(bridge::LEARN_DISABLE, false))
            .build(),
        ObjectSchema::builder(ObjectType::BridgePort, bridge_port::NAMES)
            .attr(
                AttrSpec::create_only(bridge_port::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&bridge_port_type::META),
            )
            .attr(
                AttrSpec::create_only(bridge_port::PORT_ID, ValueKind::Oid)
                    .mandatory_when(
                        bridge_port::TYPE,
                        &[bridge_port_type::PORT, bridge_port_type::SUB_PORT],
                    )
                    .with_objects(PORT_OR_LAG),
            )
            .attr(
                AttrSpec::create_only(bridge_port::VLAN_ID, ValueKind::U16)
                    .mandatory_when(bridge_port::TYPE, &[bridge_port_type::SUB_PORT])
                    .with_validator(vlan_id),
            )
            .attr(
                AttrSpec::create_only(bridge_port::RIF_ID, ValueKind::Oid)
                    .mandatory_when(
                        bridge_port::TYPE,
                        &[bridge_port_type::ROUTER_1Q, bridge_port_type::ROUTER_1D],
                    )
                    .with_objects(&[ObjectType::RouterInterface]),
            )
            .attr(
                AttrSpec::create_only(bridge_port::TUNNEL_ID, ValueKind::Oid)
                    .mandatory_when(bridge_port::TYPE, &[bridge_port_type::TUNNEL])
                    .with_objects(&[ObjectType::Tunnel]),
            )
            .attr(nullable_oid(bridge_port::BRIDGE_ID, &[ObjectType::Bridge]))
            .attr(flag(bridge_port::ADMIN_STATE, false))
            .attr(flag(bridge_port::INGRESS_FILTERING, false))
            .attr(flag(bridge_port::EGRESS_FILTERING, false))
            .attr(nullable_oid(bridge_port::ISOLATION_GROUP, &[ObjectType::IsolationGroup]))
            .build(),
        ObjectSchema::builder(ObjectType::FdbEntry, fdb_entry::NAMES)
            .attr(AttrSpec::key(fdb_entry::MAC_ADDRESS, ValueKind::Mac))
            .attr(
                AttrSpec::key(fdb_entry::BV_ID, ValueKind::Oid)
                    .with_objects(&[ObjectType::Vlan, ObjectType::Bridge]),
            )
            .attr(
                AttrSpec::create_and_set(fdb_entry::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&fdb_entry_type::META),
            )
            .attr(
                AttrSpec::create_and_set(fdb_entry::PACKET_ACTION, ValueKind::Enum)
                    .with_enum(&packet_action::META)
                    .with_default(AttrValue::Enum(packet_action::FORWARD)),
            )
            .attr(nullable_oid(fdb_entry::BRIDGE_PORT_ID, &[ObjectType::BridgePort]))
            .attr(
                AttrSpec::create_and_set(fdb_entry::ENDPOINT_IP, ValueKind::IpAddress)
                    .with_default(AttrValue::default_for(ValueKind::IpAddress)),
            )
            .attr(
                AttrSpec::create_and_set(fdb_entry::META_DATA, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(flag(fdb_entry::ALLOW_MAC_MOVE, false))
            .build(),
        ObjectSchema::builder(ObjectType::Stp, stp::NAMES)
            .attr(AttrSpec::read_only(stp::VLAN_LIST, ValueKind::U16List).with_default(AttrValue::U16List(Vec::new())))
            .attr(AttrSpec::read_only(stp::BRIDGE_ID, ValueKind::Oid).with_default(AttrValue::Oid(0)))
            .attr(read_only_oid_list(stp::PORT_LIST))
            .build(),
        ObjectSchema::builder(ObjectType::StpPort, stp_port::NAMES)
            .attr(
                AttrSpec::create_only(stp_port::STP, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Stp]),
            )
            .attr(
                AttrSpec::create_only(stp_port::BRIDGE_PORT, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::BridgePort]),
            )
            .attr(
                AttrSpec::create_and_set(stp_port::STATE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&stp_port_state::META),
            )
            .build(),
        ObjectSchema::builder(ObjectType::IsolationGroup, isolation_group::NAMES)
            .attr(
                AttrSpec::create_only(isolation_group::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&isolation_group_type::META),
            )
            .attr(read_only_oid_list(isolation_group::ISOLATION_MEMBER_LIST))
            .build(),
        ObjectSchema::builder(ObjectType::IsolationGroupMember, isolation_group_member::NAMES)
            .attr(
                AttrSpec::create_only(isolation_group_member::ISOLATION_GROUP_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::IsolationGroup]),
            )
            .attr(
                AttrSpec::create_only(isolation_group_member::ISOLATION_OBJECT, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Port, ObjectType::BridgePort]),
            )
            .build(),
        ObjectSchema::builder(ObjectType::Hash, hash::NAMES)
            .attr(
                AttrSpec::create_and_set(hash::NATIVE_HASH_FIELD_LIST, ValueKind::EnumList)
                    .with_enum(&native_hash_field::META)
                    .with_default(AttrValue::EnumList(Vec::new())),
            )
            .build(),
    ]
}
