//! Virtual routers, router interfaces, next hops, groups, route and
//! neighbor entries, MPLS in-segment entries and my-MAC.

use super::enums::{
    next_hop_group_map_type, next_hop_group_member_configured_role,
    next_hop_group_member_observed_role, next_hop_group_type, next_hop_type, packet_action,
    router_interface_type,
};
use super::{canonical_prefix, flag, nullable_oid, positive, vlan_id, ACL_BIND_TARGETS, PORT_OR_LAG};
use crate::schema::{AttrId, AttrSpec, ObjectSchema};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};
use sonic_types::MacAddress;

attr_ids!(virtual_router, "SAI_VIRTUAL_ROUTER_ATTR_" {
    ADMIN_V4_STATE = 0,
    ADMIN_V6_STATE = 1,
    SRC_MAC_ADDRESS = 2,
    VIOLATION_TTL1_PACKET_ACTION = 3,
    VIOLATION_IP_OPTIONS_PACKET_ACTION = 4,
    UNKNOWN_L3_MULTICAST_PACKET_ACTION = 5,
    LABEL = 6,
});

attr_ids!(router_interface, "SAI_ROUTER_INTERFACE_ATTR_" {
    VIRTUAL_ROUTER_ID = 0,
    TYPE = 1,
    PORT_ID = 2,
    VLAN_ID = 3,
    OUTER_VLAN_ID = 4,
    BRIDGE_ID = 5,
    SRC_MAC_ADDRESS = 6,
    ADMIN_V4_STATE = 7,
    ADMIN_V6_STATE = 8,
    MTU = 9,
    INGRESS_ACL = 10,
    EGRESS_ACL = 11,
    NEIGHBOR_MISS_PACKET_ACTION = 12,
    LOOPBACK_PACKET_ACTION = 13,
});

attr_ids!(next_hop, "SAI_NEXT_HOP_ATTR_" {
    TYPE = 0,
    IP = 1,
    ROUTER_INTERFACE_ID = 2,
    TUNNEL_ID = 3,
    LABELSTACK = 4,
    TUNNEL_VNI = 5,
    TUNNEL_MAC = 6,
    DISABLE_DECREMENT_TTL = 7,
    COUNTER_ID = 8,
});

attr_ids!(next_hop_group, "SAI_NEXT_HOP_GROUP_ATTR_" {
    TYPE = 0,
    SET_SWITCHOVER = 1,
    CONFIGURED_SIZE = 2,
    SELECTION_MAP = 3,
    NEXT_HOP_LIST = 4,
    NEXT_HOP_MEMBER_WEIGHT_LIST = 5,
    COUNTER_ID = 6,
});

attr_ids!(next_hop_group_member, "SAI_NEXT_HOP_GROUP_MEMBER_ATTR_" {
    NEXT_HOP_GROUP_ID = 0,
    NEXT_HOP_ID = 1,
    WEIGHT = 2,
    CONFIGURED_ROLE = 3,
    OBSERVED_ROLE = 4,
    MONITORED_OBJECT = 5,
    INDEX = 6,
    SEQUENCE_ID = 7,
    COUNTER_ID = 8,
});

attr_ids!(next_hop_group_map, "SAI_NEXT_HOP_GROUP_MAP_ATTR_" {
    TYPE = 0,
    MAP_TO_VALUE_LIST = 1,
});

attr_ids!(route_entry, "SAI_ROUTE_ENTRY_ATTR_" {
    PACKET_ACTION = 0,
    USER_TRAP_ID = 1,
    NEXT_HOP_ID = 2,
    META_DATA = 3,
    COUNTER_ID = 4,
    VR_ID = 0x1000_0000,
    DESTINATION = 0x1000_0001,
});

attr_ids!(neighbor_entry, "SAI_NEIGHBOR_ENTRY_ATTR_" {
    DST_MAC_ADDRESS = 0,
    PACKET_ACTION = 1,
    NO_HOST_ROUTE = 2,
    META_DATA = 3,
    COUNTER_ID = 4,
    RIF_ID = 0x1000_0000,
    IP_ADDRESS = 0x1000_0001,
});

attr_ids!(inseg_entry, "SAI_INSEG_ENTRY_ATTR_" {
    NUM_OF_POP = 0,
    PACKET_ACTION = 1,
    NEXT_HOP_ID = 2,
    TRAP_PRIORITY = 3,
    LABEL = 0x1000_0000,
});

attr_ids!(my_mac, "SAI_MY_MAC_ATTR_" {
    PORT_ID = 0,
    VLAN_ID = 1,
    MAC_ADDRESS = 2,
    MAC_ADDRESS_MASK = 3,
    PRIORITY = 4,
});

/// Objects a route or in-segment entry may forward to.
const FORWARDING_TARGETS: &[ObjectType] = &[
    ObjectType::NextHop,
    ObjectType::NextHopGroup,
    ObjectType::RouterInterface,
];

fn action(id: AttrId, default: i32) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::Enum)
        .with_enum(&packet_action::META)
        .with_default(AttrValue::Enum(default))
}

fn u32_with_default(id: AttrId, default: u32) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::U32).with_default(AttrValue::U32(default))
}

fn mpls_label(value: &AttrValue) -> bool {
    matches!(value, AttrValue::U32(label) if *label < (1 << 20))
}

pub(super) fn routing_schemas() -> Vec<ObjectSchema> {
    vec![
        ObjectSchema::builder(ObjectType::VirtualRouter, virtual_router::NAMES)
            .attr(flag(virtual_router::ADMIN_V4_STATE, true))
            .attr(flag(virtual_router::ADMIN_V6_STATE, true))
            .attr(
                AttrSpec::create_and_set(virtual_router::SRC_MAC_ADDRESS, ValueKind::Mac)
                    .with_default(AttrValue::Mac(MacAddress::ZERO)),
            )
            .attr(action(virtual_router::VIOLATION_TTL1_PACKET_ACTION, packet_action::TRAP))
            .attr(action(virtual_router::VIOLATION_IP_OPTIONS_PACKET_ACTION, packet_action::TRAP))
            .attr(action(virtual_router::UNKNOWN_L3_MULTICAST_PACKET_ACTION, packet_action::DROP))
            .attr(
                AttrSpec::create_and_set(virtual_router::LABEL, ValueKind::Chardata)
                    .with_default(AttrValue::Chardata(String::new())),
            )
            .build(),
        ObjectSchema::builder(ObjectType::RouterInterface, router_interface::NAMES)
            .attr(
                AttrSpec::create_only(router_interface::VIRTUAL_ROUTER_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::VirtualRouter]),
            )
            .attr(
                AttrSpec::create_only(router_interface::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&router_interface_type::META),
            )
            .attr(
                AttrSpec::create_only(router_interface::PORT_ID, ValueKind::Oid)
                    .mandatory_when(
                        router_interface::TYPE,
                        &[router_interface_type::PORT, router_interface_type::SUB_PORT],
                    )
                    .with_objects(PORT_OR_LAG),
            )
            .attr(
                AttrSpec::create_only(router_interface::VLAN_ID, ValueKind::Oid)
                    .mandatory_when(router_interface::TYPE, &[router_interface_type::VLAN])
                    .with_objects(&[ObjectType::Vlan]),
            )
            .attr(
                AttrSpec::create_only(router_interface::OUTER_VLAN_ID, ValueKind::U16)
                    .mandatory_when(router_interface::TYPE, &[router_interface_type::SUB_PORT])
                    .with_validator(vlan_id),
            )
            .attr(
                AttrSpec::create_only(router_interface::BRIDGE_ID, ValueKind::Oid)
                    .mandatory_when(router_interface::TYPE, &[router_interface_type::BRIDGE])
                    .with_objects(&[ObjectType::Bridge]),
            )
            .attr(
                AttrSpec::create_and_set(router_interface::SRC_MAC_ADDRESS, ValueKind::Mac)
                    .with_default(AttrValue::Mac(MacAddress::ZERO)),
            )
            .attr(flag(router_interface::ADMIN_V4_STATE, true))
            .attr(flag(router_interface::ADMIN_V6_STATE, true))
            .attr(u32_with_default(router_interface::MTU, 1514).with_validator(positive))
            .attr(nullable_oid(router_interface::INGRESS_ACL, ACL_BIND_TARGETS))
            .attr(nullable_oid(router_interface::EGRESS_ACL, ACL_BIND_TARGETS))
            .attr(action(router_interface::NEIGHBOR_MISS_PACKET_ACTION, packet_action::TRAP))
            .attr(action(router_interface::LOOPBACK_PACKET_ACTION, packet_action::FORWARD))
            .build(),
        ObjectSchema::builder(ObjectType::NextHop, next_hop::NAMES)
            .attr(
                AttrSpec::create_only(next_hop::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&next_hop_type::META),
            )
            .attr(
                AttrSpec::create_only(next_hop::IP, ValueKind::IpAddress).mandatory_when(
                    next_hop::TYPE,
                    &[next_hop_type::IP, next_hop_type::MPLS, next_hop_type::TUNNEL_ENCAP],
                ),
            )
            .attr(
                AttrSpec::create_only(next_hop::ROUTER_INTERFACE_ID, ValueKind::Oid)
                    .mandatory_when(next_hop::TYPE, &[next_hop_type::IP, next_hop_type::MPLS])
                    .with_objects(&[ObjectType::RouterInterface]),
            )
            .attr(
                AttrSpec::create_only(next_hop::TUNNEL_ID, ValueKind::Oid)
                    .mandatory_when(next_hop::TYPE, &[next_hop_type::TUNNEL_ENCAP])
                    .with_objects(&[ObjectType::Tunnel]),
            )
            .attr(
                AttrSpec::create_only(next_hop::LABELSTACK, ValueKind::U32List)
                    .mandatory_when(next_hop::TYPE, &[next_hop_type::MPLS]),
            )
            .attr(u32_with_default(next_hop::TUNNEL_VNI, 0))
            .attr(
                AttrSpec::create_and_set(next_hop::TUNNEL_MAC, ValueKind::Mac)
                    .with_default(AttrValue::Mac(MacAddress::ZERO)),
            )
            .attr(flag(next_hop::DISABLE_DECREMENT_TTL, false))
            .attr(nullable_oid(next_hop::COUNTER_ID, &[ObjectType::Counter]))
            .build(),
        ObjectSchema::builder(ObjectType::NextHopGroup, next_hop_group::NAMES)
            .attr(
                AttrSpec::create_only(next_hop_group::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&next_hop_group_type::META),
            )
            .attr(flag(next_hop_group::SET_SWITCHOVER, false))
            .attr(
                AttrSpec::create_only(next_hop_group::CONFIGURED_SIZE, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(nullable_oid(next_hop_group::SELECTION_MAP, &[ObjectType::NextHopGroupMap]))
            .attr(
                AttrSpec::create_and_set(next_hop_group::NEXT_HOP_LIST, ValueKind::OidList)
                    .with_default(AttrValue::OidList(Vec::new()))
                    .with_objects(&[ObjectType::NextHop]),
            )
            .attr(
                AttrSpec::create_and_set(next_hop_group::NEXT_HOP_MEMBER_WEIGHT_LIST, ValueKind::U32List)
                    .with_default(AttrValue::U32List(Vec::new())),
            )
            .attr(nullable_oid(next_hop_group::COUNTER_ID, &[ObjectType::Counter]))
            .build(),
        ObjectSchema::builder(ObjectType::NextHopGroupMember, next_hop_group_member::NAMES)
            .attr(
                AttrSpec::create_only(next_hop_group_member::NEXT_HOP_GROUP_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::NextHopGroup]),
            )
            .attr(
                AttrSpec::create_and_set(next_hop_group_member::NEXT_HOP_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::NextHop]),
            )
            .attr(u32_with_default(next_hop_group_member::WEIGHT, 1).with_validator(positive))
            .attr(
                AttrSpec::create_only(next_hop_group_member::CONFIGURED_ROLE, ValueKind::Enum)
                    .with_enum(&next_hop_group_member_configured_role::META)
                    .with_default(AttrValue::Enum(next_hop_group_member_configured_role::PRIMARY)),
            )
            .attr(
                AttrSpec::read_only(next_hop_group_member::OBSERVED_ROLE, ValueKind::Enum)
                    .with_enum(&next_hop_group_member_observed_role::META)
                    .with_default(AttrValue::Enum(next_hop_group_member_observed_role::ACTIVE)),
            )
            .attr(nullable_oid(
                next_hop_group_member::MONITORED_OBJECT,
                &[
                    ObjectType::NextHop,
                    ObjectType::Port,
                    ObjectType::RouterInterface,
                    ObjectType::BfdSession,
                ],
            ))
            .attr(
                AttrSpec::create_only(next_hop_group_member::INDEX, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(u32_with_default(next_hop_group_member::SEQUENCE_ID, 0))
            .attr(nullable_oid(next_hop_group_member::COUNTER_ID, &[ObjectType::Counter]))
            .build(),
        ObjectSchema::builder(ObjectType::NextHopGroupMap, next_hop_group_map::NAMES)
            .attr(
                AttrSpec::create_only(next_hop_group_map::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&next_hop_group_map_type::META),
            )
            .attr(
                AttrSpec::create_and_set(next_hop_group_map::MAP_TO_VALUE_LIST, ValueKind::MapList)
                    .with_default(AttrValue::MapList(Vec::new())),
            )
            .build(),
        ObjectSchema::builder(ObjectType::RouteEntry, route_entry::NAMES)
            .attr(
                AttrSpec::key(route_entry::VR_ID, ValueKind::Oid)
                    .with_objects(&[ObjectType::VirtualRouter]),
            )
            .attr(AttrSpec::key(route_entry::DESTINATION, ValueKind::IpPrefix).with_validator(canonical_prefix))
            .attr(action(route_entry::PACKET_ACTION, packet_action::FORWARD))
            .attr(nullable_oid(route_entry::USER_TRAP_ID, &[ObjectType::HostifTrap]))
            .attr(nullable_oid(route_entry::NEXT_HOP_ID, FORWARDING_TARGETS))
            .attr(u32_with_default(route_entry::META_DATA, 0))
            .attr(nullable_oid(route_entry::COUNTER_ID, &[ObjectType::Counter]))
            .build(),
        ObjectSchema::builder(ObjectType::NeighborEntry, neighbor_entry::NAMES)
            .attr(
                AttrSpec::key(neighbor_entry::RIF_ID, ValueKind::Oid)
                    .with_objects(&[ObjectType::RouterInterface]),
            )
            .attr(AttrSpec::key(neighbor_entry::IP_ADDRESS, ValueKind::IpAddress))
            .attr(AttrSpec::create_and_set(neighbor_entry::DST_MAC_ADDRESS, ValueKind::Mac).mandatory())
            .attr(action(neighbor_entry::PACKET_ACTION, packet_action::FORWARD))
            .attr(flag(neighbor_entry::NO_HOST_ROUTE, false))
            .attr(u32_with_default(neighbor_entry::META_DATA, 0))
            .attr(nullable_oid(neighbor_entry::COUNTER_ID, &[ObjectType::Counter]))
            .build(),
        ObjectSchema::builder(ObjectType::InsegEntry, inseg_entry::NAMES)
            .attr(AttrSpec::key(inseg_entry::LABEL, ValueKind::U32).with_validator(mpls_label))
            .attr(
                AttrSpec::create_and_set(inseg_entry::NUM_OF_POP, ValueKind::U8)
                    .with_default(AttrValue::U8(1)),
            )
            .attr(action(inseg_entry::PACKET_ACTION, packet_action::FORWARD))
            .attr(nullable_oid(inseg_entry::NEXT_HOP_ID, FORWARDING_TARGETS))
            .attr(
                AttrSpec::create_and_set(inseg_entry::TRAP_PRIORITY, ValueKind::U8)
                    .with_default(AttrValue::U8(0)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::MyMac, my_mac::NAMES)
            .attr(
                AttrSpec::create_only(my_mac::PORT_ID, ValueKind::Oid)
                    .nullable()
                    .with_objects(PORT_OR_LAG),
            )
            .attr(AttrSpec::create_only(my_mac::VLAN_ID, ValueKind::U16).with_default(AttrValue::U16(0)))
            .attr(AttrSpec::create_only(my_mac::MAC_ADDRESS, ValueKind::Mac).mandatory())
            .attr(
                AttrSpec::create_only(my_mac::MAC_ADDRESS_MASK, ValueKind::Mac)
                    .with_default(AttrValue::Mac(MacAddress::BROADCAST)),
            )
            .attr(AttrSpec::create_only(my_mac::PRIORITY, ValueKind::U32).with_default(AttrValue::U32(0)))
            .build(),
    ]
}
