//! Tunnels, tunnel maps and termination entries.

use super::enums::{tunnel_map_type, tunnel_term_table_entry_type, tunnel_type};
use super::{dscp, read_only_oid_list, vlan_id};
use crate::schema::{AttrSpec, ObjectSchema};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};

attr_ids!(tunnel, "SAI_TUNNEL_ATTR_" {
    TYPE = 0,
    UNDERLAY_INTERFACE = 1,
    OVERLAY_INTERFACE = 2,
    ENCAP_SRC_IP = 3,
    ENCAP_TTL_VAL = 4,
    ENCAP_MAPPERS = 5,
    DECAP_MAPPERS = 6,
    ENCAP_DSCP_VAL = 7,
});

attr_ids!(tunnel_map, "SAI_TUNNEL_MAP_ATTR_" {
    TYPE = 0,
    ENTRY_LIST = 1,
});

attr_ids!(tunnel_map_entry, "SAI_TUNNEL_MAP_ENTRY_ATTR_" {
    TUNNEL_MAP_TYPE = 0,
    TUNNEL_MAP = 1,
    VLAN_ID_KEY = 2,
    VLAN_ID_VALUE = 3,
    VNI_ID_KEY = 4,
    VNI_ID_VALUE = 5,
    OECN_KEY = 6,
    OECN_VALUE = 7,
    UECN_KEY = 8,
    UECN_VALUE = 9,
    VIRTUAL_ROUTER_ID_VALUE = 10,
    BRIDGE_ID_VALUE = 11,
});

attr_ids!(tunnel_term_table_entry, "SAI_TUNNEL_TERM_TABLE_ENTRY_ATTR_" {
    VR_ID = 0,
    TYPE = 1,
    DST_IP = 2,
    SRC_IP = 3,
    TUNNEL_TYPE = 4,
    ACTION_TUNNEL_ID = 5,
});

const IP_IN_IP: &[i32] = &[tunnel_type::IPINIP, tunnel_type::IPINIP_GRE];

pub(super) fn tunnel_schemas() -> Vec<ObjectSchema> {
    use super::enums::tunnel_map_type as map;

    vec![
        ObjectSchema::builder(ObjectType::Tunnel, tunnel::NAMES)
            .attr(
                AttrSpec::create_only(tunnel::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&tunnel_type::META),
            )
            .attr(
                AttrSpec::create_only(tunnel::UNDERLAY_INTERFACE, ValueKind::Oid)
                    .mandatory_when(tunnel::TYPE, IP_IN_IP)
                    .with_objects(&[ObjectType::RouterInterface]),
            )
            .attr(
                AttrSpec::create_only(tunnel::OVERLAY_INTERFACE, ValueKind::Oid)
                    .mandatory_when(tunnel::TYPE, IP_IN_IP)
                    .with_objects(&[ObjectType::RouterInterface]),
            )
            .attr(
                AttrSpec::create_only(tunnel::ENCAP_SRC_IP, ValueKind::IpAddress)
                    .with_default(AttrValue::default_for(ValueKind::IpAddress)),
            )
            .attr(
                AttrSpec::create_and_set(tunnel::ENCAP_TTL_VAL, ValueKind::U8)
                    .with_default(AttrValue::U8(255)),
            )
            .attr(
                AttrSpec::create_only(tunnel::ENCAP_MAPPERS, ValueKind::OidList)
                    .with_default(AttrValue::OidList(Vec::new()))
                    .with_objects(&[ObjectType::TunnelMap]),
            )
            .attr(
                AttrSpec::create_only(tunnel::DECAP_MAPPERS, ValueKind::OidList)
                    .with_default(AttrValue::OidList(Vec::new()))
                    .with_objects(&[ObjectType::TunnelMap]),
            )
            .attr(
                AttrSpec::create_and_set(tunnel::ENCAP_DSCP_VAL, ValueKind::U8)
                    .with_default(AttrValue::U8(0))
                    .with_validator(dscp),
            )
            .build(),
        ObjectSchema::builder(ObjectType::TunnelMap, tunnel_map::NAMES)
            .attr(
                AttrSpec::create_only(tunnel_map::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&tunnel_map_type::META),
            )
            .attr(read_only_oid_list(tunnel_map::ENTRY_LIST))
            .build(),
        ObjectSchema::builder(ObjectType::TunnelMapEntry, tunnel_map_entry::NAMES)
            .attr(
                AttrSpec::create_only(tunnel_map_entry::TUNNEL_MAP_TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&tunnel_map_type::META),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::TUNNEL_MAP, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::TunnelMap]),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::VLAN_ID_KEY, ValueKind::U16)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::VLAN_ID_TO_VNI])
                    .with_validator(vlan_id),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::VLAN_ID_VALUE, ValueKind::U16)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::VNI_TO_VLAN_ID])
                    .with_validator(vlan_id),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::VNI_ID_KEY, ValueKind::U32).mandatory_when(
                    tunnel_map_entry::TUNNEL_MAP_TYPE,
                    &[map::VNI_TO_VLAN_ID, map::VNI_TO_BRIDGE_IF, map::VNI_TO_VIRTUAL_ROUTER_ID],
                ),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::VNI_ID_VALUE, ValueKind::U32).mandatory_when(
                    tunnel_map_entry::TUNNEL_MAP_TYPE,
                    &[map::VLAN_ID_TO_VNI, map::BRIDGE_IF_TO_VNI, map::VIRTUAL_ROUTER_ID_TO_VNI],
                ),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::OECN_KEY, ValueKind::U8).mandatory_when(
                    tunnel_map_entry::TUNNEL_MAP_TYPE,
                    &[map::OECN_TO_UECN, map::UECN_OECN_TO_OECN],
                ),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::OECN_VALUE, ValueKind::U8)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::UECN_OECN_TO_OECN]),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::UECN_KEY, ValueKind::U8)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::UECN_OECN_TO_OECN]),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::UECN_VALUE, ValueKind::U8)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::OECN_TO_UECN]),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::VIRTUAL_ROUTER_ID_VALUE, ValueKind::Oid)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::VNI_TO_VIRTUAL_ROUTER_ID])
                    .with_objects(&[ObjectType::VirtualRouter]),
            )
            .attr(
                AttrSpec::create_only(tunnel_map_entry::BRIDGE_ID_VALUE, ValueKind::Oid)
                    .mandatory_when(tunnel_map_entry::TUNNEL_MAP_TYPE, &[map::VNI_TO_BRIDGE_IF])
                    .with_objects(&[ObjectType::Bridge]),
            )
            .build(),
        ObjectSchema::builder(ObjectType::TunnelTermTableEntry, tunnel_term_table_entry::NAMES)
            .attr(
                AttrSpec::create_only(tunnel_term_table_entry::VR_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::VirtualRouter]),
            )
            .attr(
                AttrSpec::create_only(tunnel_term_table_entry::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&tunnel_term_table_entry_type::META),
            )
            .attr(AttrSpec::create_only(tunnel_term_table_entry::DST_IP, ValueKind::IpAddress).mandatory())
            .attr(
                AttrSpec::create_only(tunnel_term_table_entry::SRC_IP, ValueKind::IpAddress)
                    .mandatory_when(tunnel_term_table_entry::TYPE, &[tunnel_term_table_entry_type::P2P]),
            )
            .attr(
                AttrSpec::create_only(tunnel_term_table_entry::TUNNEL_TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&tunnel_type::META),
            )
            .attr(
                AttrSpec::create_only(tunnel_term_table_entry::ACTION_TUNNEL_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Tunnel]),
            )
            .build(),
    ]
}
