//! L2/IP multicast groups, RPF groups and multicast entries.

use super::enums::{multicast_entry_type, packet_action};
use super::{nullable_oid, read_only_oid_list};
use crate::schema::{AttrId, AttrSpec, ObjectSchema};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};

attr_ids!(l2mc_group, "SAI_L2MC_GROUP_ATTR_" {
    L2MC_OUTPUT_COUNT = 0,
    L2MC_MEMBER_LIST = 1,
});

attr_ids!(l2mc_group_member, "SAI_L2MC_GROUP_MEMBER_ATTR_" {
    L2MC_GROUP_ID = 0,
    L2MC_OUTPUT_ID = 1,
    L2MC_ENDPOINT_IP = 2,
});

attr_ids!(ipmc_group, "SAI_IPMC_GROUP_ATTR_" {
    IPMC_OUTPUT_COUNT = 0,
    IPMC_MEMBER_LIST = 1,
});

attr_ids!(ipmc_group_member, "SAI_IPMC_GROUP_MEMBER_ATTR_" {
    IPMC_GROUP_ID = 0,
    IPMC_OUTPUT_ID = 1,
});

attr_ids!(rpf_group, "SAI_RPF_GROUP_ATTR_" {
    RPF_INTERFACE_COUNT = 0,
    RPF_MEMBER_LIST = 1,
});

attr_ids!(rpf_group_member, "SAI_RPF_GROUP_MEMBER_ATTR_" {
    RPF_GROUP_ID = 0,
    RPF_INTERFACE_ID = 1,
});

attr_ids!(l2mc_entry, "SAI_L2MC_ENTRY_ATTR_" {
    PACKET_ACTION = 0,
    OUTPUT_GROUP_ID = 1,
    BV_ID = 0x1000_0000,
    TYPE = 0x1000_0001,
    DESTINATION = 0x1000_0002,
    SOURCE = 0x1000_0003,
});

attr_ids!(ipmc_entry, "SAI_IPMC_ENTRY_ATTR_" {
    PACKET_ACTION = 0,
    OUTPUT_GROUP_ID = 1,
    RPF_GROUP_ID = 2,
    VR_ID = 0x1000_0000,
    TYPE = 0x1000_0001,
    DESTINATION = 0x1000_0002,
    SOURCE = 0x1000_0003,
});

attr_ids!(mcast_fdb_entry, "SAI_MCAST_FDB_ENTRY_ATTR_" {
    GROUP_ID = 0,
    PACKET_ACTION = 1,
    META_DATA = 2,
    BV_ID = 0x1000_0000,
    MAC_ADDRESS = 0x1000_0001,
});

fn output_count(id: AttrId) -> AttrSpec {
    AttrSpec::read_only(id, ValueKind::U32).with_default(AttrValue::U32(0))
}

fn member_of(id: AttrId, object_types: &'static [ObjectType]) -> AttrSpec {
    AttrSpec::create_only(id, ValueKind::Oid)
        .mandatory()
        .with_objects(object_types)
}

fn mandatory_action(id: AttrId) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::Enum)
        .mandatory()
        .with_enum(&packet_action::META)
}

fn entry_type(id: AttrId) -> AttrSpec {
    AttrSpec::key(id, ValueKind::Enum).with_enum(&multicast_entry_type::META)
}

pub(super) fn multicast_schemas() -> Vec<ObjectSchema> {
    vec![
        ObjectSchema::builder(ObjectType::L2mcGroup, l2mc_group::NAMES)
            .attr(output_count(l2mc_group::L2MC_OUTPUT_COUNT))
            .attr(read_only_oid_list(l2mc_group::L2MC_MEMBER_LIST))
            .build(),
        ObjectSchema::builder(ObjectType::L2mcGroupMember, l2mc_group_member::NAMES)
            .attr(member_of(l2mc_group_member::L2MC_GROUP_ID, &[ObjectType::L2mcGroup]))
            .attr(member_of(l2mc_group_member::L2MC_OUTPUT_ID, &[ObjectType::BridgePort]))
            .attr(
                AttrSpec::create_only(l2mc_group_member::L2MC_ENDPOINT_IP, ValueKind::IpAddress)
                    .with_default(AttrValue::default_for(ValueKind::IpAddress)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::IpmcGroup, ipmc_group::NAMES)
            .attr(output_count(ipmc_group::IPMC_OUTPUT_COUNT))
            .attr(read_only_oid_list(ipmc_group::IPMC_MEMBER_LIST))
            .build(),
        ObjectSchema::builder(ObjectType::IpmcGroupMember, ipmc_group_member::NAMES)
            .attr(member_of(ipmc_group_member::IPMC_GROUP_ID, &[ObjectType::IpmcGroup]))
            .attr(member_of(ipmc_group_member::IPMC_OUTPUT_ID, &[ObjectType::RouterInterface]))
            .build(),
        ObjectSchema::builder(ObjectType::RpfGroup, rpf_group::NAMES)
            .attr(output_count(rpf_group::RPF_INTERFACE_COUNT))
            .attr(read_only_oid_list(rpf_group::RPF_MEMBER_LIST))
            .build(),
        ObjectSchema::builder(ObjectType::RpfGroupMember, rpf_group_member::NAMES)
            .attr(member_of(rpf_group_member::RPF_GROUP_ID, &[ObjectType::RpfGroup]))
            .attr(member_of(rpf_group_member::RPF_INTERFACE_ID, &[ObjectType::RouterInterface]))
            .build(),
        ObjectSchema::builder(ObjectType::L2mcEntry, l2mc_entry::NAMES)
            .attr(
                AttrSpec::key(l2mc_entry::BV_ID, ValueKind::Oid)
                    .with_objects(&[ObjectType::Vlan, ObjectType::Bridge]),
            )
            .attr(entry_type(l2mc_entry::TYPE))
            .attr(AttrSpec::key(l2mc_entry::DESTINATION, ValueKind::IpAddress))
            .attr(AttrSpec::key(l2mc_entry::SOURCE, ValueKind::IpAddress))
            .attr(mandatory_action(l2mc_entry::PACKET_ACTION))
            .attr(nullable_oid(l2mc_entry::OUTPUT_GROUP_ID, &[ObjectType::L2mcGroup]))
            .build(),
        ObjectSchema::builder(ObjectType::IpmcEntry, ipmc_entry::NAMES)
            .attr(
                AttrSpec::key(ipmc_entry::VR_ID, ValueKind::Oid)
                    .with_objects(&[ObjectType::VirtualRouter]),
            )
            .attr(entry_type(ipmc_entry::TYPE))
            .attr(AttrSpec::key(ipmc_entry::DESTINATION, ValueKind::IpAddress))
            .attr(AttrSpec::key(ipmc_entry::SOURCE, ValueKind::IpAddress))
            .attr(mandatory_action(ipmc_entry::PACKET_ACTION))
            .attr(nullable_oid(ipmc_entry::OUTPUT_GROUP_ID, &[ObjectType::IpmcGroup]))
            .attr(
                AttrSpec::create_and_set(ipmc_entry::RPF_GROUP_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::RpfGroup]),
            )
            .build(),
        ObjectSchema::builder(ObjectType::McastFdbEntry, mcast_fdb_entry::NAMES)
            .attr(
                AttrSpec::key(mcast_fdb_entry::BV_ID, ValueKind::Oid)
                    .with_objects(&[ObjectType::Vlan, ObjectType::Bridge]),
            )
            .attr(AttrSpec::key(mcast_fdb_entry::MAC_ADDRESS, ValueKind::Mac))
            .attr(
                AttrSpec::create_and_set(mcast_fdb_entry::GROUP_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::L2mcGroup]),
            )
            .attr(
                AttrSpec::create_and_set(mcast_fdb_entry::PACKET_ACTION, ValueKind::Enum)
                    .with_enum(&packet_action::META)
                    .with_default(AttrValue::Enum(packet_action::FORWARD)),
            )
            .attr(
                AttrSpec::create_and_set(mcast_fdb_entry::META_DATA, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .build(),
    ]
}
