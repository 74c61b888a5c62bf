//! Host interfaces and traps, mirroring, sampling, counters and BFD.

use super::enums::{
    bfd_session_state, bfd_session_type, counter_type, debug_counter_type, hostif_trap_type,
    hostif_type, in_drop_reason, mirror_session_type, packet_action, samplepacket_type,
};
use super::{flag, interface_name, nullable_oid, positive, traffic_class, vlan_id, PORT_OR_LAG};
use crate::schema::{AttrSpec, ObjectSchema};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};

attr_ids!(hostif, "SAI_HOSTIF_ATTR_" {
    TYPE = 0,
    OBJ_ID = 1,
    NAME = 2,
    OPER_STATUS = 3,
    QUEUE = 4,
});

attr_ids!(hostif_trap_group, "SAI_HOSTIF_TRAP_GROUP_ATTR_" {
    ADMIN_STATE = 0,
    QUEUE = 1,
    POLICER = 2,
});

attr_ids!(hostif_trap, "SAI_HOSTIF_TRAP_ATTR_" {
    PACKET_ACTION = 0,
    TRAP_PRIORITY = 1,
    TRAP_GROUP = 2,
    TRAP_TYPE = 0x1000_0000,
});

attr_ids!(mirror_session, "SAI_MIRROR_SESSION_ATTR_" {
    TYPE = 0,
    MONITOR_PORT = 1,
    TRUNCATE_SIZE = 2,
    SAMPLE_RATE = 3,
    TC = 4,
    VLAN_ID = 5,
    SRC_IP_ADDRESS = 6,
    DST_IP_ADDRESS = 7,
    SRC_MAC_ADDRESS = 8,
    DST_MAC_ADDRESS = 9,
    TTL = 10,
});

attr_ids!(samplepacket, "SAI_SAMPLEPACKET_ATTR_" {
    SAMPLE_RATE = 0,
    TYPE = 1,
});

attr_ids!(counter, "SAI_COUNTER_ATTR_" {
    TYPE = 0,
    PACKETS = 1,
    BYTES = 2,
});

attr_ids!(debug_counter, "SAI_DEBUG_COUNTER_ATTR_" {
    INDEX = 0,
    TYPE = 1,
    IN_DROP_REASON_LIST = 2,
    PACKETS = 3,
});

attr_ids!(bfd_session, "SAI_BFD_SESSION_ATTR_" {
    TYPE = 0,
    HW_LOOKUP_VALID = 1,
    VIRTUAL_ROUTER = 2,
    PORT = 3,
    LOCAL_DISCRIMINATOR = 4,
    REMOTE_DISCRIMINATOR = 5,
    UDP_SRC_PORT = 6,
    SRC_IP_ADDRESS = 7,
    DST_IP_ADDRESS = 8,
    MIN_TX = 9,
    MIN_RX = 10,
    MULTIPLIER = 11,
    STATE = 12,
});

pub(super) fn misc_schemas() -> Vec<ObjectSchema> {
    use super::enums::mirror_session_type as mirror;

    vec![
        ObjectSchema::builder(ObjectType::Hostif, hostif::NAMES)
            .attr(
                AttrSpec::create_only(hostif::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&hostif_type::META),
            )
            .attr(
                AttrSpec::create_only(hostif::OBJ_ID, ValueKind::Oid)
                    .mandatory_when(hostif::TYPE, &[hostif_type::NETDEV])
                    .with_objects(&[
                        ObjectType::Port,
                        ObjectType::Lag,
                        ObjectType::Vlan,
                        ObjectType::RouterInterface,
                    ]),
            )
            .attr(
                AttrSpec::create_only(hostif::NAME, ValueKind::Chardata)
                    .mandatory_when(hostif::TYPE, &[hostif_type::NETDEV])
                    .with_validator(interface_name),
            )
            .attr(flag(hostif::OPER_STATUS, false))
            .attr(AttrSpec::create_and_set(hostif::QUEUE, ValueKind::U32).with_default(AttrValue::U32(0)))
            .build(),
        ObjectSchema::builder(ObjectType::HostifTrapGroup, hostif_trap_group::NAMES)
            .attr(flag(hostif_trap_group::ADMIN_STATE, true))
            .attr(
                AttrSpec::create_and_set(hostif_trap_group::QUEUE, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(nullable_oid(hostif_trap_group::POLICER, &[ObjectType::Policer]))
            .build(),
        ObjectSchema::builder(ObjectType::HostifTrap, hostif_trap::NAMES)
            .attr(AttrSpec::key(hostif_trap::TRAP_TYPE, ValueKind::Enum).with_enum(&hostif_trap_type::META))
            .attr(
                AttrSpec::create_and_set(hostif_trap::PACKET_ACTION, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&packet_action::META),
            )
            .attr(
                AttrSpec::create_and_set(hostif_trap::TRAP_PRIORITY, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(nullable_oid(hostif_trap::TRAP_GROUP, &[ObjectType::HostifTrapGroup]))
            .build(),
        ObjectSchema::builder(ObjectType::MirrorSession, mirror_session::NAMES)
            .attr(
                AttrSpec::create_and_set(mirror_session::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&mirror_session_type::META),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::MONITOR_PORT, ValueKind::Oid)
                    .mandatory_when(
                        mirror_session::TYPE,
                        &[mirror::LOCAL, mirror::REMOTE, mirror::ENHANCED_REMOTE],
                    )
                    .with_objects(PORT_OR_LAG),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::TRUNCATE_SIZE, ValueKind::U16)
                    .with_default(AttrValue::U16(0)),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::SAMPLE_RATE, ValueKind::U32)
                    .with_default(AttrValue::U32(1)),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::TC, ValueKind::U8)
                    .with_default(AttrValue::U8(0))
                    .with_validator(traffic_class),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::VLAN_ID, ValueKind::U16)
                    .mandatory_when(mirror_session::TYPE, &[mirror::REMOTE])
                    .with_validator(vlan_id),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::SRC_IP_ADDRESS, ValueKind::IpAddress)
                    .mandatory_when(mirror_session::TYPE, &[mirror::ENHANCED_REMOTE]),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::DST_IP_ADDRESS, ValueKind::IpAddress)
                    .mandatory_when(mirror_session::TYPE, &[mirror::ENHANCED_REMOTE]),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::SRC_MAC_ADDRESS, ValueKind::Mac)
                    .mandatory_when(mirror_session::TYPE, &[mirror::ENHANCED_REMOTE]),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::DST_MAC_ADDRESS, ValueKind::Mac)
                    .mandatory_when(mirror_session::TYPE, &[mirror::ENHANCED_REMOTE]),
            )
            .attr(
                AttrSpec::create_and_set(mirror_session::TTL, ValueKind::U8)
                    .with_default(AttrValue::U8(255)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::Samplepacket, samplepacket::NAMES)
            .attr(
                AttrSpec::create_and_set(samplepacket::SAMPLE_RATE, ValueKind::U32)
                    .mandatory()
                    .with_validator(positive),
            )
            .attr(
                AttrSpec::create_only(samplepacket::TYPE, ValueKind::Enum)
                    .with_enum(&samplepacket_type::META)
                    .with_default(AttrValue::Enum(samplepacket_type::SLOW_PATH)),
            )
            .build(),
        ObjectSchema::builder(ObjectType::Counter, counter::NAMES)
            .attr(
                AttrSpec::create_only(counter::TYPE, ValueKind::Enum)
                    .with_enum(&counter_type::META)
                    .with_default(AttrValue::Enum(counter_type::REGULAR)),
            )
            .attr(AttrSpec::statistic(counter::PACKETS))
            .attr(AttrSpec::statistic(counter::BYTES))
            .build(),
        ObjectSchema::builder(ObjectType::DebugCounter, debug_counter::NAMES)
            .attr(AttrSpec::read_only(debug_counter::INDEX, ValueKind::U32).with_default(AttrValue::U32(0)))
            .attr(
                AttrSpec::create_only(debug_counter::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&debug_counter_type::META),
            )
            .attr(
                AttrSpec::create_and_set(debug_counter::IN_DROP_REASON_LIST, ValueKind::EnumList)
                    .with_enum(&in_drop_reason::META)
                    .with_default(AttrValue::EnumList(Vec::new())),
            )
            .attr(AttrSpec::statistic(debug_counter::PACKETS))
            .build(),
        ObjectSchema::builder(ObjectType::BfdSession, bfd_session::NAMES)
            .attr(
                AttrSpec::create_only(bfd_session::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&bfd_session_type::META),
            )
            .attr(
                AttrSpec::create_only(bfd_session::HW_LOOKUP_VALID, ValueKind::Bool)
                    .with_default(AttrValue::Bool(true)),
            )
            .attr(
                AttrSpec::create_only(bfd_session::VIRTUAL_ROUTER, ValueKind::Oid)
                    .nullable()
                    .with_objects(&[ObjectType::VirtualRouter]),
            )
            .attr(
                AttrSpec::create_only(bfd_session::PORT, ValueKind::Oid)
                    .nullable()
                    .with_objects(&[ObjectType::Port]),
            )
            .attr(
                AttrSpec::create_only(bfd_session::LOCAL_DISCRIMINATOR, ValueKind::U32)
                    .mandatory()
                    .with_validator(positive),
            )
            .attr(
                AttrSpec::create_and_set(bfd_session::REMOTE_DISCRIMINATOR, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(AttrSpec::create_only(bfd_session::UDP_SRC_PORT, ValueKind::U32).mandatory())
            .attr(AttrSpec::create_only(bfd_session::SRC_IP_ADDRESS, ValueKind::IpAddress).mandatory())
            .attr(AttrSpec::create_only(bfd_session::DST_IP_ADDRESS, ValueKind::IpAddress).mandatory())
            .attr(AttrSpec::create_and_set(bfd_session::MIN_TX, ValueKind::U32).mandatory())
            .attr(AttrSpec::create_and_set(bfd_session::MIN_RX, ValueKind::U32).mandatory())
            .attr(
                AttrSpec::create_and_set(bfd_session::MULTIPLIER, ValueKind::U8)
                    .mandatory()
                    .with_validator(positive),
            )
            .attr(
                AttrSpec::read_only(bfd_session::STATE, ValueKind::Enum)
                    .with_enum(&bfd_session_state::META)
                    .with_default(AttrValue::Enum(bfd_session_state::DOWN)),
            )
            .build(),
    ]
}
