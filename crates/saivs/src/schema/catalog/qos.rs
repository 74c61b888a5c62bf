//! Policers, queues, schedulers, buffers, WRED profiles and QoS maps.

use super::enums::{
    buffer_pool_threshold_mode, buffer_pool_type, meter_type, packet_action, policer_mode,
    qos_map_type, queue_type, scheduling_type,
};
use super::{flag, nullable_oid, positive, read_only_oid_list};
use crate::schema::{AttrId, AttrSpec, ObjectSchema, ObjectSchemaBuilder};
use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};

attr_ids!(policer, "SAI_POLICER_ATTR_" {
    METER_TYPE = 0,
    MODE = 1,
    CBS = 2,
    CIR = 3,
    PBS = 4,
    PIR = 5,
    GREEN_PACKET_ACTION = 6,
    YELLOW_PACKET_ACTION = 7,
    RED_PACKET_ACTION = 8,
});

attr_ids!(queue, "SAI_QUEUE_ATTR_" {
    TYPE = 0,
    PORT = 1,
    INDEX = 2,
    PARENT_SCHEDULER_NODE = 3,
    WRED_PROFILE_ID = 4,
    BUFFER_PROFILE_ID = 5,
    SCHEDULER_PROFILE_ID = 6,
});

attr_ids!(scheduler, "SAI_SCHEDULER_ATTR_" {
    SCHEDULING_TYPE = 0,
    SCHEDULING_WEIGHT = 1,
    METER_TYPE = 2,
    MIN_BANDWIDTH_RATE = 3,
    MIN_BANDWIDTH_BURST_RATE = 4,
    MAX_BANDWIDTH_RATE = 5,
    MAX_BANDWIDTH_BURST_RATE = 6,
});

attr_ids!(scheduler_group, "SAI_SCHEDULER_GROUP_ATTR_" {
    CHILD_COUNT = 0,
    CHILD_LIST = 1,
    PORT_ID = 2,
    LEVEL = 3,
    MAX_CHILDS = 4,
    SCHEDULER_PROFILE_ID = 5,
    PARENT_NODE = 6,
});

attr_ids!(buffer_pool, "SAI_BUFFER_POOL_ATTR_" {
    SHARED_SIZE = 0,
    TYPE = 1,
    SIZE = 2,
    THRESHOLD_MODE = 3,
    XOFF_SIZE = 4,
});

attr_ids!(buffer_profile, "SAI_BUFFER_PROFILE_ATTR_" {
    POOL_ID = 0,
    RESERVED_BUFFER_SIZE = 1,
    THRESHOLD_MODE = 2,
    SHARED_DYNAMIC_TH = 3,
    SHARED_STATIC_TH = 4,
    XOFF_TH = 5,
    XON_TH = 6,
});

attr_ids!(ingress_priority_group, "SAI_INGRESS_PRIORITY_GROUP_ATTR_" {
    BUFFER_PROFILE = 0,
    PORT = 1,
    INDEX = 2,
});

attr_ids!(wred, "SAI_WRED_ATTR_" {
    GREEN_ENABLE = 0,
    GREEN_MIN_THRESHOLD = 1,
    GREEN_MAX_THRESHOLD = 2,
    GREEN_DROP_PROBABILITY = 3,
    YELLOW_ENABLE = 4,
    YELLOW_MIN_THRESHOLD = 5,
    YELLOW_MAX_THRESHOLD = 6,
    YELLOW_DROP_PROBABILITY = 7,
    RED_ENABLE = 8,
    RED_MIN_THRESHOLD = 9,
    RED_MAX_THRESHOLD = 10,
    RED_DROP_PROBABILITY = 11,
    WEIGHT = 12,
});

attr_ids!(qos_map, "SAI_QOS_MAP_ATTR_" {
    TYPE = 0,
    MAP_TO_VALUE_LIST = 1,
});

fn u64_with_default(id: AttrId, default: u64) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::U64).with_default(AttrValue::U64(default))
}

fn u32_with_default(id: AttrId, default: u32) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::U32).with_default(AttrValue::U32(default))
}

fn color_action(id: AttrId) -> AttrSpec {
    AttrSpec::create_and_set(id, ValueKind::Enum)
        .with_enum(&packet_action::META)
        .with_default(AttrValue::Enum(packet_action::FORWARD))
}

fn drop_probability(value: &AttrValue) -> bool {
    matches!(value, AttrValue::U32(v) if *v <= 100)
}

/// Enable flag, thresholds and drop probability of one WRED color.
fn wred_color(builder: ObjectSchemaBuilder, base: AttrId) -> ObjectSchemaBuilder {
    builder
        .attr(flag(base, false))
        .attr(u32_with_default(base + 1, 0))
        .attr(u32_with_default(base + 2, 0))
        .attr(u32_with_default(base + 3, 100).with_validator(drop_probability))
}

pub(super) fn qos_schemas() -> Vec<ObjectSchema> {
    let mut wred_builder = ObjectSchema::builder(ObjectType::Wred, wred::NAMES);
    for base in [wred::GREEN_ENABLE, wred::YELLOW_ENABLE, wred::RED_ENABLE] {
        wred_builder = wred_color(wred_builder, base);
    }
    let wred_schema = wred_builder
        .attr(
            AttrSpec::create_and_set(wred::WEIGHT, ValueKind::U8)
                .with_default(AttrValue::U8(0)),
        )
        .build();

    vec![
        ObjectSchema::builder(ObjectType::Policer, policer::NAMES)
            .attr(
                AttrSpec::create_only(policer::METER_TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&meter_type::META),
            )
            .attr(
                AttrSpec::create_only(policer::MODE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&policer_mode::META),
            )
            .attr(u64_with_default(policer::CBS, 0))
            .attr(u64_with_default(policer::CIR, 0))
            .attr(u64_with_default(policer::PBS, 0))
            .attr(u64_with_default(policer::PIR, 0))
            .attr(color_action(policer::GREEN_PACKET_ACTION))
            .attr(color_action(policer::YELLOW_PACKET_ACTION))
            .attr(color_action(policer::RED_PACKET_ACTION))
            .build(),
        ObjectSchema::builder(ObjectType::Queue, queue::NAMES)
            .attr(
                AttrSpec::create_only(queue::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&queue_type::META),
            )
            .attr(
                AttrSpec::create_only(queue::PORT, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Port]),
            )
            .attr(AttrSpec::create_only(queue::INDEX, ValueKind::U8).mandatory())
            .attr(nullable_oid(
                queue::PARENT_SCHEDULER_NODE,
                &[ObjectType::Port, ObjectType::SchedulerGroup],
            ))
            .attr(nullable_oid(queue::WRED_PROFILE_ID, &[ObjectType::Wred]))
            .attr(nullable_oid(queue::BUFFER_PROFILE_ID, &[ObjectType::BufferProfile]))
            .attr(nullable_oid(queue::SCHEDULER_PROFILE_ID, &[ObjectType::Scheduler]))
            .build(),
        ObjectSchema::builder(ObjectType::Scheduler, scheduler::NAMES)
            .attr(
                AttrSpec::create_and_set(scheduler::SCHEDULING_TYPE, ValueKind::Enum)
                    .with_enum(&scheduling_type::META)
                    .with_default(AttrValue::Enum(scheduling_type::WRR)),
            )
            .attr(
                AttrSpec::create_and_set(scheduler::SCHEDULING_WEIGHT, ValueKind::U8)
                    .with_default(AttrValue::U8(1))
                    .with_validator(positive),
            )
            .attr(
                AttrSpec::create_and_set(scheduler::METER_TYPE, ValueKind::Enum)
                    .with_enum(&meter_type::META)
                    .with_default(AttrValue::Enum(meter_type::BYTES)),
            )
            .attr(u64_with_default(scheduler::MIN_BANDWIDTH_RATE, 0))
            .attr(u64_with_default(scheduler::MIN_BANDWIDTH_BURST_RATE, 0))
            .attr(u64_with_default(scheduler::MAX_BANDWIDTH_RATE, 0))
            .attr(u64_with_default(scheduler::MAX_BANDWIDTH_BURST_RATE, 0))
            .build(),
        ObjectSchema::builder(ObjectType::SchedulerGroup, scheduler_group::NAMES)
            .attr(
                AttrSpec::read_only(scheduler_group::CHILD_COUNT, ValueKind::U32)
                    .with_default(AttrValue::U32(0)),
            )
            .attr(read_only_oid_list(scheduler_group::CHILD_LIST))
            .attr(
                AttrSpec::create_only(scheduler_group::PORT_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Port]),
            )
            .attr(AttrSpec::create_only(scheduler_group::LEVEL, ValueKind::U8).mandatory())
            .attr(AttrSpec::create_only(scheduler_group::MAX_CHILDS, ValueKind::U8).mandatory())
            .attr(nullable_oid(scheduler_group::SCHEDULER_PROFILE_ID, &[ObjectType::Scheduler]))
            .attr(
                AttrSpec::create_and_set(scheduler_group::PARENT_NODE, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Port, ObjectType::SchedulerGroup]),
            )
            .build(),
        ObjectSchema::builder(ObjectType::BufferPool, buffer_pool::NAMES)
            .attr(
                AttrSpec::read_only(buffer_pool::SHARED_SIZE, ValueKind::U64)
                    .with_default(AttrValue::U64(0)),
            )
            .attr(
                AttrSpec::create_only(buffer_pool::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&buffer_pool_type::META),
            )
            .attr(AttrSpec::create_and_set(buffer_pool::SIZE, ValueKind::U64).mandatory())
            .attr(
                AttrSpec::create_only(buffer_pool::THRESHOLD_MODE, ValueKind::Enum)
                    .with_enum(&buffer_pool_threshold_mode::META)
                    .with_default(AttrValue::Enum(buffer_pool_threshold_mode::DYNAMIC)),
            )
            .attr(u64_with_default(buffer_pool::XOFF_SIZE, 0))
            .build(),
        ObjectSchema::builder(ObjectType::BufferProfile, buffer_profile::NAMES)
            .attr(
                AttrSpec::create_and_set(buffer_profile::POOL_ID, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::BufferPool]),
            )
            .attr(AttrSpec::create_and_set(buffer_profile::RESERVED_BUFFER_SIZE, ValueKind::U64).mandatory())
            .attr(
                AttrSpec::create_only(buffer_profile::THRESHOLD_MODE, ValueKind::Enum)
                    .with_enum(&buffer_pool_threshold_mode::META)
                    .with_default(AttrValue::Enum(buffer_pool_threshold_mode::DYNAMIC)),
            )
            .attr(
                AttrSpec::create_and_set(buffer_profile::SHARED_DYNAMIC_TH, ValueKind::I8)
                    .with_default(AttrValue::I8(0)),
            )
            .attr(u64_with_default(buffer_profile::SHARED_STATIC_TH, 0))
            .attr(u64_with_default(buffer_profile::XOFF_TH, 0))
            .attr(u64_with_default(buffer_profile::XON_TH, 0))
            .build(),
        ObjectSchema::builder(ObjectType::IngressPriorityGroup, ingress_priority_group::NAMES)
            .attr(nullable_oid(ingress_priority_group::BUFFER_PROFILE, &[ObjectType::BufferProfile]))
            .attr(
                AttrSpec::create_only(ingress_priority_group::PORT, ValueKind::Oid)
                    .mandatory()
                    .with_objects(&[ObjectType::Port]),
            )
            .attr(AttrSpec::create_only(ingress_priority_group::INDEX, ValueKind::U8).mandatory())
            .build(),
        wred_schema,
        ObjectSchema::builder(ObjectType::QosMap, qos_map::NAMES)
            .attr(
                AttrSpec::create_only(qos_map::TYPE, ValueKind::Enum)
                    .mandatory()
                    .with_enum(&qos_map_type::META),
            )
            .attr(AttrSpec::create_and_set(qos_map::MAP_TO_VALUE_LIST, ValueKind::MapList).mandatory())
            .build(),
    ]
}
