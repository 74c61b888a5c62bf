//! ACL matching engine.
//!
//! Evaluates a packet key against the ACL objects in the store. For one
//! stage, every table group bound to that stage runs in ascending object id
//! order:
//!
//! - **Sequential** groups walk their tables in listed order (member
//!   priority, then member id). Each table selects its first matching
//!   enabled entry, highest priority first; a terminating action ends the
//!   stage, anything else accumulates into the verdict.
//! - **Parallel** groups evaluate every table against the same key. The
//!   lowest table id wins terminating and rewrite conflicts; mirror
//!   sessions and counters are unioned.
//!
//! Tables that belong to no group are not evaluated. Counters attached to a
//! selected entry count packets, and bytes when byte counting is enabled.

mod evaluator;
mod key;
mod matcher;
mod verdict;

pub use key::{AclKey, AclStage};
pub use matcher::{entry_actions, entry_matches, is_default_entry};
pub use verdict::{AclAction, AclVerdict, Disposition, Rewrites};

pub(crate) use evaluator::evaluate_stage;

use crate::error::SaiStatus;
use crate::store::ObjectStore;
use crate::types::RawSaiObjectId;
use log::debug;
use thiserror::Error;

/// Structural errors found while evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    #[error(
        "ACL table group oid:0x{group:x} ({group_stage}) contains table oid:0x{table:x} of stage {table_stage}"
    )]
    StageMismatch {
        group: RawSaiObjectId,
        table: RawSaiObjectId,
        group_stage: AclStage,
        table_stage: &'static str,
    },

    #[error("ACL table group member oid:0x{member:x} has no table")]
    MissingTable { member: RawSaiObjectId },
}

impl AclError {
    pub fn status(&self) -> SaiStatus {
        match self {
            AclError::StageMismatch { .. } => SaiStatus::InvalidAttribute,
            AclError::MissingTable { .. } => SaiStatus::Failure,
        }
    }
}

/// Evaluates keys against the ACL objects of one store.
pub struct AclEngine<'a> {
    store: &'a ObjectStore,
}

impl<'a> AclEngine<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        AclEngine { store }
    }

    /// Evaluates one stage.
    pub fn evaluate(&self, stage: AclStage, key: &AclKey) -> Result<AclVerdict, AclError> {
        self.evaluate_stages(&[stage], key)
    }

    /// Evaluates `stages` in order under one snapshot, stopping after the
    /// first stage that ends with a terminating action.
    pub fn evaluate_stages(
        &self,
        stages: &[AclStage],
        key: &AclKey,
    ) -> Result<AclVerdict, AclError> {
        let view = self.store.view();
        let mut key = key.clone();
        let mut verdict = AclVerdict::default();
        for stage in stages {
            evaluate_stage(&view, *stage, &mut key, &mut verdict)?;
            if verdict.is_terminal() {
                break;
            }
        }
        debug!(
            "ACL verdict {} after {} matched entries",
            verdict.disposition,
            verdict.matched_entries.len()
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog::{
        acl_counter, acl_entry, acl_range, acl_range_type, acl_stage, acl_table, acl_table_group,
        acl_table_group_member, acl_table_group_type, packet_action, port,
    };
    use crate::schema::Attribute;
    use crate::types::ObjectType;
    use crate::value::{AttrValue, U32Range};
    use pretty_assertions::assert_eq;

    fn table(store: &ObjectStore, stage: i32) -> RawSaiObjectId {
        store
            .create(
                ObjectType::AclTable,
                &[Attribute::new(acl_table::ACL_STAGE, AttrValue::Enum(stage))],
            )
            .unwrap()
    }

    fn group(store: &ObjectStore, stage: i32, kind: i32) -> RawSaiObjectId {
        store
            .create(
                ObjectType::AclTableGroup,
                &[
                    Attribute::new(acl_table_group::ACL_STAGE, AttrValue::Enum(stage)),
                    Attribute::new(acl_table_group::TYPE, AttrValue::Enum(kind)),
                ],
            )
            .unwrap()
    }

    fn member(store: &ObjectStore, group: RawSaiObjectId, table: RawSaiObjectId, priority: u32) {
        store
            .create(
                ObjectType::AclTableGroupMember,
                &[
                    Attribute::new(acl_table_group_member::ACL_TABLE_GROUP_ID, AttrValue::Oid(group)),
                    Attribute::new(acl_table_group_member::ACL_TABLE_ID, AttrValue::Oid(table)),
                    Attribute::new(acl_table_group_member::PRIORITY, AttrValue::U32(priority)),
                ],
            )
            .unwrap();
    }

    fn counter(store: &ObjectStore, table: RawSaiObjectId, bytes: bool) -> RawSaiObjectId {
        store
            .create(
                ObjectType::AclCounter,
                &[
                    Attribute::new(acl_counter::TABLE_ID, AttrValue::Oid(table)),
                    Attribute::new(acl_counter::ENABLE_BYTE_COUNT, AttrValue::Bool(bytes)),
                ],
            )
            .unwrap()
    }

    fn entry(
        store: &ObjectStore,
        table: RawSaiObjectId,
        priority: u32,
        attrs: Vec<Attribute>,
    ) -> RawSaiObjectId {
        let mut all = vec![
            Attribute::new(acl_entry::TABLE_ID, AttrValue::Oid(table)),
            Attribute::new(acl_entry::PRIORITY, AttrValue::U32(priority)),
        ];
        all.extend(attrs);
        store.create(ObjectType::AclEntry, &all).unwrap()
    }

    fn action(value: i32) -> Attribute {
        Attribute::new(acl_entry::ACTION_PACKET_ACTION, AttrValue::Enum(value))
    }

    fn dst_ip(prefix: &str) -> Attribute {
        Attribute::new(acl_entry::FIELD_DST_IP, AttrValue::IpPrefix(prefix.parse().unwrap()))
    }

    fn key_to(dst: &str) -> AclKey {
        AclKey {
            dst_ip: Some(dst.parse().unwrap()),
            packet_length: 100,
            ..AclKey::default()
        }
    }

    fn stat(store: &ObjectStore, counter: RawSaiObjectId, id: u32) -> AttrValue {
        store.get_attribute(counter, id).unwrap()
    }

    #[test]
    fn test_no_groups_continue() {
        let store = ObjectStore::default();
        let t = table(&store, acl_stage::INGRESS);
        entry(&store, t, 10, vec![action(packet_action::DROP)]);
        // the table is not in any group
        let verdict = AclEngine::new(&store)
            .evaluate(AclStage::Ingress, &key_to("10.0.0.1"))
            .unwrap();
        assert_eq!(verdict, AclVerdict::default());
    }

    #[test]
    fn test_sequential_short_circuit_leaves_later_counter() {
        let store = ObjectStore::default();
        let g = group(&store, acl_stage::INGRESS, acl_table_group_type::SEQUENTIAL);
        let t1 = table(&store, acl_stage::INGRESS);
        let t2 = table(&store, acl_stage::INGRESS);
        member(&store, g, t1, 1);
        member(&store, g, t2, 2);
        let c1 = counter(&store, t1, true);
        let c2 = counter(&store, t2, false);
        let e1 = entry(
            &store,
            t1,
            10,
            vec![
                dst_ip("10.0.0.0/8"),
                action(packet_action::DROP),
                Attribute::new(acl_entry::ACTION_COUNTER, AttrValue::Oid(c1)),
            ],
        );
        entry(
            &store,
            t2,
            10,
            vec![
                dst_ip("10.0.0.0/8"),
                action(packet_action::FORWARD),
                Attribute::new(acl_entry::ACTION_COUNTER, AttrValue::Oid(c2)),
            ],
        );

        let verdict = AclEngine::new(&store)
            .evaluate(AclStage::Ingress, &key_to("10.1.1.1"))
            .unwrap();
        assert_eq!(verdict.disposition, Disposition::Drop);
        assert_eq!(verdict.matched_entries, vec![e1]);
        assert_eq!(stat(&store, c1, acl_counter::PACKETS), AttrValue::U64(1));
        assert_eq!(stat(&store, c1, acl_counter::BYTES), AttrValue::U64(100));
        assert_eq!(stat(&store, c2, acl_counter::PACKETS), AttrValue::U64(0));
    }

    #[test]
    fn test_priority_order_and_default_entry_last() {
        let store = ObjectStore::default();
        let g = group(&store, acl_stage::INGRESS, acl_table_group_type::SEQUENTIAL);
        let t = table(&store, acl_stage::INGRESS);
        member(&store, g, t, 1);
        // the default entry has the highest priority but still goes last
        entry(&store, t, 1000, vec![action(packet_action::DROP)]);
        let low = entry(&store, t, 5, vec![dst_ip("10.0.0.0/8"), action(packet_action::TRAP)]);
        let high = entry(&store, t, 50, vec![dst_ip("10.1.0.0/16"), action(packet_action::DENY)]);
        let tie = entry(&store, t, 50, vec![dst_ip("10.1.0.0/16"), action(packet_action::DROP)]);

        let engine = AclEngine::new(&store);
        let verdict = engine.evaluate(AclStage::Ingress, &key_to("10.1.2.3")).unwrap();
        assert_eq!(verdict.disposition, Disposition::Deny);
        assert_eq!(verdict.matched_entries, vec![high]);
        assert!(tie > high);

        let verdict = engine.evaluate(AclStage::Ingress, &key_to("10.2.0.1")).unwrap();
        assert_eq!(verdict.matched_entries, vec![low]);
        assert_eq!(verdict.disposition, Disposition::Trap);

        let verdict = engine.evaluate(AclStage::Ingress, &key_to("192.0.2.1")).unwrap();
        assert_eq!(verdict.disposition, Disposition::Drop);

        store
            .set_attribute(high, &Attribute::new(acl_entry::ADMIN_STATE, AttrValue::Bool(false)))
            .unwrap();
        let verdict = engine.evaluate(AclStage::Ingress, &key_to("10.1.2.3")).unwrap();
        assert_eq!(verdict.matched_entries, vec![tie]);
    }

    #[test]
    fn test_masked_fields() {
        let store = ObjectStore::default();
        let g = group(&store, acl_stage::INGRESS, acl_table_group_type::SEQUENTIAL);
        let t = table(&store, acl_stage::INGRESS);
        member(&store, g, t, 1);
        let syn = entry(
            &store,
            t,
            30,
            vec![
                Attribute::new(acl_entry::FIELD_TCP_FLAGS, AttrValue::U8(0x02)),
                Attribute::new(acl_entry::FIELD_TCP_FLAGS_MASK, AttrValue::U8(0x02)),
                action(packet_action::DENY),
            ],
        );
        let multicast = entry(
            &store,
            t,
            20,
            vec![
                Attribute::new(acl_entry::FIELD_DST_MAC, AttrValue::Mac("01:00:5e:00:00:00".parse().unwrap())),
                Attribute::new(acl_entry::FIELD_DST_MAC_MASK, AttrValue::Mac("ff:ff:ff:80:00:00".parse().unwrap())),
                action(packet_action::TRAP),
            ],
        );
        let exact = entry(
            &store,
            t,
            10,
            vec![
                Attribute::new(acl_entry::FIELD_DSCP, AttrValue::U8(46)),
                action(packet_action::DROP),
            ],
        );

        let engine = AclEngine::new(&store);
        let matched = |key: AclKey| engine.evaluate(AclStage::Ingress, &key).unwrap().matched_entries;

        // SYN+ACK carries the SYN bit
        let syn_ack = AclKey { tcp_flags: Some(0x12), ..key_to("10.0.0.1") };
        assert_eq!(matched(syn_ack), vec![syn]);
        let ack = AclKey { tcp_flags: Some(0x10), ..key_to("10.0.0.1") };
        assert_eq!(matched(ack), Vec::<RawSaiObjectId>::new());

        let group_mac = AclKey {
            dst_mac: Some("01:00:5e:01:02:03".parse().unwrap()),
            ..key_to("10.0.0.1")
        };
        assert_eq!(matched(group_mac), vec![multicast]);
        let outside = AclKey {
            dst_mac: Some("01:00:5e:81:02:03".parse().unwrap()),
            ..key_to("10.0.0.1")
        };
        assert_eq!(matched(outside), Vec::<RawSaiObjectId>::new());

        // without a mask the field is exact
        assert_eq!(matched(AclKey { dscp: Some(46), ..key_to("10.0.0.1") }), vec![exact]);
        assert_eq!(matched(AclKey { dscp: Some(47), ..key_to("10.0.0.1") }), Vec::<RawSaiObjectId>::new());

        store
            .set_attribute(syn, &Attribute::new(acl_entry::FIELD_TCP_FLAGS_MASK, AttrValue::U8(0xff)))
            .unwrap();
        let syn_ack = AclKey { tcp_flags: Some(0x12), ..key_to("10.0.0.1") };
        assert_eq!(matched(syn_ack), Vec::<RawSaiObjectId>::new());
    }

    #[test]
    fn test_parallel_lowest_table_wins() {
        let store = ObjectStore::default();
        let g = group(&store, acl_stage::INGRESS, acl_table_group_type::PARALLEL);
        let t_low = table(&store, acl_stage::INGRESS);
        let t_high = table(&store, acl_stage::INGRESS);
        // listed order is the reverse of id order
        member(&store, g, t_high, 1);
        member(&store, g, t_low, 2);
        entry(
            &store,
            t_low,
            1,
            vec![
                dst_ip("10.0.0.0/8"),
                action(packet_action::TRAP),
                Attribute::new(acl_entry::ACTION_SET_DSCP, AttrValue::U8(10)),
            ],
        );
        entry(
            &store,
            t_high,
            1,
            vec![
                dst_ip("10.0.0.0/8"),
                action(packet_action::DROP),
                Attribute::new(acl_entry::ACTION_SET_DSCP, AttrValue::U8(20)),
                Attribute::new(acl_entry::ACTION_SET_TC, AttrValue::U8(3)),
            ],
        );

        let verdict = AclEngine::new(&store)
            .evaluate(AclStage::Ingress, &key_to("10.9.9.9"))
            .unwrap();
        assert_eq!(verdict.disposition, Disposition::Trap);
        assert_eq!(verdict.rewrites.dscp, Some(10));
        assert_eq!(verdict.rewrites.tc, Some(3));
        assert_eq!(verdict.matched_entries.len(), 2);
    }

    #[test]
    fn test_user_meta_and_redirect() {
        let store = ObjectStore::default();
        let p = store
            .create(
                ObjectType::Port,
                &[
                    Attribute::new(port::HW_LANE_LIST, AttrValue::U32List(vec![4])),
                    Attribute::new(port::SPEED, AttrValue::U32(25_000)),
                ],
            )
            .unwrap();
        let g = group(&store, acl_stage::INGRESS, acl_table_group_type::SEQUENTIAL);
        let t1 = table(&store, acl_stage::INGRESS);
        let t2 = table(&store, acl_stage::INGRESS);
        member(&store, g, t1, 1);
        member(&store, g, t2, 2);
        entry(
            &store,
            t1,
            1,
            vec![
                dst_ip("10.0.0.0/8"),
                Attribute::new(acl_entry::ACTION_SET_ACL_META_DATA, AttrValue::U32(7)),
            ],
        );
        entry(
            &store,
            t2,
            1,
            vec![
                Attribute::new(acl_entry::FIELD_ACL_USER_META, AttrValue::U32(7)),
                Attribute::new(acl_entry::ACTION_REDIRECT, AttrValue::Oid(p)),
            ],
        );

        let engine = AclEngine::new(&store);
        let verdict = engine.evaluate(AclStage::Ingress, &key_to("10.0.0.1")).unwrap();
        assert_eq!(verdict.disposition, Disposition::Redirect(p));
        assert_eq!(verdict.rewrites.user_meta, Some(7));

        let verdict = engine.evaluate(AclStage::Ingress, &key_to("11.0.0.1")).unwrap();
        assert_eq!(verdict.disposition, Disposition::Continue);
    }

    #[test]
    fn test_range_and_port_membership() {
        let store = ObjectStore::default();
        let g = group(&store, acl_stage::EGRESS, acl_table_group_type::SEQUENTIAL);
        let t = table(&store, acl_stage::EGRESS);
        member(&store, g, t, 1);
        let range = store
            .create(
                ObjectType::AclRange,
                &[
                    Attribute::new(acl_range::TYPE, AttrValue::Enum(acl_range_type::L4_DST_PORT_RANGE)),
                    Attribute::new(acl_range::LIMIT, AttrValue::U32Range(U32Range::new(1000, 2000))),
                ],
            )
            .unwrap();
        entry(
            &store,
            t,
            1,
            vec![
                Attribute::new(acl_entry::FIELD_ACL_RANGE_TYPE, AttrValue::OidList(vec![range])),
                action(packet_action::DROP),
            ],
        );

        let engine = AclEngine::new(&store);
        let mut key = key_to("10.0.0.1");
        key.l4_dst_port = Some(1500);
        assert_eq!(
            engine.evaluate(AclStage::Egress, &key).unwrap().disposition,
            Disposition::Drop
        );
        key.l4_dst_port = Some(2001);
        assert_eq!(
            engine.evaluate(AclStage::Egress, &key).unwrap().disposition,
            Disposition::Continue
        );
        // ingress has no groups
        key.l4_dst_port = Some(1500);
        assert_eq!(
            engine.evaluate(AclStage::Ingress, &key).unwrap().disposition,
            Disposition::Continue
        );
    }

    #[test]
    fn test_stage_mismatch_is_structural_error() {
        let store = ObjectStore::default();
        let g = group(&store, acl_stage::INGRESS, acl_table_group_type::SEQUENTIAL);
        let t = table(&store, acl_stage::EGRESS);
        member(&store, g, t, 1);
        let err = AclEngine::new(&store)
            .evaluate(AclStage::Ingress, &AclKey::default())
            .unwrap_err();
        assert!(matches!(err, AclError::StageMismatch { table, .. } if table == t));
        assert_eq!(err.status(), SaiStatus::InvalidAttribute);
    }

    #[test]
    fn test_evaluate_stages_short_circuits() {
        let store = ObjectStore::default();
        let pre = group(&store, acl_stage::PRE_INGRESS, acl_table_group_type::SEQUENTIAL);
        let ing = group(&store, acl_stage::INGRESS, acl_table_group_type::SEQUENTIAL);
        let t_pre = table(&store, acl_stage::PRE_INGRESS);
        let t_ing = table(&store, acl_stage::INGRESS);
        member(&store, pre, t_pre, 1);
        member(&store, ing, t_ing, 1);
        let c = counter(&store, t_ing, false);
        entry(&store, t_pre, 1, vec![dst_ip("10.0.0.0/8"), action(packet_action::TRAP)]);
        entry(
            &store,
            t_ing,
            1,
            vec![
                action(packet_action::FORWARD),
                Attribute::new(acl_entry::ACTION_COUNTER, AttrValue::Oid(c)),
            ],
        );

        let engine = AclEngine::new(&store);
        let stages = [AclStage::PreIngress, AclStage::Ingress];
        let verdict = engine.evaluate_stages(&stages, &key_to("10.0.0.1")).unwrap();
        assert_eq!(verdict.disposition, Disposition::Trap);
        assert_eq!(stat(&store, c, acl_counter::PACKETS), AttrValue::U64(0));

        let verdict = engine.evaluate_stages(&stages, &key_to("20.0.0.1")).unwrap();
        assert_eq!(verdict.disposition, Disposition::Continue);
        assert!(verdict.permitted);
        assert_eq!(stat(&store, c, acl_counter::PACKETS), AttrValue::U64(1));
    }
}
