//! Stage-ordered forwarding decision.
//!
//! A packet key runs through the `PRE_INGRESS` and `INGRESS` ACL stages,
//! then route and next hop group resolution on its destination address,
//! then the `EGRESS` stage with the egress port taken from the resolved
//! router interface. A terminating ACL verdict ends the walk at its stage.
//! Everything runs under one store snapshot.
//!
//! A missing route or a group without an eligible member is an [`Outcome`];
//! a broken ACL structure or a route target that is not a live group is a
//! [`PipelineError`].

use crate::acl::{evaluate_stage, AclError, AclKey, AclStage, AclVerdict, Disposition};
use crate::config::EngineConfig;
use crate::error::SaiStatus;
use crate::route::{flow_hash, Resolver, RouteError, RouteResult};
use crate::schema::catalog::{next_hop, router_interface};
use crate::store::{ObjectStore, StoreState};
use crate::types::RawSaiObjectId;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Acl(#[from] AclError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

impl PipelineError {
    pub fn status(&self) -> SaiStatus {
        match self {
            PipelineError::Acl(e) => e.status(),
            PipelineError::Route(e) => e.status(),
        }
    }
}

/// Final outcome of a forwarding decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Forward {
        next_hop: Option<RawSaiObjectId>,
        router_interface: Option<RawSaiObjectId>,
        port: Option<RawSaiObjectId>,
    },
    Redirect {
        target: RawSaiObjectId,
    },
    Drop,
    Trap,
    Deny,
    NoRoute,
    GroupEmpty {
        group: RawSaiObjectId,
    },
}

impl Outcome {
    fn from_disposition(disposition: Disposition) -> Option<Self> {
        match disposition {
            Disposition::Continue => None,
            Disposition::Redirect(target) => Some(Outcome::Redirect { target }),
            Disposition::Drop => Some(Outcome::Drop),
            Disposition::Trap => Some(Outcome::Trap),
            Disposition::Deny => Some(Outcome::Deny),
        }
    }
}

/// Outcome plus the intermediate results that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingDecision {
    pub outcome: Outcome,
    /// Verdict of the pre-ingress and ingress stages.
    pub ingress: AclVerdict,
    pub route: Option<RouteResult>,
    pub egress: Option<AclVerdict>,
}

/// Egress attachment of a resolved route.
#[derive(Debug, Default)]
struct Egress {
    next_hop: Option<RawSaiObjectId>,
    router_interface: Option<RawSaiObjectId>,
    port: Option<RawSaiObjectId>,
}

impl Egress {
    fn from_next_hop(state: &StoreState, nh: RawSaiObjectId) -> Self {
        let rif = state
            .get(nh)
            .and_then(|o| o.get_oid(next_hop::ROUTER_INTERFACE_ID));
        Egress {
            next_hop: Some(nh),
            ..Self::from_router_interface(state, rif)
        }
    }

    fn from_router_interface(state: &StoreState, rif: Option<RawSaiObjectId>) -> Self {
        Egress {
            next_hop: None,
            router_interface: rif,
            port: rif
                .and_then(|rif| state.get(rif))
                .and_then(|o| o.get_oid(router_interface::PORT_ID)),
        }
    }
}

pub struct Pipeline<'a> {
    store: &'a ObjectStore,
    config: EngineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a ObjectStore, config: &EngineConfig) -> Self {
        Pipeline {
            store,
            config: config.clone(),
        }
    }

    /// Decides where a packet described by `key` goes in virtual router `vr`.
    pub fn decide(
        &self,
        vr: RawSaiObjectId,
        key: &AclKey,
    ) -> Result<ForwardingDecision, PipelineError> {
        let view = self.store.view();
        let mut key = key.clone();

        let mut ingress = AclVerdict::default();
        for stage in [AclStage::PreIngress, AclStage::Ingress] {
            evaluate_stage(&view, stage, &mut key, &mut ingress)?;
            if let Some(outcome) = Outcome::from_disposition(ingress.disposition) {
                debug!("Ingress {} decided {:?}", stage, outcome);
                return Ok(ForwardingDecision {
                    outcome,
                    ingress,
                    route: None,
                    egress: None,
                });
            }
        }

        let Some(dst) = key.dst_ip else {
            return Ok(ForwardingDecision {
                outcome: Outcome::NoRoute,
                ingress,
                route: None,
                egress: None,
            });
        };

        let resolver = Resolver::new(&view);
        let route = match resolver.route(vr, &dst) {
            Ok(route) => route,
            Err(RouteError::NoRoute { .. }) => {
                return Ok(ForwardingDecision {
                    outcome: Outcome::NoRoute,
                    ingress,
                    route: None,
                    egress: None,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let egress = match route {
            RouteResult::Drop | RouteResult::Trap => {
                let outcome = if route == RouteResult::Drop {
                    Outcome::Drop
                } else {
                    Outcome::Trap
                };
                return Ok(ForwardingDecision {
                    outcome,
                    ingress,
                    route: Some(route),
                    egress: None,
                });
            }
            RouteResult::NextHop(nh) => Egress::from_next_hop(&view, nh),
            RouteResult::RouterInterface(rif) => Egress::from_router_interface(&view, Some(rif)),
            RouteResult::NextHopGroup(group) => {
                let hash = flow_hash(&key.flow_key(), self.config.flow_hash_seed);
                match resolver.group_for_flow(group, hash, key.forwarding_class) {
                    Ok(nh) => Egress::from_next_hop(&view, nh),
                    Err(RouteError::GroupEmpty(group)) => {
                        debug!("Next hop group oid:0x{:x} has no eligible member", group);
                        return Ok(ForwardingDecision {
                            outcome: Outcome::GroupEmpty { group },
                            ingress,
                            route: Some(route),
                            egress: None,
                        });
                    }
                    Err(e) => {
                        warn!("Route to {} resolved to a broken group: {}", dst, e);
                        return Err(e.into());
                    }
                }
            }
        };

        key.out_port = egress.port;
        let mut egress_verdict = AclVerdict::default();
        evaluate_stage(&view, AclStage::Egress, &mut key, &mut egress_verdict)?;
        let outcome = Outcome::from_disposition(egress_verdict.disposition).unwrap_or(
            Outcome::Forward {
                next_hop: egress.next_hop,
                router_interface: egress.router_interface,
                port: egress.port,
            },
        );
        debug!("Forwarding decision for {}: {:?}", dst, outcome);
        Ok(ForwardingDecision {
            outcome,
            ingress,
            route: Some(route),
            egress: Some(egress_verdict),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog::{
        acl_entry, acl_stage, acl_table, acl_table_group, acl_table_group_member,
        acl_table_group_type, next_hop_group, next_hop_group_member, next_hop_group_type,
        next_hop_type, packet_action, port, route_entry, router_interface_type,
    };
    use crate::schema::Attribute;
    use crate::types::ObjectType;
    use crate::value::AttrValue;
    use pretty_assertions::assert_eq;

    struct Fabric {
        vr: RawSaiObjectId,
        ports: Vec<RawSaiObjectId>,
        rifs: Vec<RawSaiObjectId>,
        nhs: Vec<RawSaiObjectId>,
    }

    /// One virtual router with two ports, each behind a router interface
    /// with one next hop.
    fn fabric(store: &ObjectStore) -> Fabric {
        let vr = store.create(ObjectType::VirtualRouter, &[]).unwrap();
        let mut fabric = Fabric {
            vr,
            ports: Vec::new(),
            rifs: Vec::new(),
            nhs: Vec::new(),
        };
        for lane in 0..2u32 {
            let port = store
                .create(
                    ObjectType::Port,
                    &[
                        Attribute::new(port::HW_LANE_LIST, AttrValue::U32List(vec![lane])),
                        Attribute::new(port::SPEED, AttrValue::U32(100_000)),
                    ],
                )
                .unwrap();
            let rif = store
                .create(
                    ObjectType::RouterInterface,
                    &[
                        Attribute::new(router_interface::VIRTUAL_ROUTER_ID, AttrValue::Oid(vr)),
                        Attribute::new(
                            router_interface::TYPE,
                            AttrValue::Enum(router_interface_type::PORT),
                        ),
                        Attribute::new(router_interface::PORT_ID, AttrValue::Oid(port)),
                    ],
                )
                .unwrap();
            let nh = store
                .create(
                    ObjectType::NextHop,
                    &[
                        Attribute::new(next_hop::TYPE, AttrValue::Enum(next_hop_type::IP)),
                        Attribute::new(
                            next_hop::IP,
                            AttrValue::IpAddress(format!("10.0.{}.1", lane).parse().unwrap()),
                        ),
                        Attribute::new(next_hop::ROUTER_INTERFACE_ID, AttrValue::Oid(rif)),
                    ],
                )
                .unwrap();
            fabric.ports.push(port);
            fabric.rifs.push(rif);
            fabric.nhs.push(nh);
        }
        fabric
    }

    fn route(store: &ObjectStore, vr: RawSaiObjectId, prefix: &str, target: RawSaiObjectId) {
        store
            .create(
                ObjectType::RouteEntry,
                &[
                    Attribute::new(route_entry::VR_ID, AttrValue::Oid(vr)),
                    Attribute::new(
                        route_entry::DESTINATION,
                        AttrValue::IpPrefix(prefix.parse().unwrap()),
                    ),
                    Attribute::new(route_entry::NEXT_HOP_ID, AttrValue::Oid(target)),
                ],
            )
            .unwrap();
    }

    /// A sequential group of one table at `stage`, with one entry.
    fn acl_rule(store: &ObjectStore, stage: i32, attrs: Vec<Attribute>) -> RawSaiObjectId {
        let group = store
            .create(
                ObjectType::AclTableGroup,
                &[
                    Attribute::new(acl_table_group::ACL_STAGE, AttrValue::Enum(stage)),
                    Attribute::new(
                        acl_table_group::TYPE,
                        AttrValue::Enum(acl_table_group_type::SEQUENTIAL),
                    ),
                ],
            )
            .unwrap();
        let table = store
            .create(
                ObjectType::AclTable,
                &[Attribute::new(acl_table::ACL_STAGE, AttrValue::Enum(stage))],
            )
            .unwrap();
        store
            .create(
                ObjectType::AclTableGroupMember,
                &[
                    Attribute::new(acl_table_group_member::ACL_TABLE_GROUP_ID, AttrValue::Oid(group)),
                    Attribute::new(acl_table_group_member::ACL_TABLE_ID, AttrValue::Oid(table)),
                    Attribute::new(acl_table_group_member::PRIORITY, AttrValue::U32(1)),
                ],
            )
            .unwrap();
        let mut all = vec![
            Attribute::new(acl_entry::TABLE_ID, AttrValue::Oid(table)),
            Attribute::new(acl_entry::PRIORITY, AttrValue::U32(10)),
        ];
        all.extend(attrs);
        store.create(ObjectType::AclEntry, &all).unwrap()
    }

    fn key_to(dst: &str) -> AclKey {
        AclKey {
            src_ip: Some("192.168.1.1".parse().unwrap()),
            dst_ip: Some(dst.parse().unwrap()),
            ip_protocol: Some(6),
            l4_src_port: Some(40000),
            l4_dst_port: Some(80),
            packet_length: 64,
            ..AclKey::default()
        }
    }

    #[test]
    fn test_forward_through_next_hop() {
        let store = ObjectStore::default();
        let f = fabric(&store);
        route(&store, f.vr, "20.0.0.0/8", f.nhs[1]);

        let pipeline = Pipeline::new(&store, &EngineConfig::default());
        let decision = pipeline.decide(f.vr, &key_to("20.1.1.1")).unwrap();
        assert_eq!(
            decision.outcome,
            Outcome::Forward {
                next_hop: Some(f.nhs[1]),
                router_interface: Some(f.rifs[1]),
                port: Some(f.ports[1]),
            }
        );
        assert_eq!(decision.route, Some(RouteResult::NextHop(f.nhs[1])));
        assert_eq!(decision.egress, Some(AclVerdict::default()));
    }

    #[test]
    fn test_ingress_drop_short_circuits() {
        let store = ObjectStore::default();
        let f = fabric(&store);
        let entry = acl_rule(
            &store,
            acl_stage::INGRESS,
            vec![
                Attribute::new(acl_entry::FIELD_L4_DST_PORT, AttrValue::U16(80)),
                Attribute::new(acl_entry::ACTION_PACKET_ACTION, AttrValue::Enum(packet_action::DROP)),
            ],
        );

        // no route installed: the ingress verdict decides before routing
        let pipeline = Pipeline::new(&store, &EngineConfig::default());
        let decision = pipeline.decide(f.vr, &key_to("20.1.1.1")).unwrap();
        assert_eq!(decision.outcome, Outcome::Drop);
        assert_eq!(decision.ingress.matched_entries, vec![entry]);
        assert_eq!(decision.route, None);
    }

    #[test]
    fn test_ingress_redirect() {
        let store = ObjectStore::default();
        let f = fabric(&store);
        acl_rule(
            &store,
            acl_stage::PRE_INGRESS,
            vec![Attribute::new(acl_entry::ACTION_REDIRECT, AttrValue::Oid(f.nhs[0]))],
        );

        let pipeline = Pipeline::new(&store, &EngineConfig::default());
        let decision = pipeline.decide(f.vr, &key_to("20.1.1.1")).unwrap();
        assert_eq!(decision.outcome, Outcome::Redirect { target: f.nhs[0] });
    }

    #[test]
    fn test_egress_acl_sees_egress_port() {
        let store = ObjectStore::default();
        let f = fabric(&store);
        route(&store, f.vr, "20.0.0.0/8", f.nhs[1]);
        route(&store, f.vr, "30.0.0.0/8", f.nhs[0]);
        acl_rule(
            &store,
            acl_stage::EGRESS,
            vec![
                Attribute::new(acl_entry::FIELD_OUT_PORT, AttrValue::Oid(f.ports[1])),
                Attribute::new(acl_entry::ACTION_PACKET_ACTION, AttrValue::Enum(packet_action::DENY)),
            ],
        );

        let pipeline = Pipeline::new(&store, &EngineConfig::default());
        let denied = pipeline.decide(f.vr, &key_to("20.1.1.1")).unwrap();
        assert_eq!(denied.outcome, Outcome::Deny);
        assert_eq!(denied.route, Some(RouteResult::NextHop(f.nhs[1])));

        let allowed = pipeline.decide(f.vr, &key_to("30.1.1.1")).unwrap();
        assert!(matches!(allowed.outcome, Outcome::Forward { port: Some(p), .. } if p == f.ports[0]));
    }

    #[test]
    fn test_group_resolution_and_typed_failures() {
        let store = ObjectStore::default();
        let f = fabric(&store);
        let nhg = store
            .create(
                ObjectType::NextHopGroup,
                &[Attribute::new(
                    next_hop_group::TYPE,
                    AttrValue::Enum(next_hop_group_type::DYNAMIC_UNORDERED_ECMP),
                )],
            )
            .unwrap();
        route(&store, f.vr, "40.0.0.0/8", nhg);

        let pipeline = Pipeline::new(&store, &EngineConfig::default());
        let empty = pipeline.decide(f.vr, &key_to("40.0.0.1")).unwrap();
        assert_eq!(empty.outcome, Outcome::GroupEmpty { group: nhg });

        store
            .create(
                ObjectType::NextHopGroupMember,
                &[
                    Attribute::new(next_hop_group_member::NEXT_HOP_GROUP_ID, AttrValue::Oid(nhg)),
                    Attribute::new(next_hop_group_member::NEXT_HOP_ID, AttrValue::Oid(f.nhs[0])),
                ],
            )
            .unwrap();
        let decision = pipeline.decide(f.vr, &key_to("40.0.0.1")).unwrap();
        assert_eq!(
            decision.outcome,
            Outcome::Forward {
                next_hop: Some(f.nhs[0]),
                router_interface: Some(f.rifs[0]),
                port: Some(f.ports[0]),
            }
        );

        let none = pipeline.decide(f.vr, &key_to("50.0.0.1")).unwrap();
        assert_eq!(none.outcome, Outcome::NoRoute);
    }

    #[test]
    fn test_missing_group_is_not_found() {
        let store = ObjectStore::default();
        let f = fabric(&store);
        let nhg = store
            .create(
                ObjectType::NextHopGroup,
                &[Attribute::new(
                    next_hop_group::TYPE,
                    AttrValue::Enum(next_hop_group_type::DYNAMIC_UNORDERED_ECMP),
                )],
            )
            .unwrap();
        route(&store, f.vr, "40.0.0.0/8", nhg);
        store.forget(nhg);

        let pipeline = Pipeline::new(&store, &EngineConfig::default());
        let err = pipeline.decide(f.vr, &key_to("40.0.0.1")).unwrap_err();
        assert_eq!(err, PipelineError::Route(RouteError::NoSuchGroup(nhg)));
        assert_eq!(err.status(), SaiStatus::NotFound);
    }
}
