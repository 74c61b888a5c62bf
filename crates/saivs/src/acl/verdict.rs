//! ACL actions and the accumulated verdict of an evaluation.

use crate::schema::catalog::packet_action;
use crate::types::RawSaiObjectId;
use serde::{Deserialize, Serialize};
use sonic_types::MacAddress;
use std::fmt;

/// One action of an ACL entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclAction {
    Redirect(RawSaiObjectId),
    Drop,
    Trap,
    Deny,
    /// Explicit permit; does not end evaluation.
    Forward,
    Copy,
    Log,
    Count(RawSaiObjectId),
    SetTc(u8),
    SetDscp(u8),
    SetUserMeta(u32),
    SetSrcMac(MacAddress),
    SetDstMac(MacAddress),
    SetPolicer(RawSaiObjectId),
    MirrorIngress(Vec<RawSaiObjectId>),
    MirrorEgress(Vec<RawSaiObjectId>),
}

impl AclAction {
    /// Maps a `SAI_PACKET_ACTION_*` value.
    ///
    /// `TRANSIT` and `COPY_CANCEL` pass the packet on like `FORWARD`.
    pub fn from_packet_action(value: i32) -> Option<Self> {
        match value {
            packet_action::DROP => Some(Self::Drop),
            packet_action::TRAP => Some(Self::Trap),
            packet_action::DENY => Some(Self::Deny),
            packet_action::FORWARD | packet_action::TRANSIT | packet_action::COPY_CANCEL => {
                Some(Self::Forward)
            }
            packet_action::COPY => Some(Self::Copy),
            packet_action::LOG => Some(Self::Log),
            _ => None,
        }
    }

    /// The disposition this action ends evaluation with, if any.
    pub fn terminal(&self) -> Option<Disposition> {
        match self {
            Self::Redirect(target) => Some(Disposition::Redirect(*target)),
            Self::Drop => Some(Disposition::Drop),
            Self::Trap => Some(Disposition::Trap),
            Self::Deny => Some(Disposition::Deny),
            _ => None,
        }
    }
}

/// Where a classified packet goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum Disposition {
    /// No terminating action; the packet continues down the pipeline.
    #[default]
    Continue,
    Redirect(RawSaiObjectId),
    Drop,
    Trap,
    Deny,
}

impl Disposition {
    pub fn is_terminal(&self) -> bool {
        *self != Disposition::Continue
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Redirect(target) => write!(f, "redirect oid:0x{:x}", target),
            Self::Drop => write!(f, "drop"),
            Self::Trap => write!(f, "trap"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// Header rewrites requested by matched entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrites {
    pub tc: Option<u8>,
    pub dscp: Option<u8>,
    pub src_mac: Option<MacAddress>,
    pub dst_mac: Option<MacAddress>,
    pub user_meta: Option<u32>,
}

/// Everything the ACL stages decided about one packet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclVerdict {
    pub disposition: Disposition,
    /// Entries whose actions were applied, in application order.
    pub matched_entries: Vec<RawSaiObjectId>,
    /// An entry explicitly permitted the packet.
    pub permitted: bool,
    pub copy_to_cpu: bool,
    pub log: bool,
    pub rewrites: Rewrites,
    pub policer: Option<RawSaiObjectId>,
    pub mirror_ingress: Vec<RawSaiObjectId>,
    pub mirror_egress: Vec<RawSaiObjectId>,
    pub counters: Vec<RawSaiObjectId>,
}

impl AclVerdict {
    pub fn is_terminal(&self) -> bool {
        self.disposition.is_terminal()
    }

    /// Applies a non-terminating action. Later writers replace earlier
    /// rewrites; mirror sessions and counters accumulate.
    pub(crate) fn apply(&mut self, action: &AclAction) {
        match action {
            AclAction::Forward => self.permitted = true,
            AclAction::Copy => self.copy_to_cpu = true,
            AclAction::Log => self.log = true,
            AclAction::Count(counter) => push_unique(&mut self.counters, *counter),
            AclAction::SetTc(tc) => self.rewrites.tc = Some(*tc),
            AclAction::SetDscp(dscp) => self.rewrites.dscp = Some(*dscp),
            AclAction::SetUserMeta(meta) => self.rewrites.user_meta = Some(*meta),
            AclAction::SetSrcMac(mac) => self.rewrites.src_mac = Some(*mac),
            AclAction::SetDstMac(mac) => self.rewrites.dst_mac = Some(*mac),
            AclAction::SetPolicer(policer) => self.policer = Some(*policer),
            AclAction::MirrorIngress(sessions) => {
                for session in sessions {
                    push_unique(&mut self.mirror_ingress, *session);
                }
            }
            AclAction::MirrorEgress(sessions) => {
                for session in sessions {
                    push_unique(&mut self.mirror_egress, *session);
                }
            }
            AclAction::Redirect(_) | AclAction::Drop | AclAction::Trap | AclAction::Deny => {}
        }
    }
}

fn push_unique(list: &mut Vec<RawSaiObjectId>, oid: RawSaiObjectId) {
    if !list.contains(&oid) {
        list.push(oid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packet_action_mapping() {
        assert_eq!(AclAction::from_packet_action(packet_action::DROP), Some(AclAction::Drop));
        assert_eq!(
            AclAction::from_packet_action(packet_action::TRANSIT),
            Some(AclAction::Forward)
        );
        assert_eq!(AclAction::from_packet_action(99), None);
        assert_eq!(AclAction::Deny.terminal(), Some(Disposition::Deny));
        assert_eq!(AclAction::Forward.terminal(), None);
        assert_eq!(AclAction::Redirect(7).terminal(), Some(Disposition::Redirect(7)));
    }

    #[test]
    fn test_apply_last_writer_wins() {
        let mut verdict = AclVerdict::default();
        verdict.apply(&AclAction::SetDscp(10));
        verdict.apply(&AclAction::MirrorIngress(vec![3, 4]));
        verdict.apply(&AclAction::SetDscp(20));
        verdict.apply(&AclAction::MirrorIngress(vec![4, 5]));
        verdict.apply(&AclAction::Forward);
        assert_eq!(verdict.rewrites.dscp, Some(20));
        assert_eq!(verdict.mirror_ingress, vec![3, 4, 5]);
        assert!(verdict.permitted);
        assert!(!verdict.is_terminal());
    }

    #[test]
    fn test_disposition_json() {
        assert_eq!(
            serde_json::to_string(&Disposition::Redirect(5)).unwrap(),
            r#"{"action":"redirect","target":5}"#
        );
        assert_eq!(
            serde_json::to_string(&Disposition::Drop).unwrap(),
            r#"{"action":"drop"}"#
        );
    }
}
