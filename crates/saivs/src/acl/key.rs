//! ACL stages and the packet key an evaluation matches against.

use crate::route::FlowKey;
use crate::schema::catalog::acl_stage;
use crate::types::RawSaiObjectId;
use serde::{Deserialize, Serialize};
use sonic_types::{IpAddress, MacAddress};
use std::fmt;
use std::str::FromStr;

/// Pipeline stage an ACL table or group is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclStage {
    PreIngress,
    #[default]
    Ingress,
    Egress,
}

impl AclStage {
    /// `SAI_ACL_STAGE_*` value.
    pub const fn sai_value(&self) -> i32 {
        match self {
            Self::PreIngress => acl_stage::PRE_INGRESS,
            Self::Ingress => acl_stage::INGRESS,
            Self::Egress => acl_stage::EGRESS,
        }
    }

    pub fn from_sai(value: i32) -> Option<Self> {
        match value {
            acl_stage::PRE_INGRESS => Some(Self::PreIngress),
            acl_stage::INGRESS => Some(Self::Ingress),
            acl_stage::EGRESS => Some(Self::Egress),
            _ => None,
        }
    }
}

impl fmt::Display for AclStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreIngress => write!(f, "PRE_INGRESS"),
            Self::Ingress => write!(f, "INGRESS"),
            Self::Egress => write!(f, "EGRESS"),
        }
    }
}

impl FromStr for AclStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().trim_start_matches("SAI_ACL_STAGE_") {
            "PRE_INGRESS" => Ok(Self::PreIngress),
            "INGRESS" => Ok(Self::Ingress),
            "EGRESS" => Ok(Self::Egress),
            _ => Err(format!("Unknown ACL stage: {}", s)),
        }
    }
}

/// Header fields and metadata of the packet being classified.
///
/// Absent fields never match an entry that declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclKey {
    pub in_port: Option<RawSaiObjectId>,
    pub out_port: Option<RawSaiObjectId>,
    pub src_mac: Option<MacAddress>,
    pub dst_mac: Option<MacAddress>,
    pub src_ip: Option<IpAddress>,
    pub dst_ip: Option<IpAddress>,
    pub outer_vlan_id: Option<u16>,
    pub inner_vlan_id: Option<u16>,
    pub l4_src_port: Option<u16>,
    pub l4_dst_port: Option<u16>,
    pub ether_type: Option<u16>,
    pub ip_protocol: Option<u8>,
    pub dscp: Option<u8>,
    pub ecn: Option<u8>,
    pub ttl: Option<u8>,
    pub tc: Option<u8>,
    pub tcp_flags: Option<u8>,
    pub icmp_type: Option<u8>,
    pub icmp_code: Option<u8>,
    /// ACL user metadata; `SET_ACL_META_DATA` updates it for later tables.
    pub user_meta: Option<u32>,
    /// Bytes added to counters that count bytes.
    pub packet_length: u32,
    /// Forwarding class for class-based next hop groups.
    pub forwarding_class: u8,
}

impl AclKey {
    /// The 5-tuple used for ECMP hashing.
    pub fn flow_key(&self) -> FlowKey {
        FlowKey {
            src_ip: self.src_ip,
            dst_ip: self.dst_ip,
            ip_protocol: self.ip_protocol.unwrap_or(0),
            l4_src_port: self.l4_src_port.unwrap_or(0),
            l4_dst_port: self.l4_dst_port.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_acl_stage_parse() {
        assert_eq!("ingress".parse::<AclStage>().unwrap(), AclStage::Ingress);
        assert_eq!("SAI_ACL_STAGE_PRE_INGRESS".parse::<AclStage>().unwrap(), AclStage::PreIngress);
        assert!("macsec".parse::<AclStage>().is_err());
    }

    #[test]
    fn test_acl_stage_sai_values() {
        for stage in [AclStage::PreIngress, AclStage::Ingress, AclStage::Egress] {
            assert_eq!(AclStage::from_sai(stage.sai_value()), Some(stage));
        }
        assert_eq!(AclStage::from_sai(acl_stage::INGRESS_MACSEC), None);
    }

    #[test]
    fn test_key_from_json_defaults_missing_fields() {
        let key: AclKey =
            serde_json::from_str(r#"{"dst_ip": "10.1.2.3", "l4_dst_port": 80}"#).unwrap();
        assert_eq!(key.dst_ip, Some("10.1.2.3".parse().unwrap()));
        assert_eq!(key.l4_dst_port, Some(80));
        assert_eq!(key.src_ip, None);
        assert_eq!(key.packet_length, 0);
        assert_eq!(key.flow_key().l4_dst_port, 80);
    }
}
