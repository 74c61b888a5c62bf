//! Deterministic flow hashing for ECMP member selection.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sonic_types::IpAddress;

/// The 5-tuple a flow is identified by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowKey {
    pub src_ip: Option<IpAddress>,
    pub dst_ip: Option<IpAddress>,
    pub ip_protocol: u8,
    pub l4_src_port: u16,
    pub l4_dst_port: u16,
}

const SEED_K1: u64 = 0x243f_6a88_85a3_08d3;
const SEED_K2: u64 = 0x1319_8a2e_0370_7344;
const SEED_K3: u64 = 0xa409_3822_299f_31d0;

/// Hashes `key` with fixed seeds derived from `seed`.
///
/// The same key and seed always give the same value within a build, so a
/// flow keeps its member for as long as the group is unchanged.
pub fn flow_hash(key: &FlowKey, seed: u64) -> u64 {
    let state = ahash::RandomState::with_seeds(seed, seed ^ SEED_K1, SEED_K2, SEED_K3);
    state.hash_one(key)
}

static SCORE_STATE: Lazy<ahash::RandomState> =
    Lazy::new(|| ahash::RandomState::with_seeds(SEED_K3, SEED_K2, SEED_K1, 0));

/// Rendezvous weight of `key` for a flow: a uniform value in (0, 1)
/// drawn from the pair, raised against `weight`. The key with the highest
/// score takes the flow, so dropping a key only moves the flows it held.
pub(crate) fn rendezvous_score(hash: u64, key: u64, weight: u64) -> f64 {
    let mixed = SCORE_STATE.hash_one((hash, key));
    let unit = ((mixed >> 11) as f64 + 0.5) / (1u64 << 53) as f64;
    weight as f64 / -unit.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flow(port: u16) -> FlowKey {
        FlowKey {
            src_ip: Some("10.0.0.1".parse().unwrap()),
            dst_ip: Some("10.1.0.1".parse().unwrap()),
            ip_protocol: 6,
            l4_src_port: port,
            l4_dst_port: 443,
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(flow_hash(&flow(1000), 7), flow_hash(&flow(1000), 7));
        assert_ne!(flow_hash(&flow(1000), 7), flow_hash(&flow(1001), 7));
        assert_ne!(flow_hash(&flow(1000), 7), flow_hash(&flow(1000), 8));
    }

    #[test]
    fn test_rendezvous_score_scales_with_weight() {
        let light = rendezvous_score(42, 9, 1);
        assert!(light > 0.0);
        assert_eq!(rendezvous_score(42, 9, 1), light);
        assert_eq!(rendezvous_score(42, 9, 4), light * 4.0);
        assert_ne!(rendezvous_score(43, 9, 1), light);
    }
}
