//! Object type catalog tags and object id encoding.
//!
//! Every object id carries its object type in bits 48..56, the layout
//! sairedis uses for virtual object ids, so the type of any id can be
//! recovered without a store lookup. The low 48 bits are a per-store
//! counter that is never reused.
//!
//! On top of the raw encoding, [`SaiObjectId`] gives compile-time typed
//! handles for the objects the decision engines hand back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;

/// Raw object id (matches `sai_object_id_t`).
pub type RawSaiObjectId = u64;

/// `SAI_NULL_OBJECT_ID`.
pub const NULL_OBJECT_ID: RawSaiObjectId = 0;

const OBJECT_TYPE_SHIFT: u32 = 48;
const OBJECT_TYPE_MASK: u64 = 0xff;
const OBJECT_INDEX_MASK: u64 = (1 << OBJECT_TYPE_SHIFT) - 1;

macro_rules! define_object_types {
    ($($variant:ident = $value:literal => $name:literal,)*) => {
        /// Object type tags, numbered as `sai_object_type_t`.
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ObjectType {
            $(
                #[serde(rename = $name)]
                $variant = $value,
            )*
        }

        impl ObjectType {
            /// Every object type in the catalog, in numeric order.
            pub const ALL: &'static [ObjectType] = &[$(ObjectType::$variant,)*];

            pub fn from_raw(value: u32) -> Option<Self> {
                match value {
                    $($value => Some(ObjectType::$variant),)*
                    _ => None,
                }
            }

            /// The `SAI_OBJECT_TYPE_*` name.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(ObjectType::$variant => $name,)*
                }
            }
        }
    };
}

define_object_types! {
    Port = 1 => "SAI_OBJECT_TYPE_PORT",
    Lag = 2 => "SAI_OBJECT_TYPE_LAG",
    VirtualRouter = 3 => "SAI_OBJECT_TYPE_VIRTUAL_ROUTER",
    NextHop = 4 => "SAI_OBJECT_TYPE_NEXT_HOP",
    NextHopGroup = 5 => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP",
    RouterInterface = 6 => "SAI_OBJECT_TYPE_ROUTER_INTERFACE",
    AclTable = 7 => "SAI_OBJECT_TYPE_ACL_TABLE",
    AclEntry = 8 => "SAI_OBJECT_TYPE_ACL_ENTRY",
    AclCounter = 9 => "SAI_OBJECT_TYPE_ACL_COUNTER",
    AclRange = 10 => "SAI_OBJECT_TYPE_ACL_RANGE",
    AclTableGroup = 11 => "SAI_OBJECT_TYPE_ACL_TABLE_GROUP",
    AclTableGroupMember = 12 => "SAI_OBJECT_TYPE_ACL_TABLE_GROUP_MEMBER",
    Hostif = 13 => "SAI_OBJECT_TYPE_HOSTIF",
    MirrorSession = 14 => "SAI_OBJECT_TYPE_MIRROR_SESSION",
    Samplepacket = 15 => "SAI_OBJECT_TYPE_SAMPLEPACKET",
    Stp = 16 => "SAI_OBJECT_TYPE_STP",
    HostifTrapGroup = 17 => "SAI_OBJECT_TYPE_HOSTIF_TRAP_GROUP",
    Policer = 18 => "SAI_OBJECT_TYPE_POLICER",
    Wred = 19 => "SAI_OBJECT_TYPE_WRED",
    QosMap = 20 => "SAI_OBJECT_TYPE_QOS_MAP",
    Queue = 21 => "SAI_OBJECT_TYPE_QUEUE",
    Scheduler = 22 => "SAI_OBJECT_TYPE_SCHEDULER",
    SchedulerGroup = 23 => "SAI_OBJECT_TYPE_SCHEDULER_GROUP",
    BufferPool = 24 => "SAI_OBJECT_TYPE_BUFFER_POOL",
    BufferProfile = 25 => "SAI_OBJECT_TYPE_BUFFER_PROFILE",
    IngressPriorityGroup = 26 => "SAI_OBJECT_TYPE_INGRESS_PRIORITY_GROUP",
    LagMember = 27 => "SAI_OBJECT_TYPE_LAG_MEMBER",
    Hash = 28 => "SAI_OBJECT_TYPE_HASH",
    FdbEntry = 32 => "SAI_OBJECT_TYPE_FDB_ENTRY",
    Switch = 33 => "SAI_OBJECT_TYPE_SWITCH",
    HostifTrap = 34 => "SAI_OBJECT_TYPE_HOSTIF_TRAP",
    NeighborEntry = 36 => "SAI_OBJECT_TYPE_NEIGHBOR_ENTRY",
    RouteEntry = 37 => "SAI_OBJECT_TYPE_ROUTE_ENTRY",
    Vlan = 38 => "SAI_OBJECT_TYPE_VLAN",
    VlanMember = 39 => "SAI_OBJECT_TYPE_VLAN_MEMBER",
    TunnelMap = 41 => "SAI_OBJECT_TYPE_TUNNEL_MAP",
    Tunnel = 42 => "SAI_OBJECT_TYPE_TUNNEL",
    TunnelTermTableEntry = 43 => "SAI_OBJECT_TYPE_TUNNEL_TERM_TABLE_ENTRY",
    NextHopGroupMember = 45 => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP_MEMBER",
    StpPort = 46 => "SAI_OBJECT_TYPE_STP_PORT",
    RpfGroup = 47 => "SAI_OBJECT_TYPE_RPF_GROUP",
    RpfGroupMember = 48 => "SAI_OBJECT_TYPE_RPF_GROUP_MEMBER",
    L2mcGroup = 49 => "SAI_OBJECT_TYPE_L2MC_GROUP",
    L2mcGroupMember = 50 => "SAI_OBJECT_TYPE_L2MC_GROUP_MEMBER",
    IpmcGroup = 51 => "SAI_OBJECT_TYPE_IPMC_GROUP",
    IpmcGroupMember = 52 => "SAI_OBJECT_TYPE_IPMC_GROUP_MEMBER",
    L2mcEntry = 53 => "SAI_OBJECT_TYPE_L2MC_ENTRY",
    IpmcEntry = 54 => "SAI_OBJECT_TYPE_IPMC_ENTRY",
    McastFdbEntry = 55 => "SAI_OBJECT_TYPE_MCAST_FDB_ENTRY",
    Bridge = 57 => "SAI_OBJECT_TYPE_BRIDGE",
    BridgePort = 58 => "SAI_OBJECT_TYPE_BRIDGE_PORT",
    TunnelMapEntry = 59 => "SAI_OBJECT_TYPE_TUNNEL_MAP_ENTRY",
    InsegEntry = 63 => "SAI_OBJECT_TYPE_INSEG_ENTRY",
    BfdSession = 69 => "SAI_OBJECT_TYPE_BFD_SESSION",
    IsolationGroup = 70 => "SAI_OBJECT_TYPE_ISOLATION_GROUP",
    IsolationGroupMember = 71 => "SAI_OBJECT_TYPE_ISOLATION_GROUP_MEMBER",
    Counter = 84 => "SAI_OBJECT_TYPE_COUNTER",
    DebugCounter = 85 => "SAI_OBJECT_TYPE_DEBUG_COUNTER",
    MyMac = 99 => "SAI_OBJECT_TYPE_MY_MAC",
    NextHopGroupMap = 100 => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP_MAP",
}

impl ObjectType {
    pub const fn as_raw(&self) -> u32 {
        *self as u32
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    /// Accepts `SAI_OBJECT_TYPE_ROUTE_ENTRY` or the short `route_entry`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        let full = if upper.starts_with("SAI_OBJECT_TYPE_") {
            upper
        } else {
            format!("SAI_OBJECT_TYPE_{}", upper)
        };
        ObjectType::ALL
            .iter()
            .copied()
            .find(|ot| ot.name() == full)
            .ok_or_else(|| format!("Unknown object type: {}", s))
    }
}

/// Builds the object id for the `index`-th object of `object_type`.
pub const fn encode_oid(object_type: ObjectType, index: u64) -> RawSaiObjectId {
    ((object_type.as_raw() as u64) << OBJECT_TYPE_SHIFT) | (index & OBJECT_INDEX_MASK)
}

/// Object type encoded in `oid`, if it names a catalog type.
pub fn object_type_of(oid: RawSaiObjectId) -> Option<ObjectType> {
    let raw = (oid >> OBJECT_TYPE_SHIFT) & OBJECT_TYPE_MASK;
    ObjectType::from_raw(raw as u32)
}

/// Per-type counter part of `oid`.
pub const fn object_index_of(oid: RawSaiObjectId) -> u64 {
    oid & OBJECT_INDEX_MASK
}

/// Largest counter value an object id can carry.
pub const MAX_OBJECT_INDEX: u64 = OBJECT_INDEX_MASK;

/// Marker trait for object kinds with typed ids.
pub trait SaiObjectKind: Send + Sync + 'static {
    const OBJECT_TYPE: ObjectType;

    /// Returns the object type name for debugging.
    fn type_name() -> &'static str;
}

/// A type-safe object id.
///
/// The phantom parameter `T` records what kind of object this id refers to,
/// so a next hop id cannot be passed where a group id is expected.
#[derive(Clone, Copy)]
pub struct SaiObjectId<T: SaiObjectKind> {
    raw: RawSaiObjectId,
    _marker: PhantomData<T>,
}

impl<T: SaiObjectKind> SaiObjectId<T> {
    /// Wraps `raw` if it is non-null and encodes `T`'s object type.
    pub fn from_raw(raw: RawSaiObjectId) -> Option<Self> {
        if raw != NULL_OBJECT_ID && object_type_of(raw) == Some(T::OBJECT_TYPE) {
            Some(Self {
                raw,
                _marker: PhantomData,
            })
        } else {
            None
        }
    }

    pub const fn as_raw(&self) -> RawSaiObjectId {
        self.raw
    }
}

impl<T: SaiObjectKind> fmt::Debug for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:x})", T::type_name(), self.raw)
    }
}

impl<T: SaiObjectKind> fmt::Display for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oid:0x{:x}", self.raw)
    }
}

impl<T: SaiObjectKind> PartialEq for SaiObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: SaiObjectKind> Eq for SaiObjectId<T> {}

impl<T: SaiObjectKind> Hash for SaiObjectId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: SaiObjectKind> PartialOrd for SaiObjectId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: SaiObjectKind> Ord for SaiObjectId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T: SaiObjectKind> Serialize for SaiObjectId<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

macro_rules! define_object_kind {
    ($name:ident, $object_type:ident, $oid_alias:ident) => {
        #[doc = concat!("Marker type for `", stringify!($object_type), "` objects.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SaiObjectKind for $name {
            const OBJECT_TYPE: ObjectType = ObjectType::$object_type;

            fn type_name() -> &'static str {
                stringify!($object_type)
            }
        }

        #[doc = concat!("Typed id of a `", stringify!($object_type), "` object.")]
        pub type $oid_alias = SaiObjectId<$name>;
    };
}

define_object_kind!(PortKind, Port, PortOid);
define_object_kind!(VirtualRouterKind, VirtualRouter, VirtualRouterOid);
define_object_kind!(RouterInterfaceKind, RouterInterface, RouterInterfaceOid);
define_object_kind!(NextHopKind, NextHop, NextHopOid);
define_object_kind!(NextHopGroupKind, NextHopGroup, NextHopGroupOid);
define_object_kind!(NextHopGroupMemberKind, NextHopGroupMember, NextHopGroupMemberOid);
define_object_kind!(RouteEntryKind, RouteEntry, RouteEntryOid);
define_object_kind!(AclTableKind, AclTable, AclTableOid);
define_object_kind!(AclEntryKind, AclEntry, AclEntryOid);
define_object_kind!(AclTableGroupKind, AclTableGroup, AclTableGroupOid);
