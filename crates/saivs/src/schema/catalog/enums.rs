//! SAI enum constants used by catalog attributes.

sai_enum!(packet_action, "SAI_PACKET_ACTION_" {
    DROP = 0,
    FORWARD = 1,
    COPY = 2,
    COPY_CANCEL = 3,
    TRAP = 4,
    LOG = 5,
    DENY = 6,
    TRANSIT = 7,
});

sai_enum!(port_oper_status, "SAI_PORT_OPER_STATUS_" {
    UNKNOWN = 0,
    UP = 1,
    DOWN = 2,
    TESTING = 3,
    NOT_PRESENT = 4,
});

sai_enum!(port_fec_mode, "SAI_PORT_FEC_MODE_" {
    NONE = 0,
    RS = 1,
    FC = 2,
});

sai_enum!(router_interface_type, "SAI_ROUTER_INTERFACE_TYPE_" {
    PORT = 0,
    VLAN = 1,
    LOOPBACK = 2,
    MPLS_ROUTER = 3,
    SUB_PORT = 4,
    BRIDGE = 5,
});

sai_enum!(next_hop_type, "SAI_NEXT_HOP_TYPE_" {
    IP = 0,
    MPLS = 1,
    TUNNEL_ENCAP = 2,
    SRV6_SIDLIST = 3,
});

sai_enum!(next_hop_group_type, "SAI_NEXT_HOP_GROUP_TYPE_" {
    DYNAMIC_UNORDERED_ECMP = 0,
    DYNAMIC_ORDERED_ECMP = 1,
    FINE_GRAIN_ECMP = 2,
    PROTECTION = 3,
    CLASS_BASED = 4,
    ECMP_WITH_MEMBERS = 5,
});

sai_enum!(next_hop_group_member_configured_role, "SAI_NEXT_HOP_GROUP_MEMBER_CONFIGURED_ROLE_" {
    PRIMARY = 0,
    STANDBY = 1,
});

sai_enum!(next_hop_group_member_observed_role, "SAI_NEXT_HOP_GROUP_MEMBER_OBSERVED_ROLE_" {
    ACTIVE = 0,
    INACTIVE = 1,
});

sai_enum!(next_hop_group_map_type, "SAI_NEXT_HOP_GROUP_MAP_TYPE_" {
    FORWARDING_CLASS_TO_INDEX = 0,
});

sai_enum!(acl_stage, "SAI_ACL_STAGE_" {
    INGRESS = 0,
    EGRESS = 1,
    INGRESS_MACSEC = 2,
    EGRESS_MACSEC = 3,
    PRE_INGRESS = 4,
});

sai_enum!(acl_bind_point_type, "SAI_ACL_BIND_POINT_TYPE_" {
    PORT = 0,
    LAG = 1,
    VLAN = 2,
    ROUTER_INTERFACE = 3,
    SWITCH = 4,
});

sai_enum!(acl_table_group_type, "SAI_ACL_TABLE_GROUP_TYPE_" {
    SEQUENTIAL = 0,
    PARALLEL = 1,
});

sai_enum!(acl_range_type, "SAI_ACL_RANGE_TYPE_" {
    L4_SRC_PORT_RANGE = 0,
    L4_DST_PORT_RANGE = 1,
    OUTER_VLAN = 2,
    INNER_VLAN = 3,
    PACKET_LENGTH = 4,
});

sai_enum!(bridge_type, "SAI_BRIDGE_" {
    TYPE_1Q = 0,
    TYPE_1D = 1,
});

sai_enum!(bridge_port_type, "SAI_BRIDGE_PORT_TYPE_" {
    PORT = 0,
    SUB_PORT = 1,
    ROUTER_1Q = 2,
    ROUTER_1D = 3,
    TUNNEL = 4,
});

sai_enum!(vlan_tagging_mode, "SAI_VLAN_TAGGING_MODE_" {
    UNTAGGED = 0,
    TAGGED = 1,
    PRIORITY_TAGGED = 2,
});

sai_enum!(fdb_entry_type, "SAI_FDB_ENTRY_TYPE_" {
    DYNAMIC = 0,
    STATIC = 1,
});

sai_enum!(stp_port_state, "SAI_STP_PORT_STATE_" {
    LEARNING = 0,
    FORWARDING = 1,
    BLOCKING = 2,
});

sai_enum!(isolation_group_type, "SAI_ISOLATION_GROUP_TYPE_" {
    PORT = 0,
    BRIDGE_PORT = 1,
});

sai_enum!(native_hash_field, "SAI_NATIVE_HASH_FIELD_" {
    SRC_IP = 0,
    DST_IP = 1,
    INNER_SRC_IP = 2,
    INNER_DST_IP = 3,
    VLAN_ID = 4,
    IP_PROTOCOL = 5,
    ETHERTYPE = 6,
    L4_SRC_PORT = 7,
    L4_DST_PORT = 8,
    SRC_MAC = 9,
    DST_MAC = 10,
    IN_PORT = 11,
});

sai_enum!(hostif_type, "SAI_HOSTIF_TYPE_" {
    NETDEV = 0,
    FD = 1,
    GENETLINK = 2,
});

sai_enum!(hostif_trap_type, "SAI_HOSTIF_TRAP_TYPE_" {
    STP = 0,
    LACP = 1,
    EAPOL = 2,
    LLDP = 3,
    PVRST = 4,
    UDLD = 13,
    ARP_REQUEST = 0x2000,
    ARP_RESPONSE = 0x2001,
    DHCP = 0x2002,
    OSPF = 0x2003,
    PIM = 0x2004,
    VRRP = 0x2005,
    DHCPV6 = 0x2006,
    IP2ME = 0x4000,
    SSH = 0x4001,
    SNMP = 0x4002,
    BGP = 0x4003,
    BGPV6 = 0x4004,
    L3_MTU_ERROR = 0x6000,
    TTL_ERROR = 0x6001,
});

sai_enum!(mirror_session_type, "SAI_MIRROR_SESSION_TYPE_" {
    LOCAL = 0,
    REMOTE = 1,
    ENHANCED_REMOTE = 2,
    SFLOW = 3,
});

sai_enum!(meter_type, "SAI_METER_TYPE_" {
    PACKETS = 0,
    BYTES = 1,
});

sai_enum!(policer_mode, "SAI_POLICER_MODE_" {
    SR_TCM = 0,
    TR_TCM = 1,
    STORM_CONTROL = 2,
});

sai_enum!(samplepacket_type, "SAI_SAMPLEPACKET_TYPE_" {
    SLOW_PATH = 0,
    MIRROR_SESSION = 1,
});

sai_enum!(queue_type, "SAI_QUEUE_TYPE_" {
    ALL = 0,
    UNICAST = 1,
    MULTICAST = 2,
});

sai_enum!(scheduling_type, "SAI_SCHEDULING_TYPE_" {
    STRICT = 0,
    WRR = 1,
    DWRR = 2,
});

sai_enum!(buffer_pool_type, "SAI_BUFFER_POOL_TYPE_" {
    INGRESS = 0,
    EGRESS = 1,
});

sai_enum!(buffer_pool_threshold_mode, "SAI_BUFFER_POOL_THRESHOLD_MODE_" {
    STATIC = 0,
    DYNAMIC = 1,
});

sai_enum!(qos_map_type, "SAI_QOS_MAP_TYPE_" {
    DOT1P_TO_TC = 0,
    DOT1P_TO_COLOR = 1,
    DSCP_TO_TC = 2,
    DSCP_TO_COLOR = 3,
    TC_TO_QUEUE = 4,
    TC_AND_COLOR_TO_DSCP = 5,
    TC_AND_COLOR_TO_DOT1P = 6,
    TC_TO_PRIORITY_GROUP = 7,
    PFC_PRIORITY_TO_PRIORITY_GROUP = 8,
    PFC_PRIORITY_TO_QUEUE = 9,
});

sai_enum!(tunnel_type, "SAI_TUNNEL_TYPE_" {
    IPINIP = 0,
    IPINIP_GRE = 1,
    VXLAN = 2,
    MPLS = 3,
});

sai_enum!(tunnel_map_type, "SAI_TUNNEL_MAP_TYPE_" {
    OECN_TO_UECN = 0,
    UECN_OECN_TO_OECN = 1,
    VNI_TO_VLAN_ID = 2,
    VLAN_ID_TO_VNI = 3,
    VNI_TO_BRIDGE_IF = 4,
    BRIDGE_IF_TO_VNI = 5,
    VNI_TO_VIRTUAL_ROUTER_ID = 6,
    VIRTUAL_ROUTER_ID_TO_VNI = 7,
});

sai_enum!(tunnel_term_table_entry_type, "SAI_TUNNEL_TERM_TABLE_ENTRY_TYPE_" {
    P2P = 0,
    P2MP = 1,
    MP2P = 2,
    MP2MP = 3,
});

sai_enum!(multicast_entry_type, "SAI_IPMC_ENTRY_TYPE_" {
    SG = 0,
    XG = 1,
});

sai_enum!(bfd_session_type, "SAI_BFD_SESSION_TYPE_" {
    DEMAND_ACTIVE = 0,
    DEMAND_PASSIVE = 1,
    ASYNC_ACTIVE = 2,
    ASYNC_PASSIVE = 3,
});

sai_enum!(bfd_session_state, "SAI_BFD_SESSION_STATE_" {
    ADMIN_DOWN = 0,
    DOWN = 1,
    INIT = 2,
    UP = 3,
});

sai_enum!(counter_type, "SAI_COUNTER_TYPE_" {
    REGULAR = 0,
});

sai_enum!(debug_counter_type, "SAI_DEBUG_COUNTER_TYPE_" {
    PORT_IN_DROP_REASONS = 0,
    PORT_OUT_DROP_REASONS = 1,
    SWITCH_IN_DROP_REASONS = 2,
    SWITCH_OUT_DROP_REASONS = 3,
});

sai_enum!(in_drop_reason, "SAI_IN_DROP_REASON_" {
    L2_ANY = 0,
    SMAC_MULTICAST = 1,
    SMAC_EQUALS_DMAC = 2,
    DMAC_RESERVED = 3,
    VLAN_TAG_NOT_ALLOWED = 4,
    INGRESS_VLAN_FILTER = 5,
    INGRESS_STP_FILTER = 6,
    FDB_UC_DISCARD = 7,
    L3_ANY = 0x20,
    TTL = 0x21,
    LPM4_MISS = 0x22,
    LPM6_MISS = 0x23,
    ACL_ANY = 0x40,
});
