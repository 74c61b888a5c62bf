//! Attribute values.
//!
//! [`AttrValue`] is the closed tagged union every attribute payload is
//! carried in: integers of each width, enum constants, addresses, object
//! references, and ordered lists of each scalar kind. [`ValueKind`] names
//! the variants without a payload and is what the schema declares.
//!
//! Values are plain data: cloning copies, equality is structural (lists
//! compare length, then element by element).

mod text;

pub use text::{format_oid, parse_oid};

use crate::types::{RawSaiObjectId, NULL_OBJECT_ID};
use serde::{Deserialize, Serialize};
use sonic_types::{IpAddress, IpFamily, IpPrefix, Ipv4Address, Ipv6Address, MacAddress};
use std::fmt;

/// Inclusive `u32` range (`sai_u32_range_t`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct U32Range {
    pub min: u32,
    pub max: u32,
}

impl U32Range {
    pub const fn new(min: u32, max: u32) -> Self {
        U32Range { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The kind of an attribute value, as declared by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    Enum,
    Mac,
    Ipv4,
    Ipv6,
    IpAddress,
    IpPrefix,
    U32Range,
    Oid,
    BoolList,
    U8List,
    U16List,
    U32List,
    U64List,
    I8List,
    I16List,
    I32List,
    I64List,
    EnumList,
    MacList,
    Ipv4List,
    Ipv6List,
    IpAddressList,
    OidList,
    MapList,
    Chardata,
}

impl ValueKind {
    pub const fn is_list(&self) -> bool {
        matches!(
            self,
            ValueKind::BoolList
                | ValueKind::U8List
                | ValueKind::U16List
                | ValueKind::U32List
                | ValueKind::U64List
                | ValueKind::I8List
                | ValueKind::I16List
                | ValueKind::I32List
                | ValueKind::I64List
                | ValueKind::EnumList
                | ValueKind::MacList
                | ValueKind::Ipv4List
                | ValueKind::Ipv6List
                | ValueKind::IpAddressList
                | ValueKind::OidList
                | ValueKind::MapList
        )
    }

    /// True for kinds that carry object references.
    pub const fn is_reference(&self) -> bool {
        matches!(self, ValueKind::Oid | ValueKind::OidList)
    }

    /// The `SAI_ATTR_VALUE_TYPE_*` name.
    pub const fn name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "SAI_ATTR_VALUE_TYPE_BOOL",
            ValueKind::U8 => "SAI_ATTR_VALUE_TYPE_UINT8",
            ValueKind::U16 => "SAI_ATTR_VALUE_TYPE_UINT16",
            ValueKind::U32 => "SAI_ATTR_VALUE_TYPE_UINT32",
            ValueKind::U64 => "SAI_ATTR_VALUE_TYPE_UINT64",
            ValueKind::I8 => "SAI_ATTR_VALUE_TYPE_INT8",
            ValueKind::I16 => "SAI_ATTR_VALUE_TYPE_INT16",
            ValueKind::I32 => "SAI_ATTR_VALUE_TYPE_INT32",
            ValueKind::I64 => "SAI_ATTR_VALUE_TYPE_INT64",
            ValueKind::Enum => "SAI_ATTR_VALUE_TYPE_INT32_ENUM",
            ValueKind::Mac => "SAI_ATTR_VALUE_TYPE_MAC",
            ValueKind::Ipv4 => "SAI_ATTR_VALUE_TYPE_IPV4",
            ValueKind::Ipv6 => "SAI_ATTR_VALUE_TYPE_IPV6",
            ValueKind::IpAddress => "SAI_ATTR_VALUE_TYPE_IP_ADDRESS",
            ValueKind::IpPrefix => "SAI_ATTR_VALUE_TYPE_IP_PREFIX",
            ValueKind::U32Range => "SAI_ATTR_VALUE_TYPE_UINT32_RANGE",
            ValueKind::Oid => "SAI_ATTR_VALUE_TYPE_OBJECT_ID",
            ValueKind::BoolList => "SAI_ATTR_VALUE_TYPE_BOOL_LIST",
            ValueKind::U8List => "SAI_ATTR_VALUE_TYPE_UINT8_LIST",
            ValueKind::U16List => "SAI_ATTR_VALUE_TYPE_UINT16_LIST",
            ValueKind::U32List => "SAI_ATTR_VALUE_TYPE_UINT32_LIST",
            ValueKind::U64List => "SAI_ATTR_VALUE_TYPE_UINT64_LIST",
            ValueKind::I8List => "SAI_ATTR_VALUE_TYPE_INT8_LIST",
            ValueKind::I16List => "SAI_ATTR_VALUE_TYPE_INT16_LIST",
            ValueKind::I32List => "SAI_ATTR_VALUE_TYPE_INT32_LIST",
            ValueKind::I64List => "SAI_ATTR_VALUE_TYPE_INT64_LIST",
            ValueKind::EnumList => "SAI_ATTR_VALUE_TYPE_INT32_ENUM_LIST",
            ValueKind::MacList => "SAI_ATTR_VALUE_TYPE_MAC_LIST",
            ValueKind::Ipv4List => "SAI_ATTR_VALUE_TYPE_IPV4_LIST",
            ValueKind::Ipv6List => "SAI_ATTR_VALUE_TYPE_IPV6_LIST",
            ValueKind::IpAddressList => "SAI_ATTR_VALUE_TYPE_IP_ADDRESS_LIST",
            ValueKind::OidList => "SAI_ATTR_VALUE_TYPE_OBJECT_LIST",
            ValueKind::MapList => "SAI_ATTR_VALUE_TYPE_MAP_LIST",
            ValueKind::Chardata => "SAI_ATTR_VALUE_TYPE_CHARDATA",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An attribute payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AttrValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Enum(i32),
    Mac(MacAddress),
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
    IpAddress(IpAddress),
    IpPrefix(IpPrefix),
    U32Range(U32Range),
    Oid(RawSaiObjectId),
    BoolList(Vec<bool>),
    U8List(Vec<u8>),
    U16List(Vec<u16>),
    U32List(Vec<u32>),
    U64List(Vec<u64>),
    I8List(Vec<i8>),
    I16List(Vec<i16>),
    I32List(Vec<i32>),
    I64List(Vec<i64>),
    EnumList(Vec<i32>),
    MacList(Vec<MacAddress>),
    Ipv4List(Vec<Ipv4Address>),
    Ipv6List(Vec<Ipv6Address>),
    IpAddressList(Vec<IpAddress>),
    OidList(Vec<RawSaiObjectId>),
    /// Key/value pairs (`sai_map_list_t`).
    MapList(Vec<(u32, u32)>),
    /// Short text such as an interface name.
    Chardata(String),
}

impl AttrValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttrValue::Bool(_) => ValueKind::Bool,
            AttrValue::U8(_) => ValueKind::U8,
            AttrValue::U16(_) => ValueKind::U16,
            AttrValue::U32(_) => ValueKind::U32,
            AttrValue::U64(_) => ValueKind::U64,
            AttrValue::I8(_) => ValueKind::I8,
            AttrValue::I16(_) => ValueKind::I16,
            AttrValue::I32(_) => ValueKind::I32,
            AttrValue::I64(_) => ValueKind::I64,
            AttrValue::Enum(_) => ValueKind::Enum,
            AttrValue::Mac(_) => ValueKind::Mac,
            AttrValue::Ipv4(_) => ValueKind::Ipv4,
            AttrValue::Ipv6(_) => ValueKind::Ipv6,
            AttrValue::IpAddress(_) => ValueKind::IpAddress,
            AttrValue::IpPrefix(_) => ValueKind::IpPrefix,
            AttrValue::U32Range(_) => ValueKind::U32Range,
            AttrValue::Oid(_) => ValueKind::Oid,
            AttrValue::BoolList(_) => ValueKind::BoolList,
            AttrValue::U8List(_) => ValueKind::U8List,
            AttrValue::U16List(_) => ValueKind::U16List,
            AttrValue::U32List(_) => ValueKind::U32List,
            AttrValue::U64List(_) => ValueKind::U64List,
            AttrValue::I8List(_) => ValueKind::I8List,
            AttrValue::I16List(_) => ValueKind::I16List,
            AttrValue::I32List(_) => ValueKind::I32List,
            AttrValue::I64List(_) => ValueKind::I64List,
            AttrValue::EnumList(_) => ValueKind::EnumList,
            AttrValue::MacList(_) => ValueKind::MacList,
            AttrValue::Ipv4List(_) => ValueKind::Ipv4List,
            AttrValue::Ipv6List(_) => ValueKind::Ipv6List,
            AttrValue::IpAddressList(_) => ValueKind::IpAddressList,
            AttrValue::OidList(_) => ValueKind::OidList,
            AttrValue::MapList(_) => ValueKind::MapList,
            AttrValue::Chardata(_) => ValueKind::Chardata,
        }
    }

    /// Kind-specific zero value: 0, false, enum 0, empty list, all-zero
    /// address, null object id, `0.0.0.0/0`, empty text.
    pub fn default_for(kind: ValueKind) -> AttrValue {
        match kind {
            ValueKind::Bool => AttrValue::Bool(false),
            ValueKind::U8 => AttrValue::U8(0),
            ValueKind::U16 => AttrValue::U16(0),
            ValueKind::U32 => AttrValue::U32(0),
            ValueKind::U64 => AttrValue::U64(0),
            ValueKind::I8 => AttrValue::I8(0),
            ValueKind::I16 => AttrValue::I16(0),
            ValueKind::I32 => AttrValue::I32(0),
            ValueKind::I64 => AttrValue::I64(0),
            ValueKind::Enum => AttrValue::Enum(0),
            ValueKind::Mac => AttrValue::Mac(MacAddress::ZERO),
            ValueKind::Ipv4 => AttrValue::Ipv4(Ipv4Address::UNSPECIFIED),
            ValueKind::Ipv6 => AttrValue::Ipv6(Ipv6Address::UNSPECIFIED),
            ValueKind::IpAddress => AttrValue::IpAddress(IpAddress::unspecified(IpFamily::V4)),
            ValueKind::IpPrefix => AttrValue::IpPrefix(IpPrefix::default_route(IpFamily::V4)),
            ValueKind::U32Range => AttrValue::U32Range(U32Range::default()),
            ValueKind::Oid => AttrValue::Oid(NULL_OBJECT_ID),
            ValueKind::BoolList => AttrValue::BoolList(Vec::new()),
            ValueKind::U8List => AttrValue::U8List(Vec::new()),
            ValueKind::U16List => AttrValue::U16List(Vec::new()),
            ValueKind::U32List => AttrValue::U32List(Vec::new()),
            ValueKind::U64List => AttrValue::U64List(Vec::new()),
            ValueKind::I8List => AttrValue::I8List(Vec::new()),
            ValueKind::I16List => AttrValue::I16List(Vec::new()),
            ValueKind::I32List => AttrValue::I32List(Vec::new()),
            ValueKind::I64List => AttrValue::I64List(Vec::new()),
            ValueKind::EnumList => AttrValue::EnumList(Vec::new()),
            ValueKind::MacList => AttrValue::MacList(Vec::new()),
            ValueKind::Ipv4List => AttrValue::Ipv4List(Vec::new()),
            ValueKind::Ipv6List => AttrValue::Ipv6List(Vec::new()),
            ValueKind::IpAddressList => AttrValue::IpAddressList(Vec::new()),
            ValueKind::OidList => AttrValue::OidList(Vec::new()),
            ValueKind::MapList => AttrValue::MapList(Vec::new()),
            ValueKind::Chardata => AttrValue::Chardata(String::new()),
        }
    }

    /// Parses the text form of a `kind` value.
    ///
    /// # Errors
    ///
    /// `InvalidValueKind` when `raw` cannot represent `kind`: malformed
    /// scalar, list count disagreeing with the element count, and so on.
    pub fn make(kind: ValueKind, raw: &str) -> crate::SaiResult<AttrValue> {
        text::parse(kind, raw)
    }

    /// Non-null object ids carried by this value.
    pub fn referenced_oids(&self) -> Vec<RawSaiObjectId> {
        match self {
            AttrValue::Oid(oid) if *oid != NULL_OBJECT_ID => vec![*oid],
            AttrValue::OidList(oids) => oids
                .iter()
                .copied()
                .filter(|oid| *oid != NULL_OBJECT_ID)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any unsigned scalar widened to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AttrValue::U8(v) => Some(u64::from(*v)),
            AttrValue::U16(v) => Some(u64::from(*v)),
            AttrValue::U32(v) => Some(u64::from(*v)),
            AttrValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_u64().and_then(|v| u32::try_from(v).ok())
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            AttrValue::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<RawSaiObjectId> {
        match self {
            AttrValue::Oid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_oid_list(&self) -> Option<&[RawSaiObjectId]> {
        match self {
            AttrValue::OidList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_prefix(&self) -> Option<&IpPrefix> {
        match self {
            AttrValue::IpPrefix(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    /// Writes the same text form [`AttrValue::make`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&text::format(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{encode_oid, ObjectType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_kind() {
        for kind in [
            ValueKind::Bool,
            ValueKind::U16,
            ValueKind::Enum,
            ValueKind::IpPrefix,
            ValueKind::Oid,
            ValueKind::OidList,
            ValueKind::MapList,
        ] {
            assert_eq!(AttrValue::default_for(kind).kind(), kind);
        }
        assert_eq!(AttrValue::default_for(ValueKind::Oid), AttrValue::Oid(NULL_OBJECT_ID));
        assert_eq!(AttrValue::default_for(ValueKind::U32List), AttrValue::U32List(vec![]));
    }

    #[test]
    fn test_list_equality() {
        assert_eq!(AttrValue::U32List(vec![1, 2]), AttrValue::U32List(vec![1, 2]));
        assert_ne!(AttrValue::U32List(vec![1, 2]), AttrValue::U32List(vec![1, 2, 3]));
        assert_ne!(AttrValue::U32List(vec![1, 2]), AttrValue::U32List(vec![2, 1]));
        assert_ne!(AttrValue::U32(1), AttrValue::U64(1));
    }

    #[test]
    fn test_referenced_oids_skips_null() {
        let nh = encode_oid(ObjectType::NextHop, 3);
        assert_eq!(AttrValue::Oid(nh).referenced_oids(), vec![nh]);
        assert_eq!(AttrValue::Oid(NULL_OBJECT_ID).referenced_oids(), Vec::<RawSaiObjectId>::new());
        assert_eq!(
            AttrValue::OidList(vec![nh, NULL_OBJECT_ID, nh]).referenced_oids(),
            vec![nh, nh]
        );
        assert_eq!(AttrValue::U64(nh).referenced_oids(), Vec::<RawSaiObjectId>::new());
    }

    #[test]
    fn test_widening_accessors() {
        assert_eq!(AttrValue::U8(7).as_u64(), Some(7));
        assert_eq!(AttrValue::U64(u64::MAX).as_u32(), None);
        assert_eq!(AttrValue::I8(7).as_u64(), None);
    }
}
