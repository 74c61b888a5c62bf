//! Text form of attribute values, in the style of sairedis serialization.
//!
//! | kind      | form                          |
//! |-----------|-------------------------------|
//! | bool      | `true`, `false`               |
//! | integers  | decimal, or `0x` hex          |
//! | object id | `oid:0x2a`                    |
//! | range     | `min,max`                     |
//! | lists     | `N:a,b,c`, `0:null` for empty |
//! | map list  | `N:k=v,k=v`                   |
//! | chardata  | the text itself               |

use super::{AttrValue, U32Range, ValueKind};
use crate::error::{SaiError, SaiResult};
use crate::types::RawSaiObjectId;
use itertools::Itertools;
use std::fmt::Display;
use std::str::FromStr;

/// Parses `oid:0x…`, `0x…` or `null`.
pub fn parse_oid(raw: &str) -> Option<RawSaiObjectId> {
    let raw = raw.trim();
    if raw == "null" {
        return Some(0);
    }
    let hex = raw.strip_prefix("oid:").unwrap_or(raw);
    let hex = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X"))?;
    u64::from_str_radix(hex, 16).ok()
}

pub fn format_oid(oid: RawSaiObjectId) -> String {
    format!("oid:0x{:x}", oid)
}

fn parse_unsigned<T: TryFrom<u64>>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    let value = match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok()?,
        None => raw.parse::<u64>().ok()?,
    };
    T::try_from(value).ok()
}

fn parse_signed<T: TryFrom<i64>>(raw: &str) -> Option<T> {
    raw.trim().parse::<i64>().ok().and_then(|v| T::try_from(v).ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_from_str<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn parse_pair(raw: &str) -> Option<(u32, u32)> {
    let (k, v) = raw.split_once('=')?;
    Some((parse_unsigned(k)?, parse_unsigned(v)?))
}

fn parse_range(raw: &str) -> Option<U32Range> {
    let (min, max) = raw.split_once(',')?;
    let range = U32Range::new(parse_unsigned(min)?, parse_unsigned(max)?);
    (range.min <= range.max).then_some(range)
}

/// Splits `N:e1,e2,…` and checks the declared count.
fn parse_list<T>(raw: &str, element: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    let (count, rest) = raw.trim().split_once(':')?;
    let count: usize = count.parse().ok()?;
    if rest.is_empty() || rest == "null" {
        return (count == 0).then(Vec::new);
    }
    let items = rest.split(',').map(element).collect::<Option<Vec<T>>>()?;
    (items.len() == count).then_some(items)
}

pub(super) fn parse(kind: ValueKind, raw: &str) -> SaiResult<AttrValue> {
    let value = match kind {
        ValueKind::Bool => parse_bool(raw).map(AttrValue::Bool),
        ValueKind::U8 => parse_unsigned(raw).map(AttrValue::U8),
        ValueKind::U16 => parse_unsigned(raw).map(AttrValue::U16),
        ValueKind::U32 => parse_unsigned(raw).map(AttrValue::U32),
        ValueKind::U64 => parse_unsigned(raw).map(AttrValue::U64),
        ValueKind::I8 => parse_signed(raw).map(AttrValue::I8),
        ValueKind::I16 => parse_signed(raw).map(AttrValue::I16),
        ValueKind::I32 => parse_signed(raw).map(AttrValue::I32),
        ValueKind::I64 => parse_signed(raw).map(AttrValue::I64),
        ValueKind::Enum => parse_signed(raw).map(AttrValue::Enum),
        ValueKind::Mac => parse_from_str(raw).map(AttrValue::Mac),
        ValueKind::Ipv4 => parse_from_str(raw).map(AttrValue::Ipv4),
        ValueKind::Ipv6 => parse_from_str(raw).map(AttrValue::Ipv6),
        ValueKind::IpAddress => parse_from_str(raw).map(AttrValue::IpAddress),
        ValueKind::IpPrefix => parse_from_str(raw).map(AttrValue::IpPrefix),
        ValueKind::U32Range => parse_range(raw).map(AttrValue::U32Range),
        ValueKind::Oid => parse_oid(raw).map(AttrValue::Oid),
        ValueKind::BoolList => parse_list(raw, parse_bool).map(AttrValue::BoolList),
        ValueKind::U8List => parse_list(raw, parse_unsigned).map(AttrValue::U8List),
        ValueKind::U16List => parse_list(raw, parse_unsigned).map(AttrValue::U16List),
        ValueKind::U32List => parse_list(raw, parse_unsigned).map(AttrValue::U32List),
        ValueKind::U64List => parse_list(raw, parse_unsigned).map(AttrValue::U64List),
        ValueKind::I8List => parse_list(raw, parse_signed).map(AttrValue::I8List),
        ValueKind::I16List => parse_list(raw, parse_signed).map(AttrValue::I16List),
        ValueKind::I32List => parse_list(raw, parse_signed).map(AttrValue::I32List),
        ValueKind::I64List => parse_list(raw, parse_signed).map(AttrValue::I64List),
        ValueKind::EnumList => parse_list(raw, parse_signed).map(AttrValue::EnumList),
        ValueKind::MacList => parse_list(raw, parse_from_str).map(AttrValue::MacList),
        ValueKind::Ipv4List => parse_list(raw, parse_from_str).map(AttrValue::Ipv4List),
        ValueKind::Ipv6List => parse_list(raw, parse_from_str).map(AttrValue::Ipv6List),
        ValueKind::IpAddressList => parse_list(raw, parse_from_str).map(AttrValue::IpAddressList),
        ValueKind::OidList => parse_list(raw, parse_oid).map(AttrValue::OidList),
        ValueKind::MapList => parse_list(raw, parse_pair).map(AttrValue::MapList),
        ValueKind::Chardata => Some(AttrValue::Chardata(raw.to_string())),
    };

    value.ok_or_else(|| SaiError::InvalidValueKind {
        kind,
        raw: raw.to_string(),
    })
}

fn list<T: Display>(items: &[T]) -> String {
    if items.is_empty() {
        "0:null".to_string()
    } else {
        format!("{}:{}", items.len(), items.iter().join(","))
    }
}

pub(super) fn format(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(v) => v.to_string(),
        AttrValue::U8(v) => v.to_string(),
        AttrValue::U16(v) => v.to_string(),
        AttrValue::U32(v) => v.to_string(),
        AttrValue::U64(v) => v.to_string(),
        AttrValue::I8(v) => v.to_string(),
        AttrValue::I16(v) => v.to_string(),
        AttrValue::I32(v) => v.to_string(),
        AttrValue::I64(v) => v.to_string(),
        AttrValue::Enum(v) => v.to_string(),
        AttrValue::Mac(v) => v.to_string(),
        AttrValue::Ipv4(v) => v.to_string(),
        AttrValue::Ipv6(v) => v.to_string(),
        AttrValue::IpAddress(v) => v.to_string(),
        AttrValue::IpPrefix(v) => v.to_string(),
        AttrValue::U32Range(r) => format!("{},{}", r.min, r.max),
        AttrValue::Oid(oid) => format_oid(*oid),
        AttrValue::BoolList(v) => list(v),
        AttrValue::U8List(v) => list(v),
        AttrValue::U16List(v) => list(v),
        AttrValue::U32List(v) => list(v),
        AttrValue::U64List(v) => list(v),
        AttrValue::I8List(v) => list(v),
        AttrValue::I16List(v) => list(v),
        AttrValue::I32List(v) => list(v),
        AttrValue::I64List(v) => list(v),
        AttrValue::EnumList(v) => list(v),
        AttrValue::MacList(v) => list(v),
        AttrValue::Ipv4List(v) => list(v),
        AttrValue::Ipv6List(v) => list(v),
        AttrValue::IpAddressList(v) => list(v),
        AttrValue::OidList(v) => list(&v.iter().map(|oid| format_oid(*oid)).collect::<Vec<_>>()),
        AttrValue::MapList(v) => list(&v.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>()),
        AttrValue::Chardata(v) => v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_types::MacAddress;

    #[test]
    fn test_scalars() {
        assert_eq!(parse(ValueKind::Bool, "true").unwrap(), AttrValue::Bool(true));
        assert_eq!(parse(ValueKind::U16, "0x8100").unwrap(), AttrValue::U16(0x8100));
        assert_eq!(parse(ValueKind::I8, "-5").unwrap(), AttrValue::I8(-5));
        assert_eq!(parse(ValueKind::Oid, "oid:0x2a").unwrap(), AttrValue::Oid(0x2a));
        assert_eq!(
            parse(ValueKind::U32Range, "1000,2000").unwrap(),
            AttrValue::U32Range(U32Range::new(1000, 2000))
        );
    }

    #[test]
    fn test_rejects_out_of_range_and_malformed() {
        assert!(parse(ValueKind::U8, "256").is_err());
        assert!(parse(ValueKind::Bool, "yes").is_err());
        assert!(parse(ValueKind::Mac, "00:11:22").is_err());
        assert!(parse(ValueKind::Ipv4, "2001:db8::1").is_err());
        assert!(parse(ValueKind::U32Range, "20,10").is_err());
        assert!(parse(ValueKind::Oid, "42").is_err());
    }

    #[test]
    fn test_list_count_must_match() {
        assert_eq!(
            parse(ValueKind::U32List, "3:1,2,3").unwrap(),
            AttrValue::U32List(vec![1, 2, 3])
        );
        let err = parse(ValueKind::U32List, "2:1,2,3").unwrap_err();
        assert!(matches!(err, SaiError::InvalidValueKind { kind: ValueKind::U32List, .. }));
        assert!(parse(ValueKind::U32List, "1:null").is_err());
        assert_eq!(parse(ValueKind::OidList, "0:null").unwrap(), AttrValue::OidList(vec![]));
    }

    #[test]
    fn test_lists_with_colon_elements() {
        let macs = parse(ValueKind::MacList, "2:00:11:22:33:44:55,66:77:88:99:aa:bb").unwrap();
        assert_eq!(
            macs,
            AttrValue::MacList(vec![
                MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
                MacAddress::new([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]),
            ])
        );
        let oids = parse(ValueKind::OidList, "2:oid:0x1,oid:0x2").unwrap();
        assert_eq!(oids, AttrValue::OidList(vec![1, 2]));
    }

    #[test]
    fn test_format_is_parseable() {
        for (kind, text) in [
            (ValueKind::OidList, "2:oid:0x10,oid:0x20"),
            (ValueKind::MapList, "2:0=1,1=0"),
            (ValueKind::IpPrefix, "10.0.0.0/8"),
            (ValueKind::U8List, "0:null"),
        ] {
            let value = parse(kind, text).unwrap();
            assert_eq!(value.to_string(), text);
        }
    }
}
