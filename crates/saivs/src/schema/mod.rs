//! Object schema registry.
//!
//! The registry is the single source of truth for what may be stored on an
//! object: for every (object type, attribute id) it records the value kind,
//! mutability, mandatory-on-create rule, default and valid-value predicate.
//!
//! # Architecture
//!
//! - [`AttrSpec`]: one attribute's metadata, built with `with_*` modifiers
//! - [`ObjectSchema`]: all attribute specs of one object type
//! - [`SchemaRegistry`]: every schema, built once from [`catalog`] on first
//!   use and immutable afterwards, so reads need no locking
//!
//! Adding an object type means adding a schema function to the catalog;
//! nothing else in the engine switches on object type to validate.

pub mod catalog;
mod registry;

pub use registry::{ObjectSchema, ObjectSchemaBuilder, SchemaRegistry};

use crate::types::ObjectType;
use crate::value::{AttrValue, ValueKind};
use serde::{Deserialize, Serialize};

/// Attribute id, unique within one object type.
pub type AttrId = u32;

/// An (attribute id, value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttrId,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(id: AttrId, value: AttrValue) -> Self {
        Attribute { id, value }
    }
}

/// Extra constraint on a value beyond its kind.
pub type Validator = fn(&AttrValue) -> bool;

/// When an attribute may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrAccess {
    /// Only on create; `Set` is rejected.
    CreateOnly,
    /// On create and afterwards through `Set`.
    CreateAndSet,
    /// Maintained by the engine; never supplied by callers.
    ReadOnly,
}

/// Names and values of one SAI enum.
#[derive(Debug)]
pub struct EnumMeta {
    pub values: &'static [(&'static str, i32)],
}

impl EnumMeta {
    pub fn contains(&self, value: i32) -> bool {
        self.values.iter().any(|(_, v)| *v == value)
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| *n)
    }
}

/// Metadata of one attribute.
#[derive(Debug, Clone)]
pub struct AttrSpec {
    pub id: AttrId,
    /// `SAI_<TYPE>_ATTR_<NAME>`; filled in from the catalog name table.
    pub name: &'static str,
    pub kind: ValueKind,
    pub access: AttrAccess,
    /// Must be supplied on create unless a default exists.
    pub mandatory: bool,
    /// Mandatory only when another enum attribute holds one of these values.
    pub mandatory_when: Option<(AttrId, &'static [i32])>,
    /// Part of the natural key of an entry object.
    pub key: bool,
    /// Counter backed by a stat cell rather than the attribute map.
    pub statistic: bool,
    pub default: Option<AttrValue>,
    pub enum_meta: Option<&'static EnumMeta>,
    /// Object types an `Oid`/`OidList` value may reference.
    pub object_types: &'static [ObjectType],
    /// Whether a null object id is a legal `Oid` value.
    pub allow_null: bool,
    pub validator: Option<Validator>,
}

impl AttrSpec {
    fn new(id: AttrId, kind: ValueKind, access: AttrAccess) -> Self {
        AttrSpec {
            id,
            name: "",
            kind,
            access,
            mandatory: false,
            mandatory_when: None,
            key: false,
            statistic: false,
            default: None,
            enum_meta: None,
            object_types: &[],
            allow_null: false,
            validator: None,
        }
    }

    pub fn create_only(id: AttrId, kind: ValueKind) -> Self {
        Self::new(id, kind, AttrAccess::CreateOnly)
    }

    pub fn create_and_set(id: AttrId, kind: ValueKind) -> Self {
        Self::new(id, kind, AttrAccess::CreateAndSet)
    }

    pub fn read_only(id: AttrId, kind: ValueKind) -> Self {
        Self::new(id, kind, AttrAccess::ReadOnly)
    }

    /// A natural-key attribute: create-only and mandatory.
    pub fn key(id: AttrId, kind: ValueKind) -> Self {
        let mut spec = Self::new(id, kind, AttrAccess::CreateOnly);
        spec.mandatory = true;
        spec.key = true;
        spec
    }

    /// A `u64` counter that can only be reset to zero.
    pub fn statistic(id: AttrId) -> Self {
        let mut spec = Self::new(id, ValueKind::U64, AttrAccess::CreateAndSet);
        spec.statistic = true;
        spec.default = Some(AttrValue::U64(0));
        spec.validator = Some(|v| matches!(v, AttrValue::U64(0)));
        spec
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn mandatory_when(mut self, attr: AttrId, values: &'static [i32]) -> Self {
        self.mandatory_when = Some((attr, values));
        self
    }

    pub fn with_default(mut self, value: AttrValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_enum(mut self, meta: &'static EnumMeta) -> Self {
        self.enum_meta = Some(meta);
        self
    }

    pub fn with_objects(mut self, object_types: &'static [ObjectType]) -> Self {
        self.object_types = object_types;
        self
    }

    /// Allows the null object id and makes it the default.
    pub fn nullable(mut self) -> Self {
        self.allow_null = true;
        self.default = Some(AttrValue::Oid(crate::types::NULL_OBJECT_ID));
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn is_create_only(&self) -> bool {
        self.access == AttrAccess::CreateOnly
    }

    pub fn is_read_only(&self) -> bool {
        self.access == AttrAccess::ReadOnly
    }

    /// Formats `value`, using enum constant names where known.
    pub fn format_value(&self, value: &AttrValue) -> String {
        match (self.enum_meta, value) {
            (Some(meta), AttrValue::Enum(v)) => meta
                .name_of(*v)
                .map(str::to_string)
                .unwrap_or_else(|| v.to_string()),
            (Some(meta), AttrValue::EnumList(values)) if !values.is_empty() => {
                let names: Vec<String> = values
                    .iter()
                    .map(|v| meta.name_of(*v).map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect();
                format!("{}:{}", names.len(), names.join(","))
            }
            _ => value.to_string(),
        }
    }

    /// Parses the text form of a value for this attribute.
    ///
    /// Enum attributes accept constant names as well as numbers.
    pub fn parse_value(&self, text: &str) -> crate::SaiResult<AttrValue> {
        let Some(meta) = self.enum_meta else {
            return AttrValue::make(self.kind, text);
        };
        match self.kind {
            ValueKind::Enum => match meta.value_of(text.trim()) {
                Some(v) => Ok(AttrValue::Enum(v)),
                None => AttrValue::make(self.kind, text),
            },
            ValueKind::EnumList => {
                let translated = match text.split_once(':') {
                    Some((count, items)) if !items.is_empty() && items != "null" => {
                        let items: Vec<String> = items
                            .split(',')
                            .map(|item| match meta.value_of(item.trim()) {
                                Some(v) => v.to_string(),
                                None => item.to_string(),
                            })
                            .collect();
                        format!("{}:{}", count, items.join(","))
                    }
                    _ => text.to_string(),
                };
                AttrValue::make(self.kind, &translated)
            }
            _ => AttrValue::make(self.kind, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::catalog::{next_hop_group, next_hop_group_type, packet_action, route_entry};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enum_names_parse_and_format() {
        let registry = SchemaRegistry::global();
        let spec = registry
            .lookup(ObjectType::RouteEntry, route_entry::PACKET_ACTION)
            .unwrap();
        assert_eq!(
            spec.parse_value("SAI_PACKET_ACTION_TRAP").unwrap(),
            AttrValue::Enum(packet_action::TRAP)
        );
        assert_eq!(spec.parse_value("0").unwrap(), AttrValue::Enum(packet_action::DROP));
        assert_eq!(
            spec.format_value(&AttrValue::Enum(packet_action::FORWARD)),
            "SAI_PACKET_ACTION_FORWARD"
        );
        assert!(spec.parse_value("SAI_PACKET_ACTION_BOGUS").is_err());
    }

    #[test]
    fn test_statistic_spec() {
        let spec = AttrSpec::statistic(7);
        assert!(spec.statistic);
        assert_eq!(spec.default, Some(AttrValue::U64(0)));
        let validator = spec.validator.unwrap();
        assert!(validator(&AttrValue::U64(0)));
        assert!(!validator(&AttrValue::U64(5)));
    }

    #[test]
    fn test_enum_meta_lookup() {
        let meta = &next_hop_group_type::META;
        assert_eq!(meta.value_of("SAI_NEXT_HOP_GROUP_TYPE_PROTECTION"), Some(next_hop_group_type::PROTECTION));
        assert_eq!(meta.name_of(next_hop_group_type::FINE_GRAIN_ECMP), Some("SAI_NEXT_HOP_GROUP_TYPE_FINE_GRAIN_ECMP"));
        assert!(!meta.contains(42));

        let spec = SchemaRegistry::global()
            .lookup(ObjectType::NextHopGroup, next_hop_group::TYPE)
            .unwrap();
        assert_eq!(spec.name, "SAI_NEXT_HOP_GROUP_ATTR_TYPE");
    }
}
