//! Per-type schemas and the process-wide registry.

use super::{catalog, AttrId, AttrSpec, Attribute};
use crate::error::{SaiError, SaiResult};
use crate::types::{ObjectType, NULL_OBJECT_ID};
use crate::value::AttrValue;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// All attribute specs of one object type.
#[derive(Debug)]
pub struct ObjectSchema {
    object_type: ObjectType,
    attrs: BTreeMap<AttrId, AttrSpec>,
    by_name: HashMap<&'static str, AttrId>,
}

impl ObjectSchema {
    /// Starts a schema whose attribute names come from `names`.
    pub fn builder(
        object_type: ObjectType,
        names: &'static [(&'static str, AttrId)],
    ) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            object_type,
            names,
            attrs: Vec::new(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn get(&self, id: AttrId) -> Option<&AttrSpec> {
        self.attrs.get(&id)
    }

    pub fn attrs(&self) -> impl Iterator<Item = &AttrSpec> {
        self.attrs.values()
    }

    /// Key attributes in ascending id order.
    pub fn key_attrs(&self) -> impl Iterator<Item = &AttrSpec> {
        self.attrs.values().filter(|spec| spec.key)
    }

    /// True for entry objects, whose identity is a natural key.
    pub fn is_entry(&self) -> bool {
        self.attrs.values().any(|spec| spec.key)
    }
}

/// Builder for [`ObjectSchema`].
pub struct ObjectSchemaBuilder {
    object_type: ObjectType,
    names: &'static [(&'static str, AttrId)],
    attrs: Vec<AttrSpec>,
}

impl ObjectSchemaBuilder {
    pub fn attr(mut self, spec: AttrSpec) -> Self {
        self.attrs.push(spec);
        self
    }

    pub fn build(self) -> ObjectSchema {
        let mut attrs = BTreeMap::new();
        let mut by_name = HashMap::new();
        for mut spec in self.attrs {
            if let Some((name, _)) = self.names.iter().find(|(_, id)| *id == spec.id) {
                spec.name = name;
                by_name.insert(*name, spec.id);
            }
            debug_assert!(!spec.name.is_empty(), "unnamed attribute 0x{:x}", spec.id);
            attrs.insert(spec.id, spec);
        }
        ObjectSchema {
            object_type: self.object_type,
            attrs,
            by_name,
        }
    }
}

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| SchemaRegistry::new(catalog::schemas()));

/// Every object schema, keyed by object type.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<ObjectType, ObjectSchema>,
}

impl SchemaRegistry {
    fn new(schemas: Vec<ObjectSchema>) -> Self {
        let schemas: HashMap<_, _> = schemas
            .into_iter()
            .map(|schema| (schema.object_type, schema))
            .collect();
        debug!("Schema registry built with {} object types", schemas.len());
        SchemaRegistry { schemas }
    }

    /// The registry built from the catalog on first use.
    pub fn global() -> &'static SchemaRegistry {
        &REGISTRY
    }

    pub fn schema(&self, object_type: ObjectType) -> Option<&ObjectSchema> {
        self.schemas.get(&object_type)
    }

    /// Object types that have a schema, in numeric order.
    pub fn object_types(&self) -> Vec<ObjectType> {
        let mut types: Vec<_> = self.schemas.keys().copied().collect();
        types.sort();
        types
    }

    /// # Errors
    ///
    /// `UnknownAttribute` if the type has no schema or no such attribute.
    pub fn lookup(&self, object_type: ObjectType, attr_id: AttrId) -> SaiResult<&AttrSpec> {
        self.schemas
            .get(&object_type)
            .and_then(|schema| schema.get(attr_id))
            .ok_or(SaiError::UnknownAttribute {
                object_type,
                attr_id,
            })
    }

    /// Looks an attribute up by its `SAI_<TYPE>_ATTR_<NAME>` name.
    pub fn lookup_by_name(&self, object_type: ObjectType, name: &str) -> SaiResult<&AttrSpec> {
        self.schemas
            .get(&object_type)
            .and_then(|schema| schema.by_name.get(name).and_then(|id| schema.get(*id)))
            .ok_or_else(|| SaiError::UnknownAttributeName {
                object_type,
                name: name.to_string(),
            })
    }

    /// Resolves `name` and parses `text` as its value.
    pub fn parse_attribute(
        &self,
        object_type: ObjectType,
        name: &str,
        text: &str,
    ) -> SaiResult<Attribute> {
        let spec = self.lookup_by_name(object_type, name)?;
        Ok(Attribute::new(spec.id, spec.parse_value(text)?))
    }

    /// Validates a create request and returns the attribute map the new
    /// object starts with: supplied values plus defaults. Statistic
    /// attributes are left out; they live in stat cells.
    ///
    /// Checks run in a fixed order: unknown attribute, duplicate or
    /// read-only attribute, value checks per attribute, then mandatory
    /// attributes.
    pub fn validate_create(
        &self,
        object_type: ObjectType,
        attrs: &[Attribute],
    ) -> SaiResult<BTreeMap<AttrId, AttrValue>> {
        let mut seen = BTreeSet::new();
        for attr in attrs {
            let spec = self.lookup(object_type, attr.id)?;
            if !seen.insert(attr.id) {
                return Err(SaiError::AttributeNotSettable {
                    attr: spec.name,
                    reason: "duplicated in request",
                });
            }
            if spec.is_read_only() {
                return Err(SaiError::AttributeNotSettable {
                    attr: spec.name,
                    reason: "read-only",
                });
            }
        }

        for attr in attrs {
            let spec = self.lookup(object_type, attr.id)?;
            check_value(spec, &attr.value)?;
        }

        let mut values: BTreeMap<AttrId, AttrValue> = attrs
            .iter()
            .map(|attr| (attr.id, attr.value.clone()))
            .collect();

        let schema = self.schemas.get(&object_type).ok_or(SaiError::UnknownAttribute {
            object_type,
            attr_id: 0,
        })?;
        for spec in schema.attrs() {
            if spec.statistic {
                values.remove(&spec.id);
                continue;
            }
            if values.contains_key(&spec.id) {
                continue;
            }
            if let Some(default) = &spec.default {
                values.insert(spec.id, default.clone());
            }
        }

        for spec in schema.attrs() {
            if spec.statistic || values.contains_key(&spec.id) {
                continue;
            }
            let required = spec.mandatory
                || spec.mandatory_when.is_some_and(|(cond, allowed)| {
                    values
                        .get(&cond)
                        .and_then(AttrValue::as_enum)
                        .is_some_and(|v| allowed.contains(&v))
                });
            if required {
                return Err(SaiError::MissingMandatoryAttribute {
                    object_type,
                    attr: spec.name,
                });
            }
        }

        Ok(values)
    }

    /// Validates a `Set` of `attr` on an object of `object_type`.
    pub fn validate_set(&self, object_type: ObjectType, attr: &Attribute) -> SaiResult<&AttrSpec> {
        let spec = self.lookup(object_type, attr.id)?;
        let reason = if spec.key {
            Some("key attribute")
        } else if spec.is_create_only() {
            Some("create-only")
        } else if spec.is_read_only() {
            Some("read-only")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(SaiError::AttributeNotSettable {
                attr: spec.name,
                reason,
            });
        }
        check_value(spec, &attr.value)?;
        Ok(spec)
    }
}

/// Kind, enum range, null reference and predicate checks for one value.
fn check_value(spec: &AttrSpec, value: &AttrValue) -> SaiResult<()> {
    if value.kind() != spec.kind {
        return Err(SaiError::ValueKindMismatch {
            attr: spec.name,
            expected: spec.kind,
            actual: value.kind(),
        });
    }

    let invalid = || SaiError::InvalidValue {
        attr: spec.name,
        value: spec.format_value(value),
    };

    if let Some(meta) = spec.enum_meta {
        let in_range = match value {
            AttrValue::Enum(v) => meta.contains(*v),
            AttrValue::EnumList(values) => values.iter().all(|v| meta.contains(*v)),
            _ => true,
        };
        if !in_range {
            return Err(invalid());
        }
    }

    match value {
        AttrValue::Oid(oid) if *oid == NULL_OBJECT_ID && !spec.allow_null => {
            return Err(invalid());
        }
        AttrValue::OidList(oids) if oids.contains(&NULL_OBJECT_ID) => {
            return Err(invalid());
        }
        _ => {}
    }

    if let Some(validator) = spec.validator {
        if !validator(value) {
            return Err(invalid());
        }
    }
    Ok(())
}
