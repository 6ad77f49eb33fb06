//! Field schemas and validation of declared values
//!
//! A [`Schema`] describes every field a resource kind accepts. Validation
//! happens once, here; lifecycle hooks can then trust that every value they
//! read has the declared type.

use crate::types::{FieldKind, Value};
use std::collections::BTreeMap;

/// Validated desired values for one resource, keyed by field name
pub type Config = BTreeMap<String, Value>;

/// Errors raised while validating declared values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{kind}: unknown field `{field}`")]
    UnknownField { kind: String, field: String },

    #[error("{kind}: missing required field `{field}`")]
    MissingRequired { kind: String, field: String },

    #[error("{kind}: field `{field}` expects {expected}, found {found}")]
    TypeMismatch {
        kind: String,
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("{kind}: field `{field}` is computed and cannot be set")]
    ComputedField { kind: String, field: String },
}

/// How a field gets its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Must be declared
    Required,
    /// May be declared; falls back to the default when present
    Optional { default: Option<Value> },
    /// Only ever set by the lifecycle hooks
    Computed,
}

/// Schema of a single field
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    /// Changing this field requires replacing the resource
    pub force_new: bool,
}

impl FieldSchema {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            force_new: false,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional { default: None },
            force_new: false,
        }
    }

    pub fn computed(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Computed,
            force_new: false,
        }
    }

    /// Set the default used when an optional field is not declared
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::Optional {
            default: Some(value.into()),
        };
        self
    }

    /// Mark the field as create-only
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.presence, Presence::Computed)
    }
}

/// Schema of a resource kind
#[derive(Debug, Clone)]
pub struct Schema {
    kind: &'static str,
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(kind: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Fields a user may declare (everything except computed fields)
    pub fn declared_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| !f.is_computed())
    }

    /// Validate raw declared values and apply defaults
    pub fn validate(&self, raw: &BTreeMap<String, Value>) -> Result<Config, SchemaError> {
        for (name, value) in raw {
            let field = self.field(name).ok_or_else(|| SchemaError::UnknownField {
                kind: self.kind.to_string(),
                field: name.clone(),
            })?;
            if field.is_computed() {
                return Err(SchemaError::ComputedField {
                    kind: self.kind.to_string(),
                    field: name.clone(),
                });
            }
            if value.kind() != field.kind {
                return Err(SchemaError::TypeMismatch {
                    kind: self.kind.to_string(),
                    field: name.clone(),
                    expected: field.kind,
                    found: value.kind(),
                });
            }
        }

        let mut config = Config::new();
        for field in self.declared_fields() {
            match (raw.get(field.name), &field.presence) {
                (Some(value), _) => {
                    config.insert(field.name.to_string(), value.clone());
                }
                (None, Presence::Required) => {
                    return Err(SchemaError::MissingRequired {
                        kind: self.kind.to_string(),
                        field: field.name.to_string(),
                    });
                }
                (None, Presence::Optional { default: Some(d) }) => {
                    config.insert(field.name.to_string(), d.clone());
                }
                (None, _) => {}
            }
        }
        Ok(config)
    }
}
