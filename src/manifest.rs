//! Desired-state manifest
//!
//! One table per resource, addressed `[<kind>.<name>]`:
//!
//! ```toml
//! [dimension_value.prod]
//! dimension_id = 4
//! name = "production"
//! nrn = "organization=1:account=2"
//!
//! [scope.checkout]
//! scope_name = "checkout-api"
//! null_application_id = 42
//! dimensions = { environment = "production" }
//! ```
//!
//! Values are checked against the schema of their kind before anything
//! talks to the API.

use anyhow::{Context, Result};
use declarative::{Address, Declaration, Registry, SchemaError, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("`{0}` must be a table of named resources")]
    NotATable(String),

    #[error("{address}: `{field}` must be a string, integer, boolean or table of strings")]
    UnsupportedValue { address: Address, field: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Load and validate the manifest at `path`
pub fn load(path: &Path, registry: &Registry) -> Result<Vec<Declaration>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let declarations = parse(&content, registry)
        .with_context(|| format!("Invalid manifest: {}", path.display()))?;
    log::debug!(
        "Loaded {} declaration(s) from {}",
        declarations.len(),
        path.display()
    );
    Ok(declarations)
}

/// Parse manifest text into declarations, sorted by kind then name
pub fn parse(content: &str, registry: &Registry) -> Result<Vec<Declaration>> {
    let document: toml::Table = toml::from_str(content).context("Failed to parse TOML")?;

    let mut declarations = Vec::new();
    for (kind, resources) in document {
        let lifecycle = registry.require(&kind)?;
        let toml::Value::Table(resources) = resources else {
            return Err(ManifestError::NotATable(kind).into());
        };

        for (name, body) in resources {
            let address = Address::new(kind.clone(), name);
            let toml::Value::Table(body) = body else {
                return Err(ManifestError::NotATable(address.to_string()).into());
            };

            let mut raw = BTreeMap::new();
            for (field, value) in body {
                let value = convert(&address, &field, value)?;
                raw.insert(field, value);
            }
            let config = lifecycle
                .schema()
                .validate(&raw)
                .map_err(ManifestError::from)?;
            declarations.push(Declaration { address, config });
        }
    }
    Ok(declarations)
}

fn convert(address: &Address, field: &str, value: toml::Value) -> Result<Value, ManifestError> {
    let unsupported = || ManifestError::UnsupportedValue {
        address: address.clone(),
        field: field.to_string(),
    };

    match value {
        toml::Value::String(s) => Ok(Value::String(s)),
        toml::Value::Integer(i) => Ok(Value::Int(i)),
        toml::Value::Boolean(b) => Ok(Value::Bool(b)),
        toml::Value::Table(table) => table
            .into_iter()
            .map(|(k, v)| match v {
                toml::Value::String(s) => Ok((k, s)),
                _ => Err(unsupported()),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Value::Map),
        _ => Err(unsupported()),
    }
}
