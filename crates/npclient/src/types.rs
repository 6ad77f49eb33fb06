//! Wire types for the control-plane API.
//!
//! Field presence is significant in request bodies: every optional member is
//! skipped when `None`, so a partial update never overwrites values the
//! server already holds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Scope
// =============================================================================

/// Provider of the serverless runtime sub-object.
pub const SERVERLESS_PROVIDER: &str = "aws_lambda";

/// Lifecycle status reported for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeStatus {
    Creating,
    #[default]
    Active,
    Updating,
    Deleting,
    Deleted,
    Failed,
    #[serde(other)]
    Unknown,
}

impl ScopeStatus {
    /// Status as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "creating",
            Self::Active => "active",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ScopeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource sizing requested for a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedSpec {
    pub memory_in_gb: f64,
    pub cpu_profile: String,
    pub local_storage: u32,
}

impl RequestedSpec {
    /// The only sizing profile the backend currently accepts.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            memory_in_gb: 0.5,
            cpu_profile: "standard".to_string(),
            local_storage: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub reachability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessRuntime {
    pub provider: String,
    pub id: String,
}

impl ServerlessRuntime {
    /// Runtime sub-object; `provider` is always paired with `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            provider: SERVERLESS_PROVIDER.to_string(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessHandler {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessTimeout {
    pub timeout_in_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySize {
    pub memory_in_mb: u32,
}

/// Capability bundle of a scope.
///
/// Each sub-object is independently omittable. `Capabilities::default()` is
/// the "nothing set" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverless_runtime: Option<ServerlessRuntime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverless_handler: Option<ServerlessHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverless_timeout: Option<ServerlessTimeout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverless_ephemeral_storage: Option<MemorySize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverless_memory: Option<MemorySize>,
}

impl Capabilities {
    /// Whether no sub-object is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /scope`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScope {
    pub name: String,
    pub application_id: u64,
    #[serde(rename = "type")]
    pub scope_type: String,
    pub external_created: bool,
    pub requested_spec: RequestedSpec,
    pub capabilities: Capabilities,
    pub dimensions: BTreeMap<String, String>,
}

/// Body of `PATCH /scope/{id}`. Only set members are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScopeStatus>,
}

impl ScopePatch {
    /// Patch that only moves the scope to `status`.
    #[must_use]
    pub fn status(status: ScopeStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the patch carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A scope as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scope {
    pub id: u64,
    #[serde(default)]
    pub nrn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub application_id: u64,
    #[serde(default, rename = "type")]
    pub scope_type: Option<String>,
    #[serde(default)]
    pub status: ScopeStatus,
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

// =============================================================================
// NRN
// =============================================================================

/// Secondary attributes patched onto a scope's NRN record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NrnPatch {
    #[serde(rename = "aws.s3_assets_bucket", skip_serializing_if = "Option::is_none")]
    pub s3_assets_bucket: Option<String>,
    #[serde(rename = "aws.scope_workflow_role", skip_serializing_if = "Option::is_none")]
    pub scope_workflow_role: Option<String>,
    #[serde(rename = "aws.log_group_name", skip_serializing_if = "Option::is_none")]
    pub log_group_name: Option<String>,
    #[serde(rename = "aws.lambdaFunctionName", skip_serializing_if = "Option::is_none")]
    pub lambda_function_name: Option<String>,
    #[serde(
        rename = "aws.lambdaCurrentFunctionVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub lambda_current_function_version: Option<String>,
    #[serde(rename = "aws.lambdaFunctionRole", skip_serializing_if = "Option::is_none")]
    pub lambda_function_role: Option<String>,
    #[serde(
        rename = "aws.lambdaFunctionMainAlias",
        skip_serializing_if = "Option::is_none"
    )]
    pub lambda_function_main_alias: Option<String>,
    #[serde(rename = "aws.logReader", skip_serializing_if = "Option::is_none")]
    pub log_reader_role: Option<String>,
    #[serde(
        rename = "aws.lambdaFunctionWarmAlias",
        skip_serializing_if = "Option::is_none"
    )]
    pub lambda_function_warm_alias: Option<String>,
}

// =============================================================================
// Dimension values
// =============================================================================

/// A value within a dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub dimension_id: u64,
    pub name: String,
    pub nrn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// =============================================================================
// Providers and specifications
// =============================================================================

/// A provider record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpProvider {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nrn: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions: BTreeMap<String, String>,
    #[serde(
        default,
        rename = "specificationId",
        skip_serializing_if = "String::is_empty"
    )]
    pub specification_id: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Partial update of a provider; only attributes are mutable.
///
/// `attributes` is always serialized, so an empty map clears them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProviderPatch<'a> {
    pub attributes: &'a serde_json::Map<String, serde_json::Value>,
}

/// A provider specification reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NpSpecification {
    pub id: String,
    pub slug: String,
}

/// Structured error body returned on 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrors {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}
