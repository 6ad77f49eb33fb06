//! Diff builder - turns change flags into the smallest possible scope payload
//!
//! Everything here is pure: the lifecycle adapter computes a [`ScopeChanges`]
//! from the declarative collaborator, and these functions only look at the
//! flags and the desired values.

use npclient::{
    Capabilities, MemorySize, NewScope, NrnPatch, RequestedSpec, ScopePatch, ServerlessHandler,
    ServerlessRuntime, ServerlessTimeout, Visibility,
};
use std::collections::BTreeMap;

/// Reachability sent with every new scope
pub const DEFAULT_REACHABILITY: &str = "account";

/// Desired attributes of a scope, gathered once from declared fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDesired {
    pub name: String,
    pub application_id: u64,
    pub scope_type: String,
    pub capabilities: CapabilityValues,
    pub dimensions: BTreeMap<String, String>,
    /// Secondary attributes written to the NRN record after create
    pub nrn: NrnPatch,
}

/// Flat capability values of a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityValues {
    pub runtime_id: String,
    pub handler_name: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    pub ephemeral_storage_mb: u32,
}

/// Which updatable fields differ from the recorded state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeChanges {
    pub name: bool,
    pub dimensions: bool,
    pub runtime_id: bool,
    pub handler_name: bool,
    pub timeout: bool,
    pub memory: bool,
}

impl ScopeChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Capability sub-objects for the changed capability fields only
pub fn build_capabilities(changes: &ScopeChanges, values: &CapabilityValues) -> Capabilities {
    let mut capabilities = Capabilities::default();
    if changes.runtime_id {
        capabilities.serverless_runtime = Some(ServerlessRuntime::new(&values.runtime_id));
    }
    if changes.handler_name {
        capabilities.serverless_handler = Some(ServerlessHandler {
            name: values.handler_name.clone(),
        });
    }
    if changes.timeout {
        capabilities.serverless_timeout = Some(ServerlessTimeout {
            timeout_in_seconds: values.timeout_secs,
        });
    }
    if changes.memory {
        capabilities.serverless_memory = Some(MemorySize {
            memory_in_mb: values.memory_mb,
        });
    }
    capabilities
}

/// Partial update for `changes`, or `None` when there is nothing to send
pub fn build_scope_patch(changes: &ScopeChanges, desired: &ScopeDesired) -> Option<ScopePatch> {
    let mut patch = ScopePatch::default();

    if changes.name {
        patch.name = Some(desired.name.clone());
    }
    if changes.dimensions {
        patch.dimensions = Some(desired.dimensions.clone());
    }

    let capabilities = build_capabilities(changes, &desired.capabilities);
    if capabilities != Capabilities::default() {
        patch.capabilities = Some(capabilities);
    }

    (!patch.is_empty()).then_some(patch)
}

/// Full create payload
pub fn build_new_scope(desired: &ScopeDesired) -> NewScope {
    let values = &desired.capabilities;
    NewScope {
        name: desired.name.clone(),
        application_id: desired.application_id,
        scope_type: desired.scope_type.clone(),
        external_created: true,
        requested_spec: RequestedSpec::standard(),
        capabilities: Capabilities {
            visibility: Some(Visibility {
                reachability: DEFAULT_REACHABILITY.to_string(),
            }),
            serverless_runtime: Some(ServerlessRuntime::new(&values.runtime_id)),
            serverless_handler: Some(ServerlessHandler {
                name: values.handler_name.clone(),
            }),
            serverless_timeout: Some(ServerlessTimeout {
                timeout_in_seconds: values.timeout_secs,
            }),
            serverless_ephemeral_storage: Some(MemorySize {
                memory_in_mb: values.ephemeral_storage_mb,
            }),
            serverless_memory: Some(MemorySize {
                memory_in_mb: values.memory_mb,
            }),
        },
        dimensions: desired.dimensions.clone(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{Value, json};

    pub(crate) fn desired() -> ScopeDesired {
        ScopeDesired {
            name: "checkout-api".to_string(),
            application_id: 42,
            scope_type: "serverless".to_string(),
            capabilities: CapabilityValues {
                runtime_id: "nodejs18.x".to_string(),
                handler_name: "index.handler".to_string(),
                timeout_secs: 10,
                memory_mb: 128,
                ephemeral_storage_mb: 512,
            },
            dimensions: BTreeMap::from([("environment".to_string(), "prod".to_string())]),
            nrn: NrnPatch {
                log_group_name: Some("/aws/lambda/checkout".to_string()),
                lambda_function_name: Some("checkout".to_string()),
                lambda_current_function_version: Some("1".to_string()),
                lambda_function_role: Some("checkout-role".to_string()),
                lambda_function_main_alias: Some("main".to_string()),
                ..Default::default()
            },
        }
    }

    fn changes_from_bits(bits: u8) -> ScopeChanges {
        ScopeChanges {
            name: bits & 1 != 0,
            dimensions: bits & 2 != 0,
            runtime_id: bits & 4 != 0,
            handler_name: bits & 8 != 0,
            timeout: bits & 16 != 0,
            memory: bits & 32 != 0,
        }
    }

    fn keys(value: Option<&Value>) -> Vec<String> {
        value
            .and_then(Value::as_object)
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_patch_contains_exactly_changed_fields() {
        let desired = desired();
        for bits in 0..64 {
            let changes = changes_from_bits(bits);
            let patch = build_scope_patch(&changes, &desired);

            if changes.is_empty() {
                assert!(patch.is_none(), "bits {bits:#08b}");
                continue;
            }
            let body = serde_json::to_value(patch.unwrap()).unwrap();

            let mut expected_top = Vec::new();
            if changes.name {
                expected_top.push("name");
            }
            if changes.dimensions {
                expected_top.push("dimensions");
            }
            let any_capability =
                changes.runtime_id || changes.handler_name || changes.timeout || changes.memory;
            if any_capability {
                expected_top.push("capabilities");
            }
            expected_top.sort_unstable();
            assert_eq!(keys(Some(&body)), expected_top, "bits {bits:#08b}");

            let mut expected_caps = Vec::new();
            if changes.handler_name {
                expected_caps.push("serverless_handler");
            }
            if changes.memory {
                expected_caps.push("serverless_memory");
            }
            if changes.runtime_id {
                expected_caps.push("serverless_runtime");
            }
            if changes.timeout {
                expected_caps.push("serverless_timeout");
            }
            assert_eq!(keys(body.get("capabilities")), expected_caps, "bits {bits:#08b}");
        }
    }

    #[test]
    fn test_memory_only_patch() {
        let mut desired = desired();
        desired.capabilities.memory_mb = 256;
        let changes = ScopeChanges {
            memory: true,
            ..Default::default()
        };

        let body = serde_json::to_value(build_scope_patch(&changes, &desired).unwrap()).unwrap();

        assert_eq!(
            body,
            json!({"capabilities": {"serverless_memory": {"memory_in_mb": 256}}})
        );
    }

    #[test]
    fn test_runtime_pairs_provider_with_id() {
        let changes = ScopeChanges {
            runtime_id: true,
            ..Default::default()
        };
        let body = serde_json::to_value(build_scope_patch(&changes, &desired()).unwrap()).unwrap();
        assert_eq!(
            body["capabilities"]["serverless_runtime"],
            json!({"provider": "aws_lambda", "id": "nodejs18.x"})
        );
    }

    #[test]
    fn test_zero_values_are_still_sent() {
        let mut desired = desired();
        desired.capabilities.timeout_secs = 0;
        let changes = ScopeChanges {
            timeout: true,
            ..Default::default()
        };
        let body = serde_json::to_value(build_scope_patch(&changes, &desired).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"capabilities": {"serverless_timeout": {"timeout_in_seconds": 0}}})
        );
    }

    #[test]
    fn test_new_scope_payload() {
        let body = serde_json::to_value(build_new_scope(&desired())).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "checkout-api",
                "application_id": 42,
                "type": "serverless",
                "external_created": true,
                "requested_spec": {"memory_in_gb": 0.5, "cpu_profile": "standard", "local_storage": 8},
                "capabilities": {
                    "visibility": {"reachability": "account"},
                    "serverless_runtime": {"provider": "aws_lambda", "id": "nodejs18.x"},
                    "serverless_handler": {"name": "index.handler"},
                    "serverless_timeout": {"timeout_in_seconds": 10},
                    "serverless_ephemeral_storage": {"memory_in_mb": 512},
                    "serverless_memory": {"memory_in_mb": 128}
                },
                "dimensions": {"environment": "prod"}
            })
        );
    }
}
