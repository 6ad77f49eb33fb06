//! Scope and NRN endpoints.

use crate::client::{NullClient, decode, expect_status};
use crate::error::Result;
use crate::transport::Method;
use crate::types::{NewScope, NrnPatch, Scope, ScopePatch};

/// Collection path for scopes.
pub const SCOPE_PATH: &str = "/scope";

/// Collection path for NRN records.
pub const NRN_PATH: &str = "/nrn";

/// Path of a single scope.
#[must_use]
pub fn scope_path(id: &str) -> String {
    format!("{SCOPE_PATH}/{id}")
}

/// Path of the NRN record keyed by `nrn`.
#[must_use]
pub fn nrn_path(nrn: &str) -> String {
    format!("{NRN_PATH}/{nrn}")
}

impl NullClient {
    /// Create a scope.
    pub fn create_scope(&self, scope: &NewScope) -> Result<Scope> {
        let response = self.send(Method::Post, SCOPE_PATH, Some(scope))?;
        expect_status("creating scope", SCOPE_PATH, &response, &[200])?;
        decode("creating scope", &response)
    }

    /// Fetch a scope by id.
    pub fn get_scope(&self, id: &str) -> Result<Scope> {
        let path = scope_path(id);
        let response = self.send_empty(Method::Get, &path)?;
        expect_status("getting scope", &path, &response, &[200])?;
        decode("getting scope", &response)
    }

    /// Apply a partial update to a scope.
    pub fn patch_scope(&self, id: &str, patch: &ScopePatch) -> Result<()> {
        let path = scope_path(id);
        let response = self.send(Method::Patch, &path, Some(patch))?;
        expect_status("patching scope", &path, &response, &[200, 204])
    }

    /// Patch the secondary attributes of the NRN record `nrn`.
    pub fn patch_nrn(&self, nrn: &str, patch: &NrnPatch) -> Result<()> {
        let path = nrn_path(nrn);
        let response = self.send(Method::Patch, &path, Some(patch))?;
        expect_status("patching nrn", &path, &response, &[200, 204])
    }
}
