//! # npclient
//!
//! Blocking client for the nullplatform control-plane API.
//!
//! This crate provides:
//! - Typed create/read/patch/delete calls for scopes, NRN records,
//!   dimension values and providers
//! - Specification slug/id lookups
//! - A [`Transport`] seam with a real HTTP implementation and a scripted
//!   [`MockTransport`] for tests
//!
//! Status codes are mapped to [`Error`] variants per operation; nothing is
//! retried.
//!
//! ## Example
//!
//! ```no_run
//! use npclient::NullClient;
//! use std::time::Duration;
//!
//! let client = NullClient::new(
//!     "https://api.nullplatform.com",
//!     Some("my-api-key"),
//!     Duration::from_secs(30),
//! );
//!
//! let scope = client.get_scope("901").expect("scope lookup failed");
//! println!("{} is {}", scope.nrn, scope.status);
//! ```

pub mod client;
pub mod dimension;
pub mod error;
pub mod provider;
pub mod scope;
pub mod transport;
pub mod types;

pub use client::NullClient;
pub use error::{Error, ErrorCategory, Result};
pub use transport::http::HttpTransport;
pub use transport::{Method, MockTransport, RecordedRequest, Response, Transport};
pub use types::{
    Capabilities, DimensionValue, MemorySize, NewScope, NpProvider, NpSpecification, NrnPatch,
    ProviderPatch, RequestedSpec, Scope, ScopePatch, ScopeStatus, ServerlessHandler,
    ServerlessRuntime, ServerlessTimeout, Visibility,
};
