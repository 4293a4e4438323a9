//! Blocking client for the LibreNMS device API.
//!
//! # Overview
//! Two operations: check whether a device is registered, and register a new
//! device for SNMP polling. Requests are built and responses parsed as plain
//! data; a `Transport` performs the actual round-trip (ureq by default).
//!
//! # Design
//! - `ClientConfig` is immutable: base URL with `/api/v0`, token, TLS flag.
//! - `LibreNmsClient` pairs `build_*` / `parse_*` halves per operation, so
//!   the status-code rules are testable without a server.
//! - No retries, caching or token refresh. Every failure surfaces as an
//!   `ApiError` to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::LibreNmsClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{AddDeviceRequest, AddDeviceResponse, DeviceLookup, SnmpVersion, DEFAULT_SNMP_VERSION};
