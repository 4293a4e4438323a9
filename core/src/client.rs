//! Device lookup and registration against a LibreNMS instance.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Both halves are pure. `device_exists` and `add_device` glue them together
//! through the client's `Transport`, one blocking round-trip per request,
//! with no retries.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{AddDeviceRequest, AddDeviceResponse, DeviceLookup, SnmpVersion, DEFAULT_SNMP_VERSION};

/// Characters escaped when a hostname becomes a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Blocking client for the LibreNMS device API.
///
/// Holds only immutable configuration and a transport, so a shared
/// reference can be used from several threads when `T` allows it.
#[derive(Clone)]
pub struct LibreNmsClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl LibreNmsClient<UreqTransport> {
    /// Client with TLS verification on and no explicit timeout.
    pub fn new(base_url: &str, api_token: &str) -> Self {
        Self::from_config(ClientConfig::new(base_url, api_token))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self { config, transport }
    }
}

impl<T> LibreNmsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The hostname is percent-encoded as one path segment.
    pub fn build_device_exists(&self, hostname: &str) -> HttpRequest {
        let hostname = utf8_percent_encode(hostname, PATH_SEGMENT);
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/devices/{hostname}", self.config.base_url()),
            headers: self.config.headers(),
            body: None,
        }
    }

    /// `true` on 200 with `count > 0`, `false` on 404 with
    /// `status == "error"`. Every other response is `UnexpectedResponse`,
    /// including 200 with a zero or missing count.
    pub fn parse_device_exists(&self, response: HttpResponse) -> Result<bool, ApiError> {
        match response.status {
            404 => {
                let lookup = decode_lookup(&response.body)?;
                if lookup.status.as_deref() == Some("error") {
                    return Ok(false);
                }
            }
            200 => {
                let lookup = decode_lookup(&response.body)?;
                if lookup.count.is_some_and(|count| count > 0) {
                    return Ok(true);
                }
            }
            _ => {}
        }
        warn!(status = response.status, "unexpected device lookup response");
        Err(ApiError::UnexpectedResponse {
            status: response.status,
            body: response.body,
        })
    }

    pub fn build_add_device(&self, input: &AddDeviceRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/devices", self.config.base_url()),
            headers: self.config.headers(),
            body: Some(body),
        })
    }

    /// The body is returned as-is whatever the status code.
    pub fn parse_add_device(&self, response: HttpResponse) -> Result<AddDeviceResponse, ApiError> {
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

impl<T: Transport> LibreNmsClient<T> {
    /// Ask the API whether a device with `hostname` is registered.
    #[tracing::instrument(skip(self))]
    pub fn device_exists(&self, hostname: &str) -> Result<bool, ApiError> {
        let response = self.transport.execute(self.build_device_exists(hostname))?;
        let exists = self.parse_device_exists(response)?;
        debug!(exists, "device lookup finished");
        Ok(exists)
    }

    /// Register `hostname` polled over SNMP `v2c`.
    pub fn add_device(&self, hostname: &str, community: &str) -> Result<AddDeviceResponse, ApiError> {
        self.add_device_with_version(hostname, community, DEFAULT_SNMP_VERSION.as_str())
    }

    /// Register `hostname` unless it already exists.
    ///
    /// An existing device yields `Ok` with a
    /// `{"status":"error","message":..}` payload and no creation request.
    /// `snmp_version` accepts `1`, `2`, `3`, `v1`, `v2c` or `v3`.
    #[tracing::instrument(skip(self, community))]
    pub fn add_device_with_version(
        &self,
        hostname: &str,
        community: &str,
        snmp_version: &str,
    ) -> Result<AddDeviceResponse, ApiError> {
        if self.device_exists(hostname)? {
            info!("device already registered, skipping creation");
            return Ok(already_exists(hostname));
        }

        let version: SnmpVersion = snmp_version.parse()?;
        let input = AddDeviceRequest {
            hostname: hostname.to_string(),
            community: community.to_string(),
            version,
        };
        let response = self.transport.execute(self.build_add_device(&input)?)?;
        info!(status = response.status, %version, "device registration sent");
        self.parse_add_device(response)
    }
}

impl<T> fmt::Debug for LibreNmsClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibreNmsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn decode_lookup(body: &str) -> Result<DeviceLookup, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(DeviceLookup::from_json(&value))
}

fn already_exists(hostname: &str) -> AddDeviceResponse {
    json!({
        "status": "error",
        "message": format!("Device with hostname '{hostname}' already exists"),
    })
}
