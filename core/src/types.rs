//! Request and response DTOs for the LibreNMS device endpoints.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Only the fields the
//! client inspects are typed. Registration responses stay free-form JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Version used when the caller does not pick one.
pub const DEFAULT_SNMP_VERSION: SnmpVersion = SnmpVersion::V2c;

/// Body returned by a device registration, passed through verbatim.
pub type AddDeviceResponse = serde_json::Value;

/// SNMP protocol version a device is polled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnmpVersion {
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v2c")]
    V2c,
    #[serde(rename = "v3")]
    V3,
}

impl SnmpVersion {
    pub const fn as_str(self) -> &'static str {
        match self {
            SnmpVersion::V1 => "v1",
            SnmpVersion::V2c => "v2c",
            SnmpVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for SnmpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the bare numbers `1`, `2`, `3` as shorthands for `v1`, `v2c`,
/// `v3`. Matching is exact: no trimming, no case folding.
impl FromStr for SnmpVersion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "v1" => Ok(SnmpVersion::V1),
            "2" | "v2c" => Ok(SnmpVersion::V2c),
            "3" | "v3" => Ok(SnmpVersion::V3),
            _ => Err(ApiError::InvalidArgument(
                "SNMP version isn't correct".to_string(),
            )),
        }
    }
}

/// Payload for registering a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddDeviceRequest {
    pub hostname: String,
    pub community: String,
    pub version: SnmpVersion,
}

/// The parts of a device-lookup body the existence check reads.
///
/// LibreNMS answers 200 with `{"status":"ok","count":N,"devices":[..]}` and
/// 404 with `{"status":"error","message":..}`. A field of the wrong JSON
/// type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceLookup {
    pub status: Option<String>,
    pub count: Option<u64>,
}

impl DeviceLookup {
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            status: value
                .get("status")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            count: value.get("count").and_then(serde_json::Value::as_u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_shorthands_normalize() {
        assert_eq!("1".parse::<SnmpVersion>().unwrap(), SnmpVersion::V1);
        assert_eq!("2".parse::<SnmpVersion>().unwrap(), SnmpVersion::V2c);
        assert_eq!("3".parse::<SnmpVersion>().unwrap(), SnmpVersion::V3);
    }

    #[test]
    fn canonical_names_accepted() {
        assert_eq!("v1".parse::<SnmpVersion>().unwrap(), SnmpVersion::V1);
        assert_eq!("v2c".parse::<SnmpVersion>().unwrap(), SnmpVersion::V2c);
        assert_eq!("v3".parse::<SnmpVersion>().unwrap(), SnmpVersion::V3);
    }

    #[test]
    fn unknown_versions_rejected() {
        for raw in ["v9", "v2", "V2C", "2c", "", " v1"] {
            let err = raw.parse::<SnmpVersion>().unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidArgument(ref m) if m == "SNMP version isn't correct"),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn add_device_request_serializes_version_name() {
        let req = AddDeviceRequest {
            hostname: "host3".to_string(),
            community: "public".to_string(),
            version: SnmpVersion::V2c,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hostname": "host3", "community": "public", "version": "v2c"})
        );
    }

    #[test]
    fn device_lookup_tolerates_missing_fields() {
        let lookup = DeviceLookup::from_json(&serde_json::json!({"devices": []}));
        assert_eq!(lookup, DeviceLookup::default());
    }

    #[test]
    fn device_lookup_ignores_mistyped_fields() {
        for body in [
            serde_json::json!({"status": 1, "count": "2"}),
            serde_json::json!({"count": 1.5}),
            serde_json::json!({"count": -3}),
            serde_json::json!(["not", "an", "object"]),
        ] {
            assert_eq!(DeviceLookup::from_json(&body), DeviceLookup::default(), "{body}");
        }
    }

    #[test]
    fn device_lookup_reads_large_counts() {
        let lookup = DeviceLookup::from_json(&serde_json::json!({"count": u64::MAX}));
        assert_eq!(lookup.count, Some(u64::MAX));
    }
}
