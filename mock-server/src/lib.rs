use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const AUTH_HEADER: &str = "x-auth-token";

const SNMP_VERSIONS: [&str; 3] = ["v1", "v2c", "v3"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    pub device_id: u64,
    pub hostname: String,
    pub community: String,
    pub snmpver: String,
}

#[derive(Deserialize)]
pub struct CreateDevice {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// In-memory device inventory behind the fake API.
pub struct Inventory {
    token: String,
    devices: RwLock<BTreeMap<String, Device>>,
    create_requests: AtomicUsize,
}

impl Inventory {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            devices: RwLock::new(BTreeMap::new()),
            create_requests: AtomicUsize::new(0),
        }
    }

    /// Register a device directly, bypassing the HTTP API.
    pub async fn seed(&self, hostname: &str, community: &str, snmpver: &str) -> Device {
        let mut devices = self.devices.write().await;
        let device = Device {
            device_id: devices.len() as u64 + 1,
            hostname: hostname.to_string(),
            community: community.to_string(),
            snmpver: snmpver.to_string(),
        };
        devices.insert(hostname.to_string(), device.clone());
        device
    }

    pub async fn get(&self, hostname: &str) -> Option<Device> {
        self.devices.read().await.get(hostname).cloned()
    }

    /// Number of authenticated POSTs to `/api/v0/devices`, accepted or not.
    pub fn create_requests(&self) -> usize {
        self.create_requests.load(Ordering::SeqCst)
    }
}

pub type Db = Arc<Inventory>;

pub fn app(db: Db) -> Router {
    Router::new()
        .route("/api/v0/devices", post(add_device))
        .route("/api/v0/devices/{hostname}", get(get_device))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}

type ApiResponse = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: String) -> ApiResponse {
    (status, Json(json!({"status": "error", "message": message})))
}

fn authorize(db: &Inventory, headers: &HeaderMap) -> Result<(), ApiResponse> {
    match headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()) {
        Some(token) if token == db.token => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthenticated."})),
        )),
    }
}

async fn get_device(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(hostname): Path<String>,
) -> ApiResponse {
    if let Err(denied) = authorize(&db, &headers) {
        return denied;
    }
    let devices = db.devices.read().await;
    let found = devices
        .get(&hostname)
        .or_else(|| devices.values().find(|d| d.device_id.to_string() == hostname));
    match found {
        Some(device) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "devices": [device], "count": 1})),
        ),
        None => error(StatusCode::NOT_FOUND, format!("Device {hostname} does not exist")),
    }
}

async fn add_device(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateDevice>,
) -> ApiResponse {
    if let Err(denied) = authorize(&db, &headers) {
        return denied;
    }
    db.create_requests.fetch_add(1, Ordering::SeqCst);

    let hostname = match input.hostname.filter(|h| !h.is_empty()) {
        Some(hostname) => hostname,
        None => return error(StatusCode::BAD_REQUEST, "Missing the device hostname".to_string()),
    };
    let snmpver = input.version.unwrap_or_else(|| "v2c".to_string());
    if !SNMP_VERSIONS.contains(&snmpver.as_str()) {
        return error(StatusCode::BAD_REQUEST, format!("Invalid SNMP version {snmpver}"));
    }

    let mut devices = db.devices.write().await;
    if devices.contains_key(&hostname) {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Already have device {hostname}"),
        );
    }
    let device = Device {
        device_id: devices.len() as u64 + 1,
        hostname: hostname.clone(),
        community: input.community.unwrap_or_default(),
        snmpver,
    };
    devices.insert(hostname.clone(), device.clone());
    tracing::info!(%hostname, device_id = device.device_id, "device added");

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "message": format!("Device {hostname} ({}) has been added successfully", device.device_id),
            "devices": [device],
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_serializes_to_json() {
        let device = Device {
            device_id: 3,
            hostname: "host1".to_string(),
            community: "public".to_string(),
            snmpver: "v2c".to_string(),
        };
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["device_id"], 3);
        assert_eq!(json["hostname"], "host1");
        assert_eq!(json["snmpver"], "v2c");
    }

    #[test]
    fn create_device_fields_optional() {
        let input: CreateDevice = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.hostname.is_none());
        assert!(input.community.is_none());
        assert!(input.version.is_none());
    }

    #[tokio::test]
    async fn seed_assigns_sequential_ids() {
        let db = Inventory::new("t");
        assert_eq!(db.seed("a", "public", "v2c").await.device_id, 1);
        assert_eq!(db.seed("b", "public", "v1").await.device_id, 2);
        assert_eq!(db.get("b").await.unwrap().snmpver, "v1");
        assert_eq!(db.create_requests(), 0);
    }
}
