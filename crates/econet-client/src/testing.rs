//! Test utilities for econet-client
//!
//! [`MockDevice`] emulates the controller's HTTP endpoints and records every
//! request it receives. [`TestServer`] serves it on an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::types::{Params, RESULT_OK};
use crate::{ClientConfig, EconetClient, Result};

/// A request as seen by the mock controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

struct MockState {
    username: String,
    password: String,
    reg_params_body: String,
    sys_params_body: String,
    write_result: String,
    write_body: Option<String>,
    requests: Vec<RecordedRequest>,
}

/// In-process stand-in for an ecoNET controller
#[derive(Clone)]
pub struct MockDevice {
    state: Arc<Mutex<MockState>>,
}

impl MockDevice {
    /// Create a device that accepts the given credentials and every write
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let device = Self {
            state: Arc::new(Mutex::new(MockState {
                username: username.into(),
                password: password.into(),
                reg_params_body: String::new(),
                sys_params_body: r#"{"uid":"2L7SDPN6KQ38CIH2401K01U","controllerId":"ecoMAX 860P3-O"}"#
                    .to_string(),
                write_result: RESULT_OK.to_string(),
                write_body: None,
                requests: Vec::new(),
            })),
        };
        device.with_params(&sample_params())
    }

    /// Serve the given telemetry from `regParams`
    pub fn with_params(self, params: &Params) -> Self {
        let body = serde_json::json!({ "curr": params }).to_string();
        self.with_reg_params_body(body)
    }

    /// Serve a verbatim `regParams` body
    pub fn with_reg_params_body(self, body: impl Into<String>) -> Self {
        self.state.lock().reg_params_body = body.into();
        self
    }

    /// Serve a verbatim `sysParams` body
    pub fn with_sys_params_body(self, body: impl Into<String>) -> Self {
        self.state.lock().sys_params_body = body.into();
        self
    }

    /// Result marker echoed for every write
    pub fn with_write_result(self, result: impl Into<String>) -> Self {
        self.state.lock().write_result = result.into();
        self
    }

    /// Answer every write with a verbatim body instead of an envelope
    pub fn with_write_body(self, body: impl Into<String>) -> Self {
        self.state.lock().write_body = Some(body.into());
        self
    }

    pub fn username(&self) -> String {
        self.state.lock().username.clone()
    }

    pub fn password(&self) -> String {
        self.state.lock().password.clone()
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Build the axum router emulating the controller endpoints
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/econet/regParams", get(reg_params))
            .route("/econet/sysParams", get(sys_params))
            .route("/econet/rmCurrNewParam", get(write_param))
            .route("/econet/newParam", get(write_param))
            .with_state(self.clone())
    }

    /// Record the request and check its credentials
    fn admit(
        &self,
        uri: &Uri,
        query: HashMap<String, String>,
        headers: &HeaderMap,
    ) -> std::result::Result<(), Response> {
        let auth = headers.typed_get::<Authorization<Basic>>();
        let username = auth.as_ref().map(|a| a.0.username().to_string());
        let password = auth.as_ref().map(|a| a.0.password().to_string());

        let mut state = self.state.lock();
        let authorized = username.as_deref() == Some(state.username.as_str())
            && password.as_deref() == Some(state.password.as_str());

        state.requests.push(RecordedRequest {
            path: uri.path().to_string(),
            query,
            username,
            password,
        });

        if authorized {
            Ok(())
        } else {
            Err((StatusCode::UNAUTHORIZED, "Unauthorized").into_response())
        }
    }
}

async fn root(
    State(device): State<MockDevice>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = device.admit(&uri, query, &headers) {
        return rejection;
    }
    (StatusCode::OK, "ecoNET").into_response()
}

async fn reg_params(
    State(device): State<MockDevice>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = device.admit(&uri, query, &headers) {
        return rejection;
    }
    let body = device.state.lock().reg_params_body.clone();
    json_body(body)
}

async fn sys_params(
    State(device): State<MockDevice>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = device.admit(&uri, query, &headers) {
        return rejection;
    }
    let body = device.state.lock().sys_params_body.clone();
    json_body(body)
}

async fn write_param(
    State(device): State<MockDevice>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let key = query
        .get("newParamKey")
        .or_else(|| query.get("newParamName"))
        .cloned()
        .unwrap_or_default();
    let value = query
        .get("newParamValue")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or_default();

    if let Err(rejection) = device.admit(&uri, query, &headers) {
        return rejection;
    }

    let state = device.state.lock();
    let body = match &state.write_body {
        Some(body) => body.clone(),
        None => serde_json::json!({
            "paramKey": key,
            "paramValue": value,
            "result": state.write_result,
        })
        .to_string(),
    };
    json_body(body)
}

fn json_body(body: String) -> Response {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Telemetry served by a fresh [`MockDevice`]
pub fn sample_params() -> Params {
    Params {
        pump_co_works: true,
        boiler_power: 40,
        boiler_power_kw: 9.5,
        temp_co_set: 60.0,
        temp_co: 58.25,
        temp_cwu_set: 50.0,
        temp_cwu: 47.5,
        temp_feeder: 31.75,
        fan_works: true,
        fuel_stream: 1.25,
        fuel_level: 72,
        operation_mode: 3,
    }
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: EconetClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve a mock device; the client carries the device's credentials
    ///
    /// # Example
    ///
    /// ```ignore
    /// use econet_client::testing::{MockDevice, TestServer};
    ///
    /// let device = MockDevice::new("admin", "secret");
    /// let server = TestServer::start(&device).await?;
    /// server.client.set_huw_temp(55).await?;
    /// assert_eq!(device.last_request().unwrap().param("newParamKey"), Some("1281"));
    /// ```
    pub async fn start(device: &MockDevice) -> Result<Self> {
        Self::start_router(device.router(), &device.username(), &device.password()).await
    }

    /// Serve an arbitrary router with a client using the given credentials
    pub async fn start_router(router: Router, username: &str, password: &str) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let config = ClientConfig::new(addr.to_string(), username, password)
            .with_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(2));
        let client = EconetClient::new(config)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Host and port without a scheme
    pub fn hostname(&self) -> String {
        self.addr.to_string()
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_params_round_trip_through_envelope() {
        let device = MockDevice::new("admin", "secret");
        let body = device.state.lock().reg_params_body.clone();
        let decoded: crate::types::RegParamsResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded.curr, sample_params());
    }
}
