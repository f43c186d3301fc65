//! Integration tests for econet-client
//!
//! These tests serve a mock controller over real HTTP and drive it with the
//! client, checking both the decoded results and the requests on the wire.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use econet_client::testing::{sample_params, MockDevice, TestServer};
use econet_client::{BoilerStatus, ClientConfig, EconetClient, EconetError, Params, Setting};
use pretty_assertions::assert_eq;
use rstest::rstest;

// =============================================================================
// Test Helpers
// =============================================================================

const USER: &str = "admin";
const PASSWORD: &str = "s3cret";

fn device() -> MockDevice {
    MockDevice::new(USER, PASSWORD)
}

async fn start(device: &MockDevice) -> TestServer {
    TestServer::start(device)
        .await
        .expect("Failed to start test server")
}

// =============================================================================
// Construction Tests
// =============================================================================

#[tokio::test]
async fn test_connect_probes_root_with_credentials() {
    let device = device();
    let server = start(&device).await;

    let client = EconetClient::connect(ClientConfig::new(server.hostname(), USER, PASSWORD))
        .await
        .unwrap();

    assert_eq!(client.base_url().as_str(), format!("{}/", server.base_url()));

    let requests = device.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/");
    assert_eq!(requests[0].username.as_deref(), Some(USER));
    assert_eq!(requests[0].password.as_deref(), Some(PASSWORD));
}

#[tokio::test]
async fn test_connect_rejected_credentials() {
    let device = device();
    let server = start(&device).await;

    let result =
        EconetClient::connect(ClientConfig::new(server.hostname(), USER, "wrong")).await;

    match result {
        Err(EconetError::ProbeFailed(source)) => {
            assert!(matches!(*source, EconetError::Unauthorized(_)));
        }
        other => panic!("expected ProbeFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connect_unreachable_device() {
    // Bind then drop a listener so the port is closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(addr.to_string(), USER, PASSWORD)
        .with_connect_timeout(std::time::Duration::from_secs(1));
    let result = EconetClient::connect(config).await;

    match result {
        Err(EconetError::ProbeFailed(source)) => {
            assert!(matches!(*source, EconetError::Transport(_)));
        }
        other => panic!("expected ProbeFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hostname_without_scheme_uses_http() {
    let device = device();
    let server = start(&device).await;

    // TestServer builds its client from the bare host:port
    assert!(!server.hostname().starts_with("http"));
    assert!(server.client.base_url().as_str().starts_with("http://"));

    server.client.get_params().await.unwrap();
    assert_eq!(device.last_request().unwrap().path, "/econet/regParams");
}

// =============================================================================
// Read Tests
// =============================================================================

#[tokio::test]
async fn test_get_params_field_for_field() {
    let expected = Params {
        pump_co_works: false,
        boiler_power: 100,
        boiler_power_kw: 24.0,
        temp_co_set: 65.0,
        temp_co: 63.5,
        temp_cwu_set: 55.0,
        temp_cwu: 41.25,
        temp_feeder: 28.0,
        fan_works: false,
        fuel_stream: 3.5,
        fuel_level: 15,
        operation_mode: 9,
    };
    let device = device().with_params(&expected);
    let server = start(&device).await;

    let params = server.client.get_params().await.unwrap();
    assert_eq!(params, expected);
    assert_eq!(params.boiler_status(), Some(BoilerStatus::Alarm));
}

#[tokio::test]
async fn test_get_params_from_device_json() {
    let body = r#"{"curr":{"pumpCOWorks":true,"boilerPower":40,"boilerPowerKW":9.5,
        "tempCOSet":60,"tempCO":58.25,"tempCWUSet":50,"tempCWU":47.5,"tempFeeder":31.75,
        "fanWorks":true,"fuelStream":1.25,"fuelLevel":72,"mode":3,"thermoTemp":21.0},
        "tilesParams":[]}"#;
    let device = device().with_reg_params_body(body);
    let server = start(&device).await;

    let params = server.client.get_params().await.unwrap();
    assert_eq!(params, sample_params());
}

#[rstest]
#[case::truncated(r#"{"curr": {"pumpCOWorks": true"#)]
#[case::not_json("<html>ecoNET</html>")]
#[case::missing_envelope(r#"{"pumpCOWorks": true}"#)]
#[case::wrong_type(r#"{"curr": {"pumpCOWorks": "yes"}}"#)]
#[tokio::test]
async fn test_get_params_malformed(#[case] body: &str) {
    let device = device().with_reg_params_body(body);
    let server = start(&device).await;

    let err = server.client.get_params().await.unwrap_err();
    assert!(err.is_decode(), "expected decode error, got {:?}", err);
}

#[tokio::test]
async fn test_get_sys_params() {
    let device = device();
    let server = start(&device).await;

    let sys = server.client.get_sys_params().await.unwrap();
    assert_eq!(sys.uid, "2L7SDPN6KQ38CIH2401K01U");
    assert_eq!(sys.controller_id, "ecoMAX 860P3-O");
    assert_eq!(device.last_request().unwrap().path, "/econet/sysParams");
}

#[tokio::test]
async fn test_every_request_carries_basic_auth() {
    let device = device();
    let server = start(&device).await;

    server.client.get_params().await.unwrap();
    server.client.set_huw_temp(50).await.unwrap();
    server
        .client
        .set_boiler_status(BoilerStatus::Work)
        .await
        .unwrap();

    let requests = device.requests();
    assert_eq!(requests.len(), 3);
    for request in requests {
        assert_eq!(request.username.as_deref(), Some(USER));
        assert_eq!(request.password.as_deref(), Some(PASSWORD));
    }
}

// =============================================================================
// Write Tests
// =============================================================================

#[tokio::test]
async fn test_set_huw_temp_encodes_key_and_value() {
    let device = device();
    let server = start(&device).await;

    server.client.set_huw_temp(55).await.unwrap();

    let request = device.last_request().unwrap();
    assert_eq!(request.path, "/econet/rmCurrNewParam");
    assert_eq!(request.param("newParamKey"), Some("1281"));
    assert_eq!(request.param("newParamValue"), Some("55"));
}

#[tokio::test]
async fn test_set_co_temp_encodes_key_and_value() {
    let device = device();
    let server = start(&device).await;

    server.client.set_co_temp(60).await.unwrap();

    let request = device.last_request().unwrap();
    assert_eq!(request.path, "/econet/rmCurrNewParam");
    assert_eq!(request.param("newParamKey"), Some("1280"));
    assert_eq!(request.param("newParamValue"), Some("60"));
}

#[tokio::test]
async fn test_huw_mode_and_disable() {
    let device = device();
    let server = start(&device).await;

    server.client.change_huw_mode(2).await.unwrap();
    let request = device.last_request().unwrap();
    assert_eq!(request.param("newParamKey"), Some("1282"));
    assert_eq!(request.param("newParamValue"), Some("2"));

    server.client.disable_huw().await.unwrap();
    let request = device.last_request().unwrap();
    assert_eq!(request.param("newParamKey"), Some("1282"));
    assert_eq!(request.param("newParamValue"), Some("0"));
}

#[rstest]
#[case(BoilerStatus::TurnedOff, "0")]
#[case(BoilerStatus::Work, "3")]
#[case(BoilerStatus::NoTransmission, "13")]
#[tokio::test]
async fn test_set_boiler_status(#[case] status: BoilerStatus, #[case] code: &str) {
    let device = device();
    let server = start(&device).await;

    server.client.set_boiler_status(status).await.unwrap();

    let request = device.last_request().unwrap();
    assert_eq!(request.path, "/econet/newParam");
    assert_eq!(request.param("newParamName"), Some("BOILER_CONTROL"));
    assert_eq!(request.param("newParamValue"), Some(code));
}

#[tokio::test]
async fn test_set_param_returns_echo() {
    let device = device();
    let server = start(&device).await;

    let echo = server.client.set_param(Setting::CoTemp, 62).await.unwrap();
    assert_eq!(echo.param_key, "1280");
    assert_eq!(echo.param_value, 62);
    assert!(echo.is_ok());

    let echo = server.client.set_raw_param(1287, 40).await.unwrap();
    assert_eq!(echo.param_key, "1287");
}

#[rstest]
#[case("ERROR")]
#[case("PARAM_OUT_OF_RANGE")]
#[case("ok")]
#[case("")]
#[tokio::test]
async fn test_write_rejected_carries_result(#[case] result: &str) {
    let device = device().with_write_result(result);
    let server = start(&device).await;

    let err = server.client.set_huw_temp(90).await.unwrap_err();
    match err {
        EconetError::Rejected { result: got } => assert_eq!(got, result),
        other => panic!("expected Rejected, got {:?}", other),
    }

    let err = server
        .client
        .set_boiler_status(BoilerStatus::Stop)
        .await
        .unwrap_err();
    assert!(err.is_rejected());
}

#[tokio::test]
async fn test_write_malformed_response() {
    let device = device().with_write_body("Parameter write failed");
    let server = start(&device).await;

    let err = server.client.set_co_temp(60).await.unwrap_err();
    assert!(err.is_decode());
}

// =============================================================================
// HTTP Status Tests
// =============================================================================

#[tokio::test]
async fn test_server_error_status() {
    let router = Router::new().route(
        "/econet/regParams",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "controller busy") }),
    );
    let server = TestServer::start_router(router, USER, PASSWORD)
        .await
        .unwrap();

    let err = server.client.get_params().await.unwrap_err();
    match err {
        EconetError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "controller busy");
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_read() {
    let device = device();
    let server = start(&device).await;

    let client = EconetClient::new(ClientConfig::new(server.hostname(), "guest", "guest")).unwrap();
    let err = client.get_params().await.unwrap_err();
    assert!(matches!(err, EconetError::Unauthorized(_)));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[tokio::test]
async fn test_cloned_clients_share_pool() {
    let device = device();
    let server = start(&device).await;

    let a = server.client.clone();
    let b = server.client.clone();
    let (ra, rb) = tokio::join!(a.set_huw_temp(45), b.set_co_temp(55));
    ra.unwrap();
    rb.unwrap();

    assert_eq!(device.requests().len(), 2);
}
