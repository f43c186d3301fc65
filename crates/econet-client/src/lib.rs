//! ecoNET Client Library
//!
//! Typed HTTP client for the local management API of ecoNET boiler
//! controllers. Reads telemetry and writes control parameters using
//! HTTP Basic authentication.
//!
//! # Example
//!
//! ```rust,no_run
//! use econet_client::{BoilerStatus, ClientConfig, EconetClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Probes the controller and fails if it is unreachable
//!     let client =
//!         EconetClient::connect(ClientConfig::new("192.168.1.50", "admin", "admin")).await?;
//!
//!     let params = client.get_params().await?;
//!     println!("hot water: {} / {}", params.temp_cwu, params.temp_cwu_set);
//!
//!     client.set_huw_temp(55).await?;
//!     client.set_boiler_status(BoilerStatus::Work).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module serves a mock controller for integration tests:
//!
//! ```rust,ignore
//! use econet_client::testing::{MockDevice, TestServer};
//!
//! let device = MockDevice::new("admin", "secret").with_write_result("ERROR");
//! let server = TestServer::start(&device).await?;
//! assert!(server.client.set_co_temp(60).await.is_err());
//! ```

mod client;
mod error;
pub mod params;
pub mod testing;
mod types;

pub use client::{normalize_hostname, ClientConfig, EconetClient};
pub use error::{EconetError, Result};
pub use params::{ParameterDef, Setting, PARAMETERS};
pub use types::*;
