//! ecoNET HTTP client implementation

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{EconetError, Result};
use crate::params::{Setting, BOILER_CONTROL, HUW_MODE_OFF};
use crate::types::*;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Prefix the hostname with `http://` unless it already names a scheme.
pub fn normalize_hostname(hostname: &str) -> String {
    let hostname = hostname.trim();
    if hostname.starts_with("http://") || hostname.starts_with("https://") {
        hostname.to_string()
    } else {
        format!("http://{}", hostname)
    }
}

/// Connection settings for a controller
#[derive(Clone)]
pub struct ClientConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// ecoNET controller client
///
/// Every call is a single authenticated GET. The client is cheap to clone
/// and shares one connection pool across clones.
#[derive(Clone)]
pub struct EconetClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl EconetClient {
    /// Create a client without contacting the controller
    ///
    /// Use [`EconetClient::connect`] to fail fast on an unreachable device
    /// or rejected credentials.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let mut base_url = Url::parse(&normalize_hostname(&config.hostname))?;
        // Relative joins keep any path prefix only when the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            username: config.username,
            password: config.password,
        })
    }

    /// Create a client and probe the controller root
    ///
    /// Fails with [`EconetError::ProbeFailed`] if the device cannot be
    /// reached or refuses the credentials.
    #[instrument(skip_all, fields(hostname = %config.hostname))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        match client.probe().await {
            Ok(()) => Ok(client),
            Err(e) => {
                warn!("Probe of {} failed: {}", client.base_url, e);
                Err(EconetError::ProbeFailed(Box::new(e)))
            }
        }
    }

    /// Issue the liveness probe (authenticated GET to the root)
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<()> {
        self.get(self.base_url.clone()).await?;
        info!("Controller at {} is reachable", self.base_url);
        Ok(())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the username requests are authenticated with
    pub fn username(&self) -> &str {
        &self.username
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Read the current operating parameters
    #[instrument(skip(self))]
    pub async fn get_params(&self) -> Result<Params> {
        let url = self.endpoint("regParams")?;
        let body = self.get(url).await?;
        decode::<RegParamsResponse>(&body).map(|r| r.curr)
    }

    /// Read the controller identity
    #[instrument(skip(self))]
    pub async fn get_sys_params(&self) -> Result<SysParams> {
        let url = self.endpoint("sysParams")?;
        let body = self.get(url).await?;
        decode(&body)
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Set the target hot-water temperature
    pub async fn set_huw_temp(&self, temp: i64) -> Result<()> {
        self.set_param(Setting::HuwTemp, temp).await.map(|_| ())
    }

    /// Set the target central-heating temperature
    pub async fn set_co_temp(&self, temp: i64) -> Result<()> {
        self.set_param(Setting::CoTemp, temp).await.map(|_| ())
    }

    /// Change the hot-water heater mode
    pub async fn change_huw_mode(&self, mode: i64) -> Result<()> {
        self.set_param(Setting::HuwMode, mode).await.map(|_| ())
    }

    /// Switch the hot-water heater off
    pub async fn disable_huw(&self) -> Result<()> {
        self.change_huw_mode(HUW_MODE_OFF).await
    }

    /// Write a setting from the parameter table
    pub async fn set_param(&self, setting: Setting, value: i64) -> Result<WriteResponse> {
        self.set_raw_param(setting.key(), value).await
    }

    /// Write an arbitrary parameter code through `rmCurrNewParam`
    #[instrument(skip(self))]
    pub async fn set_raw_param(&self, key: u16, value: i64) -> Result<WriteResponse> {
        let url = self.write_url(key, value)?;
        self.submit_write(url).await
    }

    /// Set the boiler operating mode through the `BOILER_CONTROL` parameter
    #[instrument(skip(self))]
    pub async fn set_boiler_status(&self, status: BoilerStatus) -> Result<()> {
        let url = self.boiler_control_url(status)?;
        self.submit_write(url).await.map(|_| ())
    }

    /// URL a parameter write is sent to
    pub fn write_url(&self, key: u16, value: i64) -> Result<Url> {
        let mut url = self.endpoint("rmCurrNewParam")?;
        url.query_pairs_mut()
            .append_pair("newParamKey", &key.to_string())
            .append_pair("newParamValue", &value.to_string());
        Ok(url)
    }

    /// URL a boiler status change is sent to
    pub fn boiler_control_url(&self, status: BoilerStatus) -> Result<Url> {
        let mut url = self.endpoint("newParam")?;
        url.query_pairs_mut()
            .append_pair("newParamName", BOILER_CONTROL)
            .append_pair("newParamValue", &status.code().to_string());
        Ok(url)
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    fn endpoint(&self, command: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("econet/{}", command))?)
    }

    /// Send an authenticated GET and return the body of a success response
    async fn get(&self, url: Url) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(extract_error(response, status).await)
        }
    }

    async fn submit_write(&self, url: Url) -> Result<WriteResponse> {
        let body = self.get(url).await?;
        let response: WriteResponse = decode(&body)?;

        if response.is_ok() {
            info!(
                "Controller accepted {} = {}",
                response.param_key, response.param_value
            );
            Ok(response)
        } else {
            warn!(
                "Controller rejected {} = {}: {}",
                response.param_key, response.param_value, response.result
            );
            Err(EconetError::rejected(response.result))
        }
    }
}

impl fmt::Debug for EconetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EconetClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| EconetError::Decode(e.to_string()))
}

async fn extract_error(response: reqwest::Response, status: StatusCode) -> EconetError {
    let message = match response.text().await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => format!("HTTP {}", status),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EconetError::Unauthorized(message),
        _ => EconetError::status(status.as_u16(), message),
    }
}
