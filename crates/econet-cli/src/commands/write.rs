//! Write commands - change controller parameters

use anyhow::{Context, Result};
use econet_client::{params, BoilerStatus, EconetClient, Setting};

use crate::output::OutputContext;

/// Write a setting from the parameter table
pub async fn write_setting(
    client: &EconetClient,
    setting: Setting,
    value: i64,
    ctx: &OutputContext,
) -> Result<()> {
    client
        .set_param(setting, value)
        .await
        .with_context(|| format!("Failed to set {}", setting))?;

    ctx.success(&format!("Successfully set {} = {}", setting, value));
    Ok(())
}

/// Write an arbitrary parameter code
pub async fn set(client: &EconetClient, key: u16, value: i64, ctx: &OutputContext) -> Result<()> {
    let echo = client
        .set_raw_param(key, value)
        .await
        .with_context(|| format!("Failed to set parameter {}", key))?;

    let label = params::find_by_key(key)
        .map(|def| format!("{} ({})", def.name, key))
        .unwrap_or_else(|| key.to_string());
    ctx.success(&format!(
        "Successfully set {} = {} ({})",
        label, echo.param_value, echo.result
    ));
    Ok(())
}

/// Change the boiler operating mode
pub async fn boiler(client: &EconetClient, status: &str, ctx: &OutputContext) -> Result<()> {
    let status: BoilerStatus = status.parse().map_err(anyhow::Error::msg)?;

    client
        .set_boiler_status(status)
        .await
        .with_context(|| format!("Failed to set boiler status {}", status))?;

    ctx.success(&format!(
        "Boiler status set to {} ({})",
        status,
        status.code()
    ));
    Ok(())
}
