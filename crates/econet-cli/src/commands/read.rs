//! Read commands - telemetry and controller identity

use anyhow::{Context, Result};
use econet_client::{EconetClient, Params};

use crate::output::{OutputContext, ReadingRow};

/// Print all telemetry readings
pub async fn params(client: &EconetClient, ctx: &OutputContext) -> Result<()> {
    let params = client
        .get_params()
        .await
        .context("Failed to read parameters")?;

    ctx.print(&reading_rows(&params));
    Ok(())
}

/// Print the operating state summary
pub async fn status(client: &EconetClient, ctx: &OutputContext) -> Result<()> {
    let params = client
        .get_params()
        .await
        .context("Failed to read parameters")?;

    let mode = match params.boiler_status() {
        Some(status) => format!("{} ({})", status, params.operation_mode),
        None => format!("unknown ({})", params.operation_mode),
    };

    let pairs = vec![
        ("Mode", mode),
        ("Power", format!("{} kW", params.boiler_power_kw)),
        ("Pump", on_off(params.pump_co_works)),
        ("Fan", on_off(params.fan_works)),
        (
            "Heating",
            format!("{} / {} °C", params.temp_co, params.temp_co_set),
        ),
        (
            "Hot water",
            format!("{} / {} °C", params.temp_cwu, params.temp_cwu_set),
        ),
        ("Fuel", format!("{} %", params.fuel_level)),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}

/// Print the controller identity
pub async fn sys(client: &EconetClient, ctx: &OutputContext) -> Result<()> {
    let sys = client
        .get_sys_params()
        .await
        .context("Failed to read system parameters")?;

    ctx.print_kv(&[("UID", sys.uid), ("Controller", sys.controller_id)]);
    Ok(())
}

fn on_off(running: bool) -> String {
    let label = if running { "on" } else { "off" };
    label.to_string()
}

fn reading_rows(params: &Params) -> Vec<ReadingRow> {
    let row = |parameter: &str, value: String, unit: &str| ReadingRow {
        parameter: parameter.to_string(),
        value,
        unit: unit.to_string(),
    };

    vec![
        row("tempCO", params.temp_co.to_string(), "°C"),
        row("tempCOSet", params.temp_co_set.to_string(), "°C"),
        row("tempCWU", params.temp_cwu.to_string(), "°C"),
        row("tempCWUSet", params.temp_cwu_set.to_string(), "°C"),
        row("tempFeeder", params.temp_feeder.to_string(), "°C"),
        row("boilerPower", params.boiler_power.to_string(), ""),
        row("boilerPowerKW", params.boiler_power_kw.to_string(), "kW"),
        row("fuelStream", params.fuel_stream.to_string(), "kg/h"),
        row("fuelLevel", params.fuel_level.to_string(), "%"),
        row("pumpCOWorks", params.pump_co_works.to_string(), ""),
        row("fanWorks", params.fan_works.to_string(), ""),
        row("mode", params.operation_mode.to_string(), ""),
    ]
}
