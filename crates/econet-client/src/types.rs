//! Request and response types for the ecoNET controller

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Telemetry Types
// =============================================================================

/// Snapshot of the controller's current operating parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Central-heating pump is running
    #[serde(rename = "pumpCOWorks")]
    pub pump_co_works: bool,
    /// Boiler power in raw controller units
    #[serde(rename = "boilerPower")]
    pub boiler_power: i32,
    /// Boiler power in kW
    #[serde(rename = "boilerPowerKW")]
    pub boiler_power_kw: f64,
    /// Target central-heating temperature
    #[serde(rename = "tempCOSet")]
    pub temp_co_set: f64,
    /// Actual central-heating temperature
    #[serde(rename = "tempCO")]
    pub temp_co: f64,
    /// Target hot-water temperature
    #[serde(rename = "tempCWUSet")]
    pub temp_cwu_set: f64,
    /// Actual hot-water temperature
    #[serde(rename = "tempCWU")]
    pub temp_cwu: f64,
    /// Feeder temperature
    #[serde(rename = "tempFeeder")]
    pub temp_feeder: f64,
    /// Blower fan is running
    #[serde(rename = "fanWorks")]
    pub fan_works: bool,
    /// Fuel stream rate
    #[serde(rename = "fuelStream")]
    pub fuel_stream: f64,
    /// Fuel level in percent
    #[serde(rename = "fuelLevel")]
    pub fuel_level: i32,
    /// Operating mode code, see [`BoilerStatus`]
    #[serde(rename = "mode")]
    pub operation_mode: u32,
}

impl Params {
    /// Interpret the operating mode code, if the controller reported a known one
    pub fn boiler_status(&self) -> Option<BoilerStatus> {
        BoilerStatus::try_from(self.operation_mode).ok()
    }
}

/// `regParams` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegParamsResponse {
    pub curr: Params,
}

/// Controller identity from `sysParams`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysParams {
    pub uid: String,
    #[serde(rename = "controllerId")]
    pub controller_id: String,
}

// =============================================================================
// Write Types
// =============================================================================

/// Result marker the controller echoes for an accepted write
pub const RESULT_OK: &str = "OK";

/// Envelope returned by every write endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Parameter code or name; firmware echoes either a number or a string
    #[serde(rename = "paramKey", default, deserialize_with = "string_or_number")]
    pub param_key: String,
    #[serde(rename = "paramValue", default)]
    pub param_value: i64,
    pub result: String,
}

impl WriteResponse {
    pub fn is_ok(&self) -> bool {
        self.result == RESULT_OK
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Key::deserialize(deserializer)? {
        Key::Text(s) => s,
        Key::Number(n) => n.to_string(),
    })
}

// =============================================================================
// Boiler Status
// =============================================================================

/// Boiler operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum BoilerStatus {
    TurnedOff = 0,
    FireUp1 = 1,
    FireUp2 = 2,
    Work = 3,
    Supervision = 4,
    Halted = 5,
    Stop = 6,
    BurningOff = 7,
    Manual = 8,
    Alarm = 9,
    Unsealing = 10,
    Chimney = 11,
    Stabilization = 12,
    NoTransmission = 13,
}

impl BoilerStatus {
    pub const ALL: [BoilerStatus; 14] = [
        BoilerStatus::TurnedOff,
        BoilerStatus::FireUp1,
        BoilerStatus::FireUp2,
        BoilerStatus::Work,
        BoilerStatus::Supervision,
        BoilerStatus::Halted,
        BoilerStatus::Stop,
        BoilerStatus::BurningOff,
        BoilerStatus::Manual,
        BoilerStatus::Alarm,
        BoilerStatus::Unsealing,
        BoilerStatus::Chimney,
        BoilerStatus::Stabilization,
        BoilerStatus::NoTransmission,
    ];

    /// Code sent as `newParamValue`
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn as_name(self) -> &'static str {
        match self {
            BoilerStatus::TurnedOff => "turned_off",
            BoilerStatus::FireUp1 => "fire_up1",
            BoilerStatus::FireUp2 => "fire_up2",
            BoilerStatus::Work => "work",
            BoilerStatus::Supervision => "supervision",
            BoilerStatus::Halted => "halted",
            BoilerStatus::Stop => "stop",
            BoilerStatus::BurningOff => "burning_off",
            BoilerStatus::Manual => "manual",
            BoilerStatus::Alarm => "alarm",
            BoilerStatus::Unsealing => "unsealing",
            BoilerStatus::Chimney => "chimney",
            BoilerStatus::Stabilization => "stabilization",
            BoilerStatus::NoTransmission => "no_transmission",
        }
    }
}

impl TryFrom<u32> for BoilerStatus {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        BoilerStatus::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| format!("Unknown boiler status code: {}", code))
    }
}

impl std::fmt::Display for BoilerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_name())
    }
}

impl std::str::FromStr for BoilerStatus {
    type Err = String;

    /// Accepts a status name (`"work"`, `"burning-off"`) or its numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u32>() {
            return BoilerStatus::try_from(code);
        }
        let normalized = s.trim().to_lowercase().replace('-', "_");
        BoilerStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_name() == normalized)
            .ok_or_else(|| format!("Invalid boiler status: {}", s))
    }
}
