//! Writable controller parameters
//!
//! Semantic write operations resolve to a `newParamKey` code through the
//! static [`PARAMETERS`] table. Adding a new writable setting means adding a
//! [`Setting`] variant and one table row.

use serde::{Deserialize, Serialize};

/// Target hot-water (CWU) temperature
pub const HUW_TEMP: u16 = 1281;
/// Target central-heating (CO) temperature
pub const CO_TEMP: u16 = 1280;
/// Hot-water heater mode
pub const HUW_MODE: u16 = 1282;

/// Name of the control parameter written through `newParam`
pub const BOILER_CONTROL: &str = "BOILER_CONTROL";

/// Hot-water heater mode value that switches the heater off
pub const HUW_MODE_OFF: i64 = 0;

/// A writable setting addressed by parameter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    HuwTemp,
    CoTemp,
    HuwMode,
}

/// One row of the parameter table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDef {
    pub setting: Setting,
    /// Code sent as `newParamKey`
    pub key: u16,
    /// Short name used on the command line
    pub name: &'static str,
    pub description: &'static str,
}

/// Every setting the client knows how to write, in [`Setting`] order
pub const PARAMETERS: &[ParameterDef] = &[
    ParameterDef {
        setting: Setting::HuwTemp,
        key: HUW_TEMP,
        name: "huw_temp",
        description: "Target hot-water temperature",
    },
    ParameterDef {
        setting: Setting::CoTemp,
        key: CO_TEMP,
        name: "co_temp",
        description: "Target central-heating temperature",
    },
    ParameterDef {
        setting: Setting::HuwMode,
        key: HUW_MODE,
        name: "huw_mode",
        description: "Hot-water heater mode",
    },
];

impl Setting {
    /// Table row for this setting
    pub fn def(self) -> &'static ParameterDef {
        // PARAMETERS rows are ordered by Setting discriminant
        &PARAMETERS[self as usize]
    }

    /// Parameter code sent as `newParamKey`
    pub fn key(self) -> u16 {
        self.def().key
    }

    pub fn as_name(self) -> &'static str {
        self.def().name
    }
}

impl std::fmt::Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_name())
    }
}

impl std::str::FromStr for Setting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        PARAMETERS
            .iter()
            .find(|def| def.name == normalized)
            .map(|def| def.setting)
            .ok_or_else(|| format!("Unknown setting: {}", s))
    }
}

/// Look up a table row by parameter code
pub fn find_by_key(key: u16) -> Option<&'static ParameterDef> {
    PARAMETERS.iter().find(|def| def.key == key)
}
