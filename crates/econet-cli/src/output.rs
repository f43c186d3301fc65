//! Output formatting for econet-cli (table, json, csv)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Parse a format name from the config file
    pub fn parse(name: &str) -> Result<Self, String> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| format!("Invalid output format: {}", name))
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Csv => {
                print!("{}", render_csv(data));
            }
        }
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Csv => {
                let keys: Vec<String> = pairs.iter().map(|(k, _)| escape_csv(k)).collect();
                println!("{}", keys.join(","));
                let values: Vec<String> = pairs.iter().map(|(_, v)| escape_csv(v)).collect();
                println!("{}", values.join(","));
            }
        }
    }
}

/// Render data as CSV, header row first
fn render_csv<T: Serialize>(data: &[T]) -> String {
    let mut out = String::new();
    let Some(first) = data.first() else {
        return out;
    };

    let first = serde_json::to_value(first).unwrap_or_default();
    if let serde_json::Value::Object(map) = &first {
        let headers: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for item in data {
            if let Ok(serde_json::Value::Object(row)) = serde_json::to_value(item) {
                let values: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        row.get(*h)
                            .map(|v| match v {
                                serde_json::Value::String(s) => escape_csv(s),
                                other => escape_csv(&other.to_string()),
                            })
                            .unwrap_or_default()
                    })
                    .collect();
                out.push_str(&values.join(","));
                out.push('\n');
            }
        }
    }
    out
}

/// Escape a value for CSV output
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// One telemetry reading for the params command
#[derive(Debug, Tabled, Serialize)]
pub struct ReadingRow {
    #[tabled(rename = "Parameter")]
    pub parameter: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
}

/// Writable parameter for the settings command
#[derive(Debug, Tabled, Serialize)]
pub struct SettingRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Key")]
    pub key: u16,
    #[tabled(rename = "Description")]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("table"), Ok(OutputFormat::Table));
        assert!(OutputFormat::parse("yaml").is_err());
        assert_eq!(OutputFormat::Csv.as_str(), "csv");
    }

    #[test]
    fn test_render_csv() {
        let rows = vec![
            ReadingRow {
                parameter: "tempCO".to_string(),
                value: "58.5".to_string(),
                unit: "°C".to_string(),
            },
            ReadingRow {
                parameter: "note".to_string(),
                value: "a,b".to_string(),
                unit: String::new(),
            },
        ];
        // serde_json orders object keys alphabetically
        assert_eq!(
            render_csv(&rows),
            "parameter,unit,value\ntempCO,°C,58.5\nnote,,\"a,b\"\n"
        );
    }

    #[test]
    fn test_render_csv_empty() {
        let rows: Vec<ReadingRow> = Vec::new();
        assert_eq!(render_csv(&rows), "");
    }
}
