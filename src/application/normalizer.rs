use std::num::ParseIntError;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::domain::DeviceHealth;

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("malformed smart-log output: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawSmartLog {
    critical_warning: u32,
    /// Kelvin
    temperature: i64,
    avail_spare: u32,
    spare_thresh: u32,
    percent_used: u32,
    endurance_grp_critical_warning_summary: u32,
    #[serde(default, deserialize_with = "lenient_counter")]
    data_units_read: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    data_units_written: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    host_read_commands: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    host_write_commands: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    controller_busy_time: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    power_cycles: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    power_on_hours: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    unsafe_shutdowns: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    media_errors: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    num_err_log_entries: u64,
    warning_temp_time: u32,
    critical_comp_time: u32,
    thm_temp1_trans_count: u32,
    thm_temp2_trans_count: u32,
    thm_temp1_total_time: u32,
    thm_temp2_total_time: u32,
}

/// Lifetime counters are comma-grouped decimal strings in older nvme-cli
/// releases and plain numbers in newer ones. Anything unparseable reads as 0.
fn lenient_counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => parse_number_with_commas(&s).unwrap_or(0),
        _ => 0,
    })
}

/// Strip thousands separators and parse as an unsigned integer
pub fn parse_number_with_commas(s: &str) -> Result<u64, ParseIntError> {
    s.replace(',', "").parse()
}

/// Convert an absolute temperature to whole degrees Celsius.
///
/// `f64::round` rounds half away from zero.
pub fn kelvin_to_celsius(kelvin: i64) -> i32 {
    (kelvin as f64 - KELVIN_OFFSET).round() as i32
}

/// Normalize a raw `nvme smart-log -o json` blob into a typed health record
pub fn normalize(raw: &[u8]) -> Result<DeviceHealth, TelemetryError> {
    let raw: RawSmartLog = serde_json::from_slice(raw)?;

    Ok(DeviceHealth {
        critical_warning: raw.critical_warning,
        temperature: kelvin_to_celsius(raw.temperature),
        avail_spare: raw.avail_spare,
        spare_thresh: raw.spare_thresh,
        percent_used: raw.percent_used,
        endurance_grp_critical_warning_summary: raw.endurance_grp_critical_warning_summary,
        data_units_read: raw.data_units_read,
        data_units_written: raw.data_units_written,
        host_read_commands: raw.host_read_commands,
        host_write_commands: raw.host_write_commands,
        controller_busy_time: raw.controller_busy_time,
        power_cycles: raw.power_cycles,
        power_on_hours: raw.power_on_hours,
        unsafe_shutdowns: raw.unsafe_shutdowns,
        media_errors: raw.media_errors,
        num_err_log_entries: raw.num_err_log_entries,
        warning_temp_time: raw.warning_temp_time,
        critical_comp_time: raw.critical_comp_time,
        thm_temp1_trans_count: raw.thm_temp1_trans_count,
        thm_temp2_trans_count: raw.thm_temp2_trans_count,
        thm_temp1_total_time: raw.thm_temp1_total_time,
        thm_temp2_total_time: raw.thm_temp2_total_time,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Smart-log output in the shape nvme-cli 1.x prints
    pub(crate) fn smart_log_json(temperature: i64, data_units_read: &str) -> String {
        format!(
            r#"{{
  "critical_warning" : 0,
  "temperature" : {temperature},
  "avail_spare" : 100,
  "spare_thresh" : 10,
  "percent_used" : 3,
  "endurance_grp_critical_warning_summary" : 0,
  "data_units_read" : "{data_units_read}",
  "data_units_written" : "98,765",
  "host_read_commands" : "1,000,000",
  "host_write_commands" : "2,000,000",
  "controller_busy_time" : "450",
  "power_cycles" : "120",
  "power_on_hours" : "8,760",
  "unsafe_shutdowns" : "7",
  "media_errors" : "0",
  "num_err_log_entries" : "12",
  "warning_temp_time" : 0,
  "critical_comp_time" : 0,
  "temperature_sensor_1" : 310,
  "thm_temp1_trans_count" : 2,
  "thm_temp2_trans_count" : 0,
  "thm_temp1_total_time" : 35,
  "thm_temp2_total_time" : 0
}}"#
        )
    }

    #[test]
    fn test_parse_number_with_commas() {
        assert_eq!(parse_number_with_commas("1,234,567").unwrap(), 1_234_567);
        assert_eq!(parse_number_with_commas("42").unwrap(), 42);
        assert!(parse_number_with_commas("abc").is_err());
        assert!(parse_number_with_commas("-5").is_err());
    }

    #[test]
    fn test_kelvin_to_celsius() {
        assert_eq!(kelvin_to_celsius(300), 27);
        assert_eq!(kelvin_to_celsius(274), 1);
        assert_eq!(kelvin_to_celsius(273), 0);
        assert_eq!(kelvin_to_celsius(0), -273);
    }

    #[test]
    fn test_normalize_smart_log() {
        let health = normalize(smart_log_json(300, "1,234,567").as_bytes()).unwrap();

        assert_eq!(health.temperature, 27);
        assert_eq!(health.avail_spare, 100);
        assert_eq!(health.percent_used, 3);
        assert_eq!(health.data_units_read, 1_234_567);
        assert_eq!(health.data_units_written, 98_765);
        assert_eq!(health.host_write_commands, 2_000_000);
        assert_eq!(health.power_on_hours, 8_760);
        assert_eq!(health.num_err_log_entries, 12);
        assert_eq!(health.thm_temp1_trans_count, 2);
        assert_eq!(health.thm_temp1_total_time, 35);
    }

    #[test]
    fn test_malformed_counter_degrades_to_zero() {
        let health = normalize(smart_log_json(274, "abc").as_bytes()).unwrap();

        assert_eq!(health.data_units_read, 0);
        assert_eq!(health.temperature, 1);
        // neighbouring counters are unaffected
        assert_eq!(health.data_units_written, 98_765);
    }

    #[test]
    fn test_numeric_and_missing_counters() {
        let json = r#"{
            "critical_warning": 1, "temperature": 310, "avail_spare": 90,
            "spare_thresh": 5, "percent_used": 12,
            "endurance_grp_critical_warning_summary": 0,
            "data_units_read": 5555, "data_units_written": true,
            "warning_temp_time": 4, "critical_comp_time": 1,
            "thm_temp1_trans_count": 0, "thm_temp2_trans_count": 0,
            "thm_temp1_total_time": 0, "thm_temp2_total_time": 0
        }"#;
        let health = normalize(json.as_bytes()).unwrap();

        assert_eq!(health.critical_warning, 1);
        assert_eq!(health.temperature, 37);
        assert_eq!(health.data_units_read, 5555);
        assert_eq!(health.data_units_written, 0);
        assert_eq!(health.media_errors, 0);
        assert_eq!(health.warning_temp_time, 4);
    }

    #[test]
    fn test_malformed_blob_is_rejected() {
        assert!(normalize(b"not json").is_err());
        assert!(normalize(b"{}").is_err());
        assert!(normalize(smart_log_json(300, "1").replace("\"avail_spare\" : 100", "\"avail_spare\" : \"x\"").as_bytes()).is_err());
    }
}
