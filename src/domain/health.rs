use super::GaugeKind;

/// Normalized smart-log health record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceHealth {
    pub critical_warning: u32,
    /// Degrees Celsius
    pub temperature: i32,
    pub avail_spare: u32,
    pub spare_thresh: u32,
    pub percent_used: u32,
    pub endurance_grp_critical_warning_summary: u32,
    pub data_units_read: u64,
    pub data_units_written: u64,
    pub host_read_commands: u64,
    pub host_write_commands: u64,
    pub controller_busy_time: u64,
    pub power_cycles: u64,
    pub power_on_hours: u64,
    pub unsafe_shutdowns: u64,
    pub media_errors: u64,
    pub num_err_log_entries: u64,
    pub warning_temp_time: u32,
    pub critical_comp_time: u32,
    pub thm_temp1_trans_count: u32,
    pub thm_temp2_trans_count: u32,
    pub thm_temp1_total_time: u32,
    pub thm_temp2_total_time: u32,
}

impl DeviceHealth {
    pub fn readings(&self) -> [(GaugeKind, f64); 22] {
        [
            (GaugeKind::CriticalWarning, self.critical_warning as f64),
            (GaugeKind::Temperature, self.temperature as f64),
            (GaugeKind::AvailSpare, self.avail_spare as f64),
            (GaugeKind::SpareThresh, self.spare_thresh as f64),
            (GaugeKind::PercentUsed, self.percent_used as f64),
            (
                GaugeKind::EnduranceGrpCriticalWarningSummary,
                self.endurance_grp_critical_warning_summary as f64,
            ),
            (GaugeKind::DataUnitsRead, self.data_units_read as f64),
            (GaugeKind::DataUnitsWritten, self.data_units_written as f64),
            (GaugeKind::HostReadCommands, self.host_read_commands as f64),
            (GaugeKind::HostWriteCommands, self.host_write_commands as f64),
            (GaugeKind::ControllerBusyTime, self.controller_busy_time as f64),
            (GaugeKind::PowerCycles, self.power_cycles as f64),
            (GaugeKind::PowerOnHours, self.power_on_hours as f64),
            (GaugeKind::UnsafeShutdowns, self.unsafe_shutdowns as f64),
            (GaugeKind::MediaErrors, self.media_errors as f64),
            (GaugeKind::NumErrLogEntries, self.num_err_log_entries as f64),
            (GaugeKind::WarningTempTime, self.warning_temp_time as f64),
            (GaugeKind::CriticalCompTime, self.critical_comp_time as f64),
            (GaugeKind::ThmTemp1TransCount, self.thm_temp1_trans_count as f64),
            (GaugeKind::ThmTemp2TransCount, self.thm_temp2_trans_count as f64),
            (GaugeKind::ThmTemp1TotalTime, self.thm_temp1_total_time as f64),
            (GaugeKind::ThmTemp2TotalTime, self.thm_temp2_total_time as f64),
        ]
    }
}
