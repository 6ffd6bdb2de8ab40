/// Per-device gauges, labeled by device path only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GaugeKind {
    UsedBytes,
    MaximumLba,
    PhysicalSize,
    SectorSize,
    CriticalWarning,
    Temperature,
    AvailSpare,
    SpareThresh,
    PercentUsed,
    EnduranceGrpCriticalWarningSummary,
    DataUnitsRead,
    DataUnitsWritten,
    HostReadCommands,
    HostWriteCommands,
    ControllerBusyTime,
    PowerCycles,
    PowerOnHours,
    UnsafeShutdowns,
    MediaErrors,
    NumErrLogEntries,
    WarningTempTime,
    CriticalCompTime,
    ThmTemp1TransCount,
    ThmTemp2TransCount,
    ThmTemp1TotalTime,
    ThmTemp2TotalTime,
}

impl GaugeKind {
    pub const ALL: [GaugeKind; 26] = [
        Self::UsedBytes,
        Self::MaximumLba,
        Self::PhysicalSize,
        Self::SectorSize,
        Self::CriticalWarning,
        Self::Temperature,
        Self::AvailSpare,
        Self::SpareThresh,
        Self::PercentUsed,
        Self::EnduranceGrpCriticalWarningSummary,
        Self::DataUnitsRead,
        Self::DataUnitsWritten,
        Self::HostReadCommands,
        Self::HostWriteCommands,
        Self::ControllerBusyTime,
        Self::PowerCycles,
        Self::PowerOnHours,
        Self::UnsafeShutdowns,
        Self::MediaErrors,
        Self::NumErrLogEntries,
        Self::WarningTempTime,
        Self::CriticalCompTime,
        Self::ThmTemp1TransCount,
        Self::ThmTemp2TransCount,
        Self::ThmTemp1TotalTime,
        Self::ThmTemp2TotalTime,
    ];

    /// Exported metric name
    pub fn name(&self) -> &'static str {
        match self {
            Self::UsedBytes => "nvme_used_bytes",
            Self::MaximumLba => "nvme_maximum_lba",
            Self::PhysicalSize => "nvme_physical_size",
            Self::SectorSize => "nvme_sector_size",
            Self::CriticalWarning => "nvme_critical_warning",
            Self::Temperature => "nvme_temperature",
            Self::AvailSpare => "nvme_avail_spare",
            Self::SpareThresh => "nvme_spare_thresh",
            Self::PercentUsed => "nvme_percent_used",
            Self::EnduranceGrpCriticalWarningSummary => "nvme_endurance_grp_critical_warning_summary",
            Self::DataUnitsRead => "nvme_data_units_read",
            Self::DataUnitsWritten => "nvme_data_units_written",
            Self::HostReadCommands => "nvme_host_read_commands",
            Self::HostWriteCommands => "nvme_host_write_commands",
            Self::ControllerBusyTime => "nvme_controller_busy_time",
            Self::PowerCycles => "nvme_power_cycles",
            Self::PowerOnHours => "nvme_power_on_hours",
            Self::UnsafeShutdowns => "nvme_unsafe_shutdowns",
            Self::MediaErrors => "nvme_media_errors",
            Self::NumErrLogEntries => "nvme_num_err_log_entries",
            Self::WarningTempTime => "nvme_warning_temp_time",
            Self::CriticalCompTime => "nvme_critical_comp_time",
            Self::ThmTemp1TransCount => "nvme_thm_temp1_trans_count",
            Self::ThmTemp2TransCount => "nvme_thm_temp2_trans_count",
            Self::ThmTemp1TotalTime => "nvme_thm_temp1_trans_time",
            Self::ThmTemp2TotalTime => "nvme_thm_temp2_trans_time",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Self::UsedBytes => "Number of bytes used on the device",
            Self::MaximumLba => "Maximum Logical Block Address",
            Self::PhysicalSize => "Physical size of the device in bytes",
            Self::SectorSize => "Sector size in bytes",
            Self::CriticalWarning => "Critical warnings for the state of the controller",
            Self::Temperature => "Temperature in degrees celsius",
            Self::AvailSpare => "Normalized percentage of remaining spare capacity available",
            Self::SpareThresh => "Async event completion may occur when avail spare < threshold",
            Self::PercentUsed => "Vendor specific estimate of the percentage of life used",
            Self::EnduranceGrpCriticalWarningSummary => "Critical warnings for the state of endurance groups",
            Self::DataUnitsRead => "Number of 512 byte data units host has read",
            Self::DataUnitsWritten => "Number of 512 byte data units the host has written",
            Self::HostReadCommands => "Number of read commands completed",
            Self::HostWriteCommands => "Number of write commands completed",
            Self::ControllerBusyTime => "Amount of time in minutes controller busy with IO commands",
            Self::PowerCycles => "Number of power cycles",
            Self::PowerOnHours => "Number of power on hours",
            Self::UnsafeShutdowns => "Number of unsafe shutdowns",
            Self::MediaErrors => "Number of unrecovered data integrity errors",
            Self::NumErrLogEntries => "Lifetime number of error log entries",
            Self::WarningTempTime => "Amount of time in minutes temperature > warning threshold",
            Self::CriticalCompTime => "Amount of time in minutes temperature > critical threshold",
            Self::ThmTemp1TransCount | Self::ThmTemp2TransCount => {
                "Number of times controller transitioned to lower power"
            }
            Self::ThmTemp1TotalTime | Self::ThmTemp2TotalTime => {
                "Total number of seconds controller transitioned to lower power"
            }
        }
    }
}

/// Process-level counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    LoopRuns,
}

impl CounterKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoopRuns => "loop_runs_total",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Self::LoopRuns => "Total number of main loop runs",
        }
    }
}

pub const INFO_METRIC_NAME: &str = "nvme_device_info";
pub const INFO_METRIC_HELP: &str = "Identity of the device behind a device path";
