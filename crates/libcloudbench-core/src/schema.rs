//! Column schema of the output CSV
//!
//! The schema is fixed when the process starts. Disabling a probe never
//! removes its columns; only a different configuration variant (no CDN
//! probe) produces a different column set.

use std::fmt;

use crate::error::{CloudBenchError, Result};

/// Name of the leading timestamp column
pub const TIME_COLUMN: &str = "Time";

/// One named metric column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricColumn {
    CdnDownload,
    Ping,
    Download,
    Upload,
    CpuTime,
    ReadIops,
    WriteIops,
    IoPing,
}

impl MetricColumn {
    /// Every column, in output order
    pub const ALL: [MetricColumn; 8] = [
        MetricColumn::CdnDownload,
        MetricColumn::Ping,
        MetricColumn::Download,
        MetricColumn::Upload,
        MetricColumn::CpuTime,
        MetricColumn::ReadIops,
        MetricColumn::WriteIops,
        MetricColumn::IoPing,
    ];

    /// Header text written to the CSV
    pub fn header(&self) -> &'static str {
        match self {
            MetricColumn::CdnDownload => "Download (CDN)",
            MetricColumn::Ping => "Ping",
            MetricColumn::Download => "Download",
            MetricColumn::Upload => "Upload",
            MetricColumn::CpuTime => "CPU Time",
            MetricColumn::ReadIops => "Read IOPS",
            MetricColumn::WriteIops => "Write IOPS",
            MetricColumn::IoPing => "IO Ping",
        }
    }
}

impl fmt::Display for MetricColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Ordered set of metric columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<MetricColumn>,
}

impl Schema {
    /// Build a schema, rejecting empty or duplicated column lists
    pub fn new(columns: Vec<MetricColumn>) -> Result<Self> {
        if columns.is_empty() {
            return Err(CloudBenchError::Schema("schema has no columns".to_string()));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(CloudBenchError::Schema(format!(
                    "column '{}' appears more than once",
                    column
                )));
            }
        }
        Ok(Self { columns })
    }

    /// The full column set, optionally without the CDN column
    pub fn standard(include_cdn: bool) -> Self {
        let columns = MetricColumn::ALL
            .iter()
            .copied()
            .filter(|c| include_cdn || *c != MetricColumn::CdnDownload)
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    /// Number of metric columns (the timestamp column is not counted)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: MetricColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Header fields, starting with the timestamp column
    pub fn header_fields(&self) -> Vec<&'static str> {
        std::iter::once(TIME_COLUMN)
            .chain(self.columns.iter().map(|c| c.header()))
            .collect()
    }
}
