//! One benchmark run and the values it collects

use std::fmt;

use chrono::{DateTime, FixedOffset, Local};

use crate::error::{CloudBenchError, Result};
use crate::schema::{MetricColumn, Schema};

/// Sentinel written for columns whose probe is disabled
pub const PLACEHOLDER: &str = "N/A";

/// Timestamp layout of the first CSV field (no commas)
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S %z";

/// A single metric value
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    /// Free-form reading kept as reported by the tool, e.g. `250.3 us`
    Text(String),
    /// Probe disabled by configuration
    Unavailable,
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Unavailable => f.write_str(PLACEHOLDER),
        }
    }
}

/// A run in progress or completed
///
/// Values must be recorded in schema order; `is_complete` only holds once
/// every column has a value.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    index: u64,
    started_at: DateTime<Local>,
    columns: Vec<MetricColumn>,
    values: Vec<MetricValue>,
}

impl BenchmarkRun {
    /// Start run `index` (1-based), capturing the current local time
    pub fn begin(index: u64, schema: &Schema) -> Self {
        Self::begin_at(index, Local::now(), schema)
    }

    pub fn begin_at(index: u64, started_at: DateTime<Local>, schema: &Schema) -> Self {
        Self {
            index,
            started_at,
            columns: schema.columns().to_vec(),
            values: Vec::with_capacity(schema.len()),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Record the value of the next column
    pub fn record(&mut self, column: MetricColumn, value: MetricValue) -> Result<()> {
        match self.columns.get(self.values.len()) {
            Some(expected) if *expected == column => {
                self.values.push(value);
                Ok(())
            }
            Some(expected) => Err(CloudBenchError::Schema(format!(
                "run {} expected a value for '{}' but got '{}'",
                self.index, expected, column
            ))),
            None => Err(CloudBenchError::Schema(format!(
                "run {} already has all {} columns, got extra '{}'",
                self.index,
                self.columns.len(),
                column
            ))),
        }
    }

    /// The column the next recorded value must belong to
    pub fn next_column(&self) -> Option<MetricColumn> {
        self.columns.get(self.values.len()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == self.columns.len()
    }

    pub fn values(&self) -> &[MetricValue] {
        &self.values
    }

    pub fn value(&self, column: MetricColumn) -> Option<&MetricValue> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn timestamp(&self) -> String {
        self.started_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Unescaped CSV fields: timestamp followed by one field per column
    pub fn fields(&self) -> Result<Vec<String>> {
        if !self.is_complete() {
            return Err(CloudBenchError::Schema(format!(
                "run {} has {} of {} values",
                self.index,
                self.values.len(),
                self.columns.len()
            )));
        }
        Ok(std::iter::once(self.timestamp())
            .chain(self.values.iter().map(|v| v.to_string()))
            .collect())
    }
}

/// Parse the first field of a data row back into a timestamp
pub fn parse_timestamp(field: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(field, TIMESTAMP_FORMAT).ok()
}
