//! CSV result sink
//!
//! The sink keeps the whole CSV text in memory and rewrites the output
//! file with history plus the new row on every successful run. A failed
//! write leaves both the file and the in-memory history untouched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CloudBenchError, Result};
use crate::run::BenchmarkRun;
use crate::schema::Schema;

/// Accumulating CSV writer
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    columns: usize,
    buffer: String,
    rows: usize,
}

impl CsvSink {
    /// Create (or truncate) the output file and write the header row
    pub fn create(path: impl Into<PathBuf>, schema: &Schema) -> Result<Self> {
        let path = path.into();
        let header = format_record(schema.header_fields());
        let mut buffer = String::with_capacity(header.len() + 1);
        buffer.push_str(&header);
        buffer.push('\n');

        write_atomic(&path, &buffer)?;
        debug!(path = %path.display(), columns = schema.len(), "wrote CSV header");

        Ok(Self {
            path,
            columns: schema.len() + 1,
            buffer,
            rows: 0,
        })
    }

    /// Rewrite the output file with every recorded row plus `run`
    pub fn append(&mut self, run: &BenchmarkRun) -> Result<()> {
        let fields = run.fields()?;
        if fields.len() != self.columns {
            return Err(CloudBenchError::Schema(format!(
                "run {} has {} fields, header has {}",
                run.index(),
                fields.len(),
                self.columns
            )));
        }

        let row = format_record(fields);
        let mut next = String::with_capacity(self.buffer.len() + row.len() + 1);
        next.push_str(&self.buffer);
        next.push_str(&row);
        next.push('\n');

        write_atomic(&self.path, &next)?;
        self.buffer = next;
        self.rows += 1;
        debug!(path = %self.path.display(), run = run.index(), rows = self.rows, "appended CSV row");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Everything written so far, header included
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Number of data rows written
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Join fields into one CSV line, quoting where needed
pub fn format_record<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Temporary sibling used while rewriting `path`
pub fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cloudbench.csv".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let staging = staging_path(path);
    fs::write(&staging, contents)?;
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::MetricValue;
    use crate::schema::MetricColumn;
    use tempfile::tempdir;

    fn cpu_schema() -> Schema {
        Schema::new(vec![MetricColumn::CpuTime, MetricColumn::IoPing]).unwrap()
    }

    fn complete_run(index: u64, schema: &Schema) -> BenchmarkRun {
        let mut run = BenchmarkRun::begin(index, schema);
        run.record(MetricColumn::CpuTime, MetricValue::Number(index as f64 + 0.5)).unwrap();
        run.record(MetricColumn::IoPing, MetricValue::Text("250.3 us".into())).unwrap();
        run
    }

    #[test]
    fn test_create_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::create(&path, &cpu_schema()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Time,CPU Time,IO Ping\n");
        assert_eq!(sink.rows(), 0);
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_append_rewrites_history() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let schema = cpu_schema();
        let mut sink = CsvSink::create(&path, &schema).unwrap();

        sink.append(&complete_run(1, &schema)).unwrap();
        sink.append(&complete_run(2, &schema)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, sink.contents());
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",1.5,250.3 us"));
        assert!(lines[2].ends_with(",2.5,250.3 us"));
    }

    #[test]
    fn test_incomplete_run_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let schema = cpu_schema();
        let mut sink = CsvSink::create(&path, &schema).unwrap();

        let mut run = BenchmarkRun::begin(1, &schema);
        run.record(MetricColumn::CpuTime, MetricValue::Number(1.0)).unwrap();

        assert!(sink.append(&run).is_err());
        assert_eq!(sink.rows(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Time,CPU Time,IO Ping\n");
    }

    #[test]
    fn test_failed_write_keeps_previous_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let schema = cpu_schema();
        let mut sink = CsvSink::create(&path, &schema).unwrap();
        sink.append(&complete_run(1, &schema)).unwrap();
        let before = fs::read(&path).unwrap();

        // A directory in the staging slot makes the next write fail
        fs::create_dir(staging_path(&path)).unwrap();
        let result = sink.append(&complete_run(2, &schema));

        assert!(matches!(result, Err(CloudBenchError::Io(_))));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(sink.rows(), 1);
        assert_eq!(sink.contents().as_bytes(), before.as_slice());
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        assert_eq!(format_record(["a", "b,c", "say \"hi\""]), "a,\"b,c\",\"say \"\"hi\"\"\"");
    }
}
