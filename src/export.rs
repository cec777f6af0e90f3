//! CSV export of session history and scenario CSV import
//!
//! One row per prediction record: inputs, predictions, derived metrics and,
//! optionally, the advisory texts joined into a single cell.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::config::defaults::ADVISORY_JOIN_SEPARATOR;
use crate::config::ExportConfig;
use crate::error::EstimatorError;
use crate::session::SessionHistory;
use crate::types::{OperatingInputs, PredictionRecord};

/// Columns of every export, in order.
pub const EXPORT_COLUMNS: [&str; 13] = [
    "recorded_at",
    "installed_capacity_mw",
    "coal_received_mtpa",
    "gas_received_mmscm",
    "plf_pct",
    "fuel_cost_per_unit",
    "avg_tariff",
    "re_share_pct",
    "power_bu",
    "co2_tonnes",
    "revenue_cr",
    "cost_cr",
    "profit_cr",
];

/// Trailing column present when advisories are exported.
pub const ADVISORIES_COLUMN: &str = "advisories";

fn row(record: &PredictionRecord, include_advisories: bool) -> Vec<String> {
    let inputs = record.inputs();
    let prediction = record.prediction();
    let metrics = record.metrics();

    let mut fields = vec![record.recorded_at().to_rfc3339()];
    fields.extend(inputs.named_values().iter().map(|(_, v)| v.to_string()));
    fields.extend(
        [
            prediction.power_bu,
            prediction.co2_tonnes,
            metrics.revenue_cr,
            metrics.cost_cr,
            metrics.profit_cr,
        ]
        .iter()
        .map(ToString::to_string),
    );

    if include_advisories {
        let joined = record
            .advisories()
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(ADVISORY_JOIN_SEPARATOR);
        fields.push(joined);
    }
    fields
}

/// Write `records` as CSV with a header row. Returns the number of data rows.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[PredictionRecord],
    include_advisories: bool,
) -> Result<usize, EstimatorError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = EXPORT_COLUMNS.to_vec();
    if include_advisories {
        header.push(ADVISORIES_COLUMN);
    }
    wtr.write_record(&header)?;

    for record in records {
        wtr.write_record(row(record, include_advisories))?;
    }
    wtr.flush()?;
    Ok(records.len())
}

pub fn to_csv_string(
    records: &[PredictionRecord],
    include_advisories: bool,
) -> Result<String, EstimatorError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, include_advisories)?;
    String::from_utf8(buf).map_err(|e| EstimatorError::Export(e.to_string()))
}

/// Write `records` to `path`, creating parent directories as needed.
pub fn export_to_file(
    path: &Path,
    records: &[PredictionRecord],
    include_advisories: bool,
) -> Result<usize, EstimatorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows = write_csv(file, records, include_advisories)?;
    info!(path = %path.display(), rows, "History exported");
    Ok(rows)
}

/// Export a snapshot of `history` into `config.output_dir` under a
/// timestamped file name. Returns the path written.
///
/// Never replaces an existing file: a name collision is an `Export` error.
pub fn export_session(
    history: &SessionHistory,
    config: &ExportConfig,
) -> Result<PathBuf, EstimatorError> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let dir = Path::new(&config.output_dir);
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{timestamp}.csv", history.session_id()));

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => {
                EstimatorError::Export(format!("{} already exists", path.display()))
            }
            _ => EstimatorError::from(e),
        })?;
    let rows = write_csv(file, &history.snapshot(), config.include_advisories)?;
    info!(session = %history.session_id(), path = %path.display(), rows, "Session exported");
    Ok(path)
}

/// Read a scenario CSV into inputs, one per row.
///
/// Headers may use either the snake_case field names or the model's
/// training column names.
pub fn read_scenarios<R: Read>(reader: R) -> Result<Vec<OperatingInputs>, csv::Error> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdvisoryCategory, AdvisoryMessage, DerivedMetrics, PredictionResult};

    fn record() -> PredictionRecord {
        PredictionRecord::new(
            OperatingInputs::default(),
            PredictionResult { power_bu: 300.0, co2_tonnes: 240_000_000.0 },
            DerivedMetrics { revenue_cr: 120_000.0, cost_cr: 96_000.0, profit_cr: 24_000.0 },
            vec![
                AdvisoryMessage::new(AdvisoryCategory::LoadFactor, "PLF low, raise it"),
                AdvisoryMessage::new(AdvisoryCategory::GeneralTip, "Track heat rate"),
            ],
        )
    }

    #[test]
    fn test_header_and_one_row_per_record() {
        let records = vec![record(), record(), record()];
        let out = to_csv_string(&records, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], EXPORT_COLUMNS.join(","));
        assert!(lines[1].ends_with(",300,240000000,120000,96000,24000"));
    }

    #[test]
    fn test_advisories_joined_and_quoted() {
        let out = to_csv_string(&[record()], true).unwrap();
        let mut rdr = csv::Reader::from_reader(out.as_bytes());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.get(13), Some(ADVISORIES_COLUMN));
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(row.get(13), Some("PLF low, raise it | Track heat rate"));
    }

    #[test]
    fn test_empty_history_exports_header_only() {
        let out = to_csv_string(&[], true).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_export_session_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = SessionHistory::with_id("shift-a");
        history.append(record());
        let config = ExportConfig {
            include_advisories: true,
            output_dir: dir.path().join("exports").display().to_string(),
        };

        let path = export_session(&history, &config).unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("shift-a_") && name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_back_to_back_sessions_export_to_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            include_advisories: false,
            output_dir: dir.path().display().to_string(),
        };

        let mut first = SessionHistory::new();
        first.append(record());
        first.append(record());
        let mut second = SessionHistory::new();
        second.append(record());

        let a = export_session(&first, &config).unwrap();
        let b = export_session(&second, &config).unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read_to_string(a).unwrap().lines().count(), 3);
        assert_eq!(std::fs::read_to_string(b).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_export_session_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            include_advisories: false,
            output_dir: dir.path().display().to_string(),
        };
        let mut history = SessionHistory::with_id("fixed");
        history.append(record());

        // Pre-create every name the export could pick within the next minute
        let now = Local::now();
        for offset in 0..60 {
            let stamp = (now + chrono::Duration::seconds(offset)).format("%Y%m%d_%H%M%S");
            std::fs::write(dir.path().join(format!("fixed_{stamp}.csv")), "keep").unwrap();
        }

        let err = export_session(&history, &config).unwrap_err();
        assert!(matches!(err, EstimatorError::Export(ref m) if m.contains("already exists")));
        let stamp = now.format("%Y%m%d_%H%M%S");
        assert_eq!(
            std::fs::read_to_string(dir.path().join(format!("fixed_{stamp}.csv"))).unwrap(),
            "keep"
        );
    }

    #[test]
    fn test_read_scenarios_accepts_training_headers() {
        let data = "\
Installed_Capacity_MW,Coal_Received_MTPA,Gas_Received_MMSCM,PLF_Percentage,Fuel_Cost_per_Unit,Avg_Tariff (ECR),RE_Share_Percentage
60000,18500000,3000,72,3.2,4.0,28
45000,9000000,500,55,3.9,3.4,12
";
        let scenarios = read_scenarios(data.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0], OperatingInputs::default());
        assert_eq!(scenarios[1].plf_pct, 55.0);
    }
}
