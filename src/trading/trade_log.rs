use chrono::NaiveDateTime;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Direction, Mode, PlanResponse};

pub const DEFAULT_LOG_FILE: &str = "trade_log.csv";

/// ISO-8601 local time with microseconds.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const TIME_FORMATS_ACCEPTED: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: invalid timestamp '{value}'")]
    Timestamp { row: usize, value: String },
}

/// On-disk shape of one log row. Field order is the column order.
#[derive(Debug, Serialize, Deserialize)]
struct RawRow {
    time: String,
    mode: Mode,
    dir: Direction,
    #[serde(rename = "r%")]
    risk_pct: f64,
    entry: String,
    sl: f64,
    lot: String,
    tp: String,
    rr: String,
    #[serde(rename = "risk$")]
    risk: String,
    #[serde(rename = "profit$")]
    profit: String,
}

/// A saved plan as read back for the dashboard. Sequence columns stay in
/// their textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub time: NaiveDateTime,
    pub mode: Mode,
    pub dir: Direction,
    pub risk_pct: f64,
    pub entry: String,
    pub sl: f64,
    pub lot: String,
    pub tp: String,
    pub rr: String,
    pub risk: String,
    pub profit: String,
}

impl LogRow {
    pub fn from_response(resp: &PlanResponse) -> Result<Self, PersistenceError> {
        Ok(Self {
            time: resp.timestamp,
            mode: resp.mode,
            dir: resp.direction,
            risk_pct: resp.risk_fraction * 100.0,
            entry: serde_json::to_string(&resp.entries)?,
            sl: resp.stop_loss_distance,
            lot: serde_json::to_string(&resp.lot_sizes)?,
            tp: serde_json::to_string(&resp.tp_prices)?,
            rr: serde_json::to_string(&resp.rr)?,
            risk: serde_json::to_string(&resp.risk_per_leg)?,
            profit: serde_json::to_string(&resp.profit_per_leg)?,
        })
    }

    /// Sum of the `risk$` column; an unreadable cell counts as zero.
    pub fn total_risk(&self) -> f64 {
        serde_json::from_str::<Vec<f64>>(&self.risk)
            .map(|v| v.iter().sum())
            .unwrap_or(0.0)
    }

    fn into_raw(self) -> RawRow {
        RawRow {
            time: self.time.format(TIME_FORMAT).to_string(),
            mode: self.mode,
            dir: self.dir,
            risk_pct: self.risk_pct,
            entry: self.entry,
            sl: self.sl,
            lot: self.lot,
            tp: self.tp,
            rr: self.rr,
            risk: self.risk,
            profit: self.profit,
        }
    }

    fn from_raw(raw: RawRow, row: usize) -> Result<Self, PersistenceError> {
        let time = parse_time(&raw.time).ok_or_else(|| PersistenceError::Timestamp {
            row,
            value: raw.time.clone(),
        })?;
        Ok(Self {
            time,
            mode: raw.mode,
            dir: raw.dir,
            risk_pct: raw.risk_pct,
            entry: raw.entry,
            sl: raw.sl,
            lot: raw.lot,
            tp: raw.tp,
            rr: raw.rr,
            risk: raw.risk,
            profit: raw.profit,
        })
    }
}

fn parse_time(s: &str) -> Option<NaiveDateTime> {
    TIME_FORMATS_ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub plans: usize,
    pub fibo_plans: usize,
    pub custom_plans: usize,
    pub total_risk: f64,
}

impl DashboardSummary {
    pub fn from_rows(rows: &[LogRow]) -> Self {
        Self {
            plans: rows.len(),
            fibo_plans: rows.iter().filter(|r| r.mode == Mode::Fibo).count(),
            custom_plans: rows.iter().filter(|r| r.mode == Mode::Custom).count(),
            total_risk: rows.iter().map(LogRow::total_risk).sum(),
        }
    }
}

/// Append-only CSV log of saved plans.
pub struct TradeLog {
    path: PathBuf,
}

impl TradeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one row; the header goes out only when the file is new or empty.
    pub fn append(&self, resp: &PlanResponse) -> Result<(), PersistenceError> {
        let row = LogRow::from_response(resp)?.into_raw();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .quote_style(QuoteStyle::NonNumeric)
            .from_writer(file);
        writer.serialize(&row)?;
        writer.flush().map_err(|e| self.io_err(e))?;

        info!("Saved {} plan to {}", resp.mode, self.path.display());
        Ok(())
    }

    /// Reads every saved row. A log that doesn't exist yet is empty.
    pub fn load(&self) -> Result<Vec<LogRow>, PersistenceError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No trade log at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_err(e)),
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut rows = Vec::new();
        for (i, result) in reader.deserialize::<RawRow>().enumerate() {
            rows.push(LogRow::from_raw(result?, i + 1)?);
        }

        debug!("Loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn io_err(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
