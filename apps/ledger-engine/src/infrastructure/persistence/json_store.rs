//! File-backed ledger store.
//!
//! Layout under the data directory, one file per concern:
//!
//! - `positions.json` - the current ledger, republished every run
//! - `positions-<date>.json` - dated copy of the same rows
//! - `activity.jsonl` - append-only activity log, one row per line
//! - `fills-<date>.json` - archived raw fill-set for recovery runs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::{FillArchivePort, LedgerStoreError, LedgerStorePort};
use crate::domain::ledger::value_objects::{LedgerRow, PriorLedger};
use crate::domain::trade_capture::ExecutionReport;

/// JSON-file implementation of `LedgerStorePort` and `FillArchivePort`.
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    data_dir: PathBuf,
}

impl JsonLedgerStore {
    /// Create a store rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn positions_path(&self) -> PathBuf {
        self.data_dir.join("positions.json")
    }

    fn dated_positions_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(format!("positions-{date}.json"))
    }

    fn activity_path(&self) -> PathBuf {
        self.data_dir.join("activity.jsonl")
    }

    fn fills_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(format!("fills-{date}.json"))
    }

    async fn ensure_dir(&self) -> Result<(), LedgerStoreError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| io_error(&self.data_dir, source))
    }

    async fn write_json<T: serde::Serialize>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), LedgerStoreError> {
        self.ensure_dir().await?;
        let body = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, body)
            .await
            .map_err(|source| io_error(path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LedgerStoreError {
    LedgerStoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl LedgerStorePort for JsonLedgerStore {
    async fn load_prior_ledger(
        &self,
        _run_date: NaiveDate,
    ) -> Result<PriorLedger, LedgerStoreError> {
        // The store republishes in place, so `positions.json` is by
        // construction the ledger of the last completed run.
        let path = self.positions_path();
        match tokio::fs::read(&path).await {
            Ok(body) => {
                let rows: Vec<LedgerRow> = serde_json::from_slice(&body)?;
                debug!(path = %path.display(), rows = rows.len(), "prior ledger loaded");
                Ok(PriorLedger::new(rows))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no prior ledger on disk, starting empty");
                Ok(PriorLedger::empty())
            }
            Err(source) => Err(io_error(&path, source)),
        }
    }

    async fn save_ledger(
        &self,
        date: NaiveDate,
        rows: &[LedgerRow],
    ) -> Result<(), LedgerStoreError> {
        self.write_json(&self.positions_path(), &rows).await?;
        self.write_json(&self.dated_positions_path(date), &rows).await
    }

    async fn append_activity(&self, rows: &[LedgerRow]) -> Result<(), LedgerStoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.ensure_dir().await?;
        let path = self.activity_path();
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| io_error(&path, source))?;
        let mut body = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut body, row)?;
            body.push(b'\n');
        }
        file.write_all(&body)
            .await
            .map_err(|source| io_error(&path, source))?;
        file.flush()
            .await
            .map_err(|source| io_error(&path, source))
    }
}

#[async_trait]
impl FillArchivePort for JsonLedgerStore {
    async fn save_fills(
        &self,
        date: NaiveDate,
        reports: &[ExecutionReport],
    ) -> Result<(), LedgerStoreError> {
        self.write_json(&self.fills_path(date), &reports).await
    }

    async fn load_fills(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ExecutionReport>, LedgerStoreError> {
        let path = self.fills_path(date);
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(serde_json::from_slice(&body)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(io_error(&path, source)),
        }
    }
}
