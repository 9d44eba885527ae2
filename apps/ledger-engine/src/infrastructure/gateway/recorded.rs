//! File-backed execution gateway.
//!
//! Replays a day's post-trade data from recorded JSON files instead of a
//! live brokerage session: `fills-<date>.json`, `portfolio-<date>.json` and
//! `account-<date>.json` under the data directory. A live brokerage adapter
//! plugs in behind the same port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::{ExecutionGatewayPort, GatewayError};
use crate::domain::position_report::PortfolioPosition;
use crate::domain::trade_capture::ExecutionReport;

/// Recorded-file implementation of `ExecutionGatewayPort`.
#[derive(Debug, Clone)]
pub struct RecordedGateway {
    data_dir: PathBuf,
    date: NaiveDate,
}

impl RecordedGateway {
    /// Create a gateway replaying the given date's recordings.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            data_dir: data_dir.into(),
            date,
        }
    }

    async fn read_or<T: DeserializeOwned>(
        path: &Path,
        missing: T,
    ) -> Result<T, GatewayError> {
        match tokio::fs::read(path).await {
            Ok(body) => serde_json::from_slice(&body).map_err(|err| GatewayError::DataError {
                message: format!("malformed recording '{}': {err}", path.display()),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no recording on disk");
                Ok(missing)
            }
            Err(err) => Err(GatewayError::ConnectionError {
                message: format!("cannot read '{}': {err}", path.display()),
            }),
        }
    }
}

#[async_trait]
impl ExecutionGatewayPort for RecordedGateway {
    async fn get_fills_for_today(&self) -> Result<Vec<ExecutionReport>, GatewayError> {
        let path = self.data_dir.join(format!("fills-{}.json", self.date));
        Self::read_or(&path, Vec::new()).await
    }

    async fn get_portfolio_snapshot(&self) -> Result<Vec<PortfolioPosition>, GatewayError> {
        let path = self.data_dir.join(format!("portfolio-{}.json", self.date));
        Self::read_or(&path, Vec::new()).await
    }

    async fn get_account_value(&self) -> Result<Decimal, GatewayError> {
        let path = self.data_dir.join(format!("account-{}.json", self.date));
        Self::read_or(&path, Decimal::ZERO).await
    }
}
