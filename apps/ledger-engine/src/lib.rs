// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Ledger Engine - Rust Core Library
//!
//! Trade reconciliation and position-ledger engine for a covered-call
//! program: given yesterday's persisted ledger, today's raw execution fills
//! and today's portfolio snapshot, it produces a classified, priced and
//! P&L-annotated ledger for today plus an append-only activity log.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (value objects, pure services)
//!   - `trade_capture`: fills, combo classification, leg projection
//!   - `ledger`: ledger rows, basis/action resolution, reconciliation
//!   - `position_report`: end-of-day portfolio annotation
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`ExecutionGatewayPort`,
//!     `LedgerStorePort`, `DeltaLookupPort`, `TradingCalendarPort`,
//!     `FillArchivePort`)
//!   - `use_cases`: `RecordDay` - one batch run per invocation
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: JSON file store, in-memory store
//!   - `calendar`: holiday-file trading calendar
//!   - `gateway`: recorded-file gateway for replay and recovery
//!   - `delta`: static delta table

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Tracing initialization.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::ledger::{
    ActionLabel, LedgerRow, PriorLedger, RowPatch, TradeReconciler, TradeReconciliation,
};
pub use domain::position_report::{
    AnnotationContext, PortfolioAnnotation, PortfolioAnnotator, PortfolioPosition,
};
pub use domain::shared::{Contract, RowKey, Symbol};
pub use domain::trade_capture::{
    ComboClassifier, ComboKind, ComboLeg, CommissionReport, Execution, ExecutionReport, Fill,
    FillSide, LegAction,
};

// Application re-exports
pub use application::ports::{
    DeltaLookupPort, DeltaQuote, ExecutionGatewayPort, FillArchivePort, GatewayError,
    LedgerStoreError, LedgerStorePort, TradingCalendarPort,
};
pub use application::use_cases::{
    RecordDayError, RecordDayUseCase, RunMode, RunOutcome, RunSummary,
};

// Infrastructure re-exports
pub use infrastructure::calendar::HolidayFileCalendar;
pub use infrastructure::delta::StaticDeltaLookup;
pub use infrastructure::gateway::RecordedGateway;
pub use infrastructure::persistence::{InMemoryLedgerStore, JsonLedgerStore};
