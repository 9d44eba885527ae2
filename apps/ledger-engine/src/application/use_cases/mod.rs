//! Use cases.

mod record_day;

pub use record_day::{
    RecordDayError, RecordDayUseCase, RunMode, RunOutcome, RunSummary,
};
