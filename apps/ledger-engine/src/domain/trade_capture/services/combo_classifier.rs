//! Structural classification of combo (bag) orders.

use crate::domain::trade_capture::value_objects::{ComboLeg, LegAction};

/// What a two-leg combo order represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboKind {
    /// Buy back the held call, write a new one with a later expiry.
    Rollover,
    /// Buy the underlying and write calls against it in one order.
    BuyWrite,
    /// Not a shape this program trades.
    Unknown,
}

/// Classifies combo orders from their declared leg metadata alone.
///
/// Classification is purely structural; it never inspects fills.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComboClassifier;

impl ComboClassifier {
    /// Classify a combo's declared legs.
    ///
    /// Rules, in priority order: two legs both ratio 1 with opposite actions
    /// are a rollover; otherwise any ratio-100 BUY leg marks a buy-write;
    /// anything else is unknown.
    #[must_use]
    pub fn classify(legs: &[ComboLeg]) -> ComboKind {
        if let [a, b] = legs {
            if a.ratio == 1 && b.ratio == 1 && a.action != b.action {
                return ComboKind::Rollover;
            }
        }
        if legs
            .iter()
            .any(|leg| leg.ratio == 100 && leg.action == LegAction::Buy)
        {
            return ComboKind::BuyWrite;
        }
        ComboKind::Unknown
    }
}
