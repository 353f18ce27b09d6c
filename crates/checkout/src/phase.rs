//! Checkout workflow phases.

use serde::{Deserialize, Serialize};

/// The phase a checkout request has reached in its workflow.
///
/// Phase transitions:
/// ```text
/// Received ──► Validated ──► StockFetched ──► StockChecked ──► Priced ──► Committed
///     │            │              │                │              │
///     └────────────┴──────────────┴────────────────┴──────────────┴──► Failed
/// ```
///
/// A request moves strictly forward and the first failure ends it; there is
/// no retry loop and no path back to an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutPhase {
    /// Request received, nothing validated yet.
    #[default]
    Received,
    /// Cart items passed validation.
    Validated,
    /// Catalog records for the cart were fetched.
    StockFetched,
    /// Requested quantities verified against stock.
    StockChecked,
    /// Order total computed.
    Priced,
    /// Stock decrements and the order document are durably written.
    Committed,
    /// The workflow stopped at a failure.
    Failed,
}

impl CheckoutPhase {
    /// Returns true if a checkout in this phase is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutPhase::Committed | CheckoutPhase::Failed)
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Received => "received",
            CheckoutPhase::Validated => "validated",
            CheckoutPhase::StockFetched => "stock_fetched",
            CheckoutPhase::StockChecked => "stock_checked",
            CheckoutPhase::Priced => "priced",
            CheckoutPhase::Committed => "committed",
            CheckoutPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
