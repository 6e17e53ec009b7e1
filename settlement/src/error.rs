//! Error types for the settlement engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Balances handed to a settler do not sum to zero
    #[error("Balances must sum to zero (found {sum})")]
    BalancesNotZero {
        /// The computed, non-zero sum
        sum: Decimal,
    },

    /// Same participant listed more than once
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    /// Internal consistency check failed (money conservation, cursor bounds)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Payment without any non-zero entry
    #[error("Payment has no non-zero entries")]
    EmptyPayment,

    /// Payment entries do not sum to zero
    #[error("Payment entries must sum to zero (found {sum})")]
    PaymentNotBalanced {
        /// The computed, non-zero sum
        sum: Decimal,
    },

    /// Payment rejected before entries were built
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    /// Balance cannot be expressed at the ledger scale without rounding
    #[error("Balance {balance} is not exact at scale {scale}")]
    InexactBalance {
        /// Unrounded balance
        balance: Decimal,
        /// Number of decimal places the ledger keeps
        scale: u32,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
