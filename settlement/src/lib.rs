//! Settlement Engine
//!
//! Computes the transfers that settle a group's shared expenses.
//!
//! # Architecture
//!
//! Balances flow through three stages:
//!
//! 1. **Ledger**: Aggregate balanced payments into one balance per participant
//! 2. **Settler**: Partition into creditors and debtors, match them greedily
//!    or search every ordering for the fewest moves
//! 3. **Engine**: Apply configured search limits, verify conservation, report
//!    statistics
//!
//! # Invariants
//!
//! - Balances sum to exactly zero; amounts are `Decimal`, never floats
//! - Every move is positive and between two different participants
//! - Netting the moves per participant reproduces every balance
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use settlement::{SettleEntry, Settler, DEFAULT_SEARCH_LIMIT};
//!
//! fn main() -> settlement::Result<()> {
//!     let settler = Settler::new(vec![
//!         SettleEntry::new("alice", Decimal::new(1000, 2)),
//!         SettleEntry::new("bob", Decimal::new(-300, 2)),
//!         SettleEntry::new("carol", Decimal::new(-700, 2)),
//!     ])?;
//!
//!     for mv in settler.optimal_moves(DEFAULT_SEARCH_LIMIT)? {
//!         println!("{}", mv);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod permutations;
pub mod settler;
pub mod ledger;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use settler::{SearchOutcome, Settler, DEFAULT_SEARCH_LIMIT};
pub use ledger::{Ledger, LedgerEntry, Payment, PaymentKind};
pub use engine::{verify_moves, SettlementEngine};
