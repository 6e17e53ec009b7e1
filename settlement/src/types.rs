//! Core types for the settlement engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Participant balance handed to a [`Settler`](crate::Settler)
///
/// Positive balance = is owed money (creditor), negative = owes money (debtor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleEntry<Id> {
    /// Participant identifier
    pub id: Id,

    /// Signed balance
    pub balance: Decimal,
}

impl<Id> SettleEntry<Id> {
    /// Create new entry
    pub fn new(id: Id, balance: Decimal) -> Self {
        Self { id, balance }
    }

    /// Check if creditor (is owed money)
    pub fn is_creditor(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Check if debtor (owes money)
    pub fn is_debtor(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

impl<Id> From<(Id, Decimal)> for SettleEntry<Id> {
    fn from((id, balance): (Id, Decimal)) -> Self {
        Self::new(id, balance)
    }
}

/// Proposed transfer: `source` pays `target` the given `amount`
///
/// Moves are advisory. Recording one as an actual payment is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move<Id> {
    /// Participant paying
    pub source: Id,

    /// Participant receiving
    pub target: Id,

    /// Amount to transfer (always > 0)
    pub amount: Decimal,
}

impl<Id> Move<Id> {
    /// Create new move
    pub fn new(source: Id, target: Id, amount: Decimal) -> Self {
        Self {
            source,
            target,
            amount,
        }
    }
}

impl<Id: fmt::Display> fmt::Display for Move<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} should pay {} {}", self.source, self.target, self.amount)
    }
}

/// How a settlement was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Nothing to settle
    Trivial,
    /// Every creditor/debtor ordering was tried; move count is minimal
    Exhaustive,
    /// Group exceeded the search limit; greedy result, not proven minimal
    GreedyFallback,
}

impl Strategy {
    /// Whether the move count is known to be minimal
    pub fn is_minimal(&self) -> bool {
        !matches!(self, Strategy::GreedyFallback)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Trivial => "trivial",
            Strategy::Exhaustive => "exhaustive",
            Strategy::GreedyFallback => "greedy fallback",
        };
        f.write_str(name)
    }
}

/// Settlement statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStats {
    /// Number of participants supplied
    pub participant_count: usize,

    /// Participants with a positive balance
    pub creditor_count: usize,

    /// Participants with a negative balance
    pub debtor_count: usize,

    /// Number of moves produced
    pub move_count: usize,

    /// Sum of all move amounts
    pub total_transferred: Decimal,

    /// Creditor/debtor orderings evaluated by the search
    pub orderings_examined: u64,
}

/// Result of settling one balance snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement<Id> {
    /// Moves that bring every balance to zero
    pub moves: Vec<Move<Id>>,

    /// How the moves were found
    pub strategy: Strategy,

    /// Statistics
    pub stats: SettlementStats,
}

impl<Id> Settlement<Id> {
    /// Check if no transfer is needed
    pub fn is_settled(&self) -> bool {
        self.moves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_partition_flags() {
        assert!(SettleEntry::new("a", dec!(1.00)).is_creditor());
        assert!(SettleEntry::new("b", dec!(-0.01)).is_debtor());

        let zero = SettleEntry::new("c", Decimal::ZERO);
        assert!(!zero.is_creditor());
        assert!(!zero.is_debtor());
    }

    #[test]
    fn test_move_display() {
        let mv = Move::new("Bob", "Alice", dec!(10.00));
        assert_eq!(mv.to_string(), "Bob should pay Alice 10.00");
    }

    #[test]
    fn test_strategy_minimality() {
        assert!(Strategy::Trivial.is_minimal());
        assert!(Strategy::Exhaustive.is_minimal());
        assert!(!Strategy::GreedyFallback.is_minimal());
    }

    #[test]
    fn test_move_serializes_amount_as_string() {
        let mv = Move::new("B".to_string(), "A".to_string(), dec!(0.01));
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"source":"B","target":"A","amount":"0.01"}"#);
    }
}
