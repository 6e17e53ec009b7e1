//! Debt settlement between group participants
//!
//! Turns a closed set of balances into point-to-point moves.
//!
//! # Algorithm
//!
//! 1. Validate that balances sum to exactly zero
//! 2. Partition into creditors (> 0) and debtors (< 0), keeping input order
//! 3. Greedy pass: each debtor pays the current creditor until one side is
//!    exhausted, then the cursor advances
//! 4. Optional exhaustive search over creditor × debtor orderings, keeping
//!    the first ordering with the fewest moves
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +5.00   B: +3.00   C: -3.00   D: -5.00
//!
//! Greedy (input order):
//!   C pays A 3.00
//!   D pays A 2.00
//!   D pays B 3.00
//!
//! Optimal (creditors A,B / debtors D,C):
//!   D pays A 5.00
//!   C pays B 3.00
//! ```
//!
//! The greedy pass never produces more than `creditors + debtors - 1` moves.
//! The search is factorial in both partition sizes, so groups larger than the
//! search limit get the greedy result instead.

use crate::{
    permutations::Permutations,
    types::{Move, SettleEntry, Strategy},
    Error, Result,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Default bound on `creditors + debtors` for the exhaustive search
pub const DEFAULT_SEARCH_LIMIT: usize = 7;

/// Settles one snapshot of balances
///
/// Immutable after construction; every query recomputes from the stored
/// partition and returns the same result.
#[derive(Debug, Clone)]
pub struct Settler<Id> {
    /// Positive balances, input order
    creditors: Vec<SettleEntry<Id>>,

    /// Negative balances, input order
    debtors: Vec<SettleEntry<Id>>,
}

/// Outcome of a bounded search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<Id> {
    /// Best moves found
    pub moves: Vec<Move<Id>>,

    /// Whether the search ran or fell back to the greedy pass
    pub strategy: Strategy,

    /// Orderings evaluated
    pub orderings_examined: u64,
}

impl<Id> Settler<Id>
where
    Id: Clone + Eq + Hash + Debug,
{
    /// Create settler from balances
    ///
    /// Fails with [`Error::BalancesNotZero`] unless the balances sum to
    /// exactly zero, and with [`Error::DuplicateParticipant`] if an
    /// identifier appears twice.
    pub fn new(entries: impl IntoIterator<Item = SettleEntry<Id>>) -> Result<Self> {
        let entries: Vec<SettleEntry<Id>> = entries.into_iter().collect();

        let sum: Decimal = entries.iter().map(|e| e.balance).sum();
        if !sum.is_zero() {
            return Err(Error::BalancesNotZero { sum });
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(&entry.id) {
                return Err(Error::DuplicateParticipant(format!("{:?}", entry.id)));
            }
        }

        let (creditors, rest): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(SettleEntry::is_creditor);
        let debtors = rest.into_iter().filter(SettleEntry::is_debtor).collect();

        Ok(Self { creditors, debtors })
    }

    /// Participants with a positive balance
    pub fn creditors(&self) -> &[SettleEntry<Id>] {
        &self.creditors
    }

    /// Participants with a negative balance
    pub fn debtors(&self) -> &[SettleEntry<Id>] {
        &self.debtors
    }

    /// Participants with a non-zero balance
    pub fn participant_count(&self) -> usize {
        self.creditors.len() + self.debtors.len()
    }

    /// Greedy settlement in input order
    pub fn greedy_moves(&self) -> Result<Vec<Move<Id>>> {
        let creditors: Vec<&SettleEntry<Id>> = self.creditors.iter().collect();
        let debtors: Vec<&SettleEntry<Id>> = self.debtors.iter().collect();
        settle_in_order(&creditors, &debtors)
    }

    /// Fewest-moves settlement, bounded by `limit`
    ///
    /// When `creditors + debtors > limit` this returns exactly
    /// [`greedy_moves`](Self::greedy_moves), which is NOT guaranteed to be
    /// minimal. Use [`search`](Self::search) to learn which case applied.
    pub fn optimal_moves(&self, limit: usize) -> Result<Vec<Move<Id>>> {
        Ok(self.search(limit, true)?.moves)
    }

    /// Bounded exhaustive search
    ///
    /// Creditor orderings form the outer loop and debtor orderings the inner
    /// one, both lexicographic over input positions. Ties keep the first
    /// ordering found. With `early_exit` the search stops at the first result
    /// of `max(creditors, debtors)` moves, which no ordering can beat.
    pub fn search(&self, limit: usize, early_exit: bool) -> Result<SearchOutcome<Id>> {
        if self.debtors.is_empty() {
            return Ok(SearchOutcome {
                moves: Vec::new(),
                strategy: Strategy::Trivial,
                orderings_examined: 0,
            });
        }

        let count = self.participant_count();
        if count > limit {
            tracing::warn!(
                participants = count,
                limit,
                "Group exceeds search limit, falling back to greedy settlement"
            );
            return Ok(SearchOutcome {
                moves: self.greedy_moves()?,
                strategy: Strategy::GreedyFallback,
                orderings_examined: 1,
            });
        }

        let lower_bound = self.creditors.len().max(self.debtors.len());
        let total_orderings = Permutations::count_for(self.creditors.len())
            .saturating_mul(Permutations::count_for(self.debtors.len()));
        let mut best: Option<Vec<Move<Id>>> = None;
        let mut examined = 0u64;

        'search: for creditor_order in Permutations::new(self.creditors.len()) {
            let creditors: Vec<&SettleEntry<Id>> =
                creditor_order.iter().map(|&i| &self.creditors[i]).collect();

            for debtor_order in Permutations::new(self.debtors.len()) {
                let debtors: Vec<&SettleEntry<Id>> =
                    debtor_order.iter().map(|&i| &self.debtors[i]).collect();

                let moves = settle_in_order(&creditors, &debtors)?;
                examined += 1;

                let improves = best
                    .as_ref()
                    .map_or(true, |current| moves.len() < current.len());
                if improves {
                    best = Some(moves);
                }

                if early_exit && best.as_ref().is_some_and(|b| b.len() == lower_bound) {
                    break 'search;
                }
            }
        }

        tracing::debug!(
            creditors = self.creditors.len(),
            debtors = self.debtors.len(),
            orderings = examined,
            total_orderings,
            moves = best.as_ref().map_or(0, Vec::len),
            "Exhaustive settlement search complete"
        );

        let moves = best.ok_or_else(|| {
            Error::InvariantViolation("search evaluated no orderings".to_string())
        })?;

        Ok(SearchOutcome {
            moves,
            strategy: Strategy::Exhaustive,
            orderings_examined: examined,
        })
    }
}

/// Single greedy pass over debtors with a cursor over creditors
fn settle_in_order<Id>(
    creditors: &[&SettleEntry<Id>],
    debtors: &[&SettleEntry<Id>],
) -> Result<Vec<Move<Id>>>
where
    Id: Clone + Debug,
{
    if debtors.is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = 0;
    let mut creditor = *creditors.first().ok_or_else(|| {
        Error::InvariantViolation("debtors present but no creditor to pay".to_string())
    })?;
    let mut credit_remaining = creditor.balance;

    let mut moves = Vec::with_capacity(creditors.len() + debtors.len() - 1);

    for debtor in debtors {
        // Negative until the debtor is paid off
        let mut debt_remaining = debtor.balance;

        while debt_remaining < Decimal::ZERO {
            if credit_remaining.is_zero() {
                cursor += 1;
                creditor = *creditors.get(cursor).ok_or_else(|| {
                    Error::InvariantViolation(format!(
                        "creditors exhausted with {} still owed by {:?}",
                        -debt_remaining, debtor.id
                    ))
                })?;
                credit_remaining = creditor.balance;
            }

            let amount = (-debt_remaining).min(credit_remaining);
            if amount <= Decimal::ZERO {
                return Err(Error::InvariantViolation(format!(
                    "non-positive move of {} from {:?} to {:?}",
                    amount, debtor.id, creditor.id
                )));
            }

            moves.push(Move::new(debtor.id.clone(), creditor.id.clone(), amount));
            debt_remaining += amount;
            credit_remaining -= amount;
        }
    }

    if !credit_remaining.is_zero() || cursor + 1 != creditors.len() {
        return Err(Error::InvariantViolation(format!(
            "debtors exhausted with {} still owed to {:?}",
            credit_remaining, creditor.id
        )));
    }

    Ok(moves)
}
