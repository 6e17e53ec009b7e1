//! Main settlement engine
//!
//! Runs the bounded search with configured limits, checks the result
//! and attaches statistics.

use crate::{
    config::Config,
    ledger::Ledger,
    settler::Settler,
    types::*,
    Error, Result,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Settlement engine
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Settle one snapshot of balances
    pub fn settle<Id>(&self, entries: Vec<SettleEntry<Id>>) -> Result<Settlement<Id>>
    where
        Id: Clone + Eq + Hash + Debug,
    {
        let participant_count = entries.len();
        let settler = Settler::new(entries.iter().cloned())?;

        let outcome = settler.search(self.config.search.limit, self.config.search.early_exit)?;
        verify_moves(&entries, &outcome.moves)?;

        let stats = SettlementStats {
            participant_count,
            creditor_count: settler.creditors().len(),
            debtor_count: settler.debtors().len(),
            move_count: outcome.moves.len(),
            total_transferred: outcome.moves.iter().map(|m| m.amount).sum(),
            orderings_examined: outcome.orderings_examined,
        };

        tracing::info!(
            service = %self.config.service_name,
            participants = stats.participant_count,
            moves = stats.move_count,
            total = %stats.total_transferred,
            strategy = %outcome.strategy,
            "Settlement computed"
        );

        Ok(Settlement {
            moves: outcome.moves,
            strategy: outcome.strategy,
            stats,
        })
    }

    /// Empty ledger at the configured scale
    pub fn new_ledger<Id>(&self) -> Ledger<Id>
    where
        Id: Clone + Eq + Hash + Debug,
    {
        Ledger::from_config(&self.config.ledger)
    }

    /// Settle the current balances of a ledger
    ///
    /// Balances are taken at the configured `ledger.scale`, whatever scale
    /// the ledger itself was created with. A balance that would need
    /// rounding fails with [`Error::InexactBalance`].
    pub fn settle_ledger<Id>(&self, ledger: &Ledger<Id>) -> Result<Settlement<Id>>
    where
        Id: Clone + Eq + Hash + Debug,
    {
        self.settle(ledger.balances_at(self.config.ledger.scale)?)
    }
}

/// Check that `moves` settle `entries` exactly
///
/// Every move must be positive and between two different participants, and
/// netting the moves per participant must reproduce every balance.
pub fn verify_moves<Id>(entries: &[SettleEntry<Id>], moves: &[Move<Id>]) -> Result<()>
where
    Id: Eq + Hash + Debug,
{
    let mut net: HashMap<&Id, Decimal> = HashMap::with_capacity(entries.len());

    for mv in moves {
        if mv.amount <= Decimal::ZERO {
            return Err(Error::InvariantViolation(format!(
                "move from {:?} to {:?} has non-positive amount {}",
                mv.source, mv.target, mv.amount
            )));
        }
        if mv.source == mv.target {
            return Err(Error::InvariantViolation(format!(
                "self-transfer by {:?}",
                mv.source
            )));
        }

        // Inflow counts toward a creditor's balance, outflow toward a debtor's
        *net.entry(&mv.source).or_insert(Decimal::ZERO) -= mv.amount;
        *net.entry(&mv.target).or_insert(Decimal::ZERO) += mv.amount;
    }

    for entry in entries {
        let received = net.remove(&entry.id).unwrap_or(Decimal::ZERO);
        if received != entry.balance {
            return Err(Error::InvariantViolation(format!(
                "{:?} nets {} but balance is {}",
                entry.id, received, entry.balance
            )));
        }
    }

    if let Some((id, amount)) = net.into_iter().find(|(_, amount)| !amount.is_zero()) {
        return Err(Error::InvariantViolation(format!(
            "moves reference unknown participant {:?} with net {}",
            id, amount
        )));
    }

    Ok(())
}
