//! Group payment ledger
//!
//! Aggregates payments into per-participant balances for a [`Settler`].
//!
//! Every payment is a set of entries that sums to zero, so the ledger as a
//! whole always sums to zero as well. Sign convention: a positive entry means
//! the participant advanced money (the group owes them), a negative entry
//! means they consumed it.

use crate::{config::LedgerConfig, types::SettleEntry, Error, Result, Settler};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Default number of decimal places kept by the ledger (cents)
pub const DEFAULT_SCALE: u32 = 2;

/// One participant's share of a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry<Id> {
    /// Participant
    pub participant: Id,

    /// Signed amount
    pub amount: Decimal,
}

impl<Id> LedgerEntry<Id> {
    /// Create new entry
    pub fn new(participant: Id, amount: Decimal) -> Self {
        Self {
            participant,
            amount,
        }
    }
}

/// Payment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Money spent on behalf of the group
    Expense,
    /// Money received on behalf of the group
    Income,
    /// Direct transfer between two participants
    Settle,
}

/// Balanced set of ledger entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment<Id> {
    /// Payment kind
    pub kind: PaymentKind,

    /// Non-zero entries, one per participant
    entries: Vec<LedgerEntry<Id>>,
}

impl<Id> Payment<Id>
where
    Id: Clone + Eq + Hash + Debug,
{
    /// Create payment from raw entries
    ///
    /// Entries for the same participant are merged and zero entries dropped.
    pub fn new(
        kind: PaymentKind,
        entries: impl IntoIterator<Item = LedgerEntry<Id>>,
    ) -> Result<Self> {
        let mut merged: Vec<LedgerEntry<Id>> = Vec::new();
        let mut index: HashMap<Id, usize> = HashMap::new();

        for entry in entries {
            match index.get(&entry.participant) {
                Some(&i) => merged[i].amount += entry.amount,
                None => {
                    index.insert(entry.participant.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }
        merged.retain(|e| !e.amount.is_zero());

        if merged.is_empty() {
            return Err(Error::EmptyPayment);
        }

        let sum: Decimal = merged.iter().map(|e| e.amount).sum();
        if !sum.is_zero() {
            return Err(Error::PaymentNotBalanced { sum });
        }

        Ok(Self {
            kind,
            entries: merged,
        })
    }

    /// Expense of `total` paid by `payer`, divided as given
    ///
    /// Each participant is debited its share; the payer is credited the total.
    pub fn expense(
        payer: Id,
        total: Decimal,
        division: impl IntoIterator<Item = (Id, Decimal)>,
    ) -> Result<Self> {
        Self::shared(PaymentKind::Expense, payer, total, division)
    }

    /// Income of `total` received by `receiver`, divided as given
    pub fn income(
        receiver: Id,
        total: Decimal,
        division: impl IntoIterator<Item = (Id, Decimal)>,
    ) -> Result<Self> {
        Self::shared(PaymentKind::Income, receiver, total, division)
    }

    /// `debtor` paid `creditor` the given amount outside the group
    pub fn settle(debtor: Id, creditor: Id, amount: Decimal) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidPayment(format!(
                "settle amount must be positive (got {})",
                amount
            )));
        }
        if debtor == creditor {
            return Err(Error::InvalidPayment(
                "debtor and creditor cannot be the same".to_string(),
            ));
        }

        Self::new(
            PaymentKind::Settle,
            [
                LedgerEntry::new(debtor, amount),
                LedgerEntry::new(creditor, -amount),
            ],
        )
    }

    fn shared(
        kind: PaymentKind,
        holder: Id,
        total: Decimal,
        division: impl IntoIterator<Item = (Id, Decimal)>,
    ) -> Result<Self> {
        if total < Decimal::ZERO {
            return Err(Error::InvalidPayment(format!(
                "total must not be negative (got {})",
                total
            )));
        }

        let division: Vec<(Id, Decimal)> = division.into_iter().collect();
        let division_sum: Decimal = division.iter().map(|(_, share)| *share).sum();
        if division_sum != total {
            return Err(Error::InvalidPayment(format!(
                "division sums to {} but total is {}",
                division_sum, total
            )));
        }

        // Expense: shares consumed, holder advanced the total. Income: mirrored.
        let sign = match kind {
            PaymentKind::Income => Decimal::ONE,
            _ => Decimal::NEGATIVE_ONE,
        };

        let entries = division
            .into_iter()
            .map(|(participant, share)| LedgerEntry::new(participant, sign * share))
            .chain(std::iter::once(LedgerEntry::new(holder, -sign * total)));

        Self::new(kind, entries)
    }

    /// Non-zero entries
    pub fn entries(&self) -> &[LedgerEntry<Id>] {
        &self.entries
    }

    /// Source, target and amount of a two-party payment
    ///
    /// The participant with the positive entry is the source of the real
    /// world transfer.
    pub fn transfer(&self) -> Result<(Id, Id, Decimal)> {
        match self.entries.as_slice() {
            [a, b] if a.amount > Decimal::ZERO => {
                Ok((a.participant.clone(), b.participant.clone(), a.amount))
            }
            [a, b] => Ok((b.participant.clone(), a.participant.clone(), b.amount)),
            other => Err(Error::InvalidPayment(format!(
                "transfer needs exactly 2 entries (got {})",
                other.len()
            ))),
        }
    }
}

/// Append-only list of payments for one group
#[derive(Debug, Clone)]
pub struct Ledger<Id> {
    /// Decimal places balances are reported at
    scale: u32,

    /// Recorded payments
    payments: Vec<Payment<Id>>,
}

impl<Id> Default for Ledger<Id> {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            payments: Vec::new(),
        }
    }
}

impl<Id> Ledger<Id>
where
    Id: Clone + Eq + Hash + Debug,
{
    /// Create empty ledger reporting balances at `scale` decimal places
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            payments: Vec::new(),
        }
    }

    /// Create empty ledger from configuration
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.scale)
    }

    /// Decimal places balances are reported at
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Record a payment
    pub fn record(&mut self, payment: Payment<Id>) {
        tracing::debug!(
            kind = ?payment.kind,
            entries = payment.entries.len(),
            "Recording payment"
        );
        self.payments.push(payment);
    }

    /// Recorded payments, oldest first
    pub fn payments(&self) -> &[Payment<Id>] {
        &self.payments
    }

    /// Balance of one participant (zero if unknown)
    pub fn balance(&self, participant: &Id) -> Result<Decimal> {
        let raw: Decimal = self
            .payments
            .iter()
            .flat_map(|p| p.entries.iter())
            .filter(|e| &e.participant == participant)
            .map(|e| e.amount)
            .sum();
        rescale(raw, self.scale)
    }

    /// Balances of every participant, in order of first appearance
    pub fn balances(&self) -> Result<Vec<SettleEntry<Id>>> {
        self.balances_at(self.scale)
    }

    /// Balances of every participant at `scale` decimal places
    pub fn balances_at(&self, scale: u32) -> Result<Vec<SettleEntry<Id>>> {
        let mut totals: Vec<SettleEntry<Id>> = Vec::new();
        let mut index: HashMap<&Id, usize> = HashMap::new();

        for entry in self.payments.iter().flat_map(|p| p.entries.iter()) {
            match index.get(&entry.participant) {
                Some(&i) => totals[i].balance += entry.amount,
                None => {
                    index.insert(&entry.participant, totals.len());
                    totals.push(SettleEntry::new(entry.participant.clone(), entry.amount));
                }
            }
        }

        totals
            .into_iter()
            .map(|e| Ok(SettleEntry::new(e.id, rescale(e.balance, scale)?)))
            .collect()
    }

    /// Balances for an explicit roster, in roster order
    pub fn balances_for(&self, roster: &[Id]) -> Result<Vec<SettleEntry<Id>>> {
        roster
            .iter()
            .map(|id| Ok(SettleEntry::new(id.clone(), self.balance(id)?)))
            .collect()
    }

    /// Settler over the current balances
    pub fn settler(&self) -> Result<Settler<Id>> {
        Settler::new(self.balances()?)
    }
}

/// Rescale to `scale` decimal places, refusing to round
fn rescale(balance: Decimal, scale: u32) -> Result<Decimal> {
    let rounded = balance.round_dp(scale);
    if rounded != balance {
        return Err(Error::InexactBalance { balance, scale });
    }

    let mut scaled = rounded;
    scaled.rescale(scale);
    Ok(scaled)
}
