//! Property-based tests for settlement invariants
//!
//! These tests use proptest to verify:
//! - Conservation: moves net to every original balance
//! - Positivity and no self-transfers
//! - Greedy bound: moves ≤ creditors + debtors - 1
//! - Search never does worse than greedy under the limit
//! - Fallback above the limit is exactly the greedy result
//! - Non-zero sums are always rejected

use proptest::prelude::*;
use rust_decimal::Decimal;
use settlement::{
    verify_moves, Error, Ledger, Payment, SettleEntry, Settler, DEFAULT_SEARCH_LIMIT,
};

/// Strategy for generating balances in cents, zero allowed
fn cents_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        1 => Just(0i64),
        6 => -50_000i64..50_000i64,
    ]
}

/// Balance vector of `len` entries summing to zero
///
/// The last entry absorbs the sum of the others.
fn balances_strategy(
    len: std::ops::Range<usize>,
) -> impl Strategy<Value = Vec<SettleEntry<usize>>> {
    prop::collection::vec(cents_strategy(), len).prop_map(|cents| {
        let closing: i64 = -cents.iter().sum::<i64>();
        cents
            .into_iter()
            .chain(std::iter::once(closing))
            .enumerate()
            .map(|(id, c)| SettleEntry::new(id, Decimal::new(c, 2)))
            .collect()
    })
}

fn non_zero_count(entries: &[SettleEntry<usize>]) -> usize {
    entries.iter().filter(|e| !e.balance.is_zero()).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Greedy moves conserve every balance
    #[test]
    fn prop_greedy_conserves_balances(entries in balances_strategy(0..15)) {
        let settler = Settler::new(entries.clone()).unwrap();
        let moves = settler.greedy_moves().unwrap();

        prop_assert!(verify_moves(&entries, &moves).is_ok());
        for mv in &moves {
            prop_assert!(mv.amount > Decimal::ZERO);
            prop_assert_ne!(mv.source, mv.target);
        }
    }

    /// Property: Greedy move count ≤ creditors + debtors - 1
    #[test]
    fn prop_greedy_upper_bound(entries in balances_strategy(0..15)) {
        let settler = Settler::new(entries.clone()).unwrap();
        let moves = settler.greedy_moves().unwrap();

        let count = settler.participant_count();
        prop_assert_eq!(count, non_zero_count(&entries));
        if count == 0 {
            prop_assert!(moves.is_empty());
        } else {
            prop_assert!(moves.len() <= count - 1);
        }
    }

    /// Property: Greedy result is deterministic
    #[test]
    fn prop_greedy_deterministic(entries in balances_strategy(0..12)) {
        let first = Settler::new(entries.clone()).unwrap().greedy_moves().unwrap();
        let second = Settler::new(entries).unwrap().greedy_moves().unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: Non-zero sums are rejected with the computed sum
    #[test]
    fn prop_non_zero_sum_rejected(
        entries in balances_strategy(0..8),
        offset in prop_oneof![-100_000i64..0, 1i64..100_000],
    ) {
        let mut entries = entries;
        let offset = Decimal::new(offset, 2);
        if let Some(last) = entries.last_mut() {
            last.balance += offset;
        }

        match Settler::new(entries) {
            Err(Error::BalancesNotZero { sum }) => prop_assert_eq!(sum, offset),
            other => prop_assert!(false, "expected BalancesNotZero, got {:?}", other),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: Optimal moves conserve balances and never exceed greedy
    #[test]
    fn prop_optimal_not_worse_than_greedy(entries in balances_strategy(1..7)) {
        let settler = Settler::new(entries.clone()).unwrap();
        prop_assume!(settler.participant_count() <= DEFAULT_SEARCH_LIMIT);

        let greedy = settler.greedy_moves().unwrap();
        let optimal = settler.optimal_moves(DEFAULT_SEARCH_LIMIT).unwrap();

        prop_assert!(verify_moves(&entries, &optimal).is_ok());
        prop_assert!(optimal.len() <= greedy.len());

        let lower_bound = settler.creditors().len().max(settler.debtors().len());
        prop_assert!(optimal.len() >= lower_bound);
    }

    /// Property: Early exit finds the same moves as the full search
    #[test]
    fn prop_early_exit_matches_full_search(entries in balances_strategy(1..7)) {
        let settler = Settler::new(entries).unwrap();
        prop_assume!(settler.participant_count() <= DEFAULT_SEARCH_LIMIT);

        let full = settler.search(DEFAULT_SEARCH_LIMIT, false).unwrap();
        let fast = settler.search(DEFAULT_SEARCH_LIMIT, true).unwrap();
        prop_assert_eq!(full.moves, fast.moves);
        prop_assert_eq!(full.strategy, fast.strategy);
    }

    /// Property: Above the limit, optimal is exactly greedy
    #[test]
    fn prop_fallback_equals_greedy(entries in balances_strategy(9..20)) {
        let settler = Settler::new(entries).unwrap();
        prop_assume!(settler.participant_count() > DEFAULT_SEARCH_LIMIT);

        prop_assert_eq!(
            settler.optimal_moves(DEFAULT_SEARCH_LIMIT).unwrap(),
            settler.greedy_moves().unwrap()
        );
    }

    /// Property: Ledger of random transfers always settles exactly
    #[test]
    fn prop_ledger_settles(
        transfers in prop::collection::vec((0usize..6, 0usize..6, 1i64..100_000), 1..20),
    ) {
        let mut ledger = Ledger::default();
        for (debtor, creditor, cents) in transfers {
            if debtor == creditor {
                continue;
            }
            ledger.record(Payment::settle(debtor, creditor, Decimal::new(cents, 2)).unwrap());
        }

        let balances = ledger.balances().unwrap();
        let total: Decimal = balances.iter().map(|e| e.balance).sum();
        prop_assert!(total.is_zero());

        let moves = ledger.settler().unwrap().optimal_moves(DEFAULT_SEARCH_LIMIT).unwrap();
        prop_assert!(verify_moves(&balances, &moves).is_ok());
    }
}
