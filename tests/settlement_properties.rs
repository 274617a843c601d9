use proptest::prelude::*;
use rust_decimal::Decimal;
use settle_up_engine::core::{PartyOrder, SettlementConfig};
use settle_up_engine::{LedgerEntry, MemberId, SettlementEngine};

fn roster(member_count: usize) -> Vec<MemberId> {
    (0..member_count).map(|idx| format!("M{}", idx)).collect()
}

/// Expenses and payments between roster members, amounts in cents
fn ledger_strategy() -> impl Strategy<Value = (usize, Vec<LedgerEntry>)> {
    (1usize..=6).prop_flat_map(|member_count| {
        let entry = (
            any::<bool>(),
            1i64..=100_000,
            0..member_count,
            1usize..(1 << member_count),
            0..member_count,
        )
            .prop_map(move |(is_expense, cents, payer, mask, to)| {
                let amount = Decimal::new(cents, 2);
                let members = roster(member_count);
                if is_expense {
                    let participants: Vec<MemberId> = (0..member_count)
                        .filter(|idx| mask & (1 << idx) != 0)
                        .map(|idx| members[idx].clone())
                        .collect();
                    LedgerEntry::expense(amount, members[payer].clone(), participants)
                } else {
                    LedgerEntry::payment(amount, members[payer].clone(), members[to].clone())
                }
            });
        (Just(member_count), prop::collection::vec(entry, 0..=30))
    })
}

proptest! {
    #[test]
    fn balances_sum_to_zero((member_count, entries) in ledger_strategy()) {
        let engine = SettlementEngine::default();
        let settled = engine.settle("g", &roster(member_count), &entries)
            .expect("settlement failed");

        prop_assert_eq!(settled.balances.total(), Some(Decimal::ZERO));
        prop_assert_eq!(settled.balances.len(), member_count);
    }
}

proptest! {
    #[test]
    fn settlements_clear_every_balance(
        (member_count, entries) in ledger_strategy(),
        largest_first in any::<bool>(),
    ) {
        let order = if largest_first { PartyOrder::LargestFirst } else { PartyOrder::Roster };
        let config = SettlementConfig::new(Decimal::new(1, 2), 2, order, false);
        let engine = SettlementEngine::new(config.clone());
        let settled = engine.settle("g", &roster(member_count), &entries)
            .expect("settlement failed");

        let mut residuals: Vec<Decimal> = settled.balances.balances().iter().map(|b| b.net).collect();
        let members = roster(member_count);
        let position = |member: &str| members.iter().position(|m| m == member).expect("unknown member");

        for settlement in &settled.settlements {
            prop_assert!(settlement.from != settlement.to);
            prop_assert!(settlement.amount > Decimal::ZERO);
            residuals[position(&settlement.from)] += settlement.amount;
            residuals[position(&settlement.to)] -= settlement.amount;
        }

        for residual in residuals {
            prop_assert!(config.is_negligible(residual), "residual {} left", residual);
        }
        prop_assert!(settled.settlements.len() < member_count.max(1));
    }
}

proptest! {
    #[test]
    fn settlement_is_deterministic((member_count, entries) in ledger_strategy()) {
        let engine = SettlementEngine::default();
        let members = roster(member_count);

        let first = engine.settle("g", &members, &entries).expect("settlement failed");
        let second = engine.settle("g", &members, &entries).expect("settlement failed");

        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_ledger_settles_to_nothing() {
    let engine = SettlementEngine::default();
    let entries: Vec<LedgerEntry> = Vec::new();

    let settled = engine.settle("g", &roster(4), &entries).unwrap();

    assert!(settled.settlements.is_empty());
    assert!(settled
        .balances
        .balances()
        .iter()
        .all(|balance| balance.net.is_zero()));
}
