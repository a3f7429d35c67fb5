//! Property-based tests for credit, purchase and change handling.
//!
//! These tests use proptest to drive the standard machine with randomly
//! generated coin sequences and product choices.

use chrono::Utc;
use coinop::catalog::Catalog;
use coinop::change::make_change;
use coinop::core::{State, StateHistory, StateTransition};
use coinop::{DispatchStatus, MemorySink, NoopDispenser, Notice, VendState, VendingMachine};
use proptest::prelude::*;

const STANDARD: [u32; 5] = [200, 100, 25, 10, 5];

fn machine() -> (VendingMachine, MemorySink) {
    let sink = MemorySink::new();
    let machine = VendingMachine::builder()
        .dispenser(NoopDispenser)
        .log_sink(sink.clone())
        .build()
        .unwrap();
    (machine, sink)
}

fn insert_all(machine: &mut VendingMachine, coins: &[u32]) {
    for coin in coins {
        machine.dispatch(&coin.to_string()).unwrap();
    }
}

fn returned(sink: &MemorySink) -> Vec<u32> {
    sink.notices()
        .iter()
        .filter_map(|n| match n {
            Notice::CoinReturned { value } => Some(*value),
            _ => None,
        })
        .collect()
}

/// Fewest coins for `amount`, by exhaustive dynamic programming.
fn min_coins(amount: u32, denominations: &[u32]) -> Option<u32> {
    let amount = amount as usize;
    let mut best: Vec<Option<u32>> = vec![None; amount + 1];
    best[0] = Some(0);
    for value in 1..=amount {
        best[value] = denominations
            .iter()
            .filter(|&&d| d as usize <= value)
            .filter_map(|&d| best[value - d as usize].map(|n| n + 1))
            .min();
    }
    best[amount]
}

prop_compose! {
    fn arbitrary_coin()(value in prop::sample::select(STANDARD.to_vec())) -> u32 {
        value
    }
}

prop_compose! {
    fn arbitrary_coins(max: usize)(
        coins in prop::collection::vec(arbitrary_coin(), 1..max)
    ) -> Vec<u32> {
        coins
    }
}

prop_compose! {
    fn arbitrary_product()(
        index in 0..Catalog::standard().products().len()
    ) -> (String, u32) {
        let catalog = Catalog::standard();
        let product = &catalog.products()[index];
        (product.id.clone(), product.price)
    }
}

/// One input from an event source; `None` is a tick.
fn arbitrary_event() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => arbitrary_coin().prop_map(|value| Some(value.to_string())),
        2 => arbitrary_product().prop_map(|(id, _)| Some(id)),
        1 => Just(Some("RETURN".to_string())),
        1 => Just(Some("__TIMEOUT__".to_string())),
        2 => Just(None),
    ]
}

prop_compose! {
    fn arbitrary_state()(state in prop::sample::select(VendState::ALL.to_vec())) -> VendState {
        state
    }
}

proptest! {
    #[test]
    fn credit_is_the_sum_of_inserted_coins(coins in arbitrary_coins(20)) {
        let (mut machine, _sink) = machine();

        insert_all(&mut machine, &coins);

        prop_assert_eq!(machine.amount(), coins.iter().sum::<u32>());
        prop_assert_eq!(machine.state(), Some(VendState::AddCoins));
    }

    #[test]
    fn short_credit_never_vends(coins in arbitrary_coins(6), (id, price) in arbitrary_product()) {
        let total: u32 = coins.iter().sum();
        prop_assume!(total < price);
        let (mut machine, sink) = machine();
        insert_all(&mut machine, &coins);

        let status = machine.dispatch(&id).unwrap();

        prop_assert_eq!(status, DispatchStatus::Handled(VendState::AddCoins));
        prop_assert_eq!(machine.amount(), total);
        prop_assert_eq!(machine.change_due(), 0);
        let shortfall = match sink.notices().last() {
            Some(Notice::InsufficientFunds { shortfall, .. }) => Some(*shortfall),
            _ => None,
        };
        prop_assert_eq!(shortfall, Some(price - total));
    }

    #[test]
    fn purchase_owes_the_difference(
        coins in arbitrary_coins(10),
        (id, price) in arbitrary_product()
    ) {
        let total: u32 = coins.iter().sum();
        prop_assume!(total >= price);
        let (mut machine, sink) = machine();
        insert_all(&mut machine, &coins);

        machine.dispatch(&id).unwrap();

        prop_assert_eq!(machine.amount(), 0);
        prop_assert_eq!(machine.change_due(), total - price);
        let expected = if total == price { VendState::Waiting } else { VendState::CountChange };
        prop_assert_eq!(machine.state(), Some(expected));

        machine.tick().unwrap();

        prop_assert_eq!(machine.state(), Some(VendState::Waiting));
        prop_assert_eq!(machine.change_due(), 0);
        prop_assert_eq!(returned(&sink).iter().sum::<u32>(), total - price);
    }

    #[test]
    fn return_refunds_everything(coins in arbitrary_coins(20)) {
        let total: u32 = coins.iter().sum();
        let (mut machine, sink) = machine();
        insert_all(&mut machine, &coins);

        machine.dispatch("RETURN").unwrap();

        prop_assert_eq!(machine.change_due(), total);
        prop_assert_eq!(machine.amount(), 0);

        machine.tick().unwrap();

        prop_assert_eq!(machine.state(), Some(VendState::Waiting));
        prop_assert_eq!(returned(&sink).iter().sum::<u32>(), total);
        prop_assert_eq!(machine.last_receipt().map(|r| r.paid), Some(total));
    }

    #[test]
    fn credit_and_change_are_never_both_held(
        events in prop::collection::vec(arbitrary_event(), 1..60)
    ) {
        let (mut machine, _sink) = machine();

        for event in &events {
            match event {
                Some(id) => machine.dispatch(id).unwrap(),
                None => machine.tick().unwrap(),
            };

            let (amount, change_due) = (machine.amount(), machine.change_due());
            prop_assert!(
                amount == 0 || change_due == 0,
                "amount {amount}, change due {change_due}"
            );
            let state = machine.state();
            prop_assert_ne!(state, Some(VendState::DeliverProduct));
            if state == Some(VendState::Waiting) {
                prop_assert_eq!((amount, change_due), (0, 0));
            }
        }
    }

    #[test]
    fn greedy_change_is_minimal(multiple in 0u32..200) {
        let amount = multiple * 5;
        let change = make_change(amount, &STANDARD).unwrap();

        prop_assert_eq!(change.total(), amount);
        let coins = change.coins().count() as u32;
        prop_assert_eq!(Some(coins), min_coins(amount, &STANDARD));
    }

    #[test]
    fn change_is_largest_first(multiple in 1u32..200) {
        let change = make_change(multiple * 5, &STANDARD).unwrap();
        let coins: Vec<u32> = change.coins().collect();

        prop_assert!(coins.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(change.parts().iter().all(|&(_, count)| count > 0));
    }

    #[test]
    fn unknown_events_change_nothing(
        coins in arbitrary_coins(5),
        event in "[a-z_]{1,12}"
    ) {
        prop_assume!(Catalog::standard().product(&event).is_none());
        let (mut machine, _sink) = machine();
        insert_all(&mut machine, &coins);
        let before = machine.snapshot();

        let status = machine.dispatch(&event).unwrap();

        prop_assert_eq!(status, DispatchStatus::Ignored(VendState::AddCoins));
        prop_assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn history_is_bounded(
        states in prop::collection::vec(arbitrary_state(), 1..40),
        limit in 1usize..10
    ) {
        let mut history = StateHistory::with_limit(limit);

        for pair in states.windows(2) {
            history.record(StateTransition {
                from: pair[0],
                to: pair[1],
                timestamp: Utc::now(),
                trigger: None,
            });
        }

        let recorded = states.len().saturating_sub(1);
        prop_assert_eq!(history.len(), recorded.min(limit));
        if let Some(last) = history.last() {
            prop_assert_eq!(Some(&last.to), states.last());
        }
    }

    #[test]
    fn state_names_round_trip(state in arbitrary_state()) {
        prop_assert_eq!(VendState::from_name(state.name()), Some(state));

        let json = serde_json::to_string(&state).unwrap();
        let back: VendState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, state);
    }
}
