//! Reachability over randomly generated state tables.

use std::collections::HashSet;

use proptest::prelude::*;
use thing_core::{
    ActionKind, ActionRef, Reachability, State, StateArg, StateNum, StateTable, StateTableBuilder,
    Subject, ThingTemplate,
};

#[derive(Clone, Debug)]
enum Entry {
    Plain,
    Jump { chance: i32, dest: u32 },
    Switch { counter: i32, start: u32, count: i32 },
}

#[derive(Clone, Debug)]
struct Row {
    tics: i32,
    next: u32,
    entry: Entry,
}

fn row(len: u32) -> impl Strategy<Value = Row> {
    let entry = prop_oneof![
        2 => Just(Entry::Plain),
        1 => (0..=256i32, 0..=len).prop_map(|(chance, dest)| Entry::Jump { chance, dest }),
        1 => (0..8i32, 0..=len, 1..4i32)
            .prop_map(|(counter, start, count)| Entry::Switch { counter, start, count }),
    ];
    (-2..6i32, 0..=len, entry).prop_map(|(tics, next, entry)| Row { tics, next, entry })
}

fn table() -> impl Strategy<Value = StateTable> {
    (1..24u32)
        .prop_flat_map(|len| proptest::collection::vec(row(len), len as usize))
        .prop_map(|rows| {
            let mut builder = StateTableBuilder::new();
            for (i, row) in rows.into_iter().enumerate() {
                let state = State::new(format!("S_{i}"), row.tics, StateNum(row.next));
                let state = match row.entry {
                    Entry::Plain => state,
                    Entry::Jump { chance, dest } => state
                        .with_action(ActionRef::of_kind(ActionKind::Jump))
                        .with_args(
                            [StateArg::Int(chance), StateArg::State(StateNum(dest))]
                                .into_iter()
                                .collect(),
                        ),
                    Entry::Switch { counter, start, count } => state
                        .with_action(ActionRef::of_kind(ActionKind::CounterSwitch))
                        .with_args(
                            [
                                StateArg::Int(counter),
                                StateArg::State(StateNum(start)),
                                StateArg::Int(count),
                            ]
                            .into_iter()
                            .collect(),
                        ),
                };
                builder.push(state);
            }
            builder.build().expect("generated table is valid")
        })
}

/// States on the default successor chain from `start`, up to and including
/// the first terminal, null or repeated state.
fn default_chain(states: &StateTable, start: StateNum) -> Vec<StateNum> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut num = start;
    while seen.insert(num) {
        chain.push(num);
        let state = states.get(num).expect("chain stays in table");
        if num.is_null() || state.is_terminal() {
            break;
        }
        num = state.next;
    }
    chain
}

proptest! {
    #[test]
    fn closure_stays_inside_table(states in table(), pick in any::<prop::sample::Index>()) {
        let template = ThingTemplate::builder("t").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));
        let start = StateNum(pick.index(states.len()) as u32);

        let closure = reach.reachable_states(start);
        prop_assert!(closure.len() <= states.len());
        prop_assert!(closure.iter().all(|num| states.contains(*num)));
        prop_assert!(closure.contains(&start));
    }

    #[test]
    fn default_chain_is_always_found(states in table(), pick in any::<prop::sample::Index>()) {
        let template = ThingTemplate::builder("t").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));
        let start = StateNum(pick.index(states.len()) as u32);

        let closure = reach.reachable_states(start);
        let chain = default_chain(&states, start);
        for num in &chain {
            prop_assert!(closure.contains(num), "{num:?} missing from closure");
            prop_assert!(reach.exists_reachable_state(start, |found, _| found == *num));
        }
        if chain.last().is_some_and(|num| num.is_null()) {
            prop_assert!(reach.exists_reachable_state(start, |num, _| num.is_null()));
        }
    }
}
