//! Classifier and reachability behavior over small hand-built tables.

use std::collections::BTreeSet;

use thing_core::{
    ActionKind, ActionRef, Content, DecorationClassifier, ReachQuery, Reachability, State, StateArg,
    StateNum, StateSlot, StateTableBuilder, Subject, TemplateTable, ThingFlagSet, ThingFlags,
    ThingTemplate,
};

fn act(kind: ActionKind) -> ActionRef {
    ActionRef::of_kind(kind)
}

/// Builds a content pack with one template per entry.
fn content(build: impl FnOnce(&mut StateTableBuilder) -> Vec<ThingTemplate>) -> Content {
    let mut builder = StateTableBuilder::new();
    let templates = build(&mut builder);
    Content::new(
        builder.build().expect("valid states"),
        TemplateTable::new(templates).expect("valid templates"),
    )
}

fn classify(content: &Content, name: &str) -> bool {
    let (_, template) = content.find_template(name).expect("template exists");
    DecorationClassifier::new(content).is_permanent_solid_template(template)
}

#[test]
fn animated_torch_is_permanent() {
    let content = content(|b| {
        let first = b.next_num();
        b.push(State::new("S_TBLU", 4, StateNum(first.0 + 1)).with_sprite("TBLU", 0));
        b.push(State::new("S_TBLU2", 4, StateNum(first.0 + 2)).with_sprite("TBLU", 1));
        b.push(State::new("S_TBLU3", 4, first).with_sprite("TBLU", 2));
        vec![
            ThingTemplate::builder("BlueTorch")
                .doomednum(44)
                .flags(ThingFlags::SOLID)
                .state(StateSlot::Spawn, first)
                .build(),
        ]
    });
    assert!(classify(&content, "BlueTorch"));
}

#[test]
fn wandering_thing_is_not_permanent() {
    let content = content(|b| {
        let look = b.push(State::new("S_LOOK", 10, StateNum(1)).with_action(act(ActionKind::Look)));
        let run = b.push(State::new("S_RUN", 3, StateNum(2)).with_action(act(ActionKind::Chase)));
        vec![
            ThingTemplate::builder("Wanderer")
                .flags(ThingFlags::SOLID)
                .speed(8)
                .state(StateSlot::Spawn, look)
                .state(StateSlot::See, run)
                .build(),
        ]
    });
    assert!(!classify(&content, "Wanderer"));
}

#[test]
fn destructible_thing_is_rejected_before_analysis() {
    // Every chain is static and terminal, so only the flags can reject it.
    let content = content(|b| {
        let stand = b.push(State::new("S_STAND", -1, StateNum(1)));
        let pain = b.push(State::new("S_FLINCH", -1, StateNum(2)));
        let death = b.push(State::new("S_WRECK", -1, StateNum(3)));
        let with_chains = |name: &str, flags: ThingFlags| {
            ThingTemplate::builder(name)
                .spawn_health(20)
                .pain_chance(255)
                .flags(flags)
                .state(StateSlot::Spawn, stand)
                .state(StateSlot::Pain, pain)
                .state(StateSlot::Death, death)
                .build()
        };
        vec![
            with_chains("Barrel", ThingFlags::SOLID | ThingFlags::SHOOTABLE),
            with_chains("Pillar", ThingFlags::SOLID),
        ]
    });
    let classifier = DecorationClassifier::new(&content);

    let (_, barrel) = content.find_template("Barrel").expect("template exists");
    let mut query = ReachQuery::new();
    assert!(!classifier.classify(&mut query, Subject::of_template(barrel)));
    assert!(query.visited().is_empty());

    let (_, pillar) = content.find_template("Pillar").expect("template exists");
    assert!(classifier.classify(&mut query, Subject::of_template(pillar)));
    assert!(!query.visited().is_empty());
}

#[test]
fn invulnerable_shootable_thing_is_analyzed() {
    let content = content(|b| {
        let stand = b.push(State::new("S_STAND", -1, StateNum(1)));
        vec![
            ThingTemplate::builder("Statue")
                .flags(ThingFlags::SOLID | ThingFlags::SHOOTABLE)
                .flags2(thing_core::ThingFlags2::INVULNERABLE)
                .state(StateSlot::Spawn, stand)
                .state(StateSlot::Death, stand)
                .build(),
        ]
    });
    assert!(classify(&content, "Statue"));
}

#[test]
fn flag_change_deep_in_a_branch_disqualifies() {
    let content = content(|b| {
        let idle = b.next_num();
        let ghostly = ThingFlagSet::new(ThingFlags::NOCLIP, Default::default());
        b.push(
            State::new("S_IDLE", 8, idle)
                .with_action(act(ActionKind::Jump))
                .with_args(
                    [StateArg::Int(4), StateArg::Label("Fade".into())]
                        .into_iter()
                        .collect(),
                ),
        );
        let fade = b.push(
            State::new("S_FADE", 8, idle)
                .with_action(act(ActionKind::SetFlags))
                .with_args([StateArg::Int(1), StateArg::Flags(ghostly)].into_iter().collect()),
        );
        vec![
            ThingTemplate::builder("Phantom")
                .flags(ThingFlags::SOLID)
                .state(StateSlot::Spawn, idle)
                .label("Fade", fade)
                .build(),
        ]
    });
    assert!(!classify(&content, "Phantom"));
}

#[test]
fn counter_switch_of_three_reaches_exactly_three() {
    let content = content(|b| {
        let switch = b.next_num();
        let first = StateNum(switch.0 + 1);
        b.push(
            State::new("S_SWITCH", -1, switch)
                .with_action(act(ActionKind::CounterSwitch))
                .with_args(
                    [StateArg::Int(2), StateArg::State(first), StateArg::Int(3)]
                        .into_iter()
                        .collect(),
                ),
        );
        for name in ["S_K0", "S_K1", "S_K2", "S_K3"] {
            b.push(State::new(name, -1, switch));
        }
        vec![ThingTemplate::builder("Switcher").state(StateSlot::Spawn, switch).build()]
    });
    let (_, template) = content.find_template("Switcher").unwrap();
    let reach = Reachability::new(&content.states, Subject::of_template(template));

    let closure = reach.reachable_states(template.spawn_state());
    let expected: BTreeSet<StateNum> = (1..=4).map(StateNum).collect();
    assert_eq!(closure, expected);
    assert!(!closure.contains(&StateNum(5)));
}

#[test]
fn pain_chain_is_seeded_for_shootable_subjects() {
    let content = content(|b| {
        let stand = b.push(State::new("S_STAND", -1, StateNum(1)));
        let pain = b.push(State::new("S_PAIN", 6, StateNum::NULL));
        let death = b.push(State::new("S_DIE", -1, StateNum(3)));
        vec![
            ThingTemplate::builder("Target")
                .flags(ThingFlags::SHOOTABLE)
                .pain_chance(200)
                .state(StateSlot::Spawn, stand)
                .state(StateSlot::Pain, pain)
                .state(StateSlot::Death, death)
                .build(),
        ]
    });
    let (_, template) = content.find_template("Target").unwrap();
    let reach = Reachability::new(&content.states, Subject::of_template(template));

    assert!(reach.exists_reachable_state(template.spawn_state(), |num, _| num.is_null()));
    assert!(reach.reachable_states(template.spawn_state()).contains(&StateNum(2)));
}

#[test]
fn dense_cyclic_table_terminates() {
    // Every state branches to every other one through A_Jump.
    let content = content(|b| {
        let count = 12u32;
        let mut first = StateNum::NULL;
        for i in 0..count {
            let args: Vec<StateArg> = std::iter::once(StateArg::Int(255))
                .chain((1..=count).map(|j| StateArg::State(StateNum(j))).take(15))
                .collect();
            let num = b.push(
                State::new(format!("S_MESH{i}"), 0, StateNum(1 + (i + 1) % count))
                    .with_action(act(ActionKind::Jump))
                    .with_args(args.into_iter().collect()),
            );
            if i == 0 {
                first = num;
            }
        }
        vec![ThingTemplate::builder("Mesh").state(StateSlot::Spawn, first).build()]
    });
    let (_, template) = content.find_template("Mesh").unwrap();
    let reach = Reachability::new(&content.states, Subject::of_template(template));

    assert_eq!(reach.reachable_states(template.spawn_state()).len(), 12);
    assert!(!reach.exists_reachable_state(template.spawn_state(), |num, _| num.is_null()));
}
