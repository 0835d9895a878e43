//! Worklist traversal over a subject's reachable states.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::analysis::{BranchResolver, Subject};
use crate::state::{State, StateNum, StateTable};
use crate::thing::{StateSlot, ThingFlags};

/// Scratch space for one reachability query.
///
/// Owning one per query (or per worker thread) keeps concurrent queries
/// independent. The buffers are cleared at the start of every query, so a
/// single context can be reused.
#[derive(Clone, Debug, Default)]
pub struct ReachQuery {
    visited: HashSet<StateNum>,
    pending: HashSet<StateNum>,
    queue: VecDeque<StateNum>,
    enqueued: usize,
}

impl ReachQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// States visited by the last query.
    pub fn visited(&self) -> &HashSet<StateNum> {
        &self.visited
    }

    /// Worklist pushes made by the last query.
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    fn reset(&mut self) {
        self.visited.clear();
        self.pending.clear();
        self.queue.clear();
        self.enqueued = 0;
    }

    fn enqueue(&mut self, num: StateNum) {
        if !self.visited.contains(&num) && self.pending.insert(num) {
            self.queue.push_back(num);
            self.enqueued += 1;
        }
    }
}

/// Answers "does any state reachable from here satisfy P?" for one subject.
#[derive(Clone, Debug)]
pub struct Reachability<'a> {
    states: &'a StateTable,
    resolver: BranchResolver<'a>,
}

impl<'a> Reachability<'a> {
    pub fn new(states: &'a StateTable, subject: Subject<'a>) -> Self {
        Self {
            states,
            resolver: BranchResolver::new(states, subject),
        }
    }

    /// Returns true if some state reachable from `start` satisfies
    /// `predicate`.
    ///
    /// Besides `start`, a shootable subject also seeds its pain (when it can
    /// flinch), death and extreme-death chains. Each state is tested at most
    /// once, so the walk terminates in time linear in the table size.
    pub fn exists_reachable_state<P>(&self, start: StateNum, predicate: P) -> bool
    where
        P: FnMut(StateNum, &State) -> bool,
    {
        self.exists_with(&mut ReachQuery::new(), start, predicate)
    }

    /// Same as [`exists_reachable_state`](Self::exists_reachable_state),
    /// reusing caller-owned scratch space.
    pub fn exists_with<P>(&self, query: &mut ReachQuery, start: StateNum, mut predicate: P) -> bool
    where
        P: FnMut(StateNum, &State) -> bool,
    {
        query.reset();
        self.seed(query, start);

        while let Some(seed) = query.queue.pop_front() {
            let mut num = seed;
            loop {
                if query.visited.contains(&num) {
                    break;
                }
                let Some(state) = self.states.get(num) else {
                    break;
                };
                if predicate(num, state) {
                    return true;
                }
                query.visited.insert(num);

                for dest in self.resolver.branches(num, &query.visited) {
                    query.enqueue(dest);
                }

                if state.is_terminal() || num.is_null() {
                    break;
                }
                num = state.next;
            }
        }
        false
    }

    /// Full closure of states reachable from `start`, seeds included.
    pub fn reachable_states(&self, start: StateNum) -> BTreeSet<StateNum> {
        let mut query = ReachQuery::new();
        self.exists_with(&mut query, start, |_, _| false);
        query.visited.into_iter().collect()
    }

    fn seed(&self, query: &mut ReachQuery, start: StateNum) {
        query.enqueue(start);

        let subject = self.resolver.subject();
        if !subject.has(ThingFlags::SHOOTABLE) {
            return;
        }
        let template = subject.template;
        if template.pain_chance > 0 {
            query.enqueue(template.state(StateSlot::Pain));
        }
        query.enqueue(template.state(StateSlot::Death));
        let xdeath = template.state(StateSlot::XDeath);
        if !xdeath.is_null() {
            query.enqueue(xdeath);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, ActionRef};
    use crate::state::{StateArg, StateTableBuilder};
    use crate::thing::ThingTemplate;

    #[test]
    fn walks_linear_chain_to_terminal() {
        let mut b = StateTableBuilder::new();
        let a = b.push(State::new("S_A", 3, StateNum(2)));
        b.push(State::new("S_B", 3, StateNum(3)));
        b.push(State::new("S_C", -1, StateNum(4)));
        b.push(State::new("S_UNREACHED", 3, StateNum(4)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").state(StateSlot::Spawn, a).build();
        let reach = Reachability::new(&states, Subject::of_template(&template));

        assert_eq!(
            reach.reachable_states(a),
            BTreeSet::from([StateNum(1), StateNum(2), StateNum(3)])
        );
        assert!(!reach.exists_reachable_state(a, |num, _| num == StateNum(4)));
        assert!(!reach.exists_reachable_state(a, |num, _| num.is_null()));
    }

    #[test]
    fn cycles_terminate() {
        let mut b = StateTableBuilder::new();
        let a = b.push(State::new("S_A", 0, StateNum(2)));
        b.push(State::new("S_B", 0, StateNum(1)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));

        assert_eq!(reach.reachable_states(a).len(), 2);
    }

    #[test]
    fn null_successor_is_detected() {
        let mut b = StateTableBuilder::new();
        let a = b.push(State::new("S_PUFF1", 4, StateNum(2)));
        b.push(State::new("S_PUFF2", 4, StateNum::NULL));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("puff").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));

        assert!(reach.exists_reachable_state(a, |num, _| num.is_null()));
    }

    #[test]
    fn branches_are_followed() {
        let mut b = StateTableBuilder::new();
        let a = b.push(
            State::new("S_FLIP", 4, StateNum(1))
                .with_action(ActionRef::of_kind(ActionKind::Jump))
                .with_args([StateArg::Int(64), StateArg::State(StateNum(2))].into_iter().collect()),
        );
        b.push(State::new("S_FADE", 4, StateNum::NULL));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));

        assert!(reach.exists_reachable_state(a, |num, _| num.is_null()));
    }

    #[test]
    fn shared_branch_target_is_queued_once() {
        let jump_to = |to: StateNum| {
            [StateArg::Int(128), StateArg::State(to)].into_iter().collect()
        };
        let mut b = StateTableBuilder::new();
        let a = b.push(
            State::new("S_A", 4, StateNum(2))
                .with_action(ActionRef::of_kind(ActionKind::Jump))
                .with_args(jump_to(StateNum(3))),
        );
        b.push(
            State::new("S_B", -1, StateNum(2))
                .with_action(ActionRef::of_kind(ActionKind::Jump))
                .with_args(jump_to(StateNum(3))),
        );
        b.push(State::new("S_X", -1, StateNum(3)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));
        let mut query = ReachQuery::new();

        assert!(!reach.exists_with(&mut query, a, |num, _| num.is_null()));
        assert_eq!(query.visited().len(), 3);
        assert_eq!(query.enqueued(), 2);
    }

    #[test]
    fn shootable_subject_seeds_pain_and_death() {
        let mut b = StateTableBuilder::new();
        let stand = b.push(State::new("S_STAND", -1, StateNum(1)));
        let pain = b.push(State::new("S_PAIN", 4, StateNum(1)));
        let death = b.push(State::new("S_DIE", -1, StateNum(3)));
        let states = b.build().unwrap();
        let base = ThingTemplate::builder("t")
            .flags(ThingFlags::SOLID | ThingFlags::SHOOTABLE)
            .state(StateSlot::Spawn, stand)
            .state(StateSlot::Pain, pain)
            .state(StateSlot::Death, death);

        let flinching = base.clone().pain_chance(100).build();
        let stoic = base.build();

        let reach = Reachability::new(&states, Subject::of_template(&flinching));
        assert!(reach.reachable_states(stand).contains(&pain));

        let reach = Reachability::new(&states, Subject::of_template(&stoic));
        let closure = reach.reachable_states(stand);
        assert!(!closure.contains(&pain));
        assert!(closure.contains(&death));
    }

    #[test]
    fn query_context_is_reusable() {
        let mut b = StateTableBuilder::new();
        let a = b.push(State::new("S_A", -1, StateNum(1)));
        let c = b.push(State::new("S_C", -1, StateNum(2)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").build();
        let reach = Reachability::new(&states, Subject::of_template(&template));
        let mut query = ReachQuery::new();

        assert!(!reach.exists_with(&mut query, a, |num, _| num == c));
        assert!(reach.exists_with(&mut query, c, |num, _| num == c));
        assert!(query.visited().is_empty());
    }
}
