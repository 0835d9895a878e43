//! Static enumeration of the states an action may jump to.

use std::collections::{HashMap, HashSet};

use crate::action::ActionKind;
use crate::config::GameConfig;
use crate::state::{State, StateArg, StateNum, StateTable, WellKnownState};
use crate::thing::{StateSlot, ThingFlagSet, ThingFlags, ThingFlags2, ThingTemplate};
use crate::world::Thing;

/// The thing under analysis: its template plus the flags it carries.
///
/// A live thing may have flags that differ from its template defaults, and
/// some branch rules (`A_GenRefire`, `A_HealthJump`) and the pain/death seeds
/// depend on them.
#[derive(Clone, Copy, Debug)]
pub struct Subject<'a> {
    pub template: &'a ThingTemplate,
    pub flags: ThingFlagSet,
}

impl<'a> Subject<'a> {
    /// A freshly spawned instance of `template`.
    pub fn of_template(template: &'a ThingTemplate) -> Self {
        Self {
            template,
            flags: template.default_flags(),
        }
    }

    pub fn of_thing(thing: &Thing, template: &'a ThingTemplate) -> Self {
        Self {
            template,
            flags: thing.flags,
        }
    }

    #[inline]
    pub fn has(&self, flag: ThingFlags) -> bool {
        self.flags.flags.contains(flag)
    }

    #[inline]
    pub fn has2(&self, flag: ThingFlags2) -> bool {
        self.flags.flags2.contains(flag)
    }

    /// Shootable and not invulnerable.
    pub fn is_damageable(&self) -> bool {
        self.has(ThingFlags::SHOOTABLE) && !self.has2(ThingFlags2::INVULNERABLE)
    }
}

/// Enumerates the alternate successors of a state for one subject.
///
/// Label arguments are bound to the subject's template once, when the
/// resolver is built.
#[derive(Clone, Debug)]
pub struct BranchResolver<'a> {
    states: &'a StateTable,
    subject: Subject<'a>,
    labels: HashMap<(StateNum, usize), StateNum>,
}

impl<'a> BranchResolver<'a> {
    pub fn new(states: &'a StateTable, subject: Subject<'a>) -> Self {
        let labels = states
            .label_args()
            .iter()
            .filter_map(|&(num, index)| {
                let dest = states.get(num)?.args.state(index, subject.template, states)?;
                Some(((num, index), dest))
            })
            .collect();
        Self {
            states,
            subject,
            labels,
        }
    }

    /// Where label argument `index` of state `num` points for this subject.
    pub fn label_target(&self, num: StateNum, index: usize) -> Option<StateNum> {
        self.labels.get(&(num, index)).copied()
    }

    pub fn subject(&self) -> Subject<'a> {
        self.subject
    }

    /// Every state the action of `num` could redirect to, other than the
    /// default successor, minus anything already in `visited`.
    ///
    /// Unknown actions and malformed arguments contribute nothing.
    pub fn branches(&self, num: StateNum, visited: &HashSet<StateNum>) -> Vec<StateNum> {
        let mut dests = Vec::new();
        if let Some(state) = self.states.get(num)
            && !num.is_null()
        {
            self.collect(num, state, &mut dests);
        }

        let mut out: Vec<StateNum> = Vec::with_capacity(dests.len());
        for dest in dests {
            if !visited.contains(&dest) && !out.contains(&dest) {
                out.push(dest);
            }
        }
        out
    }

    fn collect(&self, num: StateNum, state: &State, dests: &mut Vec<StateNum>) {
        let template = self.subject.template;
        let slot = |slot: StateSlot| template.state(slot);
        let arg_state = |index: usize| match state.args.get(index) {
            Some(StateArg::Label(_)) => self.label_target(num, index),
            _ => state.args.state(index, template, self.states),
        };
        let well_known = |state: WellKnownState| self.states.well_known(state);
        let non_null = |num: StateNum| (!num.is_null()).then_some(num);

        match state.action_kind() {
            ActionKind::Look | ActionKind::CPosRefire | ActionKind::SpidRefire => {
                dests.push(slot(StateSlot::See));
            }
            kind @ (ActionKind::Chase | ActionKind::VileChase) => {
                dests.push(slot(StateSlot::Spawn));
                dests.extend(non_null(slot(StateSlot::Melee)));
                dests.extend(non_null(slot(StateSlot::Missile)));
                if kind == ActionKind::VileChase {
                    dests.extend(well_known(WellKnownState::VileHeal1));
                }
            }
            ActionKind::SkullAttack | ActionKind::SnakeAttack | ActionKind::SnakeAttack2 => {
                dests.push(slot(StateSlot::Spawn));
            }
            ActionKind::RandomJump if state.misc2 > 0 => {
                dests.extend(self.states.for_deh_num(state.misc1));
            }
            ActionKind::GenRefire
                if state.args.int(1, 0) > 0 || self.subject.has(ThingFlags::FRIEND) =>
            {
                dests.extend(arg_state(0));
            }
            ActionKind::HealthJump if self.subject.is_damageable() => {
                dests.extend(arg_state(0));
            }
            ActionKind::CounterJump if valid_counter(state.args.int(3, 0)) => {
                dests.extend(arg_state(0));
            }
            ActionKind::CounterSwitch => {
                let counter = state.args.int(0, 0);
                let count = state.args.int(2, 0);
                if let Some(start) = arg_state(1)
                    && valid_counter(counter)
                    && count >= 1
                {
                    let run: Option<Vec<StateNum>> = (0..count as u32)
                        .map(|i| start.offset(i).filter(|num| self.states.contains(*num)))
                        .collect();
                    dests.extend(run.into_iter().flatten());
                }
            }
            ActionKind::TargetJump
            | ActionKind::JumpIfTargetInLos
            | ActionKind::CheckPlayerDone => {
                dests.extend(arg_state(0));
            }
            ActionKind::Jump if state.args.int(0, 0) != 0 => {
                dests.extend((1..state.args.len()).filter_map(arg_state));
            }
            ActionKind::MissileAttack | ActionKind::MissileSpread => {
                dests.extend(arg_state(4));
            }
            ActionKind::GenWizard | ActionKind::SpawnSound | ActionKind::SpawnFly => {
                dests.push(StateNum::NULL);
            }
            ActionKind::Sor2DthLoop => dests.extend(well_known(WellKnownState::Sor2Die4)),
            ActionKind::Srcr1Attack => dests.extend(well_known(WellKnownState::Srcr1Atk4)),
            ActionKind::Srcr2Decide => dests.extend(well_known(WellKnownState::Sor2Tele1)),
            ActionKind::MinotaurDecide => {
                dests.extend(well_known(WellKnownState::MntrAtk4_1));
                dests.extend(well_known(WellKnownState::MntrAtk3_1));
            }
            ActionKind::MinotaurAtk3 => dests.extend(well_known(WellKnownState::MntrAtk3_4)),
            ActionKind::MinotaurCharge => {
                dests.push(slot(StateSlot::See));
                dests.push(slot(StateSlot::Spawn));
            }
            ActionKind::WhirlwindSeek => dests.push(slot(StateSlot::Death)),
            ActionKind::LichFireGrow => dests.extend(well_known(WellKnownState::LichFx3_4)),
            ActionKind::ImpChargeAtk => dests.push(slot(StateSlot::See)),
            ActionKind::ImpDeath | ActionKind::ImpXDeath2 => {
                dests.extend(non_null(slot(StateSlot::Crash)));
            }
            ActionKind::ImpExplode => dests.extend(well_known(WellKnownState::ImpXCrash1)),
            _ => {}
        }
    }
}

fn valid_counter(index: i32) -> bool {
    (0..GameConfig::MAX_COUNTERS as i32).contains(&index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRef;
    use crate::state::{StateArg, StateTableBuilder};

    fn with_kind(name: &str, kind: ActionKind) -> State {
        State::new(name, 4, StateNum(1)).with_action(ActionRef::of_kind(kind))
    }

    fn resolve(states: &StateTable, template: &ThingTemplate, num: StateNum) -> Vec<StateNum> {
        BranchResolver::new(states, Subject::of_template(template)).branches(num, &HashSet::new())
    }

    #[test]
    fn hatching_cube_may_dissolve_but_beta_skull_stays() {
        let mut b = StateTableBuilder::new();
        let fly = b.push(with_kind("S_SPAWNFLY", ActionKind::SpawnFly));
        let beta = b.push(State::new("S_BSKUL_ATK", 4, StateNum(2)).with_action(
            ActionRef::of_kind(ActionKind::BetaSkullAttack),
        ));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("cube")
            .state(StateSlot::Spawn, fly)
            .build();

        assert_eq!(resolve(&states, &template, fly), vec![StateNum::NULL]);
        assert!(resolve(&states, &template, beta).is_empty());
    }

    #[test]
    fn chase_adds_spawn_and_attack_slots() {
        let mut b = StateTableBuilder::new();
        let stand = b.push(State::new("S_STAND", 10, StateNum(1)));
        let chase = b.push(with_kind("S_RUN", ActionKind::Chase));
        let melee = b.push(State::new("S_MELEE", 8, StateNum(2)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("demon")
            .state(StateSlot::Spawn, stand)
            .state(StateSlot::Melee, melee)
            .build();

        assert_eq!(resolve(&states, &template, chase), vec![stand, melee]);
    }

    #[test]
    fn counter_switch_covers_half_open_run() {
        let mut b = StateTableBuilder::new();
        let switch = b.push(
            with_kind("S_SWITCH", ActionKind::CounterSwitch).with_args(
                [StateArg::Int(0), StateArg::State(StateNum(2)), StateArg::Int(3)]
                    .into_iter()
                    .collect(),
            ),
        );
        for name in ["S_K0", "S_K1", "S_K2", "S_K3"] {
            b.push(State::new(name, 2, StateNum(1)));
        }
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("switcher").state(StateSlot::Spawn, switch).build();

        assert_eq!(
            resolve(&states, &template, switch),
            vec![StateNum(2), StateNum(3), StateNum(4)]
        );
    }

    #[test]
    fn counter_switch_rejects_bad_counter_and_overrun() {
        let mut b = StateTableBuilder::new();
        let bad_counter = b.push(
            with_kind("S_BAD", ActionKind::CounterSwitch).with_args(
                [StateArg::Int(9), StateArg::State(StateNum(3)), StateArg::Int(1)]
                    .into_iter()
                    .collect(),
            ),
        );
        let overrun = b.push(
            with_kind("S_OVER", ActionKind::CounterSwitch).with_args(
                [StateArg::Int(1), StateArg::State(StateNum(3)), StateArg::Int(5)]
                    .into_iter()
                    .collect(),
            ),
        );
        b.push(State::new("S_ONLY", 2, StateNum(3)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").build();

        assert!(resolve(&states, &template, bad_counter).is_empty());
        assert!(resolve(&states, &template, overrun).is_empty());
    }

    #[test]
    fn jump_collects_labels_and_skips_malformed() {
        let mut b = StateTableBuilder::new();
        let jump = b.push(
            with_kind("S_JUMP", ActionKind::Jump).with_args(
                [
                    StateArg::Int(128),
                    StateArg::Label("Flicker".into()),
                    StateArg::Unresolved("S_GONE".into()),
                    StateArg::State(StateNum(3)),
                ]
                .into_iter()
                .collect(),
            ),
        );
        let flicker = b.push(State::new("S_FLICKER", 2, StateNum(1)));
        b.push(State::new("S_OTHER", 2, StateNum(1)));
        let never = b.push(
            with_kind("S_NEVER", ActionKind::Jump)
                .with_args([StateArg::Int(0), StateArg::State(flicker)].into_iter().collect()),
        );
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("lamp").label("Flicker", flicker).build();

        assert_eq!(resolve(&states, &template, jump), vec![flicker, StateNum(3)]);
        assert!(resolve(&states, &template, never).is_empty());
    }

    #[test]
    fn labels_bind_once_per_template() {
        let mut b = StateTableBuilder::new();
        let jump = b.push(
            with_kind("S_JUMP", ActionKind::Jump).with_args(
                [StateArg::Int(256), StateArg::Label("Flicker".into())]
                    .into_iter()
                    .collect(),
            ),
        );
        let flicker = b.push(State::new("S_FLICKER", 2, StateNum(1)));
        let states = b.build().unwrap();
        assert_eq!(states.label_args(), &[(jump, 1)]);

        let lamp = ThingTemplate::builder("lamp").label("Flicker", flicker).build();
        let plain = ThingTemplate::builder("plain").build();
        let lit = BranchResolver::new(&states, Subject::of_template(&lamp));
        let unlit = BranchResolver::new(&states, Subject::of_template(&plain));

        assert_eq!(lit.label_target(jump, 1), Some(flicker));
        assert_eq!(lit.label_target(jump, 0), None);
        assert_eq!(unlit.label_target(jump, 1), None);
        assert!(unlit.branches(jump, &HashSet::new()).is_empty());
    }

    #[test]
    fn health_jump_depends_on_subject_flags() {
        let mut b = StateTableBuilder::new();
        let check = b.push(
            with_kind("S_CHECK", ActionKind::HealthJump)
                .with_args([StateArg::State(StateNum(2))].into_iter().collect()),
        );
        b.push(State::new("S_HURT", 2, StateNum(1)));
        let states = b.build().unwrap();
        let solid = ThingTemplate::builder("pillar").flags(ThingFlags::SOLID).build();
        let target = ThingTemplate::builder("barrel")
            .flags(ThingFlags::SOLID | ThingFlags::SHOOTABLE)
            .build();

        assert!(resolve(&states, &solid, check).is_empty());
        assert_eq!(resolve(&states, &target, check), vec![StateNum(2)]);
    }

    #[test]
    fn well_known_targets_are_skipped_when_absent() {
        let mut b = StateTableBuilder::new();
        let decide = b.push(with_kind("S_DECIDE", ActionKind::MinotaurDecide));
        b.push(State::new("S_MNTR_ATK3_1", 2, StateNum(1)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("minotaur").build();

        assert_eq!(resolve(&states, &template, decide), vec![StateNum(2)]);
    }

    #[test]
    fn visited_destinations_are_filtered() {
        let mut b = StateTableBuilder::new();
        let look = b.push(with_kind("S_LOOK", ActionKind::Look));
        let see = b.push(State::new("S_SEE", 2, StateNum(1)));
        let states = b.build().unwrap();
        let template = ThingTemplate::builder("t").state(StateSlot::See, see).build();
        let resolver = BranchResolver::new(&states, Subject::of_template(&template));

        assert_eq!(resolver.branches(look, &HashSet::new()), vec![see]);
        assert!(resolver.branches(look, &HashSet::from([see])).is_empty());
        assert!(resolver.branches(StateNum::NULL, &HashSet::new()).is_empty());
    }
}
