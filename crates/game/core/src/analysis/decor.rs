//! Permanent solid decoration classification.
//!
//! A permanent solid decoration is a thing that blocks movement and will keep
//! doing so for the rest of the level: it never moves, never loses its
//! solidity and never disappears. Navigation code may bake such things into a
//! static obstacle map.

use crate::action::ActionKind;
use crate::analysis::{ReachQuery, Reachability, Subject};
use crate::content::Content;
use crate::state::{State, StateNum};
use crate::thing::{ThingFlags, ThingFlags2, ThingTemplate};
use crate::world::Thing;

/// Classifies things and templates against loaded content.
#[derive(Clone, Copy, Debug)]
pub struct DecorationClassifier<'a> {
    content: &'a Content,
}

impl<'a> DecorationClassifier<'a> {
    pub fn new(content: &'a Content) -> Self {
        Self { content }
    }

    /// Returns true if `thing` is solid and nothing it can ever do will
    /// change that.
    pub fn is_permanent_solid_decoration(&self, thing: &Thing) -> bool {
        self.classify_thing(&mut ReachQuery::new(), thing)
    }

    /// Classifies a freshly spawned instance of `template`.
    pub fn is_permanent_solid_template(&self, template: &ThingTemplate) -> bool {
        self.classify(&mut ReachQuery::new(), Subject::of_template(template))
    }

    /// [`is_permanent_solid_decoration`](Self::is_permanent_solid_decoration)
    /// with caller-owned scratch space.
    pub fn classify_thing(&self, query: &mut ReachQuery, thing: &Thing) -> bool {
        match self.content.template(thing.template) {
            Ok(template) => self.classify(query, Subject::of_thing(thing, template)),
            Err(_) => false,
        }
    }

    pub fn classify(&self, query: &mut ReachQuery, subject: Subject<'_>) -> bool {
        if !subject.has(ThingFlags::SOLID) {
            return false;
        }
        if subject.is_damageable() {
            return false;
        }
        if subject.flags.flags.intersects(ThingFlags::NOBLOCKMAP | ThingFlags::NOCLIP) {
            return false;
        }
        if subject.has2(ThingFlags2::PUSHABLE) {
            return false;
        }

        let template = subject.template;
        let spawn = template.spawn_state();
        if spawn.is_null() {
            return false;
        }

        let reach = Reachability::new(&self.content.states, subject);
        !reach.exists_with(query, spawn, |num, state| {
            breaks_decoration(num, state, template)
        })
    }
}

/// True if entering `state` ends a thing's career as a static obstacle: it
/// dissolves, walks, gets thrust, or loses solidity.
pub fn breaks_decoration(num: StateNum, state: &State, template: &ThingTemplate) -> bool {
    if num.is_null() {
        return true;
    }
    let kind = state.action_kind();
    if kind.is_walker() && template.speed != 0 {
        return true;
    }
    if kind == ActionKind::CasingThrust
        && (state.args.int(0, 0) != 0 || state.args.int(1, 0) != 0)
    {
        return true;
    }
    removes_solid(state)
}

/// True if the action of `state` clears a thing's solidity or lets things
/// pass through it.
///
/// For `A_SetFlags`/`A_UnSetFlags`, argument 0 selects the flag word
/// (0 = both, 1 = primary, 2 = secondary) and argument 1 is the flag list.
pub fn removes_solid(state: &State) -> bool {
    let kind = state.action_kind();
    if kind.always_removes_solid() {
        return true;
    }

    let field = state.args.int(0, 0);
    match kind {
        ActionKind::SetFlags => {
            let Some(set) = state.args.flags(1) else {
                return false;
            };
            (field <= 1 && set.flags.intersects(ThingFlags::NOBLOCKMAP | ThingFlags::NOCLIP))
                || (matches!(field, 0 | 2) && set.flags2.contains(ThingFlags2::PUSHABLE))
        }
        ActionKind::UnSetFlags => {
            let Some(set) = state.args.flags(1) else {
                return false;
            };
            matches!(field, 0 | 1) && set.flags.contains(ThingFlags::SOLID)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRef;
    use crate::state::{StateArg, StateTableBuilder};
    use crate::thing::{StateSlot, TemplateTable, ThingFlagSet};

    fn action(kind: ActionKind) -> ActionRef {
        ActionRef::of_kind(kind)
    }

    fn set_flags(kind: ActionKind, field: i32, flags: ThingFlagSet) -> State {
        State::new("S_FLAGS", 4, StateNum(1))
            .with_action(action(kind))
            .with_args([StateArg::Int(field), StateArg::Flags(flags)].into_iter().collect())
    }

    #[test]
    fn set_flags_respects_field_selector() {
        let noclip = ThingFlagSet::new(ThingFlags::NOCLIP, ThingFlags2::empty());
        let pushable = ThingFlagSet::new(ThingFlags::empty(), ThingFlags2::PUSHABLE);

        assert!(removes_solid(&set_flags(ActionKind::SetFlags, 0, noclip)));
        assert!(removes_solid(&set_flags(ActionKind::SetFlags, 1, noclip)));
        assert!(!removes_solid(&set_flags(ActionKind::SetFlags, 2, noclip)));
        assert!(removes_solid(&set_flags(ActionKind::SetFlags, 2, pushable)));
        assert!(!removes_solid(&set_flags(ActionKind::SetFlags, 1, pushable)));
    }

    #[test]
    fn unset_flags_only_counts_solid_in_primary_word() {
        let solid = ThingFlagSet::new(ThingFlags::SOLID, ThingFlags2::empty());
        let shootable = ThingFlagSet::new(ThingFlags::SHOOTABLE, ThingFlags2::empty());

        assert!(removes_solid(&set_flags(ActionKind::UnSetFlags, 0, solid)));
        assert!(removes_solid(&set_flags(ActionKind::UnSetFlags, 1, solid)));
        assert!(!removes_solid(&set_flags(ActionKind::UnSetFlags, 2, solid)));
        assert!(!removes_solid(&set_flags(ActionKind::UnSetFlags, 0, shootable)));
    }

    #[test]
    fn missing_flag_argument_is_harmless() {
        let state = State::new("S_X", 4, StateNum(1))
            .with_action(action(ActionKind::SetFlags))
            .with_args([StateArg::Int(0)].into_iter().collect());
        assert!(!removes_solid(&state));
    }

    #[test]
    fn walkers_only_count_with_speed() {
        let walk = State::new("S_WALK", 4, StateNum(1)).with_action(action(ActionKind::RandomWalk));
        let idle = ThingTemplate::builder("idle").build();
        let mobile = ThingTemplate::builder("mobile").speed(8).build();

        assert!(!breaks_decoration(StateNum(1), &walk, &idle));
        assert!(breaks_decoration(StateNum(1), &walk, &mobile));
    }

    #[test]
    fn column_is_permanent_but_barrel_is_not() {
        let mut b = StateTableBuilder::new();
        let column = b.push(State::new("S_COLU", -1, StateNum(1)));
        let barrel = b.push(State::new("S_BAR1", 6, StateNum(2)));
        let states = b.build().unwrap();
        let templates = TemplateTable::new(vec![
            ThingTemplate::builder("TechLamp")
                .flags(ThingFlags::SOLID)
                .state(StateSlot::Spawn, column)
                .build(),
            ThingTemplate::builder("ExplosiveBarrel")
                .flags(ThingFlags::SOLID | ThingFlags::SHOOTABLE)
                .state(StateSlot::Spawn, barrel)
                .build(),
        ])
        .unwrap();
        let content = Content::new(states, templates);
        let classifier = DecorationClassifier::new(&content);

        let (_, lamp) = content.find_template("TechLamp").unwrap();
        let (_, barrel) = content.find_template("ExplosiveBarrel").unwrap();
        assert!(classifier.is_permanent_solid_template(lamp));
        assert!(!classifier.is_permanent_solid_template(barrel));
    }

    #[test]
    fn null_spawn_state_is_rejected() {
        let states = StateTableBuilder::new().build().unwrap();
        let content = Content::new(states, TemplateTable::default());
        let ghost = ThingTemplate::builder("ghost").flags(ThingFlags::SOLID).build();

        assert!(!DecorationClassifier::new(&content).is_permanent_solid_template(&ghost));
    }
}
