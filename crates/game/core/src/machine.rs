//! Per-thing state advancement.
//!
//! A thing is either *active* (counting down the tics of its current state),
//! *terminal* (negative tics, frozen in place) or *dissolved* (it entered the
//! null state and was removed from the world). Entering a state sets the tic
//! counter from the state definition and runs the state's action exactly
//! once. Zero-tic states chain within the same call without yielding.

use crate::action::{ActionContext, ActionRegistry};
use crate::combat::{self, BASE_THRESHOLD, DamageOutcome};
use crate::config::GameConfig;
use crate::content::Content;
use crate::env::{GameEnv, compute_seed};
use crate::state::{StateError, StateNum};
use crate::thing::StateSlot;
use crate::world::{ThingKey, World, WorldEvent};

/// Most states one `set_state` call may enter before giving up for the tic.
const MAX_CHAIN: usize = 64;

/// Things whose action is currently running, innermost last, each with the
/// state change requested for it so far.
#[derive(Debug, Default)]
pub(crate) struct ActiveFrames {
    frames: Vec<(ThingKey, Option<StateNum>)>,
}

impl ActiveFrames {
    fn push(&mut self, key: ThingKey) {
        self.frames.push((key, None));
    }

    fn pop(&mut self) -> Option<StateNum> {
        self.frames.pop().and_then(|(_, requested)| requested)
    }

    /// Records `state` for `key` if its action is running. Returns false when
    /// `key` is not active and the change must be applied immediately.
    pub(crate) fn request(&mut self, key: ThingKey, state: StateNum) -> bool {
        match self.frames.iter_mut().rev().find(|(active, _)| *active == key) {
            Some((_, requested)) => {
                *requested = Some(state);
                true
            }
            None => false,
        }
    }
}

/// Drives thing states against loaded content and an action registry.
pub struct StateMachine<'a> {
    content: &'a Content,
    actions: &'a ActionRegistry,
    env: GameEnv<'a>,
    config: &'a GameConfig,
}

impl<'a> StateMachine<'a> {
    pub fn new(
        content: &'a Content,
        actions: &'a ActionRegistry,
        env: GameEnv<'a>,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            content,
            actions,
            env,
            config,
        }
    }

    pub fn content(&self) -> &'a Content {
        self.content
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn env(&self) -> GameEnv<'a> {
        self.env
    }

    /// Puts `key` into `state`, running entry actions and following zero-tic
    /// successors.
    ///
    /// Returns `Ok(false)` if the thing was removed (or did not exist).
    pub fn set_state(
        &self,
        world: &mut World,
        key: ThingKey,
        state: StateNum,
    ) -> Result<bool, StateError> {
        let mut active = ActiveFrames::default();
        self.enter(world, &mut active, key, state)
    }

    /// Enters `state` and follows zero-tic successors and action overrides.
    ///
    /// Only a revisit of a zero-tic state counts as a cycle. A state with
    /// duration may be re-entered by its own action; `MAX_CHAIN` bounds that.
    pub(crate) fn enter(
        &self,
        world: &mut World,
        active: &mut ActiveFrames,
        key: ThingKey,
        state: StateNum,
    ) -> Result<bool, StateError> {
        let mut next = state;
        let mut entered: Vec<StateNum> = Vec::new();

        loop {
            if next.is_null() {
                world.remove(key);
                return Ok(false);
            }
            let def = self.content.state(next)?;
            if def.tics == 0 && entered.contains(&next) {
                tracing::warn!(
                    target: "core::machine",
                    state = %def.name,
                    "zero-tic cycle, stopping chain for this tic"
                );
                return Ok(true);
            }
            if entered.len() >= MAX_CHAIN {
                tracing::warn!(
                    target: "core::machine",
                    state = %def.name,
                    limit = MAX_CHAIN,
                    "state chain too long, stopping for this tic"
                );
                return Ok(true);
            }
            entered.push(next);

            let Some(thing) = world.get_mut(key) else {
                return Ok(false);
            };
            thing.state = next;
            thing.tics = def.tics;
            let template = self.content.template(thing.template)?;

            if let Some(action) = def.action {
                active.push(key);
                let mut ctx = ActionContext::new(world, self, active, key, next, def, template);
                self.actions.dispatch(action, &mut ctx);
                let requested = active.pop();

                if !world.contains(key) {
                    return Ok(false);
                }
                if let Some(requested) = requested {
                    next = requested;
                    continue;
                }
            }

            match world.get(key) {
                Some(thing) if thing.tics != 0 => return Ok(true),
                Some(_) => next = def.next,
                None => return Ok(false),
            }
        }
    }

    /// Classic 0..=255 roll attributed to `key`.
    ///
    /// The seed mixes the session seed, a per-world nonce, and the thing's
    /// serial and current state, so replays with the same seed roll the same
    /// sequence.
    pub fn random(&self, world: &mut World, key: ThingKey) -> i32 {
        let (serial, state) = world
            .get(key)
            .map_or((0, 0), |thing| (thing.serial, thing.state.0));
        let nonce = world.next_rng_nonce();
        self.env
            .rng()
            .byte(compute_seed(self.config.seed, nonce, serial, state))
    }

    /// Damages `target` outside of any action, e.g. on missile impact.
    pub fn damage(
        &self,
        world: &mut World,
        target: ThingKey,
        source: Option<ThingKey>,
        amount: i32,
    ) -> DamageOutcome {
        let mut active = ActiveFrames::default();
        self.inflict(world, &mut active, target, source, amount)
    }

    /// Moves `key` into `state`, deferring the change if `key`'s action is
    /// running. Returns false if the thing no longer exists afterwards.
    pub(crate) fn transition(
        &self,
        world: &mut World,
        active: &mut ActiveFrames,
        key: ThingKey,
        state: StateNum,
    ) -> bool {
        if active.request(key, state) {
            return true;
        }
        match self.enter(world, active, key, state) {
            Ok(alive) => alive,
            Err(err) => {
                tracing::warn!(target: "core::machine", %err, "transition failed");
                false
            }
        }
    }

    /// Applies damage, runs pain or death transitions, and turns the victim
    /// against its attacker.
    pub(crate) fn inflict(
        &self,
        world: &mut World,
        active: &mut ActiveFrames,
        target: ThingKey,
        source: Option<ThingKey>,
        amount: i32,
    ) -> DamageOutcome {
        let roll = self.random(world, target);
        let source = world.resolve(source).filter(|source| *source != target);
        let source_serial = world.serial(source);

        let Some(thing) = world.get_mut(target) else {
            return DamageOutcome::Ignored;
        };
        let Ok(template) = self.content.template(thing.template) else {
            return DamageOutcome::Ignored;
        };
        let outcome = combat::apply_damage(thing, template, amount, roll);
        let serial = thing.serial;

        match outcome {
            DamageOutcome::Ignored => return outcome,
            DamageOutcome::Killed(death) => {
                world.record(WorldEvent::Killed {
                    serial,
                    source: source_serial,
                });
                if self.transition(world, active, target, death) {
                    let jitter = self.random(world, target) & 3;
                    if let Some(thing) = world.get_mut(target)
                        && thing.tics > 0
                    {
                        thing.tics = (thing.tics - jitter).max(1);
                    }
                }
                return outcome;
            }
            DamageOutcome::Pain(_) | DamageOutcome::Hurt => {
                world.record(WorldEvent::Damaged {
                    serial,
                    amount,
                    source: source_serial,
                });
            }
        }
        if let DamageOutcome::Pain(pain) = outcome {
            self.transition(world, active, target, pain);
        }

        let Some(source) = source else {
            return outcome;
        };
        let mut wake = None;
        if let Some(thing) = world.get_mut(target)
            && thing.threshold == 0
        {
            thing.target = Some(source);
            thing.threshold = BASE_THRESHOLD;
            let see = template.state(StateSlot::See);
            if thing.state == template.spawn_state() && !see.is_null() {
                wake = Some(see);
            }
        }
        if let Some(see) = wake {
            self.transition(world, active, target, see);
        }
        outcome
    }

    /// Advances one thing by one tic.
    pub fn tick(&self, world: &mut World, key: ThingKey) -> Result<(), StateError> {
        let Some(thing) = world.get_mut(key) else {
            return Ok(());
        };
        if thing.tics < 0 {
            return Ok(());
        }
        thing.tics -= 1;
        if thing.tics > 0 {
            return Ok(());
        }

        let next = self.content.state(thing.state)?.next;
        self.set_state(world, key, next).map(|_| ())
    }

    /// Advances every thing by one tic in arena order, then the world clock.
    ///
    /// Things spawned during the tic first advance on the next one; things
    /// removed earlier in the tic are skipped.
    pub fn run_tic(&self, world: &mut World) -> Result<(), StateError> {
        for key in world.keys() {
            self.tick(world, key)?;
        }
        world.advance_tic();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionContext, ActionRef};
    use crate::env::open_env;
    use crate::geom::Vec3;
    use crate::state::{State, StateArg, StateTableBuilder};
    use crate::thing::{StateSlot, TemplateId, TemplateTable, ThingTemplate};

    fn count(ctx: &mut ActionContext<'_, '_>) {
        if let Some(actor) = ctx.actor_mut() {
            actor.counters[0] += 1;
        }
    }

    fn jump(ctx: &mut ActionContext<'_, '_>) {
        if let Some(state) = ctx.arg_state(0) {
            ctx.set_state(state);
        }
    }

    fn vanish(ctx: &mut ActionContext<'_, '_>) {
        ctx.remove_self();
    }

    fn recount(ctx: &mut ActionContext<'_, '_>) {
        count(ctx);
        if ctx.actor().is_some_and(|actor| actor.counters[0] < 3) {
            jump(ctx);
        }
    }

    struct Fixture {
        content: Content,
        registry: ActionRegistry,
        config: GameConfig,
    }

    impl Fixture {
        fn new(
            build: impl FnOnce(&mut StateTableBuilder, &ActionRegistry) -> ThingTemplate,
        ) -> Self {
            let mut registry = ActionRegistry::new();
            registry.register("A_Count", count);
            registry.register("A_Hop", jump);
            registry.register("A_Vanish", vanish);
            registry.register("A_Recount", recount);
            let mut builder = StateTableBuilder::new();
            let template = build(&mut builder, &registry);
            let content = Content::new(
                builder.build().unwrap(),
                TemplateTable::new(vec![template]).unwrap(),
            );
            Self {
                content,
                registry,
                config: GameConfig::default(),
            }
        }

        fn machine(&self) -> StateMachine<'_> {
            StateMachine::new(&self.content, &self.registry, open_env(), &self.config)
        }

        fn spawn(&self, world: &mut World) -> ThingKey {
            let template = self.content.template(TemplateId(0)).unwrap();
            world
                .spawn(TemplateId(0), template, &self.content.states, Vec3::ZERO)
                .unwrap()
        }
    }

    fn action(registry: &ActionRegistry, name: &str) -> ActionRef {
        use crate::action::ActionCatalog;
        registry.resolve(name).unwrap()
    }

    #[test]
    fn zero_tic_chain_runs_within_one_tick() {
        let fx = Fixture::new(|b, r| {
            // 1 -> 2 (0 tics) -> 3 (0 tics) -> 4 (5 tics)
            let first = b.push(State::new("S_WAIT", 1, StateNum(2)));
            b.push(State::new("S_Z1", 0, StateNum(3)).with_action(action(r, "A_Count")));
            b.push(State::new("S_Z2", 0, StateNum(4)).with_action(action(r, "A_Count")));
            b.push(State::new("S_REST", 5, StateNum(4)));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);

        machine.run_tic(&mut world).unwrap();

        let thing = world.get(key).unwrap();
        assert_eq!(thing.state, StateNum(4));
        assert_eq!(thing.tics, 5);
        assert_eq!(thing.counters[0], 2);
    }

    #[test]
    fn override_beats_default_successor() {
        let fx = Fixture::new(|b, r| {
            let first = b.push(State::new("S_WAIT", 1, StateNum(2)));
            let hop = State::new("S_HOP", 3, StateNum(3))
                .with_action(action(r, "A_Hop"))
                .with_args([StateArg::State(StateNum(4))].into_iter().collect());
            b.push(hop);
            b.push(State::new("S_DEFAULT", 7, StateNum(3)));
            b.push(State::new("S_TARGET", 9, StateNum(4)));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);

        machine.run_tic(&mut world).unwrap();
        let thing = world.get(key).unwrap();
        assert_eq!(thing.state, StateNum(4));
        assert_eq!(thing.tics, 9);
    }

    #[test]
    fn null_successor_removes_thing_and_clears_references() {
        let fx = Fixture::new(|b, _| {
            let first = b.push(State::new("S_FADE", 2, StateNum::NULL));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let doomed = fx.spawn(&mut world);
        let watcher = fx.spawn(&mut world);
        world.get_mut(watcher).unwrap().tics = -1;
        world.get_mut(watcher).unwrap().target = Some(doomed);

        machine.run_tic(&mut world).unwrap();
        assert!(world.contains(doomed));
        machine.run_tic(&mut world).unwrap();
        assert!(!world.contains(doomed));
        assert_eq!(world.get(watcher).unwrap().target, None);
    }

    #[test]
    fn remove_self_applies_after_action_returns() {
        let fx = Fixture::new(|b, r| {
            let first = b.push(State::new("S_WAIT", 1, StateNum(2)));
            b.push(State::new("S_GONE", 4, StateNum(2)).with_action(action(r, "A_Vanish")));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);
        machine.run_tic(&mut world).unwrap();
        assert!(!world.contains(key));
    }

    #[test]
    fn terminal_states_freeze() {
        let fx = Fixture::new(|b, _| {
            let first = b.push(State::new("S_DEAD", -1, StateNum(1)));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);
        for _ in 0..10 {
            machine.run_tic(&mut world).unwrap();
        }
        let thing = world.get(key).unwrap();
        assert_eq!(thing.state, StateNum(1));
        assert_eq!(thing.tics, -1);
        assert_eq!(world.tic(), 10);
    }

    #[test]
    fn zero_tic_cycle_stops_instead_of_hanging() {
        let fx = Fixture::new(|b, r| {
            let first = b.push(State::new("S_WAIT", 1, StateNum(2)));
            b.push(State::new("S_LOOP1", 0, StateNum(3)).with_action(action(r, "A_Count")));
            b.push(State::new("S_LOOP2", 0, StateNum(2)));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);

        machine.run_tic(&mut world).unwrap();
        let thing = world.get(key).unwrap();
        assert_eq!(thing.counters[0], 1);
        assert_eq!(thing.state, StateNum(3));
    }

    #[test]
    fn action_may_reenter_its_own_timed_state() {
        let fx = Fixture::new(|b, r| {
            let first = b.push(State::new("S_WAIT", 1, StateNum(2)));
            let again = State::new("S_AGAIN", 5, StateNum(3))
                .with_action(action(r, "A_Recount"))
                .with_args([StateArg::State(StateNum(2))].into_iter().collect());
            b.push(again);
            b.push(State::new("S_AFTER", -1, StateNum(3)));
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);

        machine.run_tic(&mut world).unwrap();
        let thing = world.get(key).unwrap();
        assert_eq!(thing.counters[0], 3);
        assert_eq!(thing.state, StateNum(2));
        assert_eq!(thing.tics, 5);
    }

    #[test]
    fn endless_self_reentry_is_bounded() {
        let fx = Fixture::new(|b, r| {
            let first = b.push(State::new("S_WAIT", 1, StateNum(2)));
            let hop = State::new("S_SPIN", 4, StateNum(2))
                .with_action(action(r, "A_Hop"))
                .with_args([StateArg::State(StateNum(2))].into_iter().collect());
            b.push(hop);
            ThingTemplate::builder("t").state(StateSlot::Spawn, first).build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);

        machine.run_tic(&mut world).unwrap();
        let thing = world.get(key).unwrap();
        assert_eq!(thing.state, StateNum(2));
        assert_eq!(thing.tics, 4);
    }

    #[test]
    fn lethal_damage_enters_death_state() {
        let fx = Fixture::new(|b, _| {
            let stand = b.push(State::new("S_STAND", -1, StateNum(1)));
            let pain = b.push(State::new("S_PAIN", 4, StateNum(1)));
            let death = b.push(State::new("S_DIE", 8, StateNum(4)));
            b.push(State::new("S_CORPSE", -1, StateNum(4)));
            ThingTemplate::builder("t")
                .spawn_health(10)
                .pain_chance(256)
                .flags(crate::thing::ThingFlags::SHOOTABLE)
                .state(StateSlot::Spawn, stand)
                .state(StateSlot::Pain, pain)
                .state(StateSlot::Death, death)
                .build()
        });
        let machine = fx.machine();
        let mut world = World::new(&fx.config);
        let key = fx.spawn(&mut world);

        assert_eq!(machine.damage(&mut world, key, None, 4), DamageOutcome::Pain(StateNum(2)));
        assert_eq!(world.get(key).unwrap().state, StateNum(2));

        assert_eq!(machine.damage(&mut world, key, None, 20), DamageOutcome::Killed(StateNum(3)));
        let thing = world.get(key).unwrap();
        assert_eq!(thing.state, StateNum(3));
        assert!((5..=8).contains(&thing.tics));
        assert_eq!(machine.damage(&mut world, key, None, 20), DamageOutcome::Ignored);
    }
}
