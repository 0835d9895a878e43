//! Execution context handed to action handlers.

use crate::combat::DamageOutcome;
use crate::config::GameConfig;
use crate::content::Content;
use crate::env::compute_seed;
use crate::geom::{FRACBITS, Vec3, fixed};
use crate::machine::{ActiveFrames, StateMachine};
use crate::state::{State, StateArg, StateArgs, StateNum};
use crate::thing::{StateSlot, TemplateId, ThingFlagSet, ThingFlags, ThingTemplate};
use crate::world::{Thing, ThingKey, World, WorldEvent};

/// Everything an action may read or change while it runs.
///
/// State changes requested for the acting thing (or for any thing whose
/// action is still running further up the call chain) are recorded and
/// applied by the state machine once that action returns. State changes for
/// other things take effect immediately, running their entry actions.
pub struct ActionContext<'w, 'm> {
    world: &'w mut World,
    machine: &'w StateMachine<'m>,
    active: &'w mut ActiveFrames,
    actor: ThingKey,
    state_num: StateNum,
    state: &'m State,
    template: &'m ThingTemplate,
}

impl<'w, 'm> ActionContext<'w, 'm> {
    pub(crate) fn new(
        world: &'w mut World,
        machine: &'w StateMachine<'m>,
        active: &'w mut ActiveFrames,
        actor: ThingKey,
        state_num: StateNum,
        state: &'m State,
        template: &'m ThingTemplate,
    ) -> Self {
        Self {
            world,
            machine,
            active,
            actor,
            state_num,
            state,
            template,
        }
    }

    // ===== read access =====

    pub fn actor_key(&self) -> ThingKey {
        self.actor
    }

    /// Index of the state whose action is running.
    pub fn state_num(&self) -> StateNum {
        self.state_num
    }

    pub fn state(&self) -> &'m State {
        self.state
    }

    pub fn args(&self) -> &'m StateArgs {
        &self.state.args
    }

    pub fn template(&self) -> &'m ThingTemplate {
        self.template
    }

    pub fn content(&self) -> &'m Content {
        self.machine.content()
    }

    pub fn config(&self) -> &'m GameConfig {
        self.machine.config()
    }

    pub fn world(&self) -> &World {
        self.world
    }

    pub fn actor(&self) -> Option<&Thing> {
        self.world.get(self.actor)
    }

    pub fn actor_mut(&mut self) -> Option<&mut Thing> {
        self.world.get_mut(self.actor)
    }

    pub fn thing(&self, key: ThingKey) -> Option<&Thing> {
        self.world.get(key)
    }

    pub fn thing_mut(&mut self, key: ThingKey) -> Option<&mut Thing> {
        self.world.get_mut(key)
    }

    /// The actor's live target, if any.
    pub fn target(&self) -> Option<ThingKey> {
        self.world.resolve(self.actor()?.target)
    }

    /// Iterates over every live thing except the actor.
    pub fn others(&self) -> impl Iterator<Item = (ThingKey, &Thing)> {
        let actor = self.actor;
        self.world.iter().filter(move |(key, _)| *key != actor)
    }

    /// Template of any live thing.
    pub fn template_of(&self, key: ThingKey) -> Option<&'m ThingTemplate> {
        let content = self.content();
        content.templates.get(self.world.get(key)?.template)
    }

    // ===== arguments =====

    pub fn arg_int(&self, index: usize, default: i32) -> i32 {
        self.args().int(index, default)
    }

    /// Resolves a state-reference argument against the actor's template.
    pub fn arg_state(&self, index: usize) -> Option<StateNum> {
        self.args().state(index, self.template, &self.content().states)
    }

    pub fn arg_flags(&self, index: usize) -> Option<&'m ThingFlagSet> {
        self.args().flags(index)
    }

    /// Reads a thing-type argument: a template name, or an editor number
    /// given as an integer literal.
    pub fn arg_template(&self, index: usize) -> Option<TemplateId> {
        let templates = &self.content().templates;
        match self.args().get(index)? {
            StateArg::Label(name) => templates.find(name),
            StateArg::Int(doomednum) => templates
                .iter()
                .find(|(_, template)| template.doomednum == Some(*doomednum))
                .map(|(id, _)| id),
            _ => None,
        }
    }

    // ===== state changes =====

    /// Replaces the actor's default successor with `state`.
    pub fn set_state(&mut self, state: StateNum) {
        self.active.request(self.actor, state);
    }

    pub fn set_slot(&mut self, slot: StateSlot) {
        self.set_state(self.template.state(slot));
    }

    /// Removes the actor once the action returns.
    pub fn remove_self(&mut self) {
        self.set_state(StateNum::NULL);
    }

    /// Moves `key` into `state`. Returns false if the thing no longer exists
    /// afterwards.
    pub fn transition(&mut self, key: ThingKey, state: StateNum) -> bool {
        self.machine.transition(self.world, self.active, key, state)
    }

    // ===== spawning and combat =====

    pub fn spawn(&mut self, id: TemplateId, pos: Vec3) -> Option<ThingKey> {
        let content = self.content();
        let template = content.template(id).ok()?;
        match self.world.spawn(id, template, &content.states, pos) {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::warn!(
                    target: "core::actions",
                    %err,
                    template = %template.name,
                    "spawn failed"
                );
                None
            }
        }
    }

    /// Spawns a template by name. Missing templates are a no-op.
    pub fn spawn_named(&mut self, name: &str, pos: Vec3) -> Option<ThingKey> {
        let Some((id, _)) = self.content().find_template(name) else {
            tracing::debug!(
                target: "core::actions",
                name,
                "unknown template, nothing spawned"
            );
            return None;
        };
        self.spawn(id, pos)
    }

    /// Damages `target`, running pain/death transitions and retaliation.
    pub fn damage(
        &mut self,
        target: ThingKey,
        source: Option<ThingKey>,
        amount: i32,
    ) -> DamageOutcome {
        self.machine
            .inflict(self.world, self.active, target, source, amount)
    }

    /// Damages every shootable thing within `radius` of the actor, scaled
    /// down linearly with distance (`P_RadiusAttack`).
    pub fn radius_attack(&mut self, source: Option<ThingKey>, damage: i32, radius: i32) {
        if let Some(origin) = self.actor().map(|thing| thing.pos) {
            self.radius_attack_at(origin, source, damage, radius);
        }
    }

    /// Radius attack centered on an arbitrary point. Victims must be visible
    /// from the actor.
    pub fn radius_attack_at(
        &mut self,
        origin: Vec3,
        source: Option<ThingKey>,
        damage: i32,
        radius: i32,
    ) {
        let limit = fixed(radius);
        let victims: Vec<(ThingKey, i32)> = self
            .world
            .iter()
            .filter(|(_, thing)| thing.has(ThingFlags::SHOOTABLE))
            .filter_map(|(key, thing)| {
                let dist = (origin.approx_distance(&thing.pos) - thing.radius).max(0);
                (dist < limit).then(|| {
                    let units = dist >> FRACBITS;
                    (key, damage - units * damage / radius.max(1))
                })
            })
            .collect();

        for (key, amount) in victims {
            let visible = key == self.actor || self.check_sight(self.actor, key);
            if amount > 0 && visible {
                self.damage(key, source, amount);
            }
        }
    }

    pub fn record(&mut self, event: WorldEvent) {
        self.world.record(event);
    }

    // ===== collaborators =====

    /// Classic 0..=255 chance roll.
    pub fn random(&mut self) -> i32 {
        let seed = self.next_seed();
        self.machine.env().rng().byte(seed)
    }

    /// Spread roll in -255..=255.
    pub fn spread(&mut self) -> i32 {
        let seed = self.next_seed();
        self.machine.env().rng().spread(seed)
    }

    fn next_seed(&mut self) -> u64 {
        let nonce = self.world.next_rng_nonce();
        let serial = self.world.serial(Some(self.actor)).unwrap_or(0);
        compute_seed(self.config().seed, nonce, serial, self.state_num.0)
    }

    pub fn check_sight(&self, from: ThingKey, to: ThingKey) -> bool {
        match (self.world.get(from), self.world.get(to)) {
            (Some(from), Some(to)) => self.machine.env().sight().check_sight(from, to),
            _ => false,
        }
    }

    /// Whether `thing` could stand where it is (`P_CheckPosition`). Useful
    /// for probing a changed size before committing it.
    pub fn fits(&self, thing: &Thing) -> bool {
        self.machine.env().movement().try_move(thing, thing.pos)
    }

    /// Moves `key` to `to` if the movement oracle allows it.
    pub fn try_move(&mut self, key: ThingKey, to: Vec3) -> bool {
        let allowed = self
            .world
            .get(key)
            .is_some_and(|thing| self.machine.env().movement().try_move(thing, to));
        if allowed && let Some(thing) = self.world.get_mut(key) {
            thing.pos = to;
        }
        allowed
    }

    /// Emits a sound cue from the actor. `None` is silent.
    pub fn sound(&self, sound: Option<&str>) {
        self.sound_from(self.actor, sound);
    }

    pub fn sound_from(&self, origin: ThingKey, sound: Option<&str>) {
        if let Some(sound) = sound {
            self.machine.env().sound().start_sound(origin, sound);
        }
    }

    /// Turns the actor toward its target and clears ambush.
    pub fn face_target(&mut self) {
        let Some(target) = self.target().and_then(|key| self.world.get(key)) else {
            return;
        };
        let target_pos = target.pos;
        if let Some(actor) = self.world.get_mut(self.actor) {
            actor.flags.flags.remove(ThingFlags::AMBUSH);
            actor.angle = actor.pos.angle_to(&target_pos);
        }
    }
}
