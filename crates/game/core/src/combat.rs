//! Damage bookkeeping for live things.
//!
//! These helpers only touch the damaged thing's own fields and report which
//! state it should enter. Entering that state (and running its action) is the
//! state machine's job.

use crate::geom::Vec3;
use crate::state::StateNum;
use crate::thing::{StateSlot, ThingFlags, ThingFlags2, ThingTemplate};
use crate::world::Thing;

/// Tics a monster keeps chasing its attacker before it may switch targets.
pub const BASE_THRESHOLD: i32 = 100;

/// State change requested by a damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Not shootable, invulnerable or already dead.
    Ignored,
    /// Health dropped, no state change.
    Hurt,
    /// Flinched into the pain state.
    Pain(StateNum),
    /// Died; enter the death (or extreme death) state.
    Killed(StateNum),
}

/// Subtracts `amount` from `thing`'s health and updates its flags.
///
/// `pain_roll` is a 0..=255 roll compared against the template's pain chance.
pub fn apply_damage(
    thing: &mut Thing,
    template: &ThingTemplate,
    amount: i32,
    pain_roll: i32,
) -> DamageOutcome {
    if !thing.has(ThingFlags::SHOOTABLE)
        || thing.has2(ThingFlags2::INVULNERABLE)
        || thing.health <= 0
    {
        return DamageOutcome::Ignored;
    }

    if thing.has(ThingFlags::SKULLFLY) {
        thing.mom = Vec3::ZERO;
    }

    thing.health -= amount;
    if thing.health <= 0 {
        return DamageOutcome::Killed(kill(thing, template));
    }

    thing.reaction_time = 0;

    let pain = template.state(StateSlot::Pain);
    if pain_roll < template.pain_chance && !thing.has(ThingFlags::SKULLFLY) && !pain.is_null()
    {
        thing.flags.flags.insert(ThingFlags::JUSTHIT);
        return DamageOutcome::Pain(pain);
    }

    DamageOutcome::Hurt
}

/// Turns `thing` into a corpse and returns the death state to enter.
pub fn kill(thing: &mut Thing, template: &ThingTemplate) -> StateNum {
    thing
        .flags
        .flags
        .remove(ThingFlags::SHOOTABLE | ThingFlags::FLOAT | ThingFlags::SKULLFLY);
    thing.flags.flags.insert(ThingFlags::CORPSE | ThingFlags::DROPOFF);
    thing.height >>= 2;

    let xdeath = template.state(StateSlot::XDeath);
    if thing.health < -template.spawn_health && !xdeath.is_null() {
        xdeath
    } else {
        template.state(StateSlot::Death)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thing::TemplateId;

    fn monster() -> (ThingTemplate, Thing) {
        let template = ThingTemplate::builder("trooper")
            .spawn_health(20)
            .pain_chance(200)
            .flags(ThingFlags::SOLID | ThingFlags::SHOOTABLE | ThingFlags::COUNTKILL)
            .state(StateSlot::Pain, StateNum(4))
            .state(StateSlot::Death, StateNum(5))
            .state(StateSlot::XDeath, StateNum(6))
            .build();
        let thing =
            Thing::from_template(TemplateId(0), &template, 1, Vec3::ZERO, StateNum(1), 10);
        (template, thing)
    }

    #[test]
    fn pain_roll_below_chance_flinches() {
        let (template, mut thing) = monster();
        assert_eq!(
            apply_damage(&mut thing, &template, 3, 10),
            DamageOutcome::Pain(StateNum(4))
        );
        assert!(thing.has(ThingFlags::JUSTHIT));
        assert_eq!(apply_damage(&mut thing, &template, 3, 250), DamageOutcome::Hurt);
        assert_eq!(thing.health, 14);
    }

    #[test]
    fn overkill_picks_extreme_death() {
        let (template, mut thing) = monster();
        assert_eq!(
            apply_damage(&mut thing, &template, 100, 0),
            DamageOutcome::Killed(StateNum(6))
        );
        assert!(thing.has(ThingFlags::CORPSE));
        assert!(!thing.has(ThingFlags::SHOOTABLE));
        assert_eq!(apply_damage(&mut thing, &template, 1, 0), DamageOutcome::Ignored);
    }

    #[test]
    fn plain_kill_uses_death_state() {
        let (template, mut thing) = monster();
        assert_eq!(
            apply_damage(&mut thing, &template, 20, 255),
            DamageOutcome::Killed(StateNum(5))
        );
    }

    #[test]
    fn invulnerable_things_ignore_damage() {
        let (template, mut thing) = monster();
        thing.flags.flags2.insert(ThingFlags2::INVULNERABLE);
        assert_eq!(apply_damage(&mut thing, &template, 50, 0), DamageOutcome::Ignored);
        assert_eq!(thing.health, 20);
    }
}
