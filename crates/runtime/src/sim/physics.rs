//! Momentum, gravity and projectile impacts.
//!
//! Runs before state tics each world tic. Things that fly as projectiles
//! (`MISSILE` or `SKULLFLY`) move their full momentum and stop on the first
//! thing or edge they hit; everything else slides, falls and loses speed to
//! friction.

use thing_core::geom::{FRACUNIT, fixed_mul};
use thing_core::{Fixed, StateMachine, StateSlot, ThingFlags, ThingKey, Vec3, World};

const FRICTION: Fixed = 0xE800;
const GRAVITY: Fixed = FRACUNIT;
/// Sliding things slower than this stop.
const STOP_SPEED: Fixed = 0x1000;

/// Moves every thing by its momentum, in arena order.
pub(crate) fn advance(machine: &StateMachine<'_>, world: &mut World) {
    for key in world.keys() {
        let Some(thing) = world.get(key) else {
            continue;
        };
        if thing.has(ThingFlags::MISSILE) || thing.has(ThingFlags::SKULLFLY) {
            fly(machine, world, key);
        } else {
            drift(machine, world, key);
        }
    }
}

fn fly(machine: &StateMachine<'_>, world: &mut World, key: ThingKey) {
    let Some(thing) = world.get(key) else {
        return;
    };
    if thing.mom == Vec3::ZERO {
        return;
    }
    let to = thing.pos + thing.mom;
    // A missile never hits its shooter.
    let owner = if thing.has(ThingFlags::MISSILE) {
        thing.target
    } else {
        None
    };

    if let Some(victim) = struck(world, key, owner, to) {
        impact(machine, world, key, Some(victim));
        return;
    }
    if machine.env().movement().try_move(thing, to) {
        if let Some(thing) = world.get_mut(key) {
            thing.pos = to;
        }
    } else {
        impact(machine, world, key, None);
    }
}

/// First blocking thing whose box overlaps `mover` standing at `to`.
fn struck(world: &World, key: ThingKey, owner: Option<ThingKey>, to: Vec3) -> Option<ThingKey> {
    let mover = world.get(key)?;
    world
        .iter()
        .filter(|(other, _)| *other != key && Some(*other) != owner)
        .filter(|(_, thing)| thing.has(ThingFlags::SOLID) || thing.has(ThingFlags::SHOOTABLE))
        .find(|(_, thing)| {
            let reach = thing.radius + mover.radius;
            (thing.pos.x - to.x).abs() < reach
                && (thing.pos.y - to.y).abs() < reach
                && to.z < thing.pos.z + thing.height
                && to.z + mover.height > thing.pos.z
        })
        .map(|(other, _)| other)
}

/// Ends a flight: damages whatever was hit, then a missile explodes and a
/// charging thing drops back into its spawn state.
fn impact(machine: &StateMachine<'_>, world: &mut World, key: ThingKey, victim: Option<ThingKey>) {
    let Some(thing) = world.get(key) else {
        return;
    };
    let Ok(template) = machine.content().template(thing.template) else {
        return;
    };
    let charging = thing.has(ThingFlags::SKULLFLY);
    let credit = if charging { Some(key) } else { thing.target };

    if let Some(victim) = victim
        && world.get(victim).is_some_and(|thing| thing.has(ThingFlags::SHOOTABLE))
    {
        let amount = (machine.random(world, key) % 8 + 1) * template.damage;
        machine.damage(world, victim, credit, amount);
    }

    let Some(thing) = world.get_mut(key) else {
        return;
    };
    thing.mom = Vec3::ZERO;
    let next = if charging {
        thing.flags.flags.remove(ThingFlags::SKULLFLY);
        template.spawn_state()
    } else {
        thing.flags.flags.remove(ThingFlags::MISSILE);
        template.state(StateSlot::Death)
    };

    match machine.set_state(world, key, next) {
        Ok(true) if !charging => {
            let jitter = machine.random(world, key) & 3;
            if let Some(thing) = world.get_mut(key)
                && thing.tics > 0
            {
                thing.tics = (thing.tics - jitter).max(1);
            }
            if let Some(sound) = template.sounds.death.as_deref() {
                machine.env().sound().start_sound(key, sound);
            }
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(target: "runtime::sim", %err, "impact transition failed"),
    }
}

fn drift(machine: &StateMachine<'_>, world: &mut World, key: ThingKey) {
    let Some(thing) = world.get(key) else {
        return;
    };
    let floating = thing.has(ThingFlags::NOGRAVITY);
    if thing.mom == Vec3::ZERO && (floating || thing.pos.z <= 0) {
        return;
    }

    let (mut pos, mut mom) = (thing.pos, thing.mom);
    if mom.x != 0 || mom.y != 0 {
        let to = Vec3::new(pos.x + mom.x, pos.y + mom.y, pos.z);
        if machine.env().movement().try_move(thing, to) {
            pos = to;
        } else {
            (mom.x, mom.y) = (0, 0);
        }
    }

    pos.z = (pos.z + mom.z).max(0);
    if pos.z == 0 && mom.z < 0 {
        mom.z = 0;
    } else if pos.z > 0 && !floating {
        mom.z -= GRAVITY;
    }

    if pos.z == 0 || floating {
        mom.x = fixed_mul(mom.x, FRICTION);
        mom.y = fixed_mul(mom.y, FRICTION);
        if mom.x.abs() < STOP_SPEED && mom.y.abs() < STOP_SPEED {
            (mom.x, mom.y) = (0, 0);
        }
    }

    if let Some(thing) = world.get_mut(key) {
        thing.pos = pos;
        thing.mom = mom;
    }
}
