//! Boss brain routines: the shooter that spits spawn cubes at scattered
//! spots, the cubes that hatch monsters where they land, and the brain's
//! death throes.

use thing_core::geom::fixed;
use thing_core::state::WellKnownState;
use thing_core::{ActionContext, StateSlot, ThingFlags, ThingKey, Vec3, WorldEvent};

use super::support::{MISSILE_Z, is_hostile, spawn_missile};

const SPOT: &str = "BossTarget";
const CUBE: &str = "SpawnShot";
const CUBE_FIRE: &str = "SpawnFire";
const ROCKET: &str = "Rocket";

/// Counter holding the index of the next spot the shooter aims at.
const NEXT_SPOT: i32 = 0;
const TELEFRAG_DAMAGE: i32 = 10_000;

/// Monster a cube hatches: the first entry whose bound exceeds a 0..=255
/// roll.
const HATCHLINGS: [(i32, &str); 11] = [
    (50, "DoomImp"),
    (90, "Demon"),
    (120, "Spectre"),
    (130, "PainElemental"),
    (160, "Cacodemon"),
    (162, "Archvile"),
    (172, "Revenant"),
    (192, "Arachnotron"),
    (222, "Fatso"),
    (246, "HellKnight"),
    (256, "BaronOfHell"),
];

pub(crate) fn brain_awake(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("bossit"));
}

pub(crate) fn brain_pain(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("bospn"));
}

/// A row of rocket blasts along the brain's wall.
pub(crate) fn brain_scream(ctx: &mut ActionContext<'_, '_>) {
    let Some(pos) = ctx.actor().map(|actor| actor.pos) else {
        return;
    };
    let mut x = pos.x - fixed(196);
    while x < pos.x + fixed(320) {
        let y = pos.y - fixed(320);
        let z = 128 + fixed(ctx.random() * 2);
        detonate(ctx, Vec3::new(x, y, z));
        x += fixed(8);
    }
    ctx.sound(Some("bosdth"));
}

/// One more blast near the dying brain.
pub(crate) fn brain_explode(ctx: &mut ActionContext<'_, '_>) {
    let Some(pos) = ctx.actor().map(|actor| actor.pos) else {
        return;
    };
    let x = pos.x + ctx.spread() * 2048;
    let z = 128 + fixed(ctx.random() * 2);
    detonate(ctx, Vec3::new(x, pos.y, z));
}

pub(crate) fn brain_die(ctx: &mut ActionContext<'_, '_>) {
    let Some(serial) = ctx.actor().map(|actor| actor.serial) else {
        return;
    };
    tracing::debug!(target: "runtime::actions", serial, "boss brain ended the level");
    ctx.record(WorldEvent::Exit { serial });
}

/// Fires a spawn cube at the next spot, cycling through spots in spawn
/// order.
pub(crate) fn brain_spit(ctx: &mut ActionContext<'_, '_>) {
    let Some((spot_id, _)) = ctx.content().find_template(SPOT) else {
        return;
    };
    let mut spots: Vec<(u32, ThingKey)> = ctx
        .others()
        .filter(|(_, thing)| thing.template == spot_id)
        .map(|(key, thing)| (thing.serial, key))
        .collect();
    if spots.is_empty() {
        return;
    }
    spots.sort_unstable();

    let Some(slot) = ctx.actor_mut().and_then(|actor| actor.counter_mut(NEXT_SPOT)) else {
        return;
    };
    let index = slot.rem_euclid(spots.len() as i32) as usize;
    *slot = index as i32 + 1;
    let spot = spots[index].1;

    let Some(cube) = spawn_missile(ctx, spot, CUBE, MISSILE_Z) else {
        return;
    };
    let friendly = ctx.actor().is_some_and(|actor| actor.has(ThingFlags::FRIEND));
    let Some(spot_pos) = ctx.thing(spot).map(|thing| thing.pos) else {
        return;
    };
    let tics = ctx
        .thing(cube)
        .and_then(|thing| ctx.content().states.get(thing.state))
        .map_or(1, |state| state.tics.max(1));
    if let Some(thing) = ctx.thing_mut(cube) {
        thing.target = Some(spot);
        thing.flags.flags.set(ThingFlags::FRIEND, friendly);
        // Tics until the cube reaches the spot, measured along its longer axis.
        let (span, step) = if thing.mom.y != 0 {
            (spot_pos.y - thing.pos.y, thing.mom.y)
        } else {
            (spot_pos.x - thing.pos.x, thing.mom.x)
        };
        thing.reaction_time = if step == 0 {
            1
        } else {
            (span / step / tics).max(1)
        };
    }
    ctx.sound(Some("bospit"));
}

/// Cube sound, then the same countdown as [`spawn_fly`].
pub(crate) fn spawn_sound(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("boscub"));
    spawn_fly(ctx);
}

/// Counts down the cube's flight; on arrival hatches a monster at the spot
/// and removes the cube.
pub(crate) fn spawn_fly(ctx: &mut ActionContext<'_, '_>) {
    let Some(actor) = ctx.actor_mut() else {
        return;
    };
    actor.reaction_time -= 1;
    if actor.reaction_time != 0 {
        return;
    }
    let friendly = actor.has(ThingFlags::FRIEND);
    let Some(spot) = ctx.target() else {
        return;
    };
    let Some(at) = ctx.thing(spot).map(|thing| thing.pos) else {
        return;
    };

    if let Some(fog) = ctx.spawn_named(CUBE_FIRE, at) {
        ctx.sound_from(fog, Some("telept"));
    }

    let roll = ctx.random();
    let hatchling = HATCHLINGS
        .iter()
        .find(|(bound, _)| roll < *bound)
        .and_then(|(_, name)| ctx.spawn_named(name, at));
    if let Some(monster) = hatchling {
        if let Some(thing) = ctx.thing_mut(monster) {
            thing.flags.flags.set(ThingFlags::FRIEND, friendly);
        }
        wake(ctx, monster);
        telefrag(ctx, monster, at);
    }
    ctx.remove_self();
}

/// Spawns a rocket already in its blast animation.
fn detonate(ctx: &mut ActionContext<'_, '_>, at: Vec3) {
    let Some(rocket) = ctx.spawn_named(ROCKET, at) else {
        return;
    };
    let lift = ctx.random() * 512;
    if let Some(thing) = ctx.thing_mut(rocket) {
        thing.mom.z = lift;
    }
    if let Some(blast) = ctx.content().states.well_known(WellKnownState::BrainExplode1)
        && !ctx.transition(rocket, blast)
    {
        return;
    }
    let trim = ctx.random() & 7;
    if let Some(thing) = ctx.thing_mut(rocket)
        && thing.tics > 0
    {
        thing.tics = (thing.tics - trim).max(1);
    }
}

/// Points a fresh hatchling at the nearest visible enemy and sends it to
/// its see state.
fn wake(ctx: &mut ActionContext<'_, '_>, monster: ThingKey) {
    let Some(hatchling) = ctx.thing(monster) else {
        return;
    };
    let prey = ctx
        .world()
        .iter()
        .filter(|(key, thing)| *key != monster && is_hostile(hatchling, thing))
        .filter(|(key, _)| ctx.check_sight(monster, *key))
        .min_by_key(|(_, thing)| (hatchling.pos.approx_distance(&thing.pos), thing.serial))
        .map(|(key, _)| key);
    let Some(prey) = prey else {
        return;
    };
    if let Some(thing) = ctx.thing_mut(monster) {
        thing.target = Some(prey);
    }
    let see = ctx
        .template_of(monster)
        .map(|template| template.state(StateSlot::See))
        .filter(|see| !see.is_null());
    if let Some(see) = see {
        ctx.transition(monster, see);
    }
}

/// Kills every shootable thing overlapping the hatchling.
fn telefrag(ctx: &mut ActionContext<'_, '_>, monster: ThingKey, at: Vec3) {
    let Some(radius) = ctx.thing(monster).map(|thing| thing.radius) else {
        return;
    };
    let victims: Vec<ThingKey> = ctx
        .world()
        .iter()
        .filter(|(key, thing)| {
            *key != monster
                && thing.has(ThingFlags::SHOOTABLE)
                && (thing.pos.x - at.x).abs() < thing.radius + radius
                && (thing.pos.y - at.y).abs() < thing.radius + radius
        })
        .map(|(key, _)| key)
        .collect();
    for victim in victims {
        ctx.damage(victim, Some(monster), TELEFRAG_DAMAGE);
    }
}
