//! Targeting, movement and projectile primitives shared by native actions.

use thing_core::geom::{FRACBITS, FRACUNIT, fixed};
use thing_core::{
    ActionContext, Angle, Direction, Fixed, StateSlot, Thing, ThingFlags, ThingKey, Vec3,
};

/// Hitscan reach in map units.
pub(crate) const MISSILE_RANGE: i32 = 2048;
/// Height above the shooter's feet at which projectiles spawn.
pub(crate) const MISSILE_Z: Fixed = fixed(32);
/// Binary angle units per radian.
const BAM_PER_RADIAN: i64 = 683_565_275;
/// Minimum axis offset before a chaser steers along that axis.
const STEER_DEADBAND: Fixed = fixed(10);

/// A `b` that `a` would attack: shootable, alive, and on the other side.
pub(crate) fn is_hostile(a: &Thing, b: &Thing) -> bool {
    b.has(ThingFlags::SHOOTABLE)
        && b.is_alive()
        && a.has(ThingFlags::FRIEND) != b.has(ThingFlags::FRIEND)
}

fn both_friends(a: &Thing, b: &Thing) -> bool {
    a.has(ThingFlags::FRIEND) && b.has(ThingFlags::FRIEND)
}

/// The actor's target if it is still alive.
pub(crate) fn live_target(ctx: &ActionContext<'_, '_>) -> Option<ThingKey> {
    ctx.target()
        .filter(|key| ctx.thing(*key).is_some_and(Thing::is_alive))
}

/// Nearest visible hostile thing, ties broken by spawn order.
pub(crate) fn find_target(ctx: &ActionContext<'_, '_>) -> Option<ThingKey> {
    let actor = ctx.actor()?;
    let mut candidates: Vec<(Fixed, u32, ThingKey)> = ctx
        .others()
        .filter(|(_, thing)| is_hostile(actor, thing))
        .map(|(key, thing)| (actor.pos.approx_distance(&thing.pos), thing.serial, key))
        .collect();
    candidates.sort_unstable();
    candidates
        .into_iter()
        .map(|(_, _, key)| key)
        .find(|key| ctx.check_sight(ctx.actor_key(), *key))
}

pub(crate) fn set_target(ctx: &mut ActionContext<'_, '_>, target: Option<ThingKey>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.target = target;
    }
}

/// Whether the actor's target is close enough to hit with a melee attack.
pub(crate) fn in_melee_range(ctx: &ActionContext<'_, '_>) -> bool {
    let Some(target) = ctx.target() else {
        return false;
    };
    let (Some(actor), Some(victim)) = (ctx.actor(), ctx.thing(target)) else {
        return false;
    };
    let reach = ctx.template().melee_range - fixed(20) + victim.radius;
    actor.pos.approx_distance(&victim.pos) < reach && ctx.check_sight(ctx.actor_key(), target)
}

/// Random angular jitter: a spread roll shifted into the high bits.
pub(crate) fn jitter(ctx: &mut ActionContext<'_, '_>, shift: u32) -> Angle {
    Angle(ctx.spread().wrapping_shl(shift) as u32)
}

pub(crate) fn turn(ctx: &mut ActionContext<'_, '_>, delta: Angle) {
    if let Some(actor) = ctx.actor_mut() {
        actor.angle = actor.angle + delta;
    }
}

/// Faces the target; shadowy targets throw the aim off.
pub(crate) fn face_target(ctx: &mut ActionContext<'_, '_>) {
    ctx.face_target();
    let shadowed = ctx
        .target()
        .and_then(|key| ctx.thing(key))
        .is_some_and(|target| target.has(ThingFlags::SHADOW));
    if shadowed {
        let delta = jitter(ctx, 21);
        turn(ctx, delta);
    }
}

// ============================================================================
// Hitscan
// ============================================================================

/// Nearest shootable thing whose silhouette covers `angle` from the actor.
pub(crate) fn first_in_line(
    ctx: &ActionContext<'_, '_>,
    angle: Angle,
    range: Fixed,
) -> Option<ThingKey> {
    let origin = ctx.actor()?.pos;
    ctx.others()
        .filter(|(_, thing)| thing.has(ThingFlags::SHOOTABLE))
        .filter_map(|(key, thing)| {
            let dist = origin.approx_distance(&thing.pos);
            if dist > range {
                return None;
            }
            let off = i64::from(origin.angle_to(&thing.pos).delta(angle)).abs();
            let tolerance = i64::from(thing.radius) * BAM_PER_RADIAN / i64::from(dist.max(1));
            (dist < thing.radius || off <= tolerance).then_some((dist, thing.serial, key))
        })
        .min_by_key(|(dist, serial, _)| (*dist, *serial))
        .map(|(_, _, key)| key)
}

/// Fires one bullet along `angle` (`P_LineAttack`). Returns the thing hit.
pub(crate) fn line_attack(
    ctx: &mut ActionContext<'_, '_>,
    angle: Angle,
    damage: i32,
) -> Option<ThingKey> {
    let victim = first_in_line(ctx, angle, fixed(MISSILE_RANGE))?;
    if !ctx.check_sight(ctx.actor_key(), victim) {
        return None;
    }
    let (pos, height, bleeds) = ctx
        .thing(victim)
        .map(|thing| (thing.pos, thing.height, !thing.has(ThingFlags::NOBLOOD)))?;
    let impact = Vec3::new(pos.x, pos.y, pos.z + (height >> 1));
    ctx.spawn_named(if bleeds { "Blood" } else { "BulletPuff" }, impact);
    let shooter = ctx.actor_key();
    ctx.damage(victim, Some(shooter), damage);
    Some(victim)
}

/// Whether a friendly thing stands between a friendly actor and its target.
pub(crate) fn hits_friend(ctx: &ActionContext<'_, '_>) -> bool {
    let (Some(actor), Some(target)) = (ctx.actor(), ctx.target()) else {
        return false;
    };
    if !actor.has(ThingFlags::FRIEND) {
        return false;
    }
    let Some(target_pos) = ctx.thing(target).map(|thing| thing.pos) else {
        return false;
    };
    let range = actor.pos.approx_distance(&target_pos);
    first_in_line(ctx, actor.angle, range)
        .filter(|key| *key != target)
        .and_then(|key| ctx.thing(key))
        .is_some_and(|thing| both_friends(actor, thing))
}

/// Whether the actor should stop a refire loop against its target.
pub(crate) fn target_lost(ctx: &ActionContext<'_, '_>) -> bool {
    let (Some(actor), Some(target)) = (ctx.actor(), ctx.target()) else {
        return true;
    };
    let Some(victim) = ctx.thing(target) else {
        return true;
    };
    !victim.is_alive() || both_friends(actor, victim) || !ctx.check_sight(ctx.actor_key(), target)
}

// ============================================================================
// Projectiles
// ============================================================================

/// Momentum of length `speed` from `from` toward `to`, with the vertical
/// component spread over the flight time.
pub(crate) fn aim(from: Vec3, to: Vec3, speed: Fixed) -> Vec3 {
    let angle = from.angle_to(&to);
    let (x, y) = angle.vector(speed);
    let flight = (from.approx_distance(&to) / speed.max(1)).max(1);
    Vec3::new(x, y, (to.z - from.z) / flight)
}

/// Spawns `name` at `z_offset` above the actor and launches it at `dest`
/// (`P_SpawnMissile`). The missile's target is its shooter.
pub(crate) fn spawn_missile(
    ctx: &mut ActionContext<'_, '_>,
    dest: ThingKey,
    name: &str,
    z_offset: Fixed,
) -> Option<ThingKey> {
    let origin = ctx.actor()?.pos;
    let (dest_pos, shadowed) = ctx
        .thing(dest)
        .map(|thing| (thing.pos, thing.has(ThingFlags::SHADOW)))?;
    let start = Vec3::new(origin.x, origin.y, origin.z + z_offset);
    let key = ctx.spawn_named(name, start)?;
    let template = ctx.template_of(key)?;
    let speed = fixed(template.speed);

    let mut angle = start.angle_to(&dest_pos);
    let mut mom = aim(start, dest_pos, speed);
    if shadowed {
        angle = angle + jitter(ctx, 20);
        (mom.x, mom.y) = angle.vector(speed);
    }

    let shooter = ctx.actor_key();
    if let Some(missile) = ctx.thing_mut(key) {
        missile.target = Some(shooter);
        missile.angle = angle;
        missile.mom = mom;
    }
    ctx.sound(template.sounds.see.as_deref());
    Some(key)
}

/// Rotates a launched missile by `delta`, keeping its speed.
pub(crate) fn veer(ctx: &mut ActionContext<'_, '_>, missile: ThingKey, delta: Angle) {
    let Some(speed) = ctx.template_of(missile).map(|template| fixed(template.speed)) else {
        return;
    };
    if let Some(thing) = ctx.thing_mut(missile) {
        thing.angle = thing.angle + delta;
        (thing.mom.x, thing.mom.y) = thing.angle.vector(speed);
    }
}

/// Launches `key` at its target as a living projectile (`P_SkullFly`).
pub(crate) fn skull_fly(ctx: &mut ActionContext<'_, '_>, key: ThingKey, speed: Fixed) {
    let Some(target) = ctx.thing(key).and_then(|thing| thing.target) else {
        return;
    };
    let Some(dest) = ctx
        .thing(target)
        .map(|thing| Vec3::new(thing.pos.x, thing.pos.y, thing.pos.z + (thing.height >> 1)))
    else {
        return;
    };
    if let Some(thing) = ctx.thing_mut(key) {
        thing.flags.flags.insert(ThingFlags::SKULLFLY);
        thing.angle = thing.pos.angle_to(&dest);
        thing.mom = aim(thing.pos, dest, speed);
    }
}

// ============================================================================
// Walking (p_enemy movement)
// ============================================================================

/// Steps the actor one move along its current direction.
pub(crate) fn step_move(ctx: &mut ActionContext<'_, '_>) -> bool {
    let speed = fixed(ctx.template().speed);
    let Some((pos, dir)) = ctx.actor().and_then(|actor| Some((actor.pos, actor.movedir?))) else {
        return false;
    };
    let (dx, dy) = dir.angle().thrust(speed);
    let actor = ctx.actor_key();
    ctx.try_move(actor, pos + Vec3::new(dx, dy, 0))
}

fn try_walk(ctx: &mut ActionContext<'_, '_>, dir: Direction) -> bool {
    if let Some(actor) = ctx.actor_mut() {
        actor.movedir = Some(dir);
    }
    if !step_move(ctx) {
        return false;
    }
    let count = ctx.random() & 15;
    if let Some(actor) = ctx.actor_mut() {
        actor.movecount = count;
    }
    true
}

fn diagonal(x: Direction, y: Direction) -> Direction {
    match (x, y) {
        (Direction::East, Direction::North) => Direction::NorthEast,
        (Direction::West, Direction::North) => Direction::NorthWest,
        (Direction::West, _) => Direction::SouthWest,
        _ => Direction::SouthEast,
    }
}

/// Picks a new walking direction toward `goal` (`P_NewChaseDir`).
pub(crate) fn new_chase_dir(ctx: &mut ActionContext<'_, '_>, goal: Vec3) {
    let Some((pos, old)) = ctx.actor().map(|actor| (actor.pos, actor.movedir)) else {
        return;
    };
    let turnaround = old.map(Direction::opposite);
    let dx = goal.x - pos.x;
    let dy = goal.y - pos.y;

    let mut d1 = if dx > STEER_DEADBAND {
        Some(Direction::East)
    } else if dx < -STEER_DEADBAND {
        Some(Direction::West)
    } else {
        None
    };
    let mut d2 = if dy < -STEER_DEADBAND {
        Some(Direction::South)
    } else if dy > STEER_DEADBAND {
        Some(Direction::North)
    } else {
        None
    };

    if let (Some(x), Some(y)) = (d1, d2) {
        let dir = diagonal(x, y);
        if Some(dir) != turnaround && try_walk(ctx, dir) {
            return;
        }
    }

    if ctx.random() > 200 || dy.abs() > dx.abs() {
        std::mem::swap(&mut d1, &mut d2);
    }
    for dir in [d1, d2].into_iter().flatten() {
        if Some(dir) != turnaround && try_walk(ctx, dir) {
            return;
        }
    }

    if let Some(old) = old
        && try_walk(ctx, old)
    {
        return;
    }

    let mut order: Vec<Direction> = (0..8).map(Direction::from_index).collect();
    if ctx.random() & 1 == 0 {
        order.reverse();
    }
    for dir in order {
        if Some(dir) != turnaround && try_walk(ctx, dir) {
            return;
        }
    }

    if let Some(back) = turnaround
        && try_walk(ctx, back)
    {
        return;
    }
    if let Some(actor) = ctx.actor_mut() {
        actor.movedir = None;
    }
}

/// Snaps the actor's facing toward its walking direction by half an octant.
pub(crate) fn turn_toward_movedir(actor: &mut Thing) {
    let Some(dir) = actor.movedir else {
        return;
    };
    actor.angle = Angle(actor.angle.0 & 0xE000_0000);
    let delta = actor.angle.delta(dir.angle());
    if delta > 0 {
        actor.angle = actor.angle - Angle(Angle::ANG90.0 / 2);
    } else if delta < 0 {
        actor.angle = actor.angle + Angle(Angle::ANG90.0 / 2);
    }
}

/// Random-roll check for opening fire from range (`P_CheckMissileRange`).
pub(crate) fn check_missile_range(ctx: &mut ActionContext<'_, '_>, target: ThingKey) -> bool {
    if !ctx.check_sight(ctx.actor_key(), target) {
        return false;
    }
    let Some(actor) = ctx.actor_mut() else {
        return false;
    };
    if actor.has(ThingFlags::JUSTHIT) {
        actor.flags.flags.remove(ThingFlags::JUSTHIT);
        return true;
    }
    if actor.reaction_time > 0 {
        return false;
    }
    let pos = actor.pos;
    let Some(target_pos) = ctx.thing(target).map(|thing| thing.pos) else {
        return false;
    };
    let mut dist = pos.approx_distance(&target_pos) - fixed(64);
    if ctx.template().state(StateSlot::Melee).is_null() {
        dist -= fixed(128);
    }
    let dist = (dist >> FRACBITS).min(200);
    ctx.random() >= dist
}

/// Upward kick applied by blast attacks, inversely proportional to mass.
pub(crate) fn blast_lift(mass: i32) -> Fixed {
    1000 * FRACUNIT / mass.max(1)
}
