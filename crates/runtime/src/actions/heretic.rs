//! Heretic creature and boss routines.
//!
//! Scripted successors are looked up through the well-known state names; a
//! pack that lacks the creature leaves those jumps unresolved and they do
//! nothing.

use thing_core::geom::{FRACUNIT, fixed};
use thing_core::state::WellKnownState;
use thing_core::{ActionContext, Angle, StateNum, StateSlot, ThingFlags, ThingFlags2, Vec3};

use super::support::{aim, face_target, in_melee_range, skull_fly, spawn_missile, veer};

/// Counter used as the general scratch value by the boss sequences.
const SCRATCH: i32 = 0;
/// Counter that remembers a floor-fire volley is under way.
const VOLLEY: i32 = 1;
/// Marker a burning gargoyle leaves in [`SCRATCH`] so its crash explodes.
const BURNING: i32 = 666;
/// Tics in one second.
const TICRATE: i32 = 35;

const MINOTAUR_CHARGE_SPEED: i32 = 13;
const IMP_CHARGE_SPEED: i32 = 12;

/// Odds the serpent rider teleports away, by eighths of remaining health.
const TELEPORT_CHANCE: [i32; 9] = [192, 120, 120, 120, 64, 64, 32, 16, 0];

fn hit_dice(ctx: &mut ActionContext<'_, '_>, sides: i32) -> i32 {
    ((ctx.random() & 7) + 1) * sides
}

fn jump_to(ctx: &mut ActionContext<'_, '_>, state: WellKnownState) {
    if let Some(dest) = ctx.content().states.well_known(state) {
        ctx.set_state(dest);
    }
}

fn set_scratch(ctx: &mut ActionContext<'_, '_>, index: i32, value: i32) {
    if let Some(slot) = ctx.actor_mut().and_then(|actor| actor.counter_mut(index)) {
        *slot = value;
    }
}

fn scratch(ctx: &ActionContext<'_, '_>, index: i32) -> i32 {
    ctx.actor().and_then(|actor| actor.counter(index)).unwrap_or(0)
}

/// Whether the actor stands on the floor.
fn grounded(ctx: &ActionContext<'_, '_>) -> bool {
    ctx.actor().is_some_and(|actor| actor.pos.z <= 0)
}

/// Scatters an item or gib from the actor's midsection.
fn toss(ctx: &mut ActionContext<'_, '_>, name: &str) {
    let Some(center) = ctx
        .actor()
        .map(|actor| actor.pos + Vec3::new(0, 0, actor.height >> 1))
    else {
        return;
    };
    let Some(item) = ctx.spawn_named(name, center) else {
        return;
    };
    let (dx, dy) = (ctx.spread() << 8, ctx.spread() << 8);
    let dz = FRACUNIT * 5 + (ctx.random() << 10);
    if let Some(item) = ctx.thing_mut(item) {
        item.mom = Vec3::new(dx, dy, dz);
    }
}

// ============================================================================
// Drops and gargoyles
// ============================================================================

/// `(type, chance, type, chance)`: falls and drops each listed item with its
/// chance-in-256.
pub(crate) fn htic_drop(ctx: &mut ActionContext<'_, '_>) {
    super::death::fall(ctx);
    for pair in [0, 2] {
        let Some(id) = ctx.arg_template(pair) else {
            continue;
        };
        let chance = ctx.arg_int(pair + 1, 0);
        if ctx.random() > chance {
            continue;
        }
        let name = ctx
            .content()
            .templates
            .get(id)
            .map(|template| template.name.as_str());
        if let Some(name) = name {
            toss(ctx, name);
        }
    }
}

pub(crate) fn imp_charge_atk(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() || ctx.random() > 64 {
        ctx.set_slot(StateSlot::See);
        return;
    }
    face_target(ctx);
    ctx.sound(ctx.template().sounds.attack.as_deref());
    let actor = ctx.actor_key();
    skull_fly(ctx, actor, fixed(IMP_CHARGE_SPEED));
}

pub(crate) fn imp_death(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.flags.remove(ThingFlags::SOLID);
        actor.flags.flags2.insert(ThingFlags2::FOOTCLIP);
    }
    if grounded(ctx) {
        ctx.set_slot(StateSlot::Crash);
    }
}

/// A burning gargoyle stops blocking and floats while it burns.
pub(crate) fn imp_xdeath1(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.flags.remove(ThingFlags::SOLID);
        actor.flags.flags.insert(ThingFlags::NOGRAVITY);
        actor.flags.flags2.insert(ThingFlags2::FOOTCLIP);
    }
    set_scratch(ctx, SCRATCH, BURNING);
}

pub(crate) fn imp_xdeath2(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.flags.remove(ThingFlags::NOGRAVITY);
    }
    if grounded(ctx) {
        ctx.set_slot(StateSlot::Crash);
    }
}

pub(crate) fn imp_explode(ctx: &mut ActionContext<'_, '_>) {
    toss(ctx, "HereticImpChunk1");
    toss(ctx, "HereticImpChunk2");
    if scratch(ctx, SCRATCH) == BURNING {
        jump_to(ctx, WellKnownState::ImpXCrash1);
    }
}

// ============================================================================
// Disciples, snakes and liches
// ============================================================================

/// Turns a spawner missile into a disciple of D'Sparil if there is room for
/// one, then vanishes.
pub(crate) fn gen_wizard(ctx: &mut ActionContext<'_, '_>) {
    let Some((wizard_id, wizard)) = ctx.content().find_template("HereticWizard") else {
        return;
    };
    let Some(pos) = ctx.actor().map(|actor| actor.pos) else {
        return;
    };
    let spot = Vec3::new(pos.x, pos.y, (pos.z - (wizard.height >> 1)).max(0));
    let Some(disciple) = ctx.spawn(wizard_id, spot) else {
        return;
    };
    let fits = ctx.thing(disciple).is_some_and(|thing| ctx.fits(thing));
    if !fits {
        ctx.transition(disciple, StateNum::NULL);
        return;
    }
    if let Some(actor) = ctx.actor_mut() {
        actor.mom = Vec3::ZERO;
        actor.flags.flags.remove(ThingFlags::MISSILE | ThingFlags::SOLID);
    }
    ctx.spawn_named("HereticTeleportFog", pos);
    ctx.remove_self();
}

pub(crate) fn snake_attack(ctx: &mut ActionContext<'_, '_>) {
    snake_volley(ctx, "SnakeProjA");
}

pub(crate) fn snake_attack2(ctx: &mut ActionContext<'_, '_>) {
    snake_volley(ctx, "SnakeProjB");
}

fn snake_volley(ctx: &mut ActionContext<'_, '_>, missile: &str) {
    let Some(target) = ctx.target() else {
        ctx.set_slot(StateSlot::Spawn);
        return;
    };
    ctx.sound(ctx.template().sounds.attack.as_deref());
    face_target(ctx);
    spawn_missile(ctx, target, missile, fixed(32));
}

/// Lich fire column: rises each tic until its fuse runs out.
pub(crate) fn lich_fire_grow(ctx: &mut ActionContext<'_, '_>) {
    let Some(actor) = ctx.actor_mut() else {
        return;
    };
    actor.health -= 1;
    actor.pos.z += fixed(9);
    if actor.health == 0 {
        jump_to(ctx, WellKnownState::LichFx3_4);
    }
}

/// Homing whirlwind that wears itself out.
pub(crate) fn whirlwind_seek(ctx: &mut ActionContext<'_, '_>) {
    let spent = ctx.actor_mut().is_some_and(|actor| {
        actor.health -= 3;
        actor.health < 0
    });
    if spent {
        if let Some(actor) = ctx.actor_mut() {
            actor.mom = Vec3::ZERO;
            actor.flags.flags.remove(ThingFlags::MISSILE);
        }
        ctx.set_slot(StateSlot::Death);
        return;
    }
    seek(ctx, Angle::from_degrees(10), Angle::from_degrees(30));
}

/// Turns a missile toward its tracer. Offsets within `threshold` are closed
/// at once; wider ones are halved and capped at `turn_max`.
fn seek(ctx: &mut ActionContext<'_, '_>, threshold: Angle, turn_max: Angle) {
    let Some(dest) = ctx
        .actor()
        .and_then(|actor| actor.tracer)
        .and_then(|key| ctx.thing(key))
        .filter(|thing| thing.is_alive() && thing.has(ThingFlags::SHOOTABLE))
        .map(|thing| thing.pos)
    else {
        return;
    };
    let speed = fixed(ctx.template().speed);
    let Some(actor) = ctx.actor_mut() else {
        return;
    };
    let wanted = actor.pos.angle_to(&dest).delta(actor.angle);
    let mut step = wanted.unsigned_abs();
    if step > threshold.0 {
        step = (step >> 1).min(turn_max.0);
    }
    actor.angle = if wanted < 0 {
        actor.angle - Angle(step)
    } else {
        actor.angle + Angle(step)
    };
    let mom = aim(actor.pos, dest, speed);
    (actor.mom.x, actor.mom.y) = actor.angle.vector(speed);
    actor.mom.z = mom.z;
}

// ============================================================================
// Maulotaur
// ============================================================================

pub(crate) fn minotaur_decide(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    ctx.sound(Some("minsit"));
    let Some((dist, target_grounded)) = ctx
        .actor()
        .zip(ctx.thing(target))
        .map(|(actor, victim)| (actor.pos.approx_distance(&victim.pos), victim.pos.z <= 0))
    else {
        return;
    };
    let grounded = grounded(ctx);

    if grounded && dist > fixed(64) && dist < fixed(8 * 64) && ctx.random() < 150 {
        jump_to(ctx, WellKnownState::MntrAtk4_1);
        face_target(ctx);
        let actor = ctx.actor_key();
        skull_fly(ctx, actor, fixed(MINOTAUR_CHARGE_SPEED));
        set_scratch(ctx, SCRATCH, TICRATE / 2);
    } else if target_grounded && dist < fixed(9 * 64) && ctx.random() < 220 {
        jump_to(ctx, WellKnownState::MntrAtk3_1);
        set_scratch(ctx, VOLLEY, 0);
    }
}

/// Trails smoke while the charge lasts, then resumes the chase.
pub(crate) fn minotaur_charge(ctx: &mut ActionContext<'_, '_>) {
    let remaining = scratch(ctx, SCRATCH);
    if remaining > 0 {
        if let Some(pos) = ctx.actor().map(|actor| actor.pos) {
            ctx.spawn_named("MinotaurSmoke", pos);
        }
        set_scratch(ctx, SCRATCH, remaining - 1);
        return;
    }
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.flags.remove(ThingFlags::SKULLFLY);
        actor.mom = Vec3::ZERO;
    }
    if ctx.target().is_some() {
        ctx.set_slot(StateSlot::See);
    } else {
        ctx.set_slot(StateSlot::Spawn);
    }
}

/// Floor fire, or a hammer blow at close range.
pub(crate) fn minotaur_atk3(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    face_target(ctx);
    if in_melee_range(ctx) {
        let damage = hit_dice(ctx, 5);
        let actor = ctx.actor_key();
        ctx.damage(target, Some(actor), damage);
        set_scratch(ctx, VOLLEY, 1);
    } else if let Some(fire) = spawn_missile(ctx, target, "MinotaurFX2", 0) {
        if let Some(fire) = ctx.thing_mut(fire) {
            fire.pos.z = 0;
        }
        ctx.sound(Some("minat1"));
    }
    if ctx.random() < 192 && scratch(ctx, VOLLEY) == 0 {
        jump_to(ctx, WellKnownState::MntrAtk3_4);
    }
}

// ============================================================================
// D'Sparil
// ============================================================================

/// Serpent-mounted attack: a bite up close, otherwise one fireball, or three
/// once wounded.
pub(crate) fn srcr1_attack(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    ctx.sound(ctx.template().sounds.attack.as_deref());
    face_target(ctx);
    if in_melee_range(ctx) {
        let damage = hit_dice(ctx, 8);
        let actor = ctx.actor_key();
        ctx.damage(target, Some(actor), damage);
        return;
    }

    let spawn_health = ctx.template().spawn_health;
    let health = ctx.actor().map_or(0, |actor| actor.health);
    if health > spawn_health * 2 / 3 {
        spawn_missile(ctx, target, "SorcererFX1", fixed(48));
        return;
    }

    let spread = Angle::from_degrees(3);
    if spawn_missile(ctx, target, "SorcererFX1", fixed(48)).is_some() {
        for delta in [spread, Angle(0) - spread] {
            if let Some(side) = spawn_missile(ctx, target, "SorcererFX1", fixed(48)) {
                veer(ctx, side, delta);
            }
        }
    }
    if health < spawn_health / 3 {
        let again = scratch(ctx, SCRATCH) == 0;
        set_scratch(ctx, SCRATCH, i32::from(again));
        if again {
            jump_to(ctx, WellKnownState::Srcr1Atk4);
        }
    }
}

/// The serpent dies and D'Sparil rises from it.
pub(crate) fn sorcerer_rise(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.flags.remove(ThingFlags::SOLID);
    }
    let Some((pos, angle, target)) = ctx
        .actor()
        .map(|actor| (actor.pos, actor.angle, actor.target))
    else {
        return;
    };
    let Some(rider) = ctx.spawn_named("Sorcerer2", pos) else {
        return;
    };
    let rise = ctx
        .template_of(rider)
        .and_then(|template| template.label("Rise"));
    if let Some(thing) = ctx.thing_mut(rider) {
        thing.angle = angle;
        thing.target = target;
    }
    if let Some(rise) = rise {
        ctx.transition(rider, rise);
    }
}

/// Health-scaled chance of teleporting away.
pub(crate) fn srcr2_decide(ctx: &mut ActionContext<'_, '_>) {
    let eighth = (ctx.template().spawn_health / 8).max(1);
    let health = ctx.actor().map_or(0, |actor| actor.health);
    let bracket = (health / eighth).clamp(0, TELEPORT_CHANCE.len() as i32 - 1) as usize;
    if ctx.random() < TELEPORT_CHANCE[bracket] {
        ctx.sound(Some("telept"));
        jump_to(ctx, WellKnownState::Sor2Tele1);
    }
}

/// Repeats the death spin until the scratch counter runs down.
pub(crate) fn sor2_dth_loop(ctx: &mut ActionContext<'_, '_>) {
    let left = scratch(ctx, SCRATCH) - 1;
    set_scratch(ctx, SCRATCH, left);
    if left > 0 {
        jump_to(ctx, WellKnownState::Sor2Die4);
    }
}
