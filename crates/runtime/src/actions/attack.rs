//! Monster attack routines.
//!
//! Projectile and effect templates are looked up by name when fired; a pack
//! that does not define one simply fires nothing.

use thing_core::geom::{FRACUNIT, fixed};
use thing_core::state::WellKnownState;
use thing_core::{ActionContext, Angle, StateSlot, ThingFlags, ThingKey, Vec3};

use super::support::{
    MISSILE_Z, blast_lift, face_target, hits_friend, in_melee_range, jitter, line_attack,
    skull_fly, spawn_missile, target_lost, veer,
};
use super::monster::chase;

/// Mancubus fan half-width.
const FAT_SPREAD: Angle = Angle(Angle::ANG90.0 / 8);
/// Homing missile turn rate per adjustment.
const TRACE_ANGLE: Angle = Angle(0x0C00_0000);
const SKULL_SPEED: i32 = 20;

/// Bullet damage roll shared by the former humans.
fn bullet_damage(ctx: &mut ActionContext<'_, '_>) -> i32 {
    (ctx.random() % 5 + 1) * 3
}

fn melee_hit(ctx: &mut ActionContext<'_, '_>, target: ThingKey, damage: i32) {
    let actor = ctx.actor_key();
    ctx.damage(target, Some(actor), damage);
}

fn aim_angle(ctx: &ActionContext<'_, '_>) -> Option<Angle> {
    ctx.actor().map(|actor| actor.angle)
}

// ============================================================================
// Former humans
// ============================================================================

pub(crate) fn pos_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    face_target(ctx);
    ctx.sound(Some("pistol"));
    let Some(base) = aim_angle(ctx) else {
        return;
    };
    let angle = base + jitter(ctx, 20);
    let damage = bullet_damage(ctx);
    line_attack(ctx, angle, damage);
}

pub(crate) fn spos_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    ctx.sound(Some("shotgn"));
    face_target(ctx);
    let Some(base) = aim_angle(ctx) else {
        return;
    };
    for _ in 0..3 {
        let angle = base + jitter(ctx, 20);
        let damage = bullet_damage(ctx);
        line_attack(ctx, angle, damage);
    }
}

pub(crate) fn cpos_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    ctx.sound(Some("shotgn"));
    face_target(ctx);
    let Some(base) = aim_angle(ctx) else {
        return;
    };
    let angle = base + jitter(ctx, 20);
    let damage = bullet_damage(ctx);
    line_attack(ctx, angle, damage);
}

/// Keeps firing unless the target got away.
pub(crate) fn cpos_refire(ctx: &mut ActionContext<'_, '_>) {
    face_target(ctx);
    if hits_friend(ctx) {
        ctx.set_slot(StateSlot::See);
        return;
    }
    if ctx.random() < 40 {
        let friendly_target = ctx
            .actor()
            .zip(ctx.target().and_then(|key| ctx.thing(key)))
            .is_some_and(|(actor, target)| {
                actor.has(ThingFlags::FRIEND) && target.has(ThingFlags::FRIEND)
            });
        if friendly_target {
            ctx.set_slot(StateSlot::See);
        }
        return;
    }
    if target_lost(ctx) {
        ctx.set_slot(StateSlot::See);
    }
}

pub(crate) fn spid_refire(ctx: &mut ActionContext<'_, '_>) {
    face_target(ctx);
    if hits_friend(ctx) {
        ctx.set_slot(StateSlot::See);
        return;
    }
    if ctx.random() < 10 {
        return;
    }
    if target_lost(ctx) {
        ctx.set_slot(StateSlot::See);
    }
}

// ============================================================================
// Melee-or-missile demons
// ============================================================================

/// Claws in melee range, otherwise throws `missile`.
fn claw_or_throw(
    ctx: &mut ActionContext<'_, '_>,
    claw_sound: Option<&str>,
    damage: impl FnOnce(&mut ActionContext<'_, '_>) -> i32,
    missile: Option<&str>,
) {
    let Some(target) = ctx.target() else {
        return;
    };
    if in_melee_range(ctx) {
        ctx.sound(claw_sound);
        let amount = damage(ctx);
        melee_hit(ctx, target, amount);
    } else if let Some(missile) = missile {
        spawn_missile(ctx, target, missile, MISSILE_Z);
    }
}

pub(crate) fn troop_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    face_target(ctx);
    claw_or_throw(
        ctx,
        Some("claw"),
        |ctx| (ctx.random() % 8 + 1) * 3,
        Some("DoomImpBall"),
    );
}

pub(crate) fn sarg_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    face_target(ctx);
    claw_or_throw(ctx, None, |ctx| (ctx.random() % 10 + 1) * 4, None);
}

pub(crate) fn head_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    face_target(ctx);
    claw_or_throw(
        ctx,
        None,
        |ctx| (ctx.random() % 6 + 1) * 10,
        Some("CacodemonBall"),
    );
}

pub(crate) fn bruis_attack(ctx: &mut ActionContext<'_, '_>) {
    claw_or_throw(
        ctx,
        Some("claw"),
        |ctx| (ctx.random() % 8 + 1) * 10,
        Some("BaronBall"),
    );
}

fn fire_at_target(ctx: &mut ActionContext<'_, '_>, missile: &str) -> Option<ThingKey> {
    let target = ctx.target()?;
    face_target(ctx);
    spawn_missile(ctx, target, missile, MISSILE_Z)
}

pub(crate) fn bspi_attack(ctx: &mut ActionContext<'_, '_>) {
    fire_at_target(ctx, "ArachnotronPlasma");
}

pub(crate) fn cyber_attack(ctx: &mut ActionContext<'_, '_>) {
    fire_at_target(ctx, "Rocket");
}

// ============================================================================
// Revenant
// ============================================================================

/// Fires a homing missile from shoulder height.
pub(crate) fn skel_missile(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    face_target(ctx);
    let Some(missile) = spawn_missile(ctx, target, "RevenantTracer", MISSILE_Z + fixed(16))
    else {
        return;
    };
    if let Some(thing) = ctx.thing_mut(missile) {
        thing.pos = thing.pos + Vec3::new(thing.mom.x, thing.mom.y, 0);
        thing.tracer = Some(target);
    }
}

/// Steers a homing missile toward its tracer every fourth tic.
pub(crate) fn tracer(ctx: &mut ActionContext<'_, '_>) {
    if ctx.world().tic() & 3 != 0 {
        return;
    }
    let Some((pos, mom)) = ctx.actor().map(|actor| (actor.pos, actor.mom)) else {
        return;
    };
    ctx.spawn_named("BulletPuff", pos);
    if let Some(smoke) = ctx.spawn_named("RevenantTracerSmoke", pos - Vec3::new(mom.x, mom.y, 0)) {
        let trim = ctx.random() & 3;
        if let Some(smoke) = ctx.thing_mut(smoke) {
            smoke.mom.z = FRACUNIT;
            smoke.tics = (smoke.tics - trim).max(1);
        }
    }

    let Some(dest) = ctx
        .actor()
        .and_then(|actor| actor.tracer)
        .and_then(|key| ctx.thing(key))
        .filter(|thing| thing.is_alive())
        .map(|thing| thing.pos)
    else {
        return;
    };
    let speed = fixed(ctx.template().speed);
    let Some(actor) = ctx.actor_mut() else {
        return;
    };

    let exact = actor.pos.angle_to(&dest);
    if exact != actor.angle {
        if exact.delta(actor.angle) < 0 {
            actor.angle = actor.angle - TRACE_ANGLE;
            if exact.delta(actor.angle) > 0 {
                actor.angle = exact;
            }
        } else {
            actor.angle = actor.angle + TRACE_ANGLE;
            if exact.delta(actor.angle) < 0 {
                actor.angle = exact;
            }
        }
    }
    (actor.mom.x, actor.mom.y) = actor.angle.vector(speed);

    let flight = (actor.pos.approx_distance(&dest) / speed.max(1)).max(1);
    let slope = (dest.z + fixed(40) - actor.pos.z) / flight;
    if slope < actor.mom.z {
        actor.mom.z -= FRACUNIT / 8;
    } else {
        actor.mom.z += FRACUNIT / 8;
    }
}

pub(crate) fn skel_whoosh(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    face_target(ctx);
    ctx.sound(Some("skeswg"));
}

pub(crate) fn skel_fist(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    face_target(ctx);
    if in_melee_range(ctx) {
        let damage = (ctx.random() % 10 + 1) * 6;
        ctx.sound(Some("skepch"));
        melee_hit(ctx, target, damage);
    }
}

// ============================================================================
// Mancubus
// ============================================================================

pub(crate) fn fat_raise(ctx: &mut ActionContext<'_, '_>) {
    face_target(ctx);
    ctx.sound(Some("manatk"));
}

/// Fires two fat shots, the second veered by `second`, after turning the
/// shooter by `turn`.
fn fat_volley(ctx: &mut ActionContext<'_, '_>, turn: Option<Angle>, first: Angle, second: Angle) {
    let Some(target) = ctx.target() else {
        return;
    };
    face_target(ctx);
    if let Some(turn) = turn {
        super::support::turn(ctx, turn);
    }
    if let Some(shot) = spawn_missile(ctx, target, "FatShot", MISSILE_Z) {
        veer(ctx, shot, first);
    }
    if let Some(shot) = spawn_missile(ctx, target, "FatShot", MISSILE_Z) {
        veer(ctx, shot, second);
    }
}

pub(crate) fn fat_attack1(ctx: &mut ActionContext<'_, '_>) {
    fat_volley(ctx, Some(FAT_SPREAD), Angle(0), FAT_SPREAD);
}

pub(crate) fn fat_attack2(ctx: &mut ActionContext<'_, '_>) {
    fat_volley(ctx, Some(Angle(0) - FAT_SPREAD), Angle(0), Angle(0) - FAT_SPREAD - FAT_SPREAD);
}

pub(crate) fn fat_attack3(ctx: &mut ActionContext<'_, '_>) {
    let half = Angle(FAT_SPREAD.0 / 2);
    fat_volley(ctx, None, Angle(0) - half, half);
}

// ============================================================================
// Arch-vile
// ============================================================================

/// A corpse lying still that can be raised and would fit at its spot.
fn raisable_corpse(ctx: &ActionContext<'_, '_>, probe: Vec3) -> Option<ThingKey> {
    let reach = ctx.template().radius;
    let vanilla = ctx.config().is_vanilla();
    ctx.others()
        .filter(|(_, thing)| thing.has(ThingFlags::CORPSE) && thing.tics == -1)
        .filter_map(|(key, thing)| {
            let template = ctx.template_of(key)?;
            if template.state(StateSlot::Raise).is_null() {
                return None;
            }
            let max = template.radius + reach;
            let near = (thing.pos.x - probe.x).abs() <= max && (thing.pos.y - probe.y).abs() <= max;
            // Check the fit at the size the corpse will have once raised.
            let mut upright = thing.clone();
            if vanilla {
                upright.height <<= 2;
            } else {
                upright.height = template.height;
                upright.radius = template.radius;
            }
            (near && ctx.fits(&upright)).then_some((thing.serial, key))
        })
        .min()
        .map(|(_, key)| key)
}

/// Looks for a corpse to resurrect ahead, otherwise chases.
pub(crate) fn vile_chase(ctx: &mut ActionContext<'_, '_>) {
    let speed = fixed(ctx.template().speed);
    let probe = ctx.actor().and_then(|actor| {
        let (dx, dy) = actor.movedir?.angle().thrust(speed);
        Some(actor.pos + Vec3::new(dx, dy, 0))
    });
    let Some(corpse) = probe.and_then(|probe| raisable_corpse(ctx, probe)) else {
        chase(ctx);
        return;
    };

    let Some(corpse_pos) = ctx.thing(corpse).map(|thing| thing.pos) else {
        return;
    };
    if let Some(actor) = ctx.actor_mut() {
        actor.angle = actor.pos.angle_to(&corpse_pos);
    }
    if let Some(heal) = ctx.content().states.well_known(WellKnownState::VileHeal1) {
        ctx.set_state(heal);
    }
    ctx.sound(Some("slop"));

    let Some(template) = ctx.template_of(corpse) else {
        return;
    };
    if !ctx.transition(corpse, template.state(StateSlot::Raise)) {
        return;
    }
    let vanilla = ctx.config().is_vanilla();
    let friendly = ctx.actor().is_some_and(|actor| actor.has(ThingFlags::FRIEND));
    if let Some(thing) = ctx.thing_mut(corpse) {
        if vanilla {
            thing.height <<= 2;
        } else {
            thing.height = template.height;
            thing.radius = template.radius;
        }
        thing.flags = template.default_flags();
        thing.flags.flags.set(ThingFlags::FRIEND, friendly);
        thing.health = template.spawn_health;
        thing.target = None;
        thing.last_enemy = None;
    }
}

pub(crate) fn vile_start(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("vilatk"));
}

/// Keeps a hellfire in front of the victim it tracks while its owner can
/// see it.
fn place_fire(ctx: &mut ActionContext<'_, '_>, fire: ThingKey) {
    let Some((owner, victim)) = ctx
        .thing(fire)
        .and_then(|thing| Some((thing.target?, thing.tracer?)))
    else {
        return;
    };
    if !ctx.check_sight(owner, victim) {
        return;
    }
    let Some((pos, angle)) = ctx.thing(victim).map(|thing| (thing.pos, thing.angle)) else {
        return;
    };
    let (dx, dy) = angle.vector(fixed(24));
    if let Some(thing) = ctx.thing_mut(fire) {
        thing.pos = Vec3::new(pos.x + dx, pos.y + dy, pos.z);
    }
}

pub(crate) fn fire(ctx: &mut ActionContext<'_, '_>) {
    let actor = ctx.actor_key();
    place_fire(ctx, actor);
}

pub(crate) fn start_fire(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("flamst"));
    fire(ctx);
}

pub(crate) fn fire_crackle(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("flame"));
    fire(ctx);
}

/// Spawns the hellfire on the target.
pub(crate) fn vile_target(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    face_target(ctx);
    let Some(pos) = ctx.thing(target).map(|thing| thing.pos) else {
        return;
    };
    let Some(fog) = ctx.spawn_named("ArchvileFire", pos) else {
        return;
    };
    let actor = ctx.actor_key();
    if let Some(vile) = ctx.actor_mut() {
        vile.tracer = Some(fog);
    }
    if let Some(fog) = ctx.thing_mut(fog) {
        fog.target = Some(actor);
        fog.tracer = Some(target);
    }
    place_fire(ctx, fog);
}

/// Blasts the target and detonates the hellfire in front of it.
pub(crate) fn vile_attack(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    face_target(ctx);
    let actor = ctx.actor_key();
    if !ctx.check_sight(actor, target) {
        return;
    }
    ctx.sound(Some("barexp"));
    ctx.damage(target, Some(actor), 20);
    let lift = ctx.template_of(target).map_or(0, |template| blast_lift(template.mass));
    let Some(victim_pos) = ctx.thing_mut(target).map(|victim| {
        victim.mom.z = lift;
        victim.pos
    }) else {
        return;
    };

    let Some((angle, fire)) = ctx.actor().and_then(|vile| Some((vile.angle, vile.tracer?))) else {
        return;
    };
    let (dx, dy) = angle.vector(fixed(24));
    let blast = Vec3::new(victim_pos.x - dx, victim_pos.y - dy, victim_pos.z);
    let Some(fire) = ctx.thing_mut(fire) else {
        return;
    };
    fire.pos = blast;
    ctx.radius_attack_at(blast, Some(actor), 70, 70);
}

// ============================================================================
// Lost soul and pain elemental
// ============================================================================

pub(crate) fn skull_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    ctx.sound(ctx.template().sounds.attack.as_deref());
    let actor = ctx.actor_key();
    skull_fly(ctx, actor, fixed(SKULL_SPEED));
}

/// Early lost soul bite: a direct hit on the target with no charge. Things
/// of the same kind leave each other alone.
pub(crate) fn beta_skull_attack(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    let kin = ctx
        .thing(target)
        .zip(ctx.actor())
        .is_some_and(|(victim, actor)| victim.template == actor.template);
    if kin {
        return;
    }
    ctx.sound(ctx.template().sounds.attack.as_deref());
    face_target(ctx);
    let damage = (ctx.random() % 8 + 1) * ctx.template().damage;
    melee_hit(ctx, target, damage);
}

/// Spits a lost soul along `angle` and launches it at the shooter's target.
pub(crate) fn shoot_skull(ctx: &mut ActionContext<'_, '_>, angle: Angle) {
    let Some((skull_id, skull)) = ctx.content().find_template("LostSoul") else {
        return;
    };
    if ctx.config().is_vanilla() {
        let live = ctx
            .world()
            .iter()
            .filter(|(_, thing)| thing.template == skull_id)
            .count();
        if live > 20 {
            return;
        }
    }
    let Some(actor) = ctx.actor() else {
        return;
    };
    let prestep = fixed(4) + 3 * (ctx.template().radius + skull.radius) / 2;
    let (dx, dy) = angle.vector(prestep);
    let spot = actor.pos + Vec3::new(dx, dy, fixed(8));
    let (friendly, target) = (actor.has(ThingFlags::FRIEND), actor.target);

    let Some(soul) = ctx.spawn(skull_id, spot) else {
        return;
    };
    if let Some(thing) = ctx.thing_mut(soul) {
        thing.flags.flags.set(ThingFlags::FRIEND, friendly);
    }
    let shooter = ctx.actor_key();
    if !ctx.try_move(soul, spot) {
        ctx.damage(soul, Some(shooter), 10_000);
        return;
    }
    if let Some(thing) = ctx.thing_mut(soul) {
        thing.target = target;
    }
    ctx.sound(skull.sounds.attack.as_deref());
    skull_fly(ctx, soul, fixed(SKULL_SPEED));
}

pub(crate) fn pain_attack(ctx: &mut ActionContext<'_, '_>) {
    if ctx.target().is_none() {
        return;
    }
    face_target(ctx);
    if let Some(angle) = aim_angle(ctx) {
        shoot_skull(ctx, angle);
    }
}
