//! Pain, death and explosion routines.

use thing_core::{ActionContext, Angle, ThingFlags, ThingFlags2, WorldEvent};

use super::attack::shoot_skull;

/// Tag of the sectors a boss death opens.
const BOSS_SPECIAL_TAG: i32 = 666;
const EXPLOSION_DAMAGE: i32 = 128;

pub(crate) fn pain(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(ctx.template().sounds.pain.as_deref());
}

pub(crate) fn scream(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(ctx.template().sounds.death.as_deref());
}

pub(crate) fn xscream(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("slop"));
}

/// The corpse stops blocking.
pub(crate) fn fall(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.flags.remove(ThingFlags::SOLID);
    }
}

/// Falls and releases three lost souls.
pub(crate) fn pain_die(ctx: &mut ActionContext<'_, '_>) {
    fall(ctx);
    let Some(facing) = ctx.actor().map(|actor| actor.angle) else {
        return;
    };
    for turn in [Angle::ANG90, Angle::ANG180, Angle::ANG270] {
        shoot_skull(ctx, facing + turn);
    }
}

/// Fires the boss special once the last living thing of the actor's kind
/// (that also matches `kin`) is gone.
fn last_of_kind(ctx: &mut ActionContext<'_, '_>, kin: impl Fn(&thing_core::Thing) -> bool) {
    let Some((template, serial)) = ctx.actor().map(|actor| (actor.template, actor.serial)) else {
        return;
    };
    let survivor = ctx
        .others()
        .any(|(_, thing)| thing.template == template && thing.is_alive() && kin(thing));
    if survivor {
        return;
    }
    tracing::debug!(
        target: "runtime::actions",
        serial,
        tag = BOSS_SPECIAL_TAG,
        "boss special triggered"
    );
    ctx.record(WorldEvent::Special {
        serial,
        tag: BOSS_SPECIAL_TAG,
    });
}

pub(crate) fn keen_die(ctx: &mut ActionContext<'_, '_>) {
    fall(ctx);
    last_of_kind(ctx, |_| true);
}

pub(crate) fn boss_death(ctx: &mut ActionContext<'_, '_>) {
    let is_boss = ctx
        .actor()
        .is_some_and(|actor| actor.has2(ThingFlags2::BOSS));
    if is_boss {
        last_of_kind(ctx, |thing| thing.has2(ThingFlags2::BOSS));
    }
}

/// Blast centered on the actor, credited to whoever set it off.
pub(crate) fn explode(ctx: &mut ActionContext<'_, '_>) {
    let source = ctx.target();
    ctx.radius_attack(source, EXPLOSION_DAMAGE, EXPLOSION_DAMAGE);
}
