//! Targeting and walking routines.

use thing_core::{ActionContext, Direction, StateSlot, ThingFlags};

use super::support::{
    check_missile_range, face_target, find_target, in_melee_range, live_target, new_chase_dir,
    set_target, step_move, turn_toward_movedir,
};

/// Wakes up when a hostile thing comes into view.
pub(crate) fn look(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.threshold = 0;
    }
    let Some(target) = live_target(ctx).or_else(|| find_target(ctx)) else {
        return;
    };
    set_target(ctx, Some(target));
    ctx.sound(ctx.template().sounds.see.as_deref());
    ctx.set_slot(StateSlot::See);
}

/// Walks toward the target and opens fire when it can.
pub(crate) fn chase(ctx: &mut ActionContext<'_, '_>) {
    let template = ctx.template();
    let Some(actor) = ctx.actor_mut() else {
        return;
    };
    if actor.reaction_time > 0 {
        actor.reaction_time -= 1;
    }
    if actor.threshold > 0 {
        actor.threshold -= 1;
    }
    turn_toward_movedir(actor);

    let target = live_target(ctx).filter(|key| {
        ctx.thing(*key)
            .is_some_and(|thing| thing.has(ThingFlags::SHOOTABLE))
    });
    let Some(target) = target else {
        match find_target(ctx) {
            Some(found) => set_target(ctx, Some(found)),
            None => {
                set_target(ctx, None);
                ctx.set_slot(StateSlot::Spawn);
            }
        }
        return;
    };
    let Some(goal) = ctx.thing(target).map(|thing| thing.pos) else {
        return;
    };

    let just_attacked = ctx.actor_mut().is_some_and(|actor| {
        let flagged = actor.has(ThingFlags::JUSTATTACKED);
        actor.flags.flags.remove(ThingFlags::JUSTATTACKED);
        flagged
    });
    if just_attacked {
        new_chase_dir(ctx, goal);
        return;
    }

    let melee = template.state(StateSlot::Melee);
    if !melee.is_null() && in_melee_range(ctx) {
        ctx.sound(template.sounds.attack.as_deref());
        ctx.set_state(melee);
        return;
    }

    let missile = template.state(StateSlot::Missile);
    let rested = ctx.actor().is_some_and(|actor| actor.movecount == 0);
    if !missile.is_null() && rested && check_missile_range(ctx, target) {
        ctx.set_state(missile);
        if let Some(actor) = ctx.actor_mut() {
            actor.flags.flags.insert(ThingFlags::JUSTATTACKED);
        }
        return;
    }

    let exhausted = ctx.actor_mut().is_none_or(|actor| {
        actor.movecount -= 1;
        actor.movecount < 0
    });
    if exhausted || !step_move(ctx) {
        new_chase_dir(ctx, goal);
    }

    if ctx.random() < 3 {
        ctx.sound(template.sounds.active.as_deref());
    }
}

/// Keeps walking toward the target without considering an attack.
pub(crate) fn keep_chasing(ctx: &mut ActionContext<'_, '_>) {
    let Some(goal) = ctx.target().and_then(|key| ctx.thing(key)).map(|thing| thing.pos) else {
        random_walk(ctx);
        return;
    };
    let exhausted = ctx.actor_mut().is_none_or(|actor| {
        turn_toward_movedir(actor);
        actor.movecount -= 1;
        actor.movecount < 0
    });
    if exhausted || !step_move(ctx) {
        new_chase_dir(ctx, goal);
    }
}

/// Wanders in a random direction, picking a new one now and then.
pub(crate) fn random_walk(ctx: &mut ActionContext<'_, '_>) {
    let walking = ctx.actor_mut().is_some_and(|actor| {
        turn_toward_movedir(actor);
        actor.movecount -= 1;
        actor.movecount >= 0 && actor.movedir.is_some()
    });
    if walking && step_move(ctx) {
        return;
    }
    let dir = Direction::from_index((ctx.random() & 7) as usize);
    let count = ctx.random() & 15;
    if let Some(actor) = ctx.actor_mut() {
        actor.movedir = Some(dir);
        actor.movecount = count;
    }
    step_move(ctx);
}

pub(crate) fn face(ctx: &mut ActionContext<'_, '_>) {
    face_target(ctx);
}

/// Kills all momentum.
pub(crate) fn stop(ctx: &mut ActionContext<'_, '_>) {
    if let Some(actor) = ctx.actor_mut() {
        actor.mom = thing_core::Vec3::ZERO;
    }
}

pub(crate) fn hoof(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("hoof"));
    chase(ctx);
}

pub(crate) fn metal(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("metal"));
    chase(ctx);
}

pub(crate) fn baby_metal(ctx: &mut ActionContext<'_, '_>) {
    ctx.sound(Some("bspwlk"));
    chase(ctx);
}
