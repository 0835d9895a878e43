//! Parameterized routines: conditional jumps, counters, flags and
//! configurable projectiles.
//!
//! Arguments are read through the context accessors, so a missing or
//! malformed argument quietly disables the effect.

use thing_core::geom::fixed;
use thing_core::{ActionContext, Angle, ThingFlagSet, ThingFlags, ThingFlags2, ThingKey};

use super::support::{face_target, hits_friend, in_melee_range, spawn_missile, target_lost, veer};

/// Comparison selected by a jump routine's operator argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparison {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    BitAnd,
}

impl Comparison {
    fn from_arg(op: i32) -> Option<Self> {
        Some(match op {
            0 => Self::Less,
            1 => Self::LessOrEqual,
            2 => Self::Greater,
            3 => Self::GreaterOrEqual,
            4 => Self::Equal,
            5 => Self::NotEqual,
            6 => Self::BitAnd,
            _ => return None,
        })
    }

    fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Self::Less => lhs < rhs,
            Self::LessOrEqual => lhs <= rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterOrEqual => lhs >= rhs,
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::BitAnd => lhs & rhs != 0,
        }
    }
}

/// Jumps to `arg_state(index)` if it resolves.
fn jump_to_arg(ctx: &mut ActionContext<'_, '_>, index: usize) {
    if let Some(state) = ctx.arg_state(index) {
        ctx.set_state(state);
    }
}

/// `misc2`-in-256 chance of jumping to the state with DeHackEd number `misc1`.
pub(crate) fn random_jump(ctx: &mut ActionContext<'_, '_>) {
    let (dehnum, chance) = (ctx.state().misc1, ctx.state().misc2);
    let Some(dest) = ctx.content().states.for_deh_num(dehnum) else {
        return;
    };
    if ctx.random() < chance {
        ctx.set_state(dest);
    }
}

/// `(state, chance)`: leaves the refire loop unless the chance roll keeps it
/// going or the target is still a valid one.
pub(crate) fn gen_refire(ctx: &mut ActionContext<'_, '_>) {
    let Some(dest) = ctx.arg_state(0) else {
        return;
    };
    let chance = ctx.arg_int(1, 0);
    face_target(ctx);
    if hits_friend(ctx) {
        ctx.set_state(dest);
        return;
    }
    if ctx.random() < chance {
        return;
    }
    if target_lost(ctx) {
        ctx.set_state(dest);
    }
}

/// `(state, comparison, value)` on the actor's health.
pub(crate) fn health_jump(ctx: &mut ActionContext<'_, '_>) {
    let Some(op) = Comparison::from_arg(ctx.arg_int(1, 0)) else {
        return;
    };
    let value = ctx.arg_int(2, 0);
    if ctx.actor().is_some_and(|actor| op.holds(actor.health, value)) {
        jump_to_arg(ctx, 0);
    }
}

/// `(state, comparison, value, counter)` on one of the actor's counters.
pub(crate) fn counter_jump(ctx: &mut ActionContext<'_, '_>) {
    let Some(op) = Comparison::from_arg(ctx.arg_int(1, 0)) else {
        return;
    };
    let value = ctx.arg_int(2, 0);
    let counter = ctx.arg_int(3, 0);
    let current = ctx.actor().and_then(|actor| actor.counter(counter));
    if current.is_some_and(|current| op.holds(current, value)) {
        jump_to_arg(ctx, 0);
    }
}

/// `(counter, first state, count)`: jumps to the state `counter` slots past
/// the first, if the counter is within `0..count`.
pub(crate) fn counter_switch(ctx: &mut ActionContext<'_, '_>) {
    let counter = ctx.arg_int(0, 0);
    let count = ctx.arg_int(2, 0);
    let Some(first) = ctx.arg_state(1) else {
        return;
    };
    let Some(value) = ctx.actor().and_then(|actor| actor.counter(counter)) else {
        return;
    };
    if !(0..count).contains(&value) {
        return;
    }
    let Some(dest) = first.offset(value as u32) else {
        return;
    };
    if ctx.content().states.contains(dest) {
        ctx.set_state(dest);
    }
}

/// `(counter, value, op)`: arithmetic on one of the actor's counters.
pub(crate) fn set_counter(ctx: &mut ActionContext<'_, '_>) {
    let counter = ctx.arg_int(0, 0);
    let value = ctx.arg_int(1, 0);
    let op = ctx.arg_int(2, 0);
    let roll = if matches!(op, 10 | 11) { ctx.random() } else { 0 };
    let Some(slot) = ctx.actor_mut().and_then(|actor| actor.counter_mut(counter)) else {
        return;
    };
    let current = *slot;
    *slot = match op {
        0 => value,
        1 => current.wrapping_add(value),
        2 => current.wrapping_sub(value),
        3 => current.wrapping_mul(value),
        4 if value != 0 => current.wrapping_div(value),
        5 if value != 0 => current.wrapping_rem(value),
        6 => current & value,
        7 => current & !value,
        8 => current | value,
        9 => current ^ value,
        10 => roll,
        11 if value != 0 => roll % value,
        _ => return,
    };
}

/// Jumps if the actor has a living target.
pub(crate) fn target_jump(ctx: &mut ActionContext<'_, '_>) {
    let alive = ctx
        .target()
        .and_then(|key| ctx.thing(key))
        .is_some_and(|target| target.is_alive());
    if alive {
        jump_to_arg(ctx, 0);
    }
}

/// `(state, fov)`: jumps if the target is visible and, for a nonzero field of
/// view in degrees, within it.
pub(crate) fn jump_if_target_in_los(ctx: &mut ActionContext<'_, '_>) {
    let Some(target) = ctx.target() else {
        return;
    };
    if !ctx.check_sight(ctx.actor_key(), target) {
        return;
    }
    let fov = ctx.arg_int(1, 0);
    if fov > 0 && fov < 360 {
        let half = i64::from(Angle::from_degrees(fov).0 / 2);
        let within = ctx
            .actor()
            .zip(ctx.thing(target))
            .is_some_and(|(actor, target)| {
                i64::from(actor.pos.angle_to(&target.pos).delta(actor.angle)).abs() <= half
            });
        if !within {
            return;
        }
    }
    jump_to_arg(ctx, 0);
}

/// Jumps unconditionally: no player ever occupies a body in this engine.
pub(crate) fn check_player_done(ctx: &mut ActionContext<'_, '_>) {
    jump_to_arg(ctx, 0);
}

/// `(chance, label...)`: with `chance`-in-256 odds, jumps to one of the
/// listed states picked at random.
pub(crate) fn jump(ctx: &mut ActionContext<'_, '_>) {
    let chance = ctx.arg_int(0, 0);
    let choices = ctx.args().len().saturating_sub(1);
    if chance == 0 || choices == 0 {
        return;
    }
    if ctx.random() >= chance {
        return;
    }
    let pick = 1 + ctx.random() as usize % choices;
    jump_to_arg(ctx, pick);
}

/// Which flag words a `(field, flags)` pair touches: 0 both, 1 the
/// primary word, 2 the extended word.
fn flag_mask(field: i32, flags: &ThingFlagSet) -> Option<ThingFlagSet> {
    match field {
        0 => Some(*flags),
        1 => Some(ThingFlagSet::new(flags.flags, ThingFlags2::empty())),
        2 => Some(ThingFlagSet::new(ThingFlags::empty(), flags.flags2)),
        _ => None,
    }
}

pub(crate) fn set_flags(ctx: &mut ActionContext<'_, '_>) {
    let Some(mask) = ctx.arg_flags(1).and_then(|flags| flag_mask(ctx.arg_int(0, 0), flags))
    else {
        return;
    };
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.insert(&mask);
    }
}

pub(crate) fn unset_flags(ctx: &mut ActionContext<'_, '_>) {
    let Some(mask) = ctx.arg_flags(1).and_then(|flags| flag_mask(ctx.arg_int(0, 0), flags))
    else {
        return;
    };
    if let Some(actor) = ctx.actor_mut() {
        actor.flags.remove(&mask);
    }
}

/// Reads the shared `(type, _, z offset, angle, melee state)` arguments and
/// handles the melee case. Returns the target and projectile template name
/// when a ranged attack should follow.
fn ranged_setup<'m>(
    ctx: &mut ActionContext<'_, 'm>,
) -> Option<(ThingKey, &'m str, i32, i32)> {
    let target = ctx.target()?;
    let content = ctx.content();
    let name = ctx
        .arg_template(0)
        .and_then(|id| content.templates.get(id))
        .map(|template| template.name.as_str())?;
    face_target(ctx);
    if let Some(melee) = ctx.arg_state(4)
        && in_melee_range(ctx)
    {
        ctx.set_state(melee);
        return None;
    }
    let z_offset = ctx.arg_int(2, 0);
    let degrees = ctx.arg_int(3, 0);
    Some((target, name, z_offset, degrees))
}

/// `(type, homing, z offset, angle, melee state)`.
pub(crate) fn missile_attack(ctx: &mut ActionContext<'_, '_>) {
    let Some((target, name, z_offset, degrees)) = ranged_setup(ctx) else {
        return;
    };
    let homing = ctx.arg_int(1, 0) != 0;
    let Some(missile) = spawn_missile(ctx, target, name, fixed(32 + z_offset)) else {
        return;
    };
    if degrees != 0 {
        veer(ctx, missile, Angle::from_degrees(degrees));
    }
    if homing && let Some(thing) = ctx.thing_mut(missile) {
        thing.tracer = Some(target);
    }
}

/// `(type, count, z offset, spread, melee state)`: fans `count` missiles
/// evenly across `spread` degrees centered on the target.
pub(crate) fn missile_spread(ctx: &mut ActionContext<'_, '_>) {
    let Some((target, name, z_offset, degrees)) = ranged_setup(ctx) else {
        return;
    };
    let count = ctx.arg_int(1, 0);
    if count < 2 {
        return;
    }
    let spread = Angle::from_degrees(degrees);
    let step = spread.0 / (count as u32 - 1);
    let start = Angle(0) - Angle(spread.0 / 2);
    for i in 0..count as u32 {
        if let Some(missile) = spawn_missile(ctx, target, name, fixed(32 + z_offset)) {
            veer(ctx, missile, start + Angle(step.wrapping_mul(i)));
        }
    }
}

/// `(lateral, vertical)` in sixteenths of a unit per tic: throws the actor
/// along its facing, like an ejected shell casing.
pub(crate) fn casing_thrust(ctx: &mut ActionContext<'_, '_>) {
    let lateral = fixed(ctx.arg_int(0, 0)) / 16;
    let vertical = fixed(ctx.arg_int(1, 0)) / 16;
    if let Some(actor) = ctx.actor_mut() {
        (actor.mom.x, actor.mom.y) = actor.angle.vector(lateral);
        actor.mom.z = vertical;
    }
}
