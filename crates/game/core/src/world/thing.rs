use crate::config::GameConfig;
use crate::geom::{Angle, Direction, Fixed, Vec3};
use crate::state::StateNum;
use crate::thing::{TemplateId, ThingFlagSet, ThingFlags, ThingFlags2, ThingTemplate};
use crate::world::ThingKey;

/// A live entity.
///
/// Relations (`target`, `tracer`, `last_enemy`) are weak: a key may outlive
/// the thing it names, and [`crate::world::World::remove`] clears every relation
/// pointing at a removed thing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thing {
    pub template: TemplateId,
    /// Spawn-order serial, unique for the lifetime of a world.
    pub serial: u32,
    pub state: StateNum,
    /// Remaining tics in the current state. Negative means frozen.
    pub tics: i32,
    pub pos: Vec3,
    pub mom: Vec3,
    pub angle: Angle,
    pub movedir: Option<Direction>,
    pub movecount: i32,
    pub reaction_time: i32,
    pub threshold: i32,
    pub health: i32,
    pub radius: Fixed,
    pub height: Fixed,
    pub counters: [i32; GameConfig::MAX_COUNTERS],
    pub flags: ThingFlagSet,
    pub target: Option<ThingKey>,
    pub tracer: Option<ThingKey>,
    pub last_enemy: Option<ThingKey>,
}

impl Thing {
    /// Creates a thing from its template, placed in `state` with `tics` remaining.
    pub fn from_template(
        id: TemplateId,
        template: &ThingTemplate,
        serial: u32,
        pos: Vec3,
        state: StateNum,
        tics: i32,
    ) -> Self {
        Self {
            template: id,
            serial,
            state,
            tics,
            pos,
            mom: Vec3::ZERO,
            angle: Angle::default(),
            movedir: None,
            movecount: 0,
            reaction_time: template.reaction_time,
            threshold: 0,
            health: template.spawn_health,
            radius: template.radius,
            height: template.height,
            counters: [0; GameConfig::MAX_COUNTERS],
            flags: template.default_flags(),
            target: None,
            tracer: None,
            last_enemy: None,
        }
    }

    #[inline]
    pub fn has(&self, flag: ThingFlags) -> bool {
        self.flags.flags.contains(flag)
    }

    #[inline]
    pub fn has2(&self, flag: ThingFlags2) -> bool {
        self.flags.flags2.contains(flag)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Reads a scratch counter; out-of-range indices read as `None`.
    pub fn counter(&self, index: i32) -> Option<i32> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.counters.get(index).copied())
    }

    pub fn counter_mut(&mut self, index: i32) -> Option<&mut i32> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.counters.get_mut(index))
    }

    pub(crate) fn clear_relations_to(&mut self, key: ThingKey) {
        for relation in [&mut self.target, &mut self.tracer, &mut self.last_enemy] {
            if *relation == Some(key) {
                *relation = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_reject_out_of_range_indices() {
        let template = ThingTemplate::builder("probe").build();
        let mut thing = Thing::from_template(
            TemplateId(0),
            &template,
            1,
            Vec3::ZERO,
            StateNum::NULL,
            -1,
        );
        *thing.counter_mut(3).unwrap() = 9;
        assert_eq!(thing.counter(3), Some(9));
        assert_eq!(thing.counter(-1), None);
        assert_eq!(thing.counter(GameConfig::MAX_COUNTERS as i32), None);
    }
}
