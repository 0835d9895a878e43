//! Arena of live things.
//!
//! Things live in a generational slot map. A [`ThingKey`] held after its
//! thing was removed never resolves to a newer occupant of the same slot.
mod thing;

pub use thing::Thing;

use sha2::{Digest, Sha256};
use slotmap::SlotMap;

use crate::config::GameConfig;
use crate::geom::Vec3;
use crate::state::{StateError, StateTable};
use crate::thing::{TemplateId, ThingTemplate};

slotmap::new_key_type! {
    /// Generational handle to a live thing.
    pub struct ThingKey;
}

/// Notable changes recorded while the world advances. Things are named by
/// serial so entries stay meaningful after removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    Spawned { serial: u32, template: TemplateId },
    Removed { serial: u32 },
    Damaged {
        serial: u32,
        amount: i32,
        source: Option<u32>,
    },
    Killed { serial: u32, source: Option<u32> },
    /// A death routine fired a map special, e.g. opening doors tagged 666.
    Special { serial: u32, tag: i32 },
    /// A boss brain died and ended the level.
    Exit { serial: u32 },
}

/// All live things plus the world clock.
#[derive(Clone, Debug)]
pub struct World {
    things: SlotMap<ThingKey, Thing>,
    max_things: usize,
    next_serial: u32,
    tic: u64,
    rng_nonce: u64,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            things: SlotMap::with_key(),
            max_things: config.max_things,
            next_serial: 1,
            tic: 0,
            rng_nonce: 0,
            events: Vec::new(),
        }
    }

    /// Places a new thing in its template's spawn state.
    ///
    /// The spawn state's action does not run; it fires only when the thing
    /// later re-enters that state. Templates without a spawn state are
    /// rejected.
    pub fn spawn(
        &mut self,
        id: TemplateId,
        template: &ThingTemplate,
        states: &StateTable,
        pos: Vec3,
    ) -> Result<ThingKey, StateError> {
        if self.things.len() >= self.max_things {
            return Err(StateError::ThingLimit {
                max: self.max_things,
            });
        }

        let spawn = template.spawn_state();
        if spawn.is_null() {
            return Err(StateError::NullSpawnState(template.name.clone()));
        }
        let tics = states.state(spawn)?.tics;
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);

        let thing = Thing::from_template(id, template, serial, pos, spawn, tics);
        self.events.push(WorldEvent::Spawned {
            serial,
            template: id,
        });
        Ok(self.things.insert(thing))
    }

    /// Removes a thing and clears every relation that pointed at it.
    pub fn remove(&mut self, key: ThingKey) -> Option<Thing> {
        let removed = self.things.remove(key)?;
        for thing in self.things.values_mut() {
            thing.clear_relations_to(key);
        }
        self.events.push(WorldEvent::Removed {
            serial: removed.serial,
        });
        Some(removed)
    }

    #[inline]
    pub fn contains(&self, key: ThingKey) -> bool {
        self.things.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: ThingKey) -> Option<&Thing> {
        self.things.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ThingKey) -> Option<&mut Thing> {
        self.things.get_mut(key)
    }

    /// Resolves a relation key, treating dangling keys as absent.
    pub fn resolve(&self, key: Option<ThingKey>) -> Option<ThingKey> {
        key.filter(|key| self.things.contains_key(*key))
    }

    /// Snapshot of live keys in arena order.
    pub fn keys(&self) -> Vec<ThingKey> {
        self.things.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThingKey, &Thing)> {
        self.things.iter()
    }

    pub fn len(&self) -> usize {
        self.things.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    pub fn tic(&self) -> u64 {
        self.tic
    }

    pub fn advance_tic(&mut self) {
        self.tic += 1;
    }

    /// Serial of a live thing.
    pub fn serial(&self, key: Option<ThingKey>) -> Option<u32> {
        key.and_then(|key| self.things.get(key)).map(|thing| thing.serial)
    }

    pub fn record(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Takes every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns a fresh nonce for one random roll.
    pub fn next_rng_nonce(&mut self) -> u64 {
        let nonce = self.rng_nonce;
        self.rng_nonce = self.rng_nonce.wrapping_add(1);
        nonce
    }

    /// SHA-256 over the world clock and every thing in spawn order.
    ///
    /// Relations are hashed by serial so the digest does not depend on arena
    /// slot assignment.
    pub fn checksum(&self) -> [u8; 32] {
        let mut things: Vec<&Thing> = self.things.values().collect();
        things.sort_by_key(|thing| thing.serial);

        let serial_of = |key: Option<ThingKey>| self.serial(key).unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(self.tic.to_le_bytes());
        hasher.update(self.rng_nonce.to_le_bytes());
        for thing in things {
            hasher.update(thing.serial.to_le_bytes());
            hasher.update(thing.template.0.to_le_bytes());
            hasher.update(thing.state.0.to_le_bytes());
            hasher.update(thing.tics.to_le_bytes());
            for value in [thing.pos.x, thing.pos.y, thing.pos.z] {
                hasher.update(value.to_le_bytes());
            }
            for value in [thing.mom.x, thing.mom.y, thing.mom.z] {
                hasher.update(value.to_le_bytes());
            }
            hasher.update(thing.angle.0.to_le_bytes());
            hasher.update(thing.health.to_le_bytes());
            hasher.update(thing.flags.flags.bits().to_le_bytes());
            hasher.update(thing.flags.flags2.bits().to_le_bytes());
            for counter in thing.counters {
                hasher.update(counter.to_le_bytes());
            }
            for relation in [thing.target, thing.tracer, thing.last_enemy] {
                hasher.update(serial_of(relation).to_le_bytes());
            }
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{State, StateNum, StateTableBuilder};
    use crate::thing::StateSlot;

    fn fixture() -> (StateTable, ThingTemplate) {
        let mut builder = StateTableBuilder::new();
        let stand = builder.push(State::new("S_STAND", 10, StateNum(1)));
        let states = builder.build().unwrap();
        let template = ThingTemplate::builder("probe")
            .spawn_health(20)
            .state(StateSlot::Spawn, stand)
            .build();
        (states, template)
    }

    #[test]
    fn spawn_enters_spawn_state_without_running_it() {
        let (states, template) = fixture();
        let mut world = World::new(&GameConfig::default());
        let key = world
            .spawn(TemplateId(0), &template, &states, Vec3::ZERO)
            .unwrap();
        let thing = world.get(key).unwrap();
        assert_eq!(thing.state, StateNum(1));
        assert_eq!(thing.tics, 10);
        assert_eq!(thing.health, 20);
    }

    #[test]
    fn remove_clears_weak_relations() {
        let (states, template) = fixture();
        let mut world = World::new(&GameConfig::default());
        let a = world.spawn(TemplateId(0), &template, &states, Vec3::ZERO).unwrap();
        let b = world.spawn(TemplateId(0), &template, &states, Vec3::ZERO).unwrap();
        {
            let thing = world.get_mut(a).unwrap();
            thing.target = Some(b);
            thing.tracer = Some(b);
        }

        world.remove(b).unwrap();
        let thing = world.get(a).unwrap();
        assert_eq!(thing.target, None);
        assert_eq!(thing.tracer, None);
        assert_eq!(
            world.drain_events().last(),
            Some(&WorldEvent::Removed { serial: 2 })
        );

        // The freed slot is reused under a new generation.
        let c = world.spawn(TemplateId(0), &template, &states, Vec3::ZERO).unwrap();
        assert_ne!(b, c);
        assert!(world.get(b).is_none());
    }

    #[test]
    fn spawn_respects_thing_limit() {
        let (states, template) = fixture();
        let config = GameConfig {
            max_things: 1,
            ..GameConfig::default()
        };
        let mut world = World::new(&config);
        world.spawn(TemplateId(0), &template, &states, Vec3::ZERO).unwrap();
        let err = world
            .spawn(TemplateId(0), &template, &states, Vec3::ZERO)
            .unwrap_err();
        assert_eq!(err, StateError::ThingLimit { max: 1 });
    }

    #[test]
    fn spawn_rejects_template_without_spawn_state() {
        let (states, _) = fixture();
        let template = ThingTemplate::builder("ghost").build();
        let mut world = World::new(&GameConfig::default());
        let err = world
            .spawn(TemplateId(0), &template, &states, Vec3::ZERO)
            .unwrap_err();
        assert_eq!(err, StateError::NullSpawnState("ghost".into()));
        assert!(world.is_empty());
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn checksum_tracks_state_changes() {
        let (states, template) = fixture();
        let mut world = World::new(&GameConfig::default());
        let key = world.spawn(TemplateId(0), &template, &states, Vec3::ZERO).unwrap();
        let before = world.checksum();
        assert_eq!(before, world.clone().checksum());

        world.get_mut(key).unwrap().health -= 1;
        assert_ne!(hex::encode(before), hex::encode(world.checksum()));
    }
}
