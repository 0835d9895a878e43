//! Thing templates ("mobjinfo") and their state slots.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::error::ContentError;
use crate::geom::{Fixed, fixed};
use crate::state::StateNum;
use crate::thing::{ThingFlagSet, ThingFlags, ThingFlags2};

/// Index of a template in the [`TemplateTable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateId(pub u16);

impl TemplateId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Named state slots every template carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum StateSlot {
    Spawn,
    See,
    Melee,
    Missile,
    Pain,
    Death,
    XDeath,
    Crash,
    Raise,
}

/// Per-slot state indices of a template. Unset slots hold the null state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StateSlots([StateNum; <StateSlot as strum::EnumCount>::COUNT]);

impl StateSlots {
    #[inline]
    pub fn get(&self, slot: StateSlot) -> StateNum {
        self.0[slot as usize]
    }

    #[inline]
    pub fn set(&mut self, slot: StateSlot, state: StateNum) {
        self.0[slot as usize] = state;
    }
}

/// Sound cues a template can emit. Names are opaque to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThingSounds {
    pub see: Option<String>,
    pub attack: Option<String>,
    pub pain: Option<String>,
    pub death: Option<String>,
    pub active: Option<String>,
}

/// Immutable definition of a thing type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThingTemplate {
    pub name: String,
    /// Editor number placed by maps, if any.
    pub doomednum: Option<i32>,
    pub spawn_health: i32,
    /// Map units per chase step, or per tic for missiles.
    pub speed: i32,
    pub radius: Fixed,
    pub height: Fixed,
    /// Out of 256.
    pub pain_chance: i32,
    pub reaction_time: i32,
    pub melee_range: Fixed,
    pub damage: i32,
    pub mass: i32,
    pub flags: ThingFlags,
    pub flags2: ThingFlags2,
    pub states: StateSlots,
    /// Custom template-relative labels.
    pub labels: BTreeMap<String, StateNum>,
    pub sounds: ThingSounds,
}

impl ThingTemplate {
    pub fn builder(name: impl Into<String>) -> ThingTemplateBuilder {
        ThingTemplateBuilder::new(name)
    }

    #[inline]
    pub fn state(&self, slot: StateSlot) -> StateNum {
        self.states.get(slot)
    }

    pub fn spawn_state(&self) -> StateNum {
        self.state(StateSlot::Spawn)
    }

    pub fn default_flags(&self) -> ThingFlagSet {
        ThingFlagSet::new(self.flags, self.flags2)
    }

    /// Resolves a template-relative label.
    ///
    /// Slot names (`See`, `death`, ...) are matched case-insensitively first,
    /// then custom labels (exact match, then case-insensitive).
    pub fn label(&self, name: &str) -> Option<StateNum> {
        if let Ok(slot) = StateSlot::from_str(name) {
            return Some(self.state(slot));
        }
        self.labels.get(name).copied().or_else(|| {
            self.labels
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(name))
                .map(|(_, state)| *state)
        })
    }
}

/// Builder for thing templates. Unset numeric fields take classic defaults.
#[derive(Clone, Debug)]
pub struct ThingTemplateBuilder {
    template: ThingTemplate,
}

impl ThingTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            template: ThingTemplate {
                name: name.into(),
                doomednum: None,
                spawn_health: 1000,
                speed: 0,
                radius: fixed(20),
                height: fixed(16),
                pain_chance: 0,
                reaction_time: 8,
                melee_range: fixed(64),
                damage: 0,
                mass: 100,
                flags: ThingFlags::empty(),
                flags2: ThingFlags2::empty(),
                states: StateSlots::default(),
                labels: BTreeMap::new(),
                sounds: ThingSounds::default(),
            },
        }
    }

    pub fn doomednum(mut self, doomednum: i32) -> Self {
        self.template.doomednum = Some(doomednum);
        self
    }

    pub fn spawn_health(mut self, health: i32) -> Self {
        self.template.spawn_health = health;
        self
    }

    pub fn speed(mut self, speed: i32) -> Self {
        self.template.speed = speed;
        self
    }

    /// Sets radius and height in whole map units.
    pub fn size(mut self, radius: i32, height: i32) -> Self {
        self.template.radius = fixed(radius);
        self.template.height = fixed(height);
        self
    }

    pub fn pain_chance(mut self, chance: i32) -> Self {
        self.template.pain_chance = chance;
        self
    }

    pub fn reaction_time(mut self, tics: i32) -> Self {
        self.template.reaction_time = tics;
        self
    }

    pub fn melee_range(mut self, units: i32) -> Self {
        self.template.melee_range = fixed(units);
        self
    }

    pub fn damage(mut self, damage: i32) -> Self {
        self.template.damage = damage;
        self
    }

    pub fn mass(mut self, mass: i32) -> Self {
        self.template.mass = mass;
        self
    }

    pub fn flags(mut self, flags: ThingFlags) -> Self {
        self.template.flags = flags;
        self
    }

    pub fn flags2(mut self, flags2: ThingFlags2) -> Self {
        self.template.flags2 = flags2;
        self
    }

    pub fn state(mut self, slot: StateSlot, state: StateNum) -> Self {
        self.template.states.set(slot, state);
        self
    }

    pub fn label(mut self, name: impl Into<String>, state: StateNum) -> Self {
        self.template.labels.insert(name.into(), state);
        self
    }

    pub fn sounds(mut self, sounds: ThingSounds) -> Self {
        self.template.sounds = sounds;
        self
    }

    pub fn build(self) -> ThingTemplate {
        self.template
    }
}

/// All templates of a content pack, addressed by [`TemplateId`].
#[derive(Clone, Debug, Default)]
pub struct TemplateTable {
    templates: Vec<ThingTemplate>,
    by_name: HashMap<String, TemplateId>,
}

impl TemplateTable {
    pub fn new(templates: Vec<ThingTemplate>) -> Result<Self, ContentError> {
        if templates.len() > u16::MAX as usize {
            return Err(ContentError::TooManyTemplates {
                max: u16::MAX as usize,
            });
        }

        let mut by_name = HashMap::with_capacity(templates.len());
        for (index, template) in templates.iter().enumerate() {
            if by_name
                .insert(template.name.clone(), TemplateId(index as u16))
                .is_some()
            {
                return Err(ContentError::DuplicateTemplate(template.name.clone()));
            }
        }

        Ok(Self { templates, by_name })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    #[inline]
    pub fn get(&self, id: TemplateId) -> Option<&ThingTemplate> {
        self.templates.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<TemplateId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &ThingTemplate)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(index, template)| (TemplateId(index as u16), template))
    }
}
