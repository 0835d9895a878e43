//! Thing template loader.
//!
//! RON format: a list of [`ThingDef`] records. Slot and label targets name
//! states from an already loaded [`StateTable`]; flag strings use the same
//! syntax as flag-list state arguments.
//!
//! ```ron
//! [
//!     (
//!         name: "TechLamp",
//!         doomednum: Some(85),
//!         radius: 16,
//!         flags: "SOLID",
//!         states: {"Spawn": "S_TECHLAMP"},
//!     ),
//! ]
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thing_core::{
    ContentError, StateNum, StateSlot, StateTable, TemplateTable, ThingFlagSet, ThingSounds,
    ThingTemplate,
};

use crate::loaders::{LoadResult, read_file};

/// Sound cue names as written in content files.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoundsDef {
    pub see: Option<String>,
    pub attack: Option<String>,
    pub pain: Option<String>,
    pub death: Option<String>,
    pub active: Option<String>,
}

/// One thing template as written in content files.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThingDef {
    pub name: String,
    #[serde(default)]
    pub doomednum: Option<i32>,
    #[serde(default = "defaults::spawn_health")]
    pub spawn_health: i32,
    #[serde(default)]
    pub speed: i32,
    #[serde(default = "defaults::radius")]
    pub radius: i32,
    #[serde(default = "defaults::height")]
    pub height: i32,
    #[serde(default)]
    pub pain_chance: i32,
    #[serde(default = "defaults::reaction_time")]
    pub reaction_time: i32,
    #[serde(default = "defaults::melee_range")]
    pub melee_range: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default = "defaults::mass")]
    pub mass: i32,
    /// Both flag words in one list, e.g. `"SOLID|SHOOTABLE|PUSHABLE"`.
    #[serde(default)]
    pub flags: String,
    /// Slot name (`Spawn`, `See`, ...) to state name.
    #[serde(default)]
    pub states: BTreeMap<String, String>,
    /// Custom label to state name.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub sounds: SoundsDef,
}

mod defaults {
    pub fn spawn_health() -> i32 {
        1000
    }
    pub fn radius() -> i32 {
        20
    }
    pub fn height() -> i32 {
        16
    }
    pub fn reaction_time() -> i32 {
        8
    }
    pub fn melee_range() -> i32 {
        64
    }
    pub fn mass() -> i32 {
        100
    }
}

/// Loader for thing templates from RON files.
pub struct ThingLoader;

impl ThingLoader {
    pub fn load(path: &Path, states: &StateTable) -> LoadResult<TemplateTable> {
        let content = read_file(path)?;
        Self::parse(&content, states)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))
    }

    pub fn parse(text: &str, states: &StateTable) -> LoadResult<TemplateTable> {
        let defs: Vec<ThingDef> = ron::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse thing catalog RON: {}", e))?;

        let templates = defs
            .into_iter()
            .map(|def| Self::build(def, states))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TemplateTable::new(templates)?)
    }

    /// Converts one definition, resolving its flags, slots and labels.
    pub fn build(def: ThingDef, states: &StateTable) -> Result<ThingTemplate, ContentError> {
        let flags = ThingFlagSet::parse(&def.flags)?;
        let resolve = |state: &str| {
            if state == "S_NULL" {
                return Some(StateNum::NULL);
            }
            states.find(state)
        };

        let mut builder = ThingTemplate::builder(def.name.clone())
            .spawn_health(def.spawn_health)
            .speed(def.speed)
            .size(def.radius, def.height)
            .pain_chance(def.pain_chance)
            .reaction_time(def.reaction_time)
            .melee_range(def.melee_range)
            .damage(def.damage)
            .mass(def.mass)
            .flags(flags.flags)
            .flags2(flags.flags2)
            .sounds(ThingSounds {
                see: def.sounds.see,
                attack: def.sounds.attack,
                pain: def.sounds.pain,
                death: def.sounds.death,
                active: def.sounds.active,
            });
        if let Some(doomednum) = def.doomednum {
            builder = builder.doomednum(doomednum);
        }

        for (slot_name, state) in &def.states {
            let slot = StateSlot::from_str(slot_name)
                .map_err(|_| ContentError::UnknownSlot(slot_name.clone()))?;
            let num = resolve(state).ok_or_else(|| ContentError::UnresolvedSlot {
                template: def.name.clone(),
                slot: slot_name.clone(),
                state: state.clone(),
            })?;
            builder = builder.state(slot, num);
        }

        for (label, state) in &def.labels {
            let num = resolve(state).ok_or_else(|| ContentError::UnresolvedSlot {
                template: def.name.clone(),
                slot: label.clone(),
                state: state.clone(),
            })?;
            builder = builder.label(label.clone(), num);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{StateLoader, StaticCatalog};
    use thing_core::{ThingFlags, ThingFlags2, geom::fixed};

    fn states() -> StateTable {
        StateLoader::parse(
            r#"[
                (name: "S_STAND", tics: -1, next: "S_STAND"),
                (name: "S_DIE", tics: 5, next: "S_NULL"),
            ]"#,
            &StaticCatalog,
        )
        .unwrap()
    }

    #[test]
    fn parses_flags_slots_and_labels() {
        let text = r#"[
            (
                name: "Crate",
                doomednum: Some(9001),
                radius: 24,
                flags: "SOLID|SHOOTABLE|MF2_PUSHABLE",
                states: {"Spawn": "S_STAND", "death": "S_DIE"},
                labels: {"Wobble": "S_STAND"},
                sounds: (death: Some("dsbarexp")),
            ),
        ]"#;
        let templates = ThingLoader::parse(text, &states()).unwrap();
        let id = templates.find("Crate").unwrap();
        let crate_ = templates.get(id).unwrap();

        assert_eq!(crate_.doomednum, Some(9001));
        assert_eq!(crate_.radius, fixed(24));
        assert_eq!(crate_.spawn_health, 1000);
        assert!(crate_.flags.contains(ThingFlags::SOLID | ThingFlags::SHOOTABLE));
        assert!(crate_.flags2.contains(ThingFlags2::PUSHABLE));
        assert_eq!(crate_.spawn_state(), StateNum(1));
        assert_eq!(crate_.state(StateSlot::Death), StateNum(2));
        assert_eq!(crate_.label("wobble"), Some(StateNum(1)));
        assert_eq!(crate_.sounds.death.as_deref(), Some("dsbarexp"));
    }

    #[test]
    fn unknown_flag_fails_loading() {
        let text = r#"[(name: "Odd", flags: "SOLID|WOBBLY")]"#;
        let err = ThingLoader::parse(text, &states()).unwrap_err();
        assert!(err.to_string().contains("WOBBLY"), "{err}");
    }

    #[test]
    fn unknown_slot_and_state_fail_loading() {
        let bad_slot = r#"[(name: "Odd", states: {"Dance": "S_STAND"})]"#;
        assert!(ThingLoader::parse(bad_slot, &states()).is_err());

        let bad_state = r#"[(name: "Odd", states: {"Spawn": "S_MISSING"})]"#;
        let err = ThingLoader::parse(bad_state, &states()).unwrap_err();
        assert!(err.to_string().contains("S_MISSING"), "{err}");
    }

    #[test]
    fn duplicate_template_names_fail_loading() {
        let text = r#"[(name: "Twin"), (name: "Twin")]"#;
        assert!(ThingLoader::parse(text, &states()).is_err());
    }
}
