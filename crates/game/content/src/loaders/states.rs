//! State table loader.
//!
//! RON format: a list of [`StateDef`] records. Index 0 of the resulting table
//! is always the null state (`S_NULL`); definitions follow in file order
//! starting at index 1.
//!
//! ```ron
//! [
//!     (name: "S_TBLU", sprite: "TBLU", tics: 4, next: "S_TBLU2"),
//!     (name: "S_POSS_RUN1", sprite: "POSS", tics: 4, action: Some("A_Chase"), next: "S_POSS_RUN2"),
//!     (name: "S_FLICKER", tics: 6, action: Some("A_Jump"),
//!      args: [Int(64), Label("Spawn"), State("S_TBLU3")], next: "S_TBLU"),
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thing_core::{
    ActionCatalog, ContentError, State, StateArg, StateArgs, StateNum, StateTable, ThingFlagSet,
};

use crate::loaders::{LoadResult, read_file};

const NULL_STATE_NAME: &str = "S_NULL";

/// One state argument as written in content files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum ArgDef {
    Int(i32),
    /// Global state name, resolved at load time.
    State(String),
    /// Template-relative label, resolved when used.
    Label(String),
    /// Flag list such as `"NOBLOCKMAP|NOCLIP"`.
    Flags(String),
}

/// One state as written in content files.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDef {
    pub name: String,
    #[serde(default = "default_sprite")]
    pub sprite: String,
    #[serde(default)]
    pub frame: u8,
    pub tics: i32,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub args: Vec<ArgDef>,
    /// Successor name; `"S_NULL"` removes the thing.
    pub next: String,
    #[serde(default)]
    pub misc1: i32,
    #[serde(default)]
    pub misc2: i32,
    #[serde(default)]
    pub dehnum: Option<i32>,
}

fn default_sprite() -> String {
    String::from("TNT1")
}

/// Loader for state tables from RON files.
pub struct StateLoader;

impl StateLoader {
    /// Load a state table, binding actions through `catalog`.
    pub fn load(path: &Path, catalog: &dyn ActionCatalog) -> LoadResult<StateTable> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))
    }

    pub fn parse(text: &str, catalog: &dyn ActionCatalog) -> LoadResult<StateTable> {
        let defs: Vec<StateDef> = ron::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse state table RON: {}", e))?;
        Self::build(defs, catalog)
    }

    /// Resolves names and actions and validates the table.
    ///
    /// Unknown actions and unresolvable successors fail the load. Argument
    /// problems do not: a state argument naming a missing state, or a flag
    /// list with an unknown flag, is kept as an unresolved argument that
    /// reads as absent.
    pub fn build(defs: Vec<StateDef>, catalog: &dyn ActionCatalog) -> LoadResult<StateTable> {
        let mut numbers: HashMap<&str, StateNum> = HashMap::with_capacity(defs.len() + 1);
        numbers.insert(NULL_STATE_NAME, StateNum::NULL);
        for (index, def) in defs.iter().enumerate() {
            let num = StateNum(index as u32 + 1);
            if numbers.insert(def.name.as_str(), num).is_some() {
                anyhow::bail!(thing_core::StateError::DuplicateName(def.name.clone()));
            }
        }

        let mut states = Vec::with_capacity(defs.len() + 1);
        states.push(State::null());
        for def in &defs {
            let next = *numbers
                .get(def.next.as_str())
                .ok_or_else(|| ContentError::UnresolvedNext {
                    state: def.name.clone(),
                    next: def.next.clone(),
                })?;

            let action = match &def.action {
                Some(name) => Some(catalog.resolve(name).ok_or_else(|| {
                    ContentError::UnknownAction {
                        state: def.name.clone(),
                        action: name.clone(),
                    }
                })?),
                None => None,
            };

            let args = def.args.iter().map(|arg| resolve_arg(arg, &numbers));
            let args = StateArgs::from_args(&def.name, args)?;

            let mut state = State::new(def.name.clone(), def.tics, next)
                .with_sprite(def.sprite.clone(), def.frame)
                .with_misc(def.misc1, def.misc2)
                .with_args(args);
            state.action = action;
            state.dehnum = def.dehnum;
            states.push(state);
        }

        Ok(StateTable::new(states)?)
    }
}

fn resolve_arg(arg: &ArgDef, numbers: &HashMap<&str, StateNum>) -> StateArg {
    match arg {
        ArgDef::Int(value) => StateArg::Int(*value),
        ArgDef::State(name) => numbers
            .get(name.as_str())
            .map_or_else(|| StateArg::Unresolved(name.clone()), |num| StateArg::State(*num)),
        ArgDef::Label(label) => StateArg::Label(label.clone()),
        ArgDef::Flags(list) => ThingFlagSet::parse(list)
            .map_or_else(|_| StateArg::Unresolved(list.clone()), StateArg::Flags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::StaticCatalog;
    use thing_core::{ActionKind, ThingFlags};

    const TORCH: &str = r#"[
        (name: "S_TBLU", sprite: "TBLU", tics: 4, next: "S_TBLU2", dehnum: Some(700)),
        (name: "S_TBLU2", sprite: "TBLU", frame: 1, tics: 4, next: "S_TBLU"),
        (name: "S_FADE", tics: 0, action: Some("A_SetFlags"),
         args: [Int(1), Flags("NOBLOCKMAP|NOCLIP"), State("S_TBLU"), State("S_GONE"), Flags("SPARKLY")],
         next: "S_NULL"),
    ]"#;

    #[test]
    fn parses_and_resolves_names() {
        let table = StateLoader::parse(TORCH, &StaticCatalog).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(StateNum::NULL).unwrap().name, "S_NULL");

        let first = table.find("S_TBLU").unwrap();
        assert_eq!(first, StateNum(1));
        assert_eq!(table.for_deh_num(700), Some(first));
        assert_eq!(table.get(StateNum(2)).unwrap().next, first);

        let fade = table.get(table.find("S_FADE").unwrap()).unwrap();
        assert_eq!(fade.action_kind(), ActionKind::SetFlags);
        assert_eq!(fade.next, StateNum::NULL);
        assert!(fade.args.flags(1).unwrap().flags.contains(ThingFlags::NOCLIP));
        assert_eq!(fade.args.get(2), Some(&StateArg::State(first)));
        assert_eq!(fade.args.get(3), Some(&StateArg::Unresolved("S_GONE".into())));
        assert!(fade.args.flags(4).is_none());
    }

    #[test]
    fn unknown_action_fails_loading() {
        let text = r#"[(name: "S_X", tics: 4, action: Some("A_Nope"), next: "S_X")]"#;
        let err = StateLoader::parse(text, &StaticCatalog).unwrap_err();
        assert!(err.to_string().contains("A_Nope"), "{err}");
    }

    #[test]
    fn unresolved_successor_fails_loading() {
        let text = r#"[(name: "S_X", tics: 4, next: "S_MISSING")]"#;
        let err = StateLoader::parse(text, &StaticCatalog).unwrap_err();
        assert!(err.to_string().contains("S_MISSING"), "{err}");
    }

    #[test]
    fn duplicate_names_fail_loading() {
        let text = r#"[
            (name: "S_X", tics: 4, next: "S_X"),
            (name: "S_X", tics: 4, next: "S_X"),
        ]"#;
        assert!(StateLoader::parse(text, &StaticCatalog).is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.ron");
        std::fs::write(&path, TORCH).unwrap();

        let table = StateLoader::load(&path, &StaticCatalog).unwrap();
        assert!(table.find("S_FADE").is_some());

        let missing = StateLoader::load(&dir.path().join("nope.ron"), &StaticCatalog);
        assert!(missing.is_err());
    }
}
