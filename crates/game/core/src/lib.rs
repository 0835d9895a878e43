//! Thing state machines and their static analysis.
//!
//! `thing-core` owns the canonical data model (states, thing templates, live
//! things), the per-tick actor state machine, and the analyzer that walks the
//! state graph without running anything. Live simulation drives
//! [`machine::StateMachine`] against a [`world::World`]; tooling asks
//! [`analysis::Reachability`] and [`analysis::DecorationClassifier`]
//! questions about the same immutable [`content::Content`].
//!
//! Action behavior itself lives outside this crate. Hosts populate an
//! [`action::ActionRegistry`] at startup and supply sight, movement, sound and
//! randomness through [`env::Env`].
pub mod action;
pub mod analysis;
pub mod combat;
pub mod config;
pub mod content;
pub mod env;
pub mod error;
pub mod geom;
pub mod machine;
pub mod state;
pub mod thing;
pub mod world;

pub use action::{
    ActionCatalog, ActionContext, ActionHandler, ActionId, ActionKind, ActionRef, ActionRegistry,
};
pub use analysis::{BranchResolver, DecorationClassifier, ReachQuery, Reachability, Subject};
pub use combat::DamageOutcome;
pub use config::{CompatMode, GameConfig};
pub use content::Content;
pub use env::{
    Env, GameEnv, MoveOracle, OpenField, OpenSight, PcgRng, RngOracle, SightOracle, Silence,
    SoundSink, compute_seed, open_env,
};
pub use error::{ContentError, ErrorSeverity, GameError};
pub use geom::{Angle, Direction, Fixed, Vec3};
pub use machine::StateMachine;
pub use state::{State, StateArg, StateArgs, StateError, StateNum, StateTable, StateTableBuilder};
pub use thing::{
    StateSlot, TemplateId, TemplateTable, ThingFlagSet, ThingFlags, ThingFlags2, ThingSounds,
    ThingTemplate,
};
pub use world::{Thing, ThingKey, World, WorldEvent};
