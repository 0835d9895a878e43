//! Data-driven content definitions and loaders.
//!
//! This crate turns RON/TOML data files into the immutable tables consumed by
//! `thing-core`:
//! - State tables (`states.ron`), with next-state names, action names and
//!   state arguments resolved at load time
//! - Thing templates (`things.ron`), with flag strings and slot names parsed
//! - Engine configuration (`config.toml`)
//!
//! A default content pack is embedded in the crate and available through
//! [`ContentFactory::embedded`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArgDef, ConfigLoader, ContentFactory, LoadResult, StateDef, StateLoader, StaticCatalog,
    ThingDef, ThingLoader,
};
