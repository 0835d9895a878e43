//! Live simulation host for thing state machines.
//!
//! This crate supplies everything `thing-core` leaves to its host: native
//! implementations of every action routine, concrete sight, movement and
//! sound oracles, and a deterministic tic loop that owns the world. Consumers
//! build a [`Simulation`], spawn things into it and advance it tic by tic.
//!
//! Modules are organized by responsibility:
//! - [`actions`] holds the native routines and [`native_registry`]
//! - [`oracle`] provides the collaborator implementations
//! - [`sim`] hosts the tic loop, momentum physics and the event log
//! - [`scan`] runs decoration classification in parallel
//! - [`api`] exposes the error types
pub mod actions;
pub mod api;
pub mod oracle;
pub mod scan;
pub mod sim;

pub use actions::{Handler, handler_for, native_registry};
pub use api::{Result, RuntimeError};
pub use oracle::{BoundedField, OracleManager, RangeSight, SoundCue, SoundLog};
pub use scan::{DecorationScan, ScanHit};
pub use sim::{EventLog, LogEntry, LogEvent, SimSummary, Simulation, SimulationBuilder};
