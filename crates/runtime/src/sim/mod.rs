//! Deterministic tic loop over a live world.
//!
//! A [`Simulation`] owns everything a run needs: loaded content, the native
//! action registry, the oracles, the engine config and the world itself.
//! Each tic first moves things by their momentum, then advances every
//! thing's state, then drains what happened into the [`EventLog`].
mod log;
mod physics;

use std::collections::BTreeMap;

use serde::Serialize;
use thing_content::ContentFactory;
use thing_core::{
    ActionRegistry, Content, DamageOutcome, GameConfig, StateMachine, StateNum, ThingKey, Vec3,
    World,
};

pub use log::{EventLog, LogEntry, LogEvent};

use crate::actions::native_registry;
use crate::api::{Result, RuntimeError};
use crate::oracle::OracleManager;

/// Snapshot of a run, for reports and replay comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub tic: u64,
    pub seed: u64,
    pub things: usize,
    /// Live things per template name.
    pub population: BTreeMap<String, usize>,
    pub kills: usize,
    pub specials: usize,
    pub checksum: String,
}

pub struct Simulation {
    content: Content,
    actions: ActionRegistry,
    oracles: OracleManager,
    config: GameConfig,
    world: World,
    log: EventLog,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Simulation over the bundled content pack and its config.
    pub fn embedded() -> Result<Self> {
        Self::builder().build()
    }

    pub fn from_factory(factory: &ContentFactory) -> Result<Self> {
        Self::builder().factory(factory.clone()).build()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Places a thing of the named template at `pos`, in its spawn state.
    pub fn spawn(&mut self, name: &str, pos: Vec3) -> Result<ThingKey> {
        let (id, template) = self
            .content
            .find_template(name)
            .ok_or_else(|| RuntimeError::UnknownTemplate(name.to_owned()))?;
        let key = self
            .world
            .spawn(id, template, &self.content.states, pos)?;
        tracing::debug!(target: "runtime::sim", template = name, "spawned");
        Ok(key)
    }

    /// Forces `key` into `state`, running its entry action. Returns false if
    /// the thing is gone afterwards.
    pub fn set_state(&mut self, key: ThingKey, state: StateNum) -> Result<bool> {
        let machine = StateMachine::new(
            &self.content,
            &self.actions,
            self.oracles.as_game_env(),
            &self.config,
        );
        Ok(machine.set_state(&mut self.world, key, state)?)
    }

    /// Damages `target` from outside the world, e.g. a scripted trigger.
    pub fn damage(&mut self, target: ThingKey, amount: i32) -> DamageOutcome {
        let machine = StateMachine::new(
            &self.content,
            &self.actions,
            self.oracles.as_game_env(),
            &self.config,
        );
        machine.damage(&mut self.world, target, None, amount)
    }

    /// Advances the world by one tic.
    pub fn run_tic(&mut self) -> Result<()> {
        let tic = self.world.tic();
        {
            let machine = StateMachine::new(
                &self.content,
                &self.actions,
                self.oracles.as_game_env(),
                &self.config,
            );
            physics::advance(&machine, &mut self.world);
            machine.run_tic(&mut self.world)?;
        }
        let sounds = self.oracles.sound().drain();
        self.log
            .absorb(tic, &self.content, &mut self.world, sounds);
        tracing::trace!(target: "runtime::sim", tic, things = self.world.len(), "tic complete");
        Ok(())
    }

    pub fn run(&mut self, tics: u64) -> Result<()> {
        for _ in 0..tics {
            self.run_tic()?;
        }
        tracing::debug!(
            target: "runtime::sim",
            tic = self.world.tic(),
            things = self.world.len(),
            events = self.log.len(),
            "run complete"
        );
        Ok(())
    }

    /// Hex SHA-256 of the world state.
    pub fn checksum(&self) -> String {
        hex::encode(self.world.checksum())
    }

    pub fn summary(&self) -> SimSummary {
        let mut population = BTreeMap::new();
        for (_, thing) in self.world.iter() {
            if let Some(template) = self.content.templates.get(thing.template) {
                *population.entry(template.name.clone()).or_insert(0) += 1;
            }
        }
        SimSummary {
            tic: self.world.tic(),
            seed: self.config.seed,
            things: self.world.len(),
            population,
            kills: self
                .log
                .count(|event| matches!(event, LogEvent::Killed { .. })),
            specials: self
                .log
                .count(|event| matches!(event, LogEvent::Special { .. })),
            checksum: self.checksum(),
        }
    }
}

/// Builder for [`Simulation`] with flexible configuration.
pub struct SimulationBuilder {
    factory: ContentFactory,
    config: Option<GameConfig>,
    seed: Option<u64>,
    oracles: Option<OracleManager>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self {
            factory: ContentFactory::embedded(),
            config: None,
            seed: None,
            oracles: None,
        }
    }

    /// Content source. Defaults to the embedded pack.
    pub fn factory(mut self, factory: ContentFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Overrides the config the factory would load.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides only the seed of whichever config is used.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    pub fn build(self) -> Result<Simulation> {
        let actions = native_registry();
        let content = self.factory.load_content(&actions)?;
        let mut config = match self.config {
            Some(config) => config,
            None => self.factory.load_config()?,
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        tracing::info!(
            target: "runtime::sim",
            states = content.states.len(),
            templates = content.templates.len(),
            seed = config.seed,
            compat = ?config.compat,
            "simulation ready"
        );
        Ok(Simulation {
            world: World::new(&config),
            content,
            actions,
            oracles: self.oracles.unwrap_or_default(),
            config,
            log: EventLog::new(),
        })
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
