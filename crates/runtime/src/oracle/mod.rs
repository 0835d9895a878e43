//! Runtime implementations of the core collaborator traits.
//!
//! The simulation host bundles them into an [`OracleManager`] so it can build
//! [`thing_core::GameEnv`] snapshots on demand. All of them are immutable or
//! internally synchronized, so one manager can back many state machines.
mod movement;
mod sight;
mod sound;

use std::sync::Arc;

use thing_core::{Env, GameEnv, PcgRng};

pub use movement::BoundedField;
pub use sight::RangeSight;
pub use sound::{SoundCue, SoundLog};

/// Manages all oracle implementations and provides unified access.
#[derive(Clone, Debug)]
pub struct OracleManager {
    pub(crate) sight: Arc<RangeSight>,
    pub(crate) movement: Arc<BoundedField>,
    pub(crate) sound: Arc<SoundLog>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(sight: RangeSight, movement: BoundedField) -> Self {
        Self {
            sight: Arc::new(sight),
            movement: Arc::new(movement),
            sound: Arc::new(SoundLog::default()),
            rng: PcgRng,
        }
    }

    /// Converts the oracle manager into a `GameEnv` for thing-core.
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::new(
            self.sight.as_ref(),
            self.movement.as_ref(),
            self.sound.as_ref(),
            &self.rng,
        )
        .as_game_env()
    }

    pub fn sound(&self) -> &SoundLog {
        &self.sound
    }

    pub fn movement(&self) -> &BoundedField {
        &self.movement
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::new(RangeSight::default(), BoundedField::default())
    }
}
