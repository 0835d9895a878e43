//! Recording sound sink.
use std::sync::{Mutex, PoisonError};

use thing_core::{SoundSink, ThingKey};

/// One sound cue started by a thing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundCue {
    pub origin: ThingKey,
    pub sound: String,
}

/// Collects cues until the host drains them.
#[derive(Debug, Default)]
pub struct SoundLog {
    cues: Mutex<Vec<SoundCue>>,
}

impl SoundLog {
    /// Takes every cue recorded since the last call, oldest first.
    pub fn drain(&self) -> Vec<SoundCue> {
        let mut cues = self.cues.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *cues)
    }
}

impl SoundSink for SoundLog {
    fn start_sound(&self, origin: ThingKey, sound: &str) {
        tracing::trace!(target: "runtime::sound", sound, "cue");
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SoundCue {
                origin,
                sound: sound.to_owned(),
            });
    }
}
