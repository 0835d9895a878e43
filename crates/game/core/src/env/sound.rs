use crate::world::ThingKey;

/// Receiver of sound cues. Playback is the host's business.
pub trait SoundSink: Send + Sync {
    fn start_sound(&self, origin: ThingKey, sound: &str);
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl SoundSink for Silence {
    fn start_sound(&self, _origin: ThingKey, _sound: &str) {}
}
