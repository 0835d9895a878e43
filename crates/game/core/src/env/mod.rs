//! Collaborator traits consumed by live action dispatch.
//!
//! Sight, movement, sound and randomness are supplied by the host. The
//! [`Env`] aggregate bundles them so the state machine can hand one value to
//! every action without hard coupling to concrete implementations.
mod movement;
mod rng;
mod sight;
mod sound;

pub use movement::{MoveOracle, OpenField};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use sight::{OpenSight, SightOracle};
pub use sound::{Silence, SoundSink};

/// Aggregates the collaborators required by live actions.
pub struct Env<'a, S, M, N, R>
where
    S: SightOracle + ?Sized,
    M: MoveOracle + ?Sized,
    N: SoundSink + ?Sized,
    R: RngOracle + ?Sized,
{
    sight: &'a S,
    movement: &'a M,
    sound: &'a N,
    rng: &'a R,
}

impl<S, M, N, R> Clone for Env<'_, S, M, N, R>
where
    S: SightOracle + ?Sized,
    M: MoveOracle + ?Sized,
    N: SoundSink + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, M, N, R> Copy for Env<'_, S, M, N, R>
where
    S: SightOracle + ?Sized,
    M: MoveOracle + ?Sized,
    N: SoundSink + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> =
    Env<'a, dyn SightOracle + 'a, dyn MoveOracle + 'a, dyn SoundSink + 'a, dyn RngOracle + 'a>;

impl<'a, S, M, N, R> Env<'a, S, M, N, R>
where
    S: SightOracle + ?Sized,
    M: MoveOracle + ?Sized,
    N: SoundSink + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(sight: &'a S, movement: &'a M, sound: &'a N, rng: &'a R) -> Self {
        Self {
            sight,
            movement,
            sound,
            rng,
        }
    }

    pub fn sight(&self) -> &'a S {
        self.sight
    }

    pub fn movement(&self) -> &'a M {
        self.movement
    }

    pub fn sound(&self) -> &'a N {
        self.sound
    }

    pub fn rng(&self) -> &'a R {
        self.rng
    }
}

impl<'a, S, M, N, R> Env<'a, S, M, N, R>
where
    S: SightOracle + 'a,
    M: MoveOracle + 'a,
    N: SoundSink + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into the trait-object based [`GameEnv`].
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let sight: &'a dyn SightOracle = self.sight;
        let movement: &'a dyn MoveOracle = self.movement;
        let sound: &'a dyn SoundSink = self.sound;
        let rng: &'a dyn RngOracle = self.rng;
        Env::new(sight, movement, sound, rng)
    }
}

/// Open-field environment: everything visible, every move allowed, no sound.
pub fn open_env() -> GameEnv<'static> {
    static SIGHT: OpenSight = OpenSight;
    static FIELD: OpenField = OpenField;
    static SILENCE: Silence = Silence;
    static RNG: PcgRng = PcgRng;
    let sight: &'static dyn SightOracle = &SIGHT;
    let movement: &'static dyn MoveOracle = &FIELD;
    let sound: &'static dyn SoundSink = &SILENCE;
    let rng: &'static dyn RngOracle = &RNG;
    Env::new(sight, movement, sound, rng)
}
