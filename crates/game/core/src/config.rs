/// Historical behavior selector for actions with two recorded variants.
///
/// Branch resolution always uses the modern rules; only a handful of live
/// actions (corpse resurrection sizing) consult this flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CompatMode {
    /// Current engine behavior.
    #[default]
    Modern,
    /// Bit-exact behavior of the original releases.
    Vanilla,
}

/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Base seed for every random roll in a session (replay key).
    pub seed: u64,

    /// Compatibility flavor for actions with two historical behaviors.
    pub compat: CompatMode,

    /// Upper bound on simultaneously live things.
    pub max_things: usize,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Number of per-thing scratch counters usable by counter actions.
    pub const MAX_COUNTERS: usize = 8;
    /// Maximum number of static arguments attached to one state.
    pub const MAX_ARGS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5EED;
    pub const DEFAULT_MAX_THINGS: usize = 8192;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            compat: CompatMode::Modern,
            max_things: Self::DEFAULT_MAX_THINGS,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    /// Returns true when bit-exact historical behavior is requested.
    pub fn is_vanilla(&self) -> bool {
        self.compat == CompatMode::Vanilla
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
