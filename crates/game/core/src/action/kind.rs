//! Symbolic action identifiers.

/// Closed set of action routines the engine knows by name.
///
/// Parsed from the content-facing `A_*` mnemonic. The static analyzer reasons
/// about these variants only; live behavior is supplied separately by handlers
/// in the action registry. Names that do not match a variant parse to
/// [`ActionKind::Opaque`]: the engine may still dispatch them, but the analyzer
/// treats them as having no branches and no effect on solidity.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// State carries no action.
    #[default]
    #[strum(disabled)]
    None,
    /// Action name outside this enum.
    #[strum(disabled)]
    Opaque,

    // ========================================================================
    // Targeting and movement
    // ========================================================================
    Look,
    Chase,
    KeepChasing,
    RandomWalk,
    FaceTarget,
    Stop,
    Hoof,
    Metal,
    BabyMetal,

    // ========================================================================
    // Death and pain
    // ========================================================================
    Pain,
    Scream,
    XScream,
    Fall,
    PainDie,
    KeenDie,
    BossDeath,
    Explode,

    // ========================================================================
    // Doom monster attacks
    // ========================================================================
    PosAttack,
    SPosAttack,
    CPosAttack,
    CPosRefire,
    TroopAttack,
    SargAttack,
    HeadAttack,
    BruisAttack,
    SkullAttack,
    PainAttack,
    BspiAttack,
    SpidRefire,
    CyberAttack,
    SkelMissile,
    SkelWhoosh,
    SkelFist,
    Tracer,
    FatRaise,
    FatAttack1,
    FatAttack2,
    FatAttack3,
    VileChase,
    VileStart,
    VileTarget,
    VileAttack,
    Fire,
    StartFire,
    FireCrackle,
    BetaSkullAttack,

    // ========================================================================
    // Boss brain
    // ========================================================================
    BrainAwake,
    BrainPain,
    BrainScream,
    BrainExplode,
    BrainDie,
    BrainSpit,
    SpawnSound,
    SpawnFly,

    // ========================================================================
    // Parameterized routines
    // ========================================================================
    RandomJump,
    GenRefire,
    HealthJump,
    CounterJump,
    CounterSwitch,
    SetCounter,
    TargetJump,
    #[strum(serialize = "JumpIfTargetInLOS")]
    JumpIfTargetInLos,
    CheckPlayerDone,
    Jump,
    SetFlags,
    UnSetFlags,
    MissileAttack,
    MissileSpread,
    CasingThrust,

    // ========================================================================
    // Heretic routines
    // ========================================================================
    HticDrop,
    GenWizard,
    Sor2DthLoop,
    Srcr1Attack,
    Srcr2Decide,
    SorcererRise,
    MinotaurDecide,
    MinotaurAtk3,
    MinotaurCharge,
    WhirlwindSeek,
    LichFireGrow,
    ImpChargeAtk,
    ImpDeath,
    ImpXDeath1,
    ImpXDeath2,
    ImpExplode,
    SnakeAttack,
    SnakeAttack2,
}

impl ActionKind {
    /// Parses an `A_*` mnemonic, falling back to [`ActionKind::Opaque`].
    pub fn from_name(name: &str) -> Self {
        name.strip_prefix("A_")
            .and_then(|rest| rest.parse().ok())
            .unwrap_or(Self::Opaque)
    }

    /// Routines that move the thing on their own when its template speed is
    /// nonzero.
    pub fn is_walker(self) -> bool {
        matches!(
            self,
            Self::Chase
                | Self::VileChase
                | Self::KeepChasing
                | Self::RandomWalk
                | Self::Hoof
                | Self::Metal
                | Self::BabyMetal
        )
    }

    /// Routines that clear solidity regardless of their arguments.
    pub fn always_removes_solid(self) -> bool {
        matches!(
            self,
            Self::Fall
                | Self::PainDie
                | Self::KeenDie
                | Self::HticDrop
                | Self::GenWizard
                | Self::SorcererRise
                | Self::ImpXDeath1
        )
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Opaque => f.write_str("Opaque"),
            named => {
                let name: &'static str = named.into();
                write!(f, "A_{name}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_names() {
        assert_eq!(ActionKind::from_name("A_Chase"), ActionKind::Chase);
        assert_eq!(
            ActionKind::from_name("A_JumpIfTargetInLOS"),
            ActionKind::JumpIfTargetInLos
        );
        assert_eq!(ActionKind::from_name("A_UnSetFlags"), ActionKind::UnSetFlags);
        assert_eq!(ActionKind::CounterSwitch.to_string(), "A_CounterSwitch");
    }

    #[test]
    fn unknown_names_are_opaque() {
        assert_eq!(ActionKind::from_name("A_Dance"), ActionKind::Opaque);
        assert_eq!(ActionKind::from_name("Chase"), ActionKind::Opaque);
        assert_eq!(ActionKind::from_name("None"), ActionKind::Opaque);
    }

    #[test]
    fn placeholder_kinds_display_without_prefix() {
        assert_eq!(ActionKind::None.to_string(), "None");
        assert_eq!(ActionKind::Opaque.to_string(), "Opaque");
        assert_eq!(format!("{}", ActionKind::default()), "None");
    }

    #[test]
    fn walker_and_solid_families_are_disjoint() {
        use strum::IntoEnumIterator;
        for kind in ActionKind::iter() {
            assert!(!(kind.is_walker() && kind.always_removes_solid()), "{kind:?}");
        }
    }
}
