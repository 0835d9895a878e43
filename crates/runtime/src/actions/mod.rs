//! Native action routines.
//!
//! Every routine the symbolic [`ActionKind`] set names has a native handler
//! here. [`native_registry`] binds them all under their `A_*` names so content
//! loaders can resolve state actions against it.

mod attack;
mod brain;
mod death;
mod flow;
mod heretic;
mod monster;
mod support;

use strum::IntoEnumIterator;
use thing_core::{ActionContext, ActionKind, ActionRegistry};

/// Plain function handler.
pub type Handler = fn(&mut ActionContext<'_, '_>);

/// Native routine for `kind`. `None` for the placeholder kinds that name no
/// routine.
pub fn handler_for(kind: ActionKind) -> Option<Handler> {
    use ActionKind as K;

    let handler: Handler = match kind {
        K::None | K::Opaque => return None,

        K::Look => monster::look,
        K::Chase => monster::chase,
        K::KeepChasing => monster::keep_chasing,
        K::RandomWalk => monster::random_walk,
        K::FaceTarget => monster::face,
        K::Stop => monster::stop,
        K::Hoof => monster::hoof,
        K::Metal => monster::metal,
        K::BabyMetal => monster::baby_metal,

        K::Pain => death::pain,
        K::Scream => death::scream,
        K::XScream => death::xscream,
        K::Fall => death::fall,
        K::PainDie => death::pain_die,
        K::KeenDie => death::keen_die,
        K::BossDeath => death::boss_death,
        K::Explode => death::explode,

        K::PosAttack => attack::pos_attack,
        K::SPosAttack => attack::spos_attack,
        K::CPosAttack => attack::cpos_attack,
        K::CPosRefire => attack::cpos_refire,
        K::TroopAttack => attack::troop_attack,
        K::SargAttack => attack::sarg_attack,
        K::HeadAttack => attack::head_attack,
        K::BruisAttack => attack::bruis_attack,
        K::SkullAttack => attack::skull_attack,
        K::PainAttack => attack::pain_attack,
        K::BspiAttack => attack::bspi_attack,
        K::SpidRefire => attack::spid_refire,
        K::CyberAttack => attack::cyber_attack,
        K::SkelMissile => attack::skel_missile,
        K::SkelWhoosh => attack::skel_whoosh,
        K::SkelFist => attack::skel_fist,
        K::Tracer => attack::tracer,
        K::FatRaise => attack::fat_raise,
        K::FatAttack1 => attack::fat_attack1,
        K::FatAttack2 => attack::fat_attack2,
        K::FatAttack3 => attack::fat_attack3,
        K::VileChase => attack::vile_chase,
        K::VileStart => attack::vile_start,
        K::VileTarget => attack::vile_target,
        K::VileAttack => attack::vile_attack,
        K::Fire => attack::fire,
        K::StartFire => attack::start_fire,
        K::FireCrackle => attack::fire_crackle,
        K::BetaSkullAttack => attack::beta_skull_attack,

        K::BrainAwake => brain::brain_awake,
        K::BrainPain => brain::brain_pain,
        K::BrainScream => brain::brain_scream,
        K::BrainExplode => brain::brain_explode,
        K::BrainDie => brain::brain_die,
        K::BrainSpit => brain::brain_spit,
        K::SpawnSound => brain::spawn_sound,
        K::SpawnFly => brain::spawn_fly,

        K::RandomJump => flow::random_jump,
        K::GenRefire => flow::gen_refire,
        K::HealthJump => flow::health_jump,
        K::CounterJump => flow::counter_jump,
        K::CounterSwitch => flow::counter_switch,
        K::SetCounter => flow::set_counter,
        K::TargetJump => flow::target_jump,
        K::JumpIfTargetInLos => flow::jump_if_target_in_los,
        K::CheckPlayerDone => flow::check_player_done,
        K::Jump => flow::jump,
        K::SetFlags => flow::set_flags,
        K::UnSetFlags => flow::unset_flags,
        K::MissileAttack => flow::missile_attack,
        K::MissileSpread => flow::missile_spread,
        K::CasingThrust => flow::casing_thrust,

        K::HticDrop => heretic::htic_drop,
        K::GenWizard => heretic::gen_wizard,
        K::Sor2DthLoop => heretic::sor2_dth_loop,
        K::Srcr1Attack => heretic::srcr1_attack,
        K::Srcr2Decide => heretic::srcr2_decide,
        K::SorcererRise => heretic::sorcerer_rise,
        K::MinotaurDecide => heretic::minotaur_decide,
        K::MinotaurAtk3 => heretic::minotaur_atk3,
        K::MinotaurCharge => heretic::minotaur_charge,
        K::WhirlwindSeek => heretic::whirlwind_seek,
        K::LichFireGrow => heretic::lich_fire_grow,
        K::ImpChargeAtk => heretic::imp_charge_atk,
        K::ImpDeath => heretic::imp_death,
        K::ImpXDeath1 => heretic::imp_xdeath1,
        K::ImpXDeath2 => heretic::imp_xdeath2,
        K::ImpExplode => heretic::imp_explode,
        K::SnakeAttack => heretic::snake_attack,
        K::SnakeAttack2 => heretic::snake_attack2,
    };
    Some(handler)
}

/// Registry holding every native routine under its `A_*` name.
pub fn native_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for kind in ActionKind::iter() {
        if let Some(handler) = handler_for(kind) {
            registry.register(kind.to_string(), handler);
        }
    }
    tracing::debug!(
        target: "runtime::actions",
        count = registry.len(),
        "native action registry built"
    );
    registry
}

#[cfg(test)]
mod tests {
    use thing_core::ActionCatalog;

    use super::*;

    #[test]
    fn every_named_kind_has_a_handler() {
        let named = ActionKind::iter()
            .filter(|kind| !matches!(kind, ActionKind::None | ActionKind::Opaque));
        for kind in named {
            assert!(handler_for(kind).is_some(), "{kind:?} has no handler");
        }
    }

    #[test]
    fn registry_resolves_kinds_by_name() {
        let registry = native_registry();
        let chase = registry.resolve("A_Chase").unwrap();
        assert_eq!(chase.kind, ActionKind::Chase);
        let los = registry.resolve("A_JumpIfTargetInLOS").unwrap();
        assert_eq!(los.kind, ActionKind::JumpIfTargetInLos);
        assert!(registry.resolve("A_Dance").is_none());
        assert!(registry.resolve("Opaque").is_none());
    }
}
