//! Action catalog for analysis-only loads.

use thing_core::{ActionCatalog, ActionKind, ActionRef};

/// Accepts every action name the analyzer recognizes, binding it to no live
/// handler.
///
/// Tables loaded through this catalog can be analyzed but dispatching their
/// actions does nothing. Names outside the recognized set are rejected just
/// like a live registry rejects unregistered names.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCatalog;

impl ActionCatalog for StaticCatalog {
    fn resolve(&self, name: &str) -> Option<ActionRef> {
        match ActionKind::from_name(name) {
            ActionKind::None | ActionKind::Opaque => None,
            kind => Some(ActionRef::of_kind(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thing_core::ActionId;

    #[test]
    fn recognized_names_bind_unbound() {
        let chase = StaticCatalog.resolve("A_Chase").unwrap();
        assert_eq!(chase.kind, ActionKind::Chase);
        assert_eq!(chase.id, ActionId::UNBOUND);

        assert_eq!(
            StaticCatalog.resolve("A_JumpIfTargetInLOS").map(|a| a.kind),
            Some(ActionKind::JumpIfTargetInLos)
        );
        assert!(StaticCatalog.resolve("A_Wiggle").is_none());
        assert!(StaticCatalog.resolve("Chase").is_none());
    }
}
