//! Name-to-handler registry for live action dispatch.

use std::collections::HashMap;
use std::fmt;

use crate::action::{ActionContext, ActionId, ActionKind, ActionRef};

/// Native implementation of one action routine.
pub trait ActionHandler: Send + Sync {
    fn call(&self, ctx: &mut ActionContext<'_, '_>);
}

impl<F> ActionHandler for F
where
    F: Fn(&mut ActionContext<'_, '_>) + Send + Sync,
{
    fn call(&self, ctx: &mut ActionContext<'_, '_>) {
        self(ctx)
    }
}

/// Action-name lookup used by content loaders to bind state actions.
pub trait ActionCatalog {
    /// Returns the binding for `name`, or `None` if no routine is registered.
    fn resolve(&self, name: &str) -> Option<ActionRef>;
}

struct Entry {
    name: String,
    kind: ActionKind,
    handler: Box<dyn ActionHandler>,
}

/// Registry populated once at startup.
#[derive(Default)]
pub struct ActionRegistry {
    by_name: HashMap<String, ActionId>,
    entries: Vec<Entry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous handler with
    /// the same name but keeping its id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) -> ActionRef {
        let name = name.into();
        let kind = ActionKind::from_name(&name);

        if let Some(&id) = self.by_name.get(&name) {
            self.entries[id.index()].handler = Box::new(handler);
            return ActionRef { id, kind };
        }

        let id = ActionId(self.entries.len() as u16);
        self.by_name.insert(name.clone(), id);
        self.entries.push(Entry {
            name,
            kind,
            handler: Box::new(handler),
        });
        ActionRef { id, kind }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self, id: ActionId) -> Option<&str> {
        self.entries.get(id.index()).map(|entry| entry.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Runs the handler bound to `action`. Unbound ids are a no-op.
    pub fn dispatch(&self, action: ActionRef, ctx: &mut ActionContext<'_, '_>) {
        match self.entries.get(action.id.index()) {
            Some(entry) => entry.handler.call(ctx),
            None => tracing::debug!(
                target: "core::actions",
                action = %action.kind,
                "no handler bound, skipping"
            ),
        }
    }
}

impl ActionCatalog for ActionRegistry {
    fn resolve(&self, name: &str) -> Option<ActionRef> {
        let id = *self.by_name.get(name)?;
        let kind = self.entries[id.index()].kind;
        Some(ActionRef { id, kind })
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field(
                "actions",
                &self.entries.iter().map(|e| &e.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ActionContext<'_, '_>) {}

    fn other(_: &mut ActionContext<'_, '_>) {}

    #[test]
    fn register_binds_kind_from_name() {
        let mut registry = ActionRegistry::new();
        let chase = registry.register("A_Chase", noop);
        let custom = registry.register("A_Wiggle", noop);

        assert_eq!(chase.kind, ActionKind::Chase);
        assert_eq!(custom.kind, ActionKind::Opaque);
        assert_eq!(registry.resolve("A_Chase"), Some(chase));
        assert_eq!(registry.resolve("A_Missing"), None);
        assert_eq!(registry.name(custom.id), Some("A_Wiggle"));
    }

    #[test]
    fn reregistering_keeps_the_id() {
        let mut registry = ActionRegistry::new();
        let first = registry.register("A_Look", noop);
        let second = registry.register("A_Look", other);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }
}
