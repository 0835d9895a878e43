//! Action identifiers, the live dispatch registry and the handler context.
//!
//! Two views of an action coexist:
//!
//! - [`ActionKind`] is the symbolic identity the static analyzer reasons about.
//! - [`ActionRegistry`] maps names to native [`ActionHandler`]s for live
//!   simulation.
//!
//! A state stores an [`ActionRef`] carrying both, bound once at load time.
mod context;
mod kind;
mod registry;

pub use context::ActionContext;
pub use kind::ActionKind;
pub use registry::{ActionCatalog, ActionHandler, ActionRegistry};

/// Index of a handler in the [`ActionRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u16);

impl ActionId {
    /// Id bound to no handler. Dispatching it is a no-op.
    pub const UNBOUND: Self = Self(u16::MAX);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Action attached to a state: live handler id plus symbolic kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRef {
    pub id: ActionId,
    pub kind: ActionKind,
}

impl ActionRef {
    /// Reference with a known kind but no live handler, for analysis-only
    /// tables.
    pub const fn of_kind(kind: ActionKind) -> Self {
        Self {
            id: ActionId::UNBOUND,
            kind,
        }
    }
}
