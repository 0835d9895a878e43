//! State definitions shared by live simulation and static analysis.
//!
//! A [`State`] is an immutable frame of a thing's behavior script: how long
//! it lasts, which action fires on entry, and where control goes next. All
//! states live in one [`StateTable`] built at content-load time and addressed
//! by [`StateNum`] for the remainder of the process.
mod args;
mod error;
mod table;

pub use args::{StateArg, StateArgs};
pub use error::StateError;
pub use table::{StateTable, StateTableBuilder, WellKnownState};

use std::fmt;

use crate::action::{ActionKind, ActionRef};

/// Index of a state in the global [`StateTable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateNum(pub u32);

impl StateNum {
    /// Sentinel successor meaning "remove the thing from the world".
    pub const NULL: Self = Self(0);

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the state `count` slots after this one, if it fits in `u32`.
    #[inline]
    pub fn offset(self, count: u32) -> Option<Self> {
        self.0.checked_add(count).map(Self)
    }
}

impl fmt::Display for StateNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {}", self.0)
    }
}

/// One frame of a thing's behavior script.
///
/// `tics < 0` marks a terminal state: the thing freezes there and per-tick
/// advancement stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    /// Unique mnemonic (`S_PLAY_RUN1`), used for label resolution.
    pub name: String,
    /// Sprite lump prefix. Carried for completeness, never analyzed.
    pub sprite: String,
    pub frame: u8,
    pub tics: i32,
    pub action: Option<ActionRef>,
    pub args: StateArgs,
    pub next: StateNum,
    /// DeHackEd parameter slots (`A_RandomJump` reads target and chance here).
    pub misc1: i32,
    pub misc2: i32,
    /// Legacy DeHackEd frame number, if the state has one.
    pub dehnum: Option<i32>,
}

impl State {
    /// Creates a state with no action that loops to `next`.
    pub fn new(name: impl Into<String>, tics: i32, next: StateNum) -> Self {
        Self {
            name: name.into(),
            sprite: String::from("TNT1"),
            frame: 0,
            tics,
            action: None,
            args: StateArgs::new(),
            next,
            misc1: 0,
            misc2: 0,
            dehnum: None,
        }
    }

    /// The canonical null state stored at index 0 of every table.
    pub fn null() -> Self {
        Self::new("S_NULL", -1, StateNum::NULL)
    }

    pub fn with_action(mut self, action: ActionRef) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_args(mut self, args: StateArgs) -> Self {
        self.args = args;
        self
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>, frame: u8) -> Self {
        self.sprite = sprite.into();
        self.frame = frame;
        self
    }

    pub fn with_misc(mut self, misc1: i32, misc2: i32) -> Self {
        self.misc1 = misc1;
        self.misc2 = misc2;
        self
    }

    pub fn with_dehnum(mut self, dehnum: i32) -> Self {
        self.dehnum = Some(dehnum);
        self
    }

    /// Returns true if per-tick advancement halts in this state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.tics < 0
    }

    /// Symbolic kind of the entry action (`Opaque` when unrecognized, `None` when absent).
    #[inline]
    pub fn action_kind(&self) -> ActionKind {
        self.action.map_or(ActionKind::None, |action| action.kind)
    }
}
