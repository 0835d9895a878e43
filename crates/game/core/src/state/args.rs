//! Static argument lists attached to states.
//!
//! Arguments are partly resolved at content-load time (literals, global state
//! names, flag lists) and partly bound late against a thing template
//! (template-relative labels such as `See` or a custom label). Accessors never
//! fail: a malformed or unresolvable argument reads as "absent" and the caller
//! skips the effect.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{StateError, StateNum, StateTable};
use crate::thing::{ThingFlagSet, ThingTemplate};

/// One static argument of a state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateArg {
    /// Integer literal.
    Int(i32),
    /// Global state reference, resolved by name when content was loaded.
    State(StateNum),
    /// Template-relative label, resolved against the thing's template on use.
    Label(String),
    /// Parsed thing flag list.
    Flags(ThingFlagSet),
    /// Reference the loader could not resolve. Always reads as absent.
    Unresolved(String),
}

/// Fixed-capacity argument list of one state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateArgs(ArrayVec<StateArg, { GameConfig::MAX_ARGS }>);

impl StateArgs {
    pub fn new() -> Self {
        Self(ArrayVec::new())
    }

    /// Builds an argument list, rejecting lists longer than a frame can hold.
    pub fn from_args(
        name: &str,
        args: impl IntoIterator<Item = StateArg>,
    ) -> Result<Self, StateError> {
        let args: Vec<StateArg> = args.into_iter().collect();
        if args.len() > GameConfig::MAX_ARGS {
            return Err(StateError::TooManyArgs {
                name: name.to_owned(),
                count: args.len(),
                max: GameConfig::MAX_ARGS,
            });
        }
        Ok(Self(args.into_iter().collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StateArg> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateArg> {
        self.0.iter()
    }

    /// Reads argument `index` as an integer, falling back to `default`.
    pub fn int(&self, index: usize, default: i32) -> i32 {
        match self.0.get(index) {
            Some(StateArg::Int(value)) => *value,
            _ => default,
        }
    }

    /// Reads argument `index` as a state reference.
    ///
    /// Integer literals are interpreted as DeHackEd frame numbers. The result
    /// is `None` when the argument is missing, malformed, or names a state the
    /// table does not hold.
    pub fn state(
        &self,
        index: usize,
        template: &ThingTemplate,
        table: &StateTable,
    ) -> Option<StateNum> {
        let resolved = match self.0.get(index)? {
            StateArg::State(num) => Some(*num),
            StateArg::Label(label) => template.label(label),
            StateArg::Int(dehnum) => table.for_deh_num(*dehnum),
            StateArg::Flags(_) | StateArg::Unresolved(_) => None,
        }?;
        table.contains(resolved).then_some(resolved)
    }

    /// Reads argument `index` as a flag list.
    pub fn flags(&self, index: usize) -> Option<&ThingFlagSet> {
        match self.0.get(index) {
            Some(StateArg::Flags(flags)) => Some(flags),
            _ => None,
        }
    }
}

impl FromIterator<StateArg> for StateArgs {
    /// Collects arguments, silently dropping anything past the frame capacity.
    fn from_iter<I: IntoIterator<Item = StateArg>>(iter: I) -> Self {
        Self(iter.into_iter().take(GameConfig::MAX_ARGS).collect())
    }
}
