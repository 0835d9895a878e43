//! The global, immutable state table.

use std::collections::HashMap;

use crate::state::{State, StateArg, StateError, StateNum};

/// Hardcoded successors used by scripted boss sequences.
///
/// Native actions of several built-in creatures jump to fixed states that are
/// looked up by mnemonic at use time. Content packs that omit a creature simply
/// do not define these names, in which case the jump resolves to nothing.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
pub enum WellKnownState {
    #[strum(serialize = "S_VILE_HEAL1")]
    VileHeal1,
    #[strum(serialize = "S_SOR2_DIE4")]
    Sor2Die4,
    #[strum(serialize = "S_SRCR1_ATK4")]
    Srcr1Atk4,
    #[strum(serialize = "S_SOR2_TELE1")]
    Sor2Tele1,
    #[strum(serialize = "S_MNTR_ATK4_1")]
    MntrAtk4_1,
    #[strum(serialize = "S_MNTR_ATK3_1")]
    MntrAtk3_1,
    #[strum(serialize = "S_MNTR_ATK3_4")]
    MntrAtk3_4,
    #[strum(serialize = "S_LICHFX3_4")]
    LichFx3_4,
    #[strum(serialize = "S_IMP_XCRASH1")]
    ImpXCrash1,
    #[strum(serialize = "S_BRAINEXPLODE1")]
    BrainExplode1,
}

/// Immutable, globally indexed array of state definitions.
///
/// # Invariants
///
/// - Index 0 holds the null state.
/// - Every `next` index is inside the table.
/// - Names and DeHackEd numbers are unique.
#[derive(Clone, Debug, Default)]
pub struct StateTable {
    states: Vec<State>,
    by_name: HashMap<String, StateNum>,
    by_dehnum: HashMap<i32, StateNum>,
    label_args: Vec<(StateNum, usize)>,
}

impl StateTable {
    /// Validates and indexes a list of states. `states[0]` must be the null state.
    pub fn new(states: Vec<State>) -> Result<Self, StateError> {
        if states.is_empty() {
            return Err(StateError::EmptyTable);
        }

        let len = states.len();
        let mut by_name = HashMap::with_capacity(len);
        let mut by_dehnum = HashMap::new();
        let mut label_args = Vec::new();

        for (index, state) in states.iter().enumerate() {
            let num = StateNum(index as u32);
            if state.next.index() >= len {
                return Err(StateError::NextOutOfRange {
                    name: state.name.clone(),
                    next: state.next,
                    len,
                });
            }
            if by_name.insert(state.name.clone(), num).is_some() {
                return Err(StateError::DuplicateName(state.name.clone()));
            }
            if let Some(dehnum) = state.dehnum
                && by_dehnum.insert(dehnum, num).is_some()
            {
                return Err(StateError::DuplicateDehNum(dehnum));
            }
            for (arg, value) in state.args.iter().enumerate() {
                if matches!(value, StateArg::Label(_)) {
                    label_args.push((num, arg));
                }
            }
        }

        Ok(Self {
            states,
            by_name,
            by_dehnum,
            label_args,
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn contains(&self, num: StateNum) -> bool {
        num.index() < self.states.len()
    }

    #[inline]
    pub fn get(&self, num: StateNum) -> Option<&State> {
        self.states.get(num.index())
    }

    /// Like [`StateTable::get`] but reports a missing state as an error.
    pub fn state(&self, num: StateNum) -> Result<&State, StateError> {
        self.get(num).ok_or(StateError::UnknownState(num))
    }

    /// Looks a state up by mnemonic.
    pub fn find(&self, name: &str) -> Option<StateNum> {
        self.by_name.get(name).copied()
    }

    /// Looks a state up by its legacy DeHackEd frame number.
    pub fn for_deh_num(&self, dehnum: i32) -> Option<StateNum> {
        self.by_dehnum.get(&dehnum).copied()
    }

    /// Resolves a hardcoded boss-sequence successor.
    pub fn well_known(&self, state: WellKnownState) -> Option<StateNum> {
        self.find(&state.to_string())
    }

    /// Every `(state, argument index)` holding a template-relative label.
    pub fn label_args(&self) -> &[(StateNum, usize)] {
        &self.label_args
    }

    /// Iterates over every state with its index.
    pub fn iter(&self) -> impl Iterator<Item = (StateNum, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateNum(index as u32), state))
    }
}

/// Incremental table construction used by content loaders and tests.
///
/// The builder starts with the null state already at index 0, so the first
/// pushed state receives `StateNum(1)`.
#[derive(Clone, Debug)]
pub struct StateTableBuilder {
    states: Vec<State>,
}

impl StateTableBuilder {
    pub fn new() -> Self {
        Self {
            states: vec![State::null()],
        }
    }

    /// Appends a state and returns the index it will occupy.
    pub fn push(&mut self, state: State) -> StateNum {
        let num = self.next_num();
        self.states.push(state);
        num
    }

    /// Index the next pushed state will receive.
    pub fn next_num(&self) -> StateNum {
        StateNum(self.states.len() as u32)
    }

    pub fn build(self) -> Result<StateTable, StateError> {
        StateTable::new(self.states)
    }
}

impl Default for StateTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
