use bitflags::bitflags;

use crate::error::ContentError;

bitflags! {
    /// Primary thing flags. Bit values match the classic `MF_*` layout so
    /// DeHackEd-style numeric flag fields keep their meaning.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ThingFlags: u32 {
        const SPECIAL      = 0x0000_0001;
        const SOLID        = 0x0000_0002;
        const SHOOTABLE    = 0x0000_0004;
        const NOSECTOR     = 0x0000_0008;
        const NOBLOCKMAP   = 0x0000_0010;
        const AMBUSH       = 0x0000_0020;
        const JUSTHIT      = 0x0000_0040;
        const JUSTATTACKED = 0x0000_0080;
        const NOGRAVITY    = 0x0000_0200;
        const DROPOFF      = 0x0000_0400;
        const PICKUP       = 0x0000_0800;
        const NOCLIP       = 0x0000_1000;
        const SLIDE        = 0x0000_2000;
        const FLOAT        = 0x0000_4000;
        const TELEPORT     = 0x0000_8000;
        const MISSILE      = 0x0001_0000;
        const DROPPED      = 0x0002_0000;
        const SHADOW       = 0x0004_0000;
        const NOBLOOD      = 0x0008_0000;
        const CORPSE       = 0x0010_0000;
        const INFLOAT      = 0x0020_0000;
        const COUNTKILL    = 0x0040_0000;
        const COUNTITEM    = 0x0080_0000;
        const SKULLFLY     = 0x0100_0000;
        const FRIEND       = 0x4000_0000;
    }
}

bitflags! {
    /// Extended thing flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ThingFlags2: u32 {
        const INVULNERABLE = 1 << 0;
        const PUSHABLE     = 1 << 1;
        const BOSS         = 1 << 2;
        const DORMANT      = 1 << 3;
        const FOOTCLIP     = 1 << 4;
    }
}

/// Both flag words of a thing, as carried by templates, live things and
/// flag-list action arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThingFlagSet {
    pub flags: ThingFlags,
    pub flags2: ThingFlags2,
}

impl ThingFlagSet {
    pub const fn new(flags: ThingFlags, flags2: ThingFlags2) -> Self {
        Self { flags, flags2 }
    }

    pub const fn empty() -> Self {
        Self::new(ThingFlags::empty(), ThingFlags2::empty())
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.flags2.is_empty()
    }

    /// Parses a flag list such as `"SOLID|SHOOTABLE"` or `"MF_NOBLOCKMAP, PUSHABLE"`.
    ///
    /// Tokens are separated by `|`, `+`, `,` or whitespace, are matched
    /// case-insensitively, and may carry an `MF_`/`MF2_` prefix. Each token is
    /// looked up in the primary word first, then in the extended word.
    pub fn parse(input: &str) -> Result<Self, ContentError> {
        let mut set = Self::empty();
        let tokens = input
            .split(|c: char| c == '|' || c == '+' || c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());

        for token in tokens {
            let upper = token.to_ascii_uppercase();
            let name = upper
                .strip_prefix("MF2_")
                .or_else(|| upper.strip_prefix("MF_"))
                .unwrap_or(&upper);

            if let Some(flag) = ThingFlags::from_name(name) {
                set.flags |= flag;
            } else if let Some(flag) = ThingFlags2::from_name(name) {
                set.flags2 |= flag;
            } else {
                return Err(ContentError::UnknownFlag(token.to_owned()));
            }
        }

        Ok(set)
    }

    pub fn contains(&self, other: &ThingFlagSet) -> bool {
        self.flags.contains(other.flags) && self.flags2.contains(other.flags2)
    }

    pub fn intersects(&self, other: &ThingFlagSet) -> bool {
        self.flags.intersects(other.flags) || self.flags2.intersects(other.flags2)
    }

    pub fn insert(&mut self, other: &ThingFlagSet) {
        self.flags.insert(other.flags);
        self.flags2.insert(other.flags2);
    }

    pub fn remove(&mut self, other: &ThingFlagSet) {
        self.flags.remove(other.flags);
        self.flags2.remove(other.flags2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixes_both_words() {
        let set = ThingFlagSet::parse("SOLID|shootable, MF2_PUSHABLE + MF_NOBLOCKMAP").unwrap();
        assert_eq!(
            set.flags,
            ThingFlags::SOLID | ThingFlags::SHOOTABLE | ThingFlags::NOBLOCKMAP
        );
        assert_eq!(set.flags2, ThingFlags2::PUSHABLE);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = ThingFlagSet::parse("SOLID|WOBBLY").unwrap_err();
        assert_eq!(err, ContentError::UnknownFlag("WOBBLY".into()));
    }

    #[test]
    fn empty_input_is_empty_set() {
        assert!(ThingFlagSet::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn insert_and_remove_touch_both_words() {
        let mut set = ThingFlagSet::new(ThingFlags::SOLID, ThingFlags2::BOSS);
        let change = ThingFlagSet::new(ThingFlags::NOCLIP, ThingFlags2::PUSHABLE);
        set.insert(&change);
        assert!(set.contains(&change));
        set.remove(&ThingFlagSet::new(ThingFlags::SOLID, ThingFlags2::BOSS));
        assert_eq!(set, change);
    }
}
