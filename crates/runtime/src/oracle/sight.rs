//! Distance-limited line of sight.
use thing_core::geom::fixed;
use thing_core::{Fixed, SightOracle, Thing};

/// Open arena sight: nothing occludes, but things farther apart than the
/// range cannot see each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSight {
    range: Fixed,
}

impl RangeSight {
    pub const DEFAULT_RANGE: i32 = 1024;

    pub fn new(range: i32) -> Self {
        Self {
            range: fixed(range),
        }
    }
}

impl Default for RangeSight {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RANGE)
    }
}

impl SightOracle for RangeSight {
    fn check_sight(&self, from: &Thing, to: &Thing) -> bool {
        from.pos.approx_distance(&to.pos) <= self.range
    }
}
