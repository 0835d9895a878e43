use crate::world::Thing;

/// Line-of-sight test between two things.
///
/// Map geometry lives outside the engine core; hosts plug in a BSP or
/// blockmap walk here.
pub trait SightOracle: Send + Sync {
    fn check_sight(&self, from: &Thing, to: &Thing) -> bool;
}

/// Every pair of things can see each other.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSight;

impl SightOracle for OpenSight {
    fn check_sight(&self, _from: &Thing, _to: &Thing) -> bool {
        true
    }
}
