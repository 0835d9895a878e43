use crate::geom::Vec3;
use crate::world::Thing;

/// Position validation for movement (`P_TryMove`).
pub trait MoveOracle: Send + Sync {
    /// Returns true when `thing` may stand at `to`. The engine commits the
    /// move itself.
    fn try_move(&self, thing: &Thing, to: Vec3) -> bool;
}

/// Unbounded empty field: every move succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl MoveOracle for OpenField {
    fn try_move(&self, _thing: &Thing, _to: Vec3) -> bool {
        true
    }
}
