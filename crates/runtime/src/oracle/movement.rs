//! Arena bounds served through [`thing_core::MoveOracle`].
use thing_core::geom::fixed;
use thing_core::{Fixed, MoveOracle, Thing, Vec3};

/// Square, wall-less arena centered on the origin.
///
/// A move is allowed when the thing's bounding box stays inside the arena
/// and its feet stay above the floor at height zero. Things do not block
/// each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedField {
    half_extent: Fixed,
}

impl BoundedField {
    pub const DEFAULT_HALF_EXTENT: i32 = 2048;

    /// Arena spanning `-half_extent..=half_extent` map units on both axes.
    pub fn new(half_extent: i32) -> Self {
        Self {
            half_extent: fixed(half_extent),
        }
    }

    pub fn contains(&self, pos: Vec3, radius: Fixed) -> bool {
        let limit = self.half_extent.saturating_sub(radius);
        pos.x.abs() <= limit && pos.y.abs() <= limit && pos.z >= 0
    }
}

impl Default for BoundedField {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HALF_EXTENT)
    }
}

impl MoveOracle for BoundedField {
    fn try_move(&self, thing: &Thing, to: Vec3) -> bool {
        self.contains(to, thing.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thing_core::{StateNum, TemplateId, ThingTemplate};

    #[test]
    fn rejects_moves_past_the_edge() {
        let template = ThingTemplate::builder("probe").size(20, 16).build();
        let thing =
            Thing::from_template(TemplateId(0), &template, 1, Vec3::ZERO, StateNum(1), 1);
        let field = BoundedField::new(100);

        assert!(field.try_move(&thing, Vec3::units(80, -80, 0)));
        assert!(!field.try_move(&thing, Vec3::units(81, 0, 0)));
        assert!(!field.try_move(&thing, Vec3::units(0, 0, -1)));
    }
}
