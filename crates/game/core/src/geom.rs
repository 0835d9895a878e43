//! Fixed-point world geometry.
//!
//! Positions, momentum and sizes are 16.16 fixed-point integers and angles
//! are binary angle measurements (a full turn wraps `u32`). Integer math keeps
//! replays bit-identical across platforms.

use std::ops::{Add, Sub};

/// 16.16 fixed-point scalar.
pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;

/// Converts whole map units to fixed-point.
#[inline]
pub const fn fixed(units: i32) -> Fixed {
    units.wrapping_shl(FRACBITS)
}

#[inline]
pub const fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Binary angle: `0` faces east, `ANG90` north.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angle(pub u32);

impl Angle {
    pub const ANG45: Self = Self(0x2000_0000);
    pub const ANG90: Self = Self(0x4000_0000);
    pub const ANG180: Self = Self(0x8000_0000);
    pub const ANG270: Self = Self(0xC000_0000);

    /// Angle of the vector `(dx, dy)`, accurate to one octant subdivision.
    ///
    /// Uses the octant-plus-slope approximation so no floating point or
    /// lookup table is involved.
    pub fn of_vector(dx: Fixed, dy: Fixed) -> Self {
        if dx == 0 && dy == 0 {
            return Self(0);
        }
        let (ax, ay) = (dx.unsigned_abs() as u64, dy.unsigned_abs() as u64);
        // Slope within the first octant scaled to 45 degrees.
        let within = |num: u64, den: u64| ((num << 29) / den.max(1)) as u32;
        let base = if ax >= ay {
            within(ay, ax)
        } else {
            Self::ANG90.0 - within(ax, ay)
        };
        let angle = match (dx >= 0, dy >= 0) {
            (true, true) => base,
            (false, true) => Self::ANG180.0 - base,
            (false, false) => Self::ANG180.0.wrapping_add(base),
            (true, false) => 0u32.wrapping_sub(base),
        };
        Self(angle)
    }

    /// Sine in 16.16 fixed point, accurate to about 0.2%.
    ///
    /// Bhaskara's rational approximation, evaluated in integers so results
    /// are identical on every platform.
    pub fn sine(self) -> Fixed {
        let negative = self.0 >= Self::ANG180.0;
        // Position within the half turn, scaled to 0..FRACUNIT.
        let t = i64::from(self.0 & 0x7FFF_FFFF) >> 15;
        let unit = i64::from(FRACUNIT);
        let p = t * (unit - t);
        let value = (16 * p * unit / (5 * unit * unit - 4 * p)) as Fixed;
        if negative { -value } else { value }
    }

    pub fn cosine(self) -> Fixed {
        (self + Self::ANG90).sine()
    }

    /// Vector of length `speed` pointing along this angle.
    pub fn vector(self, speed: Fixed) -> (Fixed, Fixed) {
        (fixed_mul(speed, self.cosine()), fixed_mul(speed, self.sine()))
    }

    /// Signed difference `self - other`, in -ANG180..ANG180.
    pub fn delta(self, other: Self) -> i32 {
        self.0.wrapping_sub(other.0) as i32
    }

    /// Angle covering `degrees` of a full turn. Negative values wrap.
    pub fn from_degrees(degrees: i32) -> Self {
        Self(((i64::from(degrees) << 32) / 360) as u32)
    }

    /// Unit vector scaled by `speed`, using the eight compass directions.
    pub fn thrust(self, speed: Fixed) -> (Fixed, Fixed) {
        let diag = fixed_mul(speed, 46341); // speed * sqrt(2)/2
        match Direction::nearest(self) {
            Direction::East => (speed, 0),
            Direction::NorthEast => (diag, diag),
            Direction::North => (0, speed),
            Direction::NorthWest => (-diag, diag),
            Direction::West => (-speed, 0),
            Direction::SouthWest => (-diag, -diag),
            Direction::South => (0, -speed),
            Direction::SouthEast => (diag, -diag),
        }
    }
}

impl Add for Angle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

/// Eight-way monster movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    const ALL: [Direction; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Direction whose 45-degree sector contains `angle`.
    pub fn nearest(angle: Angle) -> Self {
        let sector = angle.0.wrapping_add(Angle::ANG45.0 / 2) >> 29;
        Self::ALL[sector as usize]
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn angle(self) -> Angle {
        Angle((self as u32) << 29)
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 4)
    }
}

/// Position or momentum in fixed-point map space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    /// Builds a position from whole map units.
    pub const fn units(x: i32, y: i32, z: i32) -> Self {
        Self::new(fixed(x), fixed(y), fixed(z))
    }

    /// Classic octagonal distance approximation in the XY plane.
    pub fn approx_distance(&self, other: &Vec3) -> Fixed {
        let dx = other.x.wrapping_sub(self.x).wrapping_abs();
        let dy = other.y.wrapping_sub(self.y).wrapping_abs();
        if dx < dy {
            dx.wrapping_add(dy).wrapping_sub(dx >> 1)
        } else {
            dx.wrapping_add(dy).wrapping_sub(dy >> 1)
        }
    }

    pub fn angle_to(&self, other: &Vec3) -> Angle {
        Angle::of_vector(other.x.wrapping_sub(self.x), other.y.wrapping_sub(self.y))
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(rhs.x),
            self.y.wrapping_sub(rhs.y),
            self.z.wrapping_sub(rhs.z),
        )
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_add(rhs.x),
            self.y.wrapping_add(rhs.y),
            self.z.wrapping_add(rhs.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_angles_land_in_the_right_quadrant() {
        assert_eq!(Angle::of_vector(FRACUNIT, 0), Angle(0));
        assert_eq!(Angle::of_vector(0, FRACUNIT), Angle::ANG90);
        assert_eq!(Angle::of_vector(-FRACUNIT, 0), Angle::ANG180);
        assert_eq!(Angle::of_vector(0, -FRACUNIT), Angle::ANG270);
        assert_eq!(Angle::of_vector(FRACUNIT, FRACUNIT), Angle::ANG45);
    }

    #[test]
    fn nearest_direction_rounds_to_sector() {
        assert_eq!(Direction::nearest(Angle(0)), Direction::East);
        assert_eq!(Direction::nearest(Angle::ANG90), Direction::North);
        assert_eq!(Direction::nearest(Angle(0xF000_0000)), Direction::East);
        assert_eq!(Direction::North.opposite(), Direction::South);
    }

    #[test]
    fn sine_hits_the_cardinal_points() {
        assert_eq!(Angle(0).sine(), 0);
        assert_eq!(Angle::ANG90.sine(), FRACUNIT);
        assert_eq!(Angle::ANG270.sine(), -FRACUNIT);
        assert_eq!(Angle(0).cosine(), FRACUNIT);
        let (x, y) = Angle::ANG45.vector(fixed(100));
        assert!((x - fixed(71)).abs() < FRACUNIT && (y - x).abs() <= 1);
    }

    #[test]
    fn degrees_wrap_negative_values() {
        assert_eq!(Angle::from_degrees(90), Angle::ANG90);
        assert_eq!(Angle::from_degrees(-90), Angle::ANG270);
        assert_eq!(Angle::ANG90.delta(Angle(0)), Angle::ANG90.0 as i32);
        assert_eq!(Angle(0).delta(Angle::ANG90), -(Angle::ANG90.0 as i32));
    }

    #[test]
    fn approx_distance_is_symmetric() {
        let a = Vec3::units(0, 0, 0);
        let b = Vec3::units(30, 40, 0);
        assert_eq!(a.approx_distance(&b), b.approx_distance(&a));
        assert_eq!(a.approx_distance(&b), fixed(55));
    }
}
