//! Piece shape definitions
//!
//! Offsets are in block units on the XY plane, centred on the piece origin.

use glam::{Vec2, Vec3};
use rand::Rng;

/// Known piece shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A single cube
    Cube,
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

const CUBE: [Vec2; 1] = [Vec2::new(0.0, 0.0)];
const I: [Vec2; 4] = [
    Vec2::new(-1.5, 0.0),
    Vec2::new(-0.5, 0.0),
    Vec2::new(0.5, 0.0),
    Vec2::new(1.5, 0.0),
];
const O: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(-0.5, 0.5),
    Vec2::new(0.5, 0.5),
];
const T: [Vec2; 4] = [
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
];
const S: [Vec2; 4] = [
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
];
const Z: [Vec2; 4] = [
    Vec2::new(-1.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
];
const J: [Vec2; 4] = [
    Vec2::new(-1.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
];
const L: [Vec2; 4] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
];

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Cube,
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Grid offsets of each cube, in block units
    pub fn offsets(&self) -> &'static [Vec2] {
        match self {
            ShapeKind::Cube => &CUBE,
            ShapeKind::I => &I,
            ShapeKind::O => &O,
            ShapeKind::T => &T,
            ShapeKind::S => &S,
            ShapeKind::Z => &Z,
            ShapeKind::J => &J,
            ShapeKind::L => &L,
        }
    }

    /// Offsets scaled to world units, on the z = 0 plane
    pub fn local_offsets(&self, block_size: f32) -> Vec<Vec3> {
        self.offsets()
            .iter()
            .map(|o| (*o * block_size).extend(0.0))
            .collect()
    }

    pub fn letter(&self) -> char {
        match self {
            ShapeKind::Cube => '.',
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }

    /// Uniformly random shape
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_i_offsets_scale_with_block_size() {
        let offsets = ShapeKind::I.local_offsets(2.0);
        assert_eq!(
            offsets,
            vec![
                Vec3::new(-3.0, 0.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_offsets_unique_within_shape() {
        for shape in ShapeKind::ALL {
            let offsets = shape.offsets();
            for (i, a) in offsets.iter().enumerate() {
                for b in &offsets[i + 1..] {
                    assert_ne!(a, b, "{:?} has overlapping cubes", shape);
                }
            }
        }
    }

    #[test]
    fn test_letters_unique() {
        let letters: std::collections::HashSet<char> =
            ShapeKind::ALL.iter().map(|s| s.letter()).collect();
        assert_eq!(letters.len(), ShapeKind::ALL.len());
        assert_eq!(ShapeKind::I.letter(), 'I');
    }

    #[test]
    fn test_random_covers_every_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(ShapeKind::random(&mut rng));
        }
        assert_eq!(seen.len(), ShapeKind::ALL.len());
    }
}
