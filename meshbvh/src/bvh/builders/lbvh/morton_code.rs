use std::ops::BitXor;

use glam::Vec3;

/// 30-bit Morton code: 10 bits per axis, interleaved as `xyzxyz...`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MortonCode(u32);

impl MortonCode {
    /// Transforms given point into a Morton code.
    ///
    /// Point's coordinates should be within range 0.0..=1.0; they get clamped
    /// slightly below 1.0 so that the upper boundary lands in the last cell.
    pub fn from_point(point: Vec3) -> Self {
        /// Expands a 10-bit number into a 30-bit one by inserting two zeros
        /// between bits.
        fn expand_bits(mut x: u32) -> u32 {
            x &= 0x3ff;
            x = (x | x << 16) & 0x30000ff;
            x = (x | x << 8) & 0x300f00f;
            x = (x | x << 4) & 0x30c30c3;
            x = (x | x << 2) & 0x9249249;
            x
        }

        let point = point.clamp(Vec3::ZERO, Vec3::splat(0.999999));
        let cells = point * 1024.0;

        let xs = expand_bits(cells.x as u32) << 2;
        let ys = expand_bits(cells.y as u32) << 1;
        let zs = expand_bits(cells.z as u32);

        Self(xs | ys | zs)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn leading_zeros(self) -> u32 {
        self.0.leading_zeros()
    }
}

impl BitXor for MortonCode {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}
