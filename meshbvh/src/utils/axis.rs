use std::ops::Index;

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::X, Self::Y, Self::Z].into_iter()
    }

    /// Returns the axis along which `extent` is the largest; ties go to the
    /// earlier axis.
    pub fn dominant(extent: Vec3) -> Self {
        Self::all()
            .reduce(|best, axis| {
                if extent[axis] > extent[best] {
                    axis
                } else {
                    best
                }
            })
            .unwrap_or(Self::X)
    }
}

impl Index<Axis> for Vec3 {
    type Output = f32;

    fn index(&self, index: Axis) -> &Self::Output {
        match index {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn dominant() {
        assert_eq!(Axis::X, Axis::dominant(vec3(3.0, 1.0, 2.0)));
        assert_eq!(Axis::Y, Axis::dominant(vec3(1.0, 3.0, 2.0)));
        assert_eq!(Axis::Z, Axis::dominant(vec3(1.0, 2.0, 3.0)));
        assert_eq!(Axis::X, Axis::dominant(Vec3::ZERO));
        assert_eq!(Axis::Y, Axis::dominant(vec3(0.0, 1.0, 1.0)));
    }

    #[test]
    fn index() {
        let vec = vec3(1.0, 2.0, 3.0);

        assert_eq!(1.0, vec[Axis::X]);
        assert_eq!(2.0, vec[Axis::Y]);
        assert_eq!(3.0, vec[Axis::Z]);
    }
}
