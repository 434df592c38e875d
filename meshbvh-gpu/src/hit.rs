use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,

    /// Index into the reordered triangle arrays (i.e. in build order).
    pub triangle_id: u32,
}

impl Hit {
    pub fn none() -> Self {
        Self {
            distance: f32::MAX,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            triangle_id: u32::MAX,
        }
    }

    pub fn is_some(&self) -> bool {
        self.distance < f32::MAX
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::none()
    }
}
