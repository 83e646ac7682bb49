use crate::Vec3;

/// Orthonormal basis `{u, v, w}` built around a unit vector `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis is `normal`.
    ///
    /// The helper axis switches from +Y to +X when `normal` is close to
    /// the YZ plane so the cross product never degenerates.
    pub fn from_w(normal: Vec3) -> Self {
        let w = normal;
        let helper = if w.x.abs() > 0.1 { Vec3::Y } else { Vec3::X };
        let u = helper.cross(w).normalize();
        let v = w.cross(u);
        Self { u, v, w }
    }

    /// Transform local coordinates into world space.
    #[inline]
    pub fn local(&self, a: f32, b: f32, c: f32) -> Vec3 {
        self.u * a + self.v * b + self.w * c
    }
}
