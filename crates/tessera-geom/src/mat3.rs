/// Row-major 3x3 matrix used for 2D affine transforms of texture coordinates.
///
/// The builder methods (`translate`, `scale`, `rotate`) apply their transform
/// after the ones already accumulated, i.e. `self = op * self`. A chain like
/// `identity().translate(..).scale(..)` therefore reads in application order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn new(m: [[f32; 3]; 3]) -> Self {
        Self { m }
    }

    #[inline]
    pub fn identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.premultiply(&Mat3::new([[1.0, 0.0, x], [0.0, 1.0, y], [0.0, 0.0, 1.0]]))
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.premultiply(&Mat3::new([[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, z]]))
    }

    /// Rotates by `degrees` around the axis `(ax, ay, az)` (right-handed).
    /// A zero axis leaves the matrix unchanged.
    pub fn rotate(&mut self, degrees: f32, ax: f32, ay: f32, az: f32) -> &mut Self {
        let len = (ax * ax + ay * ay + az * az).sqrt();
        if len == 0.0 {
            return self;
        }
        let (x, y, z) = (ax / len, ay / len, az / len);
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;
        let r = Mat3::new([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
        ]);
        self.premultiply(&r)
    }

    /// Returns `lhs * rhs`.
    pub fn mul(lhs: &Mat3, rhs: &Mat3) -> Mat3 {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = lhs.m[r][0] * rhs.m[0][c] + lhs.m[r][1] * rhs.m[1][c] + lhs.m[r][2] * rhs.m[2][c];
            }
        }
        Mat3 { m: out }
    }

    #[inline]
    fn premultiply(&mut self, op: &Mat3) -> &mut Self {
        *self = Mat3::mul(op, self);
        self
    }

    /// Transforms `(x, y, 1)` and drops the homogeneous component.
    #[inline]
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.m;
        (
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
        )
    }
}
