use proptest::prelude::*;
use tessera_geom::{Mat3, Vec2, Vec3};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn small_f32() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

proptest! {
    // Cross product is orthogonal to both operands
    #[test]
    fn cross_is_orthogonal(ax in small_f32(), ay in small_f32(), az in small_f32(),
                           bx in small_f32(), by in small_f32(), bz in small_f32()) {
        let a = Vec3::new(ax, ay, az);
        let b = Vec3::new(bx, by, bz);
        let c = a.cross(b);
        let scale = a.length() * b.length() * c.length().max(1.0);
        prop_assert!(c.dot(a).abs() <= 1e-4 * scale.max(1.0));
        prop_assert!(c.dot(b).abs() <= 1e-4 * scale.max(1.0));
    }

    // angle_to always lands in [0, pi]
    #[test]
    fn angle_to_is_bounded(x in small_f32(), y in small_f32(), ox in small_f32(), oy in small_f32()) {
        let a = Vec2::new(x, y).angle_to(ox, oy);
        prop_assert!(a >= 0.0 && a <= std::f32::consts::PI + 1e-6);
    }

    // Rotations preserve distance from the pivot
    #[test]
    fn rotation_preserves_radius(deg in -360.0f32..360.0, x in 0.0f32..1.0, y in 0.0f32..1.0) {
        let mut m = Mat3::IDENTITY;
        m.translate(-0.5, -0.5).rotate(deg, 0.0, 0.0, 1.0).translate(0.5, 0.5);
        let mut p = Vec2::new(x, y);
        p.transform(&m);
        let r0 = Vec2::new(x - 0.5, y - 0.5).length();
        let r1 = Vec2::new(p.x - 0.5, p.y - 0.5).length();
        prop_assert!(approx(r0, r1, 1e-4));
    }
}
