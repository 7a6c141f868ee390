use tessera_geom::Mat3;

/// Model units (0..16) to block units.
pub const BLOCK_SCALE: f32 = 1.0 / 16.0;

/// Maps the unit uv square onto its centered half, `[0.25, 0.75]²`; used for
/// the flowing texture on liquid side faces.
pub const FLOWING_UV_SCALE: Mat3 = Mat3::new([[0.5, 0.0, 0.25], [0.0, 0.5, 0.25], [0.0, 0.0, 1.0]]);

/// Ambient occlusion multipliers by number of occluding neighbors (0..=2);
/// a corner boxed in by both edge neighbors uses `AO_LEVELS[3]`.
pub const AO_LEVELS: [f32; 4] = [1.0, 0.84, 0.70, 0.56];

/// Light level at which a voxel counts as fully lit.
pub const MAX_LIGHT: f32 = 15.0;
