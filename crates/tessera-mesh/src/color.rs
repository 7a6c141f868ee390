use tessera_geom::Color;
use tessera_world::BlockNeighborhood;

use crate::constants::MAX_LIGHT;

/// Biome dependent tints.
pub trait BlockColorCalculator {
    /// Water tint around `block`, premultiplied.
    fn water_average_color(&self, block: &dyn BlockNeighborhood) -> Color;
    /// Tint for faces flagged `tint` on non-liquid blocks (grass, leaves).
    fn foliage_color(&self, block: &dyn BlockNeighborhood) -> Color;
}

/// Averages column water colors over a square of `2 * blend_radius + 1` columns.
#[derive(Clone, Copy, Debug)]
pub struct BiomeColorCalculator {
    pub blend_radius: i32,
    pub foliage: Color,
}

impl Default for BiomeColorCalculator {
    fn default() -> Self {
        let mut foliage = Color::new(0x79 as f32 / 255.0, 0xc0 as f32 / 255.0, 0x5a as f32 / 255.0, 1.0, false);
        foliage.premultiplied();
        Self {
            blend_radius: 2,
            foliage,
        }
    }
}

impl BlockColorCalculator for BiomeColorCalculator {
    fn water_average_color(&self, block: &dyn BlockNeighborhood) -> Color {
        let r = self.blend_radius.max(0);
        let mut sum = Color::new(0.0, 0.0, 0.0, 0.0, true);
        let mut n = 0.0f32;
        for dz in -r..=r {
            for dx in -r..=r {
                let mut c = block.neighbor(dx, 0, dz).water_color;
                c.premultiplied();
                sum.r += c.r;
                sum.g += c.g;
                sum.b += c.b;
                sum.a += c.a;
                n += 1.0;
            }
        }
        sum.r /= n;
        sum.g /= n;
        sum.b /= n;
        sum.a /= n;
        sum
    }

    fn foliage_color(&self, _block: &dyn BlockNeighborhood) -> Color {
        self.foliage
    }
}

/// Brightness multiplier for a voxel: the brighter of sky and block light,
/// lifted by `ambient`.
#[inline]
pub fn light_factor(ambient: f32, block_light: u8, sky_light: u8) -> f32 {
    let light = (sky_light as f32 / MAX_LIGHT).max(block_light as f32 / MAX_LIGHT);
    (ambient + light) / (ambient + 1.0)
}

/// Scales the color channels of `color` by `factor`, leaving alpha alone.
#[inline]
pub(crate) fn apply_light(color: &mut Color, factor: f32) {
    color.r *= factor;
    color.g *= factor;
    color.b *= factor;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_factor_bounds() {
        assert_eq!(light_factor(0.0, 0, 0), 0.0);
        assert_eq!(light_factor(0.0, 0, 15), 1.0);
        assert_eq!(light_factor(0.0, 15, 3), 1.0);
        assert!((light_factor(0.5, 0, 0) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(light_factor(1.0, 15, 15), 1.0);
    }
}
