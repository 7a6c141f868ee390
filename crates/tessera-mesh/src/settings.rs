/// Render options the mesh builders consult.
pub trait RenderSettings {
    /// Voxels below this y are dropped when they receive no light.
    fn remove_caves_below_y(&self) -> i32;
    /// Use block light instead of sky light for cave detection.
    fn cave_detection_uses_block_light(&self) -> bool;
    /// Light added to every voxel, `0.0..=1.0`.
    fn ambient_light(&self) -> f32;
    /// Keep the hires geometry after extracting low-res colors.
    fn save_hires_layer(&self) -> bool;
    fn min_pos(&self) -> (i32, i32, i32);
    fn max_pos(&self) -> (i32, i32, i32);
    /// Render tiles that are only partially inside the bounds.
    fn render_edges(&self) -> bool;

    fn is_inside_xz(&self, x: i32, z: i32) -> bool {
        let (min, max) = (self.min_pos(), self.max_pos());
        x >= min.0 && x <= max.0 && z >= min.2 && z <= max.2
    }
}

/// Plain-value [`RenderSettings`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettingsData {
    pub remove_caves_below_y: i32,
    pub cave_detection_uses_block_light: bool,
    pub ambient_light: f32,
    pub save_hires_layer: bool,
    pub min_pos: (i32, i32, i32),
    pub max_pos: (i32, i32, i32),
    pub render_edges: bool,
}

impl Default for RenderSettingsData {
    fn default() -> Self {
        Self {
            remove_caves_below_y: 55,
            cave_detection_uses_block_light: false,
            ambient_light: 0.0,
            save_hires_layer: true,
            min_pos: (i32::MIN, i32::MIN, i32::MIN),
            max_pos: (i32::MAX, i32::MAX, i32::MAX),
            render_edges: true,
        }
    }
}

impl RenderSettingsData {
    /// Copies the values of any other settings implementation.
    pub fn from_settings(s: &dyn RenderSettings) -> Self {
        Self {
            remove_caves_below_y: s.remove_caves_below_y(),
            cave_detection_uses_block_light: s.cave_detection_uses_block_light(),
            ambient_light: s.ambient_light(),
            save_hires_layer: s.save_hires_layer(),
            min_pos: s.min_pos(),
            max_pos: s.max_pos(),
            render_edges: s.render_edges(),
        }
    }
}

impl RenderSettings for RenderSettingsData {
    fn remove_caves_below_y(&self) -> i32 {
        self.remove_caves_below_y
    }
    fn cave_detection_uses_block_light(&self) -> bool {
        self.cave_detection_uses_block_light
    }
    fn ambient_light(&self) -> f32 {
        self.ambient_light
    }
    fn save_hires_layer(&self) -> bool {
        self.save_hires_layer
    }
    fn min_pos(&self) -> (i32, i32, i32) {
        self.min_pos
    }
    fn max_pos(&self) -> (i32, i32, i32) {
        self.max_pos
    }
    fn render_edges(&self) -> bool {
        self.render_edges
    }
}
