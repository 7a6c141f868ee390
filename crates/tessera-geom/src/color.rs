/// RGBA color in `0..=1` floats that remembers whether its RGB channels are
/// premultiplied by alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub premultiplied: bool,
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
        premultiplied: true,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
        premultiplied: true,
    };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32, premultiplied: bool) -> Self {
        Self {
            r,
            g,
            b,
            a,
            premultiplied,
        }
    }

    #[inline]
    pub fn set(&mut self, r: f32, g: f32, b: f32, a: f32, premultiplied: bool) -> &mut Self {
        *self = Color::new(r, g, b, a, premultiplied);
        self
    }

    #[inline]
    pub fn set_from(&mut self, other: &Color) -> &mut Self {
        *self = *other;
        self
    }

    pub fn premultiplied(&mut self) -> &mut Self {
        if !self.premultiplied {
            self.r *= self.a;
            self.g *= self.a;
            self.b *= self.a;
            self.premultiplied = true;
        }
        self
    }

    pub fn straight(&mut self) -> &mut Self {
        if self.premultiplied {
            if self.a > 0.0 {
                self.r /= self.a;
                self.g /= self.a;
                self.b /= self.a;
            }
            self.premultiplied = false;
        }
        self
    }

    /// Component-wise multiply. `self` is first brought into the same
    /// premultiplication state as `other`.
    pub fn multiply(&mut self, other: &Color) -> &mut Self {
        if other.premultiplied {
            self.premultiplied();
        } else {
            self.straight();
        }
        self.r *= other.r;
        self.g *= other.g;
        self.b *= other.b;
        self.a *= other.a;
        self
    }

    /// Composites `top` over `self` ("source over"); the result is premultiplied.
    pub fn overlay(&mut self, top: &Color) -> &mut Self {
        let mut t = *top;
        t.premultiplied();
        self.premultiplied();
        let inv = 1.0 - t.a;
        self.r = t.r + self.r * inv;
        self.g = t.g + self.g * inv;
        self.b = t.b + self.b * inv;
        self.a = t.a + self.a * inv;
        self
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Parses `#rrggbb` or `#rrggbbaa` into a straight (non-premultiplied) color.
    pub fn from_rgb_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Color::new(channel(0)?, channel(2)?, channel(4)?, a, false))
    }
}
