use gpui::{Hsla, rgb};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SemanticColors {
    pub text_primary: Hsla,
    pub text_muted: Hsla,
    pub bg_canvas: Hsla,
    pub bg_surface: Hsla,
    pub bg_soft: Hsla,
    pub border_subtle: Hsla,
    pub border_strong: Hsla,
    pub focus_ring: Hsla,
    pub primary: Hsla,
    pub primary_hover: Hsla,
    pub on_primary: Hsla,
    pub status_error: Hsla,
}

impl SemanticColors {
    pub fn defaults_for(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self {
                text_primary: hex(0x09090b),
                text_muted: hex(0x71717a),
                bg_canvas: hex(0xfafafa),
                bg_surface: hex(0xffffff),
                bg_soft: hex(0xf4f4f5),
                border_subtle: hex(0xe4e4e7),
                border_strong: hex(0xa1a1aa),
                focus_ring: hex(0x3b82f6),
                primary: hex(0x18181b),
                primary_hover: hex(0x3f3f46),
                on_primary: hex(0xfafafa),
                status_error: hex(0x991b1b),
            },
            ColorScheme::Dark => Self {
                text_primary: hex(0xfafafa),
                text_muted: hex(0xa1a1aa),
                bg_canvas: hex(0x09090b),
                bg_surface: hex(0x18181b),
                bg_soft: hex(0x27272a),
                border_subtle: hex(0x27272a),
                border_strong: hex(0x52525b),
                focus_ring: hex(0x60a5fa),
                primary: hex(0xfafafa),
                primary_hover: hex(0xd4d4d8),
                on_primary: hex(0x18181b),
                status_error: hex(0xf87171),
            },
        }
    }
}

/// Colors of the credit card preview, independent of the color scheme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardColors {
    pub face_start: Hsla,
    pub face_end: Hsla,
    pub text: Hsla,
    pub chip: Hsla,
    pub magnetic_strip: Hsla,
    pub signature: Hsla,
    pub signature_text: Hsla,
}

impl Default for CardColors {
    fn default() -> Self {
        Self {
            face_start: hex(0x4338ca),
            face_end: hex(0x7e22ce),
            text: hex(0xffffff),
            chip: hex(0xfcd34d),
            magnetic_strip: hex(0x18181b),
            signature: hex(0xf4f4f5),
            signature_text: hex(0x18181b),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub color_scheme: ColorScheme,
    pub semantic: SemanticColors,
    pub card: CardColors,
    pub particle: Hsla,
    pub radius_px: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_scheme(ColorScheme::Light)
    }
}

impl Theme {
    pub fn for_scheme(color_scheme: ColorScheme) -> Self {
        Self {
            color_scheme,
            semantic: SemanticColors::defaults_for(color_scheme),
            card: CardColors::default(),
            particle: hex(0xf59e0b),
            radius_px: 8.0,
        }
    }

    pub fn dark() -> Self {
        Self::for_scheme(ColorScheme::Dark)
    }

    pub fn with_color_scheme(self, color_scheme: ColorScheme) -> Self {
        Self {
            semantic: SemanticColors::defaults_for(color_scheme),
            color_scheme,
            ..self
        }
    }

    pub fn with_particle(mut self, color: Hsla) -> Self {
        self.particle = color;
        self
    }

    pub fn with_radius(mut self, radius_px: f32) -> Self {
        self.radius_px = radius_px.max(0.0);
        self
    }
}

fn hex(value: u32) -> Hsla {
    rgb(value).into()
}
