use gpui::{Hsla, IntoElement, RenderOnce, Styled, Transformation, px, radians, svg};

use crate::icon::IconName;

#[derive(IntoElement)]
pub struct Icon {
    name: IconName,
    size: f32,
    color: Option<Hsla>,
    rotation_deg: f32,
}

impl Icon {
    pub fn new(name: IconName) -> Self {
        Self {
            name,
            size: 16.0,
            color: None,
            rotation_deg: 0.0,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size.max(8.0);
        self
    }

    pub fn color(mut self, value: Hsla) -> Self {
        self.color = Some(value);
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotation_deg = degrees;
        self
    }
}

impl RenderOnce for Icon {
    fn render(self, _window: &mut gpui::Window, _cx: &mut gpui::App) -> impl IntoElement {
        let mut icon = svg()
            .path(self.name.path())
            .flex_none()
            .w(px(self.size))
            .h(px(self.size));
        if let Some(color) = self.color {
            icon = icon.text_color(color);
        }
        if self.rotation_deg != 0.0 {
            icon = icon.with_transformation(Transformation::rotate(radians(
                self.rotation_deg.to_radians(),
            )));
        }
        icon
    }
}
