//! Superfície de vídeo: repassa o tamanho ao loop e pinta o estado atual.

use crate::theme_egui::EguiTheme;
use egui::{Color32, ColorImage, TextureHandle, TextureOptions, Ui};
use ulgen_core::layout;
use ulgen_core::video::{CameraBackend, DisplayRegion, DisplayState, FrameDisplayLoop};

/// Textura do último frame, reenviada só quando a geração do loop muda.
#[derive(Default)]
pub struct VideoView {
    texture: Option<TextureHandle>,
    uploaded_generation: Option<u64>,
}

impl VideoView {
    pub fn show<B: CameraBackend>(&mut self, ui: &mut Ui, video: &mut FrameDisplayLoop<B>, theme: &EguiTheme) {
        let width = ui.available_width();
        let height = match video.target_ratio() {
            Some(r) => layout::height_for_ratio(width, r.num(), r.den()),
            None => layout::height_for_ratio(width, 16, 9),
        };
        let size = egui::vec2(width, height);

        // Loop trabalha em pixels físicos
        let ppp = ui.ctx().pixels_per_point();
        video.resize(DisplayRegion::new(
            (size.x * ppp).round() as u32,
            (size.y * ppp).round() as u32,
        ));

        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(rect, theme.corner_radius, theme.preview_bg);

        match video.display() {
            DisplayState::Placeholder(text) => {
                self.texture = None;
                self.uploaded_generation = None;
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(15.0),
                    theme.text_secondary,
                );
            }
            DisplayState::Image(img) => {
                let generation = video.generation();
                if self.uploaded_generation != Some(generation) {
                    let color_image = ColorImage::from_rgb([img.width as usize, img.height as usize], &img.rgb);
                    match &mut self.texture {
                        Some(tex) => tex.set(color_image, TextureOptions::LINEAR),
                        None => {
                            self.texture =
                                Some(ui.ctx().load_texture("video-feed", color_image, TextureOptions::LINEAR));
                        }
                    }
                    self.uploaded_generation = Some(generation);
                }

                if let Some(tex) = &self.texture {
                    let img_size = egui::vec2(img.width as f32, img.height as f32) / ppp;
                    let img_rect = egui::Rect::from_center_size(rect.center(), img_size);
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(tex.id(), img_rect, uv, Color32::WHITE);
                }
            }
        }
    }
}
