//! Conversão da [`Appearance`] do core para tipos egui.

use egui::{Color32, CornerRadius, Stroke};
use ulgen_core::alerts::AlertLevel;
use ulgen_core::telemetry::SensorHealth;
use ulgen_core::theme::{self, Appearance};

/// Paleta convertida para `Color32`, mais o estilo da plataforma.
#[derive(Clone)]
pub struct EguiTheme {
    pub dark: bool,
    pub corner_radius: f32,
    pub bg: Color32,
    pub card: Color32,
    pub card_border: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub primary: Color32,
    pub accent: Color32,
    pub gray: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub info: Color32,
    pub button_bg: Color32,
    pub button_text: Color32,
    pub preview_bg: Color32,
}

impl EguiTheme {
    pub fn from_appearance(a: &Appearance) -> Self {
        let p = a.palette;
        Self {
            dark: a.is_dark(),
            corner_radius: a.style.corner_radius,
            bg: hex_color(p.bg),
            card: hex_color(p.card),
            card_border: hex_color(p.card_border),
            text: hex_color(p.text),
            text_secondary: hex_color(p.text_secondary),
            primary: hex_color(p.primary),
            accent: hex_color(p.accent),
            gray: hex_color(p.gray),
            success: hex_color(p.success),
            warning: hex_color(p.warning),
            danger: hex_color(p.danger),
            info: hex_color(p.info),
            button_bg: hex_color(p.button_bg),
            button_text: hex_color(p.button_text),
            preview_bg: hex_color(p.preview_bg),
        }
    }

    /// Aplica o tema aos visuals globais do contexto.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.panel_fill = self.bg;
        visuals.window_fill = self.card;
        visuals.extreme_bg_color = self.preview_bg;
        visuals.override_text_color = Some(self.text);
        visuals.selection.bg_fill = self.accent;

        let radius = CornerRadius::same(self.corner_radius.round() as u8);
        for w in [
            &mut visuals.widgets.inactive,
            &mut visuals.widgets.hovered,
            &mut visuals.widgets.active,
        ] {
            w.corner_radius = radius;
        }
        visuals.widgets.inactive.weak_bg_fill = self.button_bg;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_text);
        visuals.widgets.hovered.weak_bg_fill = self.primary;
        visuals.widgets.active.weak_bg_fill = self.accent;

        ctx.set_visuals(visuals);
    }

    pub fn level_color(&self, level: AlertLevel) -> Color32 {
        match level {
            AlertLevel::Normal => self.success,
            AlertLevel::Warning => self.warning,
            AlertLevel::Critical => self.danger,
        }
    }

    pub fn health_color(&self, health: SensorHealth) -> Color32 {
        match health {
            SensorHealth::Ok => self.success,
            SensorHealth::Degraded => self.warning,
            SensorHealth::Fault => self.danger,
        }
    }
}

fn hex_color(hex: &str) -> Color32 {
    let (r, g, b) = theme::hex_to_rgb(hex);
    Color32::from_rgb(r, g, b)
}
