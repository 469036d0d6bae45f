//! Cards e faixas do dashboard renderizados com egui.

use crate::theme_egui::EguiTheme;
use egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};
use std::collections::VecDeque;
use ulgen_core::alerts::{self, Alert};
use ulgen_core::config::{AlertThresholds, VideoSourceEntry};
use ulgen_core::telemetry::{AnalysisInfo, DatasetInfo, TelemetryHistory, TelemetrySnapshot};
use ulgen_core::theme::ThemePreference;
use ulgen_core::vehicle::VehicleInfo;

/// Ação disparada por um widget; aplicada pelo dashboard após o desenho.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectSource(usize),
    SetTheme(ThemePreference),
    SelectSection(usize),
    ToggleGraphs,
    DismissIssues,
    Command(&'static str),
}

// ──────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────

fn metric_row(ui: &mut Ui, label: &str, value: &str, color: Color32, dim: Color32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(label).color(dim));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.label(RichText::new(value).color(color).strong());
        });
    });
}

/// Card com título; a borda some quando `borders` é falso.
pub fn card(ui: &mut Ui, title: &str, theme: &EguiTheme, borders: bool, add_body: impl FnOnce(&mut Ui)) {
    let stroke = if borders {
        egui::Stroke::new(1.0, theme.card_border)
    } else {
        egui::Stroke::NONE
    };
    egui::Frame::new()
        .fill(theme.card)
        .stroke(stroke)
        .corner_radius(theme.corner_radius)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            if !title.is_empty() {
                ui.label(RichText::new(title).color(theme.text).strong().size(15.0));
                ui.add_space(6.0);
            }
            add_body(ui);
        });
}

fn pill_button(ui: &mut Ui, text: &str, fill: Color32, fg: Color32, radius: f32) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(text).color(fg))
            .fill(fill)
            .corner_radius(radius)
            .min_size(egui::vec2(0.0, 28.0)),
    )
}

// ──────────────────────────────────────────
// Menu lateral
// ──────────────────────────────────────────

const SECTIONS: [(&str, &str); 4] = [
    ("🔬", "Analysis"),
    ("🗺", "Map"),
    ("📡", "Telemetry"),
    ("🚗", "Vehicle"),
];

pub fn side_menu(
    ui: &mut Ui,
    theme: &EguiTheme,
    active: usize,
    preference: ThemePreference,
    actions: &mut Vec<UiAction>,
) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(16.0);
        for (i, (icon, name)) in SECTIONS.iter().enumerate() {
            let fill = if i == active { theme.primary } else { theme.card };
            let fg = if i == active { theme.button_text } else { theme.text };
            let resp = ui
                .add(
                    egui::Button::new(RichText::new(*icon).size(22.0).color(fg))
                        .fill(fill)
                        .corner_radius(theme.corner_radius)
                        .min_size(egui::vec2(48.0, 48.0)),
                )
                .on_hover_text(*name);
            if resp.clicked() {
                actions.push(UiAction::SelectSection(i));
            }
            ui.add_space(8.0);
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui: &mut Ui| {
            ui.add_space(16.0);
            ui.menu_button(RichText::new("🎨").size(22.0), |ui: &mut Ui| {
                for pref in ThemePreference::ALL {
                    if ui.radio(pref == preference, pref.label()).clicked() {
                        actions.push(UiAction::SetTheme(pref));
                        ui.close_menu();
                    }
                }
            });
            ui.add_space(8.0);
            if ui
                .button(RichText::new("📈").size(22.0))
                .on_hover_text("Graphs [G]")
                .clicked()
            {
                actions.push(UiAction::ToggleGraphs);
            }
        });
    });
}

// ──────────────────────────────────────────
// Barra superior
// ──────────────────────────────────────────

fn info_box(ui: &mut Ui, theme: &EguiTheme, icon: &str, value: String, label: &str, color: Color32) {
    egui::Frame::new()
        .fill(theme.card)
        .corner_radius(theme.corner_radius)
        .inner_margin(egui::Margin::symmetric(12, 6))
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(RichText::new(icon).size(18.0));
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(value).color(color).strong().size(15.0));
                    ui.label(RichText::new(label).color(theme.text_secondary).size(10.0));
                });
            });
        });
}

/// "ULGEN • AI-Driven Explorer • 2025"
fn vehicle_line(vehicle: &VehicleInfo) -> String {
    vehicle
        .fields()
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" • ")
}

pub fn topbar(
    ui: &mut Ui,
    theme: &EguiTheme,
    vehicle: &VehicleInfo,
    system_line: &str,
    host_label: &str,
    snapshot: Option<&TelemetrySnapshot>,
    th: &AlertThresholds,
) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("ÜLGEN").color(theme.primary).strong().size(26.0));
        ui.add_space(12.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(vehicle_line(vehicle)).color(theme.text).strong());
            ui.label(RichText::new(system_line).color(theme.text_secondary).size(11.0));
            if !host_label.is_empty() {
                ui.label(RichText::new(host_label).color(theme.gray).size(10.0));
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let Some(s) = snapshot else {
                ui.label(RichText::new("Waiting for telemetry…").color(theme.text_secondary));
                return;
            };
            // right_to_left: a ordem visual fica invertida
            info_box(ui, theme, "⚡", format!("{:.0}W", s.power_w), "Watt",
                theme.level_color(alerts::level_for_value(s.power_w, th.power_warning, th.power_critical)));
            info_box(ui, theme, "⚙", format!("{:.0}Nm", s.torque_nm), "Torque", theme.text);
            info_box(ui, theme, "🧭", format!("{:.0}°", s.bearing_deg), "Bearings", theme.text);
            info_box(ui, theme, "🔋", format!("{:.0}%", s.battery_percent), "Battery",
                theme.level_color(alerts::level_for_low_value(s.battery_percent, th.battery_warning, th.battery_critical)));
            info_box(ui, theme, "🌡", format!("{:.0}°C", s.temperature_c), "Temp",
                theme.level_color(alerts::level_for_value(s.temperature_c, th.temperature_warning, th.temperature_critical)));
        });
    });
}

// ──────────────────────────────────────────
// Seletor de câmera
// ──────────────────────────────────────────

pub fn camera_selector(
    ui: &mut Ui,
    theme: &EguiTheme,
    sources: &[VideoSourceEntry],
    selected: usize,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, entry) in sources.iter().enumerate() {
            let (fill, fg) = if i == selected {
                (theme.primary, theme.button_text)
            } else {
                (theme.button_bg, theme.text)
            };
            if pill_button(ui, &entry.label, fill, fg, theme.corner_radius).clicked() && i != selected {
                actions.push(UiAction::SelectSource(i));
            }
        }
    });
}

// ──────────────────────────────────────────
// Image Analysis / DATASETS / Analyze
// ──────────────────────────────────────────

pub fn analysis_card(ui: &mut Ui, theme: &EguiTheme, borders: bool, info: &AnalysisInfo) {
    card(ui, "Image Analysis", theme, borders, |ui: &mut Ui| {
        ui.label(RichText::new(format!("{:.0}%", info.accuracy_percent)).color(theme.primary).strong().size(32.0));
        ui.label(RichText::new("Accuracy").color(theme.text_secondary).size(11.0));
        ui.add(
            egui::ProgressBar::new((info.accuracy_percent / 100.0).clamp(0.0, 1.0))
                .fill(theme.accent)
                .desired_height(6.0),
        );
        ui.add_space(6.0);
        let task = info.current_task.as_deref().unwrap_or("—");
        metric_row(ui, "Current task", task, theme.text, theme.text_secondary);
        let (epochs, color) = if info.epochs_available {
            ("Available", theme.success)
        } else {
            ("None", theme.gray)
        };
        metric_row(ui, "Epochs", epochs, color, theme.text_secondary);
    });
}

pub fn datasets_card(ui: &mut Ui, theme: &EguiTheme, borders: bool, dataset: &DatasetInfo) {
    card(ui, "DATASETS", theme, borders, |ui: &mut Ui| {
        metric_row(ui, "Mode", &dataset.mode, theme.text, theme.text_secondary);
        metric_row(ui, "Intake", &dataset.intake, theme.text, theme.text_secondary);
        metric_row(ui, "Frequency", &format!("{:.1} Hz", dataset.frequency_hz), theme.text, theme.text_secondary);

        ui.add_space(6.0);
        let (state, color) = if dataset.sources_active {
            ("ACTIVE", theme.success)
        } else {
            ("IDLE", theme.gray)
        };
        egui::Frame::new()
            .fill(theme.preview_bg)
            .corner_radius(theme.corner_radius)
            .inner_margin(8.0)
            .show(ui, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("SOURCES").color(theme.text_secondary).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                        ui.label(RichText::new(state).color(color).strong());
                    });
                });
            });
    });
}

pub fn analyze_card(
    ui: &mut Ui,
    theme: &EguiTheme,
    borders: bool,
    status_line: &str,
    actions: &mut Vec<UiAction>,
) {
    card(ui, "Analyze", theme, borders, |ui: &mut Ui| {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, width * 0.6), egui::Sense::hover());
        ui.painter().rect_filled(rect, theme.corner_radius, theme.preview_bg);
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No image loaded",
            egui::FontId::proportional(13.0),
            theme.text_secondary,
        );
        ui.add_space(6.0);
        ui.label(RichText::new(status_line).color(theme.text_secondary).size(11.0));
        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (text, command) in [("⏏ Eject", "eject"), ("⬆ Upload", "upload"), ("CNN", "cnn"), ("⚙", "settings")] {
                if pill_button(ui, text, theme.button_bg, theme.text, theme.corner_radius).clicked() {
                    actions.push(UiAction::Command(command));
                }
            }
        });
        ui.add_space(4.0);
        let analyze = ui.add_sized(
            egui::vec2(ui.available_width(), 34.0),
            egui::Button::new(RichText::new("Analyze Image").color(theme.button_text).strong())
                .fill(theme.primary)
                .corner_radius(theme.corner_radius),
        );
        if analyze.clicked() {
            actions.push(UiAction::Command("analyze"));
        }
    });
}

// ──────────────────────────────────────────
// Instrumentos
// ──────────────────────────────────────────

pub fn instruments_row(
    ui: &mut Ui,
    theme: &EguiTheme,
    borders: bool,
    snapshot: &TelemetrySnapshot,
    active_alerts: &[Alert],
) {
    ui.columns(3, |cols| {
        card(&mut cols[0], "", theme, borders, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(format!("{:.0}", snapshot.speed_kmh)).color(theme.text).strong().size(40.0));
                ui.label(RichText::new("KM/H").color(theme.text_secondary));
            });
        });

        card(&mut cols[1], "Magnetometer", theme, borders, |ui: &mut Ui| {
            let m = snapshot.magnetometer;
            metric_row(ui, "X", &format!("{:.2} µT", m.x), theme.info, theme.text_secondary);
            metric_row(ui, "Y", &format!("{:.2} µT", m.y), theme.info, theme.text_secondary);
            metric_row(ui, "Z", &format!("{:.2} µT", m.z), theme.info, theme.text_secondary);
        });

        card(&mut cols[2], "Sensors", theme, borders, |ui: &mut Ui| {
            for (name, health) in snapshot.sensors.iter() {
                metric_row(ui, name, &health.to_string(), theme.health_color(health), theme.text_secondary);
            }
            ui.separator();
            let worst = alerts::worst_level(active_alerts);
            let status = if active_alerts.is_empty() {
                "All systems nominal".to_string()
            } else {
                alerts::issue_summary(active_alerts.len())
            };
            ui.label(RichText::new(status).color(theme.level_color(worst)).strong());
        });
    });
}

// ──────────────────────────────────────────
// Barra de issues
// ──────────────────────────────────────────

/// Retorna `true` se o usuário fechou a barra.
pub fn issue_bar(ui: &mut Ui, theme: &EguiTheme, active_alerts: &[Alert]) -> bool {
    let color = theme.level_color(alerts::worst_level(active_alerts));
    let mut dismissed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("⚠").color(color).size(16.0));
        ui.label(RichText::new(alerts::issue_summary(active_alerts.len())).color(color).strong());
        for alert in active_alerts {
            ui.label(
                RichText::new(format!("{}: {}", alert.label, alert.detail))
                    .color(theme.level_color(alert.level))
                    .size(11.0),
            );
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.small_button("✕").clicked() {
                dismissed = true;
            }
        });
    });
    dismissed
}

// ──────────────────────────────────────────
// Gráficos
// ──────────────────────────────────────────

pub fn graphs(ui: &mut Ui, theme: &EguiTheme, history: &TelemetryHistory) {
    let w = (ui.available_width() / 4.0) - 8.0;
    let h = 110.0;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (label, data, color, y_max) in [
            ("Temp °C", &history.temperature, theme.danger, 100.0),
            ("Battery %", &history.battery, theme.success, 100.0),
            ("Power W", &history.power, theme.warning, 40.0),
            ("Speed km/h", &history.speed, theme.info, 60.0),
        ] {
            ui.vertical(|ui: &mut Ui| {
                mini_plot(ui, label, data, color, w, h, y_max);
            });
        }
    });
}

fn mini_plot(
    ui: &mut Ui,
    label: &str,
    data: &VecDeque<f64>,
    color: Color32,
    width: f32,
    height: f32,
    y_max: f64,
) {
    ui.label(RichText::new(label).color(color).size(11.0));

    let points: PlotPoints = data
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    Plot::new(format!("plot_{label}"))
        .height(height)
        .width(width)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .include_y(y_max)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(color).width(1.5));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_line_joins_fields() {
        assert_eq!(vehicle_line(&VehicleInfo::default()), "ULGEN • AI-Driven Explorer • 2025");

        let vehicle = VehicleInfo {
            model: String::new(),
            ..VehicleInfo::default()
        };
        assert_eq!(vehicle_line(&vehicle), "ULGEN • 2025");
    }
}
