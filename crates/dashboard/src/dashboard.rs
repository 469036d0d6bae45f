//! Dashboard principal – App eframe/egui.

use crate::camera::DashboardBackend;
use crate::panels::{self, UiAction};
use crate::theme_egui::EguiTheme;
use crate::video_view::VideoView;
use egui::{RichText, Ui};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use ulgen_core::alerts::{self, Alert, IssueBar};
use ulgen_core::layout::{self, GRID_SPANS, LayoutMode};
use ulgen_core::preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use ulgen_core::telemetry::{self, TelemetryPoller};
use ulgen_core::theme::{Appearance, Platform, ThemeMode, ThemePreference};
use ulgen_core::video::{CameraBackend, FrameDisplayLoop, TickOutcome};
use ulgen_core::AppConfig;

const GRID_SPACING: f32 = 16.0;
const IDLE_STATUS: &str = "System idle – waiting for processing command";

/// Estado do dashboard.
pub struct UlgenDashboard {
    config: AppConfig,

    // Aparência
    platform: Platform,
    system_mode: Option<ThemeMode>,
    appearance: Appearance,
    theme: EguiTheme,
    preferences: Box<dyn PreferenceStore>,

    // Vídeo
    video: FrameDisplayLoop<DashboardBackend>,
    video_view: VideoView,
    selected_source: usize,

    // Telemetria
    telemetry: TelemetryPoller,
    alerts: Vec<Alert>,
    issue_bar: IssueBar,

    // UI state
    system_line: String,
    host_label: String,
    status_line: String,
    active_section: usize,
    show_graphs: bool,
    is_fullscreen: bool,
    geometry_applied: bool,
}

impl UlgenDashboard {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        // ── Preferência de tema ──
        let preferences: Box<dyn PreferenceStore> = match FilePreferenceStore::user_default() {
            Ok(store) => {
                info!("Preferências em {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                warn!("Preferências não serão persistidas: {e}");
                Box::new(MemoryPreferenceStore::default())
            }
        };

        let platform = Platform::current();
        // Sem tema do SO, usa a luminância da janela padrão do egui
        let system_mode = system_mode(&cc.egui_ctx).or_else(|| {
            let c = cc.egui_ctx.style().visuals.window_fill;
            Some(ThemeMode::from_window_color(c.r(), c.g(), c.b()))
        });
        let appearance = Appearance::resolve(preferences.load_theme(), platform, system_mode);
        let theme = EguiTheme::from_appearance(&appearance);
        theme.apply(&cc.egui_ctx);
        info!("Tema: {} ({:?})", appearance.preference, appearance.mode);

        // ── Vídeo ──
        let video_cfg = &config.video;
        let selected_source = if video_cfg.initial_source < video_cfg.sources.len() {
            video_cfg.initial_source
        } else {
            0
        };
        let mut video = FrameDisplayLoop::new(
            DashboardBackend,
            video_cfg.initial(),
            video_cfg.target_aspect,
            video_cfg.placeholder_text.clone(),
        );
        video.start(video_cfg.period_ms);

        // ── Telemetria ──
        let source = telemetry::build_source(config.telemetry.source, config.telemetry.seed);
        let poller = TelemetryPoller::new(source, Duration::from_millis(config.telemetry.poll_interval_ms));

        let system_line = config.vehicle.system_line(platform.style().display_name);
        info!("Veículo: {}", config.vehicle);

        Self {
            show_graphs: config.layout.show_graphs,
            config,
            platform,
            system_mode,
            appearance,
            theme,
            preferences,
            video,
            video_view: VideoView::default(),
            selected_source,
            telemetry: poller,
            alerts: Vec::new(),
            issue_bar: IssueBar::default(),
            system_line,
            host_label: host_label(),
            status_line: IDLE_STATUS.into(),
            active_section: 0,
            is_fullscreen: false,
            geometry_applied: false,
        }
    }

    // ── Aparência ──

    fn set_theme(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        if preference != self.appearance.preference {
            if let Err(e) = self.preferences.save_theme(preference) {
                warn!("Erro ao salvar preferência de tema: {e}");
            }
            info!("Tema: {preference}");
        }
        self.refresh_appearance(ctx, preference);
    }

    fn refresh_appearance(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        self.appearance = Appearance::resolve(preference, self.platform, self.system_mode);
        self.theme = EguiTheme::from_appearance(&self.appearance);
        self.theme.apply(ctx);
    }

    /// Acompanha mudanças do tema do SO enquanto a preferência for "System".
    fn track_system_theme(&mut self, ctx: &egui::Context) {
        let Some(mode) = system_mode(ctx) else {
            return;
        };
        if self.system_mode != Some(mode) {
            self.system_mode = Some(mode);
            if self.appearance.preference == ThemePreference::System {
                info!("Tema do sistema mudou: {mode:?}");
                self.refresh_appearance(ctx, ThemePreference::System);
            }
        }
    }

    /// Janela centralizada cobrindo parte do monitor, aplicada uma vez.
    fn apply_initial_geometry(&mut self, ctx: &egui::Context) {
        if self.geometry_applied {
            return;
        }
        let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        let w = &self.config.window;
        let mut geometry = layout::window_geometry([monitor.x, monitor.y], w.screen_fraction);
        geometry.size[0] = geometry.size[0].max(w.min_width);
        geometry.size[1] = geometry.size[1].max(w.min_height);
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(geometry.size.into()));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(geometry.pos.into()));
        self.geometry_applied = true;
    }

    // ── Ações ──

    fn select_source(&mut self, index: usize) {
        let Some(entry) = self.config.video.sources.get(index) else {
            return;
        };
        info!("Origem de vídeo: {} ({})", entry.label, entry.source);
        self.selected_source = index;
        self.video.change_source(entry.source.clone());
    }

    fn next_source(&mut self) {
        let count = self.config.video.sources.len();
        if count > 1 {
            self.select_source((self.selected_source + 1) % count);
        }
    }

    fn apply_actions(&mut self, ctx: &egui::Context, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::SelectSource(i) => self.select_source(i),
                UiAction::SetTheme(pref) => self.set_theme(ctx, pref),
                UiAction::SelectSection(i) => self.active_section = i,
                UiAction::ToggleGraphs => self.show_graphs = !self.show_graphs,
                UiAction::DismissIssues => self.issue_bar.dismiss(&self.alerts),
                UiAction::Command(command) => {
                    info!("Comando: {command}");
                    self.status_line = match command {
                        "analyze" => format!(
                            "Analysis requested – {}",
                            self.config
                                .video
                                .sources
                                .get(self.selected_source)
                                .map(|e| e.label.as_str())
                                .unwrap_or("no source")
                        ),
                        other => format!("Command received: {other}"),
                    };
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (theme, graphs, camera, fullscreen, quit) = ctx.input(|i: &egui::InputState| {
            (
                i.key_pressed(egui::Key::T),
                i.key_pressed(egui::Key::G),
                i.key_pressed(egui::Key::C),
                i.key_pressed(egui::Key::F) || i.key_pressed(egui::Key::F11),
                i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape),
            )
        });
        if theme {
            let next = self.appearance.preference.next();
            self.set_theme(ctx, next);
        }
        if graphs {
            self.show_graphs = !self.show_graphs;
        }
        if camera {
            self.next_source();
        }
        if fullscreen {
            self.is_fullscreen = !self.is_fullscreen;
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    // ── Cards ──

    fn video_card(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let layout_cfg = &self.config.layout;
        let theme = &self.theme;
        let video = &mut self.video;
        let view = &mut self.video_view;
        let sources = &self.config.video.sources;
        let selected = self.selected_source;

        panels::card(ui, "Live Video Feed", theme, layout_cfg.card_borders, |ui: &mut Ui| {
            let label = sources.get(selected).map(|e| e.label.as_str()).unwrap_or("—");
            let stats = video.stats();
            ui.label(
                RichText::new(format!("{label} • {} frames", stats.frames_displayed))
                    .color(theme.text_secondary)
                    .size(11.0),
            );
            ui.add_space(4.0);
            view.show(ui, video, theme);
            if layout_cfg.show_camera_selector {
                ui.add_space(8.0);
                panels::camera_selector(ui, theme, sources, selected, actions);
            }
        });
    }

    fn side_cards(&self, ui: &mut Ui, actions: &mut Vec<UiAction>, column: usize) {
        let borders = self.config.layout.card_borders;
        let Some(snapshot) = self.telemetry.latest() else {
            return;
        };
        match column {
            1 => {
                if self.config.layout.show_analysis {
                    panels::analysis_card(ui, &self.theme, borders, &snapshot.analysis);
                    ui.add_space(GRID_SPACING);
                }
                if self.config.layout.show_datasets {
                    panels::datasets_card(ui, &self.theme, borders, &snapshot.dataset);
                }
            }
            _ => panels::analyze_card(ui, &self.theme, borders, &self.status_line, actions),
        }
    }

    fn render_grid(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let available = ui.available_width();
        match LayoutMode::for_width(available, self.config.window.compact_breakpoint) {
            LayoutMode::Wide => {
                let widths = layout::grid_widths(available, GRID_SPACING, &GRID_SPANS);
                ui.horizontal_top(|ui: &mut Ui| {
                    ui.spacing_mut().item_spacing.x = GRID_SPACING;
                    for (column, &w) in widths.iter().enumerate() {
                        ui.allocate_ui_with_layout(
                            egui::vec2(w, 0.0),
                            egui::Layout::top_down(egui::Align::Min),
                            |ui: &mut Ui| {
                                ui.set_width(w);
                                if column == 0 {
                                    self.video_card(ui, actions);
                                } else {
                                    self.side_cards(ui, actions, column);
                                }
                            },
                        );
                    }
                });
            }
            LayoutMode::Compact => {
                self.video_card(ui, actions);
                ui.add_space(GRID_SPACING);
                self.side_cards(ui, actions, 1);
                ui.add_space(GRID_SPACING);
                self.side_cards(ui, actions, 2);
            }
        }

        if self.config.layout.show_instruments {
            if let Some(snapshot) = self.telemetry.latest() {
                ui.add_space(GRID_SPACING);
                panels::instruments_row(ui, &self.theme, self.config.layout.card_borders, snapshot, &self.alerts);
            }
        }

        if self.show_graphs {
            ui.add_space(GRID_SPACING);
            panels::card(ui, "Telemetry", &self.theme, self.config.layout.card_borders, |ui: &mut Ui| {
                panels::graphs(ui, &self.theme, self.telemetry.history());
            });
        }
    }
}

impl eframe::App for UlgenDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.apply_initial_geometry(ctx);
        self.track_system_theme(ctx);

        // ── Poll vídeo e telemetria ──
        poll_video(&mut self.video, now);
        if self.telemetry.poll_if_due(now) {
            if let Some(snapshot) = self.telemetry.latest() {
                self.alerts = alerts::evaluate_alerts(snapshot, &self.config.alerts);
            }
        }

        // ── Repaint no próximo prazo ──
        let mut wait = self.telemetry.time_until_next_poll(now);
        if let Some(video_wait) = self.video.time_until_next_tick(now) {
            wait = wait.min(video_wait);
        }
        ctx.request_repaint_after(wait);

        self.handle_shortcuts(ctx);

        let mut actions = Vec::new();

        // ── Menu lateral ──
        egui::SidePanel::left("side_menu")
            .exact_width(80.0)
            .resizable(false)
            .frame(egui::Frame::new().fill(self.theme.card))
            .show(ctx, |ui: &mut Ui| {
                panels::side_menu(ui, &self.theme, self.active_section, self.appearance.preference, &mut actions);
            });

        // ── Barra superior ──
        egui::TopBottomPanel::top("topbar")
            .frame(egui::Frame::new().fill(self.theme.bg).inner_margin(12.0))
            .show(ctx, |ui: &mut Ui| {
                panels::topbar(
                    ui,
                    &self.theme,
                    &self.config.vehicle,
                    &self.system_line,
                    &self.host_label,
                    self.telemetry.latest(),
                    &self.config.alerts,
                );
            });

        // ── Barra de issues ──
        if self.config.layout.show_issue_bar && self.issue_bar.is_visible(&self.alerts) {
            egui::TopBottomPanel::bottom("issues")
                .frame(egui::Frame::new().fill(self.theme.card).inner_margin(8.0))
                .show(ctx, |ui: &mut Ui| {
                    if panels::issue_bar(ui, &self.theme, &self.alerts) {
                        actions.push(UiAction::DismissIssues);
                    }
                });
        }

        // ── Painel central ──
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.bg).inner_margin(16.0))
            .show(ctx, |ui: &mut Ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui: &mut Ui| {
                        self.render_grid(ui, &mut actions);

                        ui.add_space(12.0);
                        ui.vertical_centered(|ui: &mut Ui| {
                            ui.label(
                                RichText::new("[C] Camera | [F] Fullscreen | [G] Graphs | [T] Theme | [Q/Esc] Quit")
                                    .color(self.theme.gray)
                                    .size(10.0),
                            );
                        });
                    });
            });

        self.apply_actions(ctx, actions);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.video.stop();
        let stats = self.video.stats();
        info!(
            "Encerrando: {} ticks, {} frames, {} falhas de leitura",
            stats.ticks, stats.frames_displayed, stats.read_failures
        );
    }
}

/// Só consulta o loop depois que a superfície de vídeo tem tamanho; antes
/// disso o tick descartaria o frame.
fn poll_video<B: CameraBackend>(video: &mut FrameDisplayLoop<B>, now: Instant) -> Option<TickOutcome> {
    if video.region().is_empty() {
        return None;
    }
    video.poll(now)
}

fn system_mode(ctx: &egui::Context) -> Option<ThemeMode> {
    ctx.system_theme().map(|t| match t {
        egui::Theme::Dark => ThemeMode::Dark,
        egui::Theme::Light => ThemeMode::Light,
    })
}

/// "hostname • versão do SO", quando disponível.
fn host_label() -> String {
    [sysinfo::System::host_name(), sysinfo::System::long_os_version()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" • ")
}
