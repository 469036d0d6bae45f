//! # ÜLGEN Dashboard
//!
//! Console de monitoramento do veículo autônomo ÜLGEN, com GUI
//! acelerada por GPU via eframe/egui.
//!
//! Mostra o feed de vídeo da câmera (recortado para 16:9), cards de
//! status e telemetria simulada. O tema segue o SO ou a escolha salva.
//!
//! ## Atalhos
//! - `C`: Próxima câmera
//! - `F` / `F11`: Fullscreen
//! - `G`: Toggle gráficos
//! - `T`: Alternar tema (System → Light → Dark)
//! - `Q` / `Esc`: Sair

mod camera;
mod dashboard;
mod panels;
mod theme_egui;
mod video_view;

use dashboard::UlgenDashboard;
use tracing::warn;
use ulgen_core::AppConfig;

fn main() -> eframe::Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível gravar config padrão: {e}");
        }
    }
    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    // ── Janela eframe ──
    let w = &config.window;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(w.title.clone())
            .with_inner_size([w.min_width, w.min_height])
            .with_min_inner_size([w.min_width, w.min_height]),
        ..Default::default()
    };

    eframe::run_native(
        "ULGEN Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(UlgenDashboard::new(cc, config)))),
    )
}
